//! Erasure box for leaf factories.

use super::{AnyFactory, Factory};
use crate::action::AnyAction;
use crate::context::AnyContext;
use crate::error::RoutingError;
use crate::unit::BoxedUnit;
use std::fmt;
use tracing::debug;

/// Owns one [`Factory`] and its embedding action.
pub struct FactoryBox<F: Factory> {
    factory: F,
    action: Box<dyn AnyAction>,
}

impl<F: Factory> FactoryBox<F> {
    pub fn new(factory: F, action: impl AnyAction + 'static) -> Self {
        Self {
            factory,
            action: Box::new(action),
        }
    }

    /// Box `factory` straight into the erased form
    pub fn boxed(factory: F, action: impl AnyAction + 'static) -> Box<dyn AnyFactory> {
        Box::new(Self::new(factory, action))
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}

impl<F: Factory> fmt::Debug for FactoryBox<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.factory, f)
    }
}

impl<F: Factory> AnyFactory for FactoryBox<F> {
    fn action(&self) -> &dyn AnyAction {
        self.action.as_ref()
    }

    fn prepare(&mut self, context: &AnyContext) -> Result<(), RoutingError> {
        let description = self.description();
        let typed = context.value::<F::Context>(&description)?;
        debug!(factory = %description, "Preparing factory");
        self.factory.prepare(typed)
    }

    fn build(&mut self, context: &AnyContext) -> Result<BoxedUnit, RoutingError> {
        let description = self.description();
        let typed = context.value::<F::Context>(&description)?;
        debug!(factory = %description, "Building unit");
        self.factory.build(typed).map(BoxedUnit::new)
    }
}

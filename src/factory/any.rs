//! Non type safe boxing interface for factories.

use crate::action::AnyAction;
use crate::context::AnyContext;
use crate::error::RoutingError;
use crate::unit::BoxedUnit;
use std::fmt;

/// Type-erased factory as stored and ordered by the router.
pub trait AnyFactory: fmt::Debug {
    /// Embedding action of the wrapped factory
    fn action(&self) -> &dyn AnyAction;

    /// Downcast `context` and forward it to the wrapped factory's `prepare`.
    ///
    /// Not idempotent: calling twice prepares the wrapped factory twice.
    fn prepare(&mut self, context: &AnyContext) -> Result<(), RoutingError>;

    /// Downcast `context` and build the wrapped factory's unit
    fn build(&mut self, context: &AnyContext) -> Result<BoxedUnit, RoutingError>;

    /// Claim the candidates this factory integrates as children and return the rest.
    ///
    /// Non-container factories claim nothing, and the composer only calls this on
    /// factories whose [`AnyFactory::is_container`] is true.
    fn scrape_children(
        &mut self,
        candidates: Vec<Box<dyn AnyFactory>>,
    ) -> Result<Vec<Box<dyn AnyFactory>>, RoutingError> {
        Ok(candidates)
    }

    /// Number of children claimed by [`AnyFactory::scrape_children`]
    fn child_count(&self) -> usize {
        0
    }

    fn is_container(&self) -> bool {
        false
    }

    /// Description of the wrapped factory
    fn description(&self) -> String {
        format!("{:?}", self)
    }
}

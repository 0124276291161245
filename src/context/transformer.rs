//! Context transformers: derive the context a factory actually receives.
//!
//! Transformers must be deterministic. A postponed factory applies its transformer
//! once during `prepare` and again during `build` instead of keeping the derived
//! value around, so both phases must observe the same context.

use super::AnyContext;
use crate::error::RoutingError;
use std::any::{type_name, Any};
use std::fmt;

/// Type-erased transformer contract
pub trait AnyContextTransformer: fmt::Debug {
    /// Map an incoming context into the context handed to the wrapped factory
    fn transform(&self, context: &AnyContext) -> Result<AnyContext, RoutingError>;
}

/// Passes the context through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityTransformer;

impl AnyContextTransformer for IdentityTransformer {
    fn transform(&self, context: &AnyContext) -> Result<AnyContext, RoutingError> {
        Ok(context.clone())
    }
}

/// Strongly typed transformer
pub trait ContextTransformer: fmt::Debug + 'static {
    type Source: Any;
    type Target: Any + Send + Sync + fmt::Debug;

    fn transform(&self, source: &Self::Source) -> Result<Self::Target, RoutingError>;
}

/// Erases a [`ContextTransformer`], downcasting the incoming context to its source type.
pub struct ContextTransformerBox<T: ContextTransformer> {
    transformer: T,
}

impl<T: ContextTransformer> ContextTransformerBox<T> {
    pub fn new(transformer: T) -> Self {
        Self { transformer }
    }

    pub fn boxed(transformer: T) -> Box<dyn AnyContextTransformer> {
        Box::new(Self::new(transformer))
    }
}

impl<T: ContextTransformer> fmt::Debug for ContextTransformerBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.transformer.fmt(f)
    }
}

impl<T: ContextTransformer> AnyContextTransformer for ContextTransformerBox<T> {
    fn transform(&self, context: &AnyContext) -> Result<AnyContext, RoutingError> {
        let description = format!("{:?}", self.transformer);
        let source = context.value::<T::Source>(&description)?;
        let target = self.transformer.transform(source)?;
        tracing::trace!(
            transformer = %description,
            from = context.type_name(),
            to = type_name::<T::Target>(),
            "Transformed context"
        );
        Ok(AnyContext::new(target))
    }
}

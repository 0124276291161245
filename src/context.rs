//! Opaque Context
//!
//! Contexts travel through the composition pipeline without a static type. Every
//! factory, task and transformer declares the exact type it needs and re-establishes
//! it through [`AnyContext::value`], the single boundary where a downcast happens.

use crate::error::RoutingError;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

pub mod transformer;

pub use transformer::{
    AnyContextTransformer, ContextTransformer, ContextTransformerBox, IdentityTransformer,
};

/// A type-erased, immutable context value.
///
/// Cloning shares the underlying value; nothing in the pipeline mutates it.
/// Transformers derive new contexts instead.
#[derive(Clone)]
pub struct AnyContext {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
    description: Arc<str>,
}

impl AnyContext {
    /// Wrap a concrete value
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Send + Sync + fmt::Debug,
    {
        let description: Arc<str> = format!("{:?}", value).into();
        Self {
            value: Arc::new(value),
            type_name: type_name::<T>(),
            description,
        }
    }

    /// The "no context" value, carrying `()`
    pub fn empty() -> Self {
        Self::new(())
    }

    /// Static type name of the wrapped value
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// `Debug` rendering of the wrapped value, captured at construction
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the wrapped value is exactly a `T`
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Borrow the wrapped value as a `T`, if that is its type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Borrow the wrapped value as a `T` on behalf of `consumer`.
    ///
    /// Fails with [`RoutingError::ContextTypeMismatch`] naming both the consumer and
    /// the supplied context.
    pub fn value<T: Any>(&self, consumer: &str) -> Result<&T, RoutingError> {
        self.downcast_ref::<T>()
            .ok_or_else(|| RoutingError::ContextTypeMismatch {
                factory: consumer.to_string(),
                expected: type_name::<T>(),
                found: self.type_name,
                context: self.description.to_string(),
            })
    }
}

impl Default for AnyContext {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for AnyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyContext<{}>({})", self.type_name, self.description)
    }
}

impl fmt::Display for AnyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

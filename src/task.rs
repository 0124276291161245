//! Context Tasks
//!
//! Side effects applied to a freshly built unit before it is embedded: wiring a
//! delegate, assigning a title from the context, registering for analytics.

use crate::context::AnyContext;
use crate::error::RoutingError;
use crate::unit::BoxedUnit;
use std::any::{type_name, Any};
use std::fmt;
use tracing::trace;

/// Strongly typed post-build hook.
pub trait ContextTask: Clone + fmt::Debug + 'static {
    type Unit: Any;
    type Context: Any;

    /// Produce the version of this task to run later, e.g. with lazy bindings resolved.
    ///
    /// The receiver is left untouched so a failed preparation keeps the original.
    fn prepare(&self, _context: &Self::Context) -> Result<Self, RoutingError> {
        Ok(self.clone())
    }

    fn perform(&self, unit: &mut Self::Unit, context: &Self::Context) -> Result<(), RoutingError>;
}

/// Type-erased context task
pub trait AnyContextTask: fmt::Debug {
    fn prepare(&self, context: &AnyContext) -> Result<Box<dyn AnyContextTask>, RoutingError>;

    fn perform(&self, unit: &mut BoxedUnit, context: &AnyContext) -> Result<(), RoutingError>;
}

/// Erases a [`ContextTask`], downcasting context and unit on every call.
#[derive(Clone)]
pub struct ContextTaskBox<T: ContextTask> {
    task: T,
}

impl<T: ContextTask> ContextTaskBox<T> {
    pub fn new(task: T) -> Self {
        Self { task }
    }

    pub fn boxed(task: T) -> Box<dyn AnyContextTask> {
        Box::new(Self::new(task))
    }

    pub fn task(&self) -> &T {
        &self.task
    }
}

impl<T: ContextTask> fmt::Debug for ContextTaskBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.task.fmt(f)
    }
}

impl<T: ContextTask> AnyContextTask for ContextTaskBox<T> {
    fn prepare(&self, context: &AnyContext) -> Result<Box<dyn AnyContextTask>, RoutingError> {
        let description = format!("{:?}", self.task);
        let typed = context.value::<T::Context>(&description)?;
        let prepared = self.task.prepare(typed)?;
        trace!(task = %description, "Prepared context task");
        Ok(Self::boxed(prepared))
    }

    fn perform(&self, unit: &mut BoxedUnit, context: &AnyContext) -> Result<(), RoutingError> {
        let description = format!("{:?}", self.task);
        let typed = context.value::<T::Context>(&description)?;
        let found = unit.type_name();
        let typed_unit =
            unit.downcast_mut::<T::Unit>()
                .ok_or_else(|| RoutingError::UnitTypeMismatch {
                    task: description.clone(),
                    expected: type_name::<T::Unit>(),
                    unit: found.to_string(),
                })?;
        trace!(task = %description, "Performing context task");
        self.task.perform(typed_unit, typed)
    }
}

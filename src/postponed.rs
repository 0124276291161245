//! Postponed Integration
//!
//! A [`PostponedIntegrationFactory`] defers everything about one factory until the
//! build pass reaches it: deriving its context, preparing and running its context
//! tasks, building the unit, and embedding it. Splitting `prepare` from `build`
//! lets the whole tree be validated before any unit exists.

use crate::action::ChildList;
use crate::context::{AnyContext, AnyContextTransformer, IdentityTransformer};
use crate::error::RoutingError;
use crate::factory::AnyFactory;
use crate::task::AnyContextTask;
use std::fmt;
use tracing::{debug, trace};

/// Lifecycle of a postponed factory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationState {
    Unprepared,
    Prepared,
    /// Terminal. Entered when `build` starts, whether or not it succeeds.
    Built,
}

/// One factory together with its context tasks and context transformer.
pub struct PostponedIntegrationFactory {
    factory: Box<dyn AnyFactory>,
    tasks: Vec<Box<dyn AnyContextTask>>,
    transformer: Box<dyn AnyContextTransformer>,
    state: IntegrationState,
}

impl PostponedIntegrationFactory {
    /// Wrap `factory` with no tasks and the identity transformer
    pub fn new(factory: Box<dyn AnyFactory>) -> Self {
        Self::with_tasks(factory, Vec::new(), None)
    }

    pub fn with_tasks(
        factory: Box<dyn AnyFactory>,
        tasks: Vec<Box<dyn AnyContextTask>>,
        transformer: Option<Box<dyn AnyContextTransformer>>,
    ) -> Self {
        Self {
            factory,
            tasks,
            transformer: transformer.unwrap_or_else(|| Box::new(IdentityTransformer)),
            state: IntegrationState::Unprepared,
        }
    }

    /// Append a context task. Rejected once the factory has been built.
    pub fn add(&mut self, task: Box<dyn AnyContextTask>) -> Result<(), RoutingError> {
        if self.state == IntegrationState::Built {
            return Err(RoutingError::AlreadyBuilt(self.description()));
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Replace the context transformer. Rejected once the factory has been built.
    pub fn set_transformer(
        &mut self,
        transformer: Box<dyn AnyContextTransformer>,
    ) -> Result<(), RoutingError> {
        if self.state == IntegrationState::Built {
            return Err(RoutingError::AlreadyBuilt(self.description()));
        }
        self.transformer = transformer;
        Ok(())
    }

    pub fn state(&self) -> IntegrationState {
        self.state
    }

    pub fn is_prepared(&self) -> bool {
        self.state == IntegrationState::Prepared
    }

    pub fn factory(&self) -> &dyn AnyFactory {
        self.factory.as_ref()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn tasks(&self) -> &[Box<dyn AnyContextTask>] {
        &self.tasks
    }

    pub fn description(&self) -> String {
        self.factory.description()
    }

    /// Derive the factory's context and prepare the factory and every task with it.
    ///
    /// Tasks are prepared in order and the task list is replaced by their prepared
    /// versions. On the first failure the remaining tasks keep their previous
    /// versions and the error is returned unchanged.
    pub fn prepare(&mut self, context: &AnyContext) -> Result<(), RoutingError> {
        match self.state {
            IntegrationState::Unprepared => {}
            IntegrationState::Prepared => {
                return Err(RoutingError::AlreadyPrepared(self.description()))
            }
            IntegrationState::Built => return Err(RoutingError::AlreadyBuilt(self.description())),
        }

        let context = self.transformer.transform(context)?;
        trace!(factory = %self.description(), context = %context, "Derived context for prepare");
        self.factory.prepare(&context)?;

        let mut pending = std::mem::take(&mut self.tasks).into_iter();
        let mut prepared = Vec::with_capacity(pending.len());
        while let Some(task) = pending.next() {
            match task.prepare(&context) {
                Ok(replacement) => prepared.push(replacement),
                Err(err) => {
                    debug!(factory = %self.description(), task = ?task, error = %err, "Context task preparation failed");
                    prepared.push(task);
                    prepared.extend(pending);
                    self.tasks = prepared;
                    return Err(err);
                }
            }
        }
        self.tasks = prepared;
        self.state = IntegrationState::Prepared;
        Ok(())
    }

    /// Build the unit, run the tasks on it, and embed it into `children`.
    ///
    /// The context is derived again rather than reused from `prepare`. Can only be
    /// called once: any later call fails with [`RoutingError::AlreadyBuilt`].
    pub fn build(
        &mut self,
        context: &AnyContext,
        children: &mut ChildList,
    ) -> Result<(), RoutingError> {
        if self.state == IntegrationState::Built {
            return Err(RoutingError::AlreadyBuilt(self.description()));
        }
        self.state = IntegrationState::Built;

        let context = self.transformer.transform(context)?;
        let mut unit = self.factory.build(&context)?;
        for task in &self.tasks {
            task.perform(&mut unit, &context)?;
        }
        debug!(factory = %self.description(), unit = unit.type_name(), "Embedding built unit");
        self.factory.action().perform_embedding(unit, children)
    }
}

impl fmt::Debug for PostponedIntegrationFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostponedIntegrationFactory")
            .field("factory", &self.factory)
            .field("tasks", &self.tasks)
            .field("transformer", &self.transformer)
            .field("state", &self.state)
            .finish()
    }
}

impl fmt::Display for PostponedIntegrationFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

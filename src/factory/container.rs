//! Erasure box for container factories and the coordinator that builds their children.

use super::{AnyFactory, Container};
use crate::action::{AnyAction, ChildList};
use crate::context::AnyContext;
use crate::error::RoutingError;
use crate::postponed::{IntegrationState, PostponedIntegrationFactory};
use crate::unit::BoxedUnit;
use std::fmt;
use tracing::{debug, instrument};

/// Builds the children a container claimed, in claim order, with the container's context.
///
/// Handed to [`Container::build`]. The children stay owned by the container box,
/// which builds any child the coordinator did not reach once the container returns.
pub struct ChildCoordinator<'a> {
    children: &'a mut [PostponedIntegrationFactory],
    context: &'a AnyContext,
    failure: &'a mut Option<RoutingError>,
}

impl<'a> ChildCoordinator<'a> {
    pub fn new(
        children: &'a mut [PostponedIntegrationFactory],
        context: &'a AnyContext,
        failure: &'a mut Option<RoutingError>,
    ) -> Self {
        Self {
            children,
            context,
            failure,
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Context the children are built with
    pub fn context(&self) -> &AnyContext {
        self.context
    }

    /// Build every child and embed it into `existing` using the child's own action.
    ///
    /// The first failing child aborts the whole build and its error is returned as is.
    /// The failure is also recorded for the container box, so a container cannot
    /// swallow it.
    pub fn build(self, existing: ChildList) -> Result<ChildList, RoutingError> {
        let Self {
            children,
            context,
            failure,
        } = self;
        let mut built = existing;
        for child in children.iter_mut() {
            if let Err(err) = child.build(context, &mut built) {
                *failure = Some(err.clone());
                return Err(err);
            }
        }
        Ok(built)
    }

    /// Build every child into a fresh list
    pub fn build_children(self) -> Result<ChildList, RoutingError> {
        self.build(ChildList::new())
    }
}

impl fmt::Debug for ChildCoordinator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildCoordinator")
            .field("children", &self.children)
            .field("context", &self.context)
            .finish()
    }
}

/// Owns one [`Container`], its embedding action, and the children it scraped.
pub struct ContainerFactoryBox<F: Container> {
    factory: F,
    action: Box<dyn AnyAction>,
    children: Vec<PostponedIntegrationFactory>,
    scraped: bool,
}

impl<F: Container> ContainerFactoryBox<F> {
    pub fn new(factory: F, action: impl AnyAction + 'static) -> Self {
        Self {
            factory,
            action: Box::new(action),
            children: Vec::new(),
            scraped: false,
        }
    }

    pub fn boxed(factory: F, action: impl AnyAction + 'static) -> Box<dyn AnyFactory> {
        Box::new(Self::new(factory, action))
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Claimed children, in claim order
    pub fn children(&self) -> &[PostponedIntegrationFactory] {
        &self.children
    }

    /// Mutable access to claimed children, e.g. to attach context tasks
    pub fn children_mut(&mut self) -> &mut [PostponedIntegrationFactory] {
        &mut self.children
    }
}

impl<F: Container> fmt::Debug for ContainerFactoryBox<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.factory, f)
    }
}

impl<F: Container> AnyFactory for ContainerFactoryBox<F> {
    fn action(&self) -> &dyn AnyAction {
        self.action.as_ref()
    }

    /// Prepares the container, then every claimed child that has not been prepared yet.
    fn prepare(&mut self, context: &AnyContext) -> Result<(), RoutingError> {
        let description = self.description();
        let typed = context.value::<F::Context>(&description)?;
        debug!(container = %description, children = self.children.len(), "Preparing container");
        self.factory.prepare(typed)?;
        for child in self.children.iter_mut().filter(|c| !c.is_prepared()) {
            child.prepare(context)?;
        }
        Ok(())
    }

    /// Builds the container's unit, then forces every claimed child the container
    /// left unbuilt.
    ///
    /// A child failure wins over the container's own result, even when the container
    /// discarded it. Children forced here were never embedded, which fails with
    /// [`RoutingError::ChildrenNotEmbedded`].
    fn build(&mut self, context: &AnyContext) -> Result<BoxedUnit, RoutingError> {
        let description = self.description();
        let typed = context.value::<F::Context>(&description)?;
        debug!(container = %description, children = self.children.len(), "Building container");

        let mut failure = None;
        let coordinator = ChildCoordinator::new(&mut self.children, context, &mut failure);
        let unit = self.factory.build(typed, coordinator);
        if let Some(err) = failure {
            return Err(err);
        }
        let unit = unit?;

        let mut orphans = ChildList::new();
        let mut pending = 0;
        for child in self
            .children
            .iter_mut()
            .filter(|c| c.state() != IntegrationState::Built)
        {
            child.build(context, &mut orphans)?;
            pending += 1;
        }
        if pending > 0 {
            debug!(container = %description, pending, "Container left claimed children unembedded");
            return Err(RoutingError::ChildrenNotEmbedded {
                container: description,
                pending,
            });
        }
        Ok(BoxedUnit::new(unit))
    }

    /// Stable partition of `candidates` by embeddability.
    ///
    /// Embeddable candidates are claimed as children. Everything else is returned
    /// in its original relative order. Can only be done once per container.
    #[instrument(skip_all, fields(container = %self.description()))]
    fn scrape_children(
        &mut self,
        candidates: Vec<Box<dyn AnyFactory>>,
    ) -> Result<Vec<Box<dyn AnyFactory>>, RoutingError> {
        if self.scraped {
            return Err(RoutingError::ChildrenAlreadyScraped(self.description()));
        }
        self.scraped = true;

        let (claimed, remainder): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|candidate| candidate.action().embeddable());

        self.children = claimed
            .into_iter()
            .map(PostponedIntegrationFactory::new)
            .collect();

        debug!(
            claimed = self.children.len(),
            remaining = remainder.len(),
            "Scraped children"
        );
        Ok(remainder)
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn is_container(&self) -> bool {
        true
    }
}

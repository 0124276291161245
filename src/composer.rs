//! Composition pass
//!
//! Drives the core in one sequential pass over an ordered list of factories, from
//! the outermost unit to the destination:
//!
//! 1. Scrape: walking backwards, every factory is offered the factories that follow
//!    it. Containers claim the embeddable ones as children; whatever is left stays
//!    at the top level.
//! 2. Prepare: every top-level wrapper (and transitively every claimed child) derives
//!    its context and prepares, so a mismatch anywhere fails before anything is built.
//! 3. Build: every top-level wrapper builds depth-first into one list of units.
//!
//! Deciding which factories belong to a route is the router's job and not done here.

use crate::action::ChildList;
use crate::config::CompositionConfig;
use crate::context::AnyContext;
use crate::error::RoutingError;
use crate::factory::AnyFactory;
use crate::postponed::PostponedIntegrationFactory;
use tracing::{debug, info, instrument};

/// Assembles factories into a [`Composition`].
#[derive(Debug, Clone, Default)]
pub struct Composer {
    config: CompositionConfig,
}

impl Composer {
    pub fn new(config: CompositionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    /// Scrape `factories` (outermost first) into top-level postponed wrappers.
    ///
    /// Only factories reporting [`AnyFactory::is_container`] are offered the factories
    /// that follow them.
    #[instrument(skip_all, fields(steps = factories.len()))]
    pub fn compose(&self, factories: Vec<Box<dyn AnyFactory>>) -> Result<Composition, RoutingError> {
        // Factories following the current one, last factory first
        let mut stack: Vec<Box<dyn AnyFactory>> = Vec::with_capacity(factories.len());
        for mut factory in factories.into_iter().rev() {
            if factory.is_container() {
                let following: Vec<_> = stack.drain(..).rev().collect();
                stack = factory.scrape_children(following)?;
                stack.reverse();
            }
            stack.push(factory);
        }
        stack.reverse();
        let top_level = stack;

        if let Some(max) = self.config.max_top_level {
            if top_level.len() > max {
                return Err(RoutingError::CompositionFailed(format!(
                    "{} top-level units remain after scraping, at most {} allowed",
                    top_level.len(),
                    max
                )));
            }
        }

        debug!(top_level = top_level.len(), "Composed factories");
        Ok(Composition {
            wrappers: top_level
                .into_iter()
                .map(PostponedIntegrationFactory::new)
                .collect(),
            prepare_before_build: self.config.prepare_before_build,
        })
    }
}

/// Top-level postponed wrappers ready to be prepared and built.
#[derive(Debug)]
pub struct Composition {
    wrappers: Vec<PostponedIntegrationFactory>,
    prepare_before_build: bool,
}

impl Composition {
    /// Build a composition from wrappers the caller assembled itself
    pub fn from_wrappers(wrappers: Vec<PostponedIntegrationFactory>) -> Self {
        Self {
            wrappers,
            prepare_before_build: true,
        }
    }

    pub fn len(&self) -> usize {
        self.wrappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }

    pub fn wrappers(&self) -> &[PostponedIntegrationFactory] {
        &self.wrappers
    }

    /// Top-level wrappers, e.g. to attach context tasks or transformers before preparing
    pub fn wrappers_mut(&mut self) -> &mut [PostponedIntegrationFactory] {
        &mut self.wrappers
    }

    pub fn wrapper_mut(&mut self, index: usize) -> Option<&mut PostponedIntegrationFactory> {
        self.wrappers.get_mut(index)
    }

    /// Prepare every top-level wrapper in order; the first failure aborts.
    #[instrument(skip_all, fields(top_level = self.wrappers.len()))]
    pub fn prepare(&mut self, context: &AnyContext) -> Result<(), RoutingError> {
        for wrapper in &mut self.wrappers {
            wrapper.prepare(context)?;
        }
        Ok(())
    }

    /// Build every top-level wrapper into one list; the first failure aborts.
    #[instrument(skip_all, fields(top_level = self.wrappers.len()))]
    pub fn build(&mut self, context: &AnyContext) -> Result<ChildList, RoutingError> {
        let mut units = ChildList::new();
        for wrapper in &mut self.wrappers {
            wrapper.build(context, &mut units)?;
        }
        info!(units = units.len(), "Built composition");
        Ok(units)
    }

    /// Prepare (unless disabled in configuration) and build.
    pub fn run(mut self, context: &AnyContext) -> Result<ChildList, RoutingError> {
        if self.prepare_before_build {
            self.prepare(context)?;
        }
        self.build(context)
    }
}

//! Factories
//!
//! Factories are the strongly typed builders users write. Each declares the exact
//! context type it accepts and the unit type it produces. The router never sees
//! these types directly: factories are wrapped into boxes implementing
//! [`AnyFactory`], which re-establish the static context type on every call.

use crate::error::RoutingError;
use crate::unit::Unit;
use std::any::Any;
use std::fmt;

pub mod any;
pub mod boxed;
pub mod container;

pub use any::AnyFactory;
pub use boxed::FactoryBox;
pub use container::{ChildCoordinator, ContainerFactoryBox};

/// A builder producing one standalone or embeddable unit from one context value.
///
/// The `Debug` representation is used as the factory's description in errors and logs.
pub trait Factory: fmt::Debug + 'static {
    /// Context type this factory accepts
    type Context: Any;
    /// Unit type this factory produces
    type Unit: Unit;

    /// Resolve anything the factory needs from the context before any unit is built.
    ///
    /// May be called more than once; implementations must tolerate that.
    fn prepare(&mut self, _context: &Self::Context) -> Result<(), RoutingError> {
        Ok(())
    }

    fn build(&self, context: &Self::Context) -> Result<Self::Unit, RoutingError>;
}

/// A factory whose unit hosts other units.
///
/// The coordinator handed to [`Container::build`] holds the children claimed while
/// scraping. A container builds its own unit, then calls
/// [`ChildCoordinator::build_children`] and attaches the result. Children the
/// container leaves unbuilt are still built by its box, and the build fails.
pub trait Container: fmt::Debug + 'static {
    type Context: Any;
    type Unit: Unit;

    fn prepare(&mut self, _context: &Self::Context) -> Result<(), RoutingError> {
        Ok(())
    }

    fn build(
        &self,
        context: &Self::Context,
        coordinator: ChildCoordinator<'_>,
    ) -> Result<Self::Unit, RoutingError>;
}

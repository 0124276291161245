//! Trellis: type-safe composition of screen units
//!
//! Strongly typed factories are boxed into a uniform, type-erased [`AnyFactory`]
//! interface so a router can order and compose an arbitrary mix of them. Container
//! factories claim embeddable factories as children, and every factory is
//! integrated through a [`PostponedIntegrationFactory`] that derives its context,
//! runs its context tasks and embeds the built unit only when the build pass
//! reaches it. The static context type of each factory is re-established at every
//! boundary crossing.
//!
//! ```
//! use trellis::action::{AppendChild, Standalone};
//! use trellis::composer::Composer;
//! use trellis::context::AnyContext;
//! use trellis::error::RoutingError;
//! use trellis::factory::{ChildCoordinator, Container, ContainerFactoryBox, Factory, FactoryBox};
//!
//! #[derive(Debug)]
//! struct Tabs(Vec<String>);
//!
//! #[derive(Debug)]
//! struct TabsFactory;
//!
//! impl Container for TabsFactory {
//!     type Context = String;
//!     type Unit = Tabs;
//!
//!     fn build(&self, _: &String, coordinator: ChildCoordinator) -> Result<Tabs, RoutingError> {
//!         let tabs = coordinator.build_children()?;
//!         Ok(Tabs(tabs.iter().filter_map(|t| t.downcast_ref::<String>().cloned()).collect()))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct Page(&'static str);
//!
//! impl Factory for Page {
//!     type Context = String;
//!     type Unit = String;
//!
//!     fn build(&self, user: &String) -> Result<String, RoutingError> {
//!         Ok(format!("{} for {}", self.0, user))
//!     }
//! }
//!
//! let composition = Composer::default().compose(vec![
//!     ContainerFactoryBox::boxed(TabsFactory, Standalone),
//!     FactoryBox::boxed(Page("inbox"), AppendChild),
//!     FactoryBox::boxed(Page("profile"), AppendChild),
//! ])?;
//! let units = composition.run(&AnyContext::new(String::from("ada")))?;
//! let tabs = units.downcast_ref::<Tabs>(0).unwrap();
//! assert_eq!(tabs.0, vec!["inbox for ada", "profile for ada"]);
//! # Ok::<(), RoutingError>(())
//! ```

pub mod action;
pub mod composer;
pub mod config;
pub mod context;
pub mod error;
pub mod factory;
pub mod logging;
pub mod postponed;
pub mod task;
pub mod unit;

pub use action::{AnyAction, ChildList};
pub use composer::{Composer, Composition};
pub use context::AnyContext;
pub use error::{ConfigError, RoutingError};
pub use factory::{AnyFactory, Container, ContainerFactoryBox, Factory, FactoryBox};
pub use postponed::{IntegrationState, PostponedIntegrationFactory};
pub use task::{AnyContextTask, ContextTask, ContextTaskBox};
pub use unit::BoxedUnit;

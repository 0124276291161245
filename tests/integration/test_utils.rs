//! Shared fixtures for integration tests
//!
//! Factories and tasks here record every call into a shared [`Log`] so tests can
//! assert on the exact order of prepare, build and perform steps.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Mutex;
use trellis::action::AnyAction;
use trellis::error::RoutingError;
use trellis::factory::{
    AnyFactory, ChildCoordinator, Container, ContainerFactoryBox, Factory, FactoryBox,
};
use trellis::task::ContextTask;
use trellis::AnyContext;

/// Serializes tests that touch process environment variables
pub static ENV_MUTEX: Mutex<()> = Mutex::new(());

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

/// Context every fixture factory declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: String,
}

pub fn session(user: &str) -> AnyContext {
    AnyContext::new(Session {
        user: user.to_string(),
    })
}

/// Unit produced by fixture factories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    pub name: String,
    pub user: String,
    pub children: Vec<String>,
    pub tags: Vec<String>,
}

pub struct ScreenFactory {
    pub name: &'static str,
    pub log: Log,
    pub fail_build: bool,
}

impl ScreenFactory {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            fail_build: false,
        }
    }

    pub fn failing(name: &'static str, log: &Log) -> Self {
        Self {
            fail_build: true,
            ..Self::new(name, log)
        }
    }
}

impl fmt::Debug for ScreenFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScreenFactory({})", self.name)
    }
}

impl Factory for ScreenFactory {
    type Context = Session;
    type Unit = Screen;

    fn prepare(&mut self, _context: &Session) -> Result<(), RoutingError> {
        self.log.borrow_mut().push(format!("prepare {}", self.name));
        Ok(())
    }

    fn build(&self, context: &Session) -> Result<Screen, RoutingError> {
        self.log.borrow_mut().push(format!("build {}", self.name));
        if self.fail_build {
            return Err(RoutingError::message(format!("{} failed to build", self.name)));
        }
        Ok(Screen {
            name: self.name.to_string(),
            user: context.user.clone(),
            ..Screen::default()
        })
    }
}

/// Container collecting the names of its built children
pub struct StackFactory {
    pub name: &'static str,
    pub log: Log,
}

impl StackFactory {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
        }
    }
}

impl fmt::Debug for StackFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StackFactory({})", self.name)
    }
}

impl Container for StackFactory {
    type Context = Session;
    type Unit = Screen;

    fn prepare(&mut self, _context: &Session) -> Result<(), RoutingError> {
        self.log.borrow_mut().push(format!("prepare {}", self.name));
        Ok(())
    }

    fn build(
        &self,
        context: &Session,
        coordinator: ChildCoordinator,
    ) -> Result<Screen, RoutingError> {
        self.log.borrow_mut().push(format!("build {}", self.name));
        let mut screen = Screen {
            name: self.name.to_string(),
            user: context.user.clone(),
            ..Screen::default()
        };
        for child in coordinator.build_children()? {
            let child = child
                .downcast::<Screen>()
                .map_err(|unit| RoutingError::message(format!("unexpected child {:?}", unit)))?;
            self.log
                .borrow_mut()
                .push(format!("embed {} into {}", child.name, self.name));
            screen.children.push(child.name);
        }
        Ok(screen)
    }
}

pub fn leaf(name: &'static str, log: &Log, action: impl AnyAction + 'static) -> Box<dyn AnyFactory> {
    FactoryBox::boxed(ScreenFactory::new(name, log), action)
}

pub fn stack(name: &'static str, log: &Log, action: impl AnyAction + 'static) -> Box<dyn AnyFactory> {
    ContainerFactoryBox::boxed(StackFactory::new(name, log), action)
}

/// Context task appending a tag to the built screen
#[derive(Clone)]
pub struct TagTask {
    pub name: &'static str,
    pub log: Log,
    pub fail_prepare: bool,
    pub fail_perform: bool,
    pub resolved_user: Option<String>,
}

impl TagTask {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            fail_prepare: false,
            fail_perform: false,
            resolved_user: None,
        }
    }
}

impl fmt::Debug for TagTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagTask({}, resolved: {:?})", self.name, self.resolved_user)
    }
}

impl ContextTask for TagTask {
    type Unit = Screen;
    type Context = Session;

    fn prepare(&self, context: &Session) -> Result<Self, RoutingError> {
        self.log.borrow_mut().push(format!("prepare {}", self.name));
        if self.fail_prepare {
            return Err(RoutingError::message(format!("{} failed to prepare", self.name)));
        }
        Ok(Self {
            resolved_user: Some(context.user.clone()),
            ..self.clone()
        })
    }

    fn perform(&self, unit: &mut Screen, _context: &Session) -> Result<(), RoutingError> {
        self.log.borrow_mut().push(format!("perform {}", self.name));
        if self.fail_perform {
            return Err(RoutingError::message(format!("{} failed to perform", self.name)));
        }
        let user = self.resolved_user.clone().unwrap_or_default();
        unit.tags.push(format!("{}:{}", self.name, user));
        Ok(())
    }
}

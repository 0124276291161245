//! Built units
//!
//! A unit is whatever a factory produces: a screen, a container holding other
//! screens, or a test double. Once built it leaves the typed world and travels as a
//! [`BoxedUnit`] until a task or a container downcasts it back.

use std::any::{type_name, Any};
use std::fmt;

/// Marker for anything a factory can produce.
///
/// Implemented for every `'static` type with a `Debug` representation.
pub trait Unit: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn unit_type_name(&self) -> &'static str;
}

impl<T: Any + fmt::Debug> Unit for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn unit_type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// Type-erased unit
pub struct BoxedUnit {
    // Trait methods must be called through `*inner`: `Box<dyn Unit>` is itself a `Unit`.
    inner: Box<dyn Unit>,
}

impl BoxedUnit {
    pub fn new<T: Unit>(unit: T) -> Self {
        Self {
            inner: Box::new(unit),
        }
    }

    /// Static type name of the wrapped unit
    pub fn type_name(&self) -> &'static str {
        (*self.inner).unit_type_name()
    }

    pub fn is<T: Any>(&self) -> bool {
        (*self.inner).as_any().is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.inner).as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        (*self.inner).as_any_mut().downcast_mut::<T>()
    }

    /// Recover the concrete unit, handing the box back on mismatch
    pub fn downcast<T: Any>(self) -> Result<T, BoxedUnit> {
        if !self.is::<T>() {
            return Err(self);
        }
        match self.inner.into_any().downcast::<T>() {
            Ok(typed) => Ok(*typed),
            Err(_) => unreachable!("unit type checked before downcast"),
        }
    }
}

impl fmt::Debug for BoxedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

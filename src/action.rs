//! Embedding Actions
//!
//! An action describes how a built unit attaches to its parent: either as a child
//! embedded into a container's child list, or as a standalone unit the router
//! presents on its own. Containers only claim factories whose action is embeddable.

use crate::error::RoutingError;
use crate::unit::BoxedUnit;
use std::any::Any;
use std::fmt;

/// Ordered list of built units a container (or the router) is assembling.
#[derive(Debug, Default)]
pub struct ChildList {
    units: Vec<BoxedUnit>,
}

impl ChildList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, unit: BoxedUnit) {
        self.units.push(unit);
    }

    /// Insert at `index`, appending when the index is past the end
    pub fn insert(&mut self, index: usize, unit: BoxedUnit) {
        let index = index.min(self.units.len());
        self.units.insert(index, unit);
    }

    pub fn clear(&mut self) {
        self.units.clear();
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BoxedUnit> {
        self.units.get(index)
    }

    /// Borrow the unit at `index` as a `T`
    pub fn downcast_ref<T: Any>(&self, index: usize) -> Option<&T> {
        self.units.get(index).and_then(|unit| unit.downcast_ref::<T>())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BoxedUnit> {
        self.units.iter()
    }

    pub fn into_vec(self) -> Vec<BoxedUnit> {
        self.units
    }
}

impl From<Vec<BoxedUnit>> for ChildList {
    fn from(units: Vec<BoxedUnit>) -> Self {
        Self { units }
    }
}

impl IntoIterator for ChildList {
    type Item = BoxedUnit;
    type IntoIter = std::vec::IntoIter<BoxedUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChildList {
    type Item = &'a BoxedUnit;
    type IntoIter = std::slice::Iter<'a, BoxedUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

/// Embedding action contract consumed by factory boxes and containers.
pub trait AnyAction: fmt::Debug {
    /// Whether a container may claim the owning factory as a child
    fn embeddable(&self) -> bool;

    /// Attach `unit` to `children`. Appends by default.
    fn perform_embedding(
        &self,
        unit: BoxedUnit,
        children: &mut ChildList,
    ) -> Result<(), RoutingError> {
        children.push(unit);
        Ok(())
    }
}

/// Embeddable; appends the unit after the existing children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendChild;

impl AnyAction for AppendChild {
    fn embeddable(&self) -> bool {
        true
    }
}

/// Embeddable; inserts the unit at a fixed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertChild {
    pub index: usize,
}

impl InsertChild {
    pub fn at(index: usize) -> Self {
        Self { index }
    }
}

impl AnyAction for InsertChild {
    fn embeddable(&self) -> bool {
        true
    }

    fn perform_embedding(
        &self,
        unit: BoxedUnit,
        children: &mut ChildList,
    ) -> Result<(), RoutingError> {
        children.insert(self.index, unit);
        Ok(())
    }
}

/// Embeddable; the unit becomes the only child.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceChildren;

impl AnyAction for ReplaceChildren {
    fn embeddable(&self) -> bool {
        true
    }

    fn perform_embedding(
        &self,
        unit: BoxedUnit,
        children: &mut ChildList,
    ) -> Result<(), RoutingError> {
        children.clear();
        children.push(unit);
        Ok(())
    }
}

/// Not embeddable: the unit is presented on its own by the router.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Standalone;

impl AnyAction for Standalone {
    fn embeddable(&self) -> bool {
        false
    }
}

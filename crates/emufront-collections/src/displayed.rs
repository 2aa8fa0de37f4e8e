//! The ordered list of systems shown to the user

use emufront_catalog::SystemId;
use std::cmp::Ordering;
use std::fmt;

/// A displayed system: real, or one of the manager's collections
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SystemRef {
    Real(SystemId),
    Auto(String),
    Custom(String),
    Bundle,
}

impl SystemRef {
    pub fn is_collection(&self) -> bool {
        !matches!(self, SystemRef::Real(_))
    }
}

impl fmt::Display for SystemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemRef::Real(id) => write!(f, "{}", id),
            SystemRef::Auto(name) => write!(f, "auto:{}", name),
            SystemRef::Custom(name) => write!(f, "custom:{}", name),
            SystemRef::Bundle => write!(f, "bundle"),
        }
    }
}

/// Ordered registry of displayed systems.
///
/// Only the manager holds it mutably; everyone else reads a slice.
#[derive(Debug, Clone, Default)]
pub struct DisplayedSystems {
    systems: Vec<SystemRef>,
}

impl DisplayedSystems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[SystemRef] {
        &self.systems
    }

    pub fn iter(&self) -> impl Iterator<Item = &SystemRef> {
        self.systems.iter()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn contains(&self, system: &SystemRef) -> bool {
        self.systems.contains(system)
    }

    pub(crate) fn push(&mut self, system: SystemRef) {
        if !self.contains(&system) {
            self.systems.push(system);
        }
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&SystemRef) -> bool) {
        self.systems.retain(keep);
    }

    pub(crate) fn sort_by(&mut self, compare: impl FnMut(&SystemRef, &SystemRef) -> Ordering) {
        self.systems.sort_by(compare);
    }

    /// Move the first system matching `pred` to the end
    pub(crate) fn move_to_end(&mut self, pred: impl Fn(&SystemRef) -> bool) -> bool {
        match self.systems.iter().position(pred) {
            Some(pos) => {
                let system = self.systems.remove(pos);
                self.systems.push(system);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_operations() {
        let mut displayed = DisplayedSystems::new();
        displayed.push(SystemRef::Real(SystemId(0)));
        displayed.push(SystemRef::Auto("all".to_string()));
        displayed.push(SystemRef::Real(SystemId(1)));
        displayed.push(SystemRef::Real(SystemId(1)));
        assert_eq!(displayed.len(), 3);

        assert!(displayed.move_to_end(|s| *s == SystemRef::Real(SystemId(0))));
        assert_eq!(displayed.as_slice()[2], SystemRef::Real(SystemId(0)));

        displayed.retain(|s| !s.is_collection());
        assert_eq!(displayed.len(), 2);
        assert!(!displayed.move_to_end(|s| *s == SystemRef::Bundle));
    }

    #[test]
    fn test_display() {
        assert_eq!(SystemRef::Custom("mine".to_string()).to_string(), "custom:mine");
        assert_eq!(SystemRef::Real(SystemId(3)).to_string(), "system#3");
    }
}

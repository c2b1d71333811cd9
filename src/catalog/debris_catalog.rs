use crate::models::OrbitalElements;
use std::fmt;

/// Identity of a fragment: its zero-based data row in the source dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentId(pub usize);

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentRecord {
    pub id: FragmentId,
    pub name: String,
    pub elements: OrbitalElements,
    removed: bool,
}

impl FragmentRecord {
    pub fn new(id: FragmentId, name: impl Into<String>, elements: OrbitalElements) -> Self {
        Self {
            id,
            name: name.into(),
            elements,
            removed: false,
        }
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }
}

/// Fixed set of fragments with their removal flags.
///
/// Membership never changes after construction. Removal is one-way: a removed fragment never
/// re-enters the active set.
#[derive(Debug, Clone, Default)]
pub struct DebrisCatalog {
    fragments: Vec<FragmentRecord>,
    removed: usize,
}

impl DebrisCatalog {
    pub fn new(fragments: Vec<FragmentRecord>) -> Self {
        let removed = fragments.iter().filter(|f| f.removed).count();
        Self { fragments, removed }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FragmentRecord> {
        self.fragments.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FragmentRecord> {
        self.fragments.iter()
    }

    pub fn elements(&self) -> impl Iterator<Item = &OrbitalElements> {
        self.fragments.iter().map(|f| &f.elements)
    }

    /// Catalog positions and records of every fragment not yet removed.
    pub fn active(&self) -> impl Iterator<Item = (usize, &FragmentRecord)> {
        self.fragments
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.removed)
    }

    pub fn active_count(&self) -> usize {
        self.fragments.len() - self.removed
    }

    /// Flags the fragment at `index` as removed. Returns `false` if it was already removed or
    /// the index is out of range.
    pub(crate) fn mark_removed(&mut self, index: usize) -> bool {
        match self.fragments.get_mut(index) {
            Some(fragment) if !fragment.removed => {
                fragment.removed = true;
                self.removed += 1;
                true
            }
            _ => false,
        }
    }

    pub fn removed_count(&self) -> usize {
        self.removed
    }

    pub fn removed_fraction(&self) -> f64 {
        if self.fragments.is_empty() {
            return 0.0;
        }
        self.removed as f64 / self.fragments.len() as f64
    }
}

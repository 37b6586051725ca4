//! AvailableBackends - Capability Prober output

use std::collections::BTreeSet;

use crate::BackendId;

/// Immutable set of backends linked into the running binary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableBackends {
    ids: BTreeSet<BackendId>,
}

impl AvailableBackends {
    /// Empty set (no backend linked)
    pub fn none() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: BackendId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate in `BackendId` order
    pub fn iter(&self) -> impl Iterator<Item = BackendId> + '_ {
        self.ids.iter().copied()
    }

    /// Known backends missing from this build.
    ///
    /// The collection server uses this list to keep forwarding those backends
    /// server-side.
    pub fn missing(&self) -> Vec<BackendId> {
        BackendId::ALL
            .into_iter()
            .filter(|id| !self.contains(*id))
            .collect()
    }
}

impl FromIterator<BackendId> for AvailableBackends {
    fn from_iter<T: IntoIterator<Item = BackendId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

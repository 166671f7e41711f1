// ── Roster change detection ──
//
// The roster is the set of residents the views are indexed by. When it
// drifts, every per-resident subscriber has to be rebuilt, so the cycle
// stops before projection and reports the difference instead.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Resident, ResidentId};

/// The known residents, in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roster {
    residents: Vec<Resident>,
}

impl Roster {
    /// Build a roster, ordering residents by ordinal then id.
    pub fn new(mut residents: Vec<Resident>) -> Self {
        residents.sort_by(|a, b| a.ordinal.cmp(&b.ordinal).then_with(|| a.id.cmp(&b.id)));
        Self { residents }
    }

    pub fn residents(&self) -> &[Resident] {
        &self.residents
    }

    pub fn len(&self) -> usize {
        self.residents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residents.is_empty()
    }

    pub fn get(&self, id: &ResidentId) -> Option<&Resident> {
        self.residents.iter().find(|r| &r.id == id)
    }

    /// Resident names in roster order.
    pub fn names(&self) -> Vec<String> {
        self.residents.iter().map(|r| r.name.clone()).collect()
    }

    /// Occurrence count per id; equal maps mean equal membership and cardinality.
    fn id_counts(&self) -> BTreeMap<&ResidentId, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.residents {
            *counts.entry(&r.id).or_insert(0) += 1;
        }
        counts
    }
}

/// Which ids appeared or disappeared between two rosters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterDiff {
    pub added: Vec<ResidentId>,
    pub removed: Vec<ResidentId>,
}

/// Result of comparing the recorded roster against a fresh one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterCheck {
    /// No roster was recorded yet; the incoming one becomes the roster.
    Established,
    /// Same membership and cardinality; keep the recorded roster.
    Unchanged,
    /// Membership or cardinality differs; a rebuild is required.
    Changed(RosterDiff),
}

/// Compare `incoming` against the `previous` roster.
///
/// Only ids count: a renamed resident or a reordered list is not a
/// roster change.
pub fn detect(previous: Option<&Roster>, incoming: &Roster) -> RosterCheck {
    let Some(previous) = previous else {
        return RosterCheck::Established;
    };

    let before = previous.id_counts();
    let after = incoming.id_counts();
    if before == after {
        return RosterCheck::Unchanged;
    }

    let mut diff = RosterDiff::default();
    for (id, &n) in &after {
        for _ in before.get(id).copied().unwrap_or(0)..n {
            diff.added.push((*id).clone());
        }
    }
    for (id, &n) in &before {
        for _ in after.get(id).copied().unwrap_or(0)..n {
            diff.removed.push((*id).clone());
        }
    }
    RosterCheck::Changed(diff)
}

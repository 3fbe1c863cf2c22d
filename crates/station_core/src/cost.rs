//! Cost mappings and the scaling rules applied to them.
//!
//! Upgrades escalate by [`ESCALATION_FACTOR`] with an integer ceiling after
//! every purchase; research scales its base cost by the same factor raised
//! to the current level, without rounding.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resources::{Resource, ResourceLedger};

/// Growth factor applied to upgrade and research costs.
pub const ESCALATION_FACTOR: f64 = 1.5;

/// Amount of each resource required (or granted) by an action.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cost(BTreeMap<Resource, f64>);

impl Cost {
    /// Create an empty cost.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add or replace one entry.
    #[must_use]
    pub fn with(mut self, resource: Resource, amount: f64) -> Self {
        self.0.insert(resource, amount);
        self
    }

    /// Amount required of `resource` (0 when absent).
    #[must_use]
    pub fn get(&self, resource: Resource) -> f64 {
        self.0.get(&resource).copied().unwrap_or(0.0)
    }

    /// Iterate over entries in resource order.
    pub fn iter(&self) -> impl Iterator<Item = (Resource, f64)> + '_ {
        self.0.iter().map(|(r, a)| (*r, *a))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the cost has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Multiply every entry by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        self.iter().map(|(r, a)| (r, a * factor)).collect()
    }

    /// Base cost scaled for an item already at `level`.
    #[must_use]
    pub fn scaled_by_level(&self, level: u32) -> Self {
        self.scaled(ESCALATION_FACTOR.powf(f64::from(level)))
    }

    /// Next price after a purchase: each entry times 1.5, rounded up.
    #[must_use]
    pub fn escalated(&self) -> Self {
        self.iter()
            .map(|(r, a)| (r, (a * ESCALATION_FACTOR).ceil()))
            .collect()
    }
}

impl FromIterator<(Resource, f64)> for Cost {
    fn from_iter<I: IntoIterator<Item = (Resource, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(Resource, f64); N]> for Cost {
    fn from(entries: [(Resource, f64); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (resource, amount) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{amount} {resource}")?;
        }
        Ok(())
    }
}

/// Affordability check for a cost keyed by resource name.
///
/// Names the ledger does not know count as holding zero, so any positive
/// requirement on them is unaffordable.
#[must_use]
pub fn can_afford_named(ledger: &ResourceLedger, cost: &[(&str, f64)]) -> bool {
    cost.iter()
        .all(|(name, required)| ledger.amount_of_named(name) >= *required)
}

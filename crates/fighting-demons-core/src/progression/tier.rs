//! Threshold tables and the progression resolver.
//!
//! A [`TierTable`] is an ordered list of tiers keyed by the minimum
//! cumulative point total needed to hold them. Tables are validated once at
//! construction so every lookup afterwards is total over `u64`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ProgressionError;

/// One threshold-gated stage in a progression table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// Unique slug within its table
    pub id: String,
    pub display_name: String,
    /// Cumulative points needed to hold this tier
    pub min_points: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub description: String,
    /// Shown only when the tier is entered through a crossing, never on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_message: Option<String>,
}

impl Tier {
    pub fn new(id: &str, display_name: &str, min_points: u64, description: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            min_points,
            icon: None,
            description: description.to_string(),
            transition_message: None,
        }
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn with_transition_message(mut self, message: &str) -> Self {
        self.transition_message = Some(message.to_string());
        self
    }
}

/// Validated, immutable progression table.
///
/// Invariants:
/// - at least one tier
/// - the first tier starts at 0 points
/// - `min_points` strictly increases
/// - ids are unique
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierTable {
    name: String,
    tiers: Vec<Tier>,
}

impl TierTable {
    /// Build a table, rejecting anything that breaks the invariants above.
    ///
    /// # Errors
    /// Returns a [`ProgressionError`] describing the first violation found.
    pub fn new(name: impl Into<String>, tiers: Vec<Tier>) -> Result<Self, ProgressionError> {
        let name = name.into();
        let first = tiers.first().ok_or_else(|| ProgressionError::EmptyTable {
            table: name.clone(),
        })?;
        if first.min_points != 0 {
            return Err(ProgressionError::FirstTierNotZero {
                table: name,
                id: first.id.clone(),
                min_points: first.min_points,
            });
        }

        let mut seen = HashSet::new();
        for (i, tier) in tiers.iter().enumerate() {
            if !seen.insert(tier.id.as_str()) {
                return Err(ProgressionError::DuplicateId {
                    table: name,
                    id: tier.id.clone(),
                });
            }
            if i > 0 && tier.min_points <= tiers[i - 1].min_points {
                return Err(ProgressionError::NotAscending {
                    table: name,
                    id: tier.id.clone(),
                    min_points: tier.min_points,
                    previous: tiers[i - 1].min_points,
                });
            }
        }

        Ok(Self { name, tiers })
    }

    /// Built-in tables are checked by their unit tests instead of at runtime.
    pub(crate) fn builtin(name: &str, tiers: Vec<Tier>) -> Self {
        debug_assert!(Self::new(name, tiers.clone()).is_ok());
        Self {
            name: name.to_string(),
            tiers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Never true for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// The highest tier in the table.
    pub fn terminal(&self) -> &Tier {
        &self.tiers[self.tiers.len() - 1]
    }

    pub fn get(&self, id: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.id == id)
    }

    /// Position of a tier id in table order.
    pub fn rank_of(&self, id: &str) -> Option<usize> {
        self.tiers.iter().position(|t| t.id == id)
    }

    /// Position of the tier held at `total_points`.
    pub fn rank_for(&self, total_points: u64) -> usize {
        // first tier starts at 0, so at least one entry satisfies the predicate
        self.tiers
            .partition_point(|t| t.min_points <= total_points)
            .saturating_sub(1)
    }

    /// Highest tier whose `min_points <= total_points`.
    pub fn resolve(&self, total_points: u64) -> &Tier {
        &self.tiers[self.rank_for(total_points)]
    }

    /// Tier immediately above the one held at `total_points`, if any.
    pub fn next_after(&self, total_points: u64) -> Option<&Tier> {
        self.tiers.get(self.rank_for(total_points) + 1)
    }

    /// Points still needed to reach the next tier. `None` at the terminal tier.
    pub fn points_to_next(&self, total_points: u64) -> Option<u64> {
        self.next_after(total_points)
            .map(|next| next.min_points - total_points)
    }

    /// Percent of the way from the current tier to the next, in `[0, 100]`.
    ///
    /// Returns 100 only at the terminal tier. Below it the rounded value is
    /// capped at 99 so a full bar always means the tier is actually held.
    pub fn progress_percent(&self, total_points: u64) -> u8 {
        let current = self.resolve(total_points);
        let Some(next) = self.next_after(total_points) else {
            return 100;
        };

        let earned = u128::from(total_points - current.min_points);
        let span = u128::from(next.min_points - current.min_points);
        // round half up: (200n + d) / 2d
        let rounded = (200 * earned + span) / (2 * span);
        rounded.min(99) as u8
    }
}

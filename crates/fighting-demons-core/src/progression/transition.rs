//! Tier crossing detection between two point totals.

use serde::{Deserialize, Serialize};

use super::tier::{Tier, TierTable};

/// Result of comparing the tiers held at two totals.
///
/// A lump-sum award that skips intermediate tiers reports only the net
/// `from`/`to`; the skipped tiers are not listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTransition {
    pub crossed: bool,
    pub from: Tier,
    pub to: Tier,
}

impl TierTransition {
    /// True when the crossing moved up the table.
    pub fn is_promotion(&self) -> bool {
        self.crossed && self.to.min_points > self.from.min_points
    }

    /// Message to show for this crossing. Only promotions celebrate.
    pub fn celebration_message(&self) -> Option<&str> {
        if self.is_promotion() {
            self.to.transition_message.as_deref()
        } else {
            None
        }
    }
}

/// Resolve both totals and report whether the tier changed.
pub fn detect_transition(table: &TierTable, old_total: u64, new_total: u64) -> TierTransition {
    let from = table.resolve(old_total);
    let to = table.resolve(new_total);
    TierTransition {
        crossed: from.id != to.id,
        from: from.clone(),
        to: to.clone(),
    }
}

/// Everything the presentation layer renders for one progression axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisProgress {
    pub current: Tier,
    pub next: Option<Tier>,
    pub percent: u8,
    pub points_to_next: Option<u64>,
}

impl AxisProgress {
    pub fn resolve(table: &TierTable, total_points: u64) -> Self {
        Self {
            current: table.resolve(total_points).clone(),
            next: table.next_after(total_points).cloned(),
            percent: table.progress_percent(total_points),
            points_to_next: table.points_to_next(total_points),
        }
    }
}

/// Both axes for a single total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub total_points: u64,
    pub spirit_guide: AxisProgress,
    pub user_title: AxisProgress,
}

impl ProgressReport {
    pub fn for_total(tables: &super::ProgressionTables, total_points: u64) -> Self {
        Self {
            total_points,
            spirit_guide: AxisProgress::resolve(&tables.spirit_guide, total_points),
            user_title: AxisProgress::resolve(&tables.user_title, total_points),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::ProgressionTables;

    fn table() -> TierTable {
        TierTable::new(
            "guide",
            vec![
                Tier::new("ember", "Ember", 0, ""),
                Tier::new("shade", "Shade", 44, "").with_transition_message("I have form"),
                Tier::new("specter", "Specter", 100, ""),
            ],
        )
        .unwrap()
    }

    #[test]
    fn crossing_a_boundary() {
        let t = detect_transition(&table(), 40, 44);
        assert!(t.crossed);
        assert_eq!(t.from.id, "ember");
        assert_eq!(t.to.id, "shade");
        assert!(t.is_promotion());
        assert_eq!(t.celebration_message(), Some("I have form"));
    }

    #[test]
    fn staying_inside_a_tier() {
        let t = detect_transition(&table(), 44, 99);
        assert!(!t.crossed);
        assert_eq!(t.from.id, "shade");
        assert_eq!(t.to.id, "shade");
        assert!(t.celebration_message().is_none());
    }

    #[test]
    fn lump_sum_skips_intermediate_tiers() {
        let t = detect_transition(&table(), 10, 150);
        assert!(t.crossed);
        assert_eq!(t.from.id, "ember");
        assert_eq!(t.to.id, "specter");
    }

    #[test]
    fn backward_crossing_is_not_a_promotion() {
        let t = detect_transition(&table(), 120, 50);
        assert!(t.crossed);
        assert!(!t.is_promotion());
        assert!(t.celebration_message().is_none());
    }

    #[test]
    fn same_total_never_crosses() {
        for x in [0, 43, 44, 100, 9_999] {
            assert!(!detect_transition(&table(), x, x).crossed);
        }
    }

    #[test]
    fn report_covers_both_axes() {
        let report = ProgressReport::for_total(&ProgressionTables::default(), 20);
        assert_eq!(report.spirit_guide.current.id, "ember");
        assert_eq!(report.spirit_guide.percent, 45);
        assert_eq!(report.spirit_guide.points_to_next, Some(24));
        assert_eq!(report.user_title.current.id, "initiate");
        assert_eq!(report.user_title.percent, 40);
        assert_eq!(
            report.user_title.next.as_ref().map(|t| t.id.as_str()),
            Some("acolyte")
        );
    }
}

//! Comparison against the sequential baseline
//!
//! The baseline schedule puts every order in its own slot, so it uses as
//! many slots as there are orders and never has a conflict. The coloring is
//! judged by how many slots it saves relative to that.

use serde::{Deserialize, Serialize};

/// Precision of the reported reduction percentage
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    /// Nearest whole percent ("33%")
    #[default]
    Whole,
    /// Nearest hundredth of a percent ("33.33%")
    Hundredths,
}

/// Who wins when the coloring saves nothing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TiePolicy {
    /// Report no improvement
    #[default]
    Baseline,
    /// Credit the coloring
    Coloring,
}

/// Rounding and tie-break conventions for the comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionPolicy {
    /// Percentage precision
    pub rounding: Rounding,
    /// Winner on equal slot counts
    pub ties: TiePolicy,
}

impl ReductionPolicy {
    /// Slot reduction in percent, clamped to [0, 100] and rounded
    ///
    /// An empty baseline has no reduction. Rounding never reaches 0 while a
    /// slot was saved, nor 100 while a slot remains.
    pub fn reduction_pct(&self, baseline_slots: usize, achieved_slots: usize) -> f64 {
        if baseline_slots == 0 {
            return 0.0;
        }
        let saved = baseline_slots as f64 - achieved_slots as f64;
        let pct = (saved / baseline_slots as f64 * 100.0).clamp(0.0, 100.0);
        let scale = match self.rounding {
            Rounding::Whole => 1.0,
            Rounding::Hundredths => 100.0,
        };
        let mut units = (pct * scale).round();
        if pct > 0.0 && pct < 100.0 {
            units = units.clamp(1.0, 100.0 * scale - 1.0);
        }
        units / scale
    }

    /// Human-readable form of a reduction percentage, e.g. "50%"
    pub fn statement(&self, reduction_pct: f64) -> String {
        format!("{}%", reduction_pct)
    }

    /// Strategy credited for a given outcome
    pub fn winner(&self, baseline_slots: usize, achieved_slots: usize) -> Winner {
        match achieved_slots.cmp(&baseline_slots) {
            std::cmp::Ordering::Less => Winner::Coloring,
            std::cmp::Ordering::Equal => match self.ties {
                TiePolicy::Baseline => Winner::Baseline,
                TiePolicy::Coloring => Winner::Coloring,
            },
            std::cmp::Ordering::Greater => Winner::Baseline,
        }
    }
}

/// Strategy that produced the better schedule
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    /// One order per slot
    Baseline,
    /// Conflict-graph coloring
    Coloring,
}

/// Baseline versus coloring, side by side
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Slots used by the sequential baseline (= batch size)
    pub baseline_slots: usize,
    /// Conflicting pairs sharing a slot in the baseline (always 0)
    pub baseline_conflicts_remaining: usize,
    /// Slots used by the coloring
    pub achieved_slots: usize,
    /// Conflicting pairs sharing a slot in the coloring
    pub achieved_conflicts_remaining: usize,
    /// Slot reduction in percent
    pub reduction_pct: f64,
    /// Better strategy
    pub winner: Winner,
}

impl ComparisonResult {
    /// Compare a coloring of `batch_size` orders against the baseline
    pub fn evaluate(
        batch_size: usize,
        achieved_slots: usize,
        achieved_conflicts_remaining: usize,
        policy: &ReductionPolicy,
    ) -> Self {
        let baseline_slots = batch_size;
        Self {
            baseline_slots,
            baseline_conflicts_remaining: 0,
            achieved_slots,
            achieved_conflicts_remaining,
            reduction_pct: policy.reduction_pct(baseline_slots, achieved_slots),
            winner: policy.winner(baseline_slots, achieved_slots),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_saved() {
        let result = ComparisonResult::evaluate(4, 2, 0, &ReductionPolicy::default());
        assert_eq!(result.baseline_slots, 4);
        assert_eq!(result.achieved_slots, 2);
        assert_eq!(result.reduction_pct, 50.0);
        assert_eq!(result.winner, Winner::Coloring);
        assert_eq!(ReductionPolicy::default().statement(result.reduction_pct), "50%");
    }

    #[test]
    fn test_empty_batch_has_no_reduction() {
        let result = ComparisonResult::evaluate(0, 0, 0, &ReductionPolicy::default());
        assert_eq!(result.reduction_pct, 0.0);
        assert_eq!(result.winner, Winner::Baseline);
    }

    #[test]
    fn test_tie_defaults_to_baseline() {
        // Fully conflicting batch: no slot saved
        let policy = ReductionPolicy::default();
        let result = ComparisonResult::evaluate(5, 5, 0, &policy);
        assert_eq!(result.reduction_pct, 0.0);
        assert_eq!(result.winner, Winner::Baseline);
        assert_eq!(policy.statement(result.reduction_pct), "0%");
    }

    #[test]
    fn test_tie_policy_coloring() {
        let policy = ReductionPolicy {
            ties: TiePolicy::Coloring,
            ..ReductionPolicy::default()
        };
        assert_eq!(policy.winner(5, 5), Winner::Coloring);
        assert_eq!(policy.winner(5, 3), Winner::Coloring);
    }

    #[test]
    fn test_rounding_conventions() {
        // 3 orders, 1 slot: 66.666..% saved
        let whole = ReductionPolicy::default();
        assert_eq!(whole.reduction_pct(3, 1), 67.0);
        assert_eq!(whole.statement(whole.reduction_pct(3, 1)), "67%");

        let fine = ReductionPolicy {
            rounding: Rounding::Hundredths,
            ..ReductionPolicy::default()
        };
        assert_eq!(fine.reduction_pct(3, 1), 66.67);
        assert_eq!(fine.statement(fine.reduction_pct(3, 1)), "66.67%");
        assert_eq!(fine.statement(fine.reduction_pct(4, 2)), "50%");
    }

    #[test]
    fn test_clamped() {
        let policy = ReductionPolicy::default();
        // More slots than orders can only come from a broken colorer
        assert_eq!(policy.reduction_pct(2, 3), 0.0);
        assert_eq!(policy.winner(2, 3), Winner::Baseline);
        assert_eq!(policy.reduction_pct(1, 0), 100.0);
    }

    #[test]
    fn test_winner_wire_names() {
        assert_eq!(serde_json::to_string(&Winner::Coloring).unwrap(), "\"coloring\"");
        assert_eq!(serde_json::to_string(&Winner::Baseline).unwrap(), "\"baseline\"");
    }

    #[test]
    fn test_rounding_keeps_partial_gains_partial() {
        let whole = ReductionPolicy::default();
        // 999 orders in 2 slots: 99.8% saved, a slot still remains
        assert_eq!(whole.reduction_pct(999, 2), 99.0);
        assert_eq!(whole.statement(whole.reduction_pct(999, 2)), "99%");
        // 1000 orders in 999 slots: 0.1% saved, and the coloring wins
        assert_eq!(whole.reduction_pct(1000, 999), 1.0);
        assert_eq!(whole.winner(1000, 999), Winner::Coloring);

        let fine = ReductionPolicy {
            rounding: Rounding::Hundredths,
            ..ReductionPolicy::default()
        };
        assert_eq!(fine.reduction_pct(100_000, 1), 99.99);
        assert_eq!(fine.reduction_pct(100_000, 99_999), 0.01);
        assert_eq!(fine.statement(fine.reduction_pct(100_000, 99_999)), "0.01%");
    }
}

//! Composite risk aggregation.
//!
//! Combines the five category averages, the prior composite value, and an
//! optional advisory estimate into a single longitudinal 1–100 value.
//! The category weights are a domain contract, not tunable per call.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::category::{RiskCategory, SeriesAverage};

/// Fixed category weights: workload + mental jointly 20%, strength +
/// neuromuscular jointly 50%, anatomical 30%.
pub const CATEGORY_WEIGHTS: [(RiskCategory, f64); 5] = [
    (RiskCategory::WorkloadManagement, 0.10),
    (RiskCategory::MentalRecovery, 0.10),
    (RiskCategory::StrengthAsymmetry, 0.25),
    (RiskCategory::NeuromuscularControl, 0.25),
    (RiskCategory::AnatomicalFixedRisk, 0.30),
];

/// Conservative-adjustment policy: the composite may move at most this
/// far from the prior value in a single update, unless a category signal
/// is extreme.
pub const MAX_COMPOSITE_STEP: f64 = 15.0;

/// A category average at or above this (on the 1–10 scale) is considered
/// extreme and disables damping for the update.
pub const EXTREME_CATEGORY_AVERAGE: f64 = 8.0;

/// Whole-series averages for the five categories. A category with no
/// data carries `has_data: false` and contributes 0 to the composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryAverages {
    pub workload_management: SeriesAverage,
    pub mental_recovery: SeriesAverage,
    pub strength_asymmetry: SeriesAverage,
    pub neuromuscular_control: SeriesAverage,
    pub anatomical_fixed_risk: SeriesAverage,
}

impl CategoryAverages {
    pub const EMPTY: CategoryAverages = CategoryAverages {
        workload_management: SeriesAverage::NO_DATA,
        mental_recovery: SeriesAverage::NO_DATA,
        strength_asymmetry: SeriesAverage::NO_DATA,
        neuromuscular_control: SeriesAverage::NO_DATA,
        anatomical_fixed_risk: SeriesAverage::NO_DATA,
    };

    pub fn get(&self, category: RiskCategory) -> SeriesAverage {
        match category {
            RiskCategory::WorkloadManagement => self.workload_management,
            RiskCategory::MentalRecovery => self.mental_recovery,
            RiskCategory::StrengthAsymmetry => self.strength_asymmetry,
            RiskCategory::NeuromuscularControl => self.neuromuscular_control,
            RiskCategory::AnatomicalFixedRisk => self.anatomical_fixed_risk,
        }
    }

    /// Weighted combination on the 0–100 scale. Each category average
    /// (1–10) contributes `weight × average × 10`; "no data" contributes 0.
    pub fn weighted(&self) -> f64 {
        CATEGORY_WEIGHTS
            .iter()
            .map(|&(category, weight)| {
                let avg = self.get(category);
                if avg.has_data {
                    weight * avg.value * 10.0
                } else {
                    0.0
                }
            })
            .sum()
    }

    /// Whether any category average is at or above the extreme threshold.
    pub fn any_extreme(&self) -> bool {
        RiskCategory::ALL.iter().any(|&c| {
            let avg = self.get(c);
            avg.has_data && avg.value >= EXTREME_CATEGORY_AVERAGE
        })
    }
}

/// Inputs to one composite update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeInputs {
    pub averages: CategoryAverages,
    /// Prior composite value; 0 means unknown/unset.
    pub prior: u8,
    /// Advisory estimate, already clamped to 1–100 by the advisory port.
    pub advisory: Option<u8>,
}

/// Compute the updated composite risk value.
///
/// - prior unknown, no advisory: the weighted category value directly.
/// - prior unknown, advisory present: mean of weighted value and advisory.
/// - prior known: move toward the target (weighted value, blended
///   half-and-half with the advisory estimate when present), with the
///   delta clamped to ±[`MAX_COMPOSITE_STEP`] — unless a category signal
///   is extreme, in which case the target is taken undamped.
///
/// The result is rounded and clamped to [1,100]; 0 is reserved for
/// "unset" and is never returned.
pub fn update_composite(inputs: CompositeInputs) -> u8 {
    let weighted = inputs.averages.weighted();

    let target = match inputs.advisory {
        Some(advisory) => (weighted + f64::from(advisory)) / 2.0,
        None => weighted,
    };

    let value = if inputs.prior == 0 {
        target
    } else if inputs.averages.any_extreme() {
        target
    } else {
        let prior = f64::from(inputs.prior);
        let delta = (target - prior).clamp(-MAX_COMPOSITE_STEP, MAX_COMPOSITE_STEP);
        prior + delta
    };

    (value.round()).clamp(1.0, 100.0) as u8
}

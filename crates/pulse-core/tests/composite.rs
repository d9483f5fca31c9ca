use pulse_core::composite::{
    CATEGORY_WEIGHTS, CategoryAverages, CompositeInputs, MAX_COMPOSITE_STEP, update_composite,
};
use pulse_core::models::category::SeriesAverage;

fn avg(value: f64) -> SeriesAverage {
    SeriesAverage {
        value,
        has_data: true,
    }
}

fn averages(w: f64, m: f64, s: Option<f64>, n: f64, a: f64) -> CategoryAverages {
    CategoryAverages {
        workload_management: avg(w),
        mental_recovery: avg(m),
        strength_asymmetry: s.map(avg).unwrap_or(SeriesAverage::NO_DATA),
        neuromuscular_control: avg(n),
        anatomical_fixed_risk: avg(a),
    }
}

#[test]
fn weights_sum_to_one_and_match_the_group_split() {
    let total: f64 = CATEGORY_WEIGHTS.iter().map(|(_, w)| w).sum();
    assert!((total - 1.0).abs() < 1e-12);
    // 20% workload+mental, 50% strength+neuromuscular, 30% anatomical.
    assert_eq!(CATEGORY_WEIGHTS[0].1 + CATEGORY_WEIGHTS[1].1, 0.20);
    assert_eq!(CATEGORY_WEIGHTS[2].1 + CATEGORY_WEIGHTS[3].1, 0.50);
    assert_eq!(CATEGORY_WEIGHTS[4].1, 0.30);
}

#[test]
fn undamped_composite_is_the_documented_linear_combination() {
    // {workload 6, mental 4, strength no data,
    // neuromuscular 8, anatomical 5}, no prior, no advisory.
    let inputs = CompositeInputs {
        averages: averages(6.0, 4.0, None, 8.0, 5.0),
        prior: 0,
        advisory: None,
    };
    // 0.10*60 + 0.10*40 + 0 + 0.25*80 + 0.30*50 = 45
    assert_eq!(update_composite(inputs), 45);
}

#[test]
fn no_data_category_contributes_zero_not_an_error() {
    let with_data = CompositeInputs {
        averages: averages(6.0, 4.0, Some(0.0), 8.0, 5.0),
        prior: 0,
        advisory: None,
    };
    let without = CompositeInputs {
        averages: averages(6.0, 4.0, None, 8.0, 5.0),
        prior: 0,
        advisory: None,
    };
    // An actual 0-valued average can't exist (values are 1-10), but the
    // weighted form treats "no data" identically to a zero contribution.
    assert_eq!(update_composite(with_data), update_composite(without));
}

#[test]
fn result_is_never_zero() {
    let inputs = CompositeInputs {
        averages: CategoryAverages::EMPTY,
        prior: 0,
        advisory: None,
    };
    // All categories empty: weighted value is 0 but 0 is reserved for
    // "unset", so the floor of 1 applies.
    assert_eq!(update_composite(inputs), 1);
}

#[test]
fn unknown_prior_with_advisory_takes_the_mean() {
    let inputs = CompositeInputs {
        averages: averages(6.0, 4.0, None, 8.0, 5.0),
        prior: 0,
        advisory: Some(65),
    };
    // (45 + 65) / 2 = 55
    assert_eq!(update_composite(inputs), 55);
}

#[test]
fn known_prior_is_damped_toward_the_target() {
    let inputs = CompositeInputs {
        averages: averages(6.0, 4.0, None, 8.0, 5.0),
        prior: 10,
        advisory: None,
    };
    // Target 45, prior 10: delta clamped to +15.
    assert_eq!(update_composite(inputs), 10 + MAX_COMPOSITE_STEP as u8);

    let downward = CompositeInputs {
        averages: averages(1.0, 1.0, Some(1.0), 1.0, 1.0),
        prior: 90,
        advisory: None,
    };
    // Target 10, prior 90: delta clamped to -15.
    assert_eq!(update_composite(downward), 75);
}

#[test]
fn small_moves_are_not_damped() {
    let inputs = CompositeInputs {
        averages: averages(6.0, 4.0, None, 8.0, 5.0),
        prior: 40,
        advisory: None,
    };
    // Target 45, prior 40: within the step limit, taken directly.
    assert_eq!(update_composite(inputs), 45);
}

#[test]
fn extreme_category_disables_damping() {
    let inputs = CompositeInputs {
        averages: averages(6.0, 4.0, Some(9.0), 8.0, 5.0),
        prior: 10,
        advisory: None,
    };
    // strengthAsymmetry 9 ≥ extreme threshold: jump straight to target.
    // 0.10*60 + 0.10*40 + 0.25*90 + 0.25*80 + 0.30*50 = 67.5 → 68
    assert_eq!(update_composite(inputs), 68);
}

#[test]
fn advisory_blends_half_and_half_with_local_signal() {
    let damped = CompositeInputs {
        averages: averages(6.0, 4.0, None, 8.0, 5.0),
        prior: 50,
        advisory: Some(95),
    };
    // Target (45 + 95)/2 = 70, prior 50 → damped to 65.
    assert_eq!(update_composite(damped), 65);
}

#[test]
fn result_is_clamped_to_valid_domain() {
    let maxed = CompositeInputs {
        averages: averages(10.0, 10.0, Some(10.0), 10.0, 10.0),
        prior: 95,
        advisory: Some(100),
    };
    assert_eq!(update_composite(maxed), 100);
}

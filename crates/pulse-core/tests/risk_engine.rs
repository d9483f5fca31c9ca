use jiff::civil::{Date, date};

use pulse_core::models::daily::{DailyMetrics, DailyReport};
use pulse_core::models::risk_score::RiskLevel;
use pulse_core::risk::{compute_risk, rules};

fn metrics(sleep: f64, fatigue: u8, stress: u8, readiness: u8, load: f64) -> DailyMetrics {
    DailyMetrics {
        sleep_hours: sleep,
        fatigue,
        stress,
        readiness,
        training_load: load,
        mood: None,
        soreness: None,
    }
}

fn report(day: Date, m: DailyMetrics) -> DailyReport {
    DailyReport {
        date: day,
        metrics: m,
    }
}

/// A healthy month: steady moderate load with some variation, good sleep,
/// low fatigue/stress, high readiness.
fn healthy_window() -> Vec<DailyReport> {
    (1..=28i8)
        .map(|day| {
            // Alternate easy and hard days so monotony stays realistic.
            let load = 100.0 + f64::from(day % 2) * 400.0;
            report(date(2026, 2, day), metrics(8.0, 20, 20, 85, load))
        })
        .collect()
}

#[test]
fn empty_window_is_an_input_error() {
    assert!(compute_risk(&[]).is_err());
}

#[test]
fn healthy_window_scores_low_with_no_violations() {
    let assessment = compute_risk(&healthy_window()).expect("compute");
    assert!(assessment.violations.is_empty(), "{:?}", assessment.violations);
    assert_eq!(assessment.score, 0.0);
    assert_eq!(assessment.level, RiskLevel::Low);
}

#[test]
fn identical_windows_give_bit_identical_output() {
    let mut window = healthy_window();
    window.last_mut().expect("non-empty").metrics = metrics(4.0, 80, 70, 30, 900.0);

    let a = compute_risk(&window).expect("compute");
    let b = compute_risk(&window).expect("compute");
    assert_eq!(a, b);
    assert_eq!(a.score.to_bits(), b.score.to_bits());
}

#[test]
fn window_order_does_not_affect_the_result() {
    let forward = healthy_window();
    let mut shuffled = forward.clone();
    shuffled.reverse();
    shuffled.swap(3, 17);

    let a = compute_risk(&forward).expect("compute");
    let b = compute_risk(&shuffled).expect("compute");
    assert_eq!(a, b);
}

#[test]
fn acute_load_spike_fires_after_enough_history() {
    let mut window = healthy_window();
    // A week of doubled load on top of the chronic baseline.
    for day in 1..=7i8 {
        window.push(report(
            date(2026, 3, day),
            metrics(8.0, 20, 20, 85, 900.0 + f64::from(day % 2) * 80.0),
        ));
    }

    let assessment = compute_risk(&window).expect("compute");
    assert!(
        assessment
            .violations
            .contains(&"acute-chronic-load-spike"),
        "{:?}",
        assessment.violations
    );
    assert!(assessment.workload_signal >= 7);
}

#[test]
fn acwr_needs_a_chronic_baseline() {
    // Three days of huge load, but no history: the spike rule must not
    // fire on an undefined ratio.
    let window: Vec<DailyReport> = (1..=3i8)
        .map(|day| report(date(2026, 3, day), metrics(8.0, 20, 20, 85, 1000.0)))
        .collect();

    let assessment = compute_risk(&window).expect("compute");
    assert!(!assessment.violations.contains(&"acute-chronic-load-spike"));
    assert_eq!(
        assessment.workload_signal,
        pulse_core::risk::NEUTRAL_WORKLOAD_SIGNAL
    );
}

#[test]
fn sleep_rules_fire_on_short_sleep() {
    let mut window = healthy_window();
    let last_days = window.len() - 3;
    for r in window.iter_mut().skip(last_days) {
        r.metrics.sleep_hours = 4.5;
    }

    let assessment = compute_risk(&window).expect("compute");
    assert!(assessment.violations.contains(&"sleep-deficit"));
    assert!(assessment.violations.contains(&"sleep-acute-loss"));
}

#[test]
fn readiness_drop_fires_on_relative_decline() {
    let mut window = healthy_window();
    // Latest readiness 55: above the absolute floor of 40, but more than
    // 20 below the 7-day mean of ~85.
    window.last_mut().expect("non-empty").metrics.readiness = 55;

    let assessment = compute_risk(&window).expect("compute");
    assert!(assessment.violations.contains(&"readiness-drop"));
}

#[test]
fn soreness_rule_needs_three_reported_days() {
    let mut window = healthy_window();
    let n = window.len();
    window[n - 1].metrics.soreness = Some(80);
    window[n - 2].metrics.soreness = Some(75);
    // Third-most-recent day unreported: the rule must not fire.
    let assessment = compute_risk(&window).expect("compute");
    assert!(!assessment.violations.contains(&"soreness-persistent"));

    window[n - 3].metrics.soreness = Some(70);
    let assessment = compute_risk(&window).expect("compute");
    assert!(assessment.violations.contains(&"soreness-persistent"));
}

#[test]
fn bad_week_scores_high() {
    let mut window = healthy_window();
    for day in 1..=7i8 {
        window.push(report(
            date(2026, 3, day),
            metrics(4.0, 85, 80, 30, 950.0 + f64::from(day % 2) * 60.0),
        ));
    }

    let assessment = compute_risk(&window).expect("compute");
    assert_eq!(assessment.level, RiskLevel::High);
    assert!(assessment.score >= pulse_core::risk::HIGH_THRESHOLD);
    assert!(assessment.recovery_signal >= 7);
    assert!(!assessment.recommendation.is_empty());
}

#[test]
fn level_thresholds_are_monotonic_constants() {
    assert!(pulse_core::risk::MODERATE_THRESHOLD < pulse_core::risk::HIGH_THRESHOLD);
    assert!(pulse_core::risk::MODERATE_THRESHOLD > 0.0);
    assert!(pulse_core::risk::HIGH_THRESHOLD < 1.0);
}

#[test]
fn rule_identifiers_are_stable() {
    // Downstream consumers (UI, audit trail) key off these names.
    let ids: Vec<&str> = rules::RULES.iter().map(|r| r.id).collect();
    assert_eq!(
        ids,
        vec![
            "acute-chronic-load-spike",
            "training-monotony-high",
            "sleep-deficit",
            "sleep-acute-loss",
            "fatigue-elevated",
            "stress-sustained",
            "readiness-drop",
            "soreness-persistent",
        ]
    );
}

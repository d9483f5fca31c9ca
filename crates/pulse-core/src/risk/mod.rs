//! Rule-based injury-risk engine.
//!
//! A pure function over a subject's ordered daily-report window. Same
//! window in, bit-identical assessment out: no I/O, no clock reads, no
//! randomness. The window is sorted by calendar date internally so that
//! backfilled reports land in the right place.

pub mod rules;

use jiff::ToSpan;

use crate::error::CoreError;
use crate::models::daily::DailyReport;
use crate::models::risk_score::RiskLevel;

use rules::{Rule, WindowStats};

/// Score below this is Low.
pub const MODERATE_THRESHOLD: f64 = 0.33;
/// Score below this is Moderate; at or above, High.
pub const HIGH_THRESHOLD: f64 = 0.66;

/// Workload signal assumed while the window is too short for an ACWR.
pub const NEUTRAL_WORKLOAD_SIGNAL: u8 = 4;

/// Output of one risk evaluation.
///
/// `workload_signal` and `recovery_signal` are the 1–10 daily-derived
/// category values (workloadManagement and mentalRecovery respectively,
/// higher = more risk).
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    /// Normalized score, 0–1: the sum of triggered rule weights, clamped.
    pub score: f64,
    pub level: RiskLevel,
    /// Stable identifiers of the rules that fired, in table order.
    pub violations: Vec<&'static str>,
    pub recommendation: String,
    pub workload_signal: u8,
    pub recovery_signal: u8,
}

/// Evaluate the rule table over a subject's full daily-report window.
///
/// The window must be non-empty; an empty window is an input error, not
/// a zero score.
pub fn compute_risk(window: &[DailyReport]) -> Result<RiskAssessment, CoreError> {
    if window.is_empty() {
        return Err(CoreError::invalid_input(
            "window",
            "daily report window is empty",
        ));
    }

    let stats = window_stats(window);
    let triggered = rules::evaluate(&stats);

    let score: f64 = triggered
        .iter()
        .map(|rule| rule.weight)
        .sum::<f64>()
        .clamp(0.0, 1.0);

    let level = if score < MODERATE_THRESHOLD {
        RiskLevel::Low
    } else if score < HIGH_THRESHOLD {
        RiskLevel::Moderate
    } else {
        RiskLevel::High
    };

    let top = triggered
        .iter()
        .copied()
        .max_by(|a, b| a.weight.total_cmp(&b.weight));

    Ok(RiskAssessment {
        score,
        level,
        violations: triggered.iter().map(|rule| rule.id).collect(),
        recommendation: recommendation(level, top),
        workload_signal: workload_signal(&stats, &triggered),
        recovery_signal: recovery_signal(&stats),
    })
}

fn window_stats(window: &[DailyReport]) -> WindowStats {
    let mut sorted: Vec<&DailyReport> = window.iter().collect();
    sorted.sort_by_key(|r| r.date);

    let latest = sorted[sorted.len() - 1];
    let latest_date = latest.date;
    let cutoff_3 = latest_date.saturating_sub(3.days());
    let cutoff_7 = latest_date.saturating_sub(7.days());
    let cutoff_28 = latest_date.saturating_sub(28.days());

    let in_window =
        |days_cutoff: jiff::civil::Date| sorted.iter().filter(move |r| r.date > days_cutoff);

    let mean = |values: &[f64]| -> f64 {
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    };

    let sleep_3: Vec<f64> = in_window(cutoff_3).map(|r| r.metrics.sleep_hours).collect();
    let loads_7: Vec<f64> = in_window(cutoff_7).map(|r| r.metrics.training_load).collect();
    let loads_28: Vec<f64> = in_window(cutoff_28)
        .map(|r| r.metrics.training_load)
        .collect();
    let stress_7: Vec<f64> = in_window(cutoff_7)
        .map(|r| f64::from(r.metrics.stress))
        .collect();
    let readiness_7: Vec<f64> = in_window(cutoff_7)
        .map(|r| f64::from(r.metrics.readiness))
        .collect();

    let mean_load_7 = mean(&loads_7);
    let std_load_7 = if loads_7.is_empty() {
        0.0
    } else {
        let variance = loads_7
            .iter()
            .map(|l| (l - mean_load_7).powi(2))
            .sum::<f64>()
            / loads_7.len() as f64;
        variance.sqrt()
    };

    let mut recent_soreness = [None, None, None];
    for (slot, report) in sorted.iter().rev().take(3).enumerate() {
        recent_soreness[slot] = report.metrics.soreness;
    }

    WindowStats {
        latest_sleep_hours: latest.metrics.sleep_hours,
        latest_fatigue: latest.metrics.fatigue,
        latest_readiness: latest.metrics.readiness,
        mean_sleep_3: mean(&sleep_3),
        mean_load_7,
        std_load_7,
        samples_7: loads_7.len(),
        mean_load_28: mean(&loads_28),
        history_days: sorted.len(),
        mean_stress_7: mean(&stress_7),
        mean_readiness_7: mean(&readiness_7),
        recent_soreness,
    }
}

/// 1–10 workload-risk signal for the workloadManagement category.
///
/// Maps the ACWR linearly (×4, so a balanced 1.0 ratio lands at 4 and a
/// 2.5 spike saturates at 10), +1 when monotony fired. Falls back to
/// [`NEUTRAL_WORKLOAD_SIGNAL`] while the window is too short for an ACWR.
fn workload_signal(stats: &WindowStats, triggered: &[&'static Rule]) -> u8 {
    let base = match stats.acwr() {
        Some(ratio) => (ratio * 4.0).round().clamp(1.0, 10.0) as u8,
        None => NEUTRAL_WORKLOAD_SIGNAL,
    };
    let monotony_bump = triggered
        .iter()
        .any(|rule| rule.id == "training-monotony-high") as u8;
    (base + monotony_bump).min(10)
}

/// 1–10 recovery-risk signal for the mentalRecovery category.
///
/// 70% psychometric pressure (mean of fatigue, stress, inverted
/// readiness) and 30% sleep pressure (shortfall against 8 h over the
/// last 3 days), mapped onto 1–10.
fn recovery_signal(stats: &WindowStats) -> u8 {
    let psychometric = (f64::from(stats.latest_fatigue)
        + stats.mean_stress_7
        + (100.0 - f64::from(stats.latest_readiness)))
        / 3.0;
    let sleep_pressure = ((8.0 - stats.mean_sleep_3) / 8.0).clamp(0.0, 1.0) * 100.0;
    let combined = 0.7 * psychometric + 0.3 * sleep_pressure;
    (combined / 10.0).round().clamp(1.0, 10.0) as u8
}

fn recommendation(level: RiskLevel, top: Option<&'static Rule>) -> String {
    let lead = match top.map(|rule| rule.id) {
        Some("acute-chronic-load-spike") => {
            "Training load has spiked well above the chronic baseline; taper the next sessions."
        }
        Some("training-monotony-high") => {
            "Training has become monotonous; vary intensity and insert a lighter day."
        }
        Some("sleep-deficit") | Some("sleep-acute-loss") => {
            "Sleep is running short; prioritize recovery sleep before the next hard session."
        }
        Some("fatigue-elevated") => "Fatigue is elevated; reduce volume until it normalizes.",
        Some("stress-sustained") => {
            "Stress has stayed high across the week; build in active recovery."
        }
        Some("readiness-drop") => {
            "Readiness has dropped noticeably; treat today as a recovery day."
        }
        Some("soreness-persistent") => {
            "Soreness has persisted for several days; have it looked at before loading again."
        }
        _ => "No risk rules fired for this window.",
    };

    let closing = match level {
        RiskLevel::Low => "Overall risk is low; continue as planned.",
        RiskLevel::Moderate => "Overall risk is moderate; adjust the plan accordingly.",
        RiskLevel::High => "Overall risk is high; consult the clinical staff before training.",
    };

    format!("{lead} {closing}")
}

//! The deterministic rule table.
//!
//! Rule identifiers are a public contract: the UI and the audit trail key
//! off them, so they must stay stable across versions. Thresholds are
//! tunable constants covered by unit tests; changing one changes scoring
//! behavior but never an identifier.

/// Acute:chronic workload ratio above which a load spike fires.
pub const ACWR_SPIKE_RATIO: f64 = 1.5;
/// Minimum days of history before the ACWR is considered meaningful.
pub const ACWR_MIN_HISTORY_DAYS: usize = 7;
/// Training monotony (7-day mean / 7-day σ) above which monotony fires.
pub const MONOTONY_LIMIT: f64 = 2.0;
/// Minimum loaded days in the 7-day window for monotony to be evaluated.
pub const MONOTONY_MIN_SAMPLES: usize = 4;
/// 3-day mean sleep below which a sleep deficit fires.
pub const SLEEP_DEFICIT_HOURS: f64 = 6.5;
/// Single-night sleep below which acute sleep loss fires.
pub const SLEEP_ACUTE_LOSS_HOURS: f64 = 5.0;
/// Latest fatigue at or above which elevated fatigue fires.
pub const FATIGUE_ELEVATED: u8 = 70;
/// 7-day mean stress at or above which sustained stress fires.
pub const STRESS_SUSTAINED: f64 = 65.0;
/// Latest readiness below which the readiness floor fires.
pub const READINESS_FLOOR: u8 = 40;
/// Drop of latest readiness below the 7-day mean that fires on its own.
pub const READINESS_DROP: f64 = 20.0;
/// Soreness at or above this on each of the 3 most recent reported days
/// fires persistent soreness. Only evaluated when soreness was reported.
pub const SORENESS_PERSISTENT: u8 = 60;

/// A named rule and its contribution to the normalized score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub id: &'static str,
    pub weight: f64,
}

pub const RULES: &[Rule] = &[
    Rule {
        id: "acute-chronic-load-spike",
        weight: 0.30,
    },
    Rule {
        id: "training-monotony-high",
        weight: 0.15,
    },
    Rule {
        id: "sleep-deficit",
        weight: 0.20,
    },
    Rule {
        id: "sleep-acute-loss",
        weight: 0.15,
    },
    Rule {
        id: "fatigue-elevated",
        weight: 0.15,
    },
    Rule {
        id: "stress-sustained",
        weight: 0.15,
    },
    Rule {
        id: "readiness-drop",
        weight: 0.20,
    },
    Rule {
        id: "soreness-persistent",
        weight: 0.15,
    },
];

/// Window statistics the rules are evaluated against. Computed once per
/// `compute_risk` call from the date-sorted report window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub latest_sleep_hours: f64,
    pub latest_fatigue: u8,
    pub latest_readiness: u8,
    /// Mean sleep over the 3 most recent calendar days.
    pub mean_sleep_3: f64,
    /// Mean training load over the last 7 calendar days.
    pub mean_load_7: f64,
    /// Population σ of training load over the last 7 calendar days.
    pub std_load_7: f64,
    /// Number of reports inside the 7-day window.
    pub samples_7: usize,
    /// Mean training load over the last 28 calendar days.
    pub mean_load_28: f64,
    /// Total days of history in the window.
    pub history_days: usize,
    pub mean_stress_7: f64,
    pub mean_readiness_7: f64,
    /// Soreness on the 3 most recent days; `None` where unreported.
    pub recent_soreness: [Option<u8>; 3],
}

impl WindowStats {
    /// Acute:chronic workload ratio, when a chronic baseline exists.
    pub fn acwr(&self) -> Option<f64> {
        if self.history_days >= ACWR_MIN_HISTORY_DAYS && self.mean_load_28 > 0.0 {
            Some(self.mean_load_7 / self.mean_load_28)
        } else {
            None
        }
    }

    /// Training monotony (mean/σ), when the window has enough samples.
    pub fn monotony(&self) -> Option<f64> {
        if self.samples_7 >= MONOTONY_MIN_SAMPLES && self.std_load_7 > 0.0 {
            Some(self.mean_load_7 / self.std_load_7)
        } else {
            None
        }
    }
}

/// Evaluate every rule against the window statistics, in table order.
pub fn evaluate(stats: &WindowStats) -> Vec<&'static Rule> {
    RULES.iter().filter(|rule| triggers(rule.id, stats)).collect()
}

fn triggers(id: &str, s: &WindowStats) -> bool {
    match id {
        "acute-chronic-load-spike" => s.acwr().is_some_and(|r| r > ACWR_SPIKE_RATIO),
        "training-monotony-high" => s.monotony().is_some_and(|m| m > MONOTONY_LIMIT),
        "sleep-deficit" => s.mean_sleep_3 < SLEEP_DEFICIT_HOURS,
        "sleep-acute-loss" => s.latest_sleep_hours < SLEEP_ACUTE_LOSS_HOURS,
        "fatigue-elevated" => s.latest_fatigue >= FATIGUE_ELEVATED,
        "stress-sustained" => s.mean_stress_7 >= STRESS_SUSTAINED,
        "readiness-drop" => {
            s.latest_readiness < READINESS_FLOOR
                || s.mean_readiness_7 - f64::from(s.latest_readiness) >= READINESS_DROP
        }
        "soreness-persistent" => s
            .recent_soreness
            .iter()
            .all(|v| v.is_some_and(|x| x >= SORENESS_PERSISTENT)),
        _ => false,
    }
}

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Maximum number of entries retained per category series (FIFO cap).
pub const MAX_SERIES_ENTRIES: usize = 1000;

/// The five fixed risk categories aggregated into the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum RiskCategory {
    WorkloadManagement,
    MentalRecovery,
    StrengthAsymmetry,
    NeuromuscularControl,
    AnatomicalFixedRisk,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 5] = [
        RiskCategory::WorkloadManagement,
        RiskCategory::MentalRecovery,
        RiskCategory::StrengthAsymmetry,
        RiskCategory::NeuromuscularControl,
        RiskCategory::AnatomicalFixedRisk,
    ];

    /// The canonical stored label for this category.
    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::WorkloadManagement => "workloadManagement",
            RiskCategory::MentalRecovery => "mentalRecovery",
            RiskCategory::StrengthAsymmetry => "strengthAsymmetry",
            RiskCategory::NeuromuscularControl => "neuromuscularControl",
            RiskCategory::AnatomicalFixedRisk => "anatomicalFixedRisk",
        }
    }

    /// Best-effort label parse, tolerant of case and separator noise.
    ///
    /// Used to clamp category labels coming back from the advisory
    /// estimator to the fixed enum. Returns `None` for anything that
    /// doesn't map to one of the five categories.
    pub fn from_label(label: &str) -> Option<RiskCategory> {
        let normalized: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "workloadmanagement" => Some(RiskCategory::WorkloadManagement),
            "mentalrecovery" => Some(RiskCategory::MentalRecovery),
            "strengthasymmetry" => Some(RiskCategory::StrengthAsymmetry),
            "neuromuscularcontrol" => Some(RiskCategory::NeuromuscularControl),
            "anatomicalfixedrisk" => Some(RiskCategory::AnatomicalFixedRisk),
            _ => None,
        }
    }
}

/// Submission frequency tier of a report or category entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
}

/// A single observation in a category series.
///
/// Immutable once created; the only mutation a series performs is FIFO
/// eviction of whole entries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryEntry {
    pub value: u8,
    pub date: Date,
    pub cadence: Cadence,
}

impl CategoryEntry {
    /// Validating factory. `value` must be on the 1–10 risk scale.
    pub fn new(value: u8, date: Date, cadence: Cadence) -> Result<Self, CoreError> {
        if !(1..=10).contains(&value) {
            return Err(CoreError::invalid_input(
                "value",
                format!("category value must be 1-10, got {value}"),
            ));
        }
        Ok(CategoryEntry {
            value,
            date,
            cadence,
        })
    }
}

/// Result of averaging a series window.
///
/// `has_data` distinguishes "the average is 0" from "there was nothing to
/// average" — callers must check it rather than compare against 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SeriesAverage {
    pub value: f64,
    pub has_data: bool,
}

impl SeriesAverage {
    pub const NO_DATA: SeriesAverage = SeriesAverage {
        value: 0.0,
        has_data: false,
    };
}

/// Insertion-ordered, FIFO-capped sequence of category entries.
///
/// Insertion order is authoritative for eviction only. Backfill (an entry
/// for a past date appended after later dates) is permitted, so consumers
/// needing chronology must sort by `date`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategorySeries {
    pub entries: Vec<CategoryEntry>,
}

impl CategorySeries {
    pub fn new() -> Self {
        CategorySeries::default()
    }

    /// Append an entry, evicting the oldest if the cap is exceeded.
    ///
    /// Rejects a second `Daily` entry for the same calendar day with
    /// `DuplicateEntry` naming the conflicting date. Same-day merge is the
    /// caller's responsibility — the series itself is append-only and
    /// duplicate-rejecting. Eviction never errors.
    pub fn append(&mut self, entry: CategoryEntry) -> Result<(), CoreError> {
        if entry.cadence == Cadence::Daily
            && self
                .entries
                .iter()
                .any(|e| e.cadence == Cadence::Daily && e.date == entry.date)
        {
            return Err(CoreError::DuplicateEntry { date: entry.date });
        }

        self.entries.push(entry);
        if self.entries.len() > MAX_SERIES_ENTRIES {
            self.entries.remove(0);
        }
        Ok(())
    }

    /// Remove any `Daily` entry for the given calendar day.
    ///
    /// Merge-policy support for the daily cadence: the ingestion guard
    /// replaces a same-day daily entry rather than duplicating it.
    pub fn remove_daily(&mut self, date: Date) {
        self.entries
            .retain(|e| !(e.cadence == Cadence::Daily && e.date == date));
    }

    /// Arithmetic mean of values, optionally restricted to entries dated
    /// on or after `since`.
    pub fn average(&self, since: Option<Date>) -> SeriesAverage {
        let mut sum = 0u64;
        let mut count = 0u64;
        for entry in &self.entries {
            if let Some(since) = since
                && entry.date < since
            {
                continue;
            }
            sum += u64::from(entry.value);
            count += 1;
        }

        if count == 0 {
            SeriesAverage::NO_DATA
        } else {
            SeriesAverage {
                value: sum as f64 / count as f64,
                has_data: true,
            }
        }
    }

    /// Most recently inserted entry, if any.
    pub fn latest(&self) -> Option<&CategoryEntry> {
        self.entries.last()
    }

    /// Whether any entry with the given cadence exists for the given day.
    pub fn has_entry_on(&self, date: Date, cadence: Cadence) -> bool {
        self.entries
            .iter()
            .any(|e| e.cadence == cadence && e.date == date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

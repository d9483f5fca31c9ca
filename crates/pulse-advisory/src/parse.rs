//! Parsing of estimator output.
//!
//! Three stages: strict JSON over the whole response, strict JSON over a
//! fenced code block, then a best-effort field scan. The scan is a
//! documented, isolated fallback — whatever stage produced a value, every
//! numeric field is clamped to its domain and category labels are mapped
//! onto the fixed enum before anything leaves this module.

use serde::Deserialize;

use pulse_core::models::category::RiskCategory;

/// A validated, clamped advisory opinion.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryResult {
    pub category: Option<RiskCategory>,
    /// Composite estimate, clamped to 1–100.
    pub composite: Option<u8>,
    pub note: Option<String>,
}

/// The schema the estimator is asked to produce.
#[derive(Deserialize)]
struct RawAdvisory {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    composite: Option<f64>,
    #[serde(default)]
    note: Option<String>,
}

/// Parse an estimator response. Returns `None` when no usable field can
/// be recovered — the caller treats that as `Unavailable`.
pub fn parse_advisory(text: &str) -> Option<AdvisoryResult> {
    let raw = parse_strict(text)
        .or_else(|| extract_fenced_json(text).and_then(|inner| parse_strict(inner)))
        .unwrap_or_else(|| scan_fields(text));

    let result = AdvisoryResult {
        category: raw.category.as_deref().and_then(RiskCategory::from_label),
        composite: raw.composite.and_then(clamp_composite),
        note: raw
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
    };

    if result.category.is_none() && result.composite.is_none() && result.note.is_none() {
        None
    } else {
        Some(result)
    }
}

fn parse_strict(text: &str) -> Option<RawAdvisory> {
    serde_json::from_str(text.trim()).ok()
}

/// Clamp a composite estimate to [1,100]; non-finite values are discarded.
fn clamp_composite(value: f64) -> Option<u8> {
    if !value.is_finite() {
        return None;
    }
    Some(value.round().clamp(1.0, 100.0) as u8)
}

/// Pull the contents of the first fenced code block (``` or ```json).
fn extract_fenced_json(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    let body_start = after_fence.find('\n')?;
    let body = &after_fence[body_start + 1..];
    let end = body.find("```")?;
    Some(&body[..end])
}

/// Best-effort field extraction from free text. Only used when both
/// strict parses fail.
fn scan_fields(text: &str) -> RawAdvisory {
    RawAdvisory {
        category: word_after(text, "category"),
        composite: number_after(text, "composite"),
        note: quoted_after(text, "note"),
    }
}

/// First number following the keyword.
fn number_after(text: &str, keyword: &str) -> Option<f64> {
    let idx = find_keyword(text, keyword)?;
    let rest = &text[idx..];
    let digits_start = rest.find(|c: char| c.is_ascii_digit() || c == '-')?;
    let rest = &rest[digits_start..];
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-')
        .unwrap_or(rest.len());
    rest[..digits_end].parse().ok()
}

/// First quoted string or bare word following the keyword (skipping the
/// keyword itself and the separator).
fn word_after(text: &str, keyword: &str) -> Option<String> {
    let idx = find_keyword(text, keyword)?;
    let rest = text[idx..].trim_start_matches([':', '"', '=', ' ', '\t']);
    let end = rest
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(rest.len());
    let word = &rest[..end];
    if word.is_empty() {
        None
    } else {
        Some(word.to_string())
    }
}

/// First double-quoted value following the keyword.
fn quoted_after(text: &str, keyword: &str) -> Option<String> {
    let idx = find_keyword(text, keyword)?;
    let rest = text[idx..].trim_start_matches([':', ' ', '\t']);
    let rest = rest.strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

/// Byte offset just past the first case-insensitive occurrence of
/// `keyword` in `text`.
fn find_keyword(text: &str, keyword: &str) -> Option<usize> {
    let lower = text.to_ascii_lowercase();
    lower.find(keyword).map(|i| i + keyword.len())
}

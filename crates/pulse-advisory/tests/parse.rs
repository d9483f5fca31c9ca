use pulse_advisory::parse::parse_advisory;
use pulse_core::models::category::RiskCategory;

#[test]
fn strict_json_parses_all_fields() {
    let text = r#"{"category": "strengthAsymmetry", "composite": 62, "note": "Watch the left knee."}"#;
    let result = parse_advisory(text).expect("usable result");
    assert_eq!(result.category, Some(RiskCategory::StrengthAsymmetry));
    assert_eq!(result.composite, Some(62));
    assert_eq!(result.note.as_deref(), Some("Watch the left knee."));
}

#[test]
fn fields_are_individually_optional() {
    let result = parse_advisory(r#"{"composite": 40}"#).expect("usable result");
    assert_eq!(result.category, None);
    assert_eq!(result.composite, Some(40));
    assert_eq!(result.note, None);
}

#[test]
fn fenced_code_block_is_unwrapped() {
    let text = "Here is my assessment:\n```json\n{\"composite\": 55, \"category\": \"mentalRecovery\"}\n```\nLet me know if you need more.";
    let result = parse_advisory(text).expect("usable result");
    assert_eq!(result.composite, Some(55));
    assert_eq!(result.category, Some(RiskCategory::MentalRecovery));
}

#[test]
fn free_text_falls_back_to_field_scanning() {
    let text = "Based on the data, the composite risk is around 72. \
                The category \"neuromuscularControl\" concerns me most. \
                note: \"Schedule a movement screen.\"";
    let result = parse_advisory(text).expect("usable result");
    assert_eq!(result.composite, Some(72));
    assert_eq!(result.category, Some(RiskCategory::NeuromuscularControl));
    assert_eq!(result.note.as_deref(), Some("Schedule a movement screen."));
}

#[test]
fn composite_is_clamped_to_domain() {
    let over = parse_advisory(r#"{"composite": 250}"#).expect("usable result");
    assert_eq!(over.composite, Some(100));

    let under = parse_advisory(r#"{"composite": 0}"#).expect("usable result");
    assert_eq!(under.composite, Some(1));

    let negative = parse_advisory(r#"{"composite": -5}"#).expect("usable result");
    assert_eq!(negative.composite, Some(1));
}

#[test]
fn unknown_category_labels_are_dropped_not_invented() {
    let result = parse_advisory(r#"{"category": "generalFitness", "composite": 50}"#)
        .expect("usable result");
    assert_eq!(result.category, None);
    assert_eq!(result.composite, Some(50));
}

#[test]
fn category_labels_tolerate_case_and_separators() {
    for label in ["WorkloadManagement", "workload_management", "workload management"] {
        let text = format!(r#"{{"category": "{label}"}}"#);
        let result = parse_advisory(&text).expect("usable result");
        assert_eq!(result.category, Some(RiskCategory::WorkloadManagement), "{label}");
    }
}

#[test]
fn garbage_yields_none() {
    assert!(parse_advisory("").is_none());
    assert!(parse_advisory("I cannot assess this athlete.").is_none());
    assert!(parse_advisory(r#"{"foo": "bar"}"#).is_none());
}

#[test]
fn whitespace_only_note_is_dropped() {
    let result = parse_advisory(r#"{"composite": 50, "note": "   "}"#).expect("usable result");
    assert_eq!(result.note, None);
}

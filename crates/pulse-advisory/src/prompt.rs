//! Prompt assembly for the advisory estimator.
//!
//! The category weighting contract is restated verbatim in the system
//! prompt: the estimator is non-deterministic, so the only way to keep
//! its opinion aligned with the aggregator is to spell the weights out
//! in every request rather than hoping it generalizes.

use crate::error::AdvisoryError;
use crate::request::AdvisoryRequest;

pub const SYSTEM_PROMPT: &str = "\
You are an injury-risk advisor for athlete monitoring. You will receive an \
athlete's current report, historical averages, per-category risk averages \
(1-10 scale), and the prior composite risk (0 means unknown).

The composite risk is a weighted combination of exactly five categories. \
Use these weights and no others:
- workloadManagement: 10%
- mentalRecovery: 10%
- strengthAsymmetry: 25%
- neuromuscularControl: 25%
- anatomicalFixedRisk: 30%

Respond with a single JSON object and nothing else:
{\"category\": <the single category label most at risk, one of the five \
above>, \"composite\": <integer 1-100>, \"note\": <one short sentence for \
the coaching staff>}

Omit a field if you cannot estimate it. Do not invent category labels.";

/// Build the user message: an XML-style context block wrapping the
/// JSON-serialized submission and history, followed by the ask.
pub fn build_user_message(request: &AdvisoryRequest) -> Result<String, AdvisoryError> {
    let mut block = String::from("<risk_context>\n");

    block.push_str("<current_metrics>\n");
    block.push_str(&serde_json::to_string(&request.current_metrics)?);
    block.push_str("\n</current_metrics>\n");

    block.push_str("<historical_averages>\n");
    match &request.historical_averages {
        Some(averages) => block.push_str(&serde_json::to_string(averages)?),
        None => block.push_str("null"),
    }
    block.push_str("\n</historical_averages>\n");

    block.push_str("<category_averages>\n");
    block.push_str(&serde_json::to_string(&request.category_averages)?);
    block.push_str("\n</category_averages>\n");

    block.push_str(&format!(
        "<prior_composite>{}</prior_composite>\n",
        request.prior_composite
    ));
    block.push_str(&format!(
        "<cadence>{}</cadence>\n",
        serde_json::to_string(&request.cadence)?
    ));

    block.push_str("</risk_context>\n\n");
    block.push_str("Estimate the athlete's composite injury risk.");
    Ok(block)
}

//! Estimator invocation.
//!
//! The Converse call is the only network-bound step in the whole
//! ingestion flow. It runs under a hard timeout, is never retried, and
//! every failure collapses into `AdvisoryOutcome::Unavailable` — the next
//! periodic report is the natural retry.

use std::time::Duration;

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, Message, SystemContentBlock,
};
use tracing::warn;

use crate::error::AdvisoryError;
use crate::parse::{AdvisoryResult, parse_advisory};
use crate::prompt::{SYSTEM_PROMPT, build_user_message};
use crate::request::AdvisoryRequest;

/// Hard wall-clock bound on one advisory round-trip.
pub const ADVISORY_TIMEOUT: Duration = Duration::from_secs(20);

/// Outcome of one advisory call. `Unavailable` is a normal degraded-mode
/// result, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvisoryOutcome {
    Available(AdvisoryResult),
    Unavailable,
}

#[allow(async_fn_in_trait)]
pub trait AdvisoryEstimator {
    async fn estimate(&self, request: &AdvisoryRequest) -> AdvisoryOutcome;
}

/// Bedrock-backed estimator.
pub struct BedrockEstimator {
    client: Client,
    model_id: String,
    timeout: Duration,
}

impl BedrockEstimator {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        BedrockEstimator {
            client,
            model_id: model_id.into(),
            timeout: ADVISORY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl AdvisoryEstimator for BedrockEstimator {
    async fn estimate(&self, request: &AdvisoryRequest) -> AdvisoryOutcome {
        let user_message = match build_user_message(request) {
            Ok(message) => message,
            Err(e) => {
                warn!(subject_id = %request.subject_id, error = %e, "advisory request serialization failed");
                return AdvisoryOutcome::Unavailable;
            }
        };

        let invocation = invoke_converse(&self.client, &self.model_id, &user_message);
        let response_text = match tokio::time::timeout(self.timeout, invocation).await {
            Err(_) => {
                warn!(subject_id = %request.subject_id, "advisory estimator timed out");
                return AdvisoryOutcome::Unavailable;
            }
            Ok(Err(e)) => {
                warn!(subject_id = %request.subject_id, error = %e, "advisory invocation failed");
                return AdvisoryOutcome::Unavailable;
            }
            Ok(Ok(text)) => text,
        };

        match parse_advisory(&response_text) {
            Some(result) => AdvisoryOutcome::Available(result),
            None => {
                warn!(
                    subject_id = %request.subject_id,
                    response_len = response_text.len(),
                    "advisory response had no usable fields"
                );
                AdvisoryOutcome::Unavailable
            }
        }
    }
}

/// Core invocation using the Bedrock Converse API. Returns the response
/// text.
async fn invoke_converse(
    client: &Client,
    model_id: &str,
    user_message: &str,
) -> Result<String, AdvisoryError> {
    let response = client
        .converse()
        .model_id(model_id)
        .system(SystemContentBlock::Text(SYSTEM_PROMPT.to_string()))
        .messages(
            Message::builder()
                .role(ConversationRole::User)
                .content(ContentBlock::Text(user_message.to_string()))
                .build()
                .map_err(|e| AdvisoryError::Invocation(e.to_string()))?,
        )
        .send()
        .await
        .map_err(|e| AdvisoryError::Invocation(e.into_service_error().to_string()))?;

    let output_message = response
        .output()
        .and_then(|o| o.as_message().ok())
        .ok_or_else(|| AdvisoryError::ResponseParse("no message in response".to_string()))?;

    let text = output_message
        .content()
        .iter()
        .filter_map(|block| {
            if let ContentBlock::Text(text) = block {
                Some(text.as_str())
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("");

    Ok(text)
}

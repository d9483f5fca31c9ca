use std::env;

use aws_sdk_bedrockruntime::Client;

/// Default advisory model: a fast inference profile is plenty for a
/// supplementary risk opinion.
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-3-5-haiku-20241022-v1:0";

/// Build a Bedrock runtime client from the ambient AWS configuration.
pub async fn build_client() -> Client {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .load()
        .await;
    Client::new(&config)
}

/// Advisory model ID from `PULSE_ADVISORY_MODEL_ID`, with a default.
pub fn model_from_env() -> String {
    env::var("PULSE_ADVISORY_MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string())
}

use std::env;

use aws_sdk_s3::Client;

/// Build an S3 client from the ambient AWS configuration.
pub async fn build_client() -> Client {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .load()
        .await;
    Client::new(&config)
}

/// Bucket name from `PULSE_BUCKET`, defaulting to `pulse`.
pub fn bucket_from_env() -> String {
    env::var("PULSE_BUCKET").unwrap_or_else(|_| "pulse".to_string())
}

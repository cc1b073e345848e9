//! Bedrock Runtime client construction

use crate::config::HttpClientSettings;
use crate::providers::bedrock::types::AwsRegion;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::Client;
use tracing::{info, instrument};

/// Load AWS configuration for `region` and build a shareable client
///
/// Credentials come from the default AWS provider chain. The client holds
/// its own connection pool and is cheap to clone.
#[instrument(skip(http), fields(region = %region))]
pub async fn build_client(region: &AwsRegion, http: &HttpClientSettings) -> Client {
    let timeouts = TimeoutConfig::builder()
        .connect_timeout(http.connect_timeout())
        .read_timeout(http.read_timeout())
        .build();

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .timeout_config(timeouts)
        .load()
        .await;

    info!("Bedrock Runtime client configured");
    Client::new(&sdk_config)
}

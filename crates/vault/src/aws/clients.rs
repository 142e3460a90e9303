//! AWS SDK client bundle.

use aws_config::{BehaviorVersion, Region};
use tracing::info;

/// Bundle of AWS SDK clients sharing one resolved [`aws_config::SdkConfig`].
#[derive(Clone, Debug)]
pub struct AwsClients {
    /// S3 client used to store, fetch, and list objects.
    pub s3: aws_sdk_s3::Client,
}

impl AwsClients {
    /// Initialise the SDK clients for `region`.
    ///
    /// When `endpoint_url` is set the S3 client targets it instead of AWS and
    /// switches to path-style addressing, which S3-compatible stores expect.
    pub async fn init(region: &str, endpoint_url: Option<&str>) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_owned()))
            .load()
            .await;

        let mut s3_config = aws_sdk_s3::config::Builder::from(&config);
        if let Some(url) = endpoint_url {
            info!(endpoint = %url, "using S3 endpoint override");
            s3_config = s3_config.endpoint_url(url).force_path_style(true);
        }

        Self {
            s3: aws_sdk_s3::Client::from_conf(s3_config.build()),
        }
    }
}

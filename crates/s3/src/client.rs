//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from mf-core.
//! This crate is the only place credentials, region, and endpoint
//! configuration are turned into a concrete client.

use async_trait::async_trait;

use mf_core::{ConfigProvider, Error, ListPage, ObjectStore, Property, Result};

/// Connection settings for the S3 client
///
/// All fields are optional; anything unset falls back to the AWS default
/// provider chain.
#[derive(Debug, Clone, Default)]
pub struct S3Options {
    /// Access key id
    pub access_key: Option<String>,

    /// Secret access key
    pub secret_key: Option<String>,

    /// Session token for temporary credentials
    pub session_token: Option<String>,

    /// AWS region
    pub region: Option<String>,

    /// Custom endpoint URL for S3-compatible services
    pub endpoint_url: Option<String>,
}

impl S3Options {
    /// Read connection settings from a configuration provider
    pub fn from_config(config: &impl ConfigProvider) -> Self {
        Self {
            access_key: config.get(Property::S3AccessKey),
            secret_key: config.get(Property::S3SecretKey),
            session_token: config.get(Property::S3SessionToken),
            region: config.get(Property::S3Region),
            endpoint_url: config.get(Property::S3EndpointUrl),
        }
    }
}

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client from connection settings
    pub async fn new(options: S3Options) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        // Static credentials when both keys are configured; the default
        // provider chain otherwise.
        if let (Some(access_key), Some(secret_key)) = (&options.access_key, &options.secret_key) {
            let credentials = aws_credential_types::Credentials::new(
                access_key.clone(),
                secret_key.clone(),
                options.session_token.clone(),
                None, // expiry
                "modelfs-static-credentials",
            );
            loader = loader.credentials_provider(credentials);
        }

        if let Some(region) = &options.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(endpoint) = &options.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let config = loader.load().await;

        // Path-style addressing for compatibility with custom endpoints
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(options.endpoint_url.is_some())
            .build();

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }

    /// Create a client with settings read from a configuration provider
    pub async fn from_config(config: &impl ConfigProvider) -> Result<Self> {
        Self::new(S3Options::from_config(config)).await
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn prefix_exists(&self, bucket: &str, prefix: &str) -> Result<bool> {
        let response = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .max_keys(1)
            .send()
            .await
            .map_err(|e| Error::internal(format!("s3://{bucket}/{prefix}"), e))?;

        Ok(response.key_count().unwrap_or(0) > 0)
    }

    async fn list_prefix(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ListPage> {
        let mut request = self.inner.list_objects_v2().bucket(bucket).prefix(prefix);
        if let Some(token) = continuation_token {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::internal(format!("s3://{bucket}/{prefix}"), e))?;

        let keys = response
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_string))
            .collect();

        Ok(ListPage {
            keys,
            truncated: response.is_truncated().unwrap_or(false),
            continuation_token: response.next_continuation_token().map(|s| s.to_string()),
        })
    }

    async fn put_directory_marker(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(aws_sdk_s3::primitives::ByteStream::from_static(&[]))
            .send()
            .await
            .map_err(|e| Error::internal(format!("s3://{bucket}/{key}"), e))?;

        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::internal(format!("s3://{bucket}/{key}"), e))?;

        Ok(())
    }
}

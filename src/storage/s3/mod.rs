pub mod client_builder;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::list_object_versions::ListObjectVersionsOutput;
use aws_sdk_s3::types::{DeleteMarkerEntry, ObjectVersion};
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::storage::{Storage, StorageFactory, StorageTrait};
use crate::types::{
    DeleteMarkerRecord, NULL_VERSION_ID, ObjectVersionRecord, Page, PageCursor, ScanTarget,
};

/// Extracts the S3 error code and message from an AWS SDK error.
///
/// For service errors returns the S3 error code (e.g. "AccessDenied") and
/// message. For transport, timeout or construction failures returns "N/A"
/// and the full error description.
fn extract_sdk_error_details<E: std::fmt::Display + ProvideErrorMetadata>(
    e: &SdkError<E>,
) -> (String, String) {
    if let Some(service_err) = e.as_service_error() {
        (
            service_err.code().unwrap_or("unknown").to_string(),
            service_err.message().unwrap_or("no message").to_string(),
        )
    } else {
        ("N/A".to_string(), e.to_string())
    }
}

pub struct S3StorageFactory;

#[async_trait]
impl StorageFactory for S3StorageFactory {
    async fn create(&self, target: &ScanTarget, client_config: &ClientConfig) -> Result<Storage> {
        let client = client_config.create_client().await;
        let region = client.config().region().map(|r| r.to_string());

        Ok(Box::new(S3Storage {
            bucket: target.bucket.clone(),
            prefix: target.prefix.clone(),
            client: Arc::new(client),
            region,
        }))
    }
}

#[derive(Clone)]
struct S3Storage {
    bucket: String,
    prefix: String,
    client: Arc<Client>,
    region: Option<String>,
}

#[async_trait]
impl StorageTrait for S3Storage {
    async fn get_bucket_location(&self) -> Result<Option<String>> {
        let output = self
            .client
            .get_bucket_location()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| {
                let (s3_error_code, s3_error_message) = extract_sdk_error_details(&e);
                tracing::error!(
                    bucket = self.bucket,
                    s3_error_code = s3_error_code,
                    s3_error_message = s3_error_message,
                    "S3 GetBucketLocation API call failed for s3://{}: {} ({}).",
                    self.bucket,
                    s3_error_code,
                    s3_error_message,
                );
                anyhow!(e).context("aws_sdk_s3::client::get_bucket_location() failed.")
            })?;

        Ok(output
            .location_constraint()
            .map(|constraint| constraint.as_str().to_string())
            .filter(|constraint| !constraint.is_empty()))
    }

    async fn list_object_versions_page(
        &self,
        cursor: Option<&PageCursor>,
        max_keys: i32,
    ) -> Result<Page> {
        let output = self
            .client
            .list_object_versions()
            .bucket(&self.bucket)
            .prefix(&self.prefix)
            .set_key_marker(cursor.and_then(|c| c.key_marker.clone()))
            .set_version_id_marker(cursor.and_then(|c| c.version_id_marker.clone()))
            .max_keys(max_keys)
            .send()
            .await
            .map_err(|e| {
                let (s3_error_code, s3_error_message) = extract_sdk_error_details(&e);
                tracing::error!(
                    bucket = self.bucket,
                    prefix = self.prefix,
                    s3_error_code = s3_error_code,
                    s3_error_message = s3_error_message,
                    "S3 ListObjectVersions API call failed for s3://{}/{}: {} ({}).",
                    self.bucket,
                    self.prefix,
                    s3_error_code,
                    s3_error_message,
                );
                anyhow!(e).context("aws_sdk_s3::client::list_object_versions() failed.")
            })?;

        build_page(&output)
    }

    async fn delete_object_version(&self, key: &str, version_id: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .version_id(version_id)
            .send()
            .await
            .map_err(|e| {
                let (s3_error_code, s3_error_message) = extract_sdk_error_details(&e);
                anyhow!("{s3_error_code}: {s3_error_message}")
                    .context("aws_sdk_s3::client::delete_object() failed.")
            })?;

        Ok(())
    }

    fn region(&self) -> Option<String> {
        self.region.clone()
    }
}

fn build_page(output: &ListObjectVersionsOutput) -> Result<Page> {
    let versions = output
        .versions()
        .iter()
        .map(to_version_record)
        .collect::<Result<Vec<_>>>()?;
    let delete_markers = output
        .delete_markers()
        .iter()
        .map(to_delete_marker_record)
        .collect::<Result<Vec<_>>>()?;

    let is_truncated = output.is_truncated() == Some(true);
    let next_cursor = if is_truncated {
        Some(PageCursor {
            key_marker: output.next_key_marker().map(String::from),
            version_id_marker: output.next_version_id_marker().map(String::from),
        })
    } else {
        None
    };

    Ok(Page {
        versions,
        delete_markers,
        is_truncated,
        next_cursor,
    })
}

fn to_version_record(version: &ObjectVersion) -> Result<ObjectVersionRecord> {
    Ok(ObjectVersionRecord {
        key: version
            .key()
            .context("ListObjectVersions returned a version without a key.")?
            .to_string(),
        version_id: version
            .version_id()
            .unwrap_or(NULL_VERSION_ID)
            .to_string(),
        is_latest: version.is_latest().unwrap_or(false),
        size_bytes: version.size().unwrap_or(0),
    })
}

fn to_delete_marker_record(marker: &DeleteMarkerEntry) -> Result<DeleteMarkerRecord> {
    Ok(DeleteMarkerRecord {
        key: marker
            .key()
            .context("ListObjectVersions returned a delete marker without a key.")?
            .to_string(),
        version_id: marker.version_id().unwrap_or(NULL_VERSION_ID).to_string(),
    })
}

use anyhow::Result;
use tracing::{debug, info};

use crate::config::DEFAULT_REGION;
use crate::storage::Storage;
use crate::types::error::S3rError;

/// Legacy location constraint still returned for old buckets in Ireland.
const LEGACY_EU_CONSTRAINT: &str = "EU";
const LEGACY_EU_REGION: &str = "eu-west-1";

/// Look up the region hosting the bucket the storage is bound to.
///
/// A bucket without an explicit location constraint lives in `us-east-1`.
/// Any lookup failure is fatal.
pub async fn resolve_bucket_region(storage: &Storage, bucket: &str) -> Result<String> {
    debug!(bucket = bucket, "getting bucket region.");

    let location = storage
        .get_bucket_location()
        .await
        .map_err(|e| e.context(S3rError::RegionLookup(format!("s3://{bucket}"))))?;

    let region = region_from_location_constraint(location.as_deref());
    info!(bucket = bucket, region = region, "bucket region resolved.");

    Ok(region)
}

pub fn region_from_location_constraint(location: Option<&str>) -> String {
    match location {
        None | Some("") => DEFAULT_REGION.to_string(),
        Some(LEGACY_EU_CONSTRAINT) => LEGACY_EU_REGION.to_string(),
        Some(region) => region.to_string(),
    }
}

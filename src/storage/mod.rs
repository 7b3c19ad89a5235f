use anyhow::Result;
use async_trait::async_trait;
use dyn_clone::DynClone;

use crate::config::ClientConfig;
use crate::types::{Page, PageCursor, ScanTarget};

pub mod s3;

/// Type alias for a boxed Storage trait object.
pub type Storage = Box<dyn StorageTrait + Send + Sync>;

/// Factory for Storage instances bound to one target.
///
/// The run creates a bootstrap storage to look up the bucket region, then a
/// second one configured for that region.
#[async_trait]
pub trait StorageFactory: Send + Sync {
    async fn create(&self, target: &ScanTarget, client_config: &ClientConfig) -> Result<Storage>;
}

/// The three S3 operations the deletion run needs.
///
/// Every call is awaited before the next one is issued.
#[async_trait]
pub trait StorageTrait: DynClone {
    /// Location constraint reported by GetBucketLocation.
    ///
    /// `None` (or an empty string) means the bucket has no explicit constraint.
    async fn get_bucket_location(&self) -> Result<Option<String>>;

    /// Fetch one ListObjectVersions page under the target prefix.
    ///
    /// `cursor` is `None` for the first page. Listing failures are unrecoverable.
    async fn list_object_versions_page(
        &self,
        cursor: Option<&PageCursor>,
        max_keys: i32,
    ) -> Result<Page>;

    /// Delete exactly one object version (or delete marker) by version id.
    async fn delete_object_version(&self, key: &str, version_id: &str) -> Result<()>;

    /// Region this storage's client was configured with, if known.
    fn region(&self) -> Option<String>;
}

dyn_clone::clone_trait_object!(StorageTrait);

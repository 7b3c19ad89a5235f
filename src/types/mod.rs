use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

use zeroize_derive::{Zeroize, ZeroizeOnDrop};

pub mod error;
pub mod token;

/// The version id S3 reports for objects written while versioning was never enabled.
pub const NULL_VERSION_ID: &str = "null";

/// Bucket and prefix identifying the deletion scope of one run.
///
/// Immutable for the whole run: the scan pass and the delete pass both
/// enumerate the same target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    pub bucket: String,
    pub prefix: String,
}

impl ScanTarget {
    pub fn new(bucket: &str, prefix: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        }
    }
}

impl Display for ScanTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.prefix)
    }
}

/// One revision of a stored object, as listed by ListObjectVersions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectVersionRecord {
    pub key: String,
    pub version_id: String,
    pub is_latest: bool,
    pub size_bytes: i64,
}

impl ObjectVersionRecord {
    /// Size in bytes. S3 never reports a negative size; if it did, it counts as zero.
    pub fn size(&self) -> u64 {
        u64::try_from(self.size_bytes).unwrap_or(0)
    }
}

/// A tombstone that hides the current version of a key while older versions remain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteMarkerRecord {
    pub key: String,
    pub version_id: String,
}

/// Position in a version listing, threaded from one page request to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    pub key_marker: Option<String>,
    pub version_id_marker: Option<String>,
}

impl PageCursor {
    pub fn is_empty(&self) -> bool {
        self.key_marker.is_none() && self.version_id_marker.is_none()
    }
}

/// One batch returned by a single ListObjectVersions call.
///
/// `next_cursor` is only meaningful while `is_truncated` is true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub versions: Vec<ObjectVersionRecord>,
    pub delete_markers: Vec<DeleteMarkerRecord>,
    pub is_truncated: bool,
    pub next_cursor: Option<PageCursor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Version,
    DeleteMarker,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Version => write!(f, "Version"),
            RecordKind::DeleteMarker => write!(f, "Delete Marker"),
        }
    }
}

/// Result of one DeleteObject call. Streamed to the reporter, never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub key: String,
    pub version_id: String,
    pub kind: RecordKind,
    pub succeeded: bool,
    pub error: Option<String>,
}

impl DeletionOutcome {
    pub fn success(kind: RecordKind, key: &str, version_id: &str) -> Self {
        Self {
            key: key.to_string(),
            version_id: version_id.to_string(),
            kind,
            succeeded: true,
            error: None,
        }
    }

    pub fn failure(kind: RecordKind, key: &str, version_id: &str, error: String) -> Self {
        Self {
            key: key.to_string(),
            version_id: version_id.to_string(),
            kind,
            succeeded: false,
            error: Some(error),
        }
    }
}

/// AWS configuration file locations.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigLocation {
    pub aws_config_file: Option<PathBuf>,
    pub aws_shared_credentials_file: Option<PathBuf>,
}

/// Where the S3 client gets its credentials from.
#[derive(Debug, Clone)]
pub enum S3Credentials {
    Profile(String),
    Credentials { access_keys: AccessKeys },
    FromEnvironment,
}

/// AWS access key pair.
///
/// The secret_access_key and session_token are cleared from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AccessKeys {
    pub access_key: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Debug for AccessKeys {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut keys = f.debug_struct("AccessKeys");
        let session_token = self
            .session_token
            .as_ref()
            .map_or("None", |_| "** redacted **");
        keys.field("access_key", &self.access_key)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &session_token);
        keys.finish()
    }
}

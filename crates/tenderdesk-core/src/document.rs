use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::identity::UserId;

/// Kind of identity document accepted by the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pan,
    Gstin,
    Udyam,
    Other,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pan => write!(f, "pan"),
            Self::Gstin => write!(f, "gstin"),
            Self::Udyam => write!(f, "udyam"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Admin verification state of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Verified => write!(f, "verified"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// An identity document uploaded to the storage bucket.
///
/// The record holds only metadata; the bytes live in object storage
/// under `storage_path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityDocument {
    pub id: Uuid,
    pub owner: UserId,
    pub kind: DocumentKind,
    /// Object key inside the documents bucket.
    pub storage_path: String,
    pub status: VerificationStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
}

impl IdentityDocument {
    /// Creates a freshly uploaded, unverified document record.
    #[must_use]
    pub fn new(owner: UserId, kind: DocumentKind, storage_path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            kind,
            storage_path: storage_path.into(),
            status: VerificationStatus::Pending,
            uploaded_at: crate::time::now_utc(),
        }
    }

    /// Returns true once an admin verified the document.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.status == VerificationStatus::Verified
    }
}

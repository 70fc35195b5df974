//! Entity trait defining the shared bookkeeping of every record kind

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Record identifier, allocated per table starting at 1
pub type RecordId = i64;

/// Unix timestamp in seconds
pub type Timestamp = i64;

/// Current wall-clock time as a Unix timestamp
pub fn now() -> Timestamp {
    Utc::now().timestamp()
}

/// Timestamps carried by every record.
///
/// - created_at: stamped once at creation
/// - modify_at: stamped on creation and on every mutation
/// - deleted_at: `None` while the record is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub created_at: Timestamp,
    pub modify_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Timestamps {
    /// Fresh timestamps for a record created right now
    pub fn new() -> Self {
        let now = now();
        Self {
            created_at: now,
            modify_at: now,
            deleted_at: None,
        }
    }

    /// Mark the record as soft-deleted
    pub fn mark_deleted(&mut self) {
        let now = now();
        self.deleted_at = Some(now);
        self.modify_at = now;
    }
}

impl Default for Timestamps {
    fn default() -> Self {
        Self::new()
    }
}

/// Base trait for all records kept by the store.
///
/// `deleted_at == None` is the sole criterion for "active". Every lookup the
/// store exposes publicly is scoped to active records unless documented
/// otherwise.
pub trait Entity: Clone + Send + Sync + Serialize + 'static {
    /// Resource name used in URLs and error messages (e.g., "auto", "partner")
    fn resource_name() -> &'static str;

    /// Get the unique identifier for this record
    fn id(&self) -> RecordId;

    /// Get the bookkeeping timestamps
    fn timestamps(&self) -> &Timestamps;

    /// Get mutable access to the bookkeeping timestamps
    fn timestamps_mut(&mut self) -> &mut Timestamps;

    fn created_at(&self) -> Timestamp {
        self.timestamps().created_at
    }

    fn modify_at(&self) -> Timestamp {
        self.timestamps().modify_at
    }

    fn deleted_at(&self) -> Option<Timestamp> {
        self.timestamps().deleted_at
    }

    /// Check if the record has been soft-deleted
    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }

    /// Check if the record is active (not soft-deleted)
    fn is_active(&self) -> bool {
        !self.is_deleted()
    }

    /// Soft-delete the record
    fn soft_delete(&mut self) {
        self.timestamps_mut().mark_deleted();
    }
}

//! Store trait for vehicles, partners and their assignments

use crate::core::entity::RecordId;
use crate::core::error::Result;
use crate::entities::assignment::Assignment;
use crate::entities::auto::{Auto, NewAuto};
use crate::entities::partner::{NewPartner, Partner};
use async_trait::async_trait;

/// Persistence for the three record kinds.
///
/// Lookups are scoped to active records unless a method says otherwise.
/// Implementations are the sole arbiter of concurrent writes; no locking
/// happens above this layer.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create a vehicle from validated input
    async fn create_auto(&self, auto: NewAuto) -> Result<Auto>;

    /// Create a partner from validated input
    async fn create_partner(&self, partner: NewPartner) -> Result<Partner>;

    /// Active vehicles in creation order
    async fn list_autos(&self) -> Result<Vec<Auto>>;

    /// Active partners in creation order
    async fn list_partners(&self) -> Result<Vec<Partner>>;

    /// Get an active vehicle, `NotFound` otherwise
    async fn get_auto(&self, id: RecordId) -> Result<Auto>;

    /// Get an active partner, `NotFound` otherwise
    async fn get_partner(&self, id: RecordId) -> Result<Partner>;

    /// Soft-delete an active vehicle.
    ///
    /// A second call on the same id fails with `NotFound`.
    async fn soft_delete_auto(&self, id: RecordId) -> Result<()>;

    /// Soft-delete an active partner.
    ///
    /// A second call on the same id fails with `NotFound`.
    async fn soft_delete_partner(&self, id: RecordId) -> Result<()>;

    /// Assign a partner to a vehicle.
    ///
    /// - `NotFound` when the vehicle is not active
    /// - `Validation` when no partner row has that id (active or not)
    /// - `Validation` when the pair already exists, soft-deleted rows included
    async fn create_assignment(&self, auto_id: RecordId, partner_id: RecordId)
    -> Result<Assignment>;

    /// Partners assigned to a vehicle, in assignment order, regardless of state
    async fn partners_of(&self, auto_id: RecordId) -> Result<Vec<Partner>>;

    /// Vehicles assigned to a partner, in assignment order, regardless of state
    async fn autos_of(&self, partner_id: RecordId) -> Result<Vec<Auto>>;

    /// Number of vehicle rows, soft-deleted ones included
    async fn count_autos(&self) -> Result<usize>;

    /// Number of partner rows, soft-deleted ones included
    async fn count_partners(&self) -> Result<usize>;

    /// Hard-delete a vehicle (any state) and cascade to its assignments
    async fn purge_auto(&self, id: RecordId) -> Result<()>;

    /// Hard-delete a partner (any state) and cascade to its assignments
    async fn purge_partner(&self, id: RecordId) -> Result<()>;
}

//! In-memory implementation of RecordStore for testing and development

use crate::core::entity::{Entity, RecordId};
use crate::core::error::{RecordError, Result};
use crate::core::store::RecordStore;
use crate::core::validation::FieldErrors;
use crate::entities::assignment::model::{self as assignment, Assignment};
use crate::entities::auto::{Auto, NewAuto};
use crate::entities::partner::{NewPartner, Partner};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The three tables, kept under a single lock so that check-then-insert
/// sequences (assignment uniqueness) are atomic.
#[derive(Debug, Default)]
struct Tables {
    autos: BTreeMap<RecordId, Auto>,
    partners: BTreeMap<RecordId, Partner>,
    assignments: BTreeMap<RecordId, Assignment>,
    next_auto: RecordId,
    next_partner: RecordId,
    next_assignment: RecordId,
}

fn allocate(counter: &mut RecordId) -> RecordId {
    *counter += 1;
    *counter
}

/// Look up a row that is still active
fn active<E: Entity>(table: &BTreeMap<RecordId, E>, id: RecordId) -> Result<&E> {
    table
        .get(&id)
        .filter(|record| record.is_active())
        .ok_or_else(|| RecordError::not_found(E::resource_name(), id))
}

fn active_mut<E: Entity>(table: &mut BTreeMap<RecordId, E>, id: RecordId) -> Result<&mut E> {
    table
        .get_mut(&id)
        .filter(|record| record.is_active())
        .ok_or_else(|| RecordError::not_found(E::resource_name(), id))
}

fn list_active<E: Entity>(table: &BTreeMap<RecordId, E>) -> Vec<E> {
    table.values().filter(|r| r.is_active()).cloned().collect()
}

/// In-memory record store
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRecordStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| RecordError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| RecordError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create_auto(&self, new: NewAuto) -> Result<Auto> {
        let mut tables = self.write()?;
        let id = allocate(&mut tables.next_auto);
        let auto = Auto::from_new(id, new);
        tables.autos.insert(id, auto.clone());

        tracing::debug!(id, "auto created");
        Ok(auto)
    }

    async fn create_partner(&self, new: NewPartner) -> Result<Partner> {
        let mut tables = self.write()?;
        let id = allocate(&mut tables.next_partner);
        let partner = Partner::from_new(id, new);
        tables.partners.insert(id, partner.clone());

        tracing::debug!(id, "partner created");
        Ok(partner)
    }

    async fn list_autos(&self) -> Result<Vec<Auto>> {
        Ok(list_active(&self.read()?.autos))
    }

    async fn list_partners(&self) -> Result<Vec<Partner>> {
        Ok(list_active(&self.read()?.partners))
    }

    async fn get_auto(&self, id: RecordId) -> Result<Auto> {
        active(&self.read()?.autos, id).cloned()
    }

    async fn get_partner(&self, id: RecordId) -> Result<Partner> {
        active(&self.read()?.partners, id).cloned()
    }

    async fn soft_delete_auto(&self, id: RecordId) -> Result<()> {
        let mut tables = self.write()?;
        active_mut(&mut tables.autos, id)?.soft_delete();

        tracing::debug!(id, "auto soft-deleted");
        Ok(())
    }

    async fn soft_delete_partner(&self, id: RecordId) -> Result<()> {
        let mut tables = self.write()?;
        active_mut(&mut tables.partners, id)?.soft_delete();

        tracing::debug!(id, "partner soft-deleted");
        Ok(())
    }

    async fn create_assignment(
        &self,
        auto_id: RecordId,
        partner_id: RecordId,
    ) -> Result<Assignment> {
        let mut tables = self.write()?;

        active(&tables.autos, auto_id)?;

        if !tables.partners.contains_key(&partner_id) {
            return Err(FieldErrors::single("partner", assignment::does_not_exist(partner_id)).into());
        }

        if tables
            .assignments
            .values()
            .any(|a| a.joins(auto_id, partner_id))
        {
            return Err(FieldErrors::non_field(assignment::NOT_UNIQUE).into());
        }

        let id = allocate(&mut tables.next_assignment);
        let row = Assignment::new(id, auto_id, partner_id);
        tables.assignments.insert(id, row.clone());

        tracing::debug!(id, auto = auto_id, partner = partner_id, "assignment created");
        Ok(row)
    }

    async fn partners_of(&self, auto_id: RecordId) -> Result<Vec<Partner>> {
        let tables = self.read()?;
        Ok(tables
            .assignments
            .values()
            .filter(|a| a.auto == auto_id)
            .filter_map(|a| tables.partners.get(&a.partner).cloned())
            .collect())
    }

    async fn autos_of(&self, partner_id: RecordId) -> Result<Vec<Auto>> {
        let tables = self.read()?;
        Ok(tables
            .assignments
            .values()
            .filter(|a| a.partner == partner_id)
            .filter_map(|a| tables.autos.get(&a.auto).cloned())
            .collect())
    }

    async fn count_autos(&self) -> Result<usize> {
        Ok(self.read()?.autos.len())
    }

    async fn count_partners(&self) -> Result<usize> {
        Ok(self.read()?.partners.len())
    }

    async fn purge_auto(&self, id: RecordId) -> Result<()> {
        let mut tables = self.write()?;
        tables
            .autos
            .remove(&id)
            .ok_or_else(|| RecordError::not_found(Auto::resource_name(), id))?;
        tables.assignments.retain(|_, a| a.auto != id);

        tracing::info!(id, "auto purged");
        Ok(())
    }

    async fn purge_partner(&self, id: RecordId) -> Result<()> {
        let mut tables = self.write()?;
        tables
            .partners
            .remove(&id)
            .ok_or_else(|| RecordError::not_found(Partner::resource_name(), id))?;
        tables.assignments.retain(|_, a| a.partner != id);

        tracing::info!(id, "partner purged");
        Ok(())
    }
}

//! Partner model with explicit payload validation

use crate::core::entity::{Entity, RecordId, Timestamps};
use crate::core::projection::Relational;
use crate::core::validation::{FieldErrors, FieldReader};
use serde::Serialize;
use serde_json::Value;

/// Maximum length of a partner name, in characters
pub const NAME_MAX_CHARS: usize = 160;

/// A partner record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partner {
    pub id: RecordId,
    pub name: String,
    pub city: String,
    pub address: String,
    pub company_name: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Partner {
    /// Materialize validated input under a freshly allocated id
    pub fn from_new(id: RecordId, new: NewPartner) -> Self {
        Self {
            id,
            name: new.name,
            city: new.city,
            address: new.address,
            company_name: new.company_name,
            timestamps: Timestamps::new(),
        }
    }
}

impl Entity for Partner {
    fn resource_name() -> &'static str {
        "partner"
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }
}

impl Relational for Partner {
    const RELATION_FIELD: &'static str = "assigned_autos";
}

/// Validated input for a new partner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPartner {
    pub name: String,
    pub city: String,
    pub address: String,
    pub company_name: String,
}

impl NewPartner {
    pub fn from_json(body: &Value) -> Result<Self, FieldErrors> {
        let mut reader = FieldReader::new(body)?;

        let name = reader.text("name", Some(NAME_MAX_CHARS));
        let city = reader.text("city", None);
        let address = reader.text("address", None);
        let company_name = reader.text("company_name", None);

        match (name, city, address, company_name) {
            (Some(name), Some(city), Some(address), Some(company_name)) => Ok(Self {
                name,
                city,
                address,
                company_name,
            }),
            _ => Err(reader.into_errors()),
        }
    }
}

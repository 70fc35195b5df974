//! Assignment of a partner to a vehicle

use crate::core::entity::{Entity, RecordId, Timestamps};
use crate::core::validation::{FieldErrors, FieldReader};
use serde::Serialize;
use serde_json::Value;

/// Message for a duplicate (auto, partner) pair
pub const NOT_UNIQUE: &str = "The fields auto, partner must make a unique set.";

/// Message for a partner reference that matches no row
pub fn does_not_exist(id: RecordId) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}

/// One row of the many-to-many relation between vehicles and partners
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub id: RecordId,
    pub auto: RecordId,
    pub partner: RecordId,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Assignment {
    pub fn new(id: RecordId, auto: RecordId, partner: RecordId) -> Self {
        Self {
            id,
            auto,
            partner,
            timestamps: Timestamps::new(),
        }
    }

    /// Whether this row joins the given pair
    pub fn joins(&self, auto: RecordId, partner: RecordId) -> bool {
        self.auto == auto && self.partner == partner
    }
}

impl Entity for Assignment {
    fn resource_name() -> &'static str {
        "assignment"
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

/// Validated body of an assignment request.
///
/// The vehicle comes from the URL; the body only names the partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAssignment {
    pub partner: RecordId,
}

impl NewAssignment {
    pub fn from_json(body: &Value) -> Result<Self, FieldErrors> {
        let mut reader = FieldReader::new(body)?;
        match reader.primary_key("partner") {
            Some(partner) => Ok(Self { partner }),
            None => Err(reader.into_errors()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::validators;
    use serde_json::json;

    #[test]
    fn test_partner_id_forms() {
        assert_eq!(NewAssignment::from_json(&json!({"partner": 3})).unwrap().partner, 3);
        assert_eq!(NewAssignment::from_json(&json!({"partner": "7"})).unwrap().partner, 7);
    }

    #[test]
    fn test_falsy_partner_is_required() {
        for body in [json!({}), json!({"partner": 0}), json!({"partner": false})] {
            let errors = NewAssignment::from_json(&body).unwrap_err();
            assert_eq!(errors.get("partner").unwrap(), [validators::REQUIRED]);
        }
    }

    #[test]
    fn test_wrong_partner_type() {
        let errors = NewAssignment::from_json(&json!({"partner": "abc"})).unwrap_err();
        assert_eq!(
            errors.get("partner").unwrap(),
            ["Incorrect type. Expected pk value, received str."]
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(does_not_exist(9999), "Invalid pk \"9999\" - object does not exist.");
        assert!(Assignment::new(1, 2, 3).joins(2, 3));
        assert!(!Assignment::new(1, 2, 3).joins(3, 2));
    }
}

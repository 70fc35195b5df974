//! Vehicle model with explicit payload validation

use crate::core::entity::{Entity, RecordId, Timestamps};
use crate::core::projection::Relational;
use crate::core::validation::{FieldErrors, FieldReader};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Maximum digits of `average_fuel`
pub const FUEL_MAX_DIGITS: u32 = 3;

/// Maximum decimal places of `average_fuel`
pub const FUEL_DECIMAL_PLACES: u32 = 1;

/// How a vehicle is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsageType {
    Private,
    Company,
}

impl UsageType {
    pub const CHOICES: &'static [&'static str] = &["Private", "Company"];

    pub fn as_str(self) -> &'static str {
        match self {
            UsageType::Private => "Private",
            UsageType::Company => "Company",
        }
    }
}

impl FromStr for UsageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Private" => Ok(UsageType::Private),
            "Company" => Ok(UsageType::Company),
            other => Err(format!("unknown usage type: {}", other)),
        }
    }
}

impl fmt::Display for UsageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vehicle record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Auto {
    pub id: RecordId,
    pub average_fuel: Decimal,
    pub delegation_starting: i64,
    pub delegation_ending: i64,
    pub driver: String,
    pub owner: String,
    #[serde(rename = "type")]
    pub usage_type: UsageType,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Auto {
    /// Materialize validated input under a freshly allocated id
    pub fn from_new(id: RecordId, new: NewAuto) -> Self {
        Self {
            id,
            average_fuel: new.average_fuel,
            delegation_starting: new.delegation_starting,
            delegation_ending: new.delegation_ending,
            driver: new.driver,
            owner: new.owner,
            usage_type: new.usage_type,
            timestamps: Timestamps::new(),
        }
    }
}

impl Entity for Auto {
    fn resource_name() -> &'static str {
        "auto"
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

impl Relational for Auto {
    const RELATION_FIELD: &'static str = "assigned_partners";
}

/// Validated input for a new vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuto {
    pub average_fuel: Decimal,
    pub delegation_starting: i64,
    pub delegation_ending: i64,
    pub driver: String,
    pub owner: String,
    pub usage_type: UsageType,
}

impl NewAuto {
    /// Validate a request body.
    ///
    /// Server-managed fields (`id`, timestamps, `assigned_partners`) and
    /// unknown keys are ignored.
    pub fn from_json(body: &Value) -> Result<Self, FieldErrors> {
        let mut reader = FieldReader::new(body)?;

        let average_fuel = reader.decimal("average_fuel", FUEL_MAX_DIGITS, FUEL_DECIMAL_PLACES);
        let delegation_starting = reader.integer("delegation_starting");
        let delegation_ending = reader.integer("delegation_ending");
        let driver = reader.text("driver", None);
        let owner = reader.text("owner", None);
        let usage_type = reader.choice("type", UsageType::CHOICES);

        match (
            average_fuel,
            delegation_starting,
            delegation_ending,
            driver,
            owner,
            usage_type,
        ) {
            (
                Some(average_fuel),
                Some(delegation_starting),
                Some(delegation_ending),
                Some(driver),
                Some(owner),
                Some(usage_type),
            ) => Ok(Self {
                average_fuel,
                delegation_starting,
                delegation_ending,
                driver,
                owner,
                usage_type,
            }),
            _ => Err(reader.into_errors()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::validators;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "average_fuel": 12.3,
            "delegation_starting": 0,
            "delegation_ending": 123,
            "driver": "Bela",
            "owner": "Bela",
            "type": "Private"
        })
    }

    #[test]
    fn test_valid_body() {
        let new = NewAuto::from_json(&valid_body()).unwrap();
        assert_eq!(new.average_fuel, Decimal::new(123, 1));
        assert_eq!(new.delegation_ending, 123);
        assert_eq!(new.usage_type, UsageType::Private);
    }

    #[test]
    fn test_missing_driver() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("driver");

        let errors = NewAuto::from_json(&body).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("driver").unwrap(), [validators::REQUIRED]);
    }

    #[test]
    fn test_every_bad_field_is_reported() {
        let body = json!({
            "average_fuel": 123.4,
            "delegation_starting": "soon",
            "driver": "  ",
            "owner": "Bela",
            "type": "Rental"
        });

        let errors = NewAuto::from_json(&body).unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(
            fields,
            [
                "average_fuel",
                "delegation_ending",
                "delegation_starting",
                "driver",
                "type"
            ]
        );
        assert_eq!(
            errors.get("type").unwrap(),
            ["\"Rental\" is not a valid choice."]
        );
    }

    #[test]
    fn test_server_managed_fields_are_ignored() {
        let mut body = valid_body();
        let object = body.as_object_mut().unwrap();
        object.insert("id".into(), json!(999));
        object.insert("deleted_at".into(), json!(5));
        object.insert("assigned_partners".into(), json!([1, 2]));

        assert!(NewAuto::from_json(&body).is_ok());
    }

    #[test]
    fn test_wire_format() {
        let new = NewAuto::from_json(&valid_body()).unwrap();
        let auto = Auto::from_new(4, new);
        let json = serde_json::to_value(&auto).unwrap();

        assert_eq!(json["id"], 4);
        assert_eq!(json["average_fuel"], "12.3");
        assert_eq!(json["type"], "Private");
        assert!(json["deleted_at"].is_null());
        assert!(json.get("usage_type").is_none());
    }

    #[test]
    fn test_usage_type_parse() {
        assert_eq!("Company".parse::<UsageType>().unwrap(), UsageType::Company);
        assert!("company".parse::<UsageType>().is_err());
        assert_eq!(UsageType::Private.to_string(), "Private");
    }
}

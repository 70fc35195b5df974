//! Relationship projector
//!
//! Renders a record together with the records on the other side of its
//! assignments, in one of two shapes:
//!
//! - flat: the relation field holds the ids of the active related records
//! - nested: the relation field holds the active related records themselves,
//!   each with its own relation field rendered flat (one level of nesting)
//!
//! Soft-deleted related records are dropped in both shapes.

use crate::core::entity::{Entity, RecordId};
use crate::core::error::{RecordError, Result};
use serde_json::Value;

/// Query value selecting the nested shape
pub const NESTED: &str = "nested";

/// Shape of the relation field in a rendered record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Flat,
    Nested,
}

impl ProjectionMode {
    /// Pick the mode from the raw `query` parameter.
    ///
    /// Only the exact string `"nested"` selects nested mode. Anything else,
    /// including absence, other casings and typos, falls back to flat.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some(NESTED) => ProjectionMode::Nested,
            _ => ProjectionMode::Flat,
        }
    }

    pub fn is_nested(self) -> bool {
        self == ProjectionMode::Nested
    }
}

/// A record that has a many-to-many relation rendered under a named field
pub trait Relational: Entity {
    /// Name of the JSON field holding the related records
    const RELATION_FIELD: &'static str;
}

/// A record together with the records on the far side of its assignments.
///
/// Related records are kept in assignment-row order and are not filtered;
/// filtering on `deleted_at` happens while projecting.
#[derive(Debug, Clone)]
pub struct Related<E, R> {
    pub record: E,
    pub related: Vec<R>,
}

impl<E, R> Related<E, R> {
    pub fn new(record: E, related: Vec<R>) -> Self {
        Self { record, related }
    }

    /// A record with nothing on the other side
    pub fn alone(record: E) -> Self {
        Self {
            record,
            related: Vec::new(),
        }
    }
}

/// Ids of the active records, in their original order
pub fn active_ids<R: Entity>(related: &[R]) -> Vec<RecordId> {
    related
        .iter()
        .filter(|r| r.is_active())
        .map(|r| r.id())
        .collect()
}

/// Serialize a record and attach its relation field
pub fn render<E: Relational>(record: &E, relation: Value) -> Result<Value> {
    let mut value = serde_json::to_value(record)?;
    let object = value.as_object_mut().ok_or_else(|| {
        RecordError::Internal(format!(
            "{} did not serialize to an object",
            E::resource_name()
        ))
    })?;
    object.insert(E::RELATION_FIELD.to_string(), relation);
    Ok(value)
}

/// Project a record and its relations in the requested shape.
///
/// The inner `related` lists of `node.related` are only read in nested mode,
/// where they supply the flat relation field of each nested record.
pub fn project<E, R>(node: &Related<E, Related<R, E>>, mode: ProjectionMode) -> Result<Value>
where
    E: Relational,
    R: Relational,
{
    let active = node.related.iter().filter(|r| r.record.is_active());

    let relation = match mode {
        ProjectionMode::Flat => Value::from(active.map(|r| r.record.id()).collect::<Vec<_>>()),
        ProjectionMode::Nested => Value::Array(
            active
                .map(|r| render(&r.record, Value::from(active_ids(&r.related))))
                .collect::<Result<Vec<_>>>()?,
        ),
    };

    render(&node.record, relation)
}

/// Project a sequence of records, preserving their order
pub fn project_all<E, R>(
    nodes: &[Related<E, Related<R, E>>],
    mode: ProjectionMode,
) -> Result<Value>
where
    E: Relational,
    R: Relational,
{
    nodes
        .iter()
        .map(|node| project(node, mode))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Timestamps;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Clone, Debug, Serialize)]
    struct Left {
        id: RecordId,
        label: &'static str,
        #[serde(flatten)]
        timestamps: Timestamps,
    }

    #[derive(Clone, Debug, Serialize)]
    struct Right {
        id: RecordId,
        #[serde(flatten)]
        timestamps: Timestamps,
    }

    macro_rules! test_entity {
        ($ty:ident, $name:literal, $field:literal) => {
            impl Entity for $ty {
                fn resource_name() -> &'static str {
                    $name
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

            impl Relational for $ty {
                const RELATION_FIELD: &'static str = $field;
            }
        };
    }

    test_entity!(Left, "left", "rights");
    test_entity!(Right, "right", "lefts");

    fn stamps() -> Timestamps {
        Timestamps {
            created_at: 100,
            modify_at: 100,
            deleted_at: None,
        }
    }

    fn left(id: RecordId) -> Left {
        Left {
            id,
            label: "l",
            timestamps: stamps(),
        }
    }

    fn right(id: RecordId, deleted: bool) -> Right {
        let mut r = Right {
            id,
            timestamps: stamps(),
        };
        if deleted {
            r.timestamps.deleted_at = Some(200);
        }
        r
    }

    fn sample() -> Related<Left, Related<Right, Left>> {
        Related::new(
            left(1),
            vec![
                Related::new(right(10, false), vec![left(1), left(2)]),
                Related::new(right(11, true), vec![left(1)]),
                Related::new(right(12, false), vec![left(1)]),
            ],
        )
    }

    #[test]
    fn test_mode_dispatch_is_literal() {
        assert_eq!(ProjectionMode::from_query(Some("nested")), ProjectionMode::Nested);
        assert_eq!(ProjectionMode::from_query(None), ProjectionMode::Flat);
        assert_eq!(ProjectionMode::from_query(Some("")), ProjectionMode::Flat);
        assert_eq!(ProjectionMode::from_query(Some("Nested")), ProjectionMode::Flat);
        assert_eq!(ProjectionMode::from_query(Some("nested ")), ProjectionMode::Flat);
        assert_eq!(ProjectionMode::from_query(Some("NOt nested")), ProjectionMode::Flat);
        assert_eq!(ProjectionMode::from_query(Some("true")), ProjectionMode::Flat);
    }

    #[test]
    fn test_flat_projection_lists_active_ids_in_order() {
        let value = project(&sample(), ProjectionMode::Flat).unwrap();
        assert_eq!(value["rights"], json!([10, 12]));
        assert_eq!(value["id"], 1);
        assert_eq!(value["label"], "l");
    }

    #[test]
    fn test_nested_projection_is_one_level_deep() {
        let value = project(&sample(), ProjectionMode::Nested).unwrap();
        let rights = value["rights"].as_array().unwrap();

        assert_eq!(rights.len(), 2);
        assert_eq!(rights[0]["id"], 10);
        assert_eq!(rights[0]["lefts"], json!([1, 2]));
        assert_eq!(rights[1]["id"], 12);
        assert_eq!(rights[1]["lefts"], json!([1]));
    }

    #[test]
    fn test_nested_drops_deleted_records_on_both_levels() {
        let mut deleted_left = left(2);
        deleted_left.timestamps.deleted_at = Some(300);

        let node = Related::new(
            left(1),
            vec![Related::new(right(10, false), vec![left(1), deleted_left])],
        );

        let value = project(&node, ProjectionMode::Nested).unwrap();
        assert_eq!(value["rights"][0]["lefts"], json!([1]));
    }

    #[test]
    fn test_nested_ids_match_flat_ids() {
        let node = sample();
        let flat = project(&node, ProjectionMode::Flat).unwrap();
        let nested = project(&node, ProjectionMode::Nested).unwrap();

        let nested_ids: Vec<Value> = nested["rights"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].clone())
            .collect();
        assert_eq!(Value::Array(nested_ids), flat["rights"]);
        assert_ne!(flat, nested);
    }

    #[test]
    fn test_projection_is_repeatable() {
        let node = sample();
        assert_eq!(
            project(&node, ProjectionMode::Flat).unwrap(),
            project(&node, ProjectionMode::Flat).unwrap()
        );
    }

    #[test]
    fn test_shapes_agree_when_nothing_is_related() {
        let node: Related<Left, Related<Right, Left>> = Related::alone(left(5));
        assert_eq!(
            project(&node, ProjectionMode::Flat).unwrap(),
            project(&node, ProjectionMode::Nested).unwrap()
        );
    }

    #[test]
    fn test_project_all_keeps_order() {
        let nodes = vec![
            Related::<Left, Related<Right, Left>>::alone(left(3)),
            Related::alone(left(1)),
        ];
        let value = project_all(&nodes, ProjectionMode::Flat).unwrap();
        assert_eq!(value[0]["id"], 3);
        assert_eq!(value[1]["id"], 1);
    }
}

//! Query parameters accepted by the list and detail endpoints

use crate::core::projection::ProjectionMode;
use serde::Deserialize;

/// Query parameters for list/detail routes
///
/// # Example
/// ```text
/// GET /auto/?query=nested      -> nested projection
/// GET /auto/?query=flat        -> flat projection
/// GET /auto/                   -> flat projection
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProjectionQuery {
    /// Raw projection selector; only `"nested"` has a meaning
    pub query: Option<String>,
}

impl ProjectionQuery {
    /// Resolve the projection mode for this request
    pub fn mode(&self) -> ProjectionMode {
        ProjectionMode::from_query(self.query.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_query_is_flat() {
        assert_eq!(ProjectionQuery::default().mode(), ProjectionMode::Flat);
    }

    #[test]
    fn test_nested_query() {
        let query = ProjectionQuery {
            query: Some("nested".to_string()),
        };
        assert_eq!(query.mode(), ProjectionMode::Nested);
    }

    #[test]
    fn test_unknown_query_is_flat() {
        let query = ProjectionQuery {
            query: Some("NOt nested".to_string()),
        };
        assert_eq!(query.mode(), ProjectionMode::Flat);
    }
}

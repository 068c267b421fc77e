//! Request DTOs for the proxy API
//!
//! Defines the query parameters accepted by the HTTP surface.

use serde::Deserialize;

/// Longest map id accepted in `?map=`.
pub const MAX_MAP_ID_LENGTH: usize = 64;

/// Query string for `GET /api/maps`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapQuery {
    /// Optional map id narrowing the response to one map
    #[serde(default)]
    pub map: Option<String>,
}

impl MapQuery {
    /// Returns the map id, treating an empty value as absent.
    pub fn map_id(&self) -> Option<&str> {
        self.map.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        let id = self.map_id()?;
        if id.len() > MAX_MAP_ID_LENGTH {
            return Some(format!(
                "Map id exceeds maximum length of {} characters",
                MAX_MAP_ID_LENGTH
            ));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Some("Map id may only contain letters, digits, '-' and '_'".to_string());
        }
        None
    }

    /// Cache key for this query.
    pub fn cache_key(&self) -> String {
        match self.map_id() {
            Some(id) => format!("arc_raiders_map_{}", id),
            None => "arc_raiders_maps".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(map: Option<&str>) -> MapQuery {
        MapQuery {
            map: map.map(String::from),
        }
    }

    #[test]
    fn test_map_query_deserialize() {
        let q: MapQuery = serde_json::from_str(r#"{"map": "dam"}"#).unwrap();
        assert_eq!(q.map_id(), Some("dam"));

        let q: MapQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.map_id(), None);
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(query(None).cache_key(), "arc_raiders_maps");
        assert_eq!(query(Some("")).cache_key(), "arc_raiders_maps");
        assert_eq!(query(Some("buried-city")).cache_key(), "arc_raiders_map_buried-city");
    }

    #[test]
    fn test_validate() {
        assert!(query(None).validate().is_none());
        assert!(query(Some("spaceport_2")).validate().is_none());
        assert!(query(Some("../items")).validate().is_some());
        assert!(query(Some("a&b=c")).validate().is_some());
        assert!(query(Some(&"x".repeat(MAX_MAP_ID_LENGTH + 1))).validate().is_some());
    }
}

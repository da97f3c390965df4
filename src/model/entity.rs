//! Business / institution listings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::null_as_default;

/// A listing that can receive reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: Uuid,
    pub name: String,
    /// Industry or category label (e.g. "Education").
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    /// Backend-maintained average of current ratings.
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_verified: bool,
}

impl Entity {
    /// Minimal entity with only a name; remaining fields empty.
    pub fn named(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            industry: None,
            description: None,
            category_tags: Vec::new(),
            keywords: Vec::new(),
            average_rating: 0.0,
            is_verified: false,
        }
    }
}

/// Filter and pagination for entity listing reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EntityQuery {
    /// Exact industry match.
    pub industry: Option<String>,
    pub verified_only: bool,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl EntityQuery {
    /// Every entity, unfiltered. Used to feed search suggestions.
    pub fn all() -> Self {
        Self::default()
    }

    /// PostgREST query parameters for this filter.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("select".to_string(), "*".to_string()),
            ("order".to_string(), "name.asc".to_string()),
        ];
        if let Some(industry) = &self.industry {
            params.push(("industry".to_string(), format!("eq.{}", industry)));
        }
        if self.verified_only {
            params.push(("is_verified".to_string(), "eq.true".to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if self.offset > 0 {
            params.push(("offset".to_string(), self.offset.to_string()));
        }
        params
    }
}

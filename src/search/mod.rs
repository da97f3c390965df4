//! Entity search for autocomplete suggestions.

pub mod ranking;

pub use ranking::{match_entity, rank_entities, rank_entities_with_limit, MatchRule, ScoredEntity};

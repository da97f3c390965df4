//! Autocomplete ranking of entities against a free-text query.
//!
//! Matching is case-insensitive substring matching over a fixed ladder of
//! fields. The first rule that matches decides the score; rules never add up.
//!
//! | Rule          | Field                 | Score |
//! |---------------|-----------------------|-------|
//! | `ExactName`   | name equals query     | 100   |
//! | `NamePrefix`  | name starts with query| 90    |
//! | `NameContains`| name contains query   | 80    |
//! | `Industry`    | industry contains     | 60    |
//! | `CategoryTag` | any tag contains      | 50    |
//! | `Keyword`     | any keyword contains  | 40    |
//! | `Description` | description contains  | 30    |

use serde::Serialize;

use crate::config::MAX_SUGGESTIONS;
use crate::model::Entity;

/// The rule that matched an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    ExactName,
    NamePrefix,
    NameContains,
    Industry,
    CategoryTag,
    Keyword,
    Description,
}

impl MatchRule {
    /// Every rule, best first. Evaluation order.
    pub const LADDER: [MatchRule; 7] = [
        MatchRule::ExactName,
        MatchRule::NamePrefix,
        MatchRule::NameContains,
        MatchRule::Industry,
        MatchRule::CategoryTag,
        MatchRule::Keyword,
        MatchRule::Description,
    ];

    /// Relevance score for this rule.
    pub fn score(self) -> u32 {
        match self {
            MatchRule::ExactName => 100,
            MatchRule::NamePrefix => 90,
            MatchRule::NameContains => 80,
            MatchRule::Industry => 60,
            MatchRule::CategoryTag => 50,
            MatchRule::Keyword => 40,
            MatchRule::Description => 30,
        }
    }

    /// Whether this rule matches `entity` for an already-lowercased query.
    fn matches(self, entity: &Entity, query: &str) -> bool {
        let contains = |text: &str| text.to_lowercase().contains(query);
        match self {
            MatchRule::ExactName => entity.name.to_lowercase() == query,
            MatchRule::NamePrefix => entity.name.to_lowercase().starts_with(query),
            MatchRule::NameContains => contains(entity.name.as_str()),
            MatchRule::Industry => entity.industry.as_deref().is_some_and(contains),
            MatchRule::CategoryTag => entity
                .category_tags
                .iter()
                .any(|tag| contains(tag.as_str())),
            MatchRule::Keyword => entity.keywords.iter().any(|kw| contains(kw.as_str())),
            MatchRule::Description => entity.description.as_deref().is_some_and(contains),
        }
    }
}

/// An entity annotated with its relevance for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEntity {
    #[serde(flatten)]
    pub entity: Entity,
    pub score: u32,
    pub rule: MatchRule,
}

/// First matching rule for `entity`, or `None` when it should be excluded.
///
/// `query` must already be trimmed and lowercased.
pub fn match_entity(entity: &Entity, query: &str) -> Option<MatchRule> {
    MatchRule::LADDER
        .into_iter()
        .find(|rule| rule.matches(entity, query))
}

/// Rank `entities` for autocomplete, returning at most five suggestions.
pub fn rank_entities(query: &str, entities: &[Entity]) -> Vec<ScoredEntity> {
    rank_entities_with_limit(query, entities, MAX_SUGGESTIONS)
}

/// Rank `entities` against `query`, keeping the best `limit`.
///
/// `limit` never exceeds [`MAX_SUGGESTIONS`]. Ties keep their input order.
/// A blank query yields nothing.
pub fn rank_entities_with_limit(
    query: &str,
    entities: &[Entity],
    limit: usize,
) -> Vec<ScoredEntity> {
    let limit = limit.min(MAX_SUGGESTIONS);
    let query = query.trim().to_lowercase();
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut matched: Vec<(MatchRule, &Entity)> = entities
        .iter()
        .filter_map(|entity| match_entity(entity, &query).map(|rule| (rule, entity)))
        .collect();

    // sort_by is stable
    matched.sort_by(|a, b| b.0.score().cmp(&a.0.score()));
    matched.truncate(limit);

    matched
        .into_iter()
        .map(|(rule, entity)| ScoredEntity {
            entity: entity.clone(),
            score: rule.score(),
            rule,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(name: &str) -> Entity {
        Entity::named(name)
    }

    fn names(results: &[ScoredEntity]) -> Vec<&str> {
        results.iter().map(|r| r.entity.name.as_str()).collect()
    }

    #[test]
    fn test_rule_scores() {
        let scores: Vec<u32> = MatchRule::LADDER.iter().map(|r| r.score()).collect();
        assert_eq!(scores, vec![100, 90, 80, 60, 50, 40, 30]);
    }

    #[test]
    fn test_exact_name_beats_description() {
        let mut described = entity("Zeta Labs");
        described.description = Some("We build acme rockets".to_string());
        let exact = entity("Acme");

        let results = rank_entities("acme", &[described, exact]);
        assert_eq!(names(&results), vec!["Acme", "Zeta Labs"]);
        assert_eq!(results[0].score, 100);
        assert_eq!(results[1].score, 30);
        assert_eq!(results[1].rule, MatchRule::Description);
    }

    #[test]
    fn test_each_rule_matches_case_insensitively() {
        let mut industry = entity("North Star");
        industry.industry = Some("Higher EDUCATION".to_string());
        let mut tagged = entity("Tagged");
        tagged.category_tags = vec!["Private University".to_string()];
        let mut keyword = entity("Keyworded");
        keyword.keywords = vec!["EdTech".to_string()];

        assert_eq!(match_entity(&industry, "edu"), Some(MatchRule::Industry));
        assert_eq!(match_entity(&tagged, "university"), Some(MatchRule::CategoryTag));
        assert_eq!(match_entity(&keyword, "edt"), Some(MatchRule::Keyword));
        assert_eq!(match_entity(&entity("EduCare"), "edu"), Some(MatchRule::NamePrefix));
        assert_eq!(match_entity(&entity("PrimeEdu"), "edu"), Some(MatchRule::NameContains));
    }

    #[test]
    fn test_first_rule_wins_without_accumulating() {
        let mut e = entity("Apollo");
        e.industry = Some("Apollo Health".to_string());
        e.keywords = vec!["apollo".to_string()];
        e.description = Some("apollo".to_string());

        let results = rank_entities("apollo", &[e]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 100);
    }

    #[test]
    fn test_missing_optional_fields_are_excluded_quietly() {
        let results = rank_entities("health", &[entity("Bare")]);
        assert!(results.is_empty());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let input = vec![entity("Alpha Bank"), entity("Beta Bank"), entity("Gamma Bank")];
        let results = rank_entities("bank", &input);
        assert_eq!(names(&results), vec!["Alpha Bank", "Beta Bank", "Gamma Bank"]);
        assert!(results.iter().all(|r| r.score == 80));
    }

    #[test]
    fn test_caps_at_five() {
        let input: Vec<Entity> = (0..7).map(|i| entity(&format!("School {}", i))).collect();
        let results = rank_entities("school", &input);
        assert_eq!(results.len(), 5);
        assert_eq!(
            names(&results),
            vec!["School 0", "School 1", "School 2", "School 3", "School 4"]
        );
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        let input = vec![entity("Anything")];
        assert!(rank_entities("", &input).is_empty());
        assert!(rank_entities("   ", &input).is_empty());
        assert!(rank_entities("\t\n", &input).is_empty());
    }

    #[test]
    fn test_query_is_trimmed() {
        let results = rank_entities("  acme ", &[entity("ACME")]);
        assert_eq!(results[0].rule, MatchRule::ExactName);
    }

    #[test]
    fn test_punctuation_is_substring_matched() {
        let results = rank_entities("& co", &[entity("Smith & Co.")]);
        assert_eq!(results[0].rule, MatchRule::NameContains);
    }

    #[test]
    fn test_custom_limit() {
        let input: Vec<Entity> = (0..4).map(|i| entity(&format!("Cafe {}", i))).collect();
        assert_eq!(rank_entities_with_limit("cafe", &input, 2).len(), 2);
        assert!(rank_entities_with_limit("cafe", &input, 0).is_empty());
    }

    #[test]
    fn test_limit_above_cap_is_clamped() {
        let input: Vec<Entity> = (0..8).map(|i| entity(&format!("School {}", i))).collect();
        let results = rank_entities_with_limit("school", &input, 8);
        assert_eq!(results.len(), MAX_SUGGESTIONS);
        assert_eq!(results[0].entity.name, "School 0");
    }

    #[test]
    fn test_idempotent() {
        let mut tagged = entity("Tagged");
        tagged.category_tags = vec!["clinic".to_string()];
        let input = vec![entity("Clinic One"), tagged, entity("City Clinic")];

        assert_eq!(rank_entities("clinic", &input), rank_entities("clinic", &input));
    }
}

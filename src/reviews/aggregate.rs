//! Collapse the review edit log into one current review per reviewer.
//!
//! Rows are grouped by (user, entity). Within a group the newest row is the
//! visible review and the whole group is kept as its edit history, newest
//! first. Groups are emitted in the order their first row appears in the
//! input, so feeding rows already ordered newest-first keeps that order.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::model::Review;

use super::display::{badge_label, display_name, verification_tag};

/// The current state of one reviewer's review of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformedReview {
    /// Newest row of the group.
    #[serde(flatten)]
    pub latest: Review,
    pub reviewer_name: String,
    pub badge: String,
    /// Review-specific tag, shown only when proof was verified.
    pub verification_tag: Option<String>,
    pub has_updates: bool,
    pub total_updates: usize,
    /// Number of rows in the group (1 for a never-edited review).
    pub update_number: usize,
    /// Every row of the group, newest first.
    pub history: Vec<Review>,
}

impl TransformedReview {
    fn from_group(mut group: Vec<Review>) -> Option<Self> {
        // stable: equal timestamps keep input order
        group.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let latest = group.first()?.clone();
        let size = group.len();

        Some(Self {
            reviewer_name: display_name(latest.profile.as_ref()),
            badge: badge_label(latest.profile.as_ref()).to_string(),
            verification_tag: verification_tag(&latest).map(str::to_string),
            has_updates: size > 1,
            total_updates: size - 1,
            update_number: size,
            history: group,
            latest,
        })
    }
}

/// One [`TransformedReview`] per distinct reviewer (per entity).
pub fn aggregate_reviews(reviews: &[Review]) -> Vec<TransformedReview> {
    let mut slots: HashMap<(Uuid, Uuid), usize> = HashMap::new();
    let mut groups: Vec<Vec<Review>> = Vec::new();

    for review in reviews {
        let key = (review.user_id, review.business_id);
        let slot = *slots.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(review.clone());
    }

    groups
        .into_iter()
        .filter_map(TransformedReview::from_group)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DisplayPreference, MainBadge, ReviewerProfile};
    use chrono::{Duration, TimeZone, Utc};

    fn review(user: Uuid, entity: Uuid, minutes: i64, content: &str) -> Review {
        Review {
            id: Uuid::new_v4(),
            user_id: user,
            business_id: entity,
            rating: 4,
            content: content.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::minutes(minutes),
            is_proof_submitted: false,
            is_verified: false,
            custom_verification_tag: None,
            proof_url: None,
            upvotes: 0,
            downvotes: 0,
            business_response: None,
            business_response_at: None,
            profile: None,
        }
    }

    #[test]
    fn test_groups_by_user_and_picks_latest() {
        let entity = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let rows = vec![
            review(a, entity, 2, "second"),
            review(b, entity, 5, "only"),
            review(a, entity, 1, "first"),
            review(a, entity, 3, "third"),
        ];

        let result = aggregate_reviews(&rows);
        assert_eq!(result.len(), 2);

        let for_a = result.iter().find(|r| r.latest.user_id == a).unwrap();
        assert_eq!(for_a.update_number, 3);
        assert_eq!(for_a.total_updates, 2);
        assert!(for_a.has_updates);
        assert_eq!(for_a.latest.content, "third");
        let history: Vec<&str> = for_a.history.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(history, vec!["third", "second", "first"]);

        let for_b = result.iter().find(|r| r.latest.user_id == b).unwrap();
        assert_eq!(for_b.update_number, 1);
        assert_eq!(for_b.total_updates, 0);
        assert!(!for_b.has_updates);
    }

    #[test]
    fn test_same_user_different_entities_stay_separate() {
        let user = Uuid::new_v4();
        let rows = vec![
            review(user, Uuid::new_v4(), 1, "clinic"),
            review(user, Uuid::new_v4(), 2, "school"),
        ];

        let result = aggregate_reviews(&rows);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.update_number == 1));
    }

    #[test]
    fn test_group_order_follows_first_appearance() {
        let entity = Uuid::new_v4();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let rows = vec![
            review(c, entity, 9, "c"),
            review(a, entity, 8, "a"),
            review(b, entity, 7, "b"),
            review(c, entity, 1, "c-old"),
        ];

        let users: Vec<Uuid> = aggregate_reviews(&rows)
            .iter()
            .map(|r| r.latest.user_id)
            .collect();
        assert_eq!(users, vec![c, a, b]);
    }

    #[test]
    fn test_display_fields_come_from_latest_row() {
        let entity = Uuid::new_v4();
        let user = Uuid::new_v4();
        let mut old = review(user, entity, 1, "old");
        old.is_proof_submitted = true;
        old.is_verified = true;
        old.custom_verification_tag = Some("Verified Employee".to_string());

        let mut new = review(user, entity, 2, "new");
        new.custom_verification_tag = Some("Verified Employee".to_string());
        new.profile = Some(ReviewerProfile {
            full_name: Some("Ravi Kumar".to_string()),
            pseudonym: Some("rk".to_string()),
            username: None,
            display_name_preference: Some(DisplayPreference::Pseudonym),
            main_badge: Some(MainBadge::Verified),
        });

        let result = aggregate_reviews(&[old, new]);
        let only = &result[0];
        assert_eq!(only.reviewer_name, "rk");
        assert_eq!(only.badge, "Verified User");
        assert_eq!(only.verification_tag, None);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_reviews(&[]).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let entity = Uuid::new_v4();
        let user = Uuid::new_v4();
        let rows = vec![
            review(user, entity, 1, "x"),
            review(user, entity, 1, "y"),
            review(Uuid::new_v4(), entity, 4, "z"),
        ];

        let first = aggregate_reviews(&rows);
        let second = aggregate_reviews(&rows);
        assert_eq!(first, second);
        assert_eq!(first[0].latest.content, "x");
    }
}

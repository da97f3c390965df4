//! Review rows, reviewer profile snapshots and votes.
//!
//! Reviews are an append-only edit log: editing a review inserts a new row for
//! the same user and entity rather than updating the old one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::null_as_default;

// ============================================================================
// Profile enums
// ============================================================================

/// Which name a reviewer wants shown next to their reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DisplayPreference {
    FullName,
    Pseudonym,
    Other(String),
}

impl From<String> for DisplayPreference {
    fn from(value: String) -> Self {
        match value.as_str() {
            "full_name" => Self::FullName,
            "pseudonym" => Self::Pseudonym,
            _ => Self::Other(value),
        }
    }
}

impl From<DisplayPreference> for String {
    fn from(value: DisplayPreference) -> Self {
        match value {
            DisplayPreference::FullName => "full_name".to_string(),
            DisplayPreference::Pseudonym => "pseudonym".to_string(),
            DisplayPreference::Other(raw) => raw,
        }
    }
}

/// Profile-level verification badge.
///
/// Only the exact string `"Verified User"` counts as verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MainBadge {
    Verified,
    Unverified,
    Other(String),
}

impl MainBadge {
    pub const VERIFIED_LABEL: &'static str = "Verified User";
    pub const UNVERIFIED_LABEL: &'static str = "Unverified User";

    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }
}

impl From<String> for MainBadge {
    fn from(value: String) -> Self {
        match value.as_str() {
            Self::VERIFIED_LABEL => Self::Verified,
            Self::UNVERIFIED_LABEL => Self::Unverified,
            _ => Self::Other(value),
        }
    }
}

impl From<MainBadge> for String {
    fn from(value: MainBadge) -> Self {
        match value {
            MainBadge::Verified => MainBadge::VERIFIED_LABEL.to_string(),
            MainBadge::Unverified => MainBadge::UNVERIFIED_LABEL.to_string(),
            MainBadge::Other(raw) => raw,
        }
    }
}

/// Snapshot of the reviewer's profile embedded in each review row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewerProfile {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub pseudonym: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name_preference: Option<DisplayPreference>,
    #[serde(default)]
    pub main_badge: Option<MainBadge>,
}

// ============================================================================
// Review
// ============================================================================

/// One row of the review log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_id: Uuid,
    /// Star rating. Nominally 1 to 5; not enforced on read.
    pub rating: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_proof_submitted: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_verified: bool,
    /// Reviewer-supplied label such as "Verified Employee".
    #[serde(default)]
    pub custom_verification_tag: Option<String>,
    #[serde(default)]
    pub proof_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub upvotes: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub downvotes: i64,
    #[serde(default)]
    pub business_response: Option<String>,
    #[serde(default)]
    pub business_response_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "profiles", alias = "profile")]
    pub profile: Option<ReviewerProfile>,
}

/// Insert payload for a new review (or a new edit of an existing one).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReview {
    pub user_id: Uuid,
    pub business_id: Uuid,
    pub rating: i32,
    pub content: String,
    pub is_proof_submitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_verification_tag: Option<String>,
}

impl NewReview {
    pub fn new(user_id: Uuid, business_id: Uuid, rating: i32, content: &str) -> Self {
        Self {
            user_id,
            business_id,
            rating,
            content: content.to_string(),
            is_proof_submitted: false,
            proof_url: None,
            custom_verification_tag: None,
        }
    }

    /// Attach proof of connection (already uploaded) and the tag it supports.
    pub fn with_proof(mut self, proof_url: &str, tag: Option<&str>) -> Self {
        self.is_proof_submitted = true;
        self.proof_url = Some(proof_url.to_string());
        self.custom_verification_tag = tag.map(str::to_string);
        self
    }
}

// ============================================================================
// Votes
// ============================================================================

/// Direction of a helpfulness vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Upvote,
    Downvote,
}

impl std::fmt::Display for VoteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upvote => write!(f, "upvote"),
            Self::Downvote => write!(f, "downvote"),
        }
    }
}

/// A user's vote on a review. At most one per (review, user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewVote {
    pub id: Uuid,
    pub review_id: Uuid,
    pub user_id: Uuid,
    pub vote_type: VoteKind,
}

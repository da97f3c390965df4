//! Typed schema for rows returned by the hosted backend.
//!
//! Payloads are validated once here, at the fetch boundary. String unions used
//! by the backend (badges, display preferences, roles, statuses) become closed
//! enums with an `Unknown` fallback so a single unexpected value does not fail
//! a whole page of results.

pub mod admin;
pub mod entity;
pub mod review;

use serde::{Deserialize, Deserializer};

pub use admin::{
    ApprovalStatus, EntityRegistration, NewVerificationRequest, RegistrationForm, UserRole,
    VerificationRequest,
};
pub use entity::{Entity, EntityQuery};
pub use review::{
    DisplayPreference, MainBadge, NewReview, Review, ReviewVote, ReviewerProfile, VoteKind,
};

/// Treat an explicit JSON `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

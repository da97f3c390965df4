//! Remote data access.
//!
//! [`Backend`] is the seam between the marketplace logic and the hosted
//! backend-as-a-service. [`RestBackend`] talks to its PostgREST-style HTTP API;
//! tests substitute in-memory implementations.

pub mod rest;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{
    ApprovalStatus, Entity, EntityQuery, EntityRegistration, NewReview, NewVerificationRequest,
    RegistrationForm, Review, ReviewVote, UserRole, VerificationRequest, VoteKind,
};

pub use rest::RestBackend;

/// Table and RPC operations the marketplace needs from the hosted backend.
///
/// Authorization is enforced remotely; implementations surface rejections as
/// [`crate::error::VerifydError::Unauthorized`].
#[async_trait]
pub trait Backend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    // --- entities ---

    async fn list_entities(&self, query: &EntityQuery) -> Result<Vec<Entity>>;

    async fn get_entity(&self, id: Uuid) -> Result<Entity>;

    // --- reviews ---

    /// Every review row for an entity, with embedded reviewer profile.
    async fn reviews_for_entity(&self, entity_id: Uuid) -> Result<Vec<Review>>;

    /// Every review row written by a user, across entities.
    async fn reviews_by_user(&self, user_id: Uuid) -> Result<Vec<Review>>;

    async fn insert_review(&self, review: &NewReview) -> Result<Review>;

    // --- votes ---

    async fn user_vote(&self, review_id: Uuid, user_id: Uuid) -> Result<Option<ReviewVote>>;

    async fn insert_vote(&self, review_id: Uuid, user_id: Uuid, kind: VoteKind)
        -> Result<ReviewVote>;

    async fn update_vote(&self, vote_id: Uuid, kind: VoteKind) -> Result<()>;

    async fn delete_vote(&self, vote_id: Uuid) -> Result<()>;

    // --- administration ---

    async fn submit_verification(
        &self,
        request: &NewVerificationRequest,
    ) -> Result<VerificationRequest>;

    async fn pending_verifications(&self) -> Result<Vec<VerificationRequest>>;

    async fn set_verification_status(
        &self,
        id: Uuid,
        status: ApprovalStatus,
        rejection_reason: Option<String>,
    ) -> Result<VerificationRequest>;

    async fn assign_role(&self, user_id: Uuid, role: UserRole) -> Result<()>;

    async fn submit_registration(
        &self,
        submitted_by: Uuid,
        form: &RegistrationForm,
    ) -> Result<EntityRegistration>;

    async fn pending_registrations(&self) -> Result<Vec<EntityRegistration>>;

    async fn set_registration_status(
        &self,
        id: Uuid,
        status: ApprovalStatus,
    ) -> Result<EntityRegistration>;
}

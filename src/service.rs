//! Marketplace facade.
//!
//! Combines a [`Backend`], the [`QueryCache`] and the pure ranking/aggregation
//! functions into the operations the client exposes. Reads are cached per
//! query; every mutation invalidates the cache topics it affects.

use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::Backend;
use crate::cache::{CacheKey, CacheTopic, QueryCache};
use crate::config::Config;
use crate::error::{Result, VerifydError};
use crate::model::{
    ApprovalStatus, Entity, EntityQuery, EntityRegistration, NewReview, NewVerificationRequest,
    RegistrationForm, Review, ReviewVote, UserRole, VerificationRequest, VoteKind,
};
use crate::reviews::{aggregate_reviews, RatingSummary, TransformedReview};
use crate::search::{rank_entities_with_limit, ScoredEntity};
use crate::validation::{validate_pan, validate_registration, validate_review};
use crate::votes::{decide_vote, VoteAction, VoteDelta};

/// Result of a vote click.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteOutcome {
    pub action: VoteAction,
    /// The user's vote after the click.
    pub current: Option<VoteKind>,
    /// Change to the review's counters, for updating a displayed tally.
    pub delta: VoteDelta,
}

/// Client-side marketplace operations over a backend.
pub struct Marketplace<B: Backend> {
    backend: B,
    cache: QueryCache,
    suggestion_limit: usize,
}

impl<B: Backend> Marketplace<B> {
    pub fn new(backend: B, config: &Config) -> Self {
        Self::with_cache(
            backend,
            QueryCache::from_config(&config.cache),
            config.search.limit(),
        )
    }

    pub fn with_cache(backend: B, cache: QueryCache, suggestion_limit: usize) -> Self {
        debug!(backend = backend.name(), ?cache, suggestion_limit, "Marketplace ready");
        Self {
            backend,
            cache,
            suggestion_limit,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Entity listing, cached per filter.
    pub async fn entities(&self, query: &EntityQuery) -> Result<Vec<Entity>> {
        let key = CacheKey::Entities(query.clone());
        if let Some(hit) = self.cache.get::<Vec<Entity>>(&key).await {
            return Ok(hit);
        }
        let entities = self.backend.list_entities(query).await?;
        debug!(count = entities.len(), "Fetched entities");
        self.cache.insert(key, entities.clone()).await;
        Ok(entities)
    }

    pub async fn entity(&self, id: Uuid) -> Result<Entity> {
        let key = CacheKey::Entity(id);
        if let Some(hit) = self.cache.get::<Entity>(&key).await {
            return Ok(hit);
        }
        let entity = self.backend.get_entity(id).await?;
        self.cache.insert(key, entity.clone()).await;
        Ok(entity)
    }

    /// Autocomplete suggestions for `query` over every entity.
    pub async fn suggestions(&self, query: &str) -> Result<Vec<ScoredEntity>> {
        self.suggestions_with_limit(query, self.suggestion_limit)
            .await
    }

    pub async fn suggestions_with_limit(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredEntity>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let entities = self.entities(&EntityQuery::all()).await?;
        Ok(rank_entities_with_limit(query, &entities, limit))
    }

    async fn raw_entity_reviews(&self, entity_id: Uuid) -> Result<Vec<Review>> {
        let key = CacheKey::EntityReviews(entity_id);
        if let Some(hit) = self.cache.get::<Vec<Review>>(&key).await {
            return Ok(hit);
        }
        let rows = self.backend.reviews_for_entity(entity_id).await?;
        debug!(%entity_id, rows = rows.len(), "Fetched entity reviews");
        self.cache.insert(key, rows.clone()).await;
        Ok(rows)
    }

    /// One current review per reviewer of `entity_id`.
    pub async fn entity_reviews(&self, entity_id: Uuid) -> Result<Vec<TransformedReview>> {
        let rows = self.raw_entity_reviews(entity_id).await?;
        Ok(aggregate_reviews(&rows))
    }

    /// One current review per entity reviewed by `user_id`.
    pub async fn user_reviews(&self, user_id: Uuid) -> Result<Vec<TransformedReview>> {
        let key = CacheKey::UserReviews(user_id);
        let rows = match self.cache.get::<Vec<Review>>(&key).await {
            Some(hit) => hit,
            None => {
                let rows = self.backend.reviews_by_user(user_id).await?;
                self.cache.insert(key, rows.clone()).await;
                rows
            }
        };
        Ok(aggregate_reviews(&rows))
    }

    /// Average and distribution over each reviewer's current review.
    pub async fn rating_summary(&self, entity_id: Uuid) -> Result<RatingSummary> {
        let current = self.entity_reviews(entity_id).await?;
        Ok(RatingSummary::from_reviews(&current))
    }

    // ------------------------------------------------------------------
    // Reviews and votes
    // ------------------------------------------------------------------

    /// Validate and store a review (or a new edit of one).
    pub async fn submit_review(&self, review: NewReview) -> Result<Review> {
        validate_review(&review)?;
        let stored = self.backend.insert_review(&review).await?;
        info!(
            review_id = %stored.id,
            entity_id = %stored.business_id,
            rating = stored.rating,
            "Review submitted"
        );
        // entity averages are recomputed remotely
        self.cache.invalidate_topic(CacheTopic::Reviews).await;
        self.cache.invalidate_topic(CacheTopic::Entities).await;
        Ok(stored)
    }

    async fn current_vote(&self, review_id: Uuid, user_id: Uuid) -> Result<Option<ReviewVote>> {
        let key = CacheKey::UserVote { review_id, user_id };
        if let Some(hit) = self.cache.get::<Option<ReviewVote>>(&key).await {
            return Ok(hit);
        }
        let vote = self.backend.user_vote(review_id, user_id).await?;
        self.cache.insert(key, vote.clone()).await;
        Ok(vote)
    }

    /// Apply a vote click: insert, remove or switch the user's vote.
    pub async fn toggle_vote(
        &self,
        review_id: Uuid,
        user_id: Uuid,
        requested: VoteKind,
    ) -> Result<VoteOutcome> {
        let existing = self.current_vote(review_id, user_id).await?;
        let action = decide_vote(existing.as_ref().map(|v| v.vote_type), requested);

        match (action, existing) {
            (VoteAction::Insert(kind), _) => {
                self.backend.insert_vote(review_id, user_id, kind).await?;
            }
            (VoteAction::Remove(_), Some(vote)) => {
                self.backend.delete_vote(vote.id).await?;
            }
            (VoteAction::Switch { to, .. }, Some(vote)) => {
                self.backend.update_vote(vote.id, to).await?;
            }
            (_, None) => {
                return Err(VerifydError::Backend(
                    "Inconsistent vote state for review".to_string(),
                ));
            }
        }

        debug!(%review_id, %user_id, ?action, "Vote toggled");
        self.cache.invalidate_topic(CacheTopic::Votes).await;
        self.cache.invalidate_topic(CacheTopic::Reviews).await;

        Ok(VoteOutcome {
            action,
            current: action.resulting_vote(),
            delta: action.delta(),
        })
    }

    // ------------------------------------------------------------------
    // Administration
    // ------------------------------------------------------------------

    /// File a PAN verification request for `user_id`.
    pub async fn submit_verification(
        &self,
        user_id: Uuid,
        pan: &str,
        full_name: &str,
    ) -> Result<VerificationRequest> {
        let pan_number = validate_pan(pan)?;
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(VerifydError::Validation(
                "Name as on PAN card is required".to_string(),
            ));
        }

        let request = NewVerificationRequest {
            user_id,
            pan_number,
            full_name: full_name.to_string(),
        };
        let stored = self.backend.submit_verification(&request).await?;
        info!(request_id = %stored.id, %user_id, "Verification requested");
        self.cache
            .invalidate_topic(CacheTopic::Verifications)
            .await;
        Ok(stored)
    }

    pub async fn pending_verifications(&self) -> Result<Vec<VerificationRequest>> {
        let key = CacheKey::PendingVerifications;
        if let Some(hit) = self.cache.get::<Vec<VerificationRequest>>(&key).await {
            return Ok(hit);
        }
        let pending = self.backend.pending_verifications().await?;
        self.cache.insert(key, pending.clone()).await;
        Ok(pending)
    }

    /// Approve, or reject with a reason, a verification request.
    pub async fn review_verification(
        &self,
        request_id: Uuid,
        approve: bool,
        rejection_reason: Option<&str>,
    ) -> Result<VerificationRequest> {
        let (status, reason) = if approve {
            (ApprovalStatus::Approved, None)
        } else {
            let reason = rejection_reason
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .ok_or_else(|| {
                    VerifydError::Validation("A rejection reason is required".to_string())
                })?;
            (ApprovalStatus::Rejected, Some(reason.to_string()))
        };

        let updated = self
            .backend
            .set_verification_status(request_id, status, reason)
            .await?;
        info!(%request_id, approve, "Verification reviewed");
        self.cache
            .invalidate_topic(CacheTopic::Verifications)
            .await;
        // badges live on profiles embedded in review rows
        self.cache.invalidate_topic(CacheTopic::Reviews).await;
        Ok(updated)
    }

    pub async fn assign_role(&self, user_id: Uuid, role: UserRole) -> Result<()> {
        self.backend.assign_role(user_id, role).await?;
        info!(%user_id, ?role, "Role assigned");
        Ok(())
    }

    /// Submit a new entity for listing.
    pub async fn register_entity(
        &self,
        submitted_by: Uuid,
        form: &RegistrationForm,
    ) -> Result<EntityRegistration> {
        validate_registration(form)?;
        let stored = self.backend.submit_registration(submitted_by, form).await?;
        info!(
            registration_id = %stored.id,
            name = %stored.form.name,
            "Entity registration submitted"
        );
        self.cache
            .invalidate_topic(CacheTopic::Registrations)
            .await;
        Ok(stored)
    }

    pub async fn pending_registrations(&self) -> Result<Vec<EntityRegistration>> {
        let key = CacheKey::PendingRegistrations;
        if let Some(hit) = self.cache.get::<Vec<EntityRegistration>>(&key).await {
            return Ok(hit);
        }
        let pending = self.backend.pending_registrations().await?;
        self.cache.insert(key, pending.clone()).await;
        Ok(pending)
    }

    /// Approve or reject a pending registration.
    pub async fn review_registration(
        &self,
        registration_id: Uuid,
        approve: bool,
    ) -> Result<EntityRegistration> {
        let status = if approve {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Rejected
        };
        let updated = self
            .backend
            .set_registration_status(registration_id, status)
            .await?;
        info!(%registration_id, approve, "Entity registration reviewed");
        self.cache
            .invalidate_topic(CacheTopic::Registrations)
            .await;
        if approve {
            self.cache.invalidate_topic(CacheTopic::Entities).await;
        }
        Ok(updated)
    }
}

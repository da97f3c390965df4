//! PostgREST-style HTTP backend.
//!
//! Tables live under `{url}/rest/v1/{table}` and stored procedures under
//! `{url}/rest/v1/rpc/{name}`. Every request carries the project's anon key as
//! `apikey` and a bearer token (the signed-in user's JWT, or the anon key).

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::BackendConfig;
use crate::error::{Result, VerifydError};
use crate::model::{
    ApprovalStatus, Entity, EntityQuery, EntityRegistration, NewReview, NewVerificationRequest,
    RegistrationForm, Review, ReviewVote, UserRole, VerificationRequest, VoteKind,
};

use super::Backend;

const USER_AGENT: &str = concat!("verifyd/", env!("CARGO_PKG_VERSION"));

const ENTITIES_TABLE: &str = "businesses";
const REVIEWS_TABLE: &str = "reviews";
const VOTES_TABLE: &str = "review_votes";
const VERIFICATIONS_TABLE: &str = "verification_requests";
const REGISTRATIONS_TABLE: &str = "entity_registrations";
const ASSIGN_ROLE_RPC: &str = "assign_user_role";

/// Review select with the reviewer profile embedded.
const REVIEW_SELECT: &str =
    "*,profiles(full_name,pseudonym,username,display_name_preference,main_badge)";

type Params = Vec<(String, String)>;

fn param(key: &str, value: impl Into<String>) -> (String, String) {
    (key.to_string(), value.into())
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

/// Backend reached over HTTPS.
pub struct RestBackend {
    client: Client,
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            access_token: config.access_token.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn rpc_url(&self, name: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, name)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let token = self.access_token.as_deref().unwrap_or(&self.anon_key);
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header("Accept", "application/json")
            .bearer_auth(token)
    }

    async fn select<T: DeserializeOwned>(&self, table: &str, params: &Params) -> Result<Vec<T>> {
        debug!(table, ?params, "Backend select");
        let response = self
            .request(Method::GET, &self.table_url(table))
            .query(params)
            .send()
            .await?;
        read_json(response).await
    }

    /// Insert one row and return it as stored.
    async fn insert<B, T>(&self, table: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!(table, "Backend insert");
        let response = self
            .request(Method::POST, &self.table_url(table))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        first_row(read_json(response).await?, table)
    }

    /// Patch rows matching `filters` and return the first updated row.
    async fn update<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &Params,
        body: &Value,
    ) -> Result<T> {
        debug!(table, ?filters, "Backend update");
        let response = self
            .request(Method::PATCH, &self.table_url(table))
            .header("Prefer", "return=representation")
            .query(filters)
            .json(body)
            .send()
            .await?;
        first_row(read_json(response).await?, table)
    }

    async fn delete(&self, table: &str, filters: &Params) -> Result<()> {
        debug!(table, ?filters, "Backend delete");
        let response = self
            .request(Method::DELETE, &self.table_url(table))
            .query(filters)
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }

    async fn rpc(&self, name: &str, body: &Value) -> Result<()> {
        debug!(rpc = name, "Backend rpc");
        let response = self
            .request(Method::POST, &self.rpc_url(name))
            .json(body)
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }
}

/// Pull a human-readable message out of an error body.
fn error_detail(body: &str) -> String {
    let body = body.trim();
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error_description"))
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

fn status_error(status: StatusCode, detail: String) -> VerifydError {
    let message = if detail.is_empty() {
        status.to_string()
    } else {
        format!("{} ({})", status, detail)
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => VerifydError::Unauthorized(message),
        StatusCode::NOT_FOUND => VerifydError::NotFound(message),
        _ => VerifydError::Backend(message),
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!(%status, "Backend request failed");
    Err(status_error(status, error_detail(&body)))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| VerifydError::Backend(format!("Malformed response payload: {}", e)))
}

fn first_row<T>(rows: Vec<T>, table: &str) -> Result<T> {
    rows.into_iter()
        .next()
        .ok_or_else(|| VerifydError::NotFound(format!("No matching row in {}", table)))
}

fn review_params(filter_column: &str, id: Uuid) -> Params {
    vec![
        param("select", REVIEW_SELECT),
        param(filter_column, eq(id)),
        param("order", "created_at.desc"),
    ]
}

fn pending_params() -> Params {
    vec![
        param("select", "*"),
        param("status", "eq.pending"),
        param("order", "created_at.asc"),
    ]
}

#[async_trait]
impl Backend for RestBackend {
    fn name(&self) -> &str {
        "rest"
    }

    async fn list_entities(&self, query: &EntityQuery) -> Result<Vec<Entity>> {
        self.select(ENTITIES_TABLE, &query.to_params()).await
    }

    async fn get_entity(&self, id: Uuid) -> Result<Entity> {
        let params = vec![param("select", "*"), param("id", eq(id)), param("limit", "1")];
        let rows = self.select(ENTITIES_TABLE, &params).await?;
        first_row(rows, ENTITIES_TABLE)
    }

    async fn reviews_for_entity(&self, entity_id: Uuid) -> Result<Vec<Review>> {
        self.select(REVIEWS_TABLE, &review_params("business_id", entity_id))
            .await
    }

    async fn reviews_by_user(&self, user_id: Uuid) -> Result<Vec<Review>> {
        self.select(REVIEWS_TABLE, &review_params("user_id", user_id))
            .await
    }

    async fn insert_review(&self, review: &NewReview) -> Result<Review> {
        self.insert(REVIEWS_TABLE, review).await
    }

    async fn user_vote(&self, review_id: Uuid, user_id: Uuid) -> Result<Option<ReviewVote>> {
        let params = vec![
            param("select", "*"),
            param("review_id", eq(review_id)),
            param("user_id", eq(user_id)),
            param("limit", "1"),
        ];
        let rows: Vec<ReviewVote> = self.select(VOTES_TABLE, &params).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_vote(
        &self,
        review_id: Uuid,
        user_id: Uuid,
        kind: VoteKind,
    ) -> Result<ReviewVote> {
        let body = json!({ "review_id": review_id, "user_id": user_id, "vote_type": kind });
        self.insert(VOTES_TABLE, &body).await
    }

    async fn update_vote(&self, vote_id: Uuid, kind: VoteKind) -> Result<()> {
        let _: ReviewVote = self
            .update(
                VOTES_TABLE,
                &vec![param("id", eq(vote_id))],
                &json!({ "vote_type": kind }),
            )
            .await?;
        Ok(())
    }

    async fn delete_vote(&self, vote_id: Uuid) -> Result<()> {
        self.delete(VOTES_TABLE, &vec![param("id", eq(vote_id))])
            .await
    }

    async fn submit_verification(
        &self,
        request: &NewVerificationRequest,
    ) -> Result<VerificationRequest> {
        self.insert(VERIFICATIONS_TABLE, request).await
    }

    async fn pending_verifications(&self) -> Result<Vec<VerificationRequest>> {
        self.select(VERIFICATIONS_TABLE, &pending_params()).await
    }

    async fn set_verification_status(
        &self,
        id: Uuid,
        status: ApprovalStatus,
        rejection_reason: Option<String>,
    ) -> Result<VerificationRequest> {
        let body = json!({
            "status": status,
            "rejection_reason": rejection_reason,
            "reviewed_at": Utc::now(),
        });
        self.update(VERIFICATIONS_TABLE, &vec![param("id", eq(id))], &body)
            .await
    }

    async fn assign_role(&self, user_id: Uuid, role: UserRole) -> Result<()> {
        self.rpc(
            ASSIGN_ROLE_RPC,
            &json!({ "target_user_id": user_id, "new_role": role }),
        )
        .await
    }

    async fn submit_registration(
        &self,
        submitted_by: Uuid,
        form: &RegistrationForm,
    ) -> Result<EntityRegistration> {
        let mut body = serde_json::to_value(form)?;
        if let Some(fields) = body.as_object_mut() {
            fields.insert("submitted_by".to_string(), json!(submitted_by));
            fields.insert("status".to_string(), json!(ApprovalStatus::Pending));
        }
        self.insert(REGISTRATIONS_TABLE, &body).await
    }

    async fn pending_registrations(&self) -> Result<Vec<EntityRegistration>> {
        self.select(REGISTRATIONS_TABLE, &pending_params()).await
    }

    async fn set_registration_status(
        &self,
        id: Uuid,
        status: ApprovalStatus,
    ) -> Result<EntityRegistration> {
        self.update(
            REGISTRATIONS_TABLE,
            &vec![param("id", eq(id))],
            &json!({ "status": status }),
        )
        .await
    }
}

//! Administrative records: roles, PAN verification requests, entity
//! registrations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assignable to a user by an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Moderator,
    User,
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "moderator" => Ok(Self::Moderator),
            "user" => Ok(Self::User),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// Workflow state shared by verification requests and entity registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    Other(String),
}

impl From<String> for ApprovalStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            _ => Self::Other(value),
        }
    }
}

impl From<ApprovalStatus> for String {
    fn from(value: ApprovalStatus) -> Self {
        match value {
            ApprovalStatus::Pending => "pending".to_string(),
            ApprovalStatus::Approved => "approved".to_string(),
            ApprovalStatus::Rejected => "rejected".to_string(),
            ApprovalStatus::Other(raw) => raw,
        }
    }
}

/// PAN-based identity verification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pan_number: String,
    /// Name as printed on the PAN card.
    pub full_name: String,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// Insert payload for a verification request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewVerificationRequest {
    pub user_id: Uuid,
    pub pan_number: String,
    pub full_name: String,
}

/// Fields a user fills in to list a new entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub contact_email: String,
    #[serde(default)]
    pub website: Option<String>,
}

/// A submitted entity registration awaiting administrator review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRegistration {
    pub id: Uuid,
    pub submitted_by: Uuid,
    #[serde(flatten)]
    pub form: RegistrationForm,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_parse() {
        assert_eq!("Admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(" user ".parse::<UserRole>().unwrap(), UserRole::User);
        assert!("owner".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_registration_row_flattens_form() {
        let row: EntityRegistration = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "submitted_by": Uuid::new_v4(),
            "name": "City Clinic",
            "contact_email": "desk@cityclinic.in",
            "status": "pending",
            "created_at": "2024-05-01T08:00:00Z"
        }))
        .unwrap();

        assert_eq!(row.form.name, "City Clinic");
        assert!(row.form.website.is_none());
        assert_eq!(row.status, ApprovalStatus::Pending);
    }

    #[test]
    fn test_unknown_status_round_trips() {
        let status: ApprovalStatus = serde_json::from_value(json!("on_hold")).unwrap();
        assert_eq!(status, ApprovalStatus::Other("on_hold".to_string()));
        assert_eq!(serde_json::to_value(status).unwrap(), json!("on_hold"));
    }
}

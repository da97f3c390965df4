//! Form validation for user-submitted data.
//!
//! Runs before anything is sent to the backend so users get a precise message
//! instead of a generic row-level-security rejection.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;

use crate::error::{Result, VerifydError};
use crate::model::{NewReview, RegistrationForm};

pub const MIN_REVIEW_CHARS: usize = 10;
pub const MAX_REVIEW_CHARS: usize = 2000;
pub const MAX_ENTITY_NAME_CHARS: usize = 120;

/// Five letters, four digits, one letter.
static PAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").unwrap());

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

fn invalid(message: impl Into<String>) -> VerifydError {
    VerifydError::Validation(message.into())
}

/// Parse an http(s) URL.
fn validate_http_url(raw: &str, field: &str) -> Result<()> {
    let url = Url::parse(raw.trim())
        .map_err(|_| invalid(format!("{} must be a valid URL", field)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!(
            "{} must use http or https, not '{}'",
            field, other
        ))),
    }
}

/// Check a review before insert.
pub fn validate_review(review: &NewReview) -> Result<()> {
    if !(1..=5).contains(&review.rating) {
        return Err(invalid("Rating must be between 1 and 5 stars"));
    }

    let length = review.content.trim().chars().count();
    if length < MIN_REVIEW_CHARS {
        return Err(invalid(format!(
            "Review must be at least {} characters",
            MIN_REVIEW_CHARS
        )));
    }
    if length > MAX_REVIEW_CHARS {
        return Err(invalid(format!(
            "Review must be at most {} characters",
            MAX_REVIEW_CHARS
        )));
    }

    if let Some(proof) = &review.proof_url {
        validate_http_url(proof, "Proof link")?;
    }
    Ok(())
}

/// Normalise and check a PAN. Returns the uppercase, space-free form.
pub fn validate_pan(raw: &str) -> Result<String> {
    let pan: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if pan.is_empty() {
        return Err(invalid("PAN number is required"));
    }
    if !PAN_RE.is_match(&pan) {
        return Err(invalid(
            "PAN must be 10 characters: 5 letters, 4 digits, 1 letter (e.g. ABCDE1234F)",
        ));
    }
    Ok(pan)
}

/// Check an entity registration form.
pub fn validate_registration(form: &RegistrationForm) -> Result<()> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(invalid("Name is required"));
    }
    if name.chars().count() > MAX_ENTITY_NAME_CHARS {
        return Err(invalid(format!(
            "Name must be at most {} characters",
            MAX_ENTITY_NAME_CHARS
        )));
    }

    if !EMAIL_RE.is_match(form.contact_email.trim()) {
        return Err(invalid("Contact email is not valid"));
    }

    if let Some(website) = form.website.as_deref().filter(|w| !w.trim().is_empty()) {
        validate_http_url(website, "Website")?;
    }
    Ok(())
}

//! Reviewer name and badge resolution.

use crate::model::{DisplayPreference, MainBadge, Review, ReviewerProfile};

/// Shown when a profile has no usable name.
pub const ANONYMOUS: &str = "Anonymous";

/// Non-blank value of an optional profile field.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Name to show next to a review.
///
/// Order: pseudonym when preferred, full name when preferred, any full name,
/// username, then [`ANONYMOUS`].
pub fn display_name(profile: Option<&ReviewerProfile>) -> String {
    let Some(profile) = profile else {
        return ANONYMOUS.to_string();
    };

    let preferred = match profile.display_name_preference {
        Some(DisplayPreference::Pseudonym) => present(&profile.pseudonym),
        Some(DisplayPreference::FullName) => present(&profile.full_name),
        _ => None,
    };

    preferred
        .or_else(|| present(&profile.full_name))
        .or_else(|| present(&profile.username))
        .unwrap_or(ANONYMOUS)
        .to_string()
}

/// "Verified User" for exactly that main badge, "Unverified User" otherwise.
pub fn badge_label(profile: Option<&ReviewerProfile>) -> &'static str {
    match profile.and_then(|p| p.main_badge.as_ref()) {
        Some(badge) if badge.is_verified() => MainBadge::VERIFIED_LABEL,
        _ => MainBadge::UNVERIFIED_LABEL,
    }
}

/// Review-specific tag, only once proof was both submitted and verified.
pub fn verification_tag(review: &Review) -> Option<&str> {
    if review.is_proof_submitted && review.is_verified {
        present(&review.custom_verification_tag)
    } else {
        None
    }
}

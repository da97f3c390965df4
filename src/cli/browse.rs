//! Read-only commands: search suggestions, reviews, rating stats.

use anyhow::{Context, Result};
use uuid::Uuid;

use verifyd::config::MAX_SUGGESTIONS;
use verifyd::reviews::{RatingSummary, TransformedReview};
use verifyd::ScoredEntity;

use super::common::connect;

const BAR_WIDTH: u32 = 20;

pub(crate) async fn cmd_search(query: &str, limit: Option<usize>) -> Result<()> {
    let market = connect()?;
    let suggestions = match limit {
        Some(n) => {
            market
                .suggestions_with_limit(query, n.clamp(1, MAX_SUGGESTIONS))
                .await
        }
        None => market.suggestions(query).await,
    }
    .with_context(|| format!("Search for '{}' failed", query))?;

    println!("{}", format_suggestions(query, &suggestions));
    Ok(())
}

pub(crate) async fn cmd_reviews(entity_id: Uuid, json: bool) -> Result<()> {
    let market = connect()?;
    let reviews = market
        .entity_reviews(entity_id)
        .await
        .with_context(|| format!("Failed to load reviews for {}", entity_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reviews)?);
    } else {
        println!("{}", format_reviews(&reviews));
    }
    Ok(())
}

pub(crate) async fn cmd_stats(entity_id: Uuid, json: bool) -> Result<()> {
    let market = connect()?;
    let summary = market
        .rating_summary(entity_id)
        .await
        .with_context(|| format!("Failed to load ratings for {}", entity_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", format_summary(&summary));
    }
    Ok(())
}

fn format_suggestions(query: &str, suggestions: &[ScoredEntity]) -> String {
    if suggestions.is_empty() {
        return format!("No matches for '{}'.", query.trim());
    }

    let mut out = String::new();
    for (index, s) in suggestions.iter().enumerate() {
        let verified = if s.entity.is_verified { " ✓" } else { "" };
        out.push_str(&format!(
            "{}. {}{} [{}]\n",
            index + 1,
            s.entity.name,
            verified,
            s.score
        ));
        if let Some(industry) = &s.entity.industry {
            out.push_str(&format!("   {}\n", industry));
        }
        out.push_str(&format!("   id: {}\n", s.entity.id));
    }
    out.trim_end().to_string()
}

fn stars(rating: i32) -> String {
    let filled = rating.clamp(0, 5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn format_reviews(reviews: &[TransformedReview]) -> String {
    if reviews.is_empty() {
        return "No reviews yet.".to_string();
    }

    let mut out = String::new();
    for review in reviews {
        out.push_str(&format!(
            "{} {} ({})",
            stars(review.latest.rating),
            review.reviewer_name,
            review.badge
        ));
        if let Some(tag) = &review.verification_tag {
            out.push_str(&format!(" [{}]", tag));
        }
        out.push('\n');
        out.push_str(&format!(
            "  {}  +{} / -{}",
            review.latest.created_at.format("%Y-%m-%d"),
            review.latest.upvotes,
            review.latest.downvotes
        ));
        if review.has_updates {
            out.push_str(&format!("  (edited {}x)", review.total_updates));
        }
        out.push('\n');
        out.push_str(&format!("  {}\n", review.latest.content.trim()));
        if let Some(response) = &review.latest.business_response {
            out.push_str(&format!("  ↳ Response: {}\n", response.trim()));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn format_summary(summary: &RatingSummary) -> String {
    let mut out = format!(
        "Average {:.1} from {} reviewer{}\n",
        summary.average,
        summary.total,
        if summary.total == 1 { "" } else { "s" }
    );
    for bucket in &summary.distribution {
        let width = (bucket.percentage * BAR_WIDTH / 100) as usize;
        out.push_str(&format!(
            "{} ★ {:<20} {:>3}% ({})\n",
            bucket.stars,
            "█".repeat(width),
            bucket.percentage,
            bucket.count
        ));
    }
    out.trim_end().to_string()
}

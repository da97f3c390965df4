//! Review projections for display: one current review per reviewer, display
//! names and badges, and rating statistics.

pub mod aggregate;
pub mod display;
pub mod distribution;

pub use aggregate::{aggregate_reviews, TransformedReview};
pub use display::{badge_label, display_name, verification_tag, ANONYMOUS};
pub use distribution::{average_rating, rating_distribution, Rated, RatingBucket, RatingSummary};

//! Star-rating distribution and summary statistics.

use serde::Serialize;

use crate::model::Review;

use super::aggregate::TransformedReview;

/// Anything carrying a star rating.
pub trait Rated {
    fn rating(&self) -> i32;
}

impl Rated for i32 {
    fn rating(&self) -> i32 {
        *self
    }
}

impl Rated for Review {
    fn rating(&self) -> i32 {
        self.rating
    }
}

impl Rated for TransformedReview {
    fn rating(&self) -> i32 {
        self.latest.rating
    }
}

/// One bar of the distribution chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingBucket {
    pub stars: u8,
    pub count: usize,
    /// Whole-number share of all input reviews.
    pub percentage: u32,
}

/// Buckets for 5, 4, 3, 2, 1 stars, in that order.
///
/// Ratings outside 1..=5 are not counted in any bucket but still count toward
/// the total. An empty input gives zero everywhere.
pub fn rating_distribution<T: Rated>(reviews: &[T]) -> [RatingBucket; 5] {
    let mut counts = [0usize; 5];
    for review in reviews {
        if let rating @ 1..=5 = review.rating() {
            counts[(rating - 1) as usize] += 1;
        }
    }

    let total = reviews.len();
    let mut buckets = [RatingBucket {
        stars: 0,
        count: 0,
        percentage: 0,
    }; 5];

    for (slot, stars) in (1..=5u8).rev().enumerate() {
        let count = counts[(stars - 1) as usize];
        buckets[slot] = RatingBucket {
            stars,
            count,
            percentage: percentage(count, total),
        };
    }
    buckets
}

fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}

/// Average of in-range ratings, or `0.0` when there are none.
pub fn average_rating<T: Rated>(reviews: &[T]) -> f64 {
    let valid: Vec<i32> = reviews
        .iter()
        .map(Rated::rating)
        .filter(|r| (1..=5).contains(r))
        .collect();
    if valid.is_empty() {
        return 0.0;
    }
    valid.iter().map(|&r| f64::from(r)).sum::<f64>() / valid.len() as f64
}

/// Headline numbers shown above an entity's reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub average: f64,
    pub total: usize,
    pub distribution: [RatingBucket; 5],
}

impl RatingSummary {
    pub fn from_reviews<T: Rated>(reviews: &[T]) -> Self {
        Self {
            average: average_rating(reviews),
            total: reviews.len(),
            distribution: rating_distribution(reviews),
        }
    }
}

//! Verifyd - client library for the Verifyd Trust reviews marketplace
//!
//! Entity search suggestions, review aggregation and rating statistics over
//! data fetched from the hosted backend, plus the review, vote and
//! administration operations the client performs against it.

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod reviews;
pub mod search;
pub mod service;
pub mod validation;
pub mod votes;

pub use config::Config;
pub use error::{Result, VerifydError};
pub use reviews::{aggregate_reviews, rating_distribution, TransformedReview};
pub use search::{rank_entities, ScoredEntity};
pub use service::Marketplace;

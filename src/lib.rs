//! Recommendation core for the campus cafe ordering app.
//!
//! The central piece is [`RecommendationResolver`], a tiered fallback
//! pipeline: order history first, then collaborative-model scores, then
//! popularity, always returning a usable (possibly empty) ranked list with
//! a provenance tag naming the tier that produced it.

pub mod adapters;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use adapters::{AdapterSet, ModelStack};
pub use config::ResolverConfig;
pub use error::{AdapterError, Result};
pub use models::{Provenance, RankedRecommendations};
pub use services::RecommendationResolver;

pub mod classify;
pub mod resolver;

pub use resolver::RecommendationResolver;

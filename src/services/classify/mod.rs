//! Capability interfaces for the feedback-sentiment and visual-search
//! classifiers. The serving layer codes against these traits; the trained
//! models behind them are external, and the recommendation resolver does
//! not depend on this module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// Map the trained classifier's output class to a label. Class order
    /// is fixed by the training pipeline: 0=negative, 1=neutral,
    /// 2=positive.
    pub fn from_class_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Sentiment::Negative),
            1 => Some(Sentiment::Neutral),
            2 => Some(Sentiment::Positive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Positive => "positive",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentPrediction {
    pub sentiment: Sentiment,
    pub confidence: f32,
}

/// Menu-category prediction for an uploaded food photo. `all_scores` is
/// sorted by confidence descending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPrediction {
    pub category: String,
    pub confidence: f32,
    pub all_scores: Vec<(String, f32)>,
}

#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify_text(&self, comment: &str) -> Result<SentimentPrediction>;
}

#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify_image(&self, image: &[u8]) -> Result<CategoryPrediction>;
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog entry. `name` is the join key across the catalog, the
/// transaction store, and the model vocabulary; `id` is storage identity
/// and only used to resolve feedback references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub is_available: bool,
    /// 0.0 means no reviews yet.
    pub average_rating: f64,
    pub review_count: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Only terminal-success orders count as purchase evidence.
    pub fn counts_as_history(&self) -> bool {
        matches!(self, OrderStatus::Ready | OrderStatus::Completed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub order_id: Uuid,
    pub user_id: String,
    pub item_name: String,
    pub status: OrderStatus,
}

/// Feedback references items by storage id, not name; the transaction
/// store joins it to a name through the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub user_id: String,
    pub item_id: Uuid,
    /// 1..=5
    pub rating: u8,
    pub rated_at: DateTime<Utc>,
}

/// Which tier produced the final list. The primary observability signal
/// for diagnosing degraded behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    Personalized,
    MlModel,
    PopularColdStart,
    None,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Personalized => "personalized",
            Provenance::MlModel => "ml_model",
            Provenance::PopularColdStart => "popular_cold_start",
            Provenance::None => "none",
        }
    }
}

/// Ranked item names plus the tier that produced them. Built fresh per
/// request, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedRecommendations {
    pub items: Vec<String>,
    pub provenance: Provenance,
}

impl RankedRecommendations {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            provenance: Provenance::None,
        }
    }

    pub fn new(items: Vec<String>, provenance: Provenance) -> Self {
        Self { items, provenance }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_terminal_success_statuses_count() {
        assert!(OrderStatus::Completed.counts_as_history());
        assert!(OrderStatus::Ready.counts_as_history());
        assert!(!OrderStatus::Pending.counts_as_history());
        assert!(!OrderStatus::Preparing.counts_as_history());
        assert!(!OrderStatus::Cancelled.counts_as_history());
    }

    #[test]
    fn provenance_labels() {
        assert_eq!(Provenance::Personalized.as_str(), "personalized");
        assert_eq!(Provenance::None.as_str(), "none");
    }
}

pub mod encoder;
pub mod memory;
pub mod model;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::MenuItem;

pub use encoder::LabelVocabulary;
pub use memory::{InMemoryCatalog, InMemoryTransactionStore};
pub use model::EmbeddingModel;

/// Read-only query surface over orders and feedback.
///
/// Both operations are idempotent and side-effect-free. Implementations
/// catch malformed or unknown user identifiers and surface them as empty
/// results so the resolver's fallback logic stays uniform.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Item names from the user's terminal-success orders, duplicates
    /// preserved (purchase frequency is signal).
    async fn purchase_history(&self, user_id: &str) -> Result<Vec<String>>;

    /// The user's current rating per item name, 1..=5. Feedback whose
    /// referenced item no longer exists in the catalog is dropped.
    async fn ratings(&self, user_id: &str) -> Result<HashMap<String, u8>>;
}

/// Filtered, sorted views over the item catalog.
///
/// Every query implicitly filters to `is_available == true` and returns at
/// most `limit` items, fewer if the filtered set is smaller.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Items whose name is in `names`, sorted by average_rating desc then
    /// review_count desc.
    async fn find_by_names(&self, names: &[String], limit: usize) -> Result<Vec<MenuItem>>;

    /// Reviewed items (`average_rating > 0`) in any of `categories`,
    /// excluding `exclude` by name, sorted by average_rating desc then
    /// review_count desc.
    async fn by_category_rated(
        &self,
        categories: &HashSet<String>,
        exclude: &HashSet<String>,
        limit: usize,
    ) -> Result<Vec<MenuItem>>;

    /// Items in any of `categories` at any rating, excluding `exclude`,
    /// sorted by created_at desc.
    async fn by_category_recent(
        &self,
        categories: &HashSet<String>,
        exclude: &HashSet<String>,
        limit: usize,
    ) -> Result<Vec<MenuItem>>;

    /// Any item not in `exclude`, sorted by average_rating desc then
    /// review_count desc.
    async fn any_available(&self, exclude: &HashSet<String>, limit: usize)
        -> Result<Vec<MenuItem>>;

    /// Reviewed items sorted by average_rating desc then review_count desc.
    async fn popular(&self, limit: usize) -> Result<Vec<MenuItem>>;

    /// Unreviewed items (`average_rating == 0`) sorted by created_at desc.
    async fn recent_unreviewed(&self, limit: usize) -> Result<Vec<MenuItem>>;

    /// Storage-id to name lookup, used to join feedback records to items.
    /// `None` when the item no longer exists.
    async fn name_of(&self, item_id: Uuid) -> Result<Option<String>>;
}

/// A categorical encoder fitted at training time: opaque entity ids to
/// dense indices and back. Out-of-vocabulary ids report unknown rather
/// than erroring; callers that need to branch check `known` first.
pub trait EntityEncoder: Send + Sync {
    fn known(&self, id: &str) -> bool;
    fn encode(&self, id: &str) -> Option<usize>;
    fn decode(&self, index: usize) -> Option<&str>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trained collaborative-filtering scorer. Scoring covers the entire item
/// vocabulary and may be slow; callers at the system boundary own request
/// timeouts.
pub trait CollaborativeModel: Send + Sync {
    fn num_items(&self) -> usize;

    /// One score per item index, aligned with the item encoder's order.
    fn score_all_items(&self, user_index: usize) -> Result<Vec<f32>>;
}

/// Encoder pair plus scorer. Present as a unit or not at all: scoring is
/// meaningless without both vocabularies.
#[derive(Clone)]
pub struct ModelStack {
    pub users: Arc<dyn EntityEncoder>,
    pub items: Arc<dyn EntityEncoder>,
    pub scorer: Arc<dyn CollaborativeModel>,
}

/// Which backends this deployment actually has. Built once at process
/// start and handed to the resolver; the set of present adapters selects
/// which tiers can run.
#[derive(Clone, Default)]
pub struct AdapterSet {
    pub transactions: Option<Arc<dyn TransactionStore>>,
    pub catalog: Option<Arc<dyn Catalog>>,
    pub model: Option<ModelStack>,
}

impl AdapterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transactions(mut self, store: Arc<dyn TransactionStore>) -> Self {
        self.transactions = Some(store);
        self
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_model(mut self, model: ModelStack) -> Self {
        self.model = Some(model);
        self
    }
}

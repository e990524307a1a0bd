use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::{Catalog, TransactionStore};
use crate::error::Result;
use crate::models::{FeedbackRecord, MenuItem, PurchaseRecord};

/// Catalog backed by an in-process snapshot. Read-only after construction,
/// so concurrent resolver invocations share it behind an `Arc` with no
/// locking.
pub struct InMemoryCatalog {
    items: Vec<MenuItem>,
}

fn rating_desc(a: &MenuItem, b: &MenuItem) -> Ordering {
    b.average_rating
        .partial_cmp(&a.average_rating)
        .unwrap_or(Ordering::Equal)
        .then(b.review_count.cmp(&a.review_count))
}

fn recency_desc(a: &MenuItem, b: &MenuItem) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

impl InMemoryCatalog {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    fn query<F>(&self, filter: F, sort: fn(&MenuItem, &MenuItem) -> Ordering, limit: usize) -> Vec<MenuItem>
    where
        F: Fn(&MenuItem) -> bool,
    {
        let mut hits: Vec<MenuItem> = self
            .items
            .iter()
            .filter(|&i| i.is_available && filter(i))
            .cloned()
            .collect();
        hits.sort_by(|a, b| sort(a, b));
        hits.truncate(limit);
        hits
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn find_by_names(&self, names: &[String], limit: usize) -> Result<Vec<MenuItem>> {
        let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
        Ok(self.query(|i| wanted.contains(i.name.as_str()), rating_desc, limit))
    }

    async fn by_category_rated(
        &self,
        categories: &HashSet<String>,
        exclude: &HashSet<String>,
        limit: usize,
    ) -> Result<Vec<MenuItem>> {
        Ok(self.query(
            |i| {
                categories.contains(&i.category)
                    && !exclude.contains(&i.name)
                    && i.average_rating > 0.0
            },
            rating_desc,
            limit,
        ))
    }

    async fn by_category_recent(
        &self,
        categories: &HashSet<String>,
        exclude: &HashSet<String>,
        limit: usize,
    ) -> Result<Vec<MenuItem>> {
        Ok(self.query(
            |i| categories.contains(&i.category) && !exclude.contains(&i.name),
            recency_desc,
            limit,
        ))
    }

    async fn any_available(
        &self,
        exclude: &HashSet<String>,
        limit: usize,
    ) -> Result<Vec<MenuItem>> {
        Ok(self.query(|i| !exclude.contains(&i.name), rating_desc, limit))
    }

    async fn popular(&self, limit: usize) -> Result<Vec<MenuItem>> {
        Ok(self.query(|i| i.average_rating > 0.0, rating_desc, limit))
    }

    async fn recent_unreviewed(&self, limit: usize) -> Result<Vec<MenuItem>> {
        Ok(self.query(|i| i.average_rating == 0.0, recency_desc, limit))
    }

    async fn name_of(&self, item_id: Uuid) -> Result<Option<String>> {
        // Unlike the recommendation queries, this join must see
        // unavailable items too: an 86'd dish still has valid feedback.
        Ok(self
            .items
            .iter()
            .find(|i| i.id == item_id)
            .map(|i| i.name.clone()))
    }
}

/// Order/feedback store backed by in-process records. Feedback references
/// items by storage id and is joined to names through the catalog.
pub struct InMemoryTransactionStore {
    orders: Vec<PurchaseRecord>,
    feedback: Vec<FeedbackRecord>,
    catalog: Arc<dyn Catalog>,
}

impl InMemoryTransactionStore {
    pub fn new(
        orders: Vec<PurchaseRecord>,
        feedback: Vec<FeedbackRecord>,
        catalog: Arc<dyn Catalog>,
    ) -> Self {
        Self {
            orders,
            feedback,
            catalog,
        }
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn purchase_history(&self, user_id: &str) -> Result<Vec<String>> {
        Ok(self
            .orders
            .iter()
            .filter(|o| o.user_id == user_id && o.status.counts_as_history())
            .map(|o| o.item_name.clone())
            .collect())
    }

    async fn ratings(&self, user_id: &str) -> Result<HashMap<String, u8>> {
        let mut records: Vec<&FeedbackRecord> = self
            .feedback
            .iter()
            .filter(|f| f.user_id == user_id && (1..=5).contains(&f.rating))
            .collect();
        // Ascending by time so a later rating overwrites an earlier one.
        records.sort_by_key(|f| f.rated_at);

        let mut ratings = HashMap::new();
        for record in records {
            match self.catalog.name_of(record.item_id).await? {
                Some(name) => {
                    ratings.insert(name, record.rating);
                }
                None => {
                    debug!(item_id = %record.item_id, "dropping feedback for deleted item");
                }
            }
        }
        Ok(ratings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;
    use chrono::{Duration, Utc};

    fn item(name: &str, category: &str, rating: f64, reviews: u32, days_old: i64) -> MenuItem {
        MenuItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: category.to_string(),
            is_available: true,
            average_rating: rating,
            review_count: reviews,
            created_at: Utc::now() - Duration::days(days_old),
        }
    }

    fn order(user: &str, item_name: &str, status: OrderStatus) -> PurchaseRecord {
        PurchaseRecord {
            order_id: Uuid::new_v4(),
            user_id: user.to_string(),
            item_name: item_name.to_string(),
            status,
        }
    }

    #[tokio::test]
    async fn queries_skip_unavailable_items() {
        let mut gone = item("Latte", "Drinks", 4.9, 50, 10);
        gone.is_available = false;
        let catalog = InMemoryCatalog::new(vec![gone, item("Mocha", "Drinks", 4.0, 10, 5)]);

        let popular = catalog.popular(10).await.unwrap();
        assert_eq!(popular.len(), 1);
        assert_eq!(popular[0].name, "Mocha");
    }

    #[tokio::test]
    async fn rating_sort_breaks_ties_on_review_count() {
        let catalog = InMemoryCatalog::new(vec![
            item("A", "Main", 4.5, 3, 1),
            item("B", "Main", 4.5, 30, 1),
            item("C", "Main", 4.8, 1, 1),
        ]);

        let names: Vec<String> = catalog
            .popular(10)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, ["C", "B", "A"]);
    }

    #[tokio::test]
    async fn category_rated_applies_all_filters() {
        let catalog = InMemoryCatalog::new(vec![
            item("Burger", "Main", 4.5, 10, 1),
            item("Fries", "Main", 0.0, 0, 1),
            item("Cake", "Dessert", 4.8, 5, 1),
        ]);

        let categories: HashSet<String> = ["Main".to_string()].into();
        let exclude: HashSet<String> = ["Burger".to_string()].into();
        let rated = catalog
            .by_category_rated(&categories, &exclude, 10)
            .await
            .unwrap();
        assert!(rated.is_empty());

        let recent = catalog
            .by_category_recent(&categories, &exclude, 10)
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].name, "Fries");
    }

    #[tokio::test]
    async fn limit_is_an_upper_bound() {
        let catalog = InMemoryCatalog::new(vec![
            item("A", "Main", 4.0, 1, 1),
            item("B", "Main", 3.0, 1, 1),
        ]);
        assert_eq!(catalog.popular(1).await.unwrap().len(), 1);
        assert_eq!(catalog.popular(10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn history_counts_only_terminal_success_orders() {
        let catalog = Arc::new(InMemoryCatalog::new(vec![]));
        let store = InMemoryTransactionStore::new(
            vec![
                order("u1", "Burger", OrderStatus::Completed),
                order("u1", "Burger", OrderStatus::Ready),
                order("u1", "Salad", OrderStatus::Cancelled),
                order("u1", "Cake", OrderStatus::Pending),
                order("u2", "Cake", OrderStatus::Completed),
            ],
            vec![],
            catalog,
        );

        let history = store.purchase_history("u1").await.unwrap();
        assert_eq!(history, ["Burger", "Burger"]);
    }

    #[tokio::test]
    async fn ratings_join_drops_dangling_feedback_and_keeps_newest() {
        let burger = item("Burger", "Main", 4.5, 10, 1);
        let burger_id = burger.id;
        let catalog = Arc::new(InMemoryCatalog::new(vec![burger]));

        let now = Utc::now();
        let store = InMemoryTransactionStore::new(
            vec![],
            vec![
                FeedbackRecord {
                    user_id: "u1".into(),
                    item_id: burger_id,
                    rating: 2,
                    rated_at: now - Duration::days(7),
                },
                FeedbackRecord {
                    user_id: "u1".into(),
                    item_id: burger_id,
                    rating: 5,
                    rated_at: now,
                },
                // Referenced item was deleted from the menu.
                FeedbackRecord {
                    user_id: "u1".into(),
                    item_id: Uuid::new_v4(),
                    rating: 1,
                    rated_at: now,
                },
            ],
            catalog,
        );

        let ratings = store.ratings("u1").await.unwrap();
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings["Burger"], 5);
    }
}

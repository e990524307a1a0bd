mod history;

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::adapters::{AdapterSet, Catalog, ModelStack, TransactionStore};
use crate::config::ResolverConfig;
use crate::models::{Provenance, RankedRecommendations};

pub use history::PurchaseProfile;

/// The hybrid recommendation pipeline: personalized (order history) →
/// collaborative model → popularity cold start → empty.
///
/// One canonical resolver for every deployment shape; which tiers can run
/// is decided by which adapters the `AdapterSet` carries. `resolve` never
/// fails: a degraded adapter degrades its tier to empty and resolution
/// moves on.
pub struct RecommendationResolver {
    adapters: AdapterSet,
    config: ResolverConfig,
}

impl RecommendationResolver {
    pub fn new(adapters: AdapterSet, config: ResolverConfig) -> Self {
        Self { adapters, config }
    }

    /// `resolve` with the configured default list length.
    pub async fn resolve_default(&self, user_id: &str) -> RankedRecommendations {
        self.resolve(user_id, self.config.default_top_n).await
    }

    /// Produce up to `top_n` distinct item names for `user_id`, tagged
    /// with the tier that produced them.
    pub async fn resolve(&self, user_id: &str, top_n: i32) -> RankedRecommendations {
        if top_n <= 0 || user_id.trim().is_empty() {
            warn!(user_id, top_n, "invalid recommendation request");
            return RankedRecommendations::empty();
        }
        let top_n = top_n as usize;

        // Tier 1: order history. History strictly precedes the model even
        // when the user is in the model vocabulary, and a partial list is
        // preferred over falling through.
        if let (Some(store), Some(catalog)) = (
            self.adapters.transactions.as_deref(),
            self.adapters.catalog.as_deref(),
        ) {
            let items = self.personalized_tier(store, catalog, user_id, top_n).await;
            if !items.is_empty() {
                info!(user_id, count = items.len(), "resolved from order history");
                return RankedRecommendations::new(items, Provenance::Personalized);
            }
        }

        // Tier 2: collaborative model, known users only.
        if let Some(stack) = &self.adapters.model {
            if stack.users.known(user_id) {
                let items = self.model_tier(stack, user_id, top_n);
                if !items.is_empty() {
                    info!(user_id, count = items.len(), "resolved from model scores");
                    return RankedRecommendations::new(items, Provenance::MlModel);
                }
            } else {
                debug!(user_id, "not in model vocabulary");
            }
        }

        // Tier 3: cold start on popularity.
        if let Some(catalog) = self.adapters.catalog.as_deref() {
            let items = self.cold_start_tier(catalog, top_n).await;
            if !items.is_empty() {
                info!(user_id, count = items.len(), "resolved from popular items");
                return RankedRecommendations::new(items, Provenance::PopularColdStart);
            }
        }

        info!(user_id, "no tier produced recommendations");
        RankedRecommendations::empty()
    }

    /// History tier. Walks four sub-queries against an exclusion set that
    /// grows with every accepted item; exclusion never terminates the tier
    /// early, the later sub-queries still run while the list is short.
    async fn personalized_tier(
        &self,
        store: &dyn TransactionStore,
        catalog: &dyn Catalog,
        user_id: &str,
        top_n: usize,
    ) -> Vec<String> {
        let purchases = match store.purchase_history(user_id).await {
            Ok(purchases) => purchases,
            Err(e) => {
                warn!(user_id, error = %e, "purchase history unavailable");
                return Vec::new();
            }
        };
        if purchases.is_empty() {
            debug!(user_id, "no purchase history");
            return Vec::new();
        }

        let ratings = match store.ratings(user_id).await {
            Ok(ratings) => ratings,
            Err(e) => {
                // History without ratings is still usable signal.
                warn!(user_id, error = %e, "ratings unavailable, treating all as unrated");
                Default::default()
            }
        };

        let profile = PurchaseProfile::build(&purchases, &ratings, &self.config);

        let seeds = profile.category_seeds();
        let favorite_categories: HashSet<String> = match catalog
            .find_by_names(&seeds, seeds.len())
            .await
        {
            Ok(items) => items.into_iter().map(|i| i.category).collect(),
            Err(e) => {
                warn!(user_id, error = %e, "category seed lookup failed");
                HashSet::new()
            }
        };

        let mut exclude = profile.base_exclusions();
        let mut picked: Vec<String> = Vec::new();

        // Re-surface what the user loved, capped so favorites never crowd
        // out discovery.
        if !profile.favorites.is_empty() {
            let cap = self.config.favorite_cap.min(top_n);
            match catalog.find_by_names(&profile.favorites, cap).await {
                Ok(items) => {
                    for item in items {
                        push_unique(&mut picked, &mut exclude, item.name);
                    }
                }
                Err(e) => warn!(user_id, error = %e, "favorite lookup failed"),
            }
        }

        // Reviewed items from the user's favorite categories.
        if picked.len() < top_n && !favorite_categories.is_empty() {
            match catalog
                .by_category_rated(&favorite_categories, &exclude, top_n - picked.len())
                .await
            {
                Ok(items) => {
                    for item in items {
                        push_unique(&mut picked, &mut exclude, item.name);
                    }
                }
                Err(e) => warn!(user_id, error = %e, "category query failed"),
            }
        }

        // Same categories, rating filter relaxed, newest first.
        if picked.len() < top_n && !favorite_categories.is_empty() {
            match catalog
                .by_category_recent(&favorite_categories, &exclude, top_n - picked.len())
                .await
            {
                Ok(items) => {
                    for item in items {
                        push_unique(&mut picked, &mut exclude, item.name);
                    }
                }
                Err(e) => warn!(user_id, error = %e, "relaxed category query failed"),
            }
        }

        // Anything else still on the menu.
        if picked.len() < top_n {
            match catalog
                .any_available(&exclude, top_n - picked.len())
                .await
            {
                Ok(items) => {
                    for item in items {
                        push_unique(&mut picked, &mut exclude, item.name);
                    }
                }
                Err(e) => warn!(user_id, error = %e, "catch-all query failed"),
            }
        }

        picked.truncate(top_n);
        picked
    }

    /// Model tier: score every item for the user and decode the top
    /// indices. Equal scores keep ascending item index, so output is
    /// deterministic for a given artifact.
    fn model_tier(&self, stack: &ModelStack, user_id: &str, top_n: usize) -> Vec<String> {
        let Some(user_index) = stack.users.encode(user_id) else {
            return Vec::new();
        };
        let scores = match stack.scorer.score_all_items(user_index) {
            Ok(scores) => scores,
            Err(e) => {
                warn!(user_id, error = %e, "model scoring failed");
                return Vec::new();
            }
        };

        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(&b))
        });

        order
            .into_iter()
            .filter_map(|idx| stack.items.decode(idx).map(str::to_string))
            .take(top_n)
            .collect()
    }

    /// Cold start: reviewed items by rating, padded with unreviewed items
    /// by recency, never exceeding `top_n` total.
    async fn cold_start_tier(&self, catalog: &dyn Catalog, top_n: usize) -> Vec<String> {
        let mut exclude = HashSet::new();
        let mut picked: Vec<String> = Vec::new();

        match catalog.popular(top_n).await {
            Ok(items) => {
                for item in items {
                    push_unique(&mut picked, &mut exclude, item.name);
                }
            }
            Err(e) => warn!(error = %e, "popular query failed"),
        }

        if picked.len() < top_n {
            match catalog.recent_unreviewed(top_n - picked.len()).await {
                Ok(items) => {
                    for item in items {
                        push_unique(&mut picked, &mut exclude, item.name);
                    }
                }
                Err(e) => warn!(error = %e, "recent unreviewed query failed"),
            }
        }

        picked.truncate(top_n);
        picked
    }
}

fn push_unique(picked: &mut Vec<String>, exclude: &mut HashSet<String>, name: String) {
    if exclude.insert(name.clone()) {
        picked.push(name);
    }
}

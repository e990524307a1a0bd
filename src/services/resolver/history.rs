use std::collections::{HashMap, HashSet};

use crate::config::ResolverConfig;

/// Rating-partitioned view of one user's purchase history, the working set
/// behind the personalized tier.
///
/// Favorites and dislikes come from the ratings map regardless of purchase;
/// the neutral bucket is drawn from purchases only, so an item rated
/// exactly 3 without ever being bought is not excluded. "Rated 3" and
/// "purchased but unrated" are deliberately conflated: both are excluded
/// from recommendations, matching long-standing product behavior.
#[derive(Debug, Clone)]
pub struct PurchaseProfile {
    pub favorites: Vec<String>,
    pub disliked: Vec<String>,
    pub neutral_or_unrated: Vec<String>,
    /// Most-frequently-purchased items, ties broken toward the item
    /// purchased first.
    pub most_purchased: Vec<String>,
}

impl PurchaseProfile {
    pub fn build(
        purchases: &[String],
        ratings: &HashMap<String, u8>,
        config: &ResolverConfig,
    ) -> Self {
        let mut favorites: Vec<String> = ratings
            .iter()
            .filter(|(_, &v)| v >= config.favorite_rating_min)
            .map(|(name, _)| name.clone())
            .collect();
        favorites.sort();

        let mut disliked: Vec<String> = ratings
            .iter()
            .filter(|(_, &v)| v <= config.disliked_rating_max)
            .map(|(name, _)| name.clone())
            .collect();
        disliked.sort();

        // Distinct purchases in first-seen order.
        let mut seen = HashSet::new();
        let distinct: Vec<&String> = purchases.iter().filter(|p| seen.insert(p.as_str())).collect();

        let neutral_or_unrated: Vec<String> = distinct
            .iter()
            .filter(|p| match ratings.get(p.as_str()) {
                None => true,
                Some(&v) => v > config.disliked_rating_max && v < config.favorite_rating_min,
            })
            .map(|p| (*p).clone())
            .collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for p in purchases {
            *counts.entry(p.as_str()).or_default() += 1;
        }
        let mut by_frequency: Vec<&String> = distinct.clone();
        by_frequency.sort_by(|a, b| counts[b.as_str()].cmp(&counts[a.as_str()]));
        let most_purchased: Vec<String> = by_frequency
            .into_iter()
            .take(config.top_purchase_count)
            .cloned()
            .collect();

        Self {
            favorites,
            disliked,
            neutral_or_unrated,
            most_purchased,
        }
    }

    /// Names whose categories seed the favorite-category signal: the
    /// most-purchased items plus everything rated as a favorite.
    pub fn category_seeds(&self) -> Vec<String> {
        let mut seeds = self.most_purchased.clone();
        for name in &self.favorites {
            if !seeds.contains(name) {
                seeds.push(name.clone());
            }
        }
        seeds
    }

    /// Names that must never be recommended back: disliked plus
    /// neutral-or-unrated purchases.
    pub fn base_exclusions(&self) -> HashSet<String> {
        self.disliked
            .iter()
            .chain(&self.neutral_or_unrated)
            .cloned()
            .collect()
    }
}

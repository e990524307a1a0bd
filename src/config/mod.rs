use serde::Deserialize;

/// Resolver tuning knobs. Constructed once at process start and passed by
/// reference into the resolver; there is no ambient global state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// List length when the caller does not specify one.
    pub default_top_n: i32,
    /// How many highly-rated favorites to re-surface first.
    pub favorite_cap: usize,
    /// How many most-frequently-purchased items seed the category signal.
    pub top_purchase_count: usize,
    /// Ratings at or above this mark an item as a favorite.
    pub favorite_rating_min: u8,
    /// Ratings at or below this exclude an item outright.
    pub disliked_rating_max: u8,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_top_n: 5,
            favorite_cap: 2,
            top_purchase_count: 3,
            favorite_rating_min: 4,
            disliked_rating_max: 2,
        }
    }
}

impl ResolverConfig {
    /// Load from `RESOLVER_`-prefixed environment variables
    /// (e.g. `RESOLVER_DEFAULT_TOP_N=10`), with `.env` support.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::prefixed("RESOLVER_").from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_product_behavior() {
        let config = ResolverConfig::default();
        assert_eq!(config.default_top_n, 5);
        assert_eq!(config.favorite_cap, 2);
        assert_eq!(config.top_purchase_count, 3);
        assert_eq!(config.favorite_rating_min, 4);
        assert_eq!(config.disliked_rating_max, 2);
    }

    #[test]
    fn from_env_reads_prefixed_overrides() {
        // Pin every field so the assertions hold regardless of ambient
        // environment or .env files. Explicit vars take precedence over
        // anything dotenvy loads.
        let vars = [
            ("RESOLVER_DEFAULT_TOP_N", "8"),
            ("RESOLVER_FAVORITE_CAP", "3"),
            ("RESOLVER_TOP_PURCHASE_COUNT", "4"),
            ("RESOLVER_FAVORITE_RATING_MIN", "5"),
            ("RESOLVER_DISLIKED_RATING_MAX", "1"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }

        let config = ResolverConfig::from_env().expect("env config");
        assert_eq!(config.default_top_n, 8);
        assert_eq!(config.favorite_cap, 3);
        assert_eq!(config.top_purchase_count, 4);
        assert_eq!(config.favorite_rating_min, 5);
        assert_eq!(config.disliked_rating_max, 1);

        for (key, _) in vars {
            std::env::remove_var(key);
        }
    }
}

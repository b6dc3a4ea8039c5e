pub const DEFAULT_PAGE: i64 = 1;
pub const COCKTAIL_COUNT_PER_PAGE: i64 = 50;

/// Category value the frontend sends to mean "no category filter".
pub const ALL_CATEGORIES: &str = "All Categories";

pub const FEATURED_TAG: &str = "signature";
pub const FEATURED_FALLBACK_LIMIT: i64 = 10;

pub const SEASONAL_TAG: &str = "seasonal";
pub const SEASONAL_INGREDIENTS: &[&str] = &["cranberry", "pumpkin", "cinnamon", "apple"];
pub const SEASONAL_LIMIT: i64 = 20;

pub const LOADER_PROGRESS_INTERVAL: usize = 100;

/// Static MET values per activity type, keyed by lowercase name
/// Estimated burn: `calories = MET × weight_kg × hours`
pub const MET_TABLE: &[(&str, f64)] = &[
    ("walking", 3.5),
    ("running", 9.8),
    ("cycling", 7.5),
    ("swimming", 8.0),
    ("weightlifting", 3.0),
    ("yoga", 2.5),
    ("hiking", 6.0),
    ("dancing", 4.5),
    ("basketball", 6.5),
    ("soccer", 7.0),
    ("tennis", 7.3),
    ("rowing", 7.0),
];

/// MET value used for activity types not in the table
pub const DEFAULT_MET: f64 = 4.0;

/// Body weight assumed when the profile has none (kg)
pub const DEFAULT_BODY_WEIGHT_KG: f64 = 70.0;

/// Calories per gram of each macronutrient
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Minimum accepted password length at registration
pub const MIN_PASSWORD_LEN: usize = 8;

/// Maximum external product searches per minute per user
pub const MAX_SEARCHES_PER_MINUTE: u32 = 10;

/// Maximum external product searches per hour per user
pub const MAX_SEARCHES_PER_HOUR: u32 = 100;

/// TTL for cached external search results (seconds)
pub const SEARCH_CACHE_TTL_SECS: u64 = 3600;

/// Result page size requested from external nutrition APIs
pub const EXTERNAL_PAGE_SIZE: u32 = 20;

/// Minimum Jaro-Winkler similarity for the local fuzzy fallback
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.75;

/// Maximum results returned by the local fuzzy fallback
pub const MAX_FUZZY_RESULTS: usize = 20;

/// Rows scanned by the fuzzy fallback (keeps the scan bounded)
pub const MAX_FUZZY_CANDIDATES: i64 = 500;

// =============================================================================
// Error Messages
// =============================================================================

/// Error message for an empty search query
pub const ERR_EMPTY_QUERY: &str = "Search query must not be empty";

/// Error message for a malformed email address
pub const ERR_INVALID_EMAIL: &str = "Invalid email address";

/// Error message for failed login
pub const ERR_BAD_CREDENTIALS: &str = "Invalid email or password";

/// Error message when the profile lacks attributes needed for goal math
pub const ERR_INCOMPLETE_PROFILE: &str =
    "Profile must include sex, age, height and weight to compute goals";

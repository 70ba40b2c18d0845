//! Test helpers for generating unique test data
//!
//! ULID-based helpers to keep test data distinct between runs and
//! between concurrently running tests.

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("player");
/// let id2 = unique_str("player");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("player-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique display name for a seated player
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_player_name;
///
/// let name = unique_player_name();
/// assert!(name.starts_with("player-"));
/// ```
pub fn unique_player_name() -> String {
    unique_str("player")
}

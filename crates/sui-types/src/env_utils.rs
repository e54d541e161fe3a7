//! Environment variable parsing utilities.
//!
//! All runtime configuration in this workspace comes from the environment.
//! These helpers replace the repeated
//! `std::env::var(..).ok().and_then(|v| v.parse().ok()).unwrap_or(..)` chain.
//!
//! ```
//! use sui_ptb_types::env_utils::{env_var, env_var_or};
//!
//! let timeout: u64 = env_var_or("SUI_RPC_TIMEOUT_SECS", 30);
//! let custom: Option<u64> = env_var("SUI_PTB_UNSET_EXAMPLE");
//! assert!(custom.is_none());
//! # let _ = timeout;
//! ```

use std::str::FromStr;
use std::time::Duration;

/// Parse an environment variable; `None` if unset or unparseable.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable, falling back to `default`.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// String value with a default.
pub fn env_string_or(key: &str, default: &str) -> String {
    env_string(key).unwrap_or_else(|| default.to_string())
}

/// String value, treating a blank variable as unset.
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Whole seconds as a `Duration`, falling back to `default_secs`.
pub fn env_duration_secs(key: &str, default_secs: u64) -> Duration {
    Duration::from_secs(env_var_or(key, default_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_parsing() {
        std::env::set_var("SUI_PTB_TEST_U64", " 42 ");
        let val: Option<u64> = env_var("SUI_PTB_TEST_U64");
        assert_eq!(val, Some(42));

        let missing: Option<u64> = env_var("SUI_PTB_NONEXISTENT_1");
        assert_eq!(missing, None);

        std::env::remove_var("SUI_PTB_TEST_U64");
    }

    #[test]
    fn test_env_var_or_ignores_garbage() {
        std::env::set_var("SUI_PTB_TEST_GARBAGE", "forty");
        let val: u64 = env_var_or("SUI_PTB_TEST_GARBAGE", 50);
        assert_eq!(val, 50);
        std::env::remove_var("SUI_PTB_TEST_GARBAGE");
    }

    #[test]
    fn test_env_string_blank_is_unset() {
        std::env::set_var("SUI_PTB_TEST_BLANK", "   ");
        assert_eq!(env_string("SUI_PTB_TEST_BLANK"), None);
        assert_eq!(env_string_or("SUI_PTB_TEST_BLANK", "fallback"), "fallback");
        std::env::remove_var("SUI_PTB_TEST_BLANK");
    }

    #[test]
    fn test_env_duration_secs() {
        std::env::set_var("SUI_PTB_TEST_SECS", "7");
        assert_eq!(env_duration_secs("SUI_PTB_TEST_SECS", 1), Duration::from_secs(7));
        assert_eq!(env_duration_secs("SUI_PTB_NONEXISTENT_3", 3), Duration::from_secs(3));
        std::env::remove_var("SUI_PTB_TEST_SECS");
    }
}

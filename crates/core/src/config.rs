use std::env;
use std::str::FromStr;

use crate::error::{Result, TallyError};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Read an env var, treating empty values as unset.
pub fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read and parse an env var. Unset is `Ok(None)`; an unparsable value is a config error.
pub fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>> {
    match env_opt(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| TallyError::Config(format!("{key}: cannot parse {raw:?}"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable name so parallel tests never race.

    #[test]
    fn env_opt_ignores_empty() {
        env::set_var("TALLY_TEST_EMPTY_VAR", "");
        assert_eq!(env_opt("TALLY_TEST_EMPTY_VAR"), None);
        env::remove_var("TALLY_TEST_EMPTY_VAR");
    }

    #[test]
    fn env_parse_reads_numbers() {
        env::set_var("TALLY_TEST_NUMBER_VAR", " 12 ");
        assert_eq!(env_parse::<usize>("TALLY_TEST_NUMBER_VAR").unwrap(), Some(12));
        env::remove_var("TALLY_TEST_NUMBER_VAR");
    }

    #[test]
    fn env_parse_unset_is_none() {
        assert_eq!(env_parse::<u64>("TALLY_TEST_NEVER_SET_VAR").unwrap(), None);
    }

    #[test]
    fn env_parse_rejects_garbage() {
        env::set_var("TALLY_TEST_GARBAGE_VAR", "many");
        let err = env_parse::<usize>("TALLY_TEST_GARBAGE_VAR").unwrap_err();
        assert!(matches!(err, TallyError::Config(_)));
        assert!(err.to_string().contains("TALLY_TEST_GARBAGE_VAR"));
        env::remove_var("TALLY_TEST_GARBAGE_VAR");
    }
}

//! Environment-driven tuning for property-test suites.
//!
//! Every fakenet property suite reads its case count and fork mode through
//! [`ProptestRunProfile`], so CI can scale all of them with two variables.

use std::env;

/// Environment variable overriding the number of cases per property.
pub const CASES_ENV_KEY: &str = "FAKENET_PBT_CASES";
/// Environment variable enabling forked proptest execution.
pub const FORK_ENV_KEY: &str = "FAKENET_PBT_FORK";

/// Resolved property-test settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Loads the profile, falling back to the given defaults when a variable
    /// is unset or invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use fakenet_test_support::proptest_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: read_env_or_default(CASES_ENV_KEY, default_cases, parse_cases),
            fork: read_env_or_default(FORK_ENV_KEY, default_fork, parse_bool),
        }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether cases run in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }
}

fn read_env_or_default<T, F>(key: &'static str, default: T, parser: F) -> T
where
    T: Copy,
    F: Fn(&str) -> Result<T, String>,
{
    let Ok(raw) = env::var(key) else {
        return default;
    };
    parser(&raw).unwrap_or_else(|reason| {
        tracing::warn!(
            env = key,
            raw = %raw,
            reason = %reason,
            "invalid property-test profile override; using default",
        );
        default
    })
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("cases must be > 0".to_owned()),
        Ok(cases) => Ok(cases),
        Err(error) => Err(format!("parse error: {error}")),
    }
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected one of: true/false/1/0/yes/no/on/off".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct EnvGuard {
        key: &'static str,
        original: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: Option<&str>) -> Self {
            let original = env::var(key).ok();
            match value {
                // SAFETY: tests serialize access with ENV_LOCK.
                Some(value) => unsafe { env::set_var(key, value) },
                // SAFETY: tests serialize access with ENV_LOCK.
                None => unsafe { env::remove_var(key) },
            }
            Self { key, original }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.original {
                // SAFETY: tests serialize access with ENV_LOCK.
                Some(value) => unsafe { env::set_var(self.key, value) },
                // SAFETY: tests serialize access with ENV_LOCK.
                None => unsafe { env::remove_var(self.key) },
            }
        }
    }

    #[rstest]
    #[case::defaults(None, None, 64, false)]
    #[case::cases_override(Some("250"), None, 250, false)]
    #[case::zero_cases_ignored(Some("0"), None, 64, false)]
    #[case::garbage_cases_ignored(Some("abc"), None, 64, false)]
    #[case::fork_on(None, Some("YES"), 64, true)]
    #[case::fork_off(None, Some("0"), 64, false)]
    #[case::garbage_fork_ignored(None, Some("maybe"), 64, false)]
    fn load_applies_valid_overrides(
        #[case] cases: Option<&str>,
        #[case] fork: Option<&str>,
        #[case] expected_cases: u32,
        #[case] expected_fork: bool,
    ) {
        let _lock = ENV_LOCK.lock().expect("env lock");
        let _cases = EnvGuard::set(CASES_ENV_KEY, cases);
        let _fork = EnvGuard::set(FORK_ENV_KEY, fork);

        let profile = ProptestRunProfile::load(64, false);
        assert_eq!(profile.cases(), expected_cases);
        assert_eq!(profile.fork(), expected_fork);
    }
}

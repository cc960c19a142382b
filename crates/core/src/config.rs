//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into services.
//! The parse helpers here take the raw value as an argument and never read the process
//! environment themselves, so tests can exercise them without touching global state.

use crate::constants::DEFAULT_MAX_SESSIONS;
use crate::{PatientError, PatientResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    seed_demo_patients: bool,
    max_sessions: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(seed_demo_patients: bool, max_sessions: usize) -> PatientResult<Self> {
        if max_sessions == 0 {
            return Err(PatientError::Validation(
                "max_sessions must be at least 1".into(),
            ));
        }

        Ok(Self {
            seed_demo_patients,
            max_sessions,
        })
    }

    /// Whether new registries start with the demo patients.
    pub fn seed_demo_patients(&self) -> bool {
        self.seed_demo_patients
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Creates a fresh registry according to this configuration.
    pub fn new_registry(&self) -> crate::PatientRegistry {
        if self.seed_demo_patients {
            crate::PatientRegistry::with_demo_patients()
        } else {
            crate::PatientRegistry::new()
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            seed_demo_patients: true,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the demo-seed flag from an optional string value.
///
/// `None` or empty/whitespace yields `true`. Accepts `true/false`, `1/0`, `yes/no`,
/// `on/off`, case-insensitively.
pub fn seed_demo_from_env_value(value: Option<String>) -> PatientResult<bool> {
    let Some(value) = trimmed(value) else {
        return Ok(true);
    };

    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(PatientError::Validation(format!(
            "CHART_SEED_DEMO must be a boolean, got {other:?}"
        ))),
    }
}

/// Parse the session limit from an optional string value.
///
/// `None` or empty/whitespace yields `DEFAULT_MAX_SESSIONS`.
pub fn max_sessions_from_env_value(value: Option<String>) -> PatientResult<usize> {
    let Some(value) = trimmed(value) else {
        return Ok(DEFAULT_MAX_SESSIONS);
    };

    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(PatientError::Validation(format!(
            "CHART_MAX_SESSIONS must be a positive integer, got {value:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_demo_defaults_to_true() {
        assert!(seed_demo_from_env_value(None).unwrap());
        assert!(seed_demo_from_env_value(Some("  ".into())).unwrap());
    }

    #[test]
    fn test_seed_demo_parses_booleans() {
        assert!(!seed_demo_from_env_value(Some("false".into())).unwrap());
        assert!(!seed_demo_from_env_value(Some("OFF".into())).unwrap());
        assert!(seed_demo_from_env_value(Some(" 1 ".into())).unwrap());
        let err = seed_demo_from_env_value(Some("maybe".into())).expect_err("should reject");
        assert!(matches!(err, PatientError::Validation(msg) if msg.contains("maybe")));
    }

    #[test]
    fn test_max_sessions_parsing() {
        assert_eq!(
            max_sessions_from_env_value(None).unwrap(),
            DEFAULT_MAX_SESSIONS
        );
        assert_eq!(max_sessions_from_env_value(Some("8".into())).unwrap(), 8);
        assert!(max_sessions_from_env_value(Some("0".into())).is_err());
        assert!(max_sessions_from_env_value(Some("-3".into())).is_err());
        assert!(max_sessions_from_env_value(Some("lots".into())).is_err());
    }

    #[test]
    fn test_core_config_rejects_zero_sessions() {
        assert!(CoreConfig::new(true, 0).is_err());
    }

    #[test]
    fn test_new_registry_respects_seed_flag() {
        let seeded = CoreConfig::new(true, 1).unwrap().new_registry();
        assert_eq!(seeded.len(), 2);
        let empty = CoreConfig::new(false, 1).unwrap().new_registry();
        assert!(empty.is_empty());
    }
}

//! Settings validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, gas limit covers intrinsic cost)
//!
//! Returns all validation errors, not just the first.

use crate::config::schema::Settings;

/// Intrinsic gas of any Ethereum transaction.
pub const MIN_GAS_LIMIT: u64 = 21_000;

/// A single semantic problem in the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_settings(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut check = |ok: bool, field: &'static str, message: &str| {
        if !ok {
            errors.push(ValidationError {
                field,
                message: message.to_string(),
            });
        }
    };

    let contract = &settings.contract;
    check(
        !contract.abi_path.as_os_str().is_empty(),
        "contract.abi_path",
        "must not be empty",
    );
    check(
        !contract.write_method.trim().is_empty(),
        "contract.write_method",
        "must not be empty",
    );
    check(
        !contract.read_method.trim().is_empty(),
        "contract.read_method",
        "must not be empty",
    );
    check(
        contract.gas_limit >= MIN_GAS_LIMIT,
        "contract.gas_limit",
        "must be at least 21000",
    );

    let rpc = &settings.rpc;
    check(rpc.timeout_secs > 0, "rpc.timeout_secs", "must be greater than 0");
    check(
        rpc.confirmation_timeout_secs > 0,
        "rpc.confirmation_timeout_secs",
        "must be greater than 0",
    );
    check(
        rpc.poll_interval_ms > 0,
        "rpc.poll_interval_ms",
        "must be greater than 0",
    );
    check(
        rpc.poll_interval_ms <= rpc.confirmation_timeout_secs.saturating_mul(1_000),
        "rpc.poll_interval_ms",
        "must not exceed the confirmation timeout",
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut settings = Settings::default();
        settings.contract.write_method = String::new();
        settings.contract.gas_limit = 100;
        settings.rpc.timeout_secs = 0;

        let errors = validate_settings(&settings).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["contract.write_method", "contract.gas_limit", "rpc.timeout_secs"]
        );
    }

    #[test]
    fn test_poll_interval_bounded_by_deadline() {
        let mut settings = Settings::default();
        settings.rpc.confirmation_timeout_secs = 1;
        settings.rpc.poll_interval_ms = 5_000;
        let errors = validate_settings(&settings).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "rpc.poll_interval_ms");
    }
}

//! Full configuration validation.
//!
//! Every check pushes onto a shared error list so one run reports all
//! problems in a single `ConfigError`.

mod helpers;


use crate::schema::{CallingConfig, RESERVED_REQUEST_KEYS};
use calling_common::ConfigError;

use helpers::{validate_non_empty, validate_range};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &CallingConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_session(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_session(errors: &mut Vec<String>, config: &CallingConfig) {
    let session = &config.session;

    validate_non_empty(errors, "session.model", &session.model);
    validate_non_empty(errors, "session.system_prompt", &session.system_prompt);

    if let Some(rounds) = session.max_function_rounds {
        validate_range(errors, "session.max_function_rounds", rounds, 1, 1000);
    }

    for key in RESERVED_REQUEST_KEYS {
        if session.extra.contains_key(*key) {
            errors.push(format!(
                "session.extra.{key} is managed by the session and cannot be overridden"
            ));
        }
    }
}

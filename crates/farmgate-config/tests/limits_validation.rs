//! Server, security, and notification limit tests for farmgate-config.
// farmgate-config/tests/limits_validation.rs
// =============================================================================
// Module: Limits Validation Tests
// Description: Validate bounded limits across server, security, notifications.
// Purpose: Ensure out-of-range values fail closed.
// =============================================================================

use farmgate_config::ConfigError;
use farmgate_config::TokenIdentityConfig;

mod common;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn zero_body_limit_is_rejected() -> TestResult {
    let mut config = common::minimal_config();
    config.server.max_body_bytes = 0;
    assert_invalid(config.validate(), "server.max_body_bytes")?;
    Ok(())
}

#[test]
fn disabled_security_requires_dev_identity() -> TestResult {
    let mut config = common::minimal_config();
    config.security.enabled = false;
    config.security.dev_identity = None;
    assert_invalid(config.validate(), "security.dev_identity")?;
    Ok(())
}

#[test]
fn disabled_security_with_dev_identity_validates() -> TestResult {
    let mut config = common::minimal_config();
    config.security.enabled = false;
    config.security.dev_identity = Some(common::manager_identity());
    config.validate().map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn empty_tokens_are_rejected() -> TestResult {
    let mut config = common::minimal_config();
    config.security.tokens.push(TokenIdentityConfig {
        token: String::new(),
        identity: common::manager_identity(),
    });
    assert_invalid(config.validate(), "security.tokens entries")?;
    Ok(())
}

#[test]
fn oversized_token_tables_are_rejected() -> TestResult {
    let mut config = common::minimal_config();
    for index in 0..=64 {
        config.security.tokens.push(TokenIdentityConfig {
            token: format!("token-{index}"),
            identity: common::manager_identity(),
        });
    }
    assert_invalid(config.validate(), "security.tokens exceeds")?;
    Ok(())
}

#[test]
fn empty_notify_attribute_is_rejected() -> TestResult {
    let mut config = common::minimal_config();
    config.notifications.attributes.push(String::new());
    assert_invalid(config.validate(), "notifications.attributes entries")?;
    Ok(())
}

#[test]
fn channel_capacity_is_bounded() -> TestResult {
    let mut config = common::minimal_config();
    config.notifications.channel_capacity = 0;
    assert_invalid(config.validate(), "notifications.channel_capacity")?;

    let mut config = common::minimal_config();
    config.notifications.channel_capacity = 1_000_000;
    assert_invalid(config.validate(), "notifications.channel_capacity")?;
    Ok(())
}

//! Config tests.

use crate::config::bot_config::BotConfig;
use serial_test::serial;
use std::env;

#[test]
#[serial]
fn test_load_config_with_defaults() {
    env::remove_var("DISCORD_TOKEN");
    env::set_var("DISCORD_TOKEN", "test_token");
    env::remove_var("DATABASE_URL");
    env::remove_var("LOG_FILE");

    let config = BotConfig::load(None).unwrap();

    assert_eq!(config.discord_token(), "test_token");
    assert_eq!(config.database_url(), "./ticket_bot.db");
    assert_eq!(config.log_file(), "logs/ticket-bot.log");
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_load_config_with_custom_values() {
    env::remove_var("DISCORD_TOKEN");
    env::set_var("DISCORD_TOKEN", "custom_token");
    env::remove_var("DATABASE_URL");
    env::set_var("DATABASE_URL", "custom.db");
    env::remove_var("LOG_FILE");
    env::set_var("LOG_FILE", "/tmp/bot.log");

    let config = BotConfig::load(None).unwrap();

    assert_eq!(config.discord_token(), "custom_token");
    assert_eq!(config.database_url(), "custom.db");
    assert_eq!(config.log_file(), "/tmp/bot.log");

    env::remove_var("DATABASE_URL");
    env::remove_var("LOG_FILE");
}

#[test]
#[serial]
fn test_load_config_with_override_token() {
    env::remove_var("DISCORD_TOKEN");
    env::set_var("DISCORD_TOKEN", "env_token");

    let config = BotConfig::load(Some("override_token".to_string())).unwrap();

    assert_eq!(config.discord_token(), "override_token");
}

#[test]
#[serial]
fn test_load_config_missing_token_fails() {
    env::remove_var("DISCORD_TOKEN");

    assert!(BotConfig::load(None).is_err());
}

#[test]
#[serial]
fn test_validate_rejects_blank_token() {
    let config = BotConfig::load(Some("   ".to_string())).unwrap();
    assert!(config.validate().is_err());
}

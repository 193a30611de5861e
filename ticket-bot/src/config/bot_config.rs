//! BotConfig: the full application config. Use load() for env-based loading.
//!
//! Per-guild ticket settings (category, limits, templates) live in the
//! servers table, not here; this covers only process-level concerns.

use anyhow::Result;

use super::BaseConfig;

/// Bot config. Use BotConfig::load() for env-based loading.
pub struct BotConfig {
    pub base: BaseConfig,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides DISCORD_TOKEN.
    /// Call validate() after load to check config before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token)?;
        Ok(Self { base })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }

    // --- Base config getters ---
    pub fn discord_token(&self) -> &str {
        &self.base.discord_token
    }
    pub fn database_url(&self) -> &str {
        &self.base.database_url
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
}

use serde::{Deserialize, Serialize};

use crate::shared::{DEFAULT_MAX_BODY_SIZE, DEFAULT_TIMESTAMP_TOLERANCE_SECS};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub server_bind_point: String,
    pub port: u16,
    pub log_level: String,
    pub application_public_key: Option<String>,
    pub application_id: Option<String>,
    pub bot_token: Option<String>,
    pub test_guild_id: Option<String>,
    pub timestamp_tolerance_secs: i64,
    pub max_body_size: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new()
    }
}

impl Configuration {
    pub fn new() -> Self {
        Configuration {
            server_bind_point: "0.0.0.0".into(),
            port: 8080,
            log_level: "DEBUG".into(),
            application_public_key: None,
            application_id: None,
            bot_token: None,
            test_guild_id: None,
            timestamp_tolerance_secs: DEFAULT_TIMESTAMP_TOLERANCE_SECS,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Defaults, then the optional config file, then environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let config = match Self::load_from_config_file()? {
            Some(config) => config,
            None => Configuration::new(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Reads `$CONFIG_DIRECTORY/$CONFIG_FILE_NAME`, writing the defaults there
    /// first when the file does not exist yet. Returns `None` when no config
    /// location is set.
    pub fn load_from_config_file() -> anyhow::Result<Option<Self>> {
        let (Ok(config_directory_path), Ok(config_file_name)) = (
            std::env::var("CONFIG_DIRECTORY"),
            std::env::var("CONFIG_FILE_NAME"),
        ) else {
            return Ok(None);
        };

        let config_directory = std::path::Path::new(&config_directory_path);
        if !config_directory.exists() {
            std::fs::create_dir_all(&config_directory_path)?;
        }

        let configuration_path = config_directory.join(&config_file_name);
        if !configuration_path.exists() {
            let new_config = Configuration::new();
            let serialized = toml::to_string_pretty(&new_config)?;
            std::fs::write(configuration_path, serialized)?;
            Ok(Some(new_config))
        } else {
            let raw_config = std::fs::read_to_string(configuration_path)?;
            let deserialized: Configuration = toml::from_str(&raw_config)?;
            Ok(Some(deserialized))
        }
    }

    pub fn apply_overrides<F>(mut self, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = lookup("SERVER_BIND_POINT") {
            self.server_bind_point = v;
        }
        if let Some(v) = lookup("PORT") {
            self.port = v.trim().parse()?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.log_level = v;
        }
        if let Some(v) = lookup("DISCORD_PUBLIC_KEY") {
            self.application_public_key = Some(v.trim().to_string());
        }
        if let Some(v) = lookup("DISCORD_APP_ID") {
            self.application_id = Some(v);
        }
        if let Some(v) = lookup("DISCORD_TOKEN") {
            self.bot_token = Some(v);
        }
        if let Some(v) = lookup("TEST_GUILD_ID") {
            self.test_guild_id = Some(v);
        }
        if let Some(v) = lookup("TIMESTAMP_TOLERANCE_SECS") {
            self.timestamp_tolerance_secs = v.trim().parse()?;
        }
        if let Some(v) = lookup("MAX_BODY_SIZE") {
            self.max_body_size = v.trim().parse()?;
        }

        Ok(self)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_bind_point, self.port)
    }
}

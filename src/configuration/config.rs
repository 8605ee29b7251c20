#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ApiURL,
    ConfigFile,
    Email,
    HealthCheckTimeout,
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        #[cfg(not(target_os = "macos"))]
        let config_path = dirs::cache_dir()
            .unwrap_or_else(env::temp_dir)
            .join("medisense/config.toml");
        #[cfg(target_os = "macos")]
        let config_path = path::PathBuf::from(env::var("HOME").unwrap_or_default())
            .join(".config/medisense/config.toml");

        let res = match key {
            ConfigKey::ApiURL => "http://localhost:8000",
            ConfigKey::Email => "",
            ConfigKey::HealthCheckTimeout => "1000",

            // Special
            ConfigKey::ConfigFile => return config_path.to_string_lossy().to_string(),
        };

        return res.to_string();
    }

    /// Directory holding `debug.log`, overridable with `MEDISENSE_LOG_DIR`.
    pub fn log_dir() -> path::PathBuf {
        if let Ok(dir) = env::var("MEDISENSE_LOG_DIR") {
            return path::PathBuf::from(dir);
        }

        return dirs::cache_dir()
            .unwrap_or_else(env::temp_dir)
            .join("medisense");
    }

    /// Checks values that would otherwise only fail on first use.
    pub fn validate() -> Result<()> {
        let api_url = Config::get(ConfigKey::ApiURL);
        if let Err(err) = reqwest::Url::parse(&api_url) {
            bail!(format!(
                "Invalid value for '{}': {api_url} ({err})",
                ConfigKey::ApiURL
            ));
        }

        let timeout = Config::get(ConfigKey::HealthCheckTimeout);
        if timeout.parse::<u64>().is_err() {
            bail!(format!(
                "Invalid value for '{}': {timeout} is not a number of milliseconds",
                ConfigKey::HealthCheckTimeout
            ));
        }

        return Ok(());
    }

    /// Layers defaults, then the TOML config file, then CLI arguments and
    /// environment variables.
    pub async fn load(clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }
        Config::set(ConfigKey::ConfigFile, &config_file);

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            let supported = ConfigKey::iter()
                .filter(|key| return *key != ConfigKey::ConfigFile)
                .map(|key| return key.to_string())
                .collect::<Vec<String>>();
            for (name, _) in doc.iter() {
                if !supported.iter().any(|key| return key == name) {
                    bail!(format!(
                        "config.toml contains unsupported key '{name}'\nSupported keys are: {}",
                        supported.join(", ")
                    ));
                }
            }

            for key in ConfigKey::iter() {
                if key == ConfigKey::ConfigFile {
                    continue;
                }
                let Some(val) = doc.get(&key.to_string()) else {
                    continue;
                };

                if let Some(val_int) = val.as_integer() {
                    Config::set(key, &val_int.to_string());
                } else if let Some(val_str) = val.as_str() {
                    if val_str.is_empty() {
                        continue;
                    }
                    Config::set(key, val_str);
                } else {
                    bail!(format!("config.toml has an invalid value for key '{key}'"));
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        Config::validate()?;

        tracing::debug!(
            api_url = Config::get(ConfigKey::ApiURL),
            config_file = Config::get(ConfigKey::ConfigFile),
            email = Config::get(ConfigKey::Email),
            health_check_timeout = Config::get(ConfigKey::HealthCheckTimeout),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))?;

                let description = arg
                    .get_help()
                    .map(|help| return help.to_string())
                    .unwrap_or_default()
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<i32>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}

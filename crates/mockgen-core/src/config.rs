//! Layered generator configuration.
//!
//! Each setting is resolved from several sources and remembers where its
//! value came from. Precedence (highest to lowest):
//!
//! 1. CLI flags
//! 2. Environment variables (`MOCKGEN_*`)
//! 3. Built-in defaults

use serde::Serialize;

use crate::error::{MockGenError, MockGenResult};
use crate::model::RenderOptions;

/// Environment variable overriding the handler suffix.
pub const ENV_HANDLER_SUFFIX: &str = "MOCKGEN_HANDLER_SUFFIX";
/// Environment variable overriding the call counter suffix.
pub const ENV_CALL_COUNT_SUFFIX: &str = "MOCKGEN_CALL_COUNT_SUFFIX";
/// Environment variable overriding the mock type suffix.
pub const ENV_MOCK_SUFFIX: &str = "MOCKGEN_MOCK_SUFFIX";

/// Source of a configuration value, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Built-in default value.
    Default = 0,
    /// From environment variable.
    EnvVar = 1,
    /// From CLI flag (highest precedence).
    CliFlag = 2,
}

/// A configuration value with its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigValue<T> {
    /// The actual value.
    pub value: T,
    /// Where the value came from.
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    /// Create a new config value with the given source.
    pub fn new(value: T, source: ConfigSource) -> Self {
        ConfigValue { value, source }
    }

    /// Merge with another value, preferring higher precedence.
    pub fn merge(self, other: Self) -> Self {
        if other.source >= self.source {
            other
        } else {
            self
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub handler_suffix: Option<String>,
    pub call_count_suffix: Option<String>,
    pub mock_suffix: Option<String>,
}

/// Resolved generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenConfig {
    /// Appended to a stub's identifier to name its handler property.
    pub handler_suffix: ConfigValue<String>,
    /// Appended to a stub's identifier to name its call counter.
    pub call_count_suffix: ConfigValue<String>,
    /// Appended to a protocol name to name its mock type.
    pub mock_suffix: ConfigValue<String>,
}

impl Default for GenConfig {
    fn default() -> Self {
        GenConfig {
            handler_suffix: ConfigValue::new("Handler".to_string(), ConfigSource::Default),
            call_count_suffix: ConfigValue::new("CallCount".to_string(), ConfigSource::Default),
            mock_suffix: ConfigValue::new("Mock".to_string(), ConfigSource::Default),
        }
    }
}

impl GenConfig {
    /// Resolve configuration from the process environment and CLI flags.
    pub fn resolve(overrides: &CliOverrides) -> MockGenResult<Self> {
        Self::resolve_with_env(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve configuration using `env` to look up environment variables.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` if a suffix is empty, contains characters
    /// that cannot appear in an identifier, or if the handler and call
    /// counter suffixes are equal.
    pub fn resolve_with_env<F>(overrides: &CliOverrides, env: F) -> MockGenResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let layer = |current: ConfigValue<String>, env_key: &str, flag: &Option<String>| {
            let mut value = current;
            if let Some(from_env) = env(env_key) {
                value = value.merge(ConfigValue::new(from_env, ConfigSource::EnvVar));
            }
            if let Some(from_flag) = flag {
                value = value.merge(ConfigValue::new(from_flag.clone(), ConfigSource::CliFlag));
            }
            value
        };

        let defaults = GenConfig::default();
        let config = GenConfig {
            handler_suffix: layer(
                defaults.handler_suffix,
                ENV_HANDLER_SUFFIX,
                &overrides.handler_suffix,
            ),
            call_count_suffix: layer(
                defaults.call_count_suffix,
                ENV_CALL_COUNT_SUFFIX,
                &overrides.call_count_suffix,
            ),
            mock_suffix: layer(defaults.mock_suffix, ENV_MOCK_SUFFIX, &overrides.mock_suffix),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> MockGenResult<()> {
        for (setting, value) in [
            ("handler suffix", &self.handler_suffix),
            ("call count suffix", &self.call_count_suffix),
            ("mock suffix", &self.mock_suffix),
        ] {
            if value.value.is_empty() {
                return Err(MockGenError::invalid_args(format!(
                    "{} must not be empty",
                    setting
                )));
            }
            if !value
                .value
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_')
            {
                return Err(MockGenError::invalid_args(format!(
                    "{} '{}' is not a valid identifier fragment",
                    setting, value.value
                )));
            }
        }
        if self.handler_suffix.value == self.call_count_suffix.value {
            return Err(MockGenError::invalid_args(
                "handler suffix and call count suffix must differ",
            ));
        }
        Ok(())
    }

    /// Naming options for the renderer.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            handler_suffix: self.handler_suffix.value.clone(),
            call_count_suffix: self.call_count_suffix.value.clone(),
            ..RenderOptions::default()
        }
    }
}

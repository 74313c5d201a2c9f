//! File and environment backed client settings.

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use hutch_http::SecretString;
use serde::{Deserialize, Deserializer};

use crate::config::{ClientConfigBuilder, DEFAULT_VIRTUAL_HOST};
use crate::error::{HutchError, Result};

/// Environment variable prefix for settings overrides (`HUTCH_HOST_URL`, ...).
pub const ENV_PREFIX: &str = "HUTCH_";

/// Serializable mirror of the builder inputs.
///
/// ```yaml
/// host_url: http://localhost:15672
/// username: guest
/// password: guest
/// virtual_host: /
/// timeout: 30s
/// tracing: true
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub host_url: String,
    pub username: String,
    pub password: SecretString,
    pub virtual_host: String,
    #[serde(deserialize_with = "deserialize_timeout")]
    pub timeout: Option<Duration>,
    pub tracing: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            host_url: String::new(),
            username: String::new(),
            password: SecretString::default(),
            virtual_host: default_virtual_host(),
            timeout: None,
            tracing: false,
        }
    }
}

fn default_virtual_host() -> String {
    DEFAULT_VIRTUAL_HOST.to_owned()
}

fn deserialize_timeout<'de, D>(deserializer: D) -> std::result::Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom))
        .transpose()
}

impl ClientSettings {
    /// Load a YAML file, then apply `HUTCH_`-prefixed environment overrides.
    ///
    /// # Errors
    /// Returns [`HutchError::Configuration`] with field `settings` when the
    /// file cannot be read or a value has the wrong shape.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::new()
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX));
        Self::from_figment(&figment)
    }

    /// Extract settings from a prepared figment.
    ///
    /// # Errors
    /// Returns [`HutchError::Configuration`] with field `settings` on
    /// extraction failure.
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        figment.extract().map_err(|e: figment::Error| HutchError::Configuration {
            field: "settings",
            operation: "ClientSettings::from_figment",
            detail: Some(e.to_string()),
        })
    }

    /// Feed these settings into a builder; validation still happens in
    /// [`ClientConfigBuilder::build`].
    #[must_use]
    pub fn into_builder(self) -> ClientConfigBuilder {
        let mut builder = ClientConfigBuilder::new()
            .connect_to(self.host_url)
            .authenticate_as(self.username, self.password)
            .use_virtual_host(self.virtual_host);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout_after(timeout);
        }
        if self.tracing {
            builder = builder.enable_tracing();
        }
        builder
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use figment::providers::Serialized;
    use std::io::Write;

    #[test]
    fn loads_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "host_url: http://localhost:15672\nusername: guest\npassword: guest\ntimeout: 30s\ntracing: true"
        )
        .unwrap();

        let settings = ClientSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.host_url, "http://localhost:15672");
        assert_eq!(settings.username, "guest");
        assert_eq!(settings.password.expose(), "guest");
        assert_eq!(settings.virtual_host, "/");
        assert_eq!(settings.timeout, Some(Duration::from_secs(30)));
        assert!(settings.tracing);

        let config = settings.into_builder().build().unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert!(config.log_sink().is_some());
    }

    #[test]
    fn env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "hutch.yaml",
                "host_url: http://localhost:15672\nusername: guest\npassword: guest",
            )?;
            jail.set_env("HUTCH_VIRTUAL_HOST", "staging");
            jail.set_env("HUTCH_USERNAME", "ops");

            let settings = ClientSettings::from_file("hutch.yaml").map_err(|e| e.to_string())?;
            assert_eq!(settings.virtual_host, "staging");
            assert_eq!(settings.username, "ops");
            Ok(())
        });
    }

    #[test]
    fn bad_timeout_is_a_configuration_error() {
        let figment = Figment::new().merge(Serialized::defaults(serde_json::json!({
            "host_url": "http://localhost:15672",
            "timeout": "soon",
        })));
        match ClientSettings::from_figment(&figment) {
            Err(HutchError::Configuration { field, .. }) => assert_eq!(field, "settings"),
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn missing_credentials_fail_at_build() {
        let figment = Figment::new().merge(Serialized::defaults(serde_json::json!({
            "host_url": "http://localhost:15672",
        })));
        let settings = ClientSettings::from_figment(&figment).unwrap();
        match settings.into_builder().build() {
            Err(HutchError::Configuration { field, .. }) => assert_eq!(field, "username"),
            other => panic!("expected configuration error, got {other:?}"),
        }
    }
}

use std::{fs, io::ErrorKind, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "scoreboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    /// Shared secret for the setup area. A deterrent, not access control.
    pub setup_password: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8080".into(),
            setup_password: "google".into(),
            request_timeout_secs: 10,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    backend_url: Option<String>,
    setup_password: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then the config file, then the environment.
///
/// An explicit `path` must be readable; the implicit default file is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };
    if let Some(raw) = read_config_file(path, required)? {
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
        info!("config: loaded {}", path.display());
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn read_config_file(path: &Path, required: bool) -> anyhow::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == ErrorKind::NotFound && !required => {
            info!("config: {} not found, using defaults", path.display());
            Ok(None)
        }
        Err(err) => {
            Err(err).with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file.backend_url {
        settings.backend_url = v;
    }
    if let Some(v) = file.setup_password {
        settings.setup_password = v;
    }
    if let Some(v) = file.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SCOREBOARD_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = var("APP__BACKEND_URL") {
        settings.backend_url = v;
    }

    if let Some(v) = var("SCOREBOARD_SETUP_PASSWORD") {
        settings.setup_password = v;
    }
    if let Some(v) = var("APP__SETUP_PASSWORD") {
        settings.setup_password = v;
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(err) => warn!("config: ignoring APP__REQUEST_TIMEOUT_SECS={v}: {err}"),
        }
    }
}

/// Checks the backend base is an http(s) URL and drops trailing slashes.
pub fn normalize_backend_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).with_context(|| format!("invalid backend url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("backend url must start with http:// or https://, got '{raw}'");
    }
    Ok(trimmed.to_string())
}

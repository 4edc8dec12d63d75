use std::{fs, io, path::Path, time::Duration};

use anyhow::{bail, Context};
use client_core::ClientContext;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "blog-admin.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    pub auth_token: Option<String>,
    pub page_size: u32,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:3000/api".into(),
            auth_token: None,
            page_size: 6,
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn client_context(&self) -> ClientContext {
        let context = ClientContext::new(&self.backend_url)
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs));
        match &self.auth_token {
            Some(token) => context.with_auth_token(token),
            None => context,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    backend_url: Option<String>,
    auth_token: Option<String>,
    page_size: Option<u32>,
    request_timeout_secs: Option<u64>,
}

pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file at `path` (if present), then environment.
pub fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
            if let Some(v) = file_cfg.backend_url {
                settings.backend_url = v;
            }
            if let Some(v) = file_cfg.auth_token {
                settings.auth_token = Some(v);
            }
            if let Some(v) = file_cfg.page_size {
                settings.page_size = v;
            }
            if let Some(v) = file_cfg.request_timeout_secs {
                settings.request_timeout_secs = v;
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    if let Some(v) = env("BLOG_ADMIN_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = env("APP__BACKEND_URL") {
        settings.backend_url = v;
    }

    if let Some(v) = env("BLOG_ADMIN_TOKEN") {
        settings.auth_token = Some(v);
    }
    if let Some(v) = env("APP__AUTH_TOKEN") {
        settings.auth_token = Some(v);
    }

    if let Some(v) = env("APP__PAGE_SIZE") {
        settings.page_size = v
            .parse()
            .with_context(|| format!("APP__PAGE_SIZE must be a positive integer, got '{v}'"))?;
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v.parse().with_context(|| {
            format!("APP__REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{v}'")
        })?;
    }

    settings.backend_url = normalize_backend_url(&settings.backend_url)?;
    if settings.page_size == 0 {
        bail!("page_size must be greater than zero");
    }
    Ok(settings)
}

pub fn normalize_backend_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Settings::default().backend_url);
    }

    let parsed =
        url::Url::parse(raw).with_context(|| format!("invalid backend url '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("backend url '{raw}' must use http or https");
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

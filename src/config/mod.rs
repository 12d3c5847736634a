//! Configuration management

use anyhow::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use url::Url;

use crate::error::DashError;
use crate::helpers::fix_basepath;

/// Value of `dash_order` meaning "no layout saved yet".
pub const UNSET_DASH_ORDER: &str = "0";

/// Services the backend hosts routes for. Others must be listed under
/// `[services.<name>]` to be reachable.
pub const KNOWN_SERVICES: &[&str] = &[
    "couchpotato",
    "headphones",
    "kodi",
    "nzbget",
    "plex",
    "qbittorrent",
    "sabnzbd",
    "sickbeard",
    "sickrage",
    "sonarr",
    "stats",
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base path the dashboard is served under (always `/x/` form after load)
    #[serde(default = "default_webdir")]
    pub webdir: String,

    /// Base URL hosting the per-service JSON routes
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Enabled widgets (module ids), in configuration order
    #[serde(default)]
    pub widgets: Vec<String>,

    /// Initial layout order until one is saved from the dashboard
    #[serde(default = "default_dash_order")]
    pub dash_order: String,

    #[serde(default)]
    pub services: HashMap<String, ServiceConfig>,

    /// Keep downloaded artwork on disk
    #[serde(default = "default_true")]
    pub image_cache: bool,
}

fn default_port() -> u16 {
    8085
}

fn default_webdir() -> String {
    "/".to_string()
}

fn default_backend() -> String {
    "http://127.0.0.1:8086".to_string()
}

fn default_dash_order() -> String {
    UNSET_DASH_ORDER.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            webdir: default_webdir(),
            backend: default_backend(),
            widgets: Vec::new(),
            dash_order: default_dash_order(),
            services: HashMap::new(),
            image_cache: true,
        }
    }
}

/// Per-service overrides
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    /// Base URL for this service's routes (defaults to `backend + webdir + name/`)
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Extra headers sent when downloading artwork from this service
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Config {
    /// Base URL for a service's routes, always ending in `/`.
    pub fn service_base(&self, service: &str) -> Result<Url, DashError> {
        if !KNOWN_SERVICES.contains(&service) && !self.services.contains_key(service) {
            return Err(DashError::UnknownService(service.to_string()));
        }
        if let Some(url) = self.services.get(service).and_then(|s| s.url.as_deref()) {
            let mut url = url.trim().to_string();
            if !url.ends_with('/') {
                url.push('/');
            }
            return Ok(Url::parse(&url)?);
        }

        let backend = self.backend.trim().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}{}/", backend, self.webdir, service))?)
    }

    /// Absolute URL for a route of a service, e.g. `kodi` + `GetRecentMovies`.
    pub fn service_url(&self, service: &str, route: &str) -> Result<Url, DashError> {
        Ok(self.service_base(service)?.join(route.trim_start_matches('/'))?)
    }

    /// Path under this dashboard's base path (what the browser requests).
    pub fn web_path(&self, path: &str) -> String {
        format!("{}{}", self.webdir, path.trim_start_matches('/'))
    }

    pub fn service(&self, service: &str) -> Option<&ServiceConfig> {
        self.services.get(service)
    }
}

/// Get config directory (XDG_CONFIG_HOME or platform default)
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MDASH_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join("Library/Application Support/media-dashboard");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("media-dashboard");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".config/media-dashboard");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("media-dashboard");
        }
    }

    PathBuf::from(".")
}

/// Get data directory (XDG_DATA_HOME or platform default)
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MDASH_DATA_DIR") {
        return PathBuf::from(dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join("Library/Application Support/media-dashboard");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("media-dashboard");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".local/share/media-dashboard");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("LOCALAPPDATA") {
            return PathBuf::from(appdata).join("media-dashboard");
        }
    }

    PathBuf::from("./data")
}

pub fn load_config() -> Result<Config> {
    let config_dir = get_config_dir();

    let mut builder = ::config::Config::builder()
        .set_default("port", default_port() as i64)?
        .add_source(
            ::config::File::with_name(&config_dir.join("config").to_string_lossy()).required(false),
        )
        // MDASH_BACKEND, MDASH_SERVICES__KODI__URL, MDASH_WIDGETS=a,b,c ...
        .add_source(
            ::config::Environment::with_prefix("MDASH")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("widgets")
                .try_parsing(true),
        );

    // Explicit precedence: MDASH_PORT > PORT > config > default
    if let Ok(port) = std::env::var("MDASH_PORT") {
        if let Ok(port_num) = port.parse::<u16>() {
            builder = builder.set_override("port", port_num as i64)?;
        }
    } else if let Ok(port) = std::env::var("PORT") {
        if let Ok(port_num) = port.parse::<u16>() {
            builder = builder.set_override("port", port_num as i64)?;
        }
    }

    let mut config: Config = builder.build()?.try_deserialize()?;
    config.webdir = fix_basepath(&config.webdir);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env() {
        for key in ["MDASH_PORT", "PORT", "MDASH_WEBDIR", "MDASH_WIDGETS", "MDASH_BACKEND"] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_config_file() {
        clear_env();
        env::set_var("MDASH_CONFIG_DIR", "/tmp/mdash-test-nonexistent");

        let config = load_config().expect("config should load");

        env::remove_var("MDASH_CONFIG_DIR");

        assert_eq!(config.port, 8085);
        assert_eq!(config.webdir, "/");
        assert_eq!(config.dash_order, UNSET_DASH_ORDER);
        assert!(config.widgets.is_empty());
        assert!(config.image_cache);
    }

    #[test]
    #[serial]
    fn test_port_env_fallback() {
        clear_env();
        env::set_var("MDASH_CONFIG_DIR", "/tmp/mdash-test-nonexistent");
        env::set_var("PORT", "3000");

        let config = load_config().expect("config should load");

        env::remove_var("PORT");
        env::remove_var("MDASH_CONFIG_DIR");

        assert_eq!(config.port, 3000, "PORT env var should set config.port");
    }

    #[test]
    #[serial]
    fn test_mdash_port_takes_precedence_over_port() {
        clear_env();
        env::set_var("MDASH_CONFIG_DIR", "/tmp/mdash-test-nonexistent");
        env::set_var("MDASH_PORT", "5000");
        env::set_var("PORT", "3000");

        let config = load_config().expect("config should load");

        env::remove_var("MDASH_PORT");
        env::remove_var("PORT");
        env::remove_var("MDASH_CONFIG_DIR");

        assert_eq!(config.port, 5000);
    }

    #[test]
    #[serial]
    fn test_invalid_port_uses_default() {
        clear_env();
        env::set_var("MDASH_CONFIG_DIR", "/tmp/mdash-test-nonexistent");
        env::set_var("PORT", "not-a-number");

        let config = load_config().expect("config should load");

        env::remove_var("PORT");
        env::remove_var("MDASH_CONFIG_DIR");

        assert_eq!(config.port, 8085);
    }

    #[test]
    #[serial]
    fn test_config_file_widgets_and_webdir() {
        clear_env();
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        std::fs::write(
            temp_dir.path().join("config.toml"),
            r#"
webdir = "htpc"
backend = "http://media.lan:8085"
widgets = ["dash_rec_movies", "dash_sysinfo"]
dash_order = "dash_sysinfo;dash_rec_movies"

[services.kodi]
url = "http://kodi.lan:8080/api"
"#,
        )
        .expect("write config");
        env::set_var("MDASH_CONFIG_DIR", temp_dir.path());

        let config = load_config().expect("config should load");

        env::remove_var("MDASH_CONFIG_DIR");

        assert_eq!(config.webdir, "/htpc/");
        assert_eq!(config.widgets, vec!["dash_rec_movies", "dash_sysinfo"]);
        assert_eq!(config.dash_order, "dash_sysinfo;dash_rec_movies");
        assert_eq!(
            config.service_url("kodi", "GetRecentMovies").unwrap().as_str(),
            "http://kodi.lan:8080/api/GetRecentMovies"
        );
        assert_eq!(
            config.service_url("stats", "sysinfodash").unwrap().as_str(),
            "http://media.lan:8085/htpc/stats/sysinfodash"
        );
    }

    #[test]
    #[serial]
    fn test_widgets_from_env_list() {
        clear_env();
        env::set_var("MDASH_CONFIG_DIR", "/tmp/mdash-test-nonexistent");
        env::set_var("MDASH_WIDGETS", "dash_qbit,dash_disks");

        let config = load_config().expect("config should load");

        env::remove_var("MDASH_WIDGETS");
        env::remove_var("MDASH_CONFIG_DIR");

        assert_eq!(config.widgets, vec!["dash_qbit", "dash_disks"]);
    }

    #[test]
    fn test_service_url_keeps_query() {
        let config = Config::default();
        let url = config.service_url("sabnzbd", "GetHistory?limit=5").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8086/sabnzbd/GetHistory?limit=5");
    }

    #[test]
    fn test_unknown_service_rejected() {
        let mut config = Config::default();
        assert!(matches!(
            config.service_url("../admin", "GetThumb?thumb=x"),
            Err(DashError::UnknownService(name)) if name == "../admin"
        ));

        config.services.insert(
            "jellyfin".to_string(),
            ServiceConfig {
                url: Some("http://jf.lan:8096".to_string()),
                ..ServiceConfig::default()
            },
        );
        assert_eq!(
            config.service_url("jellyfin", "GetThumb").unwrap().as_str(),
            "http://jf.lan:8096/GetThumb"
        );
    }

    #[test]
    fn test_web_path() {
        let config = Config {
            webdir: "/htpc/".to_string(),
            ..Config::default()
        };
        assert_eq!(config.web_path("kodi/#movies"), "/htpc/kodi/#movies");
        assert_eq!(config.web_path("/img/no-cover-art.svg"), "/htpc/img/no-cover-art.svg");
    }
}

//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{net::SocketAddr, path::PathBuf, str::FromStr};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

mod cli;

pub use cli::{CliArgs, Command, ServeArgs, ServeOverrides};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "mediashelf";
const ENV_PREFIX: &str = "MEDIASHELF";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CACHE_DIR: &str = "cache";
const DEFAULT_RESPONSE_TTL_SECS: u64 = 5;
const DEFAULT_TEMPLATE_TTL_SECS: u64 = 300;
const DEFAULT_CACHE_VERSION: &str = "v1";
const DEFAULT_SIGN_IN_URL: &str = "https://clerk.com/sign-in";

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub cache: CacheSettings,
    pub templates: TemplateSourceSettings,
    pub catalog: CatalogSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Where cached responses are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Filesystem,
    Disabled,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheBackend::Memory),
            "filesystem" | "fs" => Ok(CacheBackend::Filesystem),
            "disabled" | "off" | "none" => Ok(CacheBackend::Disabled),
            other => Err(format!(
                "unknown backend `{other}` (expected memory, filesystem or disabled)"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub backend: CacheBackend,
    /// Root of the filesystem backend.
    pub directory: PathBuf,
    pub response_ttl_seconds: u64,
    pub template_ttl_seconds: u64,
    pub version: String,
}

/// Where template text is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSourceSettings {
    /// Templates compiled into the binary.
    Embedded,
    Directory(PathBuf),
    Http(Url),
}

#[derive(Debug, Clone, Default)]
pub struct CatalogSettings {
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub sign_in_url: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    cache: RawCacheSettings,
    templates: RawTemplateSettings,
    catalog: RawCatalogSettings,
    auth: RawAuthSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(backend) = overrides.cache_backend.as_ref() {
            self.cache.backend = Some(backend.clone());
        }
        if let Some(directory) = overrides.cache_directory.as_ref() {
            self.cache.directory = Some(directory.clone());
        }
        if let Some(ttl) = overrides.cache_response_ttl_seconds {
            self.cache.response_ttl_seconds = Some(ttl);
        }
        if let Some(ttl) = overrides.cache_template_ttl_seconds {
            self.cache.template_ttl_seconds = Some(ttl);
        }
        if let Some(version) = overrides.cache_version.as_ref() {
            self.cache.version = Some(version.clone());
        }
        if let Some(directory) = overrides.templates_directory.as_ref() {
            self.templates.directory = Some(directory.clone());
        }
        if let Some(base_url) = overrides.templates_base_url.as_ref() {
            self.templates.base_url = Some(base_url.clone());
        }
        if let Some(seed_file) = overrides.catalog_seed_file.as_ref() {
            self.catalog.seed_file = Some(seed_file.clone());
        }
        if let Some(url) = overrides.auth_sign_in_url.as_ref() {
            self.auth.sign_in_url = Some(url.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            cache,
            templates,
            catalog,
            auth,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            cache: build_cache_settings(cache)?,
            templates: build_template_settings(templates)?,
            catalog: CatalogSettings {
                seed_file: catalog.seed_file.filter(|path| !path.as_os_str().is_empty()),
            },
            auth: build_auth_settings(auth)?,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    Ok(ServerSettings { addr })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let backend = match cache.backend {
        Some(value) => CacheBackend::from_str(&value)
            .map_err(|reason| LoadError::invalid("cache.backend", reason))?,
        None => CacheBackend::Memory,
    };

    let directory = cache
        .directory
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR));
    if backend == CacheBackend::Filesystem && directory.as_os_str().is_empty() {
        return Err(LoadError::invalid(
            "cache.directory",
            "path must not be empty",
        ));
    }

    let version = cache
        .version
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| DEFAULT_CACHE_VERSION.to_string());
    if version.is_empty() {
        return Err(LoadError::invalid("cache.version", "must not be empty"));
    }
    if version.contains(':') {
        return Err(LoadError::invalid("cache.version", "must not contain `:`"));
    }

    Ok(CacheSettings {
        backend,
        directory,
        response_ttl_seconds: cache
            .response_ttl_seconds
            .unwrap_or(DEFAULT_RESPONSE_TTL_SECS),
        template_ttl_seconds: cache
            .template_ttl_seconds
            .unwrap_or(DEFAULT_TEMPLATE_TTL_SECS),
        version,
    })
}

fn build_template_settings(
    templates: RawTemplateSettings,
) -> Result<TemplateSourceSettings, LoadError> {
    let directory = templates
        .directory
        .filter(|path| !path.as_os_str().is_empty());
    let base_url = templates
        .base_url
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    match (directory, base_url) {
        (Some(_), Some(_)) => Err(LoadError::invalid(
            "templates",
            "set either `directory` or `base_url`, not both",
        )),
        (Some(directory), None) => Ok(TemplateSourceSettings::Directory(directory)),
        (None, Some(base_url)) => {
            let url = Url::parse(&base_url).map_err(|err| {
                LoadError::invalid("templates.base_url", format!("invalid URL: {err}"))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(LoadError::invalid(
                    "templates.base_url",
                    "scheme must be http or https",
                ));
            }
            Ok(TemplateSourceSettings::Http(url))
        }
        (None, None) => Ok(TemplateSourceSettings::Embedded),
    }
}

fn build_auth_settings(auth: RawAuthSettings) -> Result<AuthSettings, LoadError> {
    let sign_in_url = auth
        .sign_in_url
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| DEFAULT_SIGN_IN_URL.to_string());
    if sign_in_url.is_empty() {
        return Err(LoadError::invalid("auth.sign_in_url", "must not be empty"));
    }
    Ok(AuthSettings { sign_in_url })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    backend: Option<String>,
    directory: Option<PathBuf>,
    response_ttl_seconds: Option<u64>,
    template_ttl_seconds: Option<u64>,
    version: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawTemplateSettings {
    directory: Option<PathBuf>,
    base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCatalogSettings {
    seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAuthSettings {
    sign_in_url: Option<String>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

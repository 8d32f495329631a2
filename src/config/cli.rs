use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the mediashelf binary.
#[derive(Debug, Parser)]
#[command(name = "mediashelf", version, about = "Mediashelf media catalog server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "MEDIASHELF_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP server.
    Serve(Box<ServeArgs>),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the response cache backend (memory|filesystem|disabled).
    #[arg(long = "cache-backend", value_name = "BACKEND")]
    pub cache_backend: Option<String>,

    /// Override the filesystem cache directory.
    #[arg(long = "cache-directory", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub cache_directory: Option<PathBuf>,

    /// Override the response cache TTL.
    #[arg(long = "cache-response-ttl-seconds", value_name = "SECONDS")]
    pub cache_response_ttl_seconds: Option<u64>,

    /// Override the template cache TTL.
    #[arg(long = "cache-template-ttl-seconds", value_name = "SECONDS")]
    pub cache_template_ttl_seconds: Option<u64>,

    /// Override the cache key version prefix.
    #[arg(long = "cache-version", value_name = "VERSION")]
    pub cache_version: Option<String>,

    /// Read templates from a local directory.
    #[arg(long = "templates-directory", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub templates_directory: Option<PathBuf>,

    /// Fetch templates from `<URL>/templates/<name>.html`.
    #[arg(long = "templates-base-url", value_name = "URL")]
    pub templates_base_url: Option<String>,

    /// Load the media catalog from a TOML seed file.
    #[arg(long = "catalog-seed-file", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub catalog_seed_file: Option<PathBuf>,

    /// Override the sign-in link target.
    #[arg(long = "auth-sign-in-url", value_name = "URL")]
    pub auth_sign_in_url: Option<String>,
}

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::widget::{HtmlPolicy, ReplyDelay, WidgetOptions};

/// Default configuration file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Chat endpoint the widget posts to
    #[arg(long, env = "CHAT_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Directory holding the knowledge base CSV files
    #[arg(long, env = "DATA_DIR")]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Serve the widget page and the chat endpoint (default)
    Serve,
    /// Chat with the endpoint from the terminal
    Console,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub widget: WidgetConfig,
    pub knowledge: KnowledgeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    pub timeout_disabled: bool,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    /// URL the console widget posts messages to.
    pub endpoint_url: String,
    /// URL the served page posts messages to, absolute or relative to the
    /// page.
    pub page_endpoint_url: String,
    pub reply_delay_min_ms: u64,
    pub reply_delay_max_ms: u64,
    pub html_policy: HtmlPolicy,
    pub composer_max_height_px: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KnowledgeConfig {
    pub data_dir: PathBuf,
}

impl WidgetConfig {
    pub fn endpoint(&self) -> Result<url::Url, url::ParseError> {
        url::Url::parse(&self.endpoint_url)
    }

    /// The page URL resolved against `base`, for validation.
    pub fn page_endpoint(&self, base: &url::Url) -> Result<url::Url, url::ParseError> {
        base.join(&self.page_endpoint_url)
    }

    pub fn options(&self) -> WidgetOptions {
        WidgetOptions {
            reply_delay: ReplyDelay::from_millis(self.reply_delay_min_ms, self.reply_delay_max_ms),
            html_policy: self.html_policy,
            composer_max_height_px: self.composer_max_height_px,
        }
    }
}

impl AppConfig {
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(&cli)
    }

    /// Layering, lowest first: defaults, config file, `CHAT_*` environment,
    /// CLI flags (which also read their own env vars through clap).
    pub fn from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.static_dir", "static")?
            .set_default("server.timeout_disabled", false)?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("widget.endpoint_url", "http://127.0.0.1:3000/chat")?
            .set_default("widget.page_endpoint_url", "/chat")?
            .set_default("widget.reply_delay_min_ms", 1000)?
            .set_default("widget.reply_delay_max_ms", 2000)?
            .set_default("widget.html_policy", "verbatim")?
            .set_default("knowledge.data_dir", "Data")?;

        match &cli.config {
            Some(path) => {
                builder = builder.add_source(File::from(Path::new(path)).required(true));
            }
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                builder = builder.add_source(File::from(Path::new(DEFAULT_CONFIG_FILE)));
            }
            None => {}
        }

        // E.g. CHAT_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("CHAT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(url) = &cli.endpoint_url {
            builder = builder.set_override("widget.endpoint_url", url.as_str())?;
        }
        if let Some(dir) = &cli.data_dir {
            builder = builder.set_override("knowledge.data_dir", dir.as_str())?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        let endpoint = self.widget.endpoint().map_err(|e| {
            config::ConfigError::Message(format!(
                "widget.endpoint_url '{}' is not a valid URL: {e}",
                self.widget.endpoint_url
            ))
        })?;
        if self.widget.page_endpoint_url.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "widget.page_endpoint_url must not be empty".to_string(),
            ));
        }
        self.widget.page_endpoint(&endpoint).map_err(|e| {
            config::ConfigError::Message(format!(
                "widget.page_endpoint_url '{}' is not a valid URL: {e}",
                self.widget.page_endpoint_url
            ))
        })?;
        if self.widget.reply_delay_min_ms > self.widget.reply_delay_max_ms {
            return Err(config::ConfigError::Message(format!(
                "widget.reply_delay_min_ms ({}) exceeds widget.reply_delay_max_ms ({})",
                self.widget.reply_delay_min_ms, self.widget.reply_delay_max_ms
            )));
        }
        Ok(())
    }
}

// src/config/mod.rs
// Relay configuration: CLI flags with environment fallbacks, validated once at startup

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::error::{RelayError, Result};
use crate::llm::gemini::DEFAULT_API_BASE;
use crate::persona::PersonaOverlay;

pub const DEFAULT_PORT: u16 = 3001;

/// Raw command line / environment input
#[derive(Parser, Debug, Clone)]
#[command(name = "folio-relay")]
#[command(about = "Chat relay for the portfolio site")]
pub struct RelayArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Model id tried before the preference list
    #[arg(long = "model", env = "MODEL_ID")]
    pub model_override: Option<String>,

    /// Hide internal error text from clients
    #[arg(long, env = "RELAY_PRODUCTION")]
    pub production: bool,

    /// Gemini REST base URL (including the API version)
    #[arg(long, env = "GEMINI_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Persona overlay: "portfolio" or "plain"
    #[arg(long, env = "RELAY_PERSONA", default_value = "portfolio")]
    pub persona: String,

    /// Directory of static site files served for unmatched routes
    #[arg(long, env = "RELAY_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Upper bound on generated tokens per reply
    #[arg(long, env = "RELAY_MAX_OUTPUT_TOKENS", default_value_t = 1024)]
    pub max_output_tokens: u32,

    /// Upstream request timeout in seconds
    #[arg(long, env = "RELAY_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,
}

/// Validated relay configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub api_key: Option<String>,
    pub host: String,
    pub port: u16,
    pub model_override: Option<String>,
    pub production: bool,
    pub api_base: Url,
    pub persona: PersonaOverlay,
    pub static_dir: Option<PathBuf>,
    pub max_output_tokens: u32,
    pub request_timeout: Duration,
}

impl RelayConfig {
    /// Validate raw args. A missing API key is not an error here; it is
    /// reported when the first upstream call is made.
    pub fn from_args(args: RelayArgs) -> Result<Self> {
        let api_base = parse_api_base(&args.api_base)?;
        let persona = args.persona.parse::<PersonaOverlay>().map_err(RelayError::Config)?;

        if args.max_output_tokens == 0 {
            return Err(RelayError::Config("max output tokens must be greater than zero".into()));
        }
        if args.timeout_secs == 0 {
            return Err(RelayError::Config("timeout must be greater than zero".into()));
        }

        Ok(Self {
            api_key: non_blank(args.api_key),
            host: args.host,
            port: args.port,
            model_override: non_blank(args.model_override),
            production: args.production,
            api_base,
            persona,
            static_dir: args.static_dir,
            max_output_tokens: args.max_output_tokens,
            request_timeout: Duration::from_secs(args.timeout_secs),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Log the effective configuration without exposing the key
    pub fn log_summary(&self) {
        if self.api_key.is_none() {
            warn!("GEMINI_API_KEY is not set - chat requests will fail until it is configured");
        }
        info!(
            port = self.port,
            persona = %self.persona,
            production = self.production,
            api_base = %self.api_base,
            "Relay configuration loaded"
        );
        if let Some(model) = &self.model_override {
            info!(model = %model, "MODEL_ID override");
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_api_base(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim().trim_end_matches('/'))
        .map_err(|e| RelayError::Config(format!("invalid API base '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RelayError::Config(format!(
            "API base must be http or https, got '{other}'"
        ))),
    }
}

//! Command-line interface parsing and startup
//!
//! Flags override the matching fields of the TOML config before the chat
//! interface starts.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info};

use crate::core::app::AppSettings;
use crate::core::config::Config;
use crate::core::gateway::{api_key_from_env, GeminiBackend, ModelGateway};
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::init_tracing;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "spark")]
#[command(version = VERSION)]
#[command(about = "A terminal chat interface for Gemini with image attachments")]
#[command(
    long_about = "Spark is a full-screen terminal chat interface that sends your message, \
and optionally one image, to a Gemini model and renders the answer as markdown.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY    Your Gemini API key (API_KEY is used as a fallback)\n\
  SPARK_LOG         Log filter for the diagnostic log file (default: spark=info)\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt/Shift+Enter   Insert a newline\n\
  Ctrl+O            Attach an image by path\n\
  Ctrl+X            Remove the pending image\n\
  PgUp/PgDn/Mouse   Scroll through the conversation\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    /// Model identifier, e.g. gemini-2.5-flash
    #[arg(short = 'm', long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Base URL of the Gemini REST API
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write diagnostic logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Color theme (dark or light)
    #[arg(long, value_name = "THEME")]
    pub theme: Option<String>,

    /// Show model replies as plain text
    #[arg(long)]
    pub no_markdown: bool,

    /// Disable syntax highlighting in code blocks
    #[arg(long)]
    pub no_syntax: bool,
}

impl Args {
    /// Fold flag values into `config`; flags win over file values.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.model = Some(model.clone());
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = Some(base_url.clone());
        }
        if let Some(theme) = &self.theme {
            config.theme = Some(theme.clone());
        }
        if self.no_markdown {
            config.markdown = Some(false);
        }
        if self.no_syntax {
            config.syntax = Some(false);
        }
    }
}

fn load_config(args: &Args) -> Result<Config, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    args.apply_to(&mut config);
    Ok(config)
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = load_config(&args)?;

    if let Some(path) = init_tracing(args.log_file.clone())? {
        debug!(path = %path.display(), "logging initialized");
    }
    info!(
        model = config.model(),
        base_url = config.base_url(),
        "starting spark"
    );

    let backend = GeminiBackend::new(
        config.base_url(),
        api_key_from_env(),
        config.request_timeout(),
    )?;
    let gateway = ModelGateway::new(Arc::new(backend), config.model())
        .with_generation_config(config.generation_config());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_chat(AppSettings::from_config(&config), gateway))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_short_and_long_flags() {
        let args = Args::try_parse_from([
            "spark",
            "-m",
            "gemini-2.5-pro",
            "--base-url",
            "http://localhost:8080",
            "--theme",
            "light",
            "--no-syntax",
        ])
        .unwrap();

        assert_eq!(args.model.as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(args.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(args.theme.as_deref(), Some("light"));
        assert!(args.no_syntax);
        assert!(!args.no_markdown);
        assert!(args.config.is_none());
    }

    #[test]
    fn flags_override_config_values() {
        let mut config = Config {
            model: Some("from-file".to_string()),
            markdown: Some(true),
            ..Config::default()
        };
        let args = Args::try_parse_from(["spark", "--model", "from-flag", "--no-markdown"]).unwrap();

        args.apply_to(&mut config);

        assert_eq!(config.model(), "from-flag");
        assert!(!config.markdown_enabled());
    }

    #[test]
    fn absent_flags_keep_config_values() {
        let mut config = Config {
            theme: Some("light".to_string()),
            syntax: Some(true),
            ..Config::default()
        };
        let args = Args::try_parse_from(["spark"]).unwrap();

        args.apply_to(&mut config);

        assert_eq!(config.theme_name(), "light");
        assert!(config.syntax_enabled());
    }

    #[test]
    fn config_flag_reads_the_given_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "model = \"gemini-from-file\"\n").unwrap();
        let path_arg = path.to_string_lossy().to_string();

        let args = Args::try_parse_from(["spark", "-c", &path_arg]).unwrap();
        let config = load_config(&args).unwrap();

        assert_eq!(config.model(), "gemini-from-file");
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "model = [").unwrap();
        let path_arg = path.to_string_lossy().to_string();

        let args = Args::try_parse_from(["spark", "--config", &path_arg]).unwrap();
        assert!(load_config(&args).is_err());
    }
}

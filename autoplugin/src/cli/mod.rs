//! CLI module for autoplugin
//!
//! Command-line interface for the demo plugin server.

pub mod generate;
pub mod serve;

use clap::{Parser, Subcommand};

/// autoplugin - Turn functions into ChatGPT plugin endpoints
#[derive(Parser, Debug)]
#[command(name = "autoplugin")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    AUTOPLUGIN_HOST             Bind address (default: 127.0.0.1)
    AUTOPLUGIN_PORT             Listen port (default: 8000)
    AUTOPLUGIN_LOG_LEVEL        Log level (default: info)
    AUTOPLUGIN_LOG_DIR          Directory for daily rolling log files
    AUTOPLUGIN_OPENAI_MODEL     Model used for description generation (default: gpt-4o-mini)
    AUTOPLUGIN_OPENAI_BASE_URL  OpenAI API base URL (default: https://api.openai.com)
    OPENAI_API_KEY              Credential for description generation
    AUTOPLUGIN_STRICT_DESCRIPTIONS  Same as --strict-descriptions
"#)]
pub struct Cli {
    /// Fail instead of using a fixed description when description generation is unavailable
    #[arg(long, global = true, env = "AUTOPLUGIN_STRICT_DESCRIPTIONS")]
    pub strict_descriptions: bool,

    /// Subcommand to execute (default: generate, then serve)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the plugin server
    Serve(serve::ServeArgs),
    /// Write openapi.yaml and ai-plugin.json
    Generate(generate::GenerateArgs),
}

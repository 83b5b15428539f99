//! Command-line surface and runtime bootstrap.
//!
//! The client is interactive only: clap contributes `--help` and
//! `--version`, nothing else.

use std::error::Error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::ui::chat_loop::run_chat;

#[derive(Parser)]
#[command(name = "causerie")]
#[command(version)]
#[command(about = "A line-oriented terminal chat client that keeps conversations on disk")]
#[command(long_about = "Causerie is a line-oriented terminal chat client that keeps named \
conversations on disk and forwards them to an OpenAI-compatible API.\n\n\
Environment Variables:\n\
  OPENAI_API_KEY    Your API key (required; a .env file is honored)\n\
  OPENAI_BASE_URL   Custom API base URL (optional, defaults to https://api.openai.com/v1)\n\n\
Session:\n\
  Pick a conversation or start a new one, then type your message across\n\
  as many lines as you like and finish it with done, end, or eof on its\n\
  own line. Type clear to wipe the screen, or exit to leave.")]
pub struct Args {}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    // Parse runs for --help/--version; there are no other flags.
    Args::parse();

    // `.env` must load before credential resolution.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run_chat().await {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_parses() {
        assert!(Args::try_parse_from(["causerie"]).is_ok());
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Args::try_parse_from(["causerie", "--model", "gpt-4o"]).is_err());
        assert!(Args::try_parse_from(["causerie", "chat"]).is_err());
    }
}

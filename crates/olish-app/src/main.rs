//! oli-shell interactive entry point.
//!
//! Reads lines from standard input and prints their output. A line ending
//! in a tab, or starting with `:complete `, prints the completion candidates
//! for the text before the tab instead of running it. `:history` lists the
//! most recent lines.

mod repl;
mod session_setup;

use anyhow::Result;

use olish_types::config::SessionConfig;
use repl::Repl;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Resolve config from --config, OLISH_CONFIG, or the built-in portfolio.
    let config_path = session_setup::config_path(
        std::env::args().skip(1),
        std::env::var(session_setup::CONFIG_ENV).ok(),
    )?;
    let config = match &config_path {
        Some(path) => session_setup::load_config(path)?,
        None => SessionConfig::default(),
    };

    let (registry, mut state) = session_setup::build_session(&config)?;
    log::info!("Starting oli-shell in {}", state.current_directory_path(false));

    let mut repl = Repl::new(&registry);
    repl.run(&mut state, std::io::stdin().lock(), std::io::stdout().lock())
}

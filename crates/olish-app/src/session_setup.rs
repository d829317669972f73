use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use olish_terminal::{CommandRegistry, SystemState, register_builtins};
use olish_types::config::SessionConfig;

/// Environment variable naming a session config file.
pub const CONFIG_ENV: &str = "OLISH_CONFIG";

/// Pick the config file from `--config <path>`, falling back to `env_value`.
pub fn config_path<I>(args: I, env_value: Option<String>) -> Result<Option<PathBuf>>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args.next().context("--config requires a path")?;
            return Ok(Some(PathBuf::from(path)));
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Ok(Some(PathBuf::from(path)));
        }
        bail!("unexpected argument: {arg}");
    }
    Ok(env_value.filter(|v| !v.is_empty()).map(PathBuf::from))
}

/// Load a session config, choosing the parser from the file extension.
pub fn load_config(path: &Path) -> Result<SessionConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => SessionConfig::from_toml_str(&text),
        Some("json") => SessionConfig::from_json_str(&text),
        _ => bail!("unsupported config format: {}", path.display()),
    }
    .with_context(|| format!("parsing {}", path.display()))?;
    log::info!("Loaded session config from {}", path.display());
    Ok(config)
}

/// Build the registry and session for `config`.
pub fn build_session(config: &SessionConfig) -> Result<(CommandRegistry, SystemState)> {
    let state = SystemState::from_config(config).context("building session")?;
    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry);
    log::info!("Registered {} commands", registry.list_commands().len());
    Ok((registry, state))
}

//! Subcommand orchestration.
//!
//! Each command exposes a library-level function taking explicit inputs and
//! a [`MappingStore`](crate::mapping::MappingStore), plus a `run` wrapper used
//! by the binary that resolves defaults and converts errors to
//! [`anyhow::Error`].
pub mod clean;
pub mod completions;
pub mod install;
pub mod version;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::ConfigError;
use crate::logging::Log;

/// Load the rules file named by `--config`, or the default one.
///
/// # Errors
///
/// Returns an error if the chosen file exists but cannot be read or parsed.
pub fn load_config(global: &GlobalOpts, log: &dyn Log) -> Result<Config, ConfigError> {
    log.stage("Loading configuration");
    let path = global.config.clone().or_else(Config::default_path);
    match &path {
        Some(p) if p.exists() => log.info(&format!("rules: {}", p.display())),
        _ => log.info("rules: built-in defaults"),
    }

    let config = Config::load_or_default(path.as_deref())?;
    log.debug(&format!("ignore names: {:?}", config.ignore.names));
    log.debug(&format!("ignore prefixes: {:?}", config.ignore.prefixes));
    log.debug(&format!("ignore suffixes: {:?}", config.ignore.suffixes));
    log.debug(&format!("explode: {:?}", config.merge.explode));
    log.debug(&format!("system dirs: {:?}", config.clean.system_dirs));
    Ok(config)
}

use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_CONFIG_FILE: &str = "campus";
const ENV_PREFIX: &str = "CAMPUS";

/// Custom error type for config loading.
#[campus_derive::campus_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads a configuration tree from a file layered under environment overrides.
///
/// 1. **Base File**: `path` (any format the `config` crate detects from the extension). When
///    `path` is `None` the loader looks for `campus.*` in the working directory and carries on
///    with defaults if there is none; an explicit path must exist.
/// 2. **Environment Overrides**: variables prefixed with `CAMPUS__`, nested with double
///    underscores (`CAMPUS__API__BASE_URL` maps to `api.base_url`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing, a source is malformed, or the
/// merged values do not fit `T`.
///
/// # Example
/// ```rust
/// use campus_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_layered(path, None)
}

/// Same as [`load_config`] with the environment replaced by `env`. Used by tests and tools that
/// must not depend on the process environment.
///
/// # Errors
/// See [`load_config`].
pub fn load_layered<T>(
    path: Option<impl AsRef<Path>>,
    env: Option<Map<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = match path {
        Some(p) => (p.as_ref().to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake)
                .source(env),
        );

    info!(path = %effective_path.display(), required, "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

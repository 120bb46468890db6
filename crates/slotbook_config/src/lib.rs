use config::{Config, ConfigError, Environment, File};
use std::sync::Once;

pub mod models;
pub use models::*;

static DOTENV: Once = Once::new();

/// Load `.env` once per process, no matter how many crates ask for config.
pub fn ensure_dotenv_loaded() {
    DOTENV.call_once(|| {
        let _ = dotenv::dotenv();
    });
}

/// Loads the application configuration.
///
/// Layered: `config/default.toml`, then an optional file named by `RUN_ENV`
/// (e.g. `config/production.toml`), then environment overrides with the
/// `SLOTBOOK` prefix and `__` separators (`SLOTBOOK__SERVER__PORT=8086`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_env}")).required(false))
        .add_source(Environment::with_prefix("SLOTBOOK").separator("__"))
        .build()?
        .try_deserialize()
}

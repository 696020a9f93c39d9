pub mod paths;
pub mod settings;

pub use paths::PathManager;
pub use settings::{DEFAULT_BASE_URL, Settings};

/// Load environment variables from .env files.
/// dotenv never overwrites a variable that is already set, so the process
/// environment wins, then ./.env (project directory), then ~/.env.
/// Call this before parsing CLI args to ensure env vars are available.
pub fn load_env_file() {
    dotenv::dotenv().ok();

    if let Some(home) = dirs::home_dir() {
        dotenv::from_path(home.join(".env")).ok();
    }
}

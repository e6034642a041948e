//! Environment file loading
//!
//! Priority order (highest to lowest):
//! 1. Variables already set in the process environment
//! 2. ./.env in the current directory
//! 3. ~/.feedback/.env

use std::path::PathBuf;

/// Directory holding user-wide settings (~/.feedback)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".feedback"))
}

/// Load .env files and return the paths that were read.
///
/// Runs before tracing is initialized (RUST_LOG may live in a .env), so the
/// caller logs the result.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded.push(path);
    }

    // dotenvy never overwrites variables that are already set
    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded.push(env_file);
        }
    }

    loaded
}

/// Log which .env files were read.
pub fn report_dotenv(loaded: &[PathBuf]) {
    if loaded.is_empty() {
        tracing::debug!("no .env files found (current dir or ~/.feedback)");
    } else {
        for path in loaded {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_is_under_home() {
        if let (Some(dir), Some(home)) = (config_dir(), dirs::home_dir()) {
            assert!(dir.starts_with(home));
            assert!(dir.ends_with(".feedback"));
        }
    }
}

use std::{env, path::PathBuf};

/// Name used for the config directory and for re-invocation from generated scripts
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Profile used when `AWS_PROFILE` is unset or empty
pub const DEFAULT_PROFILE: &str = "default";

/// Environment variable selecting the active AWS profile
pub const AWS_PROFILE_ENV: &str = "AWS_PROFILE";

/// AWS configuration directory name
pub const AWS_CONFIG_DIR_NAME: &str = ".aws";

/// AWS configuration file name
pub const AWS_CONFIG_FILE_NAME: &str = "config";

/// Session cache directory name under the app config directory
pub const SESSIONS_DIR_NAME: &str = "sessions";

/// Default requested session lifetime (12 hours)
pub const DEFAULT_DURATION_SECONDS: i32 = 43_200;

/// Upper bound STS accepts for chained role assumption
pub const MAX_ASSUME_ROLE_DURATION_SECONDS: i32 = 3_600;

/// Default AWS region for STS operations when no region is configured
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Returns the profile named by `AWS_PROFILE`, or `default`
pub fn active_profile() -> String {
    env::var(AWS_PROFILE_ENV)
        .ok()
        .filter(|profile| !profile.is_empty())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
}

/// Default session cache directory: ~/.config/stsmfa/sessions
pub fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(env::temp_dir)
        .join(".config")
        .join(APP_NAME)
        .join(SESSIONS_DIR_NAME)
}

/// Get the AWS config file path
/// Respects AWS_CONFIG_FILE environment variable if set
pub fn get_aws_config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("AWS_CONFIG_FILE") {
        return Some(PathBuf::from(path));
    }

    dirs::home_dir().map(|home| home.join(AWS_CONFIG_DIR_NAME).join(AWS_CONFIG_FILE_NAME))
}

use std::path::PathBuf;

use ini::{Ini, Properties};
use tracing::debug;

use crate::{
    constants,
    error::{Error, Result},
};

/// MFA-relevant settings of one profile in the shared AWS config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    pub source_profile: Option<String>,
    pub mfa_serial: Option<String>,
    pub role_arn: Option<String>,
}

impl ProfileConfig {
    fn from_ini_section(section: &Properties) -> Self {
        let value = |key: &str| {
            section
                .get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        Self {
            source_profile: value("source_profile"),
            mfa_serial: value("mfa_serial"),
            role_arn: value("role_arn"),
        }
    }
}

/// Looks up profiles in the shared AWS config file
#[derive(Debug, Clone)]
pub struct ProfileResolver {
    path: Option<PathBuf>,
}

impl ProfileResolver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Resolver for `AWS_CONFIG_FILE` or ~/.aws/config
    pub fn from_env() -> Self {
        Self {
            path: constants::get_aws_config_path(),
        }
    }

    /// Missing file or section yields an empty config; only unreadable
    /// content is an error. `[name]` wins over `[profile name]`.
    pub fn resolve(&self, profile: &str) -> Result<ProfileConfig> {
        let Some(path) = self.path.as_deref().filter(|p| p.exists()) else {
            debug!("No AWS config file found, using empty profile config");
            return Ok(ProfileConfig::default());
        };

        let ini = Ini::load_from_file(path).map_err(|e| Error::config_read(path, e))?;

        let profile_section = format!("profile {profile}");
        let section = ini
            .section(Some(profile))
            .or_else(|| ini.section(Some(profile_section.as_str())));

        let config = section
            .map(ProfileConfig::from_ini_section)
            .unwrap_or_default();
        debug!(
            "Resolved profile '{}': role_arn={:?}, mfa_serial={:?}, source_profile={:?}",
            profile, config.role_arn, config.mfa_serial, config.source_profile
        );
        Ok(config)
    }
}

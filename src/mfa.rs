use std::{io::Write, path::Path};

use aws_smithy_types::date_time::Format;
use tracing::info;

use crate::{
    artifacts::{self, ScriptParams},
    aws::{Credentials, IdentityConnector, issuer},
    error::{Error, Result},
    profile::ProfileResolver,
    prompt::MfaPrompt,
    session::{self, SessionKey},
};

/// Result of a successful run
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// An unexpired cached session was found; nothing was written
    Reused(Credentials),
    /// New credentials were issued, cached and rendered to artifacts
    Issued(Credentials),
}

impl SessionOutcome {
    pub fn credentials(&self) -> &Credentials {
        match self {
            Self::Reused(creds) | Self::Issued(creds) => creds,
        }
    }
}

/// Drives one MFA session run: reuse the cache or prompt, issue, save and render
pub struct MfaSession {
    profile: String,
    resolver: ProfileResolver,
    prompt: Box<dyn MfaPrompt>,
    connector: Box<dyn IdentityConnector>,
}

impl MfaSession {
    /// `profile` is the active profile name, normally taken from `AWS_PROFILE`
    pub fn new(
        profile: impl Into<String>,
        resolver: ProfileResolver,
        prompt: Box<dyn MfaPrompt>,
        connector: Box<dyn IdentityConnector>,
    ) -> Self {
        Self {
            profile: profile.into(),
            resolver,
            prompt,
            connector,
        }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// An empty `session_name` falls back to the profile name. Any failure aborts the
    /// run; files written by earlier steps are left in place.
    pub async fn run(
        &self,
        out: &mut dyn Write,
        cache_dir: &Path,
        session_name: &str,
        duration_seconds: i32,
    ) -> Result<SessionOutcome> {
        let session_name = if session_name.is_empty() {
            self.profile.as_str()
        } else {
            session_name
        };
        let key = SessionKey::new(cache_dir, session_name);

        if let Some(credentials) = session::load(&key).await? {
            info!("Using cached session '{}'", key.name());
            return Ok(SessionOutcome::Reused(credentials));
        }

        info!("Starting MFA authentication for profile: {}", self.profile);
        let config = self.resolver.resolve(&self.profile)?;
        let token_code = self.prompt.collect()?;
        let credentials = issuer::issue(
            self.connector.as_ref(),
            &self.profile,
            &config,
            &token_code,
            duration_seconds,
        )
        .await?;

        session::save(&key, &credentials).await?;

        let env_path = key.env_path();
        artifacts::write_env(&credentials, &env_path).await?;
        artifacts::write_script(
            &ScriptParams {
                profile: &self.profile,
                cache_dir,
                session_name: key.name(),
                duration_seconds,
            },
            &key.script_path(),
            &env_path,
        )
        .await?;

        let expiration = credentials
            .expiration
            .fmt(Format::DateTime)
            .unwrap_or_else(|_| "unknown".to_string());
        writeln!(out, "Credentials cached for session '{}'.", key.name()).map_err(Error::Output)?;
        writeln!(out, "Load them with: . {}", env_path.display()).map_err(Error::Output)?;
        writeln!(out, "Credentials will expire at: {expiration}").map_err(Error::Output)?;

        Ok(SessionOutcome::Issued(credentials))
    }
}

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::{
    aws::sts::StsConnector,
    constants::{self, DEFAULT_DURATION_SECONDS},
    mfa::{MfaSession, SessionOutcome},
    profile::ProfileResolver,
    prompt::{MfaPrompt, StaticPrompt, TerminalPrompt},
};

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct AuthCommand {
    #[arg(long, default_value_os_t = constants::default_cache_dir(), help = "Directory holding cached sessions and generated artifacts")]
    pub cache_dir: PathBuf,

    #[arg(long, help = "Cache entry name (defaults to the profile name)")]
    pub session_name: Option<String>,

    #[arg(long, default_value_t = DEFAULT_DURATION_SECONDS, value_parser = clap::value_parser!(i32).range(900..), help = "Requested session lifetime; capped at 3600 when assuming a role")]
    pub duration_seconds: i32,

    #[arg(long, help = "MFA code to use instead of prompting on the terminal")]
    pub token_code: Option<String>,
}

impl Default for AuthCommand {
    fn default() -> Self {
        Self {
            cache_dir: constants::default_cache_dir(),
            session_name: None,
            duration_seconds: DEFAULT_DURATION_SECONDS,
            token_code: None,
        }
    }
}

impl AuthCommand {
    pub async fn execute(self, region: Option<String>) -> Result<()> {
        let profile = constants::active_profile();
        info!("Authenticating profile: {}", profile);

        let prompt: Box<dyn MfaPrompt> = match self.token_code {
            Some(code) => Box::new(StaticPrompt(code)),
            None => Box::new(TerminalPrompt),
        };
        let session = MfaSession::new(
            profile,
            ProfileResolver::from_env(),
            prompt,
            Box::new(StsConnector::new(region)),
        );

        // The summary goes to stderr so wrapped commands own stdout
        let outcome = session
            .run(
                &mut io::stderr(),
                &self.cache_dir,
                self.session_name.as_deref().unwrap_or_default(),
                self.duration_seconds,
            )
            .await
            .with_context(|| {
                format!(
                    "Failed to authenticate profile '{}'",
                    session.profile()
                )
            })?;

        if let SessionOutcome::Reused(_) = outcome {
            info!("Cached session is still valid");
        }
        Ok(())
    }
}

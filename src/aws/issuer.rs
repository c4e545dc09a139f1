use tracing::{debug, info};

use super::{AssumeRoleRequest, Credentials, IdentityConnector, SessionTokenRequest};
use crate::{constants::MAX_ASSUME_ROLE_DURATION_SECONDS, error::Result, profile::ProfileConfig};

/// How temporary credentials are obtained, keyed on whether a role is configured
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueStrategy {
    AssumeRole {
        role_arn: String,
        mfa_serial: Option<String>,
    },
    SessionToken,
}

impl IssueStrategy {
    pub fn for_profile(config: &ProfileConfig) -> Self {
        match &config.role_arn {
            Some(role_arn) => Self::AssumeRole {
                role_arn: role_arn.clone(),
                mfa_serial: config.mfa_serial.clone(),
            },
            None => Self::SessionToken,
        }
    }
}

/// Profile whose long-lived keys sign the STS calls
pub fn session_profile<'a>(profile: &'a str, config: &'a ProfileConfig) -> &'a str {
    config.source_profile.as_deref().unwrap_or(profile)
}

/// MFA device ARN for an IAM user: replaces the first `:user` with `:mfa`
pub fn derive_mfa_serial(identity_arn: &str) -> String {
    identity_arn.replacen(":user", ":mfa", 1)
}

/// Exchanges an MFA code for temporary credentials. API failures are returned as-is.
pub async fn issue(
    connector: &dyn IdentityConnector,
    profile: &str,
    config: &ProfileConfig,
    token_code: &str,
    duration_seconds: i32,
) -> Result<Credentials> {
    let api = connector.connect(session_profile(profile, config)).await?;

    let credentials = match IssueStrategy::for_profile(config) {
        IssueStrategy::AssumeRole {
            role_arn,
            mfa_serial,
        } => {
            let duration_seconds = duration_seconds.min(MAX_ASSUME_ROLE_DURATION_SECONDS);
            info!("Assuming role {} as session '{}'", role_arn, profile);
            api.assume_role(AssumeRoleRequest {
                role_arn,
                mfa_serial,
                token_code: token_code.to_string(),
                duration_seconds,
                session_name: profile.to_string(),
            })
            .await?
        }
        IssueStrategy::SessionToken => {
            let identity_arn = api.get_caller_identity().await?;
            let mfa_serial = derive_mfa_serial(&identity_arn);
            info!("Requesting session token for MFA device {}", mfa_serial);
            api.get_session_token(SessionTokenRequest {
                mfa_serial,
                token_code: token_code.to_string(),
                duration_seconds,
            })
            .await?
        }
    };

    debug!("Issued credentials expire at {:?}", credentials.expiration);
    Ok(credentials)
}

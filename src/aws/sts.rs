use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_sts::{Client as StsClient, error::DisplayErrorContext, types};
use tracing::{debug, info};

use super::{
    AssumeRoleRequest, Credentials, IdentityApi, IdentityConnector, SessionTokenRequest,
};
use crate::{
    constants::DEFAULT_AWS_REGION,
    error::{Error, Result},
};

/// Builds STS clients from the standard AWS SDK configuration chain
#[derive(Debug, Clone, Default)]
pub struct StsConnector {
    region: Option<String>,
}

impl StsConnector {
    pub fn new(region: Option<String>) -> Self {
        Self { region }
    }

    async fn load_config(&self, profile: &str) -> SdkConfig {
        if let Some(region) = &self.region {
            info!("Using region: {}", region);
            return aws_config::defaults(BehaviorVersion::latest())
                .profile_name(profile)
                .region(Region::new(region.clone()))
                .load()
                .await;
        }

        // Priority: ENV vars -> Config file -> EC2 metadata -> DEFAULT_AWS_REGION
        let loaded = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(profile)
            .load()
            .await;

        match loaded.region() {
            Some(region) => {
                info!("Using region: {}", region);
                loaded
            }
            None => {
                info!(
                    "No region configured, using default {} for STS",
                    DEFAULT_AWS_REGION
                );
                aws_config::defaults(BehaviorVersion::latest())
                    .profile_name(profile)
                    .region(Region::new(DEFAULT_AWS_REGION))
                    .load()
                    .await
            }
        }
    }
}

#[async_trait]
impl IdentityConnector for StsConnector {
    async fn connect(&self, profile: &str) -> Result<Box<dyn IdentityApi>> {
        debug!("Loading AWS SDK config for profile: {}", profile);
        let config = self.load_config(profile).await;
        Ok(Box::new(StsIdentityApi {
            client: StsClient::new(&config),
        }))
    }
}

/// [`IdentityApi`] backed by the AWS STS service
#[derive(Debug, Clone)]
pub struct StsIdentityApi {
    client: StsClient,
}

fn convert(operation: &'static str, creds: Option<&types::Credentials>) -> Result<Credentials> {
    let creds = creds.ok_or(Error::MissingCredentials(operation))?;
    Ok(Credentials {
        access_key_id: creds.access_key_id().to_string(),
        secret_access_key: creds.secret_access_key().to_string(),
        session_token: creds.session_token().to_string(),
        expiration: *creds.expiration(),
    })
}

#[async_trait]
impl IdentityApi for StsIdentityApi {
    async fn assume_role(&self, request: AssumeRoleRequest) -> Result<Credentials> {
        info!("Calling AWS STS AssumeRole");
        debug!("Role ARN: {}", request.role_arn);
        debug!("MFA serial: {:?}", request.mfa_serial);
        debug!("Duration: {} seconds", request.duration_seconds);

        let response = self
            .client
            .assume_role()
            .role_arn(request.role_arn)
            .set_serial_number(request.mfa_serial)
            .token_code(request.token_code)
            .duration_seconds(request.duration_seconds)
            .role_session_name(request.session_name)
            .send()
            .await
            .map_err(|e| Error::auth_api("AssumeRole", DisplayErrorContext(&e).to_string()))?;

        convert("AssumeRole", response.credentials())
    }

    async fn get_session_token(&self, request: SessionTokenRequest) -> Result<Credentials> {
        info!("Calling AWS STS GetSessionToken");
        debug!("MFA serial: {}", request.mfa_serial);
        debug!("Duration: {} seconds", request.duration_seconds);

        let response = self
            .client
            .get_session_token()
            .serial_number(request.mfa_serial)
            .token_code(request.token_code)
            .duration_seconds(request.duration_seconds)
            .send()
            .await
            .map_err(|e| {
                Error::auth_api("GetSessionToken", DisplayErrorContext(&e).to_string())
            })?;

        convert("GetSessionToken", response.credentials())
    }

    async fn get_caller_identity(&self) -> Result<String> {
        info!("Calling AWS STS GetCallerIdentity");

        let response = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| {
                Error::auth_api("GetCallerIdentity", DisplayErrorContext(&e).to_string())
            })?;

        let arn = response
            .arn()
            .ok_or_else(|| Error::auth_api("GetCallerIdentity", "response contained no ARN"))?;
        debug!("Caller identity: {}", arn);
        Ok(arn.to_string())
    }
}

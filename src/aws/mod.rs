use std::fmt;

use async_trait::async_trait;
use aws_smithy_types::DateTime;

use crate::error::Result;

pub mod issuer;
pub mod sts;
#[cfg(test)]
pub(crate) mod testing;

/// AWS temporary credentials structure
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime,
}

impl Credentials {
    /// A session expiring exactly at `now` is already unusable
    pub fn is_expired_at(&self, now: DateTime) -> bool {
        (self.expiration.secs(), self.expiration.subsec_nanos()) <= (now.secs(), now.subsec_nanos())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumeRoleRequest {
    pub role_arn: String,
    pub mfa_serial: Option<String>,
    pub token_code: String,
    pub duration_seconds: i32,
    pub session_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokenRequest {
    pub mfa_serial: String,
    pub token_code: String,
    pub duration_seconds: i32,
}

/// The three STS operations the MFA flow needs
#[async_trait]
pub trait IdentityApi: Send + Sync {
    async fn assume_role(&self, request: AssumeRoleRequest) -> Result<Credentials>;

    async fn get_session_token(&self, request: SessionTokenRequest) -> Result<Credentials>;

    /// ARN of the identity whose long-lived keys sign the requests
    async fn get_caller_identity(&self) -> Result<String>;
}

/// Opens an [`IdentityApi`] authenticated as a named profile
#[async_trait]
pub trait IdentityConnector: Send + Sync {
    async fn connect(&self, profile: &str) -> Result<Box<dyn IdentityApi>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials_expiring_at(secs: i64) -> Credentials {
        Credentials {
            access_key_id: "ASIAEXAMPLE".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: "token".to_string(),
            expiration: DateTime::from_secs(secs),
        }
    }

    #[test]
    fn test_expired_when_expiration_in_past() {
        let creds = credentials_expiring_at(1_000);
        assert!(creds.is_expired_at(DateTime::from_secs(2_000)));
    }

    #[test]
    fn test_expired_when_expiration_equals_now() {
        let creds = credentials_expiring_at(1_000);
        assert!(creds.is_expired_at(DateTime::from_secs(1_000)));
    }

    #[test]
    fn test_valid_when_expiration_in_future() {
        let creds = credentials_expiring_at(3_000);
        assert!(!creds.is_expired_at(DateTime::from_secs(2_000)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", credentials_expiring_at(1_000));
        assert!(rendered.contains("ASIAEXAMPLE"));
        assert!(!rendered.contains("secret\""));
        assert!(!rendered.contains("\"token\""));
        assert!(rendered.contains("<redacted>"));
    }
}

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::SystemTime,
};

use aws_smithy_types::{DateTime, date_time::Format};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

use crate::{
    aws::Credentials,
    error::{Error, Result},
    utils::{self, PRIVATE_FILE_MODE},
};

/// Addresses one cached session and the artifacts derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKey {
    cache_dir: PathBuf,
    name: String,
}

impl SessionKey {
    pub fn new(cache_dir: impl Into<PathBuf>, session_name: &str) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            name: sanitize_name(session_name),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generated wrapper script; the other artifacts share this stem
    pub fn script_path(&self) -> PathBuf {
        self.cache_dir.join(&self.name)
    }

    pub fn record_path(&self) -> PathBuf {
        utils::with_suffix(&self.script_path(), ".json")
    }

    pub fn env_path(&self) -> PathBuf {
        utils::with_suffix(&self.script_path(), ".env")
    }
}

fn sanitize_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '@' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    // "." and ".." would escape the cache directory
    if sanitized.chars().all(|c| c == '.') {
        return sanitized.replace('.', "_");
    }
    sanitized
}

/// On-disk record, field names compatible with STS credential JSON
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CachedSession {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    expiration: String,
}

impl CachedSession {
    fn from_credentials(creds: &Credentials) -> std::result::Result<Self, String> {
        let expiration = creds
            .expiration
            .fmt(Format::DateTime)
            .map_err(|e| format!("Failed to format session expiration: {e}"))?;

        Ok(Self {
            access_key_id: creds.access_key_id.clone(),
            secret_access_key: creds.secret_access_key.clone(),
            session_token: creds.session_token.clone(),
            expiration,
        })
    }

    fn into_credentials(self) -> std::result::Result<Credentials, String> {
        let expiration = DateTime::from_str(&self.expiration, Format::DateTime)
            .or_else(|_| DateTime::from_str(&self.expiration, Format::DateTimeWithOffset))
            .map_err(|e| format!("Failed to parse session expiration time: {e}"))?;

        Ok(Credentials {
            access_key_id: self.access_key_id,
            secret_access_key: self.secret_access_key,
            session_token: self.session_token,
            expiration,
        })
    }
}

/// Loads the cached session unless it is missing or expired
pub async fn load(key: &SessionKey) -> Result<Option<Credentials>> {
    load_at(key, DateTime::from(SystemTime::now())).await
}

/// [`load`] against an explicit clock
pub async fn load_at(key: &SessionKey, now: DateTime) -> Result<Option<Credentials>> {
    let path = key.record_path();

    let data = match fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No cached session at {}", path.display());
            return Ok(None);
        }
        Err(e) => return Err(Error::store(&path, e)),
    };

    let record: CachedSession =
        serde_json::from_slice(&data).map_err(|e| Error::store(&path, e))?;
    let credentials = record
        .into_credentials()
        .map_err(|e| Error::store(&path, e))?;

    if credentials.is_expired_at(now) {
        info!("Cached session '{}' has expired", key.name());
        return Ok(None);
    }

    debug!("Reusing cached session '{}'", key.name());
    Ok(Some(credentials))
}

/// Replaces the cached record, creating the cache directory (0700) if needed
pub async fn save(key: &SessionKey, creds: &Credentials) -> Result<()> {
    let path = key.record_path();
    let dir = key.cache_dir();

    let dir_exists = fs::try_exists(dir)
        .await
        .map_err(|e| Error::store(dir, e))?;
    if !dir_exists {
        utils::create_private_dir(dir)
            .await
            .map_err(|e| Error::store(dir, e))?;
    }

    let record = CachedSession::from_credentials(creds).map_err(|e| Error::store(&path, e))?;
    let content = serde_json::to_vec(&record).map_err(|e| Error::store(&path, e))?;

    utils::replace_private(&path, &content, PRIVATE_FILE_MODE)
        .await
        .map_err(|e| Error::store(&path, e))?;

    info!("Session cached at {}", path.display());
    Ok(())
}

use std::path::Path;

use tracing::info;

use crate::{
    aws::Credentials,
    constants::{APP_NAME, AWS_PROFILE_ENV},
    error::{Error, Result},
    utils::{self, PRIVATE_EXEC_MODE, PRIVATE_FILE_MODE},
};

/// Parameters baked into the wrapper script so it can renew the session itself
#[derive(Debug, Clone)]
pub struct ScriptParams<'a> {
    pub profile: &'a str,
    pub cache_dir: &'a Path,
    pub session_name: &'a str,
    pub duration_seconds: i32,
}

/// Renders a shell file exporting the session's credentials
pub fn render_env(creds: &Credentials) -> String {
    let session_token = double_quote(&creds.session_token);
    format!(
        "# Generated by {APP_NAME}\n\
         export AWS_ACCESS_KEY_ID={}\n\
         export AWS_SECRET_ACCESS_KEY={}\n\
         export AWS_SESSION_TOKEN={session_token}\n\
         export AWS_SECURITY_TOKEN={session_token}\n",
        double_quote(&creds.access_key_id),
        double_quote(&creds.secret_access_key),
    )
}

/// Renders a script that refreshes the session, sources `env_path` and runs its arguments
pub fn render_script(params: &ScriptParams<'_>, env_path: &Path) -> String {
    format!(
        "#!/bin/bash\n\
         set -euo pipefail\n\
         \n\
         {AWS_PROFILE_ENV}={} {APP_NAME} auth \\\n\
         \t--cache-dir {} \\\n\
         \t--session-name {} \\\n\
         \t--duration-seconds {}\n\
         \n\
         . {}\n\
         \n\
         eval \"$@\"\n",
        single_quote(params.profile),
        single_quote(&params.cache_dir.to_string_lossy()),
        single_quote(params.session_name),
        single_quote(&params.duration_seconds.to_string()),
        single_quote(&env_path.to_string_lossy()),
    )
}

/// Writes the env file (0600), replacing whatever is there
pub async fn write_env(creds: &Credentials, path: &Path) -> Result<()> {
    utils::write_private(path, render_env(creds).as_bytes(), PRIVATE_FILE_MODE)
        .await
        .map_err(|e| Error::artifact_write(path, e))?;

    info!("Wrote environment file {}", path.display());
    Ok(())
}

/// Writes the executable wrapper script (0700) at `path`, sourcing `env_path`
pub async fn write_script(params: &ScriptParams<'_>, path: &Path, env_path: &Path) -> Result<()> {
    utils::write_private(
        path,
        render_script(params, env_path).as_bytes(),
        PRIVATE_EXEC_MODE,
    )
    .await
    .map_err(|e| Error::artifact_write(path, e))?;

    info!("Wrote wrapper script {}", path.display());
    Ok(())
}

fn double_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_smithy_types::DateTime;
    use tempfile::TempDir;

    fn credentials() -> Credentials {
        Credentials {
            access_key_id: "ASIAEXAMPLE".to_string(),
            secret_access_key: "abc/def+ghi".to_string(),
            session_token: "FwoGZXIvTOKEN".to_string(),
            expiration: DateTime::from_secs(1_700_000_000),
        }
    }

    fn params(cache_dir: &Path) -> ScriptParams<'_> {
        ScriptParams {
            profile: "dev",
            cache_dir,
            session_name: "dev-admin",
            duration_seconds: 3_600,
        }
    }

    #[test]
    fn test_render_env_exports_four_variables() {
        let env = render_env(&credentials());

        assert!(env.contains("export AWS_ACCESS_KEY_ID=\"ASIAEXAMPLE\"\n"));
        assert!(env.contains("export AWS_SECRET_ACCESS_KEY=\"abc/def+ghi\"\n"));
        assert!(env.contains("export AWS_SESSION_TOKEN=\"FwoGZXIvTOKEN\"\n"));
        assert!(env.contains("export AWS_SECURITY_TOKEN=\"FwoGZXIvTOKEN\"\n"));
        assert_eq!(env.matches("export ").count(), 4);
    }

    #[test]
    fn test_double_quote_escapes_shell_metacharacters() {
        assert_eq!(double_quote(r#"a"b\c$d`e"#), r#""a\"b\\c\$d\`e""#);
    }

    #[test]
    fn test_single_quote_escapes_quotes() {
        assert_eq!(single_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_render_script_reinvokes_auth() {
        let script = render_script(&params(Path::new("/home/u/cache")), Path::new("/home/u/cache/dev-admin.env"));

        assert!(script.starts_with("#!/bin/bash\nset -euo pipefail\n"));
        assert!(script.contains(&format!("AWS_PROFILE='dev' {APP_NAME} auth")));
        assert!(script.contains("--cache-dir '/home/u/cache'"));
        assert!(script.contains("--session-name 'dev-admin'"));
        assert!(script.contains("--duration-seconds '3600'"));
        assert!(script.contains(". '/home/u/cache/dev-admin.env'\n"));
        assert!(script.ends_with("eval \"$@\"\n"));
    }

    #[tokio::test]
    async fn test_write_env_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dev.env");
        std::fs::write(&path, "stale contents that are much longer than the new ones ".repeat(20))
            .unwrap();

        write_env(&credentials(), &path).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), render_env(&credentials()));
    }

    #[tokio::test]
    async fn test_write_env_into_missing_dir_is_artifact_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("dev.env");

        let result = write_env(&credentials(), &path).await;
        assert!(matches!(result, Err(Error::ArtifactWrite { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_artifact_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let env_path = dir.path().join("dev-admin.env");
        let script_path = dir.path().join("dev-admin");

        write_env(&credentials(), &env_path).await.unwrap();
        write_script(&params(dir.path()), &script_path, &env_path)
            .await
            .unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&env_path), 0o600);
        assert_eq!(mode(&script_path), 0o700);
    }
}

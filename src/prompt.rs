use std::io::{self, Write};

use crate::error::{Error, Result};

/// Shown after the code is entered, whatever its length
pub const MASK: &str = "******";

const PROMPT: &str = "MFA token: ";

/// Source of the one-time MFA code
pub trait MfaPrompt {
    /// Returns the trimmed code. Empty input is passed through unchanged.
    fn collect(&self) -> Result<String>;
}

/// Reads the code from the controlling terminal without echo
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl MfaPrompt for TerminalPrompt {
    fn collect(&self) -> Result<String> {
        let token = rpassword::prompt_password(PROMPT);

        let mut stderr = io::stderr();
        writeln!(stderr, "{MASK}").ok();

        token.map(|t| t.trim().to_string()).map_err(Error::TerminalIo)
    }
}

/// Fixed answer, for non-interactive callers that already hold a code
#[derive(Debug, Clone)]
pub struct StaticPrompt(pub String);

impl MfaPrompt for StaticPrompt {
    fn collect(&self) -> Result<String> {
        Ok(self.0.trim().to_string())
    }
}

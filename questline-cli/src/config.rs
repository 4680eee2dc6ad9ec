//! Credential and state-directory resolution.
//!
//! Flags win over environment variables; a missing credential is reported
//! with the variable that would have supplied it.

use std::path::PathBuf;

use anyhow::{Context, Result};

pub const SOURCE_TOKEN_ENV: &str = "QUESTLINE_SOURCE_TOKEN";
pub const DEST_USER_ENV: &str = "QUESTLINE_DEST_USER";
pub const DEST_TOKEN_ENV: &str = "QUESTLINE_DEST_TOKEN";

/// Everything needed to talk to both services.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub source_token: String,
    pub dest_user: String,
    pub dest_token: String,
}

impl Credentials {
    pub fn resolve(
        source_token: Option<String>,
        dest_user: Option<String>,
        dest_token: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            source_token: credential(source_token, SOURCE_TOKEN_ENV, "source API token")?,
            dest_user: credential(dest_user, DEST_USER_ENV, "destination user id")?,
            dest_token: credential(dest_token, DEST_TOKEN_ENV, "destination API token")?,
        })
    }
}

fn credential(flag: Option<String>, env_var: &str, what: &str) -> Result<String> {
    flag.or_else(|| std::env::var(env_var).ok())
        .with_context(|| format!("no {what} provided; pass the flag or set ${env_var}"))
}

/// Root directory for persisted state; the history file lives under
/// `<root>/.questline/`.
pub fn state_home(flag: Option<PathBuf>) -> Result<PathBuf> {
    match flag {
        Some(dir) => Ok(dir),
        None => dirs::home_dir().context("could not determine home directory"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_win_over_environment() {
        let creds = Credentials::resolve(
            Some("s-token".to_string()),
            Some("u-id".to_string()),
            Some("d-token".to_string()),
        )
        .expect("all flags given");
        assert_eq!(creds.source_token, "s-token");
        assert_eq!(creds.dest_user, "u-id");
        assert_eq!(creds.dest_token, "d-token");
    }

    #[test]
    fn explicit_state_dir_is_used_verbatim() {
        let dir = state_home(Some(PathBuf::from("/tmp/questline-test"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/questline-test"));
    }
}

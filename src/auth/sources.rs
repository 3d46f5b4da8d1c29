//! Built-in token sources

use crate::auth::{AuthSource, TokenSource};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Token supplied through configuration (environment variables)
pub struct ConfigToken(pub Option<String>);

#[async_trait]
impl TokenSource for ConfigToken {
    fn kind(&self) -> AuthSource {
        AuthSource::EnvVar
    }

    async fn token(&self) -> Option<String> {
        self.0
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
    }
}

/// Token printed by a platform CLI, e.g. `gh auth token`
pub struct CliToken {
    program: String,
    args: Vec<String>,
}

impl CliToken {
    /// Run `program args...` and read the token from stdout
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
        }
    }
}

#[async_trait]
impl TokenSource for CliToken {
    fn kind(&self) -> AuthSource {
        AuthSource::Cli
    }

    async fn token(&self) -> Option<String> {
        let output = match Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                debug!("{} unavailable: {e}", self.program);
                return None;
            }
        };

        if !output.status.success() {
            debug!("{} exited with {}", self.program, output.status);
            return None;
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() { None } else { Some(token) }
    }
}

/// Token stored by git's credential helper for an HTTPS host
pub struct CredentialHelper {
    host: String,
}

impl CredentialHelper {
    /// Query `git credential fill` for `https://<host>`
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
        }
    }
}

/// Pull the `password=` value out of `git credential fill` output
pub(crate) fn parse_credential_output(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.strip_prefix("password="))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
}

#[async_trait]
impl TokenSource for CredentialHelper {
    fn kind(&self) -> AuthSource {
        AuthSource::CredentialHelper
    }

    async fn token(&self) -> Option<String> {
        let mut child = match Command::new("git")
            .args(["credential", "fill"])
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                debug!("git credential unavailable: {e}");
                return None;
            }
        };

        let request = format!("protocol=https\nhost={}\n\n", self.host);
        let mut stdin = child.stdin.take()?;
        if let Err(e) = stdin.write_all(request.as_bytes()).await {
            debug!("Failed to query credential helper: {e}");
            return None;
        }
        drop(stdin);

        let output = child.wait_with_output().await.ok()?;
        if !output.status.success() {
            debug!("git credential fill exited with {}", output.status);
            return None;
        }

        parse_credential_output(&String::from_utf8_lossy(&output.stdout))
    }
}

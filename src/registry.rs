//! Registry access through an external package-manager CLI
//!
//! Instead of speaking the registry's HTTP API directly, everything is
//! delegated to the `npm` binary (or a compatible replacement) so that the
//! user's proxy, auth and registry configuration apply unchanged.

use std::time::Duration;

#[cfg(test)]
use mockall::automock;

use tracing::debug;

use crate::command::{CommandRunner, TokioRunner};
use crate::config::PING_TIMEOUT_MS;
use crate::error::RegistryError;

/// Default program used to reach the registry.
const DEFAULT_PROGRAM: &str = "npm";

/// Trait for querying a package registry.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Checks whether the registry is reachable.
    ///
    /// # Returns
    /// * `Ok(true)` - The registry answered
    /// * `Ok(false)` - The registry did not answer (offline, client missing)
    /// * `Err(RegistryError::PingTimeout)` - No answer within the deadline
    async fn ping(&self) -> Result<bool, RegistryError>;

    /// Fetches the version a dist-tag currently points at.
    ///
    /// # Arguments
    /// * `package` - The package name (e.g., "@scope/name")
    /// * `tag` - The dist-tag to resolve (e.g., "latest", "beta")
    ///
    /// # Returns
    /// * `Ok(String)` - The version the tag resolves to
    /// * `Err(RegistryError)` - If the lookup fails
    async fn dist_tag_version(&self, package: &str, tag: &str) -> Result<String, RegistryError>;
}

/// [`Registry`] implementation that shells out to the npm CLI.
pub struct NpmCli<R: CommandRunner> {
    runner: R,
    program: String,
    ping_timeout: Duration,
}

impl<R: CommandRunner> NpmCli<R> {
    /// Creates a new NpmCli with the default program and ping timeout.
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            program: DEFAULT_PROGRAM.to_string(),
            ping_timeout: Duration::from_millis(PING_TIMEOUT_MS),
        }
    }

    /// Replaces the program invoked for registry queries (e.g. "pnpm").
    pub fn with_program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }

    /// Replaces the deadline applied to `ping`.
    pub fn with_ping_timeout(mut self, timeout: Duration) -> Self {
        self.ping_timeout = timeout;
        self
    }
}

impl Default for NpmCli<TokioRunner> {
    fn default() -> Self {
        Self::new(TokioRunner)
    }
}

#[async_trait::async_trait]
impl<R: CommandRunner> Registry for NpmCli<R> {
    async fn ping(&self) -> Result<bool, RegistryError> {
        let args = vec!["ping".to_string()];

        match tokio::time::timeout(self.ping_timeout, self.runner.run(&self.program, &args)).await
        {
            Ok(Ok(output)) => Ok(output.success),
            Ok(Err(e)) => {
                debug!("Registry ping could not run: {}", e);
                Ok(false)
            }
            Err(_) => Err(RegistryError::PingTimeout {
                timeout_ms: self.ping_timeout.as_millis() as u64,
            }),
        }
    }

    async fn dist_tag_version(&self, package: &str, tag: &str) -> Result<String, RegistryError> {
        let args = vec![
            "info".to_string(),
            package.to_string(),
            format!("dist-tags.{tag}"),
        ];

        let output = self.runner.run(&self.program, &args).await?;

        // npm prints failures to stderr even when the exit status is zero
        let stderr = output.stderr.trim();
        if !stderr.is_empty() {
            return Err(RegistryError::Failed {
                stderr: stderr.to_string(),
            });
        }

        if !output.success {
            return Err(RegistryError::Unsuccessful);
        }

        let version = output.stdout.trim();
        if version.is_empty() {
            return Err(RegistryError::Empty {
                package: package.to_string(),
            });
        }

        Ok(version.to_string())
    }
}

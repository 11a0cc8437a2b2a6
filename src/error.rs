use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to run registry command: {0}")]
    Io(#[from] std::io::Error),

    #[error("Registry command reported an error: {stderr}")]
    Failed { stderr: String },

    #[error("Registry command exited unsuccessfully")]
    Unsuccessful,

    #[error("No published version for package: {package}")]
    Empty { package: String },

    #[error("Registry ping timed out after {timeout_ms}ms")]
    PingTimeout { timeout_ms: u64 },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Invalid version: {0}")]
    Version(#[from] semver::Error),

    #[error("Failed to persist update record: {0}")]
    Store(#[from] StoreError),
}

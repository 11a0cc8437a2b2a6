//! Update checks for installed packages
//!
//! Resolves what a registry dist-tag currently points at, compares it against
//! the installed version and persists the outcome as a per-package record,
//! so tools can tell their users about available updates without blocking
//! on the network at an awkward moment.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Checker   │────▶│   Registry  │────▶│   Command   │
//! │ (workflow)  │     │  (npm CLI)  │     │ (subprocess)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐     ┌─────────────┐
//! │   Compare   │     │  Settings   │
//! │  (semver)   │     │ (JSON file) │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`checker`]: The update-check workflow and interval gating
//! - [`ci`]: Continuous-integration environment detection
//! - [`command`]: Subprocess execution boundary
//! - [`compare`]: Semver-based version comparison
//! - [`config`]: Defaults and filesystem locations
//! - [`error`]: Error types for registry, store and check operations
//! - [`registry`]: Registry queries through the npm CLI
//! - [`settings`]: Persistent per-package update records
//!
//! # Example
//!
//! ```no_run
//! use update_notify::{CheckRequest, Package, UpdateChecker};
//!
//! # async fn check() -> Result<(), update_notify::CheckError> {
//! let checker = UpdateChecker::new();
//! let request = CheckRequest::new(Package::new("left-pad", "1.2.0"));
//!
//! if let Some(record) = checker.notify(&request).await? {
//!     if record.update_available {
//!         println!("left-pad {} is available", record.latest);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod checker;
pub mod ci;
pub mod command;
pub mod compare;
pub mod config;
pub mod error;
pub mod registry;
pub mod settings;

pub use checker::{
    CheckRequest, Clock, Package, SystemClock, UpdateChecker, should_check_updates,
    should_check_updates_at,
};
pub use ci::is_ci;
pub use command::{CommandOutput, CommandRunner, TokioRunner};
pub use compare::{SemverComparator, VersionComparator, is_older};
pub use error::{CheckError, RegistryError, StoreError};
pub use registry::{NpmCli, Registry};
pub use settings::{JsonFileStore, SettingsStore, UpdateRecord, namespaced_key};

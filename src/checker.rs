//! Update-check workflow
//!
//! Ties the registry, the version comparison and the settings store together:
//! resolve what the dist-tag points at, compare against the installed
//! version, persist the outcome. Resolution failures end the check quietly;
//! anything after a successful resolution fails loudly.

use tracing::debug;

use crate::command::TokioRunner;
use crate::compare::{SemverComparator, VersionComparator};
use crate::config::DEFAULT_DIST_TAG;
use crate::error::{CheckError, RegistryError};
use crate::registry::{NpmCli, Registry};
use crate::settings::{JsonFileStore, SettingsStore, UpdateRecord};

/// Source of "now" for timestamping checks.
pub trait Clock: Send + Sync {
    /// Milliseconds since the UNIX epoch.
    fn now_ms(&self) -> i64;
}

/// [`Clock`] reading the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Whether enough time has passed since the last recorded check.
///
/// `None` means the package has never been checked and reports `false`;
/// bootstrapping the first check is the caller's decision
/// ([`UpdateChecker::check_if_due`] treats a missing record as due).
pub fn should_check_updates(last_check_ms: Option<i64>, interval_ms: i64) -> bool {
    should_check_updates_at(last_check_ms, interval_ms, SystemClock.now_ms())
}

/// [`should_check_updates`] against an explicit current time.
pub fn should_check_updates_at(last_check_ms: Option<i64>, interval_ms: i64, now_ms: i64) -> bool {
    match last_check_ms {
        Some(last) => now_ms - last >= interval_ms,
        None => false,
    }
}

/// An installed package whose registry version should be checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: String,
}

impl Package {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Parameters of a single update check.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub package: Package,
    /// Dist-tag to resolve; `None` means `"latest"`.
    pub dist_tag: Option<String>,
}

impl CheckRequest {
    pub fn new(package: Package) -> Self {
        Self {
            package,
            dist_tag: None,
        }
    }

    /// Resolves against a dist-tag other than `"latest"`.
    pub fn with_dist_tag(mut self, tag: &str) -> Self {
        self.dist_tag = Some(tag.to_string());
        self
    }
}

/// Checks a registry for newer versions of installed packages and persists
/// what it finds.
pub struct UpdateChecker<R, S> {
    registry: R,
    store: S,
    comparator: Box<dyn VersionComparator>,
    clock: Box<dyn Clock>,
}

impl UpdateChecker<NpmCli<TokioRunner>, JsonFileStore> {
    /// Creates a checker using the npm CLI and the default settings file.
    pub fn new() -> Self {
        Self::with_parts(NpmCli::default(), JsonFileStore::new())
    }
}

impl Default for UpdateChecker<NpmCli<TokioRunner>, JsonFileStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Registry, S: SettingsStore> UpdateChecker<R, S> {
    /// Creates a checker over explicit registry and store implementations.
    pub fn with_parts(registry: R, store: S) -> Self {
        Self {
            registry,
            store,
            comparator: Box::new(SemverComparator),
            clock: Box::new(SystemClock),
        }
    }

    /// Replaces the version comparison rules.
    pub fn with_comparator(mut self, comparator: impl VersionComparator + 'static) -> Self {
        self.comparator = Box::new(comparator);
        self
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Checks whether the registry answers at all.
    pub async fn ping_registry(&self) -> Result<bool, RegistryError> {
        self.registry.ping().await
    }

    /// Resolves the version a dist-tag points at, or `None` when the
    /// registry could not answer. Failures are logged, never surfaced.
    pub async fn latest_version(&self, package: &str, dist_tag: &str) -> Option<String> {
        match self.registry.dist_tag_version(package, dist_tag).await {
            Ok(version) => Some(version),
            Err(e) => {
                debug!("Could not resolve {}@{}: {}", package, dist_tag, e);
                None
            }
        }
    }

    /// Runs a full update check and persists the outcome.
    ///
    /// Returns `Ok(None)` when no latest version could be determined;
    /// nothing is written in that case.
    pub async fn notify(&self, request: &CheckRequest) -> Result<Option<UpdateRecord>, CheckError> {
        let package = &request.package;
        let tag = request.dist_tag.as_deref().unwrap_or(DEFAULT_DIST_TAG);

        let Some(latest) = self.latest_version(&package.name, tag).await else {
            debug!("No update record written for {}", package.name);
            return Ok(None);
        };

        let update_available = self.comparator.is_older(&package.version, &latest)?;

        let record = UpdateRecord {
            update_available,
            latest,
            current: package.version.clone(),
            last_update_check: self.clock.now_ms(),
        };
        self.store.save_record(&package.name, &record)?;

        Ok(Some(record))
    }

    /// Runs [`Self::notify`] only when the stored record says the check
    /// interval has elapsed. A package with no record is always due.
    pub async fn check_if_due(
        &self,
        request: &CheckRequest,
        interval_ms: i64,
    ) -> Result<Option<UpdateRecord>, CheckError> {
        let last_check = self
            .store
            .get(&request.package.name, "lastUpdateCheck")?
            .and_then(|value| value.as_i64());

        let due = last_check.is_none()
            || should_check_updates_at(last_check, interval_ms, self.clock.now_ms());
        if !due {
            debug!("Update check for {} not due yet", request.package.name);
            return Ok(None);
        }

        self.notify(request).await
    }
}

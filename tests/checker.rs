use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tempfile::TempDir;
use update_notify::{
    CheckRequest, Clock, CommandOutput, CommandRunner, JsonFileStore, NpmCli, Package,
    UpdateChecker,
};

const NOW_MS: i64 = 1_700_000_000_000;

/// Runner that replays scripted outputs and records every invocation.
#[derive(Clone, Default)]
struct ScriptedRunner {
    responses: Arc<Mutex<VecDeque<io::Result<CommandOutput>>>>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl ScriptedRunner {
    fn with_output(self, success: bool, stdout: &str, stderr: &str) -> Self {
        self.responses.lock().unwrap().push_back(Ok(CommandOutput {
            success,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }));
        self
    }

    fn with_spawn_error(self) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(io::Error::new(
                io::ErrorKind::NotFound,
                "No such file or directory",
            )));
        self
    }

    /// Every invocation so far, as `[program, args...]`.
    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().cloned());
        self.calls.lock().unwrap().push(call);

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(io::Error::other("no scripted response left")))
    }
}

struct FixedClock(i64);

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

fn checker_at(
    runner: ScriptedRunner,
    temp_dir: &TempDir,
    now_ms: i64,
) -> UpdateChecker<NpmCli<ScriptedRunner>, JsonFileStore> {
    let registry = NpmCli::new(runner);
    let store = JsonFileStore::with_path(temp_dir.path().join("settings.json"));
    UpdateChecker::with_parts(registry, store).with_clock(FixedClock(now_ms))
}

#[tokio::test]
async fn notify_writes_a_record_for_an_outdated_package() {
    let temp_dir = TempDir::new().unwrap();
    let runner = ScriptedRunner::default().with_output(true, "1.3.0\n", "");
    let checker = checker_at(runner.clone(), &temp_dir, NOW_MS);

    let record = checker
        .notify(&CheckRequest::new(Package::new("left-pad", "1.2.0")))
        .await
        .unwrap()
        .unwrap();

    assert!(record.update_available);
    assert_eq!(record.latest, "1.3.0");
    assert_eq!(record.current, "1.2.0");
    assert_eq!(record.last_update_check, NOW_MS);

    assert_eq!(
        runner.calls(),
        vec![vec![
            "npm".to_string(),
            "info".to_string(),
            "left-pad".to_string(),
            "dist-tags.latest".to_string(),
        ]]
    );

    // The record lands under the namespaced key with camelCase fields
    let text = std::fs::read_to_string(temp_dir.path().join("settings.json")).unwrap();
    let document: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        document["update-notify.left-pad"],
        json!({
            "updateAvailable": true,
            "latest": "1.3.0",
            "current": "1.2.0",
            "lastUpdateCheck": NOW_MS,
        })
    );
}

#[tokio::test]
async fn notify_records_an_up_to_date_package() {
    let temp_dir = TempDir::new().unwrap();
    let runner = ScriptedRunner::default().with_output(true, "1.2.0\n", "");
    let checker = checker_at(runner, &temp_dir, NOW_MS);

    let record = checker
        .notify(&CheckRequest::new(Package::new("left-pad", "1.2.0")))
        .await
        .unwrap()
        .unwrap();

    assert!(!record.update_available);
    assert_eq!(record.latest, "1.2.0");
}

#[tokio::test]
async fn notify_writes_nothing_when_the_registry_fails() {
    let temp_dir = TempDir::new().unwrap();
    let runner = ScriptedRunner::default().with_output(false, "", "npm ERR! code E404\n");
    let checker = checker_at(runner, &temp_dir, NOW_MS);

    let result = checker
        .notify(&CheckRequest::new(Package::new("no-such-package", "1.0.0")))
        .await
        .unwrap();

    assert!(result.is_none());
    assert!(!temp_dir.path().join("settings.json").exists());
}

#[tokio::test]
async fn notify_writes_nothing_when_the_client_is_missing() {
    let temp_dir = TempDir::new().unwrap();
    let runner = ScriptedRunner::default().with_spawn_error();
    let checker = checker_at(runner, &temp_dir, NOW_MS);

    let result = checker
        .notify(&CheckRequest::new(Package::new("left-pad", "1.2.0")))
        .await
        .unwrap();

    assert!(result.is_none());
    assert!(!temp_dir.path().join("settings.json").exists());
}

#[tokio::test]
async fn notify_queries_the_requested_dist_tag() {
    let temp_dir = TempDir::new().unwrap();
    let runner = ScriptedRunner::default().with_output(true, "2.0.0-beta.4\n", "");
    let checker = checker_at(runner.clone(), &temp_dir, NOW_MS);

    let request = CheckRequest::new(Package::new("left-pad", "1.2.0")).with_dist_tag("beta");
    let record = checker.notify(&request).await.unwrap().unwrap();

    assert_eq!(record.latest, "2.0.0-beta.4");
    assert_eq!(
        runner.calls(),
        vec![vec![
            "npm".to_string(),
            "info".to_string(),
            "left-pad".to_string(),
            "dist-tags.beta".to_string(),
        ]]
    );
}

#[tokio::test]
async fn check_if_due_skips_when_the_interval_has_not_elapsed() {
    let temp_dir = TempDir::new().unwrap();
    let runner = ScriptedRunner::default().with_output(true, "1.3.0\n", "");
    let checker = checker_at(runner.clone(), &temp_dir, NOW_MS);

    let request = CheckRequest::new(Package::new("left-pad", "1.2.0"));
    checker.notify(&request).await.unwrap();

    let skipped = checker.check_if_due(&request, 60_000).await.unwrap();

    assert!(skipped.is_none());
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn check_if_due_checks_again_once_the_interval_elapses() {
    let temp_dir = TempDir::new().unwrap();
    let runner = ScriptedRunner::default()
        .with_output(true, "1.3.0\n", "")
        .with_output(true, "1.4.0\n", "");

    let request = CheckRequest::new(Package::new("left-pad", "1.2.0"));
    checker_at(runner.clone(), &temp_dir, NOW_MS)
        .notify(&request)
        .await
        .unwrap();

    let record = checker_at(runner.clone(), &temp_dir, NOW_MS + 60_000)
        .check_if_due(&request, 60_000)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(record.latest, "1.4.0");
    assert_eq!(record.last_update_check, NOW_MS + 60_000);
    assert_eq!(runner.calls().len(), 2);
}

#[tokio::test]
async fn check_if_due_runs_immediately_for_an_unknown_package() {
    let temp_dir = TempDir::new().unwrap();
    let runner = ScriptedRunner::default().with_output(true, "1.3.0\n", "");
    let checker = checker_at(runner, &temp_dir, NOW_MS);

    let record = checker
        .check_if_due(&CheckRequest::new(Package::new("left-pad", "1.2.0")), i64::MAX)
        .await
        .unwrap();

    assert!(record.is_some());
}

#[tokio::test]
async fn ping_registry_reports_a_reachable_registry() {
    let temp_dir = TempDir::new().unwrap();
    let runner = ScriptedRunner::default().with_output(true, "npm notice PING ok\n", "");
    let checker = checker_at(runner.clone(), &temp_dir, NOW_MS);

    assert!(checker.ping_registry().await.unwrap());
    assert_eq!(
        runner.calls(),
        vec![vec!["npm".to_string(), "ping".to_string()]]
    );
}

#[tokio::test]
async fn ping_registry_reports_offline_when_the_client_is_missing() {
    let temp_dir = TempDir::new().unwrap();
    let runner = ScriptedRunner::default().with_spawn_error();
    let checker = checker_at(runner, &temp_dir, NOW_MS);

    assert!(!checker.ping_registry().await.unwrap());
}

#[tokio::test]
async fn latest_version_is_best_effort() {
    let temp_dir = TempDir::new().unwrap();
    let runner = ScriptedRunner::default()
        .with_output(true, "1.3.0\n", "")
        .with_output(false, "", "npm ERR! network\n");
    let checker = checker_at(runner, &temp_dir, NOW_MS);

    assert_eq!(
        checker.latest_version("left-pad", "latest").await,
        Some("1.3.0".to_string())
    );
    assert_eq!(checker.latest_version("left-pad", "latest").await, None);
}

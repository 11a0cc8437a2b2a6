//! Continuous-integration environment detection
//!
//! Callers typically skip update checks entirely when running under CI, where
//! nobody is around to act on a notification.

/// Environment variables whose presence marks a CI environment.
const CI_ENV_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "JENKINS_URL",
    "BUILDKITE",
    "TRAVIS",
];

/// Reports whether the current process is running in a CI environment.
///
/// Checks the well-known CI environment variables; `TF_BUILD` (Azure DevOps)
/// must equal `"True"`, the rest count by presence alone. Pure query, no
/// side effects.
pub fn is_ci() -> bool {
    is_ci_with_env(|key| std::env::var(key).ok())
}

/// CI detection with a custom environment lookup (for testing).
pub fn is_ci_with_env<F>(env: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    if CI_ENV_VARS.iter().any(|var| env(var).is_some()) {
        return true;
    }

    // TF_BUILD must equal "True" (Azure DevOps)
    env("TF_BUILD").as_deref() == Some("True")
}

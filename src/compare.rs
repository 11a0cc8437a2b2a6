use semver::Version;

/// Decides whether an installed version is older than a published one.
///
/// The stock implementation is [`SemverComparator`]; swap in another
/// implementation to change the ordering rules (for example to ignore
/// prereleases).
pub trait VersionComparator: Send + Sync {
    /// Returns `true` if `current` precedes `latest`.
    fn is_older(&self, current: &str, latest: &str) -> Result<bool, semver::Error>;
}

/// [`VersionComparator`] using semantic-versioning precedence.
#[derive(Debug, Default, Clone, Copy)]
pub struct SemverComparator;

impl VersionComparator for SemverComparator {
    fn is_older(&self, current: &str, latest: &str) -> Result<bool, semver::Error> {
        is_older(current, latest)
    }
}

/// Compare two version strings under semver precedence rules.
///
/// Returns `Ok(true)` when `current` is strictly older than `latest`.
/// Prerelease ordering follows the semver spec, so "1.0.0-alpha" is older
/// than "1.0.0". Either string failing to parse is an error.
pub fn is_older(current: &str, latest: &str) -> Result<bool, semver::Error> {
    let current = Version::parse(current)?;
    let latest = Version::parse(latest)?;
    Ok(current < latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.0.0", "1.0.1", true)]
    #[case("1.0.1", "1.0.0", false)] // already newer
    #[case("1.2.3", "1.2.3", false)] // equal is not older
    #[case("1.9.0", "1.10.0", true)] // numeric, not lexicographic
    #[case("1.0.0-alpha", "1.0.0", true)] // prerelease precedes release
    #[case("1.0.0", "1.0.0-alpha", false)]
    #[case("1.0.0-alpha.1", "1.0.0-alpha.2", true)]
    #[case("1.2.0", "2.0.0-beta.4", true)] // prerelease of a later major still counts
    fn test_is_older(#[case] current: &str, #[case] latest: &str, #[case] expected: bool) {
        assert_eq!(is_older(current, latest).unwrap(), expected);
    }

    #[rstest]
    #[case("not-a-version", "1.0.0")]
    #[case("1.0.0", "not-a-version")]
    #[case("1.2", "1.3.0")] // partial versions are rejected
    fn test_invalid_versions_are_errors(#[case] current: &str, #[case] latest: &str) {
        assert!(is_older(current, latest).is_err());
    }

    #[test]
    fn comparator_trait_delegates() {
        let comparator = SemverComparator;
        assert!(comparator.is_older("0.1.0", "0.2.0").unwrap());
        assert!(!comparator.is_older("0.2.0", "0.1.0").unwrap());
    }
}

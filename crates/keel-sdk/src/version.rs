//! Version-folder parsing and selection.
//!
//! SDK pack folders are named by version, but not always with a full
//! `major.minor.patch` triple (`6.0`, `7`). Short versions are padded with
//! zeros and compared with `semver` ordering, so a release sorts above any
//! pre-release with the same numbers.

pub type Version = semver::Version;

/// Parse a pack folder name as a version.
///
/// Accepts one to three numeric components followed by an optional semver
/// pre-release or build suffix. Returns `None` for anything else.
pub fn parse_folder_version(name: &str) -> Option<Version> {
    let split = name.find(|c: char| c == '-' || c == '+').unwrap_or(name.len());
    let (numbers, suffix) = name.split_at(split);

    let parts: Vec<&str> = numbers.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    let mut triple = [0u64; 3];
    for (slot, part) in triple.iter_mut().zip(&parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }

    Version::parse(&format!("{}.{}.{}{suffix}", triple[0], triple[1], triple[2])).ok()
}

/// Pick the highest-versioned folder name.
///
/// Names that do not parse as versions are skipped. When two names parse to
/// the same version (`6.0` and `6.0.0`) the lexically greater name wins so
/// the choice stays deterministic.
pub fn select_version_folder<'a, I>(names: I) -> Option<(Version, &'a str)>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter_map(|name| parse_folder_version(name).map(|v| (v, name)))
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn pads_short_versions() {
        assert_eq!(parse_folder_version("1"), Some(v("1.0.0")));
        assert_eq!(parse_folder_version("2.3"), Some(v("2.3.0")));
        assert_eq!(parse_folder_version("2.3.1"), Some(v("2.3.1")));
    }

    #[test]
    fn keeps_prerelease_suffix() {
        assert_eq!(
            parse_folder_version("7.0.0-preview.3"),
            Some(v("7.0.0-preview.3"))
        );
        assert_eq!(parse_folder_version("8.0-rc.1"), Some(v("8.0.0-rc.1")));
    }

    #[test]
    fn rejects_non_versions() {
        assert_eq!(parse_folder_version("tools"), None);
        assert_eq!(parse_folder_version(""), None);
        assert_eq!(parse_folder_version("1..2"), None);
        assert_eq!(parse_folder_version("1.2.3.4"), None);
        assert_eq!(parse_folder_version("v1.2"), None);
    }

    #[test]
    fn highest_version_wins() {
        let (version, name) = select_version_folder(["1.0", "2.3", "2.3.1"]).unwrap();
        assert_eq!(version, v("2.3.1"));
        assert_eq!(name, "2.3.1");
    }

    #[test]
    fn ordering_is_numeric_not_lexical() {
        let (_, name) = select_version_folder(["9.0.0", "10.0.0", "6.0.21"]).unwrap();
        assert_eq!(name, "10.0.0");
    }

    #[test]
    fn release_beats_prerelease() {
        let (_, name) = select_version_folder(["7.0.0-rc.2", "7.0.0", "6.0.9"]).unwrap();
        assert_eq!(name, "7.0.0");
        let (_, name) = select_version_folder(["7.0.0-rc.2", "6.0.9"]).unwrap();
        assert_eq!(name, "7.0.0-rc.2");
    }

    #[test]
    fn junk_only_selects_nothing() {
        assert!(select_version_folder(["readme", "latest"]).is_none());
        assert!(select_version_folder(std::iter::empty()).is_none());
    }
}

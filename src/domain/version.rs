use std::cmp::Ordering;

/// A version string split into numeric parts and an optional pre-release suffix
/// (e.g. "1.2.3" or "1.2.3-RC1").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    parts: Vec<u32>,
    pre_release: Option<String>,
}

impl Version {
    /// Parse a version string into a `Version` object.
    ///
    /// A leading `v` is ignored. Returns `None` if the numeric part contains
    /// non-numeric segments.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('v');
        let (numeric, pre_release) = match s.split_once('-') {
            Some((numeric, suffix)) => (numeric, Some(suffix.to_string())),
            None => (s, None),
        };
        let parts = numeric
            .split('.')
            .map(|segment| segment.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .ok()?;
        Some(Self { parts, pre_release })
    }

    pub fn is_pre_release(&self) -> bool {
        self.pre_release.is_some()
    }

    fn cmp_numeric(&self, other: &Self) -> Ordering {
        let max_len = self.parts.len().max(other.parts.len());
        for idx in 0..max_len {
            let left_value = *self.parts.get(idx).unwrap_or(&0);
            let right_value = *other.parts.get(idx).unwrap_or(&0);
            match left_value.cmp(&right_value) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.cmp_numeric(other) {
            // A pre-release sorts before the release it precedes.
            Ordering::Equal => match (&self.pre_release, &other.pre_release) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(left), Some(right)) => left.cmp(right),
            },
            unequal => unequal,
        }
    }
}

/// Whether `latest` should be offered to a user currently running `current`.
///
/// Anyone on a pre-release is offered any different published version.
pub fn is_version_update_available(current: &str, latest: &str) -> bool {
    let (Some(current), Some(latest)) = (Version::parse(current), Version::parse(latest)) else {
        return false;
    };
    if current == latest {
        return false;
    }
    current.is_pre_release() || current < latest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            Version::parse("1.2.3"),
            Some(Version { parts: vec![1, 2, 3], pre_release: None })
        );
        assert_eq!(
            Version::parse("v1.0.0-RC1"),
            Some(Version { parts: vec![1, 0, 0], pre_release: Some("RC1".into()) })
        );
        assert_eq!(Version::parse("invalid"), None);
        assert_eq!(Version::parse("1.a.2"), None);
    }

    #[test]
    fn test_compare() {
        assert!(Version::parse("1.2.4").unwrap() > Version::parse("1.2.3").unwrap());
        assert!(Version::parse("1.2").unwrap() < Version::parse("1.2.3").unwrap());
        assert!(Version::parse("1.0.0-RC1").unwrap() < Version::parse("1.0.0").unwrap());
        assert_eq!(
            Version::parse("1.2.3").unwrap().cmp(&Version::parse("1.2.3").unwrap()),
            Ordering::Equal
        );
    }

    #[test]
    fn update_availability() {
        assert!(is_version_update_available("1.0.0", "1.0.1"));
        assert!(is_version_update_available("1.0.0-RC1", "1.0.0"));
        assert!(is_version_update_available("1.0.1-RC1", "1.0.0"));
        assert!(!is_version_update_available("1.0.0", "1.0.0"));
        assert!(!is_version_update_available("1.0.0-RC1", "1.0.0-RC1"));
        assert!(!is_version_update_available("1.0.1", "1.0.0"));
    }
}

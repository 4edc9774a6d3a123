use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An absent tag and the wildcard tag mean the same thing: no particular
/// version was asked for.
const WILDCARD_TAG: &str = "latest";

/// The version part of an image reference: a mutable label or an exact
/// content pin.
#[derive(EnumAsInner, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Debug)]
pub enum Version {
    /// A label such as `1.2.3` or `7-alpine`.
    Tag(String),
    /// A content digest such as `sha256:<hex>`.
    Digest(String),
}

impl Version {
    pub(crate) fn separator(&self) -> char {
        match self {
            Version::Tag(_) => ':',
            Version::Digest(_) => '@',
        }
    }

    fn is_wildcard(version: Option<&Version>) -> bool {
        match version {
            None => true,
            Some(Version::Tag(tag)) => tag == WILDCARD_TAG,
            Some(Version::Digest(_)) => false,
        }
    }

    /// Whether two version parts agree for substitution purposes: a
    /// wildcard side (absent or `latest`) matches anything, otherwise
    /// both sides must carry the same pin. Two different concrete
    /// versions never match.
    pub fn compatible(ours: Option<&Version>, theirs: Option<&Version>) -> bool {
        if Version::is_wildcard(ours) || Version::is_wildcard(theirs) {
            return true;
        }
        return ours == theirs;
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Tag(tag) => f.write_str(tag),
            Version::Digest(digest) => f.write_str(digest),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(t: &str) -> Option<Version> {
        Some(Version::Tag(t.to_string()))
    }

    fn digest(d: &str) -> Option<Version> {
        Some(Version::Digest(d.to_string()))
    }

    #[test]
    fn it_treats_absent_and_latest_as_wildcards() {
        assert!(Version::compatible(None, None));
        assert!(Version::compatible(None, tag("1.2.3").as_ref()));
        assert!(Version::compatible(tag("1.2.3").as_ref(), None));
        assert!(Version::compatible(tag("latest").as_ref(), tag("1.2.3").as_ref()));
        assert!(Version::compatible(tag("1.2.3").as_ref(), tag("latest").as_ref()));
        assert!(Version::compatible(tag("latest").as_ref(), tag("latest").as_ref()));
    }

    #[test]
    fn it_requires_equal_concrete_tags() {
        assert!(Version::compatible(tag("1.2.3").as_ref(), tag("1.2.3").as_ref()));
        assert!(!Version::compatible(tag("1.2.3").as_ref(), tag("4.5.6").as_ref()));
        assert!(!Version::compatible(tag("1.2.3").as_ref(), tag("1.2.4").as_ref()));
    }

    #[test]
    fn it_pins_digests_exactly() {
        let a = digest("sha256:1111111111111111111111111111111111111111111111111111111111111111");
        let b = digest("sha256:2222222222222222222222222222222222222222222222222222222222222222");

        assert!(Version::compatible(a.as_ref(), a.as_ref()));
        assert!(!Version::compatible(a.as_ref(), b.as_ref()));
        // A digest is never a wildcard, but an unpinned side still matches one.
        assert!(Version::compatible(None, a.as_ref()));
        assert!(Version::compatible(tag("latest").as_ref(), a.as_ref()));
        assert!(!Version::compatible(tag("1.2.3").as_ref(), a.as_ref()));
    }
}

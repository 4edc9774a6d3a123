use crate::error::{CompatibilityError, ParseError};
use crate::version::Version;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    // Matches:
    // 1. Optional registry host with port and trailing slash: (registry.io:5000/)
    // 2. One or more lowercase path segments: (group/name)
    static ref REPOSITORY_RE: Regex = Regex::new(
        r"^(?:[a-zA-Z0-9][a-zA-Z0-9.-]*(?::[0-9]+)?/)?[a-z0-9]+(?:[._-]+[a-z0-9]+)*(?:/[a-z0-9]+(?:[._-]+[a-z0-9]+)*)*$"
    )
    .unwrap();
    static ref TAG_RE: Regex = Regex::new(r"^[a-zA-Z0-9_][a-zA-Z0-9._-]{0,127}$").unwrap();
    static ref DIGEST_RE: Regex = Regex::new(r"^\w+:\w{32,}$").unwrap();
}

/// A canonical container image reference: a repository path, an optional
/// version part, and an optional claim that this image may stand in for
/// another one.
///
/// References are immutable; every derivation returns a new value.
#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Debug)]
pub struct ImageReference {
    repository: String,
    version: Option<Version>,
    claimed_compatible_target: Option<Box<ImageReference>>,
}

impl ImageReference {
    /// Parses a raw `[registry[:port]/]repository[:tag][@digest]` string.
    pub fn parse(raw: &str) -> Result<ImageReference, ParseError> {
        if raw.is_empty() {
            return Err(ParseError::EmptyReference);
        }

        // The digest comes off first so the `:` inside `sha256:...` is
        // never mistaken for a tag separator.
        let (name, digest) = match raw.rfind('@') {
            Some(at) => (&raw[..at], Some(&raw[at + 1..])),
            None => (raw, None),
        };

        if let Some(digest) = digest {
            if !DIGEST_RE.is_match(digest) {
                return Err(ParseError::InvalidDigest {
                    src: raw.to_string(),
                    span: (raw.len() - digest.len(), digest.len()).into(),
                });
            }
        }

        // A `:` only separates a tag when it comes after the last `/`,
        // so `host:5000/repo` stays a bare repository path.
        let last_slash = name.rfind('/');
        let tag_split = name
            .rfind(':')
            .filter(|colon| last_slash.map_or(true, |slash| *colon > slash));
        let (repository, tag) = match tag_split {
            Some(colon) => (&name[..colon], Some(&name[colon + 1..])),
            None => (name, None),
        };

        if let Some(tag) = tag {
            if tag.is_empty() {
                return Err(ParseError::MissingTag {
                    src: raw.to_string(),
                    span: (repository.len(), 1).into(),
                });
            }
            if !TAG_RE.is_match(tag) {
                return Err(ParseError::InvalidTag {
                    src: raw.to_string(),
                    span: (repository.len() + 1, tag.len()).into(),
                });
            }
        }

        if !REPOSITORY_RE.is_match(repository) {
            return Err(ParseError::InvalidRepository {
                src: raw.to_string(),
                span: (0, repository.len()).into(),
            });
        }

        let version = match (tag, digest) {
            // A digest pins the image; container runtimes ignore the tag
            // when both are given, and so do we.
            (_, Some(digest)) => Some(Version::Digest(digest.to_string())),
            (Some(tag), None) => Some(Version::Tag(tag.to_string())),
            (None, None) => None,
        };

        return Ok(ImageReference {
            repository: repository.to_string(),
            version,
            claimed_compatible_target: None,
        });
    }

    /// The full repository path, registry host included if there is one.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// The tag, when the version part is a tag.
    pub fn tag(&self) -> Option<&str> {
        self.version
            .as_ref()
            .and_then(Version::as_tag)
            .map(String::as_str)
    }

    /// The digest, when the version part is a digest.
    pub fn digest(&self) -> Option<&str> {
        self.version
            .as_ref()
            .and_then(Version::as_digest)
            .map(String::as_str)
    }

    /// The leading path segment when it names a registry host. A segment
    /// counts as a host when it contains a `.` or a `:` or is
    /// `localhost`, which is how registries are told apart from plain
    /// namespaces.
    pub fn registry(&self) -> Option<&str> {
        let (first, _) = self.repository.split_once('/')?;
        if first.contains('.') || first.contains(':') || first == "localhost" {
            Some(first)
        } else {
            None
        }
    }

    /// The reference this image claims to be a drop-in substitute for.
    pub fn claimed_compatible_target(&self) -> Option<&ImageReference> {
        self.claimed_compatible_target.as_deref()
    }

    /// Returns a copy with the version part replaced by `tag`, keeping
    /// the repository and any substitution claim. The tag is taken
    /// verbatim; only `parse` validates.
    pub fn with_tag(&self, tag: &str) -> ImageReference {
        ImageReference {
            repository: self.repository.clone(),
            version: Some(Version::Tag(tag.to_string())),
            claimed_compatible_target: self.claimed_compatible_target.clone(),
        }
    }

    /// Returns a copy with the registry host replaced, or prepended when
    /// the repository path had none, keeping version and claim.
    pub fn with_registry(&self, registry: &str) -> ImageReference {
        let path = match self.registry() {
            Some(host) => &self.repository[host.len() + 1..],
            None => self.repository.as_str(),
        };
        ImageReference {
            repository: format!("{}/{}", registry, path),
            version: self.version.clone(),
            claimed_compatible_target: self.claimed_compatible_target.clone(),
        }
    }

    /// Parses `target` and returns a copy of this reference declaring
    /// itself a drop-in substitute for it. The claim is one-directional:
    /// the target keeps no link back.
    pub fn as_compatible_substitute_for(
        &self,
        target: &str,
    ) -> Result<ImageReference, ParseError> {
        let target = ImageReference::parse(target)?;
        return Ok(ImageReference {
            repository: self.repository.clone(),
            version: self.version.clone(),
            claimed_compatible_target: Some(Box::new(target)),
        });
    }

    /// Whether this reference may be used where `other` is expected.
    ///
    /// A direct match wins first: the repository paths line up and the
    /// version parts agree under the wildcard rule. Failing that, a
    /// claimed substitution target is consulted with the same rules,
    /// ignoring this reference's own path and version. The relation is
    /// directional, since the claim lives on the substituting side only.
    pub fn is_compatible_with(&self, other: &ImageReference) -> bool {
        if self.repository_matches(other)
            && Version::compatible(self.version.as_ref(), other.version.as_ref())
        {
            return true;
        }
        match &self.claimed_compatible_target {
            Some(target) => target.is_compatible_with(other),
            None => false,
        }
    }

    // Exact match, or our bare name is a segment suffix of the fuller
    // path: `foo` recognizes `repo/foo`, never the other way around.
    // Known limitation: two registry images differing only in path depth
    // will false-positive here, there is no namespace validation to
    // break the tie.
    fn repository_matches(&self, other: &ImageReference) -> bool {
        if self.repository == other.repository {
            return true;
        }
        let ours: Vec<&str> = self.repository.split('/').collect();
        let theirs: Vec<&str> = other.repository.split('/').collect();
        return ours.len() < theirs.len() && theirs.ends_with(&ours);
    }

    /// Like `is_compatible_with`, but failure carries both rendered
    /// references for diagnostics. Callers are expected to treat the
    /// error as a configuration problem, not something to retry.
    pub fn assert_compatible_with(
        &self,
        other: &ImageReference,
    ) -> Result<(), CompatibilityError> {
        if self.is_compatible_with(other) {
            return Ok(());
        }
        Err(CompatibilityError {
            candidate: self.to_string(),
            required: other.to_string(),
        })
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repository)?;
        if let Some(version) = &self.version {
            write!(f, "{}{}", version.separator(), version)?;
        }
        Ok(())
    }
}

impl FromStr for ImageReference {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageReference::parse(s)
    }
}

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Errors raised while parsing a raw image reference string.
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("image reference is empty")]
    #[diagnostic(code(standin::parse::empty))]
    EmptyReference,

    #[error("invalid repository path in image reference")]
    #[diagnostic(
        code(standin::parse::repository),
        help("repository paths look like `name`, `group/name` or `registry.example.com:5000/group/name`, with lowercase path segments and no whitespace")
    )]
    InvalidRepository {
        #[source_code]
        src: String,
        #[label("not a valid repository path")]
        span: SourceSpan,
    },

    #[error("image reference has a `:` but no tag after it")]
    #[diagnostic(
        code(standin::parse::missing_tag),
        help("drop the trailing `:` or put a tag after it, like `postgres:15`")
    )]
    MissingTag {
        #[source_code]
        src: String,
        #[label("expected a tag after this")]
        span: SourceSpan,
    },

    #[error("invalid tag in image reference")]
    #[diagnostic(
        code(standin::parse::tag),
        help("tags are up to 128 word characters, dots and dashes, like `1.2.3` or `7-alpine`")
    )]
    InvalidTag {
        #[source_code]
        src: String,
        #[label("not a valid tag")]
        span: SourceSpan,
    },

    #[error("invalid digest in image reference")]
    #[diagnostic(
        code(standin::parse::digest),
        help("digests are an algorithm and a hash, like `sha256:` followed by the hex digest")
    )]
    InvalidDigest {
        #[source_code]
        src: String,
        #[label("not a valid digest")]
        span: SourceSpan,
    },
}

/// Raised by the assertion entry point when a reference cannot stand in
/// for the one that was expected. The predicate form never raises.
#[derive(Error, Diagnostic, Debug)]
#[error("Failed to verify that image '{candidate}' is a compatible substitute for '{required}'")]
#[diagnostic(
    code(standin::incompatible),
    help("declare the substitution with `as_compatible_substitute_for` if '{candidate}' really is a drop-in replacement for '{required}'")
)]
pub struct CompatibilityError {
    pub candidate: String,
    pub required: String,
}

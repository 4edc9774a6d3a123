//! Canonical container image references and the rules for deciding when
//! one image may stand in for another: exact matches, `latest`/absent tag
//! wildcards, bare-name path suffixes, and explicitly claimed
//! substitutions.

pub mod error;
pub mod reference;
pub mod version;

#[macro_use]
extern crate lazy_static;

pub use crate::error::{CompatibilityError, ParseError};
pub use crate::reference::ImageReference;
pub use crate::version::Version;

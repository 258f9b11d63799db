//! Build identification printed by `--version-info`.

use serde::Serialize;

/// Version, build, and tag identifiers.
///
/// `Build` and `GitTag` come from the `BUILD_ID` and `GIT_TAG` environment
/// variables at compile time and are empty when those were unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VersionInfo {
    /// Crate version.
    pub version: &'static str,
    /// Build identifier.
    pub build: &'static str,
    /// Source control tag.
    pub git_tag: &'static str,
}

impl VersionInfo {
    /// Identifiers for the running binary.
    #[must_use]
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            build: option_env!("BUILD_ID").unwrap_or_default(),
            git_tag: option_env!("GIT_TAG").unwrap_or_default(),
        }
    }
}

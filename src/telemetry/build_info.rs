//! Build metadata recorded by `build.rs` at compile time.

use std::fmt;

use serde::Serialize;

/// Key/value setting describing how the binary was built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildSetting {
    pub key: &'static str,
    pub value: &'static str,
}

impl BuildSetting {
    pub const fn new(key: &'static str, value: &'static str) -> Self {
        Self { key, value }
    }
}

/// Read-only description of the running build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub package: &'static str,
    pub version: &'static str,
    pub rustc: &'static str,
    pub settings: Vec<BuildSetting>,
}

impl BuildInfo {
    /// Metadata of the current binary
    pub fn current() -> Self {
        let settings = [
            ("vcs.revision", option_env!("BUILD_VCS_REVISION")),
            ("vcs.time", option_env!("BUILD_VCS_TIME")),
            ("vcs.modified", option_env!("BUILD_VCS_MODIFIED")),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| BuildSetting::new(key, value)))
        .collect();

        Self {
            package: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            rustc: option_env!("BUILD_RUSTC_VERSION").unwrap_or("unknown"),
            settings,
        }
    }

    pub fn setting(&self, key: &str) -> Option<&'static str> {
        self.settings
            .iter()
            .find(|setting| setting.key == key)
            .map(|setting| setting.value)
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "package\t{} {}", self.package, self.version)?;
        write!(f, "rustc\t{}", self.rustc)?;
        for setting in &self.settings {
            write!(f, "\nbuild\t{}={}", setting.key, setting.value)?;
        }
        Ok(())
    }
}

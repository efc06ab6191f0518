use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};

use crate::telemetry::build_info::{BuildInfo, BuildSetting};
use crate::telemetry::config::TelemetryConfig;
use crate::telemetry::error::TelemetryError;

/// Toolchain that compiled the running binary
pub const BUILD_RUST: &str = "build.rust";

const BUILD_PREFIX: &str = "build.";

/// Attributes describing the running build, attached to every span.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDescriptor {
    attributes: Vec<KeyValue>,
}

impl ResourceDescriptor {
    /// Base attributes followed by the tagged VCS settings of `build`.
    pub fn new(config: &TelemetryConfig, build: &BuildInfo) -> Result<Self, TelemetryError> {
        if config.service_name.trim().is_empty() {
            return Err(TelemetryError::Resource("service name is empty".to_string()));
        }
        if config.service_version.trim().is_empty() {
            return Err(TelemetryError::Resource("service version is empty".to_string()));
        }

        let mut attributes = base_attributes(config, build);
        attributes.extend(vcs_attributes(&build.settings));
        Ok(Self { attributes })
    }

    pub fn attributes(&self) -> &[KeyValue] {
        &self.attributes
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|kv| kv.key.as_str() == key)
            .map(|kv| &kv.value)
    }

    pub fn to_resource(&self) -> Resource {
        Resource::builder()
            .with_attributes(self.attributes.iter().cloned())
            .build()
    }
}

/// Attributes present on every resource
pub fn base_attributes(config: &TelemetryConfig, build: &BuildInfo) -> Vec<KeyValue> {
    vec![
        KeyValue::new(SERVICE_NAME, config.service_name.clone()),
        KeyValue::new(SERVICE_VERSION, config.service_version.clone()),
        KeyValue::new(BUILD_RUST, build.rustc),
    ]
}

/// Tag VCS build settings with the `build.` prefix.
///
/// Only the settings slice is scanned. Tagged keys never match again, so
/// passing derived entries back in yields nothing.
pub fn vcs_attributes(settings: &[BuildSetting]) -> Vec<KeyValue> {
    settings
        .iter()
        .filter_map(|setting| match setting.key {
            "vcs.revision" | "vcs.time" => Some(KeyValue::new(
                format!("{BUILD_PREFIX}{}", setting.key),
                setting.value,
            )),
            "vcs.modified" => Some(KeyValue::new(
                format!("{BUILD_PREFIX}{}", setting.key),
                setting.value == "true",
            )),
            _ => None,
        })
        .collect()
}

use std::env;

/// Environment variable selecting the exporter backend
pub const EXPORTER_ENV: &str = "OTEL_EXPORTER";

/// Service name reported when `OTEL_SERVICE_NAME` is not set
pub const DEFAULT_SERVICE_NAME: &str = "api";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Pretty human-readable format with colors (for local dev)
    #[default]
    Pretty,
    /// JSON structured format (for log collectors)
    Json,
}

impl LogFormat {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Main telemetry configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub service_version: String,
    /// Raw `OTEL_EXPORTER` value; classified by the exporter selector.
    pub exporter: Option<String>,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl TelemetryConfig {
    /// Create config from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            service_name: lookup("OTEL_SERVICE_NAME")
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
            service_version: lookup("OTEL_SERVICE_VERSION")
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            exporter: lookup(EXPORTER_ENV),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_format: LogFormat::parse(lookup("LOG_FORMAT").as_deref()),
        }
    }

    /// Create a new config with explicit values and telemetry disabled
    pub fn new(service_name: impl Into<String>, service_version: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            service_version: service_version.into(),
            exporter: None,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }

    pub fn builder() -> TelemetryConfigBuilder {
        TelemetryConfigBuilder::default()
    }

    pub fn with_exporter(mut self, exporter: impl Into<String>) -> Self {
        self.exporter = Some(exporter.into());
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME, env!("CARGO_PKG_VERSION"))
    }
}

#[derive(Debug, Default)]
pub struct TelemetryConfigBuilder {
    service_name: Option<String>,
    service_version: Option<String>,
    exporter: Option<String>,
    log_level: Option<String>,
    log_format: Option<LogFormat>,
}

impl TelemetryConfigBuilder {
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    pub fn service_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = Some(version.into());
        self
    }

    pub fn exporter(mut self, exporter: impl Into<String>) -> Self {
        self.exporter = Some(exporter.into());
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = Some(format);
        self
    }

    pub fn json(self) -> Self {
        self.log_format(LogFormat::Json)
    }

    pub fn pretty(self) -> Self {
        self.log_format(LogFormat::Pretty)
    }

    pub fn build(self) -> TelemetryConfig {
        TelemetryConfig {
            service_name: self
                .service_name
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
            service_version: self
                .service_version
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            exporter: self.exporter,
            log_level: self.log_level.unwrap_or_else(|| "info".to_string()),
            log_format: self.log_format.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn log_format_default_is_pretty() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }

    #[test]
    fn config_new_sets_defaults() {
        let config = TelemetryConfig::new("test-service", "1.0.0");

        assert_eq!(config.service_name, "test-service");
        assert_eq!(config.service_version, "1.0.0");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.exporter.is_none());
    }

    #[test]
    fn config_with_methods_chain() {
        let config = TelemetryConfig::new("svc", "1.0")
            .with_log_level("debug")
            .with_log_format(LogFormat::Json)
            .with_exporter("otlp");

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.exporter.as_deref(), Some("otlp"));
    }

    #[test]
    fn builder_sets_all_fields() {
        let config = TelemetryConfigBuilder::default()
            .service_name("my-service")
            .service_version("2.0.0")
            .log_level("warn")
            .exporter("stdout")
            .json()
            .build();

        assert_eq!(config.service_name, "my-service");
        assert_eq!(config.service_version, "2.0.0");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.exporter.as_deref(), Some("stdout"));
    }

    #[test]
    fn builder_uses_defaults_when_not_set() {
        let config = TelemetryConfig::builder().pretty().build();

        assert_eq!(config.service_name, DEFAULT_SERVICE_NAME);
        assert_eq!(config.service_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.exporter.is_none());
    }

    #[test]
    fn from_lookup_without_variables_matches_default() {
        let config = TelemetryConfig::from_lookup(lookup_from(&[]));

        assert_eq!(config, TelemetryConfig::default());
    }

    #[test]
    fn from_lookup_reads_every_variable() {
        let config = TelemetryConfig::from_lookup(lookup_from(&[
            ("OTEL_SERVICE_NAME", "billing"),
            ("OTEL_SERVICE_VERSION", "3.1.4"),
            ("OTEL_EXPORTER", "stdout"),
            ("RUST_LOG", "debug"),
            ("LOG_FORMAT", "json"),
        ]));

        assert_eq!(config.service_name, "billing");
        assert_eq!(config.service_version, "3.1.4");
        assert_eq!(config.exporter.as_deref(), Some("stdout"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn from_lookup_keeps_empty_exporter_value_raw() {
        let config = TelemetryConfig::from_lookup(lookup_from(&[("OTEL_EXPORTER", "")]));

        assert_eq!(config.exporter.as_deref(), Some(""));
    }

    #[test]
    fn unknown_log_format_falls_back_to_pretty() {
        let config = TelemetryConfig::from_lookup(lookup_from(&[("LOG_FORMAT", "xml")]));

        assert_eq!(config.log_format, LogFormat::Pretty);
    }
}

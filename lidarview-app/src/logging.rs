//! Explicit logging context for the process.

use lidarview_data::Settings;
use tracing::level_filters::LevelFilter;
use tracing::subscriber::DefaultGuard;
use tracing::{debug, warn};
use tracing_log::{AsLog, LogTracer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::INFO;

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: LevelFilter,
    /// Level text that failed to parse, reported once logging is up.
    rejected: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            rejected: None,
        }
    }
}

impl LoggingConfig {
    /// Level from `--log-level` if given, else the `log_level` setting.
    pub fn from_settings(settings: &Settings, cli_level: Option<&str>) -> Self {
        let text = cli_level
            .map(str::to_string)
            .unwrap_or_else(|| settings.get_string("log_level", "info"));
        match text.parse::<LevelFilter>() {
            Ok(level) => Self {
                level,
                rejected: None,
            },
            Err(_) => Self {
                level: DEFAULT_LEVEL,
                rejected: Some(text),
            },
        }
    }

    /// `RUST_LOG`-style directives win over the configured level.
    pub fn filter(&self, env_directives: Option<&str>) -> EnvFilter {
        env_directives
            .filter(|directives| !directives.trim().is_empty())
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| {
                EnvFilter::builder()
                    .with_default_directive(self.level.into())
                    .parse_lossy("")
            })
    }

    /// Most verbose level any directive enables, so `log` records that the
    /// filter would pass are not dropped before they reach it.
    pub fn bridge_level(&self, env_directives: Option<&str>) -> LevelFilter {
        self.filter(env_directives)
            .max_level_hint()
            .unwrap_or(self.level)
    }

    /// Install the subscriber for the current thread. Logging stays active
    /// until the returned guard is dropped.
    ///
    /// Records from the `log` crate (wgpu, winit) are forwarded as tracing
    /// events and reach this subscriber when emitted on the installing thread.
    pub fn install(&self) -> DefaultGuard {
        let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let bridge = LogTracer::builder()
            .with_max_level(self.bridge_level(env.as_deref()).as_log())
            .init();
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_filter(self.filter(env.as_deref()));

        #[cfg(feature = "tracy")]
        let subscriber = tracing_subscriber::registry()
            .with(tracing_tracy::TracyLayer::default())
            .with(fmt_layer);
        #[cfg(not(feature = "tracy"))]
        let subscriber = tracing_subscriber::registry().with(fmt_layer);

        let guard = tracing::subscriber::set_default(subscriber);
        if let Err(err) = bridge {
            debug!("log bridge not installed: {err}");
        }
        if let Some(text) = &self.rejected {
            warn!("Unknown log level {text:?}, using {DEFAULT_LEVEL}");
        }
        guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_settings() {
        let settings = Settings::parse("log_level = debug\n");
        let config = LoggingConfig::from_settings(&settings, None);
        assert_eq!(config.level, LevelFilter::DEBUG);
    }

    #[test]
    fn test_cli_level_overrides_settings() {
        let settings = Settings::parse("log_level = debug\n");
        let config = LoggingConfig::from_settings(&settings, Some("warn"));
        assert_eq!(config.level, LevelFilter::WARN);
    }

    #[test]
    fn test_unknown_level_falls_back() {
        let settings = Settings::parse("log_level = chatty\n");
        let config = LoggingConfig::from_settings(&settings, None);
        assert_eq!(config.level, DEFAULT_LEVEL);
        assert_eq!(config.rejected.as_deref(), Some("chatty"));
    }

    #[test]
    fn test_env_directives_win() {
        let config = LoggingConfig {
            level: LevelFilter::ERROR,
            rejected: None,
        };
        assert_eq!(config.filter(None).max_level_hint(), Some(LevelFilter::ERROR));
        assert_eq!(config.filter(Some("  ")).max_level_hint(), Some(LevelFilter::ERROR));
        assert_eq!(
            config.filter(Some("trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn test_bridge_level_follows_directives() {
        let config = LoggingConfig {
            level: LevelFilter::WARN,
            rejected: None,
        };
        assert_eq!(config.bridge_level(None), LevelFilter::WARN);
        assert_eq!(config.bridge_level(Some("wgpu_core=debug")), LevelFilter::DEBUG);
    }

    #[test]
    fn test_install_forwards_log_records() {
        use tracing_log::log;

        let config = LoggingConfig {
            level: LevelFilter::WARN,
            rejected: None,
        };
        let _guard = config.install();
        assert!(log::log_enabled!(target: "wgpu_core", log::Level::Error));
    }
}

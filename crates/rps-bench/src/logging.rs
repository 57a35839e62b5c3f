use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, ResolvedOutputs};

pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
}

const SELECTOR_TARGET: &str = "rps_bot::selector";

/// Install a JSON subscriber writing next to the summary file. Returns `None`
/// when structured logging is disabled. With `selector_trace` the per-policy
/// standings are kept even when the configured level is coarser than DEBUG.
pub fn init_logging(
    logging: &LoggingConfig,
    selector_trace: bool,
    outputs: &ResolvedOutputs,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let telemetry_dir = outputs
        .summary_md
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&telemetry_dir).with_context(|| {
        format!(
            "creating telemetry directory at {}",
            telemetry_dir.display()
        )
    })?;

    let telemetry_path = telemetry_dir.join("telemetry.jsonl");
    let file = File::create(&telemetry_path)
        .with_context(|| format!("creating telemetry file at {}", telemetry_path.display()))?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let level = logging.level().unwrap_or(Level::INFO);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level, selector_trace)));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    // A subscriber may already be installed (tests, embedding binaries).
    let _ = tracing::subscriber::set_global_default(subscriber);

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path,
    }))
}

/// Filter directives used when `RUST_LOG` is unset.
fn default_directives(level: Level, selector_trace: bool) -> String {
    let base = level.as_str().to_ascii_lowercase();
    if selector_trace && level < Level::DEBUG {
        format!("{base},{SELECTOR_TARGET}=debug")
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_trace_raises_the_selector_target_only() {
        assert_eq!(default_directives(Level::INFO, false), "info");
        assert_eq!(
            default_directives(Level::INFO, true),
            "info,rps_bot::selector=debug"
        );
        assert_eq!(
            default_directives(Level::WARN, true),
            "warn,rps_bot::selector=debug"
        );
        assert_eq!(default_directives(Level::TRACE, true), "trace");
        assert!(EnvFilter::try_new(default_directives(Level::INFO, true)).is_ok());
    }

    #[test]
    fn disabled_logging_installs_nothing() {
        let outputs = ResolvedOutputs {
            jsonl: PathBuf::from("unused/rounds.jsonl"),
            summary_md: PathBuf::from("unused/summary.md"),
        };
        let guard = init_logging(&LoggingConfig::default(), true, &outputs).expect("no io");
        assert!(guard.is_none());
        assert!(!Path::new("unused").exists());
    }
}

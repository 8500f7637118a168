//! Log output for the pipeline.
//!
//! Two sinks, both restricted to events emitted by this library:
//! - stderr, compact and colored when attached to a terminal, gated by
//!   `RUST_LOG` plus the requested level;
//! - an optional plain-text file `<dir>/<name>_<YYYYMMDD_HHMMSS>.log` that
//!   always records `debug` and above, so a run can be inspected afterwards.

use std::fs::{self, File};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::filter::{self, Directive, LevelFilter};
use tracing_subscriber::fmt::{self, format::FmtSpan, format::Writer, time::FormatTime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::errors::{GraphPrepError, GraphPrepResult};

/// Target prefix of every event emitted by this library.
pub const TARGET_PREFIX: &str = "textgraph_prep";

/// Where and how much to log.
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Filter used when `RUST_LOG` is unset, e.g. `"warn"`.
    pub default_directive: String,
    /// Level for this library on stderr.
    pub level: Level,
    /// Directory for the run log file; `None` disables it.
    pub log_dir: Option<PathBuf>,
    /// File name prefix of the run log.
    pub log_name: String,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            default_directive: "warn".into(),
            level: Level::INFO,
            log_dir: None,
            log_name: TARGET_PREFIX.into(),
        }
    }
}

/// Install the global subscriber. Returns the log file path when one was opened.
pub fn init(opts: &LogOptions) -> GraphPrepResult<Option<PathBuf>> {
    let console = console_layer().with_filter(env_filter_with_level(&opts.default_directive, opts.level));

    let (file, path) = match &opts.log_dir {
        Some(dir) => {
            let (layer, path) = file_layer(dir, &opts.log_name)?;
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| GraphPrepError::Config(format!("logging already initialised: {e}")))?;
    Ok(path)
}

/// Compact stderr layer: `file:line`, target and span close timings.
pub fn console_layer<S>() -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(io::stderr)
        .with_timer(UtcSeconds)
        .with_ansi(io::stderr().is_terminal())
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(filter::filter_fn(emitted_here))
}

/// Plain-text run log at `debug`, created under `dir` (which is created if missing).
pub fn file_layer<S>(dir: &Path, name: &str) -> GraphPrepResult<(impl Layer<S> + Send + Sync, PathBuf)>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fs::create_dir_all(dir)?;
    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("{name}_{stamp}.log"));
    let file = File::create(&path)?;

    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_timer(UtcSeconds)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_filter(LevelFilter::DEBUG)
        .with_filter(filter::filter_fn(emitted_here));
    Ok((layer, path))
}

/// Level directive scoped to this library, e.g. `textgraph_prep=debug`.
pub fn level_directive(level: Level) -> Directive {
    let lowered = level.as_str().to_lowercase();
    Directive::from_str(&format!("{TARGET_PREFIX}={lowered}")).unwrap_or_else(|_| Directive::from(level))
}

/// `RUST_LOG` (or `default` when unset) plus the library-level override.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default))
        .add_directive(level_directive(level))
}

fn emitted_here(meta: &Metadata<'_>) -> bool {
    meta.target().starts_with(TARGET_PREFIX)
}

/// RFC3339 UTC at whole seconds, e.g. `2025-09-12T10:20:30Z`.
#[derive(Clone, Copy, Debug, Default)]
struct UtcSeconds;

impl FormatTime for UtcSeconds {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::Registry;

    #[test]
    fn directive_targets_this_library() {
        assert_eq!(level_directive(Level::DEBUG).to_string(), "textgraph_prep=debug");
    }

    #[test]
    fn file_layer_writes_library_events_only() {
        let tmp = tempfile::tempdir().unwrap();
        let (layer, path) = file_layer::<Registry>(&tmp.path().join("logs"), "run").unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("run_") && name.ends_with(".log"), "{name}");

        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(target: "textgraph_prep::run", "from the library");
            tracing::info!(target: "other_crate", "from elsewhere");
        });

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("from the library"));
        assert!(!text.contains("from elsewhere"));
    }
}

use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Crate target prefix used to filter only library-originated logs.
pub const TARGET_PREFIX: &str = "ifu_engine";

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Which events a layer renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Events emitted by this library; rendered with target and `file:line`.
    Engine,
    /// Everything else (the embedding binary, dependencies); rendered bare.
    Others,
}

impl Scope {
    pub fn admits(self, target: &str) -> bool {
        let ours = target.starts_with(TARGET_PREFIX);
        match self {
            Scope::Engine => ours,
            Scope::Others => !ours,
        }
    }
}

/// Formatting layer for one [`Scope`], writing to stderr.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format
/// - Span close events (durations of instrumented lookups/searches) for the engine scope
/// - ANSI colors only when stderr is a terminal
///
/// stdout is left to the embedding application. Install one layer per scope
/// on the global registry.
pub fn layer<S>(scope: Scope) -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let detailed = scope == Scope::Engine;
    let span_events = if detailed {
        fmt::format::FmtSpan::CLOSE
    } else {
        fmt::format::FmtSpan::NONE
    };

    fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_span_events(span_events)
        .event_format(
            fmt::format()
                .compact()
                .with_timer(ChronoRfc3339Utc)
                .with_target(detailed)
                .with_source_location(detailed),
        )
        .with_filter(filter::filter_fn(move |meta| scope.admits(meta.target())))
}

/// Helper to build a level directive for **this** library only, e.g. `ifu_engine=debug`.
pub fn level_directive(level: Level) -> Directive {
    let s = format!("{TARGET_PREFIX}={}", level.as_str().to_lowercase());
    Directive::from_str(&s).expect("valid level directive")
}

/// EnvFilter from `RUST_LOG` when set; otherwise `default` plus a
/// per-crate level directive for this library.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default).add_directive(level_directive(level)))
}

/// Clips `text` to `max_chars` characters for logging, noting how much was cut.
pub fn clip_for_log(text: &str, max_chars: usize) -> String {
    let total = text.chars().count();
    if total <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{head}... [truncated {} chars]", total - max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_split_targets() {
        assert!(Scope::Engine.admits("ifu_engine::resolver"));
        assert!(!Scope::Engine.admits("ifu_scout"));
        assert!(Scope::Others.admits("ifu_scout::repl"));
        assert!(!Scope::Others.admits("ifu_engine"));
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(clip_for_log("Vista 300", 20), "Vista 300");
    }

    #[test]
    fn long_text_reports_truncation() {
        assert_eq!(clip_for_log("abcdef", 4), "abcd... [truncated 2 chars]");
        // counts characters, not bytes
        assert_eq!(clip_for_log("说明书检索", 2), "说明... [truncated 3 chars]");
    }
}

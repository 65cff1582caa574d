//! Colorful console output for association builder runs.
//!
//! Provides a custom `tracing` layer that formats builder events with colors
//! on stderr, leaving stdout free for documents.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (generate start/end, per rule summaries, files written)
//! - **WARN**: Rejected associations and skipped rules
//! - **DEBUG**: Grouping and editing detail

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Target prefix shared by every crate in the workspace.
const TARGET_PREFIX: &str = "jwst_asn";

/// Initializes console output at INFO.
///
/// Safe to call multiple times - only the first call has effect.
pub fn init() {
    init_with_verbosity(0);
}

/// Initializes console output.
///
/// `verbosity` 0 logs INFO, 1 DEBUG, 2 and above TRACE. `RUST_LOG`, when
/// set, takes precedence.
pub fn init_with_verbosity(verbosity: u8) {
    INIT.get_or_init(|| {
        EPOCH.get_or_init(Instant::now);

        let level = match verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", TARGET_PREFIX, level)));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(AsnConsoleLayer)
            .try_init();
    });
}

// Returns elapsed time since init.
fn elapsed_secs() -> f64 {
    EPOCH
        .get()
        .map(|epoch| epoch.elapsed().as_secs_f64())
        .unwrap_or(0.0)
}

/// A tracing layer that formats builder events with colors.
pub struct AsnConsoleLayer;

impl<S: Subscriber> Layer<S> for AsnConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with(TARGET_PREFIX) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stderr(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    pool: Option<String>,
    rule: Option<String>,
    path: Option<String>,
    entry_count: Option<u64>,
    rule_count: Option<u64>,
    association_count: Option<u64>,
    failure_count: Option<u64>,
    // Any other fields, in record order.
    fields: Vec<(&'static str, String)>,
}

impl EventVisitor {
    fn record_text(&mut self, field: &Field, value: String) {
        match field.name() {
            "event" => self.event = Some(value),
            "message" => self.message = Some(value),
            "pool" => self.pool = Some(value),
            "rule" => self.rule = Some(value),
            "path" => self.path = Some(value),
            name => self.fields.push((name, value)),
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.record_text(field, s.trim_matches('"').to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "entry_count" => self.entry_count = Some(value),
            "rule_count" => self.rule_count = Some(value),
            "association_count" => self.association_count = Some(value),
            "failure_count" => self.failure_count = Some(value),
            name => self.fields.push((name, value.to_string())),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref() {
        Some("generate_start") => format_generate_start(v),
        Some("rule_end") => format_rule_end(v),
        Some("generate_end") => format_generate_end(v),
        Some("written") => format_written(v),
        _ => format_message(v, level),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_generate_start(v: &EventVisitor) -> String {
    format!(
        "{} {} Pool {} │ {} entries │ {} rules",
        format_elapsed(),
        "▶".bright_green().bold(),
        v.pool.as_deref().unwrap_or("?").white().bold(),
        count(v.entry_count).bright_yellow(),
        count(v.rule_count).bright_yellow(),
    )
}

fn format_rule_end(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} {} │ {} associations",
        format_elapsed(),
        "◀".bright_blue(),
        v.rule.as_deref().unwrap_or("?").white().bold(),
        count(v.association_count).bright_magenta(),
    );
    if v.failure_count.unwrap_or(0) > 0 {
        let _ = write!(
            output,
            " │ {} rejected",
            count(v.failure_count).bright_red().bold()
        );
    }
    output
}

fn format_generate_end(v: &EventVisitor) -> String {
    let failures = v.failure_count.unwrap_or(0);
    let status = if failures == 0 {
        "OK".bright_green().bold().to_string()
    } else {
        format!("{} FAILURES", count(v.failure_count))
            .bright_red()
            .bold()
            .to_string()
    };
    format!(
        "{} {} Generated {} associations │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        count(v.association_count).bright_magenta().bold(),
        status,
    )
}

fn format_written(v: &EventVisitor) -> String {
    format!(
        "{} {} {}",
        format_elapsed(),
        "✎".bright_cyan(),
        v.path.as_deref().unwrap_or("?").white(),
    )
}

fn format_message(v: &EventVisitor, level: Level) -> String {
    let Some(message) = v.message.as_deref() else {
        return String::new();
    };

    let tag = match level {
        Level::ERROR => "ERROR".bright_red().bold().to_string(),
        Level::WARN => " WARN".bright_yellow().bold().to_string(),
        Level::INFO => " INFO".bright_green().to_string(),
        Level::DEBUG => "DEBUG".bright_blue().to_string(),
        _ => "TRACE".bright_black().to_string(),
    };

    let mut output = format!("{} {} {}", format_elapsed(), tag, message);
    for (name, value) in named_fields(v) {
        let _ = write!(output, " {}={}", name.bright_black(), value);
    }
    output
}

fn named_fields(v: &EventVisitor) -> Vec<(&str, String)> {
    let mut fields: Vec<(&str, String)> = Vec::new();
    if let Some(pool) = &v.pool {
        fields.push(("pool", pool.clone()));
    }
    if let Some(rule) = &v.rule {
        fields.push(("rule", rule.clone()));
    }
    if let Some(path) = &v.path {
        fields.push(("path", path.clone()));
    }
    fields.extend(v.fields.iter().map(|(name, value)| (*name, value.clone())));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_without_text_is_dropped() {
        let visitor = EventVisitor::default();
        assert!(format_event(&visitor, Level::INFO).is_empty());
    }

    #[test]
    fn test_rule_end_mentions_rejections() {
        let visitor = EventVisitor {
            event: Some("rule_end".into()),
            rule: Some("Asn_Lv2Spec".into()),
            association_count: Some(3),
            failure_count: Some(1),
            ..EventVisitor::default()
        };
        let output = format_event(&visitor, Level::INFO);
        assert!(output.contains("Asn_Lv2Spec"));
        assert!(output.contains("rejected"));
    }

    #[test]
    fn test_message_lists_fields() {
        let visitor = EventVisitor {
            message: Some("association rejected".into()),
            rule: Some("Asn_Lv2Spec".into()),
            fields: vec![("asn_id", "o001".into())],
            ..EventVisitor::default()
        };
        let output = format_event(&visitor, Level::WARN);
        assert!(output.contains("association rejected"));
        assert!(output.contains("o001"));
    }

    #[test]
    fn test_counts_use_separators() {
        assert_eq!(count(Some(12_345)), "12,345");
        assert_eq!(count(None), "0");
    }
}

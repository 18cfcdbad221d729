use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use time::OffsetDateTime;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// One captured tracing event.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    pub fn format_compact(&self) -> String {
        let mut line = format!(
            "{} {:<5} {} {}",
            self.timestamp, self.level, self.target, self.message
        );
        if !self.fields.is_empty() {
            let mut extras: Vec<String> = self
                .fields
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            extras.sort();
            line.push_str(" | ");
            line.push_str(&extras.join(" "));
        }
        line
    }
}

/// Bounded in-memory record of recent events: the diagnostic channel the
/// CLI can dump after a command, separate from what the user is shown.
#[derive(Clone)]
pub struct LogBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    max_entries: usize,
}

impl LogBuffer {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::new())),
            max_entries,
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Entries at `level` or more severe.
    pub fn at_least(&self, level: Level) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.level <= level)
            .collect()
    }

    fn push(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push_back(entry);
            while entries.len() > self.max_entries {
                entries.pop_front();
            }
        }
    }
}

#[derive(Clone)]
pub struct LogLayer {
    buffer: LogBuffer,
}

impl LogLayer {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl<S> Layer<S> for LogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldCollector::default();
        event.record(&mut visitor);
        let metadata = event.metadata();
        self.buffer.push(LogEntry {
            timestamp: format_timestamp(OffsetDateTime::now_utc()),
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl FieldCollector {
    fn push(&mut self, field: &tracing::field::Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl tracing::field::Visit for FieldCollector {
    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.push(field, value.to_string());
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn Debug) {
        self.push(field, format!("{value:?}"));
    }
}

fn format_timestamp(timestamp: OffsetDateTime) -> String {
    match time::format_description::parse("[hour repr:24]:[minute]:[second]") {
        Ok(format) => timestamp
            .format(&format)
            .unwrap_or_else(|_| timestamp.unix_timestamp().to_string()),
        Err(_) => timestamp.unix_timestamp().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::dom::Document;
    use folio_core::feed::{self, CardFormat, FeedError, FeedOutcome};
    use tracing_subscriber::prelude::*;

    #[test]
    fn format_compact_sorts_fields() {
        let entry = LogEntry {
            timestamp: "12:34:56".to_string(),
            level: Level::WARN,
            target: "folio_core::feed".to_string(),
            message: "Repository listing returned an error status".to_string(),
            fields: vec![
                ("status".to_string(), "404".to_string()),
                ("identity".to_string(), "ghost".to_string()),
            ],
        };
        let line = entry.format_compact();
        assert!(line.starts_with("12:34:56 WARN"));
        assert!(line.contains("folio_core::feed Repository listing returned an error status"));
        assert!(line.ends_with("| identity=ghost status=404"));
    }

    #[test]
    fn buffer_drops_oldest_entries() {
        let buffer = LogBuffer::new(2);
        let subscriber = tracing_subscriber::registry().with(LogLayer::new(buffer.clone()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("one");
            tracing::info!("two");
            tracing::info!("three");
        });
        let messages: Vec<_> = buffer.entries().into_iter().map(|entry| entry.message).collect();
        assert_eq!(messages, ["two", "three"]);
    }

    #[test]
    fn transport_failure_lands_on_diagnostic_channel() {
        let buffer = LogBuffer::new(16);
        let subscriber = tracing_subscriber::registry().with(LogLayer::new(buffer.clone()));
        let mut doc = Document::new();
        let container = doc.element_with_id(doc.body(), "div", feed::CONTAINER_ID);
        let outcome = tracing::subscriber::with_default(subscriber, || {
            feed::render_result(
                &mut doc,
                container,
                Err(FeedError::transport(anyhow::anyhow!("connection refused"))),
                &CardFormat::default(),
            )
        });

        assert_eq!(outcome, FeedOutcome::Failed);
        assert_eq!(doc.text_content(container), feed::GENERIC_FAILURE_MESSAGE);
        let errors = buffer.at_least(Level::ERROR);
        assert_eq!(errors.len(), 1);
        assert!(
            errors[0]
                .fields
                .iter()
                .any(|(name, value)| name == "error" && value.contains("connection refused"))
        );
    }
}

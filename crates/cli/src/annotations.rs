//! Tracing layer that speaks GitHub Actions workflow commands.
//!
//! ERROR and WARN events become `::error::` and `::warning::` annotations,
//! DEBUG and TRACE become `::debug::` lines (shown only with step debug
//! logging), INFO is printed as a plain log line.

use std::fmt::Write as _;
use std::io::Write as _;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Renders events as workflow commands.
pub struct WorkflowCommandLayer<W> {
    make_writer: W,
}

impl<W> WorkflowCommandLayer<W>
where
    W: for<'w> MakeWriter<'w> + 'static,
{
    /// Create a layer writing to `make_writer`.
    #[must_use]
    pub fn new(make_writer: W) -> Self {
        Self { make_writer }
    }
}

impl<S, W> Layer<S> for WorkflowCommandLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let line = workflow_command(*event.metadata().level(), &visitor.finish());
        let mut writer = self.make_writer.make_writer();
        let _ = writeln!(writer, "{line}");
    }
}

/// Format one message as a workflow command for `level`.
#[must_use]
pub fn workflow_command(level: Level, message: &str) -> String {
    let escaped = escape_data(message);
    match level {
        Level::ERROR => format!("::error::{escaped}"),
        Level::WARN => format!("::warning::{escaped}"),
        Level::INFO => message.to_string(),
        Level::DEBUG | Level::TRACE => format!("::debug::{escaped}"),
    }
}

/// Escape command data so multi-line messages stay one command.
#[must_use]
pub fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            return self.message;
        }
        let mut out = self.message;
        out.push_str(" (");
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{name}={value}");
        }
        out.push(')');
        out
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push((field.name(), format!("{value:?}")));
        }
    }
}

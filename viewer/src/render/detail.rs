//! Detail panel for the selected span

use crate::core::config::RenderConfig;
use crate::domain::traces::{MetricKind, MetricLine, Waterfall, WaterfallRow};
use crate::utils::terminal::{BOLD, GRAY, RED, paint, terminal_link};
use crate::utils::time::{format_time_label, format_timestamp, millis_between};

/// Render the panel for `selected`.
///
/// Returns `None` when nothing is selected or the id is not in the trace.
pub fn render_detail(
    waterfall: &Waterfall<'_>,
    selected: Option<&str>,
    opts: &RenderConfig,
) -> Option<String> {
    let row = waterfall.row(selected?)?;
    Some(render_row_detail(waterfall, row, opts))
}

fn render_row_detail(
    waterfall: &Waterfall<'_>,
    row: &WaterfallRow<'_>,
    opts: &RenderConfig,
) -> String {
    let span = row.span();
    let class = &row.classification;
    let rule = "─".repeat(opts.width.min(80));

    let mut out = String::new();
    out.push_str(&paint(&rule, GRAY, opts.color));
    out.push('\n');
    out.push_str(&format!(
        "{} {}\n",
        paint(&span.name, BOLD, opts.color),
        paint(&format!("({})", span.span_id), GRAY, opts.color)
    ));
    out.push_str(&format!(
        "Type: {}  Status: {}\n",
        paint(span.span_type.as_str(), class.color.ansi(), opts.color),
        paint(
            &format!("{} {}", class.status.symbol(), span.status),
            class.status.color().ansi(),
            opts.color
        )
    ));

    let offset = waterfall
        .trace
        .start_time()
        .map(|start| format_time_label(millis_between(start, span.started_at)))
        .unwrap_or_else(|| format_time_label(0.0));
    out.push_str(&format!(
        "Started: {} (+{})  Duration: {}\n",
        format_timestamp(span.started_at),
        offset,
        row.duration_label
    ));

    // Error first, and never dropped
    if let Some(error) = &class.error {
        out.push('\n');
        out.push_str(&paint(&format!("✖ Error: {}", error), RED, opts.color));
        out.push('\n');
    }

    let lines = class.metrics.lines();
    if !lines.is_empty() {
        out.push('\n');
        for line in &lines {
            out.push_str(&render_metric_line(line, opts));
        }
    }
    out
}

fn render_metric_line(line: &MetricLine, opts: &RenderConfig) -> String {
    let label = paint(&line.label, BOLD, opts.color);
    match line.kind {
        MetricKind::Plain => format!("{}: {}\n", label, line.value),
        MetricKind::Link => format!("{}: {}\n", label, terminal_link(&line.value, opts.color)),
        // Printed exactly as received, on its own lines
        MetricKind::Verbatim => format!("{}:\n{}\n", label, line.value),
        MetricKind::Overflow => format!("{}\n", paint(&line.value, GRAY, opts.color)),
    }
}

/// Inline message for a trace that failed to load
pub fn render_load_error(trace_id: &str, message: &str, opts: &RenderConfig) -> String {
    format!(
        "{}\n",
        paint(
            &format!("✖ Failed to load trace {}: {}", trace_id, message),
            RED,
            opts.color
        )
    )
}

//! Waterfall chart: header, shared time axis, one row per span

use crate::core::config::RenderConfig;
use crate::core::constants::{
    AXIS_MARKERS, INDENT_WIDTH, LABEL_COLUMNS, MAX_INDENT_DEPTH, MAX_LABEL_NAME_CHARS,
};
use crate::domain::traces::{StatusBadge, Waterfall, WaterfallRow};
use crate::utils::string::{format_usd, group_digits, truncate_preview};
use crate::utils::terminal::{BOLD, GRAY, RED, paint};

/// Columns for the right-aligned duration label
const DURATION_COLUMNS: usize = 8;

/// Separators around the bar column: `│` before, `│ ` after
const SEPARATOR_COLUMNS: usize = 3;

/// Bar column never shrinks below this many cells
const MIN_BAR_COLUMNS: usize = 10;

const BAR_CHAR: &str = "█";
const SELECTED_MARKER: &str = "› ";
const UNSELECTED_MARKER: &str = "  ";

/// Cells available for bars at the given total width
pub fn bar_columns(width: usize) -> usize {
    width
        .saturating_sub(LABEL_COLUMNS + SEPARATOR_COLUMNS + DURATION_COLUMNS)
        .max(MIN_BAR_COLUMNS)
}

/// Start cell and length of a bar. Always at least one cell, never past the end.
pub fn bar_cells(left: f64, width: f64, cols: usize) -> (usize, usize) {
    let cols = cols.max(1);
    let start = ((left / 100.0) * cols as f64).round().max(0.0) as usize;
    let start = start.min(cols - 1);
    let len = ((width / 100.0) * cols as f64).round().max(1.0) as usize;
    (start, len.min(cols - start))
}

/// Render header, axis and rows
pub fn render_waterfall(
    waterfall: &Waterfall<'_>,
    selected: Option<&str>,
    opts: &RenderConfig,
) -> String {
    let cols = bar_columns(opts.width);
    let mut out = render_header(waterfall, opts);

    if waterfall.is_empty() {
        out.push_str(&paint("  (no spans)", GRAY, opts.color));
        out.push('\n');
        return out;
    }

    out.push_str(&render_axis(waterfall, cols, opts));
    for row in &waterfall.rows {
        let is_selected = selected == Some(row.span().span_id.as_str());
        out.push_str(&render_row(row, is_selected, cols, opts));
        out.push('\n');
    }
    out
}

/// Trace title, status, duration, span count and LLM totals
pub fn render_header(waterfall: &Waterfall<'_>, opts: &RenderConfig) -> String {
    let trace = waterfall.trace;
    let title = if trace.name.trim().is_empty() {
        trace.trace_id.as_str()
    } else {
        trace.name.as_str()
    };

    let badge = StatusBadge::from_status(&waterfall.status);
    let status = format!("{} {}", badge.symbol(), waterfall.status);

    let mut out = format!(
        "{} {}\n",
        paint(title, BOLD, opts.color),
        paint(&format!("({})", trace.trace_id), GRAY, opts.color)
    );
    out.push_str(&format!(
        "Status: {}  Duration: {}  Spans: {}\n",
        paint(&status, badge.color().ansi(), opts.color),
        waterfall.duration_label,
        group_digits(trace.spans.len() as i64)
    ));

    let totals = &waterfall.totals;
    if totals.llm_calls > 0 {
        let mut line = format!(
            "LLM calls: {}  Tokens: {} (in {} / out {})",
            totals.llm_calls,
            group_digits(totals.total_tokens()),
            group_digits(totals.input_tokens),
            group_digits(totals.output_tokens)
        );
        if totals.cost_usd > 0.0 {
            line.push_str(&format!("  Cost: {}", format_usd(totals.cost_usd)));
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Axis labels over the bar column, followed by a tick rule
fn render_axis(waterfall: &Waterfall<'_>, cols: usize, opts: &RenderConfig) -> String {
    let mut labels = vec![' '; cols];
    let mut ticks = vec!['─'; cols];
    let mut next_free = 0usize;

    for (i, marker) in waterfall.axis.iter().enumerate() {
        let pos = ((marker.percent / 100.0) * cols as f64).round() as usize;
        let pos = pos.min(cols - 1);
        ticks[pos] = '┬';

        let text: Vec<char> = marker.label.chars().collect();
        // Last label ends at the right edge instead of starting there
        let start = if i + 1 == AXIS_MARKERS.len() {
            cols.saturating_sub(text.len())
        } else {
            pos
        };
        if start < next_free || start + text.len() > cols {
            continue;
        }
        labels[start..start + text.len()].copy_from_slice(&text);
        next_free = start + text.len() + 1;
    }

    let pad = " ".repeat(LABEL_COLUMNS + 1);
    let labels: String = labels.into_iter().collect();
    let ticks: String = ticks.into_iter().collect();
    format!(
        "{}{}\n{}{}\n",
        pad,
        paint(labels.trim_end(), GRAY, opts.color),
        pad,
        paint(&ticks, GRAY, opts.color)
    )
}

fn render_row(row: &WaterfallRow<'_>, selected: bool, cols: usize, opts: &RenderConfig) -> String {
    let span = row.span();
    let class = &row.classification;

    let marker = if selected {
        SELECTED_MARKER
    } else {
        UNSELECTED_MARKER
    };
    let indent = " ".repeat(row.depth().min(MAX_INDENT_DEPTH) * INDENT_WIDTH);
    let name = if span.name.trim().is_empty() {
        span.span_id.as_str()
    } else {
        span.name.as_str()
    };
    let label = fit(
        &format!(
            "{}{}{} {}",
            marker,
            indent,
            class.status.symbol(),
            truncate_preview(name, MAX_LABEL_NAME_CHARS)
        ),
        LABEL_COLUMNS,
    );
    let label = if class.status == StatusBadge::Failed {
        paint(&label, RED, opts.color)
    } else if selected {
        paint(&label, BOLD, opts.color)
    } else {
        label
    };

    let (start, len) = bar_cells(row.bar.left, row.bar.width, cols);
    let bar = format!(
        "{}{}{}",
        " ".repeat(start),
        paint(&BAR_CHAR.repeat(len), class.color.ansi(), opts.color),
        " ".repeat(cols - start - len)
    );

    format!(
        "{}│{}│ {:>width$}",
        label,
        bar,
        row.duration_label,
        width = DURATION_COLUMNS
    )
}

/// Pad or cut `text` to exactly `cols` characters
fn fit(text: &str, cols: usize) -> String {
    let count = text.chars().count();
    if count > cols {
        let mut cut: String = text.chars().take(cols.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        format!("{}{}", text, " ".repeat(cols - count))
    }
}

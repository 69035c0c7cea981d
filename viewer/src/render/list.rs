//! Trace list table

use crate::core::config::RenderConfig;
use crate::data::types::{ListTracesParams, Page, TraceSummary};
use crate::domain::traces::StatusBadge;
use crate::utils::string::{group_digits, truncate_preview};
use crate::utils::terminal::{BOLD, GRAY, paint};
use crate::utils::time::{format_time_label, format_timestamp};

const ID_COLUMNS: usize = 24;
const NAME_COLUMNS: usize = 32;

pub fn render_trace_list(
    page: &Page<TraceSummary>,
    params: &ListTracesParams,
    opts: &RenderConfig,
) -> String {
    if page.items.is_empty() {
        return format!("{}\n", paint("No traces found", GRAY, opts.color));
    }

    let mut out = paint(
        &format!(
            "  {:<id$} {:<name$} {:>6} {:>8}  {}",
            "TRACE",
            "NAME",
            "SPANS",
            "DURATION",
            "STARTED",
            id = ID_COLUMNS,
            name = NAME_COLUMNS
        ),
        BOLD,
        opts.color,
    );
    out.push('\n');

    for item in &page.items {
        let badge = StatusBadge::from_status(&item.status);
        out.push_str(&format!(
            "{} {:<id$} {:<name$} {:>6} {:>8}  {}\n",
            paint(badge.symbol(), badge.color().ansi(), opts.color),
            truncate_preview(&item.trace_id, ID_COLUMNS - 3),
            truncate_preview(&item.name, NAME_COLUMNS - 3),
            group_digits(item.span_count as i64),
            item.duration_ms
                .map(format_time_label)
                .unwrap_or_else(|| "-".to_string()),
            format_timestamp(item.started_at),
            id = ID_COLUMNS,
            name = NAME_COLUMNS
        ));
    }

    let (page_no, limit) = params.normalized();
    let pages = page.total.div_ceil(limit as u64).max(1);
    out.push_str(&paint(
        &format!(
            "Page {} of {} ({} traces)",
            page_no,
            pages,
            group_digits(page.total as i64)
        ),
        GRAY,
        opts.color,
    ));
    out.push('\n');
    out
}

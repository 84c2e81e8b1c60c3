use colored::*;
use std::cmp::Ordering;
use std::str::FromStr;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::ProcessRecord;

const NAME_WIDTH: usize = 24;
const PATH_WIDTH: usize = 48;

/// Column a process table is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Cpu,
    Memory,
    Pid,
    Name,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(SortKey::Cpu),
            "memory" | "mem" => Ok(SortKey::Memory),
            "pid" => Ok(SortKey::Pid),
            "name" => Ok(SortKey::Name),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

/// Sort descending by usage (ascending for pid/name), then keep `limit` rows.
pub fn sort_and_truncate(records: &[ProcessRecord], key: SortKey, limit: Option<usize>) -> Vec<ProcessRecord> {
    let mut rows = records.to_vec();
    rows.sort_by(|a, b| match key {
        SortKey::Cpu => b
            .cpu_percent
            .partial_cmp(&a.cpu_percent)
            .unwrap_or(Ordering::Equal)
            .then(a.pid.cmp(&b.pid)),
        SortKey::Memory => b
            .memory_percent
            .partial_cmp(&a.memory_percent)
            .unwrap_or(Ordering::Equal)
            .then(a.pid.cmp(&b.pid)),
        SortKey::Pid => a.pid.cmp(&b.pid),
        SortKey::Name => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then(a.pid.cmp(&b.pid)),
    });

    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}

/// Cut `text` to at most `width` terminal columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn pad_to_width(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(padding))
}

/// Format a percentage with one decimal
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn colorize_usage(text: String, value: f64) -> ColoredString {
    if value >= 50.0 {
        text.red().bold()
    } else if value >= 20.0 {
        text.yellow()
    } else {
        text.normal()
    }
}

/// Render a process table, header included.
pub fn format_process_table(records: &[ProcessRecord]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{}\n",
        format!(
            "{:>7}  {}  {:>4}  {:>7}  {:>7}  {}",
            "PID",
            pad_to_width("NAME", NAME_WIDTH),
            "PRI",
            "CPU",
            "MEM",
            "PATH"
        )
        .white()
        .bold()
    ));

    for record in records {
        let name = if record.name.is_empty() {
            pad_to_width("<unknown>", NAME_WIDTH).dimmed().to_string()
        } else {
            pad_to_width(&truncate_to_width(&record.name, NAME_WIDTH), NAME_WIDTH)
        };

        out.push_str(&format!(
            "{:>7}  {}  {:>4}  {}  {}  {}\n",
            record.pid.to_string().cyan(),
            name,
            record.priority,
            colorize_usage(format!("{:>7}", format_percent(record.cpu_percent)), record.cpu_percent),
            colorize_usage(
                format!("{:>7}", format_percent(record.memory_percent)),
                record.memory_percent
            ),
            truncate_to_width(&record.path, PATH_WIDTH).dimmed()
        ));
    }

    out
}

/// Render every field of one process, the path in full.
pub fn format_process_details(record: &ProcessRecord) -> String {
    let name = if record.name.is_empty() {
        "<unknown>".dimmed().to_string()
    } else {
        record.name.white().bold().to_string()
    };
    let path = if record.path.is_empty() {
        "<unavailable>".dimmed().to_string()
    } else {
        record.path.clone()
    };

    let mut out = String::new();
    out.push_str(&format!("  {:<10} {}\n", "PID:", record.pid.to_string().cyan()));
    out.push_str(&format!("  {:<10} {}\n", "Name:", name));
    out.push_str(&format!("  {:<10} {}\n", "Priority:", record.priority));
    out.push_str(&format!(
        "  {:<10} {}\n",
        "CPU:",
        colorize_usage(format_percent(record.cpu_percent), record.cpu_percent)
    ));
    out.push_str(&format!(
        "  {:<10} {}\n",
        "Memory:",
        colorize_usage(format_percent(record.memory_percent), record.memory_percent)
    ));
    out.push_str(&format!("  {:<10} {}\n", "Path:", path));
    out
}

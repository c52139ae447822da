use crate::client::Region;
use console::{Style, Term};
use once_cell::sync::Lazy;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

static HEADER: Lazy<Style> = Lazy::new(|| Style::new().bold());
static KEY: Lazy<Style> = Lazy::new(|| Style::new().cyan());

const COLUMN_GAP: usize = 2;

pub(super) fn use_color() -> bool {
    Term::stdout().features().colors_supported()
}

fn paint(style: &Style, text: &str, use_color: bool) -> String {
    if use_color {
        style.clone().force_styling(true).apply_to(text).to_string()
    } else {
        text.to_string()
    }
}

pub(super) fn json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}

/// A left-aligned table; the header row is bold when colored.
pub(super) fn table(headers: &[&str], rows: &[Vec<String>], use_color: bool) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let line = |cells: Vec<String>, raw: Vec<&str>| -> String {
        let last = cells.len().saturating_sub(1);
        let mut out = String::new();
        for (i, (cell, text)) in cells.iter().zip(raw).enumerate() {
            out.push_str(cell);
            if i < last {
                out.push_str(&" ".repeat(widths[i] - text.width() + COLUMN_GAP));
            }
        }
        out.push('\n');
        out
    };

    let mut out = line(
        headers.iter().map(|h| paint(&HEADER, h, use_color)).collect(),
        headers.to_vec(),
    );
    for row in rows {
        out.push_str(&line(row.clone(), row.iter().map(String::as_str).collect()));
    }
    out
}

pub(super) fn region_table(regions: &[Region], use_color: bool) -> String {
    let rows: Vec<Vec<String>> = regions
        .iter()
        .map(|r| vec![r.id.clone(), r.endpoint_type.clone()])
        .collect();
    table(&["ID", "ENDPOINT TYPE"], &rows, use_color)
}

/// `key: value` lines with the values aligned.
pub(super) fn key_values(pairs: &[(&str, String)], use_color: bool) -> String {
    let width = pairs.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}:{}{}\n",
                paint(&KEY, key, use_color),
                " ".repeat(width - key.width() + 1),
                value
            )
        })
        .collect()
}

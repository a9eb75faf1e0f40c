use colored::Colorize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::ReportContext;
use crate::media::{ContentType, ScoredItem};
use crate::pipeline::Filters;
use crate::size::format_size;
use crate::sources::SourceKind;

const HEADERS: [&str; 6] = ["Title", "Type", "Year", "Rating", "Size", "Waste Score"];

/// Columns printed right-aligned
const NUMERIC: [bool; 6] = [false, false, true, true, true, true];

const SEPARATOR: &str = "  ";

/// Titles never shrink below this, even if the row then overflows
const MIN_TITLE_WIDTH: usize = 10;

/// Terminal columns occupied by `s` (wide CJK characters count as two)
fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to at most `max_width` terminal columns, ending in "…"
/// if truncated. Never splits a character.
fn truncate_str(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }

    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut truncated = String::new();
    for c in s.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        truncated.push(c);
    }
    format!("{}…", truncated)
}

fn pad(s: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(display_width(s)));
    if right_align {
        format!("{}{}", fill, s)
    } else {
        format!("{}{}", s, fill)
    }
}

fn format_rating(rating: Option<f64>) -> String {
    rating
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| "N/A".to_string())
}

fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

fn colorize_score(cell: String, score: f64) -> String {
    if score >= 40.0 {
        cell.red().bold().to_string()
    } else if score >= 20.0 {
        cell.yellow().to_string()
    } else {
        cell.green().to_string()
    }
}

fn item_row(scored: &ScoredItem) -> [String; 6] {
    let item = &scored.item;
    [
        item.title.clone(),
        item.content_type.label().to_string(),
        item.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
        format_rating(item.rating),
        format_size(item.size_on_disk),
        format_score(scored.waste_score),
    ]
}

fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Most frequent rating at one-decimal precision; ties go to the first seen
fn mode(ratings: &[f64]) -> f64 {
    let mut counts: Vec<(i64, usize)> = Vec::new();
    for rating in ratings {
        let key = (rating * 10.0).round() as i64;
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }

    let mut best = counts[0];
    for entry in &counts[1..] {
        if entry.1 > best.1 {
            best = *entry;
        }
    }
    best.0 as f64 / 10.0
}

/// "mean (mode/median)" over rated items, or N/A
fn rating_summary(items: &[ScoredItem]) -> String {
    let mut ratings: Vec<f64> = items.iter().filter_map(|s| s.item.rating).collect();
    if ratings.is_empty() {
        return "N/A".to_string();
    }

    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    let mode = mode(&ratings);
    ratings.sort_by(f64::total_cmp);
    let median = median(&ratings);

    format!("{:.1} ({:.1}/{:.1})", mean, mode, median)
}

fn totals_row(items: &[ScoredItem]) -> [String; 6] {
    let total_size = items
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.item.size_on_disk));
    let mean_score = items.iter().map(|s| s.waste_score).sum::<f64>() / items.len() as f64;

    let mut types: Vec<ContentType> = items.iter().map(|s| s.item.content_type).collect();
    types.sort_by_key(|t| t.label());
    types.dedup();
    let type_count = types.len();

    [
        format!("Total ({})", items.len()),
        format!("{} type{}", type_count, if type_count == 1 { "" } else { "s" }),
        String::new(),
        rating_summary(items),
        format_size(total_size),
        format_score(mean_score),
    ]
}

/// Render ranked items as an aligned table that fits in `width` columns.
///
/// Widths are measured in terminal columns, so wide characters in titles
/// keep the columns aligned. Only the title column shrinks; it is cut with
/// "…" rather than wrapped.
/// Numeric columns are never truncated, so on very narrow terminals the
/// title stops at its minimum width and rows overflow.
pub fn render_table(items: &[ScoredItem], width: usize) -> String {
    let mut rows: Vec<[String; 6]> = items.iter().map(item_row).collect();
    if !items.is_empty() {
        rows.push(totals_row(items));
    }

    let mut widths: [usize; 6] = HEADERS.map(display_width);
    for row in &rows {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(display_width(cell));
        }
    }

    let fixed: usize = widths[1..].iter().sum::<usize>() + SEPARATOR.len() * (HEADERS.len() - 1);
    let title_budget = width.saturating_sub(fixed).max(MIN_TITLE_WIDTH);
    widths[0] = widths[0].min(title_budget);
    let line_width = widths[0] + fixed;

    let render_row = |cells: &[String; 6], is_header: bool, score: Option<f64>| {
        let rendered: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                let text = if col == 0 {
                    truncate_str(cell, widths[0])
                } else {
                    cell.clone()
                };
                let padded = pad(&text, widths[col], NUMERIC[col]);
                match (col, score) {
                    _ if is_header => padded.bold().to_string(),
                    (5, Some(score)) => colorize_score(padded, score),
                    _ => padded,
                }
            })
            .collect();
        rendered.join(SEPARATOR).trim_end().to_string()
    };

    let mut output = String::new();
    output.push_str(&render_row(&HEADERS.map(String::from), true, None));
    output.push('\n');
    output.push_str(&"─".repeat(line_width).dimmed().to_string());
    output.push('\n');

    let (item_rows, total) = rows.split_at(items.len());
    for (row, scored) in item_rows.iter().zip(items) {
        output.push_str(&render_row(row, false, Some(scored.waste_score)));
        output.push('\n');
    }

    if let Some(total) = total.first() {
        output.push_str(&"─".repeat(line_width).dimmed().to_string());
        output.push('\n');
        output.push_str(&render_row(total, false, None).bold().to_string());
        output.push('\n');
    }

    output
}

/// Describe active filters, e.g. "Items with Highest Waste Scores (Rating <= 5, Top 10)"
pub fn heading(sources: &[SourceKind], filters: &Filters) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(score) = filters.min_waste_score {
        parts.push(format!("Waste Score >= {}", score));
    }
    if let Some(size) = filters.min_size {
        parts.push(format!("Size >= {}", format_size(size)));
    }
    if let Some(rating) = filters.max_rating {
        parts.push(format!("Rating <= {}", rating));
    }
    if let Some(top) = filters.top {
        parts.push(format!("Top {}", top));
    }
    if !filters.downloaded_only {
        parts.push("Including Not Downloaded".to_string());
    }

    if parts.is_empty() {
        return None;
    }

    let subject = match sources {
        [SourceKind::Sonarr] => "Series",
        [SourceKind::Radarr] => "Movies",
        _ => "Items",
    };

    Some(format!(
        "{} with Highest Waste Scores ({})",
        subject,
        parts.join(", ")
    ))
}

fn footer(items: &[ScoredItem], sources: &[SourceKind]) -> String {
    match sources {
        [SourceKind::Sonarr] => format!("Total series shown: {}", items.len()),
        [SourceKind::Radarr] => format!("Total movies shown: {}", items.len()),
        _ => {
            let series = items
                .iter()
                .filter(|s| s.item.content_type == ContentType::Series)
                .count();
            format!(
                "Total items: {} ({} series, {} movies)",
                items.len(),
                series,
                items.len() - series
            )
        }
    }
}

/// Format the full report: heading, table and footer
pub fn format_report(items: &[ScoredItem], context: &ReportContext<'_>) -> String {
    let mut output = String::new();

    if let Some(heading) = heading(context.sources, context.filters) {
        output.push_str(&format!("{}\n", heading.bold()));
        output.push_str(&"=".repeat(display_width(&heading).min(context.width)));
        output.push('\n');
    }

    if items.is_empty() {
        output.push_str("No items matched the current filters.");
        return output;
    }

    output.push_str(&render_table(items, context.width));
    output.push('\n');
    output.push_str(&footer(items, context.sources));

    output
}

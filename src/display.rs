// src/display.rs
//! Plain-text rendering of the analysis list for the terminal.

use std::fmt::Write;

use crate::pipeline::{CollectionStats, Facets, FilterCategory, PageResult, PageToken};
use crate::types::{AnalysisRecord, AnalysisResult, StatsResponse, UserProfile};
use crate::utils::{format_date, truncate_text};

const SKILL_PREVIEW: usize = 3;
const SUMMARY_PREVIEW_CHARS: usize = 120;

/// "Showing 1-6 of 14 analyses", or the matching empty-state text.
pub fn results_line(view: &PageResult) -> String {
    if view.total_records() == 0 {
        return "No analyses yet. Start by analyzing your first job description!".to_string();
    }
    if view.filtered_count == 0 {
        return "No results found".to_string();
    }

    let mut line = format!(
        "Showing {}-{} of {} analyses",
        view.start, view.end, view.filtered_count
    );
    if view.query.has_active_filters() {
        let _ = write!(line, " (filtered from {} total)", view.total_records());
    }
    line
}

/// Compact page strip; `None` when there is a single page or none.
pub fn page_strip(view: &PageResult) -> Option<String> {
    if !view.show_pagination() {
        return None;
    }

    let pages: Vec<String> = view
        .window
        .iter()
        .map(|token| match token {
            PageToken::Page(page) if *page == view.query.page => format!("[{page}]"),
            other => other.to_string(),
        })
        .collect();

    let previous = if view.has_previous() { "‹ Previous" } else { "  " };
    let next = if view.has_next() { "Next ›" } else { "" };

    Some(format!(
        "{}  {}  {}\nShowing {} to {} of {} results",
        previous,
        pages.join(" "),
        next,
        view.start,
        view.end,
        view.filtered_count
    ))
}

/// Filter choices that would select something.
pub fn filter_menu(facets: &Facets, total: usize) -> String {
    let mut menu = format!("{} ({})", FilterCategory::All.label(), total);

    let mut group = |title: &str, categories: &[FilterCategory]| {
        if categories.is_empty() {
            return;
        }
        let entries: Vec<String> = categories
            .iter()
            .map(|category| format!("{} [{}]", category.label(), category.key()))
            .collect();
        let _ = write!(menu, "\n  {}: {}", title, entries.join(", "));
    };
    group("Role Types", &facets.roles);
    group("Experience Levels", &facets.experiences);

    menu
}

pub fn stats_block(
    stats: &CollectionStats,
    remote: Option<&StatsResponse>,
    filtered: usize,
    filters_active: bool,
) -> String {
    let shown = remote.map(CollectionStats::from).unwrap_or(*stats);
    let CollectionStats {
        total,
        distinct_role_types: roles,
        distinct_experience_levels: levels,
    } = shown;
    let scope = if filters_active {
        "Filtered Results"
    } else {
        "All Results"
    };

    format!(
        "Total Analyses: {total}  |  Role Types: {roles}  |  Experience Levels: {levels}  |  {scope}: {filtered}"
    )
}

pub fn render_card(record: &AnalysisRecord) -> String {
    let result = &record.result;
    let mut card = format!(
        "● {} · {}\n  {}  (id: {})",
        or_placeholder(&result.role_type),
        or_placeholder(&result.experience_level),
        record
            .created_at
            .as_ref()
            .map(format_date)
            .unwrap_or_else(|| "Unknown date".to_string()),
        record.id
    );

    let (shown, hidden) = record.skills_preview(SKILL_PREVIEW);
    if !shown.is_empty() {
        let _ = write!(card, "\n  Skills: {}", shown.join(", "));
        if hidden > 0 {
            let _ = write!(card, " +{hidden} more");
        }
    }
    if !result.summary.is_empty() {
        let _ = write!(
            card,
            "\n  {}",
            truncate_text(&result.summary, SUMMARY_PREVIEW_CHARS)
        );
    }
    card
}

/// The full list screen.
pub fn render_list(view: &PageResult, remote: Option<&StatsResponse>) -> String {
    let mut out = String::new();
    let filters_active = view.query.has_active_filters();

    let _ = writeln!(
        out,
        "{}",
        stats_block(&view.stats, remote, view.filtered_count, filters_active)
    );
    let _ = writeln!(
        out,
        "Filter: {}  |  Sort: {}",
        view.query.filter.label(),
        view.query.sort.label()
    );
    let _ = writeln!(out, "{}", results_line(view));

    if view.total_records() > 0 && view.filtered_count == 0 {
        let _ = writeln!(
            out,
            "No analyses match your filter. Try another filter or clear all filters."
        );
    }

    for record in &view.items {
        let _ = writeln!(out, "\n{}", render_card(record));
    }

    if let Some(strip) = page_strip(view) {
        let _ = writeln!(out, "\n{strip}");
    }

    if view.total_records() > 0 {
        let _ = writeln!(
            out,
            "\nAvailable filters: {}",
            filter_menu(&view.facets, view.total_records())
        );
    }

    out
}

/// Freshly returned analysis from `analyze`.
pub fn render_result(result: &AnalysisResult) -> String {
    let mut out = format!(
        "Role Type: {}\nExperience Level: {}",
        or_placeholder(&result.role_type),
        or_placeholder(&result.experience_level)
    );
    let _ = write!(out, "\nSkills ({}):", result.skills.len());
    for skill in &result.skills {
        let _ = write!(out, "\n  - {skill}");
    }
    if !result.summary.is_empty() {
        let _ = write!(out, "\nSummary:\n{}", result.summary);
    }
    out
}

pub fn render_profile(profile: &UserProfile) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "N/A".to_string());
    format!(
        "Name: {}\nUsername: {}\nEmail: {}\nRole: {}",
        field(&profile.name),
        field(&profile.username),
        field(&profile.email),
        field(&profile.role)
    )
}

fn or_placeholder(value: &str) -> &str {
    if value.trim().is_empty() {
        "Unknown"
    } else {
        value
    }
}

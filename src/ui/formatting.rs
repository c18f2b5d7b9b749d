use colored::Colorize;
use sheetdex_core::*;
use std::fmt::Write;

use crate::state::AppState;

/// One line per category: entity count plus the behaviors that apply
pub fn format_categories(state: &AppState) -> String {
    let mut out = String::new();
    let Some(dataset) = &state.dataset else {
        return out;
    };

    for name in dataset.categories() {
        let Some(derived) = derive_entities(dataset, name, &state.table) else {
            continue;
        };

        let mut traits = Vec::new();
        if let Some(field) = &derived.behavior.group_field {
            traits.push(format!("grouped by {}", field));
        }
        if derived.behavior.compound_header {
            traits.push("compound header".to_string());
        }
        if derived.dropped_leading > 0 {
            traits.push(format!("{} leading rows dropped", derived.dropped_leading));
        }

        let _ = write!(out, "{}  {} entities", name.bold(), derived.entities.len());
        if !traits.is_empty() {
            let _ = write!(out, "  {}", format!("({})", traits.join(", ")).dimmed());
        }
        out.push('\n');
    }
    out
}

/// Group tabs with counts; the selected tab is highlighted
pub fn format_group_tabs(groups: &[GroupSummary], selection: &GroupSelection) -> String {
    groups
        .iter()
        .map(|group| {
            let label = match group.kind {
                GroupKind::All => group.label.to_uppercase(),
                _ => group.label.clone(),
            };
            let tab = format!("{} ({})", label, group.count);

            let selected = match selection {
                GroupSelection::All => group.kind == GroupKind::All,
                GroupSelection::Named(name) => group.kind != GroupKind::All && &group.label == name,
                GroupSelection::NotApplicable => false,
            };
            if selected {
                tab.reversed().to_string()
            } else if group.count == 0 {
                tab.dimmed().to_string()
            } else {
                tab
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn kind_label(kind: HighlightKind) -> &'static str {
    match kind {
        HighlightKind::Classification => "Class",
        HighlightKind::Effect => "Effect",
        HighlightKind::Importance => "Importance",
    }
}

fn format_record(record: &Record, indent: &str, out: &mut String) {
    for (label, value) in record.iter() {
        if value.is_blank() {
            continue;
        }
        let _ = writeln!(out, "{}{}: {}", indent, label.dimmed(), value.display());
    }
}

/// Render one entity card
pub fn format_entity(entity: &EntityView<'_>) -> String {
    let mut out = String::new();

    let name = match entity.tier {
        TierClass::Top => entity.name.yellow().bold(),
        TierClass::Mid => entity.name.magenta().bold(),
        TierClass::Base => entity.name.bold(),
    };
    let _ = writeln!(out, "{} [{}]", name, entity.rarity);

    for highlight in &entity.highlights {
        let _ = writeln!(out, "  • {}: {}", kind_label(highlight.kind), highlight.value.cyan());
    }

    format_record(entity.fields, "    ", &mut out);

    if !entity.continuation.is_empty() {
        let _ = writeln!(out, "  {}", "extended data".italic());
        for (i, record) in entity.continuation.iter().enumerate() {
            let _ = writeln!(out, "    #{}", i + 1);
            format_record(record, "      ", &mut out);
        }
    }
    out
}

/// Render a full category view
pub fn format_view(view: &CategoryView<'_>) -> String {
    let mut out = String::new();

    if let Some(groups) = &view.groups {
        let _ = writeln!(out, "{}", format_group_tabs(groups, &view.selection));
    }
    if !view.query.is_empty() {
        let _ = writeln!(
            out,
            "{} {} of {} match \"{}\"",
            "→".yellow(),
            view.matched,
            view.total,
            view.query
        );
    }
    out.push('\n');

    match &view.state {
        ViewState::CategoryEmpty => {
            let _ = writeln!(out, "{}", "This category has no entries.".dimmed());
        }
        ViewState::NoMatches => {
            let _ = writeln!(out, "{}", "No entries match the current search and group.".dimmed());
        }
        ViewState::Entities(entities) => {
            for entity in entities {
                out.push_str(&format_entity(entity));
                out.push('\n');
            }
        }
    }
    out
}

use colored::Colorize;

use crate::{
    expansion::ExpansionState,
    group::{AssetClass, Grouping},
    tui::view::{table_lines, Column, TableLine},
};

/// Expansion state for a one-shot report: each named label is toggled once,
/// and the bucket of holdings without an asset class only when asked for.
pub fn expansion_for(labels: &[String], unclassified: bool) -> ExpansionState {
    let mut expansion = ExpansionState::new();
    for label in labels {
        expansion.toggle(&AssetClass::from(label.as_str()));
    }
    if unclassified {
        expansion.toggle(&AssetClass::Unclassified);
    }
    expansion
}

/// Plain-text rendition of the holdings table, for non-interactive output.
pub fn render_report(grouping: &Grouping, expansion: &ExpansionState) -> String {
    let columns = Column::all();
    let lines = table_lines(grouping, expansion);

    let widths: Vec<usize> = columns
        .iter()
        .map(|column| {
            lines
                .iter()
                .filter_map(|line| match line {
                    TableLine::Detail { holding, .. } => Some(column.value(holding).chars().count()),
                    _ => None,
                })
                .chain(std::iter::once(column.to_string().chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = vec![];
    let header = columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:<width$}", column.to_string(), width = *width))
        .collect::<Vec<String>>()
        .join("  ");
    out.push(header.trim_end().yellow().bold().to_string());

    for line in &lines {
        match line {
            TableLine::Header {
                label,
                expanded,
                count,
            } => {
                let marker = if *expanded { "▾" } else { "▸" };
                out.push(
                    format!("{} {} ({})", marker, label, count)
                        .blue()
                        .bold()
                        .to_string(),
                );
            }
            TableLine::Detail { holding, .. } => {
                let row = columns
                    .iter()
                    .zip(&widths)
                    .map(|(column, width)| {
                        format!("{:<width$}", column.value(holding), width = *width)
                    })
                    .collect::<Vec<String>>()
                    .join("  ");
                out.push(row.trim_end().to_string());
            }
        }
    }

    out.join("\n")
}

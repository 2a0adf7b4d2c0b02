use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use arcmap_map::{MatchSummary, StrategyKind};
use arcmap_model::{CandidateMatch, ResponseMatch};

/// Prints per-variable candidate counts and the unmatched variables.
///
/// Goes to stderr when the table itself was written to stdout.
pub fn print_match_summary(
    strategy: StrategyKind,
    summary: &MatchSummary,
    rows: &[CandidateMatch],
    to_stderr: bool,
) {
    let mut table = new_table(
        &[
            "Strategy",
            "Variables",
            "Matched",
            "Unmatched",
            "Candidates",
            "Top picks",
        ],
        true,
    );
    for column in table.column_iter_mut().skip(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    let best = rows.iter().filter(|row| row.rank == 0).count();
    table.add_row(vec![
        Cell::new(strategy.as_str())
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.source_variables),
        count_cell(summary.matched_variables, Color::Green),
        count_cell(summary.unmatched_variables.len(), Color::Yellow),
        Cell::new(summary.candidates),
        Cell::new(best),
    ]);
    emit(&table.to_string(), to_stderr);

    if !summary.unmatched_variables.is_empty() {
        emit(
            &format!("Unmatched: {}", summary.unmatched_variables.join(", ")),
            to_stderr,
        );
    }
}

pub fn print_response_summary(rows: &[ResponseMatch], to_stderr: bool) {
    let expanded = rows.iter().filter(|row| row.raw_response.is_some()).count();
    let mut table = new_table(&["Rows", "Response pairs", "Passed through"], false);
    table.add_row(vec![
        Cell::new(rows.len()),
        count_cell(expanded, Color::Green),
        dim_cell(rows.len() - expanded),
    ]);
    emit(&table.to_string(), to_stderr);
}

pub fn print_strategies() {
    let mut table = new_table(&["Strategy", "Description"], false);
    for kind in StrategyKind::ALL {
        let description = if kind.uses_embeddings() {
            Cell::new(format!("{} (embedding model)", kind.description()))
        } else {
            Cell::new(kind.description())
        };
        table.add_row(vec![
            Cell::new(kind.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            description,
        ]);
    }
    println!("{table}");
}

fn emit(text: &str, to_stderr: bool) {
    if to_stderr {
        eprintln!("{text}");
    } else {
        println!("{text}");
    }
}

/// Rounded table with cyan headers. `bordered` adds inner row borders.
fn new_table(headers: &[&str], bordered: bool) -> Table {
    let mut table = Table::new();
    table.load_preset(if bordered {
        UTF8_FULL
    } else {
        UTF8_FULL_CONDENSED
    });
    table.apply_modifier(UTF8_ROUND_CORNERS);
    if bordered {
        table.apply_modifier(UTF8_SOLID_INNER_BORDERS);
    }
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120)
        .set_header(headers.iter().map(|label| header_cell(label)));
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

//! Terminal rendering of a check outcome.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use mcc_engine::CheckResult;

use crate::pipeline::CheckOutcome;

pub fn print_summary(outcome: &CheckOutcome) {
    print!("{}", render_summary(outcome, true));
}

/// Header lines, the per-suite table and the failing results.
///
/// Without `styled` the tables never carry ANSI escapes.
pub fn render_summary(outcome: &CheckOutcome, styled: bool) -> String {
    let mut out = format!("File: {}\n", outcome.file);
    if let Some(model) = &outcome.data_model {
        out.push_str(&format!("Data model: {model}\n"));
    }

    let mut summary = summary_table(outcome);
    if !styled {
        summary.force_no_tty();
    }
    out.push_str(&format!("{summary}\n"));

    if let Some(mut failures) = failures_table(outcome) {
        if !styled {
            failures.force_no_tty();
        }
        out.push_str(&format!("\nFailed checks:\n{failures}\n"));
    }
    out
}

/// One row per suite plus a total row.
pub fn summary_table(outcome: &CheckOutcome) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Suite"),
        header_cell("Name"),
        header_cell("Version"),
        header_cell("Passed"),
        header_cell("Total"),
        header_cell("Failed"),
        header_cell("Score"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 3..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    for report in &outcome.results {
        table.add_row(vec![
            Cell::new(report.attributes.short_name().unwrap_or("-")).add_attribute(Attribute::Bold),
            Cell::new(report.name.as_deref().unwrap_or("-")),
            Cell::new(report.attributes.version().unwrap_or("-")),
            Cell::new(report.passed),
            Cell::new(report.total),
            count_cell(report.failed(), Color::Red),
            score_cell(report.passed, report.total),
        ]);
    }

    let (passed, total) = (outcome.passed(), outcome.total());
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(passed).add_attribute(Attribute::Bold),
        Cell::new(total).add_attribute(Attribute::Bold),
        count_cell(total - passed, Color::Red).add_attribute(Attribute::Bold),
        score_cell(passed, total).add_attribute(Attribute::Bold),
    ]);
    table
}

/// Every failing result, or `None` when everything passed.
pub fn failures_table(outcome: &CheckOutcome) -> Option<Table> {
    let failures = outcome.failures();
    if failures.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Suite"),
        header_cell("Priority"),
        header_cell("Rule"),
        header_cell("Result"),
    ]);
    apply_failure_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);

    for (suite, result) in failures {
        table.add_row(vec![
            Cell::new(suite),
            priority_cell(result),
            Cell::new(rule_label(result)),
            Cell::new(result.to_string()),
        ]);
    }
    Some(table)
}

fn rule_label(result: &CheckResult) -> String {
    match result.variable() {
        Some(variable) => format!("{variable}:{}", result.name()),
        None => result.name().to_string(),
    }
}

fn priority_cell(result: &CheckResult) -> Cell {
    match result.attributes().priority() {
        Some("required") => Cell::new("required")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Some(priority) => Cell::new(priority).fg(Color::Yellow),
        None => dim_cell("-"),
    }
}

fn score_cell(passed: usize, total: usize) -> Cell {
    if total == 0 {
        return dim_cell("-");
    }
    let percent = passed as f64 * 100.0 / total as f64;
    let color = if passed == total {
        Color::Green
    } else if percent >= 50.0 {
        Color::Yellow
    } else {
        Color::Red
    };
    Cell::new(format!("{percent:.1}%")).fg(color)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_failure_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 4 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(8)),
            ColumnConstraint::UpperBoundary(Width::Fixed(12)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::LowerBoundary(Width::Fixed(20)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

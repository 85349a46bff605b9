use anyhow::Result;
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use designer_model::{Domain, Field, FieldError, LockState, PropertyType, Severity};
use designer_wire::serialize_domain;

use crate::commands::CommandOutcome;
use crate::settings::DesignerSettings;

pub fn print_outcome(outcome: &CommandOutcome, settings: &DesignerSettings) -> Result<()> {
    match outcome {
        CommandOutcome::Inspected(domain) => {
            print_domain_header(domain, settings);
            print_field_table(domain);
        }
        CommandOutcome::Validated(domain) => {
            print_domain_header(domain, settings);
            print_issue_table(domain);
            print_counts(domain);
        }
        CommandOutcome::Types {
            domain,
            field,
            types,
        } => {
            if let Some(field) = domain.fields.get(*field) {
                print_types_table(field, types);
            }
        }
        CommandOutcome::Edited(domain) => {
            let payload = serialize_domain(domain)?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        CommandOutcome::Attributed(domains) => {
            for domain in domains.iter().filter(|domain| domain.has_exception()) {
                print_domain_header(domain, settings);
                print_issue_table(domain);
                print_counts(domain);
            }
        }
    }
    Ok(())
}

fn print_domain_header(domain: &Domain, settings: &DesignerSettings) {
    println!("Domain: {}", display_name(&domain.name));
    if let Some(container) = &domain.container {
        let shared = settings
            .current_container
            .as_deref()
            .is_some_and(|current| domain.is_shared(current));
        if shared {
            println!("Container: {container} (shared, read-only)");
        } else {
            println!("Container: {container}");
        }
    }
    if let Some(exception) = &domain.exception {
        if let Some(name) = &exception.domain_name {
            println!("Reported for: {name}");
        }
        println!("{}: {}", exception.severity, exception.exception);
    }
}

fn print_field_table(domain: &Domain) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Name"),
        header_cell("Type"),
        header_cell("Lock"),
        header_cell("Required"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for (row, field) in domain.fields.iter().enumerate() {
        table.add_row(vec![
            dim_cell(row),
            Cell::new(display_name(&field.name)),
            type_cell(field),
            lock_cell(field.lock_type),
            if field.required {
                Cell::new("yes")
            } else {
                dim_cell("-")
            },
            status_cell(field),
        ]);
    }
    println!("{table}");
}

fn print_issue_table(domain: &Domain) {
    let Some(exception) = &domain.exception else {
        println!("No issues.");
        return;
    };
    let mut errors: Vec<&FieldError> = exception.errors.iter().collect();
    errors.sort_by_key(|error| (severity_rank(error.severity), error.row_indexes.first().copied()));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Rows"),
        header_cell("Field"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    for error in errors {
        let rows = if error.row_indexes.is_empty() {
            "-".to_string()
        } else {
            error
                .row_indexes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let field = error
            .field_name
            .clone()
            .or_else(|| {
                error
                    .row_indexes
                    .first()
                    .and_then(|row| domain.fields.get(*row))
                    .map(|field| display_name(&field.name).to_string())
            })
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            severity_cell(error.severity),
            Cell::new(rows),
            Cell::new(field),
            Cell::new(&error.message),
        ]);
    }
    println!("{table}");
}

fn print_counts(domain: &Domain) {
    println!(
        "{} error(s), {} warning(s)",
        domain.error_count(),
        domain.warning_count()
    );
}

fn print_types_table(field: &Field, types: &[PropertyType]) {
    println!(
        "Field: {} ({})",
        display_name(&field.name),
        field.data_type.display()
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Type"),
        header_cell("Display"),
        header_cell("Current"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for ty in types {
        let current = if *ty == field.data_type {
            Cell::new("*").fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            dim_cell("")
        };
        let name = if ty.is_creatable() {
            Cell::new(ty.name())
        } else {
            dim_cell(ty.name())
        };
        table.add_row(vec![name, Cell::new(ty.display()), current]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { "(unnamed)" } else { name }
}

fn type_cell(field: &Field) -> Cell {
    let cell = Cell::new(field.data_type.display());
    if field.data_type.is_creatable() {
        cell
    } else {
        cell.fg(Color::DarkGrey)
    }
}

fn lock_cell(lock: LockState) -> Cell {
    match lock {
        LockState::NotLocked => dim_cell("-"),
        LockState::PartiallyLocked => Cell::new("partial").fg(Color::Yellow),
        LockState::FullyLocked => Cell::new("full").fg(Color::Red),
        LockState::PrimaryKeyLocked => Cell::new("primary key").fg(Color::Red),
    }
}

fn status_cell(field: &Field) -> Cell {
    let error = field.errors();
    if !error.is_none() {
        return Cell::new(error.message()).fg(Color::Red);
    }
    match field.name_warning() {
        Some(_) => Cell::new("awkward name").fg(Color::Yellow),
        None => Cell::new("ok").fg(Color::Green),
    }
}

fn severity_cell(severity: Severity) -> Cell {
    let color = match severity {
        Severity::Error => Color::Red,
        Severity::Warn => Color::Yellow,
    };
    Cell::new(severity.label())
        .fg(color)
        .add_attribute(Attribute::Bold)
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 0,
        Severity::Warn => 1,
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

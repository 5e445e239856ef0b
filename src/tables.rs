use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{api::jullix::Reading, entity::EntityState};

#[must_use]
pub fn build_entities_table(states: &[EntityState]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["Device", "Entity", "Kind", "Name", "Value", "Unit", "Available"]);
    for state in states {
        let value_cell = match &state.value {
            Some(Reading::Flag(true)) => Cell::new("on").fg(Color::Green),
            Some(Reading::Flag(false)) => Cell::new("off").fg(Color::DarkYellow),
            Some(reading @ Reading::Number(_)) => {
                Cell::new(reading).set_alignment(CellAlignment::Right)
            }
            Some(reading @ Reading::Text(_)) => Cell::new(reading),
            None => Cell::new("unknown").add_attribute(Attribute::Dim),
        };
        table.add_row(vec![
            Cell::new(&state.device).add_attribute(Attribute::Dim),
            Cell::new(&state.unique_id),
            Cell::new(state.kind).add_attribute(Attribute::Dim),
            Cell::new(state.name),
            value_cell,
            Cell::new(state.unit.map(|unit| unit.to_string()).unwrap_or_default()),
            if state.available {
                Cell::new("yes").fg(Color::Green)
            } else {
                Cell::new("no").fg(Color::Red)
            },
        ]);
    }
    table
}

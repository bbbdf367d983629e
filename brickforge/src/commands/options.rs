// brickforge/src/commands/options.rs
//
// USE CASE: Print the option catalogue.

use comfy_table::{Table, presets::UTF8_FULL};

use brickforge_core::domain::project::OPTION_CATALOG;

pub fn execute() -> anyhow::Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Option", "Values", "Default", "Description"]);

    for option in OPTION_CATALOG {
        let values = if option.values.is_empty() {
            "any".to_string()
        } else {
            option.values.join(" | ")
        };
        table.add_row(vec![
            option.key.to_string(),
            values,
            option.default.to_string(),
            option.description.to_string(),
        ]);
    }

    println!("{table}");
    Ok(())
}

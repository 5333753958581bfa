use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use cw_core::{Archetype, Catalog};

pub fn run(query: Option<&str>) -> Result<(), String> {
    let catalog = Catalog::major_arcana();

    if let Some(query) = query {
        let card = catalog.lookup(query).map_err(|e| e.to_string())?;
        print_card(card);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "中文", "Theme", "Upright", "Reversed"]);

    for card in catalog.as_slice() {
        table.add_row(vec![
            card.id.to_string(),
            card.name.clone(),
            card.name_localized.clone(),
            card.theme.clone(),
            card.meaning_upright.clone(),
            card.meaning_reversed.clone(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} cards", catalog.len());
    Ok(())
}

fn print_card(card: &Archetype) {
    println!(
        "  {}. {} ({})",
        card.id,
        card.name.bold(),
        card.name_localized
    );
    println!("  Theme: {}", card.theme);
    println!("  {} {}", "Upright:".green(), card.meaning_upright);
    println!("  {} {}", "Reversed:".red(), card.meaning_reversed);
}

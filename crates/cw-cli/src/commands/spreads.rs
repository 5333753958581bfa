use comfy_table::{ContentArrangement, Table};

use cw_core::spread::shipped_spreads;

pub fn run() -> Result<(), String> {
    let spreads = shipped_spreads();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Id", "Name", "Cards", "Positions"]);

    for (i, spread) in spreads.iter().enumerate() {
        let positions = spread
            .positions
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(" / ");
        table.add_row(vec![
            (i + 1).to_string(),
            spread.id.clone(),
            spread.name.clone(),
            spread.card_count.to_string(),
            positions,
        ]);
    }

    println!("{table}");
    Ok(())
}

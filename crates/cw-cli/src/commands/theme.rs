use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use cw_reading::theme::{CardBack, ThemeSelector};

pub fn run(back_image: Option<&Path>, select: Option<&str>) -> Result<(), String> {
    let mut selector = ThemeSelector::new();
    if let Some(id) = select {
        let theme = selector.select(id).map_err(|e| e.to_string())?;
        println!("  {} {}\n", "Selected".green().bold(), theme.name);
    }

    if let Some(path) = back_image {
        let theme = selector
            .install_custom_back(path)
            .map_err(|e| e.to_string())?;
        let size = match &theme.back {
            CardBack::Image(uri) => uri.len(),
            CardBack::Gradient(_) => 0,
        };
        println!(
            "  {} {} ({size} byte data URI)",
            "Installed".green().bold(),
            theme.name
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "Face", "Back"]);

    for theme in selector.themes() {
        let back = match &theme.back {
            CardBack::Gradient(css) => css.clone(),
            CardBack::Image(_) => "image".to_string(),
        };
        let id = if theme.id == selector.current().id {
            format!("{} *", theme.id)
        } else {
            theme.id.clone()
        };
        table.add_row(vec![id, theme.name.clone(), theme.front_style.to_string(), back]);
    }

    println!("{table}");
    Ok(())
}

use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use cw_reading::ReadingError;

pub fn list(dir: Option<&Path>) -> Result<(), String> {
    let journal = super::open_store(dir)?.load();

    if journal.is_empty() {
        println!("  No saved readings.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Date", "Question", "Spread", "Cards", "Reversed"]);

    for entry in journal.entries() {
        let cards = entry
            .cards
            .iter()
            .map(|pc| pc.card.archetype.name_localized.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let reversed = if entry.has_reversals() { "yes" } else { "" };
        table.add_row(vec![
            entry.id.clone(),
            entry.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            super::truncate(&entry.question, 40),
            entry.spread_name.clone(),
            cards,
            reversed.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} readings", journal.len());

    Ok(())
}

pub fn show(dir: Option<&Path>, id: &str) -> Result<(), String> {
    let journal = super::open_store(dir)?.load();
    let entry = journal
        .get(id)
        .ok_or_else(|| ReadingError::EntryNotFound(id.to_string()).to_string())?;

    println!("  {}", entry.question.bold());
    println!(
        "  {} | {}",
        entry.spread_name,
        entry.timestamp.format("%Y-%m-%d %H:%M")
    );
    println!();
    for pc in &entry.cards {
        let card = if pc.card.is_reversed {
            pc.card.to_string().red()
        } else {
            pc.card.to_string().green()
        };
        println!("  {}: {card}", pc.position_name.cyan());
        println!("    {}", pc.card.meaning().dimmed());
    }
    println!();
    println!("{}", entry.interpretation);
    if let Some(notes) = &entry.user_notes {
        println!();
        println!("  {}", "Reflection".bold());
        for line in notes.lines() {
            println!("  > {line}");
        }
    }

    Ok(())
}

pub fn export(dir: Option<&Path>, format: &str, output: Option<&Path>) -> Result<(), String> {
    let journal = super::open_store(dir)?.load();

    let content = match format {
        "markdown" | "md" => journal.export_markdown(),
        "text" | "txt" => journal.export_text(),
        _ => {
            return Err(format!("unsupported format: \"{format}\". Use: markdown, text"));
        }
    };

    if let Some(path) = output {
        std::fs::write(path, &content)
            .map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
        println!(
            "  Exported {} readings to {}",
            journal.len(),
            path.display()
        );
    } else {
        print!("{content}");
    }

    Ok(())
}

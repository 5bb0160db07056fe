//! Contact request CLI commands (admin).

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use postboard_types::user::Caller;

use crate::state::AppState;

pub async fn list_contacts(state: &AppState, caller: &Caller, json: bool) -> Result<()> {
    let contacts = state.contact_service.list_contacts(caller).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&contacts)?);
        return Ok(());
    }

    if contacts.is_empty() {
        println!();
        println!("  {} No contact requests.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Phone").fg(Color::White),
        Cell::new("Message").fg(Color::White),
        Cell::new("Received").fg(Color::White),
    ]);

    for contact in &contacts {
        table.add_row(vec![
            Cell::new(contact.id).fg(Color::DarkGrey),
            Cell::new(&contact.name).fg(Color::Cyan),
            Cell::new(&contact.phone),
            Cell::new(truncate(contact.message.as_deref().unwrap_or("-"), 50)),
            Cell::new(contact.created_at.format("%Y-%m-%d %H:%M")).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();

    Ok(())
}

pub async fn delete_contact(state: &AppState, caller: &Caller, id: i64, json: bool) -> Result<()> {
    state.contact_service.delete_contact(caller, id).await?;

    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!();
        println!("  {} Contact request {id} deleted.", style("✓").red().bold());
        println!();
    }

    Ok(())
}

/// Shorten to `max` characters, on a char boundary.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

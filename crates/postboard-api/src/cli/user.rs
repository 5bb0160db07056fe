//! User CLI commands: create, list.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use postboard_types::user::{CreateUserRequest, Role};

use crate::state::AppState;

/// Register a user and print their one-time API token.
pub async fn create_user(
    state: &AppState,
    username: String,
    email: String,
    admin: bool,
    json: bool,
) -> Result<()> {
    let roles = if admin {
        vec![Role::Admin, Role::Member]
    } else {
        vec![Role::Member]
    };

    let issued = state
        .user_service
        .create_user(CreateUserRequest {
            username,
            email,
            roles,
        })
        .await?;

    if json {
        let out = serde_json::json!({ "user": issued.user, "token": issued.token });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let roles: Vec<String> = issued.user.roles.iter().map(ToString::to_string).collect();

    println!();
    println!("  {} User created!", style("✓").green().bold());
    println!();
    println!("  {}  {}", style("Username:").bold(), style(&issued.user.username).cyan());
    println!("  {}  {}", style("Roles:").bold(), roles.join(", "));
    println!("  {}  {}", style("ID:").bold(), style(issued.user.id).dim());
    println!();
    println!(
        "  {} API token (save this -- it won't be shown again):",
        style("🔑").bold()
    );
    println!();
    println!("  {}", style(&issued.token).yellow().bold());
    println!();

    Ok(())
}

pub async fn list_users(state: &AppState, json: bool) -> Result<()> {
    let users = state.user_service.list_users().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&users)?);
        return Ok(());
    }

    if users.is_empty() {
        println!();
        println!(
            "  {} No users yet. Create one with: {}",
            style("i").blue().bold(),
            style("postboard create user <name> --email <email>").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Username").fg(Color::White),
        Cell::new("Email").fg(Color::White),
        Cell::new("Roles").fg(Color::White),
        Cell::new("Joined").fg(Color::White),
    ]);

    for user in &users {
        let roles: Vec<String> = user.roles.iter().map(ToString::to_string).collect();
        let roles_cell = if user.has_role(Role::Admin) {
            Cell::new(roles.join(", ")).fg(Color::Yellow)
        } else {
            Cell::new(roles.join(", "))
        };
        table.add_row(vec![
            Cell::new(user.id).fg(Color::DarkGrey),
            Cell::new(&user.username).fg(Color::Cyan),
            Cell::new(&user.email),
            roles_cell,
            Cell::new(user.created_at.format("%Y-%m-%d")).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} user{}",
        style(users.len()).bold(),
        if users.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

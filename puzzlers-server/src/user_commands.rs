use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use puzzlers_types::{RegisterRequest, UserRole};

use crate::commands::CliContext;

pub async fn list_users(ctx: &CliContext, json: bool) -> Result<()> {
    let token = ctx.require_admin()?;
    let users = ctx.client.get_all_users(Some(&token)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&users)?);
        return Ok(());
    }

    if users.is_empty() {
        println!("{}", "No users found.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "User Name", "Roles"]);

    for user in &users {
        let roles = if user.roles.is_empty() {
            Cell::new("-").fg(Color::DarkGrey)
        } else if user.roles.iter().any(|r| r.eq_ignore_ascii_case(UserRole::Admin.as_str())) {
            Cell::new(user.roles.join(", ")).fg(Color::Magenta)
        } else {
            Cell::new(user.roles.join(", ")).fg(Color::Green)
        };
        table.add_row(vec![Cell::new(&user.id), Cell::new(&user.user_name), roles]);
    }

    println!("{table}");
    println!("\n{} users total", users.len());
    Ok(())
}

pub async fn register_user(
    ctx: &CliContext,
    name: String,
    password: String,
    role: UserRole,
) -> Result<()> {
    let token = ctx.require_admin()?;
    let request = RegisterRequest { name, password, role };
    let reply = ctx.client.register(&request, Some(&token)).await?;
    println!("{} User registered: {} ({})", "✓".green(), request.name.green(), role);
    if !reply.trim().is_empty() {
        println!("  {}", reply.trim());
    }
    Ok(())
}

pub async fn delete_user(ctx: &CliContext, id: &str) -> Result<()> {
    let token = ctx.require_admin()?;
    ctx.client.delete_user(id, Some(&token)).await?;
    println!("{} User deleted: {}", "✓".green(), id);
    Ok(())
}

use anyhow::Result;
use colored::Colorize;

use crate::commands::CliContext;

pub async fn login(ctx: &CliContext, username: &str, password: &str) -> Result<()> {
    println!("{}", format!("Logging in to {}...", ctx.config.api_url).cyan());

    if let Err(e) = ctx.session.login(username, password).await {
        let message = ctx.session.error().unwrap_or_else(|| e.user_message());
        anyhow::bail!(message);
    }

    let user = ctx.session.user().map(|u| u.user_name).unwrap_or_default();
    let roles: Vec<String> = ctx.session.roles().iter().map(ToString::to_string).collect();
    println!("{} Logged in as {}", "✓".green(), user.green());
    if !roles.is_empty() {
        println!("  Roles: {}", roles.join(", "));
    }
    Ok(())
}

pub fn logout(ctx: &CliContext) -> Result<()> {
    let was_logged_in = ctx.session.is_authenticated();
    ctx.session.logout();
    if was_logged_in {
        println!("{} Logged out", "✓".green());
    } else {
        println!("{}", "Not logged in.".yellow());
    }
    Ok(())
}

pub fn whoami(ctx: &CliContext, json: bool) -> Result<()> {
    let state = ctx.session.snapshot();

    if json {
        let mut value = serde_json::to_value(&state)?;
        if let Some(obj) = value.as_object_mut() {
            obj.remove("token");
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let Some(user) = state.user.filter(|_| state.is_authenticated) else {
        println!("{}", "Not logged in.".yellow());
        return Ok(());
    };

    println!("{}", "Current Session:".cyan().bold());
    println!("  User:  {}", user.user_name);
    println!("  ID:    {}", if user.id.is_empty() { "-" } else { &user.id });
    println!("  Email: {}", user.email);
    let roles: Vec<String> = state.roles.iter().map(ToString::to_string).collect();
    println!("  Roles: {}", if roles.is_empty() { "-".to_string() } else { roles.join(", ") });
    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use puzzlers_types::{Difficulty, NewPuzzle, PuzzleImage};

use crate::commands::CliContext;

pub async fn list_puzzles(
    ctx: &CliContext,
    mine: bool,
    creator: Option<String>,
    json: bool,
) -> Result<()> {
    let token = ctx.require_login()?;

    let puzzles = if mine {
        let id = ctx.session.user().map(|u| u.id).unwrap_or_default();
        ctx.client.get_puzzles_by_creator(&id, Some(&token)).await?
    } else if let Some(id) = creator {
        ctx.client.get_puzzles_by_creator(&id, Some(&token)).await?
    } else {
        ctx.client.get_all_puzzles(Some(&token)).await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&puzzles)?);
        return Ok(());
    }

    if puzzles.is_empty() {
        println!("{}", "No puzzles found.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Name", "Difficulty", "Solution", "Creator", "Image"]);

    for puzzle in &puzzles {
        let difficulty = Cell::new(puzzle.difficulty_level).fg(difficulty_color(puzzle.difficulty_level));
        let creator = puzzle
            .creator_name
            .as_deref()
            .or(puzzle.created_by.as_deref())
            .unwrap_or("-");
        table.add_row(vec![
            Cell::new(&puzzle.id),
            Cell::new(&puzzle.name),
            difficulty,
            Cell::new(&puzzle.solution),
            Cell::new(creator),
            Cell::new(if puzzle.image.is_some() { "yes" } else { "-" }),
        ]);
    }

    println!("{table}");
    println!("\n{} puzzles total", puzzles.len());
    Ok(())
}

fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn read_image(path: &Path) -> Result<PuzzleImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    Ok(PuzzleImage { file_name, mime_type: mime_for(path).to_string(), bytes })
}

pub async fn create_puzzle(
    ctx: &CliContext,
    name: String,
    solution: String,
    difficulty: Difficulty,
    image: Option<PathBuf>,
) -> Result<()> {
    let token = ctx.require_creator()?;
    let creator_id = ctx.session.user().map(|u| u.id).unwrap_or_default();
    let image = image.as_deref().map(read_image).transpose()?;

    let puzzle = NewPuzzle { name, solution, difficulty, creator_id, image };
    let reply = ctx.client.create_puzzle(&puzzle, Some(&token)).await?;

    println!("{} Puzzle created: {}", "✓".green(), puzzle.name.trim().green());
    if !reply.trim().is_empty() {
        println!("  {}", reply.trim());
    }
    Ok(())
}

pub async fn delete_puzzle(ctx: &CliContext, id: &str) -> Result<()> {
    let token = ctx.require_creator()?;
    ctx.client.delete_puzzle(id, Some(&token)).await?;
    println!("{} Puzzle deleted: {}", "✓".green(), id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_for(Path::new("a/sphinx.PNG")), "image/png");
        assert_eq!(mime_for(Path::new("b.jpeg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("noext")), "application/octet-stream");
    }
}

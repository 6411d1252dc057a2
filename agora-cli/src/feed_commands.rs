use std::path::PathBuf;

use agora_client::{MediaUpload, NewPost, Post, PostId, ReactionKind, ReactionOutcome};
use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};

use crate::commands::{report, App};

const PREVIEW_CHARS: usize = 60;

pub async fn show_feed(app: &App, json: bool) -> Result<()> {
    app.require_session()?;
    // Needed to mark which posts can be deleted.
    app.client.load_profile().await.map_err(report)?;
    let posts = app.client.refresh_feed().await.map_err(report)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    if posts.is_empty() {
        println!("{}", "No posts yet.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Author", "Post", "Likes", "Dislikes", "Posted"]);

    for post in &posts {
        table.add_row(vec![
            Cell::new(post.id),
            author_cell(app, post),
            Cell::new(preview(app, post)),
            count_cell(post.likes(), post.user_liked(), Color::Green),
            count_cell(post.dislikes(), post.user_disliked(), Color::Red),
            Cell::new(post.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }

    println!("{table}");
    println!("\n{} posts total", posts.len());
    Ok(())
}

fn author_cell(app: &App, post: &Post) -> Cell {
    if app.client.can_delete(post) {
        Cell::new(format!("{} (you)", post.author_name)).fg(Color::Cyan)
    } else {
        Cell::new(&post.author_name)
    }
}

fn count_cell(count: u32, mine: bool, color: Color) -> Cell {
    if mine {
        Cell::new(format!("{count} *")).fg(color)
    } else {
        Cell::new(count)
    }
}

fn preview(app: &App, post: &Post) -> String {
    let mut text: String = post.description.chars().take(PREVIEW_CHARS).collect();
    if post.description.chars().count() > PREVIEW_CHARS {
        text.push('…');
    }
    if let Some(url) = app.client.media_url(post.image.as_deref()) {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&url);
    }
    text
}

pub async fn create_post(app: &App, text: Option<String>, image: Option<PathBuf>) -> Result<()> {
    app.require_session()?;
    let image = image
        .as_deref()
        .map(MediaUpload::from_path)
        .transpose()
        .context("Failed to read image")?;

    let post = app
        .client
        .create_post(NewPost::new(text.unwrap_or_default(), image))
        .await
        .map_err(report)?;
    println!("{} Published post {}", "✓".green(), post.id.to_string().green());
    Ok(())
}

pub async fn delete_post(app: &App, id: PostId) -> Result<()> {
    app.require_session()?;
    app.client.delete_post(id).await.map_err(report)?;
    println!("{} Deleted post {}", "✓".green(), id);
    Ok(())
}

pub async fn react(app: &App, id: PostId, kind: ReactionKind) -> Result<()> {
    app.require_session()?;
    // The engine only acts on posts it can see.
    app.client.refresh_feed().await.map_err(report)?;

    let outcome = match kind {
        ReactionKind::Like => app.client.toggle_like(id).await,
        ReactionKind::Dislike => app.client.toggle_dislike(id).await,
    };
    match outcome {
        ReactionOutcome::Confirmed(snapshot) => {
            let state = match (snapshot.user_liked(), snapshot.user_disliked()) {
                (true, _) => "liked".green(),
                (_, true) => "disliked".red(),
                _ => "no reaction".normal(),
            };
            println!(
                "{} Post {}: {} likes, {} dislikes ({})",
                "✓".green(),
                id,
                snapshot.likes,
                snapshot.dislikes,
                state
            );
            Ok(())
        }
        ReactionOutcome::Absent => anyhow::bail!("Post {id} is not in your feed"),
        ReactionOutcome::Superseded { .. } => Ok(()),
        ReactionOutcome::Failed { error, .. } => Err(anyhow::anyhow!(error.user_message())),
    }
}

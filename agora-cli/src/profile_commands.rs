use std::path::PathBuf;

use agora_client::{MediaUpload, Profile, ProfileUpdate};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Table};

use crate::commands::{report, App};

pub async fn show_profile(app: &App, json: bool) -> Result<()> {
    app.require_session()?;
    let profile = app.client.load_profile().await.map_err(report)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }
    print_profile(app, &profile);
    Ok(())
}

pub async fn edit_profile(
    app: &App,
    name: Option<String>,
    dob: Option<NaiveDate>,
    picture: Option<PathBuf>,
) -> Result<()> {
    app.require_session()?;
    if name.is_none() && dob.is_none() && picture.is_none() {
        anyhow::bail!("Nothing to change. Pass --name, --dob or --picture");
    }
    let profile_pic = picture
        .as_deref()
        .map(MediaUpload::from_path)
        .transpose()
        .context("Failed to read profile picture")?;

    let current = app.client.load_profile().await.map_err(report)?;
    let update = ProfileUpdate {
        full_name: name.unwrap_or(current.full_name),
        dob: dob.or(current.dob),
        profile_pic,
    };
    let profile = app.client.update_profile(update).await.map_err(report)?;

    println!("{} Profile saved", "✓".green());
    print_profile(app, &profile);
    Ok(())
}

fn print_profile(app: &App, profile: &Profile) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.add_row(vec![Cell::new("Name"), Cell::new(&profile.full_name)]);
    table.add_row(vec![Cell::new("Email"), Cell::new(&profile.email)]);
    table.add_row(vec![
        Cell::new("Born"),
        Cell::new(profile.dob.map_or_else(|| "-".to_string(), |d| d.to_string())),
    ]);
    table.add_row(vec![
        Cell::new("Picture"),
        Cell::new(app.client.media_url(profile.avatar.as_deref()).unwrap_or_else(|| "-".to_string())),
    ]);
    println!("{table}");
}

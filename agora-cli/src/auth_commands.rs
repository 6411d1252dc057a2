use std::path::PathBuf;

use agora_client::{LoginForm, MediaUpload, Screen, SignupForm};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::Colorize;

use crate::commands::{report, App};

pub struct SignupArgs {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub dob: Option<NaiveDate>,
    pub picture: Option<PathBuf>,
}

pub async fn login(app: &App, email: String, password: String) -> Result<()> {
    let profile = app.client.login(LoginForm::new(email, password)).await.map_err(report)?;
    app.show(Screen::Profile);
    println!("{} Signed in as {}", "✓".green(), profile.full_name.green());
    Ok(())
}

pub async fn signup(app: &App, args: SignupArgs) -> Result<()> {
    let profile_pic = args
        .picture
        .as_deref()
        .map(MediaUpload::from_path)
        .transpose()
        .context("Failed to read profile picture")?;
    app.show(Screen::Signup);

    let ack = app
        .client
        .signup(SignupForm {
            full_name: args.name,
            dob: args.dob,
            email: args.email,
            password: args.password,
            confirm_password: args.confirm_password,
            profile_pic,
        })
        .await
        .map_err(report)?;

    let message = ack.message.unwrap_or_else(|| "Account created".to_string());
    println!("{} {}", "✓".green(), message);
    if app.client.is_authenticated() {
        app.show(Screen::Profile);
        println!("  You are now signed in.");
    } else {
        app.show(Screen::Login);
        println!("  Run {} to sign in.", "agora login <email>".cyan());
    }
    Ok(())
}

pub fn logout(app: &App) -> Result<()> {
    if !app.client.is_authenticated() {
        println!("{}", "Not signed in.".yellow());
        return Ok(());
    }
    app.client.logout();
    println!("{} Signed out", "✓".green());
    Ok(())
}

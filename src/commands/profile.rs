//! Manage the connection profile

use crate::config::ConnectionConfig;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::fs;

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Write a commented profile template
    Init(InitArgs),

    /// Print the profile file contents
    Show,

    /// Print the profile file path
    Path,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing profile
    #[arg(short, long)]
    pub force: bool,
}

pub fn run(args: ProfileArgs) -> i32 {
    let result = match args.command {
        ProfileCommand::Init(args) => run_init(args),
        ProfileCommand::Show => run_show(),
        ProfileCommand::Path => run_path(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            1
        }
    }
}

fn run_init(args: InitArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let path = ConnectionConfig::profile_path()?;

    if path.exists() && !args.force {
        return Err(format!(
            "Profile already exists at {}\n\nUse 's3m profile init --force' to overwrite it.",
            path.display()
        )
        .into());
    }

    let path = ConnectionConfig::write_template()?;
    println!("{} {}", "Created:".green().bold(), path.display());
    println!("{}", "Edit the file and fill in your credentials.".dimmed());

    Ok(0)
}

fn run_show() -> Result<i32, Box<dyn std::error::Error>> {
    let path = ConnectionConfig::profile_path()?;

    if !path.exists() {
        eprintln!("No profile found at {}", path.display());
        eprintln!("Run 's3m profile init' to create one.");
        return Ok(1);
    }

    let content = fs::read_to_string(&path)?;
    print!("{}", content);

    Ok(0)
}

fn run_path() -> Result<i32, Box<dyn std::error::Error>> {
    let path = ConnectionConfig::profile_path()?;
    println!("{}", path.display());
    Ok(0)
}

//! Delete an object from a bucket

use crate::store::{self, StoreError};
use clap::Args;
use colored::Colorize;
use std::io::{BufRead, IsTerminal, Write};

#[derive(Args, Debug)]
pub struct RmArgs {
    /// Bucket containing the object
    pub bucket: String,

    /// Object key to delete
    pub key: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Delete an object after explicit confirmation
pub fn run(args: RmArgs) -> i32 {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("{} Failed to create async runtime: {}", "Error:".red().bold(), e);
            return 1;
        }
    };

    rt.block_on(async {
        match run_inner(args).await {
            Ok(code) => code,
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                1
            }
        }
    })
}

async fn run_inner(args: RmArgs) -> Result<i32, Box<dyn std::error::Error>> {
    if !args.yes {
        if !std::io::stdin().is_terminal() {
            return Err("Refusing to delete without confirmation in non-interactive mode. Use --yes".into());
        }

        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        if !confirm_delete(&args.key, &mut input, &mut output)? {
            println!("{}", "Delete cancelled.".dimmed());
            return Ok(0);
        }
    }

    let config = super::load_profile()?;
    let store = store::create_store(&config).await?;

    let spinner = super::buckets::connect_spinner("Deleting file...");
    let result = store.delete(&args.bucket, &args.key).await;
    spinner.finish_and_clear();

    match result {
        Ok(()) => {
            println!(
                "{} '{}' deleted from {}",
                "Deleted:".green().bold(),
                args.key.cyan(),
                args.bucket
            );
            Ok(0)
        }
        Err(StoreError::NotFound(_)) => {
            Err(format!("Object '{}' was not found in '{}'", args.key, args.bucket).into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Prompt for delete confirmation; only "y"/"yes" confirms.
pub(crate) fn confirm_delete(
    key: &str,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> std::io::Result<bool> {
    write!(
        output,
        "Delete '{}'? This action cannot be undone. [y/N]: ",
        key
    )?;
    output.flush()?;

    let mut response = String::new();
    input.read_line(&mut response)?;
    Ok(matches!(
        response.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

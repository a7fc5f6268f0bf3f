//! List buckets for the configured provider

use crate::store;
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[derive(Args, Debug)]
pub struct BucketsArgs {}

/// Authenticate with the profile and list all buckets
pub fn run(args: BucketsArgs) -> i32 {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("{} Failed to create async runtime: {}", "Error:".red().bold(), e);
            return 1;
        }
    };

    rt.block_on(async {
        match run_inner(args).await {
            Ok(_) => 0,
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                1
            }
        }
    })
}

async fn run_inner(_args: BucketsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_profile()?;
    let store = store::create_store(&config).await?;

    let spinner = connect_spinner(&format!("Connecting to {}...", store.provider_name()));
    let result = store.list_buckets().await;
    spinner.finish_and_clear();

    let buckets = result?;

    if buckets.is_empty() {
        println!("{}", "No buckets found. Create one with 's3m mb NAME'.".dimmed());
        return Ok(());
    }

    println!(
        "{} bucket(s) on {}:",
        buckets.len(),
        store.provider_name().cyan()
    );
    for name in &buckets {
        println!("  {}", name);
    }

    Ok(())
}

/// Spinner shown while a network call is in flight.
pub(crate) fn connect_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

//! List objects in a bucket

use crate::store;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct LsArgs {
    /// Bucket to list
    pub bucket: String,
}

/// List all object keys in a bucket
pub fn run(args: LsArgs) -> i32 {
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

async fn run_inner(args: LsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_profile()?;
    let store = store::create_store(&config).await?;

    let spinner = super::buckets::connect_spinner("Loading bucket contents...");
    let result = store.list_objects(&args.bucket).await;
    spinner.finish_and_clear();

    let keys = result?;

    if keys.is_empty() {
        println!("{}", "No files in this bucket".dimmed());
        return Ok(());
    }

    println!("Found {} file(s) in {}:", keys.len(), args.bucket.cyan());
    for key in &keys {
        println!("  {}", key);
    }

    Ok(())
}

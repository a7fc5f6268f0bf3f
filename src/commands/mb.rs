//! Create a new bucket

use crate::naming::validate_bucket_name;
use crate::store::{self, StoreError};
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct MbArgs {
    /// Name of the bucket to create
    pub name: String,
}

/// Create a bucket, validating the name locally first
pub fn run(args: MbArgs) -> i32 {
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

async fn run_inner(args: MbArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Local validation before any network call
    if let Err(reason) = validate_bucket_name(&args.name) {
        return Err(format!("Invalid bucket name: {}", reason).into());
    }

    let config = super::load_profile()?;
    let store = store::create_store(&config).await?;

    let spinner = super::buckets::connect_spinner("Creating bucket...");
    let result = store.create_bucket(&args.name).await;
    spinner.finish_and_clear();

    match result {
        Ok(()) => {
            println!(
                "{} Bucket '{}' created on {}",
                "Created:".green().bold(),
                args.name.cyan(),
                store.provider_name()
            );
            Ok(())
        }
        Err(StoreError::AlreadyExists(_)) => {
            Err("Bucket name is already taken. Please choose a different name.".into())
        }
        Err(StoreError::InvalidName(_)) => {
            Err("The provider rejected the bucket name. Please follow the naming rules.".into())
        }
        Err(e) => Err(e.into()),
    }
}

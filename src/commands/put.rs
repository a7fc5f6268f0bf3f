//! Upload a file to a bucket

use crate::store;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct PutArgs {
    /// Target bucket
    pub bucket: String,

    /// Local file to upload
    pub file: PathBuf,

    /// Object key to store under (default: the file name)
    #[arg(short, long)]
    pub key: Option<String>,
}

/// Upload a local file as a private object
pub fn run(args: PutArgs) -> i32 {
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

async fn run_inner(args: PutArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.file.is_file() {
        return Err(format!("No such file: {}", args.file.display()).into());
    }

    let key = match &args.key {
        Some(key) => key.clone(),
        None => args
            .file
            .file_name()
            .ok_or("Cannot determine a file name for the upload")?
            .to_string_lossy()
            .to_string(),
    };

    let config = super::load_profile()?;
    let store = store::create_store(&config).await?;

    let spinner = super::buckets::connect_spinner(&format!("Uploading {}...", key));
    let result = store.upload(&args.bucket, &key, &args.file).await;
    spinner.finish_and_clear();

    let size = result?;

    println!(
        "{} '{}' uploaded to {} ({} bytes)",
        "Uploaded:".green().bold(),
        key.cyan(),
        args.bucket,
        size
    );

    Ok(())
}

//! Download an object from a bucket

use crate::store;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Source bucket
    pub bucket: String,

    /// Object key to download
    pub key: String,

    /// Directory to download into (default: ~/Downloads)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Save under a different file name (default: the object key)
    #[arg(long)]
    pub name: Option<String>,
}

/// Download an object, creating the destination directory if needed
pub fn run(args: GetArgs) -> i32 {
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

async fn run_inner(args: GetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = match &args.out {
        Some(dir) => dir.clone(),
        None => default_download_dir().ok_or("Cannot determine a download directory; use --out")?,
    };
    let file_name = args.name.clone().unwrap_or_else(|| args.key.clone());
    let dest = dir.join(file_name);

    let config = super::load_profile()?;
    let store = store::create_store(&config).await?;

    let spinner = super::buckets::connect_spinner(&format!("Downloading {}...", args.key));
    let result = store.download(&args.bucket, &args.key, &dest).await;
    spinner.finish_and_clear();

    let size = result?;

    println!(
        "{} {} ({} bytes)",
        "Downloaded:".green().bold(),
        dest.display().to_string().cyan(),
        size
    );

    Ok(())
}

/// The user's download directory, falling back to ~/Downloads.
pub(crate) fn default_download_dir() -> Option<PathBuf> {
    dirs::download_dir().or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
}

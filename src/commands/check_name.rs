//! Check a bucket name against S3 naming rules

use crate::naming::validate_bucket_name;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct CheckNameArgs {
    /// Candidate bucket name
    pub name: String,
}

/// Validate a bucket name locally; exits non-zero when invalid
pub fn run(args: CheckNameArgs) -> i32 {
    match validate_bucket_name(&args.name) {
        Ok(()) => {
            println!("{} '{}' is a valid bucket name", "OK:".green().bold(), args.name);
            0
        }
        Err(reason) => {
            eprintln!("{} {}", "Invalid:".red().bold(), reason);
            1
        }
    }
}

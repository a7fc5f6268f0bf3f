use clap::{Parser, Subcommand};

mod commands;
mod config;
mod naming;
mod session;
mod store;

use commands::{
    BucketsArgs, CheckNameArgs, GetArgs, LsArgs, MbArgs, ProfileArgs, PutArgs, RmArgs, ShellArgs,
};

/// Manage S3-compatible object storage from the command line
#[derive(Parser)]
#[command(name = "s3m", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive session
    Shell(ShellArgs),

    /// List buckets using the connection profile
    Buckets(BucketsArgs),

    /// Create a new bucket
    Mb(MbArgs),

    /// List objects in a bucket
    Ls(LsArgs),

    /// Upload a file to a bucket
    Put(PutArgs),

    /// Download an object from a bucket
    Get(GetArgs),

    /// Delete an object from a bucket
    Rm(RmArgs),

    /// Check a bucket name against S3 naming rules
    CheckName(CheckNameArgs),

    /// Manage the connection profile
    Profile(ProfileArgs),
}

fn main() {
    let cli = Cli::parse();

    let code = match cli.command {
        Command::Shell(args) => commands::shell::run(args),
        Command::Buckets(args) => commands::buckets::run(args),
        Command::Mb(args) => commands::mb::run(args),
        Command::Ls(args) => commands::ls::run(args),
        Command::Put(args) => commands::put::run(args),
        Command::Get(args) => commands::get::run(args),
        Command::Rm(args) => commands::rm::run(args),
        Command::CheckName(args) => commands::check_name::run(args),
        Command::Profile(args) => commands::profile::run(args),
    };

    std::process::exit(code);
}

//! Interactive session console
//!
//! The shell owns a `Session` and a storage backend. Each line of input maps
//! to one session transition; the effect it returns is performed against the
//! backend and the outcome is fed back into the session. Effects run one at
//! a time, so a single storage call is in flight per session.

use crate::session::{Effect, Session};
use crate::store::{self, ObjectStore, StoreError};
use clap::Args;
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ShellArgs {}

/// Result of performing a storage effect.
enum Outcome {
    Buckets(Vec<String>),
    Objects(Vec<String>),
    Created(String),
    Uploaded(u64),
    Downloaded { size: u64, dest: PathBuf },
    Deleted,
}

/// Perform one effect against the backend.
async fn perform(store: &dyn ObjectStore, effect: Effect) -> Result<Outcome, StoreError> {
    match effect {
        Effect::ListBuckets => store.list_buckets().await.map(Outcome::Buckets),
        Effect::ListObjects { bucket } => store.list_objects(&bucket).await.map(Outcome::Objects),
        Effect::CreateBucket { name } => {
            store.create_bucket(&name).await?;
            Ok(Outcome::Created(name))
        }
        Effect::Upload {
            bucket,
            key,
            source,
        } => store.upload(&bucket, &key, &source).await.map(Outcome::Uploaded),
        Effect::Download { bucket, key, dest } => {
            let size = store.download(&bucket, &key, &dest).await?;
            Ok(Outcome::Downloaded { size, dest })
        }
        Effect::DeleteObject { bucket, key } => {
            store.delete(&bucket, &key).await?;
            Ok(Outcome::Deleted)
        }
    }
}

/// Start the interactive console
pub fn run(args: ShellArgs) -> i32 {
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

async fn run_inner(_args: ShellArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new();
    let mut store: Option<Box<dyn ObjectStore>> = None;

    println!("{}", "s3m interactive session".bold());
    println!("{}", "Type 'help' for commands, 'quit' to leave.".dimmed());

    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    loop {
        print_prompt(&session)?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // EOF
            break;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, rest)) = tokens.split_first() else {
            continue;
        };

        match command {
            "quit" | "exit" => break,
            "help" => print_help(),
            "connect" => cmd_connect(&mut session, &mut store).await,
            "disconnect" => {
                // Drops the backend and the credentials with it
                session.disconnect();
                store = None;
                println!("{}", "Disconnected.".dimmed());
            }
            "buckets" => cmd_buckets(&session),
            "use" => cmd_use(&mut session, &store, rest).await,
            "mb" => cmd_mb(&mut session, &store, rest).await,
            "ls" => cmd_ls(&mut session, &store).await,
            "put" => cmd_put(&mut session, &store, rest).await,
            "get" => cmd_get(&mut session, &store, rest).await,
            "rm" => cmd_rm(&mut session, &store, rest, &mut input).await,
            other => {
                eprintln!("Unknown command '{}'. Type 'help' for commands.", other);
            }
        }
    }

    Ok(())
}

fn print_prompt(session: &Session) -> std::io::Result<()> {
    let prompt = match session.current_bucket() {
        Some(bucket) => format!("s3m:{}> ", bucket),
        None => "s3m> ".to_string(),
    };
    print!("{}", prompt.bold());
    std::io::stdout().flush()
}

fn print_help() {
    println!("Commands:");
    println!("  connect              connect using the profile and list buckets");
    println!("  disconnect           drop the connection and all session state");
    println!("  buckets              show the known bucket names");
    println!("  use BUCKET           select a bucket and list its contents");
    println!("  mb NAME              create a new bucket");
    println!("  ls                   refresh the current bucket's listing");
    println!("  put FILE [KEY]       upload a file to the current bucket");
    println!("  get KEY [DIR]        download a file (default: ~/Downloads)");
    println!("  rm KEY               delete a file, with confirmation");
    println!("  quit                 leave the shell");
}

async fn cmd_connect(session: &mut Session, store: &mut Option<Box<dyn ObjectStore>>) {
    let config = match super::load_profile() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return;
        }
    };
    let provider = config.provider;

    let effect = match session.connect(config.clone()) {
        Ok(effect) => effect,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return;
        }
    };

    let backend = match store::create_store(&config).await {
        Ok(backend) => backend,
        Err(e) => {
            session.on_connect_failed();
            eprintln!("{} Connection failed: {}", "Error:".red().bold(), e);
            return;
        }
    };

    let spinner = super::buckets::connect_spinner("Connecting to S3 service...");
    let result = perform(backend.as_ref(), effect).await;
    spinner.finish_and_clear();

    match result {
        Ok(Outcome::Buckets(buckets)) => {
            let count = buckets.len();
            session.on_connected(buckets);
            *store = Some(backend);
            println!(
                "{} Connected to {} ({} bucket(s))",
                "OK:".green().bold(),
                provider.display_name().cyan(),
                count
            );
            if let Some(config) = session.config() {
                println!(
                    "  Endpoint: {} | Region: {}",
                    config.endpoint, config.region
                );
            }
        }
        Ok(_) => unreachable!("connect produces a bucket listing"),
        Err(e) => {
            session.on_connect_failed();
            eprintln!("{} Connection failed: {}", "Error:".red().bold(), e);
        }
    }
}

fn cmd_buckets(session: &Session) {
    if !session.is_connected() {
        eprintln!("{}", "Not connected. Use 'connect' first.".yellow());
        return;
    }

    if session.buckets().is_empty() {
        println!("{}", "No buckets found. Create one with 'mb NAME'.".dimmed());
        return;
    }

    for name in session.buckets() {
        let marker = if Some(name.as_str()) == session.current_bucket() {
            "*".green().to_string()
        } else {
            " ".to_string()
        };
        println!(" {} {}", marker, name);
    }
}

async fn cmd_use(session: &mut Session, store: &Option<Box<dyn ObjectStore>>, rest: &[&str]) {
    let Some(&name) = rest.first() else {
        eprintln!("Usage: use BUCKET");
        return;
    };
    let Some(backend) = store else {
        eprintln!("{}", "Not connected. Use 'connect' first.".yellow());
        return;
    };

    let effect = match session.select_bucket(name) {
        Ok(effect) => effect,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return;
        }
    };

    let spinner = super::buckets::connect_spinner("Loading bucket contents...");
    let result = perform(backend.as_ref(), effect).await;
    spinner.finish_and_clear();

    match result {
        Ok(Outcome::Objects(files)) => {
            session.on_objects_listed(files);
            println!(
                "Now accessing bucket {} ({} file(s))",
                name.cyan(),
                session.files().len()
            );
        }
        Ok(_) => unreachable!("select_bucket produces an object listing"),
        Err(e) => {
            // Selection is reverted so the failure cannot pass for an
            // empty bucket.
            session.on_list_failed();
            eprintln!("{} Error accessing bucket: {}", "Error:".red().bold(), e);
        }
    }
}

async fn cmd_mb(session: &mut Session, store: &Option<Box<dyn ObjectStore>>, rest: &[&str]) {
    let Some(&name) = rest.first() else {
        eprintln!("Usage: mb NAME");
        return;
    };
    let Some(backend) = store else {
        eprintln!("{}", "Not connected. Use 'connect' first.".yellow());
        return;
    };

    // Invalid names are rejected here without any network call
    let effect = match session.create_bucket(name) {
        Ok(effect) => effect,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return;
        }
    };

    let spinner = super::buckets::connect_spinner("Creating bucket...");
    let result = perform(backend.as_ref(), effect).await;
    spinner.finish_and_clear();

    match result {
        Ok(Outcome::Created(name)) => {
            session.on_bucket_created(&name);
            println!("{} Bucket '{}' created", "OK:".green().bold(), name.cyan());
        }
        Ok(_) => unreachable!("create_bucket produces a creation outcome"),
        Err(StoreError::AlreadyExists(_)) => {
            eprintln!(
                "{} Bucket name is already taken. Please choose a different name.",
                "Error:".red().bold()
            );
        }
        Err(StoreError::InvalidName(_)) => {
            eprintln!(
                "{} The provider rejected the bucket name. Please follow the naming rules.",
                "Error:".red().bold()
            );
        }
        Err(e) => eprintln!("{} Error creating bucket: {}", "Error:".red().bold(), e),
    }
}

async fn cmd_ls(session: &mut Session, store: &Option<Box<dyn ObjectStore>>) {
    let Some(backend) = store else {
        eprintln!("{}", "Not connected. Use 'connect' first.".yellow());
        return;
    };

    let effect = match session.refresh_files() {
        Ok(effect) => effect,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return;
        }
    };

    let spinner = super::buckets::connect_spinner("Refreshing file list...");
    let result = perform(backend.as_ref(), effect).await;
    spinner.finish_and_clear();

    match result {
        Ok(Outcome::Objects(files)) => {
            session.on_objects_listed(files);
            if session.files().is_empty() {
                println!("{}", "No files in this bucket".dimmed());
            } else {
                println!("Found {} file(s):", session.files().len());
                for key in session.files() {
                    println!("  {}", key);
                }
            }
        }
        Ok(_) => unreachable!("refresh_files produces an object listing"),
        Err(e) => eprintln!("{} Error listing files: {}", "Error:".red().bold(), e),
    }
}

async fn cmd_put(session: &mut Session, store: &Option<Box<dyn ObjectStore>>, rest: &[&str]) {
    let Some(&file) = rest.first() else {
        eprintln!("Usage: put FILE [KEY]");
        return;
    };
    let Some(backend) = store else {
        eprintln!("{}", "Not connected. Use 'connect' first.".yellow());
        return;
    };

    let source = PathBuf::from(file);
    if !source.is_file() {
        eprintln!("{} No such file: {}", "Error:".red().bold(), source.display());
        return;
    }

    let key = match rest.get(1) {
        Some(&key) => key.to_string(),
        None => match source.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => {
                eprintln!("{} Cannot determine a file name for the upload", "Error:".red().bold());
                return;
            }
        },
    };

    let effect = match session.upload_file(source, &key) {
        Ok(effect) => effect,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return;
        }
    };

    let spinner = super::buckets::connect_spinner("Uploading file...");
    let result = perform(backend.as_ref(), effect).await;
    spinner.finish_and_clear();

    match result {
        Ok(Outcome::Uploaded(size)) => {
            println!(
                "{} '{}' uploaded ({} bytes)",
                "OK:".green().bold(),
                key.cyan(),
                size
            );
            // Refresh the listing so the new key shows up
            if let Ok(refresh) = session.on_uploaded() {
                match perform(backend.as_ref(), refresh).await {
                    Ok(Outcome::Objects(files)) => session.on_objects_listed(files),
                    Ok(_) => {}
                    Err(e) => eprintln!("{} Error refreshing file list: {}", "Error:".red().bold(), e),
                }
            }
        }
        Ok(_) => unreachable!("upload_file produces an upload outcome"),
        Err(e) => eprintln!("{} Error uploading file: {}", "Error:".red().bold(), e),
    }
}

async fn cmd_get(session: &mut Session, store: &Option<Box<dyn ObjectStore>>, rest: &[&str]) {
    let Some(&key) = rest.first() else {
        eprintln!("Usage: get KEY [DIR]");
        return;
    };
    let Some(backend) = store else {
        eprintln!("{}", "Not connected. Use 'connect' first.".yellow());
        return;
    };

    let dir = match rest.get(1) {
        Some(&dir) => PathBuf::from(dir),
        None => match super::get::default_download_dir() {
            Some(dir) => dir,
            None => {
                eprintln!("{} Cannot determine a download directory; pass one explicitly", "Error:".red().bold());
                return;
            }
        },
    };
    let dest = dir.join(key);

    let effect = match session.download_file(key, dest) {
        Ok(effect) => effect,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return;
        }
    };

    let spinner = super::buckets::connect_spinner("Downloading file...");
    let result = perform(backend.as_ref(), effect).await;
    spinner.finish_and_clear();

    match result {
        Ok(Outcome::Downloaded { size, dest }) => {
            println!(
                "{} {} ({} bytes)",
                "Downloaded:".green().bold(),
                dest.display().to_string().cyan(),
                size
            );
        }
        Ok(_) => unreachable!("download_file produces a download outcome"),
        Err(e) => eprintln!("{} Error downloading file: {}", "Error:".red().bold(), e),
    }
}

async fn cmd_rm(
    session: &mut Session,
    store: &Option<Box<dyn ObjectStore>>,
    rest: &[&str],
    input: &mut dyn BufRead,
) {
    let Some(&key) = rest.first() else {
        eprintln!("Usage: rm KEY");
        return;
    };
    let Some(backend) = store else {
        eprintln!("{}", "Not connected. Use 'connect' first.".yellow());
        return;
    };

    if let Err(e) = session.select_delete_target(key) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        return;
    }

    let confirmed = match super::rm::confirm_delete(key, input, &mut std::io::stdout()) {
        Ok(confirmed) => confirmed,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return;
        }
    };

    if session.set_delete_confirmed(confirmed).is_err() || !confirmed {
        println!("{}", "Delete cancelled.".dimmed());
        return;
    }

    // With the flag set, the machine hands out the delete effect
    let effect = match session.delete_file() {
        Ok(effect) => effect,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return;
        }
    };

    let spinner = super::buckets::connect_spinner("Deleting file...");
    let result = perform(backend.as_ref(), effect).await;
    spinner.finish_and_clear();

    match result {
        Ok(Outcome::Deleted) => {
            session.on_file_deleted();
            println!("{} '{}' deleted", "OK:".green().bold(), key.cyan());
        }
        Ok(_) => unreachable!("delete_file produces a delete outcome"),
        Err(e) => eprintln!("{} Error deleting file: {}", "Error:".red().bold(), e),
    }
}

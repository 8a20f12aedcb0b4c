mod config;
pub use config::cmd_config;

use std::path::Path;

use chrono::{Local, Utc};
use regex::Regex;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::lock::FileLock;
use crate::io::store;
use crate::model::band::RecencyBand;
use crate::model::list::{Direction, MruList};
use crate::model::path::{PathStyle, normalize};
use crate::ops::filter::SnapshotFilter;
use crate::service::MruListService;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let store_path = cli.store.clone().unwrap_or_else(store::default_store_path);

    match cli.command {
        Commands::Add(args) => cmd_add(args, &store_path, json),
        Commands::Rm(args) => cmd_rm(args, &store_path),
        Commands::Pin(args) => cmd_pin(args, &store_path, true),
        Commands::Unpin(args) => cmd_pin(args, &store_path, false),
        Commands::Mv(args) => cmd_mv(args, &store_path),
        Commands::List(args) => cmd_list(args, &store_path, json),
        Commands::Clear(args) => cmd_clear(args, &store_path, json),
        Commands::Config(args) => cmd_config(args, &store_path, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Turn a command-line path into the form stored in the list. Relative
/// POSIX paths are made absolute against the current directory; anything
/// already absolute or Windows-style passes through untouched.
fn resolve_path_arg(raw: &str) -> Result<String, Box<dyn std::error::Error>> {
    let trimmed = raw.trim();
    if PathStyle::detect(trimmed) == PathStyle::Windows || Path::new(trimmed).is_absolute() {
        return Ok(trimmed.to_string());
    }
    if trimmed.is_empty() {
        return Err("path is empty".into());
    }
    let abs = std::path::absolute(trimmed)
        .map_err(|e| format!("cannot resolve path '{}': {}", raw, e))?;
    Ok(abs.to_string_lossy().to_string())
}

/// Load the list without locking. A corrupt store reads as empty.
fn load_list(store_path: &Path) -> MruList {
    store::read_store_from(store_path).unwrap_or_else(|e| {
        eprintln!("warning: {} (starting with an empty list)", e);
        MruList::new()
    })
}

/// Run a mutation against the store under its lock, then save.
fn with_service<T>(
    store_path: &Path,
    f: impl FnOnce(&MruListService) -> T,
) -> Result<T, Box<dyn std::error::Error>> {
    let config = config_io::load_config(&config_io::config_path_for(store_path))?;
    let _lock = FileLock::acquire_default(store_path)?;
    let service = MruListService::with_list(load_list(store_path), config);
    let out = f(&service);
    store::write_store_to(store_path, &service.list())?;
    Ok(out)
}

fn not_in_list(path: &str) -> Box<dyn std::error::Error> {
    format!("not in list: {}", path).into()
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, store_path: &Path, json: bool) -> CmdResult {
    let path = resolve_path_arg(&args.path)?;
    normalize(&path).map_err(|e| format!("invalid path '{}': {}", args.path, e))?;
    let pinned = if args.pin { Some(true) } else { None };
    let entry = with_service(store_path, |svc| {
        svc.update_entry(&path, pinned);
        svc.get(&path)
    })?;
    let Some(entry) = entry else {
        return Err(format!("'{}' was recorded but is no longer in the list", path).into());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entry_to_json(&entry))?);
    } else {
        println!("{}", entry.path());
    }
    Ok(())
}

fn cmd_rm(args: PathArg, store_path: &Path) -> CmdResult {
    let path = resolve_path_arg(&args.path)?;
    if with_service(store_path, |svc| svc.remove_entry(&path))? {
        Ok(())
    } else {
        Err(not_in_list(&path))
    }
}

fn cmd_pin(args: PathArg, store_path: &Path, pinned: bool) -> CmdResult {
    let path = resolve_path_arg(&args.path)?;
    let (found, changed) = with_service(store_path, |svc| {
        let found = svc.get(&path).is_some();
        (found, svc.set_pinned(&path, pinned))
    })?;
    if !found {
        return Err(not_in_list(&path));
    }
    if !changed {
        let state = if pinned { "pinned" } else { "unpinned" };
        eprintln!("already {}: {}", state, path);
    }
    Ok(())
}

fn cmd_mv(args: MvArgs, store_path: &Path) -> CmdResult {
    let path = resolve_path_arg(&args.path)?;
    let direction: Direction = args.direction.into();
    let (found, moved) = with_service(store_path, |svc| {
        let found = svc.get(&path).is_some();
        (found, svc.move_entry(&path, direction))
    })?;
    if !found {
        return Err(not_in_list(&path));
    }
    if !moved {
        let edge = match direction {
            Direction::Up => "top",
            Direction::Down => "bottom",
        };
        eprintln!("already at {} of its section: {}", edge, path);
    }
    Ok(())
}

fn cmd_list(args: ListArgs, store_path: &Path, json: bool) -> CmdResult {
    let config = config_io::load_config(&config_io::config_path_for(store_path))?;
    let service = MruListService::with_list(load_list(store_path), config);

    let filter = SnapshotFilter {
        pattern: args
            .filter
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| format!("invalid regex: {}", e))?,
        band: args
            .band
            .as_deref()
            .map(str::parse::<RecencyBand>)
            .transpose()?,
        limit: args.limit,
    };

    let groups = filter.apply(service.grouped_snapshot(&Local::now()));

    if json {
        println!("{}", serde_json::to_string_pretty(&groups_to_json(&groups))?);
    } else if groups.is_empty() {
        if filter.is_empty() {
            println!("No recent files.");
        } else {
            println!("No matching files.");
        }
    } else {
        println!("{}", format_groups(&groups, &Utc::now(), terminal_width()));
    }
    Ok(())
}

fn cmd_clear(args: ClearArgs, store_path: &Path, json: bool) -> CmdResult {
    let removed = with_service(store_path, |svc| svc.clear(args.keep_pinned))?;
    if json {
        println!("{}", serde_json::json!({ "removed": removed }));
    } else {
        println!("removed {} entr{}", removed, if removed == 1 { "y" } else { "ies" });
    }
    Ok(())
}

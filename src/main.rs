use clap::{Parser, Subcommand};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use waypoint::core::config::{self, ResolvedConfig};
use waypoint::core::reminder::NotificationAction;
use waypoint::core::resolver::ExitPolicyKind;
use waypoint::core::sitemap::{SiteNode, normalize_path};
use waypoint::core::theme::{Theme, initial_theme};
use waypoint::host::BackButtonHandler;
use waypoint::host::storage::StorageSnapshot;
use waypoint::tui;

#[derive(Parser)]
#[command(name = "waypoint", about = "Back-button navigation resolver for hybrid mobile apps")]
struct Args {
    /// Config file (defaults to ~/.waypoint/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the exit policy on terminal pages
    #[arg(long, value_enum, global = true)]
    exit_policy: Option<ExitPolicyKind>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a single back press
    Resolve {
        /// Current location (query string and fragment are ignored)
        path: String,
        /// Entries in the in-app history
        #[arg(long, default_value_t = 0)]
        history: usize,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Validate the site map and print a summary
    Check,
    /// Run the terminal device simulator
    Simulate {
        /// Extra pages to offer in the picker (e.g. pages only covered by a pattern)
        #[arg(long = "page")]
        pages: Vec<String>,
    },
    /// Show the next planned reminders
    Reminders {
        #[arg(long)]
        json: bool,
        /// Device storage export (JSON); its saved schedule replaces [reminder]
        #[arg(long)]
        storage: Option<PathBuf>,
        /// Show where tapping a notification action ("start", "dismiss") leads
        #[arg(long)]
        tap: Option<String>,
    },
    /// Show which theme the app would start with
    Theme {
        /// Stored preference ("light" or "dark")
        #[arg(long)]
        saved: Option<String>,
        /// Device storage export (JSON) to read the saved theme from
        #[arg(long, conflicts_with = "saved")]
        storage: Option<PathBuf>,
        /// Pretend the system prefers dark mode
        #[arg(long)]
        system_dark: bool,
        /// Show the result of pressing the toggle once
        #[arg(long)]
        toggle: bool,
    },
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to waypoint.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("waypoint.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let resolved = load(&args)?;
    log::info!("Waypoint starting with exit policy {:?}", resolved.exit_policy);

    match args.command {
        Command::Resolve { path, history, json } => resolve(&resolved, &path, history, json),
        Command::Check => check(&resolved),
        Command::Simulate { pages } => tui::run(handler(&resolved)?, &pages),
        Command::Reminders { json, storage, tap } => match tap {
            Some(action_id) => tap_action(&resolved, &action_id),
            None => reminders(&resolved, json, storage.as_deref()),
        },
        Command::Theme {
            saved,
            storage,
            system_dark,
            toggle,
        } => {
            let saved = match storage {
                Some(path) => snapshot(&path)?.theme(),
                None => Theme::parse_saved(saved.as_deref()),
            };
            let mut theme = initial_theme(saved, system_dark);
            if toggle {
                theme = theme.toggled();
            }
            println!("{theme}");
            Ok(())
        }
    }
}

fn load(args: &Args) -> io::Result<ResolvedConfig> {
    let file = match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    }
    .map_err(|e| {
        log::error!("{e}");
        io::Error::other(e)
    })?;
    Ok(config::resolve(&file, args.exit_policy))
}

fn snapshot(path: &Path) -> io::Result<StorageSnapshot> {
    StorageSnapshot::load(path).map_err(|e| {
        log::error!("{e}");
        io::Error::other(e)
    })
}

fn handler(resolved: &ResolvedConfig) -> io::Result<BackButtonHandler> {
    BackButtonHandler::from_config(resolved).map_err(|e| {
        log::error!("Invalid site map: {e}");
        io::Error::other(e)
    })
}

fn resolve(resolved: &ResolvedConfig, raw: &str, history: usize, json: bool) -> io::Result<()> {
    let handler = handler(resolved)?;
    let path = normalize_path(raw);
    let resolution = handler.resolver().explain(&path, history);

    if json {
        let out = serde_json::to_string_pretty(&resolution).map_err(io::Error::other)?;
        println!("{out}");
    } else {
        println!("{path}: {} ({})", resolution.action, resolution.matched);
    }
    Ok(())
}

fn check(resolved: &ResolvedConfig) -> io::Result<()> {
    let handler = handler(resolved)?;
    let resolver = handler.resolver();
    let map = resolver.map();

    println!("Site map OK: {} pages, {} pattern rules", map.len(), resolver.rules().len());
    for (path, node) in map.iter() {
        let depth = map.depth(path).unwrap_or(0);
        match node {
            SiteNode::Terminal => println!("  {path}  (terminal)"),
            SiteNode::Parent(parent) => println!("  {path} → {parent}  [{depth} to exit]"),
        }
    }
    for (index, rule) in resolver.rules().iter().enumerate() {
        println!("  #{index} {:?} → {}", rule.predicate, rule.target);
    }
    let mut terminals: Vec<&str> = map.terminals().into_iter().collect();
    terminals.sort_unstable();
    println!("Exit pages: {}", terminals.join(", "));
    println!(
        "Root: {}  aliases: {}",
        resolver.settings().root_path,
        resolver.settings().root_aliases.join(", ")
    );
    Ok(())
}

fn reminders(resolved: &ResolvedConfig, json: bool, storage: Option<&Path>) -> io::Result<()> {
    let stored = match storage {
        Some(path) => snapshot(path)?.reminder_schedule().map_err(|e| {
            log::error!("{e}");
            io::Error::other(e)
        })?,
        None => None,
    };
    let Some(schedule) = stored.as_ref().or(resolved.reminder.as_ref()) else {
        println!("No reminder schedule configured ([reminder] in config)");
        return Ok(());
    };

    let now = chrono::Local::now().naive_local();
    let planned = schedule.plan(now).map_err(|e| {
        log::error!("Cannot plan reminders: {e}");
        io::Error::other(e)
    })?;

    if json {
        let out = serde_json::to_string_pretty(&planned).map_err(io::Error::other)?;
        println!("{out}");
        return Ok(());
    }

    for reminder in &planned {
        println!(
            "#{} {} {} (weekly, {})",
            reminder.id,
            reminder.weekday,
            reminder.at.format("%Y-%m-%d %H:%M"),
            reminder.channel_id
        );
    }
    if let Some(target) = NotificationAction::Start.target(&resolved.start_path) {
        println!("\"Start Test\" opens {target}");
    }
    Ok(())
}

fn tap_action(resolved: &ResolvedConfig, action_id: &str) -> io::Result<()> {
    let Some(action) = NotificationAction::from_id(action_id) else {
        return Err(io::Error::other(format!(
            "unknown notification action {action_id:?} (expected \"start\" or \"dismiss\")"
        )));
    };
    match action.target(&resolved.start_path) {
        Some(target) => println!("{action_id}: opens {target}"),
        None => println!("{action_id}: notification dismissed"),
    }
    Ok(())
}

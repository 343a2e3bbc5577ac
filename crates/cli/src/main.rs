use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use shelfmark_config::{Config, ConfigManager, ConfigSection, LogLevel};
use shelfmark_core::AppError;
use shelfmark_library::{Catalog, LibraryConfig};
use std::io::{self, Write};
use std::path::PathBuf;

mod commands;
mod menu;

use menu::Menu;

fn build_cli() -> Command {
    Command::new("shelfmark")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Shelfmark Contributors")
        .about("Keep track of a small book collection and who has borrowed what")
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .value_name("PATH")
                .help("Catalog file to use (overrides SHELFMARK_CATALOG and the config file)")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding config.toml")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More log output (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(Command::new("menu").about("Interactive menu (default)"))
        .subcommand(
            Command::new("add")
                .about("Add a book to the catalog")
                .arg(Arg::new("title").required(true).value_name("TITLE").help("Book title"))
                .arg(Arg::new("author").short('a').long("author").required(true).value_name("AUTHOR").help("Book author"))
                .arg(Arg::new("category").short('c').long("category").required(true).value_name("CATEGORY").help("Book category")),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove the first book with this title")
                .arg(Arg::new("title").required(true).value_name("TITLE").help("Book title")),
        )
        .subcommand(Command::new("list").about("List every book and its status"))
        .subcommand(
            Command::new("borrow")
                .about("Lend a book to a user")
                .arg(Arg::new("title").required(true).value_name("TITLE").help("Book title"))
                .arg(Arg::new("user").short('u').long("user").required(true).value_name("USER").help("Borrowing user ID")),
        )
        .subcommand(
            Command::new("return")
                .about("Return a borrowed book")
                .arg(Arg::new("title").required(true).value_name("TITLE").help("Book title"))
                .arg(Arg::new("user").short('u').long("user").required(true).value_name("USER").help("Returning user ID")),
        )
        .subcommand(
            Command::new("stats")
                .about("Show catalog statistics")
                .arg(Arg::new("json").long("json").help("Print as JSON").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("export")
                .about("Export the catalog as JSON")
                .arg(Arg::new("output").short('o').long("output").value_name("FILE").help("Output file path").default_value("catalog_export.json")),
        )
        .subcommand(
            Command::new("config")
                .about("Inspect or create the configuration file")
                .subcommand_required(true)
                .subcommand(Command::new("init").about("Write a default config.toml if none exists"))
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(Command::new("path").about("Print the config file location")),
        )
}

/// RUST_LOG wins, then -v, then the configured level
fn init_logging(configured: LogLevel, verbosity: u8) {
    let level = if verbosity > 0 {
        LogLevel::Warn.raised_by(verbosity)
    } else {
        configured
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.to_string()))
        .init();
}

/// `--catalog` replaces whatever the config (and SHELFMARK_CATALOG) chose
///
/// The storage section is checked after the override; the first problem
/// is returned, since writing with a bad placeholder would corrupt the file.
fn resolve_catalog(config: &Config, matches: &ArgMatches) -> Result<LibraryConfig, AppError> {
    let mut storage = config.storage.clone();
    if let Some(path) = matches.get_one::<PathBuf>("catalog") {
        storage.catalog_path = path.clone();
    }

    if let Err(problems) = storage.validate() {
        for problem in &problems {
            log::error!("Invalid setting: {}", problem);
        }
        if let Some(problem) = problems.into_iter().next() {
            return Err(AppError::InvalidConfiguration {
                setting: problem.field,
                value: problem.value.unwrap_or_default(),
                reason: problem.message,
            });
        }
    }

    Ok(LibraryConfig::from(&storage))
}

fn config_manager(matches: &ArgMatches) -> Result<ConfigManager> {
    match matches.get_one::<PathBuf>("config-dir") {
        Some(dir) => Ok(ConfigManager::with_directory(dir.clone())),
        None => ConfigManager::new().context("Failed to locate configuration directory"),
    }
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let manager = config_manager(&matches)?;
    let config = manager
        .load_with_env_overrides()
        .context("Failed to load configuration")?;

    init_logging(config.app.log_level, matches.get_count("verbose"));
    if config.is_newer_format() {
        log::warn!(
            "{} was written by a newer release (version {}); unknown settings are ignored",
            manager.config_path().display(),
            config.version
        );
    }
    if !config.app.color_output {
        console::set_colors_enabled(false);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(("config", sub_matches)) = matches.subcommand() {
        return commands::config_command(&manager, sub_matches, &mut out);
    }

    let library_config = resolve_catalog(&config, &matches).context("Unusable catalog location")?;
    log::debug!("Using catalog {}", library_config.catalog_path.display());
    let (mut catalog, report) = Catalog::open(&library_config);

    match matches.subcommand() {
        None | Some(("menu", _)) => {
            writeln!(out, "{}", report.summary())?;
            Menu::new(io::stdin().lock(), &mut out)
                .run(&mut catalog)
                .context("Menu input/output failed")
        }
        subcommand => commands::dispatch(&mut catalog, &report, subcommand, &mut out),
    }
}

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use console::style;
use shelfmark_config::ConfigManager;
use shelfmark_core::{AppError, BookRecord, Validator, FIELD_DELIMITER};
use shelfmark_library::{Catalog, LoadReport, Receipt};
use std::io::Write;

/// Runs one non-interactive catalog subcommand
pub fn dispatch<W: Write>(
    catalog: &mut Catalog,
    report: &LoadReport,
    subcommand: Option<(&str, &ArgMatches)>,
    out: &mut W,
) -> Result<()> {
    if let Some(error) = &report.error {
        writeln!(out, "{} {}", style("!").yellow().bold(), error.user_message())?;
    }

    match subcommand {
        Some(("add", sub_matches)) => add_book(catalog, sub_matches, out),
        Some(("remove", sub_matches)) => remove_book(catalog, sub_matches, out),
        Some(("list", _)) => list_books(catalog, out),
        Some(("borrow", sub_matches)) => borrow_book(catalog, sub_matches, out),
        Some(("return", sub_matches)) => return_book(catalog, sub_matches, out),
        Some(("stats", sub_matches)) => show_stats(catalog, sub_matches.get_flag("json"), out),
        Some(("export", sub_matches)) => export_catalog(catalog, sub_matches, out),
        Some((name, _)) => bail!("Unsupported command: {}", name),
        None => bail!("No command given"),
    }
}

/// Add a book to the catalog
pub fn add_book<W: Write>(catalog: &mut Catalog, matches: &ArgMatches, out: &mut W) -> Result<()> {
    let title = required(matches, "title")?;
    let author = required(matches, "author")?;
    let category = required(matches, "category")?;

    match checked_record(title, author, category) {
        Ok(record) => print_receipt(out, &catalog.add_record(record)),
        Err(e) => print_rejection(out, &e),
    }
}

/// Remove a book from the catalog
pub fn remove_book<W: Write>(catalog: &mut Catalog, matches: &ArgMatches, out: &mut W) -> Result<()> {
    let title = required(matches, "title")?;
    print_receipt(out, &catalog.remove_book(title.trim()))
}

/// List all books in the catalog
pub fn list_books<W: Write>(catalog: &Catalog, out: &mut W) -> Result<()> {
    if !catalog.is_empty() {
        writeln!(out, "\n{} Books in Catalog", style(catalog.len()).bold().cyan())?;
        writeln!(out, "{}", "=".repeat(60))?;
    }

    for line in catalog.list_books() {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

pub fn borrow_book<W: Write>(catalog: &mut Catalog, matches: &ArgMatches, out: &mut W) -> Result<()> {
    let title = required(matches, "title")?;
    let user = required(matches, "user")?;

    match checked_user(user) {
        Ok(user) => print_receipt(out, &catalog.borrow_book(title.trim(), user)),
        Err(e) => print_rejection(out, &e),
    }
}

pub fn return_book<W: Write>(catalog: &mut Catalog, matches: &ArgMatches, out: &mut W) -> Result<()> {
    let title = required(matches, "title")?;
    let user = required(matches, "user")?;

    match checked_user(user) {
        Ok(user) => print_receipt(out, &catalog.return_book(title.trim(), user)),
        Err(e) => print_rejection(out, &e),
    }
}

/// Show catalog statistics
pub fn show_stats<W: Write>(catalog: &Catalog, json: bool, out: &mut W) -> Result<()> {
    let stats = catalog.stats();

    if json {
        let text = serde_json::to_string_pretty(&stats).context("Failed to serialize statistics")?;
        writeln!(out, "{}", text)?;
        return Ok(());
    }

    writeln!(out, "\n{}", style("Catalog Statistics").bold().cyan())?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "{}", stats)?;
    Ok(())
}

/// Export the catalog as JSON
pub fn export_catalog<W: Write>(catalog: &Catalog, matches: &ArgMatches, out: &mut W) -> Result<()> {
    let output = required(matches, "output")?;

    let count = catalog
        .export_json(output)
        .with_context(|| format!("Failed to export catalog to {}", output))?;

    writeln!(out, "{} Exported {} books to {}", style("✓").green().bold(), count, output)?;
    Ok(())
}

/// `config init|show|path`
pub fn config_command<W: Write>(manager: &ConfigManager, matches: &ArgMatches, out: &mut W) -> Result<()> {
    let path = manager.config_path();

    match matches.subcommand() {
        Some(("init", _)) => {
            if manager.initialize().context("Failed to write default configuration")? {
                writeln!(out, "{} Created {}", style("✓").green().bold(), path.display())?;
            } else {
                writeln!(out, "Config file already exists at {}", path.display())?;
            }
        }
        Some(("show", _)) => {
            let config = manager
                .load_with_env_overrides()
                .context("Failed to load configuration")?;
            let text = toml::to_string_pretty(&config).context("Failed to render configuration")?;
            write!(out, "{}", text)?;
            for problem in config.validate().err().unwrap_or_default() {
                writeln!(out, "{} {}", style("!").yellow().bold(), problem)?;
            }
        }
        Some(("path", _)) => writeln!(out, "{}", path.display())?,
        Some((name, _)) => bail!("Unsupported config command: {}", name),
        None => bail!("No config command given"),
    }

    Ok(())
}

/// Builds a record from user input, refusing values the storage file cannot hold
pub fn checked_record(title: &str, author: &str, category: &str) -> Result<BookRecord, AppError> {
    let record = BookRecord::new(title.trim(), author.trim(), category.trim());

    record
        .validate()
        .map_err(|errors| AppError::InvalidArgument {
            argument: "book".to_string(),
            reason: errors.join("; "),
        })?;

    Ok(record)
}

/// Trims a user ID and rejects IDs the storage file cannot hold
pub fn checked_user(user: &str) -> Result<&str, AppError> {
    let user = user.trim();

    let reason = if user.is_empty() {
        "cannot be empty".to_string()
    } else if user.contains(FIELD_DELIMITER) {
        format!("cannot contain '{}'", FIELD_DELIMITER)
    } else if user.contains(['\n', '\r']) {
        "cannot contain line breaks".to_string()
    } else {
        return Ok(user);
    };

    Err(AppError::InvalidArgument {
        argument: "user ID".to_string(),
        reason,
    })
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("{} is required", id))
}

fn print_receipt<W: Write>(out: &mut W, receipt: &Receipt) -> Result<()> {
    let marker = if receipt.is_success() {
        style("✓").green().bold()
    } else {
        style("✗").red().bold()
    };
    writeln!(out, "{} {}", marker, receipt.status_line())?;

    if let Some(warning) = receipt.warning() {
        writeln!(out, "{}", style(warning).yellow())?;
    }
    Ok(())
}

fn print_rejection<W: Write>(out: &mut W, error: &AppError) -> Result<()> {
    writeln!(out, "{} {}", style("✗").red().bold(), error.user_message())?;
    Ok(())
}

#[cfg(test)]
mod tests;

use super::*;
use crate::{build_cli, resolve_catalog};
use shelfmark_config::Config;
use shelfmark_library::LibraryConfig;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn setup_catalog() -> (Catalog, LoadReport, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = LibraryConfig::new(temp_dir.path().join("books.txt"));
    let (catalog, report) = Catalog::open(&config);
    (catalog, report, temp_dir)
}

fn run(catalog: &mut Catalog, report: &LoadReport, args: &[&str]) -> Result<String> {
    let matches = build_cli().try_get_matches_from(std::iter::once("shelfmark").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    dispatch(catalog, report, matches.subcommand(), &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_add_and_list() -> Result<()> {
    let (mut catalog, report, _temp) = setup_catalog();

    let output = run(&mut catalog, &report, &["add", "Dune", "-a", "Herbert", "-c", "SciFi"])?;
    assert!(output.contains("Book 'Dune' added to the catalog."));

    let output = run(&mut catalog, &report, &["list"])?;
    assert!(output.contains("Dune by Herbert [SciFi] (Available)"));
    Ok(())
}

#[test]
fn test_list_empty() -> Result<()> {
    let (mut catalog, report, _temp) = setup_catalog();
    let output = run(&mut catalog, &report, &["list"])?;
    assert_eq!(output.trim(), "No books are available in the catalog.");
    Ok(())
}

#[test]
fn test_add_requires_author_and_category() {
    assert!(build_cli().try_get_matches_from(["shelfmark", "add", "Dune"]).is_err());
    assert!(build_cli()
        .try_get_matches_from(["shelfmark", "add", "Dune", "-a", "Herbert"])
        .is_err());
}

#[test]
fn test_add_rejects_delimiter() -> Result<()> {
    let (mut catalog, report, _temp) = setup_catalog();

    let output = run(&mut catalog, &report, &["add", "Dune, Part One", "-a", "Herbert", "-c", "SciFi"])?;
    assert!(output.contains("Invalid book: Title cannot contain ','"));
    assert!(catalog.is_empty());
    Ok(())
}

#[test]
fn test_borrow_and_return_flow() -> Result<()> {
    let (mut catalog, report, _temp) = setup_catalog();
    let _ = catalog.add_book("Dune", "Herbert", "SciFi");

    let output = run(&mut catalog, &report, &["borrow", "DUNE", "-u", "u1"])?;
    assert!(output.contains("u1 borrowed 'Dune'."));

    let output = run(&mut catalog, &report, &["borrow", "Dune", "--user", "u2"])?;
    assert!(output.contains("Sorry, 'Dune' is already borrowed by u1."));

    let output = run(&mut catalog, &report, &["return", "Dune", "-u", "u2"])?;
    assert!(output.contains("u2 cannot return 'Dune': it is not borrowed by them."));

    let output = run(&mut catalog, &report, &["return", "dune", "-u", "u1"])?;
    assert!(output.contains("u1 returned 'Dune'."));
    assert!(!catalog.records()[0].is_borrowed());
    Ok(())
}

#[test]
fn test_rejections_are_not_errors() -> Result<()> {
    let (mut catalog, report, _temp) = setup_catalog();

    let output = run(&mut catalog, &report, &["borrow", "Missing", "-u", "u1"])?;
    assert!(output.contains("Book 'Missing' is not in the catalog."));

    let output = run(&mut catalog, &report, &["remove", "Missing"])?;
    assert!(output.contains("Book 'Missing' removed."));
    Ok(())
}

#[test]
fn test_borrow_rejects_bad_user() -> Result<()> {
    let (mut catalog, report, _temp) = setup_catalog();
    let _ = catalog.add_book("Dune", "Herbert", "SciFi");

    let output = run(&mut catalog, &report, &["borrow", "Dune", "-u", "a,b"])?;
    assert!(output.contains("Invalid user ID: cannot contain ','."));
    assert!(!catalog.records()[0].is_borrowed());
    Ok(())
}

#[test]
fn test_stats_json() -> Result<()> {
    let (mut catalog, report, _temp) = setup_catalog();
    let _ = catalog.add_book("Dune", "Herbert", "SciFi");
    let _ = catalog.add_book("Emma", "Austen", "Classic");
    let _ = catalog.borrow_book("Emma", "u1");

    let output = run(&mut catalog, &report, &["stats", "--json"])?;
    let value: serde_json::Value = serde_json::from_str(&output)?;
    assert_eq!(value["total"], 2);
    assert_eq!(value["borrowed"], 1);
    assert_eq!(value["borrowers"], 1);

    let output = run(&mut catalog, &report, &["stats"])?;
    assert!(output.contains("Total Books: 2"));
    Ok(())
}

#[test]
fn test_export() -> Result<()> {
    let (mut catalog, report, temp) = setup_catalog();
    let _ = catalog.add_book("Dune", "Herbert", "SciFi");
    let target = temp.path().join("out.json");
    let target_arg = target.to_string_lossy().to_string();

    let output = run(&mut catalog, &report, &["export", "-o", &target_arg])?;
    assert!(output.contains("Exported 1 books"));

    let exported: Vec<BookRecord> = serde_json::from_str(&fs::read_to_string(&target)?)?;
    assert_eq!(exported, catalog.records());
    Ok(())
}

#[test]
fn test_load_error_is_reported_before_command() -> Result<()> {
    let temp_dir = TempDir::new()?;
    // Reading a directory as the catalog fails
    let (mut catalog, report) = Catalog::open(&LibraryConfig::new(temp_dir.path()));
    assert!(report.error.is_some());

    let output = run(&mut catalog, &report, &["list"])?;
    assert!(output.contains("could not be read"));
    assert!(output.contains("No books are available in the catalog."));
    Ok(())
}

#[test]
fn test_config_path_and_init() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path());

    let matches = build_cli().try_get_matches_from(["shelfmark", "config", "path"])?;
    let (_, sub_matches) = matches.subcommand().ok_or_else(|| anyhow::anyhow!("no subcommand"))?;
    let mut out = Vec::new();
    config_command(&manager, sub_matches, &mut out)?;
    assert!(String::from_utf8(out)?.trim().ends_with("config.toml"));

    let matches = build_cli().try_get_matches_from(["shelfmark", "config", "init"])?;
    let (_, sub_matches) = matches.subcommand().ok_or_else(|| anyhow::anyhow!("no subcommand"))?;
    let mut out = Vec::new();
    config_command(&manager, sub_matches, &mut out)?;
    assert!(String::from_utf8(out)?.contains("Created"));
    assert!(manager.config_path().exists());

    let mut out = Vec::new();
    config_command(&manager, sub_matches, &mut out)?;
    assert!(String::from_utf8(out)?.contains("already exists"));
    Ok(())
}

#[test]
fn test_config_requires_subcommand() {
    assert!(build_cli().try_get_matches_from(["shelfmark", "config"]).is_err());
}

#[test]
fn test_catalog_flag_overrides_config() -> Result<()> {
    let matches = build_cli().try_get_matches_from(["shelfmark", "--catalog", "/tmp/other.txt", "list"])?;
    let resolved = resolve_catalog(&Config::default(), &matches)?;
    assert_eq!(resolved.catalog_path, PathBuf::from("/tmp/other.txt"));

    let matches = build_cli().try_get_matches_from(["shelfmark", "list"])?;
    let mut config = Config::default();
    config.storage.catalog_path = PathBuf::from("/srv/books.txt");
    config.storage.borrower_placeholder = "-".to_string();
    let resolved = resolve_catalog(&config, &matches)?;
    assert_eq!(resolved.catalog_path, PathBuf::from("/srv/books.txt"));
    assert_eq!(resolved.borrower_placeholder, "-");
    Ok(())
}

#[test]
fn test_catalog_directory_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dir_arg = temp_dir.path().to_string_lossy().to_string();
    let matches = build_cli().try_get_matches_from(["shelfmark", "--catalog", dir_arg.as_str()])?;

    let err = resolve_catalog(&Config::default(), &matches).unwrap_err();
    assert!(err.is_critical());
    Ok(())
}

#[test]
fn test_bad_placeholder_is_rejected_at_startup() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let matches = build_cli().try_get_matches_from(["shelfmark", "list"])?;

    for placeholder in ["no,one", "", "no\none"] {
        let mut config = Config::default();
        config.storage.catalog_path = temp_dir.path().join("books.txt");
        config.storage.borrower_placeholder = placeholder.to_string();

        let err = resolve_catalog(&config, &matches).unwrap_err();
        assert!(err.is_critical(), "accepted {:?}", placeholder);
        assert!(matches!(
            &err,
            AppError::InvalidConfiguration { setting, .. } if setting == "storage.borrower_placeholder"
        ));
    }
    Ok(())
}

#[test]
fn test_config_show_reports_problems() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path());
    fs::write(manager.config_path(), "[storage]\nborrower_placeholder = \"a,b\"\n")?;

    let matches = build_cli().try_get_matches_from(["shelfmark", "config", "show"])?;
    let (_, sub_matches) = matches.subcommand().ok_or_else(|| anyhow::anyhow!("no subcommand"))?;
    let mut out = Vec::new();
    config_command(&manager, sub_matches, &mut out)?;
    assert!(String::from_utf8(out)?.contains("storage.borrower_placeholder must not contain ','"));
    Ok(())
}

#[test]
fn test_checked_user_trims() {
    assert_eq!(checked_user("  u1 ").unwrap(), "u1");
    assert!(checked_user("").is_err());
}

#[test]
fn test_checked_user_rejects_line_breaks() {
    let err = checked_user("u1\nu2").unwrap_err();
    assert_eq!(err.user_message(), "Invalid user ID: cannot contain line breaks.");
    assert!(checked_user("u1\r").is_err());
}

#[test]
fn test_add_rejects_line_break_in_title() -> Result<()> {
    let (mut catalog, report, temp) = setup_catalog();

    let output = run(&mut catalog, &report, &["add", "Du\nne", "-a", "Herbert", "-c", "SciFi"])?;
    assert!(output.contains("Title cannot contain line breaks"));
    assert!(catalog.is_empty());
    assert!(!temp.path().join("books.txt").exists());
    Ok(())
}

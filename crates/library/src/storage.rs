//! Scoped access to the catalog file
//!
//! Every read and write opens the file, works through it completely and
//! closes it on drop, including on error paths. Writes truncate in place;
//! a failure midway can leave the file shorter than the in-memory catalog.
//!
//! Lines that are not valid UTF-8 are decoded lossily rather than failing
//! the read, so one bad byte never hides the records after it.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Handle on the catalog file location
#[derive(Debug, Clone)]
pub struct CatalogFile {
    path: PathBuf,
}

impl CatalogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the file for line-by-line reading.
    ///
    /// Returns `Ok(None)` when the file does not exist. Items are `Err` only
    /// for I/O failures; `\n` and `\r\n` endings are both stripped.
    pub fn read_lines(&self) -> io::Result<Option<impl Iterator<Item = io::Result<String>>>> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(
                BufReader::new(file)
                    .split(b'\n')
                    .map(|line| line.map(line_text)),
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Replaces the file contents with `lines`, one per line.
    ///
    /// Creates the parent directory if needed.
    pub fn write_lines<I, S>(&self, lines: I) -> io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                log::info!("Created catalog directory: {}", parent.display());
            }
        }

        let mut writer = BufWriter::new(File::create(&self.path)?);
        for line in lines {
            writer.write_all(line.as_ref().as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }
}

fn line_text(mut bytes: Vec<u8>) -> String {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    String::from_utf8(bytes).unwrap_or_else(|e| {
        let text = String::from_utf8_lossy(e.as_bytes()).into_owned();
        log::debug!("Replaced invalid UTF-8 in catalog line: {}", text);
        text
    })
}

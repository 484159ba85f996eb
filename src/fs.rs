//! Whole-file reading and writing.
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::bibliography::Bibliography;
use crate::config::Config;
use crate::error::Error;

/// Read the entire file. Parsing never begins before the whole input is in memory.
pub fn read<P: AsRef<Path>>(path: P) -> io::Result<String> {
    fs::read_to_string(path)
}

/// The path `<path>.bak`.
pub fn backup_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut name = path.as_ref().as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Write `contents` to `path`. If `backup` is set and the file already exists, it is first copied
/// to [`backup_path`], and the backup location is returned.
pub fn write<P: AsRef<Path>>(path: P, contents: &str, backup: bool) -> io::Result<Option<PathBuf>> {
    let path = path.as_ref();
    let saved = if backup && path.is_file() {
        let target = backup_path(path);
        fs::copy(path, &target)?;
        tracing::debug!(path = %path.display(), backup = %target.display(), "saved backup");
        Some(target)
    } else {
        None
    };
    fs::write(path, contents)?;
    Ok(saved)
}

/// Failure to load a bibliography from disk.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Parse(Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => err.fmt(f),
            LoadError::Parse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            LoadError::Parse(err) => Some(err),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<Error> for LoadError {
    fn from(err: Error) -> Self {
        LoadError::Parse(err)
    }
}

impl Bibliography {
    /// Read and parse a whole file.
    pub fn from_path<P: AsRef<Path>>(path: P, config: &Config) -> Result<Self, LoadError> {
        let input = read(path)?;
        Ok(Self::parse_with(&input, config)?)
    }

    /// Write the full text to `path`, optionally backing up the existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P, backup: bool) -> io::Result<Option<PathBuf>> {
        write(path, &self.serialize(), backup)
    }
}

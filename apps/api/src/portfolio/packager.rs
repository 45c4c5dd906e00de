//! Packager — writes the three site files plus `website.zip` to the output
//! directory and returns the archive bytes.
//!
//! The archive is built in memory first and every file is staged as a temp file
//! in the output directory before any of them is renamed into place. Files being
//! replaced are moved aside first and restored if a later rename fails, so the
//! directory holds either the whole new set or the whole previous one.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::warn;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::models::site::SiteAssets;

pub const ARCHIVE_FILE: &str = "website.zip";
/// File name offered to the browser for the download.
pub const DOWNLOAD_NAME: &str = "portfolio_website.zip";

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl From<tempfile::PersistError> for PackageError {
    fn from(err: tempfile::PersistError) -> Self {
        PackageError::Io(err.error)
    }
}

#[derive(Debug, Clone)]
pub struct Packager {
    output_dir: PathBuf,
}

impl Packager {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn archive_path(&self) -> PathBuf {
        self.output_dir.join(ARCHIVE_FILE)
    }

    /// Writes index.html, style.css, script.js and website.zip, replacing any
    /// previous run's files. Returns the archive bytes.
    pub fn package(&self, assets: &SiteAssets) -> Result<Vec<u8>, PackageError> {
        let archive = build_archive(assets)?;

        std::fs::create_dir_all(&self.output_dir)?;

        let mut staged = Vec::with_capacity(4);
        for (name, contents) in assets.files() {
            staged.push((self.stage(contents.as_bytes())?, name));
        }
        staged.push((self.stage(&archive)?, ARCHIVE_FILE));

        // Previous files are parked here until the whole set is in place.
        let backups = tempfile::Builder::new()
            .prefix(".folio-backup")
            .tempdir_in(&self.output_dir)?;

        let mut replaced = Vec::with_capacity(staged.len());
        for (tmp, name) in staged {
            match self.replace(tmp, name, backups.path()) {
                Ok(done) => replaced.push(done),
                Err(e) => {
                    rollback(replaced);
                    return Err(e);
                }
            }
        }

        Ok(archive)
    }

    /// Moves an existing regular file at `name` into `backup_dir`, then renames the
    /// staged file over it. The old file is put back if the rename fails.
    fn replace(
        &self,
        tmp: NamedTempFile,
        name: &str,
        backup_dir: &Path,
    ) -> Result<Replaced, PackageError> {
        let target = self.output_dir.join(name);
        let backup = match std::fs::symlink_metadata(&target) {
            Ok(meta) if meta.is_file() => {
                let backup = backup_dir.join(name);
                std::fs::rename(&target, &backup)?;
                Some(backup)
            }
            _ => None,
        };

        if let Err(e) = tmp.persist(&target) {
            if let Some(backup) = &backup {
                restore(backup, &target);
            }
            return Err(e.into());
        }

        Ok(Replaced { target, backup })
    }

    /// Reads back the archive written by the most recent run, if any.
    pub async fn read_archive(&self) -> Result<Option<Vec<u8>>, PackageError> {
        match tokio::fs::read(self.archive_path()).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn stage(&self, bytes: &[u8]) -> Result<NamedTempFile, PackageError> {
        let mut tmp = NamedTempFile::new_in(&self.output_dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        Ok(tmp)
    }
}

/// A target already swapped in, with the file it displaced (if any).
struct Replaced {
    target: PathBuf,
    backup: Option<PathBuf>,
}

/// Undoes completed replacements, newest first.
fn rollback(replaced: Vec<Replaced>) {
    for Replaced { target, backup } in replaced.into_iter().rev() {
        match backup {
            Some(backup) => restore(&backup, &target),
            None => {
                if let Err(e) = std::fs::remove_file(&target) {
                    warn!("Failed to remove {} during rollback: {e}", target.display());
                }
            }
        }
    }
}

fn restore(backup: &Path, target: &Path) {
    if let Err(e) = std::fs::rename(backup, target) {
        warn!("Failed to restore {} during rollback: {e}", target.display());
    }
}

/// Zips the three assets under their conventional names.
pub fn build_archive(assets: &SiteAssets) -> Result<Vec<u8>, PackageError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, contents) in assets.files() {
        zip.start_file(name, options)?;
        zip.write_all(contents.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

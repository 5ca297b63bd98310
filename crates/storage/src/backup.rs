// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pre-deploy backups.
//!
//! Before pending migrations run, the coordinator copies the database with
//! `VACUUM INTO`, optionally compresses it with zstd, and moves it into the
//! backup directory atomically. Older backups beyond the retention count are
//! pruned. A failed backup never blocks the deploy: it is logged and
//! reported as [`BackupOutcome::Failed`].

use crate::{Store, StoreError};
use chrono::{DateTime, NaiveDateTime, Utc};
use keel_core::Clock;
use rusqlite::params;
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Backups retained per database.
pub const DEFAULT_KEEP: usize = 5;

const COMPRESSION_LEVEL: i32 = 3;
const SUFFIX: &str = "-pre-deploy.db";
const COMPRESSED_EXT: &str = ".zst";
const STAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const STAMP_LEN: usize = "20260101T000000Z".len();

/// Errors from taking a backup
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Compression error: {0}")]
    Compress(String),
}

/// A backup written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Backup {
    /// File name, unique within the backup directory
    pub id: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub compressed: bool,
    pub created_at: DateTime<Utc>,
}

/// What happened to the pre-deploy backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BackupOutcome {
    /// The database had no migration history, so there was nothing to protect.
    Skipped,
    Created(Backup),
    /// The backup failed; the deploy continues without one.
    Failed { reason: String },
}

/// Filesystem operations behind a backup, abstracted for tests.
pub trait BackupWriter: Send + Sync {
    /// Compress `from` into a new file at `to`.
    fn compress(&self, from: &Path, to: &Path) -> Result<(), BackupError>;

    /// Fsync a file so its contents are durable.
    fn fsync_file(&self, path: &Path) -> Result<(), BackupError>;

    /// Atomically move a finished file into place.
    fn rename(&self, from: &Path, to: &Path) -> Result<(), BackupError>;

    /// Fsync a directory so a rename in it is durable.
    fn fsync_dir(&self, path: &Path) -> Result<(), BackupError>;

    fn file_size(&self, path: &Path) -> Result<u64, BackupError>;
}

/// Backup writer using the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsBackupWriter;

impl BackupWriter for FsBackupWriter {
    fn compress(&self, from: &Path, to: &Path) -> Result<(), BackupError> {
        let source = File::open(from)?;
        let target = File::create(to)?;
        zstd::stream::copy_encode(source, target, COMPRESSION_LEVEL)
            .map_err(|e| BackupError::Compress(e.to_string()))
    }

    fn fsync_file(&self, path: &Path) -> Result<(), BackupError> {
        File::open(path)?.sync_all()?;
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), BackupError> {
        fs::rename(from, to)?;
        Ok(())
    }

    fn fsync_dir(&self, path: &Path) -> Result<(), BackupError> {
        File::open(path)?.sync_all()?;
        Ok(())
    }

    fn file_size(&self, path: &Path) -> Result<u64, BackupError> {
        Ok(fs::metadata(path)?.len())
    }
}

/// Takes and prunes pre-deploy backups in one directory.
pub struct BackupCoordinator<C: Clock, W: BackupWriter = FsBackupWriter> {
    dir: PathBuf,
    clock: C,
    writer: W,
    compress: bool,
    keep: usize,
}

impl<C: Clock> BackupCoordinator<C> {
    pub fn new(dir: impl Into<PathBuf>, clock: C) -> Self {
        Self::with_writer(dir, clock, FsBackupWriter)
    }
}

impl<C: Clock, W: BackupWriter> BackupCoordinator<C, W> {
    pub fn with_writer(dir: impl Into<PathBuf>, clock: C, writer: W) -> Self {
        Self {
            dir: dir.into(),
            clock,
            writer,
            compress: false,
            keep: DEFAULT_KEEP,
        }
    }

    /// Compress backups with zstd.
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Number of backups to retain; at least one is always kept.
    pub fn keep(mut self, keep: usize) -> Self {
        self.keep = keep.max(1);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Back up the store unless it has no applied migrations yet.
    ///
    /// `migration_count` is the number of migrations already in the ledger.
    pub fn backup_if_needed(&self, store: &Store, migration_count: usize) -> BackupOutcome {
        if migration_count == 0 {
            return BackupOutcome::Skipped;
        }
        match self.snapshot(store) {
            Ok(backup) => BackupOutcome::Created(backup),
            Err(e) => {
                warn!(
                    error = %e,
                    dir = %self.dir.display(),
                    "pre-deploy backup failed, continuing without one",
                );
                BackupOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Write a backup of `store` unconditionally.
    pub fn snapshot(&self, store: &Store) -> Result<Backup, BackupError> {
        fs::create_dir_all(&self.dir)?;

        let created_at = self.clock.now();
        let stem = backup_stem(store);
        let path = self.unused_path(&stem, created_at);
        let id = file_name(&path);

        let raw_tmp = self.dir.join(format!(".{id}.raw.tmp"));
        let tmp = self.dir.join(format!(".{id}.tmp"));
        remove_if_exists(&raw_tmp)?;
        remove_if_exists(&tmp)?;

        let raw_str = raw_tmp.to_string_lossy().into_owned();
        store
            .connection()
            .execute("VACUUM INTO ?1", params![raw_str])
            .map_err(StoreError::from)?;

        let result = self.finish(&raw_tmp, &tmp, &path);
        // Leftover temporaries are harmless but untidy
        let _ = remove_if_exists(&raw_tmp);
        let _ = remove_if_exists(&tmp);
        let size_bytes = result?;

        let backup = Backup {
            id,
            path,
            size_bytes,
            compressed: self.compress,
            created_at,
        };
        info!(
            path = %backup.path.display(),
            size_bytes = backup.size_bytes,
            compressed = backup.compressed,
            "wrote pre-deploy backup",
        );

        if let Err(e) = self.prune(&stem) {
            warn!(error = %e, dir = %self.dir.display(), "failed to prune old backups");
        }
        Ok(backup)
    }

    /// Backups of databases named `stem`, newest first.
    pub fn list(&self, stem: &str) -> Result<Vec<PathBuf>, BackupError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut found = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(key) = backup_key(&name, stem) {
                found.push((key, entry.path()));
            }
        }
        found.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(found.into_iter().map(|(_, path)| path).collect())
    }

    /// Remove all but the newest `keep` backups of `stem`.
    pub fn prune(&self, stem: &str) -> Result<usize, BackupError> {
        let mut removed = 0;
        for old in self.list(stem)?.into_iter().skip(self.keep) {
            fs::remove_file(&old)?;
            info!(path = %old.display(), "pruned old backup");
            removed += 1;
        }
        Ok(removed)
    }

    fn finish(&self, raw_tmp: &Path, tmp: &Path, path: &Path) -> Result<u64, BackupError> {
        let staged = if self.compress {
            self.writer.compress(raw_tmp, tmp)?;
            tmp
        } else {
            raw_tmp
        };
        self.writer.fsync_file(staged)?;
        self.writer.rename(staged, path)?;
        self.writer.fsync_dir(&self.dir)?;
        self.writer.file_size(path)
    }

    fn unused_path(&self, stem: &str, at: DateTime<Utc>) -> PathBuf {
        let stamp = at.format(STAMP_FORMAT);
        let ext = if self.compress { COMPRESSED_EXT } else { "" };
        let candidate = self.dir.join(format!("{stem}-{stamp}{SUFFIX}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
        let mut n = 2u32;
        loop {
            let candidate = self.dir.join(format!("{stem}-{stamp}-{n}{SUFFIX}{ext}"));
            if !candidate.exists() {
                return candidate;
            }
            n += 1;
        }
    }
}

/// File stem backups of `store` are named after.
pub fn backup_stem(store: &Store) -> String {
    store
        .path()
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "memory".to_string())
}

/// Creation stamp and same-second sequence of a backup named after `stem`.
///
/// Accepts only `<stem>-<stamp>[-N]-pre-deploy.db[.zst]`, so a sibling
/// database such as `keel-2` never matches `keel`.
fn backup_key(name: &str, stem: &str) -> Option<(NaiveDateTime, u32)> {
    let rest = name.strip_prefix(stem)?.strip_prefix('-')?;
    let rest = rest.strip_suffix(COMPRESSED_EXT).unwrap_or(rest);
    let body = rest.strip_suffix(SUFFIX)?;
    let stamp = body.get(..STAMP_LEN)?;
    let created = NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).ok()?;
    let seq = match body.get(STAMP_LEN..)? {
        "" => 1,
        tail => {
            let n = tail.strip_prefix('-')?;
            if !n.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            n.parse().ok()?
        }
    };
    Some((created, seq))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "backup_tests.rs"]
mod tests;

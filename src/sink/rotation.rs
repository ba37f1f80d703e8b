//! Rotating file writer.
//!
//! # Responsibilities
//! - Append records to `<path>.<YYYYmmddHH>`, one file per rotation interval
//! - Start a new generation `<path>.<stamp>.<n>` when the size limit is hit
//! - Keep `<path>` as a symlink to the active file (unix)
//! - Remove files older than the retention window on rotation
//!
//! # Design Decisions
//! - Stamps are the UTC start of the interval, so names are stable across restarts
//! - Each record is a single `write_all` on an unbuffered append handle
//! - Retention and link failures are reported, never returned to the log call

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::sink::LogWriter;

/// Default retention, in days.
pub const DEFAULT_MAX_AGE_DAYS: u32 = 7;
/// Default rotation interval, in hours.
pub const DEFAULT_ROTATION_INTERVAL_HOURS: u32 = 6;
/// Default size limit, in megabytes.
pub const DEFAULT_ROTATION_SIZE_MB: u64 = 100;

/// Parameters for a rotating file writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationConfig {
    /// Base path; rotated files are named `<file_path>.<stamp>`.
    pub file_path: PathBuf,

    /// Files older than this are removed. 0 keeps files forever.
    pub max_age_days: u32,

    /// Length of a rotation interval.
    pub rotation_interval_hours: u32,

    /// Size at which a new generation is started. Must be non-zero.
    pub max_size_bytes: u64,
}

impl RotationConfig {
    /// Config for `file_path` with the default retention and limits.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            rotation_interval_hours: DEFAULT_ROTATION_INTERVAL_HOURS,
            max_size_bytes: DEFAULT_ROTATION_SIZE_MB * 1024 * 1024,
        }
    }

    fn interval_secs(&self) -> i64 {
        i64::from(self.rotation_interval_hours.max(1)) * 3600
    }

    fn bucket_for(&self, now: DateTime<Utc>) -> i64 {
        let secs = now.timestamp();
        secs - secs.rem_euclid(self.interval_secs())
    }

    fn path_for(&self, bucket: i64, generation: u32) -> PathBuf {
        let stamp = DateTime::<Utc>::from_timestamp(bucket, 0)
            .unwrap_or_default()
            .format("%Y%m%d%H");
        let mut name = self.file_path.clone().into_os_string();
        name.push(format!(".{stamp}"));
        if generation > 0 {
            name.push(format!(".{generation}"));
        }
        PathBuf::from(name)
    }
}

struct ActiveFile {
    file: File,
    path: PathBuf,
    bucket: i64,
    generation: u32,
    size: u64,
}

/// A `LogWriter` that rotates by time and size.
pub struct RotatingFileWriter {
    config: RotationConfig,
    active: Mutex<ActiveFile>,
}

impl RotatingFileWriter {
    /// Open the writer, creating parent directories as needed.
    ///
    /// Fails with `InvalidInput` when `max_size_bytes` is zero.
    pub fn new(config: RotationConfig) -> io::Result<Self> {
        Self::new_at(config, Utc::now())
    }

    pub(crate) fn new_at(config: RotationConfig, now: DateTime<Utc>) -> io::Result<Self> {
        if config.max_size_bytes == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "rotation size limit must be greater than zero",
            ));
        }
        if let Some(parent) = config.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let active = open_active(&config, config.bucket_for(now), 0)?;
        update_link(&config.file_path, &active.path);

        tracing::debug!(
            path = %active.path.display(),
            "Opened rotating log file"
        );

        Ok(Self {
            config,
            active: Mutex::new(active),
        })
    }

    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    /// Path of the file currently written to.
    pub fn current_path(&self) -> PathBuf {
        self.active.lock().path.clone()
    }

    pub(crate) fn write_at(&self, record: &[u8], now: DateTime<Utc>) -> io::Result<()> {
        let mut active = self.active.lock();

        let bucket = self.config.bucket_for(now);
        let next = if bucket != active.bucket {
            Some((bucket, 0))
        } else if active.size > 0
            && active.size + record.len() as u64 > self.config.max_size_bytes
        {
            Some((bucket, active.generation + 1))
        } else {
            None
        };

        if let Some((bucket, generation)) = next {
            *active = open_active(&self.config, bucket, generation)?;
            update_link(&self.config.file_path, &active.path);
            self.remove_expired(now, &active.path);
            tracing::debug!(
                path = %active.path.display(),
                "Rotated log file"
            );
        }

        active.file.write_all(record)?;
        active.size += record.len() as u64;
        Ok(())
    }

    fn remove_expired(&self, now: DateTime<Utc>, active: &Path) {
        if self.config.max_age_days == 0 {
            return;
        }
        let cutoff: SystemTime = (now - Duration::days(i64::from(self.config.max_age_days))).into();

        let dir = match self.config.file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let prefix = match self.config.file_path.file_name() {
            Some(name) => format!("{}.", name.to_string_lossy()),
            None => return,
        };

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Failed to scan log directory");
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path == active || !entry.file_name().to_string_lossy().starts_with(&prefix) {
                continue;
            }
            let expired = entry
                .metadata()
                .ok()
                .filter(|meta| meta.is_file())
                .and_then(|meta| meta.modified().ok())
                .is_some_and(|modified| modified < cutoff);

            if expired {
                match fs::remove_file(&path) {
                    Ok(()) => tracing::debug!(path = %path.display(), "Removed expired log file"),
                    Err(e) => tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to remove expired log file"
                    ),
                }
            }
        }
    }
}

impl LogWriter for RotatingFileWriter {
    fn write(&self, record: &[u8]) -> io::Result<()> {
        self.write_at(record, Utc::now())
    }

    fn flush(&self) -> io::Result<()> {
        self.active.lock().file.sync_data()
    }
}

/// Open the file for `bucket`, skipping generations that are already full.
fn open_active(config: &RotationConfig, bucket: i64, mut generation: u32) -> io::Result<ActiveFile> {
    loop {
        let path = config.path_for(bucket, generation);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let size = file.metadata()?.len();
        if size < config.max_size_bytes {
            return Ok(ActiveFile {
                file,
                path,
                bucket,
                generation,
                size,
            });
        }
        generation += 1;
    }
}

#[cfg(unix)]
fn update_link(link: &Path, target: &Path) {
    // Only replace symlinks we own; a regular file at the base path is left alone.
    if let Ok(meta) = fs::symlink_metadata(link) {
        if !meta.file_type().is_symlink() {
            return;
        }
    }
    let Some(target_name) = target.file_name() else {
        return;
    };

    let mut tmp = link.as_os_str().to_owned();
    tmp.push(".link");
    let tmp = PathBuf::from(tmp);
    let _ = fs::remove_file(&tmp);

    let result = std::os::unix::fs::symlink(target_name, &tmp).and_then(|_| fs::rename(&tmp, link));
    if let Err(e) = result {
        tracing::warn!(link = %link.display(), error = %e, "Failed to update log symlink");
    }
}

#[cfg(not(unix))]
fn update_link(_link: &Path, _target: &Path) {}

//! # Project Files
//!
//! Estimates are often kept on a shared office drive, so saving has to
//! survive interruption and two estimators must not overwrite each other:
//!
//! - **Atomic saves**: write `<file>.rab.tmp`, fsync, rename over the target
//! - **Advisory lock**: OS lock (fs2) plus a `<file>.rab.lock` JSON note
//!   saying who holds it
//! - **Schema check**: refuse files from an incompatible schema version
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::file_io::{load_project, save_project, FileLock};
//! use calc_core::project::Project;
//! use std::path::Path;
//!
//! let path = Path::new("saluran_induk.rab");
//! let _lock = FileLock::acquire(path, "estimator@dinas-pu.go.id")?;
//!
//! let project = Project::new("Saluran Induk", "Estimator", "Garut");
//! save_project(&project, path)?;
//! let reloaded = load_project(path)?;
//! assert_eq!(reloaded.meta.name, "Saluran Induk");
//! # Ok::<(), calc_core::errors::CalcError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, ProjectSettings, SCHEMA_VERSION};

/// Project file extension
pub const PROJECT_EXTENSION: &str = "rab";

/// Locks older than this are ignored (hours)
const STALE_LOCK_HOURS: i64 = 24;

/// Contents of a `.lock` file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Who holds the lock (email or username)
    pub user_id: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// Held by a process that is gone, or simply too old to trust
    pub fn is_stale(&self) -> bool {
        if Utc::now() - self.locked_at > chrono::Duration::hours(STALE_LOCK_HOURS) {
            return true;
        }
        #[cfg(unix)]
        {
            if hostname().as_deref() == Some(self.machine.as_str())
                && fs::metadata(format!("/proc/{}", self.pid)).is_err()
            {
                return true;
            }
        }
        false
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

/// Exclusive lock on a project file, released on drop.
pub struct FileLock {
    project_path: PathBuf,
    lock_path: PathBuf,
    /// Holds the OS lock for as long as the guard lives
    _handle: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire the lock on `path`.
    ///
    /// Fails with [`CalcError::FileLocked`] when another live process holds
    /// it. A stale lock note is taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);

        if let Some(existing) = FileLock::check(path) {
            return Err(CalcError::file_locked(
                path.display().to_string(),
                format!("{} ({})", existing.user_id, existing.machine),
                existing.locked_at.to_rfc3339(),
            ));
        }

        let mut handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| io_error("create lock", &lock_path, e))?;

        handle.try_lock_exclusive().map_err(|_| {
            CalcError::file_locked(path.display().to_string(), "another process", "unknown")
        })?;

        let info = LockInfo::new(user_id);
        let note = to_json(&info)?;
        handle
            .write_all(note.as_bytes())
            .and_then(|_| handle.sync_all())
            .map_err(|e| io_error("write lock", &lock_path, e))?;

        tracing::debug!(path = %path.display(), user = %info.user_id, "lock acquired");

        Ok(FileLock {
            project_path: path.to_path_buf(),
            lock_path,
            _handle: handle,
            info,
        })
    }

    /// Current holder of the lock on `path`, if any live one exists.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let contents = fs::read_to_string(lock_path_for(path)).ok()?;
        let info: LockInfo = serde_json::from_str(&contents).ok()?;
        if info.is_stale() {
            None
        } else {
            Some(info)
        }
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `project.rab` -> `project.rab.lock`
fn lock_path_for(project_path: &Path) -> PathBuf {
    with_suffix(project_path, "lock")
}

/// Append `.suffix` after the existing extension
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let extension = path
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), suffix))
        .unwrap_or_else(|| suffix.to_string());
    path.with_extension(extension)
}

fn io_error(operation: &str, path: &Path, e: std::io::Error) -> CalcError {
    CalcError::file_error(operation, path.display().to_string(), e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> CalcResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| CalcError::serialization(e.to_string()))
}

/// Write `bytes` to `path` through a synced temporary file and a rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let tmp_path = with_suffix(path, "tmp");

    let mut tmp = File::create(&tmp_path).map_err(|e| io_error("create temp file", &tmp_path, e))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.sync_all())
        .map_err(|e| io_error("write temp file", &tmp_path, e))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_error("rename to final", path, e)
    })
}

/// Save a project as pretty JSON with an atomic write.
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    let json = to_json(project)?;
    write_atomic(path, json.as_bytes())?;
    tracing::info!(path = %path.display(), items = project.len(), "project saved");
    Ok(())
}

/// Load a project, checking its schema version.
///
/// Quantity results are taken as stored.
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let contents = fs::read_to_string(path).map_err(|e| io_error("read", path, e))?;

    let project: Project = serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("Invalid project file {}: {}", path.display(), e)))?;
    validate_version(&project.meta.version)?;

    tracing::info!(path = %path.display(), items = project.len(), "project loaded");
    Ok(project)
}

/// Load a project, or start an empty one priced with `settings` when the
/// file does not exist yet. An existing file keeps its own settings.
pub fn load_or_new(path: &Path, settings: ProjectSettings) -> CalcResult<Project> {
    if path.exists() {
        load_project(path)
    } else {
        tracing::info!(path = %path.display(), "starting new project");
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Project::with_settings(name, "", "", settings))
    }
}

/// Same major version required; on 0.x a newer minor is also refused.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file = parse(file_version);
    let current = parse(SCHEMA_VERSION);

    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    match (file.as_slice(), current.as_slice()) {
        ([], _) | (_, []) => Err(mismatch()),
        ([fm, ..], [cm, ..]) if fm != cm => Err(mismatch()),
        ([0, fmin, ..], [0, cmin, ..]) if fmin > cmin => Err(mismatch()),
        _ => Ok(()),
    }
}

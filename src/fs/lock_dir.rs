use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io::Write;
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable naming the shared work path.
pub const WORK_PATH_ENV: &str = "ASCEND_WORK_PATH";

/// Components appended to the base directory.
const LOCK_SUBDIRS: [&str; 4] = ["Ascend", "latest", ".lock", "cann_kb_manager"];

/// Resolve the directory holding the manager's message and lock files.
///
/// `$ASCEND_WORK_PATH/aoe_data` when that variable is set and non-empty,
/// otherwise the home directory, followed by `Ascend/latest/.lock/cann_kb_manager`.
pub fn msg_file_dir() -> Result<PathBuf> {
    let work_path = std::env::var_os(WORK_PATH_ENV).map(PathBuf::from);
    let home = std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir);

    msg_file_dir_from(work_path.as_deref(), home.as_deref())
}

/// [`msg_file_dir`] with the environment passed in.
pub fn msg_file_dir_from(work_path: Option<&Path>, home: Option<&Path>) -> Result<PathBuf> {
    let base = match work_path.filter(|p| !p.as_os_str().is_empty()) {
        Some(work_path) => work_path.join("aoe_data"),
        None => home.ok_or(Error::NoHomeDir)?.to_path_buf(),
    };

    Ok(LOCK_SUBDIRS
        .iter()
        .fold(base, |path, component| path.join(component)))
}

pub struct LockDir {
    root: PathBuf,
}

impl LockDir {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Lock directory resolved from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(msg_file_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Create the directory (and parents), owner-only.
    pub fn create(&self) -> Result<()> {
        DirBuilder::new()
            .recursive(true)
            .mode(0o700)
            .create(&self.root)
            .map_err(|e| {
                Error::io(
                    format!("Failed to create lock directory {}", self.root.display()),
                    e,
                )
            })
    }

    /// Get the config.toml path
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn lock_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.lock"))
    }

    /// Take the exclusive lock `<name>.lock` without blocking.
    ///
    /// The holder's pid is written into the file. The lock is released when
    /// the returned guard is dropped.
    ///
    /// # Returns
    /// * `Ok(LockGuard)` - the lock is ours
    /// * `Err(Error::LockHeld)` - another open file holds it
    pub fn acquire(&self, name: &str) -> Result<LockGuard> {
        self.create()?;
        let path = self.lock_path(name);

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;

        if let Err(e) = file.try_lock_exclusive() {
            if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                return Err(Error::LockHeld(path));
            }
            return Err(Error::io(format!("Failed to lock {}", path.display()), e));
        }

        file.set_len(0)
            .and_then(|()| write!(file, "{}", std::process::id()))
            .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))?;

        debug!(path = %path.display(), "Lock acquired");
        Ok(LockGuard { file, path })
    }

    /// Pid recorded in `<name>.lock`, if the file exists and holds one.
    pub fn recorded_holder(&self, name: &str) -> Option<libc::pid_t> {
        fs::read_to_string(self.lock_path(name))
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

/// Held lock; unlocked on drop. The file itself is left in place.
pub struct LockGuard {
    file: File,
    path: PathBuf,
}

impl LockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

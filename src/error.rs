use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid pid: {0:?}")]
    InvalidPid(String),
    #[error("cannot query process {pid}: {source}")]
    ProcessQuery {
        pid: libc::pid_t,
        #[source]
        source: nix::Error,
    },
    #[error("cannot signal process {pid}: {source}")]
    Signal {
        pid: libc::pid_t,
        #[source]
        source: nix::Error,
    },
    #[error("watchdog thread ended before signalling start")]
    WatchdogStart,
    #[error("watchdog process exited early with {0}")]
    EarlyExit(std::process::ExitStatus),
    #[error("unknown signal name: {0}")]
    UnknownSignal(String),
    #[error("no home directory: set HOME or ASCEND_WORK_PATH")]
    NoHomeDir,
    #[error("lock {} is held by another process", .0.display())]
    LockHeld(PathBuf),
    #[error("interface enumeration error: {0}")]
    Interfaces(#[source] nix::Error),
    #[error("config error in {}: {detail}", path.display())]
    Config { path: PathBuf, detail: String },
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

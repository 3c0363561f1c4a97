pub mod lock_dir;

pub use lock_dir::{msg_file_dir, msg_file_dir_from, LockDir, LockGuard};

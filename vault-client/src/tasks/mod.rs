mod check_lock;

pub use check_lock::CheckLockStatus;

//! Domain constants

/// Accounts whose work never counts toward a report.
///
/// Project-management and machine accounts touch jobs while reassigning
/// them, which shows up as word counts attributed to non-productive
/// users. Overridable via configuration; comparison is case-insensitive.
pub const DEFAULT_EXCLUDED_USERS: &[&str] = &["ProjectAdmin", "mt.connector"];

/// Low-water mark for the preflight free-disk check, in megabytes.
pub const DEFAULT_MIN_FREE_DISK_MB: u64 = 100;

//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error (syntax, unknown command, missing argument)
pub const USAGE: i32 = 64;

/// Data format error (invalid parameter such as a bad batch spec)
pub const DATAERR: i32 = 65;

/// Service unavailable (remote client or transport error)
pub const UNAVAILABLE: i32 = 69;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error (bad config, no endpoint)
pub const CONFIG: i32 = 78;

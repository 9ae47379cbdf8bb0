//! Process exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// At least one kind broke the mutation contract
pub const VIOLATED: i32 = 1;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Type descriptor could not be satisfied
pub const DATAERR: i32 = 65;

/// Batch compiler missing or failed
pub const UNAVAILABLE: i32 = 69;

/// A mutator failed inside the model
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;

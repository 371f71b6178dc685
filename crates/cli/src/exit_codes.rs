//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args)               |
//! | 3-9     | Input            | File and config problems                 |
//! | 10-19   | extract          | Extraction outcomes                      |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Input (3-9)
// =============================================================================

/// Cannot read the input document or config file, or write to stdout.
pub const EXIT_IO: u8 = 3;

/// Config file failed to parse or validate.
pub const EXIT_CONFIG_INVALID: u8 = 4;

// =============================================================================
// Extract (10-19)
// =============================================================================

/// No reasonable quantity could be determined.
/// Not a failure of the tool: the document simply does not support an answer.
pub const EXIT_QUANTITY_UNKNOWN: u8 = 10;

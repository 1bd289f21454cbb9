//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Description                                            |
//! |------|--------------------------------------------------------|
//! | 0    | Success                                                |
//! | 1    | General error (unspecified)                            |
//! | 2    | CLI usage error (bad args, unknown export extension)   |
//! | 3    | Source config could not be read, parsed or validated   |
//! | 4    | Runtime failure (cannot write an output file)          |
//! | 5    | Source warnings present and `--strict` was given       |
//! | 6    | No input package could be opened                       |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config file unreadable, malformed TOML, or failed validation.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Export or result file could not be written.
pub const EXIT_RUNTIME: u8 = 4;

/// Run completed but produced source warnings under `--strict`.
/// The outputs are still written.
pub const EXIT_WARNINGS: u8 = 5;

/// Every input was unreadable; nothing was built.
pub const EXIT_NO_INPUT: u8 = 6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_INVALID_CONFIG,
            EXIT_RUNTIME,
            EXIT_WARNINGS,
            EXIT_NO_INPUT,
        ];
        let mut sorted = codes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }
}

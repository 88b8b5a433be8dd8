#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,

    /// `seed` could not create every fixture.
    SeedIncomplete = 10,

    /// Invalid CLI/config (bad flags, zero threads, sub-second duration, malformed URL, ...).
    InvalidInput = 30,

    /// Internal/runtime error (results file could not be written, ...).
    RuntimeError = 40,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

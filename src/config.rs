/// What to do with a record that fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// Stop loading and return the error.
    Abort,
    /// Keep the record as raw text and report a [`Warning::Skipped`](crate::Warning::Skipped).
    #[default]
    Skip,
}

/// Options for loading a [`Bibliography`](crate::Bibliography).
#[derive(Debug, Clone)]
pub struct Config {
    pub on_error: OnError,
    /// Report duplicate and missing entry keys while loading.
    pub check_keys: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            on_error: OnError::Skip,
            check_keys: true,
        }
    }
}

impl Config {
    /// A configuration which aborts on the first parse error.
    pub fn strict() -> Self {
        Self {
            on_error: OnError::Abort,
            ..Self::default()
        }
    }
}

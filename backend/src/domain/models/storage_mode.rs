use std::fmt;

/// Which backend serves an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageMode {
    /// The database connection is live and owns the records.
    Connected,
    /// The database is unreachable; the local JSON file is used instead.
    Fallback,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Connected => "connected",
            StorageMode::Fallback => "fallback",
        }
    }

    /// Short backend label used in user-facing messages
    pub fn backend_label(&self) -> &'static str {
        match self {
            StorageMode::Connected => "DB",
            StorageMode::Fallback => "File",
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Write specification models.

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Existing destination file conflict policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumWriteConflictStrategy {
    /// Replace the destination file atomically.
    #[default]
    Overwrite,
    /// Append bytes after the current file content.
    Append,
    /// Refuse to touch an existing file (`AlreadyExists`).
    Error,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsInit

/// Input options for `write_bytes`.
#[derive(Debug, Clone, Default)]
pub struct SpecWriteOptions {
    /// Conflict behavior for an existing destination file.
    pub rule_conflict: EnumWriteConflictStrategy,
    /// Create missing parent directories before writing.
    pub if_create_parent_dirs: bool,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

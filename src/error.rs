//! Error types for the record cabinet.

use thiserror::Error;

/// Result type alias using StoreError.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Which name field an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    FirstName,
    LastName,
}

impl std::fmt::Display for NameField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameField::FirstName => f.write_str("first_name"),
            NameField::LastName => f.write_str("last_name"),
        }
    }
}

/// Errors that can occur in cabinet operations.
#[derive(Debug, Error)]
pub enum StoreError {
    // Mutation rejected before touching the file
    #[error("validation failed for record #{id}")]
    ValidationFailed { id: i32 },

    #[error("record #{id} not found")]
    RecordNotFound { id: i32 },

    #[error("record #{id} already exists")]
    DuplicateId { id: i32 },

    // Codec errors
    #[error("{field} is {len} bytes long (max {max})")]
    FieldTooLong {
        field: NameField,
        len: usize,
        max: usize,
    },

    #[error("{field} must be ASCII")]
    NonAscii { field: NameField },

    #[error("gender '{0}' does not fit a single UTF-16 unit")]
    InvalidGender(char),

    #[error("salary out of range: {0}")]
    SalaryOutOfRange(String),

    #[error("invalid salary literal '{0}'")]
    SalaryParse(String),

    // Format errors
    #[error("slot {slot} is corrupted: {reason}")]
    CorruptSlot { slot: u64, reason: String },

    #[error("data file is corrupted: {0}")]
    CorruptFile(String),

    #[error("slot {slot} out of range (record_count = {count})")]
    SlotOutOfRange { slot: u64, count: u64 },

    #[error("{cause}; index rebuild failed, indexes are stale until rebuild_index(): {rebuild}")]
    StaleIndex { cause: String, rebuild: String },

    #[error("data file {} is locked by another process", path.display())]
    Locked { path: std::path::PathBuf },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Attach a slot index to a codec-level corruption error.
    pub(crate) fn at_slot(self, slot: u64) -> Self {
        match self {
            StoreError::CorruptSlot { reason, .. } => StoreError::CorruptSlot { slot, reason },
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::RecordNotFound { .. })
    }

    /// Ошибка относится к содержимому одной записи (а не к файлу/хранилищу).
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            StoreError::ValidationFailed { .. }
                | StoreError::DuplicateId { .. }
                | StoreError::FieldTooLong { .. }
                | StoreError::NonAscii { .. }
                | StoreError::InvalidGender(_)
        )
    }
}

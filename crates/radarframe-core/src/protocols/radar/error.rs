use thiserror::Error;

/// Terminal decode conditions.
///
/// `FrameNotFound` means no frame could be built at all. The other variants
/// stop the module loop and travel next to the partially decoded frame in
/// [`DecodeOutcome`](super::parser::DecodeOutcome).
///
/// # Examples
/// ```
/// use radarframe_core::{DecodeError, Truncation};
///
/// let err = DecodeError::from(Truncation::ZeroLengthModule { offset: 4 });
/// assert_eq!(err.id(), "RF-TRUNCATED-BUFFER");
/// assert!(err.to_string().contains("zero data length"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("frame sync marker 0xabcd not found")]
    FrameNotFound,
    #[error("truncated buffer: {0}")]
    TruncatedBuffer(#[from] Truncation),
    #[error("unknown module type {tag:#06x} at offset {offset}")]
    UnknownModuleType { tag: u16, offset: usize },
}

impl DecodeError {
    /// Stable identifier used in reports.
    pub fn id(&self) -> &'static str {
        match self {
            DecodeError::FrameNotFound => "RF-FRAME-NOT-FOUND",
            DecodeError::TruncatedBuffer(_) => "RF-TRUNCATED-BUFFER",
            DecodeError::UnknownModuleType { .. } => "RF-UNKNOWN-MODULE",
        }
    }
}

/// Why a decode ran out of trustworthy bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Truncation {
    #[error("read of {width} bytes at offset {offset} exceeds buffer of {len} bytes")]
    ReadPastEnd {
        offset: usize,
        width: usize,
        len: usize,
    },
    #[error("module at offset {offset} declares zero data length")]
    ZeroLengthModule { offset: usize },
    #[error("module at offset {offset} declares {length} bytes, minimum is {min}")]
    ModuleTooShort {
        offset: usize,
        length: u16,
        min: usize,
    },
    #[error("module at offset {offset} re-reads data length {declared}, dispatcher saw {dispatched}")]
    LengthMismatch {
        offset: usize,
        dispatched: u16,
        declared: u16,
    },
    #[error("frame declares {declared} data bytes but only {available} follow the header")]
    DeclaredLengthExceedsBuffer { declared: u16, available: usize },
}

#[cfg(test)]
mod tests {
    use super::{DecodeError, Truncation};

    #[test]
    fn ids_are_stable() {
        assert_eq!(DecodeError::FrameNotFound.id(), "RF-FRAME-NOT-FOUND");
        let unknown = DecodeError::UnknownModuleType {
            tag: 0x444c,
            offset: 146,
        };
        assert_eq!(unknown.id(), "RF-UNKNOWN-MODULE");
        assert_eq!(
            unknown.to_string(),
            "unknown module type 0x444c at offset 146"
        );
    }

    #[test]
    fn truncation_message_names_cause() {
        let err = DecodeError::from(Truncation::ReadPastEnd {
            offset: 10,
            width: 2,
            len: 11,
        });
        let msg = err.to_string();
        assert!(msg.starts_with("truncated buffer:"));
        assert!(msg.contains("offset 10"));
    }
}

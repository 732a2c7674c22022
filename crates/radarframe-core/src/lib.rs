//! Radarframe core library for decoding radar sensor frames.
//!
//! The pipeline is: hex text (`source`) -> bytes -> frame decoder
//! (`protocols::radar`: layout/reader/parser) -> deterministic [`Report`].
//! Decoding is byte-oriented and side-effect free; the decoder never writes
//! output and never touches files. Rendering belongs to callers.
//!
//! Invariants:
//! - Report outputs are deterministic and stable across runs.
//! - Every buffer access is bounds-checked; malformed input is reported,
//!   never read past.
//! - Terminal conditions are returned next to the modules decoded before
//!   them; out-of-range fields never stop a decode.
//!
//! # Examples
//! ```
//! use radarframe_core::{analyze_buffer, parse_hex_dump};
//!
//! let bytes = parse_hex_dump("AB CD 00 06 4A 42 00 06 00 7F")?;
//! let report = analyze_buffer(&bytes);
//! assert_eq!(report.input.bytes, 10);
//! assert!(report.halt.is_none());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
mod protocols;
mod source;

pub use analysis::analyze_buffer;
pub use protocols::radar::{
    BaseInfo, ByteCursor, DecodeError, DecodeOutcome, FieldKind, FieldOutOfRange, FieldOutcome,
    Frame, FrameHeader, Module, Reading, TargetInfo, TargetRecord, Truncation, Width,
    decode_frame, layout, locate_frame, validate,
};
pub use source::{HexInputError, parse_hex_dump};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Decode report for one input buffer.
///
/// # Examples
/// ```
/// use radarframe_core::make_stub_report;
///
/// let report = make_stub_report(184);
/// assert_eq!(report.report_version, radarframe_core::REPORT_VERSION);
/// assert!(report.frame.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// Input buffer metadata.
    pub input: InputInfo,
    /// Decoded frame, absent when no frame could be built.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<Frame>,
    /// Condition that ended the decode early, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halt: Option<Halt>,
    /// Out-of-range target fields in record order, then field order.
    #[serde(default)]
    pub invalid_fields: Vec<FieldOutOfRange>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "radarframe").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input buffer metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Buffer size in bytes.
    pub bytes: u64,
}

/// Terminal decode condition as it appears in a report.
///
/// # Examples
/// ```
/// use radarframe_core::{DecodeError, Halt};
///
/// let halt = Halt::from(&DecodeError::FrameNotFound);
/// assert_eq!(halt.id, "RF-FRAME-NOT-FOUND");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Halt {
    /// Stable identifier (e.g., `RF-UNKNOWN-MODULE`).
    pub id: String,
    /// Human-readable message.
    pub message: String,
}

impl From<&DecodeError> for Halt {
    fn from(err: &DecodeError) -> Self {
        Halt {
            id: err.id().to_string(),
            message: err.to_string(),
        }
    }
}

/// Build a report with base fields filled and nothing decoded.
pub fn make_stub_report(input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "radarframe".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputInfo { bytes: input_bytes },
        frame: None,
        halt: None,
        invalid_fields: vec![],
    }
}

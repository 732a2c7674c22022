//! Radar frame decoding.
//!
//! A frame is a `0xABCD` sync marker, a total-length word, then a run of
//! length-prefixed modules. Base-info modules ("JB") carry only a checksum
//! byte of interest; target-info modules ("MB") carry back-to-back 33-byte
//! target records followed by an 8-byte trailer that opens with the checksum.
//! Checksums are extracted verbatim and never verified.
//!
//! Every read goes through `reader::ByteCursor`, so malformed input ends in a
//! `Truncation` instead of an out-of-bounds access. The module loop advances
//! by each module's declared length, so a corrupt length desynchronizes the
//! rest of the frame; that is protocol behaviour and is kept.
//!
//! Field validity is data, not failure: out-of-range values are decoded as
//! `FieldOutcome::Invalid` next to their raw value.

pub mod error;
pub mod fields;
pub mod layout;
pub mod locator;
pub mod modules;
pub mod parser;
pub mod reader;

pub use error::{DecodeError, Truncation};
pub use fields::{FieldKind, FieldOutcome, Reading, Width, validate};
pub use locator::locate_frame;
pub use modules::{BaseInfo, Module, TargetInfo, TargetRecord};
pub use parser::{DecodeOutcome, FieldOutOfRange, Frame, FrameHeader, decode_frame};
pub use reader::ByteCursor;

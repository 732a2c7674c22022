use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{DecodeError, Truncation};
use super::fields::{FieldKind, FieldOutcome};
use super::layout;
use super::locator::locate_frame;
use super::modules::{Module, decode_base_info, decode_target_info};
use super::reader::ByteCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameHeader {
    pub sync_marker: u16,
    /// Module bytes announced after the header; not trusted for iteration.
    pub total_data_length: u16,
}

/// A decoded frame. Built once per decode call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Buffer offset of the sync marker.
    pub offset: usize,
    pub header: FrameHeader,
    pub modules: Vec<Module>,
    /// Target records decoded across every target-info module.
    pub target_count: u32,
}

/// A target field whose raw value fell outside its valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOutOfRange {
    /// Frame-wide ordinal of the target record.
    pub target: u32,
    pub field: FieldKind,
    pub raw: u32,
}

impl Frame {
    /// Out-of-range fields in record order, then field order.
    pub fn out_of_range(&self) -> impl Iterator<Item = FieldOutOfRange> + '_ {
        self.modules
            .iter()
            .filter_map(|module| match module {
                Module::TargetInfo(info) => Some(info.targets.iter()),
                Module::BaseInfo(_) => None,
            })
            .flatten()
            .flat_map(|record| {
                record
                    .readings()
                    .filter(|(_, reading)| reading.outcome == FieldOutcome::Invalid)
                    .map(move |(field, reading)| FieldOutOfRange {
                        target: record.ordinal,
                        field,
                        raw: reading.raw,
                    })
            })
    }
}

/// Frame plus the condition that stopped module iteration, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOutcome {
    pub frame: Frame,
    pub halted: Option<DecodeError>,
}

/// Decodes the first frame found in `buffer`.
///
/// Returns `Err` only when no frame can be built. Terminal conditions met
/// while walking modules are returned in [`DecodeOutcome::halted`] next to
/// the modules decoded before them.
///
/// # Examples
/// ```
/// use radarframe_core::decode_frame;
///
/// let buffer = [
///     0xab, 0xcd, 0x00, 0x06, // frame header
///     0x4a, 0x42, 0x00, 0x06, 0x00, 0x7f, // base info, checksum 0x7f
/// ];
/// let outcome = decode_frame(&buffer)?;
/// assert_eq!(outcome.frame.modules.len(), 1);
/// assert!(outcome.halted.is_none());
/// # Ok::<(), radarframe_core::DecodeError>(())
/// ```
pub fn decode_frame(buffer: &[u8]) -> Result<DecodeOutcome, DecodeError> {
    let offset = locate_frame(buffer).ok_or(DecodeError::FrameNotFound)?;
    let cursor = ByteCursor::new(buffer);
    let header = read_frame_header(&cursor, offset)?;
    debug!(
        offset,
        total_data_length = header.total_data_length,
        "located frame"
    );

    let modules_start = offset + layout::FRAME_HEADER_LEN;
    let mut dispatcher = ModuleDispatcher::new(cursor, modules_start);
    dispatcher.run();
    let ModuleDispatcher {
        modules,
        target_count,
        state,
        ..
    } = dispatcher;

    let mut halted = match state {
        DispatchState::Stopped(halted) => halted,
        DispatchState::Scanning { .. } => None,
    };
    let available = buffer.len() - modules_start;
    if halted.is_none() && header.total_data_length as usize > available {
        halted = Some(
            Truncation::DeclaredLengthExceedsBuffer {
                declared: header.total_data_length,
                available,
            }
            .into(),
        );
    }
    if let Some(err) = &halted {
        warn!(modules = modules.len(), "module decoding halted: {err}");
    }

    Ok(DecodeOutcome {
        frame: Frame {
            offset,
            header,
            modules,
            target_count,
        },
        halted,
    })
}

pub(crate) fn read_frame_header(
    cursor: &ByteCursor<'_>,
    offset: usize,
) -> Result<FrameHeader, DecodeError> {
    let sync_marker = cursor.read_u16_be(offset + layout::FRAME_MARKER_OFFSET)?;
    if sync_marker != layout::SYNC_MARKER {
        return Err(DecodeError::FrameNotFound);
    }
    let total_data_length = cursor.read_u16_be(offset + layout::FRAME_TOTAL_LENGTH_OFFSET)?;
    Ok(FrameHeader {
        sync_marker,
        total_data_length,
    })
}

#[derive(Debug, Clone, PartialEq)]
enum DispatchState {
    Scanning { offset: usize },
    Stopped(Option<DecodeError>),
}

/// Walks length-prefixed modules until the buffer ends or a terminal
/// condition stops it. Each module advances the offset by exactly its
/// declared data length.
struct ModuleDispatcher<'a> {
    cursor: ByteCursor<'a>,
    state: DispatchState,
    modules: Vec<Module>,
    target_count: u32,
}

impl<'a> ModuleDispatcher<'a> {
    fn new(cursor: ByteCursor<'a>, offset: usize) -> Self {
        Self {
            cursor,
            state: DispatchState::Scanning { offset },
            modules: Vec::new(),
            target_count: 0,
        }
    }

    fn run(&mut self) {
        while let DispatchState::Scanning { offset } = self.state {
            self.state = match self.step(offset) {
                Ok(Some(next)) => DispatchState::Scanning { offset: next },
                Ok(None) => DispatchState::Stopped(None),
                Err(err) => DispatchState::Stopped(Some(err)),
            };
        }
    }

    fn step(&mut self, offset: usize) -> Result<Option<usize>, DecodeError> {
        if offset >= self.cursor.len() {
            return Ok(None);
        }
        let module_type = self
            .cursor
            .read_u16_be(offset + layout::MODULE_TYPE_OFFSET)?;
        let data_length = self
            .cursor
            .read_u16_be(offset + layout::MODULE_LENGTH_OFFSET)?;
        if !matches!(
            module_type,
            layout::BASE_INFO_TYPE | layout::TARGET_INFO_TYPE
        ) {
            return Err(DecodeError::UnknownModuleType {
                tag: module_type,
                offset,
            });
        }
        if data_length == 0 {
            return Err(Truncation::ZeroLengthModule { offset }.into());
        }

        let truncated = if module_type == layout::BASE_INFO_TYPE {
            let base = decode_base_info(&self.cursor, offset)?;
            self.modules.push(Module::BaseInfo(base));
            None
        } else {
            let decoded =
                decode_target_info(&self.cursor, offset, data_length, self.target_count + 1)?;
            self.target_count += decoded.info.targets.len() as u32;
            self.modules.push(Module::TargetInfo(decoded.info));
            decoded.truncated
        };
        if let Some(truncation) = truncated {
            return Err(truncation.into());
        }
        debug!(
            offset,
            module_type = format_args!("{module_type:#06x}"),
            data_length,
            "decoded module"
        );
        Ok(Some(offset + data_length as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeOutcome, decode_frame};
    use crate::protocols::radar::error::{DecodeError, Truncation};
    use crate::protocols::radar::fields::{FieldKind, FieldOutcome};
    use crate::protocols::radar::layout;
    use crate::protocols::radar::modules::Module;

    fn header(total: u16) -> Vec<u8> {
        let mut bytes = layout::SYNC_MARKER_BYTES.to_vec();
        bytes.extend_from_slice(&total.to_be_bytes());
        bytes
    }

    fn base_info(checksum: u8) -> Vec<u8> {
        let mut bytes = layout::BASE_INFO_TYPE.to_be_bytes().to_vec();
        bytes.extend_from_slice(&7u16.to_be_bytes());
        bytes.extend_from_slice(&[0x01, 0x02, checksum]);
        bytes
    }

    fn target_info(records: &[[u8; 33]], checksum: u8) -> Vec<u8> {
        let length = layout::MODULE_HEADER_LEN + records.len() * 33 + 8;
        let mut bytes = layout::TARGET_INFO_TYPE.to_be_bytes().to_vec();
        bytes.extend_from_slice(&(length as u16).to_be_bytes());
        for record in records {
            bytes.extend_from_slice(record);
        }
        bytes.push(checksum);
        bytes.extend_from_slice(&[0u8; 7]);
        bytes
    }

    fn record(target_number: u8, lane: u8) -> [u8; 33] {
        let mut bytes = [0u8; 33];
        bytes[layout::TARGET_NUMBER_OFFSET + 1] = target_number;
        bytes[layout::LANE_NUMBER_OFFSET] = lane;
        bytes
    }

    fn frame(modules: &[Vec<u8>]) -> Vec<u8> {
        let body: Vec<u8> = modules.concat();
        let mut bytes = header(body.len() as u16);
        bytes.extend_from_slice(&body);
        bytes
    }

    fn decode(buffer: &[u8]) -> DecodeOutcome {
        decode_frame(buffer).expect("frame")
    }

    #[test]
    fn missing_marker_is_frame_not_found() {
        assert_eq!(
            decode_frame(&[0x00, 0x4a, 0x42]).unwrap_err(),
            DecodeError::FrameNotFound
        );
        assert_eq!(decode_frame(&[]).unwrap_err(), DecodeError::FrameNotFound);
    }

    #[test]
    fn truncated_header_yields_no_frame() {
        let err = decode_frame(&[0xab, 0xcd, 0x00]).unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedBuffer(_)));
    }

    #[test]
    fn decodes_base_and_target_modules() {
        let buffer = frame(&[
            base_info(0x33),
            target_info(&[record(1, 3), record(2, 9)], 0x44),
        ]);
        let outcome = decode(&buffer);
        assert_eq!(outcome.halted, None);

        let frame = outcome.frame;
        assert_eq!(frame.offset, 0);
        assert_eq!(frame.header.sync_marker, 0xabcd);
        assert_eq!(frame.header.total_data_length as usize, buffer.len() - 4);
        assert_eq!(frame.modules.len(), 2);
        assert_eq!(frame.target_count, 2);

        match &frame.modules[0] {
            Module::BaseInfo(base) => {
                assert_eq!(base.offset, 4);
                assert_eq!(base.checksum, 0x33);
            }
            other => panic!("unexpected module {other:?}"),
        }
        match &frame.modules[1] {
            Module::TargetInfo(info) => {
                assert_eq!(info.targets.len(), 2);
                assert_eq!(info.checksum, Some(0x44));
                assert_eq!(info.targets[1].lane_number.outcome, FieldOutcome::Invalid);
            }
            other => panic!("unexpected module {other:?}"),
        }

        let invalid: Vec<_> = frame.out_of_range().collect();
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].target, 2);
        assert_eq!(invalid[0].field, FieldKind::LaneNumber);
        assert_eq!(invalid[0].raw, 9);
    }

    #[test]
    fn target_counter_spans_modules() {
        let buffer = frame(&[
            target_info(&[record(1, 0), record(2, 0)], 0),
            target_info(&[record(3, 0)], 0),
        ]);
        let frame = decode(&buffer).frame;
        assert_eq!(frame.target_count, 3);
        let ordinals: Vec<u32> = frame
            .modules
            .iter()
            .filter_map(|module| match module {
                Module::TargetInfo(info) => Some(info.targets.iter().map(|t| t.ordinal)),
                Module::BaseInfo(_) => None,
            })
            .flatten()
            .collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
    }

    #[test]
    fn unknown_module_stops_with_partial_frame() {
        let mut unknown = 0x444cu16.to_be_bytes().to_vec();
        unknown.extend_from_slice(&6u16.to_be_bytes());
        unknown.extend_from_slice(&[0, 0]);
        let buffer = frame(&[base_info(1), unknown, base_info(2)]);

        let outcome = decode(&buffer);
        assert_eq!(
            outcome.halted,
            Some(DecodeError::UnknownModuleType {
                tag: 0x444c,
                offset: 11,
            })
        );
        assert_eq!(outcome.frame.modules.len(), 1);
    }

    #[test]
    fn zero_length_module_is_truncation() {
        let mut stalled = layout::BASE_INFO_TYPE.to_be_bytes().to_vec();
        stalled.extend_from_slice(&0u16.to_be_bytes());
        let buffer = frame(&[base_info(1), stalled]);

        let outcome = decode(&buffer);
        assert_eq!(
            outcome.halted,
            Some(DecodeError::TruncatedBuffer(Truncation::ZeroLengthModule {
                offset: 11
            }))
        );
        assert_eq!(outcome.frame.modules.len(), 1);
    }

    #[test]
    fn trailing_bytes_shorter_than_module_header() {
        let mut buffer = frame(&[base_info(1)]);
        buffer.extend_from_slice(&[0x4a, 0x42, 0x00]);
        let outcome = decode(&buffer);
        assert!(matches!(
            outcome.halted,
            Some(DecodeError::TruncatedBuffer(Truncation::ReadPastEnd { offset: 13, .. }))
        ));
        assert_eq!(outcome.frame.modules.len(), 1);
    }

    #[test]
    fn truncated_target_module_keeps_complete_records() {
        let mut buffer = frame(&[base_info(1), target_info(&[record(1, 0), record(2, 0)], 0)]);
        buffer.truncate(4 + 7 + 4 + 33 + 5);
        let outcome = decode(&buffer);
        assert!(matches!(
            outcome.halted,
            Some(DecodeError::TruncatedBuffer(Truncation::ReadPastEnd { .. }))
        ));
        assert_eq!(outcome.frame.modules.len(), 2);
        assert_eq!(outcome.frame.target_count, 1);
        match &outcome.frame.modules[1] {
            Module::TargetInfo(info) => {
                assert_eq!(info.targets.len(), 1);
                assert_eq!(info.targets[0].offset, 4 + 7 + 4);
                assert_eq!(info.checksum, None);
            }
            other => panic!("unexpected module {other:?}"),
        }
    }

    #[test]
    fn buffer_ending_before_checksum_counts_records() {
        let mut buffer = header(0x4e);
        buffer.extend_from_slice(&layout::TARGET_INFO_TYPE.to_be_bytes());
        buffer.extend_from_slice(&0x4eu16.to_be_bytes());
        buffer.extend_from_slice(&record(7, 0));
        buffer.extend_from_slice(&[0u8; 5]);

        let outcome = decode(&buffer);
        assert_eq!(
            outcome.halted,
            Some(DecodeError::TruncatedBuffer(Truncation::ReadPastEnd {
                offset: 4 + 0x4e - 8,
                width: 1,
                len: 46,
            }))
        );
        assert_eq!(outcome.frame.target_count, 1);
        let invalid: Vec<_> = outcome.frame.out_of_range().collect();
        assert!(invalid.is_empty());
    }

    #[test]
    fn unknown_tag_with_zero_length_is_unknown_module() {
        let mut unknown = 0x444cu16.to_be_bytes().to_vec();
        unknown.extend_from_slice(&0u16.to_be_bytes());
        let buffer = frame(&[base_info(1), unknown]);

        let outcome = decode(&buffer);
        assert_eq!(
            outcome.halted,
            Some(DecodeError::UnknownModuleType {
                tag: 0x444c,
                offset: 11,
            })
        );
        assert_eq!(outcome.frame.modules.len(), 1);
    }

    #[test]
    fn declared_total_beyond_buffer_is_flagged() {
        let mut buffer = header(200);
        buffer.extend_from_slice(&base_info(1));
        let outcome = decode(&buffer);
        assert_eq!(
            outcome.halted,
            Some(DecodeError::TruncatedBuffer(
                Truncation::DeclaredLengthExceedsBuffer {
                    declared: 200,
                    available: 7,
                }
            ))
        );
        assert_eq!(outcome.frame.modules.len(), 1);
    }

    #[test]
    fn frame_after_leading_noise() {
        let mut buffer = vec![0x00, 0xab, 0x11];
        buffer.extend_from_slice(&frame(&[base_info(9)]));
        let frame = decode(&buffer).frame;
        assert_eq!(frame.offset, 3);
        assert_eq!(frame.modules[0].offset(), 7);
    }

    #[test]
    fn decoding_is_deterministic() {
        let buffer = frame(&[base_info(5), target_info(&[record(7, 1)], 6)]);
        assert_eq!(decode(&buffer), decode(&buffer));
    }
}

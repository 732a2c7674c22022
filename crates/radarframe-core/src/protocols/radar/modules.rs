use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{DecodeError, Truncation};
use super::fields::{FieldKind, Reading, Width};
use super::layout;
use super::reader::ByteCursor;

/// One decoded module, in frame order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Module {
    BaseInfo(BaseInfo),
    TargetInfo(TargetInfo),
}

impl Module {
    pub fn offset(&self) -> usize {
        match self {
            Module::BaseInfo(base) => base.offset,
            Module::TargetInfo(info) => info.offset,
        }
    }

    pub fn data_length(&self) -> u16 {
        match self {
            Module::BaseInfo(base) => base.data_length,
            Module::TargetInfo(info) => info.data_length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseInfo {
    /// Absolute buffer offset of the module type tag.
    pub offset: usize,
    pub module_type: u16,
    pub data_length: u16,
    pub checksum: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetInfo {
    /// Absolute buffer offset of the module type tag.
    pub offset: usize,
    pub module_type: u16,
    pub data_length: u16,
    pub targets: Vec<TargetRecord>,
    /// Absent when the buffer ends before the checksum byte.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<u8>,
}

/// Result of decoding one target-info module. When the buffer ends inside
/// the module, `truncated` holds the failed read and `info` keeps every
/// complete record decoded before it.
#[derive(Debug)]
pub(crate) struct TargetInfoDecode {
    pub info: TargetInfo,
    pub truncated: Option<Truncation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRecord {
    /// 1-based position of this record among all targets of the frame.
    pub ordinal: u32,
    /// Absolute buffer offset of the record's first byte.
    pub offset: usize,
    pub target_number: Reading,
    pub longitudinal_distance: Reading,
    pub horizontal_distance: Reading,
    pub lateral_speed: Reading,
    pub target_type: Reading,
    pub lane_number: Reading,
    pub front_distance: Reading,
    pub front_time_interval: Reading,
    pub longitudinal_speed: Reading,
    pub heading_angle: Reading,
    pub event_flags: Reading,
    pub radar_x: Reading,
    pub radar_y: Reading,
    pub blind_spot_flag: Reading,
    pub car_length: Reading,
    pub car_width: Reading,
}

impl TargetRecord {
    pub fn reading(&self, kind: FieldKind) -> &Reading {
        match kind {
            FieldKind::TargetNumber => &self.target_number,
            FieldKind::LongitudinalDistance => &self.longitudinal_distance,
            FieldKind::HorizontalDistance => &self.horizontal_distance,
            FieldKind::LateralSpeed => &self.lateral_speed,
            FieldKind::TargetType => &self.target_type,
            FieldKind::LaneNumber => &self.lane_number,
            FieldKind::FrontDistance => &self.front_distance,
            FieldKind::FrontTimeInterval => &self.front_time_interval,
            FieldKind::LongitudinalSpeed => &self.longitudinal_speed,
            FieldKind::HeadingAngle => &self.heading_angle,
            FieldKind::EventFlags => &self.event_flags,
            FieldKind::RadarX => &self.radar_x,
            FieldKind::RadarY => &self.radar_y,
            FieldKind::BlindSpotFlag => &self.blind_spot_flag,
            FieldKind::CarLength => &self.car_length,
            FieldKind::CarWidth => &self.car_width,
        }
    }

    /// All readings in record order.
    pub fn readings(&self) -> impl Iterator<Item = (FieldKind, &Reading)> + '_ {
        FieldKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.reading(kind)))
    }
}

pub(crate) fn decode_base_info(
    cursor: &ByteCursor<'_>,
    offset: usize,
) -> Result<BaseInfo, DecodeError> {
    let module_type = cursor.read_u16_be(offset + layout::MODULE_TYPE_OFFSET)?;
    if module_type != layout::BASE_INFO_TYPE {
        return Err(DecodeError::UnknownModuleType {
            tag: module_type,
            offset,
        });
    }
    let data_length = cursor.read_u16_be(offset + layout::MODULE_LENGTH_OFFSET)?;
    require_min_len(offset, data_length, layout::BASE_INFO_MIN_LEN)?;

    let checksum_offset = offset + data_length as usize - layout::BASE_INFO_CHECKSUM_FROM_END;
    let checksum = cursor.read_u8(checksum_offset)?;

    Ok(BaseInfo {
        offset,
        module_type,
        data_length,
        checksum,
    })
}

/// Decodes one target-info module. `first_ordinal` is the frame-wide number
/// given to the module's first record.
///
/// Header problems are returned as `Err`. Running out of buffer after the
/// header is not: the records read so far come back with the truncation.
pub(crate) fn decode_target_info(
    cursor: &ByteCursor<'_>,
    offset: usize,
    dispatched_length: u16,
    first_ordinal: u32,
) -> Result<TargetInfoDecode, DecodeError> {
    let module_type = cursor.read_u16_be(offset + layout::MODULE_TYPE_OFFSET)?;
    if module_type != layout::TARGET_INFO_TYPE {
        return Err(DecodeError::UnknownModuleType {
            tag: module_type,
            offset,
        });
    }
    let data_length = cursor.read_u16_be(offset + layout::MODULE_LENGTH_OFFSET)?;
    if data_length != dispatched_length {
        return Err(Truncation::LengthMismatch {
            offset,
            dispatched: dispatched_length,
            declared: data_length,
        }
        .into());
    }
    require_min_len(offset, data_length, layout::TARGET_INFO_MIN_LEN)?;

    let checksum_offset = offset + data_length as usize - layout::TARGET_INFO_CHECKSUM_FROM_END;
    let records_end = checksum_offset.min(cursor.len());

    let mut targets = Vec::new();
    let mut truncated = None;
    let mut record_offset = offset + layout::MODULE_HEADER_LEN;
    let mut ordinal = first_ordinal;
    while record_offset + layout::TARGET_RECORD_LEN <= records_end {
        match decode_target_record(cursor, record_offset, ordinal) {
            Ok(record) => targets.push(record),
            Err(err) => {
                truncated = Some(err);
                break;
            }
        }
        record_offset += layout::TARGET_RECORD_LEN;
        ordinal += 1;
    }
    debug!(offset, records = targets.len(), "decoded target records");

    let checksum = match truncated {
        Some(_) => None,
        None => match cursor.read_u8(checksum_offset) {
            Ok(checksum) => Some(checksum),
            Err(err) => {
                truncated = Some(err);
                None
            }
        },
    };

    Ok(TargetInfoDecode {
        info: TargetInfo {
            offset,
            module_type,
            data_length,
            targets,
            checksum,
        },
        truncated,
    })
}

fn decode_target_record(
    cursor: &ByteCursor<'_>,
    offset: usize,
    ordinal: u32,
) -> Result<TargetRecord, Truncation> {
    cursor.require(offset, layout::TARGET_RECORD_LEN)?;
    let field = |kind: FieldKind| -> Result<Reading, Truncation> {
        let at = offset + kind.offset();
        let raw = match kind.width() {
            Width::U8 => u32::from(cursor.read_u8(at)?),
            Width::U16 => u32::from(cursor.read_u16_be(at)?),
            Width::U32 => cursor.read_u32_be(at)?,
        };
        Ok(Reading::new(kind, raw))
    };

    Ok(TargetRecord {
        ordinal,
        offset,
        target_number: field(FieldKind::TargetNumber)?,
        longitudinal_distance: field(FieldKind::LongitudinalDistance)?,
        horizontal_distance: field(FieldKind::HorizontalDistance)?,
        lateral_speed: field(FieldKind::LateralSpeed)?,
        target_type: field(FieldKind::TargetType)?,
        lane_number: field(FieldKind::LaneNumber)?,
        front_distance: field(FieldKind::FrontDistance)?,
        front_time_interval: field(FieldKind::FrontTimeInterval)?,
        longitudinal_speed: field(FieldKind::LongitudinalSpeed)?,
        heading_angle: field(FieldKind::HeadingAngle)?,
        event_flags: field(FieldKind::EventFlags)?,
        radar_x: field(FieldKind::RadarX)?,
        radar_y: field(FieldKind::RadarY)?,
        blind_spot_flag: field(FieldKind::BlindSpotFlag)?,
        car_length: field(FieldKind::CarLength)?,
        car_width: field(FieldKind::CarWidth)?,
    })
}

fn require_min_len(offset: usize, length: u16, min: usize) -> Result<(), Truncation> {
    if (length as usize) < min {
        return Err(Truncation::ModuleTooShort {
            offset,
            length,
            min,
        });
    }
    Ok(())
}

//! Wire layout of the radar frame. All multi-byte fields are big-endian and
//! every offset is relative to the start of its own structure.
//!
//! ```text
//! Frame            0   2  sync marker 0xABCD
//!                  2   2  total data length
//! Module header    0   2  module type (0x4A42 "JB" / 0x4D42 "MB")
//!                  2   2  module data length (header and checksum included)
//! Base info        len-1        1  checksum
//! Target info      4   33*N     target records, back-to-back
//!                  len-8        1  checksum
//! ```

pub const SYNC_MARKER: u16 = 0xABCD;
pub const SYNC_MARKER_BYTES: [u8; 2] = SYNC_MARKER.to_be_bytes();

pub const FRAME_MARKER_OFFSET: usize = 0;
pub const FRAME_TOTAL_LENGTH_OFFSET: usize = 2;
pub const FRAME_HEADER_LEN: usize = 4;

pub const MODULE_TYPE_OFFSET: usize = 0;
pub const MODULE_LENGTH_OFFSET: usize = 2;
pub const MODULE_HEADER_LEN: usize = 4;

/// "JB"
pub const BASE_INFO_TYPE: u16 = 0x4A42;
/// "MB"
pub const TARGET_INFO_TYPE: u16 = 0x4D42;

/// Checksum is the last byte of a base-info module.
pub const BASE_INFO_CHECKSUM_FROM_END: usize = 1;
pub const BASE_INFO_MIN_LEN: usize = MODULE_HEADER_LEN + BASE_INFO_CHECKSUM_FROM_END;

/// Checksum opens the 8-byte trailer of a target-info module.
pub const TARGET_INFO_CHECKSUM_FROM_END: usize = 8;
pub const TARGET_INFO_MIN_LEN: usize = MODULE_HEADER_LEN + TARGET_INFO_CHECKSUM_FROM_END;

pub const TARGET_RECORD_LEN: usize = 33;

pub const TARGET_NUMBER_OFFSET: usize = 0;
pub const LONGITUDINAL_DISTANCE_OFFSET: usize = 1;
pub const HORIZONTAL_DISTANCE_OFFSET: usize = 3;
pub const LATERAL_SPEED_OFFSET: usize = 5;
pub const TARGET_TYPE_OFFSET: usize = 7;
pub const LANE_NUMBER_OFFSET: usize = 8;
pub const FRONT_DISTANCE_OFFSET: usize = 9;
pub const FRONT_TIME_INTERVAL_OFFSET: usize = 11;
pub const LONGITUDINAL_SPEED_OFFSET: usize = 13;
pub const HEADING_ANGLE_OFFSET: usize = 15;
pub const EVENT_FLAGS_OFFSET: usize = 17;
pub const RADAR_X_OFFSET: usize = 18;
pub const RADAR_Y_OFFSET: usize = 22;
pub const BLIND_SPOT_FLAG_OFFSET: usize = 26;
pub const CAR_LENGTH_OFFSET: usize = 27;
pub const CAR_WIDTH_OFFSET: usize = 28;

pub const TARGET_NUMBER_MAX: u32 = 255;
pub const TARGET_TYPE_MAX: u32 = 4;
pub const LANE_NUMBER_MAX: u32 = 8;
/// 360 degrees in 0.01 degree units.
pub const HEADING_ANGLE_MAX_RAW: u32 = 36_000;

//! Target record fields: where each one sits, how it scales, and which raw
//! values are in range.
//!
//! Range checks run on the raw integer; an out-of-range field is kept as a
//! [`FieldOutcome::Invalid`] reading and never stops the decode.

use serde::{Deserialize, Serialize};

use super::layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    TargetNumber,
    LongitudinalDistance,
    HorizontalDistance,
    LateralSpeed,
    TargetType,
    LaneNumber,
    FrontDistance,
    FrontTimeInterval,
    LongitudinalSpeed,
    HeadingAngle,
    EventFlags,
    RadarX,
    RadarY,
    BlindSpotFlag,
    CarLength,
    CarWidth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    U8,
    U16,
    U32,
}

impl Width {
    pub fn bytes(self) -> usize {
        match self {
            Width::U8 => 1,
            Width::U16 => 2,
            Width::U32 => 4,
        }
    }

    pub fn bits(self) -> usize {
        self.bytes() * 8
    }
}

impl FieldKind {
    /// Record order.
    pub const ALL: [FieldKind; 16] = [
        FieldKind::TargetNumber,
        FieldKind::LongitudinalDistance,
        FieldKind::HorizontalDistance,
        FieldKind::LateralSpeed,
        FieldKind::TargetType,
        FieldKind::LaneNumber,
        FieldKind::FrontDistance,
        FieldKind::FrontTimeInterval,
        FieldKind::LongitudinalSpeed,
        FieldKind::HeadingAngle,
        FieldKind::EventFlags,
        FieldKind::RadarX,
        FieldKind::RadarY,
        FieldKind::BlindSpotFlag,
        FieldKind::CarLength,
        FieldKind::CarWidth,
    ];

    /// Byte offset inside a target record.
    pub fn offset(self) -> usize {
        match self {
            FieldKind::TargetNumber => layout::TARGET_NUMBER_OFFSET,
            FieldKind::LongitudinalDistance => layout::LONGITUDINAL_DISTANCE_OFFSET,
            FieldKind::HorizontalDistance => layout::HORIZONTAL_DISTANCE_OFFSET,
            FieldKind::LateralSpeed => layout::LATERAL_SPEED_OFFSET,
            FieldKind::TargetType => layout::TARGET_TYPE_OFFSET,
            FieldKind::LaneNumber => layout::LANE_NUMBER_OFFSET,
            FieldKind::FrontDistance => layout::FRONT_DISTANCE_OFFSET,
            FieldKind::FrontTimeInterval => layout::FRONT_TIME_INTERVAL_OFFSET,
            FieldKind::LongitudinalSpeed => layout::LONGITUDINAL_SPEED_OFFSET,
            FieldKind::HeadingAngle => layout::HEADING_ANGLE_OFFSET,
            FieldKind::EventFlags => layout::EVENT_FLAGS_OFFSET,
            FieldKind::RadarX => layout::RADAR_X_OFFSET,
            FieldKind::RadarY => layout::RADAR_Y_OFFSET,
            FieldKind::BlindSpotFlag => layout::BLIND_SPOT_FLAG_OFFSET,
            FieldKind::CarLength => layout::CAR_LENGTH_OFFSET,
            FieldKind::CarWidth => layout::CAR_WIDTH_OFFSET,
        }
    }

    pub fn width(self) -> Width {
        match self {
            FieldKind::TargetType
            | FieldKind::LaneNumber
            | FieldKind::EventFlags
            | FieldKind::BlindSpotFlag
            | FieldKind::CarLength
            | FieldKind::CarWidth => Width::U8,
            FieldKind::RadarX | FieldKind::RadarY => Width::U32,
            _ => Width::U16,
        }
    }

    /// Raw units per physical unit (`None` for plain integers).
    pub fn divisor(self) -> Option<f64> {
        match self {
            FieldKind::TargetNumber
            | FieldKind::TargetType
            | FieldKind::LaneNumber
            | FieldKind::EventFlags
            | FieldKind::BlindSpotFlag => None,
            FieldKind::HeadingAngle => Some(100.0),
            _ => Some(10.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldKind::TargetNumber => "Target number",
            FieldKind::LongitudinalDistance => "Longitudinal distance",
            FieldKind::HorizontalDistance => "Horizontal distance",
            FieldKind::LateralSpeed => "Speed (Y direction)",
            FieldKind::TargetType => "Target type",
            FieldKind::LaneNumber => "Lane number",
            FieldKind::FrontDistance => "Front distance",
            FieldKind::FrontTimeInterval => "Front time interval",
            FieldKind::LongitudinalSpeed => "Speed (X direction)",
            FieldKind::HeadingAngle => "Heading angle",
            FieldKind::EventFlags => "Event flags",
            FieldKind::RadarX => "Radar grid X",
            FieldKind::RadarY => "Radar grid Y",
            FieldKind::BlindSpotFlag => "Blind spot flag",
            FieldKind::CarLength => "Car length",
            FieldKind::CarWidth => "Car width",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            FieldKind::TargetNumber | FieldKind::LaneNumber => "unsigned",
            FieldKind::TargetType => "class 0..4",
            FieldKind::EventFlags => "one bit per event",
            FieldKind::BlindSpotFlag => "0 or 1",
            FieldKind::FrontTimeInterval => "s",
            FieldKind::HeadingAngle => "deg",
            FieldKind::LateralSpeed | FieldKind::LongitudinalSpeed => "0.1 per bit",
            _ => "m",
        }
    }
}

/// Validated, scaled value of one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum FieldOutcome {
    Valid(f64),
    Invalid,
}

impl FieldOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldOutcome::Valid(_))
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            FieldOutcome::Valid(value) => Some(*value),
            FieldOutcome::Invalid => None,
        }
    }
}

/// Raw wire value paired with its validated outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub raw: u32,
    pub outcome: FieldOutcome,
}

impl Reading {
    pub fn new(kind: FieldKind, raw: u32) -> Self {
        Self {
            raw,
            outcome: validate(kind, raw),
        }
    }
}

/// Applies the range policy of `kind` to `raw`, then scales valid values.
pub fn validate(kind: FieldKind, raw: u32) -> FieldOutcome {
    let in_range = match kind {
        FieldKind::TargetNumber => (1..=layout::TARGET_NUMBER_MAX).contains(&raw),
        FieldKind::TargetType => raw <= layout::TARGET_TYPE_MAX,
        FieldKind::LaneNumber => raw <= layout::LANE_NUMBER_MAX,
        FieldKind::HeadingAngle => raw <= layout::HEADING_ANGLE_MAX_RAW,
        FieldKind::BlindSpotFlag => raw == 0 || raw == 1,
        _ => true,
    };
    if !in_range {
        return FieldOutcome::Invalid;
    }
    let value = match kind.divisor() {
        Some(divisor) => f64::from(raw) / divisor,
        None => f64::from(raw),
    };
    FieldOutcome::Valid(value)
}

#[cfg(test)]
mod tests {
    use super::{FieldKind, FieldOutcome, Reading, Width, validate};
    use crate::protocols::radar::layout;

    #[test]
    fn target_number_bounds() {
        assert_eq!(validate(FieldKind::TargetNumber, 0), FieldOutcome::Invalid);
        assert_eq!(
            validate(FieldKind::TargetNumber, 1),
            FieldOutcome::Valid(1.0)
        );
        assert_eq!(
            validate(FieldKind::TargetNumber, 255),
            FieldOutcome::Valid(255.0)
        );
        assert_eq!(validate(FieldKind::TargetNumber, 256), FieldOutcome::Invalid);
    }

    #[test]
    fn target_type_and_lane_bounds() {
        assert_eq!(validate(FieldKind::TargetType, 4), FieldOutcome::Valid(4.0));
        assert_eq!(validate(FieldKind::TargetType, 5), FieldOutcome::Invalid);
        assert_eq!(validate(FieldKind::LaneNumber, 8), FieldOutcome::Valid(8.0));
        assert_eq!(validate(FieldKind::LaneNumber, 9), FieldOutcome::Invalid);
    }

    #[test]
    fn blind_spot_flag_is_boolean() {
        assert_eq!(validate(FieldKind::BlindSpotFlag, 0), FieldOutcome::Valid(0.0));
        assert_eq!(validate(FieldKind::BlindSpotFlag, 1), FieldOutcome::Valid(1.0));
        assert_eq!(validate(FieldKind::BlindSpotFlag, 2), FieldOutcome::Invalid);
    }

    #[test]
    fn heading_angle_checked_before_scaling() {
        assert_eq!(
            validate(FieldKind::HeadingAngle, 36_000),
            FieldOutcome::Valid(360.0)
        );
        assert_eq!(validate(FieldKind::HeadingAngle, 36_001), FieldOutcome::Invalid);
        assert_eq!(
            validate(FieldKind::HeadingAngle, 4_525),
            FieldOutcome::Valid(45.25)
        );
    }

    #[test]
    fn unranged_fields_are_always_valid() {
        assert_eq!(
            validate(FieldKind::EventFlags, 0xff),
            FieldOutcome::Valid(255.0)
        );
        assert_eq!(
            validate(FieldKind::RadarX, u32::MAX),
            FieldOutcome::Valid(f64::from(u32::MAX) / 10.0)
        );
        assert_eq!(
            validate(FieldKind::LongitudinalDistance, 609),
            FieldOutcome::Valid(60.9)
        );
        assert_eq!(validate(FieldKind::CarWidth, 17), FieldOutcome::Valid(1.7));
    }

    #[test]
    fn fields_fit_inside_a_record() {
        for kind in FieldKind::ALL {
            assert!(kind.offset() + kind.width().bytes() <= layout::TARGET_RECORD_LEN);
        }
        assert_eq!(FieldKind::RadarY.width(), Width::U32);
        assert_eq!(FieldKind::HeadingAngle.width().bits(), 16);
    }

    #[test]
    fn reading_keeps_raw_when_invalid() {
        let reading = Reading::new(FieldKind::LaneNumber, 255);
        assert_eq!(reading.raw, 255);
        assert!(!reading.outcome.is_valid());
        assert_eq!(reading.outcome.value(), None);
    }

    #[test]
    fn outcome_json_shape() {
        let valid = serde_json::to_value(FieldOutcome::Valid(60.9)).unwrap();
        assert_eq!(valid["status"], "valid");
        assert_eq!(valid["value"], 60.9);
        let invalid = serde_json::to_value(FieldOutcome::Invalid).unwrap();
        assert_eq!(invalid, serde_json::json!({ "status": "invalid" }));
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use radarframe_core::layout;

const BYTES_PER_LINE: usize = 16;

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/golden");
    write_fixture(&root.join("two_targets"), &two_targets())?;
    write_fixture(&root.join("truncated_record"), &truncated_record())?;
    write_fixture(&root.join("zero_length_module"), &zero_length_module())?;
    write_fixture(&root.join("no_frame"), &[0x00, 0x11, 0x22, 0xab, 0x00, 0xcd])?;
    Ok(())
}

/// Leading noise, a base-info module and one target-info module holding a
/// clean record and a record with out-of-range fields.
fn two_targets() -> Vec<u8> {
    let clean = RecordSpec {
        target_number: 7,
        distance_low: 0x2c,
        horizontal_distance: 50,
        lateral_speed: 15,
        target_type: 2,
        lane_number: 3,
        front_distance: 400,
        front_time_interval: 25,
        longitudinal_speed: 200,
        heading_angle: 4_500,
        event_flags: 0x05,
        radar_x: 1_200,
        radar_y: 345,
        blind_spot_flag: 1,
        car_length: 45,
        car_width: 18,
    };
    let faulty = RecordSpec {
        target_number: 8,
        distance_low: 0x00,
        horizontal_distance: 1,
        lateral_speed: 0,
        target_type: 5,
        lane_number: 8,
        front_distance: 0,
        front_time_interval: 0,
        longitudinal_speed: 65_535,
        heading_angle: 36_001,
        event_flags: 0xff,
        radar_x: 0,
        radar_y: 4_294_967_295,
        blind_spot_flag: 2,
        car_length: 0,
        car_width: 255,
    };

    let mut body = base_info(&[0x01, 0x00, 0x05], 0x3c);
    body.extend_from_slice(&target_info(&[clean.encode(), faulty.encode()], 0x9e));
    let mut frame = vec![0x00, 0x11];
    frame.extend_from_slice(&frame_with(&body, body.len() as u16));
    frame
}

/// The target-info module declares two records but the buffer ends ten
/// bytes into the second one.
fn truncated_record() -> Vec<u8> {
    let record = RecordSpec {
        target_number: 1,
        ..RecordSpec::default()
    };
    let mut body = base_info(&[], 0x11);
    body.extend_from_slice(&target_info(&[record.encode(), record.encode()], 0x22));
    let mut frame = frame_with(&body, body.len() as u16);
    let cut = layout::FRAME_HEADER_LEN
        + layout::BASE_INFO_MIN_LEN
        + layout::MODULE_HEADER_LEN
        + layout::TARGET_RECORD_LEN
        + 10;
    frame.truncate(cut);
    frame
}

fn zero_length_module() -> Vec<u8> {
    let mut body = base_info(&[0xaa], 0x01);
    body.extend_from_slice(&layout::TARGET_INFO_TYPE.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&[0xde, 0xad]);
    frame_with(&body, body.len() as u16)
}

#[derive(Default)]
struct RecordSpec {
    target_number: u8,
    /// Low byte of the longitudinal distance; its high byte is shared with
    /// the target number.
    distance_low: u8,
    horizontal_distance: u16,
    lateral_speed: u16,
    target_type: u8,
    lane_number: u8,
    front_distance: u16,
    front_time_interval: u16,
    longitudinal_speed: u16,
    heading_angle: u16,
    event_flags: u8,
    radar_x: u32,
    radar_y: u32,
    blind_spot_flag: u8,
    car_length: u8,
    car_width: u8,
}

impl RecordSpec {
    fn encode(&self) -> [u8; layout::TARGET_RECORD_LEN] {
        let mut record = [0u8; layout::TARGET_RECORD_LEN];
        record[layout::TARGET_NUMBER_OFFSET + 1] = self.target_number;
        record[layout::LONGITUDINAL_DISTANCE_OFFSET + 1] = self.distance_low;
        put(&mut record, layout::HORIZONTAL_DISTANCE_OFFSET, &self.horizontal_distance.to_be_bytes());
        put(&mut record, layout::LATERAL_SPEED_OFFSET, &self.lateral_speed.to_be_bytes());
        record[layout::TARGET_TYPE_OFFSET] = self.target_type;
        record[layout::LANE_NUMBER_OFFSET] = self.lane_number;
        put(&mut record, layout::FRONT_DISTANCE_OFFSET, &self.front_distance.to_be_bytes());
        put(&mut record, layout::FRONT_TIME_INTERVAL_OFFSET, &self.front_time_interval.to_be_bytes());
        put(&mut record, layout::LONGITUDINAL_SPEED_OFFSET, &self.longitudinal_speed.to_be_bytes());
        put(&mut record, layout::HEADING_ANGLE_OFFSET, &self.heading_angle.to_be_bytes());
        record[layout::EVENT_FLAGS_OFFSET] = self.event_flags;
        put(&mut record, layout::RADAR_X_OFFSET, &self.radar_x.to_be_bytes());
        put(&mut record, layout::RADAR_Y_OFFSET, &self.radar_y.to_be_bytes());
        record[layout::BLIND_SPOT_FLAG_OFFSET] = self.blind_spot_flag;
        record[layout::CAR_LENGTH_OFFSET] = self.car_length;
        record[layout::CAR_WIDTH_OFFSET] = self.car_width;
        record
    }
}

fn put(record: &mut [u8], offset: usize, bytes: &[u8]) {
    record[offset..offset + bytes.len()].copy_from_slice(bytes);
}

fn frame_with(body: &[u8], total_data_length: u16) -> Vec<u8> {
    let mut frame = layout::SYNC_MARKER_BYTES.to_vec();
    frame.extend_from_slice(&total_data_length.to_be_bytes());
    frame.extend_from_slice(body);
    frame
}

fn base_info(payload: &[u8], checksum: u8) -> Vec<u8> {
    let length = (layout::MODULE_HEADER_LEN + payload.len() + 1) as u16;
    let mut module = layout::BASE_INFO_TYPE.to_be_bytes().to_vec();
    module.extend_from_slice(&length.to_be_bytes());
    module.extend_from_slice(payload);
    module.push(checksum);
    module
}

fn target_info(records: &[[u8; layout::TARGET_RECORD_LEN]], checksum: u8) -> Vec<u8> {
    let length = (layout::MODULE_HEADER_LEN
        + records.len() * layout::TARGET_RECORD_LEN
        + layout::TARGET_INFO_CHECKSUM_FROM_END) as u16;
    let mut module = layout::TARGET_INFO_TYPE.to_be_bytes().to_vec();
    module.extend_from_slice(&length.to_be_bytes());
    for record in records {
        module.extend_from_slice(record);
    }
    module.push(checksum);
    module.extend(std::iter::repeat_n(0u8, layout::TARGET_INFO_CHECKSUM_FROM_END - 1));
    module
}

fn write_fixture(dir: &Path, bytes: &[u8]) -> Result<(), String> {
    fs::create_dir_all(dir)
        .map_err(|err| format!("failed to create {}: {}", dir.display(), err))?;
    let path = dir.join("input.hex");
    fs::write(&path, format_hex(bytes))
        .map_err(|err| format!("failed to write {}: {}", path.display(), err))
}

fn format_hex(bytes: &[u8]) -> String {
    bytes
        .chunks(BYTES_PER_LINE)
        .map(|line| {
            let mut text = line
                .iter()
                .map(|b| format!("{:02X}", b))
                .collect::<Vec<_>>()
                .join(" ");
            text.push('\n');
            text
        })
        .collect()
}

use radarframe_core::{
    BaseInfo, FieldOutcome, Frame, Module, Reading, Report, TargetInfo, TargetRecord,
};

const RULE_WIDTH: usize = 115;

/// Renders the decoded frame of `report` as fixed-width text tables.
pub fn render_tables(report: &Report) -> String {
    let mut table = Table::default();
    if let Some(frame) = &report.frame {
        render_frame(&mut table, frame);
    }
    table.out
}

fn render_frame(table: &mut Table, frame: &Frame) {
    table.section("Frame header");
    table.row(
        "Frame header",
        &format!("{:#06X}", frame.header.sync_marker),
        16,
        "Data frame sync marker",
    );
    table.row(
        "Total data length",
        &frame.header.total_data_length.to_string(),
        16,
        "Bytes of module data after the header",
    );

    for module in &frame.modules {
        match module {
            Module::BaseInfo(base) => render_base_info(table, base),
            Module::TargetInfo(info) => render_target_info(table, info),
        }
    }

    table.out.push('\n');
    table
        .out
        .push_str(&format!("Targets processed: {}\n", frame.target_count));
}

fn render_base_info(table: &mut Table, base: &BaseInfo) {
    table.section("Base info module");
    table.row(
        "Module type",
        &format!("{:#06X}", base.module_type),
        16,
        "ASCII 'JB'",
    );
    table.row(
        "Module data length",
        &base.data_length.to_string(),
        16,
        "Base info module data length",
    );
    table.row("Checksum", &base.checksum.to_string(), 8, "Module checksum");
}

fn render_target_info(table: &mut Table, info: &TargetInfo) {
    table.section("Target info module");
    table.row(
        "Module type",
        &format!("{:#06X}", info.module_type),
        16,
        "ASCII 'MB'",
    );
    table.row(
        "Module data length",
        &info.data_length.to_string(),
        16,
        "Target info module data length",
    );
    for record in &info.targets {
        render_target(table, record);
    }
    let checksum = info
        .checksum
        .map_or_else(|| "missing".to_string(), |checksum| checksum.to_string());
    table.row("Checksum", &checksum, 8, "Checksum over all target data");
}

fn render_target(table: &mut Table, record: &TargetRecord) {
    for (kind, reading) in record.readings() {
        table.row(
            kind.label(),
            &format_reading(reading),
            kind.width().bits(),
            kind.unit(),
        );
    }
}

pub fn format_reading(reading: &Reading) -> String {
    match reading.outcome {
        FieldOutcome::Valid(value) => value.to_string(),
        FieldOutcome::Invalid => "invalid".to_string(),
    }
}

#[derive(Default)]
struct Table {
    out: String,
    row: usize,
}

impl Table {
    fn section(&mut self, title: &str) {
        self.row = 0;
        self.out.push('\n');
        self.out.push_str(title);
        self.out.push('\n');
        self.out.push_str(&"=".repeat(title.chars().count()));
        self.out.push('\n');
        self.out.push_str(&format!(
            "{:<5}{:<30}{:<20}{:<20}{}\n",
            "No", "Name", "Content", "Length (bits)", "Description"
        ));
        self.out.push_str(&"-".repeat(RULE_WIDTH));
        self.out.push('\n');
    }

    fn row(&mut self, name: &str, content: &str, bits: usize, description: &str) {
        self.row += 1;
        self.out.push_str(&format!(
            "{:<5}{:<30}{:<20}{:<20}{}\n",
            self.row, name, content, bits, description
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::{format_reading, render_tables};
    use radarframe_core::{FieldKind, Reading, analyze_buffer, make_stub_report};

    fn sample_frame() -> Vec<u8> {
        let mut bytes = vec![0xab, 0xcd, 0x00, 0x32, 0x4a, 0x42, 0x00, 0x05, 0x1d];
        let mut module = vec![0x4d, 0x42, 0x00, 0x2d];
        let mut record = [0u8; 33];
        record[1] = 3;
        record[7] = 9;
        module.extend_from_slice(&record);
        module.extend_from_slice(&[0x82, 0, 0, 0, 0, 0, 0, 0]);
        bytes.extend_from_slice(&module);
        bytes
    }

    #[test]
    fn renders_sections_and_count() {
        let report = analyze_buffer(&sample_frame());
        let text = render_tables(&report);
        assert!(text.contains("Frame header\n============"));
        assert!(text.contains("0xABCD"));
        assert!(text.contains("Base info module"));
        assert!(text.contains("0x4A42"));
        assert!(text.contains("Target info module"));
        assert!(text.contains("0x4D42"));
        assert!(text.contains("Targets processed: 1"));
    }

    #[test]
    fn invalid_fields_render_as_invalid() {
        let report = analyze_buffer(&sample_frame());
        let text = render_tables(&report);
        let line = text
            .lines()
            .find(|line| line.contains("Target type"))
            .expect("target type row");
        assert!(line.contains("invalid"));
    }

    #[test]
    fn cut_target_module_renders_missing_checksum() {
        let mut bytes = sample_frame();
        bytes.truncate(9 + 4 + 33);
        let report = analyze_buffer(&bytes);
        let text = render_tables(&report);
        let line = text
            .lines()
            .rev()
            .find(|line| line.contains("Checksum"))
            .expect("target checksum row");
        assert!(line.contains("missing"));
        assert!(text.contains("Targets processed: 1"));
    }

    #[test]
    fn no_frame_renders_nothing() {
        assert!(render_tables(&make_stub_report(0)).is_empty());
    }

    #[test]
    fn readings_format_scaled_values() {
        assert_eq!(format_reading(&Reading::new(FieldKind::CarLength, 45)), "4.5");
        assert_eq!(format_reading(&Reading::new(FieldKind::LaneNumber, 3)), "3");
        assert_eq!(
            format_reading(&Reading::new(FieldKind::HeadingAngle, 36_001)),
            "invalid"
        );
    }
}

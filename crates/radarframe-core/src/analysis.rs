use tracing::debug;

use crate::protocols::radar::decode_frame;
use crate::{Halt, Report, make_stub_report};

/// Decodes `buffer` once and assembles a [`Report`].
///
/// Never fails: a missing frame or an early stop is recorded in
/// [`Report::halt`].
pub fn analyze_buffer(buffer: &[u8]) -> Report {
    let mut report = make_stub_report(buffer.len() as u64);
    match decode_frame(buffer) {
        Ok(outcome) => {
            report.invalid_fields = outcome.frame.out_of_range().collect();
            report.halt = outcome.halted.as_ref().map(Halt::from);
            debug!(
                modules = outcome.frame.modules.len(),
                targets = outcome.frame.target_count,
                invalid_fields = report.invalid_fields.len(),
                "analysis complete"
            );
            report.frame = Some(outcome.frame);
        }
        Err(err) => {
            report.halt = Some(Halt::from(&err));
        }
    }
    report
}

use super::layout;

/// Returns the index of the first byte of the first sync marker, if any.
///
/// Single left-to-right pass; the earliest match wins.
pub fn locate_frame(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(layout::SYNC_MARKER_BYTES.len())
        .position(|pair| pair == layout::SYNC_MARKER_BYTES)
}

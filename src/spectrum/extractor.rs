use crate::types::{Axis, SampleWindow, BYTES_PER_SAMPLE};

// Accelerometer calibration: 100 raw counts per m/s² (fixed by the device's
// register configuration, not adjustable at runtime).
const RAW_COUNTS_PER_UNIT: f32 = 100.0;

/// 从原始交错缓冲区提取单轴时间序列
///
/// Reconstructs the little-endian i16 for the requested axis out of every
/// 6-byte sample and scales it to physical units. Pure: the window is not
/// touched and the output length always equals the window's sample count.
pub fn extract(window: &SampleWindow, axis: Axis) -> Vec<f32> {
    let offset = axis.byte_offset();
    window
        .raw()
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|sample| {
            let raw = i16::from_le_bytes([sample[offset], sample[offset + 1]]);
            raw as f32 / RAW_COUNTS_PER_UNIT
        })
        .collect()
}

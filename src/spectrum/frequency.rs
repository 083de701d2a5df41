use crate::types::CycleError;

/// 由实测采集时长推导每个频点的物理频率（Hz）
///
/// Bin i (1-indexed, DC excluded) represents i × 1000 / duration_ms Hz. The
/// sampling rate is inferred from the measured window time rather than a
/// nominal figure, so bin spacing tracks real bus timing jitter.
///
/// A zero duration (clock resolution underflow) would turn every frequency
/// into ±Inf, so it is rejected up front and the cycle is skipped.
pub fn build_frequency_axis(bin_count: usize, duration_ms: u64) -> Result<Vec<f32>, CycleError> {
    if duration_ms == 0 {
        return Err(CycleError::InvalidDuration(duration_ms));
    }

    Ok((1..=bin_count)
        .map(|i| i as f32 * 1000.0 / duration_ms as f32)
        .collect())
}

/// Bytes occupied by one raw sample: three little-endian i16 axis values.
pub const BYTES_PER_SAMPLE: usize = 6;

/// 三轴加速度计的单个轴
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Byte offset of this axis inside one 6-byte sample.
    pub fn byte_offset(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 2,
            Axis::Z => 4,
        }
    }
}

/// 一次采集窗口的原始字节：N 个连续的 6 字节样本
///
/// The buffer is sized once and reused between cycles; every byte is
/// overwritten by the next acquisition before anything reads it again.
#[derive(Debug)]
pub struct SampleWindow {
    raw: Vec<u8>,
    sample_count: usize,
}

impl SampleWindow {
    pub fn new(sample_count: usize) -> Self {
        Self {
            raw: vec![0; sample_count * BYTES_PER_SAMPLE],
            sample_count,
        }
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub(crate) fn raw_mut(&mut self) -> &mut [u8] {
        &mut self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_sized_for_six_bytes_per_sample() {
        let window = SampleWindow::new(128);
        assert_eq!(window.raw().len(), 128 * BYTES_PER_SAMPLE);
        assert_eq!(window.sample_count(), 128);
    }

    #[test]
    fn axis_offsets_cover_the_sample() {
        assert_eq!(Axis::X.byte_offset(), 0);
        assert_eq!(Axis::Y.byte_offset(), 2);
        assert_eq!(Axis::Z.byte_offset(), 4);
    }
}

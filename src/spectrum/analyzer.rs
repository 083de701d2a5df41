use std::sync::Arc;

use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};

use crate::types::CycleError;

/// 配置错误：不支持的变换长度（启动时检测，进程级致命）
#[derive(Debug, thiserror::Error)]
#[error("unsupported FFT window size {0}: must be a power of two >= 4")]
pub struct UnsupportedWindowSize(pub usize);

/// 单轴频谱分析器
///
/// The transform plan and its work buffers are created once at start-up and
/// reused for all three axes and all cycles; only the returned magnitude
/// vector is allocated per call.
pub struct SpectrumAnalyzer {
    window_size: usize,
    fft: Arc<dyn RealToComplex<f32>>,
    output: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl SpectrumAnalyzer {
    pub fn new(window_size: usize) -> Result<Self, UnsupportedWindowSize> {
        if window_size < 4 || !window_size.is_power_of_two() {
            return Err(UnsupportedWindowSize(window_size));
        }

        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(window_size);
        let output = fft.make_output_vec();
        let scratch = fft.make_scratch_vec();

        Ok(Self {
            window_size,
            fft,
            output,
            scratch,
        })
    }

    /// Number of magnitude values per spectrum: bins 1..N/2, DC excluded.
    pub fn bin_count(&self) -> usize {
        self.window_size / 2 - 1
    }

    /// Forward real FFT over one axis's time series, returning per-bin
    /// magnitudes. The DC term (bin 0) and the Nyquist bin are dropped.
    ///
    /// Magnitudes are deliberately un-normalized (no 1/N scaling): the
    /// downstream consumers were built against raw transform output, so they
    /// scale linearly with window size and input amplitude.
    pub fn analyze(&mut self, series: &mut [f32]) -> Result<Vec<f32>, CycleError> {
        self.fft
            .process_with_scratch(series, &mut self.output, &mut self.scratch)
            .map_err(|e| CycleError::Fft(e.to_string()))?;

        Ok(self.output[1..self.window_size / 2]
            .iter()
            .map(|bin| bin.norm())
            .collect())
    }
}

//! 采集 → 提取 → 频谱 → 打包 的周期流水线

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use log::{debug, info, trace, warn};

use crate::config::SamplingConfig;
use crate::payload::PayloadBuffer;
use crate::sensor::{SampleAcquirer, SampleBus};
use crate::spectrum::{build_frequency_axis, extract, SpectrumAnalyzer, UnsupportedWindowSize};
use crate::types::{Axis, CycleError, SampleWindow};

/// One complete sampling pipeline: owns the acquirer, the shared FFT plan
/// and the two fixed-size buffers (raw window, wire payload) that are reused
/// between cycles without reallocation.
pub struct Pipeline {
    acquirer: SampleAcquirer,
    analyzer: SpectrumAnalyzer,
    window: SampleWindow,
    payload: PayloadBuffer,
    cycle_delay: Duration,
}

impl Pipeline {
    pub fn new(sampling: &SamplingConfig) -> Result<Self, UnsupportedWindowSize> {
        let analyzer = SpectrumAnalyzer::new(sampling.window_size)?;

        Ok(Self {
            acquirer: SampleAcquirer::new(
                sampling.window_size,
                Duration::from_millis(sampling.acquisition_timeout_ms),
            ),
            analyzer,
            window: SampleWindow::new(sampling.window_size),
            payload: PayloadBuffer::new(sampling.window_size),
            cycle_delay: Duration::from_millis(sampling.cycle_delay_ms),
        })
    }

    /// Run one full cycle against the bus and return the finished wire
    /// payload. Any error aborts the cycle before anything is handed to the
    /// publisher, so partial payloads can never leave the pipeline.
    pub fn run_cycle<B: SampleBus>(&mut self, bus: &mut B) -> Result<Vec<u8>, CycleError> {
        let elapsed_us = self.acquirer.acquire(bus, &mut self.window)?;
        // 整数截断：与下游按毫秒换算频率的约定一致
        let duration_ms = elapsed_us / 1000;
        debug!("window of {} samples captured in {}ms", self.window.sample_count(), duration_ms);

        let frequency = build_frequency_axis(self.analyzer.bin_count(), duration_ms)?;

        let mut spectra = Vec::with_capacity(Axis::ALL.len());
        for axis in Axis::ALL {
            let mut series = extract(&self.window, axis);
            spectra.push(self.analyzer.analyze(&mut series)?);
        }

        self.payload
            .pack(&frequency, &spectra[0], &spectra[1], &spectra[2]);
        if log::log_enabled!(log::Level::Trace) {
            trace!("payload:\n{}", self.payload.hex_dump());
        }

        Ok(self.payload.as_bytes().to_vec())
    }

    /// 主循环：逐周期执行，出错记录并跳过该周期
    pub fn run<B: SampleBus>(
        &mut self,
        bus: &mut B,
        payload_sender: Sender<Vec<u8>>,
        shutdown_signal: Arc<AtomicBool>,
    ) {
        while !shutdown_signal.load(Ordering::Relaxed) {
            match self.run_cycle(bus) {
                Ok(payload) => {
                    if payload_sender.send(payload).is_err() {
                        info!("Publisher channel closed, pipeline exiting");
                        break;
                    }
                }
                Err(e) => warn!("Cycle skipped: {}", e),
            }

            thread::sleep(self.cycle_delay);
        }
    }
}

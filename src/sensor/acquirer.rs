use std::time::{Duration, Instant};

use super::bus::SampleBus;
use crate::types::{CycleError, SampleWindow, BYTES_PER_SAMPLE};

/// 样本窗口采集器
///
/// Drives N sequential 6-byte block reads into the window buffer and measures
/// the wall-clock time of the whole loop. The measured time, not a nominal
/// rate, is what the frequency axis is later derived from, so bin spacing
/// follows actual bus timing cycle by cycle.
pub struct SampleAcquirer {
    window_size: usize,
    deadline: Duration,
}

impl SampleAcquirer {
    pub fn new(window_size: usize, deadline: Duration) -> Self {
        Self {
            window_size,
            deadline,
        }
    }

    /// Fill `window` with one batch of consecutive samples.
    ///
    /// Returns the elapsed acquisition time in microseconds. A sensor that
    /// stops answering would otherwise block the loop forever (a known
    /// failure mode of the BNO055 after an interrupted measurement), so the
    /// whole acquisition runs against a deadline and bails out with
    /// `AcquisitionStalled` once it is exceeded.
    pub fn acquire<B: SampleBus>(
        &self,
        bus: &mut B,
        window: &mut SampleWindow,
    ) -> Result<u64, CycleError> {
        debug_assert_eq!(window.sample_count(), self.window_size);

        let start = Instant::now();
        for chunk in window.raw_mut().chunks_exact_mut(BYTES_PER_SAMPLE) {
            bus.read_block(chunk)?;
            if start.elapsed() > self.deadline {
                return Err(CycleError::AcquisitionStalled(self.deadline.as_millis() as u64));
            }
        }

        Ok(start.elapsed().as_micros() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::bus::BusError;
    use std::thread;

    struct PatternBus {
        next: u8,
    }

    impl SampleBus for PatternBus {
        fn write_block(&mut self, _bytes: &[u8]) -> Result<(), BusError> {
            Ok(())
        }

        fn read_block(&mut self, buf: &mut [u8]) -> Result<(), BusError> {
            for byte in buf.iter_mut() {
                *byte = self.next;
                self.next = self.next.wrapping_add(1);
            }
            Ok(())
        }
    }

    struct StalledBus;

    impl SampleBus for StalledBus {
        fn write_block(&mut self, _bytes: &[u8]) -> Result<(), BusError> {
            Ok(())
        }

        fn read_block(&mut self, _buf: &mut [u8]) -> Result<(), BusError> {
            thread::sleep(Duration::from_millis(20));
            Ok(())
        }
    }

    #[test]
    fn acquire_fills_the_window_in_read_order() {
        let acquirer = SampleAcquirer::new(4, Duration::from_secs(1));
        let mut window = SampleWindow::new(4);
        let elapsed_us = acquirer
            .acquire(&mut PatternBus { next: 0 }, &mut window)
            .unwrap();

        let expected: Vec<u8> = (0..24).collect();
        assert_eq!(window.raw(), expected.as_slice());
        assert!(elapsed_us < 1_000_000);
    }

    #[test]
    fn acquire_detects_a_stalled_sensor() {
        let acquirer = SampleAcquirer::new(128, Duration::from_millis(10));
        let mut window = SampleWindow::new(128);
        let result = acquirer.acquire(&mut StalledBus, &mut window);

        assert!(matches!(result, Err(CycleError::AcquisitionStalled(10))));
    }

    #[test]
    fn bus_errors_abort_the_acquisition() {
        struct FailingBus;
        impl SampleBus for FailingBus {
            fn write_block(&mut self, _bytes: &[u8]) -> Result<(), BusError> {
                Ok(())
            }
            fn read_block(&mut self, _buf: &mut [u8]) -> Result<(), BusError> {
                Err(BusError::ShortRead {
                    expected: 6,
                    got: 2,
                })
            }
        }

        let acquirer = SampleAcquirer::new(8, Duration::from_secs(1));
        let mut window = SampleWindow::new(8);
        assert!(matches!(
            acquirer.acquire(&mut FailingBus, &mut window),
            Err(CycleError::Bus(_))
        ));
    }
}

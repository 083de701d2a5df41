//! 无硬件开发用的模拟总线

use std::f32::consts::TAU;
use std::thread;
use std::time::Duration;

use rand::Rng;

use super::bus::{BusError, SampleBus};
use crate::types::BYTES_PER_SAMPLE;

// One simulated bus transaction per sample, so the nominal rate is
// 1 / READ_DELAY. 1ms roughly matches the real device at 1000Hz bandwidth.
const NOMINAL_RATE_HZ: f32 = 1000.0;

/// Synthetic BNO055 stand-in: answers every 6-byte block read with one
/// sample of three sinusoids (plus a little noise and a gravity offset on
/// the z axis), timed like a real ~1kHz bus.
pub struct SimulatedBus {
    sample_index: u64,
    read_delay: Duration,
    rng: rand::rngs::ThreadRng,
}

impl SimulatedBus {
    pub fn new() -> Self {
        Self::with_read_delay(Duration::from_millis(1))
    }

    /// Tests use a shorter delay to keep acquisition fast while still
    /// reporting a non-zero window duration.
    pub fn with_read_delay(read_delay: Duration) -> Self {
        Self {
            sample_index: 0,
            read_delay,
            rng: rand::rng(),
        }
    }

    fn sample_axis(&mut self, frequency_hz: f32, amplitude: f32, offset: f32) -> i16 {
        let t = self.sample_index as f32 / NOMINAL_RATE_HZ;
        let value = offset + amplitude * (TAU * frequency_hz * t).sin();
        let noise: i16 = self.rng.random_range(-3..=3);
        // Raw counts: 100 LSB per m/s², same as the real accelerometer
        ((value * 100.0) as i16).saturating_add(noise)
    }
}

impl Default for SimulatedBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleBus for SimulatedBus {
    fn write_block(&mut self, _bytes: &[u8]) -> Result<(), BusError> {
        // Register writes are accepted and ignored
        Ok(())
    }

    fn read_block(&mut self, buf: &mut [u8]) -> Result<(), BusError> {
        if buf.len() != BYTES_PER_SAMPLE {
            return Err(BusError::ShortRead {
                expected: BYTES_PER_SAMPLE,
                got: buf.len(),
            });
        }

        if !self.read_delay.is_zero() {
            thread::sleep(self.read_delay);
        }

        let x = self.sample_axis(50.0, 2.0, 0.0);
        let y = self.sample_axis(120.0, 1.0, 0.0);
        let z = self.sample_axis(25.0, 0.5, 9.81);
        buf[0..2].copy_from_slice(&x.to_le_bytes());
        buf[2..4].copy_from_slice(&y.to_le_bytes());
        buf[4..6].copy_from_slice(&z.to_le_bytes());
        self.sample_index += 1;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_block_produces_one_sample_per_call() {
        let mut bus = SimulatedBus::with_read_delay(Duration::ZERO);
        let mut first = [0u8; 6];
        let mut second = [0u8; 6];
        bus.read_block(&mut first).unwrap();
        bus.read_block(&mut second).unwrap();

        // z axis carries the gravity offset, so it is never all zero
        let z = i16::from_le_bytes([first[4], first[5]]);
        assert!(z > 900, "z = {} should sit near +9.81 m/s²", z);
    }

    #[test]
    fn read_block_rejects_wrong_block_sizes() {
        let mut bus = SimulatedBus::with_read_delay(Duration::ZERO);
        let mut buf = [0u8; 4];
        assert!(matches!(
            bus.read_block(&mut buf),
            Err(BusError::ShortRead { expected: 6, got: 4 })
        ));
    }
}

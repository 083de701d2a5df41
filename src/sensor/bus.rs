use embedded_hal::i2c::I2c;

use crate::config::SensorConfig;

/// 总线传输错误
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("bus transfer failed: {0}")]
    Transfer(String),
    #[error("short read: expected {expected} bytes, got {got}")]
    ShortRead { expected: usize, got: usize },
}

/// 传感器总线抽象
///
/// The pipeline only ever needs two things from the device: write a small
/// register/value block, and read a fixed-size data block. Keeping the seam
/// this narrow lets the same pipeline run against real I2C hardware or the
/// simulated bus.
pub trait SampleBus {
    /// Write raw bytes to the device (register address followed by values).
    fn write_block(&mut self, bytes: &[u8]) -> Result<(), BusError>;

    /// Read exactly `buf.len()` bytes from the device into `buf`.
    ///
    /// Contract: implementations may block, but only for a bounded time per
    /// call (one bus transaction). The acquirer checks its stall deadline
    /// between reads, so an implementation that can hang indefinitely inside
    /// a single call would defeat stall detection.
    fn read_block(&mut self, buf: &mut [u8]) -> Result<(), BusError>;
}

/// embedded-hal 阻塞式 I2C 外设适配器
///
/// Generic over any `embedded_hal::i2c::I2c` implementation, so platform
/// integrations (linux i2cdev, microcontroller HALs) plug in without touching
/// the pipeline.
pub struct I2cSampleBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> I2cSampleBus<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Attach real hardware using the configured device address.
    pub fn from_config(i2c: I2C, sensor: &SensorConfig) -> Self {
        Self::new(i2c, sensor.device_address)
    }
}

impl<I2C: I2c> SampleBus for I2cSampleBus<I2C> {
    fn write_block(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        self.i2c
            .write(self.address, bytes)
            .map_err(|e| BusError::Transfer(format!("{:?}", e)))
    }

    fn read_block(&mut self, buf: &mut [u8]) -> Result<(), BusError> {
        self.i2c
            .read(self.address, buf)
            .map_err(|e| BusError::Transfer(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation, SevenBitAddress};

    #[derive(Debug)]
    struct MockI2cError;

    impl embedded_hal::i2c::Error for MockI2cError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    struct MockI2c {
        addresses: Vec<u8>,
    }

    impl ErrorType for MockI2c {
        type Error = MockI2cError;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            address: SevenBitAddress,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            self.addresses.push(address);
            for operation in operations {
                if let Operation::Read(buf) = operation {
                    buf.fill(0);
                }
            }
            Ok(())
        }
    }

    #[test]
    fn adapter_addresses_the_configured_device() {
        let sensor = SensorConfig::default();
        let mut bus = I2cSampleBus::from_config(MockI2c { addresses: Vec::new() }, &sensor);

        bus.write_block(&[0x3d, 0b0000_0001]).unwrap();
        let mut buf = [0u8; 6];
        bus.read_block(&mut buf).unwrap();

        assert_eq!(bus.i2c.addresses, vec![sensor.device_address; 2]);
        assert_eq!(sensor.device_address, 0x29);
    }
}

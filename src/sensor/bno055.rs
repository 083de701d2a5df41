//! BNO055 寄存器级启动配置

use std::thread;
use std::time::Duration;

use super::bus::{BusError, SampleBus};

/// Default I2C address of the BNO055 (COM3 pin high).
pub const BNO055_ADDRESS: u8 = 0x29;

const OPR_MODE_REG: u8 = 0x3d;
const OPR_MODE_VAL_CONFIGMODE: u8 = 0b0000_0000;
const OPR_MODE_VAL_ACCONLY: u8 = 0b0000_0001;

const ACC_CONFIG_REG: u8 = 0x08;
// Normal power mode, 1000Hz bandwidth, 16G range
const ACC_CONFIG_VAL: u8 = 0b0001_1111;

// First register of the acceleration data block (ACC_DATA_X_LSB); the
// sampling loop reads 6 bytes from here on every pass.
const ACC_DATA_REG: u8 = 0x08;

// Datasheet: any mode to config mode takes 19ms, config mode to any other
// mode takes 7ms. 100ms leaves plenty of margin on a slow bus.
const MODE_SETTLE: Duration = Duration::from_millis(100);

/// Switch the sensor into accelerometer-only mode at 1000Hz bandwidth and
/// point the register pointer at the acceleration data block.
pub fn configure<B: SampleBus>(bus: &mut B) -> Result<(), BusError> {
    bus.write_block(&[OPR_MODE_REG, OPR_MODE_VAL_CONFIGMODE])?;
    thread::sleep(MODE_SETTLE);

    bus.write_block(&[ACC_CONFIG_REG, ACC_CONFIG_VAL])?;
    thread::sleep(MODE_SETTLE);

    bus.write_block(&[OPR_MODE_REG, OPR_MODE_VAL_ACCONLY])?;
    thread::sleep(MODE_SETTLE);

    bus.write_block(&[ACC_DATA_REG])?;
    thread::sleep(MODE_SETTLE);

    Ok(())
}

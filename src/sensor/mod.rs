pub mod acquirer;
pub mod bno055;
pub mod bus;
pub mod simulated;

pub use acquirer::SampleAcquirer;
pub use bus::{BusError, I2cSampleBus, SampleBus};
pub use simulated::SimulatedBus;

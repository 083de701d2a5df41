use crate::sensor::BusError;

/// 单个采集周期内可能出现的错误
///
/// None of these are fatal to the process: the main loop logs the error,
/// skips the cycle and retries at the next tick. Only configuration errors
/// (see `config::ConfigError` and `spectrum::UnsupportedWindowSize`) halt
/// start-up.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("sensor bus error: {0}")]
    Bus(#[from] BusError),
    #[error("acquisition exceeded the {0}ms deadline, sensor may be stalled")]
    AcquisitionStalled(u64),
    #[error("acquisition window measured {0}ms, cannot derive bin frequencies")]
    InvalidDuration(u64),
    #[error("FFT execution failed: {0}")]
    Fft(String),
    #[error("MQTT transport not connected, payload dropped")]
    TransportUnavailable,
}

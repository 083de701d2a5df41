//! SenseEdge：边缘端加速度计频谱发布器
//!
//! Samples a BNO055 3-axis accelerometer in fixed windows, runs a real-input
//! FFT per axis, packs the spectra into the fixed binary wire layout and
//! publishes each payload over MQTT.

pub mod config;
pub mod logger;
pub mod mqtt;
pub mod payload;
pub mod pipeline;
pub mod sensor;
pub mod spectrum;
pub mod types;

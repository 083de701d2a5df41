use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::bounded;
use log::{error, info};

use sense_edge::config::{AppConfig, ConfigError};
use sense_edge::pipeline::Pipeline;
use sense_edge::sensor::SimulatedBus;
use sense_edge::{logger, mqtt, sensor};

const CONFIG_PATH: &str = "config.toml";

fn main() {
    logger::init_logger();
    info!("SenseEdge starting");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let mut pipeline = match Pipeline::new(&config.sampling) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let (payload_sender, payload_receiver) = bounded(8);
    let shutdown_signal = Arc::new(AtomicBool::new(false));

    let mqtt_config = config.mqtt.clone();
    let mqtt_shutdown = Arc::clone(&shutdown_signal);
    let mqtt_handle = thread::spawn(move || {
        if let Err(e) = mqtt::run_publisher(mqtt_config, payload_receiver, mqtt_shutdown) {
            error!("MQTT thread failed: {}", e);
        }
    });

    // 本构建使用模拟总线；真实硬件通过 I2cSampleBus 适配 embedded-hal I2C 外设接入
    info!(
        "Simulated BNO055 at I2C address 0x{:02x}, window size {}",
        config.sensor.device_address, config.sampling.window_size
    );
    let mut bus = SimulatedBus::new();
    if let Err(e) = sensor::bno055::configure(&mut bus) {
        error!("Sensor configuration failed: {}", e);
        std::process::exit(1);
    }

    // Ctrl-C 触发优雅关闭：流水线在周期边界退出，发布线程随后收到信号
    let ctrlc_shutdown = Arc::clone(&shutdown_signal);
    if let Err(e) = ctrlc::set_handler(move || {
        ctrlc_shutdown.store(true, Ordering::Relaxed);
    }) {
        error!("Failed to install Ctrl-C handler: {}", e);
        std::process::exit(1);
    }

    pipeline.run(&mut bus, payload_sender, Arc::clone(&shutdown_signal));

    // 流水线退出后，通知发布线程优雅关闭
    info!("Pipeline stopped, signaling MQTT thread to shutdown");
    shutdown_signal.store(true, Ordering::Relaxed);

    match mqtt_handle.join() {
        Ok(()) => info!("MQTT thread shut down gracefully"),
        Err(e) => error!("MQTT thread panicked: {:?}", e),
    }
}

fn load_config() -> Result<AppConfig, ConfigError> {
    if Path::new(CONFIG_PATH).exists() {
        AppConfig::load_from_file(CONFIG_PATH)
    } else {
        info!("No {} found, writing defaults", CONFIG_PATH);
        let config = AppConfig::default();
        config.save_to_file(CONFIG_PATH)?;
        Ok(config)
    }
}

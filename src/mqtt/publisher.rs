use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use dotenv::dotenv;
use log::{error, info, warn};
use rumqttc::{Client, Event, MqttOptions, Packet, QoS};

use crate::config::MqttConfig;
use crate::types::CycleError;

const RECONNECT_BACKOFF_INITIAL: Duration = Duration::from_millis(500);
const RECONNECT_BACKOFF_MAX: Duration = Duration::from_secs(10);

/// 发布线程：持有 MQTT 客户端，从通道接收完整载荷并发布
///
/// The connection event loop runs on its own inner thread and tracks broker
/// connectivity; reconnects use bounded exponential backoff so a dead broker
/// never turns into a busy spin. Payloads that arrive while disconnected are
/// dropped with a warning; the pipeline produces a fresh one next cycle.
pub fn run_publisher(
    config: MqttConfig,
    payload_receiver: Receiver<Vec<u8>>,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok(); // 加载 .env 文件

    let mut mqtt_options = MqttOptions::new(config.client_id, config.broker, config.port);
    mqtt_options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive)));

    // 原始设备同时支持匿名和认证两种 broker
    if let (Ok(user), Ok(pass)) = (env::var("MQTT_USER"), env::var("MQTT_PASS")) {
        mqtt_options.set_credentials(user, pass);
    }

    let (client, mut connection) = Client::new(mqtt_options, 10);

    let connected = Arc::new(AtomicBool::new(false));
    let event_connected = Arc::clone(&connected);
    let event_shutdown = Arc::clone(&shutdown_signal);
    let event_loop = thread::spawn(move || {
        let mut backoff = RECONNECT_BACKOFF_INITIAL;
        for event in connection.iter() {
            if event_shutdown.load(Ordering::Relaxed) {
                break;
            }
            match event {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("Connected to MQTT broker");
                    event_connected.store(true, Ordering::Relaxed);
                    backoff = RECONNECT_BACKOFF_INITIAL;
                }
                Ok(_) => {}
                Err(e) => {
                    event_connected.store(false, Ordering::Relaxed);
                    error!("MQTT connection error: {}, retrying in {:?}", e, backoff);
                    thread::sleep(backoff);
                    backoff = (backoff * 2).min(RECONNECT_BACKOFF_MAX);
                }
            }
        }
    });

    let qos = match config.qos {
        0 => QoS::AtMostOnce,
        1 => QoS::AtLeastOnce,
        _ => QoS::ExactlyOnce,
    };

    loop {
        if shutdown_signal.load(Ordering::Relaxed) {
            info!("Publisher received shutdown signal, exiting gracefully");
            break;
        }

        match payload_receiver.recv_timeout(Duration::from_millis(250)) {
            Ok(payload) => {
                if !connected.load(Ordering::Relaxed) {
                    warn!("{}", CycleError::TransportUnavailable);
                    continue;
                }
                // 每个周期恰好发布一次完整载荷
                if let Err(e) = client.publish(config.topic.as_str(), qos, false, payload) {
                    error!("MQTT publish failed: {}", e);
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                info!("Payload channel disconnected, publisher exiting");
                break;
            }
        }
    }

    let _ = client.disconnect();
    let _ = event_loop.join();

    Ok(())
}

use serde::{Deserialize, Serialize};

/// 应用配置管理模块
/// 集中管理所有配置项，提供默认值和配置验证

/// 主配置结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub mqtt: MqttConfig,
    pub sensor: SensorConfig,
    pub sampling: SamplingConfig,
}

/// MQTT配置
///
/// Broker credentials deliberately live in the environment (MQTT_USER /
/// MQTT_PASS, optionally via .env), never in this file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    pub broker: String,
    pub port: u16,
    pub client_id: String,
    pub topic: String,
    pub qos: u8,
    pub keep_alive: u16,
}

/// 传感器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    pub device_address: u8,
}

/// 采样配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Samples per acquisition window; must be a power of two >= 4.
    pub window_size: usize,
    /// Whole-window acquisition deadline; exceeding it means the sensor
    /// stalled and the cycle is abandoned.
    pub acquisition_timeout_ms: u64,
    /// Fixed delay between cycles, bounding duty cycle and power draw.
    pub cycle_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mqtt: MqttConfig::default(),
            sensor: SensorConfig::default(),
            sampling: SamplingConfig::default(),
        }
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker: "localhost".to_string(),
            port: 1883,
            client_id: "bno055".to_string(),
            topic: "bno055".to_string(),
            qos: 0,
            keep_alive: 5,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            device_address: 0x29,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            window_size: 128,
            acquisition_timeout_ms: 2000,
            cycle_delay_ms: 800,
        }
    }
}

impl AppConfig {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;

        let config: AppConfig = toml::from_str(&content).map_err(ConfigError::ParseError)?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;

        std::fs::write(path, content).map_err(ConfigError::IoError)?;

        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampling.window_size < 4 || !self.sampling.window_size.is_power_of_two() {
            return Err(ConfigError::ValidationError(format!(
                "Window size {} must be a power of two >= 4",
                self.sampling.window_size
            )));
        }

        if self.sampling.acquisition_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Acquisition timeout must be positive".to_string(),
            ));
        }

        if self.mqtt.qos > 2 {
            return Err(ConfigError::ValidationError(format!(
                "QoS {} is not a valid MQTT QoS level",
                self.mqtt.qos
            )));
        }

        if self.mqtt.topic.is_empty() {
            return Err(ConfigError::ValidationError(
                "MQTT topic must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn non_power_of_two_window_fails_validation() {
        let mut config = AppConfig::default();
        config.sampling.window_size = 100;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        config.sampling.window_size = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_parses_from_toml() {
        let toml_text = r#"
            [mqtt]
            broker = "broker.example"
            port = 8883
            client_id = "edge-7"
            topic = "bno055"
            qos = 1
            keep_alive = 30

            [sensor]
            device_address = 41

            [sampling]
            window_size = 256
            acquisition_timeout_ms = 1500
            cycle_delay_ms = 500
        "#;

        let config: AppConfig = toml::from_str(toml_text).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.mqtt.broker, "broker.example");
        assert_eq!(config.sensor.device_address, 0x29);
        assert_eq!(config.sampling.window_size, 256);
    }

    #[test]
    fn invalid_qos_is_rejected() {
        let mut config = AppConfig::default();
        config.mqtt.qos = 3;
        assert!(config.validate().is_err());
    }
}

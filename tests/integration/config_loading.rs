//! Config file and environment layering, and running from a loaded config.

use std::fs;
use std::sync::{Arc, Mutex};

use serial_test::serial;
use tempfile::TempDir;

use sentinel::commands::common::{load_config, ConfigOverrides};
use sentinel::config::{
    NotifyBackend, SentinelConfig, ENV_PIN, ENV_PIN_ALIAS, ENV_TIMEZONE, ENV_TIMEZONE_ALIAS,
};
use sentinel::error::MonitorError;
use sentinel::monitor::SwitchMonitor;
use sentinel::supervisor::SupervisedLoop;

use super::helpers::*;

const CONFIG: &str = r#"
[switch]
name = "back_door"
pin = 4
threshold_secs = 45.0
timezone = "+01:00"

[sensor]
active_low = true

[supervisor]
max_attempts = 3
restart_delay_ms = 0

[schedule]
window = "22:00-06:00"
"#;

struct EnvGuard(&'static [&'static str]);

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in self.0 {
            std::env::remove_var(key);
        }
    }
}

#[test]
#[serial]
fn test_file_then_env_then_cli() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, CONFIG).unwrap();

    let _guard = EnvGuard(&[ENV_PIN, ENV_TIMEZONE]);
    std::env::set_var(ENV_PIN, "5");
    std::env::set_var(ENV_TIMEZONE, "-05:00");

    let overrides = ConfigOverrides {
        config_path: Some(path),
        threshold_secs: Some(10.0),
        ..Default::default()
    };
    let config = load_config(&overrides).unwrap();

    assert_eq!(config.switch.name, "back_door");
    assert_eq!(config.switch.pin, Some(5));
    assert_eq!(config.switch.timezone.to_string(), "-05:00");
    assert_eq!(config.switch.threshold_secs, 10.0);
    assert!(config.sensor.active_low);
    assert_eq!(config.supervisor.max_attempts, 3);
    assert_eq!(
        config.schedule_gate().unwrap().to_string(),
        "22:00-06:00 (-05:00)"
    );
}

#[test]
#[serial]
fn test_unprefixed_env_names_and_named_zone() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, CONFIG).unwrap();

    let _guard = EnvGuard(&[ENV_PIN_ALIAS, ENV_TIMEZONE_ALIAS]);
    std::env::set_var(ENV_PIN_ALIAS, "6");
    std::env::set_var(ENV_TIMEZONE_ALIAS, "America/Chicago");

    let overrides = ConfigOverrides {
        config_path: Some(path),
        ..Default::default()
    };
    let config = load_config(&overrides).unwrap();

    assert_eq!(config.switch.pin, Some(6));
    assert_eq!(config.switch.timezone.to_string(), "America/Chicago");
    // 17:00 UTC on t0 is 12:00 CDT.
    assert_eq!(config.switch.timezone.format_time(t0()), "12:00:00");
    assert_eq!(
        config.schedule_gate().unwrap().to_string(),
        "22:00-06:00 (America/Chicago)"
    );
}

#[test]
#[serial]
fn test_invalid_override_fails_validation() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, CONFIG).unwrap();

    let overrides = ConfigOverrides {
        config_path: Some(path),
        notify: Some(NotifyBackend::Twilio),
        ..Default::default()
    };
    let err = load_config(&overrides).unwrap_err();
    assert!(format!("{err:#}").contains("Twilio backend is missing"));
}

#[test]
#[serial]
fn test_loaded_config_drives_sysfs_monitor() {
    let temp = TempDir::new().unwrap();
    let gpio_root = temp.path().join("gpio");
    // Active-low wiring: a low line means the door is open.
    fake_gpio_line(&gpio_root, 4, "0");

    let mut config = SentinelConfig::from_toml_str(CONFIG).unwrap();
    config.sensor.gpio_root = gpio_root;
    config.schedule.window = None;
    config.validate().unwrap();

    let env = Collaborators::new();
    let factory = || -> Result<SwitchMonitor, MonitorError> {
        let switch = config
            .build_switch()
            .map_err(|e| MonitorError::Setup(e.to_string()))?;
        let sensor = config
            .build_sensor()
            .map_err(|e| MonitorError::Setup(e.to_string()))?;
        Ok(SwitchMonitor::new(
            switch,
            Box::new(sensor),
            env.clock.clone(),
            env.notifier.clone(),
            env.events.clone(),
        ))
    };

    let log = Arc::new(Mutex::new(Vec::new()));
    SupervisedLoop::new(config.supervisor_config(), factory, env.shutdown.clone())
        .with_observer(env.stepping_observer(log.clone(), |ticks| ticks == 2))
        .run()
        .unwrap();

    // 17:00 UTC shown at +01:00.
    assert_eq!(env.notifier.messages(), vec!["The door was opened at 18:00:00."]);
    let records = env.events.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].trigger_name, "back_door");
    assert_eq!(records[0].event_name, "back_door_opened");
}

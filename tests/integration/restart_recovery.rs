//! Hardware faults restart the monitor with a fresh, closed switch.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sentinel::error::{HardwareError, MonitorError, SupervisorError};
use sentinel::models::{Switch, SwitchState};
use sentinel::monitor::TickOutcome;
use sentinel::sensor::{ScriptedSensor, SysfsGpio};
use sentinel::supervisor::{SupervisedLoop, SupervisorConfig};
use tempfile::TempDir;

use super::helpers::*;

#[test]
fn test_sysfs_read_failure_restarts_closed() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().to_path_buf();
    fake_gpio_line(&root, PIN, "1");

    let env = Collaborators::new();
    let builds = AtomicU32::new(0);
    let factory = || {
        // The line reads low again once the monitor is rebuilt.
        if builds.fetch_add(1, Ordering::SeqCst) > 0 {
            set_gpio_value(&root, PIN, "0");
        }
        env.monitor(Box::new(SysfsGpio::with_root(PIN, &root)))
    };

    let log = Arc::new(Mutex::new(Vec::new()));
    let observer = {
        let log = log.clone();
        let root = root.clone();
        let mut inner = env.stepping_observer(log.clone(), |ticks| ticks == 3);
        Box::new(move |switch: &Switch, outcome: &TickOutcome| {
            inner(switch, outcome);
            // Pull the value file after the second tick to simulate a fault.
            if log.lock().unwrap().len() == 2 {
                remove_gpio_value(&root, PIN);
            }
        })
    };

    let summary = SupervisedLoop::new(fast_supervisor(30), factory, env.shutdown.clone())
        .with_observer(observer)
        .run()
        .expect("loop should recover");

    assert_eq!(summary.attempts, 2);
    assert_eq!(summary.restarts, 1);
    assert_eq!(summary.ticks, 3);
    assert_eq!(builds.load(Ordering::SeqCst), 2);

    let states: Vec<_> = log.lock().unwrap().iter().map(|(s, _)| s.state()).collect();
    assert_eq!(
        states,
        vec![SwitchState::Open, SwitchState::Open, SwitchState::Closed]
    );
    // The restart dropped the open switch, so no close is reported.
    assert_eq!(env.notifier.messages(), vec!["The door was opened at 12:00:00."]);
    assert_eq!(env.events.records().len(), 1);
}

#[test]
fn test_persistent_fault_exhausts_attempts() {
    let temp = TempDir::new().unwrap();
    // No gpio tree and no export file: configure fails every time.
    let root = temp.path().join("missing");

    let env = Collaborators::new();
    let factory = || env.monitor(Box::new(SysfsGpio::with_root(PIN, &root)));

    let err = SupervisedLoop::new(fast_supervisor(5), factory, env.shutdown.clone())
        .run()
        .unwrap_err();

    match err {
        SupervisorError::RetriesExhausted {
            attempts,
            last_error: MonitorError::Hardware(HardwareError::Io { sensor_id, .. }),
        } => {
            assert_eq!(attempts, 5);
            assert_eq!(sensor_id, PIN);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(env.notifier.messages().is_empty());
}

#[test]
fn test_thirty_attempts_by_default() {
    let env = Collaborators::new();
    let factory = || {
        let sensor = ScriptedSensor::new(PIN);
        sensor.handle().push_failure("bus fault");
        env.monitor(Box::new(sensor))
    };

    let config = SupervisorConfig {
        restart_delay: Duration::ZERO,
        ..Default::default()
    };
    let err = SupervisedLoop::new(config, factory, env.shutdown.clone())
        .run()
        .unwrap_err();

    assert!(matches!(
        err,
        SupervisorError::RetriesExhausted { attempts: 30, .. }
    ));
    assert!(err.to_string().contains("30 times"));
}

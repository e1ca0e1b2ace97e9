//! A door left open, reminded about twice, then closed.

use std::sync::{Arc, Mutex};

use chrono::Duration;
use sentinel::models::{SwitchEvent, SwitchState};
use sentinel::sensor::ScriptedSensor;
use sentinel::supervisor::SupervisedLoop;

use super::helpers::*;

#[test]
fn test_door_open_remind_close_through_supervisor() {
    let env = Collaborators::new();
    let sensor = ScriptedSensor::new(PIN);
    let script = sensor.handle();
    // Tick N happens at t0 + N seconds.
    script.push_many(true, 100).push(false);

    let mut sensor = Some(sensor);
    let factory = || {
        let sensor = sensor.take().expect("monitor built twice");
        env.monitor(Box::new(sensor))
    };

    let log = Arc::new(Mutex::new(Vec::new()));
    let summary = SupervisedLoop::new(fast_supervisor(30), factory, env.shutdown.clone())
        .with_observer(env.stepping_observer(log.clone(), |ticks| ticks == 101))
        .run()
        .expect("loop should stop cleanly");

    assert_eq!(summary.attempts, 1);
    assert_eq!(summary.restarts, 0);
    assert_eq!(summary.ticks, 101);

    assert_eq!(
        env.notifier.messages(),
        vec![
            "The door was opened at 12:00:00.",
            "The door has been open for 30 seconds.",
            "The door has been open for 90 seconds.",
            "The door was closed at 12:01:40.",
        ]
    );

    let records = env.events.records();
    let names: Vec<_> = records.iter().map(|r| r.event_name.as_str()).collect();
    assert_eq!(names, vec!["front_door_opened", "front_door_closed"]);
    assert_eq!(records[0].time, "2024-04-02T17:00:00Z");
    assert_eq!(records[1].time, "2024-04-02T17:01:40Z");

    let log = log.lock().unwrap();
    let (last_switch, last_outcome) = log.last().unwrap();
    assert_eq!(last_switch.state(), SwitchState::Closed);
    assert_eq!(last_switch.open_since(), None);
    assert_eq!(
        last_outcome.event,
        Some(SwitchEvent::Closed {
            at: t0() + Duration::seconds(100)
        })
    );

    // Every observed state satisfies the open/closed field invariant.
    for (switch, _) in log.iter() {
        assert!(switch.check_invariants().is_ok());
    }
}

#[test]
fn test_delivery_outage_does_not_stop_monitoring() {
    let env = Collaborators::new();
    env.notifier.fail_next(2);
    env.events.fail_next(1);

    let sensor = ScriptedSensor::new(PIN);
    sensor.handle().push_many(true, 31).push(false);

    let mut sensor = Some(sensor);
    let factory = || env.monitor(Box::new(sensor.take().expect("monitor built twice")));

    let log = Arc::new(Mutex::new(Vec::new()));
    let summary = SupervisedLoop::new(fast_supervisor(30), factory, env.shutdown.clone())
        .with_observer(env.stepping_observer(log.clone(), |ticks| ticks == 32))
        .run()
        .expect("delivery failures are not crashes");

    assert_eq!(summary.restarts, 0);
    // Opened and the first reminder were lost; the close got through.
    assert_eq!(
        env.notifier.messages(),
        vec!["The door was closed at 12:00:31."]
    );
    let names: Vec<_> = env
        .events
        .records()
        .into_iter()
        .map(|r| r.event_name)
        .collect();
    assert_eq!(names, vec!["front_door_closed"]);

    let log = log.lock().unwrap();
    let failures: usize = log.iter().map(|(_, o)| o.failures.len()).sum();
    assert_eq!(failures, 3);
}

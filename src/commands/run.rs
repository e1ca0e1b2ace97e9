use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;

use super::common::{load_config, ConfigOverrides};
use crate::clock::{SystemClock, TimeSource};
use crate::config::SentinelConfig;
use crate::error::MonitorError;
use crate::models::{Switch, SwitchEvent};
use crate::monitor::{SwitchMonitor, TickOutcome};
use crate::supervisor::{LoopSummary, ShutdownSignal, SupervisedLoop, TickObserver};

/// Monitor the switch until interrupted or the supervisor gives up.
pub fn execute(overrides: &ConfigOverrides) -> Result<()> {
    let config = load_config(overrides)?;
    // Fail fast on anything that would make every attempt fail.
    config.build_switch()?;
    config.build_sensor()?;
    let notifier = config.build_notifier()?;
    let event_logger = config.build_event_logger()?;
    let schedule = config.schedule_gate()?;
    let supervisor = config.supervisor_config();
    let policy = config.build_policy();
    let clock: Arc<dyn TimeSource> = Arc::new(SystemClock);

    print_header(&config);

    let shutdown = ShutdownSignal::new();
    shutdown.install_handler()?;

    let factory = {
        let config = config.clone();
        let clock = clock.clone();
        move || -> Result<SwitchMonitor, MonitorError> {
            let switch = config
                .build_switch()
                .map_err(|e| MonitorError::Setup(format!("{e:#}")))?;
            let sensor = config
                .build_sensor()
                .map_err(|e| MonitorError::Setup(format!("{e:#}")))?;
            Ok(SwitchMonitor::new(
                switch,
                Box::new(sensor),
                clock.clone(),
                notifier.clone(),
                event_logger.clone(),
            )
            .with_policy(policy))
        }
    };

    let result = SupervisedLoop::new(supervisor, factory, shutdown)
        .with_schedule(schedule, clock)
        .with_observer(console_observer())
        .run();

    match result {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            eprintln!();
            eprintln!("{} {e}", "Monitoring stopped:".red().bold());
            if let Some(source) = std::error::Error::source(&e) {
                eprintln!("  {} {source}", "Last error:".dimmed());
            }
            // Already reported; returning the error would print it again.
            std::process::exit(1);
        }
    }
}

fn print_header(config: &SentinelConfig) {
    println!("{}", "sentinel".bold().blue());
    println!("{}", "=".repeat(40));
    println!("  Switch:    {} ({})", config.switch.name.bold(), config.switch.kind);
    if let Some(pin) = config.switch.pin {
        println!("  Pin:       {pin}");
    }
    println!(
        "  Threshold: {}s (x{} per reminder)",
        config.switch.threshold_secs, config.switch.backoff_growth
    );
    println!("  Timezone:  {}", config.switch.timezone);
    println!("  Notify:    {}", config.notify.backend);
    println!("  Log:       {}", config.log.backend);
    if let Some(window) = &config.schedule.window {
        println!("  Schedule:  {window}");
    }
    println!();
    println!("{}", "Press Ctrl+C to stop".dimmed());
}

fn console_observer() -> TickObserver {
    Box::new(|switch: &Switch, outcome: &TickOutcome| {
        let (Some(event), Some(message)) = (&outcome.event, &outcome.message) else {
            return;
        };
        let stamp = switch.timezone().format_time(chrono::Utc::now()).dimmed();
        let label = match event {
            SwitchEvent::Opened { .. } => "OPEN".yellow().bold(),
            SwitchEvent::StillOpen { .. } => "STILL OPEN".red().bold(),
            SwitchEvent::Closed { .. } => "CLOSED".green().bold(),
        };
        println!("{stamp} {label} {message}");
        for failure in &outcome.failures {
            println!("  {} {failure}", "delivery failed:".yellow());
        }
    })
}

fn print_summary(summary: &LoopSummary) {
    println!();
    println!(
        "{} after {} tick(s), {} restart(s)",
        "Stopped".bold(),
        summary.ticks,
        summary.restarts
    );
}

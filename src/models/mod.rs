pub mod constants;
pub mod event;
pub mod switch;
pub mod timezone;

pub use event::{LogRecord, SwitchEvent};
pub use switch::{Switch, SwitchBuilder, SwitchError, SwitchKind, SwitchState};
pub use timezone::NotifyTimezone;

mod methods;
mod transitions;
mod types;

pub use methods::SwitchBuilder;
pub use types::{Switch, SwitchError, SwitchKind, SwitchState};

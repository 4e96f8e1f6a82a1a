mod controller;
mod countdown;
mod plan;

pub use controller::{Phase, SessionController};
pub use countdown::{catch_up, Countdown, CountdownHandle};
pub use plan::PlanDraft;

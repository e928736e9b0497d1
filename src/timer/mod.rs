pub mod controller;
pub mod display;
pub mod state;

pub use controller::TimerController;
pub use display::{TimerDisplay, TimerSnapshot};
pub use state::{format_clock, Phase, Tick, TimerState, TimerStatus};

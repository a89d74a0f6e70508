pub mod poll_events;
pub mod shared;

pub use poll_events::PollEventHandlers;

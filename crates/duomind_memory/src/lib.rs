pub mod diff;
pub mod event_log;

pub use diff::{format_event, inspect, parse_timestamp, render, EventSelection};
pub use event_log::{EventLog, MemoryEvent};

#[cfg(test)]
mod tests;

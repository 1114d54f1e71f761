pub mod analog_monitor;
pub mod blink;
pub mod edge_watch;

pub mod event_bus;
pub mod markdown;
pub mod ports;
pub mod session;
pub mod steps;
pub mod store;

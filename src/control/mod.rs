mod client;

pub use client::{BootstrapResult, ControlClient, DEFAULT_CONTROL_URL};

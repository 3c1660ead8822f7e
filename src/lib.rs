pub mod catalog;
pub mod control;
pub mod error;
pub mod event;
pub mod redact;
pub mod render;
pub mod setup;
pub mod storage;
pub mod system;
pub mod ui;
pub mod vim;
pub mod wizard;

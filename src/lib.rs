// Library target shared by the binary, the integration tests and the
// criterion benches. The binary adds only the terminal event loop.

pub mod app;
pub mod config;
pub mod diagram;
pub mod math;
pub mod network;
pub mod ui;
pub mod walkthrough;

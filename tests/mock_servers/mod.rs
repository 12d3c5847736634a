//! Mock servers for dashboard integration testing
//!
//! These mock servers simulate the service backend the widgets talk to,
//! allowing full integration testing without any media services running.

pub mod backend;

pub use backend::MockBackend;

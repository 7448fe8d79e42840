pub mod models;
pub mod utils;

// Data models shared between the engine library and the watcher binary,
// plus small formatting helpers for reports.

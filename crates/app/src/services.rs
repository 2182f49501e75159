//! Application services — use-case entry points.

pub mod device_service;

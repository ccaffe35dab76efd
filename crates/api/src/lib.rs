//! HTTP API: the employee-auth function plus operator endpoints.

pub mod app;
pub mod config;

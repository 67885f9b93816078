// Library target for integration tests.
// The binary entry point is main.rs; this file re-declares the module tree so
// that tests can drive the app through `sqlspell::app::App` with a fake backend.
// Some code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

pub mod api;
pub mod app;
pub mod catalog;
pub mod config;
pub mod event;
pub mod logging;
pub mod session;
pub mod store;
pub mod ui;

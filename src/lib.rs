// Library target for integration tests and criterion benchmarks.
// The binary entry point is main.rs; this file re-declares the quiz engine so
// that harnesses can import types via `chordquiz::session::*` / `chordquiz::engine::*`.
// The terminal front-end (app, event, ui) lives only in the binary.
#![allow(dead_code)]

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod keyboard;
pub mod session;

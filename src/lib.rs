//! Core library for the `metrics-roundtrip` CLI.
//!
//! The binary generates synthetic metric records, exports them to an OTLP
//! collector, reads them back from a Prometheus-compatible query backend and
//! diffs the two. The modules here hold the line format, the OTLP payload
//! builder, the HTTP adapters and the pipeline steps; library APIs may evolve
//! with the CLI.
pub mod app;
pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;

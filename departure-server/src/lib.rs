//! Next-departures polling core.
//!
//! Turns a NeTEx topology document and a SIRI StopMonitoring feed into a
//! continuously refreshed, per-stop list of upcoming departures, with
//! stale-data fallback when the feed misbehaves.

pub mod config;
pub mod domain;
pub mod poll;
pub mod siri;
pub mod source;
pub mod topology;
pub mod web;

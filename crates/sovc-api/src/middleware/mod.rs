//! # Middleware
//!
//! Request counters and latency histograms. Tracing is handled by
//! `tower_http::trace::TraceLayer` in [`crate::app`], authentication by
//! [`crate::auth`].

pub mod metrics;

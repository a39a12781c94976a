//! # API Route Modules
//!
//! - `credit`: score calculation, persistence and report issuance for the
//!   authenticated subject.
//! - `claims`: verification of claims presented by any party.

pub mod claims;
pub mod credit;

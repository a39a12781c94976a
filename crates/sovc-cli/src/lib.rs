//! # sovc-cli: Command-Line Interface for Sovereign Credit Scoring
//!
//! ## Subcommands
//!
//! - `sovc validate FILE`: print every factor violation, exit 1 if any.
//! - `sovc score FILE [--explain]`: print the score and optionally the bands.
//! - `sovc issue --subject ID FILE`: print a claim as JSON.
//! - `sovc verify FILE [--key FILE]`: structural check, plus MAC binding
//!   when a key is given.
//! - `sovc report --subject ID FILE`: print a report as JSON.
//! - `sovc keygen [--output FILE]`: write a fresh commitment key.
//!
//! Factor files are JSON, or YAML when the extension is `.yaml`/`.yml`:
//!
//! ```json
//! { "paymentHistory": 0.92, "creditUtilization": 0.15, "creditAge": 6,
//!   "creditMix": 3, "newCredit": 1 }
//! ```
//!
//! Every `run_*` function returns the process exit code.

pub mod claim;
pub mod input;
pub mod keygen;
pub mod scoring;

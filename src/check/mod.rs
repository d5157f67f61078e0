//! Rebuild decision layer
//!
//! Compares the resources each application was last built from with the
//! resources available now and decides which applications need a rebuild.
//!
//! ```text
//! BuildSetChecker ──▶ evaluate_category ──▶ should_trigger_build
//!  (per app)           (per category)        (per resource pair)
//!        ▲                    │
//!        └──── decide ◀───────┘
//! ```
//!
//! # Modules
//!
//! - [`detector`]: Pairwise version/source comparison
//! - [`category`]: Category evaluation and length mismatch policy
//! - [`decision`]: Application decision and its explanation
//! - [`orchestrator`]: Sequential evaluation of all applications
//! - [`error`]: Per-application check errors

pub mod category;
pub mod decision;
pub mod detector;
pub mod error;
pub mod orchestrator;

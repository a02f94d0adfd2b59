//! # factory-contracts
//!
//! Shared types for the Agent Factory spec-to-template compiler.
//!
//! All crates in the workspace import from here. No compilation logic lives
//! in this crate, only the input spec model, the output template model,
//! diagnostics, options and the error type.

pub mod diagnostics;
pub mod error;
pub mod options;
pub mod spec;
pub mod template;
pub mod validation;

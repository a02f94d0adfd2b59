//! # factory-core
//!
//! The pure spec-to-template compiler for Agent Factory.
//!
//! This crate provides:
//! - The collaborator traits (`IdGenerator`, `SpecValidator`)
//! - The `Compiler`, which assembles a bot definition from an agent spec
//! - Identifier generators, type-mapping tables and the TOML options loader
//! - Starter specs for new agents
//!
//! Compilation does no I/O. Reading specs and writing templates is the
//! caller's job.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use factory_contracts::options::CompileOptions;
//! use factory_core::Compiler;
//!
//! let compilation = Compiler::new(CompileOptions::default()).compile(&spec)?;
//! let yaml = serde_yaml::to_string(&compilation.document)?;
//! ```

pub mod action;
pub mod analysis;
pub mod compiler;
pub mod config;
pub mod context;
pub mod ids;
pub mod mapping;
pub mod naming;
pub mod scaffold;
pub mod system;
pub mod topic;
pub mod traits;

pub use compiler::{Compilation, Compiler};

//! Generates TypeScript bindings from compiled Ralph contract and script artifacts.
pub mod cmd;
pub mod config;
pub mod decl;
pub mod deployments;
pub mod gen;
pub mod op;
pub mod render;
pub mod report;

pub use op::{codegen, CodegenOptions};
pub use report::{RunReport, UnitFailure};

//! Serializers turning the declaration model into source text.
mod printer;
pub mod typescript;

use crate::decl::SourceUnit;

pub use typescript::TypeScript;

/// A target syntax the declaration model can be written in.
pub trait Syntax {
    /// File extension of rendered units, without the leading dot.
    const EXTENSION: &'static str;

    fn render(unit: &SourceUnit) -> String;
}

/// A [SourceUnit] rendered to text, ready to be written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedUnit {
    pub file_name: String,
    pub file_contents: String,
}

impl RenderedUnit {
    pub fn new<S: Syntax>(unit: &SourceUnit) -> Self {
        Self {
            file_name: format!("{}.{}", unit.name, S::EXTENSION),
            file_contents: S::render(unit),
        }
    }
}

//! Code generation module
//!
//! Every entity of the feature graph renders itself into a block of the
//! engine's configuration language through [`Render`].

pub mod derived_codegen;
pub mod feature_codegen;
pub mod source_codegen;

use crate::writer::ConfigWriter;

/// Capability of rendering an entity into the configuration language.
///
/// Rendering is pure: the same entity always yields the same text.
pub trait Render {
    /// Write this entity's block at the writer's current depth
    fn write_config(&self, w: &mut ConfigWriter);

    /// Render this entity on its own, starting at depth zero
    fn render(&self) -> String {
        let mut w = ConfigWriter::new();
        self.write_config(&mut w);
        w.finish()
    }
}

//! Compiler for a declarative genomic track grammar.
//!
//! A spec is parsed into a [`spec::View`] tree, normalized into fully
//! resolved tracks and laid out on a canvas ([`compile`]). For every tile
//! the host delivers, a [`renderer::TrackRenderer`] turns the raw payload
//! into rows, binds them to an [`encoding::TrackModel`] and emits
//! positioned [`strand_protocol::RenderCommand`]s through the mark
//! renderers in [`marks`].

pub mod assembly;
pub mod compile;
pub mod encoding;
pub mod geometry;
pub mod layout;
pub mod marks;
pub mod normalize;
pub mod renderer;
pub mod spec;
pub mod svg;
pub mod tabular;
pub mod theme;

pub use compile::{
    CompileError, CompileResult, CompileState, Compiled, NoValidation, SpecValidator,
    StructuralValidator, compile, compile_spec,
};
pub use renderer::TrackRenderer;
pub use theme::Theme;

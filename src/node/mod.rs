//! Device configuration tree: model and renderer
//!
//! The configuration surface of a device is a single-rooted tree of typed
//! nodes (categories, scalars, enumerations, commands, registers). This
//! module defines the tagged-union node model and a recursive renderer with
//! access-mode filtering, empty-category pruning and per-node failure
//! capture.

pub mod access;
pub mod model;
pub mod render;

pub use access::AccessMode;
pub use model::{
    BooleanNode, CategoryNode, CommandNode, ConfigNode, DisplayNotation, EnumEntryNode,
    EnumerationNode, FloatNode, IncrementMode, IntegerNode, NodeInfo, NodeValue, OpaqueNode,
    RegisterNode, Representation, StringNode, ValueError,
};
pub use render::{NodeRenderer, RenderError, RenderedNode, Tone};

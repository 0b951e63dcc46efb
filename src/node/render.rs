//! Recursive configuration-tree renderer
//!
//! Renders a [`ConfigNode`] tree into a styling-free [`RenderedNode`] tree.
//! Inaccessible nodes are either omitted or rendered as explicit markers,
//! a category whose children all collapse renders as nothing at all, and a
//! failure inside one node becomes a node-scoped diagnostic leaf instead of
//! aborting its siblings.

use super::model::{
    CategoryNode, ConfigNode, EnumEntryNode, EnumerationNode, IncrementMode, NodeInfo, ValueError,
};

/// Semantic class of a rendered node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Root wrapper around a device tree
    Root,
    /// Category grouping
    Category,
    /// Ordinary value node
    Node,
    /// Command node
    Command,
    /// Inaccessible-marker entry
    Inaccessible,
    /// Unsupported node type diagnostic
    Unsupported,
    /// Node-scoped failure diagnostic
    Error,
}

/// A rendered node: title, key/value fields and rendered children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNode {
    pub title: String,
    pub tone: Tone,
    pub fields: Vec<(String, String)>,
    pub children: Vec<RenderedNode>,
}

impl RenderedNode {
    fn leaf(title: impl Into<String>, tone: Tone, fields: Vec<(String, String)>) -> Self {
        Self {
            title: title.into(),
            tone,
            fields,
            children: Vec::new(),
        }
    }

    fn fmt_indented(&self, f: &mut std::fmt::Formatter<'_>, depth: usize) -> std::fmt::Result {
        let pad = "  ".repeat(depth);
        writeln!(f, "{}[{}]", pad, self.title)?;
        for (key, value) in &self.fields {
            if value.is_empty() {
                writeln!(f, "{}  {}:", pad, key)?;
            } else {
                writeln!(f, "{}  {}: {}", pad, key, value)?;
            }
        }
        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for RenderedNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// Error produced by whole-tree rendering
#[derive(Debug, Clone)]
pub enum RenderError {
    /// Every node in the tree collapsed to nothing
    EmptyTree { device: String },
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::EmptyTree { device } => {
                write!(f, "no renderable configuration nodes for {}", device)
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// Recursive renderer over the configuration-node variants
#[derive(Debug, Clone)]
pub struct NodeRenderer {
    exclude_inaccessible: bool,
}

impl NodeRenderer {
    /// Create a renderer that omits inaccessible nodes
    pub fn new() -> Self {
        Self {
            exclude_inaccessible: true,
        }
    }

    /// Choose whether inaccessible nodes are omitted or rendered as markers
    pub fn exclude_inaccessible(mut self, exclude: bool) -> Self {
        self.exclude_inaccessible = exclude;
        self
    }

    /// Render a whole device tree under a synthetic root wrapper
    pub fn render_tree(
        &self,
        root: &ConfigNode,
        device_label: &str,
    ) -> Result<RenderedNode, RenderError> {
        match self.render(root) {
            Some(inner) => Ok(RenderedNode {
                title: format!("Configuration nodes for device: {}", device_label),
                tone: Tone::Root,
                fields: Vec::new(),
                children: vec![inner],
            }),
            None => Err(RenderError::EmptyTree {
                device: device_label.to_string(),
            }),
        }
    }

    /// Render one node
    ///
    /// `None` means the node contributes nothing to the output: it was
    /// filtered out, or it was a category whose children all collapsed.
    pub fn render(&self, node: &ConfigNode) -> Option<RenderedNode> {
        // Entries are rendered inside their enumeration, never standalone.
        if matches!(node, ConfigNode::EnumEntry(_)) {
            return None;
        }

        if !node.access().is_accessible() {
            return if self.exclude_inaccessible {
                None
            } else {
                Some(self.render_inaccessible(node))
            };
        }

        match node {
            ConfigNode::Category(n) => self.render_category(n),
            ConfigNode::Integer(n) => Some(self.render_integer(n)),
            ConfigNode::Float(n) => Some(self.render_float(n)),
            ConfigNode::String(n) => Some(self.render_string(n)),
            ConfigNode::Boolean(n) => Some(self.render_boolean(n)),
            ConfigNode::Enumeration(n) => Some(self.render_enumeration(n)),
            ConfigNode::Command(n) => Some(RenderedNode::leaf(
                &n.info.display_name,
                Tone::Command,
                {
                    let mut fields = base_fields(&n.info, "Command");
                    fields.push((
                        "Execute".into(),
                        "trigger through the device handle to run this command".into(),
                    ));
                    fields
                },
            )),
            ConfigNode::Register(n) => Some(match &n.value {
                Ok(value) => {
                    let mut fields = base_fields(&n.info, "Register");
                    fields.push(("Current Value".into(), value.clone()));
                    fields.push(("Address".into(), format!("{:#x}", n.address)));
                    fields.push(("Length".into(), n.length.to_string()));
                    RenderedNode::leaf(&n.info.display_name, Tone::Node, fields)
                }
                Err(err) => self.render_value_error(&n.info, "Register", err),
            }),
            ConfigNode::Opaque(n) => Some(self.render_unsupported(&n.info, &n.type_name)),
            ConfigNode::EnumEntry(_) => None,
        }
    }

    fn render_category(&self, node: &CategoryNode) -> Option<RenderedNode> {
        let children: Vec<RenderedNode> = node
            .children
            .iter()
            .filter_map(|child| self.render(child))
            .collect();

        // An empty category renders as nothing; emptiness propagates
        // upward through nested categories.
        if children.is_empty() {
            return None;
        }

        Some(RenderedNode {
            title: node.info.display_name.clone(),
            tone: Tone::Category,
            fields: Vec::new(),
            children,
        })
    }

    fn render_integer(&self, node: &super::model::IntegerNode) -> RenderedNode {
        let value = match &node.value {
            Ok(value) => value,
            Err(err) => return self.render_value_error(&node.info, "Integer", err),
        };

        let mut fields = base_fields(&node.info, "Integer");
        fields.push(("Current Value".into(), value.to_string()));
        fields.push(("Maximum Value".into(), node.max.to_string()));
        fields.push(("Minimum Value".into(), node.min.to_string()));
        if node.inc_mode != IncrementMode::None {
            fields.push(("Increment Mode".into(), node.inc_mode.to_string()));
            fields.push(("Increment Value".into(), node.increment.to_string()));
        }
        fields.push(("Representation".into(), node.representation.to_string()));
        if !node.unit.is_empty() {
            fields.push(("Unit".into(), node.unit.clone()));
        }
        RenderedNode::leaf(&node.info.display_name, Tone::Node, fields)
    }

    fn render_float(&self, node: &super::model::FloatNode) -> RenderedNode {
        let value = match &node.value {
            Ok(value) => value,
            Err(err) => return self.render_value_error(&node.info, "Float", err),
        };

        let mut fields = base_fields(&node.info, "Float");
        fields.push(("Current Value".into(), value.to_string()));
        fields.push(("Maximum Value".into(), node.max.to_string()));
        fields.push(("Minimum Value".into(), node.min.to_string()));
        fields.push(("Display Precision".into(), node.precision.to_string()));
        fields.push(("Display Notation".into(), node.notation.to_string()));
        if node.inc_mode != IncrementMode::None {
            fields.push(("Increment Mode".into(), node.inc_mode.to_string()));
            fields.push(("Increment Value".into(), node.increment.to_string()));
        }
        fields.push(("Representation".into(), node.representation.to_string()));
        if !node.unit.is_empty() {
            fields.push(("Unit".into(), node.unit.clone()));
        }
        RenderedNode::leaf(&node.info.display_name, Tone::Node, fields)
    }

    fn render_string(&self, node: &super::model::StringNode) -> RenderedNode {
        let value = match &node.value {
            Ok(value) => value,
            Err(err) => return self.render_value_error(&node.info, "String", err),
        };

        let mut fields = base_fields(&node.info, "String");
        fields.push(("Current Value".into(), value.clone()));
        fields.push(("Maximum Length".into(), node.max_length.to_string()));
        RenderedNode::leaf(&node.info.display_name, Tone::Node, fields)
    }

    fn render_boolean(&self, node: &super::model::BooleanNode) -> RenderedNode {
        let value = match &node.value {
            Ok(value) => value,
            Err(err) => return self.render_value_error(&node.info, "Boolean", err),
        };

        let mut fields = base_fields(&node.info, "Boolean");
        fields.push(("Current Value".into(), value.to_string()));
        RenderedNode::leaf(&node.info.display_name, Tone::Node, fields)
    }

    fn render_enumeration(&self, node: &EnumerationNode) -> RenderedNode {
        let current = match &node.current {
            Ok(index) => match node.entries.get(*index) {
                Some(entry) => entry,
                None => {
                    let err = ValueError::new(
                        "IndexError",
                        format!(
                            "current entry {} out of range ({} entries)",
                            index,
                            node.entries.len()
                        ),
                    );
                    return self.render_value_error(&node.info, "Enumeration", &err);
                }
            },
            Err(err) => return self.render_value_error(&node.info, "Enumeration", err),
        };

        let mut fields = base_fields(&node.info, "Enumeration");
        fields.push(("Current Value".into(), entry_text(current)));
        fields.push(("Possible Values".into(), String::new()));
        for entry in &node.entries {
            fields.push((format!("- {}", entry.info.display_name), entry.value.to_string()));
        }
        RenderedNode::leaf(&node.info.display_name, Tone::Node, fields)
    }

    fn render_inaccessible(&self, node: &ConfigNode) -> RenderedNode {
        let info = node.info();
        let mut fields = base_fields(info, node.type_name());
        fields.push(("Access".into(), info.access.to_string()));
        fields.push(("Exception".into(), "AccessError".into()));
        fields.push((
            "Error".into(),
            "unable to access the node; it may be in a protected access mode".into(),
        ));
        RenderedNode::leaf(&info.display_name, Tone::Inaccessible, fields)
    }

    fn render_unsupported(&self, info: &NodeInfo, type_name: &str) -> RenderedNode {
        let mut fields = base_fields(info, type_name);
        fields.push(("Exception".into(), "UnsupportedType".into()));
        fields.push((
            "Error".into(),
            "unable to render this node type; its properties cannot be shown".into(),
        ));
        RenderedNode::leaf(&info.display_name, Tone::Unsupported, fields)
    }

    fn render_value_error(
        &self,
        info: &NodeInfo,
        type_name: &str,
        err: &ValueError,
    ) -> RenderedNode {
        let mut fields = base_fields(info, type_name);
        fields.push(("Exception".into(), err.kind.clone()));
        fields.push(("Error".into(), err.message.clone()));
        RenderedNode::leaf(&info.display_name, Tone::Error, fields)
    }
}

impl Default for NodeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn base_fields(info: &NodeInfo, type_name: &str) -> Vec<(String, String)> {
    vec![
        ("Description".into(), info.description.clone()),
        ("Type".into(), type_name.to_string()),
    ]
}

fn entry_text(entry: &EnumEntryNode) -> String {
    format!("{}: {}", entry.info.display_name, entry.value)
}

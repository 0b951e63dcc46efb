//! Configuration node model
//!
//! Tagged union over the device configuration tree. A `Category` owns its
//! children exclusively; every other variant is a leaf. Current values are
//! `Result`s so a device-side read failure travels with the node and is
//! surfaced by the renderer instead of aborting the tree.

use super::access::AccessMode;

/// A failed node-value read, carried in place of the value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueError {
    /// Short classification (e.g. "TimeoutError")
    pub kind: String,
    /// Human-readable detail
    pub message: String,
}

impl ValueError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// A node value or the read failure that replaced it
pub type NodeValue<T> = Result<T, ValueError>;

/// Fields common to every node variant
#[derive(Debug, Clone)]
pub struct NodeInfo {
    /// Feature name
    pub name: String,
    /// Human-facing name
    pub display_name: String,
    /// Feature description
    pub description: String,
    /// Access mode
    pub access: AccessMode,
}

impl NodeInfo {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        access: AccessMode,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: description.into(),
            access,
        }
    }
}

/// How a numeric node constrains increments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncrementMode {
    /// Any value inside the range is valid
    #[default]
    None,
    /// Values advance in fixed steps
    Fixed,
    /// Valid values come from a discrete list
    List,
}

impl IncrementMode {
    fn label(&self) -> &'static str {
        match self {
            IncrementMode::None => "No Increment",
            IncrementMode::Fixed => "Fixed Increment",
            IncrementMode::List => "List Increment",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            IncrementMode::None => 0,
            IncrementMode::Fixed => 1,
            IncrementMode::List => 2,
        }
    }
}

impl std::fmt::Display for IncrementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (mode {})", self.label(), self.code())
    }
}

/// Suggested numeric representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Representation {
    Linear,
    Logarithmic,
    Boolean,
    #[default]
    PureNumber,
    HexNumber,
    Ipv4Address,
    MacAddress,
}

impl Representation {
    fn label(&self) -> &'static str {
        match self {
            Representation::Linear => "Linear",
            Representation::Logarithmic => "Logarithmic",
            Representation::Boolean => "Boolean",
            Representation::PureNumber => "Pure Number",
            Representation::HexNumber => "Hex Number",
            Representation::Ipv4Address => "IPv4 Address",
            Representation::MacAddress => "MAC Address",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Representation::Linear => 0,
            Representation::Logarithmic => 1,
            Representation::Boolean => 2,
            Representation::PureNumber => 3,
            Representation::HexNumber => 4,
            Representation::Ipv4Address => 5,
            Representation::MacAddress => 6,
        }
    }
}

impl std::fmt::Display for Representation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (mode {})", self.label(), self.code())
    }
}

/// Display notation of a float node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayNotation {
    #[default]
    Automatic,
    Fixed,
    Scientific,
}

impl DisplayNotation {
    fn label(&self) -> &'static str {
        match self {
            DisplayNotation::Automatic => "Automatic",
            DisplayNotation::Fixed => "Fixed",
            DisplayNotation::Scientific => "Scientific",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            DisplayNotation::Automatic => 0,
            DisplayNotation::Fixed => 1,
            DisplayNotation::Scientific => 2,
        }
    }
}

impl std::fmt::Display for DisplayNotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (mode {})", self.label(), self.code())
    }
}

/// Category: owns an ordered sequence of children
#[derive(Debug, Clone)]
pub struct CategoryNode {
    pub info: NodeInfo,
    pub children: Vec<ConfigNode>,
}

impl CategoryNode {
    pub fn new(info: NodeInfo, children: Vec<ConfigNode>) -> Self {
        Self { info, children }
    }
}

/// Integer leaf with range and increment metadata
#[derive(Debug, Clone)]
pub struct IntegerNode {
    pub info: NodeInfo,
    pub value: NodeValue<i64>,
    pub min: i64,
    pub max: i64,
    pub increment: i64,
    pub inc_mode: IncrementMode,
    pub representation: Representation,
    pub unit: String,
}

impl IntegerNode {
    pub fn new(info: NodeInfo, value: NodeValue<i64>) -> Self {
        Self {
            info,
            value,
            min: 0,
            max: 0,
            increment: 1,
            inc_mode: IncrementMode::default(),
            representation: Representation::default(),
            unit: String::new(),
        }
    }

    pub fn range(mut self, min: i64, max: i64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn increment(mut self, increment: i64) -> Self {
        self.increment = increment;
        self.inc_mode = IncrementMode::Fixed;
        self
    }

    pub fn representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }
}

/// Float leaf with range, increment and display metadata
#[derive(Debug, Clone)]
pub struct FloatNode {
    pub info: NodeInfo,
    pub value: NodeValue<f64>,
    pub min: f64,
    pub max: f64,
    pub increment: f64,
    pub inc_mode: IncrementMode,
    pub representation: Representation,
    pub notation: DisplayNotation,
    pub precision: i64,
    pub unit: String,
}

impl FloatNode {
    pub fn new(info: NodeInfo, value: NodeValue<f64>) -> Self {
        Self {
            info,
            value,
            min: 0.0,
            max: 0.0,
            increment: 0.0,
            inc_mode: IncrementMode::default(),
            representation: Representation::default(),
            notation: DisplayNotation::default(),
            precision: 6,
            unit: String::new(),
        }
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn increment(mut self, increment: f64) -> Self {
        self.increment = increment;
        self.inc_mode = IncrementMode::Fixed;
        self
    }

    pub fn notation(mut self, notation: DisplayNotation) -> Self {
        self.notation = notation;
        self
    }

    pub fn precision(mut self, precision: i64) -> Self {
        self.precision = precision;
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }
}

/// String leaf
#[derive(Debug, Clone)]
pub struct StringNode {
    pub info: NodeInfo,
    pub value: NodeValue<String>,
    pub max_length: i64,
}

impl StringNode {
    pub fn new(info: NodeInfo, value: NodeValue<String>, max_length: i64) -> Self {
        Self {
            info,
            value,
            max_length,
        }
    }
}

/// Boolean leaf
#[derive(Debug, Clone)]
pub struct BooleanNode {
    pub info: NodeInfo,
    pub value: NodeValue<bool>,
}

impl BooleanNode {
    pub fn new(info: NodeInfo, value: NodeValue<bool>) -> Self {
        Self { info, value }
    }
}

/// One selectable entry of an enumeration
#[derive(Debug, Clone)]
pub struct EnumEntryNode {
    pub info: NodeInfo,
    pub value: i64,
}

impl EnumEntryNode {
    pub fn new(info: NodeInfo, value: i64) -> Self {
        Self { info, value }
    }
}

/// Enumeration leaf: ordered entries plus the currently selected one
#[derive(Debug, Clone)]
pub struct EnumerationNode {
    pub info: NodeInfo,
    pub entries: Vec<EnumEntryNode>,
    /// Index of the current entry into `entries`
    pub current: NodeValue<usize>,
}

impl EnumerationNode {
    pub fn new(info: NodeInfo, entries: Vec<EnumEntryNode>, current: NodeValue<usize>) -> Self {
        Self {
            info,
            entries,
            current,
        }
    }
}

/// Command leaf: executable, carries no value
#[derive(Debug, Clone)]
pub struct CommandNode {
    pub info: NodeInfo,
}

impl CommandNode {
    pub fn new(info: NodeInfo) -> Self {
        Self { info }
    }
}

/// Register leaf: raw device memory
#[derive(Debug, Clone)]
pub struct RegisterNode {
    pub info: NodeInfo,
    pub value: NodeValue<String>,
    pub address: u64,
    pub length: u64,
}

impl RegisterNode {
    pub fn new(info: NodeInfo, value: NodeValue<String>, address: u64, length: u64) -> Self {
        Self {
            info,
            value,
            address,
            length,
        }
    }
}

/// A vendor node type outside the modeled set
#[derive(Debug, Clone)]
pub struct OpaqueNode {
    pub info: NodeInfo,
    /// Type name as reported by the device
    pub type_name: String,
}

impl OpaqueNode {
    pub fn new(info: NodeInfo, type_name: impl Into<String>) -> Self {
        Self {
            info,
            type_name: type_name.into(),
        }
    }
}

/// A node of the device configuration tree
#[derive(Debug, Clone)]
pub enum ConfigNode {
    Category(CategoryNode),
    Integer(IntegerNode),
    Float(FloatNode),
    String(StringNode),
    Boolean(BooleanNode),
    Enumeration(EnumerationNode),
    EnumEntry(EnumEntryNode),
    Command(CommandNode),
    Register(RegisterNode),
    Opaque(OpaqueNode),
}

impl ConfigNode {
    /// Common fields of the node
    pub fn info(&self) -> &NodeInfo {
        match self {
            ConfigNode::Category(n) => &n.info,
            ConfigNode::Integer(n) => &n.info,
            ConfigNode::Float(n) => &n.info,
            ConfigNode::String(n) => &n.info,
            ConfigNode::Boolean(n) => &n.info,
            ConfigNode::Enumeration(n) => &n.info,
            ConfigNode::EnumEntry(n) => &n.info,
            ConfigNode::Command(n) => &n.info,
            ConfigNode::Register(n) => &n.info,
            ConfigNode::Opaque(n) => &n.info,
        }
    }

    /// Access mode of the node
    pub fn access(&self) -> AccessMode {
        self.info().access
    }

    /// Variant name as shown in rendered output
    pub fn type_name(&self) -> &str {
        match self {
            ConfigNode::Category(_) => "Category",
            ConfigNode::Integer(_) => "Integer",
            ConfigNode::Float(_) => "Float",
            ConfigNode::String(_) => "String",
            ConfigNode::Boolean(_) => "Boolean",
            ConfigNode::Enumeration(_) => "Enumeration",
            ConfigNode::EnumEntry(_) => "EnumEntry",
            ConfigNode::Command(_) => "Command",
            ConfigNode::Register(_) => "Register",
            ConfigNode::Opaque(n) => &n.type_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str) -> NodeInfo {
        NodeInfo::new(name, name, "test node", AccessMode::ReadWrite)
    }

    #[test]
    fn test_type_names() {
        let node = ConfigNode::Integer(IntegerNode::new(info("Width"), Ok(640)));
        assert_eq!(node.type_name(), "Integer");

        let opaque = ConfigNode::Opaque(OpaqueNode::new(info("Vendor"), "Port"));
        assert_eq!(opaque.type_name(), "Port");
    }

    #[test]
    fn test_integer_builder() {
        let node = IntegerNode::new(info("Width"), Ok(640))
            .range(16, 4096)
            .increment(16)
            .unit("px");

        assert_eq!(node.min, 16);
        assert_eq!(node.max, 4096);
        assert_eq!(node.increment, 16);
        assert_eq!(node.inc_mode, IncrementMode::Fixed);
        assert_eq!(node.unit, "px");
    }

    #[test]
    fn test_value_error_display() {
        let err = ValueError::new("TimeoutError", "device did not answer");
        assert_eq!(err.to_string(), "TimeoutError: device did not answer");
    }
}

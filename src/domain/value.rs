//! Values installed into node fields and passed to mutators.

use std::fmt;

use itertools::Itertools;

use crate::domain::catalog::KindId;
use crate::domain::model::NodeId;

/// Packages the platform exposes without any model behind them.
pub const PLATFORM_PACKAGES: &[&str] = &["java.lang", "java.util", "java.io"];

/// A field value or mutator argument.
///
/// Sets keep insertion order but are de-duplicated by hash on construction,
/// lists keep every element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Node(NodeId),
    List(Vec<Value>),
    Set(Vec<Value>),
    Array(Vec<Value>),
    Text(String),
    Integer(i64),
    Boolean(bool),
    Enum(EnumValue),
    ClassObject(ClassObject),
    Opaque(OpaqueHandle),
}

impl Value {
    pub fn list_of(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn set_of(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(items.into_iter().unique().collect())
    }

    pub fn nodes_list(ids: impl IntoIterator<Item = NodeId>) -> Self {
        Value::list_of(ids.into_iter().map(Value::Node))
    }

    pub fn nodes_set(ids: impl IntoIterator<Item = NodeId>) -> Self {
        Value::set_of(ids.into_iter().map(Value::Node))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Value::Node(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Elements of a list or set; `None` for every other shape.
    pub fn as_collection(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Value::Node(_))
    }

    pub fn is_collection(&self) -> bool {
        self.as_collection().is_some()
    }

    /// First element of a collection, if that element is a node.
    pub fn first_node(&self) -> Option<NodeId> {
        self.as_collection()
            .and_then(|items| items.first())
            .and_then(Value::as_node)
    }

    /// Every node referenced by this value, in order, including nested
    /// collections and arrays.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_nodes(&mut out);
        out
    }

    fn collect_nodes(&self, out: &mut Vec<NodeId>) {
        match self {
            Value::Node(id) => out.push(*id),
            Value::List(items) | Value::Set(items) | Value::Array(items) => {
                for item in items {
                    item.collect_nodes(out);
                }
            }
            _ => {}
        }
    }

    /// Short shape name used in mismatch diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Value::Node(_) => "node",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Array(_) => "array",
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
            Value::Enum(_) => "enum",
            Value::ClassObject(_) => "class object",
            Value::Opaque(_) => "opaque handle",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Node(id) => write!(f, "#{}", id.into_raw_parts().0),
            Value::List(items) => write!(f, "[{}]", items.iter().join(", ")),
            Value::Set(items) => write!(f, "{{{}}}", items.iter().join(", ")),
            Value::Array(items) => write!(f, "array[{}]", items.iter().join(", ")),
            Value::Text(text) => write!(f, "{:?}", text),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Enum(e) => write!(f, "{}", e),
            Value::ClassObject(c) => write!(f, "{}", c),
            Value::Opaque(o) => write!(f, "{}", o),
        }
    }
}

/// Class objects used to select a node kind or a failure type reflectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassObject {
    /// Unconstrained `Object` class.
    Object,
    /// Generic failure class for throwable bounds.
    Exception,
    /// Class object of a node kind.
    Kind(KindId),
}

impl fmt::Display for ClassObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassObject::Object => f.write_str("Object.class"),
            ClassObject::Exception => f.write_str("Exception.class"),
            ClassObject::Kind(kind) => write!(f, "{}.class", kind),
        }
    }
}

/// Handles to things outside the model: compilation units, platform packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpaqueHandle {
    CompilationUnit(u32),
    PlatformPackage(&'static str),
}

impl fmt::Display for OpaqueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpaqueHandle::CompilationUnit(n) => write!(f, "<compilation unit {}>", n),
            OpaqueHandle::PlatformPackage(name) => write!(f, "<package {}>", name),
        }
    }
}

/// Enumerations the model knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumType {
    BinaryOperatorKind,
    ModifierKind,
    CommentType,
    DocTagType,
}

impl EnumType {
    pub const ALL: [EnumType; 4] = [
        EnumType::BinaryOperatorKind,
        EnumType::ModifierKind,
        EnumType::CommentType,
        EnumType::DocTagType,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EnumType::BinaryOperatorKind => "BinaryOperatorKind",
            EnumType::ModifierKind => "ModifierKind",
            EnumType::CommentType => "CommentType",
            EnumType::DocTagType => "DocTagType",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }

    /// The member synthesized for this enumeration. Fixed per enumeration so
    /// runs are reproducible.
    pub fn canonical(&self) -> EnumValue {
        match self {
            EnumType::BinaryOperatorKind => EnumValue::BinaryOperator(BinaryOperatorKind::And),
            EnumType::ModifierKind => EnumValue::Modifier(ModifierKind::Public),
            EnumType::CommentType => EnumValue::CommentType(CommentType::Inline),
            EnumType::DocTagType => EnumValue::DocTag(DocTagType::See),
        }
    }
}

impl fmt::Display for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumValue {
    BinaryOperator(BinaryOperatorKind),
    Modifier(ModifierKind),
    CommentType(CommentType),
    DocTag(DocTagType),
}

impl EnumValue {
    pub fn enum_type(&self) -> EnumType {
        match self {
            EnumValue::BinaryOperator(_) => EnumType::BinaryOperatorKind,
            EnumValue::Modifier(_) => EnumType::ModifierKind,
            EnumValue::CommentType(_) => EnumType::CommentType,
            EnumValue::DocTag(_) => EnumType::DocTagType,
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumValue::BinaryOperator(v) => write!(f, "{}::{:?}", self.enum_type(), v),
            EnumValue::Modifier(v) => write!(f, "{}::{:?}", self.enum_type(), v),
            EnumValue::CommentType(v) => write!(f, "{}::{:?}", self.enum_type(), v),
            EnumValue::DocTag(v) => write!(f, "{}::{:?}", self.enum_type(), v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperatorKind {
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Gt,
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentType {
    File,
    Javadoc,
    Inline,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocTagType {
    Author,
    Deprecated,
    Exception,
    Param,
    Return,
    See,
    Since,
    Throws,
    Version,
}

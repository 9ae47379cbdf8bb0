//! Type descriptors: declared parameter types of mutators.
//!
//! A descriptor drives both catalog discovery and value synthesis. It has a
//! compact textual form used on the command line and in reports:
//!
//! ```text
//! Statement            List<Expression>      Set<ModifierKind>
//! Class<?>             Class<? extends Throwable>
//! int[]                String  int  boolean  Object
//! CompilationUnit      PlatformPackage       Block
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::catalog::KindId;
use crate::domain::error::DomainError;
use crate::domain::value::EnumType;

/// Abstract node categories a kind may belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Element,
    Expression,
    Statement,
    /// The abstract type of types (classes, interfaces, ...).
    Type,
    TypeMember,
    Reference,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Element,
        Category::Expression,
        Category::Statement,
        Category::Type,
        Category::TypeMember,
        Category::Reference,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Element => "Element",
            Category::Expression => "Expression",
            Category::Statement => "Statement",
            Category::Type => "Type",
            Category::TypeMember => "TypeMember",
            Category::Reference => "Reference",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// Node-typed parameter: either an abstract category or one concrete kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeType {
    Category(Category),
    Kind(String),
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Category(c) => f.write_str(c.name()),
            NodeType::Kind(k) => f.write_str(k),
        }
    }
}

/// Bound of a class-object parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassBound {
    /// `Class<?>`
    Wildcard,
    /// `Class<? extends Throwable>`
    Throwable,
    /// `Class<? extends SomeNodeType>`
    Node(NodeType),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// Class object; `None` is the raw, unparameterized class type.
    ClassObject(Option<ClassBound>),
    Node(NodeType),
    Enum(EnumType),
    Array(Box<TypeDescriptor>),
    Set(Box<TypeDescriptor>),
    List(Box<TypeDescriptor>),
    Text,
    Integer,
    Boolean,
    /// Unconstrained object; only meaningful as an array element.
    Any,
    CompilationUnit,
    PlatformPackage,
}

impl TypeDescriptor {
    pub fn category(category: Category) -> Self {
        TypeDescriptor::Node(NodeType::Category(category))
    }

    pub fn kind(kind: KindId) -> Self {
        TypeDescriptor::Node(NodeType::Kind(kind.name().to_string()))
    }

    pub fn list_of(element: TypeDescriptor) -> Self {
        TypeDescriptor::List(Box::new(element))
    }

    pub fn set_of(element: TypeDescriptor) -> Self {
        TypeDescriptor::Set(Box::new(element))
    }

    pub fn array_of(element: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(element))
    }

    pub fn class_bounded_by(bound: ClassBound) -> Self {
        TypeDescriptor::ClassObject(Some(bound))
    }

    /// True when the descriptor names a node type (values are nodes).
    pub fn is_node(&self) -> bool {
        matches!(self, TypeDescriptor::Node(_))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::ClassObject(None) => f.write_str("Class"),
            TypeDescriptor::ClassObject(Some(ClassBound::Wildcard)) => f.write_str("Class<?>"),
            TypeDescriptor::ClassObject(Some(ClassBound::Throwable)) => {
                f.write_str("Class<? extends Throwable>")
            }
            TypeDescriptor::ClassObject(Some(ClassBound::Node(n))) => {
                write!(f, "Class<? extends {}>", n)
            }
            TypeDescriptor::Node(n) => write!(f, "{}", n),
            TypeDescriptor::Enum(e) => write!(f, "{}", e),
            TypeDescriptor::Array(e) => write!(f, "{}[]", e),
            TypeDescriptor::Set(e) => write!(f, "Set<{}>", e),
            TypeDescriptor::List(e) => write!(f, "List<{}>", e),
            TypeDescriptor::Text => f.write_str("String"),
            TypeDescriptor::Integer => f.write_str("int"),
            TypeDescriptor::Boolean => f.write_str("boolean"),
            TypeDescriptor::Any => f.write_str("Object"),
            TypeDescriptor::CompilationUnit => f.write_str("CompilationUnit"),
            TypeDescriptor::PlatformPackage => f.write_str("PlatformPackage"),
        }
    }
}

fn generic_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\w+)\s*<\s*(.+?)\s*>$").expect("valid regex"))
}

fn bound_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\?\s+extends\s+(.+)$").expect("valid regex"))
}

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][\w.$]*$").expect("valid regex"))
}

fn invalid(input: &str, reason: impl Into<String>) -> DomainError {
    DomainError::InvalidDescriptor {
        input: input.to_string(),
        reason: reason.into(),
    }
}

fn parse_node_type(input: &str) -> Result<NodeType, DomainError> {
    if let Some(c) = Category::from_name(input) {
        return Ok(NodeType::Category(c));
    }
    if identifier_regex().is_match(input) {
        Ok(NodeType::Kind(input.to_string()))
    } else {
        Err(invalid(input, "not a type name"))
    }
}

impl FromStr for TypeDescriptor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(invalid(s, "empty"));
        }

        if let Some(element) = input.strip_suffix("[]") {
            return Ok(TypeDescriptor::array_of(element.parse()?));
        }

        if let Some(caps) = generic_regex().captures(input) {
            let head = &caps[1];
            let arg = &caps[2];
            return match head {
                "Class" if arg == "?" => Ok(TypeDescriptor::class_bounded_by(ClassBound::Wildcard)),
                "Class" => {
                    let bound = bound_regex()
                        .captures(arg)
                        .map(|c| c[1].trim().to_string())
                        .ok_or_else(|| invalid(s, "class bound must be `?` or `? extends T`"))?;
                    if bound == "Throwable" {
                        Ok(TypeDescriptor::class_bounded_by(ClassBound::Throwable))
                    } else {
                        Ok(TypeDescriptor::class_bounded_by(ClassBound::Node(
                            parse_node_type(&bound)?,
                        )))
                    }
                }
                "Set" => Ok(TypeDescriptor::set_of(arg.parse()?)),
                "List" | "Collection" => Ok(TypeDescriptor::list_of(arg.parse()?)),
                other => Err(invalid(s, format!("unknown container `{}`", other))),
            };
        }

        let descriptor = match input {
            "Class" => TypeDescriptor::ClassObject(None),
            "String" => TypeDescriptor::Text,
            "int" => TypeDescriptor::Integer,
            "boolean" => TypeDescriptor::Boolean,
            "Object" => TypeDescriptor::Any,
            "CompilationUnit" => TypeDescriptor::CompilationUnit,
            "PlatformPackage" => TypeDescriptor::PlatformPackage,
            other => match EnumType::from_name(other) {
                Some(e) => TypeDescriptor::Enum(e),
                None => TypeDescriptor::Node(parse_node_type(other)?),
            },
        };
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Class")]
    #[case("Class<?>")]
    #[case("Class<? extends Throwable>")]
    #[case("Class<? extends Element>")]
    #[case("Statement")]
    #[case("Block")]
    #[case("List<Expression>")]
    #[case("Set<ModifierKind>")]
    #[case("Set<List<TypeReference>>")]
    #[case("int[]")]
    #[case("Expression[]")]
    #[case("Object[]")]
    #[case("String")]
    #[case("boolean")]
    #[case("CompilationUnit")]
    #[case("PlatformPackage")]
    fn given_textual_descriptor_when_parsing_then_displays_identically(#[case] text: &str) {
        let descriptor: TypeDescriptor = text.parse().unwrap();
        assert_eq!(descriptor.to_string(), text);
    }

    #[test]
    fn given_collection_alias_when_parsing_then_yields_list() {
        let descriptor: TypeDescriptor = "Collection<Statement>".parse().unwrap();
        assert_eq!(
            descriptor,
            TypeDescriptor::list_of(TypeDescriptor::category(Category::Statement))
        );
    }

    #[rstest]
    #[case("")]
    #[case("Map<String>")]
    #[case("Class<Throwable>")]
    #[case("not a type")]
    fn given_malformed_descriptor_when_parsing_then_errors(#[case] text: &str) {
        let result = text.parse::<TypeDescriptor>();
        assert!(matches!(result, Err(DomainError::InvalidDescriptor { .. })));
    }

    #[test]
    fn given_unknown_name_when_parsing_then_yields_kind_reference() {
        let descriptor: TypeDescriptor = "com.example.Widget".parse().unwrap();
        assert_eq!(
            descriptor,
            TypeDescriptor::Node(NodeType::Kind("com.example.Widget".to_string()))
        );
    }
}

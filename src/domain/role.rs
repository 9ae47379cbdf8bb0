//! Edge roles: the name of the field under which a parent holds a child.

use std::fmt;

/// Structural field of a node.
///
/// A child node remembers the role it is held under, so ancestry queries
/// can answer both "who is my parent" and "through which field".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Annotation,
    AnnotationType,
    Argument,
    Body,
    Comment,
    CommentContent,
    CommentType,
    CompilationUnit,
    CompiledKind,
    Condition,
    DefaultExpression,
    DimensionSize,
    DocTagParam,
    DocTagType,
    Element,
    Else,
    ExceptionClass,
    Executable,
    Expression,
    IsDefault,
    IsInferred,
    IsShadow,
    IsVarargs,
    Label,
    LeftOperand,
    Method,
    Modifier,
    Name,
    NestedType,
    Operator,
    Parameter,
    ParameterType,
    PlatformPackage,
    RightOperand,
    Statement,
    SubPackage,
    Superclass,
    Target,
    Then,
    ThrownType,
    Type,
    TypeArgument,
    TypeCast,
    Value,
    ValueClass,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Annotation => "annotation",
            Role::AnnotationType => "annotationType",
            Role::Argument => "argument",
            Role::Body => "body",
            Role::Comment => "comment",
            Role::CommentContent => "commentContent",
            Role::CommentType => "commentType",
            Role::CompilationUnit => "compilationUnit",
            Role::CompiledKind => "compiledKind",
            Role::Condition => "condition",
            Role::DefaultExpression => "defaultExpression",
            Role::DimensionSize => "dimensionSize",
            Role::DocTagParam => "docTagParam",
            Role::DocTagType => "docTagType",
            Role::Element => "element",
            Role::Else => "else",
            Role::ExceptionClass => "exceptionClass",
            Role::Executable => "executable",
            Role::Expression => "expression",
            Role::IsDefault => "isDefault",
            Role::IsInferred => "isInferred",
            Role::IsShadow => "isShadow",
            Role::IsVarargs => "isVarargs",
            Role::Label => "label",
            Role::LeftOperand => "leftOperand",
            Role::Method => "method",
            Role::Modifier => "modifier",
            Role::Name => "name",
            Role::NestedType => "nestedType",
            Role::Operator => "operator",
            Role::Parameter => "parameter",
            Role::ParameterType => "parameterType",
            Role::PlatformPackage => "platformPackage",
            Role::RightOperand => "rightOperand",
            Role::Statement => "statement",
            Role::SubPackage => "subPackage",
            Role::Superclass => "superclass",
            Role::Target => "target",
            Role::Then => "then",
            Role::ThrownType => "thrownType",
            Role::Type => "type",
            Role::TypeArgument => "typeArgument",
            Role::TypeCast => "typeCast",
            Role::Value => "value",
            Role::ValueClass => "valueClass",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

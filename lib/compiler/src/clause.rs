//! A small clause tree for the patterns and filters generated from user input.
//!
//! User supplied values only ever enter a query as [`NamedNode`]s or [`Literal`]s, which are
//! escaped when the tree is rendered. Property paths come from the portal schema.

use facet_search_model::{Literal, NamedNode, Variable};
use itertools::Itertools;
use std::fmt;

/// A property path taken verbatim from the portal schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath(String);

impl PropertyPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Matches zero or more repetitions of this path.
    #[must_use]
    pub fn zero_or_more(&self) -> Self {
        Self(format!("({})*", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermPattern {
    Variable(Variable),
    NamedNode(NamedNode),
}

impl From<Variable> for TermPattern {
    fn from(variable: Variable) -> Self {
        TermPattern::Variable(variable)
    }
}

impl From<NamedNode> for TermPattern {
    fn from(node: NamedNode) -> Self {
        TermPattern::NamedNode(node)
    }
}

impl fmt::Display for TermPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermPattern::Variable(variable) => variable.fmt(f),
            TermPattern::NamedNode(node) => node.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Str,
    LCase,
    Contains,
    Coalesce,
}

impl Function {
    fn name(self) -> &'static str {
        match self {
            Function::Str => "STR",
            Function::LCase => "LCASE",
            Function::Contains => "CONTAINS",
            Function::Coalesce => "COALESCE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Variable(Variable),
    NamedNode(NamedNode),
    Literal(Literal),
    In(Box<Expression>, Vec<Expression>),
    And(Box<Expression>, Box<Expression>),
    GreaterOrEqual(Box<Expression>, Box<Expression>),
    LessOrEqual(Box<Expression>, Box<Expression>),
    Bound(Variable),
    FunctionCall(Function, Vec<Expression>),
    /// A cast written as a call to the datatype IRI, e.g. `xsd:double(?x)`.
    Cast(NamedNode, Box<Expression>),
}

impl Expression {
    pub fn call(function: Function, args: impl IntoIterator<Item = Expression>) -> Self {
        Expression::FunctionCall(function, args.into_iter().collect())
    }

    #[must_use]
    pub fn and(self, other: Expression) -> Self {
        Expression::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn greater_or_equal(self, other: Expression) -> Self {
        Expression::GreaterOrEqual(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn less_or_equal(self, other: Expression) -> Self {
        Expression::LessOrEqual(Box::new(self), Box::new(other))
    }

    /// Conjoins all expressions. Returns `None` for an empty input.
    pub fn all(expressions: impl IntoIterator<Item = Expression>) -> Option<Self> {
        expressions.into_iter().reduce(Expression::and)
    }
}

impl From<Variable> for Expression {
    fn from(variable: Variable) -> Self {
        Expression::Variable(variable)
    }
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Expression::Literal(literal)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Variable(variable) => variable.fmt(f),
            Expression::NamedNode(node) => node.fmt(f),
            Expression::Literal(literal) => literal.fmt(f),
            Expression::In(value, list) => write!(f, "{value} IN ({})", list.iter().join(", ")),
            Expression::And(left, right) => write!(f, "({left} && {right})"),
            Expression::GreaterOrEqual(left, right) => write!(f, "({left} >= {right})"),
            Expression::LessOrEqual(left, right) => write!(f, "({left} <= {right})"),
            Expression::Bound(variable) => write!(f, "BOUND({variable})"),
            Expression::FunctionCall(function, args) => {
                write!(f, "{}({})", function.name(), args.iter().join(", "))
            }
            Expression::Cast(datatype, value) => write!(f, "{datatype}({value})"),
        }
    }
}

/// An element of a group graph pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternElement {
    Triple {
        subject: TermPattern,
        path: PropertyPath,
        object: TermPattern,
    },
    Values {
        variable: Variable,
        values: Vec<NamedNode>,
    },
    Optional(Vec<PatternElement>),
    Filter(Expression),
}

impl PatternElement {
    pub fn triple(
        subject: impl Into<TermPattern>,
        path: PropertyPath,
        object: impl Into<TermPattern>,
    ) -> Self {
        PatternElement::Triple {
            subject: subject.into(),
            path,
            object: object.into(),
        }
    }
}

impl fmt::Display for PatternElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternElement::Triple {
                subject,
                path,
                object,
            } => write!(f, "{subject} {path} {object} ."),
            PatternElement::Values { variable, values } => {
                write!(f, "VALUES {variable} {{ {} }}", values.iter().join(" "))
            }
            PatternElement::Optional(elements) => {
                write!(f, "OPTIONAL {{ {} }}", elements.iter().join(" "))
            }
            PatternElement::Filter(expression) => write!(f, "FILTER({expression})"),
        }
    }
}

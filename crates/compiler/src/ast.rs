//! The expression syntax tree.
//!
//! The parser accepts a superset of what compiles: assignment and
//! sequence expressions parse fine and are rejected during lowering, so
//! the error can say what was written rather than where parsing lost
//! track.

use sift_common::Literal;

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Ident(String),
    /// `object.prop`, `object[expr]`, and their `?.` forms.
    Member {
        object: Box<Expr>,
        property: MemberProp,
        optional: bool,
    },
    /// `callee(args)` and `callee?.(args)`.
    Call {
        callee: Box<Expr>,
        args: Vec<Arg>,
        optional: bool,
    },
    Array(Vec<Element>),
    Object(Vec<Prop>),
    Unary {
        op: String,
        operand: Box<Expr>,
    },
    Binary {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `&&`, `||`, `??`. Kept apart from `Binary` because the right
    /// side is lazy.
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        then: Box<Expr>,
        alt: Box<Expr>,
    },
    Arrow {
        params: Vec<Pattern>,
        body: Box<Expr>,
    },
    /// Parsed but not compilable.
    Assign {
        op: String,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// Parsed but not compilable.
    Sequence(Vec<Expr>),
}

/// The property part of a member expression.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProp {
    /// `.name`
    Static(String),
    /// `[expr]`
    Computed(Box<Expr>),
}

/// One call argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Plain(Expr),
    Spread(Expr),
}

/// One array-literal element.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// An elision (`[1, , 3]`), which evaluates to `undefined`.
    Hole,
    Plain(Expr),
    Spread(Expr),
}

/// One object-literal property.
#[derive(Debug, Clone, PartialEq)]
pub enum Prop {
    KeyValue { key: PropKey, value: Expr },
    Spread(Expr),
}

/// An object-literal key.
#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    /// Identifier, string, or numeric key, normalized to a string.
    Fixed(String),
    /// `[expr]` key.
    Computed(Box<Expr>),
}

/// The lazy logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Coalesce,
}

/// An arrow-function parameter pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Ident(String),
    Rest(Box<Pattern>),
    /// `None` entries are elision holes.
    Array(Vec<Option<Pattern>>),
    Object(Vec<PatternProp>),
    Default {
        inner: Box<Pattern>,
        default: Box<Expr>,
    },
}

/// One entry of an object destructuring pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternProp {
    pub key: PropKey,
    pub value: Pattern,
}

//! Recursive-descent parser.
//!
//! One function per precedence level, from sequence down to primary.
//! Arrow functions are detected before the conditional ladder runs: a
//! lone identifier or a balanced parenthesis group followed by `=>` is
//! a parameter list, anything else is a normal parenthesized
//! expression.

use sift_common::value::number_to_string;
use sift_common::Literal;

use crate::ast::{
    Arg, Element, Expr, LogicalOp, MemberProp, Pattern, PatternProp, Prop, PropKey,
};
use crate::error::ParseError;
use crate::lexer::{lex, Token, TokenKind};

/// Parse source text into a single expression. Trailing tokens are an
/// error.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    let tokens = lex(source)?;
    let mut parser = Parser { tokens, index: 0 };
    let expr = parser.sequence()?;
    if let Some(token) = parser.tokens.get(parser.index) {
        return Err(unexpected(token));
    }
    Ok(expr)
}

fn unexpected(token: &Token) -> ParseError {
    ParseError::UnexpectedToken {
        at: token.pos,
        token: token.kind.to_string(),
    }
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.index).map(|t| &t.kind)
    }

    fn peek_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.index + offset).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Result<Token, ParseError> {
        let token = self
            .tokens
            .get(self.index)
            .cloned()
            .ok_or(ParseError::UnexpectedEof)?;
        self.index += 1;
        Ok(token)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        match self.tokens.get(self.index) {
            Some(token) if token.kind == *kind => {
                self.index += 1;
                Ok(())
            }
            Some(token) => Err(unexpected(token)),
            None => Err(ParseError::UnexpectedEof),
        }
    }

    /// Error for the current token, or EOF.
    fn fail_here<T>(&self) -> Result<T, ParseError> {
        match self.tokens.get(self.index) {
            Some(token) => Err(unexpected(token)),
            None => Err(ParseError::UnexpectedEof),
        }
    }

    // sequence := assignment (',' assignment)*
    fn sequence(&mut self) -> Result<Expr, ParseError> {
        let first = self.assignment()?;
        if self.peek() != Some(&TokenKind::Comma) {
            return Ok(first);
        }
        let mut exprs = vec![first];
        while self.eat(&TokenKind::Comma) {
            exprs.push(self.assignment()?);
        }
        Ok(Expr::Sequence(exprs))
    }

    // assignment := arrow | conditional (assign-op assignment)?
    fn assignment(&mut self) -> Result<Expr, ParseError> {
        if self.arrow_ahead() {
            return self.arrow();
        }
        let expr = self.conditional()?;
        if matches!(self.peek(), Some(TokenKind::AssignOp(_))) {
            let token = self.advance()?;
            let TokenKind::AssignOp(op) = token.kind else {
                unreachable!()
            };
            let value = self.assignment()?;
            return Ok(Expr::Assign {
                op,
                target: Box::new(expr),
                value: Box::new(value),
            });
        }
        Ok(expr)
    }

    /// True if the tokens at the cursor form an arrow parameter list:
    /// `ident =>` or a balanced `( ... ) =>`.
    fn arrow_ahead(&self) -> bool {
        match self.peek() {
            Some(TokenKind::Ident(_)) => self.peek_at(1) == Some(&TokenKind::Arrow),
            Some(TokenKind::LParen) => {
                let mut depth = 0usize;
                let mut i = self.index;
                while let Some(token) = self.tokens.get(i) {
                    match token.kind {
                        TokenKind::LParen => depth += 1,
                        TokenKind::RParen => {
                            depth -= 1;
                            if depth == 0 {
                                return self
                                    .tokens
                                    .get(i + 1)
                                    .is_some_and(|t| t.kind == TokenKind::Arrow);
                            }
                        }
                        _ => {}
                    }
                    i += 1;
                }
                false
            }
            _ => false,
        }
    }

    fn arrow(&mut self) -> Result<Expr, ParseError> {
        let params = if matches!(self.peek(), Some(TokenKind::Ident(_))) {
            let token = self.advance()?;
            let TokenKind::Ident(name) = token.kind else {
                unreachable!()
            };
            vec![Pattern::Ident(name)]
        } else {
            self.params()?
        };
        self.expect(&TokenKind::Arrow)?;
        let body = self.assignment()?;
        Ok(Expr::Arrow {
            params,
            body: Box::new(body),
        })
    }

    fn params(&mut self) -> Result<Vec<Pattern>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        loop {
            if self.peek() == Some(&TokenKind::RParen) {
                break;
            }
            if self.eat(&TokenKind::Ellipsis) {
                params.push(Pattern::Rest(Box::new(self.pattern()?)));
                // Rest must be last.
                break;
            }
            params.push(self.pattern()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    fn pattern(&mut self) -> Result<Pattern, ParseError> {
        let base = match self.peek() {
            Some(TokenKind::Ident(_)) => {
                let token = self.advance()?;
                let TokenKind::Ident(name) = token.kind else {
                    unreachable!()
                };
                Pattern::Ident(name)
            }
            Some(TokenKind::LBracket) => self.array_pattern()?,
            Some(TokenKind::LBrace) => self.object_pattern()?,
            _ => return self.fail_here(),
        };
        self.with_default(base)
    }

    /// Wrap a pattern in a default if `= expr` follows.
    fn with_default(&mut self, inner: Pattern) -> Result<Pattern, ParseError> {
        if self.peek() == Some(&TokenKind::AssignOp("=".to_string())) {
            self.index += 1;
            let default = self.assignment()?;
            return Ok(Pattern::Default {
                inner: Box::new(inner),
                default: Box::new(default),
            });
        }
        Ok(inner)
    }

    fn array_pattern(&mut self) -> Result<Pattern, ParseError> {
        self.expect(&TokenKind::LBracket)?;
        let mut elements = Vec::new();
        loop {
            if self.peek() == Some(&TokenKind::RBracket) {
                break;
            }
            if self.eat(&TokenKind::Comma) {
                elements.push(None);
                continue;
            }
            if self.eat(&TokenKind::Ellipsis) {
                elements.push(Some(Pattern::Rest(Box::new(self.pattern()?))));
                break;
            }
            elements.push(Some(self.pattern()?));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(Pattern::Array(elements))
    }

    fn object_pattern(&mut self) -> Result<Pattern, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut entries = Vec::new();
        loop {
            if self.peek() == Some(&TokenKind::RBrace) {
                break;
            }
            let entry = match self.peek() {
                Some(TokenKind::Ident(_)) => {
                    let token = self.advance()?;
                    let TokenKind::Ident(name) = token.kind else {
                        unreachable!()
                    };
                    if self.eat(&TokenKind::Colon) {
                        PatternProp {
                            key: PropKey::Fixed(name),
                            value: self.pattern()?,
                        }
                    } else {
                        // Shorthand, possibly with a default.
                        let value = self.with_default(Pattern::Ident(name.clone()))?;
                        PatternProp {
                            key: PropKey::Fixed(name),
                            value,
                        }
                    }
                }
                Some(TokenKind::Str(_)) => {
                    let token = self.advance()?;
                    let TokenKind::Str(key) = token.kind else {
                        unreachable!()
                    };
                    self.expect(&TokenKind::Colon)?;
                    PatternProp {
                        key: PropKey::Fixed(key),
                        value: self.pattern()?,
                    }
                }
                Some(TokenKind::Num(_)) => {
                    let token = self.advance()?;
                    let TokenKind::Num(n) = token.kind else {
                        unreachable!()
                    };
                    self.expect(&TokenKind::Colon)?;
                    PatternProp {
                        key: PropKey::Fixed(number_to_string(n)),
                        value: self.pattern()?,
                    }
                }
                Some(TokenKind::LBracket) => {
                    self.index += 1;
                    let key = self.assignment()?;
                    self.expect(&TokenKind::RBracket)?;
                    self.expect(&TokenKind::Colon)?;
                    PatternProp {
                        key: PropKey::Computed(Box::new(key)),
                        value: self.pattern()?,
                    }
                }
                _ => return self.fail_here(),
            };
            entries.push(entry);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Pattern::Object(entries))
    }

    // conditional := coalesce ('?' assignment ':' assignment)?
    fn conditional(&mut self) -> Result<Expr, ParseError> {
        let test = self.coalesce()?;
        if !self.eat(&TokenKind::Question) {
            return Ok(test);
        }
        let then = self.assignment()?;
        self.expect(&TokenKind::Colon)?;
        let alt = self.assignment()?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            then: Box::new(then),
            alt: Box::new(alt),
        })
    }

    fn coalesce(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.logical_or()?;
        while self.eat(&TokenKind::QuestionQuestion) {
            let right = self.logical_or()?;
            left = Expr::Logical {
                op: LogicalOp::Coalesce,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.logical_and()?;
        while self.eat(&TokenKind::PipePipe) {
            let right = self.logical_and()?;
            left = Expr::Logical {
                op: LogicalOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.bit_or()?;
        while self.eat(&TokenKind::AmpAmp) {
            let right = self.bit_or()?;
            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn bit_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.bit_xor()?;
        while self.eat(&TokenKind::Pipe) {
            let right = self.bit_xor()?;
            left = binary("|", left, right);
        }
        Ok(left)
    }

    fn bit_xor(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.bit_and()?;
        while self.eat(&TokenKind::Caret) {
            let right = self.bit_and()?;
            left = binary("^", left, right);
        }
        Ok(left)
    }

    fn bit_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.equality()?;
        while self.eat(&TokenKind::Amp) {
            let right = self.equality()?;
            left = binary("&", left, right);
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.relational()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::EqEq) => "==",
                Some(TokenKind::NotEq) => "!=",
                Some(TokenKind::EqEqEq) => "===",
                Some(TokenKind::NotEqEq) => "!==",
                _ => break,
            };
            self.index += 1;
            let right = self.relational()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.shift()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Lt) => "<",
                Some(TokenKind::LtEq) => "<=",
                Some(TokenKind::Gt) => ">",
                Some(TokenKind::GtEq) => ">=",
                Some(TokenKind::In) => "in",
                _ => break,
            };
            self.index += 1;
            let right = self.shift()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn shift(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.additive()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Shl) => "<<",
                Some(TokenKind::Shr) => ">>",
                Some(TokenKind::UShr) => ">>>",
                _ => break,
            };
            self.index += 1;
            let right = self.additive()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Plus) => "+",
                Some(TokenKind::Minus) => "-",
                _ => break,
            };
            self.index += 1;
            let right = self.multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.exponent()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Star) => "*",
                Some(TokenKind::Slash) => "/",
                Some(TokenKind::Percent) => "%",
                _ => break,
            };
            self.index += 1;
            let right = self.exponent()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    // Right-associative: 2 ** 3 ** 2 is 2 ** (3 ** 2).
    fn exponent(&mut self) -> Result<Expr, ParseError> {
        let base = self.unary()?;
        if self.eat(&TokenKind::StarStar) {
            let exp = self.exponent()?;
            return Ok(binary("**", base, exp));
        }
        Ok(base)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Some(TokenKind::Minus) => "-",
            Some(TokenKind::Plus) => "+",
            Some(TokenKind::Bang) => "!",
            Some(TokenKind::Tilde) => "~",
            Some(TokenKind::Typeof) => "typeof",
            Some(TokenKind::Void) => "void",
            _ => return self.postfix(),
        };
        self.index += 1;
        let operand = self.unary()?;
        Ok(Expr::Unary {
            op: op.to_string(),
            operand: Box::new(operand),
        })
    }

    // postfix := primary ('.' name | '?.' link | '[' expr ']' | call)*
    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;
        loop {
            match self.peek() {
                Some(TokenKind::Dot) => {
                    self.index += 1;
                    let name = self.property_name()?;
                    expr = member(expr, MemberProp::Static(name), false);
                }
                Some(TokenKind::QuestionDot) => {
                    self.index += 1;
                    match self.peek() {
                        Some(TokenKind::LBracket) => {
                            self.index += 1;
                            let key = self.sequence()?;
                            self.expect(&TokenKind::RBracket)?;
                            expr = member(expr, MemberProp::Computed(Box::new(key)), true);
                        }
                        Some(TokenKind::LParen) => {
                            let args = self.arguments()?;
                            expr = Expr::Call {
                                callee: Box::new(expr),
                                args,
                                optional: true,
                            };
                        }
                        _ => {
                            let name = self.property_name()?;
                            expr = member(expr, MemberProp::Static(name), true);
                        }
                    }
                }
                Some(TokenKind::LBracket) => {
                    self.index += 1;
                    let key = self.sequence()?;
                    self.expect(&TokenKind::RBracket)?;
                    expr = member(expr, MemberProp::Computed(Box::new(key)), false);
                }
                Some(TokenKind::LParen) => {
                    let args = self.arguments()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        optional: false,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// A property name after `.` or `?.`. Keywords are ordinary names
    /// in this position.
    fn property_name(&mut self) -> Result<String, ParseError> {
        let token = self.advance()?;
        let name = match token.kind {
            TokenKind::Ident(name) => name,
            TokenKind::True => "true".to_string(),
            TokenKind::False => "false".to_string(),
            TokenKind::Null => "null".to_string(),
            TokenKind::Undefined => "undefined".to_string(),
            TokenKind::Typeof => "typeof".to_string(),
            TokenKind::Void => "void".to_string(),
            TokenKind::In => "in".to_string(),
            _ => return Err(unexpected(&token)),
        };
        Ok(name)
    }

    fn arguments(&mut self) -> Result<Vec<Arg>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        loop {
            if self.peek() == Some(&TokenKind::RParen) {
                break;
            }
            if self.eat(&TokenKind::Ellipsis) {
                args.push(Arg::Spread(self.assignment()?));
            } else {
                args.push(Arg::Plain(self.assignment()?));
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.advance()?;
        let expr = match token.kind {
            TokenKind::Num(n) => Expr::Literal(Literal::Num(n)),
            TokenKind::BigInt(n) => Expr::Literal(Literal::BigInt(n)),
            TokenKind::Str(s) => Expr::Literal(Literal::Str(s)),
            TokenKind::True => Expr::Literal(Literal::Bool(true)),
            TokenKind::False => Expr::Literal(Literal::Bool(false)),
            TokenKind::Null => Expr::Literal(Literal::Null),
            TokenKind::Undefined => Expr::Literal(Literal::Undefined),
            TokenKind::Ident(name) => Expr::Ident(name),
            TokenKind::LParen => {
                let inner = self.sequence()?;
                self.expect(&TokenKind::RParen)?;
                inner
            }
            TokenKind::LBracket => self.array_literal()?,
            TokenKind::LBrace => self.object_literal()?,
            _ => return Err(unexpected(&token)),
        };
        Ok(expr)
    }

    // The opening bracket is already consumed.
    fn array_literal(&mut self) -> Result<Expr, ParseError> {
        let mut elements = Vec::new();
        loop {
            if self.peek() == Some(&TokenKind::RBracket) {
                break;
            }
            if self.eat(&TokenKind::Comma) {
                elements.push(Element::Hole);
                continue;
            }
            if self.eat(&TokenKind::Ellipsis) {
                elements.push(Element::Spread(self.assignment()?));
            } else {
                elements.push(Element::Plain(self.assignment()?));
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(Expr::Array(elements))
    }

    // The opening brace is already consumed.
    fn object_literal(&mut self) -> Result<Expr, ParseError> {
        let mut props = Vec::new();
        loop {
            if self.peek() == Some(&TokenKind::RBrace) {
                break;
            }
            if self.eat(&TokenKind::Ellipsis) {
                props.push(Prop::Spread(self.assignment()?));
            } else {
                props.push(self.object_prop()?);
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Expr::Object(props))
    }

    fn object_prop(&mut self) -> Result<Prop, ParseError> {
        match self.peek() {
            Some(TokenKind::Ident(_)) => {
                let token = self.advance()?;
                let TokenKind::Ident(name) = token.kind else {
                    unreachable!()
                };
                if self.eat(&TokenKind::Colon) {
                    Ok(Prop::KeyValue {
                        key: PropKey::Fixed(name),
                        value: self.assignment()?,
                    })
                } else {
                    // Shorthand: { a } means { a: a }.
                    Ok(Prop::KeyValue {
                        key: PropKey::Fixed(name.clone()),
                        value: Expr::Ident(name),
                    })
                }
            }
            Some(TokenKind::Str(_)) => {
                let token = self.advance()?;
                let TokenKind::Str(key) = token.kind else {
                    unreachable!()
                };
                self.expect(&TokenKind::Colon)?;
                Ok(Prop::KeyValue {
                    key: PropKey::Fixed(key),
                    value: self.assignment()?,
                })
            }
            Some(TokenKind::Num(_)) => {
                let token = self.advance()?;
                let TokenKind::Num(n) = token.kind else {
                    unreachable!()
                };
                self.expect(&TokenKind::Colon)?;
                Ok(Prop::KeyValue {
                    key: PropKey::Fixed(number_to_string(n)),
                    value: self.assignment()?,
                })
            }
            Some(TokenKind::LBracket) => {
                self.index += 1;
                let key = self.assignment()?;
                self.expect(&TokenKind::RBracket)?;
                self.expect(&TokenKind::Colon)?;
                Ok(Prop::KeyValue {
                    key: PropKey::Computed(Box::new(key)),
                    value: self.assignment()?,
                })
            }
            // Keywords as fixed keys: { in: 1, null: 2 }.
            Some(
                TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::Undefined
                | TokenKind::Typeof
                | TokenKind::Void
                | TokenKind::In,
            ) => {
                let key = self.property_name()?;
                self.expect(&TokenKind::Colon)?;
                Ok(Prop::KeyValue {
                    key: PropKey::Fixed(key),
                    value: self.assignment()?,
                })
            }
            _ => self.fail_here(),
        }
    }
}

fn binary(op: &str, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op: op.to_string(),
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn member(object: Expr, property: MemberProp, optional: bool) -> Expr {
    Expr::Member {
        object: Box::new(object),
        property,
        optional,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_ladder() {
        let expr = parse("1 + 2 * 3").expect("parse");
        match expr {
            Expr::Binary { op, right, .. } => {
                assert_eq!(op, "+");
                assert!(matches!(*right, Expr::Binary { .. }));
            }
            other => panic!("expected Binary, got {other:?}"),
        }
    }

    #[test]
    fn exponent_is_right_associative() {
        let expr = parse("2 ** 3 ** 2").expect("parse");
        match expr {
            Expr::Binary { op, left, right } => {
                assert_eq!(op, "**");
                assert_eq!(*left, Expr::Literal(Literal::Num(2.0)));
                assert!(matches!(*right, Expr::Binary { .. }));
            }
            other => panic!("expected Binary, got {other:?}"),
        }
    }

    #[test]
    fn arrow_with_parenthesized_params() {
        let expr = parse("(a, b = 5) => a + b").expect("parse");
        match expr {
            Expr::Arrow { params, .. } => {
                assert_eq!(params.len(), 2);
                assert_eq!(params[0], Pattern::Ident("a".to_string()));
                assert!(matches!(params[1], Pattern::Default { .. }));
            }
            other => panic!("expected Arrow, got {other:?}"),
        }
    }

    #[test]
    fn parenthesized_expression_is_not_arrow() {
        let expr = parse("(a)").expect("parse");
        assert_eq!(expr, Expr::Ident("a".to_string()));
    }

    #[test]
    fn destructuring_params() {
        let expr = parse("({ a, b = 5 }, [x, , ...rest]) => a").expect("parse");
        let Expr::Arrow { params, .. } = expr else {
            panic!("expected Arrow");
        };
        let Pattern::Object(entries) = &params[0] else {
            panic!("expected object pattern");
        };
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[1].value, Pattern::Default { .. }));
        let Pattern::Array(elements) = &params[1] else {
            panic!("expected array pattern");
        };
        assert_eq!(elements.len(), 3);
        assert!(elements[1].is_none());
        assert!(matches!(elements[2], Some(Pattern::Rest(_))));
    }

    #[test]
    fn optional_chaining_links() {
        let expr = parse("a?.b.c").expect("parse");
        let Expr::Member {
            object, optional, ..
        } = expr
        else {
            panic!("expected Member");
        };
        assert!(!optional);
        let Expr::Member { optional, .. } = *object else {
            panic!("expected inner Member");
        };
        assert!(optional);
    }

    #[test]
    fn ternary_with_leading_fraction() {
        let expr = parse("a ?.5 : 1").expect("parse");
        assert!(matches!(expr, Expr::Conditional { .. }));
    }

    #[test]
    fn assignment_and_sequence_parse() {
        assert!(matches!(parse("x = 5"), Ok(Expr::Assign { .. })));
        assert!(matches!(parse("a, b"), Ok(Expr::Sequence(_))));
        assert!(matches!(parse("x += 1"), Ok(Expr::Assign { .. })));
    }

    #[test]
    fn object_literal_forms() {
        let expr = parse("{ a, 'b c': 1, [k]: 2, 3: x, ...rest }").expect("parse");
        let Expr::Object(props) = expr else {
            panic!("expected Object");
        };
        assert_eq!(props.len(), 5);
        assert!(matches!(props[4], Prop::Spread(_)));
    }

    #[test]
    fn array_literal_with_holes_and_spread() {
        let expr = parse("[1, , 3, ...xs]").expect("parse");
        let Expr::Array(elements) = expr else {
            panic!("expected Array");
        };
        assert_eq!(elements.len(), 4);
        assert!(matches!(elements[1], Element::Hole));
        assert!(matches!(elements[3], Element::Spread(_)));
    }

    #[test]
    fn trailing_tokens_are_rejected(){
        assert!(parse("1 2").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn keyword_property_names() {
        assert!(parse("a.in").is_ok());
        assert!(parse("a?.typeof").is_ok());
    }
}

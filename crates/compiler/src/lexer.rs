//! Tokenizer for the expression language.
//!
//! Longest-match scanning over a byte offset; tokens carry their start
//! offset so parse errors can point at the source. One lookahead quirk
//! is handled here rather than in the parser: `?.` followed by a digit
//! is a ternary `?` and a fractional number (`x ? .5 : 1`), not an
//! optional-chaining token.

use num_bigint::BigInt;

use crate::error::ParseError;

/// One token with its starting byte offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: usize,
}

/// The token kinds of the expression grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals and names
    Num(f64),
    BigInt(BigInt),
    Str(String),
    Ident(String),

    // Keywords
    True,
    False,
    Null,
    Undefined,
    Typeof,
    Void,
    In,

    // Structure
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Dot,
    Ellipsis,
    Arrow,
    Question,
    QuestionDot,
    QuestionQuestion,

    // Operators
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    Amp,
    AmpAmp,
    Pipe,
    PipePipe,
    Caret,
    Tilde,
    Bang,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Shl,
    Shr,
    UShr,
    EqEq,
    EqEqEq,
    NotEq,
    NotEqEq,
    /// `=` and the compound assignment family, kept as source text. The
    /// parser accepts these only inside parameter defaults (`=`); the
    /// compiler rejects assignment expressions outright.
    AssignOp(String),
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Num(n) => write!(f, "number {n}"),
            TokenKind::BigInt(n) => write!(f, "bigint {n}n"),
            TokenKind::Str(s) => write!(f, "string {s:?}"),
            TokenKind::Ident(name) => write!(f, "identifier '{name}'"),
            TokenKind::True => write!(f, "'true'"),
            TokenKind::False => write!(f, "'false'"),
            TokenKind::Null => write!(f, "'null'"),
            TokenKind::Undefined => write!(f, "'undefined'"),
            TokenKind::Typeof => write!(f, "'typeof'"),
            TokenKind::Void => write!(f, "'void'"),
            TokenKind::In => write!(f, "'in'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Ellipsis => write!(f, "'...'"),
            TokenKind::Arrow => write!(f, "'=>'"),
            TokenKind::Question => write!(f, "'?'"),
            TokenKind::QuestionDot => write!(f, "'?.'"),
            TokenKind::QuestionQuestion => write!(f, "'??'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::StarStar => write!(f, "'**'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::Amp => write!(f, "'&'"),
            TokenKind::AmpAmp => write!(f, "'&&'"),
            TokenKind::Pipe => write!(f, "'|'"),
            TokenKind::PipePipe => write!(f, "'||'"),
            TokenKind::Caret => write!(f, "'^'"),
            TokenKind::Tilde => write!(f, "'~'"),
            TokenKind::Bang => write!(f, "'!'"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::LtEq => write!(f, "'<='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::GtEq => write!(f, "'>='"),
            TokenKind::Shl => write!(f, "'<<'"),
            TokenKind::Shr => write!(f, "'>>'"),
            TokenKind::UShr => write!(f, "'>>>'"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::EqEqEq => write!(f, "'==='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::NotEqEq => write!(f, "'!=='"),
            TokenKind::AssignOp(op) => write!(f, "'{op}'"),
        }
    }
}

/// Tokenize source text.
pub fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    Lexer {
        chars: source.char_indices().peekable(),
        source,
        tokens: Vec::new(),
    }
    .run()
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    source: &'a str,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        while let Some(&(pos, ch)) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
                continue;
            }
            if ch.is_ascii_digit() {
                self.number(pos)?;
                continue;
            }
            if ch == '.' && self.digit_follows(pos) {
                self.number(pos)?;
                continue;
            }
            if ch == '_' || ch == '$' || ch.is_alphabetic() {
                self.word(pos);
                continue;
            }
            if ch == '"' || ch == '\'' {
                self.string(pos, ch)?;
                continue;
            }
            self.punct(pos, ch)?;
        }
        Ok(self.tokens)
    }

    fn push(&mut self, pos: usize, kind: TokenKind) {
        self.tokens.push(Token { kind, pos });
    }

    /// True if the character right after the `.` at `pos` is a digit.
    fn digit_follows(&self, pos: usize) -> bool {
        self.source[pos + 1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit())
    }

    /// Consume the next char if it equals `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.chars.peek().is_some_and(|&(_, c)| c == expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn number(&mut self, start: usize) -> Result<(), ParseError> {
        // Hex literals, including the 0x...n BigInt form.
        if self.source[start..].starts_with("0x") || self.source[start..].starts_with("0X") {
            self.chars.next();
            self.chars.next();
            let mut end = start + 2;
            while let Some(&(pos, c)) = self.chars.peek() {
                if c.is_ascii_hexdigit() {
                    end = pos + c.len_utf8();
                    self.chars.next();
                } else {
                    break;
                }
            }
            if end == start + 2 {
                return Err(ParseError::InvalidNumber { at: start });
            }
            let digits = &self.source[start + 2..end];
            if self.eat('n') {
                let value = BigInt::parse_bytes(digits.as_bytes(), 16)
                    .ok_or(ParseError::InvalidNumber { at: start })?;
                self.push(start, TokenKind::BigInt(value));
            } else {
                let value = u128::from_str_radix(digits, 16)
                    .map_err(|_| ParseError::InvalidNumber { at: start })?;
                self.push(start, TokenKind::Num(value as f64));
            }
            return Ok(());
        }

        let mut end = start;
        let mut seen_dot = false;
        let mut seen_exp = false;
        while let Some(&(pos, c)) = self.chars.peek() {
            let accept = match c {
                '0'..='9' => true,
                '.' if !seen_dot && !seen_exp => {
                    seen_dot = true;
                    true
                }
                'e' | 'E' if !seen_exp => {
                    seen_exp = true;
                    true
                }
                '+' | '-' => {
                    // Sign is only part of the number right after the
                    // exponent marker.
                    matches!(self.source[..pos].chars().last(), Some('e' | 'E')) && seen_exp
                }
                _ => false,
            };
            if !accept {
                break;
            }
            end = pos + c.len_utf8();
            self.chars.next();
        }
        let text = &self.source[start..end];
        if self.eat('n') {
            if seen_dot || seen_exp {
                return Err(ParseError::InvalidNumber { at: start });
            }
            let value = text
                .parse::<BigInt>()
                .map_err(|_| ParseError::InvalidNumber { at: start })?;
            self.push(start, TokenKind::BigInt(value));
        } else {
            let value = text
                .parse::<f64>()
                .map_err(|_| ParseError::InvalidNumber { at: start })?;
            self.push(start, TokenKind::Num(value));
        }
        Ok(())
    }

    fn word(&mut self, start: usize) {
        let mut end = start;
        while let Some(&(pos, c)) = self.chars.peek() {
            if c == '_' || c == '$' || c.is_alphanumeric() {
                end = pos + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        let text = &self.source[start..end];
        let kind = match text {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "undefined" => TokenKind::Undefined,
            "typeof" => TokenKind::Typeof,
            "void" => TokenKind::Void,
            "in" => TokenKind::In,
            other => TokenKind::Ident(other.to_string()),
        };
        self.push(start, kind);
    }

    fn string(&mut self, start: usize, quote: char) -> Result<(), ParseError> {
        self.chars.next();
        let mut text = String::new();
        loop {
            let Some((pos, c)) = self.chars.next() else {
                return Err(ParseError::UnterminatedString { at: start });
            };
            if c == quote {
                self.push(start, TokenKind::Str(text));
                return Ok(());
            }
            if c != '\\' {
                text.push(c);
                continue;
            }
            let Some((_, escaped)) = self.chars.next() else {
                return Err(ParseError::UnterminatedString { at: start });
            };
            match escaped {
                'n' => text.push('\n'),
                't' => text.push('\t'),
                'r' => text.push('\r'),
                'b' => text.push('\u{8}'),
                'f' => text.push('\u{c}'),
                'v' => text.push('\u{b}'),
                '0' => text.push('\0'),
                'x' => {
                    let code = self.hex_escape(pos, 2)?;
                    text.push(
                        char::from_u32(code).ok_or(ParseError::InvalidEscape { at: pos })?,
                    );
                }
                'u' => {
                    // Either \uHHHH or the braced code-point form \u{H..H}.
                    let code = if self.chars.peek().is_some_and(|&(_, c)| c == '{') {
                        self.chars.next();
                        self.braced_escape(pos)?
                    } else {
                        self.hex_escape(pos, 4)?
                    };
                    text.push(
                        char::from_u32(code).ok_or(ParseError::InvalidEscape { at: pos })?,
                    );
                }
                // Any other escaped character stands for itself.
                other => text.push(other),
            }
        }
    }

    fn hex_escape(&mut self, at: usize, len: usize) -> Result<u32, ParseError> {
        let mut code = 0u32;
        for _ in 0..len {
            let Some((_, c)) = self.chars.next() else {
                return Err(ParseError::InvalidEscape { at });
            };
            let digit = c.to_digit(16).ok_or(ParseError::InvalidEscape { at })?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn braced_escape(&mut self, at: usize) -> Result<u32, ParseError> {
        let mut code = 0u32;
        let mut digits = 0;
        loop {
            let Some((_, c)) = self.chars.next() else {
                return Err(ParseError::InvalidEscape { at });
            };
            if c == '}' {
                if digits == 0 {
                    return Err(ParseError::InvalidEscape { at });
                }
                return Ok(code);
            }
            let digit = c.to_digit(16).ok_or(ParseError::InvalidEscape { at })?;
            // Saturate past the code-point range; from_u32 rejects it.
            code = code.saturating_mul(16).saturating_add(digit);
            digits += 1;
        }
    }

    fn punct(&mut self, pos: usize, ch: char) -> Result<(), ParseError> {
        self.chars.next();
        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '~' => TokenKind::Tilde,
            '.' => {
                if self.source[pos..].starts_with("...") {
                    self.chars.next();
                    self.chars.next();
                    TokenKind::Ellipsis
                } else {
                    TokenKind::Dot
                }
            }
            '?' => {
                if self.eat('?') {
                    if self.eat('=') {
                        TokenKind::AssignOp("??=".to_string())
                    } else {
                        TokenKind::QuestionQuestion
                    }
                } else {
                    let next = self.chars.peek().copied();
                    match next {
                        Some((p, '.')) if !self.digit_follows(p) => {
                            self.chars.next();
                            TokenKind::QuestionDot
                        }
                        _ => TokenKind::Question,
                    }
                }
            }
            '+' => {
                if self.eat('=') {
                    TokenKind::AssignOp("+=".to_string())
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.eat('=') {
                    TokenKind::AssignOp("-=".to_string())
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.eat('*') {
                    if self.eat('=') {
                        TokenKind::AssignOp("**=".to_string())
                    } else {
                        TokenKind::StarStar
                    }
                } else if self.eat('=') {
                    TokenKind::AssignOp("*=".to_string())
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.eat('=') {
                    TokenKind::AssignOp("/=".to_string())
                } else {
                    TokenKind::Slash
                }
            }
            '%' => {
                if self.eat('=') {
                    TokenKind::AssignOp("%=".to_string())
                } else {
                    TokenKind::Percent
                }
            }
            '&' => {
                if self.eat('&') {
                    if self.eat('=') {
                        TokenKind::AssignOp("&&=".to_string())
                    } else {
                        TokenKind::AmpAmp
                    }
                } else if self.eat('=') {
                    TokenKind::AssignOp("&=".to_string())
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                if self.eat('|') {
                    if self.eat('=') {
                        TokenKind::AssignOp("||=".to_string())
                    } else {
                        TokenKind::PipePipe
                    }
                } else if self.eat('=') {
                    TokenKind::AssignOp("|=".to_string())
                } else {
                    TokenKind::Pipe
                }
            }
            '^' => {
                if self.eat('=') {
                    TokenKind::AssignOp("^=".to_string())
                } else {
                    TokenKind::Caret
                }
            }
            '!' => {
                if self.eat('=') {
                    if self.eat('=') {
                        TokenKind::NotEqEq
                    } else {
                        TokenKind::NotEq
                    }
                } else {
                    TokenKind::Bang
                }
            }
            '=' => {
                if self.eat('=') {
                    if self.eat('=') {
                        TokenKind::EqEqEq
                    } else {
                        TokenKind::EqEq
                    }
                } else if self.eat('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::AssignOp("=".to_string())
                }
            }
            '<' => {
                if self.eat('<') {
                    if self.eat('=') {
                        TokenKind::AssignOp("<<=".to_string())
                    } else {
                        TokenKind::Shl
                    }
                } else if self.eat('=') {
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('>') {
                    if self.eat('>') {
                        if self.eat('=') {
                            TokenKind::AssignOp(">>>=".to_string())
                        } else {
                            TokenKind::UShr
                        }
                    } else if self.eat('=') {
                        TokenKind::AssignOp(">>=".to_string())
                    } else {
                        TokenKind::Shr
                    }
                } else if self.eat('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            other => return Err(ParseError::UnexpectedChar { ch: other, at: pos }),
        };
        self.push(pos, kind);
        Ok(())
    }
}

//! Hand-written character scanner (component I).
//!
//! Produces a flat `Vec<Token>` with a `Location` per token; no lookahead
//! table, just a cursor over `Vec<char>`. M++ has no external tokenizer to
//! defer to (unlike the hypothetical "given" lexer spec.md's host project
//! assumes), so this crate owns the whole front end.

use crate::location::Location;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    IntLit(i64),
    FloatLit(f64),
    CharLit(char),
    BoolLit(bool),

    // keywords
    Void,
    Bool,
    Char,
    Int,
    Float,
    Const,
    If,
    Else,
    Switch,
    Case,
    Default,
    While,
    Do,
    For,
    Break,
    Continue,
    Return,

    // punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Colon,

    // operators
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Shl,
    Shr,
    AmpAmp,
    PipePipe,
    Bang,
    EqEq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,

    /// A lexer-level failure (unterminated comment or character literal).
    /// The text is the diagnostic message; scanning stops after emitting it.
    Error(String),

    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Cursor {
    fn new(source: &str) -> Self {
        Cursor {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn location(&self, length: usize) -> Location {
        Location::new(self.line, self.column, length)
    }
}

fn keyword(ident: &str) -> Option<TokenKind> {
    Some(match ident {
        "void" => TokenKind::Void,
        "bool" => TokenKind::Bool,
        "char" => TokenKind::Char,
        "int" => TokenKind::Int,
        "float" => TokenKind::Float,
        "const" => TokenKind::Const,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "switch" => TokenKind::Switch,
        "case" => TokenKind::Case,
        "default" => TokenKind::Default,
        "while" => TokenKind::While,
        "do" => TokenKind::Do,
        "for" => TokenKind::For,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "return" => TokenKind::Return,
        "true" => TokenKind::BoolLit(true),
        "false" => TokenKind::BoolLit(false),
        _ => return None,
    })
}

/// Scans `source` into tokens, always ending in `TokenKind::Eof`. A lexer
/// error truncates scanning at the point of failure and appends a single
/// `TokenKind::Error` token in place of `Eof`.
pub fn lex(source: &str) -> Vec<Token> {
    let mut cur = Cursor::new(source);
    let mut tokens = Vec::new();

    loop {
        skip_whitespace_and_comments(&mut cur);
        if cur.peek().is_none() {
            tokens.push(Token { kind: TokenKind::Eof, location: cur.location(0) });
            return tokens;
        }

        let token = scan_one(&mut cur);
        let is_error = matches!(token.kind, TokenKind::Error(_));
        tokens.push(token);
        if is_error {
            return tokens;
        }
    }
}

fn skip_whitespace_and_comments(cur: &mut Cursor) {
    loop {
        match cur.peek() {
            Some(c) if c.is_whitespace() => {
                cur.advance();
            }
            Some('/') if cur.peek_at(1) == Some('/') => {
                while let Some(c) = cur.peek() {
                    if c == '\n' {
                        break;
                    }
                    cur.advance();
                }
            }
            Some('/') if cur.peek_at(1) == Some('*') => {
                cur.advance();
                cur.advance();
                loop {
                    match cur.peek() {
                        None => return,
                        Some('*') if cur.peek_at(1) == Some('/') => {
                            cur.advance();
                            cur.advance();
                            break;
                        }
                        Some(_) => {
                            cur.advance();
                        }
                    }
                }
            }
            _ => return,
        }
    }
}

/// Scans exactly one token. Caller has already confirmed `cur.peek()` is
/// `Some` and that leading whitespace/comments were skipped.
fn scan_one(cur: &mut Cursor) -> Token {
    let start_line = cur.line;
    let start_col = cur.column + 1;
    let ch = cur.advance().expect("caller checked peek() is Some");

    let kind = match ch {
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        '{' => TokenKind::LBrace,
        '}' => TokenKind::RBrace,
        ';' => TokenKind::Semicolon,
        ',' => TokenKind::Comma,
        ':' => TokenKind::Colon,
        '~' => TokenKind::Tilde,
        '^' => TokenKind::Caret,

        '+' if cur.peek() == Some('+') => {
            cur.advance();
            TokenKind::PlusPlus
        }
        '+' => TokenKind::Plus,

        '-' if cur.peek() == Some('-') => {
            cur.advance();
            TokenKind::MinusMinus
        }
        '-' => TokenKind::Minus,

        '*' => TokenKind::Star,
        '/' => TokenKind::Slash,
        '%' => TokenKind::Percent,

        '&' if cur.peek() == Some('&') => {
            cur.advance();
            TokenKind::AmpAmp
        }
        '&' => TokenKind::Amp,

        '|' if cur.peek() == Some('|') => {
            cur.advance();
            TokenKind::PipePipe
        }
        '|' => TokenKind::Pipe,

        '<' if cur.peek() == Some('<') => {
            cur.advance();
            TokenKind::Shl
        }
        '<' if cur.peek() == Some('=') => {
            cur.advance();
            TokenKind::LessEq
        }
        '<' => TokenKind::Less,

        '>' if cur.peek() == Some('>') => {
            cur.advance();
            TokenKind::Shr
        }
        '>' if cur.peek() == Some('=') => {
            cur.advance();
            TokenKind::GreaterEq
        }
        '>' => TokenKind::Greater,

        '=' if cur.peek() == Some('=') => {
            cur.advance();
            TokenKind::EqEq
        }
        '=' => TokenKind::Assign,

        '!' if cur.peek() == Some('=') => {
            cur.advance();
            TokenKind::NotEq
        }
        '!' => TokenKind::Bang,

        '\'' => return scan_char_literal(cur, start_line, start_col),

        c if c.is_ascii_digit() => return scan_number(cur, c, start_line, start_col),

        c if c.is_alphabetic() || c == '_' => {
            let mut ident = String::new();
            ident.push(c);
            while let Some(c) = cur.peek() {
                if c.is_alphanumeric() || c == '_' {
                    ident.push(c);
                    cur.advance();
                } else {
                    break;
                }
            }
            let length = ident.chars().count();
            let kind = keyword(&ident).unwrap_or(TokenKind::Ident(ident));
            return Token { kind, location: Location::new(start_line, start_col + length - 1, length) };
        }

        other => TokenKind::Error(format!("unexpected character '{other}'")),
    };

    let length = cur.column + 1 - start_col;
    Token { kind, location: Location::new(start_line, cur.column, length.max(1)) }
}

fn scan_char_literal(cur: &mut Cursor, start_line: usize, start_col: usize) -> Token {
    let value = match cur.advance() {
        Some('\\') => match cur.advance() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('0') => '\0',
            Some(c) => c,
            None => return unterminated_char(start_line, start_col),
        },
        Some(c) => c,
        None => return unterminated_char(start_line, start_col),
    };

    if cur.peek() != Some('\'') {
        return unterminated_char(start_line, start_col);
    }
    cur.advance();

    Token {
        kind: TokenKind::CharLit(value),
        location: Location::new(start_line, cur.column, cur.column + 1 - start_col),
    }
}

fn unterminated_char(start_line: usize, start_col: usize) -> Token {
    Token {
        kind: TokenKind::Error("unterminated character literal".to_string()),
        location: Location::new(start_line, start_col, 1),
    }
}

fn scan_number(cur: &mut Cursor, first: char, start_line: usize, start_col: usize) -> Token {
    let mut text = String::new();
    text.push(first);
    while let Some(c) = cur.peek() {
        if c.is_ascii_digit() {
            text.push(c);
            cur.advance();
        } else {
            break;
        }
    }

    let mut is_float = false;
    if cur.peek() == Some('.') && cur.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
        is_float = true;
        text.push('.');
        cur.advance();
        while let Some(c) = cur.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                cur.advance();
            } else {
                break;
            }
        }
    }

    let length = text.chars().count();
    let location = Location::new(start_line, start_col + length - 1, length);
    let kind = if is_float {
        TokenKind::FloatLit(text.parse().unwrap_or(0.0))
    } else {
        TokenKind::IntLit(text.parse().unwrap_or(0))
    };
    Token { kind, location }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn scans_keywords_and_identifiers() {
        assert_eq!(kinds("int x"), vec![TokenKind::Int, TokenKind::Ident("x".into()), TokenKind::Eof]);
    }

    #[test]
    fn scans_integer_and_float_literals() {
        assert_eq!(kinds("42 3.5"), vec![TokenKind::IntLit(42), TokenKind::FloatLit(3.5), TokenKind::Eof]);
    }

    #[test]
    fn distinguishes_increment_from_two_pluses() {
        assert_eq!(kinds("x++"), vec![TokenKind::Ident("x".into()), TokenKind::PlusPlus, TokenKind::Eof]);
    }

    #[test]
    fn line_comments_are_discarded() {
        assert_eq!(kinds("1 // two\n2"), vec![TokenKind::IntLit(1), TokenKind::IntLit(2), TokenKind::Eof]);
    }

    #[test]
    fn block_comments_are_discarded() {
        assert_eq!(kinds("1 /* skip\nthis */ 2"), vec![TokenKind::IntLit(1), TokenKind::IntLit(2), TokenKind::Eof]);
    }

    #[test]
    fn unterminated_block_comment_is_a_lexer_error() {
        let tokens = lex("1 /* never closes");
        assert!(matches!(tokens.last().unwrap().kind, TokenKind::Error(_)));
    }

    #[test]
    fn unterminated_char_literal_is_a_lexer_error() {
        let tokens = lex("'a");
        assert!(matches!(tokens.last().unwrap().kind, TokenKind::Error(_)));
    }

    #[test]
    fn escaped_char_literal_decodes_newline() {
        assert_eq!(kinds("'\\n'"), vec![TokenKind::CharLit('\n'), TokenKind::Eof]);
    }

    #[test]
    fn compound_operators_tokenize_longest_match_first() {
        assert_eq!(
            kinds("a <= b && c << 2"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::LessEq,
                TokenKind::Ident("b".into()),
                TokenKind::AmpAmp,
                TokenKind::Ident("c".into()),
                TokenKind::Shl,
                TokenKind::IntLit(2),
                TokenKind::Eof,
            ]
        );
    }
}

//! Tokenizer for the JavaScript literal subset Doxygen emits.
//!
//! Handles `var` statements, array and object literals, quoted strings,
//! integers, `null` and booleans. Comments are skipped; the first block
//! comment before any token is kept as the file preamble.

use crate::error::{NavtreeError, Result};

/// 1-based line and column of a token start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords
    Var, // var / let / const
    Null,
    True,
    False,

    // Literals
    Ident(String),
    Str(String),
    Number(i64),

    // Punctuation
    LeftBracket,  // [
    RightBracket, // ]
    LeftBrace,    // {
    RightBrace,   // }
    Comma,        // ,
    Colon,        // :
    Equals,       // =
    Semicolon,    // ;

    Eof,
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Var => "'var'".to_string(),
            TokenKind::Null => "'null'".to_string(),
            TokenKind::True => "'true'".to_string(),
            TokenKind::False => "'false'".to_string(),
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::Str(_) => "string".to_string(),
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::LeftBracket => "'['".to_string(),
            TokenKind::RightBracket => "']'".to_string(),
            TokenKind::LeftBrace => "'{'".to_string(),
            TokenKind::RightBrace => "'}'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Equals => "'='".to_string(),
            TokenKind::Semicolon => "';'".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    preamble: Option<String>,
    seen_token: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            preamble: None,
            seen_token: false,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.remaining().chars().nth(offset)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
        }
    }

    fn error(span: Span, message: impl Into<String>) -> NavtreeError {
        NavtreeError::Syntax {
            line: span.line,
            column: span.column,
            message: message.into(),
        }
    }

    /// Leading block comment, if the input started with one.
    pub fn preamble(&self) -> Option<&str> {
        self.preamble.as_deref()
    }

    pub fn into_preamble(self) -> Option<String> {
        self.preamble
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match (self.peek(), self.peek_at(1)) {
                // U+FEFF shows up at the start of files written on Windows
                (Some(c), _) if c.is_whitespace() || c == '\u{feff}' => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.pos;
                    let span = self.span();
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => return Err(Self::error(span, "unterminated block comment")),
                        }
                    }
                    if !self.seen_token && self.preamble.is_none() {
                        self.preamble = Some(self.input[start..self.pos].to_string());
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia()?;
        let span = self.span();
        let Some(c) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                span,
            });
        };
        self.seen_token = true;

        let kind = match c {
            '[' | ']' | '{' | '}' | ',' | ':' | '=' | ';' => {
                self.bump();
                match c {
                    '[' => TokenKind::LeftBracket,
                    ']' => TokenKind::RightBracket,
                    '{' => TokenKind::LeftBrace,
                    '}' => TokenKind::RightBrace,
                    ',' => TokenKind::Comma,
                    ':' => TokenKind::Colon,
                    '=' => TokenKind::Equals,
                    _ => TokenKind::Semicolon,
                }
            }
            '"' | '\'' => self.read_string(c, span)?,
            '-' | '0'..='9' => self.read_number(span)?,
            c if is_ident_start(c) => self.read_word(),
            other => return Err(Self::error(span, format!("unexpected character '{}'", other))),
        };

        Ok(Token { kind, span })
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn read_number(&mut self, span: Span) -> Result<TokenKind> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        let digits_start = self.pos;
        while matches!(self.peek(), Some('0'..='9')) {
            self.bump();
        }
        if self.pos == digits_start {
            return Err(Self::error(span, "expected digits after '-'"));
        }
        self.input[start..self.pos]
            .parse::<i64>()
            .map(TokenKind::Number)
            .map_err(|e| Self::error(span, format!("invalid number: {}", e)))
    }

    fn read_string(&mut self, quote: char, span: Span) -> Result<TokenKind> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(Self::error(span, "unterminated string")),
                Some(c) if c == quote => return Ok(TokenKind::Str(value)),
                Some('\\') => {
                    let escape_span = self.span();
                    match self.bump() {
                        Some('n') => value.push('\n'),
                        Some('r') => value.push('\r'),
                        Some('t') => value.push('\t'),
                        Some('b') => value.push('\u{8}'),
                        Some('f') => value.push('\u{c}'),
                        Some('0') => value.push('\0'),
                        Some(c @ ('\\' | '\'' | '"' | '/')) => value.push(c),
                        // Line continuation
                        Some('\n') => {}
                        Some('u') => value.push(self.read_unicode_escape(escape_span)?),
                        Some(other) => {
                            return Err(Self::error(
                                escape_span,
                                format!("unsupported escape '\\{}'", other),
                            ));
                        }
                        None => return Err(Self::error(span, "unterminated string")),
                    }
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn read_hex4(&mut self, span: Span) -> Result<u32> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| Self::error(span, "expected four hex digits after '\\u'"))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn read_unicode_escape(&mut self, span: Span) -> Result<char> {
        let high = self.read_hex4(span)?;
        if (0xD800..0xDC00).contains(&high) {
            if self.peek() == Some('\\') && self.peek_at(1) == Some('u') {
                self.bump();
                self.bump();
                let low = self.read_hex4(span)?;
                if (0xDC00..0xE000).contains(&low) {
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    if let Some(c) = char::from_u32(code) {
                        return Ok(c);
                    }
                }
            }
            return Err(Self::error(span, "unpaired surrogate in '\\u' escape"));
        }
        char::from_u32(high).ok_or_else(|| Self::error(span, "invalid '\\u' escape"))
    }

    fn read_word(&mut self) -> TokenKind {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_ident_char(c)) {
            self.bump();
        }
        match &self.input[start..self.pos] {
            "var" | "let" | "const" => TokenKind::Var,
            "null" => TokenKind::Null,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            word => TokenKind::Ident(word.to_string()),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_var_statement() {
        assert_eq!(
            kinds("var NAVTREE = [ null ];"),
            vec![
                TokenKind::Var,
                TokenKind::Ident("NAVTREE".to_string()),
                TokenKind::Equals,
                TokenKind::LeftBracket,
                TokenKind::Null,
                TokenKind::RightBracket,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""a\"b" 'it\'s' "é😀\\""#),
            vec![
                TokenKind::Str("a\"b".to_string()),
                TokenKind::Str("it's".to_string()),
                TokenKind::Str("é😀\\".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("{\"a\":[0,12,-3]}"),
            vec![
                TokenKind::LeftBrace,
                TokenKind::Str("a".to_string()),
                TokenKind::Colon,
                TokenKind::LeftBracket,
                TokenKind::Number(0),
                TokenKind::Comma,
                TokenKind::Number(12),
                TokenKind::Comma,
                TokenKind::Number(-3),
                TokenKind::RightBracket,
                TokenKind::RightBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_preamble_is_first_block_comment() {
        let src = "/*\n @licstart\n @licend\n */\n// line\nvar X = 1; /* later */";
        let mut lexer = Lexer::new(src);
        let tokens = lexer.tokenize().unwrap();
        assert_eq!(tokens.len(), 6);
        assert_eq!(lexer.preamble(), Some("/*\n @licstart\n @licend\n */"));
    }

    #[test]
    fn test_comment_after_token_is_not_preamble() {
        let mut lexer = Lexer::new("var X = 1; /* trailing */");
        lexer.tokenize().unwrap();
        assert!(lexer.preamble().is_none());
    }

    #[test]
    fn test_spans() {
        let tokens = Lexer::new("var\n  X").tokenize().unwrap();
        assert_eq!(tokens[1].span, Span { line: 2, column: 3 });
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("var X = \"abc").tokenize().unwrap_err();
        match err {
            NavtreeError::Syntax { line, column, .. } => {
                assert_eq!((line, column), (1, 9));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unexpected_character() {
        assert!(matches!(
            Lexer::new("var X = @").tokenize(),
            Err(NavtreeError::Syntax { .. })
        ));
    }

    #[test]
    fn test_unterminated_comment() {
        assert!(Lexer::new("/* open").tokenize().is_err());
    }
}

use std::collections::HashMap;
use std::hash::BuildHasherDefault;

use ahash::AHasher;
use tracing::{debug, trace};

use crate::error::{Diagnostic, Reporter, ScanError};
use token::{Literal, Token, TokenKind};

pub mod token;

type Keywords = HashMap<&'static str, TokenKind, BuildHasherDefault<AHasher>>;

/// Tokens of one source text together with every lexical error found in it.
#[derive(Debug)]
pub struct Scan<'source> {
    pub tokens: Vec<Token<'source>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Scan<'_> {
    pub fn had_error(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Scans `source` to completion, collecting diagnostics instead of stopping on them.
pub fn scan(source: &str) -> Scan<'_> {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
    debug!(
        tokens = tokens.len(),
        errors = diagnostics.len(),
        "finished scanning source"
    );
    Scan {
        tokens,
        diagnostics,
    }
}

pub struct Scanner<'source> {
    keywords: Keywords,
    source: &'source str,
    // byte offset of every char, so the cursor counts chars but lexemes slice on boundaries
    chars: Vec<(usize, char)>,
    tokens: Vec<Token<'source>>,
    start: usize,
    current: usize,
    line: usize,
}

impl<'source> Scanner<'source> {
    pub fn new(source: &'source str) -> Self {
        let mut keywords = Keywords::with_capacity_and_hasher(16, Default::default());
        keywords.insert("and", TokenKind::And);
        keywords.insert("class", TokenKind::Class);
        keywords.insert("else", TokenKind::Else);
        keywords.insert("false", TokenKind::False);
        keywords.insert("for", TokenKind::For);
        keywords.insert("fun", TokenKind::Fun);
        keywords.insert("if", TokenKind::If);
        keywords.insert("nil", TokenKind::Nil);
        keywords.insert("or", TokenKind::Or);
        keywords.insert("print", TokenKind::Print);
        keywords.insert("return", TokenKind::Return);
        keywords.insert("super", TokenKind::Super);
        keywords.insert("this", TokenKind::This);
        keywords.insert("true", TokenKind::True);
        keywords.insert("var", TokenKind::Var);
        keywords.insert("while", TokenKind::While);
        Self {
            keywords,
            source,
            chars: source.char_indices().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Consumes the scanner and returns every token, always ending with exactly one `Eof`.
    ///
    /// Lexical errors go to `reporter` and scanning carries on with the next character.
    pub fn scan_tokens<R>(mut self, reporter: &mut R) -> Vec<Token<'source>>
    where
        R: Reporter + ?Sized,
    {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token(reporter);
        }
        self.start = self.current;
        self.add_token(TokenKind::Eof);
        self.tokens
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    fn scan_token<R>(&mut self, reporter: &mut R)
    where
        R: Reporter + ?Sized,
    {
        let c = self.advance();
        match c {
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            '.' => self.add_token(TokenKind::Dot),
            '-' => self.add_token(TokenKind::Minus),
            '+' => self.add_token(TokenKind::Plus),
            ';' => self.add_token(TokenKind::Semicolon),
            '*' => self.add_token(TokenKind::Star),
            '/' => match self.is_match('/') {
                true => self.skip_comment(),
                false => self.add_token(TokenKind::Slash),
            },
            '!' => match self.is_match('=') {
                true => self.add_token(TokenKind::BangEqual),
                false => self.add_token(TokenKind::Bang),
            },
            '=' => match self.is_match('=') {
                true => self.add_token(TokenKind::EqualEqual),
                false => self.add_token(TokenKind::Equal),
            },
            '<' => match self.is_match('=') {
                true => self.add_token(TokenKind::LessEqual),
                false => self.add_token(TokenKind::Less),
            },
            '>' => match self.is_match('=') {
                true => self.add_token(TokenKind::GreaterEqual),
                false => self.add_token(TokenKind::Greater),
            },
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.string(reporter),
            c if c.is_ascii_digit() => self.number(reporter),
            c if is_alpha(c) => self.identifier(),
            c => self.error(reporter, ScanError::UnexpectedCharacter(c)),
        }
    }

    /// Precondition: not at end.
    fn advance(&mut self) -> char {
        let (_, c) = self.chars[self.current];
        self.current += 1;
        c
    }

    fn is_match(&mut self, expected: char) -> bool {
        if self.is_at_end() {
            return false;
        }
        if self.peek() != Some(expected) {
            return false;
        }
        self.current += 1;
        true
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.current).map(|&(_, c)| c)
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.current + 1).map(|&(_, c)| c)
    }

    fn byte_offset(&self, position: usize) -> usize {
        self.chars
            .get(position)
            .map_or(self.source.len(), |&(offset, _)| offset)
    }

    fn slice(&self, from: usize, to: usize) -> &'source str {
        &self.source[self.byte_offset(from)..self.byte_offset(to)]
    }

    fn lexeme(&self) -> &'source str {
        self.slice(self.start, self.current)
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.add_literal_token(kind, None, self.line);
    }

    /// `line` is where the token's first character sits, which differs from the
    /// current line only for strings spanning several lines.
    fn add_literal_token(
        &mut self,
        kind: TokenKind,
        literal: Option<Literal<'source>>,
        line: usize,
    ) {
        let token = Token {
            kind,
            lexeme: self.lexeme(),
            literal,
            line,
        };
        trace!(kind = ?token.kind, lexeme = token.lexeme, line = token.line, "token");
        self.tokens.push(token);
    }

    fn error<R>(&self, reporter: &mut R, error: ScanError)
    where
        R: Reporter + ?Sized,
    {
        debug!(line = self.line, ?error, "lexical error");
        reporter.report(self.line, "", error);
    }

    fn skip_comment(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.current += 1;
        }
    }

    fn string<R>(&mut self, reporter: &mut R)
    where
        R: Reporter + ?Sized,
    {
        let line = self.line;
        while self.peek().is_some_and(|c| c != '"') {
            if self.advance() == '\n' {
                self.line += 1
            }
        }
        if self.is_at_end() {
            return self.error(reporter, ScanError::UnterminatedString);
        }
        // closing quote
        self.current += 1;
        let value = self.slice(self.start + 1, self.current - 1);
        self.add_literal_token(TokenKind::String, Some(Literal::String(value)), line);
    }

    fn number<R>(&mut self, reporter: &mut R)
    where
        R: Reporter + ?Sized,
    {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.current += 1
        }
        let fraction = self.peek_next().is_some_and(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && fraction {
            self.current += 1;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.current += 1
            }
        }
        match self.lexeme().parse::<f64>() {
            Ok(value) if value.is_finite() => {
                let literal = Some(Literal::Number(value));
                self.add_literal_token(TokenKind::Number, literal, self.line)
            }
            // too many digits to fit an f64
            Ok(_) | Err(_) => self.error(reporter, ScanError::MalformedNumber),
        }
    }

    fn identifier(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit() || is_alpha(c)) {
            self.current += 1;
        }
        let kind = match self.keywords.get(self.lexeme()) {
            Some(kind) => *kind,
            None => TokenKind::Identifier,
        };
        self.add_token(kind);
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_uppercase() || c == '_'
}

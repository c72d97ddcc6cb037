//! Lexer for constant table files
//!
//! Splits a line into bare words and double-quoted string literals. Every
//! token carries a [`SourceLocation`] so load errors can point at the exact
//! line and column.

use std::fmt;

/// Position in a source file (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        SourceLocation { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Unquoted run of non-whitespace characters
    Word(String, SourceLocation),
    /// Double-quoted literal with escapes already resolved
    StringLiteral(String, SourceLocation),
}

impl Token {
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::Word(_, loc) | Token::StringLiteral(_, loc) => *loc,
        }
    }
}

pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, line: usize) -> Self {
        Lexer {
            chars: input.chars().peekable(),
            line,
            column: 1,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.column += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.advance();
        }
    }

    /// Produce the next token, `Ok(None)` at end of line
    pub fn next_token(&mut self) -> Result<Option<Token>, String> {
        self.skip_whitespace();
        let location = SourceLocation::new(self.line, self.column);

        match self.chars.peek() {
            None => Ok(None),
            Some('"') => {
                self.advance();
                self.read_string(location).map(Some)
            }
            Some(_) => {
                let mut word = String::new();
                while let Some(&c) = self.chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    word.push(c);
                    self.advance();
                }
                Ok(Some(Token::Word(word, location)))
            }
        }
    }

    fn read_string(&mut self, location: SourceLocation) -> Result<Token, String> {
        let mut text = String::new();
        loop {
            match self.advance() {
                None => return Err("unterminated string literal".to_string()),
                Some('"') => return Ok(Token::StringLiteral(text, location)),
                Some('\\') => match self.advance() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('"') => text.push('"'),
                    Some('\\') => text.push('\\'),
                    Some(other) => return Err(format!("unknown escape sequence '\\{}'", other)),
                    None => return Err("unterminated string literal".to_string()),
                },
                Some(c) => text.push(c),
            }
        }
    }

    /// Collect all tokens on the line
    pub fn tokenize(&mut self) -> Result<Vec<Token>, String> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_and_strings() {
        let tokens = Lexer::new(r#"string 230000 "hi \"there\"\n""#, 3)
            .tokenize()
            .unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(
            tokens[0],
            Token::Word("string".to_string(), SourceLocation::new(3, 1))
        );
        assert_eq!(
            tokens[2],
            Token::StringLiteral("hi \"there\"\n".to_string(), SourceLocation::new(3, 15))
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert!(Lexer::new("\"open", 1).tokenize().is_err());
    }
}

use crate::ast::Token;

/// Location of a token in the query text.
///
/// `offset` counts characters from the start of the input; `line` and
/// `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A token together with where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: Position,
    /// The raw text the token was read from.
    pub lexeme: String,
}

/// Error raised while tokenizing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at {position}")]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

#[derive(Clone)]
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// The full input text.
    pub fn source(&self) -> String {
        self.input.iter().collect()
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn current_position(&self) -> Position {
        Position {
            offset: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn error(&self, message: impl Into<String>, position: Position) -> LexError {
        LexError {
            message: message.into(),
            position,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.current_position();
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('"') => result.push('"'),
                        Some('\'') => result.push('\''),
                        Some('\\') => result.push('\\'),
                        Some(ch) => {
                            return Err(self.error(
                                format!("Invalid escape sequence: \\{ch}"),
                                self.current_position(),
                            ));
                        }
                        None => {
                            return Err(self.error(
                                "Unterminated string: unexpected end of input after backslash",
                                start,
                            ));
                        }
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(self.error("Unterminated string: missing closing quote", start))
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.current_position();
        let mut number = String::new();
        let mut is_float = false;

        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if is_float {
            number
                .parse::<f64>()
                .map(Token::Float)
                .map_err(|_| self.error(format!("Invalid number '{number}'"), start))
        } else {
            number
                .parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| self.error(format!("Integer literal '{number}' is out of range"), start))
        }
    }

    /// Finds the index just past the `}` closing the brace at the current
    /// position, skipping braces inside string literals.
    fn matching_brace_end(&self) -> Option<usize> {
        let mut depth = 0usize;
        let mut in_string: Option<char> = None;
        let mut escaped = false;

        for (idx, &ch) in self.input.iter().enumerate().skip(self.position) {
            if let Some(quote) = in_string {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == quote {
                    in_string = None;
                }
                continue;
            }
            match ch {
                '"' | '\'' => in_string = Some(ch),
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(idx + 1);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Tries to read a JSON object starting at the current `{`.
    ///
    /// Braced arrays such as `{"sun", "moon"}` are not JSON and leave the
    /// lexer untouched.
    fn try_read_json(&mut self) -> Option<serde_json::Value> {
        let first = self.input[self.position + 1..]
            .iter()
            .find(|c| !c.is_whitespace())
            .copied();
        if !matches!(first, Some('"') | Some('}')) {
            return None;
        }

        let end = self.matching_brace_end()?;
        let text: String = self.input[self.position..end].iter().collect();
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(value @ serde_json::Value::Object(_)) => {
                while self.position < end {
                    self.advance();
                }
                Some(value)
            }
            _ => None,
        }
    }

    /// Reads the next token with its position and raw text.
    pub fn next_spanned(&mut self) -> Result<Spanned, LexError> {
        self.skip_whitespace();
        let position = self.current_position();
        let token = self.read_token(position)?;
        let lexeme = self.input[position.offset..self.position].iter().collect();
        Ok(Spanned {
            token,
            position,
            lexeme,
        })
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.next_spanned().map(|spanned| spanned.token)
    }

    /// Tokenizes the whole input, ending with [`Token::Eof`].
    pub fn tokenize(&mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_spanned()?;
            let is_eof = spanned.token == Token::Eof;
            tokens.push(spanned);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn read_token(&mut self, start: Position) -> Result<Token, LexError> {
        let token = match self.current_char() {
            None => Token::Eof,
            Some('@') => {
                if self
                    .peek_char(1)
                    .is_some_and(|c| c.is_alphanumeric() || c == '_')
                {
                    self.advance();
                    Token::Param(self.read_identifier())
                } else {
                    return Err(self.error("Expected parameter name after '@'", start));
                }
            }
            Some('*') => self.single(Token::Star),
            Some(',') => self.single(Token::Comma),
            Some('.') => self.single(Token::Dot),
            Some(':') => self.single(Token::Colon),
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('[') => self.single(Token::LBracket),
            Some(']') => self.single(Token::RBracket),
            Some('}') => self.single(Token::RBrace),
            Some('{') => match self.try_read_json() {
                Some(json) => Token::Json(json),
                None => self.single(Token::LBrace),
            },
            Some('=') => self.single(Token::Eq),
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.single(Token::GtEq)
                } else {
                    self.single(Token::Gt)
                }
            }
            Some('<') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.single(Token::LtEq)
                } else {
                    self.single(Token::Lt)
                }
            }
            Some('!') => {
                return Err(self.error(
                    "Unexpected character '!' (use `not` to negate a condition)",
                    start,
                ));
            }
            Some('"') => Token::String(self.read_string('"')?),
            Some('\'') => Token::String(self.read_string('\'')?),
            Some('-') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()?
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();
                Token::keyword(&ident).unwrap_or(Token::Identifier(ident))
            }
            Some(ch) => {
                return Err(self.error(format!("Unexpected character '{ch}'"), start));
            }
        };
        Ok(token)
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("select FROM Where and OR not true false null");
    assert_eq!(lexer.next_token().unwrap(), Token::Select);
    assert_eq!(lexer.next_token().unwrap(), Token::From);
    assert_eq!(lexer.next_token().unwrap(), Token::Where);
    assert_eq!(lexer.next_token().unwrap(), Token::And);
    assert_eq!(lexer.next_token().unwrap(), Token::Or);
    assert_eq!(lexer.next_token().unwrap(), Token::Not);
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(true));
    assert_eq!(lexer.next_token().unwrap(), Token::Boolean(false));
    assert_eq!(lexer.next_token().unwrap(), Token::Null);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_where_clause() {
    let mut lexer = Lexer::new("where age >= @age");
    assert_eq!(lexer.next_token().unwrap(), Token::Where);
    assert_eq!(lexer.next_token().unwrap(), Token::Identifier("age".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::GtEq);
    assert_eq!(lexer.next_token().unwrap(), Token::Param("age".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

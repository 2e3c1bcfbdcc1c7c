use crate::{
    ast::{
        Assignment, CompareOp, Comparison, Connective, DelStatement, DeleteStatement, EntityBody,
        EntityRef, Expr, FieldRef, GetStatement, InsertStatement, Literal, PutStatement,
        SelectStatement, SortDirection, SortSpec, Statement, Token, TtlClause, UpdateStatement,
        WhereClause,
    },
    lexer::{LexError, Lexer, Position, Spanned},
};
use std::mem;

/// Syntax error raised by the lexer or the parser.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at {position} near `{fragment}`")]
pub struct ParseError {
    pub message: String,
    /// Raw text of the offending token (empty at end of input).
    pub fragment: String,
    pub position: Position,
}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError {
            message: e.message,
            fragment: String::new(),
            position: e.position,
        }
    }
}

pub struct Parser {
    lexer: Lexer,
    current: Spanned,
    source: String,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let source = lexer.source();
        let current = lexer.next_spanned()?;
        Ok(Parser {
            lexer,
            current,
            source,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current = self.lexer.next_spanned()?;
        Ok(())
    }

    /// Takes the current token and moves to the next one.
    fn bump(&mut self) -> Result<Spanned, ParseError> {
        let next = self.lexer.next_spanned()?;
        Ok(mem::replace(&mut self.current, next))
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let fragment = if self.current.token == Token::Eof {
            "end of input".to_string()
        } else {
            self.current.lexeme.clone()
        };
        ParseError {
            message: message.into(),
            fragment,
            position: self.current.position,
        }
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current.token) == mem::discriminant(token)
    }

    fn eat(&mut self, token: &Token) -> Result<bool, ParseError> {
        if self.check(token) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.error(format!(
                "Expected '{}', got '{}'",
                expected, self.current.token
            )));
        }
        self.advance()
    }

    fn expect_identifier(&mut self, what: &str) -> Result<String, ParseError> {
        match &self.current.token {
            Token::Identifier(_) => match self.bump()?.token {
                Token::Identifier(name) => Ok(name),
                _ => unreachable!(),
            },
            other => Err(self.error(format!("Expected {what}, got '{other}'"))),
        }
    }

    /// Parses one complete statement and requires the input to end after it.
    pub fn parse(&mut self) -> Result<Statement, ParseError> {
        let statement = match &self.current.token {
            Token::Select => self.parse_select()?,
            Token::Delete => self.parse_delete()?,
            Token::Insert => self.parse_insert()?,
            Token::Update => self.parse_update()?,
            Token::Put => self.parse_put()?,
            Token::Get => Statement::Get(GetStatement {
                keys: self.parse_key_list()?,
            }),
            Token::Del => Statement::Del(DelStatement {
                keys: self.parse_key_list()?,
            }),
            _ => {
                return Err(ParseError {
                    message: format!("Unrecognized statement `{}`", self.source.trim()),
                    fragment: self.current.lexeme.clone(),
                    position: self.current.position,
                });
            }
        };

        if !self.check(&Token::Eof) {
            return Err(self.error(format!(
                "Unexpected '{}' after end of statement",
                self.current.token
            )));
        }
        Ok(statement)
    }

    fn parse_entity(&mut self) -> Result<EntityRef, ParseError> {
        self.expect_identifier("entity name").map(EntityRef)
    }

    /// `name` or `name.nested.path`
    fn parse_field(&mut self) -> Result<FieldRef, ParseError> {
        let mut name = self.expect_identifier("field name")?;
        while self.check(&Token::Dot) {
            self.advance()?;
            name.push('.');
            name.push_str(&self.expect_identifier("field name after '.'")?);
        }
        Ok(FieldRef(name))
    }

    fn parse_field_list(&mut self) -> Result<Vec<FieldRef>, ParseError> {
        let mut fields = vec![self.parse_field()?];
        while self.eat(&Token::Comma)? {
            fields.push(self.parse_field()?);
        }
        Ok(fields)
    }

    fn parse_select(&mut self) -> Result<Statement, ParseError> {
        self.advance()?; // consume select

        let fields = if self.eat(&Token::Star)? || self.check(&Token::From) {
            vec![]
        } else {
            self.parse_field_list()?
        };

        self.expect(Token::From)?;
        let entity = self.parse_entity()?;
        let where_clause = self.parse_where()?;

        let mut order_by = vec![];
        if self.eat(&Token::Order)? {
            self.expect(Token::By)?;
            loop {
                let field = self.parse_field()?;
                let direction = if self.eat(&Token::Desc)? {
                    SortDirection::Desc
                } else {
                    self.eat(&Token::Asc)?;
                    SortDirection::Asc
                };
                order_by.push(SortSpec { field, direction });

                if !self.eat(&Token::Comma)? {
                    break;
                }
            }
        }

        let skip = if self.eat(&Token::Skip)? {
            Some(self.parse_count("skip")?)
        } else {
            None
        };
        let limit = if self.eat(&Token::Limit)? {
            Some(self.parse_count("limit")?)
        } else {
            None
        };

        Ok(Statement::Select(SelectStatement {
            entity,
            fields,
            where_clause,
            order_by,
            skip,
            limit,
        }))
    }

    fn parse_count(&mut self, clause: &str) -> Result<i64, ParseError> {
        match self.current.token {
            Token::Integer(n) if n >= 0 => {
                self.advance()?;
                Ok(n)
            }
            _ => Err(self.error(format!("'{clause}' expects a non-negative integer"))),
        }
    }

    fn parse_delete(&mut self) -> Result<Statement, ParseError> {
        self.advance()?; // consume delete

        let fields = if self.check(&Token::From) {
            vec![]
        } else {
            self.parse_field_list()?
        };

        self.expect(Token::From)?;
        let entity = self.parse_entity()?;
        let where_clause = self.parse_where()?;

        Ok(Statement::Delete(DeleteStatement {
            entity,
            fields,
            where_clause,
        }))
    }

    fn parse_where(&mut self) -> Result<Option<WhereClause>, ParseError> {
        if !self.eat(&Token::Where)? {
            return Ok(None);
        }

        let first = self.parse_comparison()?;
        let mut rest = vec![];
        loop {
            let connective = match self.current.token {
                Token::And => Connective::And,
                Token::Or => Connective::Or,
                _ => break,
            };
            self.advance()?;
            rest.push((connective, self.parse_comparison()?));
        }

        Ok(Some(WhereClause { first, rest }))
    }

    fn parse_comparison(&mut self) -> Result<Comparison, ParseError> {
        let position = self.current.position;
        let negated = self.eat(&Token::Not)?;
        let field = self.parse_field()?;

        let operator = match self.current.token {
            Token::Eq => CompareOp::Eq,
            Token::Gt => CompareOp::Gt,
            Token::GtEq => CompareOp::Gte,
            Token::Lt => CompareOp::Lt,
            Token::LtEq => CompareOp::Lte,
            Token::Between => CompareOp::Between,
            Token::In => CompareOp::In,
            Token::Like => CompareOp::Like,
            _ => {
                return Err(self.error(format!(
                    "Expected a comparison operator after '{}'",
                    field.name()
                )));
            }
        };
        self.advance()?;

        let value = match operator {
            CompareOp::Between => {
                let low = self.parse_value()?;
                // `between {1, 2}` and `between @range` supply both bounds at once
                let both = match low {
                    Expr::Array(_) => true,
                    Expr::Param(_) => !self.check(&Token::And) || !self.and_starts_bound()?,
                    _ => false,
                };
                if both {
                    low
                } else {
                    self.expect(Token::And)?;
                    let high = self.parse_value()?;
                    Expr::Array(vec![low, high])
                }
            }
            CompareOp::In => {
                if self.eat(&Token::LParen)? {
                    Expr::Array(self.parse_values_until(Token::RParen)?)
                } else {
                    self.parse_value()?
                }
            }
            _ => self.parse_value()?,
        };

        Ok(Comparison {
            field,
            operator,
            value,
            negated,
            position,
        })
    }

    /// Whether the current `and` is followed by a value (the upper bound of
    /// a `between`) rather than the next comparison.
    fn and_starts_bound(&self) -> Result<bool, ParseError> {
        let mut ahead = self.lexer.clone();
        let starts = match ahead.next_token()? {
            Token::Not => false,
            Token::Identifier(_) => ahead.next_token()? == Token::LParen,
            _ => true,
        };
        Ok(starts)
    }

    /// Parses comma-separated values up to and including `close`.
    fn parse_values_until(&mut self, close: Token) -> Result<Vec<Expr>, ParseError> {
        let mut values = vec![];
        while !self.check(&close) {
            values.push(self.parse_value()?);
            if !self.check(&close) {
                self.expect(Token::Comma)?;
            }
        }
        self.expect(close)?;
        Ok(values)
    }

    pub fn parse_value(&mut self) -> Result<Expr, ParseError> {
        match &self.current.token {
            Token::String(_)
            | Token::Integer(_)
            | Token::Float(_)
            | Token::Boolean(_)
            | Token::Null
            | Token::Param(_)
            | Token::Json(_) => {}
            Token::LBrace => {
                self.advance()?;
                return Ok(Expr::Array(self.parse_values_until(Token::RBrace)?));
            }
            Token::LBracket => {
                self.advance()?;
                return Ok(Expr::Array(self.parse_values_until(Token::RBracket)?));
            }
            Token::Identifier(_) => return self.parse_function(),
            other => return Err(self.error(format!("Expected a value, got '{other}'"))),
        }

        let expr = match self.bump()?.token {
            Token::String(s) => Expr::Literal(Literal::String(s)),
            Token::Integer(n) => Expr::Literal(Literal::Integer(n)),
            Token::Float(n) => Expr::Literal(Literal::Float(n)),
            Token::Boolean(b) => Expr::Literal(Literal::Boolean(b)),
            Token::Null => Expr::Literal(Literal::Null),
            Token::Param(name) => Expr::Param(name),
            Token::Json(json) => Expr::Json(json),
            _ => unreachable!(),
        };
        Ok(expr)
    }

    /// `name(arg, ...)` where bare identifier arguments become string literals
    /// (`convert(@age, integer)`).
    fn parse_function(&mut self) -> Result<Expr, ParseError> {
        let name = self.expect_identifier("function name")?;
        if !self.check(&Token::LParen) {
            return Err(self.error(format!(
                "Expected '(' after '{name}'; bare names are not values"
            )));
        }
        self.advance()?;

        let mut args = vec![];
        while !self.check(&Token::RParen) {
            let arg = if matches!(self.current.token, Token::Identifier(_)) {
                let FieldRef(path) = self.parse_field()?;
                if self.check(&Token::LParen) {
                    return Err(self.error("Nested function calls are not supported"));
                }
                Expr::Literal(Literal::String(path))
            } else {
                self.parse_value()?
            };
            args.push(arg);
            if !self.check(&Token::RParen) {
                self.expect(Token::Comma)?;
            }
        }
        self.expect(Token::RParen)?;

        Ok(Expr::Function { name, args })
    }

    fn parse_body(&mut self) -> Result<EntityBody, ParseError> {
        if let Token::Json(_) = self.current.token {
            return match self.bump()?.token {
                Token::Json(json) => Ok(EntityBody::Json(json)),
                _ => unreachable!(),
            };
        }

        self.expect(Token::LParen)?;
        let mut assignments = vec![];
        loop {
            let field = self.parse_field()?;
            self.expect(Token::Eq)?;
            let value = self.parse_value()?;
            assignments.push(Assignment { field, value });
            if !self.eat(&Token::Comma)? {
                break;
            }
        }
        self.expect(Token::RParen)?;
        Ok(EntityBody::Assignments(assignments))
    }

    fn at_ttl(&self) -> bool {
        matches!(self.current.token, Token::Ttl | Token::Integer(_))
    }

    /// `[ttl] N unit`
    fn parse_ttl(&mut self) -> Result<TtlClause, ParseError> {
        let position = self.current.position;
        self.eat(&Token::Ttl)?;
        let amount = match self.current.token {
            Token::Integer(n) => n,
            _ => return Err(self.error("Expected a TTL amount")),
        };
        self.advance()?;
        let unit = self.expect_identifier("a TTL unit")?;
        Ok(TtlClause {
            amount,
            unit,
            position,
        })
    }

    fn parse_insert(&mut self) -> Result<Statement, ParseError> {
        self.advance()?; // consume insert
        let entity = self.parse_entity()?;
        let body = self.parse_body()?;
        let ttl = if self.at_ttl() {
            Some(self.parse_ttl()?)
        } else {
            None
        };
        Ok(Statement::Insert(InsertStatement { entity, body, ttl }))
    }

    fn parse_update(&mut self) -> Result<Statement, ParseError> {
        self.advance()?; // consume update
        let entity = self.parse_entity()?;
        let body = self.parse_body()?;
        Ok(Statement::Update(UpdateStatement { entity, body }))
    }

    /// `put {key, value [, ttl]}` or `put key [= value] [ttl]`
    fn parse_put(&mut self) -> Result<Statement, ParseError> {
        self.advance()?; // consume put

        if self.eat(&Token::LBrace)? {
            let key = self.parse_value()?;
            self.expect(Token::Comma)?;
            let value = self.parse_value()?;
            let ttl = if self.eat(&Token::Comma)? {
                Some(self.parse_ttl()?)
            } else {
                None
            };
            self.expect(Token::RBrace)?;
            return Ok(Statement::Put(PutStatement {
                key,
                value: Some(value),
                ttl,
            }));
        }

        let key = self.parse_value()?;
        let value = if self.eat(&Token::Eq)? {
            Some(self.parse_value()?)
        } else {
            None
        };
        let ttl = if self.at_ttl() {
            Some(self.parse_ttl()?)
        } else {
            None
        };
        Ok(Statement::Put(PutStatement { key, value, ttl }))
    }

    fn parse_key_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.advance()?; // consume get/del
        let mut keys = vec![self.parse_value()?];
        while self.eat(&Token::Comma)? {
            keys.push(self.parse_value()?);
        }
        Ok(keys)
    }
}

/// Parses a single statement from `text`.
pub fn parse(text: &str) -> Result<Statement, ParseError> {
    Parser::new(Lexer::new(text))?.parse()
}

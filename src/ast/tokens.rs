use std::fmt;

/// Lexical token produced by the [`Lexer`](crate::lexer::Lexer).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Integer literal (no decimal point)
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -7
    /// ```
    Integer(i64),

    /// Floating-point literal
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// -0.5
    /// ```
    Float(f64),

    /// String literal enclosed in double or single quotes
    ///
    /// # Examples
    /// ```text
    /// "Diana"
    /// 'Apollo'
    /// ```
    String(String),

    /// Boolean values
    Boolean(bool),

    /// Null value
    Null,

    /// JSON object blob
    ///
    /// Lexed as one token when the braces hold a valid JSON object.
    ///
    /// # Examples
    /// ```text
    /// {"name": "Diana", "age": 10}
    /// ```
    Json(serde_json::Value),

    /// Named parameter reference
    ///
    /// # Examples
    /// ```text
    /// @age
    /// @name
    /// ```
    Param(String),

    /// Entity, field, unit or function name
    Identifier(String),

    // Statement keywords
    Select,
    Delete,
    Insert,
    Update,
    Put,
    Get,
    /// Key-value removal (`del "key"`)
    Del,

    // Clause keywords
    From,
    Where,
    Order,
    By,
    Asc,
    Desc,
    Skip,
    Limit,
    Ttl,
    And,
    Or,
    Not,
    Between,
    Like,
    In,

    // Comparison
    /// `=`
    Eq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,

    // Delimiters
    Star,
    Comma,
    Dot,
    Colon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    /// End of input
    Eof,
}

impl Token {
    /// Maps a word to its keyword token, if it is one.
    ///
    /// Keywords are case-insensitive.
    pub fn keyword(word: &str) -> Option<Token> {
        let token = match word.to_ascii_lowercase().as_str() {
            "select" => Token::Select,
            "delete" => Token::Delete,
            "insert" => Token::Insert,
            "update" => Token::Update,
            "put" => Token::Put,
            "get" => Token::Get,
            "del" => Token::Del,
            "from" => Token::From,
            "where" => Token::Where,
            "order" => Token::Order,
            "by" => Token::By,
            "asc" => Token::Asc,
            "desc" => Token::Desc,
            "skip" => Token::Skip,
            "limit" => Token::Limit,
            "ttl" => Token::Ttl,
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            "between" => Token::Between,
            "like" => Token::Like,
            "in" => Token::In,
            "true" => Token::Boolean(true),
            "false" => Token::Boolean(false),
            "null" => Token::Null,
            _ => return None,
        };
        Some(token)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(n) => write!(f, "{n}"),
            Token::Float(n) => write!(f, "{n}"),
            Token::String(s) => write!(f, "\"{s}\""),
            Token::Boolean(b) => write!(f, "{b}"),
            Token::Null => f.write_str("null"),
            Token::Json(v) => write!(f, "{v}"),
            Token::Param(name) => write!(f, "@{name}"),
            Token::Identifier(name) => f.write_str(name),
            Token::Select => f.write_str("select"),
            Token::Delete => f.write_str("delete"),
            Token::Insert => f.write_str("insert"),
            Token::Update => f.write_str("update"),
            Token::Put => f.write_str("put"),
            Token::Get => f.write_str("get"),
            Token::Del => f.write_str("del"),
            Token::From => f.write_str("from"),
            Token::Where => f.write_str("where"),
            Token::Order => f.write_str("order"),
            Token::By => f.write_str("by"),
            Token::Asc => f.write_str("asc"),
            Token::Desc => f.write_str("desc"),
            Token::Skip => f.write_str("skip"),
            Token::Limit => f.write_str("limit"),
            Token::Ttl => f.write_str("ttl"),
            Token::And => f.write_str("and"),
            Token::Or => f.write_str("or"),
            Token::Not => f.write_str("not"),
            Token::Between => f.write_str("between"),
            Token::Like => f.write_str("like"),
            Token::In => f.write_str("in"),
            Token::Eq => f.write_str("="),
            Token::Gt => f.write_str(">"),
            Token::GtEq => f.write_str(">="),
            Token::Lt => f.write_str("<"),
            Token::LtEq => f.write_str("<="),
            Token::Star => f.write_str("*"),
            Token::Comma => f.write_str(","),
            Token::Dot => f.write_str("."),
            Token::Colon => f.write_str(":"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::LBrace => f.write_str("{"),
            Token::RBrace => f.write_str("}"),
            Token::LBracket => f.write_str("["),
            Token::RBracket => f.write_str("]"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

//! Reference text for the quill CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Statements,
    Conditions,
    Parameters,
    Ttl,
    Functions,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "statements" | "statement" | "stmt" => Some(Self::Statements),
            "conditions" | "condition" | "where" => Some(Self::Conditions),
            "parameters" | "parameter" | "params" => Some(Self::Parameters),
            "ttl" | "expiry" => Some(Self::Ttl),
            "functions" | "function" | "convert" => Some(Self::Functions),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"QUILL DOCUMENTATION

Quill compiles CRUD-style statements for document and key-value stores.
Each statement is checked and compiled into a structured form that a store
executes; `quill check` prints that form as JSON.

DOCUMENTATION CATEGORIES

  statements        select, delete, insert, update, put, get, del
  conditions        where clauses: comparisons, and/or/not, between, in, like
  parameters        @name placeholders and --param bindings
  ttl               Time-to-live clauses on insert and put
  functions         convert(value, kind)

QUICK REFERENCE

  select * from God where age > 10 order by name skip 2 limit 5
  insert God (name = "Diana", age = 30) 10 day
  put {"sun", "Apollo"}
  get "sun", "moon"
  select * from God where name = @name

Run 'quill doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Statements) => Ok(STATEMENTS_DOC),
        Some(DocCategory::Conditions) => Ok(CONDITIONS_DOC),
        Some(DocCategory::Parameters) => Ok(PARAMETERS_DOC),
        Some(DocCategory::Ttl) => Ok(TTL_DOC),
        Some(DocCategory::Functions) => Ok(FUNCTIONS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const STATEMENTS_DOC: &str = r#"STATEMENTS - Document and Key-Value Operations

SELECT
  select [field, ... | *] from Entity [where ...] [order by field [asc|desc], ...]
         [skip N] [limit N]

    Example:
      select name, age from God where age > 10 order by name desc limit 5

    Constraints:
      - No fields (or *) selects every field
      - skip and limit are non-negative integers; absent means 0
      - A limit of 0 is unbounded

DELETE
  delete [field, ...] from Entity [where ...]

    Example:
      delete from God where name = "Ares"
      delete power from God where name = "Zeus"

INSERT
  insert Entity (field = value, ...) [ttl]
  insert Entity {JSON object} [ttl]

    Example:
      insert God (name = "Diana", age = 30)
      insert God {"name": "Diana", "age": 30} 10 day

    Constraints:
      - Each field may appear once

UPDATE
  update Entity (field = value, ...)
  update Entity {JSON object}

PUT
  put {key, value [, ttl]}
  put key [= value] [ttl]

    Example:
      put {"sun", "Apollo"}
      put {"sun", "Apollo", 10 second}
      put "moon" = "Diana"

    Constraints:
      - A put without a value stores null

GET / DEL
  get key, ...
  del key, ...

    Example:
      get "sun", "moon"
      del "sun"

KEYWORDS
  Keywords are case-insensitive. Entity and field names are identifiers and
  may contain dots (address.city).
"#;

const CONDITIONS_DOC: &str = r#"CONDITIONS - Where Clauses

COMPARISONS
  =  >  >=  <  <=
    field op value

    Example:
      where age >= 18

  like
    where name like "Di%"

  between
    where age between 10 and 30
    where age between {10, 30}

    Constraints:
      - Exactly two bounds

  in
    where power in ("sun", "moon")
    where power in @powers

    Constraints:
      - At least one value

NEGATION
  not field op value

    Example:
      where not name = "Ares"

CONNECTIVES
  and / or
    There are no grouping parentheses. Comparisons are folded left to right:
    a connective that matches the pending group extends it, a new connective
    wraps the last comparison and the next one into a nested group.

    Example:
      where a = 1 and b = 2 and c = 3     AND[a, b, c]
      where a = 1 or b = 2                OR[a, b]
      where a = 1 and b = 2 or c = 3      AND[a, OR[b, c]]

    Constraints:
      - A group always has at least one member
"#;

const PARAMETERS_DOC: &str = r#"PARAMETERS - Prepared Statements

PLACEHOLDERS
  @name
    Stands for a value bound before execution. Allowed wherever a value is.

    Example:
      select * from God where age > @age and name in @names
      put {@key, @value}

BINDING
  quill check 'select * from God where age > @age' --param age=10

    Constraints:
      - Values are read as JSON; anything else is taken as a string
      - Binding a name that is not in the statement fails
      - Binding again replaces the previous value
      - Statements with placeholders print their template until every
        placeholder is bound

LITERAL STATEMENTS
  Statements without placeholders are compiled once and cached per text.
  Set QUILL_CACHE_ENABLED=false to disable the cache, or
  QUILL_CACHE_CAPACITY=N to bound it.
"#;

const TTL_DOC: &str = r#"TTL - Time To Live

SYNTAX
  [ttl] N unit

    Units: day, hour, minute, second, millisecond, nanosecond

    Example:
      insert God (name = "Diana") 10 day
      put {"sun", "Apollo", ttl 500 millisecond}

    Constraints:
      - N is a non-negative integer
      - Units are singular; anything else fails
      - Durations that overflow fail
"#;

const FUNCTIONS_DOC: &str = r#"FUNCTIONS - Value Conversion

CONVERT
  convert(value, kind)
    Converts a literal or parameter to the named kind.

    Kinds:
      string     (str, text)
      integer    (int, long)
      float      (double)
      decimal    (bigdecimal)
      boolean    (bool)
      date       (localdate)              YYYY-MM-DD
      datetime   (localdatetime, instant) YYYY-MM-DDTHH:MM:SS[.fff][Z|+HH:MM]

    Example:
      where birthday = convert("2000-01-01", date)
      where price > convert(@price, decimal)

    Constraints:
      - Parameters are converted when the query is resolved
      - Arrays convert element by element
      - Unknown functions and kinds fail
"#;

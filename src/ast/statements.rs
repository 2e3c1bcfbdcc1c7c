use crate::ast::{CompareOp, Connective, EntityRef, Expr, FieldRef, SortDirection};
use crate::lexer::Position;

/// Single field comparison of a `where` clause.
///
/// # Example
/// ```text
/// not age between 10 and 20
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub field: FieldRef,
    pub operator: CompareOp,
    /// For `between` an [`Expr::Array`] of the two bounds (or a single
    /// parameter), for `in` an [`Expr::Array`] of the members (or a single
    /// parameter).
    pub value: Expr,
    pub negated: bool,
    pub position: Position,
}

/// A `where` clause: the first comparison followed by connective/comparison
/// pairs, exactly as written.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub first: Comparison,
    pub rest: Vec<(Connective, Comparison)>,
}

impl WhereClause {
    /// Iterates comparisons in source order, each paired with the connective
    /// written before it (`None` for the first).
    pub fn iter(&self) -> impl Iterator<Item = (Option<Connective>, &Comparison)> {
        std::iter::once((None, &self.first)).chain(self.rest.iter().map(|(c, cmp)| (Some(*c), cmp)))
    }
}

/// `order by` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub field: FieldRef,
    pub direction: SortDirection,
}

/// `name = value` inside an insert or update body.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub field: FieldRef,
    pub value: Expr,
}

/// Time-to-live clause (`10 day`).
///
/// The unit is kept as written; it is validated at compile time.
#[derive(Debug, Clone, PartialEq)]
pub struct TtlClause {
    pub amount: i64,
    pub unit: String,
    pub position: Position,
}

/// Body of an insert or update: either assignments or a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityBody {
    Assignments(Vec<Assignment>),
    Json(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub entity: EntityRef,
    /// Empty for `select *`
    pub fields: Vec<FieldRef>,
    pub where_clause: Option<WhereClause>,
    pub order_by: Vec<SortSpec>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub entity: EntityRef,
    pub fields: Vec<FieldRef>,
    pub where_clause: Option<WhereClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub entity: EntityRef,
    pub body: EntityBody,
    pub ttl: Option<TtlClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub entity: EntityRef,
    pub body: EntityBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PutStatement {
    pub key: Expr,
    pub value: Option<Expr>,
    pub ttl: Option<TtlClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetStatement {
    pub keys: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DelStatement {
    pub keys: Vec<Expr>,
}

/// One parsed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// ```text
    /// select name, age from God where age > 10 order by name desc skip 2 limit 5
    /// ```
    Select(SelectStatement),

    /// ```text
    /// delete from God where name = "Diana"
    /// ```
    Delete(DeleteStatement),

    /// ```text
    /// insert God (name = "Diana", age = 10) 1 day
    /// ```
    Insert(InsertStatement),

    /// ```text
    /// update God (name = "Diana", age = 11)
    /// ```
    Update(UpdateStatement),

    /// ```text
    /// put {"Diana", "Hunt", 10 second}
    /// ```
    Put(PutStatement),

    /// ```text
    /// get "Diana", "Apollo"
    /// ```
    Get(GetStatement),

    /// ```text
    /// del "Diana"
    /// ```
    Del(DelStatement),
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        match self {
            Statement::Select(_) => StatementKind::Select,
            Statement::Delete(_) => StatementKind::Delete,
            Statement::Insert(_) => StatementKind::Insert,
            Statement::Update(_) => StatementKind::Update,
            Statement::Put(_) => StatementKind::Put,
            Statement::Get(_) => StatementKind::Get,
            Statement::Del(_) => StatementKind::Del,
        }
    }

    /// Distinct parameter names in source order.
    pub fn params(&self) -> Vec<String> {
        fn from_where(clause: Option<&WhereClause>) -> Vec<&Expr> {
            clause
                .map(|c| c.iter().map(|(_, cmp)| &cmp.value).collect())
                .unwrap_or_default()
        }
        fn from_body(body: &EntityBody) -> Vec<&Expr> {
            match body {
                EntityBody::Assignments(a) => a.iter().map(|a| &a.value).collect(),
                EntityBody::Json(_) => vec![],
            }
        }

        let exprs: Vec<&Expr> = match self {
            Statement::Select(s) => from_where(s.where_clause.as_ref()),
            Statement::Delete(s) => from_where(s.where_clause.as_ref()),
            Statement::Insert(s) => from_body(&s.body),
            Statement::Update(s) => from_body(&s.body),
            Statement::Put(s) => std::iter::once(&s.key).chain(s.value.as_ref()).collect(),
            Statement::Get(s) => s.keys.iter().collect(),
            Statement::Del(s) => s.keys.iter().collect(),
        };

        let mut names: Vec<String> = Vec::new();
        for name in exprs.iter().flat_map(|e| e.params()) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

/// Statement kind, decided by the leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Delete,
    Insert,
    Update,
    Put,
    Get,
    Del,
}

impl StatementKind {
    /// Detects the statement kind from the first word of `text`.
    ///
    /// Returns `None` when the text does not start with a statement keyword.
    pub fn detect(text: &str) -> Option<Self> {
        let word: String = text
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        match word.to_ascii_lowercase().as_str() {
            "select" => Some(Self::Select),
            "delete" => Some(Self::Delete),
            "insert" => Some(Self::Insert),
            "update" => Some(Self::Update),
            "put" => Some(Self::Put),
            "get" => Some(Self::Get),
            "del" => Some(Self::Del),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Delete => "delete",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Put => "put",
            Self::Get => "get",
            Self::Del => "del",
        }
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

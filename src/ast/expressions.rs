/// Reference to an entity (collection, table, bucket) by its logical name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef(pub String);

/// Reference to a field by its logical name.
///
/// Nested fields are written with dots (`address.city`) and kept as one name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef(pub String);

impl EntityRef {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl FieldRef {
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Scalar literal written directly in the query text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

/// Value expression node.
///
/// Appears on the right-hand side of comparisons and assignments, and as
/// keys and values of key-value statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Scalar literal
    ///
    /// # Example
    /// ```text
    /// "Diana"
    /// 10
    /// ```
    Literal(Literal),

    /// Array literal
    ///
    /// # Example
    /// ```text
    /// {"sun", "moon"}
    /// [1, 2, 3]
    /// ```
    Array(Vec<Expr>),

    /// JSON object literal
    ///
    /// # Example
    /// ```text
    /// {"name": "Diana"}
    /// ```
    Json(serde_json::Value),

    /// Named parameter, bound later through a prepared query
    ///
    /// # Example
    /// ```text
    /// @age
    /// ```
    Param(String),

    /// Function call
    ///
    /// # Example
    /// ```text
    /// convert(@age, integer)
    /// ```
    Function { name: String, args: Vec<Expr> },
}

impl Expr {
    /// Returns the names of every parameter referenced by this expression.
    pub fn params(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_params(&mut names);
        names
    }

    fn collect_params<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expr::Param(name) => names.push(name),
            Expr::Array(items) => items.iter().for_each(|e| e.collect_params(names)),
            Expr::Function { args, .. } => args.iter().for_each(|e| e.collect_params(names)),
            Expr::Literal(_) | Expr::Json(_) => {}
        }
    }
}

//! Turns value expressions into [`Value`]s.
//!
//! In the literal path a parameter is an error; in the prepared path it is
//! declared in [`Params`] and left as a [`Value::Param`] placeholder.

use crate::{
    ast::{Expr, Literal, Statement},
    convert::{self, ValueKind},
    error::QueryError,
    params::Params,
    value::{ParamRef, Value},
};

enum Mode<'a> {
    Literal,
    Prepared(&'a mut Params),
}

pub struct Resolver<'a> {
    mode: Mode<'a>,
    query: &'a str,
}

impl<'a> Resolver<'a> {
    /// Resolver that rejects parameters. `query` is quoted in errors.
    pub fn literal(query: &'a str) -> Self {
        Resolver {
            mode: Mode::Literal,
            query,
        }
    }

    /// Resolver that declares parameters in `params`.
    pub fn prepared(query: &'a str, params: &'a mut Params) -> Self {
        Resolver {
            mode: Mode::Prepared(params),
            query,
        }
    }

    /// Fails with every parameter of `statement` when parameters are rejected.
    pub fn check_statement(&self, statement: &Statement) -> Result<(), QueryError> {
        if !matches!(self.mode, Mode::Literal) {
            return Ok(());
        }
        let params = statement.params();
        if params.is_empty() {
            Ok(())
        } else {
            Err(QueryError::InvalidLiteralQuery {
                query: self.query.to_string(),
                params,
            })
        }
    }

    pub fn resolve(&mut self, expr: &Expr) -> Result<Value, QueryError> {
        match expr {
            Expr::Literal(literal) => Ok(literal_value(literal)),
            Expr::Array(items) => items
                .iter()
                .map(|item| self.resolve(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Expr::Json(json) => Ok(Value::Json(json.clone())),
            Expr::Param(name) => self.param(name).map(Value::Param),
            Expr::Function { name, args } => self.function(name, args),
        }
    }

    fn param(&mut self, name: &str) -> Result<ParamRef, QueryError> {
        match &mut self.mode {
            Mode::Literal => Err(QueryError::InvalidLiteralQuery {
                query: self.query.to_string(),
                params: vec![name.to_string()],
            }),
            Mode::Prepared(params) => {
                params.declare(name);
                Ok(ParamRef::new(name))
            }
        }
    }

    fn function(&mut self, name: &str, args: &[Expr]) -> Result<Value, QueryError> {
        if !name.eq_ignore_ascii_case("convert") {
            return Err(QueryError::UnsupportedConstruct(format!("function `{name}`")));
        }

        let [value, kind] = args else {
            return Err(QueryError::UnsupportedConstruct(format!(
                "convert takes a value and a kind, got {} arguments",
                args.len()
            )));
        };

        let kind = match kind {
            Expr::Literal(Literal::String(kind)) => ValueKind::from_name(kind)
                .ok_or_else(|| QueryError::UnsupportedConstruct(format!("conversion to `{kind}`")))?,
            _ => {
                return Err(QueryError::UnsupportedConstruct(
                    "convert expects a kind name as its second argument".to_string(),
                ));
            }
        };

        match self.resolve(value)? {
            Value::Param(mut param) => {
                param.convert = Some(kind);
                Ok(Value::Param(param))
            }
            v if v.has_params() => Err(QueryError::UnsupportedConstruct(
                "convert of a collection holding parameters".to_string(),
            )),
            v => convert::convert(v, kind),
        }
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::String(s) => Value::String(s.clone()),
        Literal::Integer(n) => Value::Integer(*n),
        Literal::Float(n) => Value::Float(*n),
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::Null => Value::Null,
    }
}

/// Replaces every placeholder in `value` with its bound value, applying any
/// deferred conversion.
pub fn substitute(value: &Value, params: &Params) -> Result<Value, QueryError> {
    match value {
        Value::Param(param) => {
            let bound = params
                .get(&param.name)
                .cloned()
                .ok_or_else(|| QueryError::MissingParameters(vec![param.name.clone()]))?;
            match param.convert {
                Some(kind) => convert::convert(bound, kind),
                None => Ok(bound),
            }
        }
        Value::Array(items) => items
            .iter()
            .map(|item| substitute(item, params))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Ok(other.clone()),
    }
}

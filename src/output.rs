//! JSON rendering of compiled statements, used by the CLI and for logging.
//!
//! Output is deterministic: payload fields keep source order and
//! placeholders render as `"@name"`.
//!
//! # Examples
//!
//! ```
//! use quill_lang::QueryEngine;
//! use quill_lang::output::to_json;
//!
//! let engine = QueryEngine::default();
//! let compiled = engine.compile("get \"Diana\"").unwrap();
//! assert_eq!(to_json(&compiled), r#"{"keys":["Diana"],"kind":"get"}"#);
//! ```

use serde_json::{Map, Value as Json, json};

use crate::{
    condition::{Condition, ConditionValue},
    convert::value_to_json,
    query::{CompiledStatement, EntityPayload, Sort},
};

/// Compact JSON text.
pub fn to_json(statement: &CompiledStatement) -> String {
    statement_to_json(statement).to_string()
}

/// JSON text with 2-space indentation.
pub fn to_json_pretty(statement: &CompiledStatement) -> String {
    let value = statement_to_json(statement);
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

pub fn statement_to_json(statement: &CompiledStatement) -> Json {
    let kind = statement.kind().as_str();
    match statement {
        CompiledStatement::Select(q) => json!({
            "kind": kind,
            "entity": q.entity(),
            "fields": q.fields(),
            "sorts": q.sorts().iter().map(sort_to_json).collect::<Vec<_>>(),
            "skip": q.skip(),
            "limit": q.limit(),
            "condition": q.condition().map(condition_to_json),
        }),
        CompiledStatement::Delete(q) => json!({
            "kind": kind,
            "entity": q.entity(),
            "fields": q.fields(),
            "condition": q.condition().map(condition_to_json),
        }),
        CompiledStatement::Insert(q) => json!({
            "kind": kind,
            "entity": q.payload.entity(),
            "fields": payload_to_json(&q.payload),
            "ttl_nanos": q.ttl.map(|d| d.as_nanos() as u64),
        }),
        CompiledStatement::Update(q) => json!({
            "kind": kind,
            "entity": q.payload.entity(),
            "fields": payload_to_json(&q.payload),
        }),
        CompiledStatement::Put(q) => json!({
            "kind": kind,
            "key": value_to_json(&q.key),
            "value": value_to_json(&q.value),
            "ttl_nanos": q.ttl.map(|d| d.as_nanos() as u64),
        }),
        CompiledStatement::Get(q) => json!({
            "kind": kind,
            "keys": q.keys.iter().map(value_to_json).collect::<Vec<_>>(),
        }),
        CompiledStatement::Del(q) => json!({
            "kind": kind,
            "keys": q.keys.iter().map(value_to_json).collect::<Vec<_>>(),
        }),
    }
}

pub fn condition_to_json(condition: &Condition) -> Json {
    let value = match condition.value() {
        ConditionValue::Value(v) => value_to_json(v),
        ConditionValue::Conditions(children) => {
            Json::Array(children.iter().map(condition_to_json).collect())
        }
    };
    json!({
        "name": condition.name(),
        "operator": condition.operator().as_str(),
        "value": value,
    })
}

fn sort_to_json(sort: &Sort) -> Json {
    json!({ "field": sort.field, "direction": sort.direction.to_string() })
}

/// Fields as an array of `{name, value}` objects, keeping source order.
fn payload_to_json(payload: &EntityPayload) -> Json {
    let mut fields = Vec::with_capacity(payload.fields().len());
    for (name, value) in payload.fields() {
        let mut pair = Map::new();
        pair.insert("name".to_string(), Json::String(name.clone()));
        pair.insert("value".to_string(), value_to_json(value));
        fields.push(Json::Object(pair));
    }
    Json::Array(fields)
}

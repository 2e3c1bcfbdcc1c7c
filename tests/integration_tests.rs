// tests/integration_tests.rs

use quill_lang::config::DEFAULT_CACHE_CAPACITY;
use quill_lang::output::{condition_to_json, statement_to_json};
use quill_lang::{
    EngineConfig, QueryEngine, QueryError, StatementKind, Value, to_json, to_json_pretty,
};
use serde_json::json;

// ============================================================================
// Engine
// ============================================================================

#[test]
fn test_parse_exposes_the_ast() {
    let engine = QueryEngine::default();
    let statement = engine.parse("del \"sun\"").unwrap();
    assert_eq!(statement.kind(), StatementKind::Del);
    assert!(matches!(engine.parse("drop God"), Err(QueryError::Syntax { .. })));
}

#[test]
fn test_every_statement_kind_compiles() {
    let engine = QueryEngine::default();
    let cases = [
        ("select * from God", StatementKind::Select),
        ("delete from God", StatementKind::Delete),
        ("insert God (name = \"Diana\")", StatementKind::Insert),
        ("update God (name = \"Diana\")", StatementKind::Update),
        ("put {\"sun\", \"Apollo\"}", StatementKind::Put),
        ("get \"sun\"", StatementKind::Get),
        ("del \"sun\"", StatementKind::Del),
    ];
    for (text, kind) in cases {
        assert_eq!(engine.compile(text).unwrap().kind(), kind, "{text}");
    }
}

#[test]
fn test_prepared_kind_and_text() {
    let prepared = QueryEngine::default()
        .prepare("insert God (name = @name) 1 day")
        .unwrap();
    assert_eq!(prepared.kind(), StatementKind::Insert);
    assert_eq!(prepared.params().names().collect::<Vec<_>>(), vec!["name"]);
}

#[test]
fn test_error_messages() {
    let engine = QueryEngine::default();
    let err = engine.compile("select * from God where age = @age").unwrap_err();
    assert_eq!(
        err.to_string(),
        "query `select * from God where age = @age` contains parameters (@age); use a prepared query instead"
    );

    let err = engine.compile("select * form God").unwrap_err();
    assert_eq!(
        err.to_string(),
        "syntax error in `select * form God`: Expected 'from', got 'form' at line 1, column 10 near `form`"
    );
    assert!(std::error::Error::source(&err).is_some());

    let mut prepared = engine.prepare("get @a, @b").unwrap();
    prepared.bind("a", 1).unwrap();
    assert_eq!(
        prepared.resolve().unwrap_err().to_string(),
        "missing parameters: @b"
    );
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_defaults() {
    let config = EngineConfig::default();
    assert!(config.cache_enabled);
    assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
    assert!(!EngineConfig::without_cache().cache_enabled);
}

#[test]
fn test_config_from_env() {
    // The only test in this binary that touches the environment.
    unsafe {
        std::env::set_var("QUILL_CACHE_ENABLED", "off");
        std::env::set_var("QUILL_CACHE_CAPACITY", "12");
    }
    let config = EngineConfig::from_env();
    assert!(!config.cache_enabled);
    assert_eq!(config.cache_capacity, 12);

    unsafe {
        std::env::set_var("QUILL_CACHE_ENABLED", "maybe");
        std::env::set_var("QUILL_CACHE_CAPACITY", "lots");
    }
    assert_eq!(EngineConfig::from_env(), EngineConfig::default());

    unsafe {
        std::env::remove_var("QUILL_CACHE_ENABLED");
        std::env::remove_var("QUILL_CACHE_CAPACITY");
    }
    assert_eq!(EngineConfig::from_env(), EngineConfig::default());
}

// ============================================================================
// JSON output
// ============================================================================

#[test]
fn test_select_to_json() {
    let compiled = QueryEngine::default()
        .compile("select name from God where age > 10 and not name = \"Ares\" order by age desc limit 3")
        .unwrap();
    assert_eq!(
        statement_to_json(&compiled),
        json!({
            "kind": "select",
            "entity": "God",
            "fields": ["name"],
            "sorts": [{"field": "age", "direction": "desc"}],
            "skip": 0,
            "limit": 3,
            "condition": {
                "name": "_AND",
                "operator": "AND",
                "value": [
                    {"name": "age", "operator": "GT", "value": 10},
                    {"name": "_NOT", "operator": "NOT", "value": [
                        {"name": "name", "operator": "EQ", "value": "Ares"}
                    ]}
                ]
            }
        })
    );
}

#[test]
fn test_insert_to_json_keeps_field_order() {
    let compiled = QueryEngine::default()
        .compile("insert God (name = \"Diana\", age = 30) 2 second")
        .unwrap();
    assert_eq!(
        statement_to_json(&compiled),
        json!({
            "kind": "insert",
            "entity": "God",
            "fields": [
                {"name": "name", "value": "Diana"},
                {"name": "age", "value": 30}
            ],
            "ttl_nanos": 2_000_000_000u64
        })
    );
}

#[test]
fn test_template_placeholders_render_with_at() {
    let prepared = QueryEngine::default()
        .prepare("select * from God where age in @ages")
        .unwrap();
    let condition = prepared.template().as_select().unwrap().condition().unwrap();
    assert_eq!(
        condition_to_json(condition),
        json!({"name": "age", "operator": "IN", "value": "@ages"})
    );
}

#[test]
fn test_compact_and_pretty() {
    let compiled = QueryEngine::default().compile("del 1").unwrap();
    assert_eq!(to_json(&compiled), r#"{"keys":[1],"kind":"del"}"#);
    assert_eq!(
        to_json_pretty(&compiled),
        "{\n  \"keys\": [\n    1\n  ],\n  \"kind\": \"del\"\n}"
    );
}

#[test]
fn test_put_to_json() {
    let compiled = QueryEngine::default().compile("put \"moon\"").unwrap();
    assert_eq!(
        statement_to_json(&compiled),
        json!({"kind": "put", "key": "moon", "value": null, "ttl_nanos": null})
    );
    assert_eq!(compiled.as_put().unwrap().value, Value::Null);
}

// ============================================================================
// CLI
// ============================================================================

#[cfg(feature = "cli")]
mod cli {
    use quill_lang::QueryEngine;
    use quill_lang::cli::{
        CheckOptions, CheckResult, CliError, execute_check, get_doc_category, get_docs_overview,
        parse_param,
    };
    use serde_json::json;

    fn check(query: &str, params: &[(&str, &str)]) -> Result<CheckResult, CliError> {
        let options = CheckOptions {
            query: query.to_string(),
            params: params
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        };
        execute_check(&QueryEngine::default(), &options)
    }

    fn output(result: CheckResult) -> serde_json::Value {
        match result {
            CheckResult::Compiled(json) => json,
            CheckResult::SyntaxValid => panic!("expected compiled output"),
        }
    }

    #[test]
    fn test_check_literal() {
        let json = output(check("get \"sun\"", &[]).unwrap());
        assert_eq!(json, json!({"kind": "get", "keys": ["sun"]}));
    }

    #[test]
    fn test_check_syntax_only() {
        let options = CheckOptions {
            query: "select * from God where age = @age".to_string(),
            syntax_only: true,
            ..Default::default()
        };
        assert!(matches!(
            execute_check(&QueryEngine::default(), &options).unwrap(),
            CheckResult::SyntaxValid
        ));
    }

    #[test]
    fn test_check_binds_json_and_strings() {
        let json = output(
            check(
                "select * from God where age between @range and name = @name",
                &[("range", "[10, 20]"), ("name", "Diana")],
            )
            .unwrap(),
        );
        let leaves = &json["condition"]["value"];
        assert_eq!(leaves[0]["value"], json!([10, 20]));
        assert_eq!(leaves[1]["value"], json!("Diana"));
    }

    #[test]
    fn test_check_prints_template_until_bound() {
        let json = output(check("get @key", &[]).unwrap());
        assert_eq!(json["keys"], json!(["@key"]));
    }

    #[test]
    fn test_check_rejects_unknown_params() {
        assert!(check("get 1", &[("key", "1")]).is_err());
        assert!(check("get @key", &[("other", "1")]).is_err());
    }

    #[test]
    fn test_check_reports_syntax_errors() {
        let err = check("selec * from God", &[]).unwrap_err();
        assert!(err.to_string().starts_with("syntax error"));
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("@age=10").unwrap(),
            ("age".to_string(), "10".to_string())
        );
        assert_eq!(
            parse_param("expr=a=b").unwrap(),
            ("expr".to_string(), "a=b".to_string())
        );
        assert!(parse_param("age").is_err());
        assert!(parse_param("=10").is_err());
    }

    #[test]
    fn test_docs() {
        assert!(get_docs_overview().contains("DOCUMENTATION CATEGORIES"));
        assert!(get_doc_category("ttl").unwrap().contains("millisecond"));
        let err = get_doc_category("pipes").unwrap_err();
        assert!(err.to_string().contains("quill docs"));
    }
}

// tests/parser_tests.rs

use quill_lang::ast::{
    CompareOp, Connective, EntityBody, Expr, Literal, SortDirection, Statement, StatementKind,
};
use quill_lang::lexer::Lexer;
use quill_lang::parser::{self, Parser};

fn parse(input: &str) -> Statement {
    parser::parse(input).unwrap_or_else(|e| panic!("failed to parse `{input}`: {e}"))
}

fn int(n: i64) -> Expr {
    Expr::Literal(Literal::Integer(n))
}

fn string(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.to_string()))
}

// ============================================================================
// Select
// ============================================================================

#[test]
fn test_select_all() {
    let Statement::Select(select) = parse("select * from God") else {
        panic!("expected select");
    };
    assert_eq!(select.entity.name(), "God");
    assert!(select.fields.is_empty());
    assert!(select.where_clause.is_none());
    assert!(select.order_by.is_empty());
    assert_eq!(select.skip, None);
    assert_eq!(select.limit, None);
}

#[test]
fn test_select_without_star() {
    let Statement::Select(select) = parse("select from God") else {
        panic!("expected select");
    };
    assert!(select.fields.is_empty());
}

#[test]
fn test_select_fields_order_skip_limit() {
    let Statement::Select(select) =
        parse("select name, address.city from God order by name desc, age skip 2 limit 5")
    else {
        panic!("expected select");
    };
    let fields: Vec<_> = select.fields.iter().map(|f| f.name()).collect();
    assert_eq!(fields, vec!["name", "address.city"]);
    assert_eq!(select.order_by.len(), 2);
    assert_eq!(select.order_by[0].field.name(), "name");
    assert_eq!(select.order_by[0].direction, SortDirection::Desc);
    assert_eq!(select.order_by[1].field.name(), "age");
    assert_eq!(select.order_by[1].direction, SortDirection::Asc);
    assert_eq!(select.skip, Some(2));
    assert_eq!(select.limit, Some(5));
}

#[test]
fn test_order_by_requires_commas() {
    let Statement::Select(select) = parse("select * from God order by name asc, age desc") else {
        panic!("expected select");
    };
    let sorts: Vec<_> = select
        .order_by
        .iter()
        .map(|s| (s.field.name(), s.direction))
        .collect();
    assert_eq!(
        sorts,
        vec![("name", SortDirection::Asc), ("age", SortDirection::Desc)]
    );

    let err = parser::parse("select * from God order by name age").unwrap_err();
    assert_eq!(err.fragment, "age");
    assert_eq!(err.position.column, 33);
}

#[test]
fn test_negative_limit_is_rejected() {
    let err = parser::parse("select * from God limit -1").unwrap_err();
    assert!(err.message.contains("limit"), "{}", err.message);
    assert_eq!(err.fragment, "-1");
}

// ============================================================================
// Where clauses
// ============================================================================

#[test]
fn test_where_keeps_connectives_in_order() {
    let Statement::Select(select) =
        parse("select * from God where a = 1 and b > 2 or c <= 3 and d like \"x%\"")
    else {
        panic!("expected select");
    };
    let clause = select.where_clause.unwrap();
    let parts: Vec<_> = clause
        .iter()
        .map(|(c, cmp)| (c, cmp.field.name().to_string(), cmp.operator))
        .collect();
    assert_eq!(
        parts,
        vec![
            (None, "a".to_string(), CompareOp::Eq),
            (Some(Connective::And), "b".to_string(), CompareOp::Gt),
            (Some(Connective::Or), "c".to_string(), CompareOp::Lte),
            (Some(Connective::And), "d".to_string(), CompareOp::Like),
        ]
    );
}

#[test]
fn test_not_marks_comparison() {
    let Statement::Delete(delete) = parse("delete from God where not name = \"Ares\"") else {
        panic!("expected delete");
    };
    let clause = delete.where_clause.unwrap();
    assert!(clause.first.negated);
    assert_eq!(clause.first.value, string("Ares"));
}

#[test]
fn test_between_and_form() {
    let Statement::Select(select) = parse("select * from God where age between 10 and 30") else {
        panic!("expected select");
    };
    let cmp = select.where_clause.unwrap().first;
    assert_eq!(cmp.operator, CompareOp::Between);
    assert_eq!(cmp.value, Expr::Array(vec![int(10), int(30)]));
}

#[test]
fn test_between_braced_form() {
    let Statement::Select(select) = parse("select * from God where age between {10, 30}") else {
        panic!("expected select");
    };
    let cmp = select.where_clause.unwrap().first;
    assert_eq!(cmp.value, Expr::Array(vec![int(10), int(30)]));
}

#[test]
fn test_between_followed_by_connective() {
    let Statement::Select(select) =
        parse("select * from God where age between 10 and 30 and name = \"Diana\"")
    else {
        panic!("expected select");
    };
    let clause = select.where_clause.unwrap();
    assert_eq!(clause.rest.len(), 1);
    assert_eq!(clause.rest[0].0, Connective::And);
}

#[test]
fn test_in_list_and_param() {
    let Statement::Select(select) =
        parse("select * from God where power in (\"sun\", \"moon\") or age in @ages")
    else {
        panic!("expected select");
    };
    let clause = select.where_clause.unwrap();
    assert_eq!(
        clause.first.value,
        Expr::Array(vec![string("sun"), string("moon")])
    );
    assert_eq!(clause.rest[0].1.value, Expr::Param("ages".to_string()));
}

#[test]
fn test_empty_in_list_parses() {
    let Statement::Select(select) = parse("select * from God where power in ()") else {
        panic!("expected select");
    };
    assert_eq!(select.where_clause.unwrap().first.value, Expr::Array(vec![]));
}

#[test]
fn test_missing_operator() {
    let err = parser::parse("select * from God where age 10").unwrap_err();
    assert!(err.message.contains("comparison operator"));
    assert_eq!(err.fragment, "10");
    assert_eq!(err.position.column, 29);
}

#[test]
fn test_convert_function() {
    let Statement::Select(select) =
        parse("select * from God where birthday = convert(@day, date)")
    else {
        panic!("expected select");
    };
    assert_eq!(
        select.where_clause.unwrap().first.value,
        Expr::Function {
            name: "convert".to_string(),
            args: vec![Expr::Param("day".to_string()), string("date")],
        }
    );
}

#[test]
fn test_bare_name_is_not_a_value() {
    let err = parser::parse("select * from God where name = Diana").unwrap_err();
    assert!(err.message.contains("bare names"));
}

// ============================================================================
// Insert / Update
// ============================================================================

#[test]
fn test_insert_assignments_with_ttl() {
    let Statement::Insert(insert) = parse("insert God (name = \"Diana\", age = 30) 10 day") else {
        panic!("expected insert");
    };
    assert_eq!(insert.entity.name(), "God");
    let EntityBody::Assignments(assignments) = &insert.body else {
        panic!("expected assignments");
    };
    assert_eq!(assignments.len(), 2);
    assert_eq!(assignments[0].field.name(), "name");
    assert_eq!(assignments[1].value, int(30));
    let ttl = insert.ttl.unwrap();
    assert_eq!(ttl.amount, 10);
    assert_eq!(ttl.unit, "day");
}

#[test]
fn test_insert_ttl_keyword() {
    let Statement::Insert(insert) = parse("insert God (name = \"Diana\") ttl 5 second") else {
        panic!("expected insert");
    };
    assert_eq!(insert.ttl.unwrap().unit, "second");
}

#[test]
fn test_insert_json_body() {
    let Statement::Insert(insert) = parse(r#"insert God {"name": "Diana", "age": 30}"#) else {
        panic!("expected insert");
    };
    match insert.body {
        EntityBody::Json(json) => assert_eq!(json["age"], 30),
        other => panic!("expected JSON body, got {other:?}"),
    }
    assert!(insert.ttl.is_none());
}

#[test]
fn test_update() {
    let Statement::Update(update) = parse("update God (age = @age)") else {
        panic!("expected update");
    };
    assert_eq!(update.entity.name(), "God");
}

#[test]
fn test_insert_requires_body() {
    assert!(parser::parse("insert God").is_err());
}

// ============================================================================
// Key-value statements
// ============================================================================

#[test]
fn test_put_braced() {
    let Statement::Put(put) = parse("put {\"sun\", \"Apollo\", 10 second}") else {
        panic!("expected put");
    };
    assert_eq!(put.key, string("sun"));
    assert_eq!(put.value, Some(string("Apollo")));
    assert_eq!(put.ttl.unwrap().amount, 10);
}

#[test]
fn test_put_assignment_form() {
    let Statement::Put(put) = parse("put \"moon\" = \"Diana\" ttl 1 hour") else {
        panic!("expected put");
    };
    assert_eq!(put.key, string("moon"));
    assert_eq!(put.value, Some(string("Diana")));
    assert_eq!(put.ttl.unwrap().unit, "hour");
}

#[test]
fn test_put_without_value() {
    let Statement::Put(put) = parse("put \"moon\"") else {
        panic!("expected put");
    };
    assert_eq!(put.value, None);
    assert!(put.ttl.is_none());
}

#[test]
fn test_get_and_del_lists() {
    let Statement::Get(get) = parse("get \"sun\", \"moon\", @key") else {
        panic!("expected get");
    };
    assert_eq!(get.keys.len(), 3);

    let Statement::Del(del) = parse("del 1") else {
        panic!("expected del");
    };
    assert_eq!(del.keys, vec![int(1)]);
}

// ============================================================================
// Statement-level behaviour
// ============================================================================

#[test]
fn test_unrecognized_statement() {
    let err = parser::parse("drop table God").unwrap_err();
    assert!(err.message.starts_with("Unrecognized statement"));
    assert_eq!(err.fragment, "drop");
}

#[test]
fn test_trailing_tokens() {
    let err = parser::parse("select * from God God").unwrap_err();
    assert!(err.message.contains("after end of statement"));
}

#[test]
fn test_error_at_end_of_input() {
    let err = parser::parse("select * from").unwrap_err();
    assert_eq!(err.fragment, "end of input");
    assert!(err.to_string().contains("line 1, column 14"));
}

#[test]
fn test_lex_error_surfaces_as_parse_error() {
    let err = parser::parse("select * from God where a != 1").unwrap_err();
    assert!(err.message.contains("not"));
}

#[test]
fn test_parser_over_lexer() {
    let mut parser = Parser::new(Lexer::new("get 1")).unwrap();
    assert_eq!(parser.parse().unwrap().kind(), StatementKind::Get);
}

#[test]
fn test_params_distinct_in_source_order() {
    let statement = parse("select * from God where b = @y or a in (@x, @y) and c = @z");
    assert_eq!(statement.params(), vec!["y", "x", "z"]);

    let statement = parse("put {@key, convert(@value, integer)}");
    assert_eq!(statement.params(), vec!["key", "value"]);
}

#[test]
fn test_kind_detection() {
    assert_eq!(StatementKind::detect("  SELECT * from God"), Some(StatementKind::Select));
    assert_eq!(StatementKind::detect("del 1"), Some(StatementKind::Del));
    assert_eq!(StatementKind::detect("deleted"), None);
    assert_eq!(StatementKind::detect(""), None);
}

#[test]
fn test_between_single_parameter() {
    let Statement::Select(select) =
        parse("select * from God where age between @range and name = \"Diana\"")
    else {
        panic!("expected select");
    };
    let clause = select.where_clause.unwrap();
    assert_eq!(clause.first.value, Expr::Param("range".to_string()));
    assert_eq!(clause.rest[0].1.field.name(), "name");

    let Statement::Select(select) =
        parse("select * from God where age between @low and convert(@high, integer)")
    else {
        panic!("expected select");
    };
    let Expr::Array(bounds) = select.where_clause.unwrap().first.value else {
        panic!("expected both bounds");
    };
    assert_eq!(bounds[0], Expr::Param("low".to_string()));
    assert!(matches!(bounds[1], Expr::Function { .. }));
}

use serde_json::json;
use sqltmpl::{
    MysqlEscaper, QueryBuilder, Specifier, TemplateError, Value, args, build_query, map, skip,
};

#[test]
fn plain_query_passes_through() {
    let sql = build_query("SELECT name FROM users WHERE user_id = 1", &[]).unwrap();
    assert_eq!(sql, "SELECT name FROM users WHERE user_id = 1");
}

#[test]
fn auto_and_identifier_placeholders() {
    let sql = build_query(
        "SELECT * FROM users WHERE name = ? AND block = 0",
        &args!["Jack"],
    )
    .unwrap();
    assert_eq!(sql, "SELECT * FROM users WHERE name = 'Jack' AND block = 0");

    let sql = build_query(
        "SELECT ?# FROM users WHERE user_id = ?d AND block = ?d",
        &args![vec!["name", "email"], 2, true],
    )
    .unwrap();
    assert_eq!(
        sql,
        "SELECT `name`, `email` FROM users WHERE user_id = 2 AND block = 1"
    );
}

#[test]
fn update_with_assignments_and_null() {
    let sql = build_query(
        "UPDATE users SET ?a WHERE user_id = -1",
        &args![map! {"name" => "Jack", "email" => Value::Null}],
    )
    .unwrap();
    assert_eq!(
        sql,
        "UPDATE users SET `name` = 'Jack', `email` = NULL WHERE user_id = -1"
    );
}

#[test]
fn optional_block_both_ways() {
    let template = "SELECT name FROM users WHERE ?# IN (?a){ AND block = ?d}";
    for (block, expected) in [
        (
            skip(),
            "SELECT name FROM users WHERE `user_id` IN (1, 2, 3)",
        ),
        (
            Value::Bool(true),
            "SELECT name FROM users WHERE `user_id` IN (1, 2, 3) AND block = 1",
        ),
    ] {
        let sql = build_query(template, &args!["user_id", vec![1, 2, 3], block]).unwrap();
        assert_eq!(sql, expected);
    }
}

#[test]
fn json_arguments_render_like_native_ones() {
    let from_json = Value::args_from_json(&json!([
        {"name": "Bob", "age": 30},
        7,
        {"$skip": true}
    ]))
    .unwrap();
    let native = args![map! {"name" => "Bob", "age" => 30}, 7, skip()];
    assert_eq!(from_json, native);

    let template = "UPDATE t SET ?a WHERE id = ?d {AND v = ?d}";
    assert_eq!(
        build_query(template, &from_json).unwrap(),
        build_query(template, &native).unwrap()
    );
}

#[test]
fn injection_attempts_stay_inside_literals() {
    let sql = build_query(
        "SELECT * FROM ?# WHERE name = ?",
        &args!["users` WHERE 1=1; --", "x' OR '1'='1"],
    )
    .unwrap();
    assert_eq!(
        sql,
        r"SELECT * FROM `users`` WHERE 1=1; --` WHERE name = 'x\' OR \'1\'=\'1'"
    );

    let sql = build_query("SELECT ?d", &args!["1; DROP TABLE users"]).unwrap();
    assert_eq!(sql, "SELECT 1");
}

#[test]
fn errors_name_the_failing_placeholder() {
    let err = build_query("SELECT ?d FROM t WHERE x IN (?a)", &args![1, "no"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid array type for placeholder #1: expected list or map, got string"
    );

    let err = build_query("SELECT ?", &[]).unwrap_err();
    assert_eq!(err.to_string(), "Missing parameter for placeholder #0");
}

#[test]
fn scan_reports_arity() {
    let builder = QueryBuilder::new(MysqlEscaper);
    let found = builder.scan("INSERT INTO ?# SET ?a {, updated = ?d}");
    let specs: Vec<Specifier> = found.iter().map(|p| p.specifier).collect();
    assert_eq!(
        specs,
        vec![Specifier::Ident, Specifier::Array, Specifier::Int]
    );
}

#[test]
fn unbalanced_template_errors() {
    assert!(matches!(
        build_query("SELECT 1 }", &[]),
        Err(TemplateError::UnmatchedBrace { offset: 9 })
    ));
}

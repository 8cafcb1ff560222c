use super::*;

#[test]
fn default_templates_have_placeholders() {
    let t = QueryTemplates::default();
    assert!(t.plan_sql.contains(":sql_id"));
    assert!(t.plan_sql.contains(":child_number"));
    assert!(t.plan_sql.contains("ORDER BY id, parent_id"));
    assert!(t.text_sql.contains("ORDER BY piece"));
}

#[test]
fn bind_quotes_sql_id() {
    let t = QueryTemplates::default();
    let sql = t.bind_plan("abc'd", 3);
    assert!(sql.contains("sql_id = 'abc''d'"));
    assert!(sql.contains("child_number = 3"));
    assert!(!sql.contains(':'));
    assert_eq!(t.bind_text("g4pkmrqrgxg3b", 0), "SELECT sql_text FROM v$sqltext WHERE sql_id = 'g4pkmrqrgxg3b' ORDER BY piece");
}

#[test]
fn bound_sql_id_is_not_rebound() {
    let t = QueryTemplates::default();
    assert_eq!(
        t.bind_text("ab:child_number", 7),
        "SELECT sql_text FROM v$sqltext WHERE sql_id = 'ab:child_number' ORDER BY piece"
    );
    let sql = t.bind_plan(":sql_id", 2);
    assert!(sql.contains("WHERE sql_id = ':sql_id' AND child_number = 2"), "{}", sql);
}

#[test]
fn bind_leaves_other_colons() {
    assert_eq!(
        bind("SELECT x::text FROM t WHERE a = :sql_id AND b = :child_number", "q", 4),
        "SELECT x::text FROM t WHERE a = 'q' AND b = 4"
    );
}

#[test]
fn partial_template_file_keeps_defaults() {
    let t = QueryTemplates::from_json_str(r#"{"text_sql": "SELECT sql_text FROM text_pieces WHERE id = :sql_id"}"#).unwrap();
    assert_eq!(t.plan_sql, DEFAULT_PLAN_SQL);
    assert_eq!(t.text_sql, "SELECT sql_text FROM text_pieces WHERE id = :sql_id");
}

#[test]
fn malformed_template_file() {
    let err = QueryTemplates::from_json_str("{plan_sql:").unwrap_err();
    assert_eq!(err.code_str(), "config_error");
}

#[test]
fn load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("queries.json");
    std::fs::write(&path, r#"{"plan_sql": "SELECT * FROM plans WHERE sql_id = :sql_id"}"#).unwrap();
    let t = QueryTemplates::resolve(Some(&path)).unwrap();
    assert_eq!(t.plan_sql, "SELECT * FROM plans WHERE sql_id = :sql_id");

    let missing = QueryTemplates::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(missing, XplanError::Config(_)));
}

#[test]
fn source_kind_from_dsn() {
    assert_eq!(
        SourceKind::from_dsn("postgres://scott:tiger@db:5432/orcl").unwrap(),
        SourceKind::Postgres("postgres://scott:tiger@db:5432/orcl".into())
    );
    assert!(matches!(SourceKind::from_dsn("POSTGRESQL://h/db").unwrap(), SourceKind::Postgres(_)));
    assert_eq!(SourceKind::from_dsn("file:/tmp/plan.dump").unwrap(), SourceKind::Snapshot("/tmp/plan.dump".into()));
    assert_eq!(SourceKind::from_dsn("captures/plan.json").unwrap(), SourceKind::Snapshot("captures/plan.json".into()));
    assert!(SourceKind::from_dsn("orcl").is_err());
}

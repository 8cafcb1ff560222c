use super::*;
use serde_json::json;

fn plan_result_set(rows: Vec<Vec<Cell>>) -> ResultSet {
    ResultSet::new("plan", PLAN_COLUMNS.iter().map(|c| c.to_string()).collect(), rows)
}

fn null_row() -> Vec<Cell> { vec![Cell::Null; PLAN_COLUMNS.len()] }

#[test]
fn cell_from_json_keeps_types() {
    assert_eq!(Cell::from_json(&json!(null)), Cell::Null);
    assert_eq!(Cell::from_json(&json!(14)), Cell::Int(14));
    assert_eq!(Cell::from_json(&json!(2.5)), Cell::Float(2.5));
    assert_eq!(Cell::from_json(&json!("KEY")), Cell::Text("KEY".into()));
    assert_eq!(Cell::from_json(&json!(true)), Cell::Text("true".into()));
}

#[test]
fn cell_numeric_reads() {
    assert_eq!(Cell::Text(" 42 ".into()).as_u64("X").unwrap(), Some(42));
    assert_eq!(Cell::Float(3.0).as_u64("X").unwrap(), Some(3));
    assert_eq!(Cell::Text("".into()).as_u64("X").unwrap(), None);
    assert_eq!(Cell::Null.as_f64("X").unwrap(), None);
    assert!(matches!(Cell::Int(-1).as_u64("DEPTH"), Err(XplanError::InvalidValue { .. })));
    assert!(matches!(Cell::Float(1.5).as_u64("ID"), Err(XplanError::InvalidValue { .. })));
    let err = Cell::Text("n/a".into()).as_f64("COST").unwrap_err();
    assert_eq!(err, XplanError::invalid_value("COST", "n/a"));
}

#[test]
fn large_integers_read_exactly() {
    // 2^53 + 1 is not representable as f64
    assert_eq!(Cell::Int(9_007_199_254_740_993).as_u64("BYTES").unwrap(), Some(9_007_199_254_740_993));
    assert_eq!(Cell::Text("9007199254740993".into()).as_u64("CARDINALITY").unwrap(), Some(9_007_199_254_740_993));
    assert_eq!(Cell::Text("18446744073709551615".into()).as_u64("BYTES").unwrap(), Some(u64::MAX));
    let big = Cell::from_json(&json!(18_446_744_073_709_551_615u64));
    assert_eq!(big, Cell::Text("18446744073709551615".into()));
    assert_eq!(big.as_u64("BYTES").unwrap(), Some(u64::MAX));
    assert_eq!(Cell::Text("3.0".into()).as_u64("TIME").unwrap(), Some(3));
    assert_eq!(Cell::Int(-5).as_u64("ID").unwrap_err(), XplanError::invalid_value("ID", "-5"));
}

#[test]
fn empty_text_counts_as_missing() {
    assert!(Cell::Text(String::new()).is_missing());
    assert_eq!(Cell::Text(String::new()).as_text(), None);
    assert_eq!(Cell::Int(7).as_text(), Some("7".to_string()));
    assert_eq!(Cell::Float(5.0).to_string(), "5");
    assert_eq!(Cell::Float(0.25).to_string(), "0.25");
}

#[test]
fn column_extractor_by_name() {
    let rs = ResultSet::new(
        "plan",
        vec!["id".into(), "Operation".into()],
        vec![
            vec![Cell::Int(0), Cell::Text("SELECT STATEMENT".into())],
            vec![Cell::Int(1)],
        ],
    );
    assert_eq!(rs.columns(), &["ID".to_string(), "OPERATION".to_string()]);
    let ops = rs.column("operation").unwrap();
    assert_eq!(ops, vec![&Cell::Text("SELECT STATEMENT".into()), &Cell::Null]);
}

#[test]
fn column_extractor_missing_column() {
    let rs = ResultSet::new("plan", vec!["ID".into()], vec![]);
    let err = rs.column("COST").unwrap_err();
    assert_eq!(err, XplanError::missing_column("COST", "plan"));
}

#[test]
fn plan_table_from_result_set() {
    let mut r0 = null_row();
    r0[0] = Cell::Int(0);
    r0[1] = Cell::Text("SELECT STATEMENT".into());
    r0[2] = Cell::Int(0);
    r0[13] = Cell::Text("1234567".into());
    let mut r1 = null_row();
    r1[0] = Cell::Text("1".into());
    r1[1] = Cell::Text("TABLE ACCESS".into());
    r1[2] = Cell::Text("1".into());
    r1[3] = Cell::Text("FULL".into());
    r1[4] = Cell::Text("EMP".into());
    r1[5] = Cell::Int(14);
    r1[7] = Cell::Int(3);
    r1[9] = Cell::Int(3);
    r1[11] = Cell::Text("\"SAL\">1000".into());
    r1[13] = Cell::Text("1234567".into());

    let table = PlanTable::from_result_set(&plan_result_set(vec![r0, r1])).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.plan_hash_value.as_deref(), Some("1234567"));
    let row = &table.rows[1];
    assert_eq!(row.id, 1);
    assert_eq!(row.depth, 1);
    assert_eq!(row.options.as_deref(), Some("FULL"));
    assert_eq!(row.cardinality, Some(14));
    assert_eq!(row.cost, Some(3.0));
    assert_eq!(row.filter_predicates.as_deref(), Some("\"SAL\">1000"));
    assert!(row.has_predicates());
    assert!(!table.rows[0].has_predicates());
    assert!(table.has_predicates());
    assert!(!table.has_partitions());
}

#[test]
fn plan_table_requires_every_column() {
    let cols: Vec<String> = PLAN_COLUMNS.iter().filter(|c| **c != "IO_COST").map(|c| c.to_string()).collect();
    let rs = ResultSet::new("plan", cols, vec![]);
    let err = PlanTable::from_result_set(&rs).unwrap_err();
    assert_eq!(err, XplanError::missing_column("IO_COST", "plan"));
}

#[test]
fn plan_table_rejects_null_id() {
    let mut r = null_row();
    r[1] = Cell::Text("SELECT STATEMENT".into());
    let err = PlanTable::from_result_set(&plan_result_set(vec![r])).unwrap_err();
    assert_eq!(err, XplanError::invalid_value("ID", "NULL"));
}

#[test]
fn plan_table_without_rows_is_empty() {
    let table = PlanTable::from_result_set(&plan_result_set(vec![])).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.plan_hash_value, None);
}

#[test]
fn statement_text_in_piece_order() {
    let rs = ResultSet::new(
        "sql_text",
        vec!["SQL_TEXT".into()],
        vec![vec![Cell::Text("select * from emp ".into())], vec![Cell::Text("where sal > 1000".into())]],
    );
    let text = StatementText::from_result_set(&rs).unwrap();
    assert_eq!(text.pieces, vec!["select * from emp ", "where sal > 1000"]);
}

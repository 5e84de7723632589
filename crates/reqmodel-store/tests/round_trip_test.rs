// Integration tests for on-disk round trips and row-level integrity

use reqmodel_core::model::{Expression, LogicOp};
use reqmodel_core::{flatten_expression, ExpressionRow};
use reqmodel_store::repo::hydration;
use reqmodel_store::SqliteRepo;

fn formula() -> Expression {
    Expression::logic(
        LogicOp::And,
        Expression::not(Expression::local("locked")),
        Expression::NextState {
            expr: Some(Box::new(Expression::PriorField {
                field: "count".to_string(),
            })),
        },
    )
}

#[test]
fn test_round_trip_through_file_database() {
    // Given: A tree saved to an on-disk database
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.db");
    {
        let mut conn = reqmodel_store::db::open_ready(&path).unwrap();
        hydration::save_expression(&mut conn, "m1", "logic/l1", &formula()).unwrap();
    }

    // When: The database is reopened
    let conn = reqmodel_store::db::open_ready(&path).unwrap();

    // Then: The tree and its rows come back unchanged
    assert_eq!(hydration::load_expression(&conn, "m1", "logic/l1").unwrap(), formula());
    let mut rows = SqliteRepo::query_owner_expression_rows(&conn, "m1", "logic/l1").unwrap();
    rows.sort_by(|a, b| a.node_key.cmp(&b.node_key));
    assert_eq!(rows, flatten_expression("logic/l1", &formula()));
}

#[test]
fn test_child_before_parent_violates_foreign_key() {
    let mut conn = reqmodel_store::db::open_ready_in_memory().unwrap();
    let mut rows = flatten_expression("logic/l1", &formula());
    rows.reverse();

    // Each row in its own statement so the constraint is checked in between
    let tx = conn.transaction().unwrap();
    let result: Result<Vec<usize>, _> = rows
        .chunks(1)
        .map(|row| SqliteRepo::insert_expression_rows(&tx, "m1", row))
        .collect();

    assert!(result.is_err(), "orphan row must be rejected");
}

#[test]
fn test_missing_parent_row_rejected_on_insert() {
    let mut conn = reqmodel_store::db::open_ready_in_memory().unwrap();
    let orphan = ExpressionRow {
        parent_node_key: Some("logic/l1/expr/404".to_string()),
        ..ExpressionRow::new("logic/l1", "logic/l1/expr/1".to_string(), None, 0, "self_ref")
    };

    let tx = conn.transaction().unwrap();
    assert!(SqliteRepo::insert_expression_rows(&tx, "m1", &[orphan]).is_err());
}

#[test]
fn test_deleting_root_cascades_to_descendants() {
    let mut conn = reqmodel_store::db::open_ready_in_memory().unwrap();
    hydration::save_expression(&mut conn, "m1", "logic/l1", &formula()).unwrap();

    conn.execute(
        "DELETE FROM logic_expression_node WHERE model_key = 'm1' AND node_key = 'logic/l1/expr/0'",
        [],
    )
    .unwrap();

    assert!(SqliteRepo::query_expression_rows(&conn, "m1").unwrap().is_empty());
}

#![allow(dead_code)]

use reqmodel_core::model::{ArithOp, CompareOp, Expression, Key, LeafAction, Step, StepCase};
use reqmodel_engine::{apply_engine_command, EngineCommand};
use rusqlite::Connection;
use tempfile::TempDir;

pub const MODEL: &str = "model/shop";

/// On-disk database with the schema applied
pub fn setup_db() -> (TempDir, Connection) {
    let temp_dir = TempDir::new().unwrap();
    let mut conn = reqmodel_store::db::open_ready(temp_dir.path().join("model.db")).unwrap();
    apply_engine_command(EngineCommand::Migrate, &mut conn).unwrap();
    (temp_dir, conn)
}

/// `total + 1 > 10`
pub fn guard_expression() -> Expression {
    Expression::compare(
        CompareOp::Gt,
        Expression::arith(ArithOp::Add, Expression::local("total"), Expression::int(1)),
        Expression::int(10),
    )
}

pub fn refund_scenario() -> Step {
    Step::sequence(vec![
        Step::leaf(
            "request refund",
            LeafAction::Event(Key::parse("domain/shop/class/order/event/refund").unwrap()),
        ),
        Step::Switch {
            cases: vec![StepCase {
                condition: "approved".to_string(),
                statements: vec![Step::leaf("forget order", LeafAction::Delete)],
            }],
        },
    ])
}

pub fn save_expression(conn: &mut Connection, owner_key: &str, expression: Expression) -> usize {
    match apply_engine_command(
        EngineCommand::SaveExpression {
            model_key: MODEL.to_string(),
            owner_key: owner_key.to_string(),
            expression,
        },
        conn,
    )
    .unwrap()
    {
        reqmodel_engine::EngineCommandResult::Saved { row_count, .. } => row_count,
        other => panic!("unexpected result {other:?}"),
    }
}

pub fn save_steps(conn: &mut Connection, owner_key: &str, steps: Step) -> usize {
    match apply_engine_command(
        EngineCommand::SaveSteps {
            model_key: MODEL.to_string(),
            owner_key: owner_key.to_string(),
            steps,
        },
        conn,
    )
    .unwrap()
    {
        reqmodel_engine::EngineCommandResult::Saved { row_count, .. } => row_count,
        other => panic!("unexpected result {other:?}"),
    }
}

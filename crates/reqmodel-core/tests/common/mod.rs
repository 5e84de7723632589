#![allow(dead_code)]

use reqmodel_core::model::{
    ArithOp, CaseBranch, CompareOp, Expression, FieldAlteration, Key, LeafAction, LeafStep,
    LogicOp, QuantifierKind, RecordField, SetCompareOp, SetConstantKind, SetOpKind, Step, StepCase,
};

/// Parse a key known to be valid
pub fn key(value: &str) -> Key {
    Key::parse(value).unwrap()
}

/// Every expression kind, each exercised at least once
pub fn every_kind_expressions() -> Vec<Expression> {
    let b = |e: Expression| Box::new(e);
    vec![
        Expression::bool(true),
        Expression::int(-42),
        Expression::RationalLiteral {
            numerator: 3,
            denominator: 4,
        },
        Expression::string("hello"),
        Expression::SetLiteral {
            elements: vec![Expression::int(1), Expression::int(2), Expression::int(3)],
        },
        Expression::SetLiteral { elements: vec![] },
        Expression::TupleLiteral {
            elements: vec![Expression::string("a"), Expression::bool(false)],
        },
        Expression::RecordLiteral {
            fields: vec![
                RecordField {
                    name: "qty".to_string(),
                    value: Expression::int(5),
                },
                RecordField {
                    name: "who".to_string(),
                    value: Expression::local("customer"),
                },
            ],
        },
        Expression::SetConstant {
            constant: SetConstantKind::Nat,
        },
        Expression::SelfRef,
        Expression::AttributeRef {
            attribute: key("domain/shop/class/order/attribute/total"),
        },
        Expression::local("x"),
        Expression::PriorField {
            field: "balance".to_string(),
        },
        Expression::NextState {
            expr: Some(b(Expression::PriorField {
                field: "balance".to_string(),
            })),
        },
        Expression::NextState { expr: None },
        Expression::arith(ArithOp::Pow, Expression::int(2), Expression::int(10)),
        Expression::logic(LogicOp::Implies, Expression::bool(true), Expression::local("p")),
        Expression::compare(CompareOp::Ge, Expression::local("n"), Expression::int(0)),
        Expression::SetOp {
            op: SetOpKind::Difference,
            left: b(Expression::local("a")),
            right: b(Expression::local("b")),
        },
        Expression::SetCompare {
            op: SetCompareOp::SubsetEq,
            left: b(Expression::local("a")),
            right: b(Expression::local("b")),
        },
        Expression::Membership {
            negated: true,
            element: b(Expression::int(3)),
            set: b(Expression::local("s")),
        },
        Expression::Negate {
            expr: b(Expression::int(9)),
        },
        Expression::not(Expression::bool(false)),
        Expression::FieldAccess {
            base: b(Expression::SelfRef),
            field: "status".to_string(),
        },
        Expression::TupleIndex {
            tuple: b(Expression::local("pair")),
            index: 1,
        },
        Expression::RecordUpdate {
            base: b(Expression::SelfRef),
            alterations: vec![
                FieldAlteration {
                    field: "qty".to_string(),
                    value: Expression::int(0),
                },
                FieldAlteration {
                    field: "note".to_string(),
                    value: Expression::string("cleared"),
                },
            ],
        },
        Expression::RecordUpdate {
            base: b(Expression::local("r")),
            alterations: vec![],
        },
        Expression::StringConcat {
            operands: vec![Expression::string("a"), Expression::local("b")],
        },
        Expression::TupleConcat {
            operands: vec![Expression::local("t1"), Expression::local("t2")],
        },
        Expression::if_then_else(
            Expression::local("c"),
            Expression::int(1),
            Expression::int(0),
        ),
        case_expression(true),
        case_expression(false),
        Expression::Quantifier {
            quantifier: QuantifierKind::ForAll,
            variable: "i".to_string(),
            domain: b(Expression::SetConstant {
                constant: SetConstantKind::Int,
            }),
            predicate: b(Expression::compare(
                CompareOp::Ge,
                Expression::local("i"),
                Expression::int(0),
            )),
        },
        Expression::SetFilter {
            variable: "o".to_string(),
            set: b(Expression::local("orders")),
            predicate: b(Expression::FieldAccess {
                base: b(Expression::local("o")),
                field: "open".to_string(),
            }),
        },
        Expression::SetRange {
            low: b(Expression::int(1)),
            high: b(Expression::int(10)),
        },
        Expression::ActionCall {
            action: key("domain/shop/class/order/action/close"),
            args: vec![Expression::SelfRef],
        },
        Expression::GlobalCall {
            function: key("domain/shop/gfunc/tax"),
            args: vec![Expression::int(100), Expression::string("eu")],
        },
        Expression::BuiltinCall {
            module: "seq".to_string(),
            function: "len".to_string(),
            args: vec![],
        },
    ]
}

/// `case c1 -> 1 | c2 -> 2 [otherwise 0]`
pub fn case_expression(with_otherwise: bool) -> Expression {
    Expression::Case {
        branches: vec![
            CaseBranch {
                condition: Expression::local("c1"),
                result: Expression::int(1),
            },
            CaseBranch {
                condition: Expression::local("c2"),
                result: Expression::int(2),
            },
        ],
        otherwise: with_otherwise.then(|| Box::new(Expression::int(0))),
    }
}

/// Chain of `depth` nested `not` nodes over a literal
pub fn deep_not_chain(depth: usize) -> Expression {
    let mut expr = Expression::bool(true);
    for _ in 0..depth {
        expr = Expression::not(expr);
    }
    expr
}

pub fn event_leaf(description: &str, event: &str) -> Step {
    Step::Leaf(
        LeafStep {
            description: description.to_string(),
            from_object: None,
            to_object: None,
            action: LeafAction::Event(key(event)),
        }
        .between(key("object/customer"), key("object/order")),
    )
}

/// Scenario using every step and leaf type
pub fn checkout_scenario() -> Step {
    Step::sequence(vec![
        event_leaf("place order", "domain/shop/class/order/event/place"),
        Step::leaf(
            "check stock",
            LeafAction::Query(key("domain/shop/class/stock/query/available")),
        ),
        Step::Switch {
            cases: vec![
                StepCase {
                    condition: "in stock".to_string(),
                    statements: vec![
                        event_leaf("ship", "domain/shop/class/order/event/ship"),
                        Step::leaf(
                            "invoice",
                            LeafAction::Scenario(key("domain/shop/usecase/bill/scenario/invoice")),
                        ),
                    ],
                },
                StepCase {
                    condition: "out of stock".to_string(),
                    statements: vec![],
                },
            ],
        },
        Step::Loop {
            condition: "items remain".to_string(),
            statements: vec![Step::leaf("drop line", LeafAction::Delete)],
        },
        Step::Loop {
            condition: "never".to_string(),
            statements: vec![],
        },
    ])
}

/// Deterministic reordering that moves every row away from flattener order
pub fn scramble<T: Clone>(rows: &[T]) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().cloned().collect();
    if out.len() > 2 {
        let mid = out.len() / 2;
        out.rotate_left(mid);
    }
    out
}

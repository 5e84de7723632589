//! Expression flattener
//!
//! Walks an expression pre-order with an explicit work stack and emits one
//! row per node, parents strictly before their descendants.

use super::columns::{self, WireKind};
use super::row::ExpressionRow;
use crate::model::{CaseBranch, Expression, FieldAlteration};
use crate::tree::NodeKeyMinter;

/// Key family segment for expression nodes
pub const NODE_KEY_FAMILY: &str = "expr";

/// Work item: something still to be emitted, with its placement
enum Pending<'e> {
    Expr {
        expr: &'e Expression,
        member_name: Option<&'e str>,
    },
    Alteration(&'e FieldAlteration),
    Branch(&'e CaseBranch),
}

struct Placed<'e> {
    item: Pending<'e>,
    parent: Option<String>,
    sort_order: i64,
}

/// Flatten one expression tree into rows for `owner_key`
///
/// Node keys are `<owner_key>/expr/<n>` with `n` counted in pre-order from
/// zero, so flattening the same tree twice yields identical rows.
pub fn flatten_expression(owner_key: &str, root: &Expression) -> Vec<ExpressionRow> {
    let mut minter = NodeKeyMinter::new(owner_key, NODE_KEY_FAMILY);
    let mut rows = Vec::new();
    let mut stack = vec![Placed {
        item: Pending::Expr {
            expr: root,
            member_name: None,
        },
        parent: None,
        sort_order: 0,
    }];

    while let Some(placed) = stack.pop() {
        let node_key = minter.mint();
        let (row, children) = match placed.item {
            Pending::Expr { expr, member_name } => {
                let (mut row, children) =
                    expression_row(owner_key, &node_key, placed.parent, placed.sort_order, expr);
                if let Some(name) = member_name {
                    columns::set_member_name(&mut row, name);
                }
                (row, children)
            }
            Pending::Alteration(alteration) => {
                let mut row = ExpressionRow::new(
                    owner_key,
                    node_key.clone(),
                    placed.parent,
                    placed.sort_order,
                    WireKind::FieldAlteration.label(),
                );
                columns::set_member_name(&mut row, &alteration.field);
                (row, vec![plain(&alteration.value)])
            }
            Pending::Branch(branch) => {
                let row = ExpressionRow::new(
                    owner_key,
                    node_key.clone(),
                    placed.parent,
                    placed.sort_order,
                    WireKind::CaseBranch.label(),
                );
                (row, vec![plain(&branch.condition), plain(&branch.result)])
            }
        };
        rows.push(row);

        // Reverse so the first child is popped (and keyed) first.
        stack.extend(
            children
                .into_iter()
                .enumerate()
                .rev()
                .map(|(i, item)| Placed {
                    item,
                    parent: Some(node_key.clone()),
                    sort_order: i as i64,
                }),
        );
    }

    tracing::debug!(
        owner_key = %owner_key,
        row_count = rows.len(),
        "Flattened expression tree"
    );

    rows
}

fn plain(expr: &Expression) -> Pending<'_> {
    Pending::Expr {
        expr,
        member_name: None,
    }
}

fn plain_all(exprs: &[Expression]) -> Vec<Pending<'_>> {
    exprs.iter().map(plain).collect()
}

/// Build a node's own row and list its children in sort order
fn expression_row<'e>(
    owner_key: &str,
    node_key: &str,
    parent: Option<String>,
    sort_order: i64,
    expr: &'e Expression,
) -> (ExpressionRow, Vec<Pending<'e>>) {
    let row_of = |kind: WireKind| {
        ExpressionRow::new(owner_key, node_key.to_string(), parent.clone(), sort_order, kind.label())
    };

    match expr {
        Expression::BoolLiteral { value } => {
            let mut row = row_of(WireKind::BoolLiteral);
            row.bool_value = Some(*value);
            (row, vec![])
        }
        Expression::IntLiteral { value } => {
            let mut row = row_of(WireKind::IntLiteral);
            row.int_value = Some(*value);
            (row, vec![])
        }
        Expression::RationalLiteral {
            numerator,
            denominator,
        } => {
            let mut row = row_of(WireKind::RationalLiteral);
            row.numerator = Some(*numerator);
            row.denominator = Some(*denominator);
            (row, vec![])
        }
        Expression::StringLiteral { value } => {
            let mut row = row_of(WireKind::StringLiteral);
            row.string_value = Some(value.clone());
            (row, vec![])
        }
        Expression::SetLiteral { elements } => (row_of(WireKind::SetLiteral), plain_all(elements)),
        Expression::TupleLiteral { elements } => {
            (row_of(WireKind::TupleLiteral), plain_all(elements))
        }
        Expression::RecordLiteral { fields } => {
            let children = fields
                .iter()
                .map(|f| Pending::Expr {
                    expr: &f.value,
                    member_name: Some(f.name.as_str()),
                })
                .collect();
            (row_of(WireKind::RecordLiteral), children)
        }
        Expression::SetConstant { constant } => {
            let mut row = row_of(WireKind::SetConstant);
            row.set_constant_kind = Some(constant.symbol().to_string());
            (row, vec![])
        }
        Expression::SelfRef => (row_of(WireKind::SelfRef), vec![]),
        Expression::AttributeRef { attribute } => {
            let mut row = row_of(WireKind::AttributeRef);
            row.attribute_key = Some(attribute.to_string());
            (row, vec![])
        }
        Expression::LocalVar { name } => {
            let mut row = row_of(WireKind::LocalVar);
            columns::set_own_name(&mut row, name);
            (row, vec![])
        }
        Expression::PriorField { field } => {
            let mut row = row_of(WireKind::PriorField);
            columns::set_own_name(&mut row, field);
            (row, vec![])
        }
        Expression::NextState { expr } => (
            row_of(WireKind::NextState),
            expr.as_deref().map(plain).into_iter().collect(),
        ),
        Expression::BinaryArith { op, left, right } => {
            let mut row = row_of(WireKind::BinaryArith);
            row.operator = Some(op.symbol().to_string());
            (row, vec![plain(left), plain(right)])
        }
        Expression::BinaryLogic { op, left, right } => {
            let mut row = row_of(WireKind::BinaryLogic);
            row.operator = Some(op.symbol().to_string());
            (row, vec![plain(left), plain(right)])
        }
        Expression::Compare { op, left, right } => {
            let mut row = row_of(WireKind::Compare);
            row.operator = Some(op.symbol().to_string());
            (row, vec![plain(left), plain(right)])
        }
        Expression::SetOp { op, left, right } => {
            let mut row = row_of(WireKind::SetOp);
            row.operator = Some(op.symbol().to_string());
            (row, vec![plain(left), plain(right)])
        }
        Expression::SetCompare { op, left, right } => {
            let mut row = row_of(WireKind::SetCompare);
            row.operator = Some(op.symbol().to_string());
            (row, vec![plain(left), plain(right)])
        }
        Expression::Membership {
            negated,
            element,
            set,
        } => {
            let mut row = row_of(WireKind::Membership);
            row.negated = Some(*negated);
            (row, vec![plain(element), plain(set)])
        }
        Expression::Negate { expr } => (row_of(WireKind::Negate), vec![plain(expr)]),
        Expression::Not { expr } => (row_of(WireKind::Not), vec![plain(expr)]),
        Expression::FieldAccess { base, field } => {
            let mut row = row_of(WireKind::FieldAccess);
            columns::set_own_name(&mut row, field);
            (row, vec![plain(base)])
        }
        Expression::TupleIndex { tuple, index } => {
            let mut row = row_of(WireKind::TupleIndex);
            row.int_value = Some(*index);
            (row, vec![plain(tuple)])
        }
        Expression::RecordUpdate { base, alterations } => {
            let mut children = Vec::with_capacity(alterations.len() + 1);
            children.push(plain(base));
            children.extend(alterations.iter().map(Pending::Alteration));
            (row_of(WireKind::RecordUpdate), children)
        }
        Expression::StringConcat { operands } => {
            (row_of(WireKind::StringConcat), plain_all(operands))
        }
        Expression::TupleConcat { operands } => (row_of(WireKind::TupleConcat), plain_all(operands)),
        Expression::IfThenElse {
            condition,
            then_branch,
            else_branch,
        } => (
            row_of(WireKind::IfThenElse),
            vec![plain(condition), plain(then_branch), plain(else_branch)],
        ),
        Expression::Case {
            branches,
            otherwise,
        } => {
            let mut row = row_of(WireKind::Case);
            columns::set_otherwise_present(&mut row, otherwise.is_some());
            let mut children: Vec<Pending<'e>> = branches.iter().map(Pending::Branch).collect();
            children.extend(otherwise.as_deref().map(plain));
            (row, children)
        }
        Expression::Quantifier {
            quantifier,
            variable,
            domain,
            predicate,
        } => {
            let mut row = row_of(WireKind::Quantifier);
            row.quantifier_kind = Some(quantifier.symbol().to_string());
            columns::set_own_name(&mut row, variable);
            (row, vec![plain(domain), plain(predicate)])
        }
        Expression::SetFilter {
            variable,
            set,
            predicate,
        } => {
            let mut row = row_of(WireKind::SetFilter);
            columns::set_own_name(&mut row, variable);
            (row, vec![plain(set), plain(predicate)])
        }
        Expression::SetRange { low, high } => {
            (row_of(WireKind::SetRange), vec![plain(low), plain(high)])
        }
        Expression::ActionCall { action, args } => {
            let mut row = row_of(WireKind::ActionCall);
            row.action_key = Some(action.to_string());
            (row, plain_all(args))
        }
        Expression::GlobalCall { function, args } => {
            let mut row = row_of(WireKind::GlobalCall);
            row.global_function_key = Some(function.to_string());
            (row, plain_all(args))
        }
        Expression::BuiltinCall {
            module,
            function,
            args,
        } => {
            let mut row = row_of(WireKind::BuiltinCall);
            row.builtin_module = Some(module.clone());
            row.builtin_function = Some(function.clone());
            (row, plain_all(args))
        }
    }
}

//! Expression rebuilder
//!
//! Reassembles expressions from unordered rows. Structural validation is
//! done by [`OwnerIndex`]; this module only knows how each kind turns its
//! payload columns and built children back into an [`Expression`].

use super::columns::{self, Arity, WireKind};
use super::row::ExpressionRow;
use crate::errors::Result;
use crate::model::{
    ArithOp, CaseBranch, CompareOp, Expression, FieldAlteration, KeyType, LogicOp, QuantifierKind,
    RecordField, SetCompareOp, SetConstantKind, SetOpKind,
};
use crate::tree::checks::{self, child_arity, expect_arity, misplaced, required, required_key};
use crate::tree::{rebuild_each, rebuild_owner, OwnerIndex};
use std::collections::BTreeMap;

/// Partially rebuilt node: an expression or one of the shape-only groupings
enum Built {
    Expr(Expression),
    Alteration(FieldAlteration),
    Branch(CaseBranch),
}

type Child<'a> = (&'a ExpressionRow, Built);

/// Rebuild every owner's expression found in `rows`
///
/// Owners are independent: a malformed owner maps to its error and does not
/// affect the rest.
pub fn rebuild_expressions(rows: &[ExpressionRow]) -> BTreeMap<String, Result<Expression>> {
    rebuild_each(rows, rebuild_index)
}

/// Rebuild the expression of one owner
///
/// Rows of other owners are ignored. Returns
/// [`TreeError::OwnerNotFound`](crate::errors::TreeError::OwnerNotFound)
/// when `owner_key` has no rows.
pub fn rebuild_expression(owner_key: &str, rows: &[ExpressionRow]) -> Result<Expression> {
    rebuild_owner(owner_key, rows, rebuild_index)
}

fn rebuild_index(index: &OwnerIndex<'_, ExpressionRow>) -> Result<Expression> {
    let root = index.root();
    if WireKind::from_label(&root.node_kind).is_some_and(|kind| kind.is_synthetic()) {
        return Err(misplaced(
            root,
            format!("{} only appears under its host and cannot be the root", root.node_kind),
        ));
    }
    match index.fold(build_node)? {
        Built::Expr(expr) => Ok(expr),
        Built::Alteration(_) | Built::Branch(_) => {
            Err(misplaced(root, "shape-only node cannot be the root"))
        }
    }
}

fn build_node<'a>(row: &'a ExpressionRow, kids: Vec<Child<'a>>) -> Result<Built> {
    let kind = WireKind::from_label(&row.node_kind).ok_or_else(|| checks::unknown_kind(row))?;

    match kind.arity() {
        Arity::Fixed(n) => expect_arity(row, n, kids.len())?,
        Arity::Optional if kids.len() > 1 => return Err(child_arity(row, "0 or 1", kids.len())),
        Arity::Optional | Arity::Variadic | Arity::Grouped => {}
    }

    let expr = match kind {
        // ----- literals -----
        WireKind::BoolLiteral => Expression::BoolLiteral {
            value: row.bool_value.unwrap_or(false),
        },
        WireKind::IntLiteral => Expression::IntLiteral {
            value: row.int_value.unwrap_or(0),
        },
        WireKind::RationalLiteral => Expression::RationalLiteral {
            numerator: row.numerator.unwrap_or(0),
            denominator: row.denominator.unwrap_or(1),
        },
        WireKind::StringLiteral => Expression::StringLiteral {
            value: row.string_value.clone().unwrap_or_default(),
        },
        WireKind::SetLiteral => Expression::SetLiteral {
            elements: plain_children(row, kids)?,
        },
        WireKind::TupleLiteral => Expression::TupleLiteral {
            elements: plain_children(row, kids)?,
        },
        WireKind::RecordLiteral => Expression::RecordLiteral {
            fields: record_fields(row, kids)?,
        },
        WireKind::SetConstant => {
            let symbol = required(row, "set_constant_kind", row.set_constant_kind.as_deref())?;
            Expression::SetConstant {
                constant: symbol_payload(row, "set_constant_kind", symbol, SetConstantKind::from_symbol)?,
            }
        }

        // ----- references -----
        WireKind::SelfRef => Expression::SelfRef,
        WireKind::AttributeRef => Expression::AttributeRef {
            attribute: required_key(
                row,
                "attribute_key",
                row.attribute_key.as_deref(),
                KeyType::Attribute,
            )?,
        },
        WireKind::LocalVar => Expression::LocalVar {
            name: columns::own_name(row),
        },
        WireKind::PriorField => Expression::PriorField {
            field: columns::own_name(row),
        },
        WireKind::NextState => Expression::NextState {
            expr: plain_children(row, kids)?.pop().map(Box::new),
        },

        // ----- operators -----
        WireKind::BinaryArith => {
            let [left, right] = fixed(row, kids)?;
            Expression::BinaryArith {
                op: operator(row, ArithOp::from_symbol)?,
                left: Box::new(left),
                right: Box::new(right),
            }
        }
        WireKind::BinaryLogic => {
            let [left, right] = fixed(row, kids)?;
            Expression::BinaryLogic {
                op: operator(row, LogicOp::from_symbol)?,
                left: Box::new(left),
                right: Box::new(right),
            }
        }
        WireKind::Compare => {
            let [left, right] = fixed(row, kids)?;
            Expression::Compare {
                op: operator(row, CompareOp::from_symbol)?,
                left: Box::new(left),
                right: Box::new(right),
            }
        }
        WireKind::SetOp => {
            let [left, right] = fixed(row, kids)?;
            Expression::SetOp {
                op: operator(row, SetOpKind::from_symbol)?,
                left: Box::new(left),
                right: Box::new(right),
            }
        }
        WireKind::SetCompare => {
            let [left, right] = fixed(row, kids)?;
            Expression::SetCompare {
                op: operator(row, SetCompareOp::from_symbol)?,
                left: Box::new(left),
                right: Box::new(right),
            }
        }
        WireKind::Membership => {
            let [element, set] = fixed(row, kids)?;
            Expression::Membership {
                negated: row.negated.unwrap_or(false),
                element: Box::new(element),
                set: Box::new(set),
            }
        }
        WireKind::Negate => {
            let [expr] = fixed(row, kids)?;
            Expression::Negate {
                expr: Box::new(expr),
            }
        }
        WireKind::Not => {
            let [expr] = fixed(row, kids)?;
            Expression::Not {
                expr: Box::new(expr),
            }
        }

        // ----- structure access -----
        WireKind::FieldAccess => {
            let [base] = fixed(row, kids)?;
            Expression::FieldAccess {
                base: Box::new(base),
                field: columns::own_name(row),
            }
        }
        WireKind::TupleIndex => {
            let [tuple] = fixed(row, kids)?;
            Expression::TupleIndex {
                tuple: Box::new(tuple),
                index: row.int_value.unwrap_or(0),
            }
        }
        WireKind::RecordUpdate => record_update(row, kids)?,
        WireKind::StringConcat => Expression::StringConcat {
            operands: plain_children(row, kids)?,
        },
        WireKind::TupleConcat => Expression::TupleConcat {
            operands: plain_children(row, kids)?,
        },

        // ----- control flow -----
        WireKind::IfThenElse => {
            let [condition, then_branch, else_branch] = fixed(row, kids)?;
            Expression::IfThenElse {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            }
        }
        WireKind::Case => case(row, kids)?,

        // ----- quantifiers and comprehensions -----
        WireKind::Quantifier => {
            let symbol = required(row, "quantifier_kind", row.quantifier_kind.as_deref())?;
            let quantifier = symbol_payload(row, "quantifier_kind", symbol, QuantifierKind::from_symbol)?;
            let [domain, predicate] = fixed(row, kids)?;
            Expression::Quantifier {
                quantifier,
                variable: columns::own_name(row),
                domain: Box::new(domain),
                predicate: Box::new(predicate),
            }
        }
        WireKind::SetFilter => {
            let [set, predicate] = fixed(row, kids)?;
            Expression::SetFilter {
                variable: columns::own_name(row),
                set: Box::new(set),
                predicate: Box::new(predicate),
            }
        }
        WireKind::SetRange => {
            let [low, high] = fixed(row, kids)?;
            Expression::SetRange {
                low: Box::new(low),
                high: Box::new(high),
            }
        }

        // ----- calls -----
        WireKind::ActionCall => Expression::ActionCall {
            action: required_key(row, "action_key", row.action_key.as_deref(), KeyType::Action)?,
            args: plain_children(row, kids)?,
        },
        WireKind::GlobalCall => Expression::GlobalCall {
            function: required_key(
                row,
                "global_function_key",
                row.global_function_key.as_deref(),
                KeyType::GlobalFunction,
            )?,
            args: plain_children(row, kids)?,
        },
        WireKind::BuiltinCall => Expression::BuiltinCall {
            module: required(row, "builtin_module", row.builtin_module.as_deref())?.to_string(),
            function: required(row, "builtin_function", row.builtin_function.as_deref())?
                .to_string(),
            args: plain_children(row, kids)?,
        },

        // ----- shape-only -----
        WireKind::FieldAlteration => {
            let field = required(row, "variable_name", columns::member_name(row))?.to_string();
            let [value] = fixed(row, kids)?;
            return Ok(Built::Alteration(FieldAlteration { field, value }));
        }
        WireKind::CaseBranch => {
            let [condition, result] = fixed(row, kids)?;
            return Ok(Built::Branch(CaseBranch { condition, result }));
        }
    };

    Ok(Built::Expr(expr))
}

/// Unwrap a child that must be a plain expression
fn plain(parent: &ExpressionRow, (row, built): Child<'_>) -> Result<Expression> {
    match built {
        Built::Expr(expr) => Ok(expr),
        Built::Alteration(_) | Built::Branch(_) => Err(misplaced(
            row,
            format!("not allowed under {}", parent.node_kind),
        )),
    }
}

fn plain_children(parent: &ExpressionRow, kids: Vec<Child<'_>>) -> Result<Vec<Expression>> {
    kids.into_iter().map(|kid| plain(parent, kid)).collect()
}

/// Plain children of a fixed-arity kind, already arity-checked
fn fixed<const N: usize>(row: &ExpressionRow, kids: Vec<Child<'_>>) -> Result<[Expression; N]> {
    let actual = kids.len();
    plain_children(row, kids)?
        .try_into()
        .map_err(|_| child_arity(row, N.to_string(), actual))
}

fn record_fields(parent: &ExpressionRow, kids: Vec<Child<'_>>) -> Result<Vec<RecordField>> {
    kids.into_iter()
        .map(|(row, built)| {
            let name = required(row, "variable_name", columns::member_name(row))?.to_string();
            let value = plain(parent, (row, built))?;
            Ok(RecordField { name, value })
        })
        .collect()
}

fn record_update(row: &ExpressionRow, kids: Vec<Child<'_>>) -> Result<Expression> {
    let mut kids = kids.into_iter();
    let base = match kids.next() {
        Some(kid) => plain(row, kid)?,
        None => return Err(child_arity(row, "at least 1", 0)),
    };
    let alterations = kids
        .map(|(kid, built)| match built {
            Built::Alteration(alteration) => Ok(alteration),
            Built::Expr(_) | Built::Branch(_) => Err(misplaced(
                kid,
                "record update children after the base must be field alterations",
            )),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Expression::RecordUpdate {
        base: Box::new(base),
        alterations,
    })
}

fn case(row: &ExpressionRow, mut kids: Vec<Child<'_>>) -> Result<Expression> {
    let actual = kids.len();
    let otherwise = if columns::otherwise_present(row) {
        match kids.pop() {
            Some((_, Built::Expr(expr))) => Some(Box::new(expr)),
            Some(_) | None => {
                return Err(child_arity(
                    row,
                    "branches followed by an otherwise expression",
                    actual,
                ))
            }
        }
    } else {
        None
    };

    let branches = kids
        .into_iter()
        .map(|(kid, built)| match built {
            Built::Branch(branch) => Ok(branch),
            Built::Expr(_) | Built::Alteration(_) => Err(misplaced(
                kid,
                "case children must be branches unless an otherwise clause is flagged",
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Expression::Case {
        branches,
        otherwise,
    })
}

fn operator<T>(row: &ExpressionRow, parse: fn(&str) -> Option<T>) -> Result<T> {
    let symbol = required(row, "operator", row.operator.as_deref())?;
    symbol_payload(row, "operator", symbol, parse)
}

fn symbol_payload<T>(
    row: &ExpressionRow,
    column: &str,
    symbol: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<T> {
    parse(symbol).ok_or_else(|| {
        checks::invalid_payload(row, column, format!("unrecognised symbol '{symbol}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TreeError;
    use crate::expression::flatten_expression;

    fn row(key: &str, parent: Option<&str>, sort: i64, kind: &str) -> ExpressionRow {
        ExpressionRow::new(
            "logic/l1",
            format!("logic/l1/expr/{key}"),
            parent.map(|p| format!("logic/l1/expr/{p}")),
            sort,
            kind,
        )
    }

    fn int(key: &str, parent: &str, sort: i64, value: i64) -> ExpressionRow {
        let mut r = row(key, Some(parent), sort, "int_literal");
        r.int_value = Some(value);
        r
    }

    #[test]
    fn test_literal_defaults_when_payload_absent() {
        let rows = vec![row("0", None, 0, "bool_literal")];
        assert_eq!(
            rebuild_expression("logic/l1", &rows).unwrap(),
            Expression::bool(false)
        );

        let rows = vec![row("0", None, 0, "rational_literal")];
        assert_eq!(
            rebuild_expression("logic/l1", &rows).unwrap(),
            Expression::RationalLiteral {
                numerator: 0,
                denominator: 1
            }
        );
    }

    #[test]
    fn test_binary_with_one_child_is_arity_error() {
        let mut root = row("0", None, 0, "binary_arith");
        root.operator = Some("+".to_string());
        let rows = vec![root, int("1", "0", 0, 1)];
        let err = rebuild_expression("logic/l1", &rows).unwrap_err();
        assert!(matches!(
            err,
            TreeError::ChildArity { ref expected, actual: 1, .. } if expected == "2"
        ));
    }

    #[test]
    fn test_unknown_operator_is_invalid_payload() {
        let mut root = row("0", None, 0, "binary_arith");
        root.operator = Some("**".to_string());
        let rows = vec![root, int("1", "0", 0, 1), int("2", "0", 1, 2)];
        let err = rebuild_expression("logic/l1", &rows).unwrap_err();
        assert!(matches!(err, TreeError::InvalidPayload { ref column, .. } if column == "operator"));
    }

    #[test]
    fn test_unknown_kind() {
        let rows = vec![row("0", None, 0, "lambda")];
        let err = rebuild_expression("logic/l1", &rows).unwrap_err();
        assert!(matches!(err, TreeError::UnknownNodeKind { ref kind, .. } if kind == "lambda"));
    }

    #[test]
    fn test_next_state_without_operand() {
        let rows = vec![row("0", None, 0, "next_state")];
        assert_eq!(
            rebuild_expression("logic/l1", &rows).unwrap(),
            Expression::NextState { expr: None }
        );
    }

    #[test]
    fn test_next_state_with_two_operands_rejected() {
        let rows = vec![
            row("0", None, 0, "next_state"),
            int("1", "0", 0, 1),
            int("2", "0", 1, 2),
        ];
        let err = rebuild_expression("logic/l1", &rows).unwrap_err();
        assert!(matches!(err, TreeError::ChildArity { actual: 2, .. }));
    }

    #[test]
    fn test_case_branch_outside_case_is_misplaced() {
        let rows = vec![
            row("0", None, 0, "not"),
            row("1", Some("0"), 0, "case_branch"),
            int("2", "1", 0, 1),
            int("3", "1", 1, 2),
        ];
        let err = rebuild_expression("logic/l1", &rows).unwrap_err();
        assert!(matches!(
            err,
            TreeError::MisplacedNode { ref node_key, .. } if node_key == "logic/l1/expr/1"
        ));
    }

    #[test]
    fn test_synthetic_root_is_misplaced() {
        let mut root = row("0", None, 0, "field_alteration");
        root.variable_name = Some("qty".to_string());
        let rows = vec![root, int("1", "0", 0, 1)];
        let err = rebuild_expression("logic/l1", &rows).unwrap_err();
        assert!(matches!(err, TreeError::MisplacedNode { .. }));
    }

    #[test]
    fn test_synthetic_root_rejected_before_children_are_checked() {
        // a case_branch needs two children; the root position is reported first
        let rows = vec![row("0", None, 0, "case_branch"), int("1", "0", 0, 1)];
        let err = rebuild_expression("logic/l1", &rows).unwrap_err();
        assert!(matches!(
            err,
            TreeError::MisplacedNode { ref reason, .. } if reason.starts_with("case_branch")
        ));
    }

    #[test]
    fn test_case_flagged_otherwise_missing() {
        let mut root = row("0", None, 0, "case");
        root.negated = Some(true);
        let rows = vec![
            root,
            row("1", Some("0"), 0, "case_branch"),
            int("2", "1", 0, 1),
            int("3", "1", 1, 2),
        ];
        let err = rebuild_expression("logic/l1", &rows).unwrap_err();
        assert!(matches!(err, TreeError::ChildArity { .. }));
    }

    #[test]
    fn test_case_plain_child_without_flag_is_misplaced() {
        let rows = vec![row("0", None, 0, "case"), int("1", "0", 0, 9)];
        let err = rebuild_expression("logic/l1", &rows).unwrap_err();
        assert!(matches!(err, TreeError::MisplacedNode { .. }));
    }

    #[test]
    fn test_record_update_without_base() {
        let rows = vec![row("0", None, 0, "record_update")];
        let err = rebuild_expression("logic/l1", &rows).unwrap_err();
        assert!(matches!(err, TreeError::ChildArity { actual: 0, .. }));
    }

    #[test]
    fn test_record_member_keeps_own_name_separate() {
        let expr = Expression::RecordLiteral {
            fields: vec![RecordField {
                name: "who".to_string(),
                value: Expression::local("x"),
            }],
        };
        let rows = flatten_expression("logic/l1", &expr);
        assert_eq!(rows[1].variable_name.as_deref(), Some("who"));
        assert_eq!(rows[1].string_value.as_deref(), Some("x"));
        assert_eq!(rebuild_expression("logic/l1", &rows).unwrap(), expr);
    }

    #[test]
    fn test_attribute_key_must_parse() {
        let mut root = row("0", None, 0, "attribute_ref");
        root.attribute_key = Some("domain/d/class".to_string());
        let err = rebuild_expression("logic/l1", &[root]).unwrap_err();
        assert!(matches!(err, TreeError::KeyParse { .. }));
    }

    #[test]
    fn test_builtin_requires_module() {
        let mut root = row("0", None, 0, "builtin_call");
        root.builtin_function = Some("len".to_string());
        let err = rebuild_expression("logic/l1", &[root]).unwrap_err();
        assert!(matches!(
            err,
            TreeError::InvalidPayload { ref column, .. } if column == "builtin_module"
        ));
    }
}

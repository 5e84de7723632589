//! Logic expression tree model
//!
//! [`Expression`] is the in-memory form of a logic specification's
//! expression: a closed sum type whose variants are the expression node-kind
//! catalog. Composite groupings (record-update alterations and case branches)
//! are plain structs owned by their parent variant, never expressions of
//! their own.

use crate::model::key::Key;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declare a closed enum stored as a short symbol in a text column
macro_rules! symbol_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $symbol:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $symbol)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Symbol stored in the row column
            pub fn symbol(&self) -> &'static str {
                match self {
                    $($name::$variant => $symbol,)+
                }
            }

            /// Parse a stored symbol
            pub fn from_symbol(symbol: &str) -> Option<Self> {
                match symbol {
                    $($symbol => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.symbol())
            }
        }
    };
}

symbol_enum!(
    /// Arithmetic operators
    ArithOp {
        Add => "+",
        Sub => "-",
        Mul => "*",
        Div => "/",
        Mod => "%",
        Pow => "^",
    }
);

symbol_enum!(
    /// Boolean connectives
    LogicOp {
        And => "and",
        Or => "or",
        Implies => "implies",
        Equiv => "equiv",
    }
);

symbol_enum!(
    /// Scalar comparisons
    CompareOp {
        Eq => "=",
        Ne => "!=",
        Lt => "<",
        Le => "<=",
        Gt => ">",
        Ge => ">=",
    }
);

symbol_enum!(
    /// Set-valued binary operators
    SetOpKind {
        Union => "union",
        Intersect => "intersect",
        Difference => "difference",
    }
);

symbol_enum!(
    /// Set containment comparisons
    SetCompareOp {
        Subset => "subset",
        SubsetEq => "subseteq",
        Superset => "superset",
        SupersetEq => "superseteq",
    }
);

symbol_enum!(
    /// Quantifier flavours
    QuantifierKind {
        ForAll => "forall",
        Exists => "exists",
    }
);

symbol_enum!(
    /// Built-in infinite sets
    SetConstantKind {
        Nat => "nat",
        Int => "int",
        Real => "real",
        Bool => "bool",
    }
);

/// One `name = value` member of a record literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordField {
    pub name: String,
    pub value: Expression,
}

/// One `field = value` replacement inside a record update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAlteration {
    pub field: String,
    pub value: Expression,
}

/// One `condition -> result` arm of a case expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseBranch {
    pub condition: Expression,
    pub result: Expression,
}

/// Logic expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expression {
    // ----- literals -----
    BoolLiteral {
        value: bool,
    },
    IntLiteral {
        value: i64,
    },
    RationalLiteral {
        numerator: i64,
        denominator: i64,
    },
    StringLiteral {
        value: String,
    },
    SetLiteral {
        elements: Vec<Expression>,
    },
    TupleLiteral {
        elements: Vec<Expression>,
    },
    RecordLiteral {
        fields: Vec<RecordField>,
    },
    SetConstant {
        constant: SetConstantKind,
    },

    // ----- references -----
    SelfRef,
    AttributeRef {
        attribute: Key,
    },
    LocalVar {
        name: String,
    },
    /// Value of a field before the current action
    PriorField {
        field: String,
    },
    /// Primed (next-state) value; the operand is optional
    NextState {
        expr: Option<Box<Expression>>,
    },

    // ----- operators -----
    BinaryArith {
        op: ArithOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    BinaryLogic {
        op: LogicOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Compare {
        op: CompareOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    SetOp {
        op: SetOpKind,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    SetCompare {
        op: SetCompareOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Membership {
        negated: bool,
        element: Box<Expression>,
        set: Box<Expression>,
    },
    Negate {
        expr: Box<Expression>,
    },
    Not {
        expr: Box<Expression>,
    },

    // ----- structure access -----
    FieldAccess {
        base: Box<Expression>,
        field: String,
    },
    TupleIndex {
        tuple: Box<Expression>,
        index: i64,
    },
    RecordUpdate {
        base: Box<Expression>,
        alterations: Vec<FieldAlteration>,
    },
    StringConcat {
        operands: Vec<Expression>,
    },
    TupleConcat {
        operands: Vec<Expression>,
    },

    // ----- control flow -----
    IfThenElse {
        condition: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
    },
    Case {
        branches: Vec<CaseBranch>,
        otherwise: Option<Box<Expression>>,
    },

    // ----- quantifiers and comprehensions -----
    Quantifier {
        quantifier: QuantifierKind,
        variable: String,
        domain: Box<Expression>,
        predicate: Box<Expression>,
    },
    SetFilter {
        variable: String,
        set: Box<Expression>,
        predicate: Box<Expression>,
    },
    SetRange {
        low: Box<Expression>,
        high: Box<Expression>,
    },

    // ----- calls -----
    ActionCall {
        action: Key,
        args: Vec<Expression>,
    },
    GlobalCall {
        function: Key,
        args: Vec<Expression>,
    },
    BuiltinCall {
        module: String,
        function: String,
        args: Vec<Expression>,
    },
}

impl Expression {
    pub fn bool(value: bool) -> Self {
        Expression::BoolLiteral { value }
    }

    pub fn int(value: i64) -> Self {
        Expression::IntLiteral { value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::StringLiteral {
            value: value.into(),
        }
    }

    pub fn local(name: impl Into<String>) -> Self {
        Expression::LocalVar { name: name.into() }
    }

    pub fn arith(op: ArithOp, left: Expression, right: Expression) -> Self {
        Expression::BinaryArith {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn logic(op: LogicOp, left: Expression, right: Expression) -> Self {
        Expression::BinaryLogic {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn compare(op: CompareOp, left: Expression, right: Expression) -> Self {
        Expression::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(expr: Expression) -> Self {
        Expression::Not {
            expr: Box::new(expr),
        }
    }

    pub fn if_then_else(condition: Expression, then_branch: Expression, else_branch: Expression) -> Self {
        Expression::IfThenElse {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    /// Number of nodes in the tree, counted without recursion
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            count += 1;
            expr.push_operands(&mut stack);
        }
        count
    }

    /// Push every direct sub-expression (including those inside record
    /// fields, alterations and case branches) onto `out`
    fn push_operands<'a>(&'a self, out: &mut Vec<&'a Expression>) {
        match self {
            Expression::BoolLiteral { .. }
            | Expression::IntLiteral { .. }
            | Expression::RationalLiteral { .. }
            | Expression::StringLiteral { .. }
            | Expression::SetConstant { .. }
            | Expression::SelfRef
            | Expression::AttributeRef { .. }
            | Expression::LocalVar { .. }
            | Expression::PriorField { .. } => {}
            Expression::NextState { expr } => out.extend(expr.as_deref()),
            Expression::SetLiteral { elements } | Expression::TupleLiteral { elements } => {
                out.extend(elements)
            }
            Expression::RecordLiteral { fields } => out.extend(fields.iter().map(|f| &f.value)),
            Expression::BinaryArith { left, right, .. }
            | Expression::BinaryLogic { left, right, .. }
            | Expression::Compare { left, right, .. }
            | Expression::SetOp { left, right, .. }
            | Expression::SetCompare { left, right, .. } => {
                out.push(left);
                out.push(right);
            }
            Expression::Membership { element, set, .. } => {
                out.push(element);
                out.push(set);
            }
            Expression::Negate { expr } | Expression::Not { expr } => out.push(expr),
            Expression::FieldAccess { base, .. } => out.push(base),
            Expression::TupleIndex { tuple, .. } => out.push(tuple),
            Expression::RecordUpdate { base, alterations } => {
                out.push(base);
                out.extend(alterations.iter().map(|a| &a.value));
            }
            Expression::StringConcat { operands } | Expression::TupleConcat { operands } => {
                out.extend(operands)
            }
            Expression::IfThenElse {
                condition,
                then_branch,
                else_branch,
            } => {
                out.push(condition);
                out.push(then_branch);
                out.push(else_branch);
            }
            Expression::Case {
                branches,
                otherwise,
            } => {
                for branch in branches {
                    out.push(&branch.condition);
                    out.push(&branch.result);
                }
                out.extend(otherwise.as_deref());
            }
            Expression::Quantifier {
                domain, predicate, ..
            } => {
                out.push(domain);
                out.push(predicate);
            }
            Expression::SetFilter { set, predicate, .. } => {
                out.push(set);
                out.push(predicate);
            }
            Expression::SetRange { low, high } => {
                out.push(low);
                out.push(high);
            }
            Expression::ActionCall { args, .. }
            | Expression::GlobalCall { args, .. }
            | Expression::BuiltinCall { args, .. } => out.extend(args),
        }
    }
}

/// Teardown moves sub-expressions onto a heap stack so dropping a deep tree
/// never recurses
impl Drop for Expression {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.take_operands(&mut stack);
        while let Some(mut expr) = stack.pop() {
            expr.take_operands(&mut stack);
        }
    }
}

impl Expression {
    /// Move every direct sub-expression onto `out`, leaving leaves behind
    fn take_operands(&mut self, out: &mut Vec<Expression>) {
        fn take(slot: &mut Expression) -> Expression {
            std::mem::replace(slot, Expression::SelfRef)
        }

        match self {
            Expression::BoolLiteral { .. }
            | Expression::IntLiteral { .. }
            | Expression::RationalLiteral { .. }
            | Expression::StringLiteral { .. }
            | Expression::SetConstant { .. }
            | Expression::SelfRef
            | Expression::AttributeRef { .. }
            | Expression::LocalVar { .. }
            | Expression::PriorField { .. } => {}
            Expression::NextState { expr } => out.extend(expr.take().map(|boxed| *boxed)),
            Expression::SetLiteral { elements } | Expression::TupleLiteral { elements } => {
                out.append(elements)
            }
            Expression::RecordLiteral { fields } => {
                out.extend(std::mem::take(fields).into_iter().map(|f| f.value))
            }
            Expression::BinaryArith { left, right, .. }
            | Expression::BinaryLogic { left, right, .. }
            | Expression::Compare { left, right, .. }
            | Expression::SetOp { left, right, .. }
            | Expression::SetCompare { left, right, .. } => {
                out.push(take(left));
                out.push(take(right));
            }
            Expression::Membership { element, set, .. } => {
                out.push(take(element));
                out.push(take(set));
            }
            Expression::Negate { expr } | Expression::Not { expr } => out.push(take(expr)),
            Expression::FieldAccess { base, .. } => out.push(take(base)),
            Expression::TupleIndex { tuple, .. } => out.push(take(tuple)),
            Expression::RecordUpdate { base, alterations } => {
                out.push(take(base));
                out.extend(std::mem::take(alterations).into_iter().map(|a| a.value));
            }
            Expression::StringConcat { operands } | Expression::TupleConcat { operands } => {
                out.append(operands)
            }
            Expression::IfThenElse {
                condition,
                then_branch,
                else_branch,
            } => {
                out.push(take(condition));
                out.push(take(then_branch));
                out.push(take(else_branch));
            }
            Expression::Case {
                branches,
                otherwise,
            } => {
                for branch in std::mem::take(branches) {
                    out.push(branch.condition);
                    out.push(branch.result);
                }
                out.extend(otherwise.take().map(|boxed| *boxed));
            }
            Expression::Quantifier {
                domain, predicate, ..
            } => {
                out.push(take(domain));
                out.push(take(predicate));
            }
            Expression::SetFilter { set, predicate, .. } => {
                out.push(take(set));
                out.push(take(predicate));
            }
            Expression::SetRange { low, high } => {
                out.push(take(low));
                out.push(take(high));
            }
            Expression::ActionCall { args, .. }
            | Expression::GlobalCall { args, .. }
            | Expression::BuiltinCall { args, .. } => out.append(args),
        }
    }
}

//! Wire kinds and column mapping for expression rows
//!
//! This is the single place that knows how an expression node maps onto the
//! row columns. Two columns carry metadata that is not the node's own
//! payload:
//!
//! | column | reused for |
//! |---|---|
//! | `variable_name` | the member name a parent assigns to a child: record-literal field names (on the member's value row) and field-alteration field names |
//! | `negated` | on a `case` row, whether a trailing otherwise child exists |
//!
//! Because `variable_name` is taken by parents, a node's *own* names (bound
//! variable of a local reference, quantifier or filter; field of a field
//! access or prior-field reference) live in `string_value`. A record member
//! whose value binds a name therefore never collides with its field name.
//!
//! Moving either reuse to dedicated columns only touches this module.

use super::row::ExpressionRow;

/// Discriminator stored in `node_kind`
///
/// Includes the two shape-only kinds that exist only in rows. Kept private
/// to the crate so neither can be mistaken for an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WireKind {
    BoolLiteral,
    IntLiteral,
    RationalLiteral,
    StringLiteral,
    SetLiteral,
    TupleLiteral,
    RecordLiteral,
    SetConstant,
    SelfRef,
    AttributeRef,
    LocalVar,
    PriorField,
    NextState,
    BinaryArith,
    BinaryLogic,
    Compare,
    SetOp,
    SetCompare,
    Membership,
    Negate,
    Not,
    FieldAccess,
    TupleIndex,
    RecordUpdate,
    StringConcat,
    TupleConcat,
    IfThenElse,
    Case,
    Quantifier,
    SetFilter,
    SetRange,
    ActionCall,
    GlobalCall,
    BuiltinCall,
    // shape-only
    FieldAlteration,
    CaseBranch,
}

/// How many children a kind's row owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Arity {
    Fixed(usize),
    /// Zero or one
    Optional,
    Variadic,
    /// Determined by synthetic child rows
    Grouped,
}

impl WireKind {
    pub(crate) const ALL: [WireKind; 36] = [
        WireKind::BoolLiteral,
        WireKind::IntLiteral,
        WireKind::RationalLiteral,
        WireKind::StringLiteral,
        WireKind::SetLiteral,
        WireKind::TupleLiteral,
        WireKind::RecordLiteral,
        WireKind::SetConstant,
        WireKind::SelfRef,
        WireKind::AttributeRef,
        WireKind::LocalVar,
        WireKind::PriorField,
        WireKind::NextState,
        WireKind::BinaryArith,
        WireKind::BinaryLogic,
        WireKind::Compare,
        WireKind::SetOp,
        WireKind::SetCompare,
        WireKind::Membership,
        WireKind::Negate,
        WireKind::Not,
        WireKind::FieldAccess,
        WireKind::TupleIndex,
        WireKind::RecordUpdate,
        WireKind::StringConcat,
        WireKind::TupleConcat,
        WireKind::IfThenElse,
        WireKind::Case,
        WireKind::Quantifier,
        WireKind::SetFilter,
        WireKind::SetRange,
        WireKind::ActionCall,
        WireKind::GlobalCall,
        WireKind::BuiltinCall,
        WireKind::FieldAlteration,
        WireKind::CaseBranch,
    ];

    pub(crate) fn label(&self) -> &'static str {
        match self {
            WireKind::BoolLiteral => "bool_literal",
            WireKind::IntLiteral => "int_literal",
            WireKind::RationalLiteral => "rational_literal",
            WireKind::StringLiteral => "string_literal",
            WireKind::SetLiteral => "set_literal",
            WireKind::TupleLiteral => "tuple_literal",
            WireKind::RecordLiteral => "record_literal",
            WireKind::SetConstant => "set_constant",
            WireKind::SelfRef => "self_ref",
            WireKind::AttributeRef => "attribute_ref",
            WireKind::LocalVar => "local_var",
            WireKind::PriorField => "prior_field",
            WireKind::NextState => "next_state",
            WireKind::BinaryArith => "binary_arith",
            WireKind::BinaryLogic => "binary_logic",
            WireKind::Compare => "compare",
            WireKind::SetOp => "set_op",
            WireKind::SetCompare => "set_compare",
            WireKind::Membership => "membership",
            WireKind::Negate => "negate",
            WireKind::Not => "not",
            WireKind::FieldAccess => "field_access",
            WireKind::TupleIndex => "tuple_index",
            WireKind::RecordUpdate => "record_update",
            WireKind::StringConcat => "string_concat",
            WireKind::TupleConcat => "tuple_concat",
            WireKind::IfThenElse => "if_then_else",
            WireKind::Case => "case",
            WireKind::Quantifier => "quantifier",
            WireKind::SetFilter => "set_filter",
            WireKind::SetRange => "set_range",
            WireKind::ActionCall => "action_call",
            WireKind::GlobalCall => "global_call",
            WireKind::BuiltinCall => "builtin_call",
            WireKind::FieldAlteration => "field_alteration",
            WireKind::CaseBranch => "case_branch",
        }
    }

    pub(crate) fn from_label(label: &str) -> Option<WireKind> {
        WireKind::ALL.into_iter().find(|k| k.label() == label)
    }

    pub(crate) fn arity(&self) -> Arity {
        match self {
            WireKind::BoolLiteral
            | WireKind::IntLiteral
            | WireKind::RationalLiteral
            | WireKind::StringLiteral
            | WireKind::SetConstant
            | WireKind::SelfRef
            | WireKind::AttributeRef
            | WireKind::LocalVar
            | WireKind::PriorField => Arity::Fixed(0),
            WireKind::NextState => Arity::Optional,
            WireKind::Negate
            | WireKind::Not
            | WireKind::FieldAccess
            | WireKind::TupleIndex
            | WireKind::FieldAlteration => Arity::Fixed(1),
            WireKind::BinaryArith
            | WireKind::BinaryLogic
            | WireKind::Compare
            | WireKind::SetOp
            | WireKind::SetCompare
            | WireKind::Membership
            | WireKind::Quantifier
            | WireKind::SetFilter
            | WireKind::SetRange
            | WireKind::CaseBranch => Arity::Fixed(2),
            WireKind::IfThenElse => Arity::Fixed(3),
            WireKind::SetLiteral
            | WireKind::TupleLiteral
            | WireKind::RecordLiteral
            | WireKind::StringConcat
            | WireKind::TupleConcat
            | WireKind::ActionCall
            | WireKind::GlobalCall
            | WireKind::BuiltinCall => Arity::Variadic,
            WireKind::RecordUpdate | WireKind::Case => Arity::Grouped,
        }
    }

    /// Whether the kind exists only in the flat form
    pub(crate) fn is_synthetic(&self) -> bool {
        matches!(self, WireKind::FieldAlteration | WireKind::CaseBranch)
    }
}

// ----- reused columns -----

/// Record the member name a parent gives this row (record field, alteration)
pub(crate) fn set_member_name(row: &mut ExpressionRow, name: &str) {
    row.variable_name = Some(name.to_string());
}

pub(crate) fn member_name(row: &ExpressionRow) -> Option<&str> {
    row.variable_name.as_deref()
}

/// Record a node's own name (bound variable or accessed field)
pub(crate) fn set_own_name(row: &mut ExpressionRow, name: &str) {
    row.string_value = Some(name.to_string());
}

/// Node's own name; absent reads as empty
pub(crate) fn own_name(row: &ExpressionRow) -> String {
    row.string_value.clone().unwrap_or_default()
}

/// Flag on a `case` row telling whether its last child is the otherwise arm
pub(crate) fn set_otherwise_present(row: &mut ExpressionRow, present: bool) {
    row.negated = Some(present);
}

pub(crate) fn otherwise_present(row: &ExpressionRow) -> bool {
    row.negated.unwrap_or(false)
}

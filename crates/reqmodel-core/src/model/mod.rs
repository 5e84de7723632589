pub mod expression;
pub mod key;
pub mod step;

pub use expression::{
    ArithOp, CaseBranch, CompareOp, Expression, FieldAlteration, LogicOp, QuantifierKind,
    RecordField, SetCompareOp, SetConstantKind, SetOpKind,
};
pub use key::{Key, KeySegment, KeyType};
pub use step::{LeafAction, LeafStep, Step, StepCase};

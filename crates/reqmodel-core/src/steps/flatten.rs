//! Step tree flattener

use super::columns::{LeafType, StepType};
use super::row::StepRow;
use crate::model::{LeafAction, LeafStep, Step, StepCase};
use crate::tree::NodeKeyMinter;

/// Key family segment for step nodes
pub const NODE_KEY_FAMILY: &str = "step";

enum Pending<'s> {
    Step(&'s Step),
    Case(&'s StepCase),
}

/// Flatten one scenario step tree into rows for `owner_key`
///
/// Node keys are `<owner_key>/step/<n>` in pre-order; every switch case gets
/// its own `case` row holding the guard, with the case's statements below it.
pub fn flatten_steps(owner_key: &str, root: &Step) -> Vec<StepRow> {
    let mut minter = NodeKeyMinter::new(owner_key, NODE_KEY_FAMILY);
    let mut rows = Vec::new();
    let mut stack: Vec<(Pending<'_>, Option<String>, i64)> = vec![(Pending::Step(root), None, 0)];

    while let Some((item, parent, sort_order)) = stack.pop() {
        let node_key = minter.mint();
        let new_row = |step_type: StepType| {
            StepRow::new(owner_key, node_key.clone(), parent.clone(), sort_order, step_type.label())
        };

        let (row, children): (StepRow, Vec<Pending<'_>>) = match item {
            Pending::Step(Step::Sequence { statements }) => (
                new_row(StepType::Sequence),
                statements.iter().map(Pending::Step).collect(),
            ),
            Pending::Step(Step::Switch { cases }) => (
                new_row(StepType::Switch),
                cases.iter().map(Pending::Case).collect(),
            ),
            Pending::Step(Step::Loop {
                condition,
                statements,
            }) => {
                let mut row = new_row(StepType::Loop);
                row.condition = Some(condition.clone());
                (row, statements.iter().map(Pending::Step).collect())
            }
            Pending::Step(Step::Leaf(leaf)) => {
                let mut row = new_row(StepType::Leaf);
                fill_leaf(&mut row, leaf);
                (row, vec![])
            }
            Pending::Case(case) => {
                let mut row = new_row(StepType::Case);
                row.condition = Some(case.condition.clone());
                (row, case.statements.iter().map(Pending::Step).collect())
            }
        };
        rows.push(row);

        stack.extend(
            children
                .into_iter()
                .enumerate()
                .rev()
                .map(|(i, child)| (child, Some(node_key.clone()), i as i64)),
        );
    }

    tracing::debug!(
        owner_key = %owner_key,
        row_count = rows.len(),
        "Flattened step tree"
    );

    rows
}

fn fill_leaf(row: &mut StepRow, leaf: &LeafStep) {
    row.description = Some(leaf.description.clone());
    row.from_object_key = leaf.from_object.as_ref().map(ToString::to_string);
    row.to_object_key = leaf.to_object.as_ref().map(ToString::to_string);
    let leaf_type = match &leaf.action {
        LeafAction::Event(key) => {
            row.event_key = Some(key.to_string());
            LeafType::Event
        }
        LeafAction::Query(key) => {
            row.query_key = Some(key.to_string());
            LeafType::Query
        }
        LeafAction::Scenario(key) => {
            row.scenario_ref_key = Some(key.to_string());
            LeafType::Scenario
        }
        LeafAction::Delete => LeafType::Delete,
    };
    row.leaf_type = Some(leaf_type.label().to_string());
}

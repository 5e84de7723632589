//! Step tree rebuilder

use super::columns::{LeafType, StepType};
use super::row::StepRow;
use crate::errors::Result;
use crate::model::{KeyType, LeafAction, LeafStep, Step, StepCase};
use crate::tree::checks::{self, expect_arity, misplaced, optional_key, required, required_key};
use crate::tree::{rebuild_each, rebuild_owner, OwnerIndex};
use std::collections::BTreeMap;

enum Built {
    Step(Step),
    Case(StepCase),
}

type Child<'a> = (&'a StepRow, Built);

/// Rebuild every owner's step tree found in `rows`
pub fn rebuild_step_trees(rows: &[StepRow]) -> BTreeMap<String, Result<Step>> {
    rebuild_each(rows, rebuild_index)
}

/// Rebuild the step tree of one owner, ignoring rows of other owners
pub fn rebuild_steps(owner_key: &str, rows: &[StepRow]) -> Result<Step> {
    rebuild_owner(owner_key, rows, rebuild_index)
}

fn rebuild_index(index: &OwnerIndex<'_, StepRow>) -> Result<Step> {
    match index.fold(build_node)? {
        Built::Step(step) => Ok(step),
        Built::Case(_) => Err(misplaced(index.root(), "a case cannot be the root")),
    }
}

fn build_node<'a>(row: &'a StepRow, kids: Vec<Child<'a>>) -> Result<Built> {
    let step_type = StepType::from_label(&row.step_type).ok_or_else(|| checks::unknown_kind(row))?;

    let step = match step_type {
        StepType::Sequence => Step::Sequence {
            statements: statements(row, kids)?,
        },
        StepType::Switch => Step::Switch {
            cases: kids
                .into_iter()
                .map(|(kid, built)| match built {
                    Built::Case(case) => Ok(case),
                    Built::Step(_) => Err(misplaced(kid, "switch children must be cases")),
                })
                .collect::<Result<Vec<_>>>()?,
        },
        StepType::Case => {
            return Ok(Built::Case(StepCase {
                condition: row.condition.clone().unwrap_or_default(),
                statements: statements(row, kids)?,
            }))
        }
        StepType::Loop => Step::Loop {
            condition: row.condition.clone().unwrap_or_default(),
            statements: statements(row, kids)?,
        },
        StepType::Leaf => {
            expect_arity(row, 0, kids.len())?;
            Step::Leaf(leaf(row)?)
        }
    };

    Ok(Built::Step(step))
}

fn statements(parent: &StepRow, kids: Vec<Child<'_>>) -> Result<Vec<Step>> {
    kids.into_iter()
        .map(|(kid, built)| match built {
            Built::Step(step) => Ok(step),
            Built::Case(_) => Err(misplaced(
                kid,
                format!("a case belongs under a switch, not a {}", parent.step_type),
            )),
        })
        .collect()
}

fn leaf(row: &StepRow) -> Result<LeafStep> {
    let label = required(row, "leaf_type", row.leaf_type.as_deref())?;
    let leaf_type = LeafType::from_label(label).ok_or_else(|| {
        checks::invalid_payload(row, "leaf_type", format!("unknown leaf type '{label}'"))
    })?;

    let action = match leaf_type {
        LeafType::Event => LeafAction::Event(required_key(
            row,
            "event_key",
            row.event_key.as_deref(),
            KeyType::Event,
        )?),
        LeafType::Query => LeafAction::Query(required_key(
            row,
            "query_key",
            row.query_key.as_deref(),
            KeyType::Query,
        )?),
        LeafType::Scenario => LeafAction::Scenario(required_key(
            row,
            "scenario_ref_key",
            row.scenario_ref_key.as_deref(),
            KeyType::Scenario,
        )?),
        LeafType::Delete => LeafAction::Delete,
    };

    Ok(LeafStep {
        description: row.description.clone().unwrap_or_default(),
        from_object: optional_key(
            row,
            "from_object_key",
            row.from_object_key.as_deref(),
            KeyType::Object,
        )?,
        to_object: optional_key(
            row,
            "to_object_key",
            row.to_object_key.as_deref(),
            KeyType::Object,
        )?,
        action,
    })
}

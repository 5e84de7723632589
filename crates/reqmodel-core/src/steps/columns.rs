//! Wire discriminators for step rows

/// Value stored in `step_type`
///
/// `Case` exists only in rows: in memory a case is owned by its switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepType {
    Sequence,
    Switch,
    Case,
    Loop,
    Leaf,
}

impl StepType {
    pub(crate) const ALL: [StepType; 5] = [
        StepType::Sequence,
        StepType::Switch,
        StepType::Case,
        StepType::Loop,
        StepType::Leaf,
    ];

    pub(crate) fn label(&self) -> &'static str {
        match self {
            StepType::Sequence => "sequence",
            StepType::Switch => "switch",
            StepType::Case => "case",
            StepType::Loop => "loop",
            StepType::Leaf => "leaf",
        }
    }

    pub(crate) fn from_label(label: &str) -> Option<StepType> {
        StepType::ALL.into_iter().find(|t| t.label() == label)
    }
}

/// Value stored in `leaf_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LeafType {
    Event,
    Query,
    Scenario,
    Delete,
}

impl LeafType {
    pub(crate) const ALL: [LeafType; 4] = [
        LeafType::Event,
        LeafType::Query,
        LeafType::Scenario,
        LeafType::Delete,
    ];

    pub(crate) fn label(&self) -> &'static str {
        match self {
            LeafType::Event => "event",
            LeafType::Query => "query",
            LeafType::Scenario => "scenario",
            LeafType::Delete => "delete",
        }
    }

    pub(crate) fn from_label(label: &str) -> Option<LeafType> {
        LeafType::ALL.into_iter().find(|t| t.label() == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_back() {
        for t in StepType::ALL {
            assert_eq!(StepType::from_label(t.label()), Some(t));
        }
        for t in LeafType::ALL {
            assert_eq!(LeafType::from_label(t.label()), Some(t));
        }
        assert_eq!(StepType::from_label("parallel"), None);
        assert_eq!(LeafType::from_label("Event"), None);
    }
}

//! Adjacency-list indexing shared by every tree family
//!
//! Rows scanned back out of storage arrive in no particular order. This
//! module groups them by owner, validates the adjacency invariants (one root,
//! unique node keys, parents present, unique sibling order, every row
//! reachable) and folds the tree bottom-up with an explicit work list, so
//! nesting depth never turns into native stack depth.

use crate::errors::{Result, TreeError};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Columns every flattened tree row carries
pub trait AdjacencyRow {
    fn owner_key(&self) -> &str;
    fn node_key(&self) -> &str;
    fn parent_node_key(&self) -> Option<&str>;
    fn sort_order(&self) -> i64;
    /// Stored kind discriminator, used in error reports
    fn kind_label(&self) -> &str;
}

/// Group rows by owner key
///
/// Owners come back in key order so multi-owner results are deterministic.
pub fn group_by_owner<R: AdjacencyRow>(rows: &[R]) -> BTreeMap<&str, Vec<&R>> {
    let mut groups: BTreeMap<&str, Vec<&R>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.owner_key()).or_default().push(row);
    }
    groups
}

/// Validated rows of a single owner
#[derive(Debug)]
pub struct OwnerIndex<'a, R> {
    owner_key: &'a str,
    children: HashMap<&'a str, Vec<&'a R>>,
    preorder: Vec<&'a R>,
}

impl<'a, R: AdjacencyRow> OwnerIndex<'a, R> {
    /// Index one owner's rows, rejecting anything that is not a single tree
    pub fn build(owner_key: &'a str, rows: Vec<&'a R>) -> Result<Self> {
        if rows.is_empty() {
            return Err(TreeError::OwnerNotFound {
                owner_key: owner_key.to_string(),
            });
        }

        let roots: Vec<&'a R> = rows
            .iter()
            .copied()
            .filter(|r| r.parent_node_key().is_none())
            .collect();
        if roots.len() != 1 {
            return Err(TreeError::RootCount {
                owner_key: owner_key.to_string(),
                count: roots.len(),
            });
        }
        let root = roots[0];

        let mut by_key: HashMap<&'a str, &'a R> = HashMap::with_capacity(rows.len());
        for row in &rows {
            if by_key.insert(row.node_key(), *row).is_some() {
                return Err(TreeError::DuplicateNodeKey {
                    owner_key: owner_key.to_string(),
                    node_key: row.node_key().to_string(),
                });
            }
        }

        let mut children: HashMap<&'a str, Vec<&'a R>> = HashMap::new();
        for row in &rows {
            if let Some(parent) = row.parent_node_key() {
                if !by_key.contains_key(parent) {
                    return Err(TreeError::DanglingParent {
                        owner_key: owner_key.to_string(),
                        node_key: row.node_key().to_string(),
                        parent_node_key: parent.to_string(),
                    });
                }
                children.entry(parent).or_default().push(*row);
            }
        }

        for (parent, siblings) in children.iter_mut() {
            siblings.sort_by_key(|r| r.sort_order());
            if let Some(pair) = siblings
                .windows(2)
                .find(|w| w[0].sort_order() == w[1].sort_order())
            {
                return Err(TreeError::DuplicateSortOrder {
                    owner_key: owner_key.to_string(),
                    parent_node_key: parent.to_string(),
                    sort_order: pair[0].sort_order(),
                });
            }
        }

        let mut preorder = Vec::with_capacity(rows.len());
        let mut stack = vec![root];
        while let Some(row) = stack.pop() {
            preorder.push(row);
            if let Some(kids) = children.get(row.node_key()) {
                stack.extend(kids.iter().rev().copied());
            }
        }

        // Every non-root row has a present parent, so anything left over
        // belongs to a parent cycle detached from the root.
        if preorder.len() != rows.len() {
            let seen: HashSet<&str> = preorder.iter().map(|r| r.node_key()).collect();
            let stray = rows
                .iter()
                .find(|r| !seen.contains(r.node_key()))
                .map(|r| r.node_key().to_string())
                .unwrap_or_default();
            return Err(TreeError::UnreachableNode {
                owner_key: owner_key.to_string(),
                node_key: stray,
            });
        }

        Ok(Self {
            owner_key,
            children,
            preorder,
        })
    }

    pub fn owner_key(&self) -> &'a str {
        self.owner_key
    }

    pub fn root(&self) -> &'a R {
        self.preorder[0]
    }

    /// Children of a node, ordered by sort order
    pub fn children_of(&self, node_key: &str) -> &[&'a R] {
        self.children
            .get(node_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.preorder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preorder.is_empty()
    }

    /// Rebuild the tree bottom-up
    ///
    /// `build` is called once per row, after all of the row's descendants,
    /// with the row and its children's built values in sort order.
    pub fn fold<T, F>(&self, mut build: F) -> Result<T>
    where
        F: FnMut(&'a R, Vec<(&'a R, T)>) -> Result<T>,
    {
        let mut built: HashMap<&'a str, T> = HashMap::with_capacity(self.preorder.len());
        for row in self.preorder.iter().rev().copied() {
            let kids = self.children_of(row.node_key());
            let mut values = Vec::with_capacity(kids.len());
            for &kid in kids {
                let value = built.remove(kid.node_key()).ok_or_else(|| TreeError::Internal {
                    message: format!("child {} folded out of order", kid.node_key()),
                })?;
                values.push((kid, value));
            }
            let value = build(row, values)?;
            built.insert(row.node_key(), value);
        }

        built
            .remove(self.root().node_key())
            .ok_or_else(|| TreeError::Internal {
                message: format!("root of owner {} was not folded", self.owner_key),
            })
    }
}

/// Rebuild every owner present in `rows` independently
///
/// A malformed owner yields an `Err` entry without affecting the others.
pub fn rebuild_each<R, T, F>(rows: &[R], mut rebuild: F) -> BTreeMap<String, Result<T>>
where
    R: AdjacencyRow,
    F: FnMut(&OwnerIndex<'_, R>) -> Result<T>,
{
    group_by_owner(rows)
        .into_iter()
        .map(|(owner, owner_rows)| {
            let result = OwnerIndex::build(owner, owner_rows).and_then(|index| rebuild(&index));
            if let Err(err) = &result {
                tracing::debug!(owner_key = %owner, error = %err, "Tree reconstruction failed");
            }
            (owner.to_string(), result)
        })
        .collect()
}

/// Rebuild a single owner's tree out of a row set that may hold others
pub fn rebuild_owner<R, T, F>(owner_key: &str, rows: &[R], rebuild: F) -> Result<T>
where
    R: AdjacencyRow,
    F: FnOnce(&OwnerIndex<'_, R>) -> Result<T>,
{
    let owner_rows: Vec<&R> = rows.iter().filter(|r| r.owner_key() == owner_key).collect();
    let index = OwnerIndex::build(owner_key, owner_rows)?;
    rebuild(&index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Row {
        owner: &'static str,
        key: &'static str,
        parent: Option<&'static str>,
        sort: i64,
    }

    impl AdjacencyRow for Row {
        fn owner_key(&self) -> &str {
            self.owner
        }
        fn node_key(&self) -> &str {
            self.key
        }
        fn parent_node_key(&self) -> Option<&str> {
            self.parent
        }
        fn sort_order(&self) -> i64 {
            self.sort
        }
        fn kind_label(&self) -> &str {
            "test"
        }
    }

    fn row(key: &'static str, parent: Option<&'static str>, sort: i64) -> Row {
        Row {
            owner: "o",
            key,
            parent,
            sort,
        }
    }

    fn render(index: &OwnerIndex<'_, Row>) -> String {
        index
            .fold(|row, kids| {
                let inner: Vec<String> = kids.into_iter().map(|(_, s)| s).collect();
                Ok(if inner.is_empty() {
                    row.key.to_string()
                } else {
                    format!("{}({})", row.key, inner.join(","))
                })
            })
            .unwrap()
    }

    #[test]
    fn test_fold_orders_children_by_sort_order() {
        let rows = vec![
            row("c", Some("r"), 2),
            row("a", Some("r"), 0),
            row("r", None, 0),
            row("b", Some("r"), 1),
            row("a1", Some("a"), 0),
        ];
        let index = OwnerIndex::build("o", rows.iter().collect()).unwrap();
        assert_eq!(index.len(), 5);
        assert_eq!(render(&index), "r(a(a1),b,c)");
    }

    #[test]
    fn test_two_roots_rejected() {
        let rows = vec![row("r", None, 0), row("s", None, 0)];
        let err = OwnerIndex::build("o", rows.iter().collect()).unwrap_err();
        assert_eq!(
            err,
            TreeError::RootCount {
                owner_key: "o".to_string(),
                count: 2
            }
        );
    }

    #[test]
    fn test_no_root_rejected() {
        let rows = vec![row("a", Some("b"), 0), row("b", Some("a"), 0)];
        let err = OwnerIndex::build("o", rows.iter().collect()).unwrap_err();
        assert!(matches!(err, TreeError::RootCount { count: 0, .. }));
    }

    #[test]
    fn test_duplicate_sort_order_rejected() {
        let rows = vec![
            row("r", None, 0),
            row("a", Some("r"), 0),
            row("b", Some("r"), 0),
        ];
        let err = OwnerIndex::build("o", rows.iter().collect()).unwrap_err();
        assert!(matches!(err, TreeError::DuplicateSortOrder { sort_order: 0, .. }));
    }

    #[test]
    fn test_dangling_parent_rejected() {
        let rows = vec![row("r", None, 0), row("a", Some("ghost"), 0)];
        let err = OwnerIndex::build("o", rows.iter().collect()).unwrap_err();
        assert!(matches!(err, TreeError::DanglingParent { .. }));
    }

    #[test]
    fn test_detached_cycle_rejected() {
        let rows = vec![
            row("r", None, 0),
            row("a", Some("b"), 0),
            row("b", Some("a"), 0),
        ];
        let err = OwnerIndex::build("o", rows.iter().collect()).unwrap_err();
        assert!(matches!(err, TreeError::UnreachableNode { .. }));
    }

    #[test]
    fn test_duplicate_node_key_rejected() {
        let rows = vec![row("r", None, 0), row("a", Some("r"), 0), row("a", Some("r"), 1)];
        let err = OwnerIndex::build("o", rows.iter().collect()).unwrap_err();
        assert!(matches!(err, TreeError::DuplicateNodeKey { .. }));
    }

    #[test]
    fn test_rebuild_each_isolates_owners() {
        let rows = vec![
            Row {
                owner: "good",
                key: "g",
                parent: None,
                sort: 0,
            },
            Row {
                owner: "bad",
                key: "b1",
                parent: None,
                sort: 0,
            },
            Row {
                owner: "bad",
                key: "b2",
                parent: None,
                sort: 0,
            },
        ];
        let results = rebuild_each(&rows, |index| Ok(index.root().key.to_string()));
        assert_eq!(results.len(), 2);
        assert_eq!(results["good"], Ok("g".to_string()));
        assert!(matches!(results["bad"], Err(TreeError::RootCount { count: 2, .. })));
    }

    #[test]
    fn test_rebuild_owner_not_found() {
        let rows = vec![row("r", None, 0)];
        let err = rebuild_owner("missing", &rows, |index| Ok(index.len())).unwrap_err();
        assert!(matches!(err, TreeError::OwnerNotFound { .. }));
    }
}

//! # Dependency Closure
//!
//! A directed "requires" graph over checkbox choices, and the two propagation
//! rules the dependency-aware checkbox applies after every toggle:
//!
//! - checking a choice checks everything it requires, transitively;
//! - unchecking a choice unchecks everything that requires it, transitively.
//!
//! The graph may contain cycles. Propagation walks an explicit work-list with
//! a visited set scoped to one call, so it terminates on any graph and its
//! stack depth does not grow with graph size.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::core::error::BuildError;

#[derive(Debug, Clone)]
pub struct DependencyGraph {
    choices: Vec<String>,
    /// Forward edges, in declaration order.
    requires: Vec<Vec<usize>>,
    /// Reverse index of `requires`.
    required_by: Vec<BTreeSet<usize>>,
}

impl DependencyGraph {
    /// Build from `(choice, [required choices…])` pairs. Choice order is the
    /// display order.
    ///
    /// Fails with every `(choice, missing dependency)` pair if any requirement
    /// names a choice that is not declared, and with
    /// [`BuildError::DuplicateChoice`] if a label is declared twice.
    pub fn new<C, D>(tree: impl IntoIterator<Item = (C, Vec<D>)>) -> Result<Self, BuildError>
    where
        C: Into<String>,
        D: Into<String>,
    {
        let tree: Vec<(String, Vec<String>)> = tree
            .into_iter()
            .map(|(c, deps)| (c.into(), deps.into_iter().map(Into::into).collect()))
            .collect();

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(tree.len());
        for (i, (choice, _)) in tree.iter().enumerate() {
            if index.insert(choice.as_str(), i).is_some() {
                log::warn!("dependency tree declares {choice:?} twice");
                return Err(BuildError::DuplicateChoice(choice.clone()));
            }
        }

        let mut missing = Vec::new();
        let mut requires = vec![Vec::new(); tree.len()];
        let mut required_by = vec![BTreeSet::new(); tree.len()];
        for (owner, (choice, deps)) in tree.iter().enumerate() {
            for dep in deps {
                match index.get(dep.as_str()) {
                    Some(&d) => {
                        if !requires[owner].contains(&d) {
                            requires[owner].push(d);
                        }
                        required_by[d].insert(owner);
                    }
                    None => missing.push((choice.clone(), dep.clone())),
                }
            }
        }

        if !missing.is_empty() {
            log::warn!("dependency tree references {} undeclared choices", missing.len());
            return Err(BuildError::MissingDependencies(missing));
        }

        let choices = tree.into_iter().map(|(c, _)| c).collect();
        Ok(Self {
            choices,
            requires,
            required_by,
        })
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn requires(&self, node: usize) -> &[usize] {
        &self.requires[node]
    }

    pub fn required_by(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.required_by[node].iter().copied()
    }

    /// Apply the propagation rule matching `checked[node]`'s current value.
    /// Returns the indices whose flag changed, not counting `node` itself.
    pub fn propagate(&self, checked: &mut [bool], node: usize) -> Vec<usize> {
        if checked[node] {
            self.check_requirements(checked, node)
        } else {
            self.uncheck_dependants(checked, node)
        }
    }

    /// Check everything `node` requires, directly or transitively.
    pub fn check_requirements(&self, checked: &mut [bool], node: usize) -> Vec<usize> {
        self.walk(checked, node, true, |n| self.requires[n].iter().copied().collect())
    }

    /// Uncheck everything that requires `node`, directly or transitively.
    pub fn uncheck_dependants(&self, checked: &mut [bool], node: usize) -> Vec<usize> {
        self.walk(checked, node, false, |n| self.required_by(n).collect())
    }

    fn walk(
        &self,
        checked: &mut [bool],
        start: usize,
        value: bool,
        next: impl Fn(usize) -> Vec<usize>,
    ) -> Vec<usize> {
        let mut changed = Vec::new();
        let mut visited = HashSet::from([start]);
        let mut work = vec![start];
        while let Some(node) = work.pop() {
            for n in next(node) {
                if !visited.insert(n) {
                    continue;
                }
                if checked[n] != value {
                    checked[n] = value;
                    changed.push(n);
                }
                work.push(n);
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(tree: Vec<(&str, Vec<&str>)>) -> Result<DependencyGraph, BuildError> {
        DependencyGraph::new(tree)
    }

    fn checked_names(g: &DependencyGraph, checked: &[bool]) -> Vec<String> {
        g.choices()
            .iter()
            .zip(checked)
            .filter(|(_, on)| **on)
            .map(|(c, _)| c.clone())
            .collect()
    }

    #[test]
    fn test_missing_dependency_is_reported() {
        let err = graph(vec![("A", vec!["B"]), ("C", vec![])]).unwrap_err();
        match err {
            BuildError::MissingDependencies(pairs) => {
                assert_eq!(pairs, vec![("A".to_string(), "B".to_string())]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_every_missing_pair_is_reported() {
        let err = graph(vec![("A", vec!["X", "B"]), ("B", vec!["Y"]), ("C", vec!["Z"])]).unwrap_err();
        let BuildError::MissingDependencies(pairs) = err else {
            panic!("expected MissingDependencies");
        };
        assert_eq!(pairs.len(), 3);
        assert!(pairs.contains(&("A".to_string(), "X".to_string())));
        assert!(pairs.contains(&("B".to_string(), "Y".to_string())));
        assert!(pairs.contains(&("C".to_string(), "Z".to_string())));
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let err = graph(vec![("A", vec![]), ("B", vec!["A"]), ("A", vec!["B"])]).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateChoice(ref label) if label == "A"));
    }

    #[test]
    fn test_check_is_transitive() {
        let g = graph(vec![
            ("A", vec!["C", "D"]),
            ("B", vec!["A", "E"]),
            ("C", vec![]),
            ("D", vec!["C"]),
            ("E", vec!["B"]),
        ])
        .unwrap();
        let mut checked = vec![false; g.len()];
        checked[0] = true;
        g.propagate(&mut checked, 0);
        assert_eq!(checked_names(&g, &checked), vec!["A", "C", "D"]);
    }

    #[test]
    fn test_uncheck_removes_dependants() {
        let g = graph(vec![("A", vec!["C"]), ("B", vec!["A"]), ("C", vec![]), ("D", vec![])]).unwrap();
        let mut checked = vec![true; g.len()];
        checked[2] = false;
        let changed = g.propagate(&mut checked, 2);
        assert_eq!(checked_names(&g, &checked), vec!["D"]);
        assert_eq!(changed.len(), 2);
    }

    #[test]
    fn test_cycle_terminates_and_checks_both() {
        let g = graph(vec![("A", vec!["B"]), ("B", vec!["A"])]).unwrap();
        let mut checked = vec![false; 2];
        checked[0] = true;
        g.propagate(&mut checked, 0);
        assert_eq!(checked, vec![true, true]);

        checked[1] = false;
        g.propagate(&mut checked, 1);
        assert_eq!(checked, vec![false, false]);
    }

    #[test]
    fn test_check_is_idempotent() {
        let g = graph(vec![("A", vec!["B"]), ("B", vec!["C"]), ("C", vec![])]).unwrap();
        let mut checked = vec![false; 3];
        checked[0] = true;
        g.propagate(&mut checked, 0);
        let first = checked.clone();
        let changed = g.propagate(&mut checked, 0);
        assert_eq!(checked, first);
        assert!(changed.is_empty());
    }

    #[test]
    fn test_reverse_index() {
        let g = graph(vec![("A", vec!["C"]), ("B", vec!["C"]), ("C", vec![])]).unwrap();
        assert_eq!(g.required_by(2).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(g.requires(0), &[2]);
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let names: Vec<String> = (0..20_000).map(|i| format!("n{i}")).collect();
        let tree = names.iter().enumerate().map(|(i, n)| {
            let deps = names.get(i + 1).cloned().into_iter().collect::<Vec<_>>();
            (n.clone(), deps)
        });
        let g = DependencyGraph::new(tree).unwrap();
        let mut checked = vec![false; g.len()];
        checked[0] = true;
        g.propagate(&mut checked, 0);
        assert!(checked.iter().all(|c| *c));
    }
}

//! Objective forest reconstruction.
//!
//! Remote goal records only carry a reference to their parent, and the name
//! of that reference field varies between datasets. The builder picks the
//! field from a configured priority list, links children to parents, and
//! walks the resulting forest depth-first to assign levels and dotted indices.

use crate::config::HierarchyConfig;
use crate::model::Objective;
use std::collections::{HashMap, HashSet};

/// Rebuilds parent/child structure over a flat list of objectives.
#[derive(Debug, Clone)]
pub struct HierarchyBuilder {
    parent_fields: Vec<String>,
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new(&HierarchyConfig::default())
    }
}

impl HierarchyBuilder {
    pub fn new(config: &HierarchyConfig) -> Self {
        Self {
            parent_fields: config.parent_fields.clone(),
        }
    }

    /// Returns the first configured parent field populated on any objective.
    pub fn detect_parent_field(&self, objectives: &[Objective]) -> Option<&str> {
        self.parent_fields
            .iter()
            .find(|field| {
                objectives.iter().any(|o| {
                    o.parent_fields
                        .get(field.as_str())
                        .is_some_and(|v| !v.trim().is_empty())
                })
            })
            .map(String::as_str)
    }

    /// Links `objectives` into a forest and returns them in depth-first order.
    ///
    /// - Roots are objectives without a parent reference, plus objectives
    ///   whose parent is not in the set (flagged `is_orphan`).
    /// - `level` is 0 for roots and parent level + 1 below.
    /// - `hierarchical_index` is the 1-based sibling path, e.g. `"2.1.3"`.
    /// - Objectives only reachable through a parent cycle are promoted to
    ///   roots (flagged `cycle_break`); nothing is ever dropped.
    /// - Duplicate IDs keep their first occurrence.
    pub fn build(&self, objectives: Vec<Objective>) -> Vec<Objective> {
        let field = self.detect_parent_field(&objectives).map(str::to_string);
        match field.as_deref() {
            Some(name) => tracing::debug!("[HierarchyBuilder] Using parent field '{}'", name),
            None => tracing::debug!("[HierarchyBuilder] No parent field populated, flat hierarchy"),
        }

        let mut seen = HashSet::new();
        let mut nodes: Vec<Objective> = Vec::with_capacity(objectives.len());
        for mut objective in objectives {
            if !seen.insert(objective.id.clone()) {
                tracing::warn!(
                    "[HierarchyBuilder] Duplicate objective '{}' ignored",
                    objective.id
                );
                continue;
            }
            objective.parent_id = field.as_deref().and_then(|f| {
                objective
                    .parent_fields
                    .get(f)
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
            });
            objective.children.clear();
            objective.level = 0;
            objective.hierarchical_index.clear();
            objective.is_orphan = false;
            objective.cycle_break = false;
            nodes.push(objective);
        }

        let position: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, o)| (o.id.as_str(), i))
            .collect();

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        let mut roots = Vec::new();
        let mut orphans = Vec::new();
        for (i, objective) in nodes.iter().enumerate() {
            match objective.parent_id.as_deref() {
                None => roots.push(i),
                Some(parent) => match position.get(parent) {
                    Some(&p) => children[p].push(i),
                    None => {
                        roots.push(i);
                        orphans.push(i);
                    }
                },
            }
        }
        drop(position);

        for &i in &orphans {
            nodes[i].is_orphan = true;
            tracing::warn!(
                "[HierarchyBuilder] Objective '{}' references parent '{}' outside the current set; treating as root",
                nodes[i].id,
                nodes[i].parent_id.as_deref().unwrap_or_default()
            );
        }

        let mut walk = Walk::new(nodes.len());
        for root in roots {
            walk.visit_root(root, &children, &mut nodes);
        }

        // Anything left is only reachable through a cycle.
        for i in 0..nodes.len() {
            if !walk.visited[i] {
                tracing::warn!(
                    "[HierarchyBuilder] Objective '{}' is part of a parent cycle; promoting to root",
                    nodes[i].id
                );
                nodes[i].cycle_break = true;
                walk.visit_root(i, &children, &mut nodes);
            }
        }

        let mut slots: Vec<Option<Objective>> = nodes.into_iter().map(Some).collect();
        walk.order
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect()
    }
}

/// Depth-first traversal state shared across all roots.
struct Walk {
    visited: Vec<bool>,
    order: Vec<usize>,
    root_count: usize,
}

impl Walk {
    fn new(len: usize) -> Self {
        Self {
            visited: vec![false; len],
            order: Vec::with_capacity(len),
            root_count: 0,
        }
    }

    fn visit_root(&mut self, root: usize, children: &[Vec<usize>], nodes: &mut [Objective]) {
        if self.visited[root] {
            return;
        }
        self.root_count += 1;
        self.visited[root] = true;
        nodes[root].level = 0;
        nodes[root].hierarchical_index = self.root_count.to_string();

        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            self.order.push(current);

            let fresh: Vec<usize> = children[current]
                .iter()
                .copied()
                .filter(|&c| !self.visited[c])
                .collect();

            let level = nodes[current].level + 1;
            let prefix = nodes[current].hierarchical_index.clone();
            for (n, &child) in fresh.iter().enumerate() {
                self.visited[child] = true;
                nodes[child].level = level;
                nodes[child].hierarchical_index = format!("{}.{}", prefix, n + 1);
            }
            let child_ids: Vec<String> = fresh.iter().map(|&c| nodes[c].id.clone()).collect();
            nodes[current].children = child_ids;

            stack.extend(fresh.into_iter().rev());
        }
    }
}

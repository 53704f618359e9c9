//! Dependency graph for requirement evaluation ordering.

use std::collections::{BTreeSet, HashMap};

use crate::error::{Result, RigupError};

/// Dependency relationships between requirements.
///
/// Nodes keep their declaration order, which is used to break ties so that
/// ordering is reproducible run to run.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Node names in declaration order.
    names: Vec<String>,
    /// Direct dependencies of each node, in declared order, deduplicated.
    dependencies: Vec<Vec<usize>>,
    /// Nodes that directly depend on each node.
    dependents: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Create a new dependency graph builder.
    pub fn builder() -> DependencyGraphBuilder {
        DependencyGraphBuilder::new()
    }

    /// Returns nodes in topological order (dependencies before dependents).
    ///
    /// Among nodes that are ready at the same time, the one declared first
    /// comes first. Returns `CyclicDependency` if a cycle exists.
    pub fn topological_order(&self) -> Result<Vec<String>> {
        let mut in_degree: Vec<usize> = self.dependencies.iter().map(Vec::len).collect();

        let mut ready: BTreeSet<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &degree)| degree == 0)
            .map(|(idx, _)| idx)
            .collect();

        let mut result = Vec::with_capacity(self.names.len());

        while let Some(idx) = ready.pop_first() {
            result.push(self.names[idx].clone());

            for &dependent in &self.dependents[idx] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if result.len() != self.names.len() {
            let cycle = self.find_cycle().unwrap_or_else(|| {
                in_degree
                    .iter()
                    .enumerate()
                    .filter(|(_, &d)| d > 0)
                    .map(|(idx, _)| self.names[idx].clone())
                    .collect()
            });
            return Err(RigupError::CyclicDependency {
                cycle: cycle.join(" -> "),
            });
        }

        Ok(result)
    }

    /// Find a cycle in the graph, returning the path if one exists.
    ///
    /// The path starts and ends on the same node, e.g. `[a, b, a]`.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Unvisited,
            Visiting,
            Visited,
        }

        fn dfs(
            node: usize,
            graph: &DependencyGraph,
            state: &mut [State],
            path: &mut Vec<usize>,
        ) -> Option<Vec<String>> {
            state[node] = State::Visiting;
            path.push(node);

            for &dep in &graph.dependencies[node] {
                match state[dep] {
                    State::Visiting => {
                        let start = path.iter().position(|&n| n == dep).unwrap_or(0);
                        let mut cycle: Vec<String> = path[start..]
                            .iter()
                            .map(|&n| graph.names[n].clone())
                            .collect();
                        cycle.push(graph.names[dep].clone());
                        return Some(cycle);
                    }
                    State::Unvisited => {
                        if let Some(cycle) = dfs(dep, graph, state, path) {
                            return Some(cycle);
                        }
                    }
                    State::Visited => {}
                }
            }

            path.pop();
            state[node] = State::Visited;
            None
        }

        let mut state = vec![State::Unvisited; self.names.len()];
        let mut path = Vec::new();

        for node in 0..self.names.len() {
            if state[node] == State::Unvisited {
                if let Some(cycle) = dfs(node, self, &mut state, &mut path) {
                    return Some(cycle);
                }
            }
        }

        None
    }
}

/// Builder for constructing a [`DependencyGraph`].
#[derive(Debug, Default)]
pub struct DependencyGraphBuilder {
    nodes: Vec<(String, Vec<String>)>,
}

impl DependencyGraphBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with its dependencies.
    ///
    /// Adding the same name twice merges the dependency lists and keeps the
    /// first declaration position.
    pub fn add_node(mut self, name: impl Into<String>, depends_on: Vec<String>) -> Self {
        let name = name.into();
        if let Some((_, deps)) = self.nodes.iter_mut().find(|(n, _)| *n == name) {
            deps.extend(depends_on);
        } else {
            self.nodes.push((name, depends_on));
        }
        self
    }

    /// Build the dependency graph.
    ///
    /// Returns `UnknownDependency` if any dependency references a node that
    /// was never added.
    pub fn build(self) -> Result<DependencyGraph> {
        let names: Vec<String> = self.nodes.iter().map(|(n, _)| n.clone()).collect();
        let index: HashMap<String, usize> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();

        let mut dependencies = vec![Vec::new(); names.len()];
        let mut dependents = vec![Vec::new(); names.len()];

        for (idx, (name, deps)) in self.nodes.iter().enumerate() {
            for dep in deps {
                let Some(&dep_idx) = index.get(dep) else {
                    return Err(RigupError::UnknownDependency {
                        requirement: name.clone(),
                        dependency: dep.clone(),
                    });
                };
                if !dependencies[idx].contains(&dep_idx) {
                    dependencies[idx].push(dep_idx);
                    dependents[dep_idx].push(idx);
                }
            }
        }

        Ok(DependencyGraph {
            names,
            dependencies,
            dependents,
        })
    }
}

//! A petgraph view of a finished plan, for dependency tree rendering.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::plan::Plan;

/// A node in the plan graph.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct PlanNode {
    pub name: String,
    pub ident: String,
}

impl fmt::Display for PlanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ident)
    }
}

/// The dependency graph over a plan's packages. Edges point from a
/// package to the dependencies the plan fulfills for it; constraints
/// satisfied by installed packages have no node and no edge.
pub struct PlanGraph {
    graph: DiGraph<PlanNode, ()>,
    index: HashMap<String, NodeIndex>,
}

impl PlanGraph {
    pub fn from_plan(plan: &Plan, platform_tags: &BTreeSet<String>) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        for package in plan.packages() {
            let idx = graph.add_node(PlanNode {
                name: package.name().to_string(),
                ident: package.ident(),
            });
            index.insert(package.name().to_string(), idx);
        }
        for package in plan.packages() {
            let Some(&from) = index.get(package.name()) else {
                continue;
            };
            for dep in package.deps_for(platform_tags) {
                if let Some(&to) = index.get(dep.name()) {
                    if !graph.edges(from).any(|e| e.target() == to) {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }
        Self { graph, index }
    }

    /// Look up a node by package name.
    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &PlanNode {
        &self.graph[idx]
    }

    /// Direct dependencies of a node.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| e.target())
            .collect()
    }

    /// Nodes no planned package depends on (the resolve targets).
    pub fn roots(&self) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .edges_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Render the plan as a dependency tree, one root per resolve
    /// target.
    pub fn print_tree(&self) -> String {
        let mut output = String::new();
        for root in self.roots() {
            output.push_str(&format!("{}\n", self.graph[root]));
            let mut visited = HashSet::new();
            visited.insert(root);
            let deps = self.dependencies_of(root);
            let count = deps.len();
            for (i, child) in deps.iter().enumerate() {
                self.print_subtree(&mut output, *child, "", i == count - 1, &mut visited);
            }
        }
        output
    }

    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", self.graph[idx]));

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let deps = self.dependencies_of(idx);
        let count = deps.len();
        for (i, child) in deps.iter().enumerate() {
            self.print_subtree(output, *child, &child_prefix, i == count - 1, visited);
        }

        visited.remove(&idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brig_core::manifest::{DepEntry, PackageRecord};
    use brig_core::package::Package;
    use brig_core::platform::default_platform_tags;

    fn pkg(name: &str, version: &str, deps: &[&str]) -> Package {
        PackageRecord {
            name: name.to_string(),
            version: version.to_string(),
            deps: deps.iter().map(|d| DepEntry::Spec(d.to_string())).collect(),
            platforms: vec![],
        }
        .into_package()
        .unwrap()
    }

    #[test]
    fn edges_follow_plan_deps() {
        let plan = Plan::new(vec![
            pkg("b", "1.0-0", &[]),
            pkg("a", "1.0-0", &["b"]),
        ]);
        let graph = PlanGraph::from_plan(&plan, &default_platform_tags());
        assert_eq!(graph.len(), 2);

        let a = graph.find("a").unwrap();
        let deps = graph.dependencies_of(a);
        assert_eq!(deps.len(), 1);
        assert_eq!(graph.node(deps[0]).name, "b");
    }

    #[test]
    fn roots_are_unreferenced_nodes() {
        let plan = Plan::new(vec![
            pkg("b", "1.0-0", &[]),
            pkg("a", "1.0-0", &["b"]),
        ]);
        let graph = PlanGraph::from_plan(&plan, &default_platform_tags());
        let roots = graph.roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(graph.node(roots[0]).name, "a");
    }

    #[test]
    fn installed_deps_have_no_edge() {
        // "c" was satisfied by the installed set, so it is absent from
        // the plan and from the graph.
        let plan = Plan::new(vec![pkg("a", "1.0-0", &["c"])]);
        let graph = PlanGraph::from_plan(&plan, &default_platform_tags());
        assert_eq!(graph.len(), 1);
        assert!(graph.find("c").is_none());
        assert!(graph.dependencies_of(graph.find("a").unwrap()).is_empty());
    }

    #[test]
    fn tree_rendering() {
        let plan = Plan::new(vec![
            pkg("c", "2.1", &[]),
            pkg("b", "1.0-0", &["c"]),
            pkg("a", "1.0-0", &["b", "c"]),
        ]);
        let graph = PlanGraph::from_plan(&plan, &default_platform_tags());
        let tree = graph.print_tree();
        assert!(tree.contains("a-1.0-0"));
        assert!(tree.contains("├── "));
        assert!(tree.contains("└── c-2.1-0"));
    }
}

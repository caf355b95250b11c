//! Topologische utilities.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::{Graph, node::NodeId};

/// Resultaat van een topologische sortering.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Topology {
    pub order: Vec<NodeId>,
}

/// Fouttype voor topologische sortering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// De graph bevat een cyclus. Bevat een pad dat de cyclus illustreert.
    Cycle { cycle: Vec<NodeId> },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cycle { cycle } => {
                if cycle.is_empty() {
                    f.write_str("graph bevat een cyclus")
                } else {
                    let chain = cycle
                        .iter()
                        .map(|NodeId(id)| id.to_string())
                        .collect::<Vec<_>>()
                        .join(" -> ");
                    write!(f, "graph bevat een cyclus: {chain}")
                }
            }
        }
    }
}

impl std::error::Error for TopologyError {}

impl Topology {
    /// Construeert een lege topologie.
    #[must_use]
    pub fn empty() -> Self {
        Self { order: Vec::new() }
    }

    /// Kahn-sortering over verbindingen, operatiereferenties en expliciete
    /// volgorde-eisen. Bij gelijke stand gaat het laagste id voor, zodat de
    /// volgorde van opbouwen zoveel mogelijk behouden blijft.
    pub fn sort(graph: &Graph) -> Result<Self, TopologyError> {
        if graph.node_count() == 0 {
            return Ok(Self::empty());
        }

        let adjacency = adjacency(graph);
        let mut indegree: HashMap<NodeId, usize> =
            graph.nodes().iter().map(|node| (node.id, 0)).collect();
        for neighbours in adjacency.values() {
            for neighbour in neighbours {
                *indegree.entry(*neighbour).or_insert(0) += 1;
            }
        }

        let mut ready: BTreeSet<NodeId> = indegree
            .iter()
            .filter_map(|(node, &count)| (count == 0).then_some(*node))
            .collect();
        let mut order = Vec::with_capacity(graph.node_count());

        while let Some(node) = ready.pop_first() {
            order.push(node);
            if let Some(neighbours) = adjacency.get(&node) {
                for neighbour in neighbours {
                    if let Some(count) = indegree.get_mut(neighbour) {
                        *count -= 1;
                        if *count == 0 {
                            ready.insert(*neighbour);
                        }
                    }
                }
            }
        }

        if order.len() == graph.node_count() {
            return Ok(Self { order });
        }

        let cycle = find_cycle(&adjacency).unwrap_or_default();
        Err(TopologyError::Cycle { cycle })
    }
}

/// Uitgaande randen per node, zonder dubbele randen.
fn adjacency(graph: &Graph) -> HashMap<NodeId, Vec<NodeId>> {
    let mut adjacency: HashMap<NodeId, Vec<NodeId>> = graph
        .nodes()
        .iter()
        .map(|node| (node.id, Vec::new()))
        .collect();

    let mut add_edge = |from: NodeId, to: NodeId| {
        let neighbours = adjacency.entry(from).or_default();
        if !neighbours.contains(&to) {
            neighbours.push(to);
        }
    };

    for wire in graph.wires() {
        add_edge(wire.from_node, wire.to_node);
    }
    for node in graph.nodes() {
        for dependency in node.dependencies() {
            add_edge(dependency, node.id);
        }
    }

    for neighbours in adjacency.values_mut() {
        neighbours.sort();
    }
    adjacency
}

fn find_cycle(adjacency: &HashMap<NodeId, Vec<NodeId>>) -> Option<Vec<NodeId>> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum VisitState {
        Unvisited,
        Visiting,
        Visited,
    }

    fn dfs(
        node: NodeId,
        adjacency: &HashMap<NodeId, Vec<NodeId>>,
        state: &mut HashMap<NodeId, VisitState>,
        stack: &mut Vec<NodeId>,
    ) -> Option<Vec<NodeId>> {
        state.insert(node, VisitState::Visiting);
        stack.push(node);

        if let Some(neighbours) = adjacency.get(&node) {
            for neighbour in neighbours {
                match state
                    .get(neighbour)
                    .copied()
                    .unwrap_or(VisitState::Unvisited)
                {
                    VisitState::Unvisited => {
                        if let Some(cycle) = dfs(*neighbour, adjacency, state, stack) {
                            return Some(cycle);
                        }
                    }
                    VisitState::Visiting => {
                        if let Some(position) = stack.iter().position(|&n| n == *neighbour) {
                            let mut cycle = stack[position..].to_vec();
                            cycle.push(*neighbour);
                            return Some(cycle);
                        }
                    }
                    VisitState::Visited => {}
                }
            }
        }

        stack.pop();
        state.insert(node, VisitState::Visited);
        None
    }

    let mut roots: Vec<NodeId> = adjacency.keys().copied().collect();
    roots.sort();

    let mut state: HashMap<NodeId, VisitState> = HashMap::new();
    for node in roots {
        if state.get(&node).copied().unwrap_or(VisitState::Unvisited) == VisitState::Unvisited {
            let mut stack = Vec::new();
            if let Some(cycle) = dfs(node, adjacency, &mut state, &mut stack) {
                return Some(cycle);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::{Topology, TopologyError};
    use crate::components::ComponentKind;
    use crate::graph::Graph;
    use crate::graph::node::{Node, NodeId};
    use crate::graph::operation::Operation;

    fn utility(name: &str) -> Node {
        Node::new(
            name,
            Operation::Utility {
                kind: ComponentKind::MULTIPLY,
            },
        )
    }

    #[test]
    fn sorts_simple_graph() {
        let mut graph = Graph::new();
        let node_a = graph.add_node(utility("a")).unwrap();
        let node_b = graph.add_node(utility("b")).unwrap();
        let node_c = graph.add_node(utility("c")).unwrap();

        graph.connect(node_b, "output", node_a, "input1").unwrap();
        graph.connect(node_a, "output", node_c, "input1").unwrap();

        let topology = Topology::sort(&graph).expect("topologie");
        assert_eq!(topology.order, vec![node_b, node_a, node_c]);
    }

    #[test]
    fn ordering_edges_are_respected() {
        let mut graph = Graph::new();
        let first = graph.add_node(utility("first")).unwrap();
        let second = graph.add_node(utility("second")).unwrap();
        graph.add_ordering(second, first).unwrap();

        let topology = Topology::sort(&graph).unwrap();
        assert_eq!(topology.order, vec![second, first]);
    }

    #[test]
    fn operation_references_come_first() {
        let mut graph = Graph::new();
        let joint = graph
            .add_node(Node::new(
                "jnt",
                Operation::Joint {
                    position: [0.0; 3],
                    orientation: None,
                },
            ))
            .unwrap();
        let group = graph
            .add_node(Node::new(
                "grp",
                Operation::Group {
                    children: vec![joint],
                },
            ))
            .unwrap();
        let topology = Topology::sort(&graph).unwrap();
        assert_eq!(topology.order, vec![joint, group]);
    }

    #[test]
    fn detects_cycle() {
        let mut graph = Graph::new();
        let node_a = graph.add_node(utility("a")).unwrap();
        let node_b = graph.add_node(utility("b")).unwrap();

        graph.connect(node_a, "output", node_b, "input1").unwrap();
        graph.connect(node_b, "output", node_a, "input1").unwrap();

        let err = Topology::sort(&graph).expect_err("cycle gedetecteerd");
        match err {
            TopologyError::Cycle { cycle } => {
                assert_eq!(cycle.first(), Some(&NodeId::new(0)));
                assert!(cycle.contains(&node_a));
                assert!(cycle.contains(&node_b));
            }
        }
    }
}

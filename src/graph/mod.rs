//! Kern datastructuren voor het rigplan: nodes zijn scene-aanroepen, wires
//! zijn attribuutverbindingen.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

pub mod evaluator;
pub mod node;
pub mod operation;
pub mod topo;
pub mod value;
pub mod wire;

use node::{NetworkKind, Node, NodeId};
use wire::{PinId, Wire};

/// Graph container met indices voor snelle lookups.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Graph {
    nodes: Vec<Node>,
    wires: Vec<Wire>,
    #[serde(skip)]
    node_index: HashMap<NodeId, usize>,
    #[serde(skip)]
    name_index: HashMap<String, NodeId>,
}

/// Aantallen nodes en verbindingen binnen één effectnetwerk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NetworkStats {
    pub nodes: usize,
    pub wires: usize,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Voeg een node toe. Het id wordt door de graph uitgegeven; alle nodes
    /// waarnaar de operatie verwijst moeten al bestaan.
    pub fn add_node(&mut self, mut node: Node) -> Result<NodeId, GraphError> {
        if self.name_index.contains_key(&node.name) {
            return Err(GraphError::DuplicateName(node.name));
        }
        if let Some(missing) = node
            .dependencies()
            .into_iter()
            .find(|id| !self.node_index.contains_key(id))
        {
            return Err(GraphError::UnknownNode(missing));
        }

        let id = NodeId::new(self.nodes.len());
        node.id = id;

        self.node_index.insert(id, self.nodes.len());
        self.name_index.insert(node.name.clone(), id);
        self.nodes.push(node);
        Ok(id)
    }

    /// Voeg een verbinding toe tussen twee bestaande nodes.
    pub fn add_wire(&mut self, wire: Wire) -> Result<(), GraphError> {
        if !self.node_index.contains_key(&wire.from_node) {
            return Err(GraphError::UnknownNode(wire.from_node));
        }
        if !self.node_index.contains_key(&wire.to_node) {
            return Err(GraphError::UnknownNode(wire.to_node));
        }
        if self
            .wires
            .iter()
            .any(|existing| existing.to_node == wire.to_node && existing.to_pin == wire.to_pin)
        {
            return Err(GraphError::PinAlreadyConnected {
                node: wire.to_node,
                pin: wire.to_pin,
            });
        }

        self.wires.push(wire);
        Ok(())
    }

    /// Verkorte vorm van [`Graph::add_wire`].
    pub fn connect(
        &mut self,
        from: NodeId,
        from_pin: impl Into<PinId>,
        to: NodeId,
        to_pin: impl Into<PinId>,
    ) -> Result<(), GraphError> {
        self.add_wire(Wire::new(from, from_pin, to, to_pin))
    }

    /// Legt vast dat `before` gerealiseerd moet zijn voordat `after` aan de
    /// beurt is.
    pub fn add_ordering(&mut self, before: NodeId, after: NodeId) -> Result<(), GraphError> {
        if !self.node_index.contains_key(&before) {
            return Err(GraphError::UnknownNode(before));
        }
        let node = self
            .node_mut(after)
            .ok_or(GraphError::UnknownNode(after))?;
        node.add_after(before);
        Ok(())
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_index
            .get(&id)
            .and_then(|idx| self.nodes.get(*idx))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.node_index
            .get(&id)
            .copied()
            .and_then(move |idx| self.nodes.get_mut(idx))
    }

    /// Node met een gegeven naam. Alleen bedoeld voor inspectie van een
    /// gebouwd plan.
    #[must_use]
    pub fn node_named(&self, name: &str) -> Option<&Node> {
        self.name_index.get(name).and_then(|id| self.node(*id))
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// Alle verbindingen die op `node` binnenkomen.
    pub fn incoming(&self, node: NodeId) -> impl Iterator<Item = &Wire> {
        self.wires.iter().filter(move |wire| wire.to_node == node)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// Telt nodes en verbindingen van een effectnetwerk. Een verbinding hoort
    /// bij het netwerk als een van beide uiteinden erin ligt.
    #[must_use]
    pub fn network_stats(&self, network: NetworkKind) -> NetworkStats {
        let in_network = |id: NodeId| {
            self.node(id)
                .is_some_and(|node| node.network == Some(network))
        };
        NetworkStats {
            nodes: self
                .nodes
                .iter()
                .filter(|node| node.network == Some(network))
                .count(),
            wires: self
                .wires
                .iter()
                .filter(|wire| in_network(wire.from_node) || in_network(wire.to_node))
                .count(),
        }
    }
}

/// Fouten die kunnen optreden bij het opbouwen van de graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    DuplicateName(String),
    UnknownNode(NodeId),
    PinAlreadyConnected { node: NodeId, pin: PinId },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName(name) => write!(f, "node `{name}` bestaat al in de graph"),
            Self::UnknownNode(id) => write!(f, "node {:?} niet gevonden in graph", id.0),
            Self::PinAlreadyConnected { node, pin } => write!(
                f,
                "attribuut `{}` van node {} heeft al een inkomende verbinding",
                pin.0, node.0
            ),
        }
    }
}

impl std::error::Error for GraphError {}

//! Numerieke evaluatie van het plan in topologische volgorde.
//!
//! Utility-nodes worden doorgerekend; alle andere nodes geven hun attributen
//! door (gedeclareerde standaard, statische waarde, override, verbinding).

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::components::coerce::{assign_input, expand_vector_outputs};
use crate::components::{Component, ComponentError};
use crate::graph::Graph;
use crate::graph::node::{AttributeKind, Node, NodeId};
use crate::graph::topo::{Topology, TopologyError};
use crate::graph::value::{Value, split_channel};
use crate::graph::wire::Wire;

/// Waarden die de gebruiker op attributen zet, bv. `Roll` op de master.
#[derive(Debug, Clone, Default)]
pub struct EvaluationInputs {
    overrides: HashMap<NodeId, BTreeMap<String, Value>>,
}

impl EvaluationInputs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(
        &mut self,
        node: NodeId,
        attribute: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.overrides
            .entry(node)
            .or_default()
            .insert(attribute.into(), value.into());
        self
    }

    #[must_use]
    pub fn with(
        mut self,
        node: NodeId,
        attribute: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.set(node, attribute, value);
        self
    }

    fn for_node(&self, node: NodeId) -> impl Iterator<Item = (&String, &Value)> {
        self.overrides.get(&node).into_iter().flatten()
    }
}

/// Resultaat van een evaluatie-run.
#[derive(Debug, Default, Clone)]
pub struct EvaluationResult {
    /// Attribuutwaarden per node.
    pub node_outputs: HashMap<NodeId, BTreeMap<String, Value>>,
}

impl EvaluationResult {
    /// Zoekt een attribuut op. Kanaalnamen (`outputR`, `scaleX`) vallen terug
    /// op de vector; ontbrekende transformkanalen krijgen hun rustwaarde.
    #[must_use]
    pub fn value(&self, node: NodeId, pin: &str) -> Option<Value> {
        lookup(self.node_outputs.get(&node)?, pin)
    }

    #[must_use]
    pub fn number(&self, node: NodeId, pin: &str) -> Option<f64> {
        self.value(node, pin)?.as_number().ok()
    }
}

fn lookup(outputs: &BTreeMap<String, Value>, pin: &str) -> Option<Value> {
    if let Some(value) = outputs.get(pin) {
        return Some(value.clone());
    }
    let (base, index) = split_channel(pin)?;
    if let Some(value) = outputs.get(base) {
        return value
            .as_vector()
            .ok()
            .map(|vector| Value::Number(vector[index]));
    }
    match base {
        "scale" => Some(Value::Number(1.0)),
        "translate" | "rotate" => Some(Value::Number(0.0)),
        _ => None,
    }
}

/// Fouttype voor evaluatieproblemen.
#[derive(Debug)]
pub enum EvaluationError {
    /// Topologiesortering is mislukt.
    Topology(TopologyError),
    /// Een output van een afhankelijke node ontbreekt.
    MissingDependencyOutput {
        node_id: NodeId,
        dependency: NodeId,
        pin: String,
    },
    /// Het component gaf een foutmelding tijdens evaluatie.
    ComponentFailed {
        node_id: NodeId,
        component: String,
        source: ComponentError,
    },
    /// De node kon niet teruggevonden worden in de graph (inconsistentie).
    UnknownNode(NodeId),
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topology(err) => write!(f, "topologiesortering mislukt: {err}"),
            Self::MissingDependencyOutput {
                node_id,
                dependency,
                pin,
            } => write!(
                f,
                "node {} mist output `{pin}` van afhankelijke node {}",
                node_id.0, dependency.0
            ),
            Self::ComponentFailed {
                node_id,
                component,
                source,
            } => write!(
                f,
                "component `{component}` (node {}) faalde: {}",
                node_id.0, source
            ),
            Self::UnknownNode(node_id) => {
                write!(f, "node {} bestaat niet in de graph", node_id.0)
            }
        }
    }
}

impl std::error::Error for EvaluationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ComponentFailed { source, .. } => Some(source),
            Self::Topology(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TopologyError> for EvaluationError {
    fn from(error: TopologyError) -> Self {
        Self::Topology(error)
    }
}

/// Evalueert alle nodes van het plan met de opgegeven attribuutwaarden.
pub fn evaluate(
    graph: &Graph,
    inputs: &EvaluationInputs,
) -> Result<EvaluationResult, EvaluationError> {
    let topology = Topology::sort(graph)?;

    let mut incoming: HashMap<NodeId, Vec<&Wire>> = HashMap::new();
    for wire in graph.wires() {
        incoming.entry(wire.to_node).or_default().push(wire);
    }

    let mut result = EvaluationResult::default();
    for &node_id in &topology.order {
        let node = graph
            .node(node_id)
            .ok_or(EvaluationError::UnknownNode(node_id))?;

        let mut values = Vec::new();
        for (pin, value) in inputs.for_node(node_id) {
            values.push((pin.clone(), clamp_to_declaration(node, pin, value)));
        }
        for wire in incoming.get(&node_id).into_iter().flatten() {
            let value = result
                .value(wire.from_node, wire.from_pin.as_str())
                .ok_or_else(|| EvaluationError::MissingDependencyOutput {
                    node_id,
                    dependency: wire.from_node,
                    pin: wire.from_pin.0.clone(),
                })?;
            values.push((wire.to_pin.0.clone(), value));
        }

        let outputs = match node.operation.utility_kind() {
            Some(kind) => {
                let failed = |source: ComponentError| EvaluationError::ComponentFailed {
                    node_id,
                    component: kind.name().to_owned(),
                    source,
                };

                let mut pins = kind.default_inputs();
                for (pin, value) in node.attributes_in_order() {
                    assign_input(&mut pins, pin, value.clone()).map_err(failed)?;
                }
                for (pin, value) in values {
                    assign_input(&mut pins, &pin, value).map_err(failed)?;
                }
                expand_vector_outputs(kind.evaluate(&pins).map_err(failed)?)
            }
            None => {
                let mut attributes = BTreeMap::new();
                for spec in node.declarations() {
                    if spec.kind == AttributeKind::Float {
                        attributes.insert(spec.name.clone(), Value::Number(spec.default));
                    }
                }
                for (pin, value) in node.attributes_in_order() {
                    attributes.insert(pin.to_owned(), value.clone());
                }
                attributes.extend(values);
                attributes
            }
        };

        result.node_outputs.insert(node_id, outputs);
    }

    Ok(result)
}

fn clamp_to_declaration(node: &Node, pin: &str, value: &Value) -> Value {
    match (node.declaration(pin), value) {
        (Some(spec), Value::Number(number)) => Value::Number(spec.clamp(*number)),
        _ => value.clone(),
    }
}

//! Definitie van nodes binnen het rigplan.

use std::collections::BTreeMap;

use serde::Serialize;

use super::operation::Operation;
use super::value::Value;

/// Identifier voor een node binnen de graph.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Ord, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

/// Effectnetwerk waartoe een node behoort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NetworkKind {
    Roll,
    Ripple,
    Deformer,
}

impl NetworkKind {
    pub const ALL: [NetworkKind; 3] = [Self::Roll, Self::Ripple, Self::Deformer];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Roll => "roll",
            Self::Ripple => "ripple",
            Self::Deformer => "deformer",
        }
    }
}

/// Soort attribuut dat via `addAttribute` op een node gedeclareerd wordt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AttributeKind {
    Float,
    /// Vergrendeld scheidingsteken in de channel box.
    Divider { label: String },
}

/// Declaratie van een gebruikersattribuut.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSpec {
    pub name: String,
    pub kind: AttributeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub default: f64,
    pub keyable: bool,
    pub locked: bool,
}

impl AttributeSpec {
    /// Keyable float zonder grenzen met standaardwaarde 0.
    #[must_use]
    pub fn float(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Float,
            min: None,
            max: None,
            default: 0.0,
            keyable: true,
            locked: false,
        }
    }

    #[must_use]
    pub fn divider(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Divider {
                label: label.into(),
            },
            min: None,
            max: None,
            default: 0.0,
            keyable: false,
            locked: true,
        }
    }

    #[must_use]
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: f64) -> Self {
        self.default = value;
        self
    }

    /// Waarde binnen de gedeclareerde grenzen.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        let lower = self.min.unwrap_or(f64::NEG_INFINITY);
        let upper = self.max.unwrap_or(f64::INFINITY);
        value.max(lower).min(upper)
    }
}

/// Node representatie binnen de graph: precies één aanroep van de scene-API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unieke identifier, uitgegeven door de graph.
    pub id: NodeId,
    /// Deterministische naam in de scene.
    pub name: String,
    pub operation: Operation,
    /// Statische attribuutwaarden, direct na aanmaken gezet.
    attributes: BTreeMap<String, Value>,
    /// Volgorde waarin de attributen gezet zijn.
    #[serde(skip)]
    attribute_order: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    declarations: Vec<AttributeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkKind>,
    /// Nodes die eerder gerealiseerd moeten zijn zonder dat er een verbinding is.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    after: Vec<NodeId>,
}

impl Node {
    /// Maak een nieuwe node; het id wordt bij het toevoegen aan de graph gezet.
    #[must_use]
    pub fn new(name: impl Into<String>, operation: Operation) -> Self {
        Self {
            id: NodeId::default(),
            name: name.into(),
            operation,
            attributes: BTreeMap::new(),
            attribute_order: Vec::new(),
            declarations: Vec::new(),
            network: None,
            after: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_attribute(name, value);
        self
    }

    #[must_use]
    pub fn in_network(mut self, network: NetworkKind) -> Self {
        self.network = Some(network);
        self
    }

    #[must_use]
    pub fn after(mut self, ids: impl IntoIterator<Item = NodeId>) -> Self {
        for id in ids {
            self.add_after(id);
        }
        self
    }

    pub(crate) fn add_after(&mut self, id: NodeId) {
        if !self.after.contains(&id) {
            self.after.push(id);
        }
    }

    /// Sla een statische attribuutwaarde op.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        if !self.attribute_order.iter().any(|existing| existing == &name) {
            self.attribute_order.push(name.clone());
        }
        self.attributes.insert(name, value.into());
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Attributen in de volgorde waarin ze gezet zijn.
    pub fn attributes_in_order(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attribute_order.iter().filter_map(|name| {
            self.attributes
                .get(name)
                .map(|value| (name.as_str(), value))
        })
    }

    /// Declareer een gebruikersattribuut. Een tweede declaratie met dezelfde
    /// naam vervangt de eerste.
    pub fn declare(&mut self, spec: AttributeSpec) {
        if let Some(existing) = self
            .declarations
            .iter_mut()
            .find(|existing| existing.name == spec.name)
        {
            *existing = spec;
        } else {
            self.declarations.push(spec);
        }
    }

    #[must_use]
    pub fn declarations(&self) -> &[AttributeSpec] {
        &self.declarations
    }

    #[must_use]
    pub fn declaration(&self, name: &str) -> Option<&AttributeSpec> {
        self.declarations.iter().find(|spec| spec.name == name)
    }

    #[must_use]
    pub fn ordering(&self) -> &[NodeId] {
        &self.after
    }

    /// Alle nodes waar deze node op wacht: operatiereferenties plus
    /// expliciete volgorde.
    #[must_use]
    pub fn dependencies(&self) -> Vec<NodeId> {
        let mut dependencies = self.operation.references();
        for id in &self.after {
            if !dependencies.contains(id) {
                dependencies.push(*id);
            }
        }
        dependencies
    }
}

#[cfg(test)]
mod tests {
    use super::{AttributeSpec, NetworkKind, Node, NodeId};
    use crate::graph::operation::Operation;
    use crate::graph::value::Value;

    fn group(children: Vec<NodeId>) -> Operation {
        Operation::Group { children }
    }

    #[test]
    fn attributes_keep_insertion_order() {
        let node = Node::new("clamp_001", group(vec![]))
            .with_attribute("maxR", 1.0)
            .with_attribute("maxG", 1.0)
            .with_attribute("maxR", 0.5);

        let order: Vec<_> = node.attributes_in_order().collect();
        assert_eq!(
            order,
            vec![("maxR", &Value::Number(0.5)), ("maxG", &Value::Number(1.0))]
        );
    }

    #[test]
    fn redeclaring_attribute_replaces_spec() {
        let mut node = Node::new("ctrl", group(vec![]));
        node.declare(AttributeSpec::float("Roll"));
        node.declare(AttributeSpec::float("Roll").range(0.0, 1.0));

        assert_eq!(node.declarations().len(), 1);
        assert_eq!(node.declaration("Roll").unwrap().max, Some(1.0));
        assert_eq!(node.declaration("Roll").unwrap().clamp(3.0), 1.0);
    }

    #[test]
    fn dependencies_merge_references_and_ordering() {
        let node = Node::new("grp", group(vec![NodeId::new(1), NodeId::new(2)]))
            .after([NodeId::new(2), NodeId::new(5)])
            .in_network(NetworkKind::Roll);

        assert_eq!(
            node.dependencies(),
            vec![NodeId::new(1), NodeId::new(2), NodeId::new(5)]
        );
        assert_eq!(node.network, Some(NetworkKind::Roll));
    }

    #[test]
    fn divider_is_locked_and_not_keyable() {
        let spec = AttributeSpec::divider("rollDivider", "----- ROLL -----");
        assert!(spec.locked);
        assert!(!spec.keyable);
    }
}

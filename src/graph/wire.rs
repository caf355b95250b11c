//! Attribuutverbindingen tussen nodes (`connectAttribute`).

use serde::Serialize;

use super::node::NodeId;

/// Attribuut binnen een node, bv. `outValue` of `rotateX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PinId(pub String);

impl PinId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PinId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for PinId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Verbinding van een bronattribuut naar een doelattribuut.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wire {
    pub from_node: NodeId,
    pub from_pin: PinId,
    pub to_node: NodeId,
    pub to_pin: PinId,
}

impl Wire {
    #[must_use]
    pub fn new<F, T, PF, PT>(from_node: F, from_pin: PF, to_node: T, to_pin: PT) -> Self
    where
        F: Into<NodeId>,
        T: Into<NodeId>,
        PF: Into<PinId>,
        PT: Into<PinId>,
    {
        Self {
            from_node: from_node.into(),
            from_pin: from_pin.into(),
            to_node: to_node.into(),
            to_pin: to_pin.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeId, PinId, Wire};

    #[test]
    fn wire_holds_all_fields() {
        let wire = Wire::new(NodeId::new(1), "outValue", NodeId::new(2), "input1X");
        assert_eq!(wire.from_node, NodeId::new(1));
        assert_eq!(wire.to_node, NodeId::new(2));
        assert_eq!(wire.from_pin, PinId("outValue".to_owned()));
        assert_eq!(wire.to_pin.as_str(), "input1X");
    }
}

//! Rekennodes van de effectnetwerken en hun numerieke semantiek.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::graph::value::Value;

pub mod coerce;
pub mod maths_domain;
pub mod maths_operators;
pub mod sets_distribute;
pub mod vector_blend;

/// Invoerwaarden per pinnaam.
pub type InputMap = BTreeMap<String, Value>;

/// Output-map van een component: pinnaam → waarde.
pub type OutputMap = BTreeMap<String, Value>;

/// Fouttype voor component-evaluaties.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentError {
    /// Een generieke fout met een bericht.
    Message(String),
}

impl ComponentError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Message(s) => s,
        }
    }
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(s) => f.write_str(s),
        }
    }
}

impl std::error::Error for ComponentError {}

/// Resultaat van een component-executie.
pub type ComponentResult = Result<OutputMap, ComponentError>;

/// Trait die alle componentimplementaties dienen te implementeren.
pub trait Component {
    /// Waarden van alle pinnen op een vers aangemaakte node.
    fn default_inputs(&self) -> InputMap;

    fn evaluate(&self, inputs: &InputMap) -> ComponentResult;
}

/// Beschikbare utility-nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    MathsOperator(maths_operators::ComponentKind),
    MathsDomain(maths_domain::ComponentKind),
    VectorBlend(vector_blend::ComponentKind),
    SetsDistribute(sets_distribute::ComponentKind),
}

impl ComponentKind {
    pub const REMAP: Self = Self::MathsDomain(maths_domain::ComponentKind::Remap);
    pub const CLAMP: Self = Self::MathsDomain(maths_domain::ComponentKind::Clamp);
    pub const ADD: Self = Self::MathsOperator(maths_operators::ComponentKind::Add);
    pub const MULTIPLY: Self = Self::MathsOperator(maths_operators::ComponentKind::Multiply);
    pub const MULTIPLY_VECTOR: Self =
        Self::MathsOperator(maths_operators::ComponentKind::MultiplyVector);
    pub const MODULO_SUM: Self = Self::MathsOperator(maths_operators::ComponentKind::ModuloSum);
    pub const BLEND: Self = Self::VectorBlend(vector_blend::ComponentKind::Blend);
    pub const DISTRIBUTE: Self = Self::SetsDistribute(sets_distribute::ComponentKind::Distribute);
    pub const BREAKOUT: Self = Self::SetsDistribute(sets_distribute::ComponentKind::Breakout);

    /// Nodetype zoals de host het kent.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::MathsOperator(component) => component.name(),
            Self::MathsDomain(component) => component.name(),
            Self::VectorBlend(component) => component.name(),
            Self::SetsDistribute(component) => component.name(),
        }
    }
}

impl Component for ComponentKind {
    fn default_inputs(&self) -> InputMap {
        match self {
            Self::MathsOperator(component) => component.default_inputs(),
            Self::MathsDomain(component) => component.default_inputs(),
            Self::VectorBlend(component) => component.default_inputs(),
            Self::SetsDistribute(component) => component.default_inputs(),
        }
    }

    fn evaluate(&self, inputs: &InputMap) -> ComponentResult {
        match self {
            Self::MathsOperator(component) => component.evaluate(inputs),
            Self::MathsDomain(component) => component.evaluate(inputs),
            Self::VectorBlend(component) => component.evaluate(inputs),
            Self::SetsDistribute(component) => component.evaluate(inputs),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ComponentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::{Component, ComponentKind};

    #[test]
    fn host_node_types() {
        assert_eq!(ComponentKind::REMAP.name(), "remapValue");
        assert_eq!(ComponentKind::MULTIPLY_VECTOR.name(), "multiplyDivide");
        assert_eq!(ComponentKind::BREAKOUT.to_string(), "MASH_Breakout");
        assert_eq!(
            serde_json::to_string(&ComponentKind::BLEND).unwrap(),
            "\"blendColors\""
        );
    }

    #[test]
    fn every_kind_evaluates_its_own_defaults() {
        for kind in [
            ComponentKind::REMAP,
            ComponentKind::CLAMP,
            ComponentKind::ADD,
            ComponentKind::MULTIPLY,
            ComponentKind::MULTIPLY_VECTOR,
            ComponentKind::MODULO_SUM,
            ComponentKind::BLEND,
            ComponentKind::DISTRIBUTE,
            ComponentKind::BREAKOUT,
        ] {
            assert!(
                kind.evaluate(&kind.default_inputs()).is_ok(),
                "{kind} faalt op standaardwaarden"
            );
        }
    }
}

//! `blendColors`: lineaire menging van twee vectoren.

use std::collections::BTreeMap;

use crate::graph::value::Value;

use super::coerce::{coerce_number, coerce_vector};
use super::{Component, ComponentResult, InputMap};

pub const PIN_BLENDER: &str = "blender";
pub const PIN_COLOR_1: &str = "color1";
pub const PIN_COLOR_2: &str = "color2";
pub const PIN_OUTPUT: &str = "output";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// `color1 * blender + color2 * (1 - blender)`.
    Blend,
}

impl Component for ComponentKind {
    fn default_inputs(&self) -> InputMap {
        let mut inputs = BTreeMap::new();
        inputs.insert(PIN_BLENDER.to_owned(), Value::Number(0.5));
        inputs.insert(PIN_COLOR_1.to_owned(), Value::Vector([1.0, 0.0, 0.0]));
        inputs.insert(PIN_COLOR_2.to_owned(), Value::Vector([0.0, 0.0, 1.0]));
        inputs
    }

    fn evaluate(&self, inputs: &InputMap) -> ComponentResult {
        let blender = coerce_number(inputs, PIN_BLENDER)?;
        let first = coerce_vector(inputs, PIN_COLOR_1)?;
        let second = coerce_vector(inputs, PIN_COLOR_2)?;

        let mut output = [0.0; 3];
        for index in 0..3 {
            output[index] = first[index] * blender + second[index] * (1.0 - blender);
        }

        let mut outputs = BTreeMap::new();
        outputs.insert(PIN_OUTPUT.to_owned(), Value::Vector(output));
        Ok(outputs)
    }
}

impl ComponentKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blend => "blendColors",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ComponentKind, PIN_BLENDER, PIN_COLOR_1, PIN_COLOR_2, PIN_OUTPUT};
    use crate::components::Component;
    use crate::graph::value::Value;

    #[test]
    fn default_blend_mixes_red_and_blue() {
        let kind = ComponentKind::Blend;
        let outputs = kind.evaluate(&kind.default_inputs()).unwrap();
        assert_eq!(outputs.get(PIN_OUTPUT), Some(&Value::Vector([0.5, 0.0, 0.5])));
    }

    #[test]
    fn blender_one_selects_first_color() {
        let kind = ComponentKind::Blend;
        let mut inputs = kind.default_inputs();
        inputs.insert(PIN_BLENDER.to_owned(), Value::Number(1.0));
        inputs.insert(PIN_COLOR_1.to_owned(), Value::Vector([1.5, 1.5, 1.0]));
        inputs.insert(PIN_COLOR_2.to_owned(), Value::Vector([1.0; 3]));
        let outputs = kind.evaluate(&inputs).unwrap();
        assert_eq!(outputs.get(PIN_OUTPUT), Some(&Value::Vector([1.5, 1.5, 1.0])));
    }
}

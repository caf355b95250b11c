//! Distribute/breakout: één sample per segment, plus een node die elk sample
//! per component adresseerbaar maakt.

use std::collections::BTreeMap;

use crate::graph::value::{PointSample, Value};

use super::coerce::{coerce_count, coerce_vector};
use super::{Component, ComponentError, ComponentResult, InputMap};

pub const PIN_POINT_COUNT: &str = "pointCount";
pub const PIN_ROTATE: &str = "rotate";
pub const PIN_SCALE: &str = "scale";
pub const PIN_OUTPUT_POINTS: &str = "outputPoints";
pub const PIN_INPUT_POINTS: &str = "inputPoints";

/// Uitgangspin van sample `index`, bv. `outputs[3].rotate`.
#[must_use]
pub fn breakout_pin(index: usize, channel: SampleChannel) -> String {
    format!("outputs[{index}].{}", channel.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleChannel {
    Translate,
    Rotate,
    Scale,
}

impl SampleChannel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Translate => "translate",
            Self::Rotate => "rotate",
            Self::Scale => "scale",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Distribute,
    Breakout,
}

impl Component for ComponentKind {
    fn default_inputs(&self) -> InputMap {
        let mut inputs = BTreeMap::new();
        match self {
            Self::Distribute => {
                inputs.insert(PIN_POINT_COUNT.to_owned(), Value::Number(0.0));
                inputs.insert(PIN_ROTATE.to_owned(), Value::Vector([0.0; 3]));
                inputs.insert(PIN_SCALE.to_owned(), Value::Vector([1.0; 3]));
            }
            Self::Breakout => {
                inputs.insert(PIN_INPUT_POINTS.to_owned(), Value::List(Vec::new()));
            }
        }
        inputs
    }

    fn evaluate(&self, inputs: &InputMap) -> ComponentResult {
        match self {
            Self::Distribute => evaluate_distribute(inputs),
            Self::Breakout => evaluate_breakout(inputs),
        }
    }
}

impl ComponentKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Distribute => "MASH_Distribute",
            Self::Breakout => "MASH_Breakout",
        }
    }
}

fn evaluate_distribute(inputs: &InputMap) -> ComponentResult {
    let count = coerce_count(inputs, PIN_POINT_COUNT)?;
    let rotate = coerce_vector(inputs, PIN_ROTATE)?;
    let scale = coerce_vector(inputs, PIN_SCALE)?;

    let samples = (0..count)
        .map(|index| {
            Value::Sample(PointSample {
                translate: [index as f64, 0.0, 0.0],
                rotate,
                scale,
            })
        })
        .collect();

    let mut outputs = BTreeMap::new();
    outputs.insert(PIN_OUTPUT_POINTS.to_owned(), Value::List(samples));
    Ok(outputs)
}

fn evaluate_breakout(inputs: &InputMap) -> ComponentResult {
    let points = inputs
        .get(PIN_INPUT_POINTS)
        .ok_or_else(|| ComponentError::new(format!("pin `{PIN_INPUT_POINTS}` ontbreekt")))?
        .expect_list()
        .map_err(|err| ComponentError::new(format!("{PIN_INPUT_POINTS}: {err}")))?;

    let mut outputs = BTreeMap::new();
    for (index, point) in points.iter().enumerate() {
        let sample = point
            .expect_sample()
            .map_err(|err| ComponentError::new(format!("sample {index}: {err}")))?;
        for (channel, vector) in [
            (SampleChannel::Translate, sample.translate),
            (SampleChannel::Rotate, sample.rotate),
            (SampleChannel::Scale, sample.scale),
        ] {
            outputs.insert(breakout_pin(index, channel), Value::Vector(vector));
        }
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::{
        ComponentKind, PIN_INPUT_POINTS, PIN_OUTPUT_POINTS, PIN_POINT_COUNT, SampleChannel,
        breakout_pin,
    };
    use crate::components::coerce::assign_input;
    use crate::components::Component;
    use crate::graph::value::Value;

    #[test]
    fn distribute_produces_one_sample_per_index() {
        let kind = ComponentKind::Distribute;
        let mut inputs = kind.default_inputs();
        assign_input(&mut inputs, PIN_POINT_COUNT, Value::Number(3.0)).unwrap();
        assign_input(&mut inputs, "rotateX", Value::Number(1.0)).unwrap();
        assign_input(&mut inputs, "scaleZ", Value::Number(1.5)).unwrap();

        let outputs = kind.evaluate(&inputs).unwrap();
        let samples = outputs.get(PIN_OUTPUT_POINTS).unwrap().expect_list().unwrap();
        assert_eq!(samples.len(), 3);
        let last = samples[2].expect_sample().unwrap();
        assert_eq!(last.translate, [2.0, 0.0, 0.0]);
        assert_eq!(last.rotate, [1.0, 0.0, 0.0]);
        assert_eq!(last.scale, [1.0, 1.0, 1.5]);
    }

    #[test]
    fn breakout_exposes_each_sample() {
        let distribute = ComponentKind::Distribute;
        let mut inputs = distribute.default_inputs();
        assign_input(&mut inputs, PIN_POINT_COUNT, Value::Number(2.0)).unwrap();
        let points = distribute
            .evaluate(&inputs)
            .unwrap()
            .remove(PIN_OUTPUT_POINTS)
            .unwrap();

        let breakout = ComponentKind::Breakout;
        let mut inputs = breakout.default_inputs();
        inputs.insert(PIN_INPUT_POINTS.to_owned(), points);
        let outputs = breakout.evaluate(&inputs).unwrap();

        assert_eq!(outputs.len(), 6);
        assert_eq!(
            outputs.get(&breakout_pin(1, SampleChannel::Translate)),
            Some(&Value::Vector([1.0, 0.0, 0.0]))
        );
        assert_eq!(
            outputs.get(&breakout_pin(0, SampleChannel::Scale)),
            Some(&Value::Vector([1.0; 3]))
        );
    }

    #[test]
    fn breakout_rejects_non_samples() {
        let breakout = ComponentKind::Breakout;
        let mut inputs = breakout.default_inputs();
        inputs.insert(
            PIN_INPUT_POINTS.to_owned(),
            Value::List(vec![Value::Number(1.0)]),
        );
        assert!(breakout.evaluate(&inputs).is_err());
    }
}

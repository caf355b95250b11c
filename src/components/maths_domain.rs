//! Bereik-componenten: `remapValue` met rampfunctie en `clamp`.

use std::collections::BTreeMap;

use crate::graph::value::Value;

use super::coerce::{coerce_number, coerce_vector};
use super::{Component, ComponentError, ComponentResult, InputMap};

pub const PIN_INPUT_VALUE: &str = "inputValue";
pub const PIN_INPUT_MIN: &str = "inputMin";
pub const PIN_INPUT_MAX: &str = "inputMax";
pub const PIN_OUTPUT_MIN: &str = "outputMin";
pub const PIN_OUTPUT_MAX: &str = "outputMax";
pub const PIN_OUT_VALUE: &str = "outValue";

pub const PIN_INPUT: &str = "input";
pub const PIN_MIN: &str = "min";
pub const PIN_MAX: &str = "max";
pub const PIN_OUTPUT: &str = "output";

/// Interpolatie tussen twee rampsleutels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Constant = 0,
    Linear = 1,
    Smooth = 2,
}

impl Interpolation {
    #[must_use]
    pub fn from_code(code: f64) -> Self {
        match code.round() as i64 {
            0 => Self::Constant,
            2 => Self::Smooth,
            _ => Self::Linear,
        }
    }

    #[must_use]
    pub fn code(self) -> f64 {
        f64::from(self as u8)
    }
}

/// Pinnaam van een veld van rampsleutel `index`, bv. `value[1].position`.
#[must_use]
pub fn ramp_pin(index: usize, field: RampField) -> String {
    format!("value[{index}].{}", field.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampField {
    Position,
    Value,
    Interp,
}

impl RampField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Value => "value",
            Self::Interp => "interp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct RampKey {
    position: f64,
    value: f64,
    interpolation: Interpolation,
}

impl Default for RampKey {
    fn default() -> Self {
        Self {
            position: 0.0,
            value: 0.0,
            interpolation: Interpolation::Linear,
        }
    }
}

/// Beschikbare componenten binnen deze module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Remap,
    Clamp,
}

impl Component for ComponentKind {
    fn default_inputs(&self) -> InputMap {
        let mut inputs = BTreeMap::new();
        match self {
            Self::Remap => {
                for (pin, value) in [
                    (PIN_INPUT_VALUE, 0.0),
                    (PIN_INPUT_MIN, 0.0),
                    (PIN_INPUT_MAX, 1.0),
                    (PIN_OUTPUT_MIN, 0.0),
                    (PIN_OUTPUT_MAX, 1.0),
                ] {
                    inputs.insert(pin.to_owned(), Value::Number(value));
                }
                for (index, point) in [0.0, 1.0].into_iter().enumerate() {
                    inputs.insert(ramp_pin(index, RampField::Position), Value::Number(point));
                    inputs.insert(ramp_pin(index, RampField::Value), Value::Number(point));
                    inputs.insert(
                        ramp_pin(index, RampField::Interp),
                        Value::Number(Interpolation::Linear.code()),
                    );
                }
            }
            Self::Clamp => {
                inputs.insert(PIN_INPUT.to_owned(), Value::Vector([0.0; 3]));
                inputs.insert(PIN_MIN.to_owned(), Value::Vector([0.0; 3]));
                inputs.insert(PIN_MAX.to_owned(), Value::Vector([0.0; 3]));
            }
        }
        inputs
    }

    fn evaluate(&self, inputs: &InputMap) -> ComponentResult {
        match self {
            Self::Remap => evaluate_remap(inputs),
            Self::Clamp => evaluate_clamp(inputs),
        }
    }
}

impl ComponentKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Remap => "remapValue",
            Self::Clamp => "clamp",
        }
    }
}

fn evaluate_remap(inputs: &InputMap) -> ComponentResult {
    let value = coerce_number(inputs, PIN_INPUT_VALUE)?;
    let input_min = coerce_number(inputs, PIN_INPUT_MIN)?;
    let input_max = coerce_number(inputs, PIN_INPUT_MAX)?;
    let output_min = coerce_number(inputs, PIN_OUTPUT_MIN)?;
    let output_max = coerce_number(inputs, PIN_OUTPUT_MAX)?;

    let t = if input_max == input_min {
        if value >= input_max { 1.0 } else { 0.0 }
    } else {
        (value - input_min) / (input_max - input_min)
    };

    let keys = collect_ramp(inputs)?;
    let ramp = sample_ramp(&keys, t);

    let mut outputs = BTreeMap::new();
    outputs.insert(
        PIN_OUT_VALUE.to_owned(),
        Value::Number(output_min + ramp * (output_max - output_min)),
    );
    Ok(outputs)
}

/// Verzamelt alle `value[k].*` pinnen, gesorteerd op positie.
fn collect_ramp(inputs: &InputMap) -> Result<Vec<RampKey>, ComponentError> {
    let mut keys: BTreeMap<usize, RampKey> = BTreeMap::new();
    for (pin, value) in inputs {
        let Some((index, field)) = parse_ramp_pin(pin) else {
            continue;
        };
        let number = value
            .as_number()
            .map_err(|err| ComponentError::new(format!("rampsleutel `{pin}`: {err}")))?;
        let key = keys.entry(index).or_default();
        match field {
            RampField::Position => key.position = number,
            RampField::Value => key.value = number,
            RampField::Interp => key.interpolation = Interpolation::from_code(number),
        }
    }

    let mut keys: Vec<RampKey> = keys.into_values().collect();
    keys.sort_by(|a, b| a.position.total_cmp(&b.position));
    Ok(keys)
}

fn parse_ramp_pin(pin: &str) -> Option<(usize, RampField)> {
    let rest = pin.strip_prefix("value[")?;
    let (index, field) = rest.split_once("].")?;
    let index = index.parse().ok()?;
    let field = match field {
        "position" => RampField::Position,
        "value" => RampField::Value,
        "interp" => RampField::Interp,
        _ => return None,
    };
    Some((index, field))
}

/// Evalueert de ramp; buiten het bereik geldt de waarde van de randsleutel.
fn sample_ramp(keys: &[RampKey], t: f64) -> f64 {
    let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
        return t;
    };
    if t <= first.position {
        return first.value;
    }
    if t >= last.position {
        return last.value;
    }

    for pair in keys.windows(2) {
        let (left, right) = (pair[0], pair[1]);
        if t < left.position || t >= right.position {
            continue;
        }
        let span = right.position - left.position;
        if span <= 0.0 {
            return right.value;
        }
        let u = (t - left.position) / span;
        let weight = match left.interpolation {
            Interpolation::Constant => 0.0,
            Interpolation::Linear => u,
            Interpolation::Smooth => u * u * (3.0 - 2.0 * u),
        };
        return left.value + (right.value - left.value) * weight;
    }

    last.value
}

fn evaluate_clamp(inputs: &InputMap) -> ComponentResult {
    let input = coerce_vector(inputs, PIN_INPUT)?;
    let min = coerce_vector(inputs, PIN_MIN)?;
    let max = coerce_vector(inputs, PIN_MAX)?;

    let mut output = [0.0; 3];
    for index in 0..3 {
        let value = input[index];
        output[index] = if value < min[index] {
            min[index]
        } else if value > max[index] {
            max[index]
        } else {
            value
        };
    }

    let mut outputs = BTreeMap::new();
    outputs.insert(PIN_OUTPUT.to_owned(), Value::Vector(output));
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::{
        ComponentKind, Interpolation, PIN_INPUT_MAX, PIN_INPUT_MIN, PIN_INPUT_VALUE,
        PIN_OUT_VALUE, PIN_OUTPUT, RampField, ramp_pin,
    };
    use crate::components::coerce::assign_input;
    use crate::components::{Component, InputMap};
    use crate::graph::value::Value;

    fn inputs(kind: ComponentKind, pins: &[(String, Value)]) -> InputMap {
        let mut inputs = kind.default_inputs();
        for (pin, value) in pins {
            assign_input(&mut inputs, pin, value.clone()).unwrap();
        }
        inputs
    }

    fn remap(pins: &[(String, Value)]) -> f64 {
        let outputs = ComponentKind::Remap
            .evaluate(&inputs(ComponentKind::Remap, pins))
            .expect("remap slaagt");
        outputs
            .get(PIN_OUT_VALUE)
            .and_then(|value| value.expect_number().ok())
            .expect("outValue aanwezig")
    }

    fn pin(name: &str, value: f64) -> (String, Value) {
        (name.to_owned(), Value::Number(value))
    }

    #[test]
    fn default_ramp_is_linear_and_clamped() {
        assert!((remap(&[pin(PIN_INPUT_VALUE, 0.25)]) - 0.25).abs() < 1e-12);
        assert_eq!(remap(&[pin(PIN_INPUT_VALUE, -3.0)]), 0.0);
        assert_eq!(remap(&[pin(PIN_INPUT_VALUE, 3.0)]), 1.0);
    }

    #[test]
    fn input_range_is_normalized() {
        let value = remap(&[
            pin(PIN_INPUT_VALUE, 0.75),
            pin(PIN_INPUT_MIN, 0.5),
            pin(PIN_INPUT_MAX, 1.0),
        ]);
        assert!((value - 0.5).abs() < 1e-12);
    }

    #[test]
    fn degenerate_range_steps_at_max() {
        let below = remap(&[
            pin(PIN_INPUT_VALUE, 0.49),
            pin(PIN_INPUT_MIN, 0.5),
            pin(PIN_INPUT_MAX, 0.5),
        ]);
        let at = remap(&[
            pin(PIN_INPUT_VALUE, 0.5),
            pin(PIN_INPUT_MIN, 0.5),
            pin(PIN_INPUT_MAX, 0.5),
        ]);
        assert_eq!(below, 0.0);
        assert_eq!(at, 1.0);
    }

    #[test]
    fn smooth_triangle_peaks_at_center() {
        let smooth = Interpolation::Smooth.code();
        let pins = |t: f64| {
            vec![
                pin(PIN_INPUT_VALUE, t),
                pin(&ramp_pin(0, RampField::Position), 0.2),
                pin(&ramp_pin(0, RampField::Value), 0.0),
                pin(&ramp_pin(0, RampField::Interp), smooth),
                pin(&ramp_pin(1, RampField::Position), 0.5),
                pin(&ramp_pin(1, RampField::Value), 1.0),
                pin(&ramp_pin(1, RampField::Interp), smooth),
                pin(&ramp_pin(2, RampField::Position), 0.8),
                pin(&ramp_pin(2, RampField::Value), 0.0),
                pin(&ramp_pin(2, RampField::Interp), smooth),
            ]
        };
        assert_eq!(remap(&pins(0.5)), 1.0);
        assert_eq!(remap(&pins(0.2)), 0.0);
        assert_eq!(remap(&pins(0.1)), 0.0);
        assert_eq!(remap(&pins(0.9)), 0.0);
        let rising = remap(&pins(0.35));
        assert!((rising - 0.5).abs() < 1e-12);
    }

    #[test]
    fn constant_interpolation_holds_left_value() {
        let value = remap(&[
            pin(PIN_INPUT_VALUE, 0.9),
            pin(&ramp_pin(0, RampField::Interp), Interpolation::Constant.code()),
        ]);
        assert_eq!(value, 0.0);
    }

    #[test]
    fn clamp_limits_each_channel() {
        let pins = vec![
            ("inputR".to_owned(), Value::Number(-0.3)),
            ("inputG".to_owned(), Value::Number(1.4)),
            ("inputB".to_owned(), Value::Number(0.5)),
            ("maxR".to_owned(), Value::Number(1.0)),
            ("maxG".to_owned(), Value::Number(1.0)),
        ];
        let outputs = ComponentKind::Clamp
            .evaluate(&inputs(ComponentKind::Clamp, &pins))
            .unwrap();
        assert_eq!(outputs.get(PIN_OUTPUT), Some(&Value::Vector([0.0, 1.0, 0.0])));
    }
}

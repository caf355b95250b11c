//! Rekenkundige utility-nodes: optellen, vermenigvuldigen en de modulo-som
//! die de ripple-cyclus bepaalt.

use std::collections::BTreeMap;

use crate::graph::value::Value;

use super::coerce::{coerce_number, coerce_vector};
use super::{Component, ComponentResult, InputMap};

pub const PIN_INPUT_1: &str = "input1";
pub const PIN_INPUT_2: &str = "input2";
pub const PIN_DIVISOR: &str = "divisor";
pub const PIN_OUTPUT: &str = "output";

/// Beschikbare componenten binnen deze module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// `input1 + input2`.
    Add,
    /// `input1 * input2`.
    Multiply,
    /// Componentsgewijze vermenigvuldiging van twee vectoren.
    MultiplyVector,
    /// `(input1 + input2) % divisor`; rest heeft het teken van het deeltal.
    ModuloSum,
}

impl Component for ComponentKind {
    fn default_inputs(&self) -> InputMap {
        let mut inputs = BTreeMap::new();
        match self {
            Self::Add | Self::Multiply => {
                inputs.insert(PIN_INPUT_1.to_owned(), Value::Number(0.0));
                inputs.insert(PIN_INPUT_2.to_owned(), Value::Number(0.0));
            }
            Self::MultiplyVector => {
                inputs.insert(PIN_INPUT_1.to_owned(), Value::Vector([0.0; 3]));
                inputs.insert(PIN_INPUT_2.to_owned(), Value::Vector([1.0; 3]));
            }
            Self::ModuloSum => {
                inputs.insert(PIN_INPUT_1.to_owned(), Value::Number(0.0));
                inputs.insert(PIN_INPUT_2.to_owned(), Value::Number(0.0));
                inputs.insert(PIN_DIVISOR.to_owned(), Value::Number(0.0));
            }
        }
        inputs
    }

    fn evaluate(&self, inputs: &InputMap) -> ComponentResult {
        match self {
            Self::Add => evaluate_binary_arithmetic(inputs, |a, b| a + b),
            Self::Multiply => evaluate_binary_arithmetic(inputs, |a, b| a * b),
            Self::MultiplyVector => evaluate_multiply_vector(inputs),
            Self::ModuloSum => evaluate_modulo_sum(inputs),
        }
    }
}

impl ComponentKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "addDoubleLinear",
            Self::Multiply => "multDoubleLinear",
            Self::MultiplyVector => "multiplyDivide",
            Self::ModuloSum => "moduloSum",
        }
    }
}

fn evaluate_binary_arithmetic(
    inputs: &InputMap,
    operation: impl Fn(f64, f64) -> f64,
) -> ComponentResult {
    let a = coerce_number(inputs, PIN_INPUT_1)?;
    let b = coerce_number(inputs, PIN_INPUT_2)?;
    let mut outputs = BTreeMap::new();
    outputs.insert(PIN_OUTPUT.to_owned(), Value::Number(operation(a, b)));
    Ok(outputs)
}

fn evaluate_multiply_vector(inputs: &InputMap) -> ComponentResult {
    let a = coerce_vector(inputs, PIN_INPUT_1)?;
    let b = coerce_vector(inputs, PIN_INPUT_2)?;
    let mut outputs = BTreeMap::new();
    outputs.insert(
        PIN_OUTPUT.to_owned(),
        Value::Vector([a[0] * b[0], a[1] * b[1], a[2] * b[2]]),
    );
    Ok(outputs)
}

fn evaluate_modulo_sum(inputs: &InputMap) -> ComponentResult {
    let sum = coerce_number(inputs, PIN_INPUT_1)? + coerce_number(inputs, PIN_INPUT_2)?;
    let divisor = coerce_number(inputs, PIN_DIVISOR)?;
    // Deler 0 laat de som ongewijzigd door.
    let result = if divisor == 0.0 { sum } else { sum % divisor };
    let mut outputs = BTreeMap::new();
    outputs.insert(PIN_OUTPUT.to_owned(), Value::Number(result));
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::{ComponentKind, PIN_DIVISOR, PIN_INPUT_1, PIN_INPUT_2, PIN_OUTPUT};
    use crate::components::coerce::assign_input;
    use crate::components::Component;
    use crate::graph::value::Value;

    fn run(kind: ComponentKind, pins: &[(&str, Value)]) -> Value {
        let mut inputs = kind.default_inputs();
        for (pin, value) in pins {
            assign_input(&mut inputs, pin, value.clone()).unwrap();
        }
        kind.evaluate(&inputs)
            .expect("evaluatie slaagt")
            .remove(PIN_OUTPUT)
            .expect("output aanwezig")
    }

    #[test]
    fn add_and_multiply_numbers() {
        let pins = [
            (PIN_INPUT_1, Value::Number(0.25)),
            (PIN_INPUT_2, Value::Number(-4.0)),
        ];
        assert_eq!(run(ComponentKind::Add, &pins), Value::Number(-3.75));
        assert_eq!(run(ComponentKind::Multiply, &pins), Value::Number(-1.0));
    }

    #[test]
    fn multiply_vector_defaults_to_zero_times_one() {
        let output = run(
            ComponentKind::MultiplyVector,
            &[
                ("input1X", Value::Number(0.5)),
                (PIN_INPUT_2, Value::Vector([2.0, 3.0, 4.0])),
            ],
        );
        assert_eq!(output, Value::Vector([1.0, 0.0, 0.0]));
    }

    #[test]
    fn modulo_sum_keeps_sign_of_dividend() {
        let output = run(
            ComponentKind::ModuloSum,
            &[
                (PIN_INPUT_1, Value::Number(-7.0)),
                (PIN_INPUT_2, Value::Number(1.0)),
                (PIN_DIVISOR, Value::Number(5.0)),
            ],
        );
        assert_eq!(output, Value::Number(-1.0));

        let wrapped = run(
            ComponentKind::ModuloSum,
            &[
                (PIN_INPUT_1, Value::Number(12.0)),
                (PIN_DIVISOR, Value::Number(5.0)),
            ],
        );
        assert_eq!(wrapped, Value::Number(2.0));
    }

    #[test]
    fn modulo_sum_with_zero_divisor_passes_sum() {
        let output = run(
            ComponentKind::ModuloSum,
            &[
                (PIN_INPUT_1, Value::Number(3.0)),
                (PIN_INPUT_2, Value::Number(4.0)),
                (PIN_DIVISOR, Value::Number(0.0)),
            ],
        );
        assert_eq!(output, Value::Number(7.0));
    }
}

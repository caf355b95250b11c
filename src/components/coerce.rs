//! Hulpfuncties voor het lezen en schrijven van pinwaarden.

use crate::graph::value::{Value, split_channel};

use super::{ComponentError, InputMap, OutputMap};

/// Leest een getal van een pin. Een kanaalpin (`inputR`) leest één component
/// van de onderliggende vector.
pub fn coerce_number(inputs: &InputMap, pin: &str) -> Result<f64, ComponentError> {
    if let Some(value) = inputs.get(pin) {
        return value.as_number().map_err(|err| {
            ComponentError::new(format!("pin `{pin}` verwacht een getal: {err}"))
        });
    }
    if let Some((base, index)) = split_channel(pin) {
        if let Some(value) = inputs.get(base) {
            return coerce_vector_value(value, base).map(|vector| vector[index]);
        }
    }
    Err(ComponentError::new(format!("pin `{pin}` ontbreekt")))
}

/// Leest een vector; een los getal wordt over drie componenten verspreid.
pub fn coerce_vector(inputs: &InputMap, pin: &str) -> Result<[f64; 3], ComponentError> {
    let value = inputs
        .get(pin)
        .ok_or_else(|| ComponentError::new(format!("pin `{pin}` ontbreekt")))?;
    coerce_vector_value(value, pin)
}

fn coerce_vector_value(value: &Value, pin: &str) -> Result<[f64; 3], ComponentError> {
    value
        .as_vector()
        .map_err(|err| ComponentError::new(format!("pin `{pin}` verwacht een vector: {err}")))
}

/// Leest een niet-negatief aantal.
pub fn coerce_count(inputs: &InputMap, pin: &str) -> Result<usize, ComponentError> {
    let value = coerce_number(inputs, pin)?;
    if !value.is_finite() || value < 0.0 {
        return Err(ComponentError::new(format!(
            "pin `{pin}` verwacht een niet-negatief aantal, kreeg {value}"
        )));
    }
    Ok(value.round() as usize)
}

/// Schrijft een waarde naar een pin. Is de pin een kanaal van een bestaande
/// vectorpin, dan wordt alleen die component overschreven.
pub fn assign_input(inputs: &mut InputMap, pin: &str, value: Value) -> Result<(), ComponentError> {
    if inputs.contains_key(pin) {
        inputs.insert(pin.to_owned(), value);
        return Ok(());
    }
    if let Some((base, index)) = split_channel(pin) {
        if let Some(Value::Vector(vector)) = inputs.get_mut(base) {
            vector[index] = value.as_number().map_err(|err| {
                ComponentError::new(format!("kanaal `{pin}` verwacht een getal: {err}"))
            })?;
            return Ok(());
        }
    }
    inputs.insert(pin.to_owned(), value);
    Ok(())
}

/// Voegt voor elke vectoruitgang de losse kanalen toe (`outputX`, `outputR`, ...).
#[must_use]
pub fn expand_vector_outputs(outputs: OutputMap) -> OutputMap {
    let mut expanded = outputs.clone();
    for (pin, value) in outputs {
        if let Value::Vector(vector) = value {
            for (index, component) in vector.iter().enumerate() {
                for suffix in [["X", "Y", "Z"][index], ["R", "G", "B"][index]] {
                    expanded
                        .entry(format!("{pin}{suffix}"))
                        .or_insert(Value::Number(*component));
                }
            }
        }
    }
    expanded
}

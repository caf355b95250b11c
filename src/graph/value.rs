//! Basis Value-enum waarin attribuutwaarden van de rig en resultaten van
//! rekennodes worden opgeslagen.

use core::fmt;

use serde::Serialize;

/// Beschikbare waardetypes binnen het plan en de evaluator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Een enkele numerieke waarde.
    Number(f64),
    /// Een booleaanse waarde (bv. zichtbaarheid).
    Boolean(bool),
    /// Een 3-component vector of kleur.
    Vector([f64; 3]),
    /// Eén sample van een distribute-node.
    Sample(PointSample),
    /// Een lijst van waarden.
    List(Vec<Value>),
}

/// Translatie, rotatie en schaal van één distribute-sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointSample {
    pub translate: [f64; 3],
    pub rotate: [f64; 3],
    pub scale: [f64; 3],
}

impl Value {
    /// Geeft de variantnaam terug. Wordt gebruikt in foutmeldingen.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Number(_) => ValueKind::Number,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Vector(_) => ValueKind::Vector,
            Self::Sample(_) => ValueKind::Sample,
            Self::List(_) => ValueKind::List,
        }
    }

    /// Verwacht een `Number` en retourneert de f64-waarde.
    pub fn expect_number(&self) -> Result<f64, ValueError> {
        match self {
            Self::Number(value) => Ok(*value),
            _ => Err(ValueError::type_mismatch("Number", self.kind())),
        }
    }

    /// Verwacht een lijst en geeft een slice terug.
    pub fn expect_list(&self) -> Result<&[Value], ValueError> {
        match self {
            Self::List(values) => Ok(values),
            _ => Err(ValueError::type_mismatch("List", self.kind())),
        }
    }

    /// Verwacht een `Sample`.
    pub fn expect_sample(&self) -> Result<PointSample, ValueError> {
        match self {
            Self::Sample(sample) => Ok(*sample),
            _ => Err(ValueError::type_mismatch("Sample", self.kind())),
        }
    }

    /// Leest een getal; booleans tellen als 0 of 1.
    pub fn as_number(&self) -> Result<f64, ValueError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Boolean(value) => Ok(if *value { 1.0 } else { 0.0 }),
            _ => Err(ValueError::type_mismatch("Number", self.kind())),
        }
    }

    /// Leest een vector; een getal wordt over alle drie componenten verspreid.
    pub fn as_vector(&self) -> Result<[f64; 3], ValueError> {
        match self {
            Self::Vector(vector) => Ok(*vector),
            Self::Number(value) => Ok([*value; 3]),
            _ => Err(ValueError::type_mismatch("Vector", self.kind())),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<[f64; 3]> for Value {
    fn from(value: [f64; 3]) -> Self {
        Self::Vector(value)
    }
}

impl From<PointSample> for Value {
    fn from(value: PointSample) -> Self {
        Self::Sample(value)
    }
}

/// Typefout voor wanneer een `Value` naar het verkeerde type wordt
/// geconverteerd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueError {
    expected: &'static str,
    found: ValueKind,
}

impl ValueError {
    #[must_use]
    pub fn type_mismatch(expected: &'static str, found: ValueKind) -> Self {
        Self { expected, found }
    }

    #[must_use]
    pub fn expected(&self) -> &'static str {
        self.expected
    }

    #[must_use]
    pub fn found(&self) -> ValueKind {
        self.found
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "verwachtte type `{}` maar kreeg `{}`",
            self.expected, self.found
        )
    }
}

impl std::error::Error for ValueError {}

/// Beschrijft het soort `Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Boolean,
    Vector,
    Sample,
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::Vector => "Vector",
            Self::Sample => "Sample",
            Self::List => "List",
        };
        f.write_str(name)
    }
}

/// Splitst een kanaalpin als `outputR` of `scaleZ` in basisnaam en
/// componentindex.
#[must_use]
pub fn split_channel(pin: &str) -> Option<(&str, usize)> {
    let last = pin.chars().last()?;
    let index = match last {
        'X' | 'R' => 0,
        'Y' | 'G' => 1,
        'Z' | 'B' => 2,
        _ => return None,
    };
    let base = &pin[..pin.len() - 1];
    if base.is_empty() {
        return None;
    }
    Some((base, index))
}

#[cfg(test)]
mod tests {
    use super::{PointSample, Value, ValueError, ValueKind, split_channel};

    #[test]
    fn expect_number_accepts_number() {
        let value = Value::Number(42.0);
        assert_eq!(value.expect_number().unwrap(), 42.0);
    }

    #[test]
    fn expect_number_rejects_wrong_type() {
        let value = Value::Vector([0.0, 0.0, 0.0]);
        let err = value.expect_number().unwrap_err();
        assert_eq!(err.expected(), "Number");
        assert_eq!(err.found(), ValueKind::Vector);
    }

    #[test]
    fn numbers_widen_to_vectors_and_booleans_to_numbers() {
        assert_eq!(Value::Number(2.0).as_vector().unwrap(), [2.0; 3]);
        assert_eq!(Value::Boolean(true).as_number().unwrap(), 1.0);
        assert!(Value::List(vec![]).as_number().is_err());
    }

    #[test]
    fn samples_are_only_read_as_samples() {
        let sample = PointSample {
            translate: [1.0, 0.0, 0.0],
            rotate: [0.0; 3],
            scale: [1.0; 3],
        };
        assert_eq!(Value::from(sample).expect_sample().unwrap(), sample);
        assert!(matches!(
            Value::Number(1.0).expect_sample(),
            Err(ValueError { .. })
        ));
    }

    #[test]
    fn channel_pins_split_on_trailing_component() {
        assert_eq!(split_channel("outputR"), Some(("output", 0)));
        assert_eq!(split_channel("scaleZ"), Some(("scale", 2)));
        assert_eq!(split_channel("inputMax"), None);
        assert_eq!(split_channel("X"), None);
    }
}

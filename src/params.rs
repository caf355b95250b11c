//! Invoerparameters van de rig en de daaruit afgeleide geometrische planning.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Halve breedte van het lint: de stuurcurve wordt +10 en de kopie -10
/// langs de secundaire as verschoven.
pub const RIBBON_HALF_WIDTH: f64 = 10.0;

/// Een van de drie orthogonale wereldassen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    #[must_use]
    pub const fn unit_vector(self) -> [f64; 3] {
        match self {
            Self::X => [1.0, 0.0, 0.0],
            Self::Y => [0.0, 1.0, 0.0],
            Self::Z => [0.0, 0.0, 1.0],
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }

    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        }
    }

    /// Kanaalnaam zoals `rotateX` of `scaleZ`.
    #[must_use]
    pub fn channel(self, base: &str) -> String {
        format!("{base}{}", self.suffix())
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Axis {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            _ => Err(ConfigError::InvalidAxis(value.to_owned())),
        }
    }
}

/// Kleurindices voor de drie controllerrollen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerColors {
    pub left: u8,
    pub middle: u8,
    pub master: u8,
}

impl Default for ControllerColors {
    fn default() -> Self {
        Self {
            left: 18,
            middle: 14,
            master: 20,
        }
    }
}

/// Fouten in de configuratie. Worden altijd gemeld voordat er iets in de
/// scene verandert.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("axes must be 'x', 'y', or 'z', got `{0}`")]
    InvalidAxis(String),
    #[error("primary axis and secondary axis must be different (both `{0}`)")]
    SameAxis(Axis),
    #[error("joint count must be at least 2, got {0}")]
    TooFewJoints(usize),
    #[error("tentacle length must be a positive finite number, got {0}")]
    InvalidLength(f64),
    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),
    #[error("parameter `{name}` must be a finite number")]
    NonFinite { name: String },
}

/// Alle parameters die de host-UI aanlevert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RigParameters {
    /// Naam die in alle gegenereerde nodes terugkomt.
    pub model_name: String,
    /// Naam van de externe mesh die aan de bind-joints gekoppeld wordt.
    pub target_mesh: String,
    pub joint_count: usize,
    pub tentacle_length: f64,
    pub auto_measure_length: bool,
    pub primary_axis: Axis,
    pub secondary_axis: Axis,
    pub roll_axis: Axis,
    pub colors: ControllerColors,
}

impl Default for RigParameters {
    fn default() -> Self {
        Self {
            model_name: "tentacle".to_owned(),
            target_mesh: "tentacle".to_owned(),
            joint_count: 18,
            tentacle_length: 500.0,
            auto_measure_length: true,
            primary_axis: Axis::Y,
            secondary_axis: Axis::Z,
            roll_axis: Axis::X,
            colors: ControllerColors::default(),
        }
    }
}

impl RigParameters {
    #[must_use]
    pub fn builder() -> RigParametersBuilder {
        RigParametersBuilder::default()
    }

    /// Controleert de parameters zonder iets af te leiden.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.primary_axis == self.secondary_axis {
            return Err(ConfigError::SameAxis(self.primary_axis));
        }
        if self.joint_count < 2 {
            return Err(ConfigError::TooFewJoints(self.joint_count));
        }
        if !self.tentacle_length.is_finite() || self.tentacle_length <= 0.0 {
            return Err(ConfigError::InvalidLength(self.tentacle_length));
        }
        if self.model_name.trim().is_empty() {
            return Err(ConfigError::EmptyName {
                field: "model name",
            });
        }
        if self.target_mesh.trim().is_empty() {
            return Err(ConfigError::EmptyName {
                field: "target mesh",
            });
        }
        Ok(())
    }

    /// Valideert en leidt de geometrische planning af.
    pub fn plan(&self) -> Result<GeometryPlan, ConfigError> {
        self.validate()?;

        let count = self.joint_count as f64;
        let curve_step = self.tentacle_length / (count - 1.0);
        let joint_spacing = if self.auto_measure_length {
            self.tentacle_length / count
        } else {
            self.tentacle_length
        };

        Ok(GeometryPlan {
            joint_count: self.joint_count,
            length: self.tentacle_length,
            primary: self.primary_axis,
            secondary: self.secondary_axis,
            roll: self.roll_axis,
            axis_vector: self.primary_axis.unit_vector(),
            curve_step,
            joint_spacing,
        })
    }
}

/// Fluent builder voor [`RigParameters`].
#[derive(Debug, Clone, Default)]
pub struct RigParametersBuilder {
    parameters: RigParameters,
}

impl RigParametersBuilder {
    #[must_use]
    pub fn model_name(mut self, name: impl Into<String>) -> Self {
        self.parameters.model_name = name.into();
        self
    }

    #[must_use]
    pub fn target_mesh(mut self, name: impl Into<String>) -> Self {
        self.parameters.target_mesh = name.into();
        self
    }

    #[must_use]
    pub fn joint_count(mut self, count: usize) -> Self {
        self.parameters.joint_count = count;
        self
    }

    #[must_use]
    pub fn tentacle_length(mut self, length: f64) -> Self {
        self.parameters.tentacle_length = length;
        self
    }

    #[must_use]
    pub fn auto_measure_length(mut self, enabled: bool) -> Self {
        self.parameters.auto_measure_length = enabled;
        self
    }

    #[must_use]
    pub fn axes(mut self, primary: Axis, secondary: Axis, roll: Axis) -> Self {
        self.parameters.primary_axis = primary;
        self.parameters.secondary_axis = secondary;
        self.parameters.roll_axis = roll;
        self
    }

    #[must_use]
    pub fn colors(mut self, colors: ControllerColors) -> Self {
        self.parameters.colors = colors;
        self
    }

    pub fn build(self) -> Result<RigParameters, ConfigError> {
        self.parameters.validate()?;
        Ok(self.parameters)
    }
}

/// Afgeleide, gevalideerde geometrie. Curve en jointketen gebruiken bewust
/// verschillende afstanden: de curve heeft `n - 1` segmenten, de joints worden
/// op `lengte / n` (of `lengte` zonder automatische meting) gezet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryPlan {
    pub joint_count: usize,
    pub length: f64,
    pub primary: Axis,
    pub secondary: Axis,
    pub roll: Axis,
    pub axis_vector: [f64; 3],
    pub curve_step: f64,
    pub joint_spacing: f64,
}

impl GeometryPlan {
    #[must_use]
    pub fn curve_point(&self, index: usize) -> [f64; 3] {
        scale(self.axis_vector, self.curve_step * index as f64)
    }

    #[must_use]
    pub fn joint_position(&self, index: usize) -> [f64; 3] {
        scale(self.axis_vector, self.joint_spacing * index as f64)
    }

    /// V-parameter van de follicle: gelijkmatig over het oppervlak.
    #[must_use]
    pub fn follicle_v(&self, index: usize) -> f64 {
        index as f64 / (self.joint_count - 1) as f64
    }

    #[must_use]
    pub fn controller_count(&self) -> usize {
        self.joint_count - 1
    }

    /// Rotatie die in de joint-oriëntatie gebakken wordt zodat de joint langs
    /// de primaire as wijst.
    #[must_use]
    pub fn orient_bake(&self) -> Option<[f64; 3]> {
        match self.primary {
            Axis::X => Some([0.0, 90.0, 0.0]),
            Axis::Z => Some([90.0, 0.0, 0.0]),
            Axis::Y => None,
        }
    }

    /// Rotatie van de sine-handle zodat de golf loodrecht op de primaire as staat.
    #[must_use]
    pub fn sine_handle_rotation(&self) -> [f64; 3] {
        match self.primary {
            Axis::X => [0.0, 0.0, 90.0],
            Axis::Z => [90.0, 0.0, 0.0],
            Axis::Y => [0.0, 0.0, 0.0],
        }
    }

    #[must_use]
    pub fn non_primary_axes(&self) -> [Axis; 2] {
        match self.primary {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::X, Axis::Z],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }
}

fn scale(vector: [f64; 3], factor: f64) -> [f64; 3] {
    [vector[0] * factor, vector[1] * factor, vector[2] * factor]
}

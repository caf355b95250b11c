#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod components;
pub mod error;
pub mod graph;
pub mod naming;
pub mod params;
pub mod rig;
pub mod scene;

use std::fmt;

use params::{Axis, ConfigError, RigParameters};
use rig::{CurvePlan, Rig};
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

pub use error::RigError;
pub use rig::{build_curve, build_rig};

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Numerieke parameter zoals de host-UI hem als slider toont.
#[derive(Debug, Clone, Copy)]
struct ParameterSlider {
    id: &'static str,
    name: &'static str,
    min: f64,
    max: f64,
    step: f64,
}

const SLIDERS: [ParameterSlider; 5] = [
    ParameterSlider {
        id: "jointCount",
        name: "Joint Count",
        min: 2.0,
        max: 100.0,
        step: 1.0,
    },
    ParameterSlider {
        id: "tentacleLength",
        name: "Tentacle Length",
        min: 1.0,
        max: 10_000.0,
        step: 0.1,
    },
    ParameterSlider {
        id: "leftColor",
        name: "Left Color",
        min: 0.0,
        max: 31.0,
        step: 1.0,
    },
    ParameterSlider {
        id: "middleColor",
        name: "Middle Color",
        min: 0.0,
        max: 31.0,
        step: 1.0,
    },
    ParameterSlider {
        id: "masterColor",
        name: "Master Color",
        min: 0.0,
        max: 31.0,
        step: 1.0,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
struct ParameterExport {
    id: &'static str,
    name: &'static str,
    min: f64,
    max: f64,
    step: f64,
    value: f64,
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct Engine {
    initialized: bool,
    parameters: RigParameters,
    curve: Option<CurvePlan>,
    rig: Option<Rig>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Engine {
        Engine {
            initialized: true,
            parameters: RigParameters::default(),
            curve: None,
            rig: None,
        }
    }

    /// Geeft terug of de engine de minimale initialisatie heeft doorlopen.
    #[wasm_bindgen]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Haal de numerieke parameters op voor UI-generatie.
    #[wasm_bindgen]
    pub fn get_parameters(&self) -> Result<JsValue, JsValue> {
        let exports = parameter_exports(&self.parameters);
        serde_wasm_bindgen::to_value(&exports).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Stel een parameter in op basis van id of naam. Geeft de waarde terug
    /// na clampen en afronden op de stapgrootte.
    #[wasm_bindgen]
    pub fn set_parameter(&mut self, id_or_name: &str, value: f64) -> Result<f64, JsValue> {
        let applied = apply_parameter(&mut self.parameters, id_or_name, value).map_err(to_js_error)?;
        debug_log!("parameter {id_or_name} = {applied}");
        Ok(applied)
    }

    #[wasm_bindgen]
    pub fn set_axes(&mut self, primary: &str, secondary: &str, roll: &str) -> Result<(), JsValue> {
        let primary: Axis = primary.parse().map_err(to_js_error)?;
        let secondary: Axis = secondary.parse().map_err(to_js_error)?;
        let roll: Axis = roll.parse().map_err(to_js_error)?;
        self.parameters.primary_axis = primary;
        self.parameters.secondary_axis = secondary;
        self.parameters.roll_axis = roll;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_names(&mut self, model_name: &str, target_mesh: &str) {
        self.parameters.model_name = model_name.trim().to_owned();
        self.parameters.target_mesh = target_mesh.trim().to_owned();
    }

    #[wasm_bindgen]
    pub fn set_auto_measure(&mut self, enabled: bool) {
        self.parameters.auto_measure_length = enabled;
    }

    /// Trigger "build curve": plant curve, kopie en lint.
    #[wasm_bindgen]
    pub fn build_curve(&mut self) -> Result<JsValue, JsValue> {
        let curve = rig::build_curve(&self.parameters).map_err(to_js_error)?;
        let value = serde_wasm_bindgen::to_value(&curve)
            .map_err(|err| JsValue::from(JsError::new(&err.to_string())))?;
        self.curve = Some(curve);
        Ok(value)
    }

    /// Trigger "build rig": plant de volledige rig.
    #[wasm_bindgen]
    pub fn build_rig(&mut self) -> Result<JsValue, JsValue> {
        let rig = rig::build_rig(&self.parameters).map_err(to_js_error)?;
        debug_log!(
            "rig gepland: {} nodes, {} wires",
            rig.plan().node_count(),
            rig.plan().wire_count()
        );
        let value = serde_wasm_bindgen::to_value(&rig)
            .map_err(|err| JsValue::from(JsError::new(&err.to_string())))?;
        self.rig = Some(rig);
        Ok(value)
    }

    /// Aantal nodes in het laatst geplande rig, of 0.
    #[wasm_bindgen]
    pub fn planned_node_count(&self) -> usize {
        self.rig
            .as_ref()
            .map(|rig| rig.plan().node_count())
            .or_else(|| self.curve.as_ref().map(|curve| curve.plan().node_count()))
            .unwrap_or(0)
    }
}

impl Engine {
    #[must_use]
    pub fn parameters(&self) -> &RigParameters {
        &self.parameters
    }
}

fn parameter_exports(parameters: &RigParameters) -> Vec<ParameterExport> {
    SLIDERS
        .iter()
        .map(|slider| ParameterExport {
            id: slider.id,
            name: slider.name,
            min: slider.min,
            max: slider.max,
            step: slider.step,
            value: parameter_value(parameters, slider.id),
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn parameter_value(parameters: &RigParameters, id: &str) -> f64 {
    match id {
        "jointCount" => parameters.joint_count as f64,
        "tentacleLength" => parameters.tentacle_length,
        "leftColor" => f64::from(parameters.colors.left),
        "middleColor" => f64::from(parameters.colors.middle),
        "masterColor" => f64::from(parameters.colors.master),
        _ => f64::NAN,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn apply_parameter(
    parameters: &mut RigParameters,
    id_or_name: &str,
    value: f64,
) -> Result<f64, ConfigError> {
    let slider = find_slider(id_or_name)
        .ok_or_else(|| ConfigError::UnknownParameter(id_or_name.to_owned()))?;
    if !value.is_finite() {
        return Err(ConfigError::NonFinite {
            name: slider.id.to_owned(),
        });
    }

    let mut clamped = clamp(value, slider.min, slider.max);
    if slider.step > 0.0 {
        clamped = slider.min + ((clamped - slider.min) / slider.step).round() * slider.step;
        clamped = clamp(clamped, slider.min, slider.max);
    }

    match slider.id {
        "jointCount" => parameters.joint_count = clamped as usize,
        "tentacleLength" => parameters.tentacle_length = clamped,
        "leftColor" => parameters.colors.left = clamped as u8,
        "middleColor" => parameters.colors.middle = clamped as u8,
        "masterColor" => parameters.colors.master = clamped as u8,
        other => return Err(ConfigError::UnknownParameter(other.to_owned())),
    }
    Ok(clamped)
}

fn find_slider(id_or_name: &str) -> Option<&'static ParameterSlider> {
    let trimmed = id_or_name.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = normalize_name(trimmed);
    SLIDERS.iter().find(|slider| {
        slider.id == trimmed
            || normalize_name(slider.id) == normalized
            || normalize_name(slider.name) == normalized
    })
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

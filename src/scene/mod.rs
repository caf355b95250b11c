//! De Scene Graph API van de host, plus het uitvoeren van een plan daarop.

use std::fmt;

use thiserror::Error;

use crate::components::ComponentKind;
use crate::graph::node::AttributeSpec;
use crate::graph::operation::{ConstraintKind, ControllerShape, DeformerKind};
use crate::graph::value::Value;

pub mod realize;
pub mod recording;

pub use realize::{PreconditionError, Realization, realize};
pub use recording::{RecordingScene, SceneCall};

/// Fouten die de host teruggeeft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("host rejected `{call}`: {reason}")]
    Rejected { call: &'static str, reason: String },
    #[error("handle `{0}` does not refer to a live scene object")]
    StaleHandle(String),
}

/// Een deformer en de transform-handle die de host erbij aanmaakt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeformerHandles<H> {
    pub deformer: H,
    pub handle: H,
}

/// Primitieve scene-operaties die de host aanbiedt. Elke aanmaak-aanroep
/// krijgt de deterministische naam uit het plan mee.
pub trait SceneGraph {
    type Handle: Clone + fmt::Debug;

    fn create_curve(
        &mut self,
        name: &str,
        points: &[[f64; 3]],
        degree: u8,
    ) -> Result<Self::Handle, SceneError>;

    fn create_loft_surface(
        &mut self,
        name: &str,
        first: &Self::Handle,
        second: &Self::Handle,
        degree: u8,
        section_spans: u32,
    ) -> Result<Self::Handle, SceneError>;

    /// Follicle die live translatie en rotatie van het oppervlak volgt.
    fn create_follicle(
        &mut self,
        name: &str,
        surface: &Self::Handle,
        u: f64,
        v: f64,
    ) -> Result<Self::Handle, SceneError>;

    fn create_joint(&mut self, name: &str, position: [f64; 3])
    -> Result<Self::Handle, SceneError>;

    /// Roteert de joint en bevriest die rotatie in de joint-oriëntatie.
    fn bake_orientation(
        &mut self,
        joint: &Self::Handle,
        rotation: [f64; 3],
    ) -> Result<(), SceneError>;

    fn create_group(
        &mut self,
        name: &str,
        children: &[Self::Handle],
    ) -> Result<Self::Handle, SceneError>;

    fn parent(&mut self, child: &Self::Handle, parent: &Self::Handle) -> Result<(), SceneError>;

    /// Zet `target` op de wereldtransformatie van `source`, zonder blijvende
    /// koppeling.
    fn snap(&mut self, source: &Self::Handle, target: &Self::Handle) -> Result<(), SceneError>;

    fn create_constraint(
        &mut self,
        name: &str,
        kind: ConstraintKind,
        driver: &Self::Handle,
        driven: &Self::Handle,
        maintain_offset: bool,
    ) -> Result<Self::Handle, SceneError>;

    fn create_controller_shape(
        &mut self,
        name: &str,
        shape: &ControllerShape,
    ) -> Result<Self::Handle, SceneError>;

    fn freeze_scale(&mut self, target: &Self::Handle, scale: [f64; 3]) -> Result<(), SceneError>;

    fn create_utility_node(
        &mut self,
        name: &str,
        kind: ComponentKind,
    ) -> Result<Self::Handle, SceneError>;

    fn add_attribute(&mut self, node: &Self::Handle, spec: &AttributeSpec)
    -> Result<(), SceneError>;

    fn set_attribute(
        &mut self,
        node: &Self::Handle,
        attribute: &str,
        value: &Value,
    ) -> Result<(), SceneError>;

    fn connect_attribute(
        &mut self,
        from: &Self::Handle,
        from_attribute: &str,
        to: &Self::Handle,
        to_attribute: &str,
    ) -> Result<(), SceneError>;

    fn create_deformer(
        &mut self,
        name: &str,
        kind: DeformerKind,
        target: &Self::Handle,
    ) -> Result<DeformerHandles<Self::Handle>, SceneError>;

    fn bind_skin(
        &mut self,
        name: &str,
        influences: &[Self::Handle],
        target: &Self::Handle,
        max_influences: Option<usize>,
    ) -> Result<Self::Handle, SceneError>;

    /// Zoekt een bestaande mesh die niet door het plan gemaakt is.
    fn find_mesh(&self, name: &str) -> Option<Self::Handle>;

    fn exists(&self, handle: &Self::Handle) -> bool;
}

//! In-memory host die elke aanroep vastlegt. Wordt gebruikt door de CLI, de
//! wasm-engine (als voorbeeldhost) en de tests.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::components::ComponentKind;
use crate::graph::node::AttributeSpec;
use crate::graph::operation::{ConstraintKind, ControllerShape, ControllerStyle, DeformerKind};
use crate::graph::value::Value;

use super::{DeformerHandles, SceneError, SceneGraph};

/// Soort object in de opgenomen scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectKind {
    Curve,
    Surface,
    Follicle,
    Joint,
    Group,
    Constraint,
    Controller,
    Utility,
    Deformer,
    DeformerHandle,
    SkinCluster,
    Mesh,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneObject {
    pub name: String,
    pub kind: ObjectKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
}

/// Eén opgenomen aanroep. Objecten worden bij naam genoemd zodat het logboek
/// los van de handles te lezen is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "camelCase")]
pub enum SceneCall {
    CreateCurve {
        name: String,
        points: Vec<[f64; 3]>,
        degree: u8,
    },
    #[serde(rename_all = "camelCase")]
    CreateLoftSurface {
        name: String,
        curves: [String; 2],
        degree: u8,
        section_spans: u32,
    },
    CreateFollicle {
        name: String,
        surface: String,
        u: f64,
        v: f64,
    },
    CreateJoint {
        name: String,
        position: [f64; 3],
    },
    BakeOrientation {
        joint: String,
        rotation: [f64; 3],
    },
    CreateGroup {
        name: String,
        children: Vec<String>,
    },
    Parent {
        child: String,
        parent: String,
    },
    Snap {
        source: String,
        target: String,
    },
    #[serde(rename_all = "camelCase")]
    CreateConstraint {
        name: String,
        kind: ConstraintKind,
        driver: String,
        driven: String,
        maintain_offset: bool,
    },
    CreateControllerShape {
        name: String,
        style: ControllerStyle,
        size: f64,
        color: u8,
        points: Vec<[f64; 3]>,
    },
    FreezeScale {
        target: String,
        scale: [f64; 3],
    },
    CreateUtilityNode {
        name: String,
        kind: ComponentKind,
    },
    AddAttribute {
        node: String,
        spec: AttributeSpec,
    },
    SetAttribute {
        node: String,
        attribute: String,
        value: Value,
    },
    ConnectAttribute {
        from: String,
        to: String,
    },
    CreateDeformer {
        name: String,
        kind: DeformerKind,
        target: String,
        handle: String,
    },
    #[serde(rename_all = "camelCase")]
    BindSkin {
        name: String,
        influences: Vec<String>,
        target: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_influences: Option<usize>,
    },
}

impl SceneCall {
    /// Naam van de API-aanroep.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreateCurve { .. } => "createCurve",
            Self::CreateLoftSurface { .. } => "createLoftSurface",
            Self::CreateFollicle { .. } => "createFollicle",
            Self::CreateJoint { .. } => "createJoint",
            Self::BakeOrientation { .. } => "bakeOrientation",
            Self::CreateGroup { .. } => "createGroup",
            Self::Parent { .. } => "parent",
            Self::Snap { .. } => "snap",
            Self::CreateConstraint { .. } => "createConstraint",
            Self::CreateControllerShape { .. } => "createControllerShape",
            Self::FreezeScale { .. } => "freezeScale",
            Self::CreateUtilityNode { .. } => "createUtilityNode",
            Self::AddAttribute { .. } => "addAttribute",
            Self::SetAttribute { .. } => "setAttribute",
            Self::ConnectAttribute { .. } => "connectAttribute",
            Self::CreateDeformer { .. } => "createDeformer",
            Self::BindSkin { .. } => "bindSkin",
        }
    }
}

/// Host zonder echte scene: houdt objecten, hiërarchie, attributen en het
/// aanroeplogboek bij.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RecordingScene {
    objects: Vec<SceneObject>,
    calls: Vec<SceneCall>,
    #[serde(skip)]
    meshes: BTreeMap<String, usize>,
    #[serde(skip)]
    fail_on: HashSet<String>,
}

impl RecordingScene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Voegt een bestaande mesh toe die skin-bindingen kunnen vinden.
    pub fn register_mesh(&mut self, name: impl Into<String>) -> usize {
        let name = name.into();
        let handle = self.push(&name, ObjectKind::Mesh);
        self.meshes.insert(name, handle);
        handle
    }

    /// Laat het aanmaken van het object met deze naam mislukken.
    pub fn fail_on(&mut self, name: impl Into<String>) {
        self.fail_on.insert(name.into());
    }

    #[must_use]
    pub fn calls(&self) -> &[SceneCall] {
        &self.calls
    }

    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    #[must_use]
    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.name == name)
    }

    #[must_use]
    pub fn name_of(&self, handle: usize) -> Option<&str> {
        self.objects.get(handle).map(|object| object.name.as_str())
    }

    /// Naam van de huidige parent in de hiërarchie.
    #[must_use]
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        self.object(name)?
            .parent
            .and_then(|parent| self.name_of(parent))
    }

    #[must_use]
    pub fn attribute(&self, node: &str, attribute: &str) -> Option<&Value> {
        self.object(node)?.attributes.get(attribute)
    }

    /// Alle verbindingen als (`bron.attr`, `doel.attr`).
    #[must_use]
    pub fn connections(&self) -> Vec<(String, String)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SceneCall::ConnectAttribute { from, to } => Some((from.clone(), to.clone())),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn count(&self, kind: ObjectKind) -> usize {
        self.objects
            .iter()
            .filter(|object| object.kind == kind)
            .count()
    }

    fn push(&mut self, name: &str, kind: ObjectKind) -> usize {
        self.objects.push(SceneObject {
            name: name.to_owned(),
            kind,
            parent: None,
            attributes: BTreeMap::new(),
        });
        self.objects.len() - 1
    }

    fn create(
        &mut self,
        call: &'static str,
        name: &str,
        kind: ObjectKind,
    ) -> Result<usize, SceneError> {
        if self.fail_on.contains(name) {
            return Err(SceneError::Rejected {
                call,
                reason: format!("`{name}` kan niet aangemaakt worden"),
            });
        }
        Ok(self.push(name, kind))
    }

    fn name(&self, handle: usize) -> Result<String, SceneError> {
        self.name_of(handle)
            .map(str::to_owned)
            .ok_or_else(|| SceneError::StaleHandle(handle.to_string()))
    }

    fn object_mut(&mut self, handle: usize) -> Result<&mut SceneObject, SceneError> {
        self.objects
            .get_mut(handle)
            .ok_or_else(|| SceneError::StaleHandle(handle.to_string()))
    }
}

impl SceneGraph for RecordingScene {
    type Handle = usize;

    fn create_curve(
        &mut self,
        name: &str,
        points: &[[f64; 3]],
        degree: u8,
    ) -> Result<usize, SceneError> {
        let handle = self.create("createCurve", name, ObjectKind::Curve)?;
        self.calls.push(SceneCall::CreateCurve {
            name: name.to_owned(),
            points: points.to_vec(),
            degree,
        });
        Ok(handle)
    }

    fn create_loft_surface(
        &mut self,
        name: &str,
        first: &usize,
        second: &usize,
        degree: u8,
        section_spans: u32,
    ) -> Result<usize, SceneError> {
        let curves = [self.name(*first)?, self.name(*second)?];
        let handle = self.create("createLoftSurface", name, ObjectKind::Surface)?;
        self.calls.push(SceneCall::CreateLoftSurface {
            name: name.to_owned(),
            curves,
            degree,
            section_spans,
        });
        Ok(handle)
    }

    fn create_follicle(
        &mut self,
        name: &str,
        surface: &usize,
        u: f64,
        v: f64,
    ) -> Result<usize, SceneError> {
        let surface = self.name(*surface)?;
        let handle = self.create("createFollicle", name, ObjectKind::Follicle)?;
        self.calls.push(SceneCall::CreateFollicle {
            name: name.to_owned(),
            surface,
            u,
            v,
        });
        Ok(handle)
    }

    fn create_joint(&mut self, name: &str, position: [f64; 3]) -> Result<usize, SceneError> {
        let handle = self.create("createJoint", name, ObjectKind::Joint)?;
        self.object_mut(handle)?
            .attributes
            .insert("translate".to_owned(), Value::Vector(position));
        self.calls.push(SceneCall::CreateJoint {
            name: name.to_owned(),
            position,
        });
        Ok(handle)
    }

    fn bake_orientation(&mut self, joint: &usize, rotation: [f64; 3]) -> Result<(), SceneError> {
        let name = self.name(*joint)?;
        self.object_mut(*joint)?
            .attributes
            .insert("jointOrient".to_owned(), Value::Vector(rotation));
        self.calls.push(SceneCall::BakeOrientation {
            joint: name,
            rotation,
        });
        Ok(())
    }

    fn create_group(&mut self, name: &str, children: &[usize]) -> Result<usize, SceneError> {
        let names = children
            .iter()
            .map(|child| self.name(*child))
            .collect::<Result<Vec<_>, _>>()?;
        let handle = self.create("createGroup", name, ObjectKind::Group)?;
        for child in children {
            self.object_mut(*child)?.parent = Some(handle);
        }
        self.calls.push(SceneCall::CreateGroup {
            name: name.to_owned(),
            children: names,
        });
        Ok(handle)
    }

    fn parent(&mut self, child: &usize, parent: &usize) -> Result<(), SceneError> {
        let (child_name, parent_name) = (self.name(*child)?, self.name(*parent)?);
        self.object_mut(*child)?.parent = Some(*parent);
        self.calls.push(SceneCall::Parent {
            child: child_name,
            parent: parent_name,
        });
        Ok(())
    }

    fn snap(&mut self, source: &usize, target: &usize) -> Result<(), SceneError> {
        let (source, target) = (self.name(*source)?, self.name(*target)?);
        self.calls.push(SceneCall::Snap { source, target });
        Ok(())
    }

    fn create_constraint(
        &mut self,
        name: &str,
        kind: ConstraintKind,
        driver: &usize,
        driven: &usize,
        maintain_offset: bool,
    ) -> Result<usize, SceneError> {
        let (driver_name, driven_name) = (self.name(*driver)?, self.name(*driven)?);
        let handle = self.create("createConstraint", name, ObjectKind::Constraint)?;
        self.object_mut(handle)?.parent = Some(*driven);
        self.calls.push(SceneCall::CreateConstraint {
            name: name.to_owned(),
            kind,
            driver: driver_name,
            driven: driven_name,
            maintain_offset,
        });
        Ok(handle)
    }

    fn create_controller_shape(
        &mut self,
        name: &str,
        shape: &ControllerShape,
    ) -> Result<usize, SceneError> {
        let handle = self.create("createControllerShape", name, ObjectKind::Controller)?;
        self.object_mut(handle)?
            .attributes
            .insert("overrideColor".to_owned(), Value::Number(f64::from(shape.color)));
        self.calls.push(SceneCall::CreateControllerShape {
            name: name.to_owned(),
            style: shape.style,
            size: shape.size,
            color: shape.color,
            points: shape.outline(),
        });
        Ok(handle)
    }

    fn freeze_scale(&mut self, target: &usize, scale: [f64; 3]) -> Result<(), SceneError> {
        let name = self.name(*target)?;
        self.calls.push(SceneCall::FreezeScale {
            target: name,
            scale,
        });
        Ok(())
    }

    fn create_utility_node(
        &mut self,
        name: &str,
        kind: ComponentKind,
    ) -> Result<usize, SceneError> {
        let handle = self.create("createUtilityNode", name, ObjectKind::Utility)?;
        self.calls.push(SceneCall::CreateUtilityNode {
            name: name.to_owned(),
            kind,
        });
        Ok(handle)
    }

    fn add_attribute(&mut self, node: &usize, spec: &AttributeSpec) -> Result<(), SceneError> {
        let name = self.name(*node)?;
        self.object_mut(*node)?
            .attributes
            .insert(spec.name.clone(), Value::Number(spec.default));
        self.calls.push(SceneCall::AddAttribute {
            node: name,
            spec: spec.clone(),
        });
        Ok(())
    }

    fn set_attribute(
        &mut self,
        node: &usize,
        attribute: &str,
        value: &Value,
    ) -> Result<(), SceneError> {
        let name = self.name(*node)?;
        self.object_mut(*node)?
            .attributes
            .insert(attribute.to_owned(), value.clone());
        self.calls.push(SceneCall::SetAttribute {
            node: name,
            attribute: attribute.to_owned(),
            value: value.clone(),
        });
        Ok(())
    }

    fn connect_attribute(
        &mut self,
        from: &usize,
        from_attribute: &str,
        to: &usize,
        to_attribute: &str,
    ) -> Result<(), SceneError> {
        let from = format!("{}.{from_attribute}", self.name(*from)?);
        let to = format!("{}.{to_attribute}", self.name(*to)?);
        self.calls.push(SceneCall::ConnectAttribute { from, to });
        Ok(())
    }

    fn create_deformer(
        &mut self,
        name: &str,
        kind: DeformerKind,
        target: &usize,
    ) -> Result<DeformerHandles<usize>, SceneError> {
        let target = self.name(*target)?;
        let handle_name = format!("{name}Handle");
        let deformer = self.create("createDeformer", name, ObjectKind::Deformer)?;
        let handle = self.create("createDeformer", &handle_name, ObjectKind::DeformerHandle)?;
        self.calls.push(SceneCall::CreateDeformer {
            name: name.to_owned(),
            kind,
            target,
            handle: handle_name,
        });
        Ok(DeformerHandles { deformer, handle })
    }

    fn bind_skin(
        &mut self,
        name: &str,
        influences: &[usize],
        target: &usize,
        max_influences: Option<usize>,
    ) -> Result<usize, SceneError> {
        let influences = influences
            .iter()
            .map(|joint| self.name(*joint))
            .collect::<Result<Vec<_>, _>>()?;
        let target = self.name(*target)?;
        let handle = self.create("bindSkin", name, ObjectKind::SkinCluster)?;
        self.calls.push(SceneCall::BindSkin {
            name: name.to_owned(),
            influences,
            target,
            max_influences,
        });
        Ok(handle)
    }

    fn find_mesh(&self, name: &str) -> Option<usize> {
        self.meshes.get(name).copied()
    }

    fn exists(&self, handle: &usize) -> bool {
        *handle < self.objects.len()
    }
}

//! Voert een plan in één gesorteerde doorgang uit op een [`SceneGraph`].

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use crate::error::RigError;
use crate::graph::node::{Node, NodeId};
use crate::graph::{Graph, GraphError};
use crate::graph::operation::{Operation, SkinTarget};
use crate::graph::topo::Topology;

use super::{SceneError, SceneGraph};

/// Een overgeslagen stap. Eerder aangemaakte objecten blijven staan.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum PreconditionError {
    #[error("skin binding `{binding}` skipped: target mesh `{mesh}` not found")]
    MissingMesh { binding: String, mesh: String },
    #[error("skin binding `{binding}` skipped: `{node}` does not exist in the scene")]
    MissingNode { binding: String, node: String },
}

/// Verslag van een realisatie.
#[derive(Debug, Clone)]
pub struct Realization<H> {
    /// Scene-object per node die er een oplevert.
    pub handles: BTreeMap<NodeId, H>,
    /// Uitgevoerde nodes in volgorde van uitvoering.
    pub order: Vec<NodeId>,
    pub skipped: Vec<PreconditionError>,
}

impl<H> Realization<H> {
    fn new() -> Self {
        Self {
            handles: BTreeMap::new(),
            order: Vec::new(),
            skipped: Vec::new(),
        }
    }

    #[must_use]
    pub fn handle(&self, node: NodeId) -> Option<&H> {
        self.handles.get(&node)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

enum Step<H> {
    Created(H),
    Applied,
    Skipped(PreconditionError),
}

/// Sorteert het plan en roept per node de scene-API aan. Een cyclus wordt
/// gemeld voordat de scene ook maar één keer aangeroepen is; een fout van de
/// host breekt de doorgang af zonder terug te draaien.
///
/// Inkomende verbindingen van een node worden gelegd zodra de node en al
/// zijn plaatsingsstappen (snap, parent, freeze) uitgevoerd zijn.
pub fn realize<S: SceneGraph>(
    graph: &Graph,
    scene: &mut S,
) -> Result<Realization<S::Handle>, RigError> {
    let topology = Topology::sort(graph)?;
    let connect_after = connection_steps(graph, &topology.order);
    let mut realization = Realization::new();
    let mut deformer_handles: HashMap<NodeId, S::Handle> = HashMap::new();

    for &id in &topology.order {
        let node = graph.node(id).ok_or(GraphError::UnknownNode(id))?;
        debug!("realize {} ({})", node.name, operation_label(&node.operation));

        match create(graph, node, scene, &realization.handles, &mut deformer_handles)? {
            Step::Created(handle) => {
                let failed = |source: SceneError| RigError::Scene {
                    node: node.name.clone(),
                    source,
                };
                for spec in node.declarations() {
                    scene.add_attribute(&handle, spec).map_err(failed)?;
                }
                for (attribute, value) in node.attributes_in_order() {
                    scene.set_attribute(&handle, attribute, value).map_err(failed)?;
                }
                realization.handles.insert(id, handle);
                realization.order.push(id);
            }
            Step::Applied => realization.order.push(id),
            Step::Skipped(precondition) => {
                warn!("{precondition}");
                realization.skipped.push(precondition);
            }
        }

        for &target in connect_after.get(&id).into_iter().flatten() {
            connect_incoming(graph, scene, &realization.handles, target)?;
        }
    }

    debug!(
        "realized {} of {} nodes, {} skipped",
        realization.order.len(),
        graph.node_count(),
        realization.skipped.len()
    );
    Ok(realization)
}

/// Per stap de nodes waarvan de inkomende verbindingen daarna gelegd
/// worden: de laatste plaatsingsstap op de node, anders de node zelf.
fn connection_steps(graph: &Graph, order: &[NodeId]) -> HashMap<NodeId, Vec<NodeId>> {
    let mut last_placement = HashMap::new();
    for &id in order {
        if let Some(target) = graph.node(id).and_then(|node| placement_target(&node.operation)) {
            last_placement.insert(target, id);
        }
    }

    let mut steps: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for &id in order {
        let step = last_placement.get(&id).copied().unwrap_or(id);
        steps.entry(step).or_default().push(id);
    }
    steps
}

/// Node die door deze operatie verplaatst of herschaald wordt.
fn placement_target(operation: &Operation) -> Option<NodeId> {
    match operation {
        Operation::Snap { target, .. } | Operation::FreezeScale { target, .. } => Some(*target),
        Operation::Parent { child, .. } => Some(*child),
        _ => None,
    }
}

fn connect_incoming<S: SceneGraph>(
    graph: &Graph,
    scene: &mut S,
    handles: &BTreeMap<NodeId, S::Handle>,
    target: NodeId,
) -> Result<(), RigError> {
    // Overgeslagen nodes hebben geen handle en dus ook geen verbindingen.
    let Some(handle) = handles.get(&target) else {
        return Ok(());
    };
    for wire in graph.incoming(target) {
        let source = lookup(graph, handles, wire.from_node)?;
        scene
            .connect_attribute(source, wire.from_pin.as_str(), handle, wire.to_pin.as_str())
            .map_err(|source| RigError::Scene {
                node: graph
                    .node(target)
                    .map_or_else(|| format!("#{}", target.0), |node| node.name.clone()),
                source,
            })?;
    }
    Ok(())
}

fn create<S: SceneGraph>(
    graph: &Graph,
    node: &Node,
    scene: &mut S,
    handles: &BTreeMap<NodeId, S::Handle>,
    deformer_handles: &mut HashMap<NodeId, S::Handle>,
) -> Result<Step<S::Handle>, RigError> {
    let name = node.name.as_str();
    let failed = |source: SceneError| RigError::Scene {
        node: name.to_owned(),
        source,
    };
    let get = |id: NodeId| lookup(graph, handles, id);

    let step = match &node.operation {
        Operation::Curve { points, degree } => {
            Step::Created(scene.create_curve(name, points, *degree).map_err(failed)?)
        }
        Operation::Loft {
            curves,
            degree,
            section_spans,
        } => Step::Created(
            scene
                .create_loft_surface(
                    name,
                    get(curves[0])?,
                    get(curves[1])?,
                    *degree,
                    *section_spans,
                )
                .map_err(failed)?,
        ),
        Operation::Follicle { surface, u, v } => Step::Created(
            scene
                .create_follicle(name, get(*surface)?, *u, *v)
                .map_err(failed)?,
        ),
        Operation::Joint {
            position,
            orientation,
        } => {
            let joint = scene.create_joint(name, *position).map_err(failed)?;
            if let Some(rotation) = orientation {
                scene.bake_orientation(&joint, *rotation).map_err(failed)?;
            }
            Step::Created(joint)
        }
        Operation::Group { children } => {
            let children = children
                .iter()
                .map(|child| get(*child).cloned())
                .collect::<Result<Vec<_>, _>>()?;
            Step::Created(scene.create_group(name, &children).map_err(failed)?)
        }
        Operation::Parent { child, parent } => {
            scene.parent(get(*child)?, get(*parent)?).map_err(failed)?;
            Step::Applied
        }
        Operation::Snap { source, target } => {
            scene.snap(get(*source)?, get(*target)?).map_err(failed)?;
            Step::Applied
        }
        Operation::Constraint {
            kind,
            driver,
            driven,
            maintain_offset,
        } => Step::Created(
            scene
                .create_constraint(name, *kind, get(*driver)?, get(*driven)?, *maintain_offset)
                .map_err(failed)?,
        ),
        Operation::ControllerShape(shape) => Step::Created(
            scene
                .create_controller_shape(name, shape)
                .map_err(failed)?,
        ),
        Operation::FreezeScale { target, scale } => {
            scene.freeze_scale(get(*target)?, *scale).map_err(failed)?;
            Step::Applied
        }
        Operation::Utility { kind } => {
            Step::Created(scene.create_utility_node(name, *kind).map_err(failed)?)
        }
        Operation::Deformer { kind, target } => {
            let created = scene
                .create_deformer(name, *kind, get(*target)?)
                .map_err(failed)?;
            deformer_handles.insert(node.id, created.handle);
            Step::Created(created.deformer)
        }
        Operation::DeformerHandle { deformer } => {
            let handle = deformer_handles
                .remove(deformer)
                .ok_or_else(|| RigError::MissingHandle {
                    node: name.to_owned(),
                })?;
            Step::Created(handle)
        }
        Operation::SkinBinding {
            influences,
            target,
            max_influences,
        } => match skin_inputs(graph, node, scene, handles, influences, target) {
            Ok((joints, surface)) => Step::Created(
                scene
                    .bind_skin(name, &joints, &surface, *max_influences)
                    .map_err(failed)?,
            ),
            Err(precondition) => Step::Skipped(precondition),
        },
    };
    Ok(step)
}

/// Controleert dat alle influences en het doel in de scene bestaan.
fn skin_inputs<S: SceneGraph>(
    graph: &Graph,
    node: &Node,
    scene: &S,
    handles: &BTreeMap<NodeId, S::Handle>,
    influences: &[NodeId],
    target: &SkinTarget,
) -> Result<(Vec<S::Handle>, S::Handle), PreconditionError> {
    let live = |id: NodeId| {
        handles
            .get(&id)
            .filter(|handle| scene.exists(handle))
            .cloned()
            .ok_or_else(|| PreconditionError::MissingNode {
                binding: node.name.clone(),
                node: graph
                    .node(id)
                    .map_or_else(|| format!("#{}", id.0), |missing| missing.name.clone()),
            })
    };

    let joints = influences
        .iter()
        .map(|id| live(*id))
        .collect::<Result<Vec<_>, _>>()?;
    let surface = match target {
        SkinTarget::Node(id) => live(*id)?,
        SkinTarget::External(mesh) => {
            scene
                .find_mesh(mesh)
                .ok_or_else(|| PreconditionError::MissingMesh {
                    binding: node.name.clone(),
                    mesh: mesh.clone(),
                })?
        }
    };
    Ok((joints, surface))
}

fn lookup<'a, H>(
    graph: &Graph,
    handles: &'a BTreeMap<NodeId, H>,
    id: NodeId,
) -> Result<&'a H, RigError> {
    handles.get(&id).ok_or_else(|| RigError::MissingHandle {
        node: graph
            .node(id)
            .map_or_else(|| format!("#{}", id.0), |node| node.name.clone()),
    })
}

fn operation_label(operation: &Operation) -> &'static str {
    match operation {
        Operation::Curve { .. } => "curve",
        Operation::Loft { .. } => "loft",
        Operation::Follicle { .. } => "follicle",
        Operation::Joint { .. } => "joint",
        Operation::Group { .. } => "group",
        Operation::Parent { .. } => "parent",
        Operation::Snap { .. } => "snap",
        Operation::Constraint { .. } => "constraint",
        Operation::ControllerShape(_) => "controller",
        Operation::FreezeScale { .. } => "freeze scale",
        Operation::Utility { kind } => kind.name(),
        Operation::Deformer { .. } => "deformer",
        Operation::DeformerHandle { .. } => "deformer handle",
        Operation::SkinBinding { .. } => "skin",
    }
}

//! Skin-bindingen: driver-joints op het lint, bind-joints op de mesh.

use serde::Serialize;

use crate::graph::node::{Node, NodeId};
use crate::graph::operation::{Operation, SkinTarget};
use crate::graph::{Graph, GraphError};
use crate::params::RigParameters;

use super::chain::JointChain;
use super::deformers::DeformerNetwork;
use super::surface::RibbonSurface;

pub const SURFACE_SKIN_NAME: &str = "ribbonSurfaceSkinCluster";
pub const MODEL_SKIN_NAME: &str = "modelSkinCluster";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinBindings {
    pub surface: NodeId,
    pub model: NodeId,
}

/// Bindt alle driver-joints aan het oppervlak en alle bind-joints behalve de
/// laatste aan de doelmesh (maximaal `n / 2` influences). De laatste
/// bind-joint verankert alleen de punt van de keten.
pub(crate) fn build_skin(
    graph: &mut Graph,
    parameters: &RigParameters,
    surface: &RibbonSurface,
    chain: &JointChain,
    deformers: &DeformerNetwork,
) -> Result<SkinBindings, GraphError> {
    let surface_skin = graph.add_node(
        Node::new(
            SURFACE_SKIN_NAME,
            Operation::SkinBinding {
                influences: chain.driver_joints().collect(),
                target: SkinTarget::Node(surface.surface),
                max_influences: None,
            },
        )
        .after(chain.segments.iter().map(|segment| segment.driver_snap)),
    )?;

    let bound = chain.segments.len().saturating_sub(1);
    let model_skin = graph.add_node(
        Node::new(
            MODEL_SKIN_NAME,
            Operation::SkinBinding {
                influences: chain.bind_joints().take(bound).collect(),
                target: SkinTarget::External(parameters.target_mesh.clone()),
                max_influences: Some(parameters.joint_count / 2),
            },
        )
        .after(chain.segments.iter().map(|segment| segment.zero_snap)),
    )?;

    // De deformers komen na de skin in de deformatievolgorde van het lint.
    graph.add_ordering(surface_skin, deformers.twist)?;

    Ok(SkinBindings {
        surface: surface_skin,
        model: model_skin,
    })
}

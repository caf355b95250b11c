//! Jointketen die via follicles aan het lint hangt.
//!
//! Per segment: een follicle op het oppervlak, een bind-joint in een eigen
//! zero-group (gesnapt op de follicle, daarna met offset geconstraind) en een
//! losse driver-joint die alleen gesnapt wordt. Joints worden niet aan elkaar
//! geparent; de beweging loopt via het oppervlak.

use serde::Serialize;

use crate::graph::node::{Node, NodeId};
use crate::graph::operation::{ConstraintKind, Operation};
use crate::graph::{Graph, GraphError};
use crate::naming;
use crate::params::GeometryPlan;

use super::surface::RibbonSurface;

pub const FOLLICLE_GROUP_NAME: &str = "follicle_Group";
const FOLLICLE_U: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub index: usize,
    pub position: [f64; 3],
    pub follicle: NodeId,
    pub bind_joint: NodeId,
    pub zero_group: NodeId,
    pub zero_snap: NodeId,
    pub driver_joint: NodeId,
    pub driver_snap: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JointChain {
    pub segments: Vec<Segment>,
    pub follicle_group: NodeId,
    /// Root van de zero-groups en driver-joints.
    pub joint_group: NodeId,
}

impl JointChain {
    pub fn bind_joints(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.segments.iter().map(|segment| segment.bind_joint)
    }

    pub fn driver_joints(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.segments.iter().map(|segment| segment.driver_joint)
    }
}

pub(crate) fn build_chain(
    graph: &mut Graph,
    model: &str,
    plan: &GeometryPlan,
    surface: &RibbonSurface,
) -> Result<JointChain, GraphError> {
    let mut segments = Vec::with_capacity(plan.joint_count);

    for index in 0..plan.joint_count {
        let position = plan.joint_position(index);
        let joint_name = naming::segment("jnt", model, index);
        let driver_name = naming::segment("drv_jnt", model, index);
        let zero_name = naming::zero_group_of(&joint_name);

        let follicle = graph.add_node(Node::new(
            naming::segment("follicle", model, index),
            Operation::Follicle {
                surface: surface.surface,
                u: FOLLICLE_U,
                v: plan.follicle_v(index),
            },
        ))?;

        let bind_joint = graph.add_node(Node::new(
            joint_name.clone(),
            Operation::Joint {
                position,
                orientation: plan.orient_bake(),
            },
        ))?;
        let zero_group = graph.add_node(Node::new(
            zero_name.clone(),
            Operation::Group {
                children: vec![bind_joint],
            },
        ))?;
        let zero_snap = graph.add_node(Node::new(
            naming::snap_of(&zero_name),
            Operation::Snap {
                source: follicle,
                target: zero_group,
            },
        ))?;
        graph.add_node(
            Node::new(
                naming::parent_constraint_of(&joint_name),
                Operation::Constraint {
                    kind: ConstraintKind::Parent,
                    driver: follicle,
                    driven: bind_joint,
                    maintain_offset: true,
                },
            )
            .after([zero_snap]),
        )?;

        let driver_joint = graph.add_node(Node::new(
            driver_name.clone(),
            Operation::Joint {
                position,
                orientation: plan.orient_bake(),
            },
        ))?;
        let driver_snap = graph.add_node(Node::new(
            naming::snap_of(&driver_name),
            Operation::Snap {
                source: follicle,
                target: driver_joint,
            },
        ))?;

        segments.push(Segment {
            index,
            position,
            follicle,
            bind_joint,
            zero_group,
            zero_snap,
            driver_joint,
            driver_snap,
        });
    }

    let follicle_group = graph.add_node(Node::new(
        FOLLICLE_GROUP_NAME,
        Operation::Group {
            children: segments.iter().map(|segment| segment.follicle).collect(),
        },
    ))?;
    let joint_group = graph.add_node(Node::new(
        format!("{model}_jointGroup"),
        Operation::Group {
            children: segments
                .iter()
                .map(|segment| segment.zero_group)
                .chain(segments.iter().map(|segment| segment.driver_joint))
                .collect(),
        },
    ))?;

    Ok(JointChain {
        segments,
        follicle_group,
        joint_group,
    })
}

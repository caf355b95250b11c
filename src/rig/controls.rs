//! Controllerhiërarchie boven de driver-joints, met de master als root.

use serde::Serialize;

use crate::graph::node::{Node, NodeId};
use crate::graph::operation::{ConstraintKind, ControllerShape, ControllerStyle, Operation};
use crate::graph::{Graph, GraphError};
use crate::naming;
use crate::params::{GeometryPlan, RigParameters};

use super::chain::JointChain;

/// Om de hoeveel controllers een vierkante (master-kleurige) controller komt.
pub const SQUARE_EVERY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Controller {
    pub index: usize,
    pub style: ControllerStyle,
    pub color: u8,
    pub control: NodeId,
    pub group: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    pub controllers: Vec<Controller>,
    pub master: NodeId,
    /// Bevriest de schaal van de master; alles wat onder de master komt, volgt hierna.
    pub freeze: NodeId,
    /// (group, parent) in volgorde van de keten, beginnend bij de master.
    pub hierarchy: Vec<(NodeId, NodeId)>,
}

impl Controls {
    /// Parent van de group van controller `index`.
    #[must_use]
    pub fn parent_of(&self, index: usize) -> Option<NodeId> {
        let group = self.controllers.get(index)?.group;
        self.hierarchy
            .iter()
            .find(|(child, _)| *child == group)
            .map(|(_, parent)| *parent)
    }
}

/// Stijl en kleur van controller `index`.
#[must_use]
pub fn controller_style(index: usize, parameters: &RigParameters) -> (ControllerStyle, u8) {
    if index % SQUARE_EVERY == 0 {
        (ControllerStyle::Square, parameters.colors.left)
    } else {
        (ControllerStyle::Ring, parameters.colors.middle)
    }
}

pub(crate) fn build_controls(
    graph: &mut Graph,
    parameters: &RigParameters,
    plan: &GeometryPlan,
    chain: &JointChain,
) -> Result<Controls, GraphError> {
    let model = parameters.model_name.as_str();
    let spacing = plan.joint_spacing;
    let mut controllers = Vec::with_capacity(plan.controller_count());
    let mut snaps = Vec::with_capacity(plan.controller_count());

    for segment in &chain.segments[..plan.controller_count()] {
        let index = segment.index;
        let (style, color) = controller_style(index, parameters);
        let size = match style {
            ControllerStyle::Square => spacing / 0.5,
            _ => spacing,
        };
        let name = naming::segment("drv_ctrl", model, index);
        let group_name = naming::group_of(&name);

        let control = graph.add_node(Node::new(
            name.clone(),
            Operation::ControllerShape(ControllerShape {
                style,
                size,
                color,
                normal: plan.primary,
            }),
        ))?;
        let group = graph.add_node(Node::new(
            group_name.clone(),
            Operation::Group {
                children: vec![control],
            },
        ))?;
        let snap = graph.add_node(
            Node::new(
                naming::snap_of(&group_name),
                Operation::Snap {
                    source: segment.driver_joint,
                    target: group,
                },
            )
            .after([segment.driver_snap]),
        )?;

        let driver_name = naming::segment("drv_jnt", model, index);
        graph.add_node(
            Node::new(
                naming::parent_constraint_of(&driver_name),
                Operation::Constraint {
                    kind: ConstraintKind::Parent,
                    driver: control,
                    driven: segment.driver_joint,
                    maintain_offset: true,
                },
            )
            .after([snap]),
        )?;
        graph.add_node(
            Node::new(
                naming::scale_constraint_of(&driver_name),
                Operation::Constraint {
                    kind: ConstraintKind::Scale,
                    driver: control,
                    driven: segment.driver_joint,
                    maintain_offset: false,
                },
            )
            .after([snap]),
        )?;

        controllers.push(Controller {
            index,
            style,
            color,
            control,
            group,
        });
        snaps.push(snap);
    }

    // De laatste driver-joint heeft geen eigen controller.
    if let (Some(last), Some(tip)) = (controllers.last(), chain.segments.last()) {
        graph.add_node(
            Node::new(
                naming::parent_constraint_of(&naming::segment("drv_jnt", model, tip.index)),
                Operation::Constraint {
                    kind: ConstraintKind::Parent,
                    driver: last.control,
                    driven: tip.driver_joint,
                    maintain_offset: true,
                },
            )
            .after([tip.driver_snap]),
        )?;
    }

    let mut hierarchy = Vec::with_capacity(controllers.len());
    for (index, pair) in controllers.windows(2).enumerate() {
        let (previous, current) = (pair[0], pair[1]);
        add_parent(
            graph,
            current.group,
            previous.control,
            &[snaps[index], snaps[index + 1]],
        )?;
        hierarchy.push((current.group, previous.control));
    }

    let master_name = naming::master_controller(model);
    let master = graph.add_node(Node::new(
        master_name.clone(),
        Operation::ControllerShape(ControllerShape {
            style: ControllerStyle::Arrow,
            size: 1.0,
            color: parameters.colors.master,
            normal: plan.primary,
        }),
    ))?;
    let freeze = graph.add_node(Node::new(
        naming::freeze_of(&master_name),
        Operation::FreezeScale {
            target: master,
            scale: [spacing / 0.5; 3],
        },
    ))?;
    if let Some(first) = controllers.first() {
        add_parent(graph, first.group, master, &[freeze])?;
        hierarchy.insert(0, (first.group, master));
    }

    for axis in plan.non_primary_axes() {
        let channel = axis.channel("scale");
        graph.connect(master, channel.as_str(), chain.joint_group, channel.as_str())?;
    }

    Ok(Controls {
        controllers,
        master,
        freeze,
        hierarchy,
    })
}

fn add_parent(
    graph: &mut Graph,
    child: NodeId,
    parent: NodeId,
    after: &[NodeId],
) -> Result<NodeId, GraphError> {
    let name = graph
        .node(child)
        .map(|node| naming::parent_of(&node.name))
        .ok_or(GraphError::UnknownNode(child))?;
    graph.add_node(Node::new(name, Operation::Parent { child, parent }).after(after.iter().copied()))
}

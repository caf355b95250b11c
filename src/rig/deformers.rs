//! Twist- en sine-deformers op het lint, bediend vanaf de master en een
//! eindcontroller op de punt.

use serde::Serialize;

use crate::graph::node::{AttributeSpec, NetworkKind, Node, NodeId};
use crate::graph::operation::{ControllerShape, ControllerStyle, DeformerKind, Operation};
use crate::graph::{Graph, GraphError};
use crate::naming;
use crate::params::{GeometryPlan, RigParameters};

use super::controls::Controls;
use super::declare_on;
use super::surface::RibbonSurface;

pub const ATTR_TWIST: &str = "Twist";
pub const ATTR_AMPLITUDE: &str = "Amplitude";
pub const ATTR_WAVELENGTH: &str = "Wavelength";
pub const ATTR_OFFSET: &str = "Offset";
pub const ATTR_SINE_ROTATION: &str = "SineRotation";

const NETWORK: NetworkKind = NetworkKind::Deformer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeformerNetwork {
    pub end_controller: NodeId,
    pub end_group: NodeId,
    pub twist: NodeId,
    pub twist_handle: NodeId,
    pub sine: NodeId,
    pub sine_handle: NodeId,
    /// Verborgen groep met beide handles, onder de master.
    pub node_group: NodeId,
}

pub(crate) fn build_deformers(
    graph: &mut Graph,
    parameters: &RigParameters,
    plan: &GeometryPlan,
    controls: &Controls,
    surface: &RibbonSurface,
) -> Result<DeformerNetwork, GraphError> {
    let master = controls.master;
    let model = parameters.model_name.as_str();
    let end_name = naming::end_controller(model);
    let end_group_name = naming::group_of(&end_name);

    let mut end = Node::new(
        end_name,
        Operation::ControllerShape(ControllerShape {
            style: ControllerStyle::Square,
            size: plan.length / 3.0,
            color: parameters.colors.master,
            normal: plan.primary,
        }),
    )
    .in_network(NETWORK);
    end.declare(AttributeSpec::float(ATTR_TWIST));
    let end_controller = graph.add_node(end)?;

    let end_group = graph.add_node(
        Node::new(
            end_group_name.clone(),
            Operation::Group {
                children: vec![end_controller],
            },
        )
        .with_attribute(plan.primary.channel("translate"), plan.length)
        .in_network(NETWORK),
    )?;
    graph.add_node(
        Node::new(
            naming::parent_of(&end_group_name),
            Operation::Parent {
                child: end_group,
                parent: master,
            },
        )
        .in_network(NETWORK)
        .after([controls.freeze]),
    )?;

    declare_on(
        graph,
        master,
        [
            AttributeSpec::divider("twistDivider", "----- TWIST -----"),
            AttributeSpec::float(ATTR_TWIST),
            AttributeSpec::divider("sineDivider", "----- SINE -----"),
            AttributeSpec::float(ATTR_AMPLITUDE).min(0.0),
            AttributeSpec::float(ATTR_WAVELENGTH)
                .min(0.1)
                .default_value(1.0),
            AttributeSpec::float(ATTR_OFFSET),
            AttributeSpec::float(ATTR_SINE_ROTATION),
        ],
    )?;

    let twist = graph.add_node(
        Node::new(
            "twist_ribbon",
            Operation::Deformer {
                kind: DeformerKind::Twist,
                target: surface.surface,
            },
        )
        .in_network(NETWORK),
    )?;
    let twist_handle = graph.add_node(
        Node::new(
            "twist_ribbonHandle",
            Operation::DeformerHandle { deformer: twist },
        )
        .in_network(NETWORK),
    )?;
    graph.connect(master, ATTR_TWIST, twist, "endAngle")?;
    graph.connect(end_controller, ATTR_TWIST, twist, "startAngle")?;

    let sine = graph.add_node(
        Node::new(
            "sine_ribbon",
            Operation::Deformer {
                kind: DeformerKind::Sine,
                target: surface.surface,
            },
        )
        .with_attribute("dropoff", 1.0)
        .in_network(NETWORK)
        .after([twist]),
    )?;
    let sine_handle = graph.add_node(
        Node::new(
            "sine_ribbonHandle",
            Operation::DeformerHandle { deformer: sine },
        )
        .with_attribute("rotate", plan.sine_handle_rotation())
        .in_network(NETWORK),
    )?;
    graph.connect(master, ATTR_AMPLITUDE, sine, "amplitude")?;
    graph.connect(master, ATTR_WAVELENGTH, sine, "wavelength")?;
    graph.connect(master, ATTR_OFFSET, sine, "offset")?;
    graph.connect(
        master,
        ATTR_SINE_ROTATION,
        sine_handle,
        plan.primary.channel("rotate"),
    )?;

    let node_group_name = format!("{model}_nodeGroup");
    let node_group = graph.add_node(
        Node::new(
            node_group_name.clone(),
            Operation::Group {
                children: vec![twist_handle, sine_handle],
            },
        )
        .with_attribute("visibility", false)
        .in_network(NETWORK),
    )?;
    graph.add_node(
        Node::new(
            naming::parent_of(&node_group_name),
            Operation::Parent {
                child: node_group,
                parent: master,
            },
        )
        .in_network(NETWORK)
        .after([controls.freeze]),
    )?;

    Ok(DeformerNetwork {
        end_controller,
        end_group,
        twist,
        twist_handle,
        sine,
        sine_handle,
        node_group,
    })
}

#[cfg(test)]
mod tests {
    use super::{ATTR_SINE_ROTATION, ATTR_TWIST};
    use crate::graph::evaluator::{EvaluationInputs, evaluate};
    use crate::graph::operation::{ControllerStyle, Operation};
    use crate::graph::topo::Topology;
    use crate::graph::value::Value;
    use crate::params::{Axis, RigParameters};
    use crate::rig::build_rig;

    #[test]
    fn end_controller_sits_at_tip() {
        let rig = build_rig(&RigParameters::default()).unwrap();
        let deformers = rig.deformers();
        let group = rig.plan().node(deformers.end_group).unwrap();
        assert_eq!(group.attribute("translateY"), Some(&Value::Number(500.0)));

        let Operation::ControllerShape(shape) = rig.plan().node(rig.end_controller()).unwrap().operation
        else {
            panic!("controller verwacht");
        };
        assert_eq!(shape.style, ControllerStyle::Square);
        assert!((shape.size - 500.0 / 3.0).abs() < 1e-12);
        assert_eq!(shape.color, 20);
    }

    #[test]
    fn children_of_master_wait_for_frozen_scale() {
        for count in [2, 7] {
            let rig = build_rig(&RigParameters::builder().joint_count(count).build().unwrap())
                .unwrap();
            let freeze = rig.controls().freeze;
            let order = Topology::sort(rig.plan()).unwrap().order;
            let position = |id| order.iter().position(|other| *other == id).unwrap();

            for name in [
                "parent_CTRL_M_TentacleDrv_End_001_grp",
                "parent_tentacle_nodeGroup",
            ] {
                let parent = rig.plan().node_named(name).unwrap();
                assert!(parent.ordering().contains(&freeze), "{name}");
                assert!(position(freeze) < position(parent.id), "{name}");
            }
        }
    }

    #[test]
    fn twist_angles_come_from_master_and_end() {
        let rig = build_rig(&RigParameters::default()).unwrap();
        let deformers = rig.deformers();
        let inputs = EvaluationInputs::new()
            .with(rig.master(), ATTR_TWIST, 180.0)
            .with(deformers.end_controller, ATTR_TWIST, -45.0);
        let result = evaluate(rig.plan(), &inputs).unwrap();
        assert_eq!(result.number(deformers.twist, "endAngle"), Some(180.0));
        assert_eq!(result.number(deformers.twist, "startAngle"), Some(-45.0));
        assert_eq!(result.number(deformers.sine, "wavelength"), Some(1.0));
    }

    #[test]
    fn sine_handle_is_rotated_off_primary_axis() {
        let parameters = RigParameters::builder()
            .axes(Axis::X, Axis::Z, Axis::Y)
            .joint_count(4)
            .build()
            .unwrap();
        let rig = build_rig(&parameters).unwrap();
        let handle = rig.plan().node(rig.deformers().sine_handle).unwrap();
        assert_eq!(
            handle.attribute("rotate"),
            Some(&Value::Vector([0.0, 0.0, 90.0]))
        );
        let pins: Vec<(&str, &str)> = rig
            .plan()
            .incoming(handle.id)
            .map(|wire| (wire.from_pin.as_str(), wire.to_pin.as_str()))
            .collect();
        assert_eq!(pins, vec![(ATTR_SINE_ROTATION, "rotateX")]);
        assert_eq!(
            rig.plan().node(rig.deformers().sine).unwrap().attribute("dropoff"),
            Some(&Value::Number(1.0))
        );
    }
}

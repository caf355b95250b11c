//! Roll-netwerk: een rotatiegolf die bij oplopende `Roll` langs de
//! controllers naar beneden loopt.
//!
//! Controller `i` van `n` rolt in het venster `[1 - (i+1)/n - falloff,
//! 1 - i/n]` van `Roll`; het genormaliseerde gewicht gaat via het
//! distribute-sample en `Angle` naar de rotatie van de controllergroep.

use serde::Serialize;

use crate::components::ComponentKind;
use crate::components::maths_domain::{
    PIN_INPUT_MAX, PIN_INPUT_MIN, PIN_INPUT_VALUE, PIN_OUT_VALUE,
};
use crate::components::maths_operators::{PIN_INPUT_1, PIN_INPUT_2, PIN_OUTPUT};
use crate::components::sets_distribute::{
    PIN_INPUT_POINTS, PIN_OUTPUT_POINTS, PIN_POINT_COUNT, SampleChannel, breakout_pin,
};
use crate::graph::node::{AttributeSpec, NetworkKind, NodeId};
use crate::graph::{Graph, GraphError};
use crate::naming;
use crate::params::GeometryPlan;

use super::controls::Controls;
use super::{declare_on, utility};

pub const ATTR_ROLL: &str = "Roll";
pub const ATTR_ANGLE: &str = "Angle";
pub const ATTR_FALLOFF: &str = "Falloff";

const NETWORK: NetworkKind = NetworkKind::Roll;

/// Nodes van één controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollSegment {
    pub weight_remap: NodeId,
    pub start_add: NodeId,
    pub start_clamp: NodeId,
    pub rotate_weight: NodeId,
    pub rotate_angle: NodeId,
    /// Controllergroep die geroteerd wordt.
    pub target: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollNetwork {
    pub falloff_reverse: NodeId,
    pub distribute: NodeId,
    pub breakout: NodeId,
    pub segments: Vec<RollSegment>,
}

/// Onder- en bovengrens van het rollvenster van controller `index`.
#[must_use]
pub fn roll_window(index: usize, count: usize) -> (f64, f64) {
    let count = count as f64;
    let index = index as f64;
    (1.0 - (index + 1.0) / count, 1.0 - index / count)
}

pub(crate) fn build_roll(
    graph: &mut Graph,
    model: &str,
    plan: &GeometryPlan,
    controls: &Controls,
) -> Result<RollNetwork, GraphError> {
    let master = controls.master;
    declare_on(
        graph,
        master,
        [
            AttributeSpec::divider("rollDivider", "----- ROLL -----"),
            AttributeSpec::float(ATTR_ROLL).range(0.0, 1.0),
            AttributeSpec::float(ATTR_ANGLE).default_value(-70.0),
            AttributeSpec::float(ATTR_FALLOFF).range(0.0, 1.0),
        ],
    )?;

    let falloff_reverse = graph.add_node(
        utility(
            naming::indexed(&format!("mult_m_{model}RollFalloffRvs"), 0),
            ComponentKind::MULTIPLY,
            NETWORK,
        )
        .with_attribute(PIN_INPUT_2, -1.0),
    )?;
    graph.connect(master, ATTR_FALLOFF, falloff_reverse, PIN_INPUT_1)?;

    let count = controls.controllers.len();
    let roll_rotate = plan.roll.channel("rotate");
    let distribute = graph.add_node(
        utility(
            naming::indexed(&format!("distribute_m_{model}Roll"), 0),
            ComponentKind::DISTRIBUTE,
            NETWORK,
        )
        .with_attribute(PIN_POINT_COUNT, count as f64)
        .with_attribute(roll_rotate.clone(), 1.0),
    )?;
    let breakout = graph.add_node(utility(
        naming::indexed(&format!("breakout_m_{model}Roll"), 0),
        ComponentKind::BREAKOUT,
        NETWORK,
    ))?;
    graph.connect(distribute, PIN_OUTPUT_POINTS, breakout, PIN_INPUT_POINTS)?;

    let weight_input = plan.roll.channel(PIN_INPUT_1);
    let weight_output = plan.roll.channel(PIN_OUTPUT);
    let mut segments = Vec::with_capacity(count);
    for (index, controller) in controls.controllers.iter().enumerate() {
        let (weight_min, weight_max) = roll_window(index, count);

        let weight_remap = graph.add_node(
            utility(
                naming::indexed(&format!("remap_m_{model}RollWeight"), index),
                ComponentKind::REMAP,
                NETWORK,
            )
            .with_attribute(PIN_INPUT_MAX, weight_max),
        )?;
        graph.connect(master, ATTR_ROLL, weight_remap, PIN_INPUT_VALUE)?;

        // Falloff laat een controller al rollen voordat de vorige klaar is.
        let start_add = graph.add_node(
            utility(
                naming::indexed(&format!("add_m_{model}RollStart"), index),
                ComponentKind::ADD,
                NETWORK,
            )
            .with_attribute(PIN_INPUT_1, weight_min),
        )?;
        graph.connect(falloff_reverse, PIN_OUTPUT, start_add, PIN_INPUT_2)?;

        let start_clamp = graph.add_node(
            utility(
                naming::indexed(&format!("clamp_m_{model}RollStart"), index),
                ComponentKind::CLAMP,
                NETWORK,
            )
            .with_attribute("maxR", 1.0),
        )?;
        graph.connect(start_add, PIN_OUTPUT, start_clamp, "inputR")?;
        graph.connect(start_clamp, "outputR", weight_remap, PIN_INPUT_MIN)?;

        let rotate_weight = graph.add_node(utility(
            naming::indexed(&format!("mult_m_{model}RotWeight"), index),
            ComponentKind::MULTIPLY_VECTOR,
            NETWORK,
        ))?;
        graph.connect(weight_remap, PIN_OUT_VALUE, rotate_weight, weight_input.as_str())?;
        graph.connect(
            breakout,
            breakout_pin(index, SampleChannel::Rotate),
            rotate_weight,
            PIN_INPUT_2,
        )?;

        let rotate_angle = graph.add_node(utility(
            naming::indexed(&format!("mult_m_{model}RotAngle"), index),
            ComponentKind::MULTIPLY,
            NETWORK,
        ))?;
        graph.connect(rotate_weight, weight_output.as_str(), rotate_angle, PIN_INPUT_1)?;
        graph.connect(master, ATTR_ANGLE, rotate_angle, PIN_INPUT_2)?;
        graph.connect(rotate_angle, PIN_OUTPUT, controller.group, roll_rotate.as_str())?;

        segments.push(RollSegment {
            weight_remap,
            start_add,
            start_clamp,
            rotate_weight,
            rotate_angle,
            target: controller.group,
        });
    }

    Ok(RollNetwork {
        falloff_reverse,
        distribute,
        breakout,
        segments,
    })
}

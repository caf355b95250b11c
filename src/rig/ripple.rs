//! Ripple-netwerk: een lopende verdikking over de bind-joints.

use serde::Serialize;

use crate::components::ComponentKind;
use crate::components::maths_domain::{
    Interpolation, PIN_INPUT_MAX, PIN_INPUT_VALUE, PIN_OUT_VALUE, RampField, ramp_pin,
};
use crate::components::maths_operators::{PIN_DIVISOR, PIN_INPUT_1, PIN_INPUT_2, PIN_OUTPUT};
use crate::components::sets_distribute::{
    PIN_INPUT_POINTS, PIN_OUTPUT_POINTS, PIN_POINT_COUNT, SampleChannel, breakout_pin,
};
use crate::components::vector_blend::{PIN_BLENDER, PIN_COLOR_1, PIN_COLOR_2};
use crate::graph::node::{AttributeSpec, NetworkKind, NodeId};
use crate::graph::{Graph, GraphError};
use crate::naming;
use crate::params::{Axis, GeometryPlan};

use super::chain::JointChain;
use super::{declare_on, utility};

pub const ATTR_RIPPLE: &str = "Ripple";
pub const ATTR_FREQUENCY: &str = "RippleFrequency";
pub const ATTR_AMPLITUDE: &str = "RippleAmplitude";
pub const ATTR_OFFSET: &str = "RippleOffset";
pub const ATTR_FALLOFF: &str = "RippleFalloff";

const NETWORK: NetworkKind = NetworkKind::Ripple;

/// Kleurkanaal van `blendColors` dat bij een as hoort.
fn color_channel(base: &str, axis: Axis) -> String {
    let suffix = match axis {
        Axis::X => "R",
        Axis::Y => "G",
        Axis::Z => "B",
    };
    format!("{base}{suffix}")
}

/// Venster van joint `index` van `count`: (in, midden, uit), zonder falloff.
#[must_use]
pub fn ripple_window(index: usize, count: usize) -> (f64, f64, f64) {
    let unit = 1.0 / (count as f64 + 1.0);
    let index = index as f64;
    (index * unit, (index + 0.5) * unit, (index + 1.0) * unit)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RippleJoint {
    pub remap: NodeId,
    pub add_in: NodeId,
    pub add_out: NodeId,
    pub clamp: NodeId,
    pub blend: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RippleNetwork {
    /// `(Ripple + RippleOffset) % RippleFrequency`.
    pub ripple_out: NodeId,
    /// Positie binnen de cyclus, genormaliseerd naar 0..1.
    pub cycle: NodeId,
    pub falloff_negate: NodeId,
    pub distribute: NodeId,
    pub breakout: NodeId,
    pub joints: Vec<RippleJoint>,
}

pub(crate) fn build_ripple(
    graph: &mut Graph,
    model: &str,
    plan: &GeometryPlan,
    master: NodeId,
    chain: &JointChain,
) -> Result<RippleNetwork, GraphError> {
    declare_on(
        graph,
        master,
        [
            AttributeSpec::divider("rippleDivider", "----- RIPPLE -----"),
            AttributeSpec::float(ATTR_RIPPLE),
            AttributeSpec::float(ATTR_FREQUENCY).min(0.0).default_value(5.0),
            AttributeSpec::float(ATTR_AMPLITUDE).min(1.0).default_value(1.5),
            AttributeSpec::float(ATTR_OFFSET),
            AttributeSpec::float(ATTR_FALLOFF)
                .range(0.0, 1.0)
                .default_value(0.05),
        ],
    )?;

    let ripple_out = graph.add_node(utility(
        naming::indexed(&format!("modulo_m_{model}RippleOut"), 0),
        ComponentKind::MODULO_SUM,
        NETWORK,
    ))?;
    graph.connect(master, ATTR_RIPPLE, ripple_out, PIN_INPUT_1)?;
    graph.connect(master, ATTR_OFFSET, ripple_out, PIN_INPUT_2)?;
    graph.connect(master, ATTR_FREQUENCY, ripple_out, PIN_DIVISOR)?;

    let cycle = graph.add_node(utility(
        naming::indexed(&format!("remap_m_{model}RippleVal"), 0),
        ComponentKind::REMAP,
        NETWORK,
    ))?;
    graph.connect(ripple_out, PIN_OUTPUT, cycle, PIN_INPUT_VALUE)?;
    graph.connect(master, ATTR_FREQUENCY, cycle, PIN_INPUT_MAX)?;

    let falloff_negate = graph.add_node(
        utility(
            naming::indexed(&format!("mult_m_{model}RippleNeg"), 0),
            ComponentKind::MULTIPLY,
            NETWORK,
        )
        .with_attribute(PIN_INPUT_2, -1.0),
    )?;
    graph.connect(master, ATTR_FALLOFF, falloff_negate, PIN_INPUT_1)?;

    let count = chain.segments.len();
    let distribute = graph.add_node(
        utility(
            naming::indexed(&format!("distribute_m_{model}Ripple"), 0),
            ComponentKind::DISTRIBUTE,
            NETWORK,
        )
        .with_attribute(PIN_POINT_COUNT, count as f64),
    )?;
    for axis in plan.non_primary_axes() {
        graph.connect(master, ATTR_AMPLITUDE, distribute, axis.channel("scale"))?;
    }
    let breakout = graph.add_node(utility(
        naming::indexed(&format!("breakout_m_{model}Ripple"), 0),
        ComponentKind::BREAKOUT,
        NETWORK,
    ))?;
    graph.connect(distribute, PIN_OUTPUT_POINTS, breakout, PIN_INPUT_POINTS)?;

    let smooth = Interpolation::Smooth.code();
    let mut joints = Vec::with_capacity(count);
    for segment in &chain.segments {
        let index = segment.index;
        let (edge_in, center, edge_out) = ripple_window(index, count);

        // Driehoek: 0 op de randen, 1 in het midden.
        let remap = graph.add_node(
            utility(
                naming::indexed(&format!("remap_m_{model}Ripple"), index),
                ComponentKind::REMAP,
                NETWORK,
            )
            .with_attribute(ramp_pin(1, RampField::Position), center)
            .with_attribute(ramp_pin(1, RampField::Value), 1.0)
            .with_attribute(ramp_pin(1, RampField::Interp), smooth)
            .with_attribute(ramp_pin(0, RampField::Value), 0.0)
            .with_attribute(ramp_pin(0, RampField::Interp), smooth)
            .with_attribute(ramp_pin(2, RampField::Value), 0.0)
            .with_attribute(ramp_pin(2, RampField::Interp), smooth),
        )?;
        graph.connect(cycle, PIN_OUT_VALUE, remap, PIN_INPUT_VALUE)?;

        let add_in = graph.add_node(
            utility(
                naming::indexed(&format!("add_m_{model}RippleIn"), index),
                ComponentKind::ADD,
                NETWORK,
            )
            .with_attribute(PIN_INPUT_1, edge_in),
        )?;
        graph.connect(falloff_negate, PIN_OUTPUT, add_in, PIN_INPUT_2)?;

        let add_out = graph.add_node(
            utility(
                naming::indexed(&format!("add_m_{model}RippleOut"), index),
                ComponentKind::ADD,
                NETWORK,
            )
            .with_attribute(PIN_INPUT_1, edge_out),
        )?;
        graph.connect(master, ATTR_FALLOFF, add_out, PIN_INPUT_2)?;

        let clamp = graph.add_node(
            utility(
                naming::indexed(&format!("clamp_m_{model}Ripple"), index),
                ComponentKind::CLAMP,
                NETWORK,
            )
            .with_attribute("maxR", 1.0)
            .with_attribute("maxG", 1.0),
        )?;
        graph.connect(add_in, PIN_OUTPUT, clamp, "inputR")?;
        graph.connect(add_out, PIN_OUTPUT, clamp, "inputG")?;
        graph.connect(clamp, "outputR", remap, ramp_pin(0, RampField::Position))?;
        graph.connect(clamp, "outputG", remap, ramp_pin(2, RampField::Position))?;

        let blend = graph.add_node(
            utility(
                naming::indexed(&format!("blend_m_{model}RippleScale"), index),
                ComponentKind::BLEND,
                NETWORK,
            )
            .with_attribute(PIN_COLOR_2, [1.0, 1.0, 1.0]),
        )?;
        graph.connect(remap, PIN_OUT_VALUE, blend, PIN_BLENDER)?;
        graph.connect(
            breakout,
            breakout_pin(index, SampleChannel::Scale),
            blend,
            PIN_COLOR_1,
        )?;
        for axis in plan.non_primary_axes() {
            graph.connect(
                blend,
                color_channel(PIN_OUTPUT, axis),
                segment.bind_joint,
                axis.channel("scale"),
            )?;
        }

        joints.push(RippleJoint {
            remap,
            add_in,
            add_out,
            clamp,
            blend,
            target: segment.bind_joint,
        });
    }

    Ok(RippleNetwork {
        ripple_out,
        cycle,
        falloff_negate,
        distribute,
        breakout,
        joints,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        ATTR_AMPLITUDE, ATTR_FALLOFF, ATTR_FREQUENCY, ATTR_OFFSET, ATTR_RIPPLE, ripple_window,
    };
    use crate::graph::evaluator::{EvaluationInputs, EvaluationResult, evaluate};
    use crate::graph::node::NetworkKind;
    use crate::params::{Axis, RigParameters};
    use crate::rig::{Rig, build_rig};

    const COUNT: usize = 6;

    fn rig() -> Rig {
        build_rig(&RigParameters::builder().joint_count(COUNT).build().unwrap()).unwrap()
    }

    /// Evalueert met een cycluspositie `phase` in 0..1 (frequentie 5).
    fn evaluate_at(rig: &Rig, phase: f64, falloff: f64) -> EvaluationResult {
        let inputs = EvaluationInputs::new()
            .with(rig.master(), ATTR_RIPPLE, phase * 5.0)
            .with(rig.master(), ATTR_FALLOFF, falloff);
        evaluate(rig.plan(), &inputs).unwrap()
    }

    fn weight(rig: &Rig, result: &EvaluationResult, index: usize) -> f64 {
        result
            .number(rig.ripple().joints[index].remap, "outValue")
            .unwrap()
    }

    #[test]
    fn one_chain_per_bind_joint() {
        let rig = rig();
        assert_eq!(rig.ripple().joints.len(), COUNT);
        assert_eq!(rig.network_stats(NetworkKind::Ripple).nodes, 5 + 5 * COUNT);
    }

    #[test]
    fn weight_peaks_at_window_center() {
        let rig = rig();
        for index in 0..COUNT {
            let (_, center, _) = ripple_window(index, COUNT);
            let result = evaluate_at(&rig, center, 0.05);
            assert!((weight(&rig, &result, index) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn weight_is_zero_outside_window() {
        let rig = rig();
        let index = 2;
        let (edge_in, _, edge_out) = ripple_window(index, COUNT);
        for phase in [edge_in - 0.05, edge_in - 0.1, edge_out + 0.05, 0.99] {
            let result = evaluate_at(&rig, phase, 0.05);
            assert!(weight(&rig, &result, index).abs() < 1e-9, "fase {phase}");
        }
    }

    #[test]
    fn full_weight_scales_by_amplitude_on_non_primary_axes() {
        let rig = rig();
        let (_, center, _) = ripple_window(0, COUNT);
        let inputs = EvaluationInputs::new()
            .with(rig.master(), ATTR_RIPPLE, center * 5.0)
            .with(rig.master(), ATTR_AMPLITUDE, 2.0);
        let result = evaluate(rig.plan(), &inputs).unwrap();

        let joint = rig.ripple().joints[0].target;
        assert!((result.number(joint, "scaleX").unwrap() - 2.0).abs() < 1e-9);
        assert!((result.number(joint, "scaleZ").unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(result.number(joint, "scaleY"), Some(1.0));

        let far = rig.ripple().joints[COUNT - 1].target;
        assert!((result.number(far, "scaleX").unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ripple_wraps_around_frequency() {
        let rig = rig();
        let (_, center, _) = ripple_window(1, COUNT);
        let inputs = EvaluationInputs::new()
            .with(rig.master(), ATTR_RIPPLE, 12.0)
            .with(rig.master(), ATTR_OFFSET, center * 5.0 - 2.0)
            .with(rig.master(), ATTR_FREQUENCY, 5.0);
        let result = evaluate(rig.plan(), &inputs).unwrap();
        let out = result.number(rig.ripple().ripple_out, "output").unwrap();
        assert!((out - center * 5.0).abs() < 1e-9);
        assert!((weight(&rig, &result, 1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn primary_x_drives_y_and_z() {
        let parameters = RigParameters::builder()
            .joint_count(3)
            .axes(Axis::X, Axis::Y, Axis::X)
            .build()
            .unwrap();
        let rig = build_rig(&parameters).unwrap();
        let joint = rig.ripple().joints[0].target;
        let wires: Vec<(&str, &str)> = rig
            .plan()
            .incoming(joint)
            .map(|wire| (wire.from_pin.as_str(), wire.to_pin.as_str()))
            .collect();
        assert_eq!(wires, vec![("outputG", "scaleY"), ("outputB", "scaleZ")]);
    }
}

//! Stuurcurve, verschoven kopie en het geloft lint daartussen.

use serde::Serialize;

use crate::graph::node::{Node, NodeId};
use crate::graph::operation::Operation;
use crate::graph::{Graph, GraphError};
use crate::params::{GeometryPlan, RIBBON_HALF_WIDTH};

pub const CURVE_NAME: &str = "crv_ribbon";
pub const OFFSET_CURVE_NAME: &str = "crv_ribbon_offset";
pub const SURFACE_NAME: &str = "surface_ribbon";
pub const GROUP_NAME: &str = "ribbon_Group";

const LOFT_DEGREE: u8 = 3;
const LOFT_SECTION_SPANS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RibbonSurface {
    pub curve: NodeId,
    pub offset_curve: NodeId,
    pub surface: NodeId,
    pub group: NodeId,
}

pub(crate) fn build_surface(
    graph: &mut Graph,
    plan: &GeometryPlan,
) -> Result<RibbonSurface, GraphError> {
    let points: Vec<[f64; 3]> = (0..plan.joint_count)
        .map(|index| plan.curve_point(index))
        .collect();
    let offset_channel = plan.secondary.channel("translate");

    let curve = graph.add_node(
        Node::new(
            CURVE_NAME,
            Operation::Curve {
                points: points.clone(),
                degree: 1,
            },
        )
        .with_attribute(offset_channel.clone(), RIBBON_HALF_WIDTH)
        .with_attribute("visibility", false),
    )?;
    let offset_curve = graph.add_node(
        Node::new(OFFSET_CURVE_NAME, Operation::Curve { points, degree: 1 })
            .with_attribute(offset_channel, -RIBBON_HALF_WIDTH)
            .with_attribute("visibility", false),
    )?;

    // Loften gebeurt nadat beide curves verschoven zijn.
    let surface = graph.add_node(
        Node::new(
            SURFACE_NAME,
            Operation::Loft {
                curves: [offset_curve, curve],
                degree: LOFT_DEGREE,
                section_spans: LOFT_SECTION_SPANS,
            },
        )
        .with_attribute("visibility", false),
    )?;
    let group = graph.add_node(Node::new(
        GROUP_NAME,
        Operation::Group {
            children: vec![curve, offset_curve, surface],
        },
    ))?;

    Ok(RibbonSurface {
        curve,
        offset_curve,
        surface,
        group,
    })
}

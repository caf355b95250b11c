//! De pipeline die een volledig rigplan opbouwt.
//!
//! Elke stap voegt nodes toe aan één gedeelde [`Graph`] en geeft een
//! descriptor met `NodeId`s terug die de volgende stap gebruikt. Er wordt
//! nooit op naam gezocht.

use log::debug;
use serde::Serialize;

use crate::components::ComponentKind;
use crate::error::RigError;
use crate::graph::evaluator::{self, EvaluationInputs, EvaluationResult};
use crate::graph::node::{AttributeSpec, NetworkKind, Node, NodeId};
use crate::graph::operation::Operation;
use crate::graph::{Graph, GraphError, NetworkStats};
use crate::params::{GeometryPlan, RigParameters};
use crate::scene::{Realization, SceneGraph, realize};

pub mod chain;
pub mod controls;
pub mod deformers;
pub mod ripple;
pub mod roll;
pub mod skin;
pub mod surface;

use chain::{JointChain, Segment};
use controls::{Controller, Controls};
use deformers::DeformerNetwork;
use ripple::RippleNetwork;
use roll::RollNetwork;
use skin::SkinBindings;
use surface::RibbonSurface;

/// Resultaat van "build curve": alleen curve, kopie en lint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvePlan {
    geometry: GeometryPlan,
    surface: RibbonSurface,
    plan: Graph,
}

impl CurvePlan {
    #[must_use]
    pub fn geometry(&self) -> &GeometryPlan {
        &self.geometry
    }

    #[must_use]
    pub fn surface(&self) -> &RibbonSurface {
        &self.surface
    }

    #[must_use]
    pub fn plan(&self) -> &Graph {
        &self.plan
    }

    pub fn realize<S: SceneGraph>(&self, scene: &mut S) -> Result<Realization<S::Handle>, RigError> {
        realize(&self.plan, scene)
    }
}

/// Volledig rigplan met descriptors per stap.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rig {
    parameters: RigParameters,
    geometry: GeometryPlan,
    surface: RibbonSurface,
    chain: JointChain,
    controls: Controls,
    roll: RollNetwork,
    ripple: RippleNetwork,
    deformers: DeformerNetwork,
    skin: SkinBindings,
    plan: Graph,
}

impl Rig {
    #[must_use]
    pub fn parameters(&self) -> &RigParameters {
        &self.parameters
    }

    #[must_use]
    pub fn geometry(&self) -> &GeometryPlan {
        &self.geometry
    }

    #[must_use]
    pub fn surface(&self) -> &RibbonSurface {
        &self.surface
    }

    #[must_use]
    pub fn chain(&self) -> &JointChain {
        &self.chain
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.chain.segments
    }

    #[must_use]
    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    #[must_use]
    pub fn controllers(&self) -> &[Controller] {
        &self.controls.controllers
    }

    #[must_use]
    pub fn master(&self) -> NodeId {
        self.controls.master
    }

    #[must_use]
    pub fn end_controller(&self) -> NodeId {
        self.deformers.end_controller
    }

    #[must_use]
    pub fn roll(&self) -> &RollNetwork {
        &self.roll
    }

    #[must_use]
    pub fn ripple(&self) -> &RippleNetwork {
        &self.ripple
    }

    #[must_use]
    pub fn deformers(&self) -> &DeformerNetwork {
        &self.deformers
    }

    #[must_use]
    pub fn skin(&self) -> &SkinBindings {
        &self.skin
    }

    #[must_use]
    pub fn plan(&self) -> &Graph {
        &self.plan
    }

    #[must_use]
    pub fn network_stats(&self, network: NetworkKind) -> NetworkStats {
        self.plan.network_stats(network)
    }

    /// Rekent de effectnetwerken door voor de opgegeven attribuutwaarden.
    pub fn evaluate(&self, inputs: &EvaluationInputs) -> Result<EvaluationResult, RigError> {
        Ok(evaluator::evaluate(&self.plan, inputs)?)
    }

    pub fn realize<S: SceneGraph>(&self, scene: &mut S) -> Result<Realization<S::Handle>, RigError> {
        realize(&self.plan, scene)
    }
}

/// "Build curve": valideert en plant alleen curve, kopie en lint.
pub fn build_curve(parameters: &RigParameters) -> Result<CurvePlan, RigError> {
    let geometry = parameters.plan()?;
    let mut plan = Graph::new();
    let surface = surface::build_surface(&mut plan, &geometry)?;
    debug!("curve plan: {} nodes", plan.node_count());

    Ok(CurvePlan {
        geometry,
        surface,
        plan,
    })
}

/// "Build rig": de volledige pipeline. Configuratiefouten worden gemeld
/// voordat er ook maar één node gepland is.
pub fn build_rig(parameters: &RigParameters) -> Result<Rig, RigError> {
    let geometry = parameters.plan()?;
    let model = parameters.model_name.as_str();
    let mut plan = Graph::new();

    let surface = surface::build_surface(&mut plan, &geometry)?;
    debug!("surface: {} nodes", plan.node_count());

    let chain = chain::build_chain(&mut plan, model, &geometry, &surface)?;
    debug!("joint chain: {} segments", chain.segments.len());

    let controls = controls::build_controls(&mut plan, parameters, &geometry, &chain)?;
    debug!("controls: {} controllers", controls.controllers.len());

    let roll = roll::build_roll(&mut plan, model, &geometry, &controls)?;
    let ripple = ripple::build_ripple(&mut plan, model, &geometry, controls.master, &chain)?;
    let deformers =
        deformers::build_deformers(&mut plan, parameters, &geometry, &controls, &surface)?;
    for network in NetworkKind::ALL {
        let stats = plan.network_stats(network);
        debug!(
            "{} network: {} nodes, {} wires",
            network.label(),
            stats.nodes,
            stats.wires
        );
    }

    let skin = skin::build_skin(&mut plan, parameters, &surface, &chain, &deformers)?;
    debug!(
        "rig plan: {} nodes, {} wires",
        plan.node_count(),
        plan.wire_count()
    );

    Ok(Rig {
        parameters: parameters.clone(),
        geometry,
        surface,
        chain,
        controls,
        roll,
        ripple,
        deformers,
        skin,
        plan,
    })
}

/// Declareert gebruikersattributen op een bestaande node.
pub(crate) fn declare_on(
    graph: &mut Graph,
    node: NodeId,
    specs: impl IntoIterator<Item = AttributeSpec>,
) -> Result<(), GraphError> {
    let target = graph.node_mut(node).ok_or(GraphError::UnknownNode(node))?;
    for spec in specs {
        target.declare(spec);
    }
    Ok(())
}

pub(crate) fn utility(name: String, kind: ComponentKind, network: NetworkKind) -> Node {
    Node::new(name, Operation::Utility { kind }).in_network(network)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{build_curve, build_rig};
    use crate::error::RigError;
    use crate::graph::node::NetworkKind;
    use crate::graph::operation::ControllerStyle;
    use crate::params::{Axis, ConfigError, RigParameters};

    #[test]
    fn default_scenario_counts() {
        let parameters = RigParameters::builder()
            .joint_count(18)
            .tentacle_length(500.0)
            .axes(Axis::Y, Axis::Z, Axis::X)
            .build()
            .unwrap();
        let rig = build_rig(&parameters).unwrap();

        assert_eq!(rig.segments().len(), 18);
        assert_eq!(rig.controllers().len(), 17);
        assert_eq!(rig.controls().hierarchy.len(), 17);
        let squares: Vec<usize> = rig
            .controllers()
            .iter()
            .filter(|controller| controller.style == ControllerStyle::Square)
            .map(|controller| controller.index)
            .collect();
        assert_eq!(squares, vec![0, 4, 8, 12, 16]);
        assert_eq!(rig.roll().segments.len(), 17);
        assert_eq!(rig.ripple().joints.len(), 18);
    }

    #[test]
    fn curve_plan_is_prefix_of_rig_plan() {
        let parameters = RigParameters::default();
        let curve = build_curve(&parameters).unwrap();
        let rig = build_rig(&parameters).unwrap();

        assert_eq!(curve.plan().node_count(), 4);
        for (a, b) in curve.plan().nodes().iter().zip(rig.plan().nodes()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn invalid_configuration_fails_before_planning() {
        let parameters = RigParameters {
            primary_axis: Axis::Z,
            secondary_axis: Axis::Z,
            ..RigParameters::default()
        };
        assert!(matches!(
            build_rig(&parameters),
            Err(RigError::Config(ConfigError::SameAxis(Axis::Z)))
        ));
        assert!(matches!(
            build_curve(&parameters),
            Err(RigError::Config(_))
        ));
    }

    #[test]
    fn repeated_builds_are_isomorphic() {
        let parameters = RigParameters::builder().joint_count(7).build().unwrap();
        let first = build_rig(&parameters).unwrap();
        let second = build_rig(&parameters).unwrap();

        for network in NetworkKind::ALL {
            assert_eq!(first.network_stats(network), second.network_stats(network));
        }
        assert_eq!(
            serde_json::to_value(first.plan()).unwrap(),
            serde_json::to_value(second.plan()).unwrap()
        );
    }

    #[test]
    fn minimal_chain_builds() {
        let rig = build_rig(&RigParameters::builder().joint_count(2).build().unwrap()).unwrap();
        assert_eq!(rig.segments().len(), 2);
        assert_eq!(rig.controllers().len(), 1);
        assert_eq!(rig.controls().parent_of(0), Some(rig.master()));
    }
}

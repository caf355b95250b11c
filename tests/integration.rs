use std::collections::HashSet;

use pretty_assertions::assert_eq;

use ribbon_rig::Engine;
use ribbon_rig::error::RigError;
use ribbon_rig::graph::evaluator::EvaluationInputs;
use ribbon_rig::graph::value::Value;
use ribbon_rig::params::{Axis, RigParameters};
use ribbon_rig::rig::roll::{ATTR_ANGLE, ATTR_ROLL};
use ribbon_rig::rig::{Rig, build_curve, build_rig};
use ribbon_rig::scene::recording::ObjectKind;
use ribbon_rig::scene::{PreconditionError, RecordingScene, SceneCall};

fn default_rig() -> Rig {
    build_rig(&RigParameters::default()).expect("default rig")
}

fn created_name(call: &SceneCall) -> Option<&str> {
    match call {
        SceneCall::CreateCurve { name, .. }
        | SceneCall::CreateLoftSurface { name, .. }
        | SceneCall::CreateFollicle { name, .. }
        | SceneCall::CreateJoint { name, .. }
        | SceneCall::CreateGroup { name, .. }
        | SceneCall::CreateConstraint { name, .. }
        | SceneCall::CreateControllerShape { name, .. }
        | SceneCall::CreateUtilityNode { name, .. }
        | SceneCall::CreateDeformer { name, .. }
        | SceneCall::BindSkin { name, .. } => Some(name.as_str()),
        _ => None,
    }
}

fn bind_skin<'a>(scene: &'a RecordingScene, name: &str) -> Option<&'a SceneCall> {
    scene
        .calls()
        .iter()
        .find(|call| matches!(call, SceneCall::BindSkin { name: n, .. } if n == name))
}

#[test]
fn engine_initializes() {
    let engine = Engine::new();
    assert!(engine.is_initialized());
    assert_eq!(engine.planned_node_count(), 0);
}

#[test]
fn realizes_default_rig_without_target_mesh() {
    let rig = default_rig();
    let mut scene = RecordingScene::new();
    let realization = rig.realize(&mut scene).expect("realize");

    assert_eq!(
        realization.skipped,
        vec![PreconditionError::MissingMesh {
            binding: "modelSkinCluster".to_owned(),
            mesh: "tentacle".to_owned(),
        }]
    );
    assert!(!realization.is_complete());
    assert!(bind_skin(&scene, "modelSkinCluster").is_none());

    let Some(SceneCall::BindSkin {
        influences, target, ..
    }) = bind_skin(&scene, "ribbonSurfaceSkinCluster")
    else {
        panic!("surface skin ontbreekt");
    };
    assert_eq!(influences.len(), 18);
    assert_eq!(target, "surface_ribbon");

    assert_eq!(scene.count(ObjectKind::Follicle), 18);
    assert_eq!(scene.count(ObjectKind::Joint), 36);
    assert_eq!(scene.count(ObjectKind::Controller), 17 + 2);
    assert_eq!(scene.count(ObjectKind::Deformer), 2);
}

#[test]
fn registered_mesh_receives_model_skin() {
    let rig = default_rig();
    let mut scene = RecordingScene::new();
    scene.register_mesh("tentacle");
    let realization = rig.realize(&mut scene).expect("realize");
    assert!(realization.is_complete());

    let Some(SceneCall::BindSkin {
        influences,
        target,
        max_influences,
        ..
    }) = bind_skin(&scene, "modelSkinCluster")
    else {
        panic!("model skin ontbreekt");
    };
    assert_eq!(influences.len(), 17);
    assert_eq!(influences.first().map(String::as_str), Some("jnt_m_tentacle_001"));
    assert!(!influences.iter().any(|name| name == "jnt_m_tentacle_018"));
    assert_eq!(target, "tentacle");
    assert_eq!(*max_influences, Some(9));
}

#[test]
fn realized_hierarchy_matches_rig_layout() {
    let rig = default_rig();
    let mut scene = RecordingScene::new();
    rig.realize(&mut scene).expect("realize");

    let parents = [
        ("drv_ctrl_m_tentacle_001_grp", "CTRL_M_TentacleDrv_001"),
        ("drv_ctrl_m_tentacle_002_grp", "drv_ctrl_m_tentacle_001"),
        ("drv_ctrl_m_tentacle_017_grp", "drv_ctrl_m_tentacle_016"),
        ("jnt_m_tentacle_001", "Zero_jnt_m_tentacle_001"),
        ("Zero_jnt_m_tentacle_001", "tentacle_jointGroup"),
        ("drv_jnt_m_tentacle_018", "tentacle_jointGroup"),
        ("follicle_m_tentacle_005", "follicle_Group"),
        ("surface_ribbon", "ribbon_Group"),
        ("twist_ribbonHandle", "tentacle_nodeGroup"),
        ("sine_ribbonHandle", "tentacle_nodeGroup"),
        ("tentacle_nodeGroup", "CTRL_M_TentacleDrv_001"),
        ("CTRL_M_TentacleDrv_End_001_grp", "CTRL_M_TentacleDrv_001"),
    ];
    for (child, parent) in parents {
        assert_eq!(scene.parent_of(child), Some(parent), "parent van {child}");
    }
}

#[test]
fn every_connection_follows_creation_of_both_ends() {
    let rig = default_rig();
    let mut scene = RecordingScene::new();
    rig.realize(&mut scene).expect("realize");

    let mut seen = HashSet::new();
    let mut deformer_handles = Vec::new();
    for call in scene.calls() {
        match call {
            SceneCall::CreateDeformer { name, handle, .. } => {
                seen.insert(name.as_str());
                seen.insert(handle.as_str());
                deformer_handles.push(handle.as_str());
            }
            SceneCall::ConnectAttribute { from, to } => {
                for end in [from, to] {
                    let node = end.split('.').next().unwrap_or_default();
                    assert!(seen.contains(node), "{end} verbonden voor aanmaak");
                }
            }
            other => {
                if let Some(name) = created_name(other) {
                    seen.insert(name);
                }
            }
        }
    }
    assert_eq!(deformer_handles, vec!["twist_ribbonHandle", "sine_ribbonHandle"]);
    assert!(!scene.connections().is_empty());
}

#[test]
fn placement_precedes_incoming_connections() {
    let rig = default_rig();
    let mut scene = RecordingScene::new();
    rig.realize(&mut scene).expect("realize");

    let calls = scene.calls();
    let first_connection = |target: &str| {
        let prefix = format!("{target}.");
        calls.iter().position(
            |call| matches!(call, SceneCall::ConnectAttribute { to, .. } if to.starts_with(&prefix)),
        )
    };

    let mut placed = 0;
    for (index, call) in calls.iter().enumerate() {
        let target = match call {
            SceneCall::Snap { target, .. } | SceneCall::FreezeScale { target, .. } => target,
            SceneCall::Parent { child, .. } => child,
            _ => continue,
        };
        placed += 1;
        if let Some(connected) = first_connection(target) {
            assert!(connected > index, "{target} verbonden voor plaatsing");
        }
    }
    assert!(placed > 0);

    for controller in 1..=17 {
        let group = format!("drv_ctrl_m_tentacle_{controller:03}_grp");
        let snap = calls
            .iter()
            .position(|call| matches!(call, SceneCall::Snap { target, .. } if *target == group))
            .expect("snap van controllergroep");
        let connected = first_connection(&group).expect("rolverbinding");
        assert!(snap < connected, "{group}");
    }
}

#[test]
fn host_failure_keeps_earlier_objects() {
    let rig = default_rig();
    let mut scene = RecordingScene::new();
    scene.fail_on("twist_ribbon");

    let err = rig.realize(&mut scene).expect_err("host failure");
    assert!(matches!(&err, RigError::Scene { node, .. } if node == "twist_ribbon"));
    assert!(scene.object("surface_ribbon").is_some());
    assert!(scene.object("ribbonSurfaceSkinCluster").is_some());
    assert!(scene.object("sine_ribbon").is_none());
}

#[test]
fn curve_plan_realizes_only_curves_and_surface() {
    let curve = build_curve(&RigParameters::default()).expect("curve");
    let mut scene = RecordingScene::new();
    curve.realize(&mut scene).expect("realize");

    assert_eq!(scene.count(ObjectKind::Curve), 2);
    assert_eq!(scene.count(ObjectKind::Surface), 1);
    assert_eq!(scene.count(ObjectKind::Joint), 0);
    assert_eq!(
        scene.attribute("crv_ribbon", "visibility"),
        Some(&Value::Boolean(false))
    );
}

#[test]
fn full_roll_bends_every_controller_group() {
    let rig = build_rig(
        &RigParameters::builder()
            .joint_count(9)
            .axes(Axis::Y, Axis::Z, Axis::Z)
            .build()
            .expect("parameters"),
    )
    .expect("rig");
    let inputs = EvaluationInputs::new()
        .with(rig.master(), ATTR_ROLL, 1.0)
        .with(rig.master(), ATTR_ANGLE, -90.0);
    let result = rig.evaluate(&inputs).expect("evaluate");

    for controller in rig.controllers() {
        let rotation = result
            .number(controller.group, "rotateZ")
            .expect("rotateZ");
        assert!((rotation + 90.0).abs() < 1e-9, "rotatie {rotation}");
    }
}

#[test]
fn plan_serializes_with_deterministic_names() {
    let rig = default_rig();
    let json = serde_json::to_value(&rig).expect("json");
    let names: Vec<&str> = json["plan"]["nodes"]
        .as_array()
        .expect("nodes")
        .iter()
        .filter_map(|node| node["name"].as_str())
        .collect();
    assert_eq!(names.first(), Some(&"crv_ribbon"));
    assert!(names.contains(&"remap_m_tentacleRollWeight_017"));
    assert!(names.contains(&"CTRL_M_TentacleDrv_End_001"));
}

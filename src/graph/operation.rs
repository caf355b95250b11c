//! De vocabulaire van het plan: één `Operation` per aanroep van de Scene
//! Graph API.

use serde::Serialize;

use crate::components::ComponentKind;
use crate::params::Axis;

use super::node::NodeId;

/// Soort constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstraintKind {
    Parent,
    Scale,
}

/// Niet-lineaire deformers die op het lint worden gezet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DeformerKind {
    Twist,
    Sine,
}

/// Visuele stijl van een controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ControllerStyle {
    Ring,
    Square,
    Arrow,
}

/// Beschrijving van een controllercurve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerShape {
    pub style: ControllerStyle,
    pub size: f64,
    pub color: u8,
    /// Normaal van de ring; vierkant en pijl liggen altijd in het XZ-vlak.
    pub normal: Axis,
}

const RING_SECTIONS: usize = 8;

const ARROW_POINTS: [[f64; 3]; 25] = [
    [-4.5, 0.0, 0.0],
    [-2.5, 0.0, -2.0],
    [-2.5, 0.0, -1.5],
    [-1.5, 0.0, -1.5],
    [-1.5, 0.0, -2.5],
    [-2.0, 0.0, -2.5],
    [0.0, 0.0, -4.5],
    [2.0, 0.0, -2.5],
    [1.5, 0.0, -2.5],
    [1.5, 0.0, -1.5],
    [2.5, 0.0, -1.5],
    [2.5, 0.0, -2.0],
    [4.5, 0.0, 0.0],
    [2.5, 0.0, 2.0],
    [2.5, 0.0, 1.5],
    [1.5, 0.0, 1.5],
    [1.5, 0.0, 2.5],
    [2.0, 0.0, 2.5],
    [0.0, 0.0, 4.5],
    [-2.0, 0.0, 2.5],
    [-1.5, 0.0, 2.5],
    [-1.5, 0.0, 1.5],
    [-2.5, 0.0, 1.5],
    [-2.5, 0.0, 2.0],
    [-4.5, 0.0, 0.0],
];

impl ControllerShape {
    /// Lineaire CV-punten van de controllercurve, gesloten (eerste punt
    /// herhaald aan het eind).
    #[must_use]
    pub fn outline(&self) -> Vec<[f64; 3]> {
        let size = self.size;
        match self.style {
            ControllerStyle::Square => vec![
                [-size, 0.0, -size],
                [-size, 0.0, size],
                [size, 0.0, size],
                [size, 0.0, -size],
                [-size, 0.0, -size],
            ],
            ControllerStyle::Arrow => ARROW_POINTS
                .iter()
                .map(|[x, y, z]| [x * size, y * size, z * size])
                .collect(),
            ControllerStyle::Ring => (0..=RING_SECTIONS)
                .map(|section| {
                    let angle =
                        std::f64::consts::TAU * (section % RING_SECTIONS) as f64 / RING_SECTIONS as f64;
                    let (a, b) = (size * angle.cos(), size * angle.sin());
                    match self.normal {
                        Axis::X => [0.0, a, b],
                        Axis::Y => [a, 0.0, b],
                        Axis::Z => [a, b, 0.0],
                    }
                })
                .collect(),
        }
    }
}

/// Doel van een skin-binding: een node uit het plan of een externe mesh.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkinTarget {
    Node(NodeId),
    External(String),
}

/// Eén aanroep van de Scene Graph API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Operation {
    Curve {
        points: Vec<[f64; 3]>,
        degree: u8,
    },
    #[serde(rename_all = "camelCase")]
    Loft {
        curves: [NodeId; 2],
        degree: u8,
        section_spans: u32,
    },
    Follicle {
        surface: NodeId,
        u: f64,
        v: f64,
    },
    /// Joint op een wereldpositie; `orientation` wordt in de joint-oriëntatie
    /// gebakken zodat de rotatiekanalen op nul beginnen.
    Joint {
        position: [f64; 3],
        orientation: Option<[f64; 3]>,
    },
    Group {
        children: Vec<NodeId>,
    },
    Parent {
        child: NodeId,
        parent: NodeId,
    },
    /// Zet `target` zonder offset op de huidige transformatie van `source`.
    Snap {
        source: NodeId,
        target: NodeId,
    },
    #[serde(rename_all = "camelCase")]
    Constraint {
        kind: ConstraintKind,
        driver: NodeId,
        driven: NodeId,
        maintain_offset: bool,
    },
    ControllerShape(ControllerShape),
    /// Zet de schaal en bevriest die in de transformatie.
    FreezeScale {
        target: NodeId,
        scale: [f64; 3],
    },
    Utility {
        kind: ComponentKind,
    },
    Deformer {
        kind: DeformerKind,
        target: NodeId,
    },
    /// De transform-handle die bij een deformer hoort.
    DeformerHandle {
        deformer: NodeId,
    },
    #[serde(rename_all = "camelCase")]
    SkinBinding {
        influences: Vec<NodeId>,
        target: SkinTarget,
        max_influences: Option<usize>,
    },
}

impl Operation {
    /// Nodes die moeten bestaan voordat deze operatie uitgevoerd kan worden.
    #[must_use]
    pub fn references(&self) -> Vec<NodeId> {
        match self {
            Self::Curve { .. } | Self::Joint { .. } | Self::ControllerShape(_) | Self::Utility { .. } => {
                Vec::new()
            }
            Self::Loft { curves, .. } => curves.to_vec(),
            Self::Follicle { surface, .. } => vec![*surface],
            Self::Group { children } => children.clone(),
            Self::Parent { child, parent } => vec![*child, *parent],
            Self::Snap { source, target } => vec![*source, *target],
            Self::Constraint { driver, driven, .. } => vec![*driver, *driven],
            Self::FreezeScale { target, .. } | Self::Deformer { target, .. } => vec![*target],
            Self::DeformerHandle { deformer } => vec![*deformer],
            Self::SkinBinding {
                influences, target, ..
            } => {
                let mut references = influences.clone();
                if let SkinTarget::Node(id) = target {
                    references.push(*id);
                }
                references
            }
        }
    }

    /// Of de operatie een nieuw scene-object oplevert.
    #[must_use]
    pub fn produces_handle(&self) -> bool {
        !matches!(
            self,
            Self::Parent { .. } | Self::Snap { .. } | Self::FreezeScale { .. }
        )
    }

    #[must_use]
    pub fn utility_kind(&self) -> Option<ComponentKind> {
        match self {
            Self::Utility { kind } => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ControllerShape, ControllerStyle, Operation, SkinTarget};
    use crate::graph::node::NodeId;
    use crate::params::Axis;

    #[test]
    fn square_outline_is_closed_in_xz_plane() {
        let shape = ControllerShape {
            style: ControllerStyle::Square,
            size: 2.0,
            color: 18,
            normal: Axis::Y,
        };
        let points = shape.outline();
        assert_eq!(points.len(), 5);
        assert_eq!(points.first(), points.last());
        assert!(points.iter().all(|p| p[1] == 0.0 && p[0].abs() == 2.0));
    }

    #[test]
    fn ring_outline_lies_orthogonal_to_normal() {
        let shape = ControllerShape {
            style: ControllerStyle::Ring,
            size: 3.0,
            color: 14,
            normal: Axis::Z,
        };
        let points = shape.outline();
        assert_eq!(points.len(), 9);
        for point in &points {
            assert_eq!(point[2], 0.0);
            let radius = (point[0] * point[0] + point[1] * point[1]).sqrt();
            assert!((radius - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn arrow_outline_scales_with_size() {
        let shape = ControllerShape {
            style: ControllerStyle::Arrow,
            size: 2.0,
            color: 20,
            normal: Axis::Y,
        };
        let points = shape.outline();
        assert_eq!(points.len(), 25);
        assert_eq!(points[0], [-9.0, 0.0, 0.0]);
        assert_eq!(points[6], [0.0, 0.0, -9.0]);
    }

    #[test]
    fn skin_binding_references_influences_and_node_target() {
        let op = Operation::SkinBinding {
            influences: vec![NodeId::new(1), NodeId::new(2)],
            target: SkinTarget::Node(NodeId::new(7)),
            max_influences: None,
        };
        assert_eq!(
            op.references(),
            vec![NodeId::new(1), NodeId::new(2), NodeId::new(7)]
        );

        let external = Operation::SkinBinding {
            influences: vec![NodeId::new(1)],
            target: SkinTarget::External("tentacle".to_owned()),
            max_influences: Some(9),
        };
        assert_eq!(external.references(), vec![NodeId::new(1)]);
    }

    #[test]
    fn ordering_operations_have_no_handle() {
        let parent = Operation::Parent {
            child: NodeId::new(0),
            parent: NodeId::new(1),
        };
        assert!(!parent.produces_handle());
        assert!(
            Operation::Curve {
                points: vec![],
                degree: 1
            }
            .produces_handle()
        );
    }
}

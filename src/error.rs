//! Gezamenlijk fouttype van de pipeline.

use thiserror::Error;

use crate::graph::GraphError;
use crate::graph::evaluator::EvaluationError;
use crate::graph::topo::TopologyError;
use crate::params::ConfigError;
use crate::scene::SceneError;

#[derive(Debug, Error)]
pub enum RigError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("plan construction failed: {0}")]
    Graph(#[from] GraphError),
    #[error("plan cannot be ordered: {0}")]
    Topology(#[from] TopologyError),
    #[error("evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),
    #[error("scene call for `{node}` failed: {source}")]
    Scene {
        node: String,
        #[source]
        source: SceneError,
    },
    #[error("`{node}` has no scene object to refer to")]
    MissingHandle { node: String },
}

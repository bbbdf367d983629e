// brickforge-core/src/domain/fragments/compute.rs

use serde::Serialize;

use crate::domain::project::{CloudProvider, ComputeType};

pub const SPARK_VERSION: &str = "15.4.x-scala2.12";
pub const SERVERLESS_ENVIRONMENT_VERSION: &str = "2";

pub fn default_node_type(cloud: CloudProvider) -> &'static str {
    match cloud {
        CloudProvider::Azure => "Standard_DS3_v2",
        CloudProvider::Aws => "i3.xlarge",
        CloudProvider::Gcp => "n1-standard-4",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassicCluster {
    pub node_type_id: String,
    pub spark_version: String,
    pub min_workers: u32,
    pub max_workers: u32,
}

/// Where the ingestion job's task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobCompute {
    ServerlessEnvironment,
    JobCluster,
}

/// Whether the pipeline is serverless or carries its own cluster block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineCompute {
    Serverless,
    Cluster,
}

/// Compute decisions for every resource file, taken once.
///
/// `both` keeps the pipeline serverless and moves the ingestion job onto a
/// classic job cluster, so both blocks exist in the project at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputeFragment {
    pub compute_type: ComputeType,
    pub serverless: bool,
    pub classic: Option<ClassicCluster>,
    pub ingestion_job: JobCompute,
    pub pipeline: PipelineCompute,
    pub environment_version: &'static str,
    /// Cloud default node type, used by the reference cluster shapes even
    /// when no resource runs on classic compute.
    pub default_node_type_id: &'static str,
    pub spark_version: &'static str,
}

impl ComputeFragment {
    pub fn select(compute_type: ComputeType, cloud: CloudProvider) -> Self {
        let classic = compute_type.uses_classic().then(|| ClassicCluster {
            node_type_id: default_node_type(cloud).to_string(),
            spark_version: SPARK_VERSION.to_string(),
            min_workers: 1,
            max_workers: 4,
        });

        let ingestion_job = if compute_type.uses_classic() {
            JobCompute::JobCluster
        } else {
            JobCompute::ServerlessEnvironment
        };

        let pipeline = if compute_type.uses_serverless() {
            PipelineCompute::Serverless
        } else {
            PipelineCompute::Cluster
        };

        Self {
            compute_type,
            serverless: compute_type.uses_serverless(),
            classic,
            ingestion_job,
            pipeline,
            environment_version: SERVERLESS_ENVIRONMENT_VERSION,
            default_node_type_id: default_node_type(cloud),
            spark_version: SPARK_VERSION,
        }
    }

    pub fn node_type_id(&self) -> Option<&str> {
        self.classic.as_ref().map(|c| c.node_type_id.as_str())
    }
}

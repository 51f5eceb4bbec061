pub mod clustering;

pub use clustering::{ClusterEngine, ClusteringConfig, DisplayCluster};

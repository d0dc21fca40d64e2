use std::fmt;

use async_trait::async_trait;

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct NodeName(String);

impl NodeName {
    pub fn new(name: impl Into<String>) -> NodeName {
        NodeName(name.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClusterName(String);

impl ClusterName {
    pub fn new(name: impl Into<String>) -> ClusterName {
        ClusterName(name.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ClusterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Schedulability {
    Schedulable,
    Unschedulable,
}

#[async_trait]
pub trait NodeClient {
    /// Sets `spec.unschedulable` on the node and returns the state carried by the response.
    async fn mark_unschedulable(&self, node: &NodeName) -> anyhow::Result<Schedulability>;
}

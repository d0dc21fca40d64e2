use crate::kubernetes::model::{ClusterName, NodeName};

impl ClusterName {
    /// Heuristic ownership check: the node belongs to this cluster when the
    /// cluster name occurs anywhere in the node name. Case-sensitive.
    pub fn manages(&self, node: &NodeName) -> bool {
        node.as_str().contains(self.as_str())
    }
}

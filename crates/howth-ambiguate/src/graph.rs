//! The interference graph over renameable clusters.

use crate::context::{ClusterId, PassContext};

/// Undirected graph with one node per eligible cluster. An edge means the two
/// names may appear on the same object and must not share an identifier.
#[derive(Debug, Clone, Default)]
pub struct ConflictGraph {
    /// Graph node index to cluster, in first-discovery order.
    nodes: Vec<ClusterId>,
    /// Sorted neighbor lists.
    adjacency: Vec<Vec<usize>>,
}

impl ConflictGraph {
    /// Connect every pair of eligible clusters whose owner-closures conflict.
    #[must_use]
    pub fn build(ctx: &PassContext) -> Self {
        let nodes: Vec<ClusterId> = ctx
            .iter_clusters()
            .filter(|(_, cluster)| cluster.is_eligible())
            .map(|(id, _)| id)
            .collect();
        let mut adjacency = vec![Vec::new(); nodes.len()];

        for i in 0..nodes.len() {
            let owners = &ctx.cluster(nodes[i]).owners;
            for j in (i + 1)..nodes.len() {
                if owners.conflicts_with(&ctx.cluster(nodes[j]).owners) {
                    adjacency[i].push(j);
                    adjacency[j].push(i);
                }
            }
        }

        Self { nodes, adjacency }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// The cluster behind graph node `node`.
    #[must_use]
    pub fn cluster(&self, node: usize) -> ClusterId {
        self.nodes[node]
    }

    #[must_use]
    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.adjacency[node]
    }

    #[must_use]
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.adjacency[a].binary_search(&b).is_ok()
    }
}

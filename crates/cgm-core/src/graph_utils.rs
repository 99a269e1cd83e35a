use crate::{Connection, Network, Terminal, TopologyKind};
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{HashMap, HashSet, VecDeque};

/// Electrical connectivity of a network: one vertex per connection point,
/// one edge per line connected at both ends.
///
/// Each bus of a bus-breaker voltage level is a vertex. Switches are not
/// modelled, so a node-breaker voltage level collapses to a single vertex.
/// Dangling lines have no far end and contribute no edge.
#[derive(Debug)]
pub struct TopologyGraph {
    pub graph: UnGraph<String, String>,
    vertices: HashMap<String, NodeIndex>,
}

impl TopologyGraph {
    pub fn build(network: &Network) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut vertices = HashMap::new();
        for vl in network.voltage_levels() {
            match vl.topology {
                TopologyKind::NodeBreaker => {
                    let idx = graph.add_node(vl.id.clone());
                    vertices.insert(vl.id.clone(), idx);
                }
                TopologyKind::BusBreaker => {
                    for bus in &vl.buses {
                        let idx = graph.add_node(bus.id.clone());
                        vertices.insert(bus.id.clone(), idx);
                    }
                }
            }
        }

        let mut topology = Self { graph, vertices };
        for line in network.lines() {
            if !(line.terminal1.connected && line.terminal2.connected) {
                continue;
            }
            if let (Some(a), Some(b)) = (
                topology.vertex(&line.terminal1),
                topology.vertex(&line.terminal2),
            ) {
                topology.graph.add_edge(a, b, line.id.clone());
            }
        }
        topology
    }

    /// Vertex a terminal attaches to
    pub fn vertex(&self, terminal: &Terminal) -> Option<NodeIndex> {
        match &terminal.connection {
            Connection::Node(_) => self.vertices.get(&terminal.voltage_level).copied(),
            Connection::Bus(bus) => self.vertices.get(bus).copied(),
        }
    }
}

/// Summary statistics of the connectivity graph (density/degree/connected components).
#[derive(Debug)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub connected_components: usize,
    pub min_degree: usize,
    pub avg_degree: f64,
    pub max_degree: usize,
}

#[derive(Debug)]
pub struct IslandSummary {
    pub island_id: usize,
    pub node_count: usize,
}

/// Island tag of a single connection point.
#[derive(Debug)]
pub struct NodeAssignment {
    pub label: String,
    pub island_id: usize,
}

#[derive(Debug)]
pub struct IslandAnalysis {
    pub islands: Vec<IslandSummary>,
    pub assignments: Vec<NodeAssignment>,
}

impl IslandAnalysis {
    /// Island of a connection point (bus id, or node-breaker voltage level id)
    pub fn island_of(&self, label: &str) -> Option<usize> {
        self.assignments
            .iter()
            .find(|assignment| assignment.label == label)
            .map(|assignment| assignment.island_id)
    }
}

pub fn graph_stats(network: &Network) -> GraphStats {
    let topology = TopologyGraph::build(network);
    let graph = &topology.graph;
    let node_count = graph.node_count();
    let degrees: Vec<usize> = graph
        .node_indices()
        .map(|node| graph.neighbors(node).count())
        .collect();
    let avg_degree = if node_count == 0 {
        0.0
    } else {
        degrees.iter().sum::<usize>() as f64 / node_count as f64
    };
    GraphStats {
        node_count,
        edge_count: graph.edge_count(),
        connected_components: connected_components(graph),
        min_degree: degrees.iter().copied().min().unwrap_or(0),
        avg_degree,
        max_degree: degrees.iter().copied().max().unwrap_or(0),
    }
}

/// Labels connected components by breadth-first search. Island ids follow
/// the storage order of the first connection point reached.
pub fn find_islands(network: &Network) -> IslandAnalysis {
    let topology = TopologyGraph::build(network);
    let graph = &topology.graph;
    let mut visited = HashSet::new();
    let mut islands = Vec::new();
    let mut members_by_island = Vec::new();
    for start in graph.node_indices() {
        if visited.contains(&start) {
            continue;
        }
        let mut queue = VecDeque::from([start]);
        let mut members = Vec::new();
        while let Some(node) = queue.pop_front() {
            if !visited.insert(node) {
                continue;
            }
            members.push(node);
            queue.extend(graph.neighbors(node).filter(|n| !visited.contains(n)));
        }
        islands.push(IslandSummary {
            island_id: islands.len(),
            node_count: members.len(),
        });
        members_by_island.push(members);
    }

    let mut assignments: Vec<(NodeIndex, NodeAssignment)> = members_by_island
        .into_iter()
        .enumerate()
        .flat_map(|(island_id, members)| {
            members.into_iter().map(move |node| {
                (
                    node,
                    NodeAssignment {
                        label: graph[node].clone(),
                        island_id,
                    },
                )
            })
        })
        .collect();
    assignments.sort_by_key(|(node, _)| node.index());
    IslandAnalysis {
        islands,
        assignments: assignments.into_iter().map(|(_, a)| a).collect(),
    }
}

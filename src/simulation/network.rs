//! Service network graph
//!
//! Read-only petgraph view of the registry: terminals are nodes and services
//! are directed edges. Renderers lay out the network from it and the metrics
//! reporter uses it to find containers with no direct service.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

use super::registry::Registry;
use super::types::{ServiceId, TerminalId};

/// A service edge as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceEdge {
    pub service_id: ServiceId,
    pub origin: TerminalId,
    pub destination: TerminalId,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceNetwork {
    /// The underlying petgraph directed graph
    graph: DiGraph<TerminalId, ServiceId>,

    /// Maps terminal IDs to their node indices in the graph
    terminal_to_node: HashMap<TerminalId, NodeIndex>,
}

impl ServiceNetwork {
    pub fn from_registry(registry: &Registry) -> Self {
        let mut network = Self::default();

        for terminal in registry.terminals() {
            let node = network.graph.add_node(terminal.id);
            network.terminal_to_node.insert(terminal.id, node);
        }

        for service in registry.services() {
            let start = network.terminal_to_node.get(&service.origin);
            let end = network.terminal_to_node.get(&service.destination);
            if let (Some(&start), Some(&end)) = (start, end) {
                network.graph.add_edge(start, end, service.id);
            }
        }

        network
    }

    pub fn terminal_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn service_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Services leaving `terminal`, in creation order
    pub fn outbound_services(&self, terminal: TerminalId) -> Vec<ServiceId> {
        let Some(&node) = self.terminal_to_node.get(&terminal) else {
            return Vec::new();
        };
        let mut services: Vec<ServiceId> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| *edge.weight())
            .collect();
        services.sort();
        services
    }

    pub fn has_direct_service(&self, origin: TerminalId, destination: TerminalId) -> bool {
        match (
            self.terminal_to_node.get(&origin),
            self.terminal_to_node.get(&destination),
        ) {
            (Some(&start), Some(&end)) => self.graph.contains_edge(start, end),
            _ => false,
        }
    }

    /// All service edges, in creation order
    pub fn edges(&self) -> Vec<ServiceEdge> {
        let mut edges: Vec<ServiceEdge> = self
            .graph
            .edge_references()
            .map(|edge| ServiceEdge {
                service_id: *edge.weight(),
                origin: self.graph[edge.source()],
                destination: self.graph[edge.target()],
            })
            .collect();
        edges.sort_by_key(|e| e.service_id);
        edges
    }
}

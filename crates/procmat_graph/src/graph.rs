// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and connections.
//!
//! This is where the node factory ([`Graph::create_node`],
//! [`Graph::add_node_with`]) and the wiring engine ([`Graph::connect`]) live.

use crate::connection::{Connection, ConnectionId, Endpoint};
use crate::kind::NodeKind;
use crate::node::{Node, NodeHandle, NodeId, Socket};
use crate::port::{PortDirection, PortId, PortType, PortValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// A shading graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Nodes in the graph
    nodes: IndexMap<NodeId, Node>,
    /// Connections between nodes
    connections: IndexMap<ConnectionId, Connection>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
        }
    }

    /// Drop every node and connection
    pub fn clear(&mut self) {
        self.connections.clear();
        self.nodes.clear();
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = node.handle();
        self.nodes.insert(node.id, node);
        handle
    }

    /// Create a node of `kind` with built-in defaults
    pub fn create_node(&mut self, kind: NodeKind) -> NodeHandle {
        self.add_node(Node::new(kind))
    }

    /// Create a node of `kind`, overriding input literals from `params`
    pub fn create_node_with(
        &mut self,
        kind: NodeKind,
        params: &[(&str, PortValue)],
    ) -> Result<NodeHandle, GraphError> {
        self.add_node_with(Node::new(kind), params)
    }

    /// Add a prepared node, overriding input literals from `params`.
    ///
    /// Nothing is inserted if a literal does not fit its input.
    pub fn add_node_with(
        &mut self,
        mut node: Node,
        params: &[(&str, PortValue)],
    ) -> Result<NodeHandle, GraphError> {
        for (name, value) in params {
            node.set_default(name, *value)?;
        }
        tracing::trace!(node = %node.name, "created node");
        Ok(self.add_node(node))
    }

    /// Remove a node and its connections
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.connections.retain(|_, c| !c.involves_node(node_id));
        self.nodes.shift_remove(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Find the first node with the given display name
    pub fn node_named(&self, name: &str) -> Option<&Node> {
        self.nodes.values().find(|n| n.name == name)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Connect an output socket to an input socket.
    ///
    /// Any earlier connection into the same input is replaced.
    pub fn connect(&mut self, from: &Socket, to: &Socket) -> Result<ConnectionId, GraphError> {
        self.connect_ports(from.node, from.port, to.node, to.port)
    }

    /// Connect two ports by identity
    pub fn connect_ports(
        &mut self,
        from_node: NodeId,
        from_port: PortId,
        to_node: NodeId,
        to_port: PortId,
    ) -> Result<ConnectionId, GraphError> {
        let source_node = self.nodes.get(&from_node)
            .ok_or(GraphError::NodeNotFound(from_node))?;
        let target_node = self.nodes.get(&to_node)
            .ok_or(GraphError::NodeNotFound(to_node))?;

        let source_port = source_node.port(&from_port)
            .ok_or(GraphError::PortNotFound(from_port))?;
        let target_port = target_node.port(&to_port)
            .ok_or(GraphError::PortNotFound(to_port))?;

        if source_port.direction != PortDirection::Output {
            return Err(GraphError::WrongDirection(from_port));
        }
        if target_port.direction != PortDirection::Input {
            return Err(GraphError::WrongDirection(to_port));
        }
        if !source_port.can_connect(target_port) {
            return Err(GraphError::IncompatiblePorts {
                from: source_port.port_type,
                to: target_port.port_type,
                input: target_port.name.clone(),
            });
        }
        if from_node == to_node {
            return Err(GraphError::SelfLoop);
        }

        self.connections.retain(|_, c| !c.feeds(to_port));

        let connection = Connection::new(
            Endpoint { node: from_node, port: from_port },
            Endpoint { node: to_node, port: to_port },
        );
        let id = connection.id;
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Get all connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get connections from a specific output port
    pub fn connections_from(&self, port_id: PortId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.from.port == port_id)
    }

    /// The connection feeding an input port, if any
    pub fn source_of(&self, port_id: PortId) -> Option<&Connection> {
        self.connections.values().find(|c| c.feeds(port_id))
    }

    /// Get connections involving a node
    pub fn connections_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.involves_node(node_id))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Whether a directed path leads from output `from` into input `to`
    pub fn reaches(&self, from: PortId, to: PortId) -> bool {
        let mut queue: VecDeque<PortId> = VecDeque::from([from]);
        let mut seen: HashSet<NodeId> = HashSet::new();

        while let Some(output) = queue.pop_front() {
            for connection in self.connections_from(output) {
                if connection.to.port == to {
                    return true;
                }
                if seen.insert(connection.to.node) {
                    if let Some(node) = self.nodes.get(&connection.to.node) {
                        queue.extend(node.outputs.iter().map(|p| p.id));
                    }
                }
            }
        }
        false
    }

    /// Nodes reachable by following connections out of `node_id`
    pub fn downstream(&self, node_id: NodeId) -> HashSet<NodeId> {
        let mut seen = HashSet::new();
        let mut stack = vec![node_id];
        while let Some(current) = stack.pop() {
            for connection in self.connections.values().filter(|c| c.from.node == current) {
                if seen.insert(connection.to.node) {
                    stack.push(connection.to.node);
                }
            }
        }
        seen
    }

    /// Output sink nodes
    pub fn sinks(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| n.kind.is_sink())
    }

    /// Get nodes in topological order (sources first)
    pub fn topological_order(&self) -> Result<Vec<NodeId>, CycleError> {
        let mut visited = HashSet::new();
        let mut temp_mark = HashSet::new();
        let mut order = Vec::new();

        for node_id in self.nodes.keys() {
            if !visited.contains(node_id) {
                self.visit(*node_id, &mut visited, &mut temp_mark, &mut order)?;
            }
        }

        Ok(order)
    }

    fn visit(
        &self,
        node_id: NodeId,
        visited: &mut HashSet<NodeId>,
        temp_mark: &mut HashSet<NodeId>,
        order: &mut Vec<NodeId>,
    ) -> Result<(), CycleError> {
        if temp_mark.contains(&node_id) {
            return Err(CycleError);
        }
        if visited.contains(&node_id) {
            return Ok(());
        }

        temp_mark.insert(node_id);

        // Dependencies first
        for connection in self.connections_for_node(node_id) {
            if connection.to.node == node_id {
                self.visit(connection.from.node, visited, temp_mark, order)?;
            }
        }

        temp_mark.remove(&node_id);
        visited.insert(node_id);
        order.push(node_id);

        Ok(())
    }

    /// Check the structural invariants of a finished shading graph.
    ///
    /// The graph must be acyclic, hold exactly one output sink, and every
    /// path leaving a shader node must end in that sink. Returns the sink.
    pub fn validate(&self) -> Result<NodeId, ValidationError> {
        self.topological_order()?;

        let sinks: Vec<NodeId> = self.sinks().map(|n| n.id).collect();
        let &[sink] = sinks.as_slice() else {
            return Err(ValidationError::SinkCount(sinks.len()));
        };

        for shader in self.nodes.values().filter(|n| n.kind == NodeKind::PrincipledBsdf) {
            let reachable = self.downstream(shader.id);
            let dead_end = reachable
                .iter()
                .any(|id| *id != sink && self.connections.values().all(|c| c.from.node != *id));
            if !reachable.contains(&sink) || dead_end {
                return Err(ValidationError::UnterminatedShader(shader.id));
            }
        }

        Ok(sink)
    }

    /// Canonical description of the graph that ignores node identities.
    ///
    /// Two graphs with the same node kinds, literals, names and edges produce
    /// the same fingerprint regardless of the IDs they were built with.
    pub fn fingerprint(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .nodes
            .values()
            .map(|node| {
                let literals: Vec<String> = node
                    .inputs
                    .iter()
                    .map(|p| format!("{}={:?}", p.name, p.default_value))
                    .collect();
                format!("node {} {:?} [{}]", node.name, node.kind, literals.join(", "))
            })
            .collect();

        lines.extend(self.connections.values().map(|c| {
            format!(
                "edge {}.{} -> {}.{}",
                self.node_name(c.from.node),
                self.port_name(c.from),
                self.node_name(c.to.node),
                self.port_name(c.to),
            )
        }));

        lines.sort();
        lines
    }

    fn node_name(&self, id: NodeId) -> &str {
        self.nodes.get(&id).map_or("?", |n| n.name.as_str())
    }

    fn port_name(&self, endpoint: Endpoint) -> &str {
        self.nodes
            .get(&endpoint.node)
            .and_then(|n| n.port(&endpoint.port))
            .map_or("?", |p| p.name.as_str())
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when creating nodes or connections
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0:?}")]
    PortNotFound(PortId),

    /// No port with this name on the node
    #[error("Node {node:?} has no {direction:?} port named '{name}'")]
    UnknownPort {
        /// Node that was searched
        node: NodeId,
        /// Requested name
        name: String,
        /// Requested direction
        direction: PortDirection,
    },

    /// Source is not an output or destination is not an input
    #[error("Port {0:?} has the wrong direction for this end of a connection")]
    WrongDirection(PortId),

    /// Incompatible port types
    #[error("Cannot connect {from:?} output into {to:?} input '{input}'")]
    IncompatiblePorts {
        /// Source type
        from: PortType,
        /// Destination type
        to: PortType,
        /// Destination port name
        input: String,
    },

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,

    /// Literal does not fit the input
    #[error("Input {port:?} expects {expected:?}, got {found:?}")]
    InvalidLiteral {
        /// Input port
        port: PortId,
        /// Input type
        expected: PortType,
        /// Literal type
        found: PortType,
    },
}

/// Error when graph contains a cycle
#[derive(Debug, thiserror::Error)]
#[error("Graph contains a cycle")]
pub struct CycleError;

/// Structural problem found after a build
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Graph contains a cycle
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// Not exactly one output sink
    #[error("Expected exactly one output sink, found {0}")]
    SinkCount(usize),

    /// A shader node has a path that does not end in the sink
    #[error("Shader node {0:?} does not terminate in the output sink")]
    UnterminatedShader(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{BlendMode, MathOperation};

    fn float_chain(graph: &mut Graph) -> (NodeHandle, NodeHandle) {
        let a = graph.create_node(NodeKind::math(MathOperation::Add));
        let b = graph.create_node(NodeKind::math(MathOperation::Multiply));
        graph.connect(&a.output("Value").unwrap(), &b.input("A").unwrap()).unwrap();
        (a, b)
    }

    #[test]
    fn test_connect_and_query() {
        let mut graph = Graph::new("test");
        let (a, b) = float_chain(&mut graph);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.connection_count(), 1);
        let input = b.input("A").unwrap();
        assert_eq!(graph.source_of(input.port).unwrap().from.node, a.id);
    }

    #[test]
    fn test_connect_replaces_existing_input() {
        let mut graph = Graph::new("test");
        let (_, b) = float_chain(&mut graph);
        let c = graph.create_node(NodeKind::math(MathOperation::Subtract));

        graph.connect(&c.output("Value").unwrap(), &b.input("A").unwrap()).unwrap();

        assert_eq!(graph.connection_count(), 1);
        let input = b.input("A").unwrap();
        assert_eq!(graph.source_of(input.port).unwrap().from.node, c.id);
    }

    #[test]
    fn test_outputs_fan_out() {
        let mut graph = Graph::new("test");
        let (a, b) = float_chain(&mut graph);
        graph.connect(&a.output("Value").unwrap(), &b.input("B").unwrap()).unwrap();
        assert_eq!(graph.connection_count(), 2);
    }

    #[test]
    fn test_color_into_float_is_rejected() {
        let mut graph = Graph::new("test");
        let mix = graph.create_node(NodeKind::mix_color(BlendMode::Mix, false));
        let math = graph.create_node(NodeKind::math(MathOperation::Add));

        let err = graph
            .connect(&mix.output("Result").unwrap(), &math.input("A").unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            GraphError::IncompatiblePorts { from: PortType::Color, to: PortType::Float, .. }
        ));
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_float_broadcasts_into_vector() {
        let mut graph = Graph::new("test");
        let math = graph.create_node(NodeKind::math(MathOperation::Add));
        let mapping = graph.create_node(NodeKind::mapping());
        assert!(graph
            .connect(&math.output("Value").unwrap(), &mapping.input("Scale").unwrap())
            .is_ok());
    }

    #[test]
    fn test_direction_and_self_loop_checks() {
        let mut graph = Graph::new("test");
        let a = graph.create_node(NodeKind::math(MathOperation::Add));
        let b = graph.create_node(NodeKind::math(MathOperation::Add));

        let err = graph
            .connect(&a.input("A").unwrap(), &b.input("B").unwrap())
            .unwrap_err();
        assert!(matches!(err, GraphError::WrongDirection(_)));

        let err = graph
            .connect(&a.output("Value").unwrap(), &a.input("B").unwrap())
            .unwrap_err();
        assert!(matches!(err, GraphError::SelfLoop));
    }

    #[test]
    fn test_cycle_detection() {
        let mut graph = Graph::new("test");
        let (a, b) = float_chain(&mut graph);
        assert!(graph.topological_order().is_ok());

        graph.connect(&b.output("Value").unwrap(), &a.input("A").unwrap()).unwrap();
        assert!(graph.topological_order().is_err());
        assert!(matches!(graph.validate(), Err(ValidationError::Cycle(_))));
    }

    #[test]
    fn test_topological_order_puts_sources_first() {
        let mut graph = Graph::new("test");
        let (a, b) = float_chain(&mut graph);
        let order = graph.topological_order().unwrap();
        let pos = |id| order.iter().position(|x| *x == id).unwrap();
        assert!(pos(a.id) < pos(b.id));
    }

    #[test]
    fn test_validate_sink_rules() {
        let mut graph = Graph::new("test");
        assert!(matches!(graph.validate(), Err(ValidationError::SinkCount(0))));

        let bsdf = graph.create_node(NodeKind::PrincipledBsdf);
        let out = graph.create_node(NodeKind::MaterialOutput);
        assert!(matches!(graph.validate(), Err(ValidationError::UnterminatedShader(_))));

        graph.connect(&bsdf.output("BSDF").unwrap(), &out.input("Surface").unwrap()).unwrap();
        assert_eq!(graph.validate().unwrap(), out.id);

        graph.create_node(NodeKind::MaterialOutput);
        assert!(matches!(graph.validate(), Err(ValidationError::SinkCount(2))));
    }

    #[test]
    fn test_reaches_follows_paths() {
        let mut graph = Graph::new("test");
        let (a, b) = float_chain(&mut graph);
        let c = graph.create_node(NodeKind::math(MathOperation::Add));
        graph.connect(&b.output("Value").unwrap(), &c.input("B").unwrap()).unwrap();

        let a_out = a.output("Value").unwrap().port;
        assert!(graph.reaches(a_out, c.input("B").unwrap().port));
        assert!(!graph.reaches(a_out, c.input("A").unwrap().port));
        assert_eq!(graph.downstream(a.id), HashSet::from([b.id, c.id]));
    }

    #[test]
    fn test_remove_node_drops_connections() {
        let mut graph = Graph::new("test");
        let (a, _) = float_chain(&mut graph);
        graph.remove_node(a.id);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_fingerprint_ignores_ids() {
        let mut first = Graph::new("test");
        float_chain(&mut first);
        let mut second = Graph::new("test");
        float_chain(&mut second);
        assert_eq!(first.fingerprint(), second.fingerprint());

        second.clear();
        assert!(second.is_empty());
        assert_ne!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn test_create_node_with_literals() {
        let mut graph = Graph::new("test");
        let noise = graph
            .create_node_with(NodeKind::NoiseTexture, &[("Scale", PortValue::Float(10.0))])
            .unwrap();
        assert_eq!(
            graph.node(noise.id).unwrap().default_value("Scale"),
            Some(PortValue::Float(10.0))
        );

        let err = graph
            .create_node_with(NodeKind::NoiseTexture, &[("Colour", PortValue::Float(1.0))])
            .unwrap_err();
        assert!(matches!(err, GraphError::UnknownPort { .. }));
        assert_eq!(graph.node_count(), 1);
    }
}

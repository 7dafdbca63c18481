// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph framework.

use crate::graph::GraphError;
use crate::kind::{NodeKind, SocketDescriptor};
use crate::port::{Port, PortDirection, PortId, PortType, PortValue};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A node instance in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Node kind and its settings
    pub kind: NodeKind,
    /// Display name (can be customized)
    pub name: String,
    /// Position in an editor's node view
    pub position: [f32; 2],
    /// Input ports
    pub inputs: Vec<Port>,
    /// Output ports
    pub outputs: Vec<Port>,
}

impl Node {
    /// Create a new node from a kind, with every input at its built-in default
    pub fn new(kind: NodeKind) -> Self {
        let inputs = kind
            .inputs()
            .into_iter()
            .map(|s| port_from(s, PortDirection::Input))
            .collect();
        let outputs = kind
            .outputs()
            .into_iter()
            .map(|s| port_from(s, PortDirection::Output))
            .collect();
        Self {
            id: NodeId::new(),
            name: kind.label().to_string(),
            kind,
            position: [0.0, 0.0],
            inputs,
            outputs,
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get an input port by name
    pub fn input(&self, name: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.name == name)
    }

    /// Get an output port by name
    pub fn output(&self, name: &str) -> Option<&Port> {
        self.outputs.iter().find(|p| p.name == name)
    }

    /// Get a port by ID
    pub fn port(&self, port_id: &PortId) -> Option<&Port> {
        self.inputs.iter().find(|p| p.id == *port_id)
            .or_else(|| self.outputs.iter().find(|p| p.id == *port_id))
    }

    /// Get all ports
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    /// Literal value of an input, if it has one
    pub fn default_value(&self, name: &str) -> Option<PortValue> {
        self.input(name).and_then(|p| p.default_value)
    }

    /// Replace the literal value of an input.
    ///
    /// The value must match the input type, or be a scalar going into a
    /// vector input.
    pub fn set_default(&mut self, name: &str, value: PortValue) -> Result<(), GraphError> {
        let id = self.id;
        let port = self
            .inputs
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| GraphError::UnknownPort {
                node: id,
                name: name.to_string(),
                direction: PortDirection::Input,
            })?;
        let coerced = value.coerce_to(port.port_type).ok_or(GraphError::InvalidLiteral {
            port: port.id,
            expected: port.port_type,
            found: value.port_type(),
        })?;
        port.default_value = Some(coerced);
        Ok(())
    }

    /// Handle resolving this node's sockets by name
    pub fn handle(&self) -> NodeHandle {
        NodeHandle {
            id: self.id,
            sockets: self.ports().map(|p| Socket::of(self.id, p)).collect(),
        }
    }
}

fn port_from(descriptor: SocketDescriptor, direction: PortDirection) -> Port {
    let port = match direction {
        PortDirection::Input => Port::input(descriptor.name, descriptor.port_type),
        PortDirection::Output => Port::output(descriptor.name, descriptor.port_type),
    };
    match descriptor.default {
        Some(value) => port.with_default(value),
        None => port,
    }
}

/// Fully resolved endpoint of a connection
#[derive(Debug, Clone, PartialEq)]
pub struct Socket {
    /// Owning node
    pub node: NodeId,
    /// Port on that node
    pub port: PortId,
    /// Port name
    pub name: String,
    /// Value type
    pub port_type: PortType,
    /// Input or output
    pub direction: PortDirection,
}

impl Socket {
    fn of(node: NodeId, port: &Port) -> Self {
        Self {
            node,
            port: port.id,
            name: port.name.clone(),
            port_type: port.port_type,
            direction: port.direction,
        }
    }
}

/// Identity of a freshly created node plus its socket table
#[derive(Debug, Clone)]
pub struct NodeHandle {
    /// Node identity
    pub id: NodeId,
    sockets: Vec<Socket>,
}

impl NodeHandle {
    /// Resolve an output socket by name
    pub fn output(&self, name: &str) -> Result<Socket, GraphError> {
        self.socket(name, PortDirection::Output)
    }

    /// Resolve an input socket by name
    pub fn input(&self, name: &str) -> Result<Socket, GraphError> {
        self.socket(name, PortDirection::Input)
    }

    fn socket(&self, name: &str, direction: PortDirection) -> Result<Socket, GraphError> {
        self.sockets
            .iter()
            .find(|s| s.direction == direction && s.name == name)
            .cloned()
            .ok_or_else(|| GraphError::UnknownPort {
                node: self.id,
                name: name.to_string(),
                direction,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::MathOperation;

    #[test]
    fn test_node_from_kind() {
        let node = Node::new(NodeKind::NoiseTexture).with_position(-700.0, -150.0);
        assert_eq!(node.name, "Noise Texture");
        assert_eq!(node.position, [-700.0, -150.0]);
        assert_eq!(node.default_value("Scale"), Some(PortValue::Float(5.0)));
        assert!(node.default_value("Vector").is_none());
        assert!(node.output("Fac").is_some());
        assert!(node.output("Scale").is_none());
    }

    #[test]
    fn test_set_default_checks_type() {
        let mut node = Node::new(NodeKind::mapping());
        node.set_default("Scale", PortValue::Float(2.0)).unwrap();
        assert_eq!(node.default_value("Scale"), Some(PortValue::Vector3([2.0; 3])));

        let err = node.set_default("Scale", PortValue::Color([1.0; 4])).unwrap_err();
        assert!(matches!(err, GraphError::InvalidLiteral { .. }));

        let err = node.set_default("Missing", PortValue::Float(1.0)).unwrap_err();
        assert!(matches!(err, GraphError::UnknownPort { .. }));
    }

    #[test]
    fn test_handle_resolves_by_direction() {
        let node = Node::new(NodeKind::math(MathOperation::Add));
        let handle = node.handle();

        let value = handle.output("Value").unwrap();
        assert_eq!(value.node, node.id);
        assert_eq!(value.port_type, PortType::Float);

        assert!(handle.input("A").is_ok());
        assert!(handle.input("Value").is_err());
        assert!(handle.output("A").is_err());
    }
}

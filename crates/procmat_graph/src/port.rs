// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortId(pub Uuid);

impl PortId {
    /// Create a new random port ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PortId {
    fn default() -> Self {
        Self::new()
    }
}

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

/// Data type that can flow through ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortType {
    /// Scalar value
    Float,
    /// 3D vector (coordinates, normals)
    Vector3,
    /// RGBA color
    Color,
    /// Shader closure produced by a BSDF and consumed by the output sink
    Shader,
}

impl PortType {
    /// Check if an output of this type can feed an input of `other`.
    ///
    /// Types must match exactly, except that a scalar may broadcast into a
    /// vector input (uniform scale and similar).
    pub fn can_connect_to(&self, other: &PortType) -> bool {
        self == other || matches!((self, other), (Self::Float, Self::Vector3))
    }
}

/// A port on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    /// Unique port ID
    pub id: PortId,
    /// Port name
    pub name: String,
    /// Port direction
    pub direction: PortDirection,
    /// Data type
    pub port_type: PortType,
    /// Literal value used while the input is unconnected.
    ///
    /// `None` on an input means the renderer supplies an implicit value
    /// (texture coordinates, the geometric normal).
    pub default_value: Option<PortValue>,
}

impl Port {
    /// Create a new input port
    pub fn input(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: PortId::new(),
            name: name.into(),
            direction: PortDirection::Input,
            port_type,
            default_value: None,
        }
    }

    /// Create a new output port
    pub fn output(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: PortId::new(),
            name: name.into(),
            direction: PortDirection::Output,
            port_type,
            default_value: None,
        }
    }

    /// Set the default value
    pub fn with_default(mut self, value: PortValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Check if a connection from this port to another is valid
    pub fn can_connect(&self, other: &Port) -> bool {
        self.direction == PortDirection::Output
            && other.direction == PortDirection::Input
            && self.port_type.can_connect_to(&other.port_type)
    }
}

/// Literal value that can be stored in an input port
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PortValue {
    /// Scalar
    Float(f32),
    /// 3D vector
    Vector3([f32; 3]),
    /// RGBA color
    Color([f32; 4]),
}

impl PortValue {
    /// Get the port type for this value
    pub fn port_type(&self) -> PortType {
        match self {
            Self::Float(_) => PortType::Float,
            Self::Vector3(_) => PortType::Vector3,
            Self::Color(_) => PortType::Color,
        }
    }

    /// Convert this value so it can be stored in a port of `target` type.
    ///
    /// Applies the same broadcast rule as connections.
    pub fn coerce_to(self, target: PortType) -> Option<PortValue> {
        match (self, target) {
            (value, target) if value.port_type() == target => Some(value),
            (Self::Float(v), PortType::Vector3) => Some(Self::Vector3([v; 3])),
            _ => None,
        }
    }
}

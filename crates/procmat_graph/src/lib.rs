// SPDX-License-Identifier: MIT OR Apache-2.0
//! Procedural shading graphs for physically-based renderers.
//!
//! This crate builds deterministic material node graphs from small
//! parameter sets:
//! - Keratin beak (root-to-tip gradient, pores, pits, ridges)
//! - Reptile/bird scales (Voronoi cells, edge relief, overlap shading)
//!
//! ## Architecture
//!
//! - Typed node kinds with per-kind socket tables
//! - Connection validation with replace-on-rewire inputs
//! - Acyclicity and single-sink checks after every build
//! - An injected material registry with get-or-create semantics
//! - Serialization support (RON)

pub mod node;
pub mod port;
pub mod connection;
pub mod graph;
pub mod kind;
pub mod ramp;
pub mod material;
pub mod builder;
pub mod materials;

pub use node::{Node, NodeHandle, NodeId, Socket};
pub use port::{Port, PortId, PortType, PortDirection, PortValue};
pub use connection::{Connection, ConnectionId};
pub use graph::{Graph, GraphError, ValidationError};
pub use kind::NodeKind;
pub use ramp::{ColorRamp, RampStop};
pub use material::{Material, MaterialHandle, MaterialLibrary, MaterialRegistry, RegistryError};
pub use builder::{
    build_beak_material, build_material, build_scales_material, BuildError, MaterialBuilder,
};
pub use materials::{BeakParams, ScalesParams};

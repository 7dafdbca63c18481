// SPDX-License-Identifier: MIT OR Apache-2.0
//! The procedural materials and their parameter sets.

pub mod beak;
pub mod scales;

pub use beak::BeakParams;
pub use scales::ScalesParams;

use crate::kind::NodeKind;
use crate::node::Node;

/// Named node at an editor position
fn place(kind: NodeKind, name: &str, x: f32, y: f32) -> Node {
    Node::new(kind).with_name(name).with_position(x, y)
}

#[cfg(test)]
pub(crate) mod checks {
    use crate::graph::Graph;
    use crate::node::Node;

    /// Node by display name, panicking if absent
    pub fn node<'a>(graph: &'a Graph, name: &str) -> &'a Node {
        graph
            .node_named(name)
            .unwrap_or_else(|| panic!("no node named '{name}'"))
    }

    /// Whether `from.output` is directly wired into `to.input`
    pub fn wired(graph: &Graph, from: &str, output: &str, to: &str, input: &str) -> bool {
        let source = node(graph, from).output(output).expect("output exists").id;
        let target = node(graph, to).input(input).expect("input exists").id;
        graph
            .source_of(target)
            .is_some_and(|c| c.from.port == source)
    }

    /// Structural properties every finished material must have
    pub fn assert_well_formed(graph: &Graph) {
        graph.validate().expect("graph validates");
        assert_eq!(graph.sinks().count(), 1);

        for connection in graph.connections() {
            let from = graph.node(connection.from.node).and_then(|n| n.port(&connection.from.port));
            let to = graph.node(connection.to.node).and_then(|n| n.port(&connection.to.port));
            let (from, to) = (from.expect("source port"), to.expect("target port"));
            assert!(from.can_connect(to), "{} -> {}", from.name, to.name);
        }

        for node in graph.nodes() {
            for input in &node.inputs {
                let feeding = graph.connections().filter(|c| c.feeds(input.id)).count();
                assert!(feeding <= 1, "{}.{} has {feeding} sources", node.name, input.name);
            }
            if let Some(ramp) = node.kind.ramp() {
                assert!(ramp.is_strictly_increasing(), "{} stops out of order", node.name);
                assert!(ramp.stops().len() >= 2);
            }
        }
    }
}

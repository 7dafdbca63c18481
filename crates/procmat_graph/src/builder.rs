// SPDX-License-Identifier: MIT OR Apache-2.0
//! Driver that rebuilds a material's graph from a builder.

use crate::graph::{Graph, GraphError, ValidationError};
use crate::material::{MaterialHandle, MaterialRegistry, RegistryError};
use crate::materials::{BeakParams, ScalesParams};

/// Something that knows how to populate one material's graph.
///
/// Implementations must be deterministic: the same builder always produces
/// the same nodes, literals and edges.
pub trait MaterialBuilder {
    /// Name of the material this builder writes
    fn material_name(&self) -> &str;

    /// Create and wire every node into an empty graph
    fn populate(&self, graph: &mut Graph) -> Result<(), GraphError>;
}

/// Error while building a material
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The registry could not provide the material
    #[error("Material registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A node or connection could not be created
    #[error("Topology error: {0}")]
    Topology(#[from] GraphError),

    /// The finished graph breaks a structural invariant
    #[error("Invalid graph: {0}")]
    Invalid(#[from] ValidationError),
}

/// Rebuild the material named by `builder` from scratch.
///
/// The material's previous graph is discarded first, so a failed build
/// leaves a partial graph that the next successful build replaces.
pub fn build_material<R, B>(registry: &mut R, builder: &B) -> Result<MaterialHandle, BuildError>
where
    R: MaterialRegistry + ?Sized,
    B: MaterialBuilder + ?Sized,
{
    let name = builder.material_name();
    let handle = registry.get_or_create(name)?;
    registry.clear_graph(handle)?;

    let graph = registry.graph_mut(handle)?;
    builder.populate(graph)?;
    graph.validate()?;

    tracing::info!(
        "Built material '{}' ({} nodes, {} connections)",
        name,
        graph.node_count(),
        graph.connection_count()
    );
    Ok(handle)
}

/// Build the keratin beak material with default parameters
pub fn build_beak_material<R>(registry: &mut R) -> Result<MaterialHandle, BuildError>
where
    R: MaterialRegistry + ?Sized,
{
    build_material(registry, &BeakParams::default())
}

/// Build the scales material with default parameters
pub fn build_scales_material<R>(registry: &mut R) -> Result<MaterialHandle, BuildError>
where
    R: MaterialRegistry + ?Sized,
{
    build_material(registry, &ScalesParams::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{BlendMode, MathOperation, NodeKind};
    use crate::material::MaterialLibrary;

    /// Wires a color output into a scalar input
    struct Miswired;

    impl MaterialBuilder for Miswired {
        fn material_name(&self) -> &str {
            "Miswired"
        }

        fn populate(&self, graph: &mut Graph) -> Result<(), GraphError> {
            let mix = graph.create_node(NodeKind::mix_color(BlendMode::Multiply, false));
            let math = graph.create_node(NodeKind::math(MathOperation::Add));
            graph.connect(&mix.output("Result")?, &math.input("A")?)?;
            graph.create_node(NodeKind::MaterialOutput);
            Ok(())
        }
    }

    /// Leaves the shader dangling
    struct NoSurface;

    impl MaterialBuilder for NoSurface {
        fn material_name(&self) -> &str {
            "NoSurface"
        }

        fn populate(&self, graph: &mut Graph) -> Result<(), GraphError> {
            graph.create_node(NodeKind::PrincipledBsdf);
            graph.create_node(NodeKind::MaterialOutput);
            Ok(())
        }
    }

    #[test]
    fn test_topology_error_leaves_partial_graph() {
        let mut library = MaterialLibrary::new();
        let err = build_material(&mut library, &Miswired).unwrap_err();
        assert!(matches!(
            err,
            BuildError::Topology(GraphError::IncompatiblePorts { .. })
        ));

        let graph = &library.get("Miswired").unwrap().graph;
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.connection_count(), 0);
        assert_eq!(graph.sinks().count(), 0);
    }

    #[test]
    fn test_validation_runs_after_populate() {
        let mut library = MaterialLibrary::new();
        let err = build_material(&mut library, &NoSurface).unwrap_err();
        assert!(matches!(
            err,
            BuildError::Invalid(ValidationError::UnterminatedShader(_))
        ));
    }

    #[test]
    fn test_rebuild_discards_manual_edits() {
        let mut library = MaterialLibrary::new();
        let handle = build_beak_material(&mut library).unwrap();
        let before = library.material(handle).unwrap().graph.fingerprint();

        library
            .graph_mut(handle)
            .unwrap()
            .create_node(NodeKind::NoiseTexture);
        assert_ne!(library.material(handle).unwrap().graph.fingerprint(), before);

        let again = build_beak_material(&mut library).unwrap();
        assert_eq!(again, handle);
        assert_eq!(library.material(handle).unwrap().graph.fingerprint(), before);
    }

    #[test]
    fn test_failed_build_recovers_on_rerun() {
        let mut library = MaterialLibrary::new();
        let handle = library.get_or_create(ScalesParams::default().material_name()).unwrap();
        library.graph_mut(handle).unwrap().create_node(NodeKind::MaterialOutput);
        library.graph_mut(handle).unwrap().create_node(NodeKind::MaterialOutput);

        build_scales_material(&mut library).unwrap();
        let graph = &library.material(handle).unwrap().graph;
        assert_eq!(graph.sinks().count(), 1);
    }
}

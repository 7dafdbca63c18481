// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reptile/bird scale material.
//!
//! Voronoi cells laid out on Y-compressed object coordinates give the scale
//! shapes. The distance to the cell border becomes an edge mask that darkens
//! borders and, inverted, raises the scales through a bump. Each cell gets a
//! tone from its id, tinted by noise and shaded along Y for overlap.

use super::place;
use crate::builder::MaterialBuilder;
use crate::graph::{Graph, GraphError};
use crate::kind::{BlendMode, DistanceMetric, NodeKind, VoronoiFeature};
use crate::port::PortValue;
use crate::ramp::{ColorRamp, RampStop};
use serde::{Deserialize, Serialize};

/// Cell layout
pub const CELL_VORONOI: &str = "Cell Voronoi";
/// Border emphasis from distance
pub const EDGE_RAMP: &str = "Edge Ramp";
/// Per-cell base tone
pub const CELL_RAMP: &str = "Cell Ramp";
/// Vertical overlap shading
pub const OVERLAP_RAMP: &str = "Overlap Ramp";
/// Mapped coordinate components
pub const SEPARATE: &str = "Separate XYZ";
/// Per-cell tint variation
pub const TINT_NOISE: &str = "Tint Noise";
/// Cell tone mixed with noise
pub const NOISE_MIX: &str = "Noise Mix";
/// Edge mask multiplied in
pub const BORDER_MIX: &str = "Border Mix";
/// Overlap shading multiplied in
pub const OVERLAP_MIX: &str = "Overlap Mix";
/// Inverted edge mask
pub const EDGE_INVERT: &str = "Edge Invert";
/// Inverted mask as a scalar height
pub const EDGE_HEIGHT: &str = "Edge Height";
/// Normal perturbation
pub const BUMP: &str = "Bump";
/// Surface shader
pub const SHADER: &str = "Principled BSDF";
/// Graph output
pub const OUTPUT: &str = "Material Output";

const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Parameters of the scales material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalesParams {
    /// Material to create or reuse
    pub material_name: String,

    /// Mapping scale; a short Y stretches cells into ovals
    pub map_scale: [f32; 3],
    /// Cell density
    pub voronoi_scale: f32,

    /// Distance where the border ramp starts (black)
    pub edge_start: f32,
    /// Distance where the border ramp ends (white)
    pub edge_end: f32,

    /// Darker cell tone
    pub cell_dark: [f32; 4],
    /// Lighter cell tone
    pub cell_light: [f32; 4],

    /// Tint noise scale
    pub noise_scale: f32,
    /// Weight of the noise tint
    pub noise_mix: f32,
    /// Weight of the edge mask multiply
    pub border_mix: f32,
    /// Weight of the overlap multiply
    pub overlap_mix: f32,

    /// Where the overlap shadow sits along Y
    pub overlap_start: f32,
    /// Brightness of the overlap shadow
    pub overlap_shadow: f32,

    /// Bump strength
    pub bump_strength: f32,
    /// Bump sample distance
    pub bump_distance: f32,
}

impl Default for ScalesParams {
    fn default() -> Self {
        Self {
            material_name: "Proc_Scales".to_string(),
            map_scale: [1.0, 0.6, 1.0],
            voronoi_scale: 50.0,
            edge_start: 0.60,
            edge_end: 0.92,
            cell_dark: [0.08, 0.06, 0.05, 1.0],
            cell_light: [0.25, 0.20, 0.15, 1.0],
            noise_scale: 20.0,
            noise_mix: 0.08,
            border_mix: 0.55,
            overlap_mix: 1.0,
            overlap_start: 0.25,
            overlap_shadow: 0.55,
            bump_strength: 0.25,
            bump_distance: 0.10,
        }
    }
}

impl ScalesParams {
    /// Black inside the cells, white near the borders
    pub fn edge_ramp(&self) -> ColorRamp {
        ColorRamp::new(
            RampStop::new(self.edge_start, BLACK),
            RampStop::new(self.edge_end, WHITE),
        )
    }

    /// Two base tones picked by cell id
    pub fn cell_ramp(&self) -> ColorRamp {
        ColorRamp::new(
            RampStop::new(0.0, self.cell_dark),
            RampStop::new(1.0, self.cell_light),
        )
    }

    /// Darker low on each scale, full brightness at the top
    pub fn overlap_ramp(&self) -> ColorRamp {
        ColorRamp::new(
            RampStop::gray(self.overlap_start, self.overlap_shadow),
            RampStop::new(1.0, WHITE),
        )
    }
}

impl MaterialBuilder for ScalesParams {
    fn material_name(&self) -> &str {
        &self.material_name
    }

    fn populate(&self, graph: &mut Graph) -> Result<(), GraphError> {
        use PortValue::{Float, Vector3};

        let output = graph.add_node(place(NodeKind::MaterialOutput, OUTPUT, 900.0, 0.0));
        let shader = graph.add_node(place(NodeKind::PrincipledBsdf, SHADER, 680.0, 0.0));

        let coords = graph.add_node(place(
            NodeKind::TextureCoordinate,
            "Texture Coordinate",
            -800.0,
            0.0,
        ));
        let mapping = graph.add_node_with(
            place(NodeKind::mapping(), "Mapping", -600.0, 0.0),
            &[("Scale", Vector3(self.map_scale))],
        )?;

        let voronoi = graph.add_node_with(
            place(
                NodeKind::VoronoiTexture {
                    feature: VoronoiFeature::F1,
                    metric: DistanceMetric::Euclidean,
                },
                CELL_VORONOI,
                -380.0,
                100.0,
            ),
            &[("Scale", Float(self.voronoi_scale))],
        )?;
        let edge = graph.add_node(place(
            NodeKind::ColorRamp(self.edge_ramp()),
            EDGE_RAMP,
            -160.0,
            100.0,
        ));
        let cell = graph.add_node(place(
            NodeKind::ColorRamp(self.cell_ramp()),
            CELL_RAMP,
            -160.0,
            -120.0,
        ));

        let separate = graph.add_node(place(NodeKind::SeparateXyz, SEPARATE, -380.0, -320.0));
        let overlap = graph.add_node(place(
            NodeKind::ColorRamp(self.overlap_ramp()),
            OVERLAP_RAMP,
            -160.0,
            -320.0,
        ));

        let noise = graph.add_node_with(
            place(NodeKind::NoiseTexture, TINT_NOISE, -380.0, -520.0),
            &[("Scale", Float(self.noise_scale))],
        )?;

        let noise_mix = graph.add_node_with(
            place(NodeKind::mix_color(BlendMode::Mix, false), NOISE_MIX, 80.0, -80.0),
            &[("Factor", Float(self.noise_mix))],
        )?;
        let border_mix = graph.add_node_with(
            place(NodeKind::mix_color(BlendMode::Multiply, false), BORDER_MIX, 280.0, 20.0),
            &[("Factor", Float(self.border_mix))],
        )?;
        let overlap_mix = graph.add_node_with(
            place(NodeKind::mix_color(BlendMode::Multiply, false), OVERLAP_MIX, 480.0, 0.0),
            &[("Factor", Float(self.overlap_mix))],
        )?;

        let invert = graph.add_node(place(NodeKind::Invert, EDGE_INVERT, 280.0, -240.0));
        let height = graph.add_node(place(NodeKind::RgbToBw, EDGE_HEIGHT, 480.0, -240.0));
        let bump = graph.add_node_with(
            place(NodeKind::Bump { invert: false }, BUMP, 680.0, -240.0),
            &[
                ("Strength", Float(self.bump_strength)),
                ("Distance", Float(self.bump_distance)),
            ],
        )?;

        // Coordinates
        let vector = mapping.output("Vector")?;
        graph.connect(&coords.output("Object")?, &mapping.input("Vector")?)?;
        graph.connect(&vector, &voronoi.input("Vector")?)?;
        graph.connect(&vector, &separate.input("Vector")?)?;
        graph.connect(&vector, &noise.input("Vector")?)?;

        // Cell signals
        graph.connect(&voronoi.output("Distance")?, &edge.input("Fac")?)?;
        graph.connect(&voronoi.output("Cell Id")?, &cell.input("Fac")?)?;
        graph.connect(&separate.output("Y")?, &overlap.input("Fac")?)?;

        // Color composition
        graph.connect(&cell.output("Color")?, &noise_mix.input("A")?)?;
        graph.connect(&noise.output("Color")?, &noise_mix.input("B")?)?;
        graph.connect(&noise_mix.output("Result")?, &border_mix.input("A")?)?;
        graph.connect(&edge.output("Color")?, &border_mix.input("B")?)?;
        graph.connect(&border_mix.output("Result")?, &overlap_mix.input("A")?)?;
        graph.connect(&overlap.output("Color")?, &overlap_mix.input("B")?)?;

        // Relief
        graph.connect(&edge.output("Color")?, &invert.input("Color")?)?;
        graph.connect(&invert.output("Color")?, &height.input("Color")?)?;
        graph.connect(&height.output("Val")?, &bump.input("Height")?)?;

        graph.connect(&overlap_mix.output("Result")?, &shader.input("Base Color")?)?;
        graph.connect(&bump.output("Normal")?, &shader.input("Normal")?)?;
        graph.connect(&shader.output("BSDF")?, &output.input("Surface")?)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_scales_material;
    use crate::materials::checks::{assert_well_formed, node, wired};
    use crate::material::{MaterialLibrary, MaterialRegistry};

    fn built(params: &ScalesParams) -> Graph {
        let mut graph = Graph::new("scales");
        params.populate(&mut graph).unwrap();
        graph
    }

    fn output_port(graph: &Graph, name: &str, port: &str) -> crate::port::PortId {
        node(graph, name).output(port).unwrap().id
    }

    fn input_port(graph: &Graph, name: &str, port: &str) -> crate::port::PortId {
        node(graph, name).input(port).unwrap().id
    }

    #[test]
    fn test_default_build_is_well_formed() {
        let graph = built(&ScalesParams::default());
        assert_well_formed(&graph);
        assert_eq!(graph.node_count(), 16);
        assert_eq!(graph.connection_count(), 19);
    }

    #[test]
    fn test_voronoi_signal_routing() {
        let graph = built(&ScalesParams::default());
        let distance = output_port(&graph, CELL_VORONOI, "Distance");
        let cell_id = output_port(&graph, CELL_VORONOI, "Cell Id");

        assert!(graph.reaches(distance, input_port(&graph, EDGE_RAMP, "Fac")));
        assert!(graph.reaches(distance, input_port(&graph, EDGE_INVERT, "Color")));
        assert!(graph.reaches(distance, input_port(&graph, BUMP, "Height")));
        assert!(graph.reaches(
            output_port(&graph, EDGE_INVERT, "Color"),
            input_port(&graph, BUMP, "Height")
        ));

        let targets: Vec<_> = graph.connections_from(cell_id).map(|c| c.to.port).collect();
        assert_eq!(targets, vec![input_port(&graph, CELL_RAMP, "Fac")]);
        assert!(!graph.reaches(cell_id, input_port(&graph, EDGE_RAMP, "Fac")));
        assert!(!graph.reaches(cell_id, input_port(&graph, BUMP, "Height")));
    }

    #[test]
    fn test_color_composition_order() {
        let graph = built(&ScalesParams::default());
        let edges = [
            (CELL_RAMP, "Color", NOISE_MIX, "A"),
            (TINT_NOISE, "Color", NOISE_MIX, "B"),
            (NOISE_MIX, "Result", BORDER_MIX, "A"),
            (EDGE_RAMP, "Color", BORDER_MIX, "B"),
            (BORDER_MIX, "Result", OVERLAP_MIX, "A"),
            (OVERLAP_RAMP, "Color", OVERLAP_MIX, "B"),
            (OVERLAP_MIX, "Result", SHADER, "Base Color"),
            (SEPARATE, "Y", OVERLAP_RAMP, "Fac"),
            (BUMP, "Normal", SHADER, "Normal"),
            (SHADER, "BSDF", OUTPUT, "Surface"),
        ];
        for (from, output, to, input) in edges {
            assert!(wired(&graph, from, output, to, input), "{from}.{output} -> {to}.{input}");
        }

        assert!(matches!(
            node(&graph, BORDER_MIX).kind,
            NodeKind::Mix { blend: BlendMode::Multiply, .. }
        ));
        assert!(matches!(
            node(&graph, NOISE_MIX).kind,
            NodeKind::Mix { blend: BlendMode::Mix, .. }
        ));
        assert_eq!(node(&graph, NOISE_MIX).default_value("Factor"), Some(PortValue::Float(0.08)));
        assert_eq!(node(&graph, OVERLAP_MIX).default_value("Factor"), Some(PortValue::Float(1.0)));
    }

    #[test]
    fn test_ramps() {
        let graph = built(&ScalesParams::default());

        let edge = node(&graph, EDGE_RAMP).kind.ramp().unwrap();
        assert_eq!(edge.stops()[0].position, 0.60);
        assert_eq!(edge.stops()[1].position, 0.92);
        assert_eq!(edge.evaluate(0.5), BLACK);
        assert_eq!(edge.evaluate(0.95), WHITE);

        let overlap = node(&graph, OVERLAP_RAMP).kind.ramp().unwrap();
        assert_eq!(overlap.stops()[0].color, [0.55, 0.55, 0.55, 1.0]);
    }

    #[test]
    fn test_collapsed_edge_ramp_is_a_hard_step() {
        let params = ScalesParams { edge_start: 0.7, edge_end: 0.7, ..ScalesParams::default() };
        let graph = built(&params);
        assert!(graph.validate().is_ok());

        let edge = node(&graph, EDGE_RAMP).kind.ramp().unwrap();
        assert_eq!(edge.stops()[0].position, edge.stops()[1].position);
        assert_eq!(edge.evaluate(0.7), BLACK);
        assert_eq!(edge.evaluate(0.71), WHITE);
    }

    #[test]
    fn test_mapping_compresses_y() {
        let graph = built(&ScalesParams::default());
        assert_eq!(
            node(&graph, "Mapping").default_value("Scale"),
            Some(PortValue::Vector3([1.0, 0.6, 1.0]))
        );
    }

    #[test]
    fn test_idempotent_rebuild() {
        let mut library = MaterialLibrary::new();
        let handle = build_scales_material(&mut library).unwrap();
        let once = library.material(handle).unwrap().graph.fingerprint();

        build_scales_material(&mut library).unwrap();
        let twice = &library.material(handle).unwrap().graph;
        assert_eq!(twice.fingerprint(), once);
        assert_eq!(twice.node_count(), 16);
    }

    #[test]
    fn test_materials_are_independent() {
        let mut library = MaterialLibrary::new();
        let scales = build_scales_material(&mut library).unwrap();
        let beak = crate::builder::build_beak_material(&mut library).unwrap();
        assert_ne!(scales, beak);
        assert_eq!(library.material(scales).unwrap().graph.node_count(), 16);
    }
}

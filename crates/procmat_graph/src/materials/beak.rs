// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keratin beak material.
//!
//! A root-to-tip gradient tints the base color and drives roughness (rough at
//! the root, glossy at the tip). Fine noise pores and small Voronoi pits sum
//! into a bump height, and long wave ridges band the color.

use super::place;
use crate::builder::MaterialBuilder;
use crate::graph::{Graph, GraphError};
use crate::kind::{
    Axis, BlendMode, DistanceMetric, GradientType, MathOperation, NodeKind, VoronoiFeature,
    WaveType,
};
use crate::port::PortValue;
use crate::ramp::{ColorRamp, RampStop};
use serde::{Deserialize, Serialize};

/// Gradient-driven base color ramp
pub const TINT_RAMP: &str = "Tint Ramp";
/// Gradient-driven roughness ramp
pub const ROUGHNESS_RAMP: &str = "Roughness Ramp";
/// Root-to-tip gradient
pub const GRADIENT: &str = "Root To Tip";
/// Fine pore noise
pub const PORE_NOISE: &str = "Pore Noise";
/// Small pit cells
pub const PIT_VORONOI: &str = "Pit Voronoi";
/// Long ridge bands
pub const RIDGE_WAVE: &str = "Ridge Wave";
/// Wave banding multiplied into the tint
pub const BANDED_COLOR: &str = "Banded Color";
/// Roughness ramp as a scalar
pub const ROUGHNESS_VALUE: &str = "Roughness Value";
/// Curvature probe
pub const EDGE_WEAR: &str = "Edge Wear";
/// Ramp roughness blended with edge wear
pub const ROUGHNESS_MIX: &str = "Roughness Mix";
/// Weighted Voronoi height
pub const PIT_WEIGHT: &str = "Pit Weight";
/// Weighted noise height
pub const PORE_WEIGHT: &str = "Pore Weight";
/// Summed height signal
pub const HEIGHT_SUM: &str = "Height Sum";
/// Normal perturbation
pub const BUMP: &str = "Bump";
/// Surface shader
pub const SHADER: &str = "Principled BSDF";
/// Graph output
pub const OUTPUT: &str = "Material Output";

/// Parameters of the keratin beak material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeakParams {
    /// Material to create or reuse
    pub material_name: String,

    /// Color near the base
    pub color_root: [f32; 4],
    /// Middle tone
    pub color_mid: [f32; 4],
    /// Lighter tip
    pub color_tip: [f32; 4],
    /// Where the tip color would start. Kept for compatibility; the tip
    /// stop always sits at the end of the gradient.
    pub tip_position: f32,
    /// Where the mid color sits along the gradient
    pub mid_position: f32,

    /// Roughness at the tip (glossiest)
    pub rough_min: f32,
    /// Roughness at the root (roughest)
    pub rough_max: f32,
    /// Weight of the curvature signal in the final roughness
    pub edge_wear_mix: f32,

    /// Pore noise scale
    pub noise_scale: f32,
    /// Pore noise detail
    pub noise_detail: f32,
    /// Pore noise roughness
    pub noise_roughness: f32,
    /// Pit cell scale
    pub voronoi_scale: f32,
    /// Ridge scale
    pub wave_scale: f32,
    /// Ridge distortion
    pub wave_distortion: f32,
    /// Ridge detail
    pub wave_detail: f32,
    /// Axis the ridges run across
    pub wave_bands_direction: Axis,
    /// Strength of the ridge banding on the base color
    pub wave_mix: f32,

    /// Bump strength
    pub bump_strength: f32,
    /// Bump sample distance
    pub bump_distance: f32,
    /// Weight of the pits in the height signal
    pub voronoi_to_bump: f32,
    /// Weight of the pores in the height signal
    pub noise_to_bump: f32,

    /// Mapping scale applied to object coordinates
    pub map_scale: [f32; 3],
}

impl Default for BeakParams {
    fn default() -> Self {
        Self {
            material_name: "Beak_Keratin_Procedural".to_string(),
            color_root: [0.06, 0.06, 0.06, 1.0],
            color_mid: [0.10, 0.08, 0.07, 1.0],
            color_tip: [0.20, 0.16, 0.12, 1.0],
            tip_position: 0.75,
            mid_position: 0.40,
            rough_min: 0.25,
            rough_max: 0.55,
            edge_wear_mix: 0.25,
            noise_scale: 10.0,
            noise_detail: 6.0,
            noise_roughness: 0.55,
            voronoi_scale: 40.0,
            wave_scale: 25.0,
            wave_distortion: 0.5,
            wave_detail: 2.0,
            wave_bands_direction: Axis::X,
            wave_mix: 0.15,
            bump_strength: 0.2,
            bump_distance: 0.02,
            voronoi_to_bump: 0.6,
            noise_to_bump: 0.4,
            map_scale: [1.0, 1.0, 1.0],
        }
    }
}

impl BeakParams {
    /// Root, mid and tip colors along the gradient
    pub fn tint_ramp(&self) -> ColorRamp {
        ColorRamp::new(
            RampStop::new(0.0, self.color_root),
            RampStop::new(1.0, self.color_tip),
        )
        .with_stop(RampStop::new(self.mid_position, self.color_mid))
    }

    /// Roughest at the root, glossiest at the tip
    pub fn roughness_ramp(&self) -> ColorRamp {
        ColorRamp::new(
            RampStop::gray(0.0, self.rough_max),
            RampStop::gray(1.0, self.rough_min),
        )
    }
}

impl MaterialBuilder for BeakParams {
    fn material_name(&self) -> &str {
        &self.material_name
    }

    fn populate(&self, graph: &mut Graph) -> Result<(), GraphError> {
        use PortValue::{Float, Vector3};

        let output = graph.add_node(place(NodeKind::MaterialOutput, OUTPUT, 1100.0, 0.0));
        let shader = graph.add_node(place(NodeKind::PrincipledBsdf, SHADER, 900.0, 0.0));
        graph.connect(&shader.output("BSDF")?, &output.input("Surface")?)?;

        // Coordinates
        let coords = graph.add_node(place(
            NodeKind::TextureCoordinate,
            "Texture Coordinate",
            -1100.0,
            200.0,
        ));
        let mapping = graph.add_node_with(
            place(NodeKind::mapping(), "Mapping", -900.0, 200.0),
            &[("Scale", Vector3(self.map_scale))],
        )?;
        graph.connect(&coords.output("Object")?, &mapping.input("Vector")?)?;
        let vector = mapping.output("Vector")?;

        // Texture stages
        let gradient = graph.add_node(place(
            NodeKind::GradientTexture { gradient_type: GradientType::Linear },
            GRADIENT,
            -700.0,
            200.0,
        ));
        graph.connect(&vector, &gradient.input("Vector")?)?;

        let noise = graph.add_node_with(
            place(NodeKind::NoiseTexture, PORE_NOISE, -700.0, -150.0),
            &[
                ("Scale", Float(self.noise_scale)),
                ("Detail", Float(self.noise_detail)),
                ("Roughness", Float(self.noise_roughness)),
            ],
        )?;
        graph.connect(&vector, &noise.input("Vector")?)?;

        let voronoi = graph.add_node_with(
            place(
                NodeKind::VoronoiTexture {
                    feature: VoronoiFeature::F1,
                    metric: DistanceMetric::Euclidean,
                },
                PIT_VORONOI,
                -700.0,
                -400.0,
            ),
            &[("Scale", Float(self.voronoi_scale))],
        )?;
        graph.connect(&vector, &voronoi.input("Vector")?)?;

        let wave = graph.add_node_with(
            place(
                NodeKind::WaveTexture {
                    wave_type: WaveType::Bands,
                    bands_direction: self.wave_bands_direction,
                },
                RIDGE_WAVE,
                -700.0,
                500.0,
            ),
            &[
                ("Scale", Float(self.wave_scale)),
                ("Distortion", Float(self.wave_distortion)),
                ("Detail", Float(self.wave_detail)),
            ],
        )?;
        graph.connect(&vector, &wave.input("Vector")?)?;

        // Base color: gradient tint banded by the ridges
        let fac = gradient.output("Fac")?;
        let tint = graph.add_node(place(
            NodeKind::ColorRamp(self.tint_ramp()),
            TINT_RAMP,
            -450.0,
            200.0,
        ));
        graph.connect(&fac, &tint.input("Fac")?)?;

        let banded = graph.add_node_with(
            place(NodeKind::mix_color(BlendMode::Multiply, false), BANDED_COLOR, 200.0, 200.0),
            &[("Factor", Float(self.wave_mix))],
        )?;
        graph.connect(&tint.output("Color")?, &banded.input("A")?)?;
        graph.connect(&wave.output("Color")?, &banded.input("B")?)?;

        // Roughness: gradient ramp blended with curvature
        let roughness_ramp = graph.add_node(place(
            NodeKind::ColorRamp(self.roughness_ramp()),
            ROUGHNESS_RAMP,
            -250.0,
            -40.0,
        ));
        graph.connect(&fac, &roughness_ramp.input("Fac")?)?;

        let to_bw = graph.add_node(place(NodeKind::RgbToBw, ROUGHNESS_VALUE, -50.0, -40.0));
        graph.connect(&roughness_ramp.output("Color")?, &to_bw.input("Color")?)?;

        let geometry = graph.add_node(place(NodeKind::Geometry, EDGE_WEAR, -450.0, -260.0));

        let roughness = graph.add_node_with(
            place(NodeKind::mix_float(), ROUGHNESS_MIX, 100.0, -60.0),
            &[("Factor", Float(self.edge_wear_mix))],
        )?;
        graph.connect(&to_bw.output("Val")?, &roughness.input("A")?)?;
        graph.connect(&geometry.output("Pointiness")?, &roughness.input("B")?)?;

        // Height: weighted pits plus weighted pores
        let pits = graph.add_node_with(
            place(NodeKind::math(MathOperation::Multiply), PIT_WEIGHT, -450.0, -300.0),
            &[("B", Float(self.voronoi_to_bump))],
        )?;
        graph.connect(&voronoi.output("Distance")?, &pits.input("A")?)?;

        let pores = graph.add_node_with(
            place(NodeKind::math(MathOperation::Multiply), PORE_WEIGHT, -450.0, -430.0),
            &[("B", Float(self.noise_to_bump))],
        )?;
        graph.connect(&noise.output("Fac")?, &pores.input("A")?)?;

        let height = graph.add_node(place(
            NodeKind::math(MathOperation::Add),
            HEIGHT_SUM,
            -250.0,
            -350.0,
        ));
        graph.connect(&pits.output("Value")?, &height.input("A")?)?;
        graph.connect(&pores.output("Value")?, &height.input("B")?)?;

        let bump = graph.add_node_with(
            place(NodeKind::Bump { invert: false }, BUMP, 650.0, -150.0),
            &[
                ("Strength", Float(self.bump_strength)),
                ("Distance", Float(self.bump_distance)),
            ],
        )?;
        graph.connect(&height.output("Value")?, &bump.input("Height")?)?;

        // Shader inputs
        graph.connect(&banded.output("Result")?, &shader.input("Base Color")?)?;
        graph.connect(&roughness.output("Result")?, &shader.input("Roughness")?)?;
        graph.connect(&bump.output("Normal")?, &shader.input("Normal")?)?;

        Ok(())
    }
}

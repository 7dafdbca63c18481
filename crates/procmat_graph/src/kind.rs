// SPDX-License-Identifier: MIT OR Apache-2.0
//! The closed set of shading node kinds and their socket tables.
//!
//! Every kind resolves to a fixed list of typed input and output sockets.
//! Node creation copies these tables into the node, so a port name either
//! exists with a known type or the lookup fails before any wiring happens.

use crate::port::{PortType, PortValue};
use crate::ramp::ColorRamp;
use serde::{Deserialize, Serialize};

/// Static description of one socket on a node kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SocketDescriptor {
    /// Port name
    pub name: &'static str,
    /// Value type carried by the port
    pub port_type: PortType,
    /// Built-in default for inputs, `None` for implicit inputs and outputs
    pub default: Option<PortValue>,
}

impl SocketDescriptor {
    const fn float(name: &'static str, value: f32) -> Self {
        Self { name, port_type: PortType::Float, default: Some(PortValue::Float(value)) }
    }

    const fn vector(name: &'static str, value: [f32; 3]) -> Self {
        Self { name, port_type: PortType::Vector3, default: Some(PortValue::Vector3(value)) }
    }

    const fn color(name: &'static str, value: [f32; 4]) -> Self {
        Self { name, port_type: PortType::Color, default: Some(PortValue::Color(value)) }
    }

    const fn implicit(name: &'static str, port_type: PortType) -> Self {
        Self { name, port_type, default: None }
    }

    const fn out(name: &'static str, port_type: PortType) -> Self {
        Self { name, port_type, default: None }
    }
}

/// How the mapping node interprets its input vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MappingType {
    /// Transform a point (location, rotation, scale)
    #[default]
    Point,
    /// Inverse transform for texture placement
    Texture,
    /// Direction, location ignored
    Vector,
    /// Normal, inverse-transpose transform
    Normal,
}

/// Profile of the gradient texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GradientType {
    /// Ramp along X
    #[default]
    Linear,
    /// Squared ramp along X
    Quadratic,
    /// Smoothstep ramp along X
    Easing,
    /// Ramp along the XY diagonal
    Diagonal,
    /// Distance from the origin
    Spherical,
    /// Squared distance from the origin
    QuadraticSphere,
    /// Angle around Z
    Radial,
}

/// Which distance the Voronoi texture reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VoronoiFeature {
    /// Closest feature point
    #[default]
    F1,
    /// Second closest feature point
    F2,
    /// Smoothed closest feature point
    SmoothF1,
}

/// Distance metric of the Voronoi texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Straight line
    #[default]
    Euclidean,
    /// Sum of axis distances
    Manhattan,
    /// Largest axis distance
    Chebychev,
}

/// Shape of the wave texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WaveType {
    /// Parallel bands
    #[default]
    Bands,
    /// Concentric rings
    Rings,
}

/// Axis selector for directional effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    /// X axis
    #[default]
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

/// Scalar math operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MathOperation {
    /// A + B
    #[default]
    Add,
    /// A - B
    Subtract,
    /// A * B
    Multiply,
    /// A / B
    Divide,
    /// A ^ B
    Power,
    /// min(A, B)
    Minimum,
    /// max(A, B)
    Maximum,
}

/// Value type blended by the mix node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MixDataType {
    /// Scalars
    Float,
    /// RGBA colors
    #[default]
    Rgba,
}

/// Color blend mode of the mix node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Linear interpolation
    #[default]
    Mix,
    /// A * B
    Multiply,
    /// A + B
    Add,
    /// Inverted multiply of inverses
    Screen,
    /// Multiply or screen depending on A
    Overlay,
}

/// Node kind: a closed set, each with its own settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Texture coordinate source
    TextureCoordinate,
    /// Linear transform of a vector
    Mapping {
        /// Vector interpretation
        mapping_type: MappingType,
    },
    /// Gradient texture
    GradientTexture {
        /// Gradient profile
        gradient_type: GradientType,
    },
    /// Fractal noise texture
    NoiseTexture,
    /// Cellular texture
    VoronoiTexture {
        /// Reported feature
        feature: VoronoiFeature,
        /// Distance metric
        metric: DistanceMetric,
    },
    /// Wave texture
    WaveTexture {
        /// Bands or rings
        wave_type: WaveType,
        /// Axis the bands run across
        bands_direction: Axis,
    },
    /// Color ramp lookup
    ColorRamp(ColorRamp),
    /// Scalar math
    Math {
        /// Operation
        operation: MathOperation,
        /// Clamp the result to [0, 1]
        clamp: bool,
    },
    /// Float or color mixer
    Mix {
        /// Scalars or colors
        data_type: MixDataType,
        /// Blend mode (colors only)
        blend: BlendMode,
        /// Clamp the result to [0, 1]
        clamp_result: bool,
    },
    /// Color inversion
    Invert,
    /// Color to luminance
    RgbToBw,
    /// Vector component split
    SeparateXyz,
    /// Normal perturbation from a height signal
    Bump {
        /// Invert the bump direction
        invert: bool,
    },
    /// Geometry attribute probe
    Geometry,
    /// Physically-based surface shader
    PrincipledBsdf,
    /// Graph output sink
    MaterialOutput,
}

const ZERO3: [f32; 3] = [0.0, 0.0, 0.0];
const GRAY: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

impl NodeKind {
    /// Mapping node with the default point transform
    pub fn mapping() -> Self {
        Self::Mapping { mapping_type: MappingType::Point }
    }

    /// Math node without clamping
    pub fn math(operation: MathOperation) -> Self {
        Self::Math { operation, clamp: false }
    }

    /// Color mix node with the given blend mode
    pub fn mix_color(blend: BlendMode, clamp_result: bool) -> Self {
        Self::Mix { data_type: MixDataType::Rgba, blend, clamp_result }
    }

    /// Scalar mix node
    pub fn mix_float() -> Self {
        Self::Mix { data_type: MixDataType::Float, blend: BlendMode::Mix, clamp_result: false }
    }

    /// Default display name for nodes of this kind
    pub fn label(&self) -> &'static str {
        match self {
            Self::TextureCoordinate => "Texture Coordinate",
            Self::Mapping { .. } => "Mapping",
            Self::GradientTexture { .. } => "Gradient Texture",
            Self::NoiseTexture => "Noise Texture",
            Self::VoronoiTexture { .. } => "Voronoi Texture",
            Self::WaveTexture { .. } => "Wave Texture",
            Self::ColorRamp(_) => "Color Ramp",
            Self::Math { .. } => "Math",
            Self::Mix { .. } => "Mix",
            Self::Invert => "Invert Color",
            Self::RgbToBw => "RGB to BW",
            Self::SeparateXyz => "Separate XYZ",
            Self::Bump { .. } => "Bump",
            Self::Geometry => "Geometry",
            Self::PrincipledBsdf => "Principled BSDF",
            Self::MaterialOutput => "Material Output",
        }
    }

    /// Whether this kind is the graph output sink
    pub fn is_sink(&self) -> bool {
        matches!(self, Self::MaterialOutput)
    }

    /// The ramp carried by a color ramp node
    pub fn ramp(&self) -> Option<&ColorRamp> {
        match self {
            Self::ColorRamp(ramp) => Some(ramp),
            _ => None,
        }
    }

    /// Input socket table
    pub fn inputs(&self) -> Vec<SocketDescriptor> {
        use SocketDescriptor as S;
        match self {
            Self::TextureCoordinate | Self::Geometry => vec![],
            Self::Mapping { .. } => vec![
                S::vector("Vector", ZERO3),
                S::vector("Location", ZERO3),
                S::vector("Rotation", ZERO3),
                S::vector("Scale", [1.0, 1.0, 1.0]),
            ],
            Self::GradientTexture { .. } => vec![S::implicit("Vector", PortType::Vector3)],
            Self::NoiseTexture => vec![
                S::implicit("Vector", PortType::Vector3),
                S::float("Scale", 5.0),
                S::float("Detail", 2.0),
                S::float("Roughness", 0.5),
                S::float("Lacunarity", 2.0),
                S::float("Distortion", 0.0),
            ],
            Self::VoronoiTexture { .. } => vec![
                S::implicit("Vector", PortType::Vector3),
                S::float("Scale", 5.0),
                S::float("Detail", 0.0),
                S::float("Roughness", 0.5),
                S::float("Lacunarity", 2.0),
                S::float("Randomness", 1.0),
            ],
            Self::WaveTexture { .. } => vec![
                S::implicit("Vector", PortType::Vector3),
                S::float("Scale", 5.0),
                S::float("Distortion", 0.0),
                S::float("Detail", 2.0),
                S::float("Detail Scale", 1.0),
                S::float("Detail Roughness", 0.5),
                S::float("Phase Offset", 0.0),
            ],
            Self::ColorRamp(_) => vec![S::float("Fac", 0.5)],
            Self::Math { .. } => vec![S::float("A", 0.5), S::float("B", 0.5)],
            Self::Mix { data_type: MixDataType::Float, .. } => vec![
                S::float("Factor", 0.5),
                S::float("A", 0.0),
                S::float("B", 0.0),
            ],
            Self::Mix { data_type: MixDataType::Rgba, .. } => vec![
                S::float("Factor", 0.5),
                S::color("A", GRAY),
                S::color("B", GRAY),
            ],
            Self::Invert => vec![S::float("Fac", 1.0), S::color("Color", [0.0, 0.0, 0.0, 1.0])],
            Self::RgbToBw => vec![S::color("Color", GRAY)],
            Self::SeparateXyz => vec![S::vector("Vector", ZERO3)],
            Self::Bump { .. } => vec![
                S::float("Strength", 1.0),
                S::float("Distance", 1.0),
                S::float("Height", 1.0),
                S::implicit("Normal", PortType::Vector3),
            ],
            Self::PrincipledBsdf => vec![
                S::color("Base Color", [0.8, 0.8, 0.8, 1.0]),
                S::float("Metallic", 0.0),
                S::float("Roughness", 0.5),
                S::float("IOR", 1.5),
                S::float("Alpha", 1.0),
                S::implicit("Normal", PortType::Vector3),
                S::float("Specular IOR Level", 0.5),
                S::color("Emission Color", [0.0, 0.0, 0.0, 1.0]),
                S::float("Emission Strength", 0.0),
            ],
            Self::MaterialOutput => vec![
                S::implicit("Surface", PortType::Shader),
                S::implicit("Volume", PortType::Shader),
                S::implicit("Displacement", PortType::Vector3),
            ],
        }
    }

    /// Output socket table
    pub fn outputs(&self) -> Vec<SocketDescriptor> {
        use SocketDescriptor as S;
        match self {
            Self::TextureCoordinate => [
                "Generated",
                "Normal",
                "UV",
                "Object",
                "Camera",
                "Window",
                "Reflection",
            ]
            .into_iter()
            .map(|name| S::out(name, PortType::Vector3))
            .collect(),
            Self::Mapping { .. } => vec![S::out("Vector", PortType::Vector3)],
            Self::GradientTexture { .. } | Self::WaveTexture { .. } => vec![
                S::out("Color", PortType::Color),
                S::out("Fac", PortType::Float),
            ],
            Self::NoiseTexture => vec![
                S::out("Fac", PortType::Float),
                S::out("Color", PortType::Color),
            ],
            Self::VoronoiTexture { .. } => vec![
                S::out("Distance", PortType::Float),
                S::out("Color", PortType::Color),
                S::out("Position", PortType::Vector3),
                S::out("Cell Id", PortType::Float),
            ],
            Self::ColorRamp(_) => vec![
                S::out("Color", PortType::Color),
                S::out("Alpha", PortType::Float),
            ],
            Self::Math { .. } => vec![S::out("Value", PortType::Float)],
            Self::Mix { data_type: MixDataType::Float, .. } => {
                vec![S::out("Result", PortType::Float)]
            }
            Self::Mix { data_type: MixDataType::Rgba, .. } => {
                vec![S::out("Result", PortType::Color)]
            }
            Self::Invert => vec![S::out("Color", PortType::Color)],
            Self::RgbToBw => vec![S::out("Val", PortType::Float)],
            Self::SeparateXyz => vec![
                S::out("X", PortType::Float),
                S::out("Y", PortType::Float),
                S::out("Z", PortType::Float),
            ],
            Self::Bump { .. } => vec![S::out("Normal", PortType::Vector3)],
            Self::Geometry => {
                let mut outputs: Vec<_> = [
                    "Position",
                    "Normal",
                    "Tangent",
                    "True Normal",
                    "Incoming",
                    "Parametric",
                ]
                .into_iter()
                .map(|name| S::out(name, PortType::Vector3))
                .collect();
                outputs.extend(
                    ["Backfacing", "Pointiness", "Random Per Island"]
                        .into_iter()
                        .map(|name| S::out(name, PortType::Float)),
                );
                outputs
            }
            Self::PrincipledBsdf => vec![S::out("BSDF", PortType::Shader)],
            Self::MaterialOutput => vec![],
        }
    }
}

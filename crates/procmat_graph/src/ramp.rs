// SPDX-License-Identifier: MIT OR Apache-2.0
//! Color ramp lookup tables.
//!
//! A ramp maps a scalar factor to an RGBA color through an ordered list of
//! stops. It always holds at least two stops: construction takes the first
//! and last stop, and stops can only be added afterwards.

use serde::{Deserialize, Serialize};

/// A single ramp stop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampStop {
    /// Position along the ramp, in [0, 1]
    pub position: f32,
    /// RGBA color at this position
    pub color: [f32; 4],
}

impl RampStop {
    /// Create a stop, clamping the position into [0, 1]
    pub fn new(position: f32, color: [f32; 4]) -> Self {
        Self {
            position: position.clamp(0.0, 1.0),
            color,
        }
    }

    /// Stop with an opaque gray color, used for value ramps
    pub fn gray(position: f32, value: f32) -> Self {
        Self::new(position, [value, value, value, 1.0])
    }
}

/// How colors are blended between adjacent stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RampInterpolation {
    /// Linear blend of position and every channel
    #[default]
    Linear,
    /// Hold the lower stop's color until the next stop
    Constant,
}

/// Ordered stop-based color lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawColorRamp")]
pub struct ColorRamp {
    stops: Vec<RampStop>,
    interpolation: RampInterpolation,
}

impl ColorRamp {
    /// Create a two-stop ramp
    pub fn new(first: RampStop, last: RampStop) -> Self {
        let mut ramp = Self {
            stops: Vec::with_capacity(2),
            interpolation: RampInterpolation::Linear,
        };
        ramp.add_stop(first);
        ramp.add_stop(last);
        ramp
    }

    /// Builder-style variant of [`ColorRamp::add_stop`]
    pub fn with_stop(mut self, stop: RampStop) -> Self {
        self.add_stop(stop);
        self
    }

    /// Set the interpolation mode
    pub fn with_interpolation(mut self, interpolation: RampInterpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Insert a stop, keeping positions sorted.
    ///
    /// A stop at an existing position goes after the stops already there.
    /// Returns the index the stop landed at.
    pub fn add_stop(&mut self, stop: RampStop) -> usize {
        let stop = RampStop::new(stop.position, stop.color);
        let index = self
            .stops
            .iter()
            .position(|s| s.position > stop.position)
            .unwrap_or(self.stops.len());
        self.stops.insert(index, stop);
        index
    }

    /// Stops in position order
    pub fn stops(&self) -> &[RampStop] {
        &self.stops
    }

    /// Interpolation mode
    pub fn interpolation(&self) -> RampInterpolation {
        self.interpolation
    }

    /// Whether every stop position is strictly greater than the previous one
    pub fn is_strictly_increasing(&self) -> bool {
        self.stops.windows(2).all(|w| w[0].position < w[1].position)
    }

    /// Look up the color for `fac`.
    ///
    /// Factors before the first stop or past the last stop return the end
    /// colors.
    pub fn evaluate(&self, fac: f32) -> [f32; 4] {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];
        if fac <= first.position {
            return first.color;
        }
        if fac >= last.position {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if fac < hi.position {
                return match self.interpolation {
                    RampInterpolation::Constant => lo.color,
                    RampInterpolation::Linear => {
                        let span = hi.position - lo.position;
                        let t = if span > 0.0 { (fac - lo.position) / span } else { 0.0 };
                        lerp_color(lo.color, hi.color, t)
                    }
                };
            }
        }

        last.color
    }
}

fn lerp_color(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
}

/// Unchecked form used when deserializing
#[derive(Deserialize)]
#[serde(rename = "ColorRamp")]
struct RawColorRamp {
    stops: Vec<RampStop>,
    #[serde(default)]
    interpolation: RampInterpolation,
}

/// Error when a deserialized ramp breaks the two-stop minimum
#[derive(Debug, thiserror::Error)]
#[error("Color ramp needs at least 2 stops, found {0}")]
pub struct RampError(pub usize);

impl TryFrom<RawColorRamp> for ColorRamp {
    type Error = RampError;

    fn try_from(raw: RawColorRamp) -> Result<Self, Self::Error> {
        let count = raw.stops.len();
        let mut stops = raw.stops.into_iter();
        let (Some(first), Some(last)) = (stops.next(), stops.next()) else {
            return Err(RampError(count));
        };
        let mut ramp = ColorRamp::new(first, last).with_interpolation(raw.interpolation);
        for stop in stops {
            ramp.add_stop(stop);
        }
        Ok(ramp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    #[test]
    fn test_stops_stay_sorted() {
        let ramp = ColorRamp::new(RampStop::new(0.0, BLACK), RampStop::new(1.0, WHITE))
            .with_stop(RampStop::new(0.4, [0.5, 0.0, 0.0, 1.0]));

        let positions: Vec<f32> = ramp.stops().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.0, 0.4, 1.0]);
        assert!(ramp.is_strictly_increasing());
    }

    #[test]
    fn test_out_of_range_positions_are_clamped() {
        let ramp = ColorRamp::new(RampStop::new(-0.5, BLACK), RampStop::new(1.7, WHITE));
        assert_eq!(ramp.stops()[0].position, 0.0);
        assert_eq!(ramp.stops()[1].position, 1.0);
    }

    #[test]
    fn test_reversed_construction_is_sorted() {
        let ramp = ColorRamp::new(RampStop::new(0.9, WHITE), RampStop::new(0.1, BLACK));
        assert_eq!(ramp.stops()[0].color, BLACK);
        assert_eq!(ramp.stops()[1].color, WHITE);
    }

    #[test]
    fn test_linear_evaluation() {
        let ramp = ColorRamp::new(RampStop::new(0.6, BLACK), RampStop::new(0.92, WHITE));

        assert_eq!(ramp.evaluate(0.0), BLACK);
        assert_eq!(ramp.evaluate(0.6), BLACK);
        assert_eq!(ramp.evaluate(1.0), WHITE);

        let mid = ramp.evaluate(0.76);
        assert!((mid[0] - 0.5).abs() < 1e-5);
        assert_eq!(mid[3], 1.0);
    }

    #[test]
    fn test_constant_evaluation() {
        let ramp = ColorRamp::new(RampStop::new(0.0, BLACK), RampStop::new(1.0, WHITE))
            .with_stop(RampStop::gray(0.5, 0.5))
            .with_interpolation(RampInterpolation::Constant);

        assert_eq!(ramp.evaluate(0.25), BLACK);
        assert_eq!(ramp.evaluate(0.75), [0.5, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn test_deserialize_rejects_single_stop() {
        let text = "(stops: [(position: 0.0, color: (0.0, 0.0, 0.0, 1.0))])";
        assert!(ron::from_str::<ColorRamp>(text).is_err());
    }

    #[test]
    fn test_unclamped_stops_are_clamped_on_entry() {
        let ramp = ColorRamp::new(
            RampStop { position: 1.5, color: WHITE },
            RampStop::new(0.5, BLACK),
        );
        let positions: Vec<f32> = ramp.stops().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.5, 1.0]);

        let text = "(stops: [
            (position: -0.5, color: (0.0, 0.0, 0.0, 1.0)),
            (position: 0.8, color: (1.0, 1.0, 1.0, 1.0)),
        ])";
        let ramp: ColorRamp = ron::from_str(text).unwrap();
        assert_eq!(ramp.stops()[0].position, 0.0);
        assert_eq!(ramp.stops()[1].position, 0.8);
    }

    #[test]
    fn test_coincident_stops_keep_insertion_order() {
        let ramp = ColorRamp::new(RampStop::new(0.0, BLACK), RampStop::new(1.0, WHITE))
            .with_stop(RampStop::gray(0.0, 0.5));

        let positions: Vec<f32> = ramp.stops().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.0, 0.0, 1.0]);
        assert!(!ramp.is_strictly_increasing());
        assert_eq!(ramp.stops()[1].color, [0.5, 0.5, 0.5, 1.0]);
        // Factors at or below the shared position take the first stop
        assert_eq!(ramp.evaluate(0.0), BLACK);
    }

    #[test]
    fn test_deserialize_sorts_stops() {
        let text = "(stops: [
            (position: 1.0, color: (1.0, 1.0, 1.0, 1.0)),
            (position: 0.0, color: (0.0, 0.0, 0.0, 1.0)),
        ])";
        let ramp: ColorRamp = ron::from_str(text).unwrap();
        assert_eq!(ramp.stops()[0].position, 0.0);
        assert_eq!(ramp.interpolation(), RampInterpolation::Linear);
    }
}

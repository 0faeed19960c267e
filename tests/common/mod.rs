//! Shared fixtures: a small voxel object and the feature descriptors computed over it.

#![allow(dead_code)]

use feature_cache::{BoxError, Calculation, CalculationMap};

/// A voxelized object: an id plus its voxel coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectMask {
    pub id: u32,
    pub voxels: Vec<(i32, i32, i32)>,
}

impl ObjectMask {
    pub fn new(id: u32, voxels: Vec<(i32, i32, i32)>) -> Self {
        Self { id, voxels }
    }

    /// A `w` x `h` rectangle in the z = 0 plane.
    pub fn rect(id: u32, w: i32, h: i32) -> Self {
        let voxels = (0..w).flat_map(|x| (0..h).map(move |y| (x, y, 0))).collect();
        Self { id, voxels }
    }

    pub fn empty(id: u32) -> Self {
        Self { id, voxels: Vec::new() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

fn coord(v: &(i32, i32, i32), axis: Axis) -> i32 {
    match axis {
        Axis::X => v.0,
        Axis::Y => v.1,
        Axis::Z => v.2,
    }
}

/// Single-valued features.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Feature {
    NumVoxels,
    Extent { axis: Axis },
    CountAbove { axis: Axis, threshold: i32 },
    /// Mean coordinate along `axis`; fails on an empty object.
    Center { axis: Axis },
}

impl Calculation for Feature {
    type Input = ObjectMask;
    type Output = f64;

    fn execute(&self, input: &ObjectMask) -> Result<f64, BoxError> {
        match self {
            Feature::NumVoxels => Ok(input.voxels.len() as f64),
            Feature::Extent { axis } => {
                let coords = input.voxels.iter().map(|v| coord(v, *axis));
                let min = coords.clone().min().unwrap_or(0);
                let max = coords.max().unwrap_or(-1);
                Ok(f64::from(max - min + 1))
            }
            Feature::CountAbove { axis, threshold } => {
                let n = input.voxels.iter().filter(|v| coord(v, *axis) > *threshold).count();
                Ok(n as f64)
            }
            Feature::Center { axis } => {
                if input.voxels.is_empty() {
                    return Err(format!("object {} has no voxels", input.id).into());
                }
                let sum: i64 = input.voxels.iter().map(|v| i64::from(coord(v, *axis))).sum();
                Ok(sum as f64 / input.voxels.len() as f64)
            }
        }
    }
}

/// Keyed features: one result per slice or per coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeatureMap {
    /// Voxels lying at `key` along `axis`.
    SliceCount { axis: Axis },
}

impl CalculationMap for FeatureMap {
    type Input = ObjectMask;
    type Key = i32;
    type Output = usize;

    fn execute(&self, input: &ObjectMask, key: &i32) -> Result<usize, BoxError> {
        match self {
            FeatureMap::SliceCount { axis } => {
                Ok(input.voxels.iter().filter(|v| coord(v, *axis) == *key).count())
            }
        }
    }
}

//! Geometry helpers shared by the renderer and by picking code.
//!
//! Nothing in here touches the graphics backend; every function is pure
//! except [`hex_to_rgba`], which memoizes into a process-wide cache.

pub mod color;
pub mod picking;
pub mod quaternion;

pub use color::{hex_to_rgba, Color};
pub use picking::{create_ray, intersect_ray_triangle, project, unproject, Ray, TriangleHit, Viewport};
pub use quaternion::{quaternion_from_axis_angle, quaternion_from_euler};

use crate::error::MathError;

#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians * 180.0 / std::f32::consts::PI
}

/// Bit test `x & (x - 1) == 0`. Zero passes the test as well.
#[inline]
pub fn is_power_of_two(x: u32) -> bool {
    x & x.wrapping_sub(1) == 0
}

/// Smallest power of two greater than or equal to `x`.
///
/// Only defined for positive inputs: the bit-spreading trick decrements `x`
/// first, so zero and negative values are rejected instead of wrapping.
/// Every positive `i64` has a successor power of two that fits in `u64`.
pub fn next_power_of_two(x: i64) -> Result<u64, MathError> {
    if x <= 0 {
        return Err(MathError::NonPositive(x));
    }
    let mut v = (x as u64) - 1;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    v |= v >> 32;
    Ok(v + 1)
}

/// Two-sided clamp. Unlike `f32::clamp` this never panics when `min > max`;
/// `max` wins in that case.
#[inline]
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    let lower = if value < min { min } else { value };
    if lower > max {
        max
    } else {
        lower
    }
}

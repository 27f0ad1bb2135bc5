//! Screen-space picking: unprojection, ray construction and ray/triangle tests.
//!
//! Conventions:
//! - Window coordinates have their origin at the viewport's top-left corner
//!   and y grows downward; NDC y grows upward.
//! - Window depth is `[0, 1]` and maps linearly onto NDC `[-1, 1]`
//!   (OpenGL clip conventions, as produced by `Mat4::perspective_rh_gl`).

use crate::error::MathError;
use glam::{Mat4, Vec3, Vec4, Vec4Swizzles};

const PARALLEL_EPSILON: f32 = 1e-4;

/// Pixel rectangle a projection is mapped onto.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub position: Vec3,
    pub look_at: Vec3,
    pub direction: Vec3,
}

/// Outcome of [`intersect_ray_triangle`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TriangleHit {
    /// The triangle has a zero normal (collinear or coincident vertices).
    Degenerate,
    /// No intersection: parallel off-plane, behind the origin, or outside.
    Disjoint,
    /// Single intersection point inside the triangle.
    Hit(Vec3),
    /// The ray lies in the triangle's plane.
    Coplanar,
}

impl TriangleHit {
    /// Legacy integer code: -1 degenerate, 0 disjoint, 1 hit, 2 coplanar.
    pub fn code(&self) -> i32 {
        match self {
            TriangleHit::Degenerate => -1,
            TriangleHit::Disjoint => 0,
            TriangleHit::Hit(_) => 1,
            TriangleHit::Coplanar => 2,
        }
    }

    pub fn point(&self) -> Option<Vec3> {
        match self {
            TriangleHit::Hit(p) => Some(*p),
            _ => None,
        }
    }
}

/// Maps a window-space point `[x, y, depth]` back through
/// `projection * model_view`.
pub fn unproject(
    screen: Vec3,
    viewport: Viewport,
    model_view: Mat4,
    projection: Mat4,
) -> Result<Vec3, MathError> {
    let combined = projection * model_view;
    let det = combined.determinant();
    if det == 0.0 || !det.is_finite() {
        return Err(MathError::SingularMatrix);
    }
    let inverse = combined.inverse();

    let ndc = Vec4::new(
        (screen.x - viewport.x) / viewport.width * 2.0 - 1.0,
        1.0 - (screen.y - viewport.y) / viewport.height * 2.0,
        screen.z * 2.0 - 1.0,
        1.0,
    );

    let out = inverse * ndc;
    if out.w == 0.0 {
        return Err(MathError::PointAtInfinity);
    }
    Ok(out.xyz() / out.w)
}

/// Forward pipeline: object space to window space with depth in `[0, 1]`.
pub fn project(
    point: Vec3,
    viewport: Viewport,
    model_view: Mat4,
    projection: Mat4,
) -> Result<Vec3, MathError> {
    let clip = projection * model_view * point.extend(1.0);
    if clip.w == 0.0 {
        return Err(MathError::PointAtInfinity);
    }
    let ndc = clip.xyz() / clip.w;

    Ok(Vec3::new(
        viewport.x + (ndc.x + 1.0) * 0.5 * viewport.width,
        viewport.y + (1.0 - ndc.y) * 0.5 * viewport.height,
        (ndc.z + 1.0) * 0.5,
    ))
}

/// Builds a picking ray from two window-space points, typically the same
/// pixel at depth 0 and depth 1.
pub fn create_ray(
    p0: Vec3,
    p1: Vec3,
    viewport: Viewport,
    model_view: Mat4,
    projection: Mat4,
) -> Result<Ray, MathError> {
    let position = unproject(p0, viewport, model_view, projection)?;
    let look_at = unproject(p1, viewport, model_view, projection)?;
    Ok(Ray {
        position,
        look_at,
        direction: (look_at - position).normalize_or_zero(),
    })
}

pub fn intersect_ray_triangle(v0: Vec3, v1: Vec3, v2: Vec3, ray: &Ray) -> TriangleHit {
    let u = v1 - v0;
    let v = v2 - v0;
    let normal = u.cross(v);
    if normal == Vec3::ZERO {
        return TriangleHit::Degenerate;
    }

    let w0 = ray.position - v0;
    let a = -normal.dot(w0);
    let b = normal.dot(ray.direction);
    if b.abs() < PARALLEL_EPSILON {
        return if a == 0.0 {
            TriangleHit::Coplanar
        } else {
            TriangleHit::Disjoint
        };
    }

    let r = a / b;
    if r < 0.0 {
        return TriangleHit::Disjoint;
    }

    let point = ray.position + ray.direction * r;

    let uu = u.dot(u);
    let uv = u.dot(v);
    let vv = v.dot(v);
    let w = point - v0;
    let wu = w.dot(u);
    let wv = w.dot(v);
    let d = uv * uv - uu * vv;

    let s = (uv * wv - vv * wu) / d;
    if !(0.0..=1.0).contains(&s) {
        return TriangleHit::Disjoint;
    }
    let t = (uv * wu - uu * wv) / d;
    if t < 0.0 || s + t > 1.0 {
        return TriangleHit::Disjoint;
    }

    TriangleHit::Hit(point)
}

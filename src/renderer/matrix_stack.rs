use glam::{Mat4, Vec3};

/// Current model-view matrix plus a LIFO of saved snapshots.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    current: Mat4,
    saved: Vec<Mat4>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixStack {
    pub fn new() -> Self {
        Self {
            current: Mat4::IDENTITY,
            saved: Vec::new(),
        }
    }

    #[inline]
    pub fn current(&self) -> Mat4 {
        self.current
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restores the last pushed matrix. Popping an empty stack does nothing.
    pub fn pop(&mut self) {
        match self.saved.pop() {
            Some(m) => self.current = m,
            None => log::trace!("pop_matrix on empty stack ignored"),
        }
    }

    pub fn origin(&mut self) {
        self.current = Mat4::IDENTITY;
    }

    /// Right-multiplies the current matrix by `m`.
    #[inline]
    pub fn transform(&mut self, m: Mat4) {
        self.current *= m;
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.transform(Mat4::from_translation(Vec3::new(x, y, z)));
    }

    /// Rotates `angle` radians about `axis`. A zero axis leaves the matrix alone.
    pub fn rotate(&mut self, angle: f32, axis: Vec3) {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            log::trace!("rotate about zero-length axis ignored");
            return;
        }
        self.transform(Mat4::from_axis_angle(axis, angle));
    }

    pub fn rotate_x(&mut self, angle: f32) {
        self.transform(Mat4::from_rotation_x(angle));
    }

    pub fn rotate_y(&mut self, angle: f32) {
        self.transform(Mat4::from_rotation_y(angle));
    }

    pub fn rotate_z(&mut self, angle: f32) {
        self.transform(Mat4::from_rotation_z(angle));
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.transform(Mat4::from_scale(Vec3::new(x, y, z)));
    }
}

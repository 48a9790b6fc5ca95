use foundation::math::Vec3;
use scene::picking::Ray;

pub type Mat4 = [[f32; 4]; 4];

/// Perspective camera in scene space (x east, y up, -z north).
///
/// Orientation is yaw about +y (counter-clockwise seen from above, 0 looks
/// north), then pitch about the camera right axis, then roll about the view
/// direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub position: Vec3,
    pub yaw_rad: f64,
    pub pitch_rad: f64,
    pub roll_rad: f64,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_y_deg: f64, aspect: f64, near: f64, far: f64) -> Self {
        let mut camera = Self {
            fov_y_deg,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            yaw_rad: 0.0,
            pitch_rad: 0.0,
            roll_rad: 0.0,
            projection: [[0.0; 4]; 4],
        };
        camera.update_projection_matrix();
        camera
    }

    /// Recompute the projection from `fov_y_deg`, `aspect`, `near` and `far`.
    pub fn update_projection_matrix(&mut self) {
        self.projection =
            mat4_perspective_rh_z0(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn set_orientation(&mut self, yaw_rad: f64, pitch_rad: f64, roll_rad: f64) {
        self.yaw_rad = yaw_rad;
        self.pitch_rad = pitch_rad;
        self.roll_rad = roll_rad;
    }

    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw_rad.sin_cos();
        let (sp, cp) = self.pitch_rad.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    /// Camera right and up axes, including roll.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let f = self.forward();
        let (sy, cy) = self.yaw_rad.sin_cos();
        let right0 = Vec3::new(cy, 0.0, -sy);
        let up0 = right0.cross(f);

        let (sr, cr) = self.roll_rad.sin_cos();
        let right = right0.scale(cr) + up0.scale(sr);
        let up = up0.scale(cr) - right0.scale(sr);
        (right, up)
    }

    pub fn view_matrix(&self) -> Mat4 {
        let f = self.forward();
        let (s, u) = self.basis();
        let eye = self.position;

        // Column-major view matrix.
        [
            [s.x as f32, u.x as f32, (-f.x) as f32, 0.0],
            [s.y as f32, u.y as f32, (-f.y) as f32, 0.0],
            [s.z as f32, u.z as f32, (-f.z) as f32, 0.0],
            [
                (-s.dot(eye)) as f32,
                (-u.dot(eye)) as f32,
                f.dot(eye) as f32,
                1.0,
            ],
        ]
    }

    pub fn view_projection(&self) -> Mat4 {
        mat4_mul(self.projection, self.view_matrix())
    }

    /// Ray from the camera through normalized device coordinates (`[-1, 1]`, y up).
    pub fn ray_through_ndc(&self, x: f64, y: f64) -> Ray {
        let half_h = (0.5 * self.fov_y_deg.to_radians()).tan();
        let half_w = half_h * self.aspect;
        let (right, up) = self.basis();
        let dir = self.forward() + right.scale(x * half_w) + up.scale(y * half_h);
        Ray::new(self.position, dir)
    }
}

/// Aspect ratio for a surface; a zero height is treated as one pixel.
pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    width.max(1) as f64 / height.max(1) as f64
}

fn mat4_mul(a: Mat4, b: Mat4) -> Mat4 {
    // Column-major matrix multiply: c = a * b
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = (f / aspect) as f32;
    let m11 = f as f32;
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;

    // Column-major, right-handed, depth range [0, 1].
    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

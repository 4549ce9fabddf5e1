use glam::{Mat3, Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::{Ray, EPSILON};

/// Projection parameters of a [`Camera`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Projection {
    /// Perspective projection.
    Perspective {
        /// Vertical field of view in degrees.
        fov_y_deg: f32,
        /// Viewport aspect ratio (width / height).
        aspect: f32,
    },
    /// Orthographic projection with an explicit frustum box.
    Orthographic {
        /// Left frustum plane.
        left: f32,
        /// Right frustum plane.
        right: f32,
        /// Top frustum plane.
        top: f32,
        /// Bottom frustum plane.
        bottom: f32,
    },
}

/// A perspective or orthographic camera.
///
/// The camera looks down its local `-Z` axis with local `+Y` up. Controls
/// mutate `position`, `rotation` (through [`Camera::look_at`]), `up` and
/// `zoom` in place; the caller owns the camera and renders with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// World orientation.
    pub rotation: Quat,
    /// Up direction used by [`Camera::look_at`].
    pub up: Vec3,
    /// Zoom factor; narrows the perspective field of view or scales the
    /// orthographic frustum.
    pub zoom: f32,
    /// Projection parameters.
    pub projection: Projection,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
    #[serde(skip, default = "identity")]
    projection_matrix: Mat4,
}

fn identity() -> Mat4 {
    Mat4::IDENTITY
}

impl Camera {
    /// Perspective camera at the origin looking down `-Z`.
    #[must_use]
    pub fn perspective(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            up: Vec3::Y,
            zoom: 1.0,
            projection: Projection::Perspective { fov_y_deg, aspect },
            near,
            far,
            projection_matrix: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Orthographic camera at the origin looking down `-Z`.
    #[must_use]
    pub fn orthographic(
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            up: Vec3::Y,
            zoom: 1.0,
            projection: Projection::Orthographic {
                left,
                right,
                top,
                bottom,
            },
            near,
            far,
            projection_matrix: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Builder-style position setter.
    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Whether this is a perspective camera.
    #[must_use]
    pub fn is_perspective(&self) -> bool {
        matches!(self.projection, Projection::Perspective { .. })
    }

    /// Viewport aspect ratio (width / height).
    #[must_use]
    pub fn aspect(&self) -> f32 {
        match self.projection {
            Projection::Perspective { aspect, .. } => aspect,
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
            } => {
                let height = top - bottom;
                if height.abs() < EPSILON {
                    1.0
                } else {
                    (right - left) / height
                }
            }
        }
    }

    /// Unit view direction in world space.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Unit screen-up direction in world space.
    #[must_use]
    pub fn screen_up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Unit screen-right direction in world space.
    #[must_use]
    pub fn screen_right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Orient the camera so it looks at `target`, keeping `up` as the
    /// vertical reference.
    ///
    /// Looking exactly along `up` (or at the eye position itself) picks an
    /// arbitrary but stable perpendicular instead of producing NaNs.
    pub fn look_at(&mut self, target: Vec3) {
        let to_target = target - self.position;
        if to_target.length_squared() < EPSILON * EPSILON {
            return;
        }
        let back = -to_target.normalize();
        let mut right = self.up.cross(back);
        if right.length_squared() < EPSILON * EPSILON {
            right = back.any_orthonormal_vector().cross(back);
        }
        let right = right.normalize();
        let up = back.cross(right);
        self.rotation =
            Quat::from_mat3(&Mat3::from_cols(right, up, back)).normalize();
    }

    /// View (world → camera) matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
            .inverse()
    }

    /// Cached projection matrix from the last
    /// [`update_projection_matrix`](Self::update_projection_matrix).
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    /// Recompute the projection matrix after changing projection
    /// parameters or zoom.
    pub fn update_projection_matrix(&mut self) {
        let zoom = self.zoom.max(EPSILON);
        self.projection_matrix = match self.projection {
            Projection::Perspective { fov_y_deg, aspect } => {
                let half = (fov_y_deg.to_radians() * 0.5).tan() / zoom;
                Mat4::perspective_rh(
                    2.0 * half.atan(),
                    aspect,
                    self.near,
                    self.far,
                )
            }
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
            } => {
                let cx = (left + right) * 0.5;
                let cy = (top + bottom) * 0.5;
                let hw = (right - left) * 0.5 / zoom;
                let hh = (top - bottom) * 0.5 / zoom;
                Mat4::orthographic_rh(
                    cx - hw,
                    cx + hw,
                    cy - hh,
                    cy + hh,
                    self.near,
                    self.far,
                )
            }
        };
    }

    /// Half of the visible height at `distance` in front of the camera.
    #[must_use]
    pub fn half_height_at(&self, distance: f32) -> f32 {
        let zoom = self.zoom.max(EPSILON);
        match self.projection {
            Projection::Perspective { fov_y_deg, .. } => {
                distance * (fov_y_deg.to_radians() * 0.5).tan() / zoom
            }
            Projection::Orthographic { top, bottom, .. } => {
                (top - bottom) * 0.5 / zoom
            }
        }
    }

    /// World-space ray through a point in normalized device coordinates.
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let zoom = self.zoom.max(EPSILON);
        match self.projection {
            Projection::Perspective { fov_y_deg, aspect } => {
                let tan_half = (fov_y_deg.to_radians() * 0.5).tan() / zoom;
                let local =
                    Vec3::new(ndc.x * tan_half * aspect, ndc.y * tan_half, -1.0);
                Ray::new(self.position, self.rotation * local)
            }
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
            } => {
                let x = ((right + left) + ndc.x * (right - left)) * 0.5 / zoom;
                let y = ((top + bottom) + ndc.y * (top - bottom)) * 0.5 / zoom;
                Ray::new(
                    self.position + self.rotation * Vec3::new(x, y, 0.0),
                    self.forward(),
                )
            }
        }
    }
}

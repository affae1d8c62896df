use glamx::{Mat4, Vec2, Vec3};

/// Units of camera translation per pixel of pan drag.
pub const PAN_SPEED: f32 = 0.01;

/// Units of camera translation per unit of dolly input.
pub const DOLLY_SPEED: f32 = 0.1;

const DEFAULT_FOV_DEG: f32 = 45.0;
const FOCUS_DISTANCE_FACTOR: f32 = 1.5;

/// The viewer camera: accumulated-rotation orbit state plus projection
/// parameters.
///
/// The camera keeps a fixed forward direction and up vector; rotating the
/// view accumulates two angles (in degrees, unbounded) that the view
/// transform applies to the whole scene. This matches the feel of turning
/// the model in front of a fixed observer rather than flying the observer
/// around the model.
///
/// Zooming happens two ways: the dolly ([`dolly`](Self::dolly), driven by
/// wheel and right-button drags) translates the camera along z, while the
/// separate `zoom` field divides the field of view in the projection. No
/// input path drives the latter; it defaults to 1.0 and only
/// [`set_fov_zoom`](Self::set_fov_zoom) touches it.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerCamera3d {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    rotation_x: f32,
    rotation_y: f32,
    pan_offset: Vec2,
    zoom: f32,
    znear: f32,
    zfar: f32,
    proj: Mat4,
    proj_dirty: bool,
    last_viewport: Vec2,
}

impl Default for ViewerCamera3d {
    fn default() -> Self {
        ViewerCamera3d::new()
    }
}

impl ViewerCamera3d {
    /// Creates a camera at the default viewing position.
    ///
    /// Defaults: eye at `(0, 0, 5)` looking down `-z`, `y` up, 45° field of
    /// view, near plane 0.1, far plane 500.
    pub fn new() -> ViewerCamera3d {
        ViewerCamera3d {
            position: Vec3::new(0.0, 0.0, 5.0),
            front: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            rotation_x: 0.0,
            rotation_y: 0.0,
            pan_offset: Vec2::ZERO,
            zoom: 1.0,
            znear: 0.1,
            zfar: 500.0,
            proj: Mat4::IDENTITY,
            proj_dirty: true,
            last_viewport: Vec2::new(800.0, 600.0),
        }
    }

    /// The camera position in world space.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Accumulated `(pitch, yaw)` rotation in degrees.
    #[inline]
    pub fn rotation(&self) -> (f32, f32) {
        (self.rotation_x, self.rotation_y)
    }

    /// The near and far clipping plane distances.
    #[inline]
    pub fn clip_planes(&self) -> (f32, f32) {
        (self.znear, self.zfar)
    }

    /// The field-of-view divisor.
    #[inline]
    pub fn fov_zoom(&self) -> f32 {
        self.zoom
    }

    /// Accumulates scene rotation, in degrees. Angles are unbounded; there
    /// is no wraparound or clamping.
    pub fn rotate(&mut self, delta_pitch: f32, delta_yaw: f32) {
        self.rotation_x += delta_pitch;
        self.rotation_y += delta_yaw;
    }

    /// Translates the camera across the view plane from a pixel drag delta.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.position.x -= dx * PAN_SPEED;
        self.position.y += dy * PAN_SPEED;
    }

    /// Translates the camera along its viewing axis.
    ///
    /// Positive deltas move the camera toward the scene. This is a dolly:
    /// the field of view is unaffected.
    pub fn dolly(&mut self, delta: f32) {
        self.position.z -= delta * DOLLY_SPEED;
    }

    /// Recenters the camera on a bounding box and backs it off far enough to
    /// see the whole model.
    ///
    /// The eye lands on the box center in x/y, at `1.5 ×` the largest axis
    /// extent in z. Accumulated rotation and pan are left untouched.
    pub fn focus(&mut self, bounding_min: Vec3, bounding_max: Vec3) {
        let center = (bounding_min + bounding_max) * 0.5;
        let size = bounding_max - bounding_min;
        self.position.x = center.x;
        self.position.y = center.y;
        self.position.z = size.max_element() * FOCUS_DISTANCE_FACTOR;
    }

    /// Sets the near clip distance.
    ///
    /// Updates violating `0 < near < far` are rejected and logged; the
    /// projection must stay renderable.
    pub fn set_near_clip(&mut self, near: f32) {
        if !near.is_finite() || near <= 0.0 || near >= self.zfar {
            log::warn!(
                "rejecting near clip {} (far clip is {})",
                near,
                self.zfar
            );
            return;
        }
        self.znear = near;
        self.proj_dirty = true;
    }

    /// Sets the far clip distance.
    ///
    /// Updates violating `near < far` are rejected and logged.
    pub fn set_far_clip(&mut self, far: f32) {
        if !far.is_finite() || far <= self.znear {
            log::warn!(
                "rejecting far clip {} (near clip is {})",
                far,
                self.znear
            );
            return;
        }
        self.zfar = far;
        self.proj_dirty = true;
    }

    /// Sets the field-of-view divisor.
    ///
    /// The effective vertical field of view is `45° / zoom`. Note that no
    /// input path calls this; wheel and drag zooming go through
    /// [`dolly`](Self::dolly) instead.
    pub fn set_fov_zoom(&mut self, zoom: f32) {
        if !zoom.is_finite() || zoom <= 0.0 {
            log::warn!("rejecting field-of-view zoom {}", zoom);
            return;
        }
        self.zoom = zoom;
        self.proj_dirty = true;
    }

    /// The projection matrix for a viewport of the given pixel size.
    ///
    /// Recomputed only when the clip planes, the zoom divisor, or the
    /// viewport changed since the last call. A degenerate zero-height
    /// viewport falls back to an aspect ratio of 1.
    pub fn projection(&mut self, viewport: Vec2) -> Mat4 {
        if self.proj_dirty || viewport != self.last_viewport {
            let aspect = if viewport.y > 0.0 {
                viewport.x / viewport.y
            } else {
                1.0
            };
            let fovy = (DEFAULT_FOV_DEG / self.zoom).to_radians();
            self.proj = Mat4::perspective_rh_gl(fovy, aspect, self.znear, self.zfar);
            self.last_viewport = viewport;
            self.proj_dirty = false;
        }
        self.proj
    }

    /// The view matrix: a look-at from the eye along the fixed forward
    /// direction, followed by the accumulated scene rotation (about x, then
    /// y) and the pan translation.
    ///
    /// The rotation is applied after the look-at, so it turns the scene in
    /// front of the camera rather than reorienting the camera itself.
    pub fn view(&self) -> Mat4 {
        let look_at = Mat4::look_at_rh(self.position, self.position + self.front, self.up);
        look_at
            * Mat4::from_rotation_x(self.rotation_x.to_radians())
            * Mat4::from_rotation_y(self.rotation_y.to_radians())
            * Mat4::from_translation(self.pan_offset.extend(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_frames_a_unit_box() {
        let mut camera = ViewerCamera3d::new();
        camera.focus(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn focus_uses_the_largest_axis_extent() {
        let mut camera = ViewerCamera3d::new();
        camera.focus(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 8.0, 4.0));
        assert_eq!(camera.position(), Vec3::new(1.0, 4.0, 12.0));
    }

    #[test]
    fn rotation_accumulates_without_clamping() {
        let mut camera = ViewerCamera3d::new();
        for _ in 0..100 {
            camera.rotate(5.0, 10.0);
        }
        assert_eq!(camera.rotation(), (500.0, 1000.0));

        camera.rotate(-2000.0, 0.0);
        assert_eq!(camera.rotation().0, -1500.0);
    }

    #[test]
    fn pan_and_dolly_scale_by_their_speed_constants() {
        let mut camera = ViewerCamera3d::new();
        camera.pan(10.0, 4.0);
        assert!((camera.position().x - -0.1).abs() < 1e-6);
        assert!((camera.position().y - 0.04).abs() < 1e-6);

        camera.dolly(10.0);
        assert!((camera.position().z - 4.0).abs() < 1e-6);
    }

    #[test]
    fn clip_plane_updates_keep_near_below_far() {
        let mut camera = ViewerCamera3d::new();

        camera.set_near_clip(600.0); // >= far: rejected
        assert_eq!(camera.clip_planes(), (0.1, 500.0));

        camera.set_far_clip(0.05); // <= near: rejected
        assert_eq!(camera.clip_planes(), (0.1, 500.0));

        camera.set_near_clip(-1.0); // non-positive: rejected
        assert_eq!(camera.clip_planes(), (0.1, 500.0));

        camera.set_near_clip(1.0);
        camera.set_far_clip(100.0);
        assert_eq!(camera.clip_planes(), (1.0, 100.0));
    }

    #[test]
    fn projection_survives_a_zero_height_viewport() {
        let mut camera = ViewerCamera3d::new();
        let proj = camera.projection(Vec2::new(800.0, 0.0));
        for value in proj.to_cols_array() {
            assert!(value.is_finite());
        }
        // Aspect fell back to 1: the x and y scale terms match.
        let cols = proj.to_cols_array_2d();
        assert!((cols[0][0] - cols[1][1]).abs() < 1e-6);
    }

    #[test]
    fn clip_change_invalidates_the_cached_projection() {
        let mut camera = ViewerCamera3d::new();
        let viewport = Vec2::new(800.0, 600.0);
        let before = camera.projection(viewport);
        camera.set_near_clip(1.0);
        let after = camera.projection(viewport);
        assert_ne!(before, after);
    }

    #[test]
    fn fov_zoom_divides_the_field_of_view() {
        let mut camera = ViewerCamera3d::new();
        let viewport = Vec2::new(800.0, 600.0);
        let wide = camera.projection(viewport);
        camera.set_fov_zoom(2.0);
        let narrow = camera.projection(viewport);
        // Halving the FOV angle increases the focal scale term.
        assert!(narrow.to_cols_array_2d()[1][1] > wide.to_cols_array_2d()[1][1]);
    }

    #[test]
    fn view_rotates_the_scene_about_the_fixed_axes() {
        let mut camera = ViewerCamera3d::new();
        camera.rotate(0.0, 90.0);
        let view = camera.view();
        // A 90° yaw sends +x toward the viewer (-z in view space).
        let x_axis = view * glamx::Vec4::new(1.0, 0.0, 0.0, 0.0);
        assert!(x_axis.z.abs() > 0.99);
    }
}

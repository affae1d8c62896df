//! The viewer facade the embedding UI talks to.

use std::path::Path;

use web_time::Instant;

use crate::camera::ViewerCamera3d;
use crate::color::grayscale;
use crate::event::{Key, Modifiers, MouseButton};
use crate::loader::{load_obj_file, ParseError};
use crate::mesh::{fill_stream, wireframe_streams, ViewerMesh};
use crate::renderer::{MeshRenderer, RenderContext, RenderState};
use crate::resource::MeshBuffers;
use crate::viewport::{ControlAction, ViewportController};

/// Model counts for the heads-up readout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshSummary {
    /// Number of vertex positions.
    pub vertex_count: usize,
    /// Number of distinct edges.
    pub edge_count: usize,
    /// Number of faces, all arities.
    pub face_count: usize,
}

/// State-change notifications delivered to subscribers.
///
/// The UI layer subscribes instead of being reached into: toggling the
/// wireframe with the keyboard, for example, must update the matching
/// checkbox wherever it lives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewerEvent {
    /// The wireframe overlay was switched on or off.
    WireframeToggled(bool),
    /// The heads-up readout was switched on or off.
    HudToggled(bool),
    /// A fresh frames-per-second measurement, at most one per second.
    FrameRateUpdated(f32),
}

type Subscriber = Box<dyn FnMut(&ViewerEvent)>;

/// Frame counter emitting a rate measurement at most once per second.
struct FrameRateCounter {
    frames: u32,
    window_start: Instant,
}

impl FrameRateCounter {
    fn new() -> FrameRateCounter {
        FrameRateCounter {
            frames: 0,
            window_start: Instant::now(),
        }
    }

    fn tick(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start).as_secs_f32();
        if elapsed < 1.0 {
            return None;
        }
        let rate = self.frames as f32 / elapsed;
        self.frames = 0;
        self.window_start = now;
        Some(rate)
    }
}

/// The viewer core: camera, current model, GPU buffers and render settings.
///
/// One instance lives for the whole session. All methods are called from the
/// single UI/render thread; loading is synchronous and transactional, and
/// mutators request a redraw rather than re-rendering on the spot.
pub struct Viewer {
    camera: ViewerCamera3d,
    controller: ViewportController,
    mesh: Option<ViewerMesh>,
    buffers: MeshBuffers,
    state: RenderState,
    hud_visible: bool,
    needs_redraw: bool,
    subscribers: Vec<Subscriber>,
    frame_rate: FrameRateCounter,
}

impl Default for Viewer {
    fn default() -> Self {
        Viewer::new()
    }
}

impl Viewer {
    /// Creates an empty viewer. Rendering before the first load clears the
    /// background and draws nothing.
    pub fn new() -> Viewer {
        Viewer {
            camera: ViewerCamera3d::new(),
            controller: ViewportController::new(),
            mesh: None,
            buffers: MeshBuffers::new(),
            state: RenderState::default(),
            hud_visible: true,
            needs_redraw: false,
            subscribers: Vec::new(),
            frame_rate: FrameRateCounter::new(),
        }
    }

    /// Loads a model, replacing the current one.
    ///
    /// The file is parsed and tessellated completely before anything is
    /// swapped in, and the camera is focused on the new model's bounds. On
    /// error the previously displayed model is untouched.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<MeshSummary, ParseError> {
        let path = path.as_ref();
        let mesh = load_obj_file(path)?;

        let fill = fill_stream(&mesh);
        let wireframe = wireframe_streams(&mesh);
        let summary = MeshSummary {
            vertex_count: mesh.vertex_count(),
            edge_count: mesh.edge_count(),
            face_count: mesh.face_count(),
        };

        self.buffers.upload(fill, wireframe);
        if let Some((min, max)) = mesh.bounding_box() {
            self.camera.focus(min, max);
        }
        self.mesh = Some(mesh);
        self.request_redraw();

        log::info!("loaded {}: {:?}", path.display(), summary);
        Ok(summary)
    }

    /// The currently loaded model, if any.
    #[inline]
    pub fn mesh(&self) -> Option<&ViewerMesh> {
        self.mesh.as_ref()
    }

    /// Counts of the currently loaded model for the heads-up readout.
    pub fn summary(&self) -> MeshSummary {
        match &self.mesh {
            Some(mesh) => MeshSummary {
                vertex_count: mesh.vertex_count(),
                edge_count: mesh.edge_count(),
                face_count: mesh.face_count(),
            },
            None => MeshSummary::default(),
        }
    }

    /// The camera.
    #[inline]
    pub fn camera(&self) -> &ViewerCamera3d {
        &self.camera
    }

    /// Mutable access to the camera, for embeddings with their own controls.
    #[inline]
    pub fn camera_mut(&mut self) -> &mut ViewerCamera3d {
        &mut self.camera
    }

    /// The current render settings.
    #[inline]
    pub fn render_state(&self) -> &RenderState {
        &self.state
    }

    /// Whether the heads-up readout is shown.
    #[inline]
    pub fn hud_visible(&self) -> bool {
        self.hud_visible
    }

    /// Registers a state-change subscriber.
    pub fn subscribe<F: FnMut(&ViewerEvent) + 'static>(&mut self, subscriber: F) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Consumes the pending redraw request, if any.
    ///
    /// The embedding loop polls this to schedule repaints; mutators never
    /// render synchronously.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::replace(&mut self.needs_redraw, false)
    }

    /// Sets the background to an opaque gray of the given shade in [0, 1].
    pub fn set_background_shade(&mut self, shade: f32) {
        self.state.background = grayscale(shade);
        self.request_redraw();
    }

    /// Sets the near clip plane distance. Invalid values are rejected.
    pub fn set_near_clip(&mut self, near: f32) {
        self.camera.set_near_clip(near);
        self.request_redraw();
    }

    /// Sets the far clip plane distance. Invalid values are rejected.
    pub fn set_far_clip(&mut self, far: f32) {
        self.camera.set_far_clip(far);
        self.request_redraw();
    }

    /// Switches the wireframe overlay on or off, notifying subscribers on a
    /// change.
    pub fn set_wireframe_enabled(&mut self, enabled: bool) {
        if self.state.wireframe_enabled != enabled {
            self.state.wireframe_enabled = enabled;
            self.emit(ViewerEvent::WireframeToggled(enabled));
        }
        self.request_redraw();
    }

    /// Sets the wireframe line thickness in pixels, clamped to at least 1.
    pub fn set_wireframe_thickness(&mut self, thickness: f32) {
        self.state.wireframe_thickness = thickness.max(1.0);
        self.request_redraw();
    }

    /// Applies a pointer drag delta from the embedding UI.
    pub fn on_pointer_drag(&mut self, dx: f32, dy: f32, button: MouseButton, modifier_active: bool) {
        let modifiers = if modifier_active {
            Modifiers::ALT
        } else {
            Modifiers::empty()
        };
        self.controller
            .handle_pointer_drag(&mut self.camera, dx, dy, button, modifiers);
        self.request_redraw();
    }

    /// Applies a wheel delta from the embedding UI.
    pub fn on_wheel(&mut self, delta: f32, modifier_active: bool) {
        let modifiers = if modifier_active {
            Modifiers::ALT
        } else {
            Modifiers::empty()
        };
        self.controller
            .handle_wheel(&mut self.camera, delta, modifiers);
        self.request_redraw();
    }

    /// Applies a key press from the embedding UI.
    pub fn on_key(&mut self, key: Key) {
        match self.controller.handle_key(&mut self.camera, key) {
            Some(ControlAction::FocusModel) => self.focus_model(),
            Some(ControlAction::ToggleWireframe) => {
                self.set_wireframe_enabled(!self.state.wireframe_enabled)
            }
            Some(ControlAction::ToggleHud) => {
                self.hud_visible = !self.hud_visible;
                let visible = self.hud_visible;
                self.emit(ViewerEvent::HudToggled(visible));
            }
            None => {}
        }
        self.request_redraw();
    }

    /// Recenters the camera on the loaded model. No-op without a model or
    /// with an empty one.
    pub fn focus_model(&mut self) {
        if let Some((min, max)) = self.mesh.as_ref().and_then(|m| m.bounding_box()) {
            self.camera.focus(min, max);
            self.request_redraw();
        }
    }

    /// Starts a repaint tick, returning the clear color for the render pass.
    pub fn begin_frame(&mut self, renderer: &mut MeshRenderer) -> wgpu::Color {
        renderer.begin_frame(&self.state)
    }

    /// Records this tick's draws into an open render pass and updates the
    /// frame-rate measurement, emitting it at most once per second.
    pub fn render_frame(
        &mut self,
        renderer: &mut MeshRenderer,
        render_pass: &mut wgpu::RenderPass<'_>,
        context: &RenderContext,
    ) {
        renderer.render(
            &mut self.camera,
            &mut self.buffers,
            &self.state,
            render_pass,
            context,
        );

        if let Some(rate) = self.frame_rate.tick(Instant::now()) {
            self.emit(ViewerEvent::FrameRateUpdated(rate));
        }
    }

    fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    fn emit(&mut self, event: ViewerEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use std::rc::Rc;

    struct TempObj(PathBuf);

    impl TempObj {
        fn new(name: &str, contents: &str) -> TempObj {
            let path = std::env::temp_dir().join(format!(
                "meshview_viewer_{}_{}.obj",
                std::process::id(),
                name
            ));
            fs::write(&path, contents).unwrap();
            TempObj(path)
        }
    }

    impl Drop for TempObj {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    const CUBE_QUADS: &str = "\
v -1 -1 -1
v 1 -1 -1
v 1 1 -1
v -1 1 -1
v -1 -1 1
v 1 -1 1
v 1 1 1
v -1 1 1
f 1 2 3 4
f 5 6 7 8
f 1 2 6 5
f 2 3 7 6
f 3 4 8 7
f 4 1 5 8
";

    #[test]
    fn load_reports_counts_and_focuses_the_camera() {
        let file = TempObj::new("cube", CUBE_QUADS);
        let mut viewer = Viewer::new();

        let summary = viewer.load(&file.0).unwrap();
        assert_eq!(summary.vertex_count, 8);
        assert_eq!(summary.edge_count, 12);
        assert_eq!(summary.face_count, 6);
        assert_eq!(viewer.summary(), summary);

        // Bounds (-1,-1,-1)..(1,1,1): recentered at the origin, backed off 3.
        assert_eq!(
            viewer.camera().position(),
            glamx::Vec3::new(0.0, 0.0, 3.0)
        );
        assert!(viewer.take_redraw_request());
    }

    #[test]
    fn failed_load_retains_the_previous_model() {
        let good = TempObj::new("good", CUBE_QUADS);
        let bad = TempObj::new("bad", "v 0 0 0\nv 1 0 0\nf 1 2\n");
        let mut viewer = Viewer::new();

        let summary = viewer.load(&good.0).unwrap();
        let _ = viewer.take_redraw_request();

        assert!(matches!(
            viewer.load(&bad.0),
            Err(ParseError::MalformedFaceLine { .. })
        ));
        assert_eq!(viewer.summary(), summary);
        assert!(viewer.mesh().is_some());
    }

    #[test]
    fn wireframe_toggle_notifies_subscribers_once_per_change() {
        let mut viewer = Viewer::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        viewer.subscribe(move |event| sink.borrow_mut().push(*event));

        viewer.set_wireframe_enabled(true);
        viewer.set_wireframe_enabled(true); // no change, no event
        viewer.on_key(Key::W); // toggles back off

        assert_eq!(
            *events.borrow(),
            vec![
                ViewerEvent::WireframeToggled(true),
                ViewerEvent::WireframeToggled(false),
            ]
        );
    }

    #[test]
    fn hud_toggle_round_trips() {
        let mut viewer = Viewer::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        viewer.subscribe(move |event| sink.borrow_mut().push(*event));

        assert!(viewer.hud_visible());
        viewer.on_key(Key::H);
        assert!(!viewer.hud_visible());
        viewer.on_key(Key::H);
        assert!(viewer.hud_visible());

        assert_eq!(
            *events.borrow(),
            vec![ViewerEvent::HudToggled(false), ViewerEvent::HudToggled(true)]
        );
    }

    #[test]
    fn wireframe_thickness_is_clamped_to_one() {
        let mut viewer = Viewer::new();
        viewer.set_wireframe_thickness(0.25);
        assert_eq!(viewer.render_state().wireframe_thickness, 1.0);
        viewer.set_wireframe_thickness(4.0);
        assert_eq!(viewer.render_state().wireframe_thickness, 4.0);
    }

    #[test]
    fn mutators_request_a_redraw_without_rendering() {
        let mut viewer = Viewer::new();
        assert!(!viewer.take_redraw_request());

        viewer.set_background_shade(0.25);
        assert!(viewer.take_redraw_request());
        assert!(!viewer.take_redraw_request());

        viewer.on_wheel(120.0, false);
        assert!(viewer.take_redraw_request());
    }

    #[test]
    fn focus_without_a_model_is_a_no_op() {
        let mut viewer = Viewer::new();
        let before = viewer.camera().position();
        viewer.on_key(Key::F);
        assert_eq!(viewer.camera().position(), before);
    }

    #[test]
    fn frame_rate_emits_at_most_once_per_second() {
        let mut counter = FrameRateCounter::new();
        let start = counter.window_start;

        for i in 1u64..=30 {
            let now = start + std::time::Duration::from_millis(i * 16);
            assert_eq!(counter.tick(now), None);
        }

        let rate = counter
            .tick(start + std::time::Duration::from_secs(1))
            .unwrap();
        assert!((rate - 31.0).abs() < 1.0);

        // The window restarts after an emission.
        let later = start + std::time::Duration::from_millis(1500);
        assert_eq!(counter.tick(later), None);
    }

    #[test]
    fn background_shade_is_grayscale() {
        let mut viewer = Viewer::new();
        viewer.set_background_shade(0.25);
        let bg = viewer.render_state().background;
        assert_eq!((bg.r, bg.g, bg.b, bg.a), (0.25, 0.25, 0.25, 1.0));
    }
}

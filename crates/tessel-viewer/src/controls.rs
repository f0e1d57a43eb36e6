//! Keyboard routing for the viewer.
//!
//! Most keys act on release so a press can still be abandoned; rotation and
//! texture-weight keys also act on auto-repeat.

use tessel_engine::input::{Key, KeyAction, Modifiers};
use tessel_engine::render::{GraphicsBackend, PolygonMode};
use tessel_engine::scene::Scene;

use crate::catalog::{AT, EYE, UP};

const ROTATE_STEP: f32 = 2.0; // degrees
const PAN_STEP: f32 = 0.2;
const ZOOM_STEP: f32 = 0.1;
const WEIGHT_STEP: f32 = 0.1;
const FOV_STEP: f32 = 5.0;
const FOV_MIN: f32 = 10.0;
const FOV_MAX: f32 = 170.0;
const ORTHO_STEP: f32 = 0.2;

/// What the viewer has to do after a key was routed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Continue,
    NextScene,
    PreviousScene,
    PolygonMode(PolygonMode),
    Quit,
}

/// Key router. Every adjustable value lives in the scene it affects, so
/// switching scenes never carries a value over.
#[derive(Debug, Clone, Default)]
pub struct Controls;

impl Controls {
    /// Applies one key event to `scene`.
    pub fn handle<B: GraphicsBackend>(
        &self,
        scene: &mut Scene<B>,
        key: Key,
        action: KeyAction,
        mods: Modifiers,
    ) -> Action {
        let released = action == KeyAction::Release;
        let held = matches!(action, KeyAction::Release | KeyAction::Repeat);
        let sign = if mods.shift { -1.0 } else { 1.0 };

        match key {
            // ── view ──
            Key::P if released => scene.use_perspective(!scene.uses_perspective()),
            Key::L if released && mods.shift => return Action::PolygonMode(PolygonMode::Line),
            Key::L if released => scene.pan_left(PAN_STEP),
            Key::R if released => scene.pan_right(PAN_STEP),
            Key::U if released => scene.pan_up(PAN_STEP),
            Key::D if released => scene.pan_down(PAN_STEP),
            Key::F if released => return Action::PolygonMode(PolygonMode::Fill),
            Key::I if released => scene.zoom_in(ZOOM_STEP),
            Key::O if released => scene.zoom_out(ZOOM_STEP),
            Key::Backspace if released => scene.set_look_at(EYE, AT, UP),
            Key::A if released => {
                if scene.uses_perspective() {
                    let p = scene.perspective();
                    let fovy = (p.fovy_degrees + sign * FOV_STEP).clamp(FOV_MIN, FOV_MAX);
                    scene.set_perspective(fovy, p.aspect, p.near, p.far);
                } else {
                    scene.zoom_ortho(ORTHO_STEP);
                }
            }

            // ── texture blend ──
            Key::C if held => {
                let weight = (scene.texture_weight() - sign * WEIGHT_STEP).clamp(0.0, 1.0);
                scene.set_texture_weight(weight);
                log::debug!("{}: texture weight {weight:.1}", scene.title());
            }

            // ── navigation ──
            Key::Period if released => return Action::NextScene,
            Key::Comma if released => return Action::PreviousScene,
            Key::Escape | Key::Q if released => return Action::Quit,

            // ── rotation ──
            Key::X if held => scene.rotate_x(sign * ROTATE_STEP),
            Key::ArrowUp if held => scene.rotate_x(-ROTATE_STEP),
            Key::ArrowDown if held => scene.rotate_x(ROTATE_STEP),
            Key::Y if held => scene.rotate_y(sign * ROTATE_STEP),
            Key::ArrowRight if held => scene.rotate_y(ROTATE_STEP),
            Key::ArrowLeft if held => scene.rotate_y(-ROTATE_STEP),
            Key::Z if held => scene.rotate_z(sign * ROTATE_STEP),

            _ => {}
        }

        Action::Continue
    }
}

/// Index of the scene after (or before) `current`, wrapping around.
pub fn step(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_engine::geometry::quad;
    use tessel_engine::render::HeadlessBackend;
    use tessel_engine::scene::Shape;

    const SHIFT: Modifiers = Modifiers { shift: true, ctrl: false, alt: false, meta: false };
    const NONE: Modifiers = Modifiers { shift: false, ctrl: false, alt: false, meta: false };

    fn scene(b: &mut HeadlessBackend) -> Scene<HeadlessBackend> {
        let mut s = Scene::new();
        s.add_shape(Shape::with_geometry(b, quad()).unwrap());
        s.set_look_at(EYE, AT, UP);
        s
    }

    // ── view ───────────────────────────────────────────────────────────────

    #[test]
    fn projection_toggles_on_release_only() {
        let mut b = HeadlessBackend::new();
        let mut s = scene(&mut b);
        let c = Controls;

        c.handle(&mut s, Key::P, KeyAction::Press, NONE);
        assert!(s.uses_perspective());
        c.handle(&mut s, Key::P, KeyAction::Release, NONE);
        assert!(!s.uses_perspective());
    }

    #[test]
    fn shift_l_selects_line_mode_and_l_pans() {
        let mut b = HeadlessBackend::new();
        let mut s = scene(&mut b);
        let c = Controls;

        assert_eq!(
            c.handle(&mut s, Key::L, KeyAction::Release, SHIFT),
            Action::PolygonMode(PolygonMode::Line)
        );
        assert_eq!(s.effective_look_at().at, AT);

        c.handle(&mut s, Key::L, KeyAction::Release, NONE);
        assert!((s.effective_look_at().at.x + PAN_STEP).abs() < 1e-6);
        assert_eq!(c.handle(&mut s, Key::F, KeyAction::Release, NONE), Action::PolygonMode(PolygonMode::Fill));
    }

    #[test]
    fn backspace_resets_pan_and_zoom() {
        let mut b = HeadlessBackend::new();
        let mut s = scene(&mut b);
        let c = Controls;

        c.handle(&mut s, Key::U, KeyAction::Release, NONE);
        c.handle(&mut s, Key::I, KeyAction::Release, NONE);
        assert_ne!(s.effective_look_at(), s.look_at());

        c.handle(&mut s, Key::Backspace, KeyAction::Release, NONE);
        assert_eq!(s.effective_look_at(), s.look_at());
    }

    #[test]
    fn fov_widens_narrows_and_clamps() {
        let mut b = HeadlessBackend::new();
        let mut s = scene(&mut b);
        s.set_perspective(80.0, 1.0, 0.1, 20.0);
        let c = Controls;

        c.handle(&mut s, Key::A, KeyAction::Release, NONE);
        assert_eq!(s.perspective().fovy_degrees, 85.0);
        c.handle(&mut s, Key::A, KeyAction::Release, SHIFT);
        c.handle(&mut s, Key::A, KeyAction::Release, SHIFT);
        assert_eq!(s.perspective().fovy_degrees, 75.0);

        for _ in 0..40 {
            c.handle(&mut s, Key::A, KeyAction::Release, NONE);
        }
        assert_eq!(s.perspective().fovy_degrees, FOV_MAX);
    }

    #[test]
    fn a_shrinks_ortho_window_in_parallel_mode() {
        let mut b = HeadlessBackend::new();
        let mut s = scene(&mut b);
        s.use_perspective(false);
        let c = Controls;

        c.handle(&mut s, Key::A, KeyAction::Release, NONE);
        assert!((s.ortho().left + 0.9).abs() < 1e-6);
    }

    // ── texture blend ──────────────────────────────────────────────────────

    #[test]
    fn c_lowers_and_shift_c_raises_weight() {
        let mut b = HeadlessBackend::new();
        let mut s = scene(&mut b);
        let c = Controls;

        c.handle(&mut s, Key::C, KeyAction::Release, NONE);
        c.handle(&mut s, Key::C, KeyAction::Repeat, NONE);
        assert!((s.shapes()[0].texture_weight() - 0.8).abs() < 1e-6);

        c.handle(&mut s, Key::C, KeyAction::Release, SHIFT);
        assert!((s.texture_weight() - 0.9).abs() < 1e-6);

        for _ in 0..20 {
            c.handle(&mut s, Key::C, KeyAction::Repeat, SHIFT);
        }
        assert_eq!(s.shapes()[0].texture_weight(), 1.0);
    }

    #[test]
    fn weight_steps_from_the_current_scene() {
        let mut b = HeadlessBackend::new();
        let mut first = scene(&mut b);
        let mut second = scene(&mut b);
        let c = Controls;

        for _ in 0..7 {
            c.handle(&mut first, Key::C, KeyAction::Repeat, NONE);
        }
        assert!((first.texture_weight() - 0.3).abs() < 1e-5);

        c.handle(&mut second, Key::C, KeyAction::Release, NONE);
        assert!((second.texture_weight() - 0.9).abs() < 1e-6);
        assert!((first.texture_weight() - 0.3).abs() < 1e-5);
    }

    // ── rotation ───────────────────────────────────────────────────────────

    #[test]
    fn rotation_keys_step_two_degrees() {
        let mut b = HeadlessBackend::new();
        let mut s = scene(&mut b);
        let c = Controls;

        c.handle(&mut s, Key::X, KeyAction::Repeat, NONE);
        c.handle(&mut s, Key::Y, KeyAction::Release, SHIFT);
        c.handle(&mut s, Key::ArrowRight, KeyAction::Repeat, NONE);
        c.handle(&mut s, Key::ArrowRight, KeyAction::Repeat, NONE);
        c.handle(&mut s, Key::Z, KeyAction::Press, NONE);

        let r = s.rotation();
        assert!((r.x - 2f32.to_radians()).abs() < 1e-6);
        assert!((r.y - 2f32.to_radians()).abs() < 1e-6);
        assert_eq!(r.z, 0.0);
    }

    // ── navigation ─────────────────────────────────────────────────────────

    #[test]
    fn scene_keys_and_quit() {
        let mut b = HeadlessBackend::new();
        let mut s = scene(&mut b);
        let c = Controls;

        assert_eq!(c.handle(&mut s, Key::Period, KeyAction::Release, NONE), Action::NextScene);
        assert_eq!(c.handle(&mut s, Key::Comma, KeyAction::Release, NONE), Action::PreviousScene);
        assert_eq!(c.handle(&mut s, Key::Q, KeyAction::Release, NONE), Action::Quit);
        assert_eq!(c.handle(&mut s, Key::Escape, KeyAction::Press, NONE), Action::Continue);
    }

    #[test]
    fn step_wraps_both_ways() {
        assert_eq!(step(12, 13, true), 0);
        assert_eq!(step(0, 13, false), 12);
        assert_eq!(step(4, 13, true), 5);
        assert_eq!(step(0, 0, true), 0);
    }
}

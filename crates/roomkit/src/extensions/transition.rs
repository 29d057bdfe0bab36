// extensions/transition.rs
//
// Room-transition animations. A transition owns a screenshot of the outgoing
// frame and erases or blends it a little further every step, revealing the
// room underneath; the host draws the returned overlay above the scene.

use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};

use crate::extensions::rng::Rng;
use crate::raster::pixmap::{Pixmap, Rgba8};

/// Grid cell size for the matrix wipe, in pixels.
const MATRIX_CELL: f32 = 4.0;

/// The visual strategy a transition uses to reveal the next room.
///
/// `Unknown` is the degradation target for kinds read from data that this
/// version does not recognize: the transition still runs and completes on
/// schedule, but draws the screenshot unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Fade to black, then fade in.
    #[default]
    Fade,
    /// Gradually replace the first room with the second.
    Dissolve,
    /// Pixelate the first room, then fade into the second.
    Pixelate,
    /// Wipe from the left edge rightward.
    WipeLeft,
    /// Wipe from the right edge leftward.
    WipeRight,
    /// Wipe from the top edge downward.
    WipeTop,
    /// Wipe from the bottom edge upward.
    WipeBottom,
    /// Diagonal wipe anchored at the top-left corner.
    WipeTopLeft,
    /// Diagonal wipe anchored at the top-right corner.
    WipeTopRight,
    /// Diagonal wipe anchored at the bottom-left corner.
    WipeBottomLeft,
    /// Diagonal wipe anchored at the bottom-right corner.
    WipeBottomRight,
    /// Erase random grid cells until none remain.
    WipeMatrix,
    /// Iris in: erase outside a shrinking centered circle.
    IrisIn,
    /// Iris out: erase a growing centered circle.
    IrisOut,
    /// No-op strategy; draws the screenshot unchanged.
    Unknown,
}

impl TransitionKind {
    /// Parse a kind from its snake_case name. Names not in the table map to
    /// [`TransitionKind::Unknown`], which draws nothing.
    pub fn from_name(name: &str) -> Self {
        match name {
            "fade" => Self::Fade,
            "dissolve" => Self::Dissolve,
            "pixelate" => Self::Pixelate,
            "wipe_left" => Self::WipeLeft,
            "wipe_right" => Self::WipeRight,
            "wipe_top" => Self::WipeTop,
            "wipe_bottom" => Self::WipeBottom,
            "wipe_top_left" => Self::WipeTopLeft,
            "wipe_top_right" => Self::WipeTopRight,
            "wipe_bottom_left" => Self::WipeBottomLeft,
            "wipe_bottom_right" => Self::WipeBottomRight,
            "wipe_matrix" => Self::WipeMatrix,
            "iris_in" => Self::IrisIn,
            "iris_out" => Self::IrisOut,
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for TransitionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(TransitionKind::from_name(&name))
    }
}

/// Per-room transition state.
///
/// Inactive most of the time; [`Transition::show`] arms it with a strategy,
/// an owned screenshot, and a duration, and [`Transition::tick`] drives it
/// until the duration elapses. Re-arming while active overwrites the running
/// transition and drops its screenshot.
#[derive(Debug)]
pub struct Transition {
    active: Option<ActiveTransition>,
    seed: u64,
}

impl Default for Transition {
    fn default() -> Self {
        Self::new()
    }
}

impl Transition {
    pub fn new() -> Self {
        Self {
            active: None,
            seed: 0x9E37_79B9_7F4A_7C15,
        }
    }

    /// Fix the random seed used by the matrix wipe's cell order.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Arm a transition: take ownership of the outgoing frame and reset all
    /// progress state. Overwrites any transition already running.
    pub fn show(&mut self, kind: TransitionKind, image: Pixmap, duration_ms: f32) {
        if kind == TransitionKind::Unknown {
            warn!("unrecognized transition kind; running as a no-op");
        }
        debug!("transition {:?} armed for {} ms", kind, duration_ms);
        self.active = Some(ActiveTransition {
            kind,
            image,
            duration_ms,
            elapsed_ms: 0.0,
            last_progress: 0.0,
            matrix_remaining: None,
            rng: Rng::new(self.seed),
        });
    }

    /// Whether a transition is currently running.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The kind of the running transition, if any.
    pub fn kind(&self) -> Option<TransitionKind> {
        self.active.as_ref().map(|t| t.kind)
    }

    /// Advance the transition by `delta_ms` and return the overlay to draw
    /// this frame, already mutated for the current progress.
    ///
    /// Returns None when inactive and on the terminal frame: once the elapsed
    /// time reaches the duration the screenshot is dropped, the state resets,
    /// and nothing is drawn. A non-positive duration therefore completes on
    /// the first tick without drawing at all.
    pub fn tick(&mut self, delta_ms: f32) -> Option<&Pixmap> {
        let finished = if let Some(t) = self.active.as_mut() {
            t.elapsed_ms += delta_ms;
            if t.elapsed_ms < t.duration_ms {
                let progress = t.elapsed_ms / t.duration_ms;
                t.apply(progress);
                t.last_progress = progress;
                false
            } else {
                true
            }
        } else {
            return None;
        };
        if finished {
            debug!("transition complete");
            self.active = None;
            None
        } else {
            self.active.as_ref().map(|t| &t.image)
        }
    }
}

#[derive(Debug)]
struct ActiveTransition {
    kind: TransitionKind,
    image: Pixmap,
    duration_ms: f32,
    elapsed_ms: f32,
    last_progress: f32,
    /// Matrix wipe only: grid cells not yet erased, built on first use.
    matrix_remaining: Option<Vec<(u32, u32)>>,
    rng: Rng,
}

/// Amount to subtract this frame so the cumulative subtraction telescopes to
/// exactly 255 over any partition of [0, 1].
fn alpha_step(last: f32, now: f32) -> u8 {
    let scaled = |p: f32| (p.clamp(0.0, 1.0) * 255.0).round() as i32;
    (scaled(now) - scaled(last)).clamp(0, 255) as u8
}

impl ActiveTransition {
    fn apply(&mut self, progress: f32) {
        match self.kind {
            TransitionKind::Fade => self.fade(progress),
            TransitionKind::Dissolve => self.dissolve(progress),
            TransitionKind::Pixelate => self.pixelate(progress),
            TransitionKind::WipeLeft => self.wipe_left(progress),
            TransitionKind::WipeRight => self.wipe_right(progress),
            TransitionKind::WipeTop => self.wipe_top(progress),
            TransitionKind::WipeBottom => self.wipe_bottom(progress),
            TransitionKind::WipeTopLeft => self.wipe_top_left(progress),
            TransitionKind::WipeTopRight => self.wipe_top_right(progress),
            TransitionKind::WipeBottomLeft => self.wipe_bottom_left(progress),
            TransitionKind::WipeBottomRight => self.wipe_bottom_right(progress),
            TransitionKind::WipeMatrix => self.wipe_matrix(progress),
            TransitionKind::IrisIn => self.iris_in(progress),
            TransitionKind::IrisOut => self.iris_out(progress),
            TransitionKind::Unknown => {}
        }
    }

    fn size(&self) -> (f32, f32) {
        (self.image.width() as f32, self.image.height() as f32)
    }

    fn fade(&mut self, progress: f32) {
        let (w, h) = (self.image.width(), self.image.height());
        if progress < 0.5 {
            let cut = alpha_step(self.last_progress * 2.0, progress * 2.0);
            if cut > 0 {
                let darkener = Pixmap::filled(w, h, Rgba8::new(cut, cut, cut, 255));
                self.image.subtract_rgb(&darkener);
            }
        } else {
            let q = (progress - 0.5) * 2.0;
            let alpha = 255 - (q.clamp(0.0, 1.0) * 255.0).round() as i32;
            self.image.fill(Rgba8::new(0, 0, 0, alpha.clamp(0, 255) as u8));
        }
    }

    fn dissolve(&mut self, progress: f32) {
        let (w, h) = (self.image.width(), self.image.height());
        let cut = alpha_step(self.last_progress, progress);
        if cut > 0 {
            let eraser = Pixmap::filled(w, h, Rgba8::new(0, 0, 0, cut));
            self.image.subtract_rgba(&eraser);
        }
    }

    fn pixelate(&mut self, progress: f32) {
        let (w, h) = (self.image.width(), self.image.height());
        if progress < 0.5 {
            let scale = 1.0 - progress * 2.0;
            let sw = ((w as f32 * scale).round().max(1.0)) as u32;
            let sh = ((h as f32 * scale).round().max(1.0)) as u32;
            let small = self.image.resampled(sw, sh);
            self.image = small.resampled(w, h);
        } else {
            let cut = alpha_step(
                (self.last_progress - 0.5).max(0.0) * 2.0,
                (progress - 0.5) * 2.0,
            );
            if cut > 0 {
                let eraser = Pixmap::filled(w, h, Rgba8::new(0, 0, 0, cut));
                self.image.subtract_rgba(&eraser);
            }
        }
    }

    fn wipe_left(&mut self, progress: f32) {
        let (w, h) = self.size();
        self.image.erase_rect(0.0, 0.0, w * progress, h);
    }

    fn wipe_right(&mut self, progress: f32) {
        let (w, h) = self.size();
        let ww = w * progress;
        self.image.erase_rect(w - ww, 0.0, ww, h);
    }

    fn wipe_top(&mut self, progress: f32) {
        let (w, h) = self.size();
        self.image.erase_rect(0.0, 0.0, w, h * progress);
    }

    fn wipe_bottom(&mut self, progress: f32) {
        let (w, h) = self.size();
        let hh = h * progress;
        self.image.erase_rect(0.0, h - hh, w, hh);
    }

    // The diagonal wipes grow both triangle legs at twice the progress rate:
    // the anchored half of the screen is gone by progress 0.5 and the
    // hypotenuse sweeps the far corner exactly at progress 1.

    fn wipe_top_left(&mut self, progress: f32) {
        let (w, h) = self.size();
        let x = w * progress * 2.0;
        let y = h * progress * 2.0;
        self.erase_triangle((0.0, 0.0), (x, 0.0), (0.0, y));
    }

    fn wipe_top_right(&mut self, progress: f32) {
        let (w, h) = self.size();
        let x = w - w * progress * 2.0;
        let y = h * progress * 2.0;
        self.erase_triangle((w, 0.0), (x, 0.0), (w, y));
    }

    fn wipe_bottom_left(&mut self, progress: f32) {
        let (w, h) = self.size();
        let x = w * progress * 2.0;
        let y = h - h * progress * 2.0;
        self.erase_triangle((0.0, h), (x, h), (0.0, y));
    }

    fn wipe_bottom_right(&mut self, progress: f32) {
        let (w, h) = self.size();
        let x = w - w * progress * 2.0;
        let y = h - h * progress * 2.0;
        self.erase_triangle((w, h), (x, h), (w, y));
    }

    fn erase_triangle(&mut self, a: (f32, f32), b: (f32, f32), c: (f32, f32)) {
        let (w, h) = (self.image.width(), self.image.height());
        let mut eraser = Pixmap::new(w, h);
        eraser.fill_triangle(a.into(), b.into(), c.into(), Rgba8::BLACK);
        self.image.subtract_rgba(&eraser);
    }

    fn wipe_matrix(&mut self, progress: f32) {
        let (w, h) = self.size();
        let mw = (w / MATRIX_CELL).round() as u32;
        let mh = (h / MATRIX_CELL).round() as u32;
        let total = (mw * mh) as usize;
        let remaining = self.matrix_remaining.get_or_insert_with(|| {
            let mut cells = Vec::with_capacity(total);
            for x in 0..mw {
                for y in 0..mh {
                    cells.push((x, y));
                }
            }
            cells
        });

        // Erase up to the cumulative target so a full run hits every cell
        // exactly once, whatever the step granularity.
        let target = (total as f32 * progress.clamp(0.0, 1.0)).round() as usize;
        let erased = total - remaining.len();
        let mut need = target.saturating_sub(erased);
        while need > 0 {
            match self.rng.pop_random(remaining) {
                Some((x, y)) => {
                    self.image.erase_rect(
                        x as f32 * MATRIX_CELL,
                        y as f32 * MATRIX_CELL,
                        MATRIX_CELL,
                        MATRIX_CELL,
                    );
                    need -= 1;
                }
                None => break,
            }
        }
    }

    fn iris_in(&mut self, progress: f32) {
        let (w, h) = self.size();
        let (cx, cy) = (w / 2.0, h / 2.0);
        let r = cx.hypot(cy) * (1.0 - progress);
        let mut eraser = Pixmap::filled(self.image.width(), self.image.height(), Rgba8::BLACK);
        let mut keep = Pixmap::new(self.image.width(), self.image.height());
        keep.fill_circle(cx, cy, r, Rgba8::BLACK);
        eraser.subtract_rgba(&keep);
        self.image.subtract_rgba(&eraser);
    }

    fn iris_out(&mut self, progress: f32) {
        let (w, h) = self.size();
        let (cx, cy) = (w / 2.0, h / 2.0);
        let r = cx.hypot(cy) * progress;
        let mut eraser = Pixmap::new(self.image.width(), self.image.height());
        eraser.fill_circle(cx, cy, r, Rgba8::BLACK);
        self.image.subtract_rgba(&eraser);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAY: Rgba8 = Rgba8::new(128, 128, 128, 255);

    fn shot(w: u32, h: u32) -> Pixmap {
        Pixmap::filled(w, h, GRAY)
    }

    /// Drive a strategy directly through a progress schedule, the way tick
    /// would, including the final value.
    fn drive(kind: TransitionKind, image: Pixmap, schedule: &[f32]) -> Pixmap {
        let mut t = ActiveTransition {
            kind,
            image,
            duration_ms: 1000.0,
            elapsed_ms: 0.0,
            last_progress: 0.0,
            matrix_remaining: None,
            rng: Rng::new(42),
        };
        for &p in schedule {
            t.apply(p);
            t.last_progress = p;
        }
        t.image
    }

    #[test]
    fn runs_then_completes_silently() {
        let mut tr = Transition::new();
        tr.show(TransitionKind::Dissolve, shot(8, 8), 100.0);
        assert!(tr.is_active());
        assert!(tr.tick(40.0).is_some());
        assert!(tr.tick(40.0).is_some());
        // Crossing the duration draws nothing and releases the image.
        assert!(tr.tick(40.0).is_none());
        assert!(!tr.is_active());
        // Further ticks are inert.
        assert!(tr.tick(40.0).is_none());
    }

    #[test]
    fn zero_duration_is_a_no_op_with_cleanup() {
        let mut tr = Transition::new();
        tr.show(TransitionKind::Fade, shot(8, 8), 0.0);
        assert!(tr.is_active());
        assert!(tr.tick(16.0).is_none());
        assert!(!tr.is_active());
    }

    #[test]
    fn show_overwrites_running_transition() {
        let mut tr = Transition::new();
        tr.show(TransitionKind::Fade, shot(8, 8), 1000.0);
        tr.tick(100.0);
        tr.show(TransitionKind::IrisOut, shot(8, 8), 1000.0);
        assert_eq!(tr.kind(), Some(TransitionKind::IrisOut));
        // Progress restarted: first tick after re-arm is early in the ramp.
        assert!(tr.tick(10.0).is_some());
    }

    #[test]
    fn unknown_kind_draws_unchanged_and_completes() {
        let mut tr = Transition::new();
        let original = shot(8, 8);
        tr.show(TransitionKind::Unknown, original.clone(), 100.0);
        let drawn = tr.tick(50.0).expect("still active");
        assert_eq!(drawn.alpha_total(), original.alpha_total());
        assert!(tr.tick(60.0).is_none());
        assert!(!tr.is_active());
    }

    #[test]
    fn fade_is_black_and_opaque_at_half() {
        let img = drive(TransitionKind::Fade, shot(4, 4), &[0.1, 0.3, 0.5]);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(img.get(x, y), Some(Rgba8::BLACK));
            }
        }
    }

    #[test]
    fn fade_is_transparent_at_end() {
        let img = drive(TransitionKind::Fade, shot(4, 4), &[0.2, 0.6, 1.0]);
        assert_eq!(img.alpha_total(), 0);
    }

    #[test]
    fn dissolve_removal_is_exact_for_any_granularity() {
        let coarse = drive(TransitionKind::Dissolve, shot(4, 4), &[0.5, 1.0]);
        assert_eq!(coarse.alpha_total(), 0);

        // 250 tiny uneven steps must still finish fully transparent.
        let schedule: Vec<f32> = (1..=250).map(|i| i as f32 / 250.0).collect();
        let fine = drive(TransitionKind::Dissolve, shot(4, 4), &schedule);
        assert_eq!(fine.alpha_total(), 0);
    }

    #[test]
    fn dissolve_is_uniform_midway() {
        let img = drive(TransitionKind::Dissolve, shot(4, 4), &[0.25, 0.5]);
        let expected: u8 = 255 - 128; // round(0.5 * 255) subtracted
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(img.get(x, y).map(|p| p.a), Some(expected));
            }
        }
    }

    #[test]
    fn pixelate_blockifies_then_dissolves() {
        // Half gray, half transparent source so resampling is observable.
        let mut src = Pixmap::new(8, 8);
        src.fill_rect(0.0, 0.0, 4.0, 8.0, GRAY);
        let mid = drive(TransitionKind::Pixelate, src.clone(), &[0.25]);
        assert_eq!(mid.width(), 8);
        let done = drive(TransitionKind::Pixelate, src, &[0.25, 0.75, 1.0]);
        assert_eq!(done.alpha_total(), 0);
    }

    #[test]
    fn wipe_left_erases_leading_edge_only() {
        let img = drive(TransitionKind::WipeLeft, shot(8, 4), &[0.25]);
        assert_eq!(img.get(0, 0).map(|p| p.a), Some(0));
        assert_eq!(img.get(1, 0).map(|p| p.a), Some(0));
        assert_eq!(img.get(2, 0).map(|p| p.a), Some(255));
    }

    #[test]
    fn wipe_bottom_erases_from_the_bottom() {
        let img = drive(TransitionKind::WipeBottom, shot(4, 8), &[0.5]);
        assert_eq!(img.get(0, 7).map(|p| p.a), Some(0));
        assert_eq!(img.get(0, 0).map(|p| p.a), Some(255));
    }

    #[test]
    fn straight_wipes_finish_clean() {
        for kind in [
            TransitionKind::WipeLeft,
            TransitionKind::WipeRight,
            TransitionKind::WipeTop,
            TransitionKind::WipeBottom,
        ] {
            let img = drive(kind, shot(8, 8), &[0.3, 0.7, 1.0]);
            assert_eq!(img.alpha_total(), 0, "{kind:?}");
        }
    }

    #[test]
    fn diagonal_wipe_halfway_covers_near_half() {
        let img = drive(TransitionKind::WipeTopLeft, shot(16, 16), &[0.5]);
        // Near the anchored corner: erased.
        assert_eq!(img.get(1, 1).map(|p| p.a), Some(0));
        // Far corner: still intact at half progress.
        assert_eq!(img.get(14, 14).map(|p| p.a), Some(255));
    }

    #[test]
    fn diagonal_wipes_finish_clean() {
        for kind in [
            TransitionKind::WipeTopLeft,
            TransitionKind::WipeTopRight,
            TransitionKind::WipeBottomLeft,
            TransitionKind::WipeBottomRight,
        ] {
            let img = drive(kind, shot(16, 16), &[0.4, 0.8, 1.0]);
            assert_eq!(img.alpha_total(), 0, "{kind:?}");
        }
    }

    #[test]
    fn matrix_erases_every_cell_exactly_once() {
        for steps in [1usize, 3, 7, 48, 100] {
            let schedule: Vec<f32> = (1..=steps).map(|i| i as f32 / steps as f32).collect();
            let img = drive(TransitionKind::WipeMatrix, shot(32, 24), &schedule);
            assert_eq!(img.alpha_total(), 0, "steps={steps}");
        }
    }

    #[test]
    fn matrix_progress_tracks_cell_count() {
        // 32x24 at 4px cells: 8x6 = 48 cells. At progress 0.5, 24 cells
        // (one half of the area) must be erased.
        let img = drive(TransitionKind::WipeMatrix, shot(32, 24), &[0.5]);
        let opaque_cells = (0..6)
            .flat_map(|cy| (0..8).map(move |cx| (cx, cy)))
            .filter(|&(cx, cy)| img.get(cx * 4, cy * 4).map(|p| p.a) == Some(255))
            .count();
        assert_eq!(opaque_cells, 24);
    }

    #[test]
    fn matrix_order_is_reproducible_under_a_fixed_seed() {
        let run = || {
            let mut tr = Transition::new();
            tr.set_seed(7);
            tr.show(TransitionKind::WipeMatrix, shot(32, 24), 1000.0);
            tr.tick(500.0).cloned()
        };
        let a = run().expect("still active at half duration");
        let b = run().expect("still active at half duration");
        // Same seed, same cell order: the half-erased patterns match pixel
        // for pixel.
        assert!(a.alpha_total() > 0);
        assert_eq!(a, b);
    }

    #[test]
    fn iris_in_and_out_are_complementary() {
        for p in [0.2f32, 0.5, 0.8] {
            let a = drive(TransitionKind::IrisIn, shot(24, 16), &[p]);
            let b = drive(TransitionKind::IrisOut, shot(24, 16), &[1.0 - p]);
            for y in 0..16 {
                for x in 0..24 {
                    let sum =
                        a.get(x, y).map(|q| q.a as i32).unwrap() + b.get(x, y).map(|q| q.a as i32).unwrap();
                    assert!((sum - 255).abs() <= 1, "p={p} at ({x},{y}): {sum}");
                }
            }
        }
    }

    #[test]
    fn iris_out_keeps_corners_longest() {
        let img = drive(TransitionKind::IrisOut, shot(24, 24), &[0.5]);
        assert_eq!(img.get(12, 12).map(|p| p.a), Some(0));
        assert_eq!(img.get(0, 0).map(|p| p.a), Some(255));
    }

    #[test]
    fn kind_parses_from_data_with_unknown_fallback() {
        assert_eq!(
            serde_json::from_str::<TransitionKind>("\"fade\"").unwrap(),
            TransitionKind::Fade
        );
        assert_eq!(
            serde_json::from_str::<TransitionKind>("\"wipe_top_left\"").unwrap(),
            TransitionKind::WipeTopLeft
        );
        assert_eq!(
            serde_json::from_str::<TransitionKind>("\"warp_spiral\"").unwrap(),
            TransitionKind::Unknown
        );
        assert_eq!(
            serde_json::to_string(&TransitionKind::IrisIn).unwrap(),
            "\"iris_in\""
        );
    }
}

// patrol/main.rs
//
// Headless demonstration of the two roomkit engines: a guard and a cart
// patrol a rectangular path while the director swaps rooms behind a matrix
// wipe. State is logged instead of rendered.

use glam::Vec2;
use log::info;
use roomkit::{
    motion, Director, FrameSource, Object, Path, Pixmap, Repeat, Rgba8, Room, Scene, StepClock,
    TransitionKind, DEFAULT_TRANSITION_MS,
};

struct Courtyard;

impl Room for Courtyard {
    fn on_start(&mut self) {
        info!("courtyard: start");
    }
    fn on_end(&mut self) {
        info!("courtyard: end");
    }
}

struct Hall;

impl Room for Hall {
    fn on_start(&mut self) {
        info!("hall: start");
    }
}

/// Stands in for the host engine's screenshot capture: a gradient frame.
struct FakeScreen;

impl FrameSource for FakeScreen {
    fn screenshot(&mut self) -> Pixmap {
        let (w, h) = (160u32, 120u32);
        let mut shot = Pixmap::new(w, h);
        for y in 0..h {
            for x in 0..w {
                shot.set(
                    x,
                    y,
                    Rgba8::new((x * 255 / w) as u8, (y * 255 / h) as u8, 96, 255),
                );
            }
        }
        shot
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut scene = Scene::new();
    let guard = scene.alloc_id();
    scene.spawn(Object::new(guard).with_tag("guard").with_pos(Vec2::new(20.0, 20.0)));
    let cart = scene.alloc_id();
    scene.spawn(Object::new(cart).with_tag("cart").with_pos(Vec2::new(20.0, 60.0)));

    let mut patrol = Path::new(vec![
        Vec2::new(120.0, 0.0),
        Vec2::new(120.0, 80.0),
        Vec2::new(0.0, 80.0),
        Vec2::new(0.0, 0.0),
    ]);
    if let Some(obj) = scene.get(guard) {
        patrol.follow_start(obj, 4.0, None, None, Repeat::Forever);
    }
    if let Some(obj) = scene.get(cart) {
        patrol.follow_start(obj, 6.0, Some(0.25), Some(0.25), Repeat::Times(1));
    }

    let mut director = Director::new();
    director.push(Box::new(Courtyard));
    director.push(Box::new(Hall));
    director.start(0);

    let mut frames = FakeScreen;
    let clock = StepClock::new(60.0);
    let step = clock.step();

    for n in 0..600u32 {
        patrol.tick(step.delta_mult, &mut scene);
        motion::step(&mut scene, step.delta_mult);
        for id in patrol.drain_finished() {
            info!("step {n}: {:?} finished its patrol", id);
        }

        if n == 300 {
            director.transition_end(
                &mut frames,
                TransitionKind::WipeMatrix,
                DEFAULT_TRANSITION_MS,
                None,
                true,
            );
        }

        if let Some(overlay) = director.step(&step) {
            if n % 30 == 0 {
                info!("step {n}: transition overlay alpha {}", overlay.alpha_total());
            }
        }

        if n % 120 == 0 {
            if let Some(g) = scene.find_by_tag("guard") {
                info!("step {n}: guard at ({:.1}, {:.1})", g.pos.x, g.pos.y);
            }
        }
    }

    info!("done; guard still patrolling: {}", patrol.is_following(guard));
}

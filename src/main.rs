//! Abyss Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent};

    use abyss_runner::consts::BUBBLE_COUNT;
    use abyss_runner::platform::KeyState;
    use abyss_runner::sim::{
        Entity, EntityId, EntityKind, GameEvent, GameSession, ROCK_BOX_RATIO, autopilot_input,
    };
    use abyss_runner::{
        CameraRig, HudView, SceneHost, StartupError, Tuning, step_session, sync_scene,
    };

    /// Simulation rate; one tick per frame on a 60 Hz display
    const SIM_DT: f64 = 1.0 / 60.0;
    /// Maximum ticks per frame to prevent spiral of death
    const MAX_SUBSTEPS: u32 = 4;

    // Thin bridge onto a three.js scene loaded by the page
    #[wasm_bindgen(inline_js = "
        let scene, camera, renderer, sub, meshes, bubbles, debris;

        export function three_available() {
            return typeof THREE !== 'undefined';
        }

        export function scene_init() {
            scene = new THREE.Scene();
            scene.background = new THREE.Color(0x001b2e);
            scene.fog = new THREE.FogExp2(0x003322, 0.005);
            camera = new THREE.PerspectiveCamera(75, window.innerWidth / window.innerHeight, 0.1, 1000);
            renderer = new THREE.WebGLRenderer({ antialias: true });
            renderer.setSize(window.innerWidth, window.innerHeight);
            document.getElementById('game-container').appendChild(renderer.domElement);
            window.addEventListener('resize', () => {
                camera.aspect = window.innerWidth / window.innerHeight;
                camera.updateProjectionMatrix();
                renderer.setSize(window.innerWidth, window.innerHeight);
            });

            scene.add(new THREE.AmbientLight(0x006644, 3.0));
            const sun = new THREE.DirectionalLight(0xaabbff, 8.2);
            sun.position.set(50, 200, 100);
            scene.add(sun);

            const hull = new THREE.MeshPhongMaterial({ color: 0x3a4245, emissive: 0x111111 });
            sub = new THREE.Group();
            const body = new THREE.Mesh(new THREE.CylinderGeometry(2, 1.2, 16, 24), hull);
            body.rotation.x = Math.PI / 2;
            sub.add(body);
            const tower = new THREE.Mesh(new THREE.CylinderGeometry(1.5, 1.8, 2.5, 16), hull);
            tower.position.set(0, 2.5, 0);
            sub.add(tower);
            const lamp = new THREE.PointLight(0xffff99, 20.0, 100);
            lamp.position.set(0, 0, -5);
            sub.add(lamp);
            scene.add(sub);

            meshes = new Map();
            const bubbleMat = new THREE.MeshBasicMaterial({ color: 0xaaddff, transparent: true, opacity: 0.5 });
            bubbles = [];
            for (let i = 0; i < 100; i++) {
                const b = new THREE.Mesh(new THREE.SphereGeometry(1, 8, 8), bubbleMat);
                bubbles.push(b);
                scene.add(b);
            }
            debris = [];
        }

        export function scene_add(id, kind, x, y, z, hx, hy, hz, rx, ry, rz, shade) {
            const color = new THREE.Color(shade, shade * 0.6, shade * 0.3);
            const mat = new THREE.MeshStandardMaterial({ color, roughness: 0.9, metalness: 0.1, flatShading: true });
            const geo = kind === 2
                ? new THREE.DodecahedronGeometry(hx, 0)
                : new THREE.BoxGeometry(hx * 2, hy * 2, hz * 2);
            const mesh = new THREE.Mesh(geo, mat);
            mesh.position.set(x, y, z);
            mesh.rotation.set(rx, ry, rz);
            scene.add(mesh);
            meshes.set(id, mesh);
        }

        export function scene_remove(id) {
            const mesh = meshes.get(id);
            if (mesh) {
                scene.remove(mesh);
                mesh.geometry.dispose();
                mesh.material.dispose();
                meshes.delete(id);
            }
        }

        export function scene_render(pose, visible, cam, bubbleData, debrisData) {
            sub.position.set(pose[0], pose[1], pose[2]);
            sub.rotation.set(pose[3], pose[4], pose[5]);
            sub.visible = visible;

            for (let i = 0; i < bubbles.length; i++) {
                const o = i * 4;
                if (o + 3 >= bubbleData.length) { bubbles[i].visible = false; continue; }
                bubbles[i].visible = true;
                bubbles[i].position.set(bubbleData[o], bubbleData[o + 1], bubbleData[o + 2]);
                bubbles[i].scale.setScalar(bubbleData[o + 3]);
            }

            const count = debrisData.length / 5;
            while (debris.length < count) {
                const m = new THREE.Mesh(
                    new THREE.SphereGeometry(0.5, 4, 4),
                    new THREE.MeshBasicMaterial({ color: 0xff8800, transparent: true, opacity: 0.8 }));
                scene.add(m);
                debris.push(m);
            }
            for (let i = 0; i < debris.length; i++) {
                const m = debris[i];
                if (i >= count) { m.visible = false; continue; }
                const o = i * 5;
                m.visible = true;
                m.position.set(debrisData[o], debrisData[o + 1], debrisData[o + 2]);
                m.scale.setScalar(debrisData[o + 3]);
                m.material.opacity = debrisData[o + 4];
            }

            camera.position.set(cam[0], cam[1], cam[2]);
            camera.lookAt(cam[3], cam[4], cam[5]);
            renderer.render(scene, camera);
        }
    ")]
    extern "C" {
        fn three_available() -> bool;
        fn scene_init();
        #[allow(clippy::too_many_arguments)]
        fn scene_add(
            id: u32,
            kind: u32,
            x: f32,
            y: f32,
            z: f32,
            hx: f32,
            hy: f32,
            hz: f32,
            rx: f32,
            ry: f32,
            rz: f32,
            shade: f32,
        );
        fn scene_remove(id: u32);
        fn scene_render(pose: &[f32], visible: bool, cam: &[f32], bubbles: &[f32], debris: &[f32]);
    }

    /// `SceneHost` backed by the three.js bridge and the page's HUD elements
    struct ThreeScene {
        document: Document,
        bubble_buf: Vec<f32>,
        debris_buf: Vec<f32>,
    }

    impl ThreeScene {
        fn new(document: Document) -> Result<Self, StartupError> {
            if !three_available() {
                return Err(StartupError::RendererUnavailable);
            }
            for id in ["game-container", "score", "game-over", "final-score"] {
                if document.get_element_by_id(id).is_none() {
                    return Err(StartupError::MissingElement(id));
                }
            }
            scene_init();
            Ok(Self {
                document,
                bubble_buf: Vec::with_capacity(BUBBLE_COUNT * 4),
                debris_buf: Vec::new(),
            })
        }
    }

    impl SceneHost for ThreeScene {
        fn add_entity(&mut self, e: &Entity) {
            let (kind, half) = match e.kind {
                EntityKind::WallLeft => (0, e.half_extents),
                EntityKind::WallRight => (1, e.half_extents),
                // The mesh is sized by circumradius
                EntityKind::Rock => (2, e.half_extents / ROCK_BOX_RATIO),
            };
            scene_add(
                e.id.0,
                kind,
                e.pos.x,
                e.pos.y,
                e.pos.z,
                half.x,
                half.y,
                half.z,
                e.rotation.x,
                e.rotation.y,
                e.rotation.z,
                e.shade,
            );
        }

        fn remove_entity(&mut self, id: EntityId) {
            scene_remove(id.0);
        }

        fn set_hud(&mut self, hud: &HudView) {
            if let Some(el) = self.document.get_element_by_id("score") {
                el.set_text_content(Some(&hud.score_text));
            }
            if let Some(el) = self.document.get_element_by_id("game-over") {
                let classes = el.class_list();
                let result = if hud.game_over_visible {
                    classes.remove_1("hidden")
                } else {
                    classes.add_1("hidden")
                };
                if result.is_err() {
                    log::warn!("Could not toggle game-over panel");
                }
            }
            if let (Some(score), Some(el)) =
                (hud.final_score, self.document.get_element_by_id("final-score"))
            {
                el.set_text_content(Some(&score.to_string()));
            }
        }

        fn render(&mut self, session: &GameSession, camera: &CameraRig) {
            let sub = &session.player;
            let pose = [
                sub.pos.x,
                sub.pos.y,
                sub.pos.z,
                sub.rotation.x,
                sub.rotation.y,
                sub.rotation.z,
            ];
            let cam = [
                camera.position.x,
                camera.position.y,
                camera.position.z,
                camera.target.x,
                camera.target.y,
                camera.target.z,
            ];

            self.bubble_buf.clear();
            for b in &session.bubbles {
                self.bubble_buf
                    .extend_from_slice(&[b.pos.x, b.pos.y, b.pos.z, b.radius]);
            }

            self.debris_buf.clear();
            for p in session.bursts.iter().flat_map(|b| &b.particles) {
                self.debris_buf
                    .extend_from_slice(&[p.pos.x, p.pos.y, p.pos.z, p.scale, p.opacity() * 0.8]);
            }

            scene_render(&pose, sub.visible, &cam, &self.bubble_buf, &self.debris_buf);
        }
    }

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        scene: ThreeScene,
        camera: CameraRig,
        keys: KeyState,
        accumulator: f64,
        last_time: f64,
        /// Whether a frame callback is currently scheduled
        running: bool,
        /// Idle/demo mode - autopilot flies the sub
        idle_mode: bool,
    }

    impl Game {
        /// Run simulation ticks for the elapsed frame time
        fn update(&mut self, dt: f64) {
            self.accumulator += dt.min(0.25);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = if self.idle_mode && self.session.is_playing() {
                    autopilot_input(&self.session)
                } else {
                    self.keys.to_tick_input()
                };
                step_session(&mut self.session, &mut self.camera, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            if substeps == MAX_SUBSTEPS {
                self.accumulator = 0.0;
            }

            for event in sync_scene(&mut self.scene, &mut self.session) {
                if let GameEvent::GameOver { final_score } = event {
                    log::info!("Final score: {}", final_score);
                }
            }
        }

        fn render(&mut self) {
            self.scene.set_hud(&HudView::from_session(&self.session));
            self.scene.render(&self.session, &self.camera);
        }

        /// Reset for a new run
        fn restart(&mut self, seed: u64) {
            self.session.restart(seed);
            self.camera.reset();
            self.keys.clear();
            self.accumulator = 0.0;
            self.last_time = 0.0;
            sync_scene(&mut self.scene, &mut self.session);
        }
    }

    /// Optional tuning override embedded in the page
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning override from page");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring page tuning: {}", e);
                Tuning::default()
            }
        }
    }

    pub fn run() -> Result<(), StartupError> {
        let window = web_sys::window().ok_or(StartupError::NoWindow)?;
        let document = window.document().ok_or(StartupError::NoWindow)?;

        log::info!("Abyss Runner starting...");

        let scene = ThreeScene::new(document.clone())?;
        let tuning = load_tuning(&document);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            session: GameSession::new(seed, tuning),
            scene,
            camera: CameraRig::default(),
            keys: KeyState::new(),
            accumulator: 0.0,
            last_time: 0.0,
            running: true,
            idle_mode: false,
        }));
        {
            let mut g = game.borrow_mut();
            let g = &mut *g;
            sync_scene(&mut g.scene, &mut g.session);
        }

        setup_input_handlers(&window, game.clone());
        setup_restart_button(&document, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Abyss Runner running! (seed {})", seed);
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let mut g = game.borrow_mut();
                match key.as_str() {
                    " " | "ArrowLeft" | "ArrowRight" | "ArrowUp" | "ArrowDown" => {
                        // Keep the page from scrolling
                        event.prevent_default();
                    }
                    "i" | "I" => {
                        g.idle_mode = !g.idle_mode;
                        log::info!("Idle mode: {}", g.idle_mode);
                    }
                    _ => {}
                }
                g.keys.set(&key, true);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.set(&event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: keyups are lost while unfocused
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().keys.clear();
            });
            let _ = window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(btn) = document.get_element_by_id("restart-button") else {
            log::warn!("No restart button on page");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let seed = js_sys::Date::now() as u64;
            let resume = {
                let mut g = game.borrow_mut();
                g.restart(seed);
                let idle = !g.running;
                g.running = true;
                idle
            };
            // The loop stops once a run is over and the blast has faded
            if resume {
                request_animation_frame(game.clone());
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                (time - g.last_time) / 1000.0
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();

            let animating = g.session.is_animating();
            g.running = animating;
            animating
        };

        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }

    if let Err(e) = wasm_game::run() {
        log::error!("Abyss Runner failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::process::ExitCode;

    env_logger::init();
    log::info!("Abyss Runner (native) starting...");
    log::info!("Native mode runs a headless autopilot session - run with `trunk serve` for the web version");

    match native::run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use abyss_runner::sim::{GameEvent, GameSession, autopilot_input};
    use abyss_runner::{
        CameraRig, HeadlessScene, HudView, SceneHost, Tuning, TuningError, step_session,
        sync_scene,
    };

    /// Ten minutes at 60 ticks per second
    const MAX_TICKS: u64 = 60 * 60 * 10;

    /// `abyss-runner [tuning.json] [seed]`
    pub fn run(args: Vec<String>) -> Result<(), TuningError> {
        let tuning = match args.first() {
            Some(path) => Tuning::from_file(path)?,
            None => Tuning::default(),
        };
        let seed = args
            .get(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| {
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_millis() as u64)
                    .unwrap_or(0)
            });

        let mut session = GameSession::new(seed, tuning);
        let mut scene = HeadlessScene::new();
        let mut camera = CameraRig::default();
        sync_scene(&mut scene, &mut session);

        while session.is_playing() && session.time_ticks < MAX_TICKS {
            let input = autopilot_input(&session);
            step_session(&mut session, &mut camera, &input);

            for event in sync_scene(&mut scene, &mut session) {
                if let GameEvent::Collided { entity } = event {
                    log::info!("Collision with {:?}", entity);
                }
            }
            scene.set_hud(&HudView::from_session(&session));
            scene.render(&session, &camera);

            if session.time_ticks % 600 == 0 {
                log::info!(
                    "t={}s z={:.0} score={} difficulty={:.2} entities={}",
                    session.time_ticks / 60,
                    session.player.pos.z,
                    session.display_score(),
                    session.difficulty,
                    scene.live_count()
                );
            }
        }

        println!(
            "Seed {}: {} after {} ticks, score {}",
            seed,
            if session.is_playing() { "survived" } else { "crashed" },
            session.time_ticks,
            session.display_score()
        );
        Ok(())
    }
}

//! Mine Flood entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::{Clamped, JsCast};
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, ImageData, KeyboardEvent};

    use mine_flood::audio::{AudioManager, SoundEffect, frame_cues};
    use mine_flood::consts::*;
    use mine_flood::highscores::{Leaderboard, RetryStep, ScoreSubmission, SubmitRetry};
    use mine_flood::identity::{AccountChange, Identity};
    use mine_flood::net;
    use mine_flood::persistence::LocalStorage;
    use mine_flood::renderer::{Framebuffer, RenderOptions, draw_scene};
    use mine_flood::settings::QualityPreset;
    use mine_flood::{Game, GameOverReport};

    // Wallet provider bindings (EIP-1193 `window.ethereum`)
    #[wasm_bindgen(inline_js = "
        export function has_wallet_provider() {
            return typeof window.ethereum !== 'undefined';
        }

        export async function request_accounts() {
            return await window.ethereum.request({ method: 'eth_requestAccounts' });
        }

        export async function current_accounts() {
            return await window.ethereum.request({ method: 'eth_accounts' });
        }

        export function on_accounts_changed(callback) {
            window.ethereum.on('accountsChanged', callback);
        }

        export function on_disconnect(callback) {
            window.ethereum.on('disconnect', callback);
        }
    ")]
    extern "C" {
        fn has_wallet_provider() -> bool;
        #[wasm_bindgen(catch)]
        async fn request_accounts() -> Result<JsValue, JsValue>;
        #[wasm_bindgen(catch)]
        async fn current_accounts() -> Result<JsValue, JsValue>;
        fn on_accounts_changed(callback: &js_sys::Function);
        fn on_disconnect(callback: &js_sys::Function);
    }

    /// Browser-side state around the platform independent `Game`
    struct App {
        game: Game,
        store: LocalStorage,
        fb: Framebuffer,
        ctx: CanvasRenderingContext2d,
        audio: AudioManager,
        leaderboard: Leaderboard,
        /// Pending `requestAnimationFrame` handle; `None` when the loop is stopped
        frame_id: Option<i32>,
    }

    impl App {
        fn render(&mut self, time_ms: f64) {
            let options = RenderOptions::from_settings(&self.game.settings);
            draw_scene(&mut self.fb, &self.game.state, time_ms / 1000.0, &options);

            let image = ImageData::new_with_u8_clamped_array_and_sh(
                Clamped(self.fb.as_bytes()),
                self.fb.width(),
                self.fb.height(),
            );
            match image {
                Ok(image) => {
                    let _ = self.ctx.put_image_data(&image, 0.0, 0.0);
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = document() else { return };
            if self.game.state.sim.is_running() {
                set_text(&document, "score", &self.game.hud_text());
            }
            if self.game.settings.show_fps {
                set_visible(&document, "fps", true);
                set_text(&document, "fps", &format!("{} FPS", self.game.fps()));
            } else {
                set_visible(&document, "fps", false);
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// False once the player changed since `session` was captured
    fn is_current(app: &Rc<RefCell<App>>, session: u64) -> bool {
        app.borrow().game.session() == session
    }

    fn accounts_from_js(value: &JsValue) -> Vec<String> {
        js_sys::Array::from(value)
            .iter()
            .filter_map(|v| v.as_string())
            .collect()
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Mine Flood starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let store = LocalStorage::open();
        let seed = js_sys::Date::now() as u64;
        let mut game = Game::load(seed, &store);
        // `?quality=low` overrides the stored preset for this page load
        if let Some(preset) = window
            .location()
            .search()
            .ok()
            .and_then(|query| QualityPreset::from_query(&query))
        {
            game.set_quality(preset);
        }
        let audio = AudioManager::new(&game.settings);

        let app = Rc::new(RefCell::new(App {
            game,
            store,
            fb: Framebuffer::new(CANVAS_WIDTH as u32, CANVAS_HEIGHT as u32),
            ctx,
            audio,
            leaderboard: Leaderboard::new(),
            frame_id: None,
        }));

        setup_input_handlers(app.clone());
        setup_buttons(app.clone());

        if has_wallet_provider() {
            setup_wallet_events(app.clone());
            match current_accounts().await {
                Ok(accounts) => {
                    apply_account_change(&app, AccountChange::from_accounts(&accounts_from_js(&accounts)))
                }
                Err(e) => {
                    log::warn!("Could not read wallet accounts: {:?}", e);
                    disconnect(&app);
                }
            }
        } else {
            // No provider installed: anonymous play
            set_text(&document, "walletError", "No wallet found - playing as Anonymous");
            set_visible(&document, "walletError", true);
            show_title(&app);
        }

        log::info!("Mine Flood running!");
    }

    fn update_wallet_ui(identity: &Identity) {
        let Some(document) = document() else { return };
        let connected = identity.is_connected();

        if let Some(dot) = document.get_element_by_id("statusDot") {
            let _ = dot.set_attribute("class", if connected { "connected" } else { "" });
        }
        set_text(
            &document,
            "walletStatus",
            if connected { "Connected" } else { "Not Connected" },
        );
        set_text(
            &document,
            "walletAddress",
            &if connected { identity.short_label() } else { String::new() },
        );
        set_visible(&document, "connectWallet", !connected);
        set_visible(&document, "disconnectWallet", connected);
        if connected {
            set_visible(&document, "walletError", false);
        }
    }

    fn apply_account_change(app: &Rc<RefCell<App>>, change: AccountChange) {
        match change {
            AccountChange::Switched(identity) => {
                log::info!("Wallet connected: {}", identity.short_label());
                update_wallet_ui(&identity);
                app.borrow_mut().game.set_identity(identity);
                show_title(app);
            }
            AccountChange::Disconnected => disconnect(app),
        }
    }

    /// Stop everything and hide the game until a wallet connects again
    fn disconnect(app: &Rc<RefCell<App>>) {
        log::info!("Wallet disconnected");
        stop_loop(app);
        app.borrow_mut().game.set_identity(Identity::Anonymous);
        update_wallet_ui(&Identity::Anonymous);

        let Some(document) = document() else { return };
        set_visible(&document, "gameContainer", false);
        set_visible(&document, "gameOver", false);
        if let Some(list) = document.get_element_by_id("highScoresList") {
            list.set_inner_html("");
        }
    }

    /// Title screen: scene animates, nothing advances until Start
    fn show_title(app: &Rc<RefCell<App>>) {
        if let Some(document) = document() {
            set_visible(&document, "gameContainer", true);
            set_visible(&document, "gameOver", false);
            set_visible(&document, "startScreen", true);
        }
        render_leaderboard(&app.borrow().leaderboard);
        start_loop(app);
        refresh_leaderboard(app.clone());
    }

    fn setup_wallet_events(app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |accounts: JsValue| {
                apply_account_change(&app, AccountChange::from_accounts(&accounts_from_js(&accounts)));
            });
            on_accounts_changed(closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |_error: JsValue| {
            disconnect(&app);
        });
        on_disconnect(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        // Keyboard - pump on Space down, release on Space up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                if toggle_setting(&mut a, &event.code()) {
                    return;
                }
                if !a.game.state.sim.is_game_started() {
                    return;
                }
                if event.code() == mine_flood::game::PUMP_KEY {
                    event.prevent_default();
                }
                if a.game.key_down(&event.code()) {
                    a.audio.play(SoundEffect::PumpStroke);
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == mine_flood::game::PUMP_KEY {
                    event.prevent_default();
                }
                app.borrow_mut().game.key_up(&event.code());
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// M mutes, F shows the FPS counter; both persist immediately
    fn toggle_setting(app: &mut App, code: &str) -> bool {
        let settings = &mut app.game.settings;
        match code {
            "KeyM" => settings.muted = !settings.muted,
            "KeyF" => settings.show_fps = !settings.show_fps,
            _ => return false,
        }
        app.game.settings.save(&mut app.store);
        app.audio.apply_settings(&app.game.settings);
        true
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let Some(doc) = document() else { return };

        {
            let app = app.clone();
            on_click(&doc, "startButton", move || {
                {
                    let mut a = app.borrow_mut();
                    a.audio.resume();
                    a.game.start();
                }
                if let Some(document) = document() {
                    set_visible(&document, "startScreen", false);
                }
                start_loop(&app);
            });
        }

        {
            let app = app.clone();
            on_click(&doc, "playAgain", move || {
                stop_loop(&app);
                let seed = js_sys::Date::now() as u64;
                app.borrow_mut().game.restart(seed);
                if let Some(document) = document() {
                    set_visible(&document, "gameOver", false);
                }
                start_loop(&app);
            });
        }

        {
            let app = app.clone();
            on_click(&doc, "connectWallet", move || {
                if !has_wallet_provider() {
                    if let Some(document) = document() {
                        set_text(&document, "walletError", "Please install MetaMask to connect a wallet");
                        set_visible(&document, "walletError", true);
                    }
                    return;
                }
                let app = app.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    match request_accounts().await {
                        Ok(accounts) => {
                            apply_account_change(&app, AccountChange::from_accounts(&accounts_from_js(&accounts)))
                        }
                        Err(e) => {
                            log::error!("User denied account access: {:?}", e);
                            if let Some(document) = document() {
                                set_text(&document, "walletError", "Please connect your wallet to play");
                                set_visible(&document, "walletError", true);
                            }
                        }
                    }
                });
            });
        }

        on_click(&doc, "disconnectWallet", move || disconnect(&app));
    }

    fn start_loop(app: &Rc<RefCell<App>>) {
        if app.borrow().frame_id.is_some() {
            return;
        }
        request_animation_frame(app.clone());
    }

    /// Cancelling the pending frame is the only cancellation the loop needs
    fn stop_loop(app: &Rc<RefCell<App>>) {
        if let Some(id) = app.borrow_mut().frame_id.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let handle = app.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        if let Ok(id) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            handle.borrow_mut().frame_id = Some(id);
        }
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let report = {
            let mut a = app.borrow_mut();
            a.frame_id = None;

            let outcome = a.game.frame(time);
            a.render(time);
            a.update_hud();
            for cue in frame_cues(&outcome) {
                a.audio.play(cue);
            }
            outcome.game_over
        };

        match report {
            // Frozen on the final frame until Play Again
            Some(report) => handle_game_over(&app, report),
            None => request_animation_frame(app),
        }
    }

    fn handle_game_over(app: &Rc<RefCell<App>>, report: GameOverReport) {
        let (retry, session) = {
            let mut a = app.borrow_mut();
            let a = &mut *a;
            a.game.personal_best.save(&mut a.store);
            (a.game.submit_retry(), a.game.session())
        };
        log::info!(
            "Game over: {}s (best {}s)",
            report.score,
            report.previous_best.max(report.score)
        );

        if let Some(document) = document() {
            set_text(&document, "finalScore", &report.final_score_text());
            set_visible(&document, "newBest", report.new_personal_best);
            set_visible(&document, "gameOver", true);
        }

        submit_score(app.clone(), session, report.submission, retry);
    }

    /// One attempt now; failures reschedule through `setTimeout` until the
    /// retry budget runs out, then give up silently. The score is still sent
    /// after the player changes, but the list is only refreshed for the
    /// session that earned it.
    fn submit_score(app: Rc<RefCell<App>>, session: u64, submission: ScoreSubmission, mut retry: SubmitRetry) {
        wasm_bindgen_futures::spawn_local(async move {
            match net::post_score(&submission).await {
                Ok(()) => {
                    log::info!("High score saved successfully");
                    if is_current(&app, session) {
                        refresh_leaderboard(app);
                    }
                }
                Err(e) => {
                    if let RetryStep::RetryIn { delay_ms } = retry.on_failure(&e) {
                        set_timeout(delay_ms, move || submit_score(app, session, submission, retry));
                    }
                }
            }
        });
    }

    fn set_timeout(delay_ms: u32, callback: impl FnOnce() + 'static) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(callback);
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms as i32,
        );
        closure.forget();
    }

    /// Fetch in the background; the display keeps the last good list on failure
    fn refresh_leaderboard(app: Rc<RefCell<App>>) {
        let (limit, session) = {
            let a = app.borrow();
            (a.game.state.tuning.leaderboard_size, a.game.session())
        };
        wasm_bindgen_futures::spawn_local(async move {
            match net::fetch_leaderboard(limit).await {
                Ok(_) if !is_current(&app, session) => {
                    log::debug!("Dropping leaderboard fetched for a previous player");
                }
                Ok(board) => {
                    render_leaderboard(&board);
                    app.borrow_mut().leaderboard = board;
                }
                Err(e) => log::error!("Error fetching high scores: {}", e),
            }
        });
    }

    fn render_leaderboard(board: &Leaderboard) {
        let Some(document) = document() else { return };
        let Some(list) = document.get_element_by_id("highScoresList") else {
            log::error!("High scores list element not found");
            return;
        };
        list.set_inner_html("");
        for line in board.display_lines() {
            if let Ok(li) = document.create_element("li") {
                li.set_text_content(Some(&line));
                let _ = list.append_child(&li);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use mine_flood::highscores::{MemoryScoreStore, ScoreStore, submit_with_retry};
    use mine_flood::persistence::MemoryStore;
    use mine_flood::settings::QualityPreset;
    use mine_flood::{Game, GameOverReport};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Pump once the water passes this height
    const PUMP_THRESHOLD: f32 = 200.0;
    /// Safety stop for a run that never floods (simulated seconds)
    const MAX_SECONDS: f64 = 3600.0;

    /// Play one run headless at 60 Hz. Returns the game-over report, or
    /// `None` if the run hit the time cap.
    pub fn play(game: &mut Game) -> Option<GameOverReport> {
        game.start();
        let mut time = 0.0;
        while time < MAX_SECONDS * 1000.0 {
            let outcome = game.frame(time);
            if let Some(report) = outcome.game_over {
                return Some(report);
            }

            let ready = game.state.sim.can_pump && game.state.sim.water_level > PUMP_THRESHOLD;
            if game.state.lever.held {
                game.key_up(mine_flood::game::PUMP_KEY);
            } else if ready {
                game.key_down(mine_flood::game::PUMP_KEY);
            }
            time += FRAME_MS;
        }
        None
    }

    pub fn run(seed: u64, quality: Option<QualityPreset>) {
        let mut store = MemoryStore::new();
        let mut scores = MemoryScoreStore::new();
        let mut game = Game::load(seed, &store);
        if let Some(preset) = quality {
            game.set_quality(preset);
        }

        let Some(report) = play(&mut game) else {
            log::warn!("Autopilot survived the time cap, no score recorded");
            return;
        };
        game.personal_best.save(&mut store);
        log::info!("{}", report.final_score_text());

        if submit_with_retry(&mut scores, &report.submission, game.submit_retry()) {
            for line in scores.top(game.state.tuning.leaderboard_size).display_lines() {
                log::info!("{}", line);
            }
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mine Flood (native) starting...");

    // mine-flood [seed] [low|medium|high]
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let quality = args
        .next()
        .and_then(|s| mine_flood::settings::QualityPreset::from_str(&s));
    autopilot::run(seed, quality);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

//! Lucky Spin entry point
//!
//! Handles platform-specific initialization and runs the app loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlInputElement, HtmlSelectElement, MouseEvent};

    use lucky_spin::audio::{AudioManager, SoundEffect};
    use lucky_spin::caption::{CaptionClient, Honorific};
    use lucky_spin::records::{WinnerLog, WinnerRecord, format_date};
    use lucky_spin::sim::{Entrant, Inventory, Session, SpinEvent, SpinStatus};
    use lucky_spin::{AppSettings, persistence};

    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// App instance holding all state
    struct App {
        session: Session,
        audio: AudioManager,
        settings: AppSettings,
        winner_log: WinnerLog,
        caption_client: CaptionClient,
        rng: Pcg32,
        /// Bumped per spin; stale caption responses are dropped (latest write wins)
        spin_epoch: u32,
    }

    impl App {
        fn new(seed: u64) -> Self {
            let inventory = Inventory::new(persistence::load_from_location());
            let settings = AppSettings::load();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_music_volume(settings.music_volume);

            Self {
                session: Session::new(inventory),
                audio,
                settings,
                winner_log: WinnerLog::load(),
                caption_client: CaptionClient::new(load_api_key()),
                rng: Pcg32::seed_from_u64(seed),
                spin_epoch: 0,
            }
        }

        /// Try to start a spin from the current form values. Returns the
        /// validation message to surface, if any.
        fn try_spin(&mut self, entrant: Entrant, now: f64) -> Option<String> {
            match self.session.start_spin(entrant, now, &mut self.rng) {
                Ok(()) => {
                    self.spin_epoch += 1;
                    self.audio.resume();
                    // Background music starts with the spin, like the original booth build
                    let track = self.settings.bg_music_url.clone();
                    self.audio.play_music(&track);
                    None
                }
                Err(e) => {
                    log::warn!("Spin refused: {e}");
                    Some(e.to_string())
                }
            }
        }

        /// Persist everything that survives a reload
        fn persist(&self) {
            persistence::save_to_location(&self.session.inventory.prizes);
            self.winner_log.save();
            self.settings.save();
        }
    }

    /// API key for the caption call, configured by the operator in LocalStorage
    fn load_api_key() -> Option<String> {
        web_sys::window()?
            .local_storage()
            .ok()??
            .get_item("lucky_spin_api_key")
            .ok()?
    }

    fn document() -> Document {
        web_sys::window().expect("no window").document().expect("no document")
    }

    fn now_ms() -> f64 {
        js_sys::Date::now()
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Lucky Spin starting...");

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed)));
        log::info!("Initialized with seed: {}", seed);

        {
            let a = app.borrow();
            render_wallpaper(&a.settings);
            render_inventory(&a.session);
            render_wheel(&a.session);
            render_prize_editor(&a.session);
            render_winner_log(&a.winner_log);
        }

        setup_spin_button(app.clone());
        setup_popup_dismiss(app.clone());
        setup_settings_tab(app.clone());

        // Start the frame loop
        request_animation_frame(app);

        log::info!("Lucky Spin running!");
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(app: Rc<RefCell<App>>, _raf_time: f64) {
        let events = {
            let mut a = app.borrow_mut();
            a.session.advance(now_ms())
        };

        for event in &events {
            match event {
                SpinEvent::Tick => {
                    app.borrow().audio.play(SoundEffect::SpinTick);
                }
                SpinEvent::Finished { prize_name, .. } => {
                    on_spin_finished(&app, prize_name);
                }
            }
        }

        {
            let a = app.borrow();
            set_wheel_rotation(a.session.rotation);
        }

        request_animation_frame(app);
    }

    fn on_spin_finished(app: &Rc<RefCell<App>>, prize_name: &str) {
        let (record, caption, client, epoch) = {
            let mut a = app.borrow_mut();
            a.audio.play_win_sound(&a.settings.win_sound_url);

            // Session already decremented stock and appended its record
            let record = a.session.records.last().cloned();
            if let Some(ref r) = record {
                a.winner_log.push(r.clone());
            }
            a.persist();

            let caption = a.session.caption.clone();
            (record, caption, a.caption_client.clone(), a.spin_epoch)
        };

        {
            let a = app.borrow();
            render_inventory(&a.session);
            render_wheel(&a.session);
            render_winner_log(&a.winner_log);
            show_popup(&a.session, &caption);
        }

        // Fire-and-forget caption request; fallback is already on screen
        if let Some(record) = record {
            if client.has_key() {
                spawn_caption_request(app.clone(), client, record, epoch);
            }
        }
        log::info!("Spin resolved: {prize_name}");
    }

    fn spawn_caption_request(
        app: Rc<RefCell<App>>,
        client: CaptionClient,
        record: WinnerRecord,
        epoch: u32,
    ) {
        set_caption_loading(true);
        wasm_bindgen_futures::spawn_local(async move {
            let generated = client
                .fetch_caption(record.honorific, &record.name, &record.prize_name)
                .await;
            set_caption_loading(false);

            let Some(text) = generated else { return };
            let mut a = app.borrow_mut();
            if a.spin_epoch != epoch {
                // A newer spin started while this request was in flight
                return;
            }
            a.session.set_caption(text.clone());
            drop(a);
            set_popup_caption(&text);
        });
    }

    // === Event wiring ===

    fn setup_spin_button(app: Rc<RefCell<App>>) {
        let Some(btn) = document().get_element_by_id("spin-btn") else {
            log::error!("Missing #spin-btn");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let entrant = read_entrant_form();
            let message = app.borrow_mut().try_spin(entrant, now_ms());
            match message {
                Some(msg) => set_status_message(&msg),
                None => {
                    set_status_message("");
                    set_spin_button_enabled(false);
                }
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_popup_dismiss(app: Rc<RefCell<App>>) {
        let Some(btn) = document().get_element_by_id("popup-dismiss-btn") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            app.borrow_mut().session.dismiss_winner();
            hide_popup();
            set_spin_button_enabled(app.borrow().session.can_spin());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_settings_tab(app: Rc<RefCell<App>>) {
        // Add prize
        if let Some(btn) = document().get_element_by_id("add-prize-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.session.inventory.add_prize(now_ms());
                a.session.rebuild_slots();
                a.persist();
                render_inventory(&a.session);
                render_wheel(&a.session);
                render_prize_editor(&a.session);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Wallpaper URL
        if let Some(input) = document().get_element_by_id("wallpaper-input") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(target) = event.target() else { return };
                let Ok(input) = target.dyn_into::<HtmlInputElement>() else {
                    return;
                };
                let mut a = app.borrow_mut();
                a.settings.wallpaper = input.value();
                a.settings.save();
                render_wallpaper(&a.settings);
            });
            let _ =
                input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Master volume slider (0-100 in the DOM)
        if let Some(slider) = document().get_element_by_id("master-volume") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(target) = event.target() else { return };
                let Ok(input) = target.dyn_into::<HtmlInputElement>() else {
                    return;
                };
                let vol = input.value().parse::<f32>().unwrap_or(70.0) / 100.0;
                let mut a = app.borrow_mut();
                a.settings.set_master_volume(vol);
                a.audio.set_master_volume(vol);
                a.settings.save();
            });
            let _ =
                slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Background music volume slider (0-100 in the DOM)
        if let Some(slider) = document().get_element_by_id("music-volume") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(target) = event.target() else { return };
                let Ok(input) = target.dyn_into::<HtmlInputElement>() else {
                    return;
                };
                let vol = input.value().parse::<f32>().unwrap_or(50.0) / 100.0;
                let mut a = app.borrow_mut();
                a.settings.set_music_volume(vol);
                a.audio.set_music_volume(vol);
                a.settings.save();
            });
            let _ =
                slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Background music track (playlist entry or custom URL); takes effect on
        // the next spin
        if let Some(select) = document().get_element_by_id("music-select") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(target) = event.target() else { return };
                let Ok(select) = target.dyn_into::<HtmlSelectElement>() else {
                    return;
                };
                let mut a = app.borrow_mut();
                a.settings.bg_music_url = select.value();
                a.settings.save();
            });
            let _ =
                select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Win sound
        if let Some(select) = document().get_element_by_id("win-sound-select") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(target) = event.target() else { return };
                let Ok(select) = target.dyn_into::<HtmlSelectElement>() else {
                    return;
                };
                let mut a = app.borrow_mut();
                a.settings.win_sound_url = select.value();
                a.settings.save();
            });
            let _ =
                select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        setup_prize_editor(app);
    }

    /// Prize editor rows share two delegated listeners: "change" for the
    /// name/count/color inputs (tagged with data-prize-id/data-field) and
    /// "click" for the delete buttons (tagged with data-delete-id).
    fn setup_prize_editor(app: Rc<RefCell<App>>) {
        let Some(editor) = document().get_element_by_id("prize-editor") else {
            return;
        };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(target) = event.target() else { return };
                let Ok(input) = target.dyn_into::<HtmlInputElement>() else {
                    return;
                };
                let Some(id) = input.get_attribute("data-prize-id") else {
                    return;
                };
                let Some(field) = input.get_attribute("data-field") else {
                    return;
                };
                let value = input.value();

                let mut a = app.borrow_mut();
                let updated = match field.as_str() {
                    "name" => a.session.inventory.update_prize(&id, |p| p.name = value),
                    "count" => {
                        let count = value.parse().unwrap_or(0);
                        a.session.inventory.update_prize(&id, |p| p.count = count)
                    }
                    "color" => a.session.inventory.update_prize(&id, |p| p.color = value),
                    "image" => a.session.inventory.update_prize(&id, |p| p.image = value),
                    _ => false,
                };
                if updated {
                    a.session.rebuild_slots();
                    a.persist();
                    render_inventory(&a.session);
                    render_wheel(&a.session);
                }
            });
            let _ =
                editor.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let Some(target) = event.target() else { return };
                let Ok(el) = target.dyn_into::<web_sys::Element>() else {
                    return;
                };
                let Some(id) = el.get_attribute("data-delete-id") else {
                    return;
                };

                let mut a = app.borrow_mut();
                if !a.session.inventory.delete_prize(&id) {
                    drop(a);
                    set_status_message("Cần tối thiểu 1 giải thưởng!");
                    return;
                }
                a.session.rebuild_slots();
                a.persist();
                render_inventory(&a.session);
                render_wheel(&a.session);
                render_prize_editor(&a.session);
            });
            let _ =
                editor.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Read the name/honorific/photo form
    fn read_entrant_form() -> Entrant {
        let doc = document();
        let name = doc
            .get_element_by_id("name-input")
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
            .map(|i| i.value().to_uppercase())
            .unwrap_or_default();
        let honorific = doc
            .get_element_by_id("honorific-select")
            .and_then(|e| e.dyn_into::<HtmlSelectElement>().ok())
            .and_then(|s| Honorific::from_str(&s.value()))
            .unwrap_or_default();
        let photo = doc
            .get_element_by_id("photo-input")
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
            .map(|i| i.value())
            .filter(|v| !v.trim().is_empty());
        Entrant {
            name,
            honorific,
            photo,
        }
    }

    // === DOM rendering ===

    fn set_wheel_rotation(rotation: f32) {
        if let Some(el) = document().get_element_by_id("wheel") {
            let _ = el.set_attribute("style", &format!("transform: rotate({rotation}deg)"));
        }
    }

    fn render_wheel(session: &Session) {
        set_wheel_rotation(session.rotation);
        let Some(el) = document().get_element_by_id("wheel") else {
            return;
        };
        if session.slots.is_empty() {
            el.set_inner_html("<p class=\"empty\">Hết phần thưởng!</p>");
            set_spin_button_enabled(false);
            return;
        }
        let html: String = session
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                format!(
                    "<div class=\"slot\" data-index=\"{i}\" style=\"--slot-color: {}\">{}</div>",
                    slot.color, slot.name
                )
            })
            .collect();
        el.set_inner_html(&html);
        set_spin_button_enabled(session.status != SpinStatus::Spinning);
    }

    fn render_inventory(session: &Session) {
        let Some(el) = document().get_element_by_id("inventory-list") else {
            return;
        };
        let html: String = session
            .inventory
            .prizes
            .iter()
            .map(|p| {
                let badge = if p.count > 0 {
                    format!("CÒN LẠI: {}", p.count)
                } else {
                    "HẾT HÀNG".to_string()
                };
                format!(
                    "<div class=\"prize{}\"><img src=\"{}\" alt=\"\"/><span>{}</span><em>{}</em></div>",
                    if p.count == 0 { " depleted" } else { "" },
                    p.image,
                    p.name,
                    badge
                )
            })
            .collect();
        el.set_inner_html(&html);
    }

    fn render_prize_editor(session: &Session) {
        let Some(el) = document().get_element_by_id("prize-editor") else {
            return;
        };
        let html: String = session
            .inventory
            .prizes
            .iter()
            .map(|p| {
                format!(
                    "<div class=\"prize-row\">\
                     <input data-prize-id=\"{id}\" data-field=\"name\" value=\"{name}\"/>\
                     <input type=\"number\" min=\"0\" data-prize-id=\"{id}\" data-field=\"count\" value=\"{count}\"/>\
                     <input type=\"color\" data-prize-id=\"{id}\" data-field=\"color\" value=\"{color}\"/>\
                     <button data-delete-id=\"{id}\">Xóa</button>\
                     </div>",
                    id = p.id,
                    name = p.name,
                    count = p.count,
                    color = p.color,
                )
            })
            .collect();
        el.set_inner_html(&html);
    }

    fn render_winner_log(log: &WinnerLog) {
        let Some(el) = document().get_element_by_id("winner-log") else {
            return;
        };
        let html: String = log
            .entries
            .iter()
            .rev()
            .map(|r| {
                format!(
                    "<div class=\"winner\"><b>{}</b> — {} <time>{}</time></div>",
                    r.name,
                    r.prize_name,
                    format_date(r.timestamp)
                )
            })
            .collect();
        el.set_inner_html(&html);
    }

    fn render_wallpaper(settings: &AppSettings) {
        if let Some(el) = document().get_element_by_id("wallpaper") {
            let _ = el.set_attribute(
                "style",
                &format!("background-image: url({})", settings.wallpaper),
            );
        }
    }

    fn show_popup(session: &Session, caption: &str) {
        let doc = document();
        let Some(winner) = session.winner.as_ref() else {
            return;
        };
        if let Some(el) = doc.get_element_by_id("popup-prize-name") {
            el.set_text_content(Some(&winner.name));
        }
        if let Some(el) = doc.get_element_by_id("popup-prize-image") {
            let _ = el.set_attribute("src", &winner.image);
        }
        set_popup_caption(caption);
        if let Some(el) = doc.get_element_by_id("winner-popup") {
            let _ = el.set_attribute("class", "");
        }
    }

    fn hide_popup() {
        if let Some(el) = document().get_element_by_id("winner-popup") {
            let _ = el.set_attribute("class", "hidden");
        }
    }

    fn set_popup_caption(text: &str) {
        if let Some(el) = document().get_element_by_id("popup-caption") {
            el.set_text_content(Some(text));
        }
    }

    fn set_caption_loading(loading: bool) {
        if let Some(el) = document().get_element_by_id("caption-loading") {
            let _ = el.set_attribute("class", if loading { "" } else { "hidden" });
        }
    }

    fn set_status_message(msg: &str) {
        if let Some(el) = document().get_element_by_id("status-msg") {
            el.set_text_content(Some(msg));
        }
    }

    fn set_spin_button_enabled(enabled: bool) {
        if let Some(el) = document().get_element_by_id("spin-btn") {
            if enabled {
                let _ = el.remove_attribute("disabled");
            } else {
                let _ = el.set_attribute("disabled", "disabled");
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lucky Spin (native) starting...");
    log::info!("Native mode is a headless demo - run with `trunk serve` for the web version");

    run_demo_spin();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: one full spin against the default inventory with a fixed seed
#[cfg(not(target_arch = "wasm32"))]
fn run_demo_spin() {
    use lucky_spin::caption::Honorific;
    use lucky_spin::consts::SPIN_DURATION_MS;
    use lucky_spin::sim::{Entrant, Session, SpinEvent, SpinStatus};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    let mut session = Session::default();
    let mut rng = Pcg32::seed_from_u64(20240901);

    let entrant = Entrant {
        name: "DEMO".to_string(),
        honorific: Honorific::Anh,
        photo: None,
    };
    session
        .start_spin(entrant, 0.0, &mut rng)
        .expect("demo spin should start");

    let mut now = 0.0;
    let mut ticks = 0;
    while session.status == SpinStatus::Spinning {
        now += 1000.0 / 60.0;
        for event in session.advance(now) {
            match event {
                SpinEvent::Tick => ticks += 1,
                SpinEvent::Finished { prize_name, .. } => {
                    log::info!("Winner after {ticks} ticks: {prize_name}");
                }
            }
        }
        assert!(now < SPIN_DURATION_MS * 2.0);
    }

    println!("{}", session.caption);
    for prize in &session.inventory.prizes {
        println!("  {:30} còn {}", prize.name, prize.count);
    }
}

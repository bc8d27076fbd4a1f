pub mod audio;
pub mod runner;

pub use audio::WebAudioSink;
pub use runner::CardRunner;

use std::cell::RefCell;

use penguin_post::{CardConfig, CardInput};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<CardRunner<WebAudioSink>>> = RefCell::new(None);
}

/// Run `f` against the live runner. Calls made before `card_init` are dropped.
fn with_runner<R>(f: impl FnOnce(&mut CardRunner<WebAudioSink>) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("card not initialized; call card_init() first");
                None
            }
        }
    })
}

fn push(input: CardInput) {
    with_runner(|r| r.push_input(input));
}

#[wasm_bindgen]
pub fn card_init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = CardConfig {
        seed: (js_sys::Math::random() * u32::MAX as f64) as u64,
        ..CardConfig::default()
    };
    let runner = CardRunner::new(config, WebAudioSink::new());
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("penguin-post: initialized");
}

#[wasm_bindgen]
pub fn card_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
pub fn card_activate() {
    push(CardInput::Activate);
}

#[wasm_bindgen]
pub fn card_close() {
    push(CardInput::Close);
}

#[wasm_bindgen]
pub fn card_letter_exit_complete() {
    push(CardInput::LetterExitComplete);
}

#[wasm_bindgen]
pub fn card_hover(on: bool) {
    push(CardInput::Hover(on));
}

#[wasm_bindgen]
pub fn card_press(on: bool) {
    push(CardInput::Press(on));
}

#[wasm_bindgen]
pub fn card_unmount() {
    with_runner(|r| r.unmount());
}

#[wasm_bindgen]
pub fn card_load_config(json: &str) -> bool {
    with_runner(|r| r.load_config(json)).unwrap_or(false)
}

// ---- Frame buffer accessors ----

#[wasm_bindgen]
pub fn get_buffer_ptr() -> *const f32 {
    with_runner(|r| r.buffer_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_particles() -> u32 {
    with_runner(|r| r.max_particles()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.max_events()).unwrap_or(0)
}

// ---- State accessors ----

#[wasm_bindgen]
pub fn get_phase() -> u32 {
    with_runner(|r| r.phase()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn is_opened() -> bool {
    with_runner(|r| r.opened()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn is_jumping() -> bool {
    with_runner(|r| r.jumping()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn is_penguin_visible() -> bool {
    with_runner(|r| r.penguin_visible()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn is_returning() -> bool {
    with_runner(|r| r.returning()).unwrap_or(false)
}

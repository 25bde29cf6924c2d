//! Dodge Prompt entry point
//!
//! Wires browser events to the widget on wasm32; natively, plays a scripted
//! session against an in-memory page.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::DVec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{AddEventListenerOptions, MouseEvent, PointerEvent, TouchEvent};

    use dodge_prompt::celebration::TimerRequest;
    use dodge_prompt::evasion::ClickVerdict;
    use dodge_prompt::platform::WebPage;
    use dodge_prompt::{Config, Widget, WidgetError};

    type SharedWidget = Rc<RefCell<Widget<WebPage>>>;

    pub fn run() -> Result<(), WidgetError> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| WidgetError::Js(e.to_string()))?;

        log::info!("Dodge Prompt starting...");

        let window = web_sys::window().ok_or_else(|| WidgetError::Js("no window".into()))?;
        let config = Config::load();
        let seed = config.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let asset = config.celebration_asset.clone();

        let page = WebPage::new(window, &config.elements)?;
        let widget = Rc::new(RefCell::new(Widget::new(config, page, seed)));

        // Fetch the celebration image up front so the reveal is instant
        widget.borrow_mut().preload(&asset)?;

        setup_pointer_handler(widget.clone())?;
        setup_touch_handler(widget.clone())?;
        setup_decline_click(widget.clone())?;
        setup_accept_click(widget)?;

        log::info!("Dodge Prompt running!");
        Ok(())
    }

    fn setup_pointer_handler(widget: SharedWidget) -> Result<(), WidgetError> {
        let document = widget.borrow().page().document().clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            let at = DVec2::new(event.client_x() as f64, event.client_y() as f64);
            if widget.borrow_mut().pointer_moved(at) {
                request_animation_frame(widget.clone());
            }
        });
        document.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_touch_handler(widget: SharedWidget) -> Result<(), WidgetError> {
        let decline = widget.borrow().page().decline_element().clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            event.prevent_default();
            if let Err(e) = widget.borrow_mut().touch_started() {
                log::error!("Touch dodge failed: {}", e);
            }
        });
        // Non-passive so prevent_default actually stops scrolling and click emulation
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        decline.add_event_listener_with_callback_and_add_event_listener_options(
            "touchstart",
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        closure.forget();
        Ok(())
    }

    fn setup_decline_click(widget: SharedWidget) -> Result<(), WidgetError> {
        let decline = widget.borrow().page().decline_element().clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            if widget.borrow().decline_clicked() == ClickVerdict::Suppress {
                event.prevent_default();
                event.stop_propagation();
            }
        });
        decline.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_accept_click(widget: SharedWidget) -> Result<(), WidgetError> {
        let accept = widget.borrow().page().accept_element().clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let timers = widget.borrow_mut().accept_clicked();
            match timers {
                Ok(timers) => {
                    for request in timers {
                        if let Err(e) = set_timeout(widget.clone(), request) {
                            log::error!("Failed to schedule {:?}: {}", request.timer, e);
                        }
                    }
                }
                Err(e) => log::error!("Accept failed: {}", e),
            }
        });
        accept.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(widget: SharedWidget) {
        let Some(window) = web_sys::window() else {
            log::error!("No window to request an animation frame from");
            widget.borrow_mut().cancel_frame();
            return;
        };
        let frame_widget = widget.clone();
        let closure = Closure::once(move |_time: f64| {
            if let Err(e) = frame_widget.borrow_mut().run_frame() {
                log::error!("Dodge failed: {}", e);
            }
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(_) => closure.forget(),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                widget.borrow_mut().cancel_frame();
            }
        }
    }

    fn set_timeout(widget: SharedWidget, request: TimerRequest) -> Result<(), WidgetError> {
        let window = web_sys::window().ok_or_else(|| WidgetError::Js("no window".into()))?;
        let closure = Closure::once(move || {
            if let Err(e) = widget.borrow_mut().timer_fired(request.timer) {
                log::error!("{:?} failed: {}", request.timer, e);
            }
        });
        window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            request.delay_ms as i32,
        )?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run().map_err(|e| {
        log::error!("Start-up failed: {}", e);
        JsValue::from_str(&e.to_string())
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Dodge Prompt (native) starting...");
    log::info!("Native mode plays a headless session - run with `trunk serve` for the web version");

    if let Err(e) = headless_session() {
        log::error!("Headless session failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Chase Decline with a pointer, tap it once, then accept
#[cfg(not(target_arch = "wasm32"))]
fn headless_session() -> Result<(), dodge_prompt::WidgetError> {
    use dodge_prompt::geometry::{Rect, Viewport};
    use dodge_prompt::platform::HeadlessPage;
    use dodge_prompt::{Config, Widget};
    use glam::DVec2;

    let config = Config::load();
    let seed = config.seed.unwrap_or(0x5eed);
    let asset = config.celebration_asset.clone();
    let page = HeadlessPage::new(Viewport::new(1000.0, 800.0), Rect::new(500.0, 400.0, 40.0, 40.0));
    let mut widget = Widget::new(config, page, seed);
    widget.preload(&asset)?;

    // Sweep the pointer toward wherever Decline currently is
    let mut pointer = DVec2::new(100.0, 100.0);
    for _ in 0..40 {
        let target = widget.page().decline.center();
        pointer += (target - pointer) * 0.5;
        if widget.pointer_moved(pointer) {
            if let Some(relocation) = widget.run_frame()? {
                println!(
                    "dodge {:>2}: ({:>6.1}, {:>6.1}){}",
                    relocation.evasions,
                    relocation.position.x,
                    relocation.position.y,
                    if relocation.cornered { "  cornered" } else { "" }
                );
            }
        }
    }

    widget.touch_started()?;

    let mut timers = widget.accept_clicked()?;
    timers.sort_by_key(|t| t.delay_ms);
    for request in timers {
        widget.timer_fired(request.timer)?;
        println!(
            "t+{}ms: {:?}, {} confetti",
            request.delay_ms,
            widget.celebration_phase(),
            widget.page().confetti.len()
        );
    }

    match serde_json::to_string_pretty(widget.evasion_state()) {
        Ok(json) => println!("\nFinal evasion state:\n{}", json),
        Err(e) => log::warn!("Could not serialize state: {}", e),
    }
    match serde_json::to_string_pretty(widget.page()) {
        Ok(json) => println!("\nFinal page:\n{}", json),
        Err(e) => log::warn!("Could not serialize page: {}", e),
    }
    Ok(())
}

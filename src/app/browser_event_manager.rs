// src/app/browser_event_manager.rs
//! Handles attaching and detaching the canvas pointer listeners and the tick interval.

use log::{error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Event, HtmlCanvasElement, MouseEvent};

use crate::app::drag_handler;
use crate::app::sim_app::SharedApp;

/// Pointer events listened to on the canvas.
const POINTER_EVENTS: [&str; 4] = ["pointerdown", "pointermove", "pointerup", "pointerleave"];

/// Everything that has to be removed again on dispose.
#[derive(Default)]
pub(crate) struct ListenerSet {
    canvas_listeners: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
    ticker: Option<(i32, Closure<dyn FnMut()>)>,
    // dispose がコールバックの中から呼ばれることもあるので、外した closure はすぐ捨てずにここで持っておく
    retired_listeners: Vec<Closure<dyn FnMut(Event)>>,
    retired_ticker: Option<Closure<dyn FnMut()>>,
}

impl ListenerSet {
    pub(crate) fn is_attached(&self) -> bool {
        !self.canvas_listeners.is_empty() || self.ticker.is_some()
    }
}

/// Attaches the four pointer listeners to the canvas.
pub(crate) fn attach_pointer_listeners(app: &SharedApp, set: &mut ListenerSet) -> Result<(), JsValue> {
    for name in POINTER_EVENTS {
        let app_clone = app.clone();
        let closure = Closure::wrap(Box::new(move |event: Event| {
            let Some(mouse_event) = event.dyn_ref::<MouseEvent>() else {
                error!("Failed to cast {} event to MouseEvent", name);
                return;
            };
            let now = js_sys::Date::now();
            match name {
                "pointerdown" => drag_handler::handle_pointer_down(&app_clone, mouse_event),
                "pointermove" => drag_handler::handle_pointer_move(&app_clone, mouse_event),
                "pointerup" => drag_handler::handle_pointer_up(&app_clone, now),
                _ => drag_handler::handle_pointer_leave(&app_clone, now),
            }
        }) as Box<dyn FnMut(Event)>);

        app.canvas
            .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        set.canvas_listeners.push((name, closure));
    }
    info!("Attached {} pointer listeners to the canvas.", set.canvas_listeners.len());
    Ok(())
}

/// Starts the interval that advances timers and redraws.
pub(crate) fn start_ticker(app: &SharedApp, interval_ms: i32, set: &mut ListenerSet) -> Result<(), JsValue> {
    let window = window().ok_or("Failed to get window")?;
    let app_clone = app.clone();
    let closure = Closure::wrap(Box::new(move || {
        drag_handler::handle_tick(&app_clone, js_sys::Date::now());
    }) as Box<dyn FnMut()>);

    let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        interval_ms,
    )?;
    set.ticker = Some((id, closure));
    info!("Started tick interval every {} ms.", interval_ms);
    Ok(())
}

/// Removes every listener and stops the interval. Safe to call twice.
pub(crate) fn detach_all(canvas: &HtmlCanvasElement, set: &mut ListenerSet) -> Result<(), JsValue> {
    for (name, closure) in set.canvas_listeners.drain(..) {
        if let Err(e) = canvas.remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref()) {
            error!("Failed to remove {} listener: {:?}", name, e);
        }
        set.retired_listeners.push(closure);
    }
    if let Some((id, closure)) = set.ticker.take() {
        let window = window().ok_or("Failed to get window")?;
        window.clear_interval_with_handle(id);
        set.retired_ticker = Some(closure);
    }
    info!("Detached canvas listeners and tick interval.");
    Ok(())
}

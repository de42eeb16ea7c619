use std::cell::Cell;
use std::time::Duration;

use lantern_core::ClientConfig;
use leptos::ev;
use leptos::prelude::*;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::app::Session;
use crate::bridge::EvenniaBridge;
use crate::components::{CommandInput, OutputDisplay, PromptIndicator};
use crate::models::TerminalState;

/// Id of the form holding the prompt and the input field.
pub const INPUT_FORM_ID: &str = "inputform";

/// Main terminal container that orchestrates all sub-components.
#[component]
pub fn Terminal() -> impl IntoView {
    let state = use_context::<TerminalState>().expect("TerminalState context missing");
    let session = use_context::<StoredValue<Session>>().expect("Session context missing");
    let config = use_context::<ClientConfig>().expect("ClientConfig context missing");
    let keepalive_interval = config.keepalive_interval;

    // Connect on mount - run only once per component instance
    let started = Cell::new(false);
    Effect::new(move |_| {
        if !started.get() {
            started.set(true);
            start_session(session, keepalive_interval);
            relayout(state);
        }
    });

    // Keep the message window clear of the input form
    let on_resize = window_event_listener(ev::resize, move |_| relayout(state));

    // Close the connection when the page goes away
    let on_unload = window_event_listener(ev::beforeunload, move |_| {
        session.update_value(Session::close);
    });

    let listeners = SendWrapper::new((on_resize, on_unload));
    on_cleanup(move || {
        let (on_resize, on_unload) = listeners.take();
        on_resize.remove();
        on_unload.remove();
    });

    view! {
        <div class="terminal-container">
            <OutputDisplay />
            <div class="input-row" id=INPUT_FORM_ID>
                <PromptIndicator />
                <CommandInput />
            </div>
        </div>
    }
}

/// Initialize the session, subscribe to its channels and start the idle timer.
fn start_session(session: StoredValue<Session>, keepalive_interval: Duration) {
    session.update_value(Session::init);

    let channels: Vec<String> = session.with_value(|s| {
        s.router()
            .channels()
            .into_iter()
            .map(str::to_owned)
            .collect()
    });
    EvenniaBridge::subscribe(&channels, move |event| {
        session.update_value(|s| s.receive(&event));
    });

    start_keepalive(session, keepalive_interval);
}

/// Send the idle message every `interval` so proxies keep the connection open.
fn start_keepalive(session: StoredValue<Session>, interval: Duration) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let tick = Closure::<dyn Fn()>::new(move || session.with_value(Session::keepalive));
    let millis = i32::try_from(interval.as_millis()).unwrap_or(i32::MAX);

    match window
        .set_interval_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), millis)
    {
        Ok(handle) => {
            let tick = SendWrapper::new(tick);
            on_cleanup(move || {
                if let Some(window) = web_sys::window() {
                    window.clear_interval_with_handle(handle);
                }
                drop(tick);
            });
        }
        Err(e) => {
            web_sys::console::error_1(&format!("Failed to start keep-alive timer: {e:?}").into());
        }
    }
}

/// Re-measure the input form and move the message window's bottom edge.
pub fn relayout(state: TerminalState) {
    let form = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(INPUT_FORM_ID))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());

    if let Some(form) = form {
        state.relayout(u32::try_from(form.offset_height()).unwrap_or(0));
    }
}

use lantern_core::models::{DisplayBlock, LogEntry};
use leptos::prelude::*;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::models::TerminalState;

/// Id of the scrolling message window.
const MESSAGE_WINDOW_ID: &str = "messagewindow";

type RafScrollRecord = (i32, Closure<dyn FnMut()>);

thread_local! {
    static RAF_SCROLL_REQUEST: RefCell<Option<RafScrollRecord>> = RefCell::new(None);
}

/// Scrollable display of the message log.
#[component]
pub fn OutputDisplay() -> impl IntoView {
    let state = use_context::<TerminalState>().expect("TerminalState context missing");

    // Jump to the newest block whenever the session asks for it
    Effect::new(move |_| {
        let _ = state.scroll_requests.get(); // Track requests
        schedule_scroll_to_bottom();
    });

    view! {
        <div
            class="output-display"
            id=MESSAGE_WINDOW_ID
            style:bottom=move || format!("{}px", state.message_bottom.get())
        >
            <For
                each=move || state.entries()
                key=|entry| entry.id
                children=move |entry| view! { <LogEntryView entry=entry /> }
            />
        </div>
    }
}

/// Renders a single log entry with its block's styling.
#[component]
fn LogEntryView(entry: LogEntry) -> impl IntoView {
    let css_class = entry.block.css_class();

    match entry.block {
        // Server text arrives as markup
        DisplayBlock::Message { text } => view! { <div class=css_class inner_html=text></div> }.into_any(),
        block => view! { <div class=css_class>{block.text()}</div> }.into_any(),
    }
}

/// Scroll the message window to the bottom after the next paint, replacing
/// any scroll already pending.
fn schedule_scroll_to_bottom() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let window_clone = window.clone();

    RAF_SCROLL_REQUEST.with(|cell| {
        if let Some((pending_id, _)) = cell.borrow_mut().take() {
            let _ = window.cancel_animation_frame(pending_id);
        }

        let scroll_closure: Closure<dyn FnMut()> = Closure::wrap(Box::new(move || {
            if let Some(container) = window_clone
                .document()
                .and_then(|d| d.get_element_by_id(MESSAGE_WINDOW_ID))
            {
                container.set_scroll_top(container.scroll_height());
            }

            RAF_SCROLL_REQUEST.with(|drop_cell| {
                drop_cell.borrow_mut().take();
            });
        }));

        if let Ok(request_id) = window.request_animation_frame(scroll_closure.as_ref().unchecked_ref()) {
            *cell.borrow_mut() = Some((request_id, scroll_closure));
        }
    });
}

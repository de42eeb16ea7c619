use lantern_core::input::{FieldMetrics, InputAutosize, InputField, KeyInput, KeyOutcome, TextMeasure};
use lantern_core::ClientConfig;
use leptos::html::{Div, Textarea};
use leptos::prelude::*;
use web_sys::{HtmlElement, HtmlTextAreaElement, KeyboardEvent};

use crate::app::Session;
use crate::components::terminal::relayout;
use crate::models::TerminalState;

/// Multi-line input field: Enter sends, arrows walk the history, and the
/// field grows with its content.
#[component]
pub fn CommandInput() -> impl IntoView {
    let state = use_context::<TerminalState>().expect("TerminalState context missing");
    let session = use_context::<StoredValue<Session>>().expect("Session context missing");
    let config = use_context::<ClientConfig>().expect("ClientConfig context missing");

    let input_ref = NodeRef::<Textarea>::new();
    let sizer_ref = NodeRef::<Div>::new();
    let autosize = StoredValue::new(InputAutosize::new(config.autosize));
    let initial_height = format!("{}px", config.autosize.min_height);

    // Auto-focus the input on mount
    Effect::new(move |_| {
        if let Some(input) = input_ref.get() {
            let _ = input.focus();
        }
    });

    let resize = move || {
        if let (Some(input), Some(sizer)) = (input_ref.get_untracked(), sizer_ref.get_untracked()) {
            resize_input(&input, &DomSizer(&sizer), autosize, state);
        }
    };

    let on_keydown = move |ev: KeyboardEvent| {
        let Some(input) = input_ref.get_untracked() else {
            return;
        };
        let key = classify_key(&ev);
        let caret = input
            .selection_start()
            .ok()
            .flatten()
            .and_then(|offset| usize::try_from(offset).ok())
            .unwrap_or(usize::MAX);
        let mut field = InputField::from_utf16_caret(input.value(), caret);

        let mut outcome = KeyOutcome::Passthrough;
        session.update_value(|s| outcome = s.handle_key(key, &mut field));

        if outcome.suppress_default() {
            ev.prevent_default();
        }

        if matches!(outcome, KeyOutcome::Submitted | KeyOutcome::Navigated) {
            input.set_value(field.value());
            resize();
        }
    };

    // A passed-through key has been applied by the time it is released
    let on_keyup = move |_: KeyboardEvent| {
        if let Some(input) = input_ref.get_untracked() {
            session.update_value(|s| {
                s.key_released(&input.value());
            });
        }
        resize();
    };

    // Paste and cut change the field without a key press
    let on_input = move |_: leptos::ev::Event| {
        if let Some(input) = input_ref.get_untracked() {
            session.update_value(|s| s.settle(&input.value()));
        }
        resize();
    };

    let on_send = move |_: leptos::ev::MouseEvent| {
        let Some(input) = input_ref.get_untracked() else {
            return;
        };
        let mut field = InputField::new(input.value());
        let mut outcome = KeyOutcome::Passthrough;
        session.update_value(|s| outcome = s.handle_key(KeyInput::Enter, &mut field));
        if outcome == KeyOutcome::Submitted {
            input.set_value(field.value());
            resize();
        }
        let _ = input.focus();
    };

    view! {
        <textarea
            id="inputfield"
            class="command-input"
            node_ref=input_ref
            style:height=initial_height
            on:keydown=on_keydown
            on:keyup=on_keyup
            on:input=on_input
            placeholder="Enter command..."
        ></textarea>
        <button id="inputsend" class="send-button" type="button" on:click=on_send>
            "Send"
        </button>
        <div id="inputsizer" class="input-sizer" node_ref=sizer_ref></div>
    }
}

/// Map a browser key event onto the keys the dispatcher distinguishes.
fn classify_key(ev: &KeyboardEvent) -> KeyInput {
    // Keys confirming an IME composition are not ours to handle
    if ev.is_composing() {
        return KeyInput::Other;
    }
    match ev.key().as_str() {
        "Enter" if ev.shift_key() || ev.ctrl_key() || ev.alt_key() || ev.meta_key() => {
            KeyInput::ModifiedEnter
        }
        "Enter" => KeyInput::Enter,
        "ArrowUp" => KeyInput::Up,
        "ArrowDown" => KeyInput::Down,
        _ => KeyInput::Other,
    }
}

/// Measures text in an offscreen element styled like the input field.
struct DomSizer<'a>(&'a HtmlElement);

impl TextMeasure for DomSizer<'_> {
    fn required_height(&self, text: &str, width: u32) -> u32 {
        let _ = self.0.style().set_property("width", &format!("{width}px"));
        self.0.set_text_content(Some(text));
        u32::try_from(self.0.scroll_height()).unwrap_or(0)
    }
}

fn resize_input(
    input: &HtmlTextAreaElement,
    sizer: &DomSizer<'_>,
    autosize: StoredValue<InputAutosize>,
    state: TerminalState,
) {
    let metrics = FieldMetrics {
        scroll_height: u32::try_from(input.scroll_height()).unwrap_or(0),
        client_height: u32::try_from(input.client_height()).unwrap_or(0),
        client_width: u32::try_from(input.client_width()).unwrap_or(0),
    };

    let text = input.value();
    let mut height = None;
    autosize.update_value(|a| height = a.adjust(&text, metrics, sizer));

    if let Some(height) = height {
        if let Err(e) = HtmlElement::style(input).set_property("height", &format!("{height}px")) {
            web_sys::console::warn_1(&format!("Failed to resize input: {e:?}").into());
            return;
        }
        relayout(state);
    }
}

use leptos::prelude::*;

use crate::models::TerminalState;

/// The server prompt; each new prompt replaces the previous one.
#[component]
pub fn PromptIndicator() -> impl IntoView {
    let state = use_context::<TerminalState>().expect("TerminalState context missing");

    view! {
        <div id="prompt" class="prompt-indicator" inner_html=move || state.prompt.get()></div>
    }
}

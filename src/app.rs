use lantern_core::{ClientConfig, ClientSession};
use leptos::prelude::*;

use crate::bridge::EvenniaBridge;
use crate::components::Terminal;
use crate::models::TerminalState;

/// The page's single client session, rendering into [`TerminalState`].
pub type Session = ClientSession<EvenniaBridge, TerminalState>;

/// Root application component that provides global context and mounts the Terminal.
#[component]
pub fn App() -> impl IntoView {
    let config = ClientConfig::default();
    let state = TerminalState::new(config.scrollback_capacity);
    let session: StoredValue<Session> =
        StoredValue::new(ClientSession::new(&config, EvenniaBridge, state));

    // Provide context to all child components
    provide_context(config);
    provide_context(state);
    provide_context(session);

    view! {
        <main class="app">
            <Terminal />
        </main>
    }
}

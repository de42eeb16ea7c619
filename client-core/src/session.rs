use crate::channel::MessagingChannel;
use crate::config::ClientConfig;
use crate::input::{InputDispatcher, InputField, KeyInput, KeyOutcome};
use crate::keepalive::send_keepalive;
use crate::models::{DisplayBlock, InboundEvent};
use crate::render::{ChannelRouter, DisplaySurface, Handler};
use crate::state::InputHistory;

/// One client session: input history and dispatch, inbound routing, the
/// messaging channel and the display surface.
///
/// All state is reached through `&mut self`, so events are handled one at a
/// time in the order the host delivers them.
pub struct ClientSession<C, D> {
    dispatcher: InputDispatcher,
    router: ChannelRouter<D>,
    channel: C,
    display: D,
    initialized: bool,
}

impl<C: MessagingChannel, D: DisplaySurface> ClientSession<C, D> {
    pub fn new(config: &ClientConfig, channel: C, display: D) -> Self {
        Self {
            dispatcher: InputDispatcher::new(InputHistory::new(config.history_capacity)),
            router: ChannelRouter::new(),
            channel,
            display,
            initialized: false,
        }
    }

    /// Start the channel and register the inbound handlers.
    ///
    /// Idempotent: a second call leaves the same handler set in place, so no
    /// event is ever delivered to two handlers. A channel failure is shown in
    /// the log and handlers are still registered.
    pub fn init(&mut self) {
        if let Err(e) = self.channel.init() {
            tracing::error!("Failed to initialize messaging channel: {}", e);
            self.report_error(e.to_string());
        }

        if self.initialized {
            tracing::debug!("Session already initialized");
            return;
        }
        self.router.register_standard();
        self.initialized = true;
        tracing::info!("Session initialized with channels: {:?}", self.router.channels());
    }

    /// Close the channel; call once when the host is going away.
    pub fn close(&mut self) {
        tracing::info!("Closing session");
        self.channel.close();
    }

    /// Raw key phase. A rejected directive is reported in the log and
    /// leaves the field and history as they were.
    pub fn handle_key(&mut self, key: KeyInput, field: &mut InputField) -> KeyOutcome {
        match self.dispatcher.handle_key(key, field, &self.channel) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.report_error(format!("Malformed directive: {e}"));
                KeyOutcome::Rejected
            }
        }
    }

    /// Key-up phase: record `value` if the released key passed through.
    pub fn key_released(&mut self, value: &str) -> bool {
        self.dispatcher.key_released(value)
    }

    /// Record an edit made without a key press (paste, cut).
    pub fn settle(&mut self, value: &str) {
        self.dispatcher.settle(value);
    }

    /// Route one inbound event to its handler.
    pub fn receive(&mut self, event: &InboundEvent) {
        tracing::debug!("Inbound event on channel {}", event.channel);
        self.router.route(&mut self.display, event);
    }

    /// Send the idle keep-alive, bypassing history.
    pub fn keepalive(&self) {
        send_keepalive(&self.channel);
    }

    /// Register an extra inbound handler, replacing any existing one.
    pub fn register(&mut self, channel: impl Into<String>, handler: Handler<D>) -> bool {
        self.router.register(channel, handler)
    }

    /// Deliver inbound events from `rx` until every sender is gone.
    #[cfg(feature = "native")]
    pub async fn drain_inbound(&mut self, rx: &mut tokio::sync::mpsc::UnboundedReceiver<InboundEvent>) {
        while let Some(event) = rx.recv().await {
            self.receive(&event);
        }
        tracing::info!("Inbound stream ended");
    }

    pub const fn history(&self) -> &InputHistory {
        self.dispatcher.history()
    }

    pub const fn router(&self) -> &ChannelRouter<D> {
        &self.router
    }

    pub const fn channel(&self) -> &C {
        &self.channel
    }

    pub const fn display(&self) -> &D {
        &self.display
    }

    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn report_error(&mut self, message: String) {
        self.display.append(DisplayBlock::Error { message });
        self.display.scroll_to_newest();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChannelError;
    use crate::models::OutboundMessage;
    use crate::state::Scrollback;
    use serde_json::{json, Map};
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakeChannel {
        sent: RefCell<Vec<OutboundMessage>>,
        inits: Cell<usize>,
        closes: Cell<usize>,
        fail_init: bool,
    }

    impl MessagingChannel for FakeChannel {
        fn init(&self) -> Result<(), ChannelError> {
            self.inits.set(self.inits.get() + 1);
            if self.fail_init {
                Err(ChannelError::Unavailable("no session object".to_string()))
            } else {
                Ok(())
            }
        }

        fn send(&self, message: OutboundMessage) {
            self.sent.borrow_mut().push(message);
        }

        fn close(&self) {
            self.closes.set(self.closes.get() + 1);
        }
    }

    fn session() -> ClientSession<FakeChannel, Scrollback> {
        ClientSession::new(
            &ClientConfig::default(),
            FakeChannel::default(),
            Scrollback::default(),
        )
    }

    #[test]
    fn test_init_twice_registers_same_handlers() {
        let mut once = session();
        once.init();
        let mut twice = session();
        twice.init();
        twice.init();

        assert_eq!(once.router().channels(), twice.router().channels());
        assert!(twice.is_initialized());
        assert_eq!(twice.channel().inits.get(), 2);

        twice.receive(&InboundEvent::new("text", vec![json!("hi")], Map::new()));
        assert_eq!(twice.display().len(), 1);
    }

    #[test]
    fn test_init_failure_is_reported() {
        let channel = FakeChannel {
            fail_init: true,
            ..FakeChannel::default()
        };
        let mut session = ClientSession::new(&ClientConfig::default(), channel, Scrollback::default());

        session.init();

        let last = session.display().last().unwrap();
        assert!(matches!(last.block, DisplayBlock::Error { .. }));
        assert!(last.block.text().contains("no session object"));
        assert!(session.router().is_registered("text"));
    }

    #[test]
    fn test_rejected_directive_renders_diagnostic() {
        let mut session = session();
        session.init();
        let mut field = InputField::new("##send look [1]");

        let outcome = session.handle_key(KeyInput::Enter, &mut field);

        assert_eq!(outcome, KeyOutcome::Rejected);
        assert!(outcome.suppress_default());
        assert_eq!(field.value(), "##send look [1]");
        assert!(session.channel().sent.borrow().is_empty());
        let last = session.display().last().unwrap();
        assert_eq!(last.block.css_class(), "msg err");
        assert!(last.block.text().starts_with("Malformed directive"));
    }

    #[test]
    fn test_keepalive_bypasses_history() {
        let session = session();
        session.keepalive();

        assert_eq!(
            session.channel().sent.borrow().as_slice(),
            &[OutboundMessage::text("idle")]
        );
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_close_reaches_channel() {
        let mut session = session();
        session.close();
        assert_eq!(session.channel().closes.get(), 1);
    }

    #[test]
    fn test_custom_handler() {
        fn vitals(display: &mut Scrollback, event: &InboundEvent) {
            display.set_prompt(format!("HP:{}", event.kwargs["hp"]));
        }

        let mut session = session();
        session.init();
        assert!(!session.register("vitals", vitals));

        let mut kwargs = Map::new();
        kwargs.insert("hp".to_string(), json!(7));
        session.receive(&InboundEvent::new("vitals", vec![], kwargs));

        assert_eq!(session.display().prompt().as_deref(), Some("HP:7"));
        assert!(session.display().is_empty());
    }

    #[cfg(feature = "native")]
    #[tokio::test]
    async fn test_drain_inbound_preserves_order() {
        let mut session = session();
        session.init();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        for text in ["one", "two", "three"] {
            tx.send(InboundEvent::new("text", vec![json!(text)], Map::new()))
                .unwrap();
        }
        drop(tx);

        session.drain_inbound(&mut rx).await;

        let texts: Vec<String> = session
            .display()
            .entries()
            .iter()
            .map(|e| e.block.text())
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }
}

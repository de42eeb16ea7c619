use lantern_core::models::{InboundEvent, OutboundMessage};
use lantern_core::{ChannelError, MessagingChannel};
use serde::Serialize;
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Evennia, js_name = init, catch)]
    fn evennia_init() -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = Evennia, js_name = msg, catch)]
    fn evennia_msg(cmdname: &str, args: &JsValue, kwargs: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["Evennia", "emitter"], js_name = on)]
    fn emitter_on(cmdname: &str, handler: &Closure<dyn Fn(JsValue, JsValue)>);

    #[wasm_bindgen(js_namespace = ["Evennia", "emitter"], js_name = on)]
    fn emitter_on_default(cmdname: &str, handler: &Closure<dyn Fn(JsValue, JsValue, JsValue)>);

    #[wasm_bindgen(js_namespace = ["Evennia", "connection"], js_name = close, catch)]
    fn connection_close() -> Result<(), JsValue>;
}

/// Channel name the Evennia emitter uses for unregistered messages.
const DEFAULT_ROUTE: &str = "default";

/// Messaging channel backed by the page's `window.Evennia` object.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvenniaBridge;

impl EvenniaBridge {
    fn is_loaded() -> bool {
        js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("Evennia")).unwrap_or(false)
    }

    /// Forward inbound messages on `channels`, plus everything the emitter
    /// routes to its default handler, to `on_event`.
    pub fn subscribe(channels: &[String], on_event: impl Fn(InboundEvent) + Clone + 'static) {
        if !Self::is_loaded() {
            web_sys::console::error_1(&"Cannot subscribe: Evennia library not loaded".into());
            return;
        }

        for channel in channels {
            let name = channel.clone();
            let forward = on_event.clone();
            let handler = Closure::new(move |args: JsValue, kwargs: JsValue| {
                forward(decode_event(&name, &args, &kwargs));
            });
            emitter_on(channel, &handler);
            // Keep the closure alive
            handler.forget();
        }

        let default_handler = Closure::new(move |cmdname: JsValue, args: JsValue, kwargs: JsValue| {
            let name = cmdname.as_string().unwrap_or_default();
            on_event(decode_event(&name, &args, &kwargs));
        });
        emitter_on_default(DEFAULT_ROUTE, &default_handler);
        default_handler.forget();
    }
}

impl MessagingChannel for EvenniaBridge {
    fn init(&self) -> Result<(), ChannelError> {
        if !Self::is_loaded() {
            return Err(ChannelError::Unavailable(
                "Evennia library not loaded".to_string(),
            ));
        }
        evennia_init().map_err(|e| ChannelError::Unavailable(format!("Evennia.init failed: {e:?}")))
    }

    fn send(&self, message: OutboundMessage) {
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let encoded = message.args.serialize(&serializer).and_then(|args| {
            let kwargs = message.kwargs.serialize(&serializer)?;
            Ok((args, kwargs))
        });

        match encoded {
            Ok((args, kwargs)) => {
                if let Err(e) = evennia_msg(&message.channel, &args, &kwargs) {
                    web_sys::console::error_1(
                        &format!("Evennia.msg failed for {}: {e:?}", message.channel).into(),
                    );
                }
            }
            Err(e) => {
                web_sys::console::error_1(
                    &format!("Failed to serialize {} message: {e}", message.channel).into(),
                );
            }
        }
    }

    fn close(&self) {
        if let Err(e) = connection_close() {
            web_sys::console::warn_1(&format!("Evennia connection close failed: {e:?}").into());
        }
    }
}

/// Convert emitter arguments into an event; missing containers become empty.
fn decode_event(channel: &str, args: &JsValue, kwargs: &JsValue) -> InboundEvent {
    let args: Vec<Value> = if args.is_undefined() || args.is_null() {
        Vec::new()
    } else {
        serde_wasm_bindgen::from_value(args.clone()).unwrap_or_else(|e| {
            web_sys::console::error_1(&format!("Failed to parse {channel} args: {e}").into());
            Vec::new()
        })
    };

    let kwargs: Map<String, Value> = if kwargs.is_undefined() || kwargs.is_null() {
        Map::new()
    } else {
        serde_wasm_bindgen::from_value(kwargs.clone()).unwrap_or_else(|e| {
            web_sys::console::error_1(&format!("Failed to parse {channel} kwargs: {e}").into());
            Map::new()
        })
    };

    InboundEvent::new(channel, args, kwargs)
}

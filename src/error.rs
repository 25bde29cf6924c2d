//! Error type shared by the config loader and the page adapters

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("missing element #{0}")]
    MissingElement(String),
    #[error("element #{0} is not an HTML element")]
    WrongElementType(String),
    #[error("javascript error: {0}")]
    Js(String),
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for WidgetError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        WidgetError::Js(format!("{:?}", value))
    }
}

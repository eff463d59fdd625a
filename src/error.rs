use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures while attaching a component to the page. Components that hit one
/// degrade to doing nothing; exported constructors surface it to JS.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("2d canvas context unavailable")]
    NoContext,
    #[error("js error: {0}")]
    Js(String),
}

impl SetupError {
    pub fn js(err: JsValue) -> Self {
        Self::Js(
            err.as_string()
                .unwrap_or_else(|| format!("{:?}", err)),
        )
    }
}

impl From<SetupError> for JsValue {
    fn from(err: SetupError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

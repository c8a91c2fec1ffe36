//! htmx response helpers.

use axum::{
    http::{HeaderName, HeaderValue},
    response::{Html, IntoResponse, IntoResponseParts, Response, ResponseParts},
};
use axum_htmx::{HX_TRIGGER, HX_TRIGGER_AFTER_SETTLE, HX_TRIGGER_AFTER_SWAP};
use serde_json::{Map, Value};

/// A piece of HTML meant to be swapped into a page, not a whole document.
#[derive(Debug, Clone)]
pub struct HtmlFragment<T>(pub T);

impl<T: Into<String>> IntoResponse for HtmlFragment<T> {
    fn into_response(self) -> Response {
        Html(self.0.into()).into_response()
    }
}

/// Events htmx dispatches on the client when the response arrives.
///
/// ```rust,ignore
/// (
///     StatusCode::OK,
///     HxTriggerEvents::new()
///         .event_with_data("closeModal", json!(true))
///         .event_with_data("monsterCreated", json!(monster.id)),
///     (),
/// )
/// ```
///
/// Names only are sent as `a, b`; as soon as one event has data the header
/// becomes a JSON object, e.g. `{"closeModal":true,"monsterCreated":7}`.
#[derive(Debug, Clone, Default)]
pub struct HxTriggerEvents {
    events: Vec<(String, Option<Value>)>,
    timing: TriggerTiming,
}

/// Which trigger header carries the events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriggerTiming {
    /// `HX-Trigger`: as soon as the response is received
    #[default]
    Immediate,
    /// `HX-Trigger-After-Settle`
    AfterSettle,
    /// `HX-Trigger-After-Swap`
    AfterSwap,
}

impl TriggerTiming {
    fn header(self) -> HeaderName {
        match self {
            Self::Immediate => HX_TRIGGER,
            Self::AfterSettle => HX_TRIGGER_AFTER_SETTLE,
            Self::AfterSwap => HX_TRIGGER_AFTER_SWAP,
        }
    }
}

impl HxTriggerEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn timing(mut self, timing: TriggerTiming) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub fn event(mut self, name: impl Into<String>) -> Self {
        self.events.push((name.into(), None));
        self
    }

    /// `data` becomes `event.detail` on the client
    #[must_use]
    pub fn event_with_data(mut self, name: impl Into<String>, data: Value) -> Self {
        self.events.push((name.into(), Some(data)));
        self
    }

    fn header_value(&self) -> String {
        if self.events.iter().all(|(_, data)| data.is_none()) {
            let names: Vec<&str> = self.events.iter().map(|(name, _)| name.as_str()).collect();
            return names.join(", ");
        }

        let object: Map<String, Value> = self
            .events
            .iter()
            .map(|(name, data)| (name.clone(), data.clone().unwrap_or(Value::Null)))
            .collect();
        Value::Object(object).to_string()
    }
}

impl IntoResponseParts for HxTriggerEvents {
    type Error = std::convert::Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if !self.events.is_empty() {
            match HeaderValue::from_str(&self.header_value()) {
                Ok(value) => {
                    res.headers_mut().insert(self.timing.header(), value);
                }
                Err(e) => tracing::warn!("Dropping unencodable trigger header: {}", e),
            }
        }
        Ok(res)
    }
}

/// Escape text for use in HTML content and quoted attributes.
#[must_use]
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

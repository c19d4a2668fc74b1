// Per-subtype field schemas for the property panel

use once_cell::sync::Lazy;
use serde_json::{Number, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    MultilineText,
    Number,
    Toggle,
    /// One of the descriptor's `options`.
    Select,
}

/// A typed field value, as shown and edited in the property panel.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Toggle(bool),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// JSON form stored in the node config. Whole numbers are stored as
    /// integers; non-finite numbers have no JSON form.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            FieldValue::Text(text) => Some(Value::String(text.clone())),
            FieldValue::Toggle(flag) => Some(Value::Bool(*flag)),
            FieldValue::Number(n) if n.is_finite() => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    Some(Value::Number(Number::from(*n as i64)))
                } else {
                    Number::from_f64(*n).map(Value::Number)
                }
            }
            FieldValue::Number(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub options: &'static [&'static str],
}

impl FieldDescriptor {
    const fn new(
        key: &'static str,
        label: &'static str,
        kind: FieldKind,
    ) -> Self {
        Self {
            key,
            label,
            kind,
            options: &[],
        }
    }

    const fn select(
        key: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Select,
            options,
        }
    }

    pub fn default_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::Text | FieldKind::MultilineText => {
                FieldValue::Text(String::new())
            }
            FieldKind::Select => FieldValue::Text(
                self.options.first().copied().unwrap_or_default().to_owned(),
            ),
            FieldKind::Number => FieldValue::Number(0.0),
            FieldKind::Toggle => FieldValue::Toggle(false),
        }
    }

    /// Coerce a raw config value to this field's kind. Missing values and
    /// values of the wrong JSON type read as the kind's default.
    pub fn read(&self, raw: Option<&Value>) -> FieldValue {
        match (self.kind, raw) {
            (
                FieldKind::Text | FieldKind::MultilineText | FieldKind::Select,
                Some(Value::String(text)),
            ) => FieldValue::Text(text.clone()),
            (FieldKind::Number, Some(Value::Number(n))) => {
                n.as_f64().map_or_else(|| self.default_value(), FieldValue::Number)
            }
            (FieldKind::Toggle, Some(Value::Bool(flag))) => {
                FieldValue::Toggle(*flag)
            }
            _ => self.default_value(),
        }
    }

    /// Whether `value` is a legal value for this field.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self.kind, value) {
            (FieldKind::Text | FieldKind::MultilineText, FieldValue::Text(_)) => true,
            (FieldKind::Select, FieldValue::Text(choice)) => {
                self.options.contains(&choice.as_str())
            }
            (FieldKind::Number, FieldValue::Number(n)) => n.is_finite(),
            (FieldKind::Toggle, FieldValue::Toggle(_)) => true,
            _ => false,
        }
    }
}

use FieldKind::{MultilineText, Number as NumberField, Text, Toggle};

const LLM_MODELS: &[&str] =
    &["gpt-4o", "gpt-4o-mini", "claude-3-5-sonnet", "qwen-max"];
const TTS_VOICES: &[&str] = &["female_warm", "male_calm", "female_bright"];
const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE"];
const INPUT_TYPES: &[&str] = &["speech", "dtmf"];
const TRANSFER_MODES: &[&str] = &["blind", "warm"];
const HANGUP_REASONS: &[&str] =
    &["completed", "no_answer", "user_request", "error"];

static SCHEMAS: Lazy<HashMap<&'static str, Vec<FieldDescriptor>>> =
    Lazy::new(|| {
        HashMap::from([
            (
                "inbound_call",
                vec![
                    FieldDescriptor::new("phone_number", "Phone number", Text),
                    FieldDescriptor::new(
                        "greeting_delay_ms",
                        "Greeting delay (ms)",
                        NumberField,
                    ),
                ],
            ),
            (
                "outbound_campaign",
                vec![
                    FieldDescriptor::new("campaign_id", "Campaign", Text),
                    FieldDescriptor::new("max_attempts", "Max attempts", NumberField),
                    FieldDescriptor::new(
                        "retry_interval_min",
                        "Retry interval (min)",
                        NumberField,
                    ),
                ],
            ),
            (
                "llm_agent",
                vec![
                    FieldDescriptor::select("model", "Model", LLM_MODELS),
                    FieldDescriptor::new("system_prompt", "System prompt", MultilineText),
                    FieldDescriptor::new("temperature", "Temperature", NumberField),
                    FieldDescriptor::new("allow_interrupt", "Allow barge-in", Toggle),
                ],
            ),
            (
                "intent_classifier",
                vec![
                    FieldDescriptor::new("intents", "Intents (one per line)", MultilineText),
                    FieldDescriptor::new(
                        "confidence_threshold",
                        "Confidence threshold",
                        NumberField,
                    ),
                ],
            ),
            (
                "regex_match",
                vec![
                    FieldDescriptor::new("variable", "Variable", Text),
                    FieldDescriptor::new("pattern", "Pattern", Text),
                    FieldDescriptor::new("case_sensitive", "Case sensitive", Toggle),
                ],
            ),
            (
                "condition",
                vec![FieldDescriptor::new("expression", "Expression", Text)],
            ),
            (
                "wait",
                vec![FieldDescriptor::new("duration_ms", "Duration (ms)", NumberField)],
            ),
            (
                "play_tts",
                vec![
                    FieldDescriptor::new("text", "Text", MultilineText),
                    FieldDescriptor::select("voice", "Voice", TTS_VOICES),
                    FieldDescriptor::new("speed", "Speed", NumberField),
                    FieldDescriptor::new("interruptible", "Interruptible", Toggle),
                ],
            ),
            (
                "collect_input",
                vec![
                    FieldDescriptor::select("input_type", "Input", INPUT_TYPES),
                    FieldDescriptor::new("timeout_ms", "Timeout (ms)", NumberField),
                    FieldDescriptor::new("max_digits", "Max digits", NumberField),
                    FieldDescriptor::new("save_to", "Save to variable", Text),
                ],
            ),
            (
                "http_request",
                vec![
                    FieldDescriptor::select("method", "Method", HTTP_METHODS),
                    FieldDescriptor::new("url", "URL", Text),
                    FieldDescriptor::new("headers", "Headers", MultilineText),
                    FieldDescriptor::new("body", "Body", MultilineText),
                    FieldDescriptor::new("timeout_ms", "Timeout (ms)", NumberField),
                    FieldDescriptor::new("save_to", "Save response to", Text),
                ],
            ),
            (
                "transfer",
                vec![
                    FieldDescriptor::new("target_number", "Target number", Text),
                    FieldDescriptor::select("mode", "Mode", TRANSFER_MODES),
                    FieldDescriptor::new("announce", "Announce caller", Toggle),
                ],
            ),
            (
                "hangup",
                vec![FieldDescriptor::select("reason", "Reason", HANGUP_REASONS)],
            ),
            (
                "send_sms",
                vec![
                    FieldDescriptor::new("to", "Recipient", Text),
                    FieldDescriptor::new("template", "Template", MultilineText),
                ],
            ),
            (
                "set_variable",
                vec![
                    FieldDescriptor::new("variable", "Variable", Text),
                    FieldDescriptor::new("value", "Value", Text),
                ],
            ),
            (
                "knowledge_lookup",
                vec![
                    FieldDescriptor::new("knowledge_base", "Knowledge base", Text),
                    FieldDescriptor::new("query", "Query", MultilineText),
                    FieldDescriptor::new("top_k", "Top K", NumberField),
                    FieldDescriptor::new("save_to", "Save to variable", Text),
                ],
            ),
        ])
    });

/// Ordered field list for a subtype. Unknown subtypes have no fields.
pub fn fields_for(sub_type: &str) -> &'static [FieldDescriptor] {
    SCHEMAS
        .get(sub_type)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

pub fn field(sub_type: &str, key: &str) -> Option<&'static FieldDescriptor> {
    fields_for(sub_type).iter().find(|field| field.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_subtype_has_no_fields() {
        assert!(fields_for("teleport").is_empty());
        assert!(field("teleport", "url").is_none());
    }

    #[test]
    fn field_order_is_stable() {
        let keys: Vec<_> = fields_for("http_request").iter().map(|f| f.key).collect();
        assert_eq!(keys, ["method", "url", "headers", "body", "timeout_ms", "save_to"]);
    }

    #[test]
    fn read_coerces_by_kind() {
        let timeout = field("http_request", "timeout_ms").expect("known field");
        assert_eq!(timeout.read(Some(&json!(3000))), FieldValue::Number(3000.0));
        assert_eq!(timeout.read(Some(&json!("soon"))), FieldValue::Number(0.0));
        assert_eq!(timeout.read(None), FieldValue::Number(0.0));

        let method = field("http_request", "method").expect("known field");
        assert_eq!(method.read(None), FieldValue::Text("GET".into()));
        assert_eq!(method.read(Some(&json!("POST"))), FieldValue::Text("POST".into()));

        let announce = field("transfer", "announce").expect("known field");
        assert_eq!(announce.read(Some(&json!(true))), FieldValue::Toggle(true));
    }

    #[test]
    fn accepts_checks_kind_and_options() {
        let method = field("http_request", "method").expect("known field");
        assert!(method.accepts(&FieldValue::Text("PUT".into())));
        assert!(!method.accepts(&FieldValue::Text("PATCH".into())));
        assert!(!method.accepts(&FieldValue::Number(1.0)));

        let speed = field("play_tts", "speed").expect("known field");
        assert!(speed.accepts(&FieldValue::Number(1.25)));
        assert!(!speed.accepts(&FieldValue::Number(f64::NAN)));
    }

    #[test]
    fn whole_numbers_serialize_as_integers() {
        assert_eq!(FieldValue::Number(5.0).to_json(), Some(json!(5)));
        assert_eq!(FieldValue::Number(0.7).to_json(), Some(json!(0.7)));
        assert_eq!(FieldValue::Number(f64::INFINITY).to_json(), None);
    }
}

use crate::graph::{NodeConfig, NodeKind};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Icon drawn for subtypes the catalog does not know.
pub const FALLBACK_ICON: &str = "❔";

/// One node template offered by the palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub kind: NodeKind,
    pub sub_type: String,
    pub label: String,
    #[serde(default)]
    pub default_config: NodeConfig,
    #[serde(default)]
    pub icon_ref: String,
    #[serde(default)]
    pub tooltip_text: String,
    /// Named outputs of a branching node, e.g. `matched` / `unmatched`.
    #[serde(default)]
    pub branches: Vec<String>,
}

/// How a node is drawn, resolved from its subtype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeAppearance<'a> {
    pub icon: &'a str,
    pub known: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeCatalog {
    entries: Vec<CatalogEntry>,
}

impl NodeCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, sub_type: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.sub_type == sub_type)
    }

    pub fn by_kind(
        &self,
        kind: NodeKind,
    ) -> impl Iterator<Item = &CatalogEntry> + '_ {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }

    pub fn branches(&self, sub_type: &str) -> &[String] {
        self.get(sub_type)
            .map(|entry| entry.branches.as_slice())
            .unwrap_or_default()
    }

    pub fn appearance(&self, sub_type: &str) -> NodeAppearance<'_> {
        match self.get(sub_type) {
            Some(entry) if !entry.icon_ref.is_empty() => NodeAppearance {
                icon: &entry.icon_ref,
                known: true,
            },
            Some(_) => NodeAppearance {
                icon: FALLBACK_ICON,
                known: true,
            },
            None => NodeAppearance {
                icon: FALLBACK_ICON,
                known: false,
            },
        }
    }

    /// The voice-bot node set shipped with the editor.
    pub fn builtin() -> Self {
        use NodeKind::*;

        let entries = vec![
            entry(
                Trigger,
                "inbound_call",
                "Inbound call",
                "📞",
                "Starts the flow when a call reaches the bot's number.",
                json!({ "phone_number": "", "greeting_delay_ms": 0 }),
                &[],
            ),
            entry(
                Trigger,
                "outbound_campaign",
                "Outbound campaign",
                "📣",
                "Starts the flow for each contact dialled by a campaign.",
                json!({
                    "campaign_id": "",
                    "max_attempts": 3,
                    "retry_interval_min": 30
                }),
                &[],
            ),
            entry(
                Agent,
                "llm_agent",
                "LLM agent",
                "🤖",
                "Hands the conversation to a language model.",
                json!({
                    "model": "gpt-4o",
                    "system_prompt": "",
                    "temperature": 0.7,
                    "allow_interrupt": true
                }),
                &[],
            ),
            entry(
                Agent,
                "intent_classifier",
                "Intent classifier",
                "🧭",
                "Classifies the caller's utterance into an intent.",
                json!({ "intents": "", "confidence_threshold": 0.6 }),
                &["matched", "fallback"],
            ),
            entry(
                Logic,
                "regex_match",
                "Regex match",
                "🔎",
                "Tests a variable against a regular expression.",
                json!({ "variable": "", "pattern": "", "case_sensitive": false }),
                &["matched", "unmatched"],
            ),
            entry(
                Logic,
                "condition",
                "Condition",
                "🔀",
                "Branches on a boolean expression.",
                json!({ "expression": "" }),
                &["true", "false"],
            ),
            entry(
                Logic,
                "wait",
                "Wait",
                "⏱",
                "Pauses the flow.",
                json!({ "duration_ms": 1000 }),
                &[],
            ),
            entry(
                Action,
                "play_tts",
                "Speak",
                "🔊",
                "Plays synthesized speech to the caller.",
                json!({
                    "text": "",
                    "voice": "female_warm",
                    "speed": 1,
                    "interruptible": true
                }),
                &[],
            ),
            entry(
                Action,
                "collect_input",
                "Collect input",
                "🎤",
                "Listens for speech or keypad digits.",
                json!({
                    "input_type": "speech",
                    "timeout_ms": 5000,
                    "max_digits": 0,
                    "save_to": ""
                }),
                &["received", "timeout"],
            ),
            entry(
                Action,
                "http_request",
                "HTTP request",
                "🌐",
                "Calls an external HTTP endpoint.",
                json!({
                    "method": "GET",
                    "url": "",
                    "headers": "",
                    "body": "",
                    "timeout_ms": 3000,
                    "save_to": ""
                }),
                &["success", "failure"],
            ),
            entry(
                Action,
                "transfer",
                "Transfer",
                "↪",
                "Transfers the call to a human or another number.",
                json!({ "target_number": "", "mode": "blind", "announce": false }),
                &[],
            ),
            entry(
                Action,
                "hangup",
                "Hang up",
                "⛔",
                "Ends the call.",
                json!({ "reason": "completed" }),
                &[],
            ),
            entry(
                Action,
                "send_sms",
                "Send SMS",
                "✉",
                "Sends a text message.",
                json!({ "to": "", "template": "" }),
                &[],
            ),
            entry(
                Data,
                "set_variable",
                "Set variable",
                "📝",
                "Assigns a value to a flow variable.",
                json!({ "variable": "", "value": "" }),
                &[],
            ),
            entry(
                Data,
                "knowledge_lookup",
                "Knowledge lookup",
                "📚",
                "Retrieves passages from a knowledge base.",
                json!({
                    "knowledge_base": "",
                    "query": "",
                    "top_k": 3,
                    "save_to": ""
                }),
                &[],
            ),
        ];

        Self::new(entries)
    }
}

fn entry(
    kind: NodeKind,
    sub_type: &str,
    label: &str,
    icon: &str,
    tooltip: &str,
    default_config: Value,
    branches: &[&str],
) -> CatalogEntry {
    CatalogEntry {
        kind,
        sub_type: sub_type.to_owned(),
        label: label.to_owned(),
        default_config: match default_config {
            Value::Object(map) => map,
            _ => NodeConfig::new(),
        },
        icon_ref: icon.to_owned(),
        tooltip_text: tooltip.to_owned(),
        branches: branches.iter().map(|b| (*b).to_owned()).collect(),
    }
}

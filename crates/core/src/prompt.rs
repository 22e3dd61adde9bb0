use crate::models::{DirectionInfo, IntentRecord, Place};

pub const INTENT_FIELD_ORDER: [&str; 9] = [
    "intent",
    "query",
    "store_name",
    "location",
    "address",
    "origin",
    "destination",
    "raw_response",
    "needs_origin",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn classification(&self, message: &str) -> String {
        format!(
            r#"You are an AI assistant that turns user messages about places, directions, or recommendations into structured data.
Return one valid JSON object describing the user's intent so it can drive further automation.

OUTPUT FORMAT (JSON only):
{{
  "intent": "<one of: store_locator, map_place_search, place_recommendation, direction_request, general>",
  "query": "<what the user is looking for, e.g. 'coffee shop', 'nearest ATM'>",
  "store_name": "<store name if mentioned, e.g. 'Lotte Mart'>",
  "location": "<general area such as 'Bekasi', 'Jakarta', 'South Korea'>",
  "address": "<full address if mentioned>",
  "origin": "<starting point for direction_request; empty if unclear or vague like 'my place', 'from here', 'tempat gw'>",
  "destination": "<destination for direction_request; if store_name is filled and destination is missing, use store_name>",
  "raw_response": "<the user's original message, repeated exactly>",
  "needs_origin": <true | false>
}}

RULES:
- Output valid JSON only. No Markdown, no code fences, no explanation.
- Include every field, in exactly this order: {order}.
- Always use double quotes for string values.
- When a field is unknown or not applicable, use the empty string "".
- "needs_origin" may be true only when intent is "direction_request" and the origin is vague or missing.
- For "direction_request":
  - a vague origin (e.g. 'my place', 'tempat gw', 'from here') means "origin" = "" and "needs_origin" = true.
  - an empty destination with a filled store_name means the store_name is the destination.

Now read the user message and return only the JSON object:

User: "{message}"
"#,
            order = INTENT_FIELD_ORDER.join(", "),
            message = message,
        )
    }

    pub fn scope_limited_reply(&self, message: &str) -> String {
        format!(
            "You are a helpful assistant specialized in location-related tasks. \
             The user said: \"{message}\". \
             Reply naturally, but only explain what you can do related to places, store locator, map searches, and directions. \
             Do not mention setting reminders, sending emails, or other general assistant tasks."
        )
    }

    pub fn ask_for_origin(&self, record: &IntentRecord) -> String {
        format!(
            r#"You are a friendly AI assistant that helps users with directions. The user asked for directions but did not clearly say where they are starting from.

Write a natural-sounding follow-up message asking the user for their starting location.

The user's original message:
"{message}"

Keep it friendly and casual, for example:
"Sure, I can help! Just let me know where you're starting from, like 'Galaxy Bekasi' or 'my office'."

Output format: plain text only (no JSON, no markdown).
"#,
            message = record.raw_response,
        )
    }

    pub fn summarize_places(&self, record: &IntentRecord, places: &[Place]) -> String {
        format!(
            r#"You are a helpful assistant. Write a friendly, natural reply for the user based on structured location data.

User intent: {intent}
Structured query: {record}
Places retrieved from Google Maps: {places}

Instructions:
- Show ALL of the places listed (there are at most 5).
- Use a friendly and helpful tone.
- For each place mention its name, its address, and the clickable link from the "maps_url" field.
- Number the list (1., 2., etc.).
- Always thank the user at the end.

Output plain text only (no markdown or JSON).

Now write your answer:
"#,
            intent = record.intent.as_str(),
            record = to_context_json(record),
            places = to_context_json(&places),
        )
    }

    pub fn describe_route(&self, record: &IntentRecord, directions: &DirectionInfo) -> String {
        format!(
            r#"You are a helpful assistant. Write a friendly and clear reply based on Google Maps directions.

User query: {message}
Directions data: {directions}

Instructions:
- Mention the start and end address clearly.
- State the distance and the estimated travel time.
- Mention the route summary (e.g. via Toll XYZ).
- End with a friendly wish such as "Have a safe trip!" followed by the clickable link from the "maps_url" field.

Output plain text only (no markdown or JSON).
"#,
            message = record.raw_response,
            directions = to_context_json(directions),
        )
    }
}

fn to_context_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

//! Serialization and deserialization for [BuildingState] and [Command] payloads

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use crate::world_view::{BuildingState, Command};

/// Parses a building state from a response body.
///
/// Keys the server leaves out (`elevators`, `requests`, `buttons_pressed`) come back empty.
///
/// ## Parameters
/// - `body`: The raw JSON response text.
///
/// ## Returns
/// - The parsed [BuildingState], or the `serde_json` error describing what was wrong.
pub fn deserialize_building_state(body: &str) -> serde_json::Result<BuildingState> {
    serde_json::from_str(body)
}

/// Builds the body for a command round.
///
/// The server expects commands keyed by elevator id:
/// `{"token": "...", "commands": {"0": {"speed": 1, "direction": -1}}}`.
/// An empty command list is valid and only fetches the state; the clock does not advance.
pub fn serialize_commands(token: &str, commands: &[Command]) -> Value {
    let command_map: BTreeMap<String, Value> = commands
        .iter()
        .map(|cmd| {
            (
                cmd.id.to_string(),
                json!({"speed": cmd.speed as u8, "direction": cmd.direction as i8}),
            )
        })
        .collect();

    json!({
        "token": token,
        "commands": command_map,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Number(u8),
    Text(String),
}

/// Reads an elevator id given either as a number or as a numeric string.
///
/// The server documents ids as strings (`"0"`, `"1"`, ...) but sends numbers in practice.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr: Option<IdRepr> = Option::deserialize(deserializer)?;
    match repr {
        None => Ok(None),
        Some(IdRepr::Number(id)) => Ok(Some(id)),
        Some(IdRepr::Text(text)) => text
            .trim()
            .parse::<u8>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("elevator id {:?}: {}", text, e))),
    }
}

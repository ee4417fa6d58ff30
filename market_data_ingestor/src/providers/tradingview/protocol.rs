//! Wire framing of the chart websocket.
//!
//! Each packet is `~m~<len>~m~<payload>` and one websocket text message may
//! carry several packets back to back. Payloads are either heartbeats
//! (`~h~<n>`, which must be echoed) or JSON. Method calls look like
//! `{"m": "<method>", "p": [..params]}`.

use serde_json::{Value, json};

const MARKER: &str = "~m~";
const HEARTBEAT: &str = "~h~";

/// One decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// Heartbeat payload, echoed verbatim.
    Heartbeat(String),
    /// A method call from the server.
    Message(Message),
    /// Anything else: the session banner, or a payload that is not JSON.
    Other(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub method: String,
    pub params: Vec<Value>,
}

/// Wraps a payload in the packet header.
pub fn frame(payload: &str) -> String {
    format!("{MARKER}{}{MARKER}{payload}", payload.len())
}

/// Frames a method call.
pub fn encode_message(method: &str, params: Vec<Value>) -> String {
    frame(&json!({ "m": method, "p": params }).to_string())
}

/// Byte length of a `~m~<digits>~m~` header at the start of `s`.
fn header_len(s: &str) -> Option<usize> {
    let rest = s.strip_prefix(MARKER)?;
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    rest[digits..]
        .starts_with(MARKER)
        .then_some(MARKER.len() * 2 + digits)
}

/// Splits a raw websocket message into packet payloads.
///
/// Payload boundaries come from the next header rather than the declared
/// length, because the server counts UTF-16 units and symbol descriptions
/// are not always ASCII.
pub fn split_payloads(raw: &str) -> Vec<&str> {
    let mut payloads = Vec::new();
    let mut rest = raw;
    while let Some(header) = header_len(rest) {
        let body = &rest[header..];
        let end = body
            .match_indices(MARKER)
            .map(|(i, _)| i)
            .find(|&i| header_len(&body[i..]).is_some())
            .unwrap_or(body.len());
        payloads.push(&body[..end]);
        rest = &body[end..];
    }
    payloads
}

fn decode_payload(payload: &str) -> Packet {
    if payload.starts_with(HEARTBEAT) {
        return Packet::Heartbeat(payload.to_string());
    }
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(mut obj)) if obj.get("m").is_some_and(Value::is_string) => {
            let method = obj
                .remove("m")
                .and_then(|m| m.as_str().map(str::to_owned))
                .unwrap_or_default();
            let params = match obj.remove("p") {
                Some(Value::Array(params)) => params,
                _ => Vec::new(),
            };
            Packet::Message(Message { method, params })
        }
        Ok(other) => Packet::Other(other),
        Err(_) => Packet::Other(Value::String(payload.to_string())),
    }
}

/// Decodes every packet carried by one websocket message.
pub fn parse_packets(raw: &str) -> Vec<Packet> {
    split_payloads(raw).into_iter().map(decode_payload).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_with_length_prefix() {
        assert_eq!(frame("~h~7"), "~m~4~m~~h~7");
        assert_eq!(
            encode_message("set_auth_token", vec![json!("unauthorized_user_token")]),
            r#"~m~54~m~{"m":"set_auth_token","p":["unauthorized_user_token"]}"#
        );
    }

    #[test]
    fn splits_concatenated_packets() {
        let raw = r#"~m~4~m~~h~1~m~23~m~{"m":"x","p":["a","b"]}"#;
        assert_eq!(split_payloads(raw), vec!["~h~1", r#"{"m":"x","p":["a","b"]}"#]);
    }

    #[test]
    fn tilde_inside_payload_is_not_a_boundary() {
        let raw = r#"~m~21~m~{"m":"a","p":["~m~"]}"#;
        assert_eq!(split_payloads(raw).len(), 1);
    }

    #[test]
    fn decodes_packet_kinds() {
        let raw = concat!(
            r#"~m~47~m~{"session_id":"<0.1.2>","timestamp":1700000000}"#,
            "~m~5~m~~h~42",
            r#"~m~52~m~{"m":"series_completed","p":["cs_abc","sds_1","s1"]}"#,
        );
        let packets = parse_packets(raw);
        assert_eq!(packets.len(), 3);
        assert!(matches!(packets[0], Packet::Other(Value::Object(_))));
        assert_eq!(packets[1], Packet::Heartbeat("~h~42".to_string()));
        match &packets[2] {
            Packet::Message(msg) => {
                assert_eq!(msg.method, "series_completed");
                assert_eq!(msg.params.len(), 3);
            }
            other => panic!("expected message, got {other:?}"),
        }
    }

    #[test]
    fn garbage_without_header_yields_nothing() {
        assert!(parse_packets("hello").is_empty());
    }
}

//! Client frame vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use matchwire_core::protocol::client::ClientFrame;

fn load(name: &str) -> String {
    fs::read_to_string(format!("tests/vectors/{name}")).unwrap()
}

#[test]
fn parse_chat_message_defaults_message_type() {
    let frame: ClientFrame = serde_json::from_str(&load("chat_message.json")).unwrap();
    match frame {
        ClientFrame::ChatMessage {
            match_id,
            content,
            message_type,
        } => {
            assert_eq!(match_id.as_str(), "match-7f3a");
            assert_eq!(content, "hey, how was the concert?");
            // client-side timestamp field is ignored, message_type defaulted
            assert_eq!(message_type, "text");
        }
        other => panic!("wrong variant: {other:?}"),
    }
}

#[test]
fn parse_chat_message_explicit_message_type() {
    let frame: ClientFrame = serde_json::from_str(&load("chat_message_image.json")).unwrap();
    match frame {
        ClientFrame::ChatMessage { message_type, .. } => assert_eq!(message_type, "image"),
        other => panic!("wrong variant: {other:?}"),
    }
}

#[test]
fn parse_typing() {
    let frame: ClientFrame = serde_json::from_str(&load("typing.json")).unwrap();
    match frame {
        ClientFrame::Typing {
            match_id,
            is_typing,
        } => {
            assert_eq!(match_id.as_str(), "match-7f3a");
            assert!(is_typing);
        }
        other => panic!("wrong variant: {other:?}"),
    }
}

#[test]
fn parse_call_signal_keeps_blob_opaque() {
    let frame: ClientFrame = serde_json::from_str(&load("call_signal.json")).unwrap();
    match frame {
        ClientFrame::CallSignal { to, data } => {
            assert_eq!(to.as_str(), "user-9c1d");
            assert_eq!(data["kind"], "offer");
            assert!(data["sdp"].as_str().unwrap().starts_with("v=0"));
        }
        other => panic!("wrong variant: {other:?}"),
    }
}

#[test]
fn parse_game_frames() {
    let frame: ClientFrame = serde_json::from_str(&load("game_create.json")).unwrap();
    assert!(matches!(frame, ClientFrame::GameCreate));

    let frame: ClientFrame = serde_json::from_str(&load("game_update.json")).unwrap();
    match frame {
        ClientFrame::GameUpdate { room_id, data } => {
            assert_eq!(room_id.as_str(), "ab12cd34");
            assert_eq!(data["round"], 2);
        }
        other => panic!("wrong variant: {other:?}"),
    }

    let frame: ClientFrame = serde_json::from_str(&load("voice_signal.json")).unwrap();
    match frame {
        ClientFrame::VoiceSignal { room_id, data } => {
            assert_eq!(room_id.as_str(), "ab12cd34");
            assert_eq!(data["kind"], "ice");
        }
        other => panic!("wrong variant: {other:?}"),
    }
}

#[test]
fn unknown_type_is_rejected() {
    let err = serde_json::from_str::<ClientFrame>(&load("unknown_type.json"));
    assert!(err.is_err());
}

#[test]
fn missing_required_field_is_rejected() {
    let err = serde_json::from_str::<ClientFrame>(r#"{"type":"chat_message","content":"hi"}"#);
    assert!(err.is_err());
}

#[test]
fn missing_tag_is_rejected() {
    let err = serde_json::from_str::<ClientFrame>(r#"{"match_id":"m-1","content":"hi"}"#);
    assert!(err.is_err());
}

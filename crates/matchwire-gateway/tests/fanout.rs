//! Fan-out scenarios routed through the dispatcher: chat, typing, call
//! signaling, game rooms, voice relay.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::extract::ws::Message;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use matchwire_core::error::MatchwireError;
use matchwire_core::protocol::client::ClientFrame;
use matchwire_core::types::{RoomId, UserId};
use matchwire_gateway::dispatch::Dispatcher;
use matchwire_gateway::infra::InMemoryMatchDirectory;
use matchwire_gateway::obs::GatewayMetrics;
use matchwire_gateway::realtime::{Connection, Registry, RoomDirectory};

struct Harness {
    registry: Arc<Registry>,
    matches: Arc<InMemoryMatchDirectory>,
    rooms: Arc<RoomDirectory>,
    metrics: Arc<GatewayMetrics>,
    dispatcher: Dispatcher,
}

fn harness() -> Harness {
    let registry = Arc::new(Registry::new());
    let matches = Arc::new(InMemoryMatchDirectory::new());
    let rooms = Arc::new(RoomDirectory::new());
    let metrics = Arc::new(GatewayMetrics::default());
    let dispatcher = Dispatcher::new(
        Arc::clone(&registry),
        Arc::clone(&matches) as Arc<dyn matchwire_gateway::infra::MatchDirectory>,
        Arc::clone(&rooms),
        Arc::clone(&metrics),
    );
    Harness {
        registry,
        matches,
        rooms,
        metrics,
        dispatcher,
    }
}

fn connect(h: &Harness, user: &str) -> mpsc::Receiver<Message> {
    let (tx, rx) = mpsc::channel(32);
    h.registry.connect(UserId::from(user), Connection { tx });
    rx
}

fn recv_frame(rx: &mut mpsc::Receiver<Message>) -> Value {
    match rx.try_recv().unwrap() {
        Message::Text(t) => serde_json::from_str(&t).unwrap(),
        other => panic!("expected text frame, got {other:?}"),
    }
}

fn drain(rx: &mut mpsc::Receiver<Message>) {
    while rx.try_recv().is_ok() {}
}

#[tokio::test]
async fn chat_reaches_the_other_participant_only() {
    let h = harness();
    h.matches.insert("m-1", "alice", "bob");
    let mut alice = connect(&h, "alice");
    let mut bob = connect(&h, "bob");

    h.dispatcher
        .dispatch(
            &"alice".into(),
            ClientFrame::ChatMessage {
                match_id: "m-1".into(),
                content: "hi".into(),
                message_type: "text".into(),
            },
        )
        .await
        .unwrap();

    let frame = recv_frame(&mut bob);
    assert_eq!(frame["type"], "chat_message");
    assert_eq!(frame["sender_id"], "alice");
    assert_eq!(frame["content"], "hi");
    assert!(frame["timestamp"].as_u64().unwrap() > 0);
    // exactly one frame for bob, nothing for the sender
    assert!(bob.try_recv().is_err());
    assert!(alice.try_recv().is_err());
}

#[tokio::test]
async fn chat_to_offline_partner_is_dropped() {
    let h = harness();
    h.matches.insert("m-1", "alice", "bob");
    let mut alice = connect(&h, "alice");

    h.dispatcher
        .dispatch(
            &"alice".into(),
            ClientFrame::ChatMessage {
                match_id: "m-1".into(),
                content: "hello?".into(),
                message_type: "text".into(),
            },
        )
        .await
        .unwrap();

    assert!(alice.try_recv().is_err());
    assert_eq!(h.metrics.frames_delivered.get(), 0);
    assert_eq!(h.metrics.frames_dropped.get(), 1);
}

#[tokio::test]
async fn chat_rejects_unknown_match_and_outsiders() {
    let h = harness();
    h.matches.insert("m-1", "alice", "bob");
    let _alice = connect(&h, "alice");

    let err = h
        .dispatcher
        .dispatch(
            &"alice".into(),
            ClientFrame::ChatMessage {
                match_id: "m-404".into(),
                content: "hi".into(),
                message_type: "text".into(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MatchwireError::UnknownMatch(_)));

    let err = h
        .dispatcher
        .dispatch(
            &"mallory".into(),
            ClientFrame::ChatMessage {
                match_id: "m-1".into(),
                content: "hi".into(),
                message_type: "text".into(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MatchwireError::NotParticipant(_)));

    assert_eq!(h.metrics.dispatch_errors.get("chat_message"), 2);
    assert_eq!(h.metrics.frames_in.get("chat_message"), 2);
}

#[tokio::test]
async fn typing_indicator_reaches_partner() {
    let h = harness();
    h.matches.insert("m-1", "alice", "bob");
    let mut bob = connect(&h, "bob");

    h.dispatcher
        .dispatch(
            &"alice".into(),
            ClientFrame::Typing {
                match_id: "m-1".into(),
                is_typing: true,
            },
        )
        .await
        .unwrap();

    let frame = recv_frame(&mut bob);
    assert_eq!(frame["type"], "typing");
    assert_eq!(frame["sender_id"], "alice");
    assert_eq!(frame["is_typing"], true);
}

#[tokio::test]
async fn call_signal_goes_straight_to_target() {
    let h = harness();
    let mut carol = connect(&h, "carol");
    let mut dave = connect(&h, "dave");

    h.dispatcher
        .dispatch(
            &"carol".into(),
            ClientFrame::CallSignal {
                to: "dave".into(),
                data: json!({"kind": "offer", "sdp": "v=0"}),
            },
        )
        .await
        .unwrap();

    let frame = recv_frame(&mut dave);
    assert_eq!(frame["type"], "call_signal");
    assert_eq!(frame["sender_id"], "carol");
    assert_eq!(frame["data"]["kind"], "offer");
    assert!(carol.try_recv().is_err());
}

/// Create a room as `creator` and return its generated id.
async fn create_room(h: &Harness, creator: &str, rx: &mut mpsc::Receiver<Message>) -> RoomId {
    h.dispatcher
        .dispatch(&UserId::from(creator), ClientFrame::GameCreate)
        .await
        .unwrap();
    let frame = recv_frame(rx);
    assert_eq!(frame["type"], "game_created");
    RoomId::from(frame["room_id"].as_str().unwrap())
}

#[tokio::test]
async fn game_update_fans_out_to_everyone_but_sender() {
    let h = harness();
    let mut a = connect(&h, "a");
    let mut b = connect(&h, "b");
    let mut c = connect(&h, "c");

    let room = create_room(&h, "a", &mut a).await;
    for user in ["b", "c"] {
        h.dispatcher
            .dispatch(
                &user.into(),
                ClientFrame::GameJoin {
                    room_id: room.clone(),
                },
            )
            .await
            .unwrap();
    }
    drain(&mut a);
    drain(&mut b);
    drain(&mut c);

    h.dispatcher
        .dispatch(
            &"a".into(),
            ClientFrame::GameUpdate {
                room_id: room.clone(),
                data: json!({"round": 2}),
            },
        )
        .await
        .unwrap();

    for rx in [&mut b, &mut c] {
        let frame = recv_frame(rx);
        assert_eq!(frame["type"], "game_update");
        assert_eq!(frame["sender_id"], "a");
        assert_eq!(frame["data"]["round"], 2);
    }
    assert!(a.try_recv().is_err());
}

#[tokio::test]
async fn voice_signal_skips_sender() {
    let h = harness();
    let mut a = connect(&h, "a");
    let mut b = connect(&h, "b");

    let room = create_room(&h, "a", &mut a).await;
    h.dispatcher
        .dispatch(
            &"b".into(),
            ClientFrame::GameJoin {
                room_id: room.clone(),
            },
        )
        .await
        .unwrap();
    drain(&mut a);
    drain(&mut b);

    h.dispatcher
        .dispatch(
            &"b".into(),
            ClientFrame::VoiceSignal {
                room_id: room.clone(),
                data: json!({"kind": "ice"}),
            },
        )
        .await
        .unwrap();

    let frame = recv_frame(&mut a);
    assert_eq!(frame["type"], "voice_signal");
    assert_eq!(frame["sender_id"], "b");
    assert!(b.try_recv().is_err());
}

#[tokio::test]
async fn join_broadcasts_roster_and_capacity_is_enforced() {
    let h = harness();
    let mut a = connect(&h, "a");
    let room = create_room(&h, "a", &mut a).await;

    for user in ["b", "c", "d"] {
        h.dispatcher
            .dispatch(
                &user.into(),
                ClientFrame::GameJoin {
                    room_id: room.clone(),
                },
            )
            .await
            .unwrap();
    }
    // a saw three roster updates, the last with the full room
    let mut last = recv_frame(&mut a);
    while let Ok(Message::Text(t)) = a.try_recv() {
        last = serde_json::from_str(&t).unwrap();
    }
    assert_eq!(last["type"], "game_roster");
    assert_eq!(last["players"].as_array().unwrap().len(), 4);

    let err = h
        .dispatcher
        .dispatch(
            &"e".into(),
            ClientFrame::GameJoin {
                room_id: room.clone(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MatchwireError::RoomFull(_)));

    let err = h
        .dispatcher
        .dispatch(
            &"e".into(),
            ClientFrame::GameJoin {
                room_id: "missing1".into(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MatchwireError::UnknownRoom(_)));
}

#[tokio::test]
async fn update_from_non_member_is_rejected() {
    let h = harness();
    let mut a = connect(&h, "a");
    let room = create_room(&h, "a", &mut a).await;

    let err = h
        .dispatcher
        .dispatch(
            &"stranger".into(),
            ClientFrame::GameUpdate {
                room_id: room,
                data: json!({}),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MatchwireError::NotParticipant(_)));
}

#[tokio::test]
async fn room_is_deleted_when_last_member_leaves() {
    let h = harness();
    let mut a = connect(&h, "a");
    let room = create_room(&h, "a", &mut a).await;

    h.dispatcher
        .dispatch(
            &"a".into(),
            ClientFrame::GameLeave {
                room_id: room.clone(),
            },
        )
        .await
        .unwrap();
    assert!(!h.rooms.contains(&room));
}

#[tokio::test]
async fn disconnect_cleanup_scrubs_rooms() {
    let h = harness();
    let mut a = connect(&h, "a");
    let _b = connect(&h, "b");
    let room = create_room(&h, "a", &mut a).await;
    h.dispatcher
        .dispatch(
            &"b".into(),
            ClientFrame::GameJoin {
                room_id: room.clone(),
            },
        )
        .await
        .unwrap();

    let left = h.rooms.cleanup_user(&"b".into());
    assert_eq!(left, vec![room.clone()]);
    assert_eq!(h.rooms.roster(&room), vec![UserId::from("a")]);
}

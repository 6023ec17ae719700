// tests/integration/chat_flow_test.rs

//! End-to-end tests of the chat flow: joining, broadcasting, renaming,
//! commands, and leaving.

use super::test_helpers::{join, start_server};
use std::time::Duration;

#[tokio::test]
async fn test_welcome_counts_users_already_online() {
    let addr = start_server().await;

    let (_alice, welcome) = join(addr, "alice").await;
    assert_eq!(welcome, "Welcome to chat room!, there are 0 users online");

    let (_bob, welcome) = join(addr, "bob").await;
    assert_eq!(welcome, "Welcome to chat room!, there are 1 users online");

    let (_carol, welcome) = join(addr, "carol").await;
    assert_eq!(welcome, "Welcome to chat room!, there are 2 users online");
}

#[tokio::test]
async fn test_broadcast_reaches_everyone_including_the_sender() {
    let addr = start_server().await;

    let (mut alice, _) = join(addr, "alice").await;
    let (mut bob, _) = join(addr, "bob").await;
    let (mut carol, _) = join(addr, "carol").await;

    alice.send_line("hello").await;

    assert_eq!(alice.recv().await, "alice: hello");
    assert_eq!(bob.recv().await, "alice: hello");
    assert_eq!(carol.recv().await, "alice: hello");
}

#[tokio::test]
async fn test_exit_sends_farewell_and_notifies_the_rest() {
    let addr = start_server().await;

    let (mut alice, _) = join(addr, "alice").await;
    let (mut bob, _) = join(addr, "bob").await;

    bob.send_line("exit").await;
    assert_eq!(bob.recv().await, "Bye");
    bob.expect_eof().await;

    assert_eq!(alice.recv().await, "User bob has left the chat room");

    // Bob is gone from the registry, so only alice sees the next message.
    alice.send_line("ping").await;
    assert_eq!(alice.recv().await, "alice: ping");
}

#[tokio::test]
async fn test_rename_applies_to_later_broadcasts() {
    let addr = start_server().await;

    let (mut alice, _) = join(addr, "alice").await;
    let (mut bob, _) = join(addr, "bob").await;

    alice.send_line("one").await;
    assert_eq!(alice.recv().await, "alice: one");

    alice.send_line("/nick carol").await;
    assert_eq!(
        alice.recv().await,
        "Your nickname has been changed to carol"
    );

    alice.send_line("two").await;
    assert_eq!(alice.recv().await, "carol: two");

    // Bob sees the two chat messages and nothing of the rename exchange.
    assert_eq!(bob.recv().await, "alice: one");
    assert_eq!(bob.recv().await, "carol: two");
}

#[tokio::test]
async fn test_unrecognized_commands_are_silent() {
    let addr = start_server().await;

    let (mut alice, _) = join(addr, "alice").await;
    let (mut bob, _) = join(addr, "bob").await;

    // Neither an unknown command nor a /nick without an argument produces
    // any reply or broadcast.
    alice.send_line("/foo").await;
    alice.send_line("/nick").await;

    bob.send_line("marker").await;
    assert_eq!(alice.recv().await, "bob: marker");
    assert_eq!(bob.recv().await, "bob: marker");
}

#[tokio::test]
async fn test_whitespace_only_lines_are_ignored() {
    let addr = start_server().await;

    let (mut alice, _) = join(addr, "alice").await;
    let (mut bob, _) = join(addr, "bob").await;

    alice.send_line("   ").await;
    alice.send_line("after the blank").await;

    assert_eq!(bob.recv().await, "alice: after the blank");
    assert_eq!(alice.recv().await, "alice: after the blank");
}

#[tokio::test]
async fn test_abrupt_disconnect_leaves_quietly() {
    let addr = start_server().await;

    let (mut alice, _) = join(addr, "alice").await;
    let (bob, _) = join(addr, "bob").await;

    // Bob vanishes without `exit`: no farewell broadcast is owed to anyone.
    drop(bob);
    tokio::time::sleep(Duration::from_millis(100)).await;

    alice.send_line("anyone there?").await;
    assert_eq!(alice.recv().await, "alice: anyone there?");
}

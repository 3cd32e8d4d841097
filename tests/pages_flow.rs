mod common;

use std::time::Duration;

use common::{signed_in, spawn_backend, wait_for_socket, USER_ID};
use sammyswipe::navigation::Route;
use sammyswipe::pages::{ChatPage, DiscoverPage, LoginPage, MatchesPage, Page, ProfilePage};
use sammyswipe::stream::ChatStream;
use sammyswipe::toast::ToastKind;

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_login_page_lands_on_discover() {
    let server = spawn_backend().await;
    let (ctx, _storage) = server.context(false);
    let mut page = LoginPage::with_credentials(common::EMAIL, common::PASSWORD);

    assert!(page.submit(&ctx).await);

    assert_eq!(ctx.navigator.current(), Route::Discover);
    assert!(page.password.is_empty());
    assert_eq!(ctx.toasts.latest().unwrap().message, "Welcome back!");
}

#[tokio::test]
async fn test_like_removes_exactly_that_candidate() {
    let server = spawn_backend().await;
    let (ctx, _storage) = signed_in(&server).await;
    let mut page = DiscoverPage::new();
    page.load(&ctx).await;
    assert_eq!(page.candidates().len(), 3);

    assert!(page.like(&ctx, "b").await);

    let ids: Vec<&str> = page.candidates().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    let toast = ctx.toasts.latest().unwrap();
    assert_eq!(toast.kind, ToastKind::Success);
}

#[tokio::test]
async fn test_reject_then_skip_empties_deck() {
    let server = spawn_backend().await;
    let (ctx, _storage) = signed_in(&server).await;
    let mut page = DiscoverPage::new();
    page.load(&ctx).await;

    assert!(page.reject(&ctx, "a").await);
    assert!(page.skip("b"));
    assert!(page.skip("c"));

    assert!(page.current().is_none());
    assert!(page.render().starts_with("No more matches"));
}

#[tokio::test]
async fn test_pages_render_loading_before_fetch() {
    let server = spawn_backend().await;
    let (ctx, _storage) = signed_in(&server).await;

    let mut discover = DiscoverPage::new();
    discover.mark_loading();
    assert_eq!(discover.render(), "Finding people for you...");
    discover.load(&ctx).await;
    assert!(!discover.is_loading());
    assert!(discover.render().starts_with("Candidate A"));

    let mut matches = MatchesPage::new();
    matches.mark_loading();
    assert_eq!(matches.render(), "Loading your matches...");
    matches.load(&ctx).await;
    assert!(matches.render().contains("Bea Costa"));

    let mut chat = ChatPage::new();
    chat.mark_loading();
    assert_eq!(chat.render(), "Loading conversations...");
    chat.mount(&ctx).await.unwrap();
    assert_ne!(chat.render(), "Loading conversations...");

    let mut login = LoginPage::with_credentials(common::EMAIL, common::PASSWORD);
    login.mark_loading();
    assert_eq!(login.render(), "Signing in...");
}

#[tokio::test]
async fn test_discover_failure_leaves_view_empty() {
    let server = spawn_backend().await;
    let (ctx, _storage) = server.context(false);
    let mut page = DiscoverPage::new();

    page.load(&ctx).await;

    assert!(page.candidates().is_empty());
    let messages: Vec<String> = ctx.toasts.drain().into_iter().map(|t| t.message).collect();
    assert!(messages.contains(&"Failed to load potential matches".to_string()));
}

#[tokio::test]
async fn test_matches_page_lists_matches() {
    let server = spawn_backend().await;
    let (ctx, _storage) = signed_in(&server).await;
    let mut page = MatchesPage::new();

    page.load(&ctx).await;

    assert_eq!(page.matches().len(), 2);
    assert!(page.render().contains("Bea Costa"));
    assert!(page.accept(&ctx, "u2").await);
}

#[tokio::test]
async fn test_chat_send_appends_one_message_and_clears_input() {
    let server = spawn_backend().await;
    let (ctx, _storage) = signed_in(&server).await;
    let mut page = ChatPage::new();
    page.mount(&ctx).await.unwrap();

    assert_eq!(page.selected(), Some("u1"));
    assert_eq!(page.messages().len(), 1);

    page.input = "Want to grab coffee?".to_string();
    assert!(page.send(&ctx).await);

    assert_eq!(page.messages().len(), 2);
    let last = page.messages().last().unwrap();
    assert_eq!(last.content, "Want to grab coffee?");
    assert_eq!(last.sender_id, USER_ID);
    assert!(page.input.is_empty());

    page.unmount();
}

#[tokio::test]
async fn test_chat_send_blank_is_noop() {
    let server = spawn_backend().await;
    let (ctx, _storage) = signed_in(&server).await;
    let mut page = ChatPage::new();
    page.mount(&ctx).await.unwrap();
    let before = page.messages().len();

    page.input = "   ".to_string();
    assert!(!page.send(&ctx).await);
    assert_eq!(page.messages().len(), before);
    assert_eq!(page.input, "   ");
}

#[tokio::test]
async fn test_chat_select_replaces_messages() {
    let server = spawn_backend().await;
    let (ctx, _storage) = signed_in(&server).await;
    let mut page = ChatPage::new();
    page.mount(&ctx).await.unwrap();
    page.input = "hello".to_string();
    page.send(&ctx).await;

    page.select(&ctx, "u2").await;

    assert_eq!(page.selected(), Some("u2"));
    assert_eq!(page.messages().len(), 1);
    assert_eq!(page.messages()[0].sender_id, "u2");
}

#[tokio::test]
async fn test_stream_relays_between_users() {
    let server = spawn_backend().await;

    let mut alice = ChatStream::connect(&server.ws_url, "alice").await.unwrap();
    let bob = ChatStream::connect(&server.ws_url, "bob").await.unwrap();
    wait_for_socket(&server, "alice").await;
    wait_for_socket(&server, "bob").await;

    bob.send("alice", "ping").unwrap();

    let message = tokio::time::timeout(WAIT, alice.recv()).await.unwrap().unwrap();
    assert_eq!(message.content, "ping");
    assert_eq!(message.receiver_id.as_deref(), Some("alice"));
    assert!(alice.is_open());

    bob.close();
}

#[tokio::test]
async fn test_chat_page_appends_streamed_messages_in_order() {
    let server = spawn_backend().await;
    let (ctx, _storage) = signed_in(&server).await;
    let mut page = ChatPage::new();
    page.mount(&ctx).await.unwrap();
    assert!(page.is_streaming());
    let before = page.messages().len();

    let peer = ChatStream::connect(&server.ws_url, "u1").await.unwrap();
    wait_for_socket(&server, USER_ID).await;
    wait_for_socket(&server, "u1").await;
    peer.send(USER_ID, "first").unwrap();
    peer.send(USER_ID, "second").unwrap();

    let first = tokio::time::timeout(WAIT, page.next_inbound()).await.unwrap().unwrap();
    let second = tokio::time::timeout(WAIT, page.next_inbound()).await.unwrap().unwrap();
    assert_eq!(first.content, "first");
    assert_eq!(second.content, "second");
    assert_eq!(page.messages().len(), before + 2);
}

#[tokio::test]
async fn test_profile_update_refetches_user() {
    let server = spawn_backend().await;
    let (ctx, _storage) = signed_in(&server).await;
    let mut page = ProfilePage::new();
    page.mount(&ctx).await.unwrap();
    assert_eq!(page.form.full_name, "Ana Lima");

    page.form.bio = "Trail runner".to_string();
    assert!(page.submit(&ctx).await);

    assert_eq!(
        ctx.toasts.latest().unwrap().message,
        "Profile updated successfully!"
    );
    assert!(page.user().is_some());
}

#[tokio::test]
async fn test_photo_upload_is_multipart() {
    let server = spawn_backend().await;
    let (ctx, _storage) = signed_in(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("me.png");
    std::fs::write(&path, b"\x89PNG fake").unwrap();

    let mut page = ProfilePage::new();
    page.mount(&ctx).await.unwrap();
    assert!(page.upload_photo(&ctx, &path).await);

    let uploads = server.backend.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1);
    let body = String::from_utf8_lossy(&uploads[0]);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"me.png\""));
}

#[tokio::test]
async fn test_chat_page_requires_sign_in() {
    let server = spawn_backend().await;
    let (ctx, _storage) = server.context(false);
    ctx.navigator.navigate(Route::Chat);

    let mut page = ChatPage::new();
    assert!(page.mount(&ctx).await.is_err());
    assert_eq!(ctx.navigator.current(), Route::Login);
}

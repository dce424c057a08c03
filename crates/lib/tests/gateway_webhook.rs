//! Integration tests: drive the webhook over HTTP with recording Send API and completion mocks.

mod common;

use common::{page_batch, postback_event, start_gateway, text_event, VERIFY_TOKEN};
use reqwest::StatusCode;
use sweetmix_core::messenger::OutboundMessage;
use sweetmix_core::profile::{ProfileStore, PLACEHOLDER_NAME};
use sweetmix_core::reply::{self, IMAGE_POOL};

#[tokio::test]
async fn health_returns_static_text() {
    let gw = start_gateway(0.9).await;
    let resp = gw.client.get(format!("{}/", gw.base_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "SweetMix Messenger Bot is running 💖");
}

#[tokio::test]
async fn verification_echoes_challenge_only_for_matching_token() {
    let gw = start_gateway(0.9).await;
    let url = format!("{}/webhook", gw.base_url);

    for _ in 0..2 {
        let resp = gw
            .client
            .get(&url)
            .query(&[
                ("hub.mode", "subscribe"),
                ("hub.verify_token", VERIFY_TOKEN),
                ("hub.challenge", "1158201444"),
            ])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.text().await.unwrap(), "1158201444");
    }

    let resp = gw
        .client
        .get(&url)
        .query(&[
            ("hub.mode", "subscribe"),
            ("hub.verify_token", "wrong"),
            ("hub.challenge", "1"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = gw.client.get(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    assert!(gw.sender.sent().is_empty());
    assert!(gw.profiles.is_empty().await);
}

#[tokio::test]
async fn non_page_object_is_not_found() {
    let gw = start_gateway(0.9).await;
    let resp = gw
        .client
        .post(format!("{}/webhook", gw.base_url))
        .json(&serde_json::json!({ "object": "user", "entry": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unparseable_body_is_bad_request() {
    let gw = start_gateway(0.9).await;
    let resp = gw
        .client
        .post(format!("{}/webhook", gw.base_url))
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn event_without_sender_is_server_error() {
    let gw = start_gateway(0.9).await;
    let resp = gw
        .client
        .post(format!("{}/webhook", gw.base_url))
        .json(&page_batch(serde_json::json!({ "message": { "text": "hi" } })))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn empty_entries_are_accepted() {
    let gw = start_gateway(0.9).await;
    let resp = gw
        .client
        .post(format!("{}/webhook", gw.base_url))
        .json(&serde_json::json!({ "object": "page", "entry": [ { "messaging": [] }, {} ] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(gw.sender.sent().is_empty());
}

#[tokio::test]
async fn onboarding_then_keywords_then_completion() {
    let gw = start_gateway(0.9).await;
    let url = format!("{}/webhook", gw.base_url);
    let post = |event: serde_json::Value| {
        let req = gw.client.post(&url).json(&page_batch(event));
        async move { req.send().await.unwrap().status() }
    };

    assert_eq!(post(text_event("psid-1", "hello!")).await, StatusCode::OK);
    assert_eq!(gw.sender.take(), vec![reply::name_prompt()]);

    assert_eq!(post(text_event("psid-1", "My name is Rupa!")).await, StatusCode::OK);
    assert_eq!(gw.sender.take(), vec![reply::name_captured("Rupa")]);
    let profile = gw.profiles.get_or_create("psid-1").await.unwrap();
    assert_eq!(profile.name.as_deref(), Some("Rupa"));

    assert_eq!(post(text_event("psid-1", "show me the menu")).await, StatusCode::OK);
    assert_eq!(gw.sender.take(), vec![reply::menu()]);

    assert_eq!(post(text_event("psid-1", "send an image")).await, StatusCode::OK);
    let sent = gw.sender.take();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        OutboundMessage::Image { url } => assert!(IMAGE_POOL.contains(&url.as_str())),
        other => panic!("expected image, got {:?}", other),
    }
    assert!(gw.completion.calls().is_empty());

    assert_eq!(post(text_event("psid-1", "how was your day?")).await, StatusCode::OK);
    let calls = gw.completion.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0][0].content.contains("User's name: Rupa."));
    assert_eq!(calls[0][1].content, "how was your day?");
    assert_eq!(gw.sender.take(), vec![OutboundMessage::text("aww, hello 💖")]);
}

#[tokio::test]
async fn completion_reply_with_image_follow_up() {
    let gw = start_gateway(0.05).await;
    gw.profiles.set_name("psid-7", "Mim").await.unwrap();
    let resp = gw
        .client
        .post(format!("{}/webhook", gw.base_url))
        .json(&page_batch(text_event("psid-7", "tell me something nice")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        gw.sender.take(),
        vec![
            OutboundMessage::text("aww, hello 💖"),
            OutboundMessage::Image {
                url: IMAGE_POOL[0].to_string()
            },
        ]
    );
    assert_eq!(gw.completion.calls().len(), 1);
}

#[tokio::test]
async fn skip_name_postback_sets_placeholder_and_sends_menu() {
    let gw = start_gateway(0.9).await;
    let resp = gw
        .client
        .post(format!("{}/webhook", gw.base_url))
        .json(&page_batch(postback_event("psid-2", "SKIP_NAME")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let sent = gw.sender.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|(to, _)| to == "psid-2"));
    assert_eq!(sent[0].1, reply::skip_name_ack());
    assert_eq!(sent[1].1, reply::menu());

    let profile = gw.profiles.get_or_create("psid-2").await.unwrap();
    assert_eq!(profile.name.as_deref(), Some(PLACEHOLDER_NAME));
}

#[tokio::test]
async fn attachment_without_text_is_acknowledged() {
    let gw = start_gateway(0.9).await;
    let event = serde_json::json!({
        "sender": { "id": "psid-3" },
        "message": {
            "mid": "m-2",
            "attachments": [ { "type": "image", "payload": { "url": "https://x/p.jpg" } } ]
        }
    });
    let resp = gw
        .client
        .post(format!("{}/webhook", gw.base_url))
        .json(&page_batch(event))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(gw.sender.take(), vec![OutboundMessage::text(reply::ATTACHMENT_ACK)]);
}

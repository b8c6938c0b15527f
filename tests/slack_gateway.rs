//! Integration tests for the Slack Web API gateway against a mock server.

use patrol::{ChatGateway, HttpSlackGateway, SlackError};
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct GatewayFixture {
    runtime: Runtime,
    server: MockServer,
    gateway: HttpSlackGateway,
}

impl GatewayFixture {
    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

#[fixture]
fn gateway_fixture() -> GatewayFixture {
    let runtime = Runtime::new().expect("runtime should start");
    let server = runtime.block_on(MockServer::start());
    let base = Url::parse(&server.uri()).expect("mock server URI should parse");
    let gateway = {
        let _guard = runtime.enter();
        HttpSlackGateway::new(base, "xoxb-test")
    };
    GatewayFixture {
        runtime,
        server,
        gateway,
    }
}

fn ok_body(extra: serde_json::Value) -> serde_json::Value {
    let mut body = serde_json::json!({"ok": true});
    if let (Some(object), Some(extension)) = (body.as_object_mut(), extra.as_object()) {
        for (key, value) in extension {
            object.insert(key.clone(), value.clone());
        }
    }
    body
}

#[rstest]
fn channel_name_posts_a_form_with_bearer_auth(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("POST"))
            .and(path("/api/conversations.info"))
            .and(header("authorization", "Bearer xoxb-test"))
            .and(body_string_contains("channel=C0123456789"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(serde_json::json!({
                "channel": {"id": "C0123456789", "name": "eng-reviews"}
            }))))
            .expect(1)
            .mount(&gateway_fixture.server),
    );

    let name = gateway_fixture
        .block_on(gateway_fixture.gateway.channel_name("C0123456789"))
        .expect("lookup should succeed");
    assert_eq!(name, "eng-reviews");
}

#[rstest]
fn history_maps_messages_and_reaction_names(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("POST"))
            .and(path("/api/conversations.history"))
            .and(body_string_contains("channel=C0123456789"))
            .and(body_string_contains("oldest=1700000000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(serde_json::json!({
                "messages": [
                    {
                        "ts": "1700000100.000200",
                        "text": "please review https://github.com/acme/widgets/pull/42",
                        "reactions": [
                            {"name": "package", "users": ["U1"], "count": 1},
                            {"name": "eyes", "users": ["U2"], "count": 1}
                        ]
                    },
                    {"ts": "1700000050.000100", "text": "morning"}
                ]
            }))))
            .mount(&gateway_fixture.server),
    );

    let messages = gateway_fixture
        .block_on(gateway_fixture.gateway.history("C0123456789", 1_700_000_000))
        .expect("history should succeed");

    assert_eq!(messages.len(), 2);
    let first = messages.first().expect("first message should exist");
    assert_eq!(first.ts, "1700000100.000200");
    assert_eq!(first.reactions, vec!["package".to_owned(), "eyes".to_owned()]);
    let second = messages.get(1).expect("second message should exist");
    assert!(second.reactions.is_empty());
}

#[rstest]
fn add_reaction_sends_channel_timestamp_and_name(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("POST"))
            .and(path("/api/reactions.add"))
            .and(body_string_contains("channel=C0123456789"))
            .and(body_string_contains("timestamp=1700000100.000200"))
            .and(body_string_contains("name=package"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(serde_json::json!({}))))
            .expect(1)
            .mount(&gateway_fixture.server),
    );

    gateway_fixture
        .block_on(gateway_fixture.gateway.add_reaction(
            "C0123456789",
            "1700000100.000200",
            "package",
        ))
        .expect("reaction should succeed");
}

#[rstest]
fn direct_messages_open_a_conversation_first(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(async {
        Mock::given(method("POST"))
            .and(path("/api/conversations.open"))
            .and(body_string_contains("users=U0123456789"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(serde_json::json!({
                "channel": {"id": "D0123456789"}
            }))))
            .expect(1)
            .mount(&gateway_fixture.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/chat.postMessage"))
            .and(body_string_contains("channel=D0123456789"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(serde_json::json!({}))))
            .expect(1)
            .mount(&gateway_fixture.server)
            .await;
    });

    gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .post_direct_message("U0123456789", "digest text"),
        )
        .expect("DM should succeed");
}

#[rstest]
fn api_errors_carry_the_slack_error_code(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("POST"))
            .and(path("/api/conversations.info"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"ok": false, "error": "channel_not_found"})),
            )
            .mount(&gateway_fixture.server),
    );

    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.channel_name("C0123456789"))
        .expect_err("lookup should fail");
    assert!(matches!(
        error,
        SlackError::Api { ref code, .. } if code == "channel_not_found"
    ));
}

#[rstest]
fn auth_failures_map_to_the_authentication_variant(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("POST"))
            .and(path("/api/conversations.history"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"ok": false, "error": "invalid_auth"})),
            )
            .mount(&gateway_fixture.server),
    );

    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.history("C0123456789", 0))
        .expect_err("history should fail");
    assert!(matches!(error, SlackError::Authentication { .. }));
}

#[rstest]
fn http_failures_surface_the_status(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("POST"))
            .and(path("/api/chat.postMessage"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&gateway_fixture.server),
    );

    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.post_message("C0123456789", "hello"))
        .expect_err("post should fail");
    assert!(matches!(
        error,
        SlackError::Http { status, .. } if status.as_u16() == 503
    ));
}

#[rstest]
fn missing_channel_payload_is_malformed(gateway_fixture: GatewayFixture) {
    gateway_fixture.block_on(
        Mock::given(method("POST"))
            .and(path("/api/conversations.info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(serde_json::json!({}))))
            .mount(&gateway_fixture.server),
    );

    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.channel_name("C0123456789"))
        .expect_err("lookup should fail");
    assert!(matches!(error, SlackError::MalformedResponse { .. }));
}

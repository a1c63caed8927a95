//! OpenID consumer flow scenarios against a scripted protocol library.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use relyr::openid::consumer::OAUTH_HYBRID_NS;
use relyr::session::OPENID_SESSION_KEY;
use relyr::testing::{ax_response, callback_params, MockConsumer};
use relyr::{
    AuthError, AxSchema, CheckStatus, Completion, LoginDirective, MemorySession, OpenIdFlow,
    OpenIdSettings, PendingAuthRequest, ProviderHooks, SessionStore, VerifyResponse,
};

const ENDPOINT: &str = "https://op.example/server";

fn settings() -> OpenIdSettings {
    let _ = env_logger::builder().is_test(true).try_init();
    OpenIdSettings {
        realm: "https://rp.example/".to_owned(),
        return_to: "https://rp.example/openid/process".to_owned(),
    }
}

fn success_for(identity_url: &str) -> VerifyResponse {
    VerifyResponse {
        status: CheckStatus::Success,
        identity_url: identity_url.to_owned(),
        canonical_id: None,
        ax: HashMap::new(),
        sreg: HashMap::new(),
        extensions: HashMap::new(),
    }
}

#[tokio::test]
async fn login_redirects_and_requests_both_extensions() {
    let consumer = Arc::new(MockConsumer::new(ENDPOINT));
    let flow = OpenIdFlow::new(settings(), consumer.clone());
    let mut session = MemorySession::new();

    let directive = flow
        .login(&mut session, Some("https://user.myopenid.example/"))
        .await
        .unwrap();
    let url = directive.location().expect("provider asked for redirect");
    assert!(url.starts_with(ENDPOINT));
    assert!(url.contains("openid.return_to=https://rp.example/openid/process"));

    // The protocol state is persisted for the callback leg.
    assert!(session.get(OPENID_SESSION_KEY).is_some());

    // Both extensions are attached unconditionally: providers support one
    // or the other inconsistently, not exclusively.
    let rendered = consumer.last_rendered().unwrap();
    assert_eq!(rendered.ax_fetch.len(), 15);
    assert!(rendered
        .ax_fetch
        .contains(&"http://axschema.org/contact/email"));
    assert_eq!(rendered.sreg_optional.len(), 9);
    assert!(rendered.sreg_optional.contains(&"dob"));
}

#[tokio::test]
async fn login_honors_form_post_preference() {
    let consumer = Arc::new(MockConsumer::new(ENDPOINT).prefers_form_post());
    let flow = OpenIdFlow::new(settings(), consumer.clone());
    let mut session = MemorySession::new();

    let directive = flow
        .login(&mut session, Some("https://user.myopenid.example/"))
        .await
        .unwrap();
    match directive {
        LoginDirective::FormPost(html) => {
            assert!(html.contains(ENDPOINT));
            assert!(html.contains("submit()"));
        }
        LoginDirective::Redirect(url) => panic!("expected form POST, got redirect to {url}"),
    }
    assert!(session.get(OPENID_SESSION_KEY).is_some());
}

#[tokio::test]
async fn login_without_identifier_is_a_missing_parameter() {
    let consumer = Arc::new(MockConsumer::new(ENDPOINT));
    let flow = OpenIdFlow::new(settings(), consumer.clone());
    let mut session = MemorySession::new();

    assert!(matches!(
        flow.login(&mut session, None).await,
        Err(AuthError::MissingParameter("openid_identifier"))
    ));
    assert!(matches!(
        flow.login(&mut session, Some("")).await,
        Err(AuthError::MissingParameter("openid_identifier"))
    ));
    assert!(session.get(OPENID_SESSION_KEY).is_none());
}

#[tokio::test]
async fn discovery_failure_propagates_unmodified() {
    let consumer = Arc::new(MockConsumer::new(ENDPOINT).fail_discovery("no XRDS document"));
    let flow = OpenIdFlow::new(settings(), consumer.clone());
    let mut session = MemorySession::new();

    let err = flow
        .login(&mut session, Some("https://user.myopenid.example/"))
        .await
        .unwrap_err();
    match err {
        AuthError::Discovery { identifier, reason } => {
            assert_eq!(identifier, "https://user.myopenid.example/");
            assert_eq!(reason, "no XRDS document");
        }
        other => panic!("expected discovery failure, got {other:?}"),
    }
    assert!(session.get(OPENID_SESSION_KEY).is_none());
}

#[tokio::test]
async fn process_normalizes_with_ax_precedence() {
    // Scenario D: AX and SReg disagree on the email; AX wins.
    let mut response = success_for("https://user.myopenid.example/");
    response.ax = ax_response(AxSchema::AxSchemaOrg, &[("email", "a@x.com")]);
    response.sreg = HashMap::from([("email".to_owned(), "B@X.COM".to_owned())]);
    let consumer = Arc::new(MockConsumer::new(ENDPOINT).complete_with(response));
    let flow = OpenIdFlow::new(settings(), consumer.clone());
    let mut session = MemorySession::new();

    flow.login(&mut session, Some("https://user.myopenid.example/"))
        .await
        .unwrap();
    let completion = flow
        .process(&mut session, &callback_params(&[("openid.mode", "id_res")]))
        .await
        .unwrap();

    match completion {
        Completion::Success { profile, .. } => {
            assert_eq!(
                profile.get_str("identifier"),
                Some("https://user.myopenid.example/")
            );
            assert_eq!(profile.get_str("providerName"), Some("OpenID"));
            assert_eq!(profile.get("emails").unwrap()[0], "a@x.com");
        }
        Completion::Denied { reason } => panic!("unexpected denial: {reason}"),
    }

    // The protocol state was consumed and handed to the library.
    assert!(session.get(OPENID_SESSION_KEY).is_none());
    assert_eq!(consumer.completed_states().len(), 1);
}

#[tokio::test]
async fn process_prefers_canonical_id() {
    let mut response = success_for("https://user.example/compromisable");
    response.canonical_id = Some("=!9100.1234.5678".to_owned());
    let consumer = Arc::new(MockConsumer::new(ENDPOINT).complete_with(response));
    let flow = OpenIdFlow::new(settings(), consumer.clone());
    let mut session = MemorySession::new();

    flow.login(&mut session, Some("https://user.example/"))
        .await
        .unwrap();
    let completion = flow
        .process(&mut session, &callback_params(&[]))
        .await
        .unwrap();

    match completion {
        Completion::Success { profile, .. } => {
            assert_eq!(profile.get_str("identifier"), Some("=!9100.1234.5678"));
        }
        Completion::Denied { reason } => panic!("unexpected denial: {reason}"),
    }
}

#[tokio::test]
async fn cancel_and_failure_are_terminal() {
    for status in [CheckStatus::Cancel, CheckStatus::Failure, CheckStatus::SetupNeeded] {
        let consumer =
            Arc::new(MockConsumer::new(ENDPOINT).complete_with(VerifyResponse::failed(status)));
        let flow = OpenIdFlow::new(settings(), consumer.clone());
        let mut session = MemorySession::new();

        flow.login(&mut session, Some("https://user.example/"))
            .await
            .unwrap();
        assert!(matches!(
            flow.process(&mut session, &callback_params(&[])).await,
            Err(AuthError::Verification(_))
        ));
    }
}

#[tokio::test]
async fn process_without_pending_state_fails() {
    let consumer = Arc::new(MockConsumer::new(ENDPOINT));
    let flow = OpenIdFlow::new(settings(), consumer.clone());
    let mut session = MemorySession::new();

    assert!(matches!(
        flow.process(&mut session, &callback_params(&[])).await,
        Err(AuthError::MissingState)
    ));
}

#[tokio::test]
async fn protocol_state_is_single_use() {
    let consumer = Arc::new(
        MockConsumer::new(ENDPOINT).complete_with(success_for("https://user.example/")),
    );
    let flow = OpenIdFlow::new(settings(), consumer.clone());
    let mut session = MemorySession::new();

    flow.login(&mut session, Some("https://user.example/"))
        .await
        .unwrap();
    flow.process(&mut session, &callback_params(&[]))
        .await
        .unwrap();

    // Replaying the callback finds no state: deleted before use.
    assert!(matches!(
        flow.process(&mut session, &callback_params(&[])).await,
        Err(AuthError::MissingState)
    ));
}

struct GoogleHooks;

#[async_trait]
impl ProviderHooks for GoogleHooks {
    fn lookup_identifier(&self, _identifier: Option<&str>) -> Option<String> {
        Some("https://www.google.com/accounts/o8/id".to_owned())
    }

    fn update_auth_request(&self, request: &mut PendingAuthRequest) {
        request.extension_args.insert(
            "openid.ns.ui".to_owned(),
            "http://specs.openid.net/extensions/ui/1.0".to_owned(),
        );
    }

    async fn access_token(&self, request_token: &str) -> Option<String> {
        (request_token == "RT").then(|| "ACCESS".to_owned())
    }
}

#[tokio::test]
async fn hooks_supply_identifier_and_extensions() {
    let consumer = Arc::new(MockConsumer::new(ENDPOINT));
    let flow = OpenIdFlow::new(settings(), consumer.clone())
        .with_hooks(Arc::new(GoogleHooks));
    let mut session = MemorySession::new();

    // No identifier supplied: the hook provides the fixed discovery URL.
    flow.login(&mut session, None).await.unwrap();
    let rendered = consumer.last_rendered().unwrap();
    assert!(rendered.extension_args.contains_key("openid.ns.ui"));
}

#[tokio::test]
async fn hybrid_oauth_request_token_is_exchanged() {
    let mut response = success_for("https://www.google.com/accounts/o8/id?id=xyz");
    response.ax = ax_response(AxSchema::AxSchemaOrg, &[("email", "jane.doe@gmail.com")]);
    response.extensions.insert(
        OAUTH_HYBRID_NS.to_owned(),
        HashMap::from([("request_token".to_owned(), "RT".to_owned())]),
    );
    let consumer = Arc::new(MockConsumer::new(ENDPOINT).complete_with(response));
    let flow = OpenIdFlow::new(settings(), consumer.clone())
        .with_hooks(Arc::new(GoogleHooks));
    let mut session = MemorySession::new();

    flow.login(&mut session, None).await.unwrap();
    let completion = flow
        .process(&mut session, &callback_params(&[]))
        .await
        .unwrap();

    match completion {
        Completion::Success {
            profile,
            credentials,
        } => {
            assert_eq!(profile.get_str("providerName"), Some("Google"));
            assert_eq!(profile.get_str("preferredUsername"), Some("jane.doe"));
            assert_eq!(
                profile.get_str("verifiedEmail"),
                Some("jane.doe@gmail.com")
            );
            assert_eq!(
                credentials.get("oauthAccessToken").map(String::as_str),
                Some("ACCESS")
            );
        }
        Completion::Denied { reason } => panic!("unexpected denial: {reason}"),
    }
}

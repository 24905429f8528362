//! Integration tests for session resolution against replayed AWS responses
//!
//! Every HTTP exchange goes through a `StaticReplayClient`, so no network or
//! real credentials are needed.
//!
//! Run with: cargo test --test session_integration

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_credential_types::Credentials;
use aws_session::session::handlers::{UserAgentHandler, APP_NAME};
use aws_session::session::{CredentialResolver, CredentialSource, StaticConfigLoader};
use aws_smithy_runtime::client::http::test_util::{ReplayEvent, StaticReplayClient};
use aws_smithy_runtime_api::client::orchestrator::{HttpRequest, HttpResponse};
use aws_smithy_runtime_api::http::StatusCode;
use aws_smithy_types::body::SdkBody;

const DEFAULT_ACCESS_KEY: &str = "AKIDDEFAULTEXAMPLE";
const ROLE_ARN: &str = "arn:aws:iam::123456789012:role/deployer";

const GET_CALLER_IDENTITY_RESPONSE: &str = r#"<GetCallerIdentityResponse xmlns="https://sts.amazonaws.com/doc/2011-06-15/">
  <GetCallerIdentityResult>
    <Arn>arn:aws:iam::123456789012:user/alice</Arn>
    <UserId>AIDACKCEVSQ6C2EXAMPLE</UserId>
    <Account>123456789012</Account>
  </GetCallerIdentityResult>
  <ResponseMetadata>
    <RequestId>01234567-89ab-cdef-0123-456789abcdef</RequestId>
  </ResponseMetadata>
</GetCallerIdentityResponse>
"#;

const ASSUME_ROLE_RESPONSE: &str = r#"<AssumeRoleResponse xmlns="https://sts.amazonaws.com/doc/2011-06-15/">
  <AssumeRoleResult>
    <AssumedRoleUser>
      <AssumedRoleId>AROAR42TAWARILN3MNKUT:aws-session-test</AssumedRoleId>
      <Arn>arn:aws:sts::123456789012:assumed-role/deployer/aws-session-test</Arn>
    </AssumedRoleUser>
    <Credentials>
      <AccessKeyId>ASIAASSUMEDEXAMPLE</AccessKeyId>
      <SecretAccessKey>assumedsecret</SecretAccessKey>
      <SessionToken>assumedtoken</SessionToken>
      <Expiration>2099-01-01T00:00:00Z</Expiration>
    </Credentials>
  </AssumeRoleResult>
  <ResponseMetadata>
    <RequestId>d9d47248-fd55-4686-ad7c-0fb7cd1cddd7</RequestId>
  </ResponseMetadata>
</AssumeRoleResponse>
"#;

const LIST_BUCKETS_RESPONSE: &str = r#"<ListAllMyBucketsResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Owner><ID>owner</ID><DisplayName>owner</DisplayName></Owner>
  <Buckets></Buckets>
</ListAllMyBucketsResult>
"#;

/// Replay client answering each request with the given bodies in order
fn replay(bodies: &[&'static str]) -> StaticReplayClient {
    StaticReplayClient::new(
        bodies
            .iter()
            .map(|body| {
                ReplayEvent::new(
                    HttpRequest::new(SdkBody::empty()),
                    HttpResponse::new(
                        StatusCode::try_from(200).expect("valid status"),
                        SdkBody::from(*body),
                    ),
                )
            })
            .collect(),
    )
}

/// Resolver serving a fixed config with static default credentials
fn resolver_with(http_client: StaticReplayClient) -> CredentialResolver<StaticConfigLoader> {
    let base = SdkConfig::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(SharedCredentialsProvider::new(Credentials::new(
            DEFAULT_ACCESS_KEY,
            "defaultsecret",
            None,
            None,
            "test",
        )))
        .http_client(http_client)
        .build();
    CredentialResolver::with_loader(StaticConfigLoader::new(base))
}

fn user_agent_tokens(request: &HttpRequest) -> usize {
    let user_agent = request
        .headers()
        .get("user-agent")
        .expect("request has a user-agent header");
    let token = UserAgentHandler::new().token().to_string();
    user_agent.split(' ').filter(|part| *part == token).count()
}

/// Requests sent through a session's STS client carry the tool token exactly once
#[tokio::test]
async fn test_sts_requests_carry_user_agent_once() {
    let http_client = replay(&[GET_CALLER_IDENTITY_RESPONSE]);
    let resolver = resolver_with(http_client.clone());

    let session = resolver
        .default_with_region("us-west-2")
        .await
        .expect("Failed to build session");

    let identity = session
        .sts_client()
        .get_caller_identity()
        .send()
        .await
        .expect("Failed to get caller identity");
    assert_eq!(identity.account(), Some("123456789012"));

    let requests: Vec<_> = http_client.actual_requests().collect();
    assert_eq!(requests.len(), 1);
    assert_eq!(user_agent_tokens(requests[0]), 1);
    assert!(requests[0].uri().contains("us-west-2"), "{}", requests[0].uri());
}

/// The S3 client built from a session gets the same handler chain
#[tokio::test]
async fn test_s3_requests_carry_user_agent_once() {
    let http_client = replay(&[LIST_BUCKETS_RESPONSE]);
    let resolver = resolver_with(http_client.clone());

    let session = resolver
        .from_profile("dev")
        .await
        .expect("Failed to build session");

    // Only the outgoing request matters here
    let _ = session.s3_client().list_buckets().send().await;

    let request = http_client
        .actual_requests()
        .next()
        .expect("S3 request was sent");
    assert_eq!(user_agent_tokens(request), 1);
    assert!(request
        .headers()
        .get("user-agent")
        .unwrap_or_default()
        .contains(APP_NAME));
}

/// Role sessions resolve credentials through STS AssumeRole, distinct from the default session's
#[tokio::test]
async fn test_from_role_derives_distinct_credentials() {
    let http_client = replay(&[ASSUME_ROLE_RESPONSE]);
    let resolver = resolver_with(http_client.clone());

    let default_session = resolver
        .default_session()
        .await
        .expect("Failed to build default session");
    let role_session = resolver
        .from_role(ROLE_ARN, "eu-central-1")
        .await
        .expect("Failed to build role session");

    assert_eq!(
        role_session.region().map(|r| r.as_ref()),
        Some("eu-central-1")
    );
    assert_eq!(
        role_session.credential_source(),
        &CredentialSource::AssumedRole {
            role_arn: ROLE_ARN.to_string()
        }
    );

    // Construction alone must not contact STS
    assert_eq!(http_client.actual_requests().count(), 0);

    let default_creds = default_session
        .credentials()
        .await
        .expect("Failed to resolve default credentials");
    let role_creds = role_session
        .credentials()
        .await
        .expect("Failed to resolve role credentials");

    assert_eq!(default_creds.access_key_id(), DEFAULT_ACCESS_KEY);
    assert_eq!(role_creds.access_key_id(), "ASIAASSUMEDEXAMPLE");
    assert_eq!(role_creds.session_token(), Some("assumedtoken"));
    assert_ne!(default_creds.access_key_id(), role_creds.access_key_id());

    let requests: Vec<_> = http_client.actual_requests().collect();
    assert_eq!(requests.len(), 1);
    let body = std::str::from_utf8(requests[0].body().bytes().expect("buffered body"))
        .expect("utf-8 body");
    assert!(body.contains("Action=AssumeRole"), "{}", body);
    assert!(body.contains("deployer"), "{}", body);
}

/// The STS exchange behind a role session identifies the tool as well
#[tokio::test]
async fn test_assume_role_request_carries_user_agent_once() {
    let http_client = replay(&[ASSUME_ROLE_RESPONSE]);
    let resolver = resolver_with(http_client.clone());

    let role_session = resolver
        .from_role(ROLE_ARN, "us-west-2")
        .await
        .expect("Failed to build role session");
    role_session
        .credentials()
        .await
        .expect("Failed to resolve role credentials");

    let request = http_client
        .actual_requests()
        .next()
        .expect("AssumeRole request was sent");
    assert_eq!(user_agent_tokens(request), 1);
}

/// Clients built directly from the session config are tagged without the handler chain
#[tokio::test]
async fn test_clients_from_session_config_carry_user_agent_once() {
    let http_client = replay(&[GET_CALLER_IDENTITY_RESPONSE]);
    let resolver = resolver_with(http_client.clone());

    let session = resolver
        .default_session()
        .await
        .expect("Failed to build session");

    aws_sdk_sts::Client::new(session.config())
        .get_caller_identity()
        .send()
        .await
        .expect("Failed to get caller identity");

    let request = http_client
        .actual_requests()
        .next()
        .expect("GetCallerIdentity request was sent");
    assert_eq!(user_agent_tokens(request), 1);
}

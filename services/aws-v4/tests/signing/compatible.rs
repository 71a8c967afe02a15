use std::time::SystemTime;

use super::{compare_request, sign_with_connsign};
use anyhow::Result;
use aws_credential_types::Credentials;
use aws_sigv4::http_request::PayloadChecksumKind;
use aws_sigv4::http_request::PercentEncodingMode;
use aws_sigv4::http_request::SignableBody;
use aws_sigv4::http_request::SignableRequest;
use aws_sigv4::http_request::SigningSettings;
use aws_sigv4::sign::v4;
use connsign_aws_v4::{Credential, RequestSigner};
use connsign_core::time::now;
use http::header::CONTENT_LENGTH;
use http::{HeaderValue, Method, Request};
use test_case::test_case;

fn get_request() -> Request<&'static str> {
    let mut req = Request::new("");
    *req.method_mut() = Method::GET;
    *req.uri_mut() = "http://127.0.0.1:9000/hello"
        .parse()
        .expect("url must be valid");

    req
}

fn get_request_with_sse() -> Request<&'static str> {
    let mut req = get_request();
    for (k, v) in [
        ("x-amz-server-side-encryption", "a"),
        ("x-amz-server-side-encryption-customer-algorithm", "b"),
        ("x-amz-server-side-encryption-customer-key", "c"),
        ("x-amz-server-side-encryption-customer-key-md5", "d"),
        ("x-amz-server-side-encryption-aws-kms-key-id", "e"),
    ] {
        req.headers_mut()
            .insert(k, v.parse().expect("must be valid"));
    }

    req
}

fn get_request_with_query() -> Request<&'static str> {
    let mut req = Request::new("");
    *req.method_mut() = Method::GET;
    *req.uri_mut() = "http://127.0.0.1:9000/hello?list-type=2&max-keys=3&prefix=CI/&start-after=ExampleGuide.pdf"
        .parse()
        .expect("url must be valid");

    req
}

fn get_request_with_empty_query_value() -> Request<&'static str> {
    let mut req = Request::new("");
    *req.method_mut() = Method::GET;
    *req.uri_mut() = "http://127.0.0.1:9000/hello?acl=&versionId=a%20b"
        .parse()
        .expect("url must be valid");

    req
}

fn get_request_virtual_host() -> Request<&'static str> {
    let mut req = Request::new("");
    *req.method_mut() = Method::GET;
    *req.uri_mut() = "http://hello.s3.test.example.com"
        .parse()
        .expect("url must be valid");

    req
}

fn get_request_with_query_virtual_host() -> Request<&'static str> {
    let mut req = Request::new("");
    *req.method_mut() = Method::GET;
    *req.uri_mut() = "http://hello.s3.test.example.com?list-type=2&max-keys=3&prefix=CI/&start-after=ExampleGuide.pdf"
        .parse()
        .expect("url must be valid");

    req
}

fn put_request() -> Request<&'static str> {
    let content = "Hello,World!";
    let mut req = Request::new(content);
    *req.method_mut() = Method::PUT;
    *req.uri_mut() = "http://127.0.0.1:9000/hello"
        .parse()
        .expect("url must be valid");

    req.headers_mut().insert(
        CONTENT_LENGTH,
        HeaderValue::from_str(&content.len().to_string()).expect("must be valid"),
    );

    req
}

fn put_request_virtual_host() -> Request<&'static str> {
    let content = "Hello,World!";
    let mut req = Request::new(content);
    *req.method_mut() = Method::PUT;
    *req.uri_mut() = "http://hello.s3.test.example.com"
        .parse()
        .expect("url must be valid");

    req.headers_mut().insert(
        CONTENT_LENGTH,
        HeaderValue::from_str(&content.len().to_string()).expect("must be valid"),
    );

    req
}

/// Sign with `aws-sigv4` and connsign at the same instant, then compare.
fn calculate(req_fn: fn() -> Request<&'static str>, token: Option<&str>) -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut req = req_fn();
    let name = format!(
        "{} {} {:?} token={}",
        req.method(),
        req.uri().path(),
        req.uri().query(),
        token.is_some(),
    );
    let now = now();

    let mut ss = SigningSettings::default();
    ss.percent_encoding_mode = PercentEncodingMode::Single;
    ss.payload_checksum_kind = PayloadChecksumKind::XAmzSha256;
    let id = Credentials::new(
        "access_key_id",
        "secret_access_key",
        token.map(|v| v.to_string()),
        None,
        "hardcoded-credentials",
    )
    .into();
    let sp = v4::SigningParams::builder()
        .identity(&id)
        .region("test")
        .name("s3")
        .time(SystemTime::from(now))
        .settings(ss)
        .build()
        .expect("signing params must be valid");

    let body = SignableBody::Bytes(req.body().as_bytes());
    let output = aws_sigv4::http_request::sign(
        SignableRequest::new(
            req.method().as_str(),
            req.uri().to_string(),
            req.headers()
                .iter()
                .map(|(k, v)| (k.as_str(), std::str::from_utf8(v.as_bytes()).unwrap())),
            body,
        )
        .unwrap(),
        &sp.into(),
    )?;
    let (aws_sig, _) = output.into_parts();
    aws_sig.apply_to_request_http1x(&mut req);
    let expected_req = req;

    let mut cred = Credential::new("access_key_id", "secret_access_key");
    if let Some(token) = token {
        cred = cred.with_session_token(token);
    }
    let signer = RequestSigner::new("s3", "test").with_time(now);
    let actual_req = sign_with_connsign(req_fn(), &signer, &cred);

    compare_request(&name, &expected_req, &actual_req);
    Ok(())
}

#[test_case(get_request; "get")]
#[test_case(get_request_with_sse; "get with sse headers")]
#[test_case(get_request_with_query; "get with query")]
#[test_case(get_request_with_empty_query_value; "get with empty query value")]
#[test_case(get_request_virtual_host; "get virtual host")]
#[test_case(get_request_with_query_virtual_host; "get with query virtual host")]
#[test_case(put_request; "put")]
#[test_case(put_request_virtual_host; "put virtual host")]
fn test_compatible_with_aws_sigv4(req_fn: fn() -> Request<&'static str>) -> Result<()> {
    calculate(req_fn, None)
}

#[test_case(get_request; "get")]
#[test_case(get_request_with_query; "get with query")]
#[test_case(put_request; "put")]
#[test_case(put_request_virtual_host; "put virtual host")]
fn test_compatible_with_aws_sigv4_with_token(
    req_fn: fn() -> Request<&'static str>,
) -> Result<()> {
    calculate(req_fn, Some("security_token"))
}

use std::time::SystemTime;

use anyhow::Result;
use aws_credential_types::Credentials;
use aws_sigv4::http_request::PayloadChecksumKind;
use aws_sigv4::http_request::PercentEncodingMode;
use aws_sigv4::http_request::SignableBody;
use aws_sigv4::http_request::SignableRequest;
use aws_sigv4::http_request::SigningSettings;
use aws_sigv4::sign::v4;
use connsign_aws_v4::{sign, Credential};
use connsign_core::time::parse_iso8601;
use connsign_core::SigningRequest;
use http::{header, Request};
use pretty_assertions::assert_eq;

const ACCESS_KEY_ID: &str = "AKIDEXAMPLE";
const SECRET_ACCESS_KEY: &str = "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY";
const URL: &str = "https://examplebucket.s3.amazonaws.com/test.txt";

#[test]
fn test_get_object_end_to_end() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let now = parse_iso8601("20150830T123600Z")?;

    let (mut parts, _) = Request::get(URL).body(())?.into_parts();
    let req = SigningRequest::build(&mut parts)?;
    let cred = Credential::new(ACCESS_KEY_ID, SECRET_ACCESS_KEY);
    let signed = sign(&req, None, "s3", "us-east-1", &cred, now)?;

    assert_eq!(signed.signature().len(), 64);
    let authorization = signed.headers()[header::AUTHORIZATION].to_str()?;
    assert!(authorization.contains("Credential=AKIDEXAMPLE/20150830/us-east-1/s3/aws4_request"));
    assert!(authorization.contains("SignedHeaders=host;x-amz-content-sha256;x-amz-date"));

    let mut ss = SigningSettings::default();
    ss.percent_encoding_mode = PercentEncodingMode::Single;
    ss.payload_checksum_kind = PayloadChecksumKind::XAmzSha256;
    let id = Credentials::new(
        ACCESS_KEY_ID,
        SECRET_ACCESS_KEY,
        None,
        None,
        "hardcoded-credentials",
    )
    .into();
    let sp = v4::SigningParams::builder()
        .identity(&id)
        .region("us-east-1")
        .name("s3")
        .time(SystemTime::from(now))
        .settings(ss)
        .build()
        .expect("signing params must be valid");

    let output = aws_sigv4::http_request::sign(
        SignableRequest::new("GET", URL, std::iter::empty(), SignableBody::Bytes(b""))
            .expect("request must be valid"),
        &sp.into(),
    )?;
    let (_, expected_signature) = output.into_parts();

    assert_eq!(signed.signature(), expected_signature);
    Ok(())
}

#[test]
fn test_apply_signed_headers_to_request() -> Result<()> {
    let now = parse_iso8601("20150830T123600Z")?;

    let mut req = Request::get(URL)
        .header(header::AUTHORIZATION, "stale")
        .header("x-amz-meta-owner", "alice")
        .body(())?;

    let (mut parts, _) = Request::get(URL).body(())?.into_parts();
    let mut signing_req = SigningRequest::build(&mut parts)?;
    signing_req
        .headers
        .insert("x-amz-meta-owner", "alice".parse()?);

    let cred = Credential::new(ACCESS_KEY_ID, SECRET_ACCESS_KEY);
    let signed = sign(&signing_req, None, "s3", "us-east-1", &cred, now)?;
    signed.apply_to(req.headers_mut());

    assert_eq!(
        signed.signed_headers(),
        "host;x-amz-content-sha256;x-amz-date;x-amz-meta-owner"
    );
    assert_eq!(req.headers().get_all(header::AUTHORIZATION).iter().count(), 1);
    assert_ne!(req.headers()[header::AUTHORIZATION], "stale");
    assert_eq!(req.headers()["x-amz-meta-owner"], "alice");
    assert_eq!(req.headers()[header::HOST], "examplebucket.s3.amazonaws.com");
    Ok(())
}

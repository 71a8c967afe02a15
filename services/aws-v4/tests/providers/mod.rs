use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use connsign_aws_v4::{
    Config, Credential, DefaultCredentialProvider, EnvCredentialProvider, ProvideCredentialChain,
    RequestSigner, StaticCredentialProvider,
};
use connsign_core::time::parse_iso8601;
use connsign_core::{Context, ErrorKind, Signer, StaticEnv};
use http::{header, Request};
use pretty_assertions::assert_eq;

fn env_context() -> Context {
    Context::new().with_env(StaticEnv {
        envs: HashMap::from_iter([
            ("AWS_ACCESS_KEY_ID".to_string(), "AKIDEXAMPLE".to_string()),
            (
                "AWS_SECRET_ACCESS_KEY".to_string(),
                "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY".to_string(),
            ),
            ("AWS_SESSION_TOKEN".to_string(), "security_token".to_string()),
            ("AWS_REGION".to_string(), "us-east-1".to_string()),
        ]),
    })
}

#[test]
fn test_signer_with_default_provider() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = env_context();
    let cfg = Config {
        service: Some("s3".to_string()),
        ..Default::default()
    }
    .from_env(&ctx);
    assert_eq!(cfg.region.as_deref(), Some("us-east-1"));

    let builder =
        RequestSigner::from_config(&cfg)?.with_time(parse_iso8601("20150830T123600Z")?);
    let signer = Signer::new(ctx, DefaultCredentialProvider::new(Arc::new(cfg)), builder);

    let (mut parts, _) = Request::get("https://examplebucket.s3.amazonaws.com/test.txt?acl")
        .body(())?
        .into_parts();
    signer.sign(&mut parts, None)?;

    assert_eq!(parts.headers["x-amz-security-token"], "security_token");
    assert_eq!(parts.headers["x-amz-date"], "20150830T123600Z");
    let authorization = parts.headers[header::AUTHORIZATION].to_str()?;
    assert!(authorization.starts_with(
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/s3/aws4_request, \
         SignedHeaders=host;x-amz-content-sha256;x-amz-date;x-amz-security-token, Signature="
    ));
    assert_eq!(parts.uri.path(), "/test.txt");
    assert_eq!(parts.uri.query(), Some("acl"));
    Ok(())
}

#[test]
fn test_signer_without_credential() -> Result<()> {
    let signer = Signer::new(
        Context::new(),
        ProvideCredentialChain::new().push(EnvCredentialProvider::new()),
        RequestSigner::new("s3", "us-east-1"),
    );

    let (mut parts, _) = Request::get("https://examplebucket.s3.amazonaws.com/test.txt")
        .body(())?
        .into_parts();
    let err = signer.sign(&mut parts, None).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert!(parts.headers.get(header::AUTHORIZATION).is_none());
    Ok(())
}

#[test]
fn test_signer_same_input_same_output() -> Result<()> {
    let now = parse_iso8601("20150830T123600Z")?;
    let signer = Signer::new(
        Context::new(),
        StaticCredentialProvider::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY"),
        RequestSigner::new("s3", "us-east-1").with_time(now),
    );

    let sign_once = || -> Result<http::HeaderMap> {
        let (mut parts, _) = Request::put("https://examplebucket.s3.amazonaws.com/test.txt")
            .header("x-amz-meta-owner", "alice")
            .body(())?
            .into_parts();
        signer.sign(&mut parts, Some(b"Hello,World!".as_slice()))?;
        Ok(parts.headers)
    };

    assert_eq!(sign_once()?, sign_once()?);
    Ok(())
}

#[test]
fn test_expired_credential_is_skipped() -> Result<()> {
    let mut expired = Credential::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY");
    expired.expires_in = Some(parse_iso8601("20150830T123600Z")?);

    let signer = Signer::new(
        Context::new(),
        StaticCredentialProvider::from(expired),
        RequestSigner::new("s3", "us-east-1"),
    );

    let (mut parts, _) = Request::get("https://examplebucket.s3.amazonaws.com/test.txt")
        .body(())?
        .into_parts();
    let err = signer.sign(&mut parts, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    Ok(())
}

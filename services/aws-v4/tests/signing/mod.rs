mod compatible;
mod scenario;

use http::Request;
use pretty_assertions::assert_eq;

/// Sign the request in place with connsign's [`RequestSigner`].
///
/// [`RequestSigner`]: connsign_aws_v4::RequestSigner
pub fn sign_with_connsign(
    req: Request<&'static str>,
    signer: &connsign_aws_v4::RequestSigner,
    cred: &connsign_aws_v4::Credential,
) -> Request<&'static str> {
    use connsign_core::SignRequest;

    let (mut parts, body) = req.into_parts();
    signer
        .sign_request(&mut parts, Some(body.as_bytes()), cred)
        .expect("sign request must succeed");
    Request::from_parts(parts, body)
}

/// Compare headers and query of two signed requests.
///
/// `aws-sigv4` never writes `host` back, so it's added from the uri when
/// missing.
pub fn compare_request(name: &str, l: &Request<&str>, r: &Request<&str>) {
    fn format_headers(req: &Request<&str>) -> Vec<String> {
        let mut hs = req
            .headers()
            .iter()
            .map(|(k, v)| format!("{}:{}", k, v.to_str().expect("must be valid")))
            .collect::<Vec<_>>();

        let authority = req.uri().authority().expect("authority must exist");
        if !hs.iter().any(|v| v.starts_with("host:")) {
            hs.push(format!("host:{authority}"))
        }

        hs.sort();
        hs
    }

    assert_eq!(
        format_headers(l),
        format_headers(r),
        "{name} header mismatch"
    );

    fn format_query(req: &Request<&str>) -> Vec<String> {
        let query = req.uri().query().unwrap_or_default();
        let mut query = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| format!("{}={}", &k, &v))
            .collect::<Vec<_>>();
        query.sort();
        query
    }

    assert_eq!(format_query(l), format_query(r), "{name} query mismatch");
}

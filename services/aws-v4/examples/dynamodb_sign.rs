use anyhow::Result;
use connsign_aws_v4::{Config, DefaultCredentialProvider, RequestSigner};
use connsign_core::{Context, OsEnv, Signer};
use std::sync::Arc;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let ctx = Context::new().with_env(OsEnv);

    // Configure AWS credentials
    let config = Config {
        region: Some("us-east-1".to_string()),
        service: Some("dynamodb".to_string()),
        ..Default::default()
    }
    .from_env(&ctx);

    let builder = RequestSigner::from_config(&config)?;
    let loader = DefaultCredentialProvider::new(Arc::new(config));
    let signer = Signer::new(ctx, loader, builder);

    println!("Listing DynamoDB tables");

    let body = br#"{}"#.to_vec();
    let req = http::Request::post("https://dynamodb.us-east-1.amazonaws.com/")
        .header("content-type", "application/x-amz-json-1.0")
        .header("x-amz-target", "DynamoDB_20120810.ListTables")
        .body(body)?;

    let (mut parts, body) = req.into_parts();

    match signer.sign(&mut parts, Some(body.as_slice())) {
        Ok(_) => {
            let req = http::Request::from_parts(parts, body);
            println!("ListTables request signed successfully!");
            println!("{req:?}");
        }
        Err(e) => eprintln!("Failed to sign ListTables request: {e}"),
    }

    Ok(())
}

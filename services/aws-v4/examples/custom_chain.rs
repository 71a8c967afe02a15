//! Example of using custom credential provider chain

use connsign_aws_v4::{
    ConfigCredentialProvider, Credential, EnvCredentialProvider, ProvideCredentialChain,
    RequestSigner,
};
use connsign_core::{Context, OsEnv, ProvideCredential, Result, Signer};
use std::sync::Arc;

/// A custom credential provider that always returns a fixed credential
#[derive(Debug)]
struct CustomCredentialProvider {
    access_key: String,
    secret_key: String,
}

impl ProvideCredential for CustomCredentialProvider {
    type Credential = Credential;

    fn provide_credential(&self, _ctx: &Context) -> Result<Option<Self::Credential>> {
        println!("Loading credential from custom provider");
        Ok(Some(Credential::new(&self.access_key, &self.secret_key)))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let ctx = Context::new().with_env(OsEnv);
    let config = Arc::new(connsign_aws_v4::Config::default().from_env(&ctx));

    // Example 1: Create a custom chain with specific order
    println!("Example 1: Custom chain with specific order");
    let custom_chain = ProvideCredentialChain::new()
        .push(ConfigCredentialProvider::new(config.clone()))
        .push(EnvCredentialProvider::new())
        .push(CustomCredentialProvider {
            access_key: "custom_key".to_string(),
            secret_key: "custom_secret".to_string(),
        });

    match custom_chain.provide_credential(&ctx)? {
        Some(cred) => println!("Found credential: {cred:?}"),
        None => println!("No credential found"),
    }

    // Example 2: Use the chain with a signer
    println!("\nExample 2: Using custom chain with signer");
    let signer = Signer::new(ctx, custom_chain, RequestSigner::new("s3", "us-east-1"));

    let (mut parts, _) = http::Request::get("https://s3.amazonaws.com/my-bucket/my-object")
        .body(())?
        .into_parts();

    match signer.sign(&mut parts, None) {
        Ok(_) => println!("Request signed successfully"),
        Err(e) => eprintln!("Failed to sign request: {e}"),
    }

    Ok(())
}

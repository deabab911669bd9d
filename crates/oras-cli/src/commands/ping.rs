//! `oras ping`: check the registry API version endpoint of a reference's host

use oras_core::error::{OrasError, OrasResult};
use oras_core::Reference;

use super::CommandContext;

pub async fn execute(reference: &str, ctx: &CommandContext) -> OrasResult<()> {
    let reference = Reference::parse(reference)?;
    let host = reference.registry();
    let resolver = ctx.build_resolver();

    let status = resolver.ping(host).await?;

    if status.is_success() {
        ctx.output.success(&format!(
            "{} is reachable ({}, {})",
            host,
            status,
            resolver.strategy()
        ));
        Ok(())
    } else if status.as_u16() == 401 {
        // The registry answered; only the credentials are in question.
        ctx.output.warn(&format!(
            "{} is reachable but requires authentication ({})",
            host,
            resolver.strategy()
        ));
        Ok(())
    } else {
        Err(OrasError::Network {
            message: format!("{} answered {} to the API version check", host, status),
            source: None,
        })
    }
}

//! `oras inspect`: show which resolver a reference would be fetched with

use oras_config::ConfigSource;
use oras_core::error::OrasResult;
use oras_core::Reference;
use oras_registry::Resolver;

use super::CommandContext;

pub async fn execute(reference: &str, ctx: &CommandContext) -> OrasResult<()> {
    let reference = Reference::parse(reference)?;
    let resolver = ctx.build_resolver();

    for (label, value) in describe(&reference, &resolver)? {
        ctx.output.field(label, &value);
    }

    match &ctx.config_source {
        Some(ConfigSource::Explicit(path)) | Some(ConfigSource::Home(path)) => {
            ctx.output.info(&format!("options merged from {}", path.display()));
        },
        None => ctx.output.info("no config file; options from flags and environment"),
    }

    Ok(())
}

/// Labelled facts about `resolver` as used for `reference`.
///
/// Passwords are never included.
pub fn describe(reference: &Reference, resolver: &Resolver) -> OrasResult<Vec<(&'static str, String)>> {
    let host = reference.registry();
    let tls = resolver.client().tls();

    let mut lines = vec![
        ("reference", reference.to_string()),
        ("registry", host.to_string()),
        ("endpoint", resolver.endpoint(host)?.to_string()),
        ("auth", resolver.strategy().to_string()),
        ("plain http", yes_no(resolver.plain_http()).to_string()),
        ("tls verify", yes_no(!tls.insecure_skip_verify).to_string()),
    ];

    if let Some(policy) = tls.renegotiation {
        let value = if tls.renegotiation_downgraded() {
            format!("{} (in force: {})", policy, tls.effective_renegotiation())
        } else {
            policy.to_string()
        };
        lines.push(("renegotiation", value));
    }

    let username = match resolver.credential(host) {
        Some(credential) if !credential.username.is_empty() => credential.username,
        Some(_) => "<token>".to_string(),
        None => "<none>".to_string(),
    };
    lines.push(("username", username));

    Ok(lines)
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

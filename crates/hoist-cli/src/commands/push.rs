//! `hoist push` — create or update apps and bring them up.

use std::{env, path::Path};

use tracing::{info, instrument};

use hoist_adapters::{InMemoryPlatform, WordPairGenerator, YamlManifestRepository};
use hoist_core::{
    error::OperationContext,
    prelude::*,
};

use crate::{
    cli::PushArgs,
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(app = ?args.name))]
pub fn execute(args: PushArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let working_dir =
        env::current_dir().with_cli_context(|| "Failed to read the working directory")?;

    let cli = parameters(&args, &working_dir)?;
    let options = PushOptions::from_invocation(&cli, args.no_start, args.no_hostname);
    let source = manifest_source(&args, &working_dir);

    let state_file = config.state_file();
    let platform = InMemoryPlatform::load(&state_file)?.targeting(&config.target.space_guid);
    seed_shared_domain(&platform, &config)?;

    let service = PushService::new(
        ports(&platform),
        config.target_context(),
        Box::new(output.clone()),
    );
    let result = service
        .resolve_apps(cli, &source, &working_dir)
        .and_then(|apps| service.push(&apps, &options));
    output.finish_activity();

    // Whatever happened before a failure stays happened.
    platform.save(&state_file)?;
    let pushed = result?;

    info!(apps = pushed.len(), "Push finished");
    output.summary(&pushed)?;
    Ok(())
}

/// Every remote port is served by the local platform.
fn ports(platform: &InMemoryPlatform) -> PushPorts {
    PushPorts {
        apps: Box::new(platform.clone()),
        routes: Box::new(platform.clone()),
        domains: Box::new(platform.clone()),
        stacks: Box::new(platform.clone()),
        services: Box::new(platform.clone()),
        binder: Box::new(platform.clone()),
        bits: Box::new(platform.clone()),
        starter: Box::new(platform.clone()),
        stopper: Box::new(platform.clone()),
        manifests: Box::new(YamlManifestRepository::new()),
        words: Box::new(WordPairGenerator::new()),
    }
}

/// A fresh platform gets the configured shared domain so the first push
/// has somewhere to route.
fn seed_shared_domain(platform: &InMemoryPlatform, config: &AppConfig) -> HoistResult<()> {
    let domain = config.platform.shared_domain.trim();
    if domain.is_empty() {
        return Ok(());
    }

    let state = platform.snapshot().during("read platform state")?;
    if state.domains.is_empty() {
        platform
            .add_domain(domain, true, None)
            .during(format!("register shared domain {domain}"))?;
        info!(domain, "Registered shared domain");
    }
    Ok(())
}

/// Turn command-line flags into per-app parameters. Only flags the user
/// gave are set.
fn parameters(args: &PushArgs, working_dir: &Path) -> HoistResult<ApplicationParameters> {
    Ok(ApplicationParameters {
        name: args.name.clone(),
        path: args.path.as_ref().map(|p| working_dir.join(p)),
        buildpack_url: args.buildpack.as_deref().map(DomainValidator::resettable),
        command: args.command.as_deref().map(DomainValidator::resettable),
        domain: args.domain.clone(),
        host: args.host.clone(),
        instance_count: args
            .instances
            .map(DomainValidator::instance_count)
            .transpose()?,
        memory: args
            .memory
            .as_deref()
            .map(DomainValidator::megabytes)
            .transpose()?,
        disk_quota: args
            .disk
            .as_deref()
            .map(DomainValidator::megabytes)
            .transpose()?,
        stack_name: args.stack.clone(),
        health_check_timeout: args
            .timeout
            .as_deref()
            .map(DomainValidator::timeout_seconds)
            .transpose()?,
        no_route: args.no_route.then_some(true),
        use_random_hostname: args.random_route.then_some(true),
        ..ApplicationParameters::default()
    })
}

fn manifest_source(args: &PushArgs, working_dir: &Path) -> ManifestSource {
    if args.no_manifest {
        ManifestSource::Disabled
    } else if let Some(path) = &args.manifest {
        ManifestSource::Explicit(working_dir.join(path))
    } else {
        ManifestSource::Discover(working_dir.to_path_buf())
    }
}

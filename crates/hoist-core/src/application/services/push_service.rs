//! Push Service - main application orchestrator.
//!
//! For every app of the [`AppSet`], in order:
//! 1. Resolve the stack
//! 2. Create or update the app
//! 3. Reconcile routes
//! 4. Upload the bits
//! 5. Bind services
//! 6. Stop, then start unless `--no-start`
//!
//! The first failure aborts the whole invocation; later apps are not
//! attempted.

use std::path::Path;

use tracing::{info, instrument};

use crate::{
    application::{
        context::TargetContext,
        events::PushReporter,
        ports::{
            AppBitsRepository, AppRepository, AppStarter, AppStopper, DomainRepository,
            ManifestRepository, RouteRepository, ServiceBinder, ServiceRepository,
            StackRepository, WordGenerator,
        },
        services::{
            app_service::AppReconciler,
            binding_service::ServiceBindings,
            lifecycle_service::LifecycleController,
            manifest_loader::{ManifestLoader, ManifestSource},
            route_service::RouteReconciler,
            stack_service::StackResolver,
            upload_service::UploadCoordinator,
        },
    },
    domain::{AppSet, Application, ApplicationParameters},
    error::HoistResult,
};

/// Every driven port a push talks to.
pub struct PushPorts {
    pub apps: Box<dyn AppRepository>,
    pub routes: Box<dyn RouteRepository>,
    pub domains: Box<dyn DomainRepository>,
    pub stacks: Box<dyn StackRepository>,
    pub services: Box<dyn ServiceRepository>,
    pub binder: Box<dyn ServiceBinder>,
    pub bits: Box<dyn AppBitsRepository>,
    pub starter: Box<dyn AppStarter>,
    pub stopper: Box<dyn AppStopper>,
    pub manifests: Box<dyn ManifestRepository>,
    pub words: Box<dyn WordGenerator>,
}

/// Invocation flags that are not per-app parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushOptions {
    pub no_start: bool,
    pub no_hostname: bool,
    /// `-n` or `-d` was given on the command line.
    pub explicit_route: bool,
}

impl PushOptions {
    pub fn from_invocation(cli: &ApplicationParameters, no_start: bool, no_hostname: bool) -> Self {
        Self {
            no_start,
            no_hostname,
            explicit_route: cli.host.is_some() || cli.domain.is_some(),
        }
    }

    /// Whether this invocation asks for routing to be (re)applied even if the
    /// app already has routes.
    pub fn routing_requested(&self) -> bool {
        self.explicit_route || self.no_hostname
    }
}

pub struct PushService {
    ports: PushPorts,
    context: TargetContext,
    reporter: Box<dyn PushReporter>,
}

impl PushService {
    /// Create a push service targeting `context`.
    pub fn new(ports: PushPorts, context: TargetContext, reporter: Box<dyn PushReporter>) -> Self {
        Self {
            ports,
            context,
            reporter,
        }
    }

    pub fn context(&self) -> &TargetContext {
        &self.context
    }

    /// Read the manifest (if any) and merge it with the command line.
    #[instrument(skip_all, fields(working_dir = %working_dir.display()))]
    pub fn resolve_apps(
        &self,
        cli: ApplicationParameters,
        source: &ManifestSource,
        working_dir: &Path,
    ) -> HoistResult<AppSet> {
        let manifest_apps =
            ManifestLoader::new(self.ports.manifests.as_ref(), self.reporter.as_ref())
                .load(source)?;

        let apps = AppSet::from_sources(cli, manifest_apps, working_dir)?;
        info!(apps = apps.len(), "Apps resolved");
        Ok(apps)
    }

    /// Push every app of `apps`, returning their final state in order.
    #[instrument(skip_all, fields(apps = apps.len(), org = %self.context.organization.name, space = %self.context.space.name))]
    pub fn push(&self, apps: &AppSet, options: &PushOptions) -> HoistResult<Vec<Application>> {
        let mut pushed = Vec::with_capacity(apps.len());
        for params in apps {
            pushed.push(self.push_one(params.clone(), options)?);
        }

        info!(apps = pushed.len(), "Push completed");
        Ok(pushed)
    }

    #[instrument(skip_all, fields(app = ?params.name))]
    fn push_one(
        &self,
        mut params: ApplicationParameters,
        options: &PushOptions,
    ) -> HoistResult<Application> {
        let ports = &self.ports;
        let reporter = self.reporter.as_ref();

        StackResolver::new(ports.stacks.as_ref(), reporter).resolve(&mut params)?;

        let mut app =
            AppReconciler::new(ports.apps.as_ref(), &self.context, reporter).reconcile(&params)?;

        RouteReconciler::new(
            ports.routes.as_ref(),
            ports.domains.as_ref(),
            ports.words.as_ref(),
            &self.context,
            reporter,
        )
        .reconcile(&mut app, &params, options)?;

        let path = params.path.as_deref().unwrap_or_else(|| Path::new("."));
        UploadCoordinator::new(ports.bits.as_ref(), reporter).upload(&app, path)?;

        if let Some(services) = &params.services_to_bind {
            ServiceBindings::new(
                ports.services.as_ref(),
                ports.binder.as_ref(),
                &self.context,
                reporter,
            )
            .bind_all(&app, services)?;
        }

        LifecycleController::new(ports.starter.as_ref(), ports.stopper.as_ref(), reporter)
            .restart(app, &params, options.no_start)
    }
}

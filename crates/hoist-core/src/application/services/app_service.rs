//! Application Reconciler - find-or-create the application record.

use tracing::{info, instrument};

use crate::{
    application::{
        context::TargetContext,
        error::ApplicationError,
        events::{PushEvent, PushReporter},
        ports::AppRepository,
    },
    domain::{Application, ApplicationParameters},
    error::{HoistResult, OperationContext},
};

pub struct AppReconciler<'a> {
    apps: &'a dyn AppRepository,
    context: &'a TargetContext,
    reporter: &'a dyn PushReporter,
}

impl<'a> AppReconciler<'a> {
    pub fn new(
        apps: &'a dyn AppRepository,
        context: &'a TargetContext,
        reporter: &'a dyn PushReporter,
    ) -> Self {
        Self {
            apps,
            context,
            reporter,
        }
    }

    /// Create the app in the targeted space, or update the existing one.
    ///
    /// Pushing twice with the same parameters yields the same app guid.
    #[instrument(skip_all, fields(app = ?params.name))]
    pub fn reconcile(&self, params: &ApplicationParameters) -> HoistResult<Application> {
        let name = params.require_name()?;

        match self.apps.find_by_name(name) {
            Ok(existing) => self.update(existing, params),
            Err(err) if err.is_not_found() => self.create(name, params),
            Err(err) => Err(ApplicationError::platform(format!("find app {name}"), err).into()),
        }
    }

    fn create(&self, name: &str, params: &ApplicationParameters) -> HoistResult<Application> {
        self.reporter.report(&PushEvent::CreatingApp {
            name: name.to_string(),
            org: self.context.organization.name.clone(),
            space: self.context.space.name.clone(),
            user: self.context.username.clone(),
        });

        let mut params = params.clone();
        params.space_guid = Some(self.context.space.guid.clone());

        let app = self
            .apps
            .create(&params)
            .during(format!("create app {name}"))?;

        info!(guid = %app.guid, "App created");
        self.reporter.report(&PushEvent::Ok);
        Ok(app)
    }

    fn update(
        &self,
        existing: Application,
        params: &ApplicationParameters,
    ) -> HoistResult<Application> {
        self.reporter.report(&PushEvent::UpdatingApp {
            name: existing.name.clone(),
            org: self.context.organization.name.clone(),
            space: self.context.space.name.clone(),
            user: self.context.username.clone(),
        });

        let mut params = params.clone();
        params.preserve_environment(&existing.environment_vars);

        let app = self
            .apps
            .update(&existing.guid, &params)
            .during(format!("update app {}", existing.name))?;

        info!(guid = %app.guid, "App updated");
        self.reporter.report(&PushEvent::Ok);
        Ok(app)
    }
}

//! Service Binder - bind named service instances to an app, in order.

use tracing::{debug, info, instrument};

use crate::{
    application::{
        context::TargetContext,
        error::{ApplicationError, ErrorCode},
        events::{PushEvent, PushReporter},
        ports::{ServiceBinder, ServiceRepository},
    },
    domain::{Application, ServiceInstance},
    error::HoistResult,
};

pub struct ServiceBindings<'a> {
    services: &'a dyn ServiceRepository,
    binder: &'a dyn ServiceBinder,
    context: &'a TargetContext,
    reporter: &'a dyn PushReporter,
}

impl<'a> ServiceBindings<'a> {
    pub fn new(
        services: &'a dyn ServiceRepository,
        binder: &'a dyn ServiceBinder,
        context: &'a TargetContext,
        reporter: &'a dyn PushReporter,
    ) -> Self {
        Self {
            services,
            binder,
            context,
            reporter,
        }
    }

    /// An existing binding counts as success. The first other failure stops
    /// the remaining bindings.
    #[instrument(skip_all, fields(app = %app.name, services = names.len()))]
    pub fn bind_all(&self, app: &Application, names: &[String]) -> HoistResult<()> {
        for name in names {
            let instance = self.find_instance(app, name)?;
            self.bind(app, &instance)?;
        }
        Ok(())
    }

    fn find_instance(&self, app: &Application, name: &str) -> HoistResult<ServiceInstance> {
        match self.services.find_instance_by_name(name) {
            Ok(instance) => Ok(instance),
            Err(err) if err.is_not_found() => Err(ApplicationError::ServiceNotFound {
                service: name.to_string(),
                app: app.name.clone(),
            }
            .into()),
            Err(err) => {
                Err(ApplicationError::platform(format!("find service {name}"), err).into())
            }
        }
    }

    fn bind(&self, app: &Application, instance: &ServiceInstance) -> HoistResult<()> {
        self.reporter.report(&PushEvent::BindingService {
            service: instance.name.clone(),
            app: app.name.clone(),
            org: self.context.organization.name.clone(),
            space: self.context.space.name.clone(),
            user: self.context.username.clone(),
        });

        match self.binder.bind_application(app, instance) {
            Ok(()) => info!(service = %instance.name, "Service bound"),
            Err(err) if err.code() == Some(&ErrorCode::AppAlreadyBound) => {
                debug!(service = %instance.name, "Service already bound");
            }
            Err(err) => {
                return Err(ApplicationError::platform(
                    format!("bind service {}", instance.name),
                    err,
                )
                .into());
            }
        }

        self.reporter.report(&PushEvent::Ok);
        Ok(())
    }
}

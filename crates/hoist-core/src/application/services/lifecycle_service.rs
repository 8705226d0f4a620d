//! Lifecycle Controller - stop a running app, then start it unless told not to.

use tracing::{instrument, warn};

use crate::{
    application::{
        events::{PushEvent, PushReporter},
        ports::{AppStarter, AppStopper},
    },
    domain::{Application, ApplicationParameters},
    error::{HoistResult, OperationContext},
};

pub struct LifecycleController<'a> {
    starter: &'a dyn AppStarter,
    stopper: &'a dyn AppStopper,
    reporter: &'a dyn PushReporter,
}

impl<'a> LifecycleController<'a> {
    pub fn new(
        starter: &'a dyn AppStarter,
        stopper: &'a dyn AppStopper,
        reporter: &'a dyn PushReporter,
    ) -> Self {
        Self {
            starter,
            stopper,
            reporter,
        }
    }

    /// A failed stop is logged and ignored; the start is attempted anyway.
    #[instrument(skip_all, fields(app = %app.name, state = %app.state, no_start = no_start))]
    pub fn restart(
        &self,
        mut app: Application,
        params: &ApplicationParameters,
        no_start: bool,
    ) -> HoistResult<Application> {
        if !app.state.is_stopped() {
            self.reporter.report(&PushEvent::Stopping {
                app: app.name.clone(),
            });
            match self.stopper.stop(&app) {
                Ok(stopped) => {
                    app = stopped;
                    self.reporter.report(&PushEvent::Ok);
                }
                Err(err) => warn!(error = %err, "Stop failed, continuing with restart"),
            }
        }

        if no_start {
            self.reporter.report(&PushEvent::SkippingStart {
                app: app.name.clone(),
            });
            return Ok(app);
        }

        // Set on every start so one app's override never carries to the next.
        self.starter
            .set_start_timeout_seconds(params.health_check_timeout);

        self.reporter.report(&PushEvent::Starting {
            app: app.name.clone(),
        });
        let started = self
            .starter
            .start(&app)
            .during(format!("start app {}", app.name))?;
        self.reporter.report(&PushEvent::Ok);
        Ok(started)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use mockall::{Sequence, predicate::eq};

    use super::*;
    use crate::application::{
        error::PlatformError,
        events::SilentReporter,
        ports::{MockAppStarter, MockAppStopper},
    };
    use crate::domain::AppState;

    fn app(state: AppState) -> Application {
        Application {
            guid: "app-guid".into(),
            name: "web".into(),
            state,
            instances: 1,
            memory: 256,
            routes: vec![],
            environment_vars: BTreeMap::new(),
        }
    }

    fn started(app: &Application) -> Result<Application, PlatformError> {
        Ok(Application {
            state: AppState::Started,
            ..app.clone()
        })
    }

    #[test]
    fn stopped_app_is_started_without_stop() {
        let mut stopper = MockAppStopper::new();
        stopper.expect_stop().never();
        let mut starter = MockAppStarter::new();
        starter
            .expect_set_start_timeout_seconds()
            .with(eq(None))
            .times(1)
            .return_const(());
        starter.expect_start().times(1).returning(started);

        let app = LifecycleController::new(&starter, &stopper, &SilentReporter)
            .restart(
                app(AppState::Stopped),
                &ApplicationParameters::named("web"),
                false,
            )
            .unwrap();

        assert_eq!(app.state, AppState::Started);
    }

    #[test]
    fn running_app_is_stopped_before_start() {
        let mut seq = Sequence::new();
        let mut stopper = MockAppStopper::new();
        stopper
            .expect_stop()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|app| {
                Ok(Application {
                    state: AppState::Stopped,
                    ..app.clone()
                })
            });
        let mut starter = MockAppStarter::new();
        starter
            .expect_set_start_timeout_seconds()
            .return_const(());
        starter
            .expect_start()
            .withf(|app| app.state == AppState::Stopped)
            .times(1)
            .in_sequence(&mut seq)
            .returning(started);

        LifecycleController::new(&starter, &stopper, &SilentReporter)
            .restart(
                app(AppState::Started),
                &ApplicationParameters::named("web"),
                false,
            )
            .unwrap();
    }

    #[test]
    fn stop_failure_is_swallowed() {
        let mut stopper = MockAppStopper::new();
        stopper
            .expect_stop()
            .returning(|_| Err(PlatformError::Transport("timeout".into())));
        let mut starter = MockAppStarter::new();
        starter
            .expect_set_start_timeout_seconds()
            .return_const(());
        starter
            .expect_start()
            .withf(|app| app.state == AppState::Crashed)
            .times(1)
            .returning(started);

        LifecycleController::new(&starter, &stopper, &SilentReporter)
            .restart(
                app(AppState::Crashed),
                &ApplicationParameters::named("web"),
                false,
            )
            .unwrap();
    }

    #[test]
    fn no_start_stops_only() {
        let mut stopper = MockAppStopper::new();
        stopper.expect_stop().times(1).returning(|app| Ok(app.clone()));
        let mut starter = MockAppStarter::new();
        starter.expect_start().never();
        starter.expect_set_start_timeout_seconds().never();

        LifecycleController::new(&starter, &stopper, &SilentReporter)
            .restart(
                app(AppState::Started),
                &ApplicationParameters::named("web"),
                true,
            )
            .unwrap();
    }

    #[test]
    fn timeout_override_is_applied_before_start() {
        let mut seq = Sequence::new();
        let stopper = MockAppStopper::new();
        let mut starter = MockAppStarter::new();
        starter
            .expect_set_start_timeout_seconds()
            .with(eq(Some(180)))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        starter
            .expect_start()
            .times(1)
            .in_sequence(&mut seq)
            .returning(started);

        let params = ApplicationParameters {
            health_check_timeout: Some(180),
            ..ApplicationParameters::named("web")
        };
        LifecycleController::new(&starter, &stopper, &SilentReporter)
            .restart(app(AppState::Stopped), &params, false)
            .unwrap();
    }

    #[test]
    fn zero_timeout_is_passed_through_as_an_override() {
        let stopper = MockAppStopper::new();
        let mut starter = MockAppStarter::new();
        starter
            .expect_set_start_timeout_seconds()
            .with(eq(Some(0)))
            .times(1)
            .return_const(());
        starter.expect_start().times(1).returning(started);

        let params = ApplicationParameters {
            health_check_timeout: Some(0),
            ..ApplicationParameters::named("web")
        };
        LifecycleController::new(&starter, &stopper, &SilentReporter)
            .restart(app(AppState::Stopped), &params, false)
            .unwrap();
    }

    #[test]
    fn start_errors_propagate() {
        let stopper = MockAppStopper::new();
        let mut starter = MockAppStarter::new();
        starter
            .expect_set_start_timeout_seconds()
            .return_const(());
        starter
            .expect_start()
            .returning(|_| Err(PlatformError::http(400, "170001", "staging failed")));

        let err = LifecycleController::new(&starter, &stopper, &SilentReporter)
            .restart(
                app(AppState::Stopped),
                &ApplicationParameters::named("web"),
                false,
            )
            .unwrap_err();

        assert!(err.to_string().contains("staging failed"));
    }
}

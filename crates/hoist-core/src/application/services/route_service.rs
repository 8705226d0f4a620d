//! Route Reconciler - make sure the app is reachable (or deliberately not).
//!
//! Per app:
//! 1. `no-route`: unbind every bound route, or note that the app is a worker
//! 2. already routed and no routing flags given: leave routing alone
//! 3. resolve the domain (explicit, else first private, else first shared)
//! 4. derive the hostname
//! 5. find the route, creating it in the targeted space when missing
//! 6. bind it unless the app already has it

use tracing::{debug, info, instrument};

use crate::{
    application::{
        context::TargetContext,
        error::{ApplicationError, ErrorCode},
        events::{PushEvent, PushReporter},
        ports::{DomainRepository, RouteRepository, WordGenerator},
        services::push_service::PushOptions,
    },
    domain::{Application, ApplicationParameters, Domain, Route, hostname::hostname_for_app},
    error::{HoistResult, OperationContext},
};

pub struct RouteReconciler<'a> {
    routes: &'a dyn RouteRepository,
    domains: &'a dyn DomainRepository,
    words: &'a dyn WordGenerator,
    context: &'a TargetContext,
    reporter: &'a dyn PushReporter,
}

impl<'a> RouteReconciler<'a> {
    pub fn new(
        routes: &'a dyn RouteRepository,
        domains: &'a dyn DomainRepository,
        words: &'a dyn WordGenerator,
        context: &'a TargetContext,
        reporter: &'a dyn PushReporter,
    ) -> Self {
        Self {
            routes,
            domains,
            words,
            context,
            reporter,
        }
    }

    /// Reconcile the routes of `app`, keeping its `routes` list in step with
    /// what was bound or unbound.
    #[instrument(skip_all, fields(app = %app.name))]
    pub fn reconcile(
        &self,
        app: &mut Application,
        params: &ApplicationParameters,
        options: &PushOptions,
    ) -> HoistResult<()> {
        if params.no_route() {
            return self.remove_routes(app);
        }

        if !app.routes.is_empty() && !options.routing_requested() {
            debug!(routes = app.routes.len(), "App already routed, leaving routes alone");
            return Ok(());
        }

        let domain = self.find_domain(params)?;
        let host = hostname_for_app(params, &app.name, options.no_hostname, || {
            self.words.babble()
        });
        let route = self.find_or_create_route(&host, &domain)?;

        if !app.has_route(&route) {
            self.bind(app, route)?;
        }
        Ok(())
    }

    fn remove_routes(&self, app: &mut Application) -> HoistResult<()> {
        if app.routes.is_empty() {
            self.reporter.report(&PushEvent::WorkerApp {
                name: app.name.clone(),
            });
            return Ok(());
        }

        while let Some(route) = app.routes.first() {
            let url = route.url();
            self.reporter.report(&PushEvent::RemovingRoute { url: url.clone() });
            self.routes
                .unbind(&route.guid, &app.guid)
                .during(format!("unbind route {url}"))?;
            info!(route = %url, "Route unbound");
            app.routes.remove(0);
        }
        Ok(())
    }

    fn find_domain(&self, params: &ApplicationParameters) -> HoistResult<Domain> {
        let org_guid = &self.context.organization.guid;

        match params.domain.as_deref() {
            Some(name) => self
                .domains
                .find_by_name_in_org(name, org_guid)
                .during(format!("find domain {name}")),
            None => self.default_domain(org_guid),
        }
    }

    /// First private domain of the org, else the first shared one seen.
    ///
    /// Stops listing as soon as a private domain turns up.
    fn default_domain(&self, org_guid: &str) -> HoistResult<Domain> {
        let mut first_shared = None;

        for domain in self.domains.list_domains_for_org(org_guid) {
            let domain = domain.during("list domains")?;
            if !domain.shared {
                return Ok(domain);
            }
            if first_shared.is_none() {
                first_shared = Some(domain);
            }
        }

        first_shared.ok_or_else(|| ApplicationError::NoDefaultDomain.into())
    }

    fn find_or_create_route(&self, host: &str, domain: &Domain) -> HoistResult<Route> {
        let url = domain.url_for_host(host);

        match self.routes.find_by_host_and_domain(host, &domain.name) {
            Ok(route) => {
                self.reporter.report(&PushEvent::UsingRoute { url: route.url() });
                Ok(route)
            }
            Err(err) if err.is_not_found() => {
                self.reporter
                    .report(&PushEvent::CreatingRoute { url: url.clone() });
                let route = self
                    .routes
                    .create_in_space(host, &domain.guid, &self.context.space.guid)
                    .during(format!("create route {url}"))?;
                info!(route = %url, guid = %route.guid, "Route created");
                self.reporter.report(&PushEvent::Ok);
                Ok(route)
            }
            Err(err) => Err(ApplicationError::platform(format!("find route {url}"), err).into()),
        }
    }

    fn bind(&self, app: &mut Application, route: Route) -> HoistResult<()> {
        let url = route.url();
        self.reporter.report(&PushEvent::BindingRoute {
            url: url.clone(),
            app: app.name.clone(),
        });

        match self.routes.bind(&route.guid, &app.guid) {
            Ok(()) => {
                info!(route = %url, "Route bound");
                self.reporter.report(&PushEvent::Ok);
                app.routes.push(route);
                Ok(())
            }
            Err(err) if err.code() == Some(&ErrorCode::InvalidRelation) => {
                Err(ApplicationError::RouteTaken { url }.into())
            }
            Err(err) => Err(ApplicationError::platform(format!("bind route {url}"), err).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::application::{
        context::{OrganizationFields, SpaceFields},
        error::{EntityKind, PlatformError, PlatformResult},
        events::SilentReporter,
        ports::{DomainListing, MockDomainRepository, MockRouteRepository, MockWordGenerator},
    };
    use crate::domain::AppState;

    fn context() -> TargetContext {
        TargetContext::new(
            OrganizationFields {
                guid: "org-guid".into(),
                name: "acme".into(),
            },
            SpaceFields {
                guid: "space-guid".into(),
                name: "dev".into(),
            },
            "alice",
        )
    }

    fn domain(name: &str, shared: bool) -> Domain {
        Domain {
            guid: format!("{name}-guid"),
            name: name.into(),
            shared,
        }
    }

    fn route(guid: &str, host: &str, domain_name: &str) -> Route {
        Route {
            guid: guid.into(),
            host: host.into(),
            domain: domain(domain_name, false),
            space_guid: "space-guid".into(),
        }
    }

    fn app(routes: Vec<Route>) -> Application {
        Application {
            guid: "app-guid".into(),
            name: "foo".into(),
            state: AppState::Stopped,
            instances: 1,
            memory: 256,
            routes,
            environment_vars: BTreeMap::new(),
        }
    }

    fn listing(domains: Vec<Domain>) -> DomainListing {
        Box::new(domains.into_iter().map(Ok))
    }

    fn reconcile(
        routes: &MockRouteRepository,
        domains: &MockDomainRepository,
        app: &mut Application,
        params: &ApplicationParameters,
        options: &PushOptions,
    ) -> HoistResult<()> {
        let words = MockWordGenerator::new();
        let ctx = context();
        RouteReconciler::new(routes, domains, &words, &ctx, &SilentReporter)
            .reconcile(app, params, options)
    }

    #[test]
    fn creates_and_binds_route_on_first_private_domain() {
        let mut domains = MockDomainRepository::new();
        domains
            .expect_list_domains_for_org()
            .withf(|org| org == "org-guid")
            .times(1)
            .returning(|_| listing(vec![domain("shared.io", true), domain("example.com", false)]));

        let mut routes = MockRouteRepository::new();
        routes
            .expect_find_by_host_and_domain()
            .withf(|host, domain| host == "foo" && domain == "example.com")
            .times(1)
            .returning(|host, _| Err(PlatformError::not_found(EntityKind::Route, host)));
        routes
            .expect_create_in_space()
            .withf(|host, domain_guid, space_guid| {
                host == "foo" && domain_guid == "example.com-guid" && space_guid == "space-guid"
            })
            .times(1)
            .returning(|_, _, _| Ok(route("route-guid", "foo", "example.com")));
        routes
            .expect_bind()
            .withf(|route_guid, app_guid| route_guid == "route-guid" && app_guid == "app-guid")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut app = app(vec![]);
        reconcile(
            &routes,
            &domains,
            &mut app,
            &ApplicationParameters::named("foo"),
            &PushOptions::default(),
        )
        .unwrap();

        assert_eq!(app.routes.len(), 1);
        assert_eq!(app.routes[0].url(), "foo.example.com");
    }

    #[test]
    fn listing_stops_at_first_private_domain() {
        let pulled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pulled);

        let mut domains = MockDomainRepository::new();
        domains.expect_list_domains_for_org().returning(move |_| {
            let counter = Arc::clone(&counter);
            let all = vec![
                domain("shared.io", true),
                domain("first.com", false),
                domain("second.com", false),
                domain("third.com", false),
            ];
            let listing: DomainListing =
                Box::new(all.into_iter().map(move |d| -> PlatformResult<Domain> {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(d)
                }));
            listing
        });

        let mut routes = MockRouteRepository::new();
        routes
            .expect_find_by_host_and_domain()
            .withf(|_, domain| domain == "first.com")
            .returning(|host, domain| Ok(route("r-1", host, domain)));
        routes.expect_bind().returning(|_, _| Ok(()));

        let mut app = app(vec![]);
        reconcile(
            &routes,
            &domains,
            &mut app,
            &ApplicationParameters::named("foo"),
            &PushOptions::default(),
        )
        .unwrap();

        assert_eq!(pulled.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn falls_back_to_first_shared_domain() {
        let mut domains = MockDomainRepository::new();
        domains
            .expect_list_domains_for_org()
            .returning(|_| listing(vec![domain("one.io", true), domain("two.io", true)]));

        let mut routes = MockRouteRepository::new();
        routes
            .expect_find_by_host_and_domain()
            .withf(|_, domain| domain == "one.io")
            .returning(|host, domain| Ok(route("r-1", host, domain)));
        routes.expect_create_in_space().never();
        routes.expect_bind().times(1).returning(|_, _| Ok(()));

        let mut app = app(vec![]);
        reconcile(
            &routes,
            &domains,
            &mut app,
            &ApplicationParameters::named("foo"),
            &PushOptions::default(),
        )
        .unwrap();
    }

    #[test]
    fn no_domains_is_fatal() {
        let mut domains = MockDomainRepository::new();
        domains
            .expect_list_domains_for_org()
            .returning(|_| listing(vec![]));
        let routes = MockRouteRepository::new();

        let err = reconcile(
            &routes,
            &domains,
            &mut app(vec![]),
            &ApplicationParameters::named("foo"),
            &PushOptions::default(),
        )
        .unwrap_err();

        assert_eq!(err, ApplicationError::NoDefaultDomain.into());
    }

    #[test]
    fn explicit_domain_is_looked_up_in_the_org() {
        let mut domains = MockDomainRepository::new();
        domains
            .expect_find_by_name_in_org()
            .withf(|name, org| name == "custom.dev" && org == "org-guid")
            .times(1)
            .returning(|name, _| Ok(domain(name, false)));
        domains.expect_list_domains_for_org().never();

        let mut routes = MockRouteRepository::new();
        routes
            .expect_find_by_host_and_domain()
            .withf(|host, domain| host == "foo" && domain == "custom.dev")
            .returning(|host, domain| Ok(route("r-1", host, domain)));
        routes.expect_bind().returning(|_, _| Ok(()));

        let params = ApplicationParameters {
            domain: Some("custom.dev".into()),
            ..ApplicationParameters::named("foo")
        };
        reconcile(
            &routes,
            &domains,
            &mut app(vec![]),
            &params,
            &PushOptions::default(),
        )
        .unwrap();
    }

    #[test]
    fn already_routed_app_without_flags_is_left_alone() {
        let domains = MockDomainRepository::new();
        let routes = MockRouteRepository::new();
        let mut app = app(vec![route("r-1", "foo", "example.com")]);

        reconcile(
            &routes,
            &domains,
            &mut app,
            &ApplicationParameters::named("foo"),
            &PushOptions::default(),
        )
        .unwrap();

        assert_eq!(app.routes.len(), 1);
    }

    #[test]
    fn bound_route_is_not_bound_again() {
        let mut domains = MockDomainRepository::new();
        domains
            .expect_list_domains_for_org()
            .returning(|_| listing(vec![domain("example.com", false)]));
        let mut routes = MockRouteRepository::new();
        routes
            .expect_find_by_host_and_domain()
            .returning(|_, _| Ok(route("r-1", "foo", "example.com")));
        routes.expect_bind().never();

        let options = PushOptions {
            explicit_route: true,
            ..PushOptions::default()
        };
        let params = ApplicationParameters {
            host: Some("foo".into()),
            ..ApplicationParameters::named("foo")
        };
        reconcile(
            &routes,
            &domains,
            &mut app(vec![route("r-1", "foo", "example.com")]),
            &params,
            &options,
        )
        .unwrap();
    }

    #[test]
    fn no_route_unbinds_every_route() {
        let domains = MockDomainRepository::new();
        let mut routes = MockRouteRepository::new();
        routes
            .expect_unbind()
            .withf(|_, app_guid| app_guid == "app-guid")
            .times(2)
            .returning(|_, _| Ok(()));
        routes.expect_delete().never();
        routes.expect_bind().never();
        routes.expect_create_in_space().never();

        let params = ApplicationParameters {
            no_route: Some(true),
            ..ApplicationParameters::named("foo")
        };
        let mut app = app(vec![
            route("r-1", "foo", "example.com"),
            route("r-2", "www", "example.com"),
        ]);
        reconcile(&routes, &domains, &mut app, &params, &PushOptions::default()).unwrap();

        assert!(app.routes.is_empty());
    }

    #[test]
    fn no_route_on_worker_makes_no_calls() {
        let domains = MockDomainRepository::new();
        let routes = MockRouteRepository::new();
        let params = ApplicationParameters {
            no_route: Some(true),
            ..ApplicationParameters::named("foo")
        };

        reconcile(
            &routes,
            &domains,
            &mut app(vec![]),
            &params,
            &PushOptions::default(),
        )
        .unwrap();
    }

    #[test]
    fn route_owned_elsewhere_is_reported_as_taken() {
        let mut domains = MockDomainRepository::new();
        domains
            .expect_list_domains_for_org()
            .returning(|_| listing(vec![domain("example.com", false)]));
        let mut routes = MockRouteRepository::new();
        routes
            .expect_find_by_host_and_domain()
            .returning(|_, _| Ok(route("r-9", "foo", "example.com")));
        routes
            .expect_bind()
            .returning(|_, _| Err(PlatformError::http(400, "1002", "invalid relation")));

        let err = reconcile(
            &routes,
            &domains,
            &mut app(vec![]),
            &ApplicationParameters::named("foo"),
            &PushOptions::default(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            ApplicationError::RouteTaken {
                url: "foo.example.com".into()
            }
            .into()
        );
    }

    #[test]
    fn random_route_appends_generated_words() {
        let mut domains = MockDomainRepository::new();
        domains
            .expect_list_domains_for_org()
            .returning(|_| listing(vec![domain("example.com", false)]));
        let mut routes = MockRouteRepository::new();
        routes
            .expect_find_by_host_and_domain()
            .withf(|host, _| host == "foo-brave-otter")
            .returning(|host, domain| Ok(route("r-1", host, domain)));
        routes.expect_bind().returning(|_, _| Ok(()));
        let mut words = MockWordGenerator::new();
        words
            .expect_babble()
            .times(1)
            .returning(|| "brave-otter".into());

        let params = ApplicationParameters {
            use_random_hostname: Some(true),
            ..ApplicationParameters::named("foo")
        };
        let ctx = context();
        RouteReconciler::new(&routes, &domains, &words, &ctx, &SilentReporter)
            .reconcile(&mut app(vec![]), &params, &PushOptions::default())
            .unwrap();
    }
}

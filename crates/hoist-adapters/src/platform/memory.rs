//! In-memory platform implementing every remote port.
//!
//! State lives behind an `Arc<RwLock<_>>`, so clones share it; the CLI hands
//! one clone to each port slot of `PushPorts`. Every port call is appended
//! to a journal that tests assert against.

use std::{
    collections::VecDeque,
    path::Path,
    sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tracing::{debug, info, instrument};
use uuid::Uuid;

use hoist_core::{
    application::{
        EntityKind, ErrorCode, PlatformError, PlatformResult,
        ports::{
            AppBitsRepository, AppRepository, AppStarter, AppStopper, DomainListing,
            DomainRepository, RouteRepository, ServiceBinder, ServiceRepository, StackRepository,
            UploadProgress,
        },
    },
    domain::{
        AppState, Application, ApplicationParameters, Domain, Route, ServiceInstance, Stack,
    },
};

use super::state::{AppRecord, DomainRecord, PlatformState, ServiceBinding};
use crate::artifact::{ArtifactScanner, changed_files};

/// Domains returned per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 50;

const APP_NAME_TAKEN: &str = "100002";
const ROUTE_HOST_TAKEN: &str = "210003";
const BAD_REQUEST: u16 = 400;

/// One call made through a port, in order of arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    FindApp { name: String },
    CreateApp { name: String },
    UpdateApp { guid: String },
    FindRoute { host: String, domain: String },
    CreateRoute { host: String, domain_guid: String },
    BindRoute { route_guid: String, app_guid: String },
    UnbindRoute { route_guid: String, app_guid: String },
    DeleteRoute { route_guid: String },
    FindDomain { name: String },
    ListDomainsPage { page: usize },
    FindStack { name: String },
    FindServiceInstance { name: String },
    BindService { app_guid: String, instance_guid: String },
    UploadBits { app_guid: String, file_count: u64 },
    Start { app_guid: String, timeout_seconds: Option<u32> },
    Stop { app_guid: String },
}

impl PlatformCall {
    pub fn is_route_call(&self) -> bool {
        matches!(
            self,
            Self::FindRoute { .. }
                | Self::CreateRoute { .. }
                | Self::BindRoute { .. }
                | Self::UnbindRoute { .. }
                | Self::DeleteRoute { .. }
        )
    }

    pub fn is_domain_call(&self) -> bool {
        matches!(self, Self::FindDomain { .. } | Self::ListDomainsPage { .. })
    }
}

/// Thread-safe platform kept in memory.
#[derive(Clone)]
pub struct InMemoryPlatform {
    state: Arc<RwLock<PlatformState>>,
    journal: Arc<Mutex<Vec<PlatformCall>>>,
    /// `None` means "platform default".
    start_timeout: Arc<Mutex<Option<u32>>>,
    page_size: usize,
    /// Space that app lookups are confined to; `None` sees every space.
    target_space: Option<String>,
    scanner: ArtifactScanner,
}

impl InMemoryPlatform {
    /// Create an empty platform.
    pub fn new() -> Self {
        Self::from_state(PlatformState::default())
    }

    pub fn from_state(state: PlatformState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
            journal: Arc::new(Mutex::new(Vec::new())),
            start_timeout: Arc::new(Mutex::new(None)),
            page_size: DEFAULT_PAGE_SIZE,
            target_space: None,
            scanner: ArtifactScanner::new(),
        }
    }

    /// Set how many domains each listing page holds.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Confine app lookups to `space_guid`, the way a targeted session would.
    pub fn targeting(mut self, space_guid: impl Into<String>) -> Self {
        self.target_space = Some(space_guid.into());
        self
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> PlatformResult<PlatformState> {
        Ok(self.read()?.clone())
    }

    /// Every call recorded so far.
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.journal
            .lock()
            .map(|journal| journal.clone())
            .unwrap_or_default()
    }

    pub fn clear_calls(&self) {
        if let Ok(mut journal) = self.journal.lock() {
            journal.clear();
        }
    }

    // ── Seeding ──────────────────────────────────────────────────────────────

    /// Register a domain. Private domains need an owning organization.
    pub fn add_domain(
        &self,
        name: &str,
        shared: bool,
        owning_org_guid: Option<&str>,
    ) -> PlatformResult<Domain> {
        let domain = Domain {
            guid: new_guid(),
            name: name.to_string(),
            shared,
        };
        self.write()?.domains.push(DomainRecord {
            domain: domain.clone(),
            owning_org_guid: owning_org_guid.map(Into::into),
        });
        Ok(domain)
    }

    pub fn add_stack(&self, name: &str) -> PlatformResult<Stack> {
        let stack = Stack {
            guid: new_guid(),
            name: name.to_string(),
        };
        self.write()?.stacks.push(stack.clone());
        Ok(stack)
    }

    pub fn add_service_instance(&self, name: &str) -> PlatformResult<ServiceInstance> {
        let instance = ServiceInstance {
            guid: new_guid(),
            name: name.to_string(),
        };
        self.write()?.service_instances.push(instance.clone());
        Ok(instance)
    }

    /// Register an existing app in `space_guid`.
    pub fn add_app(
        &self,
        name: &str,
        space_guid: &str,
        state: AppState,
    ) -> PlatformResult<Application> {
        let mut record = AppRecord::new(new_guid(), name.to_string(), space_guid.to_string());
        record.state = state;

        let mut platform = self.write()?;
        let app = platform.to_application(&record);
        platform.apps.push(record);
        Ok(app)
    }

    /// Register a route and optionally bind it, without journaling.
    pub fn add_route(
        &self,
        host: &str,
        domain_guid: &str,
        space_guid: &str,
        bound_app_guid: Option<&str>,
    ) -> PlatformResult<Route> {
        let mut platform = self.write()?;
        let route = insert_route(&mut platform, host, domain_guid, space_guid)?;
        if let Some(app_guid) = bound_app_guid {
            attach_route(&mut platform, &route.guid, app_guid)?;
        }
        Ok(route)
    }

    /// The app as a push would see it, without journaling.
    pub fn inspect_app(&self, name: &str) -> PlatformResult<Option<Application>> {
        let platform = self.read()?;
        Ok(platform
            .app_named(name, self.target_space.as_deref())
            .map(|record| platform.to_application(record)))
    }

    pub fn app_record(&self, name: &str) -> PlatformResult<Option<AppRecord>> {
        Ok(self
            .read()?
            .app_named(name, self.target_space.as_deref())
            .cloned())
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn record(&self, call: PlatformCall) {
        debug!(?call, "Platform call");
        if let Ok(mut journal) = self.journal.lock() {
            journal.push(call);
        }
    }

    fn read(&self) -> PlatformResult<RwLockReadGuard<'_, PlatformState>> {
        self.state.read().map_err(|_| poisoned())
    }

    fn write(&self) -> PlatformResult<RwLockWriteGuard<'_, PlatformState>> {
        self.state.write().map_err(|_| poisoned())
    }

    fn set_state(&self, guid: &str, state: AppState) -> PlatformResult<Application> {
        let mut platform = self.write()?;
        let record = platform
            .app_mut(guid)
            .ok_or_else(|| PlatformError::not_found(EntityKind::App, guid))?;
        record.state = state;
        let record = record.clone();
        Ok(platform.to_application(&record))
    }

    fn domain_page(&self, org_guid: &str, page: usize) -> PlatformResult<Vec<Domain>> {
        self.record(PlatformCall::ListDomainsPage { page });
        Ok(self
            .read()?
            .domains_for_org(org_guid)
            .skip(page * self.page_size)
            .take(self.page_size)
            .cloned()
            .collect())
    }
}

impl Default for InMemoryPlatform {
    fn default() -> Self {
        Self::new()
    }
}

fn new_guid() -> String {
    Uuid::new_v4().to_string()
}

fn poisoned() -> PlatformError {
    PlatformError::Transport("platform state lock poisoned".into())
}

fn insert_route(
    platform: &mut PlatformState,
    host: &str,
    domain_guid: &str,
    space_guid: &str,
) -> PlatformResult<Route> {
    let domain = platform
        .domain(domain_guid)
        .cloned()
        .ok_or_else(|| PlatformError::not_found(EntityKind::Domain, domain_guid))?;

    if platform
        .routes
        .iter()
        .any(|route| route.host == host && route.domain.guid == domain_guid)
    {
        return Err(PlatformError::http(
            BAD_REQUEST,
            ROUTE_HOST_TAKEN,
            format!("The host is taken: {host}"),
        ));
    }

    let route = Route {
        guid: new_guid(),
        host: host.to_string(),
        domain,
        space_guid: space_guid.to_string(),
    };
    platform.routes.push(route.clone());
    Ok(route)
}

/// Bind `route_guid` to `app_guid`. Binding twice is a no-op; binding a
/// route owned by another space is an invalid relation.
fn attach_route(platform: &mut PlatformState, route_guid: &str, app_guid: &str) -> PlatformResult<()> {
    let route_space = platform
        .route(route_guid)
        .map(|route| route.space_guid.clone())
        .ok_or_else(|| PlatformError::not_found(EntityKind::Route, route_guid))?;
    let app = platform
        .app_mut(app_guid)
        .ok_or_else(|| PlatformError::not_found(EntityKind::App, app_guid))?;

    if route_space != app.space_guid {
        return Err(PlatformError::http(
            BAD_REQUEST,
            ErrorCode::INVALID_RELATION,
            "The requested route relation is invalid",
        ));
    }

    if !app.route_guids.iter().any(|guid| guid == route_guid) {
        app.route_guids.push(route_guid.to_string());
    }
    Ok(())
}

// ── Ports ────────────────────────────────────────────────────────────────────

impl AppRepository for InMemoryPlatform {
    fn find_by_name(&self, name: &str) -> PlatformResult<Application> {
        self.record(PlatformCall::FindApp { name: name.into() });
        let platform = self.read()?;
        platform
            .app_named(name, self.target_space.as_deref())
            .map(|record| platform.to_application(record))
            .ok_or_else(|| PlatformError::not_found(EntityKind::App, name))
    }

    #[instrument(skip_all, fields(app = ?params.name))]
    fn create(&self, params: &ApplicationParameters) -> PlatformResult<Application> {
        let name = params.name.clone().unwrap_or_default();
        self.record(PlatformCall::CreateApp { name: name.clone() });

        let space_guid = params
            .space_guid
            .clone()
            .or_else(|| self.target_space.clone())
            .unwrap_or_default();

        // Names are unique per space.
        let mut platform = self.write()?;
        if platform.app_named(&name, Some(space_guid.as_str())).is_some() {
            return Err(PlatformError::http(
                BAD_REQUEST,
                APP_NAME_TAKEN,
                format!("The app name is taken: {name}"),
            ));
        }

        let mut record = AppRecord::new(new_guid(), name, space_guid);
        record.apply(params);

        info!(guid = %record.guid, "App created");
        let app = platform.to_application(&record);
        platform.apps.push(record);
        Ok(app)
    }

    #[instrument(skip_all, fields(guid = %guid))]
    fn update(&self, guid: &str, params: &ApplicationParameters) -> PlatformResult<Application> {
        self.record(PlatformCall::UpdateApp { guid: guid.into() });

        let mut platform = self.write()?;
        let record = platform
            .app_mut(guid)
            .ok_or_else(|| PlatformError::not_found(EntityKind::App, guid))?;
        record.apply(params);
        let record = record.clone();
        Ok(platform.to_application(&record))
    }
}

impl RouteRepository for InMemoryPlatform {
    fn find_by_host_and_domain(&self, host: &str, domain_name: &str) -> PlatformResult<Route> {
        self.record(PlatformCall::FindRoute {
            host: host.into(),
            domain: domain_name.into(),
        });
        self.read()?
            .routes
            .iter()
            .find(|route| route.host == host && route.domain.name == domain_name)
            .cloned()
            .ok_or_else(|| {
                PlatformError::not_found(
                    EntityKind::Route,
                    format!("{host}.{domain_name}").trim_start_matches('.'),
                )
            })
    }

    fn create_in_space(
        &self,
        host: &str,
        domain_guid: &str,
        space_guid: &str,
    ) -> PlatformResult<Route> {
        self.record(PlatformCall::CreateRoute {
            host: host.into(),
            domain_guid: domain_guid.into(),
        });
        insert_route(&mut *self.write()?, host, domain_guid, space_guid)
    }

    fn bind(&self, route_guid: &str, app_guid: &str) -> PlatformResult<()> {
        self.record(PlatformCall::BindRoute {
            route_guid: route_guid.into(),
            app_guid: app_guid.into(),
        });
        attach_route(&mut *self.write()?, route_guid, app_guid)
    }

    fn unbind(&self, route_guid: &str, app_guid: &str) -> PlatformResult<()> {
        self.record(PlatformCall::UnbindRoute {
            route_guid: route_guid.into(),
            app_guid: app_guid.into(),
        });
        let mut platform = self.write()?;
        let app = platform
            .app_mut(app_guid)
            .ok_or_else(|| PlatformError::not_found(EntityKind::App, app_guid))?;
        app.route_guids.retain(|guid| guid != route_guid);
        Ok(())
    }

    fn delete(&self, route_guid: &str) -> PlatformResult<()> {
        self.record(PlatformCall::DeleteRoute {
            route_guid: route_guid.into(),
        });
        let mut platform = self.write()?;
        let before = platform.routes.len();
        platform.routes.retain(|route| route.guid != route_guid);
        if platform.routes.len() == before {
            return Err(PlatformError::not_found(EntityKind::Route, route_guid));
        }
        for app in &mut platform.apps {
            app.route_guids.retain(|guid| guid != route_guid);
        }
        Ok(())
    }
}

impl DomainRepository for InMemoryPlatform {
    fn find_by_name_in_org(&self, name: &str, org_guid: &str) -> PlatformResult<Domain> {
        self.record(PlatformCall::FindDomain { name: name.into() });
        self.read()?
            .domains_for_org(org_guid)
            .find(|domain| domain.name == name)
            .cloned()
            .ok_or_else(|| PlatformError::not_found(EntityKind::Domain, name))
    }

    fn list_domains_for_org(&self, org_guid: &str) -> DomainListing {
        Box::new(DomainPages {
            platform: self.clone(),
            org_guid: org_guid.to_string(),
            next_page: 0,
            buffer: VecDeque::new(),
            exhausted: false,
        })
    }
}

/// Fetches one page at a time, only when the buffer runs dry.
struct DomainPages {
    platform: InMemoryPlatform,
    org_guid: String,
    next_page: usize,
    buffer: VecDeque<Domain>,
    exhausted: bool,
}

impl Iterator for DomainPages {
    type Item = PlatformResult<Domain>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.exhausted {
            match self.platform.domain_page(&self.org_guid, self.next_page) {
                Ok(page) => {
                    self.exhausted = page.len() < self.platform.page_size;
                    self.next_page += 1;
                    self.buffer.extend(page);
                }
                Err(err) => {
                    self.exhausted = true;
                    return Some(Err(err));
                }
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}

impl StackRepository for InMemoryPlatform {
    fn find_by_name(&self, name: &str) -> PlatformResult<Stack> {
        self.record(PlatformCall::FindStack { name: name.into() });
        self.read()?
            .stacks
            .iter()
            .find(|stack| stack.name == name)
            .cloned()
            .ok_or_else(|| PlatformError::not_found(EntityKind::Stack, name))
    }
}

impl ServiceRepository for InMemoryPlatform {
    fn find_instance_by_name(&self, name: &str) -> PlatformResult<ServiceInstance> {
        self.record(PlatformCall::FindServiceInstance { name: name.into() });
        self.read()?
            .service_instances
            .iter()
            .find(|instance| instance.name == name)
            .cloned()
            .ok_or_else(|| PlatformError::not_found(EntityKind::ServiceInstance, name))
    }
}

impl ServiceBinder for InMemoryPlatform {
    fn bind_application(
        &self,
        app: &Application,
        instance: &ServiceInstance,
    ) -> PlatformResult<()> {
        self.record(PlatformCall::BindService {
            app_guid: app.guid.clone(),
            instance_guid: instance.guid.clone(),
        });

        let binding = ServiceBinding {
            app_guid: app.guid.clone(),
            service_instance_guid: instance.guid.clone(),
        };
        let mut platform = self.write()?;
        if platform.service_bindings.contains(&binding) {
            return Err(PlatformError::http(
                BAD_REQUEST,
                ErrorCode::APP_ALREADY_BOUND,
                format!("The app is already bound to {}", instance.name),
            ));
        }
        platform.service_bindings.push(binding);
        Ok(())
    }
}

impl AppBitsRepository for InMemoryPlatform {
    #[instrument(skip_all, fields(guid = %app_guid, path = %path.display()))]
    fn upload_app(
        &self,
        app_guid: &str,
        path: &Path,
        on_progress: &mut dyn FnMut(UploadProgress),
    ) -> PlatformResult<()> {
        let previous = self
            .read()?
            .app(app_guid)
            .map(|record| record.uploaded_files.clone())
            .ok_or_else(|| PlatformError::not_found(EntityKind::App, app_guid))?;

        let current = self.scanner.scan(path).map_err(|err| {
            PlatformError::Transport(format!("Error processing app files: {err}"))
        })?;
        let changed = changed_files(&previous, &current);

        if !changed.removed.is_empty() {
            debug!(removed = ?changed.removed, "Files gone since last upload");
        }
        let progress = UploadProgress {
            path: path.to_path_buf(),
            bytes: changed.bytes(),
            file_count: changed.file_count(),
        };
        let file_count = progress.file_count;
        on_progress(progress);

        let mut platform = self.write()?;
        let record = platform
            .app_mut(app_guid)
            .ok_or_else(|| PlatformError::not_found(EntityKind::App, app_guid))?;
        record.uploaded_files = current
            .into_iter()
            .map(|file| (file.path, file.sha256))
            .collect();
        drop(platform);

        if file_count > 0 {
            self.record(PlatformCall::UploadBits {
                app_guid: app_guid.into(),
                file_count,
            });
            info!(file_count, "Bits uploaded");
        }
        Ok(())
    }
}

impl AppStarter for InMemoryPlatform {
    fn set_start_timeout_seconds(&self, seconds: Option<u32>) {
        *self
            .start_timeout
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = seconds;
    }

    fn start(&self, app: &Application) -> PlatformResult<Application> {
        let timeout_seconds = *self
            .start_timeout
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.record(PlatformCall::Start {
            app_guid: app.guid.clone(),
            timeout_seconds,
        });
        self.set_state(&app.guid, AppState::Started)
    }
}

impl AppStopper for InMemoryPlatform {
    fn stop(&self, app: &Application) -> PlatformResult<Application> {
        self.record(PlatformCall::Stop {
            app_guid: app.guid.clone(),
        });
        self.set_state(&app.guid, AppState::Stopped)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn platform_with_app() -> (InMemoryPlatform, Application) {
        let platform = InMemoryPlatform::new();
        let app = platform.add_app("web", "space-1", AppState::Stopped).unwrap();
        (platform, app)
    }

    #[test]
    fn domain_listing_fetches_pages_lazily() {
        let platform = InMemoryPlatform::new().with_page_size(2);
        for name in ["a.com", "b.com", "c.com", "d.com", "e.com"] {
            platform.add_domain(name, true, None).unwrap();
        }

        let first = platform
            .list_domains_for_org("org")
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(first.name, "a.com");
        assert_eq!(platform.calls(), [PlatformCall::ListDomainsPage { page: 0 }]);

        platform.clear_calls();
        let all: Vec<_> = platform
            .list_domains_for_org("org")
            .map(|d| d.unwrap().name)
            .collect();
        assert_eq!(all, ["a.com", "b.com", "c.com", "d.com", "e.com"]);
        assert_eq!(platform.calls().len(), 3);
    }

    #[test]
    fn private_domains_of_other_orgs_are_hidden() {
        let platform = InMemoryPlatform::new();
        platform.add_domain("corp.io", false, Some("org-2")).unwrap();

        let err = platform.find_by_name_in_org("corp.io", "org-1").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(platform.list_domains_for_org("org-1").count(), 0);
    }

    #[test]
    fn binding_a_route_from_another_space_is_an_invalid_relation() {
        let (platform, app) = platform_with_app();
        let domain = platform.add_domain("example.com", true, None).unwrap();
        let route = platform
            .add_route("web", &domain.guid, "space-2", None)
            .unwrap();

        let err = platform.bind(&route.guid, &app.guid).unwrap_err();
        assert_eq!(err.code(), Some(&ErrorCode::InvalidRelation));
    }

    #[test]
    fn route_bind_is_idempotent_and_unbind_keeps_the_route() {
        let (platform, app) = platform_with_app();
        let domain = platform.add_domain("example.com", true, None).unwrap();
        let route = platform
            .create_in_space("web", &domain.guid, "space-1")
            .unwrap();

        platform.bind(&route.guid, &app.guid).unwrap();
        platform.bind(&route.guid, &app.guid).unwrap();
        assert_eq!(platform.inspect_app("web").unwrap().unwrap().routes, [route.clone()]);

        platform.unbind(&route.guid, &app.guid).unwrap();
        assert!(platform.inspect_app("web").unwrap().unwrap().routes.is_empty());
        assert_eq!(
            platform.find_by_host_and_domain("web", "example.com").unwrap(),
            route
        );

        platform.delete(&route.guid).unwrap();
        assert!(
            platform
                .find_by_host_and_domain("web", "example.com")
                .unwrap_err()
                .is_not_found()
        );
    }

    #[test]
    fn duplicate_route_is_rejected() {
        let platform = InMemoryPlatform::new();
        let domain = platform.add_domain("example.com", true, None).unwrap();
        platform.create_in_space("web", &domain.guid, "s").unwrap();

        let err = platform.create_in_space("web", &domain.guid, "s").unwrap_err();
        assert_eq!(err.code(), Some(&ErrorCode::Other(ROUTE_HOST_TAKEN.into())));
    }

    #[test]
    fn second_service_bind_reports_already_bound() {
        let (platform, app) = platform_with_app();
        let db = platform.add_service_instance("db").unwrap();

        platform.bind_application(&app, &db).unwrap();
        let err = platform.bind_application(&app, &db).unwrap_err();
        assert_eq!(err.code(), Some(&ErrorCode::AppAlreadyBound));
    }

    #[test]
    fn created_apps_start_stopped_in_the_given_space() {
        let platform = InMemoryPlatform::new();
        let app = platform
            .create(&ApplicationParameters {
                space_guid: Some("space-1".into()),
                instance_count: Some(2),
                ..ApplicationParameters::named("api")
            })
            .unwrap();

        assert_eq!(app.state, AppState::Stopped);
        assert_eq!(app.instances, 2);
        let record = platform.app_record("api").unwrap().unwrap();
        assert_eq!(record.space_guid, "space-1");

        let err = platform
            .create(&ApplicationParameters {
                space_guid: Some("space-1".into()),
                ..ApplicationParameters::named("api")
            })
            .unwrap_err();
        assert!(!err.is_not_found());

        let elsewhere = platform
            .create(&ApplicationParameters {
                space_guid: Some("space-2".into()),
                ..ApplicationParameters::named("api")
            })
            .unwrap();
        assert_ne!(elsewhere.guid, app.guid);
    }

    #[test]
    fn targeted_platform_only_finds_apps_in_its_space() {
        let shared = InMemoryPlatform::new();
        let other = shared.add_app("web", "space-2", AppState::Started).unwrap();

        let targeted = shared.clone().targeting("space-1");
        assert!(AppRepository::find_by_name(&targeted, "web").unwrap_err().is_not_found());
        assert!(targeted.app_record("web").unwrap().is_none());

        let mine = targeted.create(&ApplicationParameters::named("web")).unwrap();
        assert_ne!(mine.guid, other.guid);
        assert_eq!(AppRepository::find_by_name(&targeted, "web").unwrap().guid, mine.guid);
        let theirs = shared.clone().targeting("space-2");
        assert_eq!(
            AppRepository::find_by_name(&theirs, "web").unwrap().guid,
            other.guid
        );
    }

    #[test]
    fn upload_only_transfers_changed_files() {
        let (platform, app) = platform_with_app();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.rb"), "puts 1").unwrap();
        fs::write(dir.path().join("Gemfile"), "source").unwrap();

        let mut seen = Vec::new();
        platform
            .upload_app(&app.guid, dir.path(), &mut |p| seen.push(p.file_count))
            .unwrap();
        platform
            .upload_app(&app.guid, dir.path(), &mut |p| seen.push(p.file_count))
            .unwrap();
        fs::write(dir.path().join("app.rb"), "puts 2").unwrap();
        platform
            .upload_app(&app.guid, dir.path(), &mut |p| seen.push(p.file_count))
            .unwrap();

        assert_eq!(seen, [2, 0, 1]);
        let uploads = platform
            .calls()
            .into_iter()
            .filter(|call| matches!(call, PlatformCall::UploadBits { .. }))
            .count();
        assert_eq!(uploads, 2);
    }

    #[test]
    fn zero_timeout_is_kept_and_none_clears_it() {
        let (platform, app) = platform_with_app();

        platform.set_start_timeout_seconds(Some(0));
        platform.start(&app).unwrap();
        platform.set_start_timeout_seconds(None);
        platform.start(&app).unwrap();

        let timeouts: Vec<_> = platform
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::Start { timeout_seconds, .. } => Some(timeout_seconds),
                _ => None,
            })
            .collect();
        assert_eq!(timeouts, vec![Some(0), None]);
    }

    #[test]
    fn start_records_the_timeout_override() {
        let (platform, app) = platform_with_app();
        platform.set_start_timeout_seconds(Some(120));

        let started = platform.start(&app).unwrap();
        let stopped = platform.stop(&started).unwrap();

        assert_eq!(started.state, AppState::Started);
        assert_eq!(stopped.state, AppState::Stopped);
        assert_eq!(
            platform.calls(),
            [
                PlatformCall::Start {
                    app_guid: app.guid.clone(),
                    timeout_seconds: Some(120)
                },
                PlatformCall::Stop { app_guid: app.guid }
            ]
        );
    }

    #[test]
    fn clones_share_state_and_journal() {
        let platform = InMemoryPlatform::new();
        let clone = platform.clone();
        clone.add_stack("cflinuxfs4").unwrap();

        assert!(StackRepository::find_by_name(&platform, "cflinuxfs4").is_ok());
        assert_eq!(clone.calls().len(), 1);
    }
}

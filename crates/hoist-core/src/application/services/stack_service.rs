//! Stack Resolver - turns a stack name into the platform's stack guid.

use tracing::{debug, instrument};

use crate::{
    application::{
        events::{PushEvent, PushReporter},
        ports::StackRepository,
    },
    domain::ApplicationParameters,
    error::{HoistResult, OperationContext},
};

pub struct StackResolver<'a> {
    stacks: &'a dyn StackRepository,
    reporter: &'a dyn PushReporter,
}

impl<'a> StackResolver<'a> {
    pub fn new(stacks: &'a dyn StackRepository, reporter: &'a dyn PushReporter) -> Self {
        Self { stacks, reporter }
    }

    /// Sets `params.stack_guid` when a stack is named. A lookup failure
    /// aborts the push of this app.
    #[instrument(skip_all, fields(stack = ?params.stack_name))]
    pub fn resolve(&self, params: &mut ApplicationParameters) -> HoistResult<()> {
        let Some(name) = params.stack_name.as_deref() else {
            return Ok(());
        };

        self.reporter.report(&PushEvent::UsingStack {
            name: name.to_string(),
        });
        let stack = self
            .stacks
            .find_by_name(name)
            .during(format!("find stack {name}"))?;
        self.reporter.report(&PushEvent::Ok);

        debug!(guid = %stack.guid, "Stack resolved");
        params.stack_guid = Some(stack.guid);
        Ok(())
    }
}

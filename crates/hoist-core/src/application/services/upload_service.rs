//! Upload Coordinator - hands the app bits to the uploader and reports what
//! it is about to send.

use std::path::Path;

use tracing::{debug, instrument};

use crate::{
    application::{
        events::{PushEvent, PushReporter},
        ports::{AppBitsRepository, UploadProgress},
    },
    domain::{Application, ByteSize},
    error::{HoistResult, OperationContext},
};

pub struct UploadCoordinator<'a> {
    bits: &'a dyn AppBitsRepository,
    reporter: &'a dyn PushReporter,
}

impl<'a> UploadCoordinator<'a> {
    pub fn new(bits: &'a dyn AppBitsRepository, reporter: &'a dyn PushReporter) -> Self {
        Self { bits, reporter }
    }

    #[instrument(skip_all, fields(app = %app.name, path = %path.display()))]
    pub fn upload(&self, app: &Application, path: &Path) -> HoistResult<()> {
        self.reporter.report(&PushEvent::Uploading {
            app: app.name.clone(),
        });

        let reporter = self.reporter;
        let mut describe = |progress: UploadProgress| {
            debug!(
                bytes = progress.bytes,
                files = progress.file_count,
                "Upload diff computed"
            );
            if progress.file_count == 0 {
                reporter.report(&PushEvent::NothingChanged);
            } else {
                reporter.report(&PushEvent::UploadingFiles {
                    path: progress.path,
                    size: ByteSize::from_bytes(progress.bytes),
                    file_count: progress.file_count,
                });
            }
        };

        self.bits
            .upload_app(&app.guid, path, &mut describe)
            .during(format!("upload application {}", app.name))?;

        self.reporter.report(&PushEvent::Ok);
        Ok(())
    }
}

//! Hand-written port fakes shared by the service tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use kvsource_domain::error::BoxError;
use kvsource_domain::event::Event;
use kvsource_domain::name::DatasourceName;

use crate::ports::{ConnectionHandle, DatasourceBootstrap, EventPublisher, StorageEngine};

/// Handle to a fake engine instance; `serial` identifies the open call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeHandle {
    pub serial: usize,
    pub path: PathBuf,
}

impl ConnectionHandle for FakeHandle {
    fn location(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, thiserror::Error)]
#[error("fake engine failure: {0}")]
pub struct FakeError(pub &'static str);

/// Engine that writes an empty file on open and records every call.
///
/// Opening a file whose name contains `fail-open` fails, as does closing
/// one whose name contains `fail-close`.
#[derive(Debug, Default)]
pub struct FakeEngine {
    opens: AtomicUsize,
    closed: Mutex<Vec<FakeHandle>>,
}

impl FakeEngine {
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> Vec<FakeHandle> {
        self.closed.lock().clone()
    }
}

fn file_name_contains(path: &Path, needle: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.contains(needle))
}

impl StorageEngine for FakeEngine {
    type Handle = FakeHandle;
    type Error = FakeError;

    async fn open(&self, path: &Path) -> Result<FakeHandle, FakeError> {
        // Give concurrent callers a chance to interleave.
        tokio::task::yield_now().await;
        if file_name_contains(path, "fail-open") {
            return Err(FakeError("open refused"));
        }
        std::fs::write(path, b"").map_err(|_| FakeError("cannot create file"))?;
        let serial = self.opens.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(FakeHandle {
            serial,
            path: path.to_path_buf(),
        })
    }

    async fn close(&self, handle: FakeHandle) -> Result<(), FakeError> {
        tokio::task::yield_now().await;
        if file_name_contains(&handle.path, "fail-close") {
            return Err(FakeError("shutdown refused"));
        }
        self.closed.lock().push(handle);
        Ok(())
    }
}

/// Publisher that remembers every event.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<Event<FakeHandle>>>,
}

impl RecordingPublisher {
    pub fn labels(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(|e| e.kind.label()).collect()
    }

    pub fn events(&self) -> Vec<Event<FakeHandle>> {
        self.events.lock().clone()
    }
}

impl EventPublisher<FakeHandle> for RecordingPublisher {
    async fn publish(&self, event: Event<FakeHandle>) {
        self.events.lock().push(event);
    }
}

/// Bootstrap hook that records calls and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingBootstrap {
    pub fail_init: bool,
    pub fail_destroy: bool,
    pub calls: Mutex<Vec<String>>,
}

impl DatasourceBootstrap<FakeHandle> for RecordingBootstrap {
    fn init(&self, name: &DatasourceName, _handle: &FakeHandle) -> Result<(), BoxError> {
        self.calls.lock().push(format!("init:{name}"));
        if self.fail_init {
            return Err("init hook failed".into());
        }
        Ok(())
    }

    fn destroy(&self, name: &DatasourceName, _handle: &FakeHandle) -> Result<(), BoxError> {
        self.calls.lock().push(format!("destroy:{name}"));
        if self.fail_destroy {
            return Err("destroy hook failed".into());
        }
        Ok(())
    }
}

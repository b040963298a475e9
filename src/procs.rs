//! Live process data source.
//!
//! Reference `Tabular` implementation backing the demo dashboard: it
//! samples the process table through sysinfo, builds a snapshot per
//! tick, and fans it out to registered listeners. The watch loop runs
//! on a background thread cancelled through an atomic flag and joined
//! on drop.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info};
use serde_json::json;
use sysinfo::{Pid, ProcessesToUpdate, Signal, System, Users};

use crate::config::ViewSettings;
use crate::data::{Header, HeaderColumn, Row, SourceId};
use crate::model::{Grace, ListenerId, ModelError, Propagation, Tabular};
use crate::snapshot::TableData;

/// Namespace value meaning "every user".
pub const ALL_NAMESPACES: &str = "all";

const DEFAULT_REFRESH_MS: u64 = 2000;
const CANCEL_POLL: Duration = Duration::from_millis(50);

/// Column layout of process snapshots.
pub fn process_header() -> Header {
    Header::new(vec![
        HeaderColumn::new("PID").numeric(),
        HeaderColumn::new("NAME"),
        HeaderColumn::new("CPU%").numeric(),
        HeaderColumn::new("MEM").numeric(),
        HeaderColumn::new("AGE").duration(),
        HeaderColumn::new("STATUS").wide(),
        HeaderColumn::new("USER").wide(),
    ])
}

#[derive(Debug, Clone)]
struct Filters {
    namespace: String,
    selector: String,
}

impl Filters {
    fn cluster_wide(&self) -> bool {
        self.namespace == ALL_NAMESPACES
    }
}

/// Owns the sysinfo handles; shared between the UI thread and the
/// watch thread behind one coarse lock.
struct Sampler {
    system: System,
    users: Users,
}

impl Sampler {
    fn new() -> Self {
        Self {
            system: System::new_all(),
            users: Users::new_with_refreshed_list(),
        }
    }

    fn build(&mut self, source: &SourceId, filters: &Filters, generation: u64) -> TableData {
        self.system.refresh_processes(ProcessesToUpdate::All, true);

        let mut rows = Vec::with_capacity(self.system.processes().len());
        for (pid, process) in self.system.processes() {
            let user = process
                .user_id()
                .and_then(|uid| self.users.get_user_by_id(uid))
                .map(|u| u.name().to_string())
                .unwrap_or_default();
            if !filters.cluster_wide() && user != filters.namespace {
                continue;
            }

            let name = process.name().to_string_lossy().to_string();
            if !filters.selector.is_empty() && !name.contains(&filters.selector) {
                continue;
            }

            let pid_text = pid.as_u32().to_string();
            rows.push(Row::new(
                pid_text.clone(),
                vec![
                    pid_text,
                    name,
                    format!("{:.1}", process.cpu_usage()),
                    format!("{:.1}", process.memory() as f64 / (1024.0 * 1024.0)),
                    format_age(process.run_time()),
                    process.status().to_string(),
                    user,
                ],
            ));
        }
        rows.sort_by_key(|r| r.id.parse::<u32>().unwrap_or(u32::MAX));

        TableData::from_rows(source.clone(), filters.namespace.clone(), process_header(), rows)
            .with_generation(generation)
    }

    fn detail(&self, pid: Pid) -> Option<serde_json::Value> {
        let process = self.system.process(pid)?;
        let user = process
            .user_id()
            .and_then(|uid| self.users.get_user_by_id(uid))
            .map(|u| u.name().to_string())
            .unwrap_or_default();
        Some(json!({
            "pid": pid.as_u32(),
            "name": process.name().to_string_lossy(),
            "cpu_percent": process.cpu_usage(),
            "memory_bytes": process.memory(),
            "age_seconds": process.run_time(),
            "status": process.status().to_string(),
            "user": user,
        }))
    }
}

/// Render an age in seconds the way the AGE column displays it, with
/// the two most significant units.
pub fn format_age(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3600;
    let mins = (secs % 3600) / 60;
    let rem = secs % 60;

    if days > 0 {
        if hours > 0 {
            format!("{days}d{hours}h")
        } else {
            format!("{days}d")
        }
    } else if hours > 0 {
        if mins > 0 {
            format!("{hours}h{mins}m")
        } else {
            format!("{hours}h")
        }
    } else if mins > 0 {
        if rem > 0 {
            format!("{mins}m{rem}s")
        } else {
            format!("{mins}m")
        }
    } else {
        format!("{rem}s")
    }
}

type Listeners = Arc<Mutex<Vec<(ListenerId, Sender<TableData>)>>>;

/// Live process table source.
pub struct ProcessModel {
    source: SourceId,
    namespace: String,
    selector: String,
    filters: Arc<Mutex<Filters>>,
    sampler: Arc<Mutex<Sampler>>,
    latest: Arc<Mutex<Option<TableData>>>,
    listeners: Listeners,
    next_listener: u64,
    rate_ms: Arc<AtomicU64>,
    generation: Arc<AtomicU64>,
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    view: ViewSettings,
}

impl ProcessModel {
    pub fn new() -> Self {
        Self {
            source: SourceId::new("proc/v1"),
            namespace: ALL_NAMESPACES.to_string(),
            selector: String::new(),
            filters: Arc::new(Mutex::new(Filters {
                namespace: ALL_NAMESPACES.to_string(),
                selector: String::new(),
            })),
            sampler: Arc::new(Mutex::new(Sampler::new())),
            latest: Arc::new(Mutex::new(None)),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener: 0,
            rate_ms: Arc::new(AtomicU64::new(DEFAULT_REFRESH_MS)),
            generation: Arc::new(AtomicU64::new(0)),
            cancelled: Arc::new(AtomicBool::new(false)),
            handle: None,
            view: ViewSettings::default(),
        }
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }

    fn parse_pid(id: &str) -> Result<Pid, ModelError> {
        id.parse::<u32>()
            .map(Pid::from_u32)
            .map_err(|_| ModelError::RowNotFound(id.to_string()))
    }
}

impl Default for ProcessModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample once and push the snapshot to every live listener. Listeners
/// whose channel hung up are dropped.
fn publish(
    source: &SourceId,
    sampler: &Mutex<Sampler>,
    filters: &Mutex<Filters>,
    latest: &Mutex<Option<TableData>>,
    listeners: &Mutex<Vec<(ListenerId, Sender<TableData>)>>,
    generation: &AtomicU64,
) {
    let snapshot = {
        let current = match filters.lock() {
            Ok(f) => f.clone(),
            Err(_) => return,
        };
        let Ok(mut sampler) = sampler.lock() else {
            return;
        };
        let next = generation.fetch_add(1, Ordering::Relaxed) + 1;
        sampler.build(source, &current, next)
    };

    if let Ok(mut slot) = latest.lock() {
        *slot = Some(snapshot.clone());
    }
    if let Ok(mut sinks) = listeners.lock() {
        sinks.retain(|(_, tx)| tx.send(snapshot.clone()).is_ok());
    }
    debug!(
        "published {} gen {} with {} rows",
        source,
        snapshot.generation(),
        snapshot.row_count()
    );
}

impl Tabular for ProcessModel {
    fn peek(&self) -> TableData {
        if let Ok(slot) = self.latest.lock() {
            if let Some(data) = slot.as_ref() {
                return data.clone();
            }
        }
        // Nothing sampled yet; take a synchronous first sample.
        publish(
            &self.source,
            &self.sampler,
            &self.filters,
            &self.latest,
            &self.listeners,
            &self.generation,
        );
        self.latest
            .lock()
            .ok()
            .and_then(|slot| slot.clone())
            .unwrap_or_else(|| {
                TableData::from_rows(
                    self.source.clone(),
                    self.namespace.clone(),
                    process_header(),
                    Vec::new(),
                )
            })
    }

    fn refresh(&mut self) -> Result<(), ModelError> {
        publish(
            &self.source,
            &self.sampler,
            &self.filters,
            &self.latest,
            &self.listeners,
            &self.generation,
        );
        Ok(())
    }

    fn watch(&mut self) -> Result<(), ModelError> {
        if self.handle.is_some() {
            return Ok(());
        }
        self.cancelled.store(false, Ordering::Relaxed);

        let source = self.source.clone();
        let sampler = Arc::clone(&self.sampler);
        let filters = Arc::clone(&self.filters);
        let latest = Arc::clone(&self.latest);
        let listeners = Arc::clone(&self.listeners);
        let generation = Arc::clone(&self.generation);
        let rate_ms = Arc::clone(&self.rate_ms);
        let cancelled = Arc::clone(&self.cancelled);

        self.handle = Some(thread::spawn(move || {
            info!("watch started for {source}");
            while !cancelled.load(Ordering::Relaxed) {
                publish(&source, &sampler, &filters, &latest, &listeners, &generation);

                // Sleep in short slices so cancellation stays prompt.
                let mut remaining = Duration::from_millis(rate_ms.load(Ordering::Relaxed));
                while !remaining.is_zero() && !cancelled.load(Ordering::Relaxed) {
                    let nap = remaining.min(CANCEL_POLL);
                    thread::sleep(nap);
                    remaining -= nap;
                }
            }
            info!("watch stopped for {source}");
        }));
        Ok(())
    }

    fn add_listener(&mut self, listener: Sender<TableData>) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId::new(self.next_listener);
        if let Ok(mut sinks) = self.listeners.lock() {
            sinks.push((id, listener));
        }
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        if let Ok(mut sinks) = self.listeners.lock() {
            sinks.retain(|(lid, _)| *lid != id);
        }
    }

    fn get(&self, id: &str) -> Result<serde_json::Value, ModelError> {
        let pid = Self::parse_pid(id)?;
        let sampler = self
            .sampler
            .lock()
            .map_err(|_| ModelError::RowNotFound(id.to_string()))?;
        sampler
            .detail(pid)
            .ok_or_else(|| ModelError::RowNotFound(id.to_string()))
    }

    fn delete(
        &mut self,
        id: &str,
        _propagation: Propagation,
        grace: Grace,
    ) -> Result<(), ModelError> {
        let pid = Self::parse_pid(id)?;
        let killed = {
            let sampler = self
                .sampler
                .lock()
                .map_err(|_| ModelError::RowNotFound(id.to_string()))?;
            let Some(process) = sampler.system.process(pid) else {
                return Err(ModelError::RowNotFound(id.to_string()));
            };
            match grace {
                Grace::Now => process.kill(),
                _ => process
                    .kill_with(Signal::Term)
                    .unwrap_or_else(|| process.kill()),
            }
        };
        info!("delete pid {id}: signalled={killed}");
        self.refresh()
    }

    fn describe(&self, id: &str) -> Result<String, ModelError> {
        let detail = self.get(id)?;
        let mut out = format!("Process {id}\n");
        if let Some(map) = detail.as_object() {
            for (key, value) in map {
                out.push_str(&format!("{key:>14}: {value}\n"));
            }
        }
        Ok(out)
    }

    fn to_yaml(&self, id: &str) -> Result<String, ModelError> {
        let detail = self.get(id)?;
        serde_yaml_ng::to_string(&detail)
            .map_err(|e| ModelError::Watch(format!("yaml render failed: {e}")))
    }

    fn set_namespace(&mut self, namespace: &str) {
        self.namespace = namespace.to_string();
        if let Ok(mut f) = self.filters.lock() {
            f.namespace = namespace.to_string();
        }
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn set_label_selector(&mut self, selector: &str) {
        self.selector = selector.to_string();
        if let Ok(mut f) = self.filters.lock() {
            f.selector = selector.to_string();
        }
    }

    fn label_selector(&self) -> &str {
        &self.selector
    }

    fn cluster_wide(&self) -> bool {
        self.namespace == ALL_NAMESPACES
    }

    fn has_metrics(&self) -> bool {
        true
    }

    fn empty(&self) -> bool {
        self.row_count() == 0
    }

    fn row_count(&self) -> usize {
        self.latest
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(TableData::row_count))
            .unwrap_or(0)
    }

    fn set_refresh_rate(&mut self, rate: Duration) {
        let ms = rate.as_millis().max(1) as u64;
        self.rate_ms.store(ms, Ordering::Relaxed);
    }

    fn set_view_settings(&mut self, settings: &ViewSettings) {
        self.view = settings.clone();
    }
}

impl Drop for ProcessModel {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

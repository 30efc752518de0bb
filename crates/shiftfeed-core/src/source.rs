//! Data-access seam: where rows come from and how the feed is refreshed.
//!
//! A [`ShiftSource`] yields raw shift and assignment rows. [`FeedService`]
//! runs the pipeline over them and pushes fresh feeds to subscribers when
//! told the backend changed. Every refresh recomputes from scratch.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, info_span, warn};

use crate::error::ErrorCode;
use crate::feed::order_feed;
use crate::mapper::ShiftMapper;
use crate::model::shift::Shift;
use crate::row::RawRow;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while fetching rows.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The dump file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The dump file is not valid JSON.
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The dump parsed but is not a JSON array.
    #[error("{} does not contain a JSON array of rows", path.display())]
    NotAnArray { path: PathBuf },

    /// One element of the array is not an object.
    #[error("row {index} in {} is not a JSON object", path.display())]
    InvalidRow { path: PathBuf, index: usize },
}

impl SourceError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::SourceUnreadable,
            Self::Json { .. } | Self::NotAnArray { .. } => ErrorCode::SourceMalformed,
            Self::InvalidRow { .. } => ErrorCode::InvalidRow,
        }
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Anything that can hand over the current shift and assignment rows.
pub trait ShiftSource {
    /// All shift rows visible to the employee.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the rows cannot be fetched.
    fn fetch_shift_rows(&self) -> Result<Vec<RawRow>, SourceError>;

    /// The employee's assignment rows. Sources without them return an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the rows cannot be fetched.
    fn fetch_assignments(&self) -> Result<Vec<RawRow>, SourceError>;
}

/// Reads JSON exports of the shift and assignment tables.
#[derive(Debug, Clone)]
pub struct JsonDumpSource {
    shifts: PathBuf,
    assignments: Option<PathBuf>,
}

impl JsonDumpSource {
    pub fn new(shifts: impl Into<PathBuf>, assignments: Option<PathBuf>) -> Self {
        Self {
            shifts: shifts.into(),
            assignments,
        }
    }
}

impl ShiftSource for JsonDumpSource {
    fn fetch_shift_rows(&self) -> Result<Vec<RawRow>, SourceError> {
        read_rows(&self.shifts)
    }

    fn fetch_assignments(&self) -> Result<Vec<RawRow>, SourceError> {
        self.assignments
            .as_deref()
            .map_or_else(|| Ok(Vec::new()), read_rows)
    }
}

/// Read a JSON array of row objects from `path`.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be read, otherwise see
/// [`parse_rows`].
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>, SourceError> {
    let content = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rows(&content, path)
}

/// Parse a JSON array of row objects. `origin` is only used in errors.
///
/// # Errors
///
/// Returns an error if `content` is not JSON, not an array, or holds a
/// non-object element.
pub fn parse_rows(content: &str, origin: &Path) -> Result<Vec<RawRow>, SourceError> {
    let value: Value = serde_json::from_str(content).map_err(|source| SourceError::Json {
        path: origin.to_path_buf(),
        source,
    })?;

    let Value::Array(items) = value else {
        return Err(SourceError::NotAnArray {
            path: origin.to_path_buf(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            RawRow::try_from(item).map_err(|_| SourceError::InvalidRow {
                path: origin.to_path_buf(),
                index,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Feed service
// ---------------------------------------------------------------------------

/// Handle returned by [`FeedService::subscribe`].
///
/// Pass it back to [`FeedService::unsubscribe`] to stop deliveries.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "dropping a Subscription leaves the listener registered; call FeedService::unsubscribe"]
pub struct Subscription {
    id: u64,
}

type Listener = Box<dyn FnMut(&[Shift]) + Send>;

/// Runs the pipeline against a source and fans refreshed feeds out to
/// subscribers.
pub struct FeedService<S> {
    source: S,
    mapper: ShiftMapper,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
}

impl<S: ShiftSource> FeedService<S> {
    pub fn new(source: S, mapper: ShiftMapper) -> Self {
        Self {
            source,
            mapper,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Fetch everything and produce the ordered, visible feed.
    ///
    /// # Errors
    ///
    /// Propagates any [`SourceError`] from the source.
    pub fn load_feed(&self) -> Result<Vec<Shift>, SourceError> {
        let _span = info_span!("load_feed").entered();

        let rows = self.source.fetch_shift_rows()?;
        let assignment_rows = self.source.fetch_assignments()?;
        let assignments = self.mapper.parse_assignments(&assignment_rows);

        let mapped = self.mapper.map_array(&rows, &assignments);
        let feed = order_feed(&mapped);
        info!(
            rows = rows.len(),
            assignments = assignments.len(),
            shifts = feed.len(),
            "feed loaded"
        );
        Ok(feed)
    }

    /// Register a listener for refreshed feeds.
    pub fn subscribe(&mut self, listener: impl FnMut(&[Shift]) + Send + 'static) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        Subscription { id }
    }

    /// Tear down a subscription. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription.id);
        before != self.listeners.len()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// React to a backend change notification: refetch, remap, deliver.
    ///
    /// Returns the number of shifts delivered.
    ///
    /// # Errors
    ///
    /// On a fetch error no listener is called and the error is returned.
    pub fn notify_change(&mut self) -> Result<usize, SourceError> {
        let feed = match self.load_feed() {
            Ok(feed) => feed,
            Err(err) => {
                warn!(error = %err, "refresh after change failed");
                return Err(err);
            }
        };
        for (_, listener) in &mut self.listeners {
            listener(&feed);
        }
        Ok(feed.len())
    }

    #[must_use]
    pub const fn mapper(&self) -> &ShiftMapper {
        &self.mapper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Fixed {
        rows: Arc<Mutex<Vec<RawRow>>>,
        fail: bool,
    }

    impl ShiftSource for Fixed {
        fn fetch_shift_rows(&self) -> Result<Vec<RawRow>, SourceError> {
            if self.fail {
                return Err(SourceError::NotAnArray {
                    path: PathBuf::from("remote"),
                });
            }
            Ok(self.rows.lock().expect("lock").clone())
        }

        fn fetch_assignments(&self) -> Result<Vec<RawRow>, SourceError> {
            Ok(vec![RawRow::new().with("shiftId", "b").with("status", "pending")])
        }
    }

    fn row(id: &str, start: &str) -> RawRow {
        RawRow::new().with("id", id).with("start", start)
    }

    #[test]
    fn parse_rows_validates_shape() {
        let origin = Path::new("dump.json");
        assert_eq!(
            parse_rows(r#"[{"id":"a"}]"#, origin).expect("rows").len(),
            1
        );
        assert!(matches!(
            parse_rows(r#"{"id":"a"}"#, origin),
            Err(SourceError::NotAnArray { .. })
        ));
        assert!(matches!(
            parse_rows(r#"[{"id":"a"}, 3]"#, origin),
            Err(SourceError::InvalidRow { index: 1, .. })
        ));
        let err = parse_rows("[", origin).expect_err("bad json");
        assert_eq!(err.code(), ErrorCode::SourceMalformed);
        assert!(err.to_string().contains("dump.json"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = read_rows(&dir.path().join("absent.json")).expect_err("missing");
        assert_eq!(err.code(), ErrorCode::SourceUnreadable);
    }

    #[test]
    fn json_dump_source_reads_both_tables() {
        let dir = tempfile::tempdir().expect("temp dir");
        let shifts = dir.path().join("shifts.json");
        let assignments = dir.path().join("assignments.json");
        std::fs::write(
            &shifts,
            r#"[{"id":"a","start":"2026-03-02T08:00:00Z"},{"id":"b","start":"2026-03-01T08:00:00Z"}]"#,
        )
        .expect("write shifts");
        std::fs::write(&assignments, r#"[{"shiftId":"b","confirmationStatus":"pending"}]"#)
            .expect("write assignments");

        let service = FeedService::new(
            JsonDumpSource::new(&shifts, Some(assignments)),
            ShiftMapper::default(),
        );
        let feed = service.load_feed().expect("feed");
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, "a");

        let without = JsonDumpSource::new(shifts, None);
        assert!(without.fetch_assignments().expect("empty").is_empty());
    }

    #[test]
    fn change_notifications_reach_live_subscribers_only() {
        let rows = Arc::new(Mutex::new(vec![row("a", "2026-03-01T08:00:00Z")]));
        let mut service = FeedService::new(
            Fixed {
                rows: Arc::clone(&rows),
                fail: false,
            },
            ShiftMapper::default(),
        );

        let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let sub = service.subscribe(move |feed| {
            let ids = feed.iter().map(|s| s.id.clone()).collect();
            sink.lock().expect("lock").push(ids);
        });
        assert_eq!(service.subscriber_count(), 1);

        assert_eq!(service.notify_change().expect("refresh"), 1);

        rows.lock().expect("lock").extend([
            row("b", "2026-03-01T09:00:00Z"),
            row("c", "2026-02-28T09:00:00Z"),
        ]);
        assert_eq!(service.notify_change().expect("refresh"), 2);

        assert!(service.unsubscribe(sub));
        assert_eq!(service.subscriber_count(), 0);
        service.notify_change().expect("refresh");

        let seen = seen.lock().expect("lock");
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], vec!["a"]);
        // "b" is pending, so only the resorted visible rows arrive
        assert_eq!(seen[1], vec!["c", "a"]);
    }

    #[test]
    fn failed_refresh_skips_listeners() {
        let mut service = FeedService::new(
            Fixed {
                rows: Arc::default(),
                fail: true,
            },
            ShiftMapper::default(),
        );
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let sub = service.subscribe(move |_| *counter.lock().expect("lock") += 1);

        assert!(service.notify_change().is_err());
        assert_eq!(*calls.lock().expect("lock"), 0);
        assert!(service.unsubscribe(sub));
    }
}

//! Domain blocklist with lazy hot reload.
//!
//! # Responsibilities
//! - Load blocked domains from the filter file (one per line)
//! - Detect file changes via modification time and reload on query
//! - Answer exact and subdomain membership checks
//!
//! # Design Decisions
//! - The blocklist is an immutable snapshot behind an `ArcSwap`: readers are
//!   lock-free and a reload never exposes a half-built set
//! - Reload is triggered lazily by the querying task; there is no background
//!   refresh. Two concurrent queries may both reload; the redundant work is
//!   tolerated
//! - Suffix matching is on label boundaries: `ads.example.com` matches a
//!   stored `example.com`, `badexample.com` does not

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use arc_swap::ArcSwap;

/// Immutable snapshot of the blocklist and the file state it was built from.
#[derive(Debug, Default)]
struct BlockList {
    domains: HashSet<String>,
    /// Modification time of the filter file when this snapshot was loaded.
    loaded_mtime: Option<SystemTime>,
}

impl BlockList {
    /// Exact match, or `host` is a dot-separated subdomain of a stored domain.
    fn contains(&self, host: &str) -> bool {
        if self.domains.contains(host) {
            return true;
        }

        self.domains.iter().any(|domain| {
            host.len() > domain.len()
                && host.ends_with(domain.as_str())
                && host.as_bytes()[host.len() - domain.len() - 1] == b'.'
        })
    }
}

/// Shared domain filter consulted once per connection.
pub struct DomainFilter {
    path: PathBuf,
    snapshot: ArcSwap<BlockList>,
}

impl DomainFilter {
    /// Create a filter backed by the given file and load it eagerly.
    ///
    /// A missing file is not an error; the filter starts empty and picks the
    /// file up once it appears.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let filter = Self {
            path: path.into(),
            snapshot: ArcSwap::from_pointee(BlockList::default()),
        };
        filter.reload();
        filter
    }

    /// Re-read the filter file and swap in a fresh snapshot.
    ///
    /// If the file cannot be read the previous snapshot is retained.
    pub fn reload(&self) {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return,
        };

        let domains: HashSet<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();

        let snapshot = BlockList {
            loaded_mtime: file_mtime(&self.path),
            domains,
        };

        tracing::info!(
            path = %self.path.display(),
            blocked = snapshot.domains.len(),
            "Filter list updated"
        );

        self.snapshot.store(Arc::new(snapshot));
    }

    /// Check whether a host is blocked, reloading first if the filter file
    /// changed since the current snapshot was built.
    ///
    /// The querying task pays the reload cost; the mtime check itself is
    /// unsynchronized and may race a concurrent reload, which only affects
    /// reload timing.
    pub fn is_blocked(&self, host: &str) -> bool {
        if let Some(mtime) = file_mtime(&self.path) {
            let stale = self
                .snapshot
                .load()
                .loaded_mtime
                .map_or(true, |loaded| mtime > loaded);
            if stale {
                self.reload();
            }
        }

        self.snapshot.load().contains(host)
    }

    /// Number of domains in the current snapshot.
    pub fn len(&self) -> usize {
        self.snapshot.load().domains.len()
    }

    /// Whether the current snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn file_mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

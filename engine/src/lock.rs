//! Per-file reentrant locking.
//!
//! Every database path maps to exactly one [`ReentrantLock`] shared by all
//! engine instances opened against that path, so statement execution against
//! a single physical file is totally ordered across threads and instances.
//! The lock is reentrant: a thread already holding it may re-acquire without
//! deadlocking, which lets a scoped session issue statements that take the
//! lock again.
//!
//! The process-wide registry stores weak references and is pruned as engines
//! are dropped, so a lock lives exactly as long as some engine for its path
//! does.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::{Arc, Condvar, Mutex, OnceLock, Weak};
use std::thread::{self, ThreadId};

/// Canonical identity of a database resource.
///
/// Either the in-memory marker or an absolutized file path. Used as the
/// registry key, so two engines opened via different relative spellings of
/// the same file share one lock.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DatabasePath {
    /// The `:memory:` database. Never touches the file system.
    Memory,
    /// An on-disk database file, absolutized at open time.
    File(PathBuf),
}

impl fmt::Display for DatabasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabasePath::Memory => write!(f, ":memory:"),
            DatabasePath::File(path) => write!(f, "{}", path.display()),
        }
    }
}

struct LockState {
    owner: Option<ThreadId>,
    depth: usize,
}

/// A reentrant mutual-exclusion lock.
///
/// The owning thread may call [`lock`](Self::lock) again without blocking;
/// the lock is released once every guard from that thread has been dropped.
/// Other threads block until the owner's depth reaches zero.
pub struct ReentrantLock {
    state: Mutex<LockState>,
    released: Condvar,
}

impl ReentrantLock {
    /// Creates an unowned lock.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LockState {
                owner: None,
                depth: 0,
            }),
            released: Condvar::new(),
        }
    }

    /// Acquires the lock, blocking until it is available.
    ///
    /// Re-acquisition from the owning thread succeeds immediately. The
    /// returned guard releases one level of the lock on drop.
    pub fn lock(&self) -> ReentrantGuard<'_> {
        let current = thread::current().id();
        let mut state = self.state.lock().expect("lock state poisoned");
        loop {
            match state.owner {
                None => {
                    state.owner = Some(current);
                    state.depth = 1;
                    break;
                }
                Some(owner) if owner == current => {
                    state.depth += 1;
                    break;
                }
                Some(_) => {
                    state = self.released.wait(state).expect("lock state poisoned");
                }
            }
        }
        ReentrantGuard {
            lock: self,
            _not_send: PhantomData,
        }
    }

    fn unlock(&self) {
        let mut state = self.state.lock().expect("lock state poisoned");
        debug_assert_eq!(state.owner, Some(thread::current().id()));
        state.depth -= 1;
        if state.depth == 0 {
            state.owner = None;
            drop(state);
            self.released.notify_one();
        }
    }
}

impl Default for ReentrantLock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ReentrantLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReentrantLock").finish_non_exhaustive()
    }
}

/// RAII guard returned by [`ReentrantLock::lock`].
///
/// Dropping the guard releases one acquisition level. Not `Send`: the lock
/// must be released on the thread that acquired it.
pub struct ReentrantGuard<'a> {
    lock: &'a ReentrantLock,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ReentrantGuard<'_> {
    fn drop(&mut self) {
        self.lock.unlock();
    }
}

fn registry() -> &'static Mutex<HashMap<DatabasePath, Weak<ReentrantLock>>> {
    static REGISTRY: OnceLock<Mutex<HashMap<DatabasePath, Weak<ReentrantLock>>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Returns the shared lock for `path`, creating it if no engine currently
/// holds one.
///
/// The find-or-create step runs under the registry mutex, so concurrent
/// callers for the same path always observe the same lock instance. Entries
/// whose last strong reference has been dropped are pruned on the way.
pub(crate) fn lock_for(path: &DatabasePath) -> Arc<ReentrantLock> {
    let mut map = registry().lock().expect("lock registry poisoned");
    if let Some(existing) = map.get(path).and_then(Weak::upgrade) {
        return existing;
    }
    map.retain(|_, weak| weak.strong_count() > 0);
    let lock = Arc::new(ReentrantLock::new());
    map.insert(path.clone(), Arc::downgrade(&lock));
    lock
}

//! SessionRegistry - in-memory table of per-user sessions.
//!
//! One session per user, created lazily on first use. Each session
//! lives behind its own mutex so users never block each other; the
//! outer map lock is held only long enough to look up or insert a
//! cell.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::domain::foundation::{SessionId, Timestamp, UserId};
use crate::domain::session::{Session, SessionError};

/// A session plus the bookkeeping that must change under the same lock.
///
/// `fetch_seq` rises monotonically; every fetch claims a ticket before
/// releasing the lock, and only the holder of the newest ticket may
/// install its result. Older fetches landing late are discarded.
#[derive(Debug)]
pub struct SessionCell {
    pub session: Session,
    fetch_seq: u64,
}

impl SessionCell {
    fn new(session: Session) -> Self {
        Self {
            session,
            fetch_seq: 0,
        }
    }

    /// Claims a ticket for a fetch about to be issued.
    pub fn begin_fetch(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.fetch_seq
    }

    /// Returns true if `ticket` is still the newest fetch.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.fetch_seq == ticket
    }
}

/// In-memory registry mapping users to their sessions.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<UserId, Arc<Mutex<SessionCell>>>>,
    page_size: usize,
    history_capacity: usize,
}

impl SessionRegistry {
    pub fn new(page_size: usize, history_capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            page_size,
            history_capacity,
        }
    }

    /// Returns the user's session cell, creating an idle session on
    /// first contact.
    pub async fn get_or_create(
        &self,
        user_id: &UserId,
    ) -> Result<Arc<Mutex<SessionCell>>, SessionError> {
        {
            let sessions = self.sessions.read().await;
            if let Some(cell) = sessions.get(user_id) {
                return Ok(Arc::clone(cell));
            }
        }

        let mut sessions = self.sessions.write().await;
        match sessions.get(user_id) {
            Some(cell) => Ok(Arc::clone(cell)),
            None => {
                let session = Session::new(
                    SessionId::new(),
                    user_id.clone(),
                    self.page_size,
                    self.history_capacity,
                )
                .map_err(|e| SessionError::internal(e.to_string()))?;
                let cell = Arc::new(Mutex::new(SessionCell::new(session)));
                sessions.insert(user_id.clone(), Arc::clone(&cell));
                Ok(cell)
            }
        }
    }

    /// Removes the user's session. Returns true if one existed.
    pub async fn remove(&self, user_id: &UserId) -> bool {
        self.sessions.write().await.remove(user_id).is_some()
    }

    /// Resets a user's session to idle in place, keeping its history.
    /// Used when a fatal error leaves the session state untrustworthy.
    pub async fn reset_session(&self, user_id: &UserId) -> bool {
        let cell = {
            let sessions = self.sessions.read().await;
            sessions.get(user_id).map(Arc::clone)
        };
        match cell {
            Some(cell) => {
                cell.lock().await.session.reset();
                true
            }
            None => false,
        }
    }

    /// Returns the number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops sessions idle for at least `idle_timeout_secs`, returning
    /// how many were reclaimed.
    ///
    /// A session whose lock is currently held is mid-operation and is
    /// left alone for this sweep.
    pub async fn sweep_idle(&self, idle_timeout_secs: u64) -> usize {
        let now = Timestamp::now();
        let mut sessions = self.sessions.write().await;

        let expired: Vec<UserId> = sessions
            .iter()
            .filter_map(|(user_id, cell)| {
                let cell = cell.try_lock().ok()?;
                let idle = now.duration_since(cell.session.last_activity());
                (idle.num_seconds() >= idle_timeout_secs as i64).then(|| user_id.clone())
            })
            .collect();

        for user_id in &expired {
            sessions.remove(user_id);
        }
        expired.len()
    }
}

//! Application state container shared across Axum route handlers.
//!
//! Holds the database connection, the pending-OTP store, the mail
//! collaborator, and the per-student gate locks. Cloned into handlers via
//! Axum's `State<T>` extractor.

use crate::auth::otp::{Authenticator, OtpStore};
use crate::services::email::Mailer;
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Central application state shared across the server.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    otp: Arc<dyn OtpStore>,
    mailer: Arc<dyn Mailer>,
    gate_locks: GateLocks,
}

impl AppState {
    pub fn new(db: DatabaseConnection, otp: Arc<dyn OtpStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            db,
            otp,
            mailer,
            gate_locks: GateLocks::default(),
        }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns a cloned copy of the database connection.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    pub fn gate_locks(&self) -> &GateLocks {
        &self.gate_locks
    }

    /// Builds an OTP authenticator over this state's collaborators.
    pub fn authenticator(&self) -> Authenticator<'_> {
        Authenticator::new(&self.db, &*self.otp, &*self.mailer)
    }
}

/// Per-student mutual exclusion for the check-in/check-out critical section.
///
/// The status read and the event append must not interleave for the same
/// student, otherwise a racing double check-in records twice. Locks are
/// created on first use and kept for the life of the process; the roster is
/// small enough that the map never needs pruning.
#[derive(Clone, Default)]
pub struct GateLocks {
    inner: Arc<Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>>,
}

impl GateLocks {
    pub async fn acquire(&self, student_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().expect("gate lock map poisoned");
            map.entry(student_id)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

//! Record store facade: keyed upsert plus a live view of the whole table.
//!
//! Subscribers register a callback and receive the complete, ordered contact
//! list right away and again after every successful write. Notifications run
//! on the writer's thread immediately after the write commits, so observers
//! see states in exactly the order they were written.

use std::cell::RefCell;
use std::path::Path;
use std::rc::{Rc, Weak};

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::db::{db_path, ensure_schema, fetch_contacts, open_database, upsert_contact};
use crate::models::Contact;

type Observer = Rc<RefCell<dyn FnMut(&[Contact])>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    observers: Vec<(u64, Observer)>,
}

/// Owns the SQLite connection and the subscriber list.
pub struct RecordStore {
    conn: Connection,
    registry: Rc<RefCell<Registry>>,
}

impl RecordStore {
    /// Wrap an existing connection, creating the schema if it is missing.
    pub fn new(conn: Connection) -> Result<Self> {
        ensure_schema(&conn)?;
        Ok(Self {
            conn,
            registry: Rc::new(RefCell::new(Registry::default())),
        })
    }

    pub fn open(path: &Path) -> Result<Self> {
        Self::new(open_database(path)?)
    }

    /// Open the database in the user's data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(&db_path()?)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        Self::new(conn)
    }

    /// Read the full contact list in storage order.
    pub fn snapshot(&self) -> Result<Vec<Contact>> {
        fetch_contacts(&self.conn)
    }

    /// Insert `contact`, or replace the phone of the contact with the same
    /// name, then notify every subscriber with the new contents.
    ///
    /// The result reflects the write only. If re-reading the table for the
    /// notification fails, the failure is logged and subscribers miss that
    /// update; the row is still committed.
    pub fn upsert(&mut self, contact: &Contact) -> Result<()> {
        upsert_contact(&self.conn, contact)?;
        tracing::info!(name = %contact.name, "upserted contact");
        if let Err(err) = self.notify() {
            tracing::warn!(error = %err, "failed to notify subscribers");
        }
        Ok(())
    }

    /// Register `observer`. It is called once with the current contents before
    /// this returns, then after each write until the subscription is
    /// cancelled or dropped.
    pub fn subscribe<F>(&self, observer: F) -> Result<Subscription>
    where
        F: FnMut(&[Contact]) + 'static,
    {
        let contacts = self.snapshot()?;
        let observer: Observer = Rc::new(RefCell::new(observer));
        (*observer.borrow_mut())(contacts.as_slice());

        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.observers.push((id, observer));
            id
        };
        tracing::debug!(id, "subscriber registered");

        Ok(Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().observers.len()
    }

    fn notify(&self) -> Result<()> {
        // Clone the handles so callbacks may cancel or add subscriptions.
        let observers: Vec<Observer> = self
            .registry
            .borrow()
            .observers
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        if observers.is_empty() {
            return Ok(());
        }

        let contacts = self.snapshot()?;
        tracing::debug!(
            subscribers = observers.len(),
            contacts = contacts.len(),
            "notifying subscribers"
        );
        for observer in &observers {
            let borrowed = observer.try_borrow_mut();
            if let Ok(mut callback) = borrowed {
                (*callback)(contacts.as_slice());
            }
        }
        Ok(())
    }
}

/// Handle returned by [`RecordStore::subscribe`]. Dropping it unsubscribes.
#[must_use = "dropping a subscription cancels it"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Stop receiving notifications. Safe to call after the store is gone.
    pub fn cancel(self) {
        drop(self);
    }

    fn detach(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let borrowed = registry.try_borrow_mut();
        if let Ok(mut registry) = borrowed {
            registry.observers.retain(|(id, _)| *id != self.id);
            tracing::debug!(id = self.id, "subscriber removed");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

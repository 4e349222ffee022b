use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::Contact;

/// Retrieve every contact in insertion order. Replacing a contact keeps its
/// original row, so edits never move an entry within the list.
pub fn fetch_contacts(conn: &Connection) -> Result<Vec<Contact>> {
    let mut stmt = conn
        .prepare("SELECT name, phone FROM contacts ORDER BY rowid")
        .context("failed to prepare contact query")?;

    let contacts = stmt
        .query_map([], |row| {
            Ok(Contact {
                name: row.get(0)?,
                phone: row.get(1)?,
            })
        })
        .context("failed to load contacts")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect contacts")?;

    Ok(contacts)
}

/// Insert a contact, or overwrite the phone of the existing row with the same
/// name. A single statement, so readers never observe a half-written row.
pub fn upsert_contact(conn: &Connection, contact: &Contact) -> Result<()> {
    conn.execute(
        "INSERT INTO contacts (name, phone) VALUES (?1, ?2)
         ON CONFLICT(name) DO UPDATE SET phone = excluded.phone",
        params![contact.name, contact.phone],
    )
    .context("failed to upsert contact")?;
    Ok(())
}

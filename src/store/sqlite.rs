//! SQLite-backed implementation of the translation store.
//!
//! `SqliteStore` is the handle injected into every import/export/delete
//! operation; there is no ambient session. Single mutations open their own
//! transaction internally; bulk operations run against a [`StoreTx`] so
//! that either all of their mutations commit or none do.

use std::path::Path;

use rusqlite::{
    Connection,
    OptionalExtension,
    params,
};

use super::error::StoreError;
use super::types::{
    Key,
    KeyUpdate,
    Locale,
    LocaleUpdate,
    Value,
    ValueUpdate,
};
use crate::types::{
    KeyId,
    LocaleCode,
};

/// Table layout. Names follow the backend's historical `i18n_*` tables.
const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS i18n_locale (
      code TEXT PRIMARY KEY,
      description TEXT NOT NULL
    ) WITHOUT ROWID;
    CREATE TABLE IF NOT EXISTS i18n_key (
      id TEXT PRIMARY KEY,
      description TEXT NOT NULL
    ) WITHOUT ROWID;
    CREATE TABLE IF NOT EXISTS i18n_value (
      key_id TEXT NOT NULL REFERENCES i18n_key(id),
      locale_code TEXT NOT NULL REFERENCES i18n_locale(code),
      gloss TEXT NOT NULL,
      verified INTEGER NOT NULL DEFAULT 0,
      PRIMARY KEY (key_id, locale_code)
    ) WITHOUT ROWID;
    CREATE INDEX IF NOT EXISTS idx_i18n_value_locale ON i18n_value(locale_code);
";

/// Handle to the persistent translation store.
#[derive(Debug)]
pub struct SqliteStore {
    /// The single connection this handle owns.
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if necessary) the store at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        tracing::debug!(path = %path.display(), "opening translation store");
        Self::with_connection(Connection::open(path)?)
    }

    /// Open a fresh in-memory store (used by tests).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Apply pragmas and the schema to a raw connection.
    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Begin a transaction. All mutations made through the returned
    /// [`StoreTx`] commit together on [`StoreTx::commit`]; dropping it
    /// without committing rolls everything back.
    pub fn transaction(&mut self) -> Result<StoreTx<'_>, StoreError> {
        Ok(StoreTx { tx: self.conn.transaction()? })
    }

    /// Look up a locale; `UnknownLocale` if absent.
    pub fn locale(&self, code: &LocaleCode) -> Result<Locale, StoreError> {
        find_locale(&self.conn, code)?
            .ok_or_else(|| StoreError::UnknownLocale { code: code.clone() })
    }

    /// All locales, ordered by code.
    pub fn locales(&self) -> Result<Vec<Locale>, StoreError> {
        list_locales(&self.conn)
    }

    /// Look up a key; `KeyNotFound` if absent.
    pub fn key(&self, id: &KeyId) -> Result<Key, StoreError> {
        find_key(&self.conn, id)?.ok_or_else(|| StoreError::KeyNotFound { id: id.clone() })
    }

    /// All keys, ordered by id.
    pub fn keys(&self) -> Result<Vec<Key>, StoreError> {
        list_keys(&self.conn, None)
    }

    /// Keys at or under `prefix` in the namespace tree, ordered by id.
    pub fn keys_with_prefix(&self, prefix: &KeyId) -> Result<Vec<Key>, StoreError> {
        list_keys(&self.conn, Some(prefix))
    }

    /// Read one value; `ValueNotFound` if the pair has none.
    pub fn value(&self, key_id: &KeyId, locale_code: &LocaleCode) -> Result<Value, StoreError> {
        find_value(&self.conn, key_id, locale_code)?.ok_or_else(|| StoreError::ValueNotFound {
            key_id: key_id.clone(),
            locale_code: locale_code.clone(),
        })
    }

    /// Every value for one locale.
    pub fn values_for_locale(&self, locale_code: &LocaleCode) -> Result<Vec<Value>, StoreError> {
        list_values(&self.conn, None, Some(locale_code))
    }

    /// Values optionally restricted to a key prefix and/or one locale.
    pub fn values_with_prefix(
        &self,
        prefix: Option<&KeyId>,
        locale_code: Option<&LocaleCode>,
    ) -> Result<Vec<Value>, StoreError> {
        list_values(&self.conn, prefix, locale_code)
    }

    /// Total number of stored values.
    pub fn value_count(&self) -> Result<u64, StoreError> {
        count_values(&self.conn)
    }

    /// Create a locale; requires a non-empty, unused description.
    pub fn create_locale(&mut self, locale: &Locale) -> Result<(), StoreError> {
        let tx = self.transaction()?;
        tx.create_locale(locale)?;
        tx.commit()
    }

    /// Update a locale's mutable fields.
    pub fn update_locale(
        &mut self,
        code: &LocaleCode,
        update: &LocaleUpdate,
    ) -> Result<(), StoreError> {
        let tx = self.transaction()?;
        tx.update_locale(code, update)?;
        tx.commit()
    }

    /// Delete a locale, cascading to all of its values. Returns how many
    /// values were removed along with it.
    pub fn delete_locale(&mut self, code: &LocaleCode) -> Result<usize, StoreError> {
        let tx = self.transaction()?;
        let removed = tx.delete_locale(code)?;
        tx.commit()?;
        Ok(removed)
    }

    /// Create a key; requires a non-empty, unused description.
    pub fn create_key(&mut self, key: &Key) -> Result<(), StoreError> {
        let tx = self.transaction()?;
        tx.create_key(key)?;
        tx.commit()
    }

    /// Update a key's mutable fields.
    pub fn update_key(&mut self, id: &KeyId, update: &KeyUpdate) -> Result<(), StoreError> {
        let tx = self.transaction()?;
        tx.update_key(id, update)?;
        tx.commit()
    }

    /// Delete a key, cascading to its values. Returns how many values were
    /// removed along with it.
    pub fn delete_key(&mut self, id: &KeyId) -> Result<usize, StoreError> {
        let tx = self.transaction()?;
        let removed = tx.delete_key(id)?;
        tx.commit()?;
        Ok(removed)
    }

    /// Create a new value for a key/locale pair.
    ///
    /// In most cases `description` can be omitted; it is only required —
    /// and only used — when the key does not exist yet. Key creation and
    /// value creation commit atomically.
    pub fn create_value(
        &mut self,
        key_id: &KeyId,
        locale_code: &LocaleCode,
        gloss: &str,
        description: Option<&str>,
    ) -> Result<(), StoreError> {
        let tx = self.transaction()?;
        tx.create_value(key_id, locale_code, gloss, description)?;
        tx.commit()
    }

    /// Overwrite fields of an existing value in place.
    pub fn update_value(
        &mut self,
        key_id: &KeyId,
        locale_code: &LocaleCode,
        update: &ValueUpdate,
    ) -> Result<(), StoreError> {
        let tx = self.transaction()?;
        tx.update_value(key_id, locale_code, update)?;
        tx.commit()
    }

    /// Delete one value; `ValueNotFound` if absent.
    pub fn delete_value(
        &mut self,
        key_id: &KeyId,
        locale_code: &LocaleCode,
    ) -> Result<(), StoreError> {
        let tx = self.transaction()?;
        tx.delete_value(key_id, locale_code)?;
        tx.commit()
    }
}

/// One open transaction against the store.
///
/// Mutations only persist once [`commit`](Self::commit) is called; dropping
/// the transaction rolls them back. The extra lookup methods exist so bulk
/// operations (import/export/delete) can interleave reads with their writes
/// inside the same isolation scope.
#[derive(Debug)]
pub struct StoreTx<'conn> {
    /// The underlying SQLite transaction.
    tx: rusqlite::Transaction<'conn>,
}

impl StoreTx<'_> {
    /// Commit everything done through this transaction.
    pub fn commit(self) -> Result<(), StoreError> {
        self.tx.commit()?;
        Ok(())
    }

    /// See [`SqliteStore::create_locale`].
    pub fn create_locale(&self, locale: &Locale) -> Result<(), StoreError> {
        if find_locale(&self.tx, &locale.code)?.is_some() {
            return Err(StoreError::LocaleExists { code: locale.code.clone() });
        }
        check_locale_description(&self.tx, &locale.code, &locale.description, false)?;
        insert_locale(&self.tx, locale)
    }

    /// See [`SqliteStore::update_locale`].
    pub fn update_locale(
        &self,
        code: &LocaleCode,
        update: &LocaleUpdate,
    ) -> Result<(), StoreError> {
        if find_locale(&self.tx, code)?.is_none() {
            return Err(StoreError::UnknownLocale { code: code.clone() });
        }
        if let Some(description) = &update.description {
            check_locale_description(&self.tx, code, description, true)?;
            self.tx.execute(
                "UPDATE i18n_locale SET description = ?2 WHERE code = ?1",
                params![code.as_str(), description],
            )?;
        }
        Ok(())
    }

    /// See [`SqliteStore::delete_locale`].
    pub fn delete_locale(&self, code: &LocaleCode) -> Result<usize, StoreError> {
        if find_locale(&self.tx, code)?.is_none() {
            return Err(StoreError::UnknownLocale { code: code.clone() });
        }
        let removed = self
            .tx
            .execute("DELETE FROM i18n_value WHERE locale_code = ?1", params![code.as_str()])?;
        self.tx.execute("DELETE FROM i18n_locale WHERE code = ?1", params![code.as_str()])?;
        tracing::info!(locale = %code, values = removed, "deleted locale and its values");
        Ok(removed)
    }

    /// See [`SqliteStore::create_key`].
    pub fn create_key(&self, key: &Key) -> Result<(), StoreError> {
        if find_key(&self.tx, &key.id)?.is_some() {
            return Err(StoreError::KeyExists { id: key.id.clone() });
        }
        check_key_description(&self.tx, &key.id, &key.description, false)?;
        insert_key(&self.tx, key)
    }

    /// See [`SqliteStore::update_key`].
    pub fn update_key(&self, id: &KeyId, update: &KeyUpdate) -> Result<(), StoreError> {
        if find_key(&self.tx, id)?.is_none() {
            return Err(StoreError::KeyNotFound { id: id.clone() });
        }
        if let Some(description) = &update.description {
            check_key_description(&self.tx, id, description, true)?;
            self.set_key_description(id, description)?;
        }
        Ok(())
    }

    /// See [`SqliteStore::delete_key`].
    pub fn delete_key(&self, id: &KeyId) -> Result<usize, StoreError> {
        if find_key(&self.tx, id)?.is_none() {
            return Err(StoreError::KeyNotFound { id: id.clone() });
        }
        let removed = self
            .tx
            .execute("DELETE FROM i18n_value WHERE key_id = ?1", params![id.as_str()])?;
        self.tx.execute("DELETE FROM i18n_key WHERE id = ?1", params![id.as_str()])?;
        Ok(removed)
    }

    /// See [`SqliteStore::create_value`].
    pub fn create_value(
        &self,
        key_id: &KeyId,
        locale_code: &LocaleCode,
        gloss: &str,
        description: Option<&str>,
    ) -> Result<(), StoreError> {
        if find_value(&self.tx, key_id, locale_code)?.is_some() {
            return Err(StoreError::AlreadyExists {
                key_id: key_id.clone(),
                locale_code: locale_code.clone(),
            });
        }
        if !self.locale_exists(locale_code)? {
            return Err(StoreError::UnknownLocale { code: locale_code.clone() });
        }
        if find_key(&self.tx, key_id)?.is_none() {
            let Some(description) = description else {
                return Err(StoreError::MissingDescription { key_id: key_id.clone() });
            };
            insert_key(&self.tx, &Key { id: key_id.clone(), description: description.to_string() })?;
        }
        self.insert_value(&Value {
            key_id: key_id.clone(),
            locale_code: locale_code.clone(),
            gloss: gloss.to_string(),
            verified: false,
        })
    }

    /// See [`SqliteStore::update_value`].
    pub fn update_value(
        &self,
        key_id: &KeyId,
        locale_code: &LocaleCode,
        update: &ValueUpdate,
    ) -> Result<(), StoreError> {
        let Some(existing) = find_value(&self.tx, key_id, locale_code)? else {
            return Err(StoreError::ValueNotFound {
                key_id: key_id.clone(),
                locale_code: locale_code.clone(),
            });
        };
        let gloss = update.gloss.as_deref().unwrap_or(&existing.gloss);
        let verified = update.verified.unwrap_or(existing.verified);
        self.tx.execute(
            "UPDATE i18n_value SET gloss = ?3, verified = ?4
             WHERE key_id = ?1 AND locale_code = ?2",
            params![key_id.as_str(), locale_code.as_str(), gloss, verified],
        )?;
        Ok(())
    }

    /// See [`SqliteStore::delete_value`].
    pub fn delete_value(
        &self,
        key_id: &KeyId,
        locale_code: &LocaleCode,
    ) -> Result<(), StoreError> {
        let removed = self.tx.execute(
            "DELETE FROM i18n_value WHERE key_id = ?1 AND locale_code = ?2",
            params![key_id.as_str(), locale_code.as_str()],
        )?;
        if removed == 0 {
            return Err(StoreError::ValueNotFound {
                key_id: key_id.clone(),
                locale_code: locale_code.clone(),
            });
        }
        Ok(())
    }

    /// Whether a locale row exists.
    pub fn locale_exists(&self, code: &LocaleCode) -> Result<bool, StoreError> {
        Ok(find_locale(&self.tx, code)?.is_some())
    }

    /// Create the locale with an empty description if it is missing.
    /// Returns whether it was created. This is the one implicit-creation
    /// path; explicit creation goes through [`Self::create_locale`].
    pub fn ensure_locale(&self, code: &LocaleCode) -> Result<bool, StoreError> {
        if self.locale_exists(code)? {
            return Ok(false);
        }
        insert_locale(&self.tx, &Locale { code: code.clone(), description: String::new() })?;
        tracing::info!(locale = %code, "locale does not exist in database, creating one");
        Ok(true)
    }

    /// Look up a key.
    pub fn find_key(&self, id: &KeyId) -> Result<Option<Key>, StoreError> {
        find_key(&self.tx, id)
    }

    /// Create the key with the given description if it is missing.
    /// Returns whether it was created.
    pub fn ensure_key(&self, id: &KeyId, description: &str) -> Result<bool, StoreError> {
        if find_key(&self.tx, id)?.is_some() {
            return Ok(false);
        }
        insert_key(&self.tx, &Key { id: id.clone(), description: description.to_string() })?;
        tracing::info!(key = %id, "key does not exist in database, creating one");
        Ok(true)
    }

    /// Overwrite a key's description.
    pub fn set_key_description(&self, id: &KeyId, description: &str) -> Result<(), StoreError> {
        self.tx.execute(
            "UPDATE i18n_key SET description = ?2 WHERE id = ?1",
            params![id.as_str(), description],
        )?;
        Ok(())
    }

    /// Whether any key nests strictly below `id` (making `id` an
    /// intermediate position in the namespace tree).
    pub fn has_descendant_keys(&self, id: &KeyId) -> Result<bool, StoreError> {
        let found: Option<i64> = self
            .tx
            .query_row(
                "SELECT 1 FROM i18n_key WHERE id LIKE ?1 || '.%' LIMIT 1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Look up a value.
    pub fn find_value(
        &self,
        key_id: &KeyId,
        locale_code: &LocaleCode,
    ) -> Result<Option<Value>, StoreError> {
        find_value(&self.tx, key_id, locale_code)
    }

    /// Insert a value row; the key and locale rows must already exist.
    pub fn insert_value(&self, value: &Value) -> Result<(), StoreError> {
        self.tx.execute(
            "INSERT INTO i18n_value (key_id, locale_code, gloss, verified)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                value.key_id.as_str(),
                value.locale_code.as_str(),
                value.gloss,
                value.verified
            ],
        )?;
        Ok(())
    }

    /// Delete every value at or under `prefix`, optionally for one locale
    /// only. Returns how many rows went away.
    pub fn delete_values_under(
        &self,
        prefix: &KeyId,
        locale_code: Option<&LocaleCode>,
    ) -> Result<usize, StoreError> {
        let removed = self.tx.execute(
            "DELETE FROM i18n_value
             WHERE (key_id = ?1 OR key_id LIKE ?1 || '.%')
               AND (?2 IS NULL OR locale_code = ?2)",
            params![prefix.as_str(), locale_code.map(LocaleCode::as_str)],
        )?;
        Ok(removed)
    }

    /// Delete every key at or under `prefix`. Callers remove the values
    /// first; a remaining reference makes this fail.
    pub fn delete_keys_under(&self, prefix: &KeyId) -> Result<usize, StoreError> {
        let removed = self.tx.execute(
            "DELETE FROM i18n_key WHERE id = ?1 OR id LIKE ?1 || '.%'",
            params![prefix.as_str()],
        )?;
        Ok(removed)
    }

    /// Total number of stored values.
    pub fn value_count(&self) -> Result<u64, StoreError> {
        count_values(&self.tx)
    }
}

/// Reject empty or already-used locale descriptions. `updating` excludes
/// the locale's own row from the uniqueness check.
fn check_locale_description(
    conn: &Connection,
    code: &LocaleCode,
    description: &str,
    updating: bool,
) -> Result<(), StoreError> {
    if description.is_empty() {
        return Err(StoreError::EmptyDescription { subject: format!("locale {code}") });
    }
    let excluding = updating.then_some(code.as_str());
    let in_use: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM i18n_locale WHERE description = ?1 AND (?2 IS NULL OR code <> ?2)",
            params![description, excluding],
            |row| row.get(0),
        )
        .optional()?;
    if in_use.is_some() {
        return Err(StoreError::DuplicateDescription { description: description.to_string() });
    }
    Ok(())
}

/// Reject empty or already-used key descriptions. `updating` excludes the
/// key's own row from the uniqueness check.
fn check_key_description(
    conn: &Connection,
    id: &KeyId,
    description: &str,
    updating: bool,
) -> Result<(), StoreError> {
    if description.is_empty() {
        return Err(StoreError::EmptyDescription { subject: format!("key {id}") });
    }
    let excluding = updating.then_some(id.as_str());
    let in_use: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM i18n_key WHERE description = ?1 AND (?2 IS NULL OR id <> ?2)",
            params![description, excluding],
            |row| row.get(0),
        )
        .optional()?;
    if in_use.is_some() {
        return Err(StoreError::DuplicateDescription { description: description.to_string() });
    }
    Ok(())
}

/// Fetch one locale row.
fn find_locale(conn: &Connection, code: &LocaleCode) -> Result<Option<Locale>, StoreError> {
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT code, description FROM i18n_locale WHERE code = ?1",
            params![code.as_str()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    row.map(|(code, description)| {
        Ok(Locale { code: LocaleCode::new(code)?, description })
    })
    .transpose()
}

/// All locale rows, ordered by code.
fn list_locales(conn: &Connection) -> Result<Vec<Locale>, StoreError> {
    let mut stmt = conn.prepare("SELECT code, description FROM i18n_locale ORDER BY code")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
    let mut locales = Vec::new();
    for row in rows {
        let (code, description) = row?;
        locales.push(Locale { code: LocaleCode::new(code)?, description });
    }
    Ok(locales)
}

/// Insert a locale row.
fn insert_locale(conn: &Connection, locale: &Locale) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO i18n_locale (code, description) VALUES (?1, ?2)",
        params![locale.code.as_str(), locale.description],
    )?;
    Ok(())
}

/// Fetch one key row.
fn find_key(conn: &Connection, id: &KeyId) -> Result<Option<Key>, StoreError> {
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT id, description FROM i18n_key WHERE id = ?1",
            params![id.as_str()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    row.map(|(id, description)| Ok(Key { id: KeyId::new(id)?, description })).transpose()
}

/// Key rows, optionally restricted to a namespace prefix, ordered by id.
fn list_keys(conn: &Connection, prefix: Option<&KeyId>) -> Result<Vec<Key>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, description FROM i18n_key
         WHERE (?1 IS NULL OR id = ?1 OR id LIKE ?1 || '.%')
         ORDER BY id",
    )?;
    let rows = stmt.query_map(params![prefix.map(KeyId::as_str)], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;
    let mut keys = Vec::new();
    for row in rows {
        let (id, description) = row?;
        keys.push(Key { id: KeyId::new(id)?, description });
    }
    Ok(keys)
}

/// Insert a key row.
fn insert_key(conn: &Connection, key: &Key) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO i18n_key (id, description) VALUES (?1, ?2)",
        params![key.id.as_str(), key.description],
    )?;
    Ok(())
}

/// Fetch one value row.
fn find_value(
    conn: &Connection,
    key_id: &KeyId,
    locale_code: &LocaleCode,
) -> Result<Option<Value>, StoreError> {
    let row: Option<(String, String, String, bool)> = conn
        .query_row(
            "SELECT key_id, locale_code, gloss, verified FROM i18n_value
             WHERE key_id = ?1 AND locale_code = ?2",
            params![key_id.as_str(), locale_code.as_str()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .optional()?;
    row.map(value_from_parts).transpose()
}

/// Value rows, optionally restricted to a key prefix and/or one locale,
/// ordered by key then locale.
fn list_values(
    conn: &Connection,
    prefix: Option<&KeyId>,
    locale_code: Option<&LocaleCode>,
) -> Result<Vec<Value>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT key_id, locale_code, gloss, verified FROM i18n_value
         WHERE (?1 IS NULL OR key_id = ?1 OR key_id LIKE ?1 || '.%')
           AND (?2 IS NULL OR locale_code = ?2)
         ORDER BY key_id, locale_code",
    )?;
    let rows = stmt.query_map(
        params![prefix.map(KeyId::as_str), locale_code.map(LocaleCode::as_str)],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    )?;
    let mut values = Vec::new();
    for row in rows {
        values.push(value_from_parts(row?)?);
    }
    Ok(values)
}

/// Turn a raw value row back into the domain type. Stored identifiers were
/// validated on the way in, so failures here mean foreign data.
fn value_from_parts(parts: (String, String, String, bool)) -> Result<Value, StoreError> {
    let (key_id, locale_code, gloss, verified) = parts;
    Ok(Value {
        key_id: KeyId::new(key_id)?,
        locale_code: LocaleCode::new(locale_code)?,
        gloss,
        verified,
    })
}

/// Count all value rows.
fn count_values(conn: &Connection) -> Result<u64, StoreError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM i18n_value", [], |row| row.get(0))?;
    Ok(u64::try_from(count).unwrap_or_default())
}

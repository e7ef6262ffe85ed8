//! SQLite-backed account store.
//!
//! One table:
//! - `accounts`: username, password_hash, salt, role, profile fields,
//!   client_data (opaque JSON document stored as text), timestamps
//!
//! All mutations run as sequential independent statements — there is no
//! wrapping transaction, so a crash mid-update can leave a partially
//! applied change. Callers get an error and retry explicitly.

use crate::auth::password::{generate_salt, generate_token, hash_password, verify_password};
use crate::auth::AuthError;
use parking_lot::Mutex;
use serde::Serialize;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default role assigned at registration when none is supplied.
const DEFAULT_ROLE: &str = "client";

/// Role forced onto the seeded administrator account.
const ADMIN_ROLE: &str = "admin";

/// Username provisioned by administrative seeding.
const SEED_ADMIN_USERNAME: &str = "portal-admin";

/// Fixed seeding password. Rotate via the update endpoint after first login.
const SEED_ADMIN_PASSWORD: &str = "Cl13ntG4te!admin";

/// Legacy account removed unconditionally during seeding.
const LEGACY_ADMIN_USERNAME: &str = "admin";

/// A stored account row, including credential material. Never serialized
/// into responses directly — use [`PublicAccount`] for that.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub salt: String,
    pub role: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Raw serialized document as stored; parsed lazily on projection.
    pub client_data: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// The projection exposed over HTTP — no hash, no salt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAccount {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Parsed client document; malformed stored JSON surfaces as `null`.
    pub client_data: serde_json::Value,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Account {
    fn into_public(self) -> PublicAccount {
        let client_data = parse_client_data(self.client_data.as_deref());
        PublicAccount {
            id: self.id,
            username: self.username,
            role: self.role,
            display_name: self.display_name,
            email: self.email,
            phone: self.phone,
            client_data,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Optional fields accepted at registration.
#[derive(Debug, Default)]
pub struct RegisterRequest {
    pub role: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub client_data: Option<serde_json::Value>,
}

/// Changes accepted by [`AccountStore::update`]. Omitted fields are left
/// unchanged; a supplied `client_data` replaces the stored document
/// wholesale (no deep merge).
#[derive(Debug, Default)]
pub struct AccountChanges {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub client_data: Option<serde_json::Value>,
}

/// SQLite-backed account store.
pub struct AccountStore {
    conn: Mutex<rusqlite::Connection>,
}

impl AccountStore {
    /// Open (or create) the account database at the given path.
    pub fn open(db_path: &Path) -> Result<Self, AuthError> {
        let conn = rusqlite::Connection::open(db_path)?;
        Self::init(conn)
    }

    fn init(conn: rusqlite::Connection) -> Result<Self, AuthError> {
        // WAL mode for concurrent reads + crash safety
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        // The UNIQUE constraint closes the check-then-act race between the
        // advisory lookup in register() and the insert.
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                salt TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'client',
                display_name TEXT,
                email TEXT,
                phone TEXT,
                client_data TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // ── Registration ────────────────────────────────────────────────

    /// Register a new account. Returns the new account's id.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        request: RegisterRequest,
    ) -> Result<i64, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Username and password are required".into(),
            ));
        }

        let salt = generate_salt();
        let password_hash = hash_password(password, &salt);
        let role = request.role.as_deref().unwrap_or(DEFAULT_ROLE);
        let client_data = serialize_client_data(request.client_data.as_ref());
        let now = epoch_secs();

        let conn = self.conn.lock();

        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM accounts WHERE username = ?1",
                rusqlite::params![username],
                |_| Ok(true),
            )
            .unwrap_or(false);
        if exists {
            return Err(AuthError::Conflict("Username already exists".into()));
        }

        let result = conn.execute(
            "INSERT INTO accounts
                (username, password_hash, salt, role, display_name, email, phone, client_data, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
            rusqlite::params![
                username,
                password_hash,
                salt,
                role,
                request.display_name,
                request.email,
                request.phone,
                client_data,
                now,
            ],
        );

        match result {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                // Lost the race to a concurrent registration.
                Err(AuthError::Conflict("Username already exists".into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    // ── Login ───────────────────────────────────────────────────────

    /// Authenticate by username + password. On success returns the public
    /// projection plus a fresh bearer token.
    ///
    /// Unknown usernames and wrong passwords fail identically, and the
    /// unknown-username path still pays for one derivation so the two
    /// failures cost the same.
    pub fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(PublicAccount, String), AuthError> {
        let account = {
            let conn = self.conn.lock();
            lookup_by_username(&conn, username.trim())?
        };

        let Some(account) = account else {
            let _ = hash_password(password, "0000000000000000");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &account.password_hash, &account.salt) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = generate_token();
        Ok((account.into_public(), token))
    }

    // ── Update ──────────────────────────────────────────────────────

    /// Apply profile and/or password changes to an account.
    ///
    /// A password rotation requires the current password and writes a fresh
    /// salt + hash pair. Profile fields use coalesce-on-null: supplied
    /// fields overwrite, omitted fields stay. The two statements run
    /// sequentially without a transaction.
    pub fn update(&self, id: i64, changes: AccountChanges) -> Result<(), AuthError> {
        let conn = self.conn.lock();

        let Some(account) = lookup_by_id(&conn, id)? else {
            return Err(AuthError::NotFound);
        };

        if let Some(ref new_password) = changes.new_password {
            let Some(ref current) = changes.current_password else {
                return Err(AuthError::Validation("Current password is required".into()));
            };
            if !verify_password(current, &account.password_hash, &account.salt) {
                return Err(AuthError::InvalidCredentials);
            }

            let salt = generate_salt();
            let password_hash = hash_password(new_password, &salt);
            conn.execute(
                "UPDATE accounts SET password_hash = ?1, salt = ?2, updated_at = ?3 WHERE id = ?4",
                rusqlite::params![password_hash, salt, epoch_secs(), id],
            )?;
        }

        let client_data = serialize_client_data(changes.client_data.as_ref());
        conn.execute(
            "UPDATE accounts SET
                display_name = COALESCE(?1, display_name),
                email = COALESCE(?2, email),
                phone = COALESCE(?3, phone),
                client_data = COALESCE(?4, client_data),
                updated_at = ?5
             WHERE id = ?6",
            rusqlite::params![
                changes.display_name,
                changes.email,
                changes.phone,
                client_data,
                epoch_secs(),
                id,
            ],
        )?;

        Ok(())
    }

    // ── Administrative operations ───────────────────────────────────

    /// List every account's public projection. A row whose stored
    /// `client_data` fails to parse gets `null` for that field — one bad
    /// document never aborts the whole listing.
    pub fn list(&self) -> Result<Vec<PublicAccount>, AuthError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, username, password_hash, salt, role, display_name, email, phone,
                    client_data, created_at, updated_at
             FROM accounts ORDER BY id",
        )?;
        let accounts = stmt
            .query_map([], account_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(accounts.into_iter().map(Account::into_public).collect())
    }

    /// Delete an account by id. Deleting a nonexistent id is success.
    pub fn delete(&self, id: i64) -> Result<(), AuthError> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM accounts WHERE id = ?1", rusqlite::params![id])?;
        Ok(())
    }

    /// Idempotently provision the designated administrator account.
    ///
    /// Any legacy account literally named `admin` is removed first. If the
    /// target username exists its password and role are overwritten;
    /// otherwise a new row is inserted with `role = 'admin'`. Returns a
    /// human-readable outcome message.
    pub fn seed_admin(&self) -> Result<String, AuthError> {
        let conn = self.conn.lock();

        conn.execute(
            "DELETE FROM accounts WHERE username = ?1",
            rusqlite::params![LEGACY_ADMIN_USERNAME],
        )?;

        let salt = generate_salt();
        let password_hash = hash_password(SEED_ADMIN_PASSWORD, &salt);
        let now = epoch_secs();

        match lookup_by_username(&conn, SEED_ADMIN_USERNAME)? {
            Some(account) => {
                conn.execute(
                    "UPDATE accounts SET password_hash = ?1, salt = ?2, role = ?3, updated_at = ?4
                     WHERE id = ?5",
                    rusqlite::params![password_hash, salt, ADMIN_ROLE, now, account.id],
                )?;
                tracing::info!(username = SEED_ADMIN_USERNAME, "Admin account re-seeded");
                Ok(format!("Admin account '{SEED_ADMIN_USERNAME}' updated"))
            }
            None => {
                conn.execute(
                    "INSERT INTO accounts
                        (username, password_hash, salt, role, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                    rusqlite::params![SEED_ADMIN_USERNAME, password_hash, salt, ADMIN_ROLE, now],
                )?;
                tracing::info!(username = SEED_ADMIN_USERNAME, "Admin account created");
                Ok(format!("Admin account '{SEED_ADMIN_USERNAME}' created"))
            }
        }
    }

    /// Look up a single account's public projection by id.
    pub fn get(&self, id: i64) -> Result<Option<PublicAccount>, AuthError> {
        let conn = self.conn.lock();
        Ok(lookup_by_id(&conn, id)?.map(Account::into_public))
    }
}

// ── Row helpers ─────────────────────────────────────────────────────

const SELECT_COLUMNS: &str = "id, username, password_hash, salt, role, display_name, email, phone,
                              client_data, created_at, updated_at";

fn account_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        salt: row.get(3)?,
        role: row.get(4)?,
        display_name: row.get(5)?,
        email: row.get(6)?,
        phone: row.get(7)?,
        client_data: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn lookup_by_username(
    conn: &rusqlite::Connection,
    username: &str,
) -> Result<Option<Account>, rusqlite::Error> {
    let row = conn.query_row(
        &format!("SELECT {SELECT_COLUMNS} FROM accounts WHERE username = ?1"),
        rusqlite::params![username],
        account_from_row,
    );
    match row {
        Ok(account) => Ok(Some(account)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

fn lookup_by_id(conn: &rusqlite::Connection, id: i64) -> Result<Option<Account>, rusqlite::Error> {
    let row = conn.query_row(
        &format!("SELECT {SELECT_COLUMNS} FROM accounts WHERE id = ?1"),
        rusqlite::params![id],
        account_from_row,
    );
    match row {
        Ok(account) => Ok(Some(account)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Serialize a caller-supplied document for storage.
fn serialize_client_data(value: Option<&serde_json::Value>) -> Option<String> {
    value.map(serde_json::Value::to_string)
}

/// Parse a stored document; malformed or missing text becomes `null`.
fn parse_client_data(raw: Option<&str>) -> serde_json::Value {
    raw.and_then(|text| serde_json::from_str(text).ok())
        .unwrap_or(serde_json::Value::Null)
}

/// Current Unix epoch in seconds.
fn epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, AccountStore) {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("accounts.db");
        let store = AccountStore::open(&db_path).unwrap();
        (tmp, store)
    }

    #[test]
    fn register_and_login() {
        let (_tmp, store) = test_store();

        let id = store
            .register("alice", "p@ss1", RegisterRequest::default())
            .unwrap();
        assert!(id > 0);

        let (user, token) = store.login("alice", "p@ss1").unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, "client");
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn register_missing_fields_fails() {
        let (_tmp, store) = test_store();

        let err = store
            .register("", "p@ss1", RegisterRequest::default())
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = store
            .register("alice", "", RegisterRequest::default())
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[test]
    fn register_duplicate_username_fails() {
        let (_tmp, store) = test_store();

        store
            .register("alice", "p@ss1", RegisterRequest::default())
            .unwrap();
        let err = store
            .register("alice", "other", RegisterRequest::default())
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));

        // Exactly one row survives.
        let users = store.list().unwrap();
        assert_eq!(users.iter().filter(|u| u.username == "alice").count(), 1);
    }

    #[test]
    fn register_with_profile_and_role() {
        let (_tmp, store) = test_store();

        let id = store
            .register(
                "bob",
                "hunter2x",
                RegisterRequest {
                    role: Some("staff".into()),
                    display_name: Some("Bob".into()),
                    email: Some("bob@example.com".into()),
                    phone: Some("555-0100".into()),
                    client_data: Some(json!({"projects": ["atlas"]})),
                },
            )
            .unwrap();

        let account = store.get(id).unwrap().unwrap();
        // Unknown roles pass through untouched.
        assert_eq!(account.role, "staff");
        assert_eq!(account.display_name.as_deref(), Some("Bob"));
        assert_eq!(account.client_data, json!({"projects": ["atlas"]}));
    }

    #[test]
    fn login_failures_are_indistinguishable() {
        let (_tmp, store) = test_store();

        store
            .register("alice", "p@ss1", RegisterRequest::default())
            .unwrap();

        let wrong_password = store.login("alice", "wrong").unwrap_err();
        let unknown_user = store.login("ghost", "p@ss1").unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    }

    #[test]
    fn login_tokens_are_fresh_each_time() {
        let (_tmp, store) = test_store();

        store
            .register("alice", "p@ss1", RegisterRequest::default())
            .unwrap();
        let (_, t1) = store.login("alice", "p@ss1").unwrap();
        let (_, t2) = store.login("alice", "p@ss1").unwrap();
        assert_ne!(t1, t2);
    }

    #[test]
    fn login_surfaces_malformed_client_data_as_null() {
        let (_tmp, store) = test_store();

        let id = store
            .register("alice", "p@ss1", RegisterRequest::default())
            .unwrap();

        // Corrupt the stored document behind the store's back.
        {
            let conn = store.conn.lock();
            conn.execute(
                "UPDATE accounts SET client_data = '{not json' WHERE id = ?1",
                rusqlite::params![id],
            )
            .unwrap();
        }

        let (user, _) = store.login("alice", "p@ss1").unwrap();
        assert_eq!(user.client_data, serde_json::Value::Null);
    }

    #[test]
    fn update_unknown_id_fails() {
        let (_tmp, store) = test_store();

        let err = store.update(999, AccountChanges::default()).unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }

    #[test]
    fn update_profile_coalesces_omitted_fields() {
        let (_tmp, store) = test_store();

        let id = store
            .register(
                "alice",
                "p@ss1",
                RegisterRequest {
                    display_name: Some("Alice".into()),
                    email: Some("alice@example.com".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        store
            .update(
                id,
                AccountChanges {
                    phone: Some("555-0199".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let account = store.get(id).unwrap().unwrap();
        assert_eq!(account.display_name.as_deref(), Some("Alice"));
        assert_eq!(account.email.as_deref(), Some("alice@example.com"));
        assert_eq!(account.phone.as_deref(), Some("555-0199"));
    }

    #[test]
    fn update_replaces_client_data_wholesale() {
        let (_tmp, store) = test_store();

        let id = store
            .register(
                "alice",
                "p@ss1",
                RegisterRequest {
                    client_data: Some(json!({"a": 1})),
                    ..Default::default()
                },
            )
            .unwrap();

        // Omitted: stored document unchanged.
        store.update(id, AccountChanges::default()).unwrap();
        assert_eq!(store.get(id).unwrap().unwrap().client_data, json!({"a": 1}));

        // Supplied: full replacement, no deep merge.
        store
            .update(
                id,
                AccountChanges {
                    client_data: Some(json!({"b": 2})),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(store.get(id).unwrap().unwrap().client_data, json!({"b": 2}));
    }

    #[test]
    fn password_rotation_requires_current_password() {
        let (_tmp, store) = test_store();

        let id = store
            .register("alice", "p@ss1", RegisterRequest::default())
            .unwrap();

        let err = store
            .update(
                id,
                AccountChanges {
                    new_password: Some("n3wpass".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = store
            .update(
                id,
                AccountChanges {
                    current_password: Some("wrong".into()),
                    new_password: Some("n3wpass".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn password_rotation_invalidates_old_password() {
        let (_tmp, store) = test_store();

        let id = store
            .register("alice", "p@ss1", RegisterRequest::default())
            .unwrap();

        store
            .update(
                id,
                AccountChanges {
                    current_password: Some("p@ss1".into()),
                    new_password: Some("n3wpass".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(store.login("alice", "n3wpass").is_ok());
        assert!(matches!(
            store.login("alice", "p@ss1").unwrap_err(),
            AuthError::InvalidCredentials
        ));
    }

    #[test]
    fn rotation_and_profile_change_in_one_call() {
        let (_tmp, store) = test_store();

        let id = store
            .register("alice", "p@ss1", RegisterRequest::default())
            .unwrap();

        store
            .update(
                id,
                AccountChanges {
                    current_password: Some("p@ss1".into()),
                    new_password: Some("n3wpass".into()),
                    display_name: Some("Alice L.".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let (user, _) = store.login("alice", "n3wpass").unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Alice L."));
    }

    #[test]
    fn list_never_exposes_credentials_and_tolerates_bad_rows() {
        let (_tmp, store) = test_store();

        store
            .register(
                "alice",
                "p@ss1",
                RegisterRequest {
                    client_data: Some(json!({"a": 1})),
                    ..Default::default()
                },
            )
            .unwrap();
        let bob = store
            .register("bob", "hunter2x", RegisterRequest::default())
            .unwrap();

        {
            let conn = store.conn.lock();
            conn.execute(
                "UPDATE accounts SET client_data = 'not json at all' WHERE id = ?1",
                rusqlite::params![bob],
            )
            .unwrap();
        }

        let users = store.list().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].client_data, json!({"a": 1}));
        assert_eq!(users[1].client_data, serde_json::Value::Null);

        let serialized = serde_json::to_string(&users).unwrap();
        assert!(!serialized.contains("passwordHash"));
        assert!(!serialized.contains("salt"));
    }

    #[test]
    fn delete_is_idempotent() {
        let (_tmp, store) = test_store();

        let id = store
            .register("alice", "p@ss1", RegisterRequest::default())
            .unwrap();

        store.delete(id).unwrap();
        assert!(store.get(id).unwrap().is_none());

        // Nonexistent id is still success.
        store.delete(id).unwrap();
        store.delete(424242).unwrap();
    }

    #[test]
    fn seed_admin_is_idempotent() {
        let (_tmp, store) = test_store();

        let msg = store.seed_admin().unwrap();
        assert!(msg.contains("created"));
        let msg = store.seed_admin().unwrap();
        assert!(msg.contains("updated"));

        let admins: Vec<_> = store
            .list()
            .unwrap()
            .into_iter()
            .filter(|u| u.username == SEED_ADMIN_USERNAME)
            .collect();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].role, "admin");

        assert!(store
            .login(SEED_ADMIN_USERNAME, SEED_ADMIN_PASSWORD)
            .is_ok());
    }

    #[test]
    fn seed_admin_removes_legacy_admin_account() {
        let (_tmp, store) = test_store();

        store
            .register("admin", "old-admin-pass", RegisterRequest::default())
            .unwrap();
        store.seed_admin().unwrap();

        let users = store.list().unwrap();
        assert!(users.iter().all(|u| u.username != "admin"));
        assert!(users.iter().any(|u| u.username == SEED_ADMIN_USERNAME));
    }

    #[test]
    fn seed_admin_resets_password_and_role() {
        let (_tmp, store) = test_store();

        let id = store
            .register(
                SEED_ADMIN_USERNAME,
                "someoldpass",
                RegisterRequest {
                    role: Some("client".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        store.seed_admin().unwrap();

        let account = store.get(id).unwrap().unwrap();
        assert_eq!(account.role, "admin");
        assert!(store
            .login(SEED_ADMIN_USERNAME, SEED_ADMIN_PASSWORD)
            .is_ok());
        assert!(store.login(SEED_ADMIN_USERNAME, "someoldpass").is_err());
    }

    #[test]
    fn salt_rotates_with_password() {
        let (_tmp, store) = test_store();

        let id = store
            .register("alice", "p@ss1", RegisterRequest::default())
            .unwrap();

        let before = {
            let conn = store.conn.lock();
            lookup_by_id(&conn, id).unwrap().unwrap()
        };

        store
            .update(
                id,
                AccountChanges {
                    current_password: Some("p@ss1".into()),
                    new_password: Some("n3wpass".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let after = {
            let conn = store.conn.lock();
            lookup_by_id(&conn, id).unwrap().unwrap()
        };
        assert_ne!(before.salt, after.salt);
        assert_ne!(before.password_hash, after.password_hash);
    }
}

use crate::Database;
use crate::models::{MemoryRow, UserRow};
use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, Utc};
use jar_types::TIMESTAMP_FORMAT;
use rusqlite::{Connection, ErrorCode, OptionalExtension};

/// Order in which a user's memories are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    // rowid breaks ties between entries saved within the same second
    fn sql(self) -> &'static str {
        match self {
            Self::NewestFirst => "ORDER BY created_at DESC, rowid DESC",
            Self::OldestFirst => "ORDER BY created_at ASC, rowid ASC",
        }
    }
}

fn timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

impl Database {
    // -- Users --

    /// Insert a user unless the username is taken.
    /// Returns `false` (and inserts nothing) when it already exists.
    pub fn create_user(&self, id: &str, username: &str, password_hash: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            if query_user_by_username(conn, username)?.is_some() {
                return Ok(false);
            }

            match conn.execute(
                "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)",
                (id, username, password_hash),
            ) {
                Ok(_) => Ok(true),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    Ok(false)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, username, password, created_at FROM users WHERE id = ?1",
                    [id],
                    user_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    // -- Memories --

    pub fn insert_memory(
        &self,
        id: &str,
        user_id: &str,
        memory: &str,
        mood: Option<&str>,
        created_at: &NaiveDateTime,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO memories (id, user_id, memory, mood, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, user_id, memory, mood, timestamp(created_at)],
            )?;
            Ok(())
        })
    }

    /// One of the user's memories chosen uniformly at random, if they have any.
    pub fn random_memory(&self, user_id: &str) -> Result<Option<MemoryRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, user_id, memory, mood, created_at FROM memories
                     WHERE user_id = ?1
                     ORDER BY RANDOM()
                     LIMIT 1",
                    [user_id],
                    memory_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn list_memories(&self, user_id: &str, order: SortOrder) -> Result<Vec<MemoryRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT id, user_id, memory, mood, created_at FROM memories WHERE user_id = ?1 {}",
                order.sql()
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([user_id], memory_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Sessions --

    pub fn create_session(&self, token: &str, user_id: &str, expires_at: DateTime<Utc>) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
                (token, user_id, timestamp(&expires_at.naive_utc())),
            )?;
            Ok(())
        })
    }

    /// The user bound to `token`, provided the session has not expired by `now`.
    pub fn get_session_user(&self, token: &str, now: DateTime<Utc>) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT u.id, u.username, u.password, u.created_at
                     FROM sessions s
                     JOIN users u ON s.user_id = u.id
                     WHERE s.token = ?1 AND s.expires_at > ?2",
                    (token, timestamp(&now.naive_utc())),
                    user_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn delete_session(&self, token: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute("DELETE FROM sessions WHERE token = ?1", [token])?;
            Ok(())
        })
    }

    /// Remove every session that expired at or before `now`. Returns how many were removed.
    pub fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let removed = conn.execute(
                "DELETE FROM sessions WHERE expires_at <= ?1",
                [timestamp(&now.naive_utc())],
            )?;
            Ok(removed)
        })
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let row = conn
        .query_row(
            "SELECT id, username, password, created_at FROM users WHERE username = ?1",
            [username],
            user_from_row,
        )
        .optional()?;

    Ok(row)
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn memory_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MemoryRow> {
    Ok(MemoryRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        memory: row.get(2)?,
        mood: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn new_user(db: &Database, username: &str) -> String {
        let id = Uuid::new_v4().to_string();
        assert!(db.create_user(&id, username, "hash").unwrap());
        id
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
    }

    fn add(db: &Database, user_id: &str, memory: &str, mood: Option<&str>, created_at: &str) {
        db.insert_memory(&Uuid::new_v4().to_string(), user_id, memory, mood, &at(created_at))
            .unwrap();
    }

    #[test]
    fn test_duplicate_username_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let first = new_user(&db, "alice");

        let second = Uuid::new_v4().to_string();
        assert!(!db.create_user(&second, "alice", "other-hash").unwrap());

        let user = db.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(user.id, first);
        assert_eq!(user.password, "hash");
        assert!(db.get_user_by_id(&second).unwrap().is_none());
    }

    #[test]
    fn test_list_memories_orders_by_created_at() {
        let db = Database::open_in_memory().unwrap();
        let user = new_user(&db, "alice");

        add(&db, &user, "middle", Some("neutral"), "2024-03-02 12:00:00");
        add(&db, &user, "oldest", Some("sad"), "2023-12-31 23:59:59");
        add(&db, &user, "newest", Some("happy"), "2024-03-02 12:00:01");

        let newest: Vec<String> = db
            .list_memories(&user, SortOrder::NewestFirst)
            .unwrap()
            .into_iter()
            .map(|r| r.memory)
            .collect();
        assert_eq!(newest, vec!["newest", "middle", "oldest"]);

        let oldest: Vec<String> = db
            .list_memories(&user, SortOrder::OldestFirst)
            .unwrap()
            .into_iter()
            .map(|r| r.memory)
            .collect();
        assert_eq!(oldest, vec!["oldest", "middle", "newest"]);
    }

    #[test]
    fn test_same_second_falls_back_to_insertion_order() {
        let db = Database::open_in_memory().unwrap();
        let user = new_user(&db, "alice");

        add(&db, &user, "first", None, "2024-01-01 00:00:00");
        add(&db, &user, "second", None, "2024-01-01 00:00:00");

        let rows = db.list_memories(&user, SortOrder::NewestFirst).unwrap();
        assert_eq!(rows[0].memory, "second");
        assert_eq!(rows[1].memory, "first");
    }

    #[test]
    fn test_memories_are_scoped_to_owner() {
        let db = Database::open_in_memory().unwrap();
        let alice = new_user(&db, "alice");
        let bob = new_user(&db, "bob");

        add(&db, &alice, "alice's day", Some("happy"), "2024-01-01 10:00:00");
        add(&db, &bob, "bob's day", Some("sad"), "2024-01-01 11:00:00");

        let rows = db.list_memories(&alice, SortOrder::NewestFirst).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, alice);

        for _ in 0..10 {
            let picked = db.random_memory(&bob).unwrap().unwrap();
            assert_eq!(picked.memory, "bob's day");
        }
    }

    #[test]
    fn test_random_memory_without_entries() {
        let db = Database::open_in_memory().unwrap();
        let user = new_user(&db, "alice");
        assert!(db.random_memory(&user).unwrap().is_none());
    }

    #[test]
    fn test_store_rejects_empty_memory_and_unknown_owner() {
        let db = Database::open_in_memory().unwrap();
        let user = new_user(&db, "alice");
        let now = at("2024-01-01 00:00:00");

        assert!(db.insert_memory("m1", &user, "", Some("happy"), &now).is_err());
        assert!(db.insert_memory("m2", "no-such-user", "text", None, &now).is_err());
        assert!(db.list_memories(&user, SortOrder::OldestFirst).unwrap().is_empty());
    }

    #[test]
    fn test_session_lifecycle() {
        let db = Database::open_in_memory().unwrap();
        let user = new_user(&db, "alice");
        let now = Utc::now();

        db.create_session("live", &user, now + Duration::hours(1)).unwrap();
        db.create_session("stale", &user, now - Duration::hours(1)).unwrap();

        let found = db.get_session_user("live", now).unwrap().unwrap();
        assert_eq!(found.username, "alice");
        assert!(db.get_session_user("stale", now).unwrap().is_none());
        assert!(db.get_session_user("missing", now).unwrap().is_none());

        assert_eq!(db.delete_expired_sessions(now).unwrap(), 1);
        assert!(db.get_session_user("live", now).unwrap().is_some());

        db.delete_session("live").unwrap();
        assert!(db.get_session_user("live", now).unwrap().is_none());
    }
}

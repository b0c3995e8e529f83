/// Database row types, mapped column for column from SQLite.
/// Handlers convert them into jar-types models.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

pub struct MemoryRow {
    pub id: String,
    pub user_id: String,
    pub memory: String,
    pub mood: Option<String>,
    pub created_at: String,
}

use chrono::NaiveDateTime;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::models::{Account, ArticleRecord, NewAccount, PreferencesUpdate, Subscriber};

/// Row type for account queries; `interests` comes back as raw JSON text.
type AccountRow = (
    i64,
    String,
    String,
    String,
    Option<String>,
    String,
    String,
    bool,
    Option<String>,
    Option<i64>,
    NaiveDateTime,
);

const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, age, interests, reading_time, \
     notifications, reset_token_hash, reset_expires_at, created_at";

/// Which per-account article list an interaction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Liked,
    Saved,
}

impl InteractionKind {
    fn table(self) -> &'static str {
        match self {
            InteractionKind::Liked => "liked_articles",
            InteractionKind::Saved => "saved_articles",
        }
    }
}

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open a database connection and run migrations.
    pub async fn open(url: &str) -> Result<Self, sqlx::Error> {
        // An in-memory database exists per connection, so the pool must not
        // hand out a second one.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                age TEXT,
                interests TEXT NOT NULL DEFAULT '[]',
                reading_time TEXT NOT NULL DEFAULT 'Any',
                notifications INTEGER NOT NULL DEFAULT 0,
                reset_token_hash TEXT,
                reset_expires_at INTEGER,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        for table in ["liked_articles", "saved_articles"] {
            sqlx::query(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    id INTEGER PRIMARY KEY,
                    account_id INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
                    article_id TEXT NOT NULL,
                    title TEXT NOT NULL,
                    image_url TEXT,
                    description TEXT,
                    UNIQUE(account_id, article_id)
                )
            "#,
            ))
            .execute(&self.pool)
            .await?;

            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_account ON {table}(account_id)"
            ))
            .execute(&self.pool)
            .await?;
        }

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS subscribers (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                subscribed_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    pub async fn create_account(&self, new: &NewAccount) -> Result<Account, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (name, email, password_hash, age, interests, reading_time, notifications)
            VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.age)
        .bind(interests_json(&new.interests))
        .bind(new.reading_time.as_deref().unwrap_or("Any"))
        .bind(new.notifications)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.account_by_id(id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn account_by_email(&self, email: &str) -> Result<Option<Account>, sqlx::Error> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(row_to_account))
    }

    pub async fn account_by_id(&self, id: i64) -> Result<Option<Account>, sqlx::Error> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(row_to_account))
    }

    /// Apply a partial preference update and return the fresh account.
    /// Absent fields keep their stored value.
    pub async fn update_preferences(
        &self,
        id: i64,
        update: &PreferencesUpdate,
    ) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE accounts SET
                interests = COALESCE(?, interests),
                age = COALESCE(?, age),
                reading_time = COALESCE(?, reading_time),
                notifications = COALESCE(?, notifications)
            WHERE id = ?
        "#,
        )
        .bind(update.interests.as_deref().map(interests_json))
        .bind(&update.age)
        .bind(&update.reading_time)
        .bind(update.notifications)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.account_by_id(id).await
    }

    // ========================================================================
    // Password reset
    // ========================================================================

    /// Stamp a new reset token hash on the account, replacing any pending one.
    pub async fn store_reset_token(
        &self,
        account_id: i64,
        token_hash: &str,
        expires_at: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE accounts SET reset_token_hash = ?, reset_expires_at = ? WHERE id = ?")
            .bind(token_hash)
            .bind(expires_at)
            .bind(account_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Set the new password and clear the token in one statement, but only if
    /// the token matches and has not expired. Returns whether a row changed,
    /// which makes the token single-use even under concurrent attempts.
    pub async fn consume_reset_token(
        &self,
        token_hash: &str,
        new_password_hash: &str,
        now: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET password_hash = ?, reset_token_hash = NULL, reset_expires_at = NULL
            WHERE reset_token_hash = ? AND reset_expires_at > ?
        "#,
        )
        .bind(new_password_hash)
        .bind(token_hash)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ========================================================================
    // Liked / saved articles
    // ========================================================================

    /// Remove the article if present, insert it otherwise, and return the
    /// resulting list. Runs in a transaction so two rapid toggles cannot
    /// interleave between the membership check and the write.
    pub async fn toggle_interaction(
        &self,
        kind: InteractionKind,
        account_id: i64,
        record: &ArticleRecord,
    ) -> Result<Vec<ArticleRecord>, sqlx::Error> {
        let table = kind.table();
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(&format!(
            "DELETE FROM {table} WHERE account_id = ? AND article_id = ?"
        ))
        .bind(account_id)
        .bind(&record.article_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if deleted == 0 {
            sqlx::query(&format!(
                r#"
                INSERT INTO {table} (account_id, article_id, title, image_url, description)
                VALUES (?, ?, ?, ?, ?)
            "#,
            ))
            .bind(account_id)
            .bind(&record.article_id)
            .bind(&record.title)
            .bind(&record.image_url)
            .bind(&record.description)
            .execute(&mut *tx)
            .await?;
        }

        let list: Vec<ArticleRecord> = sqlx::query_as(&format!(
            "SELECT article_id, title, image_url, description FROM {table} \
             WHERE account_id = ? ORDER BY id"
        ))
        .bind(account_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(list)
    }

    /// Explicit removal. Deleting an absent article is a no-op.
    pub async fn remove_interaction(
        &self,
        kind: InteractionKind,
        account_id: i64,
        article_id: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(&format!(
            "DELETE FROM {} WHERE account_id = ? AND article_id = ?",
            kind.table()
        ))
        .bind(account_id)
        .bind(article_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Full records in insertion order.
    pub async fn interactions(
        &self,
        kind: InteractionKind,
        account_id: i64,
    ) -> Result<Vec<ArticleRecord>, sqlx::Error> {
        sqlx::query_as(&format!(
            "SELECT article_id, title, image_url, description FROM {} \
             WHERE account_id = ? ORDER BY id",
            kind.table()
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Just the article ids, for the status endpoint.
    pub async fn interaction_ids(
        &self,
        kind: InteractionKind,
        account_id: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(&format!(
            "SELECT article_id FROM {} WHERE account_id = ? ORDER BY id",
            kind.table()
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    // ========================================================================
    // Newsletter subscribers
    // ========================================================================

    /// Returns false when the email was already subscribed.
    pub async fn add_subscriber(&self, email: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("INSERT OR IGNORE INTO subscribers (email) VALUES (?)")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn remove_subscriber(&self, email: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM subscribers WHERE email = ?")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn subscriber_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM subscribers WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn subscribers(&self) -> Result<Vec<Subscriber>, sqlx::Error> {
        sqlx::query_as("SELECT id, email, subscribed_at FROM subscribers ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }
}

fn interests_json(interests: &[String]) -> String {
    serde_json::to_string(interests).unwrap_or_else(|_| "[]".to_string())
}

fn row_to_account(row: AccountRow) -> Account {
    let (
        id,
        name,
        email,
        password_hash,
        age,
        interests,
        reading_time,
        notifications,
        reset_token_hash,
        reset_expires_at,
        created_at,
    ) = row;
    Account {
        id,
        name,
        email,
        password_hash,
        age,
        interests: serde_json::from_str(&interests).unwrap_or_default(),
        reading_time,
        notifications,
        reset_token_hash,
        reset_expires_at,
        created_at,
    }
}

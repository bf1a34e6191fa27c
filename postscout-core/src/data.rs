use postscout_scanner::PageStore;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

pub struct Database {
    conn: Connection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedPage {
    pub id: i64,
    pub url: String,
    pub project_id: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectExtraInfo {
    pub project_id: String,
    pub content: String,
    pub updated_at: i64,
}

/// The project's LinkedIn profile or page description, one per project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedinDescription {
    pub project_id: String,
    pub description_text: String,
    pub updated_at: i64,
}

fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

impl Database {
    pub fn drop(path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn new(path: &Path) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

-- Pages are keyed by (url, project_id). No foreign key: a crawl for an
-- unknown project still stores its pages.
CREATE TABLE IF NOT EXISTS scraped_pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    project_id TEXT NOT NULL,
    content TEXT NOT NULL CHECK(length(content) > 0),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    UNIQUE(url, project_id)
);

CREATE INDEX IF NOT EXISTS idx_scraped_pages_project ON scraped_pages(project_id);

CREATE TABLE IF NOT EXISTS project_extra_info (
    project_id TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS linkedin_description (
    project_id TEXT PRIMARY KEY,
    description_text TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
            ",
        )?;
        Ok(())
    }

    pub fn health_check(&self) -> Result<()> {
        self.conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    // Projects

    /// Returns `Ok(None)` when the trimmed name is empty.
    pub fn create_project(&self, name: &str) -> Result<Option<Project>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let project = Project {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: current_timestamp(),
        };

        self.conn.execute(
            "INSERT INTO projects (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![&project.id, &project.name, project.created_at],
        )?;

        Ok(Some(project))
    }

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, created_at FROM projects ORDER BY created_at DESC, rowid DESC",
        )?;

        let projects = stmt
            .query_map([], project_from_row)?
            .collect::<Result<Vec<_>>>()?;

        Ok(projects)
    }

    pub fn get_project(&self, project_id: &str) -> Result<Option<Project>> {
        self.conn
            .query_row(
                "SELECT id, name, created_at FROM projects WHERE id = ?1",
                params![project_id],
                project_from_row,
            )
            .optional()
    }

    /// Removes the project with its pages, extra info and description.
    pub fn delete_project(&self, project_id: &str) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM scraped_pages WHERE project_id = ?1",
            params![project_id],
        )?;
        tx.execute(
            "DELETE FROM project_extra_info WHERE project_id = ?1",
            params![project_id],
        )?;
        tx.execute(
            "DELETE FROM linkedin_description WHERE project_id = ?1",
            params![project_id],
        )?;
        let removed = tx.execute("DELETE FROM projects WHERE id = ?1", params![project_id])?;
        tx.commit()?;
        Ok(removed > 0)
    }

    // Scraped pages

    pub fn upsert_page(&self, url: &str, project_id: &str, content: &str) -> Result<()> {
        let timestamp = current_timestamp();

        self.conn.execute(
            "INSERT INTO scraped_pages (url, project_id, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(url, project_id) DO UPDATE SET
                content = excluded.content,
                updated_at = excluded.updated_at",
            params![url, project_id, content, timestamp],
        )?;

        Ok(())
    }

    /// Newest first.
    pub fn list_pages(&self, project_id: &str) -> Result<Vec<ScrapedPage>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, url, project_id, content, created_at, updated_at
             FROM scraped_pages WHERE project_id = ?1 ORDER BY id DESC",
        )?;

        let pages = stmt
            .query_map(params![project_id], page_from_row)?
            .collect::<Result<Vec<_>>>()?;

        Ok(pages)
    }

    pub fn get_page(&self, url: &str, project_id: &str) -> Result<Option<ScrapedPage>> {
        self.conn
            .query_row(
                "SELECT id, url, project_id, content, created_at, updated_at
                 FROM scraped_pages WHERE url = ?1 AND project_id = ?2",
                params![url, project_id],
                page_from_row,
            )
            .optional()
    }

    pub fn count_pages(&self, project_id: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM scraped_pages WHERE project_id = ?1",
            params![project_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Only deletes when the page belongs to `project_id`.
    pub fn delete_page(&self, page_id: i64, project_id: &str) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM scraped_pages WHERE id = ?1 AND project_id = ?2",
            params![page_id, project_id],
        )?;
        Ok(removed > 0)
    }

    // Extra info

    pub fn upsert_extra_info(&self, project_id: &str, content: &str) -> Result<ProjectExtraInfo> {
        let info = ProjectExtraInfo {
            project_id: project_id.to_string(),
            content: content.to_string(),
            updated_at: current_timestamp(),
        };

        self.conn.execute(
            "INSERT INTO project_extra_info (project_id, content, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(project_id) DO UPDATE SET
                content = excluded.content,
                updated_at = excluded.updated_at",
            params![&info.project_id, &info.content, info.updated_at],
        )?;

        Ok(info)
    }

    pub fn get_extra_info(&self, project_id: &str) -> Result<Option<ProjectExtraInfo>> {
        self.conn
            .query_row(
                "SELECT project_id, content, updated_at FROM project_extra_info WHERE project_id = ?1",
                params![project_id],
                |row| {
                    Ok(ProjectExtraInfo {
                        project_id: row.get(0)?,
                        content: row.get(1)?,
                        updated_at: row.get(2)?,
                    })
                },
            )
            .optional()
    }

    // LinkedIn description

    pub fn upsert_description(
        &self,
        project_id: &str,
        description_text: &str,
    ) -> Result<LinkedinDescription> {
        let description = LinkedinDescription {
            project_id: project_id.to_string(),
            description_text: description_text.to_string(),
            updated_at: current_timestamp(),
        };

        self.conn.execute(
            "INSERT INTO linkedin_description (project_id, description_text, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(project_id) DO UPDATE SET
                description_text = excluded.description_text,
                updated_at = excluded.updated_at",
            params![
                &description.project_id,
                &description.description_text,
                description.updated_at
            ],
        )?;

        Ok(description)
    }

    pub fn get_description(&self, project_id: &str) -> Result<Option<LinkedinDescription>> {
        self.conn
            .query_row(
                "SELECT project_id, description_text, updated_at FROM linkedin_description
                 WHERE project_id = ?1",
                params![project_id],
                |row| {
                    Ok(LinkedinDescription {
                        project_id: row.get(0)?,
                        description_text: row.get(1)?,
                        updated_at: row.get(2)?,
                    })
                },
            )
            .optional()
    }
}

impl PageStore for Database {
    type Error = rusqlite::Error;

    fn upsert_page(&self, url: &str, project_id: &str, content: &str) -> Result<()> {
        Database::upsert_page(self, url, project_id, content)
    }
}

fn project_from_row(row: &Row<'_>) -> Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

fn page_from_row(row: &Row<'_>) -> Result<ScrapedPage> {
    Ok(ScrapedPage {
        id: row.get(0)?,
        url: row.get(1)?,
        project_id: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

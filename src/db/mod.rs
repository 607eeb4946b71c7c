mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, Row};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::*;
use crate::validation;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> anyhow::Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "got-done")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("got-done.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Category operations
    // ============================================================

    pub fn get_all_categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt =
            conn.prepare("SELECT id, name, created_at FROM categories ORDER BY name")?;

        let categories = stmt
            .query_map([], category_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    pub fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt =
            conn.prepare("SELECT id, name, created_at FROM categories WHERE id = ?")?;

        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(category_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn create_category(&self, input: CreateCategoryInput) -> Result<Category> {
        let name = validation::non_blank("name", &input.name)?;

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO categories (id, name, created_at) VALUES (?, ?, ?)",
            (id.to_string(), &name, now.to_rfc3339()),
        )
        .map_err(|e| map_unique_violation(e, &name))?;

        Ok(Category {
            id,
            name,
            created_at: now,
        })
    }

    /// Rename a category. Rename is the only mutation categories support;
    /// there is deliberately no delete operation.
    pub fn rename_category(
        &self,
        id: Uuid,
        input: UpdateCategoryInput,
    ) -> Result<Option<Category>> {
        let name = validation::non_blank("name", &input.name)?;

        let Some(existing) = self.get_category(id)? else {
            return Ok(None);
        };

        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "UPDATE categories SET name = ? WHERE id = ?",
            (&name, id.to_string()),
        )
        .map_err(|e| map_unique_violation(e, &name))?;

        Ok(Some(Category {
            id,
            name,
            created_at: existing.created_at,
        }))
    }

    pub fn get_category_with_todos(&self, id: Uuid) -> Result<Option<CategoryWithTodos>> {
        let category = match self.get_category(id)? {
            Some(c) => c,
            None => return Ok(None),
        };

        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, category_id, title, due_date, done, created_at, updated_at
             FROM todos WHERE category_id = ? ORDER BY due_date, created_at",
        )?;

        let todos = stmt
            .query_map([id.to_string()], todo_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(CategoryWithTodos { category, todos }))
    }

    // ============================================================
    // Todo operations
    // ============================================================

    /// All to-dos across categories, ascending by due date. Ties keep
    /// insertion order.
    pub fn get_all_todos(&self) -> Result<Vec<Todo>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, category_id, title, due_date, done, created_at, updated_at
             FROM todos ORDER BY due_date, created_at",
        )?;

        let todos = stmt
            .query_map([], todo_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(todos)
    }

    pub fn get_todo(&self, id: Uuid) -> Result<Option<Todo>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, category_id, title, due_date, done, created_at, updated_at
             FROM todos WHERE id = ?",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(todo_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn create_todo(&self, input: CreateTodoInput) -> Result<Todo> {
        let title = validation::non_blank("title", &input.title)?;

        // An unknown category is a form error, not a missing resource: the
        // category selector is part of the submitted input.
        if self.get_category(input.category_id)?.is_none() {
            return Err(Error::validation("category_id", "unknown category"));
        }

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO todos (id, category_id, title, due_date, done, created_at, updated_at)
             VALUES (?, ?, ?, ?, 0, ?, ?)",
            (
                id.to_string(),
                input.category_id.to_string(),
                &title,
                format_date(input.due_date),
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;

        Ok(Todo {
            id,
            category_id: input.category_id,
            title,
            due_date: input.due_date,
            done: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_todo(&self, id: Uuid, input: UpdateTodoInput) -> Result<Option<Todo>> {
        let Some(existing) = self.get_todo(id)? else {
            return Ok(None);
        };

        let title = match input.title {
            Some(t) => validation::non_blank("title", &t)?,
            None => existing.title,
        };
        let category_id = match input.category_id {
            Some(cid) => {
                if self.get_category(cid)?.is_none() {
                    return Err(Error::validation("category_id", "unknown category"));
                }
                cid
            }
            None => existing.category_id,
        };
        let due_date = input.due_date.unwrap_or(existing.due_date);

        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();

        conn.execute(
            "UPDATE todos SET category_id = ?, title = ?, due_date = ?, updated_at = ? WHERE id = ?",
            (
                category_id.to_string(),
                &title,
                format_date(due_date),
                now.to_rfc3339(),
                id.to_string(),
            ),
        )?;

        Ok(Some(Todo {
            id,
            category_id,
            title,
            due_date,
            done: existing.done,
            created_at: existing.created_at,
            updated_at: now,
        }))
    }

    /// Delete a to-do and all of its subtasks in one transaction.
    ///
    /// The caller must pass an explicit confirmation; the cascade is not
    /// something to trigger from a stray request. Completions recorded for
    /// the to-do or its subtasks are left alone.
    pub fn delete_todo(&self, id: Uuid, confirmed: bool) -> Result<bool> {
        if !confirmed {
            return Err(Error::validation(
                "confirm",
                "deleting a to-do removes its subtasks and must be confirmed",
            ));
        }

        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM subtasks WHERE todo_id = ?",
            [id.to_string()],
        )?;
        let rows = tx.execute("DELETE FROM todos WHERE id = ?", [id.to_string()])?;

        tx.commit()?;
        Ok(rows > 0)
    }

    pub fn get_todo_with_subtasks(&self, id: Uuid) -> Result<Option<TodoWithSubtasks>> {
        let todo = match self.get_todo(id)? {
            Some(t) => t,
            None => return Ok(None),
        };

        let subtasks = self.get_subtasks(id)?;

        Ok(Some(TodoWithSubtasks { todo, subtasks }))
    }

    // ============================================================
    // Subtask operations
    // ============================================================

    /// Subtasks of a to-do in stored sibling order.
    pub fn get_subtasks(&self, todo_id: Uuid) -> Result<Vec<Subtask>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, todo_id, title, due_date, position, done, created_at
             FROM subtasks WHERE todo_id = ? ORDER BY position",
        )?;

        let subtasks = stmt
            .query_map([todo_id.to_string()], subtask_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(subtasks)
    }

    pub fn get_subtask(&self, id: Uuid) -> Result<Option<Subtask>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, todo_id, title, due_date, position, done, created_at
             FROM subtasks WHERE id = ?",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(subtask_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Create a subtask, appended after all existing siblings.
    pub fn create_subtask(&self, todo_id: Uuid, input: CreateSubtaskInput) -> Result<Subtask> {
        let title = validation::non_blank("title", &input.title)?;

        if self.get_todo(todo_id)?.is_none() {
            return Err(Error::NotFound("todo"));
        }

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        let position: i64 = conn.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM subtasks WHERE todo_id = ?",
            [todo_id.to_string()],
            |row| row.get(0),
        )?;

        conn.execute(
            "INSERT INTO subtasks (id, todo_id, title, due_date, position, done, created_at)
             VALUES (?, ?, ?, ?, ?, 0, ?)",
            (
                id.to_string(),
                todo_id.to_string(),
                &title,
                format_date(input.due_date),
                position,
                now.to_rfc3339(),
            ),
        )?;

        Ok(Subtask {
            id,
            todo_id,
            title,
            due_date: input.due_date,
            position,
            done: false,
            created_at: now,
        })
    }

    pub fn update_subtask(&self, id: Uuid, input: UpdateSubtaskInput) -> Result<Option<Subtask>> {
        let Some(existing) = self.get_subtask(id)? else {
            return Ok(None);
        };

        let title = match input.title {
            Some(t) => validation::non_blank("title", &t)?,
            None => existing.title,
        };
        let due_date = input.due_date.unwrap_or(existing.due_date);

        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "UPDATE subtasks SET title = ?, due_date = ? WHERE id = ?",
            (&title, format_date(due_date), id.to_string()),
        )?;

        Ok(Some(Subtask {
            id,
            todo_id: existing.todo_id,
            title,
            due_date,
            position: existing.position,
            done: existing.done,
            created_at: existing.created_at,
        }))
    }

    /// Delete a single subtask. Siblings after it shift down one position
    /// so the order stays dense; no cascade beyond that.
    pub fn delete_subtask(&self, id: Uuid) -> Result<bool> {
        let Some(existing) = self.get_subtask(id)? else {
            return Ok(false);
        };

        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM subtasks WHERE id = ?", [id.to_string()])?;
        tx.execute(
            "UPDATE subtasks SET position = position - 1 WHERE todo_id = ? AND position > ?",
            (existing.todo_id.to_string(), existing.position),
        )?;

        tx.commit()?;
        Ok(true)
    }

    /// Move a subtask to a new index among its siblings. The requested
    /// position clamps to the valid range; everything in between shifts.
    pub fn move_subtask(&self, id: Uuid, input: MoveSubtaskInput) -> Result<Option<Subtask>> {
        let Some(existing) = self.get_subtask(id)? else {
            return Ok(None);
        };

        if input.position < 0 {
            return Err(Error::validation("position", "must not be negative"));
        }

        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        let sibling_count: i64 = tx.query_row(
            "SELECT COUNT(*) FROM subtasks WHERE todo_id = ?",
            [existing.todo_id.to_string()],
            |row| row.get(0),
        )?;
        let target = input.position.min(sibling_count - 1);

        if target < existing.position {
            tx.execute(
                "UPDATE subtasks SET position = position + 1
                 WHERE todo_id = ? AND position >= ? AND position < ?",
                (existing.todo_id.to_string(), target, existing.position),
            )?;
        } else if target > existing.position {
            tx.execute(
                "UPDATE subtasks SET position = position - 1
                 WHERE todo_id = ? AND position > ? AND position <= ?",
                (existing.todo_id.to_string(), existing.position, target),
            )?;
        }

        tx.execute(
            "UPDATE subtasks SET position = ? WHERE id = ?",
            (target, id.to_string()),
        )?;

        tx.commit()?;

        Ok(Some(Subtask {
            position: target,
            ..existing
        }))
    }

    // ============================================================
    // Completion ledger operations
    // ============================================================

    /// Mark a to-do or subtask done and append a ledger entry.
    ///
    /// Sets the item's done flag and inserts one completion carrying a
    /// snapshot of the title and category name, in a single transaction.
    /// Marking an already-done item appends another entry; the ledger
    /// records markings, not state.
    pub fn mark_done(&self, kind: CompletionKind, id: Uuid) -> Result<Option<Completion>> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        let snapshot = match kind {
            CompletionKind::Todo => {
                let mut stmt = tx.prepare(
                    "SELECT t.title, c.name FROM todos t
                     JOIN categories c ON c.id = t.category_id
                     WHERE t.id = ?",
                )?;
                let mut rows = stmt.query([id.to_string()])?;
                match rows.next()? {
                    Some(row) => Some((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                    None => None,
                }
            }
            CompletionKind::Subtask => {
                let mut stmt = tx.prepare(
                    "SELECT s.title, c.name FROM subtasks s
                     JOIN todos t ON t.id = s.todo_id
                     JOIN categories c ON c.id = t.category_id
                     WHERE s.id = ?",
                )?;
                let mut rows = stmt.query([id.to_string()])?;
                match rows.next()? {
                    Some(row) => Some((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                    None => None,
                }
            }
        };

        let Some((title, category)) = snapshot else {
            return Ok(None);
        };

        match kind {
            CompletionKind::Todo => {
                tx.execute(
                    "UPDATE todos SET done = 1, updated_at = ? WHERE id = ?",
                    (Utc::now().to_rfc3339(), id.to_string()),
                )?;
            }
            CompletionKind::Subtask => {
                tx.execute(
                    "UPDATE subtasks SET done = 1 WHERE id = ?",
                    [id.to_string()],
                )?;
            }
        }

        let completion_id = Uuid::new_v4();
        let now = Utc::now();
        tx.execute(
            "INSERT INTO completions (id, title, category, kind, completed_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                completion_id.to_string(),
                &title,
                &category,
                kind.as_str(),
                now.to_rfc3339(),
            ),
        )?;

        tx.commit()?;

        Ok(Some(Completion {
            id: completion_id,
            title,
            category,
            kind,
            completed_at: now,
        }))
    }

    /// All ledger entries, newest first.
    pub fn get_all_completions(&self) -> Result<Vec<Completion>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, title, category, kind, completed_at
             FROM completions ORDER BY completed_at DESC",
        )?;

        let completions = stmt
            .query_map([], completion_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(completions)
    }

    /// Clear the whole ledger. There is no per-entry delete; done flags on
    /// to-dos and subtasks are untouched.
    pub fn delete_all_completions(&self) -> Result<usize> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM completions", [])?;
        Ok(rows)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

// ============================================================
// Row mapping
// ============================================================

fn category_from_row(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: parse_uuid(row.get::<_, String>(0)?),
        name: row.get(1)?,
        created_at: parse_datetime(row.get::<_, String>(2)?),
    })
}

fn todo_from_row(row: &Row) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: parse_uuid(row.get::<_, String>(0)?),
        category_id: parse_uuid(row.get::<_, String>(1)?),
        title: row.get(2)?,
        due_date: parse_date(row.get::<_, String>(3)?),
        done: row.get::<_, i32>(4)? != 0,
        created_at: parse_datetime(row.get::<_, String>(5)?),
        updated_at: parse_datetime(row.get::<_, String>(6)?),
    })
}

fn subtask_from_row(row: &Row) -> rusqlite::Result<Subtask> {
    Ok(Subtask {
        id: parse_uuid(row.get::<_, String>(0)?),
        todo_id: parse_uuid(row.get::<_, String>(1)?),
        title: row.get(2)?,
        due_date: parse_date(row.get::<_, String>(3)?),
        position: row.get(4)?,
        done: row.get::<_, i32>(5)? != 0,
        created_at: parse_datetime(row.get::<_, String>(6)?),
    })
}

fn completion_from_row(row: &Row) -> rusqlite::Result<Completion> {
    Ok(Completion {
        id: parse_uuid(row.get::<_, String>(0)?),
        title: row.get(1)?,
        category: row.get(2)?,
        kind: CompletionKind::from_str(&row.get::<_, String>(3)?)
            .unwrap_or(CompletionKind::Todo),
        completed_at: parse_datetime(row.get::<_, String>(4)?),
    })
}

fn map_unique_violation(e: rusqlite::Error, name: &str) -> Error {
    if let rusqlite::Error::SqliteFailure(inner, _) = &e {
        if inner.code == rusqlite::ErrorCode::ConstraintViolation {
            return Error::Integrity(format!("category name '{name}' is already taken"));
        }
    }
    Error::Database(e)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_date(s: String) -> NaiveDate {
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").unwrap_or_default()
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

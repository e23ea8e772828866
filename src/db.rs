use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

pub const DB_FILE: &str = "rosterd.sqlite3";

pub fn open_db(workspace: &Path, busy_timeout: Duration) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join(DB_FILE);
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(busy_timeout)?;
    migrate(&conn)?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS students(
            id TEXT PRIMARY KEY,
            student_id TEXT NOT NULL,
            name TEXT NOT NULL,
            grade REAL NOT NULL,
            status INTEGER NOT NULL DEFAULT 1,
            remarks TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT
        )",
        [],
    )?;

    // Workspaces created before updated_at existed get the column added and backfilled.
    ensure_students_updated_at(conn)?;

    // Authoritative uniqueness guard; the pre-write lookup in the operations is only a fast path.
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_students_student_id ON students(student_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_students_created_at ON students(created_at)",
        [],
    )?;

    Ok(())
}

fn ensure_students_updated_at(conn: &Connection) -> anyhow::Result<()> {
    if !table_has_column(conn, "students", "updated_at")? {
        conn.execute("ALTER TABLE students ADD COLUMN updated_at TEXT", [])?;
    }
    conn.execute(
        "UPDATE students SET updated_at = created_at WHERE updated_at IS NULL",
        [],
    )?;
    Ok(())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> anyhow::Result<bool> {
    let sql = format!("PRAGMA table_info({})", table);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().expect("open");
        migrate(&conn).expect("first migrate");
        migrate(&conn).expect("second migrate");
        assert!(table_has_column(&conn, "students", "updated_at").expect("pragma"));
    }

    #[test]
    fn migrate_backfills_updated_at_on_old_tables() {
        let conn = Connection::open_in_memory().expect("open");
        conn.execute(
            "CREATE TABLE students(
                id TEXT PRIMARY KEY,
                student_id TEXT NOT NULL,
                name TEXT NOT NULL,
                grade REAL NOT NULL,
                status INTEGER NOT NULL DEFAULT 1,
                remarks TEXT,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .expect("legacy table");
        conn.execute(
            "INSERT INTO students(id, student_id, name, grade, status, remarks, created_at)
             VALUES('a', 'F22CSC001', 'Ahmed Khan', 3.7, 1, NULL, '2024-01-01T00:00:00.000Z')",
            [],
        )
        .expect("legacy row");

        migrate(&conn).expect("migrate");

        let updated_at: String = conn
            .query_row("SELECT updated_at FROM students WHERE id = 'a'", [], |r| {
                r.get(0)
            })
            .expect("updated_at");
        assert_eq!(updated_at, "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn unique_index_rejects_duplicate_student_ids() {
        let conn = Connection::open_in_memory().expect("open");
        migrate(&conn).expect("migrate");
        let insert = "INSERT INTO students(id, student_id, name, grade, status, remarks, created_at, updated_at)
                      VALUES(?, 'F22CSC099', 'Ali Raza', 3.4, 1, NULL, 'x', 'x')";
        conn.execute(insert, ["one"]).expect("first insert");
        assert!(conn.execute(insert, ["two"]).is_err());
    }

    #[test]
    fn open_db_creates_workspace_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let workspace = dir.path().join("nested");
        let _conn = open_db(&workspace, Duration::from_millis(100)).expect("open");
        assert!(workspace.join(DB_FILE).is_file());
    }
}

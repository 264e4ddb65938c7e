use std::time::{Duration, Instant};

use rusqlite::hooks::{AuthAction, AuthContext, Authorization};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::sql::{Statement, WriteVerb};

/// How often (in SQLite VM instructions) the deadline is checked.
const PROGRESS_STEP: i32 = 1_000;

pub type Row = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutcome {
    Rows(Vec<Row>),
    Affected {
        #[serde(rename = "rowsAffected")]
        rows_affected: usize,
    },
}

#[derive(Debug)]
pub struct Execution {
    pub outcome: QueryOutcome,
    pub truncated: bool,
}

/// Runs classified statements against the platform database file.
///
/// Reads go through a read-only connection. Writes need their verb in
/// `allowed_writes`. Every statement runs under a deadline.
#[derive(Debug, Clone)]
pub struct SqlExecutor {
    db_path: String,
    allowed_writes: Vec<WriteVerb>,
    max_rows: usize,
    statement_timeout: Duration,
}

impl SqlExecutor {
    pub fn new(db_path: impl Into<String>, max_rows: usize, statement_timeout: Duration) -> Self {
        SqlExecutor {
            db_path: db_path.into(),
            allowed_writes: Vec::new(),
            max_rows,
            statement_timeout,
        }
    }

    /// Unknown verbs are ignored.
    pub fn allow_writes<S: AsRef<str>>(mut self, verbs: &[S]) -> Self {
        self.allowed_writes = verbs
            .iter()
            .filter_map(|v| WriteVerb::parse(v.as_ref()))
            .collect();
        self
    }

    pub fn authorize(&self, statement: &Statement) -> Result<(), String> {
        match statement {
            Statement::Read(_) => Ok(()),
            Statement::Write { verb, .. } if self.allowed_writes.contains(verb) => Ok(()),
            Statement::Write { verb, .. } => Err(format!(
                "{} statements are not enabled",
                verb.as_str().to_uppercase()
            )),
        }
    }

    pub fn run(&self, statement: &Statement) -> Result<Execution, rusqlite::Error> {
        match statement {
            Statement::Read(sql) => self.read(sql),
            Statement::Write { sql, .. } => self.write(sql),
        }
    }

    fn open(&self, flags: OpenFlags) -> Result<Connection, rusqlite::Error> {
        let conn = Connection::open_with_flags(
            &self.db_path,
            flags | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }

    /// Installs the deadline and the column guard. Must come after any
    /// setup pragmas, since the guard denies them.
    fn fence(&self, conn: &Connection) {
        let deadline = Instant::now() + self.statement_timeout;
        conn.progress_handler(PROGRESS_STEP, Some(move || Instant::now() > deadline));
        conn.authorizer(Some(guard_columns));
    }

    fn read(&self, sql: &str) -> Result<Execution, rusqlite::Error> {
        let conn = self.open(OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        self.fence(&conn);
        let mut stmt = conn.prepare(sql)?;
        if !stmt.readonly() {
            return Err(rusqlite::Error::InvalidQuery);
        }
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        let mut truncated = false;
        while let Some(row) = rows.next()? {
            if out.len() == self.max_rows {
                truncated = true;
                break;
            }
            let mut obj = Map::with_capacity(names.len());
            for (idx, name) in names.iter().enumerate() {
                obj.insert(name.clone(), to_json(row.get_ref(idx)?));
            }
            out.push(obj);
        }
        Ok(Execution {
            outcome: QueryOutcome::Rows(out),
            truncated,
        })
    }

    fn write(&self, sql: &str) -> Result<Execution, rusqlite::Error> {
        let conn = self.open(OpenFlags::SQLITE_OPEN_READ_WRITE)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        self.fence(&conn);
        let rows_affected = conn.execute(sql, [])?;
        Ok(Execution {
            outcome: QueryOutcome::Affected { rows_affected },
            truncated: false,
        })
    }
}

/// Password hashes read back as NULL; hashes and roles cannot be rewritten.
fn guard_columns(ctx: AuthContext<'_>) -> Authorization {
    match ctx.action {
        AuthAction::Read {
            table_name: "users",
            column_name: "hash_pwd",
        } => Authorization::Ignore,
        AuthAction::Update {
            table_name: "users",
            column_name: "hash_pwd" | "user_role",
        } => Authorization::Deny,
        AuthAction::Attach { .. } | AuthAction::Pragma { .. } => Authorization::Deny,
        _ => Authorization::Allow,
    }
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Array(b.iter().map(|&byte| Value::from(byte)).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::classify;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("platform.db").to_string_lossy().into_owned();
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, hash_pwd TEXT, user_role TEXT);
             INSERT INTO users (name, hash_pwd, user_role) VALUES ('ada', '$2b$04$x', 'instructor');
             INSERT INTO users (name, hash_pwd, user_role) VALUES ('sam', '$2b$04$y', 'student');
             INSERT INTO users (name, hash_pwd, user_role) VALUES ('kim', '$2b$04$z', 'student');",
        )
        .unwrap();
        (dir, path)
    }

    fn stmt(sql: &str) -> Statement {
        classify(sql).unwrap()
    }

    #[test]
    fn reads_return_named_columns() {
        let (_dir, path) = fixture();
        let executor = SqlExecutor::new(&path, 10, Duration::from_secs(1));
        let run = executor
            .run(&stmt("SELECT id, name FROM users WHERE user_role = 'student' ORDER BY id"))
            .unwrap();
        let QueryOutcome::Rows(rows) = run.outcome else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], Value::from("sam"));
        assert_eq!(rows[1]["id"], Value::from(3));
        assert!(!run.truncated);
    }

    #[test]
    fn rows_are_capped() {
        let (_dir, path) = fixture();
        let executor = SqlExecutor::new(&path, 2, Duration::from_secs(1));
        let run = executor.run(&stmt("SELECT * FROM users")).unwrap();
        match run.outcome {
            QueryOutcome::Rows(rows) => assert_eq!(rows.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
        assert!(run.truncated);
    }

    #[test]
    fn password_hashes_are_hidden() {
        let (_dir, path) = fixture();
        let executor = SqlExecutor::new(&path, 10, Duration::from_secs(1));
        let run = executor
            .run(&stmt("SELECT name, hash_pwd FROM users WHERE id = 1"))
            .unwrap();
        let QueryOutcome::Rows(rows) = run.outcome else {
            panic!("expected rows");
        };
        assert_eq!(rows[0]["hash_pwd"], Value::Null);
        assert_eq!(rows[0]["name"], Value::from("ada"));
    }

    #[test]
    fn writes_need_an_allow_list_entry() {
        let (_dir, path) = fixture();
        let update = stmt("UPDATE users SET name = 'ada l.' WHERE id = 1");

        let read_only = SqlExecutor::new(&path, 10, Duration::from_secs(1));
        assert!(read_only.authorize(&update).is_err());

        let writer = read_only.clone().allow_writes(&["update"]);
        writer.authorize(&update).unwrap();
        let run = writer.run(&update).unwrap();
        assert_eq!(run.outcome, QueryOutcome::Affected { rows_affected: 1 });
    }

    #[test]
    fn roles_cannot_be_rewritten() {
        let (_dir, path) = fixture();
        let writer = SqlExecutor::new(&path, 10, Duration::from_secs(1)).allow_writes(&["update"]);
        let escalate = stmt("UPDATE users SET user_role = 'instructor' WHERE id = 2");
        assert!(writer.run(&escalate).is_err());
    }

    #[test]
    fn long_queries_hit_the_deadline() {
        let (_dir, path) = fixture();
        let executor = SqlExecutor::new(&path, 10, Duration::from_millis(50));
        let endless = stmt(
            "SELECT count(*) FROM (WITH RECURSIVE n(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM n) SELECT x FROM n)",
        );
        assert!(executor.run(&endless).is_err());
    }
}

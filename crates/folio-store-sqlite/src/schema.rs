//! SQL schema for the Folio SQLite store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Documents are strictly append-only.
CREATE TABLE IF NOT EXISTS documents (
    document_id TEXT PRIMARY KEY,
    collection  TEXT NOT NULL,
    body_json   TEXT NOT NULL,   -- flat JSON object, timestamp resolved
    created_at  TEXT NOT NULL    -- ISO 8601 UTC; store-assigned
);

CREATE INDEX IF NOT EXISTS documents_collection_idx
    ON documents(collection, created_at);

PRAGMA user_version = 1;
";

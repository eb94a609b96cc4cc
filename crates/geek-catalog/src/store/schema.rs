//! Table definitions.

/// The catalog schema. Safe to run repeatedly.
///
/// Timestamps are epoch milliseconds; prices are centavos.
pub const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS products (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE,
    price_cents INTEGER NOT NULL CHECK (price_cents > 0),
    description TEXT NOT NULL,
    image_url TEXT NOT NULL,
    category_id TEXT NOT NULL REFERENCES categories (id) ON DELETE RESTRICT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS products_category_id_idx ON products (category_id);

CREATE INDEX IF NOT EXISTS products_updated_at_idx ON products (updated_at);
";

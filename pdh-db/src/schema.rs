//! SQL schema for the in-memory product tables.
//!
//! The schema is applied as a single batch when the database is created.

/// Returns the full SQL schema as a single batch string.
///
/// - `products` - one row per kept product sheet row. `category_key` is not
///   unique: lookups take the lowest `row_id` (first loaded row).
/// - `flows` - one row per kept flow sheet row (product, variable, indicator)
/// - `flow_values` - the flow sheet's year columns melted to
///   `(flow_id, year, count)`; years without a value have no row
/// - `compositions` - one row per (product, material) in sheet order
///
/// `AUTOINCREMENT` keys preserve sheet order, which every "first match" and
/// "insertion order" rule relies on.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS products (
        row_id INTEGER PRIMARY KEY AUTOINCREMENT,
        category_key TEXT NOT NULL,
        prodcom TEXT,
        hs6_cn6 TEXT,
        eol_lower REAL NOT NULL,
        eol_upper REAL NOT NULL,
        eol_average REAL NOT NULL,
        mass_lower REAL,
        mass_upper REAL,
        mass_average REAL,
        source TEXT NOT NULL,
        source_url TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_products_key ON products(category_key);

    CREATE TABLE IF NOT EXISTS flows (
        flow_id INTEGER PRIMARY KEY AUTOINCREMENT,
        product_key TEXT NOT NULL,
        variable TEXT NOT NULL,
        indicator TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_flows_key ON flows(product_key, variable);

    CREATE TABLE IF NOT EXISTS flow_values (
        flow_id INTEGER NOT NULL REFERENCES flows(flow_id),
        year INTEGER NOT NULL,
        count REAL NOT NULL,
        PRIMARY KEY (flow_id, year)
    );

    CREATE TABLE IF NOT EXISTS compositions (
        row_id INTEGER PRIMARY KEY AUTOINCREMENT,
        product_key TEXT NOT NULL,
        material TEXT NOT NULL,
        fraction REAL NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_compositions_key ON compositions(product_key);
    "#
}

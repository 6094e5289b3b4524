//! Database schema definitions.
//!
//! Only the `rooms` table is owned by this crate. Versioned migrations are
//! managed outside the gateway; the bootstrap statement is idempotent.

/// Idempotent bootstrap statement for the `rooms` table.
pub const CREATE_ROOMS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS rooms (
    id          BIGSERIAL PRIMARY KEY,
    slug        TEXT NOT NULL UNIQUE,
    space_id    TEXT NOT NULL DEFAULT '',
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_targets_rooms_table() {
        assert!(CREATE_ROOMS_TABLE.contains("IF NOT EXISTS rooms"));
        for column in ["id", "slug", "space_id", "created_at", "updated_at"] {
            assert!(CREATE_ROOMS_TABLE.contains(column), "missing {column}");
        }
    }
}

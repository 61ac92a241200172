/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Owner identifiers are issued by the external identity provider (the JWT `sub`).
pub type UserId = String;

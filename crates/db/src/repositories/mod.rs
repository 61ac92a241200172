//! PostgreSQL repositories. Each is a zero-sized type with associated async
//! functions taking an executor, so they compose inside transactions.

pub mod counter_repo;
pub mod project_repo;

pub use counter_repo::CounterRepo;
pub use project_repo::ProjectRepo;

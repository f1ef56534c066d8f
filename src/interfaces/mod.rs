//! Transport adapters: the REST shell and CSV import.

pub mod csv;
pub mod http;

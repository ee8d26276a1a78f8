//! Catalog interface consumed during range-table resolution
//!
//! The IR never owns table metadata; it looks descriptors up through this
//! trait and caches them per range-table entry. Implementations are expected
//! to be internally synchronized and read-only from the IR's point of view.

use crate::types::SqlTypeInfo;
use serde::{Deserialize, Serialize};

/// A table bound in the FROM clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub table_id: i32,
    pub table_name: String,
}

/// Column metadata as served by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub table_id: i32,
    pub column_id: i32,
    pub column_name: String,
    pub column_type: SqlTypeInfo,
    /// System columns (row id and friends) are fetched for scans but never
    /// expanded by `SELECT *`.
    pub is_system: bool,
    pub is_virtual: bool,
}

pub trait Catalog {
    fn get_all_column_metadata_for_table(
        &self,
        table_id: i32,
        fetch_system: bool,
        fetch_virtual: bool,
    ) -> Vec<ColumnDescriptor>;

    fn get_metadata_for_column(&self, table_id: i32, column_name: &str)
        -> Option<ColumnDescriptor>;
}

//! Query containers
//!
//! The root of the IR: a [`Query`] holds the projection, the range table,
//! predicates and ordering, plus a link to the next query of a set
//! operation. Range-table entries cache column descriptors so repeated name
//! lookups don't round-trip to the catalog.

use crate::catalog::{Catalog, ColumnDescriptor, TableDescriptor};
use crate::ir::expr::{expr_ref, ColumnVar, ExprRef};
use std::fmt;
use tracing::trace;

/// A named slot in the projection.
#[derive(Debug, Clone)]
pub struct TargetEntry {
    pub resname: String,
    pub expr: ExprRef,
    pub unnest: bool,
}

impl TargetEntry {
    pub fn new(resname: impl Into<String>, expr: ExprRef, unnest: bool) -> Self {
        Self {
            resname: resname.into(),
            expr,
            unnest,
        }
    }
}

impl fmt::Display for TargetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {}", self.resname, self.expr)?;
        if self.unnest {
            write!(f, " UNNEST")?;
        }
        write!(f, ")")
    }
}

/// An ORDER BY item, referencing a target entry by 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderEntry {
    pub tle_no: usize,
    pub is_desc: bool,
    pub nulls_first: bool,
}

impl OrderEntry {
    pub fn new(tle_no: usize, is_desc: bool, nulls_first: bool) -> Self {
        Self {
            tle_no,
            is_desc,
            nulls_first,
        }
    }
}

impl fmt::Display for OrderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tle_no)?;
        if self.is_desc {
            write!(f, " desc")?;
        }
        if self.nulls_first {
            write!(f, " nulls first")?;
        }
        Ok(())
    }
}

/// A FROM-clause binding of a table or view.
#[derive(Debug, Clone)]
pub struct RangeTblEntry {
    /// The alias this entry is referenced by.
    pub rangevar: String,
    pub table_desc: TableDescriptor,
    column_descs: Vec<ColumnDescriptor>,
    pub view_query: Option<Box<Query>>,
}

impl RangeTblEntry {
    pub fn new(
        rangevar: impl Into<String>,
        table_desc: TableDescriptor,
        view_query: Option<Box<Query>>,
    ) -> Self {
        Self {
            rangevar: rangevar.into(),
            table_desc,
            column_descs: Vec::new(),
            view_query,
        }
    }

    pub fn table_id(&self) -> i32 {
        self.table_desc.table_id
    }

    pub fn column_descs(&self) -> &[ColumnDescriptor] {
        &self.column_descs
    }

    /// Populates the descriptor cache with every column of the table,
    /// system and virtual columns included.
    pub fn add_all_column_descs(&mut self, catalog: &dyn Catalog) {
        self.column_descs =
            catalog.get_all_column_metadata_for_table(self.table_desc.table_id, true, true);
    }

    /// Expands `SELECT *`: caches the non-system columns and appends one
    /// target entry per column, each holding a fresh column reference.
    pub fn expand_star_in_targetlist(
        &mut self,
        catalog: &dyn Catalog,
        tlist: &mut Vec<TargetEntry>,
        rte_idx: i32,
    ) {
        self.column_descs =
            catalog.get_all_column_metadata_for_table(self.table_desc.table_id, false, true);
        for cd in &self.column_descs {
            let cv = expr_ref(ColumnVar::new(
                cd.column_type.clone(),
                self.table_desc.table_id,
                cd.column_id,
                rte_idx,
            ));
            tlist.push(TargetEntry::new(cd.column_name.clone(), cv, false));
        }
    }

    /// Looks a column up by name, consulting the cache first and caching a
    /// catalog hit on miss.
    pub fn get_column_desc(
        &mut self,
        catalog: &dyn Catalog,
        name: &str,
    ) -> Option<&ColumnDescriptor> {
        if let Some(pos) = self
            .column_descs
            .iter()
            .position(|cd| cd.column_name == name)
        {
            return Some(&self.column_descs[pos]);
        }
        trace!(table_id = self.table_desc.table_id, column = name, "column descriptor cache miss");
        let cd = catalog.get_metadata_for_column(self.table_desc.table_id, name)?;
        self.column_descs.push(cd);
        self.column_descs.last()
    }
}

/// Statement kind of a query block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryType {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
}

/// A resolved query block.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub stmt_type: QueryType,
    pub is_distinct: bool,
    pub targetlist: Vec<TargetEntry>,
    pub rangetable: Vec<RangeTblEntry>,
    pub where_predicate: Option<ExprRef>,
    pub group_by: Vec<ExprRef>,
    pub having_predicate: Option<ExprRef>,
    pub order_by: Vec<OrderEntry>,
    /// No limit when absent.
    pub limit: Option<i64>,
    pub offset: i64,
    /// Next query of a set-operation chain.
    pub next_query: Option<Box<Query>>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// The 0-based position of the range-table entry bound to `name`, or -1
    /// when no entry matches.
    pub fn get_rte_idx(&self, name: &str) -> i32 {
        for (i, rte) in self.rangetable.iter().enumerate() {
            if rte.rangevar == name {
                return i as i32;
            }
        }
        -1
    }

    pub fn add_rte(&mut self, rte: RangeTblEntry) {
        self.rangetable.push(rte);
    }
}

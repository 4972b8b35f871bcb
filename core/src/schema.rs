//! Schema descriptors fed to the DDL renderer.
//!
//! These are plain data types: the renderer in [`crate::ddl`] turns them
//! into SQL text for a target dialect.

use std::collections::BTreeMap;

/// A column's SQL type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Uuid,
    Text,
    Varchar(u32),
    Int,
    BigInt,
    /// Auto-incrementing integer backed by a sequence. Rejected by
    /// dialects without sequence support.
    Serial,
    BigSerial,
    Boolean,
    Decimal,
    DoublePrecision,
    Timestamp,
    TimestampTz,
    Date,
    Jsonb,
    Bytea,
    /// A named enumeration. Dialects without native enums render this as
    /// TEXT plus a CHECK constraint over the labels.
    Enum { name: String, labels: Vec<String> },
}

/// A column definition.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub data_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub default: Option<String>,
    /// Inline foreign-key target, e.g. `owner(id)`. Omitted entirely on
    /// dialects without ALTER-based constraint support.
    pub references: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            primary_key: false,
            unique: false,
            default: None,
            references: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default(mut self, val: impl Into<String>) -> Self {
        self.default = Some(val.into());
        self
    }

    pub fn references(mut self, target: impl Into<String>) -> Self {
        self.references = Some(target.into());
        self
    }
}

/// A table-level constraint.
#[derive(Debug, Clone)]
pub enum TableConstraint {
    PrimaryKey(Vec<String>),
    Unique(Vec<String>),
}

/// A table definition.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub constraints: Vec<TableConstraint>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn column(mut self, col: Column) -> Self {
        self.columns.push(col);
        self
    }

    pub fn constraint(mut self, constraint: TableConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// One indexed element: either a plain column reference or an arbitrary
/// SQL expression. Expressions render parenthesized, columns do not.
#[derive(Debug, Clone)]
pub enum IndexElement {
    Column(String),
    Expression {
        /// Label used to attach an operator class; unlabeled expressions
        /// never pick one up.
        key: Option<String>,
        sql: String,
    },
}

impl IndexElement {
    /// The key operator classes attach by.
    pub(crate) fn key(&self) -> Option<&str> {
        match self {
            Self::Column(name) => Some(name),
            Self::Expression { key, .. } => key.as_deref(),
        }
    }
}

/// An index definition, carrying the full set of clauses the renderer
/// understands.
#[derive(Debug, Clone)]
pub struct Index {
    pub name: String,
    pub table: String,
    pub elements: Vec<IndexElement>,
    pub unique: bool,
    pub if_not_exists: bool,
    /// Only honored by dialects that accept CREATE INDEX CONCURRENTLY.
    pub concurrently: bool,
    /// Index method for the USING clause, e.g. `btree` or `gin`.
    pub using: Option<String>,
    /// Operator classes keyed by element key.
    pub ops: BTreeMap<String, String>,
    /// Non-key columns for the INCLUDE clause.
    pub include: Vec<String>,
    /// `Some(true)` renders NULLS NOT DISTINCT, `Some(false)` renders
    /// NULLS DISTINCT, `None` renders neither.
    pub nulls_not_distinct: Option<bool>,
    /// Storage parameters for the WITH clause.
    pub with: BTreeMap<String, String>,
    pub tablespace: Option<String>,
    /// Partial-index predicate, appended verbatim after WHERE.
    pub predicate: Option<String>,
}

impl Index {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            elements: Vec::new(),
            unique: false,
            if_not_exists: false,
            concurrently: false,
            using: None,
            ops: BTreeMap::new(),
            include: Vec::new(),
            nulls_not_distinct: None,
            with: BTreeMap::new(),
            tablespace: None,
            predicate: None,
        }
    }

    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.elements.push(IndexElement::Column(name.into()));
        self
    }

    pub fn expression(mut self, sql: impl Into<String>) -> Self {
        self.elements.push(IndexElement::Expression {
            key: None,
            sql: sql.into(),
        });
        self
    }

    pub fn labeled_expression(
        mut self,
        key: impl Into<String>,
        sql: impl Into<String>,
    ) -> Self {
        self.elements.push(IndexElement::Expression {
            key: Some(key.into()),
            sql: sql.into(),
        });
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    pub fn concurrently(mut self) -> Self {
        self.concurrently = true;
        self
    }

    pub fn using(mut self, method: impl Into<String>) -> Self {
        self.using = Some(method.into());
        self
    }

    pub fn op(mut self, key: impl Into<String>, opclass: impl Into<String>) -> Self {
        self.ops.insert(key.into(), opclass.into());
        self
    }

    pub fn include(mut self, column: impl Into<String>) -> Self {
        self.include.push(column.into());
        self
    }

    pub fn nulls_not_distinct(mut self, flag: bool) -> Self {
        self.nulls_not_distinct = Some(flag);
        self
    }

    pub fn with(mut self, parameter: impl Into<String>, value: impl Into<String>) -> Self {
        self.with.insert(parameter.into(), value.into());
        self
    }

    pub fn tablespace(mut self, name: impl Into<String>) -> Self {
        self.tablespace = Some(name.into());
        self
    }

    pub fn predicate(mut self, sql: impl Into<String>) -> Self {
        self.predicate = Some(sql.into());
        self
    }
}

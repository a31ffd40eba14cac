//! Compiles JSON filter trees from an advanced-search API into parameterized
//! PostgreSQL boolean expressions.
//!
//! Two entry points are provided:
//!
//! - [`compile`] / [`FilterCompiler`] produce one SQL expression for a single
//!   table described by a [`ColumnMap`] and [`JsonColumnInfo`]s.
//! - [`compile_grouped`] / [`GroupedFilterCompiler`] route every condition to
//!   the [`GroupDefinition`] owning its field and return a [`FilterNode`] tree
//!   that keeps the logical structure per group.
//!
//! Literal values never appear in the SQL text; they are bound in
//! [`Bindings`] and referenced as `:name`.

pub mod compiler;
pub mod condition;
pub mod error;
pub mod expr;
pub mod node;
pub mod operator;
pub mod options;
pub mod params;
pub mod resolver;
pub mod schema;

pub use compiler::{
    FilterCompiler, GroupedFilter, GroupedFilterCompiler, compile, compile_grouped,
};
pub use error::FilterError;
pub use node::{FilterNode, GroupConditions};
pub use operator::{Operator, SetOperator};
pub use options::{CompileOptions, EmptyNodePolicy};
pub use params::Bindings;
pub use schema::{
    AttributeInfo, AttributeType, ColumnMap, FilterSchema, GroupDefinition, JsonColumnInfo,
    TableSchema,
};

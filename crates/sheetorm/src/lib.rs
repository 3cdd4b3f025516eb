mod config;
pub use config::{CacheConfig, Config, PaginationConfig};

pub mod db;
pub use db::Db;

pub mod model;
pub use model::{Definition, Entity, Hook, HookKind, Model, ModelQuery, Persistence};

mod page;
pub use page::{Page, PageMeta};

mod query;
pub use query::QueryBuilder;

pub mod relation;
pub use relation::{BelongsTo, HasMany, HasOne, ManyToMany, Pivot, Related};

mod validate;
pub use validate::Validator;

pub use sheetorm_core::{
    async_trait, bail, driver, err, record,
    schema::{self, Column, ColumnType},
    stmt::{self, Direction, Operator, Record, Value},
    Error, FieldErrors, Result, Schema,
};

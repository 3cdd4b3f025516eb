mod filter;
pub use filter::{Clause, Conjunction, Filter};

mod operator;
pub use operator::Operator;

pub mod order_by;
pub use order_by::{Direction, OrderBy};

mod query;
pub use query::Query;

pub mod record;
pub use record::Record;

mod value;
pub use value::Value;

mod value_cmp;
pub(crate) use value_cmp::parse_instant;

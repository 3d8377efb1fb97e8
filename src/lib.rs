//! # sqlforge
//!
//! > **Describe the table once. Get the SQL for every dialect.**
//!
//! sqlforge generates parameterised SQL for mapped tables: SELECT, COUNT,
//! paged and windowed SELECT, INSERT, UPDATE, DELETE, identity retrieval and
//! multi-row bulk INSERT/UPDATE. It never opens a connection; values are
//! bound into a [`Parameters`](params::Parameters) bag for the caller to
//! execute however it likes.
//!
//! ## Quick Example
//!
//! ```
//! use sqlforge::prelude::*;
//!
//! let person = TableMap::new("Person")
//!     .column(ColumnMap::new("Id").key(KeyType::Identity))
//!     .column(ColumnMap::new("Name"))
//!     .column(ColumnMap::new("Age"));
//!
//! let generator = SqlGenerator::new(PostgresDialect);
//! assert_eq!(
//!     generator.build_insert(&person).unwrap(),
//!     r#"INSERT INTO "Person" ("Name", "Age") VALUES (@Name, @Age)"#
//! );
//!
//! let mut params = Parameters::new();
//! let by_id = field("Id", Operator::Eq, 42);
//! let sql = generator
//!     .build_update(&person, Some(&by_id), &mut params, false)
//!     .unwrap();
//! assert_eq!(sql, r#"UPDATE "Person" SET "Name" = @Name, "Age" = @Age WHERE "Id" = @Id_p0"#);
//! assert_eq!(params.get("@Id_p0"), Some(&SqlValue::Int(42)));
//! ```
//!
//! ## Key types
//!
//! | Key               | INSERT | UPDATE                     |
//! |-------------------|--------|----------------------------|
//! | `NotAKey`         | yes    | yes                        |
//! | `Assigned`        | yes    | no                         |
//! | `Identity`        | no     | no                         |
//! | `TriggerIdentity` | no     | unless all keys are ignored |

pub mod config;
pub mod dialect;
pub mod error;
pub mod generator;
pub mod mapping;
pub mod params;
pub mod predicate;
pub mod sort;
pub mod value;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::dialect::*;
    pub use crate::error::*;
    pub use crate::generator::{Entity, GeneratorOptions, SqlGenerator};
    pub use crate::mapping::{ColumnMap, KeyType, TableMap};
    pub use crate::params::Parameters;
    pub use crate::predicate::*;
    pub use crate::sort::Sort;
    pub use crate::value::SqlValue;
}

//! # sqltmpl
//!
//! SQL query templates with typed placeholders, rendered to plain SQL text.
//!
//! ## Features
//!
//! - **Typed placeholders**: `?` (auto), `?d` (integer), `?f` (float),
//!   `?a` (value list / assignments), `?#` (identifiers)
//! - **Optional blocks**: `{...}` fragments vanish when one of their
//!   placeholders is bound to [`skip()`]
//! - **Pluggable escaping**: string literals go through an [`Escaper`];
//!   identifiers are backtick-quoted locally
//! - **Strict arity**: argument count must match placeholder count exactly
//!
//! ## Example
//!
//! ```
//! use sqltmpl::{args, build_query, map, skip};
//!
//! let sql = build_query(
//!     "UPDATE users SET ?a WHERE user_id = ?d {AND tenant = ?}",
//!     &args![map! {"name" => "Jack", "email" => None::<&str>}, 7, skip()],
//! )?;
//! assert_eq!(
//!     sql,
//!     "UPDATE users SET `name` = 'Jack', `email` = NULL WHERE user_id = 7 "
//! );
//! # Ok::<(), sqltmpl::TemplateError>(())
//! ```

pub mod error;
pub mod escape;
pub mod template;
pub mod value;

pub use error::{TemplateError, TemplateResult};
pub use escape::{Escaper, FnEscaper, MysqlEscaper, StandardEscaper, quote_ident};
pub use template::{
    MARKER, Placeholder, QueryBuilder, Specifier, build_query, format_identifier, scan,
};
pub use value::{Value, skip};

// Re-export for the `map!` macro.
#[doc(hidden)]
pub use indexmap;

/// Build a `Vec<Value>` argument list from heterogeneous expressions.
///
/// ```
/// use sqltmpl::{Value, args, skip};
///
/// let a = args![1, "x", None::<i32>, skip()];
/// assert_eq!(a, vec![Value::Int(1), Value::Str("x".into()), Value::Null, Value::Skip]);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($arg)),+]
    };
}

/// Build a [`Value::Map`] keeping the written key order.
#[macro_export]
macro_rules! map {
    () => {
        $crate::Value::Map($crate::indexmap::IndexMap::new())
    };
    ($($key:expr => $val:expr),+ $(,)?) => {{
        let mut m = $crate::indexmap::IndexMap::<::std::string::String, $crate::Value>::new();
        $(
            m.insert(::std::string::String::from($key), $crate::Value::from($val));
        )+
        $crate::Value::Map(m)
    }};
}

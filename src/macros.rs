/// Builds a [`Value`](crate::Value) from JSON-like syntax.
///
/// Objects become tables, keeping the order in which keys are written. Leaf
/// expressions go through `Value::from`. Negative numbers inside arrays or
/// objects need parentheses, e.g. `value!([(-1), 2])`.
///
/// ```rust
/// use serde_tomlet::{value, Value};
///
/// let server = value!({
///     "host": "localhost",
///     "ports": [8000, 8001],
///     "tls": { "enabled": false }
/// });
/// assert_eq!(server.as_table().map(|t| t.len()), Some(3));
/// assert_eq!(value!([]), Value::Array(vec![]));
/// ```
#[macro_export]
macro_rules! value {
    (true) => {
        $crate::Value::Boolean(true)
    };

    (false) => {
        $crate::Value::Boolean(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Table($crate::Table::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut table = $crate::Table::new();
        $(
            table.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::Table(table)
    }};

    ($e:expr) => {
        $crate::Value::from($e)
    };
}

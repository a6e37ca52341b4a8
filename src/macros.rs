/// Builds a root [`Node`](crate::Node) from a literal description.
///
/// Statements are separated by commas:
///
/// - `"name" = value` adds a named value (anything convertible into
///   [`Value`](crate::Value))
/// - `"name" => [v1, v2]` adds an identifier with the listed values
/// - `"name" => { ... }` adds a nested node
/// - `"name"` alone adds an identifier with no values
///
/// # Examples
///
/// ```rust
/// use duct_script::{script, to_string, Collection};
///
/// let root = script! {
///     "name" = "demo",
///     "debug",
///     "server" => {
///         "port" = 8080,
///         "hosts" => ["a.example", "b.example"],
///     },
/// };
///
/// assert_eq!(root.len(), 3);
/// assert_eq!(root.get_node("server", true).unwrap().get_int("port", true), Some(8080));
/// ```
#[macro_export]
macro_rules! script {
    (@fill $node:ident;) => {};

    (@fill $node:ident; $name:literal => [ $($value:expr),* $(,)? ] $(, $($rest:tt)*)?) => {
        {
            let values: ::std::vec::Vec<$crate::Value> =
                ::std::vec![$($crate::Value::from($value)),*];
            $crate::Collection::push(&mut $node, $crate::Identifier::with_values($name, values));
        }
        $crate::script!(@fill $node; $($($rest)*)?);
    };

    (@fill $node:ident; $name:literal => { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        {
            let mut child = $crate::Node::new($name);
            $crate::script!(@fill child; $($inner)*);
            $crate::Collection::push(&mut $node, child);
        }
        $crate::script!(@fill $node; $($($rest)*)?);
    };

    (@fill $node:ident; $name:literal = $value:expr $(, $($rest:tt)*)?) => {
        $crate::Collection::push(&mut $node, $crate::ValueVariable::new($name, $value));
        $crate::script!(@fill $node; $($($rest)*)?);
    };

    (@fill $node:ident; $name:literal $(, $($rest:tt)*)?) => {
        $crate::Collection::push(&mut $node, $crate::Identifier::new($name));
        $crate::script!(@fill $node; $($($rest)*)?);
    };

    ($($body:tt)*) => {{
        #[allow(unused_mut)]
        let mut root = $crate::Node::root();
        $crate::script!(@fill root; $($body)*);
        root
    }};
}

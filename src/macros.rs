/// Builds a [`JsonNode`](crate::JsonNode) from JSON-like syntax.
///
/// Object members keep the order they are written in. Any other expression is
/// captured through [`to_node`](crate::to_node) and becomes `null` if it cannot
/// be represented.
///
/// ```rust
/// use json_mapper::json;
///
/// let person = json!({
///     "name": "Juan Garcia",
///     "birthdate": [1980, 9, 15],
///     "hobbies": null
/// });
/// assert_eq!(person.to_string(), r#"{"name":"Juan Garcia","birthdate":[1980,9,15],"hobbies":null}"#);
/// ```
#[macro_export]
macro_rules! json {
    (null) => {
        $crate::JsonNode::Null
    };

    (true) => {
        $crate::JsonNode::Bool(true)
    };

    (false) => {
        $crate::JsonNode::Bool(false)
    };

    ([]) => {
        $crate::JsonNode::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::JsonNode::Array(vec![$($crate::json!($elem)),*])
    };

    ({}) => {
        $crate::JsonNode::Object($crate::JsonMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::JsonMap::new();
        $(
            object.insert($key.to_string(), $crate::json!($value));
        )*
        $crate::JsonNode::Object(object)
    }};

    ($s:expr) => {
        $crate::to_node(&$s).unwrap_or($crate::JsonNode::Null)
    };
}

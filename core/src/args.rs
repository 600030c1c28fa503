//! Argument handling for named-route shortcuts on query-like routes.
//!
//! Such shortcuts accept either a configuration object or positional
//! placeholder values:
//!
//! ```text
//! client.call("user", &[json!(42)])                       // /users/42
//! client.call("user", &[json!({"vars": [42]})])           // same
//! client.call("user", &[json!({"vars": {"id": 42}})])     // same
//! ```

use serde_json::{Map, Value};

use crate::placeholder::placeholder_names;
use crate::types::VariablesMap;

/// Turn shortcut arguments into a configuration object for `template`.
///
/// When the first argument is absent, null or an object it is the
/// configuration; a positional `vars`/`$vars` array inside it is replaced
/// by a variables map. Otherwise every argument is a positional value (a
/// single array argument is unpacked) and the result is `{"vars": ..}`.
pub fn resolve_args(template: &str, args: &[Value]) -> Map<String, Value> {
    match args.first() {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(config)) => {
            let mut config = config.clone();
            for key in ["vars", "$vars"] {
                if let Some(Value::Array(values)) = config.get(key) {
                    let vars = zip_placeholders(template, values);
                    config.insert(key.to_string(), Value::Object(vars));
                }
            }
            config
        }
        Some(Value::Array(values)) if args.len() == 1 => vars_config(template, values),
        Some(_) => vars_config(template, args),
    }
}

fn vars_config(template: &str, values: &[Value]) -> Map<String, Value> {
    let mut config = Map::new();
    config.insert(
        "vars".to_string(),
        Value::Object(zip_placeholders(template, values)),
    );
    config
}

/// Pair placeholder names with `values` by position. Names without a
/// (non-null) value are left out.
pub fn zip_placeholders(template: &str, values: &[Value]) -> VariablesMap {
    placeholder_names(template)
        .into_iter()
        .zip(values)
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_are_positional_values() {
        let config = resolve_args("/users/:id/posts/:post", &[json!(42), json!("intro")]);
        assert_eq!(
            Value::Object(config),
            json!({"vars": {"id": 42, "post": "intro"}})
        );
    }

    #[test]
    fn single_array_argument_is_unpacked() {
        let config = resolve_args("/users/:id/posts/:post", &[json!([42, "intro"])]);
        assert_eq!(
            Value::Object(config),
            json!({"vars": {"id": 42, "post": "intro"}})
        );
    }

    #[test]
    fn uncovered_placeholders_are_omitted() {
        let config = resolve_args("/users/:id/posts/:post", &[json!(42)]);
        assert_eq!(Value::Object(config), json!({"vars": {"id": 42}}));
    }

    #[test]
    fn config_object_with_positional_vars() {
        let config = resolve_args(
            "/users/:id",
            &[json!({"vars": [7], "params": {"expand": true}})],
        );
        assert_eq!(
            Value::Object(config),
            json!({"vars": {"id": 7}, "params": {"expand": true}})
        );
    }

    #[test]
    fn marked_positional_vars_are_zipped_in_place() {
        let config = resolve_args("/users/:id", &[json!({"$vars": [7]})]);
        assert_eq!(Value::Object(config), json!({"$vars": {"id": 7}}));
    }

    #[test]
    fn keyed_vars_pass_through() {
        let config = resolve_args("/users/:id", &[json!({"vars": {"id": 3}})]);
        assert_eq!(Value::Object(config), json!({"vars": {"id": 3}}));
    }

    #[test]
    fn no_arguments_give_empty_config() {
        assert!(resolve_args("/users/:id", &[]).is_empty());
        assert!(resolve_args("/users/:id", &[Value::Null]).is_empty());
    }

    #[test]
    fn template_without_placeholders_gives_empty_vars() {
        let config = resolve_args("/health", &[json!(1)]);
        assert_eq!(Value::Object(config), json!({"vars": {}}));
    }

    #[test]
    fn null_positional_values_are_skipped() {
        let vars = zip_placeholders("/:a/:b", &[Value::Null, json!(2)]);
        assert_eq!(Value::Object(vars), json!({"b": 2}));
    }
}

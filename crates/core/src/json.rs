use serde_json::Value;

/// Drop object entries whose value is `null`, at every depth.
///
/// Array slots are left alone so positional meaning survives; objects nested
/// inside arrays are still pruned.
pub fn prune_null_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(prune_null_fields);
        }
        Value::Array(items) => items.iter_mut().for_each(prune_null_fields),
        _ => {}
    }
}

/// Copy of `value` with null object fields removed. Used by transports
/// before a JSON body goes on the wire.
pub fn without_null_fields(value: &Value) -> Value {
    let mut cloned = value.clone();
    prune_null_fields(&mut cloned);
    cloned
}

use super::{absent_or_null, parse_json, AnyConverter, CoercedValue, ConvertOptions, TypeConverter};
use crate::error::CoercionError;
use crate::value::Value;
use std::sync::Arc;

/// `array` and `[item]` arguments.
///
/// Items are coerced through the item converter; an item failure fails the whole array and
/// names the offending index.
#[derive(Debug, Clone)]
pub struct ArrayConverter {
    item: Arc<dyn TypeConverter>,
}

impl Default for ArrayConverter {
    fn default() -> Self {
        ArrayConverter {
            item: Arc::new(AnyConverter),
        }
    }
}

impl ArrayConverter {
    /// Array whose items use `item`
    pub fn of(item: Arc<dyn TypeConverter>) -> Self {
        ArrayConverter { item }
    }

    #[must_use]
    pub fn item_converter(&self) -> &Arc<dyn TypeConverter> {
        &self.item
    }

    fn coerce_items<F>(&self, items: Vec<Value>, mut coerce: F) -> CoercedValue
    where
        F: FnMut(&dyn TypeConverter, Value) -> CoercedValue,
    {
        items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| {
                coerce(self.item.as_ref(), item).map_err(|e| e.with_prefix(&format!("Item {idx}")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }
}

impl TypeConverter for ArrayConverter {
    fn name(&self) -> &'static str {
        "array"
    }

    fn from_typed_value(&self, value: Value, options: &ConvertOptions) -> CoercedValue {
        match value {
            Value::Undefined | Value::Null => Ok(value),
            Value::Array(items) => {
                self.coerce_items(items, |conv, item| conv.from_typed_value(item, options))
            }
            _ => Err(CoercionError::new("Value is not an array.")),
        }
    }

    fn from_sloppy_value(&self, value: Value, options: &ConvertOptions) -> CoercedValue {
        if let Some(empty) = absent_or_null(&value) {
            return Ok(empty);
        }
        match value {
            Value::String(text) if text.starts_with('[') && text.ends_with(']') => {
                let parsed = parse_json(&text)?;
                self.from_typed_value(parsed, options)
            }
            // `?ids=1,2,3`
            Value::String(text) => {
                let items = text.split(',').map(|s| Value::String(s.trim().to_string())).collect();
                self.coerce_items(items, |conv, item| conv.from_sloppy_value(item, options))
            }
            // `?ids[]=1&ids[]=2`
            Value::Array(items) => {
                self.coerce_items(items, |conv, item| conv.from_sloppy_value(item, options))
            }
            Value::Object(_) => Err(CoercionError::new("Value is not an array.")),
            scalar => self.from_typed_value(Value::Array(vec![scalar]), options),
        }
    }

    fn validate(&self, value: &Value, options: &ConvertOptions) -> Option<CoercionError> {
        match value {
            Value::Undefined | Value::Null => None,
            Value::Array(items) => items.iter().enumerate().find_map(|(idx, item)| {
                self.item
                    .validate(item, options)
                    .map(|e| e.with_prefix(&format!("Item {idx}")))
            }),
            _ => Some(CoercionError::new("Value is not an array.")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::NumberConverter;

    fn numbers() -> ArrayConverter {
        ArrayConverter::of(Arc::new(NumberConverter))
    }

    #[test]
    fn test_sloppy_forms() {
        let opts = ConvertOptions::default();
        let expected = Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(numbers().from_sloppy_value(Value::from("1,2"), &opts), Ok(expected.clone()));
        assert_eq!(numbers().from_sloppy_value(Value::from("[1,2]"), &opts), Ok(expected.clone()));
        assert_eq!(
            numbers().from_sloppy_value(Value::Array(vec![Value::from("1"), Value::from("2")]), &opts),
            Ok(expected)
        );
        assert_eq!(
            numbers().from_sloppy_value(Value::from("7"), &opts),
            Ok(Value::Array(vec![Value::Number(7.0)]))
        );
    }

    #[test]
    fn test_item_error_names_index() {
        let err = numbers()
            .from_sloppy_value(Value::from("1,x"), &ConvertOptions::default())
            .unwrap_err();
        assert_eq!(err.message(), "Item 1: Value is not a number.");
    }

    #[test]
    fn test_typed_items_are_not_parsed() {
        let input = Value::Array(vec![Value::from("1")]);
        assert!(numbers().from_typed_value(input, &ConvertOptions::default()).is_err());
    }
}

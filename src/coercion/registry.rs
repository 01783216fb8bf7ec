use super::{
    AnyConverter, ArrayConverter, BooleanConverter, BufferConverter, DateConverter,
    GeoPointConverter, IntegerConverter, NumberConverter, ObjectConverter, StringConverter,
    TypeConverter,
};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error};

/// Declared type of an argument or return value.
///
/// The set is closed. Names parse case-insensitively; `[number]` declares an array of numbers
/// and plain `array` is an array of `any`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeTag {
    Any,
    String,
    Number,
    Integer,
    Boolean,
    Date,
    GeoPoint,
    Object,
    Array(Box<TypeTag>),
    Buffer,
}

impl TypeTag {
    /// Registry key: the tag name without array item type
    #[must_use]
    pub fn base_name(&self) -> &'static str {
        match self {
            TypeTag::Any => "any",
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Integer => "integer",
            TypeTag::Boolean => "boolean",
            TypeTag::Date => "date",
            TypeTag::GeoPoint => "geopoint",
            TypeTag::Object => "object",
            TypeTag::Array(_) => "array",
            TypeTag::Buffer => "buffer",
        }
    }

    /// `[item]`
    #[must_use]
    pub fn array_of(item: TypeTag) -> Self {
        TypeTag::Array(Box::new(item))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Array(item) if **item == TypeTag::Any => write!(f, "array"),
            TypeTag::Array(item) => write!(f, "[{item}]"),
            other => write!(f, "{}", other.base_name()),
        }
    }
}

impl FromStr for TypeTag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if let Some(inner) = name.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            return Ok(TypeTag::array_of(inner.parse()?));
        }
        match name.to_ascii_lowercase().as_str() {
            "any" => Ok(TypeTag::Any),
            "string" => Ok(TypeTag::String),
            "number" => Ok(TypeTag::Number),
            "integer" => Ok(TypeTag::Integer),
            "boolean" => Ok(TypeTag::Boolean),
            "date" => Ok(TypeTag::Date),
            "geopoint" => Ok(TypeTag::GeoPoint),
            "object" => Ok(TypeTag::Object),
            "array" => Ok(TypeTag::array_of(TypeTag::Any)),
            "buffer" => Ok(TypeTag::Buffer),
            _ => Err(ConfigError::UnknownType {
                name: name.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for TypeTag {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeTag> for String {
    fn from(tag: TypeTag) -> Self {
        tag.to_string()
    }
}

/// Lookup from declared type to converter.
///
/// Built once at startup and shared read-only (`Arc<CoercionRegistry>`) by every call.
/// Lookup is an exact match on the tag; an unregistered tag is a [`ConfigError`], never a
/// fallback to a looser converter.
#[derive(Clone)]
pub struct CoercionRegistry {
    converters: HashMap<&'static str, Arc<dyn TypeConverter>>,
}

impl Default for CoercionRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl fmt::Debug for CoercionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&&str> = self.converters.keys().collect();
        names.sort();
        f.debug_struct("CoercionRegistry").field("types", &names).finish()
    }
}

impl CoercionRegistry {
    /// Registry without any converter
    #[must_use]
    pub fn empty() -> Self {
        CoercionRegistry {
            converters: HashMap::new(),
        }
    }

    /// Registry holding every built-in converter
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(TypeTag::Any, Arc::new(AnyConverter));
        registry.register(TypeTag::String, Arc::new(StringConverter));
        registry.register(TypeTag::Number, Arc::new(NumberConverter));
        registry.register(TypeTag::Integer, Arc::new(IntegerConverter));
        registry.register(TypeTag::Boolean, Arc::new(BooleanConverter));
        registry.register(TypeTag::Date, Arc::new(DateConverter));
        registry.register(TypeTag::GeoPoint, Arc::new(GeoPointConverter));
        registry.register(TypeTag::Object, Arc::new(ObjectConverter));
        registry.register(TypeTag::array_of(TypeTag::Any), Arc::new(ArrayConverter::default()));
        registry.register(TypeTag::Buffer, Arc::new(BufferConverter));
        registry
    }

    /// Register (or replace) the converter for `tag`
    pub fn register(&mut self, tag: TypeTag, converter: Arc<dyn TypeConverter>) {
        let name = tag.base_name();
        if self.converters.insert(name, converter).is_some() {
            debug!(type_name = name, "Replaced registered converter");
        }
    }

    #[must_use]
    pub fn contains(&self, tag: &TypeTag) -> bool {
        match tag {
            TypeTag::Array(item) => {
                self.converters.contains_key("array") && self.contains(item)
            }
            other => self.converters.contains_key(other.base_name()),
        }
    }

    /// Converter for `tag`.
    ///
    /// `[item]` tags resolve the item converter too, so both must be registered.
    pub fn resolve(&self, tag: &TypeTag) -> Result<Arc<dyn TypeConverter>, ConfigError> {
        let base = self.converters.get(tag.base_name()).ok_or_else(|| {
            error!(type_name = %tag, "No converter registered for declared type");
            ConfigError::Unregistered {
                tag: tag.to_string(),
            }
        })?;
        match tag {
            TypeTag::Array(item) if **item != TypeTag::Any => {
                let item_converter = self.resolve(item)?;
                Ok(Arc::new(ArrayConverter::of(item_converter)))
            }
            _ => Ok(Arc::clone(base)),
        }
    }

    /// Parse a type name and resolve it
    pub fn resolve_name(&self, name: &str) -> Result<Arc<dyn TypeConverter>, ConfigError> {
        self.resolve(&name.parse()?)
    }
}

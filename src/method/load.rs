use super::types::MethodDescriptor;
use crate::coercion::CoercionRegistry;
use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct MethodFile {
    #[serde(default)]
    methods: Vec<MethodDescriptor>,
}

/// Load method descriptors from a YAML, TOML or JSON file holding `{ methods: [...] }`.
///
/// The format is picked by extension; anything that is not `.yaml`, `.yml` or `.toml`
/// is read as JSON.
pub fn load_methods(path: impl AsRef<Path>) -> anyhow::Result<Vec<MethodDescriptor>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let file: MethodFile = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        "toml" => toml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };

    info!(
        path = %path.display(),
        method_count = file.methods.len(),
        "Method descriptors loaded"
    );
    Ok(file.methods)
}

/// Setup-time check: unique names and a converter for every declared type
pub fn check_methods(
    methods: &[MethodDescriptor],
    registry: &CoercionRegistry,
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for method in methods {
        if !seen.insert(method.name.as_str()) {
            return Err(ConfigError::DuplicateMethod {
                name: method.name.clone(),
            });
        }
        for tag in method.declared_types() {
            registry.resolve(tag)?;
        }
        debug!(method = %method.name, "Method descriptor checked");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::TypeTag;
    use crate::method::{ArgSource, MethodDescriptor};

    #[test]
    fn test_yaml_descriptor_shape() {
        let yaml = r#"
methods:
  - name: nearby
    accepts:
      - arg: here
        type: geopoint
        required: true
        source: query
      - name: limit
        type: integer
    returns:
      - name: places
        type: "[object]"
"#;
        let file: MethodFile = serde_yaml::from_str(yaml).unwrap();
        let m = &file.methods[0];
        assert_eq!(m.name, "nearby");
        assert_eq!(m.accepts[0].declared_type, TypeTag::GeoPoint);
        assert!(m.accepts[0].required);
        assert_eq!(m.accepts[0].source, ArgSource::Query);
        assert!(!m.accepts[1].required);
        assert_eq!(m.returns[0].declared_type, TypeTag::array_of(TypeTag::Object));
    }

    #[test]
    fn test_duplicate_method_names() {
        let methods = vec![MethodDescriptor::new("a"), MethodDescriptor::new("a")];
        let err = check_methods(&methods, &CoercionRegistry::with_builtin()).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateMethod { name: "a".into() });
    }
}

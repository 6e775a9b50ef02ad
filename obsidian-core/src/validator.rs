//! Schema-driven input validation
//!
//! Schemas are derived from each tool's JSON `inputSchema` on first use and
//! cached by tool name. Deriving is deterministic, so concurrent first calls
//! that race to populate the cache insert equal entries.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::catalog::{builtin_tools, ToolDefinition};
use crate::error::{ToolError, ToolResult};
use crate::params::{ParamBag, ParamValue};

/// Declared primitive type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    /// No usable `type` declared; accepts anything
    Any,
}

impl ParamKind {
    fn from_schema(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("string") => ParamKind::String,
            Some("number") => ParamKind::Number,
            Some("integer") => ParamKind::Integer,
            Some("boolean") => ParamKind::Boolean,
            Some("array") => ParamKind::Array,
            Some("object") => ParamKind::Object,
            _ => ParamKind::Any,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Number => "number",
            ParamKind::Integer => "integer",
            ParamKind::Boolean => "boolean",
            ParamKind::Array => "array",
            ParamKind::Object => "object",
            ParamKind::Any => "any",
        }
    }

    /// Whether a runtime value satisfies this declared kind
    pub fn accepts(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (ParamKind::Any, _) => true,
            (ParamKind::String, ParamValue::Text(_)) => true,
            (ParamKind::Number, ParamValue::Number(_)) => true,
            (ParamKind::Integer, ParamValue::Number(n)) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            (ParamKind::Boolean, ParamValue::Flag(_)) => true,
            (ParamKind::Array, ParamValue::Structured(Value::Array(_))) => true,
            (ParamKind::Object, ParamValue::Structured(Value::Object(_))) => true,
            _ => false,
        }
    }
}

/// Schema of a single property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    pub kind: ParamKind,
    pub allowed: Option<Vec<String>>,
}

/// Validation view of a tool's input schema
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSchema {
    pub required: Vec<String>,
    pub properties: BTreeMap<String, PropertySchema>,
}

impl ToolSchema {
    /// Derive from a JSON Schema object
    pub fn from_input_schema(schema: &Value) -> Self {
        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(name, prop)| {
                        let allowed = prop.get("enum").and_then(Value::as_array).map(|values| {
                            values
                                .iter()
                                .filter_map(Value::as_str)
                                .map(str::to_string)
                                .collect()
                        });
                        let schema = PropertySchema {
                            kind: ParamKind::from_schema(prop.get("type")),
                            allowed,
                        };
                        (name.clone(), schema)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            required,
            properties,
        }
    }
}

/// Catalog of tool definitions with a lazily populated schema cache
pub struct SchemaCatalog {
    /// Definitions by tool name
    definitions: HashMap<String, ToolDefinition>,

    /// Definition order, for listing
    order: Vec<String>,

    /// Derived schemas by tool name
    schemas: RwLock<HashMap<String, Arc<ToolSchema>>>,
}

impl SchemaCatalog {
    /// Create a catalog from definitions
    pub fn new(definitions: Vec<ToolDefinition>) -> Self {
        let order = definitions.iter().map(|d| d.name.clone()).collect();
        let definitions = definitions
            .into_iter()
            .map(|d| (d.name.clone(), d))
            .collect();

        Self {
            definitions,
            order,
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// The shipped Obsidian tool catalog
    pub fn builtin() -> Self {
        Self::new(builtin_tools())
    }

    /// Definitions in catalog order
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.order.iter().filter_map(|name| self.definitions.get(name))
    }

    pub fn contains(&self, tool: &str) -> bool {
        self.definitions.contains_key(tool)
    }

    /// Look up the schema for a tool, deriving and caching it on a miss
    pub fn schema(&self, tool: &str) -> ToolResult<Arc<ToolSchema>> {
        if let Ok(cache) = self.schemas.read() {
            if let Some(schema) = cache.get(tool) {
                return Ok(Arc::clone(schema));
            }
        }

        let definition = self
            .definitions
            .get(tool)
            .ok_or_else(|| ToolError::UnknownTool {
                tool: tool.to_string(),
            })?;
        let schema = Arc::new(ToolSchema::from_input_schema(&definition.input_schema));

        // A poisoned cache only costs a re-derive on the next call
        if let Ok(mut cache) = self.schemas.write() {
            cache.insert(tool.to_string(), Arc::clone(&schema));
        }

        Ok(schema)
    }

    /// Number of schemas currently cached
    pub fn cached_count(&self) -> usize {
        self.schemas.read().map(|c| c.len()).unwrap_or(0)
    }

    /// Validate a parameter bag against a tool's schema.
    ///
    /// Checks run in a fixed order and stop at the first failure: tool
    /// lookup, then required fields, then per-field type and enum checks.
    /// Keys not declared in the schema are ignored.
    pub fn validate(&self, tool: &str, params: &ParamBag) -> ToolResult<()> {
        let schema = self.schema(tool)?;

        for name in &schema.required {
            match params.get(name) {
                None | Some(ParamValue::Absent) => {
                    return Err(ToolError::MissingRequired {
                        tool: tool.to_string(),
                        param: name.clone(),
                    });
                }
                Some(ParamValue::Text(s)) if s.trim().is_empty() => {
                    return Err(ToolError::EmptyRequired {
                        tool: tool.to_string(),
                        param: name.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        for (name, value) in params.iter() {
            let Some(prop) = schema.properties.get(name) else {
                continue;
            };
            if value.is_absent() {
                continue;
            }

            if !prop.kind.accepts(value) {
                return Err(ToolError::TypeMismatch {
                    param: name.to_string(),
                    expected: prop.kind.as_str().to_string(),
                    actual: value.type_name().to_string(),
                });
            }

            if let (Some(allowed), ParamValue::Text(s)) = (&prop.allowed, value) {
                if !allowed.iter().any(|a| a == s) {
                    return Err(ToolError::InvalidEnum {
                        param: name.to_string(),
                        allowed: allowed.clone(),
                        value: s.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::builtin()
    }

    #[test]
    fn test_unknown_tool() {
        let err = catalog().validate("launch_rocket", &ParamBag::new()).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool { ref tool } if tool == "launch_rocket"));
    }

    #[test]
    fn test_missing_required() {
        let err = catalog().validate("create_note", &ParamBag::new()).unwrap_err();
        assert!(matches!(err, ToolError::MissingRequired { ref param, .. } if param == "name"));
    }

    #[test]
    fn test_null_required_counts_as_missing() {
        let bag = ParamBag::from_json(&json!({ "name": null }));
        let err = catalog().validate("create_note", &bag).unwrap_err();
        assert!(matches!(err, ToolError::MissingRequired { .. }));
    }

    #[test]
    fn test_blank_required() {
        let bag = ParamBag::new().with("name", "   ");
        let err = catalog().validate("create_note", &bag).unwrap_err();
        assert!(matches!(err, ToolError::EmptyRequired { ref param, .. } if param == "name"));
    }

    #[test]
    fn test_required_checked_before_types() {
        // `overwrite` has the wrong type and `name` is missing: missing wins
        let bag = ParamBag::new().with("overwrite", "yes");
        let err = catalog().validate("create_note", &bag).unwrap_err();
        assert!(matches!(err, ToolError::MissingRequired { .. }));
    }

    #[test]
    fn test_type_mismatch() {
        let bag = ParamBag::new().with("name", "Note").with("overwrite", "yes");
        let err = catalog().validate("create_note", &bag).unwrap_err();
        match err {
            ToolError::TypeMismatch {
                param,
                expected,
                actual,
            } => {
                assert_eq!(param, "overwrite");
                assert_eq!(expected, "boolean");
                assert_eq!(actual, "string");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let ok = ParamBag::from_json(&json!({ "query": "x", "limit": 5 }));
        assert!(catalog().validate("search_vault", &ok).is_ok());

        let bad = ParamBag::from_json(&json!({ "query": "x", "limit": 2.5 }));
        let err = catalog().validate("search_vault", &bad).unwrap_err();
        assert!(matches!(err, ToolError::TypeMismatch { .. }));
    }

    #[test]
    fn test_invalid_enum_for_property_type() {
        let bag = ParamBag::new()
            .with("name", "priority")
            .with("value", "5")
            .with("type", "integer");
        let err = catalog().validate("set_property", &bag).unwrap_err();
        match err {
            ToolError::InvalidEnum {
                param,
                allowed,
                value,
            } => {
                assert_eq!(param, "type");
                assert_eq!(value, "integer");
                assert_eq!(
                    allowed,
                    vec!["text", "list", "number", "checkbox", "date", "datetime"]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extra_keys_pass_through() {
        let bag = ParamBag::new()
            .with("query", "TODO")
            .with("verbose", true)
            .with("anything", ParamValue::Structured(json!([1, 2])));
        assert!(catalog().validate("search_vault", &bag).is_ok());
    }

    #[test]
    fn test_absent_optional_is_not_type_checked() {
        let bag = ParamBag::from_json(&json!({ "name": "Note", "overwrite": null }));
        assert!(catalog().validate("create_note", &bag).is_ok());
    }

    #[test]
    fn test_schema_cache_is_lossless() {
        let catalog = catalog();
        assert_eq!(catalog.cached_count(), 0);

        let first = catalog.schema("set_property").unwrap();
        assert_eq!(catalog.cached_count(), 1);
        let second = catalog.schema("set_property").unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let definition = catalog
            .definitions()
            .find(|d| d.name == "set_property")
            .unwrap();
        let rederived = ToolSchema::from_input_schema(&definition.input_schema);
        assert_eq!(*first, rederived);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_use_populates_one_entry() {
        let catalog = Arc::new(catalog());
        let bag = Arc::new(ParamBag::new().with("name", "Race"));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                let bag = Arc::clone(&bag);
                tokio::spawn(async move { catalog.validate("create_note", &bag) })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert_eq!(catalog.cached_count(), 1);
        let cached = catalog.schema("create_note").unwrap();
        let definition = catalog
            .definitions()
            .find(|d| d.name == "create_note")
            .unwrap();
        assert_eq!(*cached, ToolSchema::from_input_schema(&definition.input_schema));
    }

    #[test]
    fn test_untyped_property_accepts_anything() {
        let catalog = SchemaCatalog::new(vec![ToolDefinition {
            name: "loose".to_string(),
            description: String::new(),
            input_schema: json!({ "properties": { "x": {} } }),
        }]);
        let bag = ParamBag::from_json(&json!({ "x": { "nested": true } }));
        assert!(catalog.validate("loose", &bag).is_ok());
    }
}

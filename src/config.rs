//! Schema documents: class hierarchies declared in JSON.
//!
//! ```json
//! {
//!   "classes": [
//!     { "name": "Coordinates", "bases": ["Datum"], "fields": [{ "name": "x", "type": "int" }, { "name": "y", "type": "int", "default": 23 }] },
//!     { "name": "Coordinates3", "bases": ["Coordinates"], "fields": [{ "name": "z", "type": "int" }], "generators": ["as_dict"] }
//!   ],
//!   "instances": [
//!     { "class": "Coordinates3", "args": [1, 2, 3] }
//!   ]
//! }
//! ```
//!
//! ## Notes
//! - Bases name classes declared earlier in the document, or the capability classes `Init`,
//!   `Repr`, `Iter`, `Equals` and `Datum`.
//! - A JSON object with a `"$class"` key inside instance arguments builds a nested instance from
//!   its own `"args"` / `"kwargs"`.
//! - A field `"default"` of `null` is the same as no default.

use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use crate::errors::{DefineError, Error};
use crate::generators::{Generator, as_dict, capabilities};
use crate::runtime::instance::Instance;
use crate::runtime::method::Args;
use crate::runtime::value::Value;
use crate::schema::class::{Class, ClassRef};

const NESTED_CLASS_KEY: &str = "$class";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read schema `{}`", .path.display())]
    #[diagnostic(code(cluegen::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema document: {0}")]
    #[diagnostic(code(cluegen::config::parse))]
    Parse(#[from] serde_json::Error),

    #[error("class `{0}` is declared more than once")]
    #[diagnostic(code(cluegen::config::duplicate_class))]
    DuplicateClass(String),

    #[error("class `{class}` names unknown base `{base}`")]
    #[diagnostic(
        code(cluegen::config::unknown_base),
        help("declare bases before the classes that use them, or use one of Init, Repr, Iter, Equals, Datum")
    )]
    UnknownBase { class: String, base: String },

    #[error("class `{class}` requests unknown generator `{name}`")]
    #[diagnostic(code(cluegen::config::unknown_generator), help("available generators: as_dict"))]
    UnknownGenerator { class: String, name: String },

    #[error("unknown class `{0}`")]
    #[diagnostic(code(cluegen::config::unknown_class))]
    UnknownClass(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Define(#[from] DefineError),

    #[error("failed to construct `{class}`")]
    #[diagnostic(code(cluegen::config::construct))]
    Construct {
        class: String,
        #[source]
        #[diagnostic_source]
        source: Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    #[serde(default)]
    pub classes: Vec<ClassSpec>,
    #[serde(default)]
    pub instances: Vec<InstanceSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassSpec {
    pub name: String,
    #[serde(default)]
    pub bases: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub constants: serde_json::Map<String, serde_json::Value>,
    /// Extra generators to bind, by name.
    #[serde(default)]
    pub generators: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type", default = "any_type")]
    pub ty: String,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

fn any_type() -> String {
    "any".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceSpec {
    pub class: String,
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
    #[serde(default)]
    pub kwargs: serde_json::Map<String, serde_json::Value>,
}

/// An argument object carrying `"$class"`, built as an instance of that class.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NestedInstance {
    #[serde(rename = "$class")]
    class: String,
    #[serde(default)]
    args: Vec<serde_json::Value>,
    #[serde(default)]
    kwargs: serde_json::Map<String, serde_json::Value>,
}

impl SchemaDocument {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Define every class, then construct every sample instance.
    #[tracing::instrument(skip_all, fields(classes = self.classes.len(), instances = self.instances.len()))]
    pub fn define(&self) -> Result<Schema, ConfigError> {
        let mut schema = Schema::default();
        for spec in &self.classes {
            if schema.class(&spec.name).is_some() {
                return Err(ConfigError::DuplicateClass(spec.name.clone()));
            }
            let class = define_class(&schema, spec)?;
            schema.classes.push(class);
        }

        for spec in &self.instances {
            let class = schema.resolve(&spec.class).ok_or_else(|| ConfigError::UnknownClass(spec.class.clone()))?;
            let instance = construct(&schema, &class, &spec.args, &spec.kwargs)?;
            schema.samples.push(instance);
        }
        Ok(schema)
    }
}

fn define_class(schema: &Schema, spec: &ClassSpec) -> Result<ClassRef, ConfigError> {
    let mut builder = Class::builder(spec.name.clone());
    for base in &spec.bases {
        let base_class = schema.resolve(base).ok_or_else(|| ConfigError::UnknownBase {
            class: spec.name.clone(),
            base: base.clone(),
        })?;
        builder = builder.base(base_class);
    }
    for field in &spec.fields {
        builder = match &field.default {
            Some(default) => builder.field_with_default(field.name.clone(), field.ty.as_str(), Value::from(default.clone())),
            None => builder.field(field.name.clone(), field.ty.as_str()),
        };
    }
    for (name, value) in &spec.constants {
        builder = builder.constant(name.clone(), Value::from(value.clone()));
    }
    for name in &spec.generators {
        builder = builder.generator(named_generator(name).ok_or_else(|| ConfigError::UnknownGenerator {
            class: spec.name.clone(),
            name: name.clone(),
        })?);
    }
    Ok(builder.build()?)
}

fn named_generator(name: &str) -> Option<Generator> {
    match name {
        as_dict::SLOT => Some(as_dict::generator()),
        _ => None,
    }
}

fn construct(
    schema: &Schema,
    class: &ClassRef,
    args: &[serde_json::Value],
    kwargs: &serde_json::Map<String, serde_json::Value>,
) -> Result<Instance, ConfigError> {
    let mut call = Args::new();
    for arg in args {
        call = call.arg(to_value(schema, arg)?);
    }
    for (name, arg) in kwargs {
        call = call.kwarg(name.clone(), to_value(schema, arg)?);
    }
    class.instantiate(call).map_err(|source| ConfigError::Construct {
        class: class.name().to_string(),
        source,
    })
}

fn to_value(schema: &Schema, json: &serde_json::Value) -> Result<Value, ConfigError> {
    match json {
        serde_json::Value::Object(map) => {
            if map.contains_key(NESTED_CLASS_KEY) {
                let nested = NestedInstance::deserialize(json)?;
                let class = schema
                    .resolve(&nested.class)
                    .ok_or_else(|| ConfigError::UnknownClass(nested.class.clone()))?;
                return Ok(Value::from(construct(schema, &class, &nested.args, &nested.kwargs)?));
            }
            let entries = map
                .iter()
                .map(|(k, v)| Ok((k.clone(), to_value(schema, v)?)))
                .collect::<Result<Vec<_>, ConfigError>>()?;
            Ok(Value::Dict(entries))
        }
        serde_json::Value::Array(items) => Ok(Value::List(
            items
                .iter()
                .map(|item| to_value(schema, item))
                .collect::<Result<Vec<_>, ConfigError>>()?,
        )),
        other => Ok(Value::from(other.clone())),
    }
}

/// JSON scalars map to the matching value; integral numbers stay integers.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Dict(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
        }
    }
}

/// The classes and sample instances a document defines.
#[derive(Debug, Default)]
pub struct Schema {
    classes: Vec<ClassRef>,
    samples: Vec<Instance>,
}

impl Schema {
    /// Classes in declaration order.
    pub fn classes(&self) -> &[ClassRef] {
        &self.classes
    }

    pub fn samples(&self) -> &[Instance] {
        &self.samples
    }

    /// A class declared by the document.
    pub fn class(&self, name: &str) -> Option<&ClassRef> {
        self.classes.iter().find(|c| c.name() == name)
    }

    /// A declared class, or else a capability class.
    pub fn resolve(&self, name: &str) -> Option<ClassRef> {
        self.class(name).cloned().or_else(|| capabilities::by_name(name))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const COORDINATES: &str = r#"{
        "classes": [
            { "name": "Coordinates", "bases": ["Datum"], "fields": [{ "name": "x", "type": "int" }, { "name": "y", "type": "int" }] },
            { "name": "Coordinates3", "bases": ["Coordinates"], "fields": [{ "name": "z", "type": "int" }] }
        ],
        "instances": [
            { "class": "Coordinates", "args": [2, 3] },
            { "class": "Coordinates3", "args": [1], "kwargs": { "y": 2, "z": 3 } }
        ]
    }"#;

    #[test]
    fn defines_classes_and_samples() {
        let schema = SchemaDocument::from_json(COORDINATES).unwrap().define().unwrap();
        assert_eq!(schema.classes().len(), 2);
        assert_eq!(schema.class("Coordinates3").unwrap().clues().to_string(), "x: int, y: int, z: int");
        let reprs: Vec<String> = schema.samples().iter().map(|s| s.repr().unwrap()).collect();
        assert_eq!(reprs, ["Coordinates(x=2, y=3)", "Coordinates3(x=1, y=2, z=3)"]);
    }

    #[test]
    fn unknown_base_is_reported() {
        let doc = SchemaDocument::from_json(r#"{ "classes": [{ "name": "A", "bases": ["Nope"] }] }"#).unwrap();
        let err = doc.define().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBase { ref base, .. } if base == "Nope"));
    }

    #[test]
    fn duplicate_class_is_reported() {
        let doc = SchemaDocument::from_json(r#"{ "classes": [{ "name": "A" }, { "name": "A" }] }"#).unwrap();
        assert!(matches!(doc.define().unwrap_err(), ConfigError::DuplicateClass(ref n) if n == "A"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = SchemaDocument::from_json(r#"{ "classes": [{ "name": "A", "feilds": [] }] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn nested_instances_are_built() {
        let doc = SchemaDocument::from_json(
            r#"{
                "classes": [
                    { "name": "Integer", "bases": ["Datum"], "fields": [{ "name": "value", "type": "int" }] },
                    { "name": "BinOp", "bases": ["Datum"], "fields": [
                        { "name": "op", "type": "str" }, { "name": "left" }, { "name": "right" }
                    ] }
                ],
                "instances": [
                    { "class": "BinOp", "args": ["+", { "$class": "Integer", "args": [3] }, { "$class": "Integer", "args": [4] }] }
                ]
            }"#,
        )
        .unwrap();
        let schema = doc.define().unwrap();
        assert_eq!(
            schema.samples()[0].repr().unwrap(),
            "BinOp(op='+', left=Integer(value=3), right=Integer(value=4))"
        );
        assert_eq!(schema.class("BinOp").unwrap().clues().get("left").unwrap().as_str(), "any");
    }

    #[test]
    fn malformed_nested_instances_are_rejected() {
        let with_arg = |arg: &str| {
            let text = format!(
                r#"{{ "classes": [{{ "name": "Integer", "bases": ["Datum"], "fields": [{{ "name": "value" }}] }}],
                     "instances": [{{ "class": "Integer", "args": [{arg}] }}] }}"#
            );
            SchemaDocument::from_json(&text).unwrap().define()
        };

        for arg in [
            r#"{ "$class": 5, "args": [1] }"#,
            r#"{ "$class": "Integer", "args": 1 }"#,
            r#"{ "$class": "Integer", "kwargs": [] }"#,
            r#"{ "$class": "Integer", "arg": [1] }"#,
        ] {
            assert!(matches!(with_arg(arg).unwrap_err(), ConfigError::Parse(_)), "{arg}");
        }
        assert!(matches!(
            with_arg(r#"{ "$class": "Missing" }"#).unwrap_err(),
            ConfigError::UnknownClass(ref name) if name == "Missing"
        ));
        let schema = with_arg(r#"{ "$class": "Integer", "kwargs": { "value": 1 } }"#).unwrap();
        assert_eq!(schema.samples()[0].repr().unwrap(), "Integer(value=Integer(value=1))");
    }

    #[test]
    fn construction_errors_name_the_class() {
        let doc = SchemaDocument::from_json(
            r#"{ "classes": [{ "name": "P", "bases": ["Init"], "fields": [{ "name": "x" }] }],
                 "instances": [{ "class": "P", "args": [] }] }"#,
        )
        .unwrap();
        assert!(matches!(doc.define().unwrap_err(), ConfigError::Construct { ref class, .. } if class == "P"));
    }

    #[test]
    fn json_numbers_prefer_integers() {
        assert!(matches!(Value::from(serde_json::json!(3)), Value::Int(3)));
        assert!(matches!(Value::from(serde_json::json!(3.5)), Value::Float(x) if x == 3.5));
    }
}

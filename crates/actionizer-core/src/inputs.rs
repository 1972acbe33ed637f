//! Input declarations and validation.
//!
//! Each entry point of an action may declare a flat list of parameters in an
//! `inputs_for` block. Entry points that never declared anything accept any
//! arguments.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{CheckOrder, ValidationConfig};
use crate::error::{ConfigurationError, Result, ValidationError};
use crate::types::{normalize_fields, normalize_key, Args, TypeTag};

/// Options accepted by `optional`/`required`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParamOptions {
    /// `Some(false)` rejects explicit nulls. Absent means nullable.
    pub nullable: Option<bool>,

    /// Type the value must descend from.
    pub expected_type: Option<TypeTag>,
}

impl ParamOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject explicit nulls.
    pub fn not_null(mut self) -> Self {
        self.nullable = Some(false);
        self
    }

    /// Require values to descend from `tag`.
    pub fn of_type(mut self, tag: TypeTag) -> Self {
        self.expected_type = Some(tag);
        self
    }

    /// Parse loosely-typed options such as `{"nullable": false, "type": "Numeric"}`.
    pub fn from_json(param: &str, opts: &Value) -> Result<Self> {
        let mut parsed = Self::default();
        let Some(map) = opts.as_object() else {
            return Ok(parsed);
        };

        match map.get("nullable").or_else(|| map.get("null")) {
            None | Some(Value::Null) => {}
            Some(Value::Bool(flag)) => parsed.nullable = Some(*flag),
            Some(other) => {
                return Err(ConfigurationError::InvalidNullable {
                    param: param.to_string(),
                    got: other.to_string(),
                })
            }
        }

        match map.get("type") {
            None | Some(Value::Null) => {}
            Some(Value::String(name)) => {
                let tag = name
                    .parse::<TypeTag>()
                    .map_err(|_| ConfigurationError::InvalidType {
                        param: param.to_string(),
                        got: name.clone(),
                    })?;
                parsed.expected_type = Some(tag);
            }
            Some(other) => {
                return Err(ConfigurationError::InvalidType {
                    param: param.to_string(),
                    got: other.to_string(),
                })
            }
        }

        Ok(parsed)
    }
}

/// A single declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    pub required: bool,
    pub nullable: bool,
    pub expected_type: Option<TypeTag>,
}

impl ParamDecl {
    fn new(name: String, required: bool, opts: ParamOptions) -> Self {
        Self {
            name,
            required,
            nullable: opts.nullable != Some(false),
            expected_type: opts.expected_type,
        }
    }

    fn check(&self, entry_point: &str, supplied: Option<&Value>, order: CheckOrder) -> Option<ValidationError> {
        match supplied {
            Some(Value::Null) if !self.nullable => match (self.expected_type, order) {
                (Some(tag), CheckOrder::TypeFirst) if !tag.admits(&Value::Null) => {
                    Some(ValidationError::wrong_type(&self.name, tag))
                }
                _ => Some(ValidationError::not_null(&self.name)),
            },
            Some(value) => self
                .expected_type
                .filter(|tag| !tag.admits(value))
                .map(|tag| ValidationError::wrong_type(&self.name, tag)),
            None if self.required => Some(ValidationError::required(&self.name, entry_point)),
            None => None,
        }
    }
}

/// Declared parameters for every entry point of one action type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSchema {
    params_by_entry_point: HashMap<String, Vec<ParamDecl>>,
    #[serde(default)]
    config: ValidationConfig,
}

impl InputSchema {
    /// An empty schema: every entry point accepts any arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters declared for `entry_point`, in declaration order.
    pub fn params_for(&self, entry_point: &str) -> Option<&[ParamDecl]> {
        self.params_by_entry_point
            .get(entry_point)
            .map(Vec::as_slice)
    }

    pub fn is_declared(&self, entry_point: &str) -> bool {
        self.params_by_entry_point.contains_key(entry_point)
    }

    pub fn entry_points(&self) -> impl Iterator<Item = &str> {
        self.params_by_entry_point.keys().map(String::as_str)
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ValidationConfig) {
        self.config = config;
    }

    /// Check `args` against the parameters declared for `entry_point`.
    ///
    /// Undeclared keys are reported first, then each parameter is checked in
    /// declaration order. Only the first problem is returned.
    pub fn validate(&self, entry_point: &str, args: &Args) -> std::result::Result<(), ValidationError> {
        let Some(params) = self.params_for(entry_point) else {
            return Ok(());
        };

        for key in args.keys() {
            let key = normalize_key(key);
            if !params.iter().any(|p| p.name == key) {
                return Err(ValidationError::not_declared(&key));
            }
        }

        let args = normalize_fields(args.clone());
        for param in params {
            if let Some(err) = param.check(entry_point, args.get(&param.name), self.config.check_order) {
                return Err(err);
            }
        }

        Ok(())
    }
}

/// Stateful declaration surface used while defining an action type.
///
/// Only one `inputs_for` block may be open at a time.
#[derive(Debug, Default)]
pub struct InputsBuilder {
    schema: InputSchema,
    open: Option<(String, Vec<ParamDecl>)>,
}

impl InputsBuilder {
    /// A builder whose schema starts from [`ValidationConfig::from_env`].
    pub fn new() -> Self {
        let mut builder = Self::default();
        builder.schema.set_config(ValidationConfig::from_env());
        builder
    }

    /// Open a declaration block for `entry_point`.
    pub fn start(&mut self, entry_point: &str) -> Result<()> {
        if let Some((open, _)) = &self.open {
            return Err(ConfigurationError::NestedDeclaration {
                open: open.clone(),
                requested: entry_point.to_string(),
            });
        }
        if self.schema.is_declared(entry_point) {
            return Err(ConfigurationError::DuplicateEntryPoint {
                entry_point: entry_point.to_string(),
            });
        }
        self.open = Some((entry_point.to_string(), Vec::new()));
        Ok(())
    }

    /// Close the open declaration block.
    pub fn end(&mut self) -> Result<()> {
        let (entry_point, params) = self
            .open
            .take()
            .ok_or(ConfigurationError::NoOpenDeclaration)?;
        if params.is_empty() {
            return Err(ConfigurationError::EmptyDeclaration { entry_point });
        }
        tracing::trace!(%entry_point, count = params.len(), "declared inputs");
        self.schema.params_by_entry_point.insert(entry_point, params);
        Ok(())
    }

    pub fn optional(&mut self, name: &str, opts: ParamOptions) -> Result<&mut Self> {
        self.add(name, false, opts)
    }

    pub fn required(&mut self, name: &str, opts: ParamOptions) -> Result<&mut Self> {
        self.add(name, true, opts)
    }

    fn add(&mut self, name: &str, required: bool, opts: ParamOptions) -> Result<&mut Self> {
        let name = normalize_key(name).into_owned();
        let Some((entry_point, params)) = self.open.as_mut() else {
            return Err(ConfigurationError::OutsideDeclaration { param: name });
        };
        if params.iter().any(|p| p.name == name) {
            return Err(ConfigurationError::DuplicateParam {
                entry_point: entry_point.clone(),
                param: name,
            });
        }
        params.push(ParamDecl::new(name, required, opts));
        Ok(self)
    }

    /// Declare inputs for `entry_point` inside `block`.
    pub fn inputs_for<F>(&mut self, entry_point: &str, block: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.start(entry_point)?;
        if let Err(err) = block(self) {
            self.open = None;
            return Err(err);
        }
        self.end()
    }

    /// Replace the validation configuration.
    pub fn configure(&mut self, config: ValidationConfig) -> &mut Self {
        self.schema.set_config(config);
        self
    }

    /// Finish declaring and hand back the schema.
    pub fn finish(self) -> Result<InputSchema> {
        if let Some((entry_point, _)) = self.open {
            return Err(ConfigurationError::UnclosedDeclaration { entry_point });
        }
        Ok(self.schema)
    }
}

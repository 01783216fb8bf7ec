use crate::coercion::TypeTag;
use serde::{Deserialize, Serialize};

/// Where the REST adapter looks for an argument's raw value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgSource {
    /// Path parameter, then query string, then a field of the JSON body
    #[default]
    Auto,
    Path,
    Query,
    /// The whole request body is the argument
    Body,
    /// A field of the request body only
    Form,
}

impl std::fmt::Display for ArgSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ArgSource::Auto => "auto",
            ArgSource::Path => "path",
            ArgSource::Query => "query",
            ArgSource::Body => "body",
            ArgSource::Form => "form",
        };
        write!(f, "{}", s)
    }
}

fn any_type() -> TypeTag {
    TypeTag::Any
}

/// One declared method argument. Immutable once the method is registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDescriptor {
    #[serde(alias = "arg")]
    pub name: String,
    #[serde(rename = "type", default = "any_type")]
    pub declared_type: TypeTag,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub source: ArgSource,
    /// Let an `object` argument accept arrays too
    #[serde(default)]
    pub allow_array: bool,
}

impl ArgumentDescriptor {
    /// Optional argument read from any source
    pub fn new(name: impl Into<String>, declared_type: TypeTag) -> Self {
        ArgumentDescriptor {
            name: name.into(),
            declared_type,
            required: false,
            source: ArgSource::Auto,
            allow_array: false,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn from_source(mut self, source: ArgSource) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn allow_array(mut self) -> Self {
        self.allow_array = true;
        self
    }
}

/// One declared return value; order maps to the positional results of the completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arg: Option<String>,
    #[serde(rename = "type", default = "any_type")]
    pub declared_type: TypeTag,
    /// The value is the whole response rather than a named field
    #[serde(default)]
    pub root: bool,
}

impl ReturnDescriptor {
    pub fn named(name: impl Into<String>, declared_type: TypeTag) -> Self {
        ReturnDescriptor {
            name: Some(name.into()),
            arg: None,
            declared_type,
            root: false,
        }
    }

    /// Unnamed return; keyed by its positional tag when several are declared
    pub fn positional(arg: impl Into<String>, declared_type: TypeTag) -> Self {
        ReturnDescriptor {
            name: None,
            arg: Some(arg.into()),
            declared_type,
            root: false,
        }
    }

    /// Key of this value in a multi-value result: `name`, else `arg`, else the position
    #[must_use]
    pub fn key(&self, position: usize) -> String {
        self.name
            .as_deref()
            .or(self.arg.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| position.to_string())
    }
}

/// Description of a remotely callable method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub accepts: Vec<ArgumentDescriptor>,
    #[serde(default)]
    pub returns: Vec<ReturnDescriptor>,
    /// Invoked with the constructor arguments instead of its own
    #[serde(default, rename = "sharedCtor", alias = "shared_ctor")]
    pub is_shared_ctor: bool,
    /// Arguments used to build the stateful instance the method runs on
    #[serde(default, rename = "ctorAccepts", alias = "ctor_accepts")]
    pub ctor_accepts: Vec<ArgumentDescriptor>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        MethodDescriptor {
            name: name.into(),
            accepts: Vec::new(),
            returns: Vec::new(),
            is_shared_ctor: false,
            ctor_accepts: Vec::new(),
        }
    }

    #[must_use]
    pub fn accepts(mut self, arg: ArgumentDescriptor) -> Self {
        self.accepts.push(arg);
        self
    }

    #[must_use]
    pub fn returns(mut self, ret: ReturnDescriptor) -> Self {
        self.returns.push(ret);
        self
    }

    #[must_use]
    pub fn ctor_accepts(mut self, arg: ArgumentDescriptor) -> Self {
        self.ctor_accepts.push(arg);
        self
    }

    #[must_use]
    pub fn shared_ctor(mut self) -> Self {
        self.is_shared_ctor = true;
        self
    }

    /// Every declared type, arguments first, for setup-time checks
    pub fn declared_types(&self) -> impl Iterator<Item = &TypeTag> {
        self.ctor_accepts
            .iter()
            .chain(self.accepts.iter())
            .map(|a| &a.declared_type)
            .chain(self.returns.iter().map(|r| &r.declared_type))
    }
}

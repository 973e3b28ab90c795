//! Schema types and builders for tfplug
//!
//! This module provides the schema system for defining provider, resource and
//! data source schemas, including attribute types and value type checking.

use crate::plan_modifier::{PlanModifier, RequiresReplace, UseStateForUnknown};
use crate::types::Dynamic;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// AttributeType defines the type system for Terraform attributes
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    String,
    Number, // Always f64
    Bool,
    List(Box<AttributeType>),               // Ordered, allows duplicates
    Set(Box<AttributeType>),                // Unordered, no duplicates
    Map(Box<AttributeType>),                // String keys only
    Object(HashMap<String, AttributeType>), // Fixed structure
}

impl AttributeType {
    /// Whether a value conforms to this type. Null and unknown conform to every type.
    pub fn accepts(&self, value: &Dynamic) -> bool {
        match (value, self) {
            (Dynamic::Null | Dynamic::Unknown, _) => true,
            (Dynamic::String(_), AttributeType::String) => true,
            (Dynamic::Number(_), AttributeType::Number) => true,
            (Dynamic::Bool(_), AttributeType::Bool) => true,
            (Dynamic::List(list), AttributeType::List(elem) | AttributeType::Set(elem)) => {
                list.iter().all(|item| elem.accepts(item))
            }
            (Dynamic::Map(map), AttributeType::Map(elem)) => {
                map.values().all(|item| elem.accepts(item))
            }
            (Dynamic::Map(map), AttributeType::Object(fields)) => {
                map.keys().all(|k| fields.contains_key(k))
                    && fields
                        .iter()
                        .all(|(name, ty)| map.get(name).map_or(true, |v| ty.accepts(v)))
            }
            _ => false,
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeType::String => write!(f, "string"),
            AttributeType::Number => write!(f, "number"),
            AttributeType::Bool => write!(f, "bool"),
            AttributeType::List(elem) => write!(f, "list({})", elem),
            AttributeType::Set(elem) => write!(f, "set({})", elem),
            AttributeType::Map(elem) => write!(f, "map({})", elem),
            AttributeType::Object(_) => write!(f, "object"),
        }
    }
}

/// Schema is returned by providers/resources/data sources
/// Version is used for state migration
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub version: i64,
    pub block: Block,
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.block.attributes.iter().find(|a| a.name == name)
    }
}

/// Root block containing all attributes
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub attributes: Vec<Attribute>,
    pub description: String,
}

/// Attribute represents a single configuration attribute
#[derive(Clone)]
pub struct Attribute {
    pub name: String,
    pub r#type: AttributeType,
    pub description: String,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub plan_modifiers: Vec<Arc<dyn PlanModifier>>,
}

impl Attribute {
    /// Computed and not settable from configuration
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }
}

// Manual Debug implementation since plan modifiers don't implement Debug
impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("type", &self.r#type)
            .field("description", &self.description)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("computed", &self.computed)
            .field("sensitive", &self.sensitive)
            .field(
                "plan_modifiers",
                &self
                    .plan_modifiers
                    .iter()
                    .map(|m| m.description())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// AttributeBuilder provides fluent API for building attributes
/// ALWAYS use this instead of constructing Attribute directly
pub struct AttributeBuilder {
    attribute: Attribute,
}

impl AttributeBuilder {
    pub fn new(name: &str, type_: AttributeType) -> Self {
        Self {
            attribute: Attribute {
                name: name.to_string(),
                r#type: type_,
                description: String::new(),
                required: false,
                optional: false,
                computed: false,
                sensitive: false,
                plan_modifiers: Vec::new(),
            },
        }
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.attribute.description = desc.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.attribute.required = true;
        self.attribute.optional = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.attribute.optional = true;
        self.attribute.required = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.attribute.computed = true;
        self
    }

    /// Mark as sensitive (hidden in plan output)
    pub fn sensitive(mut self) -> Self {
        self.attribute.sensitive = true;
        self
    }

    pub fn plan_modifier<M: PlanModifier + 'static>(mut self, modifier: M) -> Self {
        self.attribute.plan_modifiers.push(Arc::new(modifier));
        self
    }

    /// Shorthand for the RequiresReplace plan modifier
    pub fn requires_replace(self) -> Self {
        self.plan_modifier(RequiresReplace)
    }

    /// Shorthand for the UseStateForUnknown plan modifier
    pub fn use_state_for_unknown(self) -> Self {
        self.plan_modifier(UseStateForUnknown)
    }

    pub fn build(self) -> Attribute {
        self.attribute
    }
}

/// SchemaBuilder provides fluent API for building schemas
/// ALWAYS use this for consistency
#[derive(Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: i64) -> Self {
        self.schema.version = version;
        self
    }

    pub fn attribute(mut self, attr: Attribute) -> Self {
        self.schema.block.attributes.push(attr);
        self
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.schema.block.description = desc.to_string();
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

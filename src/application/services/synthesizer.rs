//! Type-directed value synthesis
//!
//! Produces a plausible, type-correct value for a declared parameter type.
//! Rules are tried in a fixed order and the first match wins; the result
//! depends only on the descriptor, the catalog and the settings.

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::SynthesisConfig;
use crate::domain::kinds::{self, CLASS, CODE_SNIPPET_EXPRESSION};
use crate::domain::{
    Category, ClassBound, ClassObject, KindId, Model, NodeType, OpaqueHandle, Role,
    TypeDescriptor, Value, PLATFORM_PACKAGES,
};

pub struct Synthesizer {
    settings: SynthesisConfig,
    /// Kind whose class object stands in for any node-bounded class parameter
    snippet_kind: KindId,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(SynthesisConfig::default())
    }
}

impl Synthesizer {
    pub fn new(settings: SynthesisConfig) -> Self {
        Self {
            settings,
            snippet_kind: CODE_SNIPPET_EXPRESSION,
        }
    }

    pub fn with_snippet_kind(mut self, kind: KindId) -> Self {
        self.snippet_kind = kind;
        self
    }

    pub fn settings(&self) -> &SynthesisConfig {
        &self.settings
    }

    /// Synthesizes a value for `descriptor`, creating nodes in `model` as needed.
    #[instrument(level = "trace", skip(self, model), fields(descriptor = %descriptor))]
    pub fn synthesize(&self, model: &mut Model, descriptor: &TypeDescriptor) -> ApplicationResult<Value> {
        let value = match descriptor {
            TypeDescriptor::ClassObject(None)
            | TypeDescriptor::ClassObject(Some(ClassBound::Wildcard)) => {
                Value::ClassObject(ClassObject::Object)
            }
            TypeDescriptor::ClassObject(Some(ClassBound::Throwable)) => {
                Value::ClassObject(ClassObject::Exception)
            }
            TypeDescriptor::ClassObject(Some(ClassBound::Node(bound))) => {
                self.snippet_class(model, bound, descriptor)?
            }
            TypeDescriptor::Node(NodeType::Category(Category::Type))
                if model.catalog().kind(CLASS).is_some() =>
            {
                self.detached_class(model)?
            }
            TypeDescriptor::Node(node_type) => self.instance(model, node_type, descriptor)?,
            TypeDescriptor::Enum(e) if model.catalog().has_enum(*e) => Value::Enum(e.canonical()),
            TypeDescriptor::Array(element) => self.array(model, element)?,
            TypeDescriptor::Set(element) => Value::set_of([self.synthesize(model, element)?]),
            TypeDescriptor::List(element) => Value::list_of([self.synthesize(model, element)?]),
            TypeDescriptor::Text => Value::text(self.settings.text.clone()),
            TypeDescriptor::Integer => Value::Integer(self.settings.integer),
            TypeDescriptor::Boolean => Value::Boolean(self.settings.boolean),
            TypeDescriptor::CompilationUnit => Value::Opaque(model.create_compilation_unit()),
            TypeDescriptor::PlatformPackage => match PLATFORM_PACKAGES.first() {
                Some(name) => Value::Opaque(OpaqueHandle::PlatformPackage(*name)),
                None => return Err(ApplicationError::SynthesisFailure(descriptor.clone())),
            },
            TypeDescriptor::Enum(_) | TypeDescriptor::Any => {
                return Err(ApplicationError::SynthesisFailure(descriptor.clone()))
            }
        };
        debug!(%descriptor, %value, "synthesized");
        Ok(value)
    }

    fn snippet_class(
        &self,
        model: &Model,
        bound: &NodeType,
        descriptor: &TypeDescriptor,
    ) -> ApplicationResult<Value> {
        model
            .catalog()
            .kind(self.snippet_kind)
            .filter(|k| k.is_assignable_to(bound))
            .map(|k| Value::ClassObject(ClassObject::Kind(k.id())))
            .ok_or_else(|| ApplicationError::SynthesisFailure(descriptor.clone()))
    }

    /// A named class, created where the factory puts it and then removed
    /// from there so it arrives parentless.
    fn detached_class(&self, model: &mut Model) -> ApplicationResult<Value> {
        let class = kinds::create_class(model, &self.settings.class_name)?;
        model.delete(class)?;
        Ok(Value::Node(class))
    }

    fn instance(
        &self,
        model: &mut Model,
        node_type: &NodeType,
        descriptor: &TypeDescriptor,
    ) -> ApplicationResult<Value> {
        let (kind, namespace) = model
            .catalog()
            .first_instantiable(node_type)
            .map(|k| (k.id(), k.is_namespace()))
            .ok_or_else(|| ApplicationError::SynthesisFailure(descriptor.clone()))?;

        let id = model.create(kind)?;
        if namespace {
            let name = format!(
                "{}.{}",
                self.settings.package_prefix,
                kind.name().to_lowercase()
            );
            model.set_leaf(id, Role::Name, Value::text(name))?;
        }
        Ok(Value::Node(id))
    }

    fn array(&self, model: &mut Model, element: &TypeDescriptor) -> ApplicationResult<Value> {
        match element {
            TypeDescriptor::Node(_) => Ok(Value::Array(Vec::new())),
            TypeDescriptor::Any => Ok(Value::Array(vec![Value::Integer(self.settings.integer)])),
            other => Ok(Value::Array(vec![self.synthesize(model, other)?])),
        }
    }
}

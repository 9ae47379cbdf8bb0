//! Domain layer: the node model, its kinds and change notification
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod event;
pub mod kinds;
pub mod model;
pub mod render;
pub mod role;
pub mod value;

pub use catalog::{
    Catalog, CatalogBuilder, Exemption, KindDef, KindId, MutationFailure, MutationOutcome,
    MutatorDef, StructuralMutator,
};
pub use descriptor::{Category, ClassBound, NodeType, TypeDescriptor};
pub use error::{DomainError, DomainResult};
pub use event::{Action, ChangeEvent, ChangeListener, EventCounter, EventLog, SharedListener, TracingListener};
pub use model::{CollectionShape, Environment, Model, Node, NodeId};
pub use render::TreeNodeConvert;
pub use role::Role;
pub use value::{ClassObject, EnumType, EnumValue, OpaqueHandle, Value, PLATFORM_PACKAGES};

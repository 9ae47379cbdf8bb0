//! Compiler options facade and invoker

mod builder;
mod invoker;
mod options;

pub use builder::CompilerArgsBuilder;
pub use invoker::{CompileOutput, CompilerInvoker};
pub use options::{
    AdvancedOptions, AnnotationProcessingOptions, ClasspathOptions, CompilerOptions,
    ComplianceOptions, SourceOptions,
};

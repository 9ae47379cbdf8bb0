//! Ordered compiler argument builder.

use tracing::debug;

use crate::infrastructure::compiler::options::{
    AdvancedOptions, AnnotationProcessingOptions, ClasspathOptions, ComplianceOptions,
    CompilerOptions, SourceOptions,
};
use crate::infrastructure::{InfraError, InfraResult};

/// Accumulates option groups into one flat argument list.
///
/// Sources must come last: once a source group has been added, any other
/// group is rejected. Further source groups are still accepted.
#[derive(Debug, Clone, Default)]
pub struct CompilerArgsBuilder {
    args: Vec<String>,
    has_sources: bool,
}

impl CompilerArgsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classpath_options(self, options: &ClasspathOptions) -> InfraResult<Self> {
        self.push_option(options)
    }

    pub fn compliance_options(self, options: &ComplianceOptions) -> InfraResult<Self> {
        self.push_option(options)
    }

    pub fn annotation_processing_options(
        self,
        options: &AnnotationProcessingOptions,
    ) -> InfraResult<Self> {
        self.push_option(options)
    }

    pub fn advanced_options(self, options: &AdvancedOptions) -> InfraResult<Self> {
        self.push_option(options)
    }

    pub fn sources(mut self, options: &SourceOptions) -> Self {
        self.has_sources = true;
        self.args.extend(options.build());
        self
    }

    pub fn build(&self) -> Vec<String> {
        debug!("build: {} args", self.args.len());
        self.args.clone()
    }

    fn push_option(mut self, options: &impl CompilerOptions) -> InfraResult<Self> {
        if self.has_sources {
            return Err(InfraError::Configuration(
                "sources must be specified last".to_string(),
            ));
        }
        self.args.extend(options.build());
        Ok(self)
    }
}

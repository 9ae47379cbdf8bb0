//! Runs the external batch compiler.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::config::CompilerConfig;
use crate::infrastructure::compiler::builder::CompilerArgsBuilder;
use crate::infrastructure::compiler::options::{
    AdvancedOptions, AnnotationProcessingOptions, ClasspathOptions, ComplianceOptions,
    SourceOptions,
};
use crate::infrastructure::traits::CommandRunner;
use crate::infrastructure::{InfraError, InfraResult};

/// Captured compiler output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    pub stdout: String,
    pub stderr: String,
}

pub struct CompilerInvoker {
    cmd: Arc<dyn CommandRunner>,
    config: CompilerConfig,
}

impl CompilerInvoker {
    pub fn new(cmd: Arc<dyn CommandRunner>, config: CompilerConfig) -> Self {
        Self { cmd, config }
    }

    /// Arguments for compiling `sources` against `classpath` with the
    /// configured encoding and compliance, processing disabled.
    pub fn arguments(&self, classpath: &[String], sources: &[String]) -> InfraResult<Vec<String>> {
        let builder = CompilerArgsBuilder::new()
            .classpath_options(
                &ClasspathOptions::new()
                    .encoding(self.config.encoding.clone())
                    .classpath(classpath.iter()),
            )?
            .compliance_options(&ComplianceOptions::new().compliance(self.config.compliance))?
            .annotation_processing_options(&AnnotationProcessingOptions::new())?
            .advanced_options(&AdvancedOptions::new().preserve_unused_vars().no_warnings())?
            .sources(&SourceOptions::new().sources(sources.iter()));
        Ok(builder.build())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn compile(&self, args: &[String]) -> InfraResult<CompileOutput> {
        let command = self.config.command.as_str();
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        let result = self
            .cmd
            .run(command, &argv)
            .map_err(|e| InfraError::io(format!("run {}", command), e))?;

        let stdout = String::from_utf8_lossy(&result.stdout).to_string();
        let stderr = String::from_utf8_lossy(&result.stderr).to_string();
        if !result.status.success() {
            return Err(InfraError::Compiler {
                message: stderr.trim().to_string(),
                exit_code: result.status.code(),
            });
        }
        debug!("compile: {} succeeded", command);
        Ok(CompileOutput { stdout, stderr })
    }
}

//! Option groups of the batch compiler command line.
//!
//! Each group renders to a flat token list; [`super::CompilerArgsBuilder`]
//! concatenates them in the order they are given.

use std::path::PathBuf;

#[cfg(windows)]
const CLASSPATH_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const CLASSPATH_SEPARATOR: &str = ":";

pub trait CompilerOptions {
    fn build(&self) -> Vec<String>;
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(CLASSPATH_SEPARATOR)
}

/// Encoding, class paths and the output directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClasspathOptions {
    encoding: Option<String>,
    classpath: Vec<PathBuf>,
    boot_classpath: Vec<PathBuf>,
    /// `None` means no class files are written
    binaries: Option<PathBuf>,
}

impl ClasspathOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn classpath(mut self, entries: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.classpath.extend(entries.into_iter().map(Into::into));
        self
    }

    pub fn boot_classpath(mut self, entries: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.boot_classpath.extend(entries.into_iter().map(Into::into));
        self
    }

    pub fn binaries(mut self, dir: impl Into<PathBuf>) -> Self {
        self.binaries = Some(dir.into());
        self
    }
}

impl CompilerOptions for ClasspathOptions {
    fn build(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(encoding) = &self.encoding {
            args.extend(["-encoding".to_string(), encoding.clone()]);
        }
        if !self.classpath.is_empty() {
            args.extend(["-cp".to_string(), join_paths(&self.classpath)]);
        }
        if !self.boot_classpath.is_empty() {
            args.extend(["-bootclasspath".to_string(), join_paths(&self.boot_classpath)]);
        }
        let output = self
            .binaries
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "none".to_string());
        args.extend(["-d".to_string(), output]);
        args
    }
}

/// Source and target language level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceOptions {
    compliance: u8,
}

impl Default for ComplianceOptions {
    fn default() -> Self {
        Self { compliance: 8 }
    }
}

impl ComplianceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compliance(mut self, level: u8) -> Self {
        self.compliance = level;
        self
    }
}

impl CompilerOptions for ComplianceOptions {
    fn build(&self) -> Vec<String> {
        // levels up to 8 use the 1.x spelling
        if self.compliance <= 8 {
            vec![format!("-1.{}", self.compliance)]
        } else {
            vec![format!("-{}", self.compliance)]
        }
    }
}

/// Annotation processing; disabled unless processors are compiled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationProcessingOptions {
    compile_processors: bool,
    processor_path: Vec<PathBuf>,
    processors: Vec<String>,
    generated_sources: Option<PathBuf>,
}

impl AnnotationProcessingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile_processors(mut self) -> Self {
        self.compile_processors = true;
        self
    }

    pub fn processor_path(mut self, entries: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.processor_path.extend(entries.into_iter().map(Into::into));
        self
    }

    pub fn processors(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.processors.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn generated_sources(mut self, dir: impl Into<PathBuf>) -> Self {
        self.generated_sources = Some(dir.into());
        self
    }
}

impl CompilerOptions for AnnotationProcessingOptions {
    fn build(&self) -> Vec<String> {
        if !self.compile_processors {
            return vec!["-proc:none".to_string()];
        }
        let mut args = Vec::new();
        if !self.processor_path.is_empty() {
            args.extend(["-processorpath".to_string(), join_paths(&self.processor_path)]);
        }
        if !self.processors.is_empty() {
            args.extend(["-processor".to_string(), self.processors.join(",")]);
        }
        if let Some(dir) = &self.generated_sources {
            args.extend(["-s".to_string(), dir.display().to_string()]);
        }
        args
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvancedOptions {
    preserve_unused_vars: bool,
    continue_execution: bool,
    enable_javadoc: bool,
    no_warnings: bool,
}

impl AdvancedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preserve_unused_vars(mut self) -> Self {
        self.preserve_unused_vars = true;
        self
    }

    pub fn continue_execution(mut self) -> Self {
        self.continue_execution = true;
        self
    }

    pub fn enable_javadoc(mut self) -> Self {
        self.enable_javadoc = true;
        self
    }

    pub fn no_warnings(mut self) -> Self {
        self.no_warnings = true;
        self
    }
}

impl CompilerOptions for AdvancedOptions {
    fn build(&self) -> Vec<String> {
        [
            (self.preserve_unused_vars, "-preserveAllLocals"),
            (self.continue_execution, "-proceedOnError"),
            (self.enable_javadoc, "-enableJavadoc"),
            (self.no_warnings, "-warn:none"),
        ]
        .into_iter()
        .filter(|(on, _)| *on)
        .map(|(_, flag)| flag.to_string())
        .collect()
    }
}

/// Source files and directories; always last on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceOptions {
    sources: Vec<PathBuf>,
}

impl SourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sources(mut self, entries: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.sources.extend(entries.into_iter().map(Into::into));
        self
    }
}

impl CompilerOptions for SourceOptions {
    fn build(&self) -> Vec<String> {
        self.sources.iter().map(|p| p.display().to_string()).collect()
    }
}

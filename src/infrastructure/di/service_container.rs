//! Service container for dependency injection
//!
//! Wires up the catalog, the services and the process boundary.

use std::sync::Arc;

use crate::application::{Synthesizer, Verifier};
use crate::config::Settings;
use crate::domain::{Catalog, Model};
use crate::infrastructure::compiler::CompilerInvoker;
use crate::infrastructure::traits::{CommandRunner, RealCommandRunner};

/// Container holding shared settings and dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Node kinds every model built here uses
    pub catalog: Arc<Catalog>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,
}

impl ServiceContainer {
    /// Create a new service container with the built-in catalog and real
    /// command runner.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(Catalog::builtin()),
            Arc::new(RealCommandRunner),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, catalog: Arc<Catalog>, cmd: Arc<dyn CommandRunner>) -> Self {
        Self {
            settings: Arc::new(settings),
            catalog,
            cmd,
        }
    }

    /// Fresh, empty model over the container's catalog.
    pub fn model(&self) -> Model {
        Model::new(Arc::clone(&self.catalog))
    }

    pub fn synthesizer(&self) -> Synthesizer {
        Synthesizer::new(self.settings.synthesis.clone())
    }

    pub fn verifier(&self) -> Verifier {
        Verifier::from_settings(&self.settings)
    }

    pub fn compiler(&self) -> CompilerInvoker {
        CompilerInvoker::new(Arc::clone(&self.cmd), self.settings.compiler.clone())
    }
}

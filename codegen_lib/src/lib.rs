//! Pool code generation.
//!
//! Walks a finalized entity registry and emits one strongly typed Rust
//! module per entity: a model handle, a condition builder, a data
//! holder and a record-set wrapper forwarding into the dynamic core.
//!
//! The pipeline is extraction then emission: [`ModelData`] gathers
//! everything the templates need, the emitter renders it. Entities fail
//! independently; one bad method declaration never blocks the rest of
//! the batch.

pub mod catalog;
pub mod deps;
pub mod error;
pub mod field;
pub mod method;
pub mod model_data;
pub mod sanitize;

mod emit;

use std::fs;
use std::path::Path;

use poolgen_ir::{AstIndex, Registry};
use tracing::{debug, error, info};

pub use crate::error::CodegenError;
pub use crate::model_data::ModelData;

/// One generated source file.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// Path relative to the output directory.
    pub path: String,
    pub content: String,
}

/// Everything a generation run produced.
#[derive(Debug, Clone, Default)]
pub struct GeneratedCode {
    pub files: Vec<GeneratedFile>,
}

impl GeneratedCode {
    /// Writes every file under `dir`, creating it if needed.
    ///
    /// A file that fails to write does not stop the others; the first
    /// error is returned once the whole batch has been attempted.
    pub fn write_to(&self, dir: &Path) -> Result<(), CodegenError> {
        fs::create_dir_all(dir).map_err(|source| CodegenError::Write {
            path: dir.display().to_string(),
            source,
        })?;

        let mut first_err = None;
        for file in &self.files {
            let path = dir.join(&file.path);
            match fs::write(&path, &file.content) {
                Ok(()) => debug!(path = %path.display(), "wrote generated file"),
                Err(source) => {
                    error!(path = %path.display(), %source, "cannot write generated file");
                    first_err.get_or_insert(CodegenError::Write {
                        path: path.display().to_string(),
                        source,
                    });
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Outcome of a batch run: the files that rendered plus the entities
/// that did not, with their individual errors.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub code: GeneratedCode,
    pub failures: Vec<(String, CodegenError)>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Generates typed pool modules from a finalized registry and the
/// parameter-name metadata extracted from the model sources.
pub struct PoolGenerator<'a> {
    registry: &'a Registry,
    ast: &'a AstIndex,
}

impl<'a> PoolGenerator<'a> {
    pub fn new(registry: &'a Registry, ast: &'a AstIndex) -> Self {
        Self { registry, ast }
    }

    /// Runs the full batch, entity by entity in name order.
    ///
    /// A failing entity is recorded in the report and skipped; its
    /// siblings still generate. Callers decide whether a partial batch
    /// is acceptable.
    pub fn generate(&self) -> GenerationReport {
        let mut report = GenerationReport::default();
        for name in self.registry.entity_names() {
            match self.generate_entity(&name) {
                Ok(file) => {
                    info!(entity = %name, path = %file.path, "generated pool module");
                    report.code.files.push(file);
                }
                Err(err) => {
                    error!(entity = %name, %err, "skipping entity");
                    report.failures.push((name, err));
                }
            }
        }
        report
    }

    /// Generates the module for a single entity.
    pub fn generate_entity(&self, name: &str) -> Result<GeneratedFile, CodegenError> {
        let entity = self
            .registry
            .get(name)
            .ok_or_else(|| CodegenError::UnknownEntity(name.to_string()))?;
        let data = ModelData::build(entity, self.registry, self.ast)?;
        Ok(GeneratedFile {
            path: format!("{}.rs", name.to_lowercase()),
            content: emit::render(&data),
        })
    }
}

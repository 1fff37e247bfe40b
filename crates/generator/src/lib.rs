//! TypeScript client generation for resolved REST APIs
//!
//! This crate renders an `ApiModel` into Angular client sources, one
//! directory per service:
//! - `<name>.service.ts` with one method per canonical action
//! - `<tag>.model.generated.ts` and the hand-editable `<tag>.model.ts` for
//!   every definition the service reaches
//! - `<field>.enum.ts` for enum fields
//! - `<name>-<action>-filter.model.ts` for query parameters

mod templates;
pub mod typescript;

use restgen_common::{ApiModel, GeneratorError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tera::Tera;
use typescript::{service_files, EnumView, FilterView, ModelView, ServiceFiles};

/// Files touched by one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub written: Vec<PathBuf>,
    /// Existing hand-editable model files left alone
    pub skipped: Vec<PathBuf>,
}

/// Client generator
///
/// Transforms an `ApiModel` into TypeScript sources:
/// - services
/// - generated and hand-editable models
/// - enums
/// - filter models
pub struct ClientGenerator {
    model: ApiModel,
    tera: Tera,
}

impl ClientGenerator {
    /// Create a new client generator from a resolved model
    pub fn new(model: ApiModel) -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self { model, tera })
    }

    pub fn model(&self) -> &ApiModel {
        &self.model
    }

    /// Generate all client sources below `output_dir`
    ///
    /// Existing `<tag>.model.ts` files are kept unless `overwrite_models`.
    pub fn generate_to_directory(
        &self,
        output_dir: &Path,
        overwrite_models: bool,
    ) -> Result<GenerationSummary> {
        fs::create_dir_all(output_dir).map_err(|e| {
            GeneratorError::Generation(format!("Failed to create output directory: {}", e))
        })?;

        let mut summary = GenerationSummary::default();
        for service in &self.model.services {
            let files = service_files(service, &self.model.registry);
            if files.service.methods.is_empty() {
                tracing::debug!(path = %service.path, "service has no methods, skipping");
                continue;
            }
            self.generate_service_files(output_dir, &files, overwrite_models, &mut summary)?;
        }

        tracing::debug!(
            source = %self.model.source,
            written = summary.written.len(),
            skipped = summary.skipped.len(),
            "generation finished"
        );
        Ok(summary)
    }

    fn generate_service_files(
        &self,
        output_dir: &Path,
        files: &ServiceFiles,
        overwrite_models: bool,
        summary: &mut GenerationSummary,
    ) -> Result<()> {
        let service_dir = output_dir.join(&files.service.directory);
        fs::create_dir_all(&service_dir).map_err(|e| {
            GeneratorError::Generation(format!(
                "Failed to create service directory {}: {}",
                service_dir.display(),
                e
            ))
        })?;

        for model in &files.models {
            self.generate_model(&service_dir, model, overwrite_models, summary)?;
        }
        for view in &files.enums {
            self.generate_enum(&service_dir, view, summary)?;
        }
        for filter in &files.filters {
            self.generate_filter(&service_dir, filter, summary)?;
        }

        let mut context = tera::Context::new();
        context.insert("service", &files.service);
        let path = service_dir.join(&files.service.file_name);
        self.render_to_file("service.ts", &context, &path, summary)
    }

    /// Generate `<tag>.model.generated.ts` and, if absent, `<tag>.model.ts`
    fn generate_model(
        &self,
        dir: &Path,
        model: &ModelView,
        overwrite_models: bool,
        summary: &mut GenerationSummary,
    ) -> Result<()> {
        let mut context = tera::Context::new();
        context.insert("model", model);

        let generated = dir.join(format!("{}.model.generated.ts", model.tag));
        self.render_to_file("model.generated.ts", &context, &generated, summary)?;

        let editable = dir.join(format!("{}.model.ts", model.tag));
        if editable.try_exists()? && !overwrite_models {
            tracing::debug!(path = %editable.display(), "keeping existing model");
            summary.skipped.push(editable);
            return Ok(());
        }
        self.render_to_file("model.ts", &context, &editable, summary)
    }

    fn generate_enum(&self, dir: &Path, view: &EnumView, summary: &mut GenerationSummary) -> Result<()> {
        let mut context = tera::Context::new();
        context.insert("enum", view);
        let path = dir.join(format!("{}.enum.ts", view.file_stem));
        self.render_to_file("enum.ts", &context, &path, summary)
    }

    fn generate_filter(
        &self,
        dir: &Path,
        filter: &FilterView,
        summary: &mut GenerationSummary,
    ) -> Result<()> {
        let mut context = tera::Context::new();
        context.insert("filter", filter);
        let path = dir.join(format!("{}.ts", filter.file_stem));
        self.render_to_file("filter.model.ts", &context, &path, summary)
    }

    fn render_to_file(
        &self,
        template: &str,
        context: &tera::Context,
        path: &Path,
        summary: &mut GenerationSummary,
    ) -> Result<()> {
        let rendered = self
            .tera
            .render(template, context)
            .map_err(|e| GeneratorError::Generation(format!("Template error: {:?}", e)))?;

        fs::write(path, rendered).map_err(|e| {
            GeneratorError::Generation(format!("Failed to write {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "wrote file");
        summary.written.push(path.to_path_buf());
        Ok(())
    }
}

/// Generate client sources (convenience function)
pub fn generate_client(
    model: ApiModel,
    output_path: &Path,
    overwrite_models: bool,
) -> Result<GenerationSummary> {
    let generator = ClientGenerator::new(model)?;
    generator.generate_to_directory(output_path, overwrite_models)
}

//! Import map assembly
//!
//! Packages are processed one at a time, in order:
//!
//! 1. pick the package's provider, or the run default
//! 2. insert raw includes as literal URLs
//! 3. ask the provider for the package's files
//! 4. select files through the include patterns, or take all of them
//! 5. mirror selected files into the cache and assets directories
//! 6. route each file into `imports` or `styles` by type
//!
//! The first error stops the run. Side effects of packages already
//! processed stay on disk.

use std::sync::Arc;

use tracing::{debug, info};

use importmap_cache::{Materialized, Materializer};
use importmap_core::glob::match_include;
use importmap_core::{Package, Provider, RemoteFile};
use importmap_registry::HttpClient;

use crate::options::Options;
use crate::AssemblerResult;
use crate::structure::Structure;

/// One import map run over a list of packages
pub struct ImportMap {
    provider: Arc<dyn Provider>,
    options: Options,
    packages: Vec<Package>,
    materializer: Materializer,
    structure: Structure,
}

impl ImportMap {
    /// `provider` serves every package without its own override
    pub fn new(provider: Arc<dyn Provider>, options: Options, packages: Vec<Package>, http: HttpClient) -> Self {
        let materializer = Materializer::new(http, options.layout());
        Self {
            provider,
            options,
            packages,
            materializer,
            structure: Structure::default(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Packages, with versions filled in once they have been resolved
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Resolve every package and build the import map
    pub async fn fetch(&mut self) -> AssemblerResult<()> {
        if self.options.clean {
            self.materializer.clean().await?;
        }

        let Self {
            provider,
            packages,
            materializer,
            structure,
            ..
        } = self;

        for package in packages.iter_mut() {
            let provider = package.provider.clone().unwrap_or_else(|| provider.clone());
            assemble_package(provider.as_ref(), materializer, structure, package).await?;
        }

        info!(
            imports = structure.imports.len(),
            styles = structure.styles.len(),
            "import map assembled"
        );
        Ok(())
    }

    /// Remove the cache and assets roots
    pub async fn clean(&self) -> AssemblerResult<()> {
        self.materializer.clean().await
    }

    /// Full structure as JSON
    pub fn marshal(&self) -> AssemblerResult<String> {
        self.structure.to_json()
    }

    pub fn imports_json(&self) -> AssemblerResult<String> {
        self.structure.imports_json()
    }

    pub fn styles_html(&self) -> String {
        self.structure.styles_html()
    }

    /// HTML snippet with stylesheets, shim and import map
    pub fn render(&self) -> AssemblerResult<String> {
        self.structure.render(self.options.shim())
    }
}

async fn assemble_package(
    provider: &dyn Provider,
    materializer: &Materializer,
    structure: &mut Structure,
    package: &mut Package,
) -> AssemblerResult<()> {
    for include in package.include.iter().filter(|i| i.is_raw()) {
        let alias = match include.name() {
            name if name.is_empty() => package.display_name().to_string(),
            name => name,
        };
        let url = include.raw.clone().unwrap_or_default();
        debug!(package = %package.name, alias = %alias, url = %url, "raw include");
        structure.imports.insert(alias, url);
    }

    if !package.include.is_empty() && package.include.iter().all(|i| i.is_raw()) {
        return Ok(());
    }

    let resolved = provider
        .fetch_package_files(&package.name, package.requested_version())
        .await?;

    if package.requested_version().is_none() && !resolved.version.is_empty() {
        package.version = Some(resolved.version.clone());
    }

    info!(
        package = %package.name,
        version = %resolved.version,
        provider = provider.name(),
        files = resolved.files.len(),
        "resolved"
    );

    let selected = select_files(package, &resolved.files);
    let layout = materializer.layout();
    let mut published = false;

    for (alias, file) in selected {
        materializer
            .ensure_cached(package, &file.local_path, &file.path)
            .await?;

        let url = match materializer
            .ensure_published(package, &file.local_path, &file.path)
            .await?
        {
            Materialized::Disabled => file.path.clone(),
            _ => {
                published = true;
                layout
                    .publish_url(package, &file.local_path)
                    .unwrap_or_else(|| file.path.clone())
            },
        };

        if !structure.route(file.file_type, alias, url) {
            debug!(package = %package.name, path = %file.local_path, "not a script or stylesheet, skipped");
        }
    }

    if published {
        materializer.mark_published(package).await?;
    }

    Ok(())
}

/// Pair each file to keep with its output alias.
///
/// Without pattern includes every file is kept: a lone file is named after
/// the package, several files keep their local paths as names.
fn select_files<'a>(package: &Package, files: &'a [RemoteFile]) -> Vec<(String, &'a RemoteFile)> {
    if package.include.is_empty() {
        if let [file] = files {
            return vec![(package.display_name().to_string(), file)];
        }
        return files.iter().map(|f| (f.local_path.clone(), f)).collect();
    }

    files
        .iter()
        .filter_map(|file| {
            let include = match_include(&package.include, &file.local_path)?;
            let alias = match include.name() {
                name if name.is_empty() => file.local_path.clone(),
                name => name,
            };
            Some((alias, file))
        })
        .collect()
}

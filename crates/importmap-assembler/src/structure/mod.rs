//! The assembled import map and its renderings

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use importmap_core::error::ImportmapError;
use importmap_core::{FileType, ImportmapResult};

/// Output of a run. Keys are aliases; a later package overwrites an
/// earlier package's alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub imports: BTreeMap<String, String>,
    /// Always empty for now; kept so the JSON shape is stable
    pub scopes: BTreeMap<String, BTreeMap<String, String>>,
    pub styles: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct ImportsOnly<'a> {
    imports: &'a BTreeMap<String, String>,
}

impl Structure {
    /// Put `url` under `alias` in the map its type belongs to.
    ///
    /// Returns `false` when the type has no place in an import map.
    pub fn route(&mut self, file_type: FileType, alias: impl Into<String>, url: impl Into<String>) -> bool {
        let target = match file_type {
            FileType::Js => &mut self.imports,
            FileType::Css => &mut self.styles,
            FileType::Other => return false,
        };
        target.insert(alias.into(), url.into());
        true
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.styles.is_empty() && self.scopes.is_empty()
    }

    /// Full structure as compact JSON
    pub fn to_json(&self) -> ImportmapResult<String> {
        serde_json::to_string(self).map_err(|e| serialize_error("import map", e))
    }

    /// `{"imports":{...}}` as compact JSON
    pub fn imports_json(&self) -> ImportmapResult<String> {
        serde_json::to_string(&ImportsOnly { imports: &self.imports })
            .map_err(|e| serialize_error("imports", e))
    }

    /// One `<link>` per stylesheet, newline separated
    pub fn styles_html(&self) -> String {
        self.styles
            .iter()
            .map(|(alias, url)| format!(r#"<link rel="stylesheet" href="{}" as="{}">"#, url, alias))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// HTML snippet for a page head: stylesheets, the optional shim loader
    /// and the import map script
    pub fn render(&self, shim: Option<&str>) -> ImportmapResult<String> {
        let mut lines: Vec<String> = self
            .styles
            .iter()
            .map(|(alias, url)| format!(r#"<link rel="stylesheet" href="{}" as="{}"/>"#, url, alias))
            .collect();

        if let Some(shim) = shim {
            lines.push(format!(
                r#"<script async src="{}/dist/es-module-shims.js"></script>"#,
                shim.trim_end_matches('/')
            ));
        }

        if !self.imports.is_empty() {
            let json = serde_json::to_string_pretty(&ImportsOnly { imports: &self.imports })
                .map_err(|e| serialize_error("imports", e))?;
            lines.push(format!("<script type=\"importmap\">\n{}\n</script>", json));
        }

        Ok(lines.join("\n"))
    }
}

fn serialize_error(what: &str, e: serde_json::Error) -> ImportmapError {
    ImportmapError::Serialize {
        what: what.to_string(),
        message: e.to_string(),
    }
}

use tracing::debug;

use epm_types::{
    validate_package_name, ContractTypes, Links, Manifest, Meta, Sources, PACKAGE_NAME_PATTERN,
};

use crate::error::{PipelineError, PipelineResult};

/// Package details supplied by the user when generating a manifest.
///
/// Blank strings are treated the same as absent values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackageInput {
    pub name: String,
    pub version: String,
    pub authors: Option<Vec<String>>,
    pub license: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub documentation: Option<String>,
    pub repository: Option<String>,
    pub website: Option<String>,
    /// Contract types to include, by name.
    pub selected: Vec<String>,
}

impl PackageInput {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_authors(mut self, authors: &str) -> Self {
        self.authors = split_list(authors);
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_keywords(mut self, keywords: &str) -> Self {
        self.keywords = split_list(keywords);
        self
    }

    pub fn with_documentation(mut self, url: impl Into<String>) -> Self {
        self.documentation = Some(url.into());
        self
    }

    pub fn with_repository(mut self, url: impl Into<String>) -> Self {
        self.repository = Some(url.into());
        self
    }

    pub fn with_website(mut self, url: impl Into<String>) -> Self {
        self.website = Some(url.into());
        self
    }

    pub fn select(mut self, contract: impl Into<String>) -> Self {
        self.selected.push(contract.into());
        self
    }

    /// The `meta` block, or `None` when every field is blank.
    pub fn meta(&self) -> Option<Meta> {
        let links = Links {
            documentation: non_blank(&self.documentation),
            repository: non_blank(&self.repository),
            website: non_blank(&self.website),
        };
        Meta {
            authors: non_empty_list(&self.authors),
            license: non_blank(&self.license),
            description: non_blank(&self.description),
            keywords: non_empty_list(&self.keywords),
            links: links.non_empty(),
        }
        .non_empty()
    }

    /// Check the input without touching any service.
    pub fn validate(&self, compiled: &ContractTypes) -> PipelineResult<()> {
        if validate_package_name(&self.name).is_err() {
            return Err(PipelineError::user_input(format!(
                "Please enter a valid name for your package. Package names must match regex: {PACKAGE_NAME_PATTERN}."
            )));
        }
        if self.version.trim().is_empty() {
            return Err(PipelineError::user_input("Please enter a package version."));
        }
        if self.selected.is_empty() {
            return Err(PipelineError::user_input(
                "Please select at least one contract type.",
            ));
        }
        if let Some(missing) = self.selected.iter().find(|name| !compiled.contains_key(*name)) {
            return Err(PipelineError::user_input(format!(
                "Contract type '{missing}' has not been compiled."
            )));
        }
        Ok(())
    }
}

/// Split a comma separated field into trimmed entries. Blank input, or
/// input with only blank entries, yields `None`.
pub fn split_list(raw: &str) -> Option<Vec<String>> {
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn non_empty_list(value: &Option<Vec<String>>) -> Option<Vec<String>> {
    value.as_ref().filter(|items| !items.is_empty()).cloned()
}

/// Build the raw manifest for `input` from the latest compilation.
///
/// Only the selected contract types are included; all sources are.
pub fn assemble_manifest(
    input: &PackageInput,
    sources: &Sources,
    contract_types: &ContractTypes,
) -> PipelineResult<Manifest> {
    input.validate(contract_types)?;

    let mut manifest = Manifest::new(input.name.clone(), input.version.trim());
    manifest.meta = input.meta();
    manifest.sources = sources.clone();
    manifest.contract_types = contract_types
        .iter()
        .filter(|(name, _)| input.selected.contains(name))
        .map(|(name, ty)| (name.clone(), ty.clone()))
        .collect();

    debug!(
        package = %input.name,
        contract_types = manifest.contract_types.len(),
        sources = manifest.sources.len(),
        "assembled manifest"
    );
    Ok(manifest)
}

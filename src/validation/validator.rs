use crate::output::{ApiDescriptor, HttpMethod};
use crate::validation::draft::ApiDraft;
use crate::validation::error::ValidationError;
use crate::validation::rules::{
    EndpointUrlRule, HeaderBlockRule, KnownMethodRule, RequiredNameRule, ValidationRule,
};
use std::collections::BTreeSet;
use tracing::debug;

pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<Box<dyn ValidationRule>>) -> Self {
        Self { rules }
    }

    /// Checks every rule in order (first failure wins) and returns the normalized descriptor
    pub fn validate(&self, input: impl Into<ApiDraft>) -> Result<ApiDescriptor, ValidationError> {
        let draft = input.into();
        for rule in &self.rules {
            if let Err(e) = rule.validate(&draft) {
                debug!(rule = rule.name(), error = %e, "Descriptor rejected");
                return Err(e);
            }
        }
        normalize(draft)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            rules: vec![
                Box::new(RequiredNameRule),
                Box::new(EndpointUrlRule),
                Box::new(HeaderBlockRule),
                Box::new(KnownMethodRule),
            ],
        }
    }
}

/// Validates with the default rule set
pub fn validate(input: impl Into<ApiDraft>) -> Result<ApiDescriptor, ValidationError> {
    Validator::default().validate(input)
}

/// Trims every string except the sample code, resolves headers and method, and deduplicates fields
///
/// The field denylist is deliberately not applied here: fields typed by the
/// user are kept even when the extractor would have dropped them.
pub fn normalize(draft: ApiDraft) -> Result<ApiDescriptor, ValidationError> {
    let method: HttpMethod = draft
        .method
        .parse()
        .map_err(|_| ValidationError::InvalidMethod(draft.method.trim().to_string()))?;
    let headers = draft
        .headers
        .resolve()
        .map_err(ValidationError::MalformedHeaders)?;
    let fields: BTreeSet<String> = draft
        .fields
        .iter()
        .map(|field| field.trim())
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect();

    Ok(ApiDescriptor {
        name: draft.name.trim().to_string(),
        description: draft.description.trim().to_string(),
        endpoint: draft.endpoint.trim().to_string(),
        method,
        auth_key: draft.auth_key.trim().to_string(),
        headers,
        fields,
        sample_code: draft.sample_code,
    })
}

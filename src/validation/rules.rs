use crate::output::HttpMethod;
use crate::validation::draft::ApiDraft;
use crate::validation::error::ValidationError;
use reqwest::Url;

pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, draft: &ApiDraft) -> Result<(), ValidationError>;
}

pub struct RequiredNameRule;

impl ValidationRule for RequiredNameRule {
    fn name(&self) -> &'static str {
        "RequiredName"
    }

    fn validate(&self, draft: &ApiDraft) -> Result<(), ValidationError> {
        if draft.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        Ok(())
    }
}

pub struct EndpointUrlRule;

impl ValidationRule for EndpointUrlRule {
    fn name(&self) -> &'static str {
        "EndpointUrl"
    }

    fn validate(&self, draft: &ApiDraft) -> Result<(), ValidationError> {
        let endpoint = draft.endpoint.trim();
        check_endpoint(endpoint)
            .map(|_| ())
            .map_err(|reason| ValidationError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason,
            })
    }
}

/// Accepts absolute http(s) URLs that name a host
pub fn check_endpoint(endpoint: &str) -> Result<Url, String> {
    if endpoint.is_empty() {
        return Err("endpoint cannot be empty".to_string());
    }

    let url = Url::parse(endpoint).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    match url.host_str() {
        None | Some("") => return Err("missing host".to_string()),
        Some(host) if host.contains(['$', '{', '}', '%']) => {
            return Err(format!("host '{}' is an unresolved placeholder", host))
        }
        Some(_) => {}
    }
    Ok(url)
}

pub struct HeaderBlockRule;

impl ValidationRule for HeaderBlockRule {
    fn name(&self) -> &'static str {
        "HeaderBlock"
    }

    fn validate(&self, draft: &ApiDraft) -> Result<(), ValidationError> {
        draft
            .headers
            .resolve()
            .map(|_| ())
            .map_err(ValidationError::MalformedHeaders)
    }
}

pub struct KnownMethodRule;

impl ValidationRule for KnownMethodRule {
    fn name(&self) -> &'static str {
        "KnownMethod"
    }

    fn validate(&self, draft: &ApiDraft) -> Result<(), ValidationError> {
        draft
            .method
            .parse::<HttpMethod>()
            .map(|_| ())
            .map_err(|_| ValidationError::InvalidMethod(draft.method.trim().to_string()))
    }
}

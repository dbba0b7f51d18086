//! Schema-driven resource forms.
//!
//! Every editable resource (ACME accounts, ACME servers, certificates,
//! private keys, challenge providers) runs through the same engine: a
//! [`ResourceSchema`] describes the endpoint and the per-field checks,
//! and a [`ResourceForm`] owns the form state, the validation-error set,
//! and the submit flow. The submission payload lives under the
//! `dataToSubmit` key of the form state.

use reqwest::Method;
use serde_json::Value;

use crate::{
    api::ApiError,
    form::{
        apply_input, renumber_after_removal, set_path_value, value_at_path, Coercion, Edit,
        FormValue, InputEvent, Leaf, SelectOption, ValidationErrors,
    },
    session::Session,
};

mod validate;

pub use self::validate::{
    is_domain_valid, is_email_valid, is_https_url_valid, is_name_valid, is_oid_valid,
    is_port_valid,
};

/// Check applied to one field of a resource form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCheck {
    Name,
    Email,
    Domain { allow_wildcard: bool },
    Port,
    HttpsUrl,
    Oid,
    /// Present and, for strings, non-empty.
    Required,
}

impl FieldCheck {
    fn is_satisfied(&self, value: Option<&FormValue>) -> bool {
        let Some(leaf) = value.and_then(FormValue::as_leaf) else {
            return false;
        };

        match self {
            FieldCheck::Name => leaf.as_str().is_some_and(is_name_valid),
            FieldCheck::Email => leaf.as_str().is_some_and(is_email_valid),
            FieldCheck::Domain { allow_wildcard } => leaf
                .as_str()
                .is_some_and(|domain| is_domain_valid(domain, *allow_wildcard)),
            FieldCheck::Port => leaf.as_int().is_some_and(is_port_valid),
            FieldCheck::HttpsUrl => leaf.as_str().is_some_and(is_https_url_valid),
            FieldCheck::Oid => leaf.as_str().is_some_and(is_oid_valid),
            FieldCheck::Required => match leaf {
                Leaf::Str(text) => !text.is_empty(),
                _ => true,
            },
        }
    }
}

/// One checked field of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Dotted path into the form state.
    pub path: &'static str,

    pub check: FieldCheck,

    /// Apply the check to every member of the sequence at `path` instead
    /// of the node itself. Errors are then keyed per index.
    pub each: bool,
}

impl FieldSpec {
    pub fn new(path: &'static str, check: FieldCheck) -> Self {
        FieldSpec {
            path,
            check,
            each: false,
        }
    }

    pub fn each(path: &'static str, check: FieldCheck) -> Self {
        FieldSpec {
            path,
            check,
            each: true,
        }
    }
}

/// Field list and endpoint of one resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSchema {
    pub name: &'static str,
    pub endpoint: &'static str,
    pub fields: Vec<FieldSpec>,
}

pub fn acme_account_schema() -> ResourceSchema {
    ResourceSchema {
        name: "acme_accounts",
        endpoint: "/v1/acmeaccounts",
        fields: vec![
            FieldSpec::new("dataToSubmit.name", FieldCheck::Name),
            FieldSpec::new("dataToSubmit.email", FieldCheck::Email),
            FieldSpec::new("dataToSubmit.acme_server_id", FieldCheck::Required),
            FieldSpec::new("dataToSubmit.private_key_id", FieldCheck::Required),
        ],
    }
}

pub fn acme_server_schema() -> ResourceSchema {
    ResourceSchema {
        name: "acme_servers",
        endpoint: "/v1/acmeservers",
        fields: vec![
            FieldSpec::new("dataToSubmit.name", FieldCheck::Name),
            FieldSpec::new("dataToSubmit.directory_url", FieldCheck::HttpsUrl),
        ],
    }
}

pub fn certificate_schema() -> ResourceSchema {
    ResourceSchema {
        name: "certificates",
        endpoint: "/v1/certificates",
        fields: vec![
            FieldSpec::new("dataToSubmit.name", FieldCheck::Name),
            FieldSpec::new("dataToSubmit.private_key_id", FieldCheck::Required),
            FieldSpec::new("dataToSubmit.acme_account_id", FieldCheck::Required),
            FieldSpec::new(
                "dataToSubmit.subject",
                FieldCheck::Domain {
                    allow_wildcard: true,
                },
            ),
            FieldSpec::each(
                "dataToSubmit.subject_alts",
                FieldCheck::Domain {
                    allow_wildcard: true,
                },
            ),
            FieldSpec::each("dataToSubmit.csr_extra_extensions", FieldCheck::Oid),
        ],
    }
}

pub fn private_key_schema() -> ResourceSchema {
    ResourceSchema {
        name: "private_keys",
        endpoint: "/v1/privatekeys",
        fields: vec![
            FieldSpec::new("dataToSubmit.name", FieldCheck::Name),
            FieldSpec::new("dataToSubmit.algorithm_value", FieldCheck::Required),
        ],
    }
}

pub fn challenge_provider_schema() -> ResourceSchema {
    ResourceSchema {
        name: "providers",
        endpoint: "/v1/app/challenges/providers/services",
        fields: vec![
            FieldSpec::each(
                "dataToSubmit.domains",
                FieldCheck::Domain {
                    allow_wildcard: true,
                },
            ),
            FieldSpec::new("dataToSubmit.port", FieldCheck::Port),
        ],
    }
}

/// Form state, validation errors, and submit flow for one resource.
#[derive(Debug, Clone)]
pub struct ResourceForm {
    schema: ResourceSchema,
    state: FormValue,
    errors: ValidationErrors,
    send_error: Option<ApiError>,
}

impl ResourceForm {
    pub fn new(schema: ResourceSchema, initial: FormValue) -> Self {
        ResourceForm {
            schema,
            state: initial,
            errors: ValidationErrors::new(),
            send_error: None,
        }
    }

    pub fn state(&self) -> &FormValue {
        &self.state
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Error envelope of the last failed submit, if any.
    pub fn send_error(&self) -> Option<&ApiError> {
        self.send_error.as_ref()
    }

    /// Applies one input event, including any select-option cascade.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        coercion: Coercion,
        options: &[SelectOption],
    ) {
        self.state = apply_input(&self.state, event, coercion, options);
    }

    /// Splices the element at `index` out of the sequence at `base_path`
    /// and renumbers the error set to match.
    pub fn remove_seq_member(&mut self, base_path: &str, index: usize) {
        self.state = set_path_value(&self.state, &format!("{base_path}.{index}"), &Edit::Unset);
        self.errors = renumber_after_removal(&self.errors, base_path, index);
    }

    /// Rebuilds the error set wholesale from the schema's checks.
    ///
    /// Returns whether the form is submittable. Only failing fields get
    /// an entry.
    pub fn validate(&mut self) -> bool {
        let mut errors = ValidationErrors::new();

        for field in &self.schema.fields {
            let value = value_at_path(&self.state, field.path);

            if field.each {
                if let Some(FormValue::Seq(members)) = value {
                    for (index, member) in members.iter().enumerate() {
                        if !field.check.is_satisfied(Some(member)) {
                            errors.insert(format!("{}.{index}", field.path), true);
                        }
                    }
                }
            } else if !field.check.is_satisfied(value) {
                errors.insert(field.path.to_owned(), true);
            }
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// Restores pristine state and clears all error bookkeeping.
    pub fn reset(&mut self, initial: FormValue) {
        self.state = initial;
        self.errors.clear();
        self.send_error = None;
    }

    /// The submission payload, when the form state carries one.
    pub fn data_to_submit(&self) -> Option<&FormValue> {
        self.state.get("dataToSubmit")
    }

    /// Validates and persists the form.
    ///
    /// New records (no `id`, or a negative placeholder) POST to the
    /// schema endpoint; existing records PUT to `endpoint/{id}`. A
    /// backend error envelope is kept for display and also returned as
    /// the error.
    pub async fn submit(&mut self, session: &Session) -> eyre::Result<Value> {
        if !self.validate() {
            return Err(eyre::eyre!(
                "{} form has {} validation error(s)",
                self.schema.name,
                self.errors.len()
            ));
        }

        let payload = self
            .data_to_submit()
            .ok_or_else(|| eyre::eyre!("{} form has no submission payload", self.schema.name))?;

        let body = serde_json::to_value(payload)?;

        let record_id = payload.get("id").and_then(FormValue::as_int).filter(|id| *id >= 0);
        let (method, path) = match record_id {
            Some(id) => (Method::PUT, format!("{}/{id}", self.schema.endpoint)),
            None => (Method::POST, self.schema.endpoint.to_owned()),
        };

        log::debug!("submitting {} via {method} {path}", self.schema.name);

        match session.api_call(method, &path, Some(&body)).await {
            Ok(response) => {
                self.send_error = None;
                Ok(response)
            }
            Err(err) => {
                self.send_error = Some(err.clone());
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn form(schema: ResourceSchema, state: serde_json::Value) -> ResourceForm {
        ResourceForm::new(schema, serde_json::from_value(state).unwrap())
    }

    #[test]
    fn test_validate_collects_failing_fields_only() {
        let mut form = form(
            acme_account_schema(),
            json!({
                "dataToSubmit": {
                    "name": "my account!",
                    "email": "admin@example.com",
                    "acme_server_id": 1,
                    "private_key_id": 2
                }
            }),
        );

        assert!(!form.validate());
        assert_eq!(
            form.errors().keys().collect::<Vec<_>>(),
            vec!["dataToSubmit.name"],
        );

        form.handle_input(
            &InputEvent::new("dataToSubmit.name", "my-account"),
            Coercion::Unchanged,
            &[],
        );

        assert!(form.validate());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_validate_keys_seq_members_per_index() {
        let mut form = form(
            certificate_schema(),
            json!({
                "dataToSubmit": {
                    "name": "site",
                    "private_key_id": 1,
                    "acme_account_id": 1,
                    "subject": "example.com",
                    "subject_alts": ["ok.example.com", "bad domain", "*.example.com"]
                }
            }),
        );

        assert!(!form.validate());
        assert_eq!(
            form.errors().keys().collect::<Vec<_>>(),
            vec!["dataToSubmit.subject_alts.1"],
        );
    }

    #[test]
    fn test_remove_seq_member_renumbers_errors() {
        let mut form = form(
            certificate_schema(),
            json!({
                "dataToSubmit": {
                    "name": "site",
                    "private_key_id": 1,
                    "acme_account_id": 1,
                    "subject": "example.com",
                    "subject_alts": ["bad one", "ok.example.com", "bad two"]
                }
            }),
        );

        form.validate();
        assert_eq!(form.errors().len(), 2);

        form.remove_seq_member("dataToSubmit.subject_alts", 0);

        assert_eq!(
            form.state().get("dataToSubmit.subject_alts"),
            Some(&serde_json::from_value(json!(["ok.example.com", "bad two"])).unwrap()),
        );
        assert_eq!(
            form.errors().keys().collect::<Vec<_>>(),
            vec!["dataToSubmit.subject_alts.1"],
        );
    }

    #[test]
    fn test_required_rejects_empty_string() {
        let mut empty = form(
            private_key_schema(),
            json!({"dataToSubmit": {"name": "key1", "algorithm_value": ""}}),
        );
        assert!(!empty.validate());
    }

    #[test]
    fn test_required_rejects_missing_field() {
        let mut missing = form(private_key_schema(), json!({"dataToSubmit": {"name": "key1"}}));
        assert!(!missing.validate());
        assert_eq!(
            missing.errors().keys().collect::<Vec<_>>(),
            vec!["dataToSubmit.algorithm_value"],
        );
    }

    #[tokio::test]
    async fn test_submit_posts_new_record() {
        let server = crate::test::with_backend_server();

        let session = Session::new(&server.base_url).unwrap();
        session.login("admin", "password").await.unwrap();

        let mut form = form(
            acme_account_schema(),
            json!({
                "dataToSubmit": {
                    "name": "new-account",
                    "email": "admin@example.com",
                    "acme_server_id": 1,
                    "private_key_id": 2
                }
            }),
        );

        let response = form.submit(&session).await.unwrap();

        assert_eq!(response["acme_account"]["id"], 23);
        assert!(form.send_error().is_none());
    }

    #[tokio::test]
    async fn test_submit_refuses_invalid_form() {
        // never dialed; validation fails before any request
        let session = Session::new("http://127.0.0.1:1").unwrap();

        let mut form = form(
            acme_account_schema(),
            json!({"dataToSubmit": {"name": "bad name!"}}),
        );

        let err = form.submit(&session).await.unwrap_err();

        assert!(err.to_string().contains("validation error"));
        assert!(form.send_error().is_none());
    }

    #[tokio::test]
    async fn test_submit_records_backend_error() {
        let server = crate::test::with_backend_server();

        let session = Session::new(&server.base_url).unwrap();
        session.login("admin", "password").await.unwrap();

        let unknown = ResourceSchema {
            name: "unknown",
            endpoint: "/v1/unknown",
            fields: Vec::new(),
        };

        let mut form = form(unknown, json!({"dataToSubmit": {"name": "x"}}));

        form.submit(&session).await.unwrap_err();

        assert_eq!(form.send_error().map(|err| err.status), Some(404));
    }

    #[test]
    fn test_reset_clears_errors() {
        let mut form = form(
            acme_server_schema(),
            json!({"dataToSubmit": {"name": "!", "directory_url": "ftp://x"}}),
        );

        form.validate();
        assert!(!form.errors().is_empty());

        form.reset(serde_json::from_value(json!({"dataToSubmit": {}})).unwrap());
        assert!(form.errors().is_empty());
        assert!(form.send_error().is_none());
    }
}

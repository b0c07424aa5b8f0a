//! Request state edited by the request panel.
//!
//! # Design
//! `RequestStore` is an ordinary struct handed around by `&mut`, so every
//! place that changes the request is visible at its call site. Importing a
//! command folds a `RequestDescriptor` into the store field by field, using
//! the same setters the form controls use.
//!
//! `HostMessage` is the snapshot that gets posted to the host. Its JSON keys
//! are the ones the host already reads (`requestUrl`, `keyValueTableData`,
//! ...), so the field names here are fixed by that contract.

use serde::{Deserialize, Serialize};

use crate::command::parse_command;
use crate::error::ImportError;
use crate::http::{HttpMethod, RequestDescriptor};

/// One row of the header table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueRow {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyOption {
    #[default]
    #[serde(rename = "None")]
    None,
    #[serde(rename = "Form Data")]
    FormData,
    #[serde(rename = "x-www-form-urlencoded")]
    FormUrlencoded,
    #[serde(rename = "Raw")]
    Raw,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawOption {
    #[default]
    #[serde(rename = "Text")]
    Text,
    #[serde(rename = "JavaScript")]
    JavaScript,
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "HTML")]
    Html,
    #[serde(rename = "XML")]
    Xml,
}

/// Raw body text, one slot per raw format so switching formats in the
/// panel does not lose what was typed under another one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBodyData {
    pub text: String,
    pub javascript: String,
    pub json: String,
    pub html: String,
    pub xml: String,
}

impl RawBodyData {
    pub fn get(&self, option: RawOption) -> &str {
        match option {
            RawOption::Text => &self.text,
            RawOption::JavaScript => &self.javascript,
            RawOption::Json => &self.json,
            RawOption::Html => &self.html,
            RawOption::Xml => &self.xml,
        }
    }

    fn slot_mut(&mut self, option: RawOption) -> &mut String {
        match option {
            RawOption::Text => &mut self.text,
            RawOption::JavaScript => &mut self.javascript,
            RawOption::Json => &mut self.json,
            RawOption::Html => &mut self.html,
            RawOption::Xml => &mut self.xml,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthOption {
    #[default]
    #[serde(rename = "No Auth")]
    NoAuth,
    #[serde(rename = "Basic Auth")]
    BasicAuth,
    #[serde(rename = "Bearer Token")]
    BearerToken,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthData {
    pub username: String,
    pub password: String,
    pub token: String,
}

/// Whether a submitted request is waiting on the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
}

/// Everything the host needs to execute the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostMessage {
    pub request_method: HttpMethod,
    pub request_url: String,
    pub key_value_table_data: Vec<KeyValueRow>,
    pub body_option: BodyOption,
    pub body_raw_option: RawOption,
    pub body_raw_data: RawBodyData,
    pub auth_option: AuthOption,
    pub auth_data: AuthData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStore {
    method: HttpMethod,
    url: String,
    header_rows: Vec<KeyValueRow>,
    body_option: BodyOption,
    raw_option: RawOption,
    raw_body: RawBodyData,
    auth_option: AuthOption,
    auth_data: AuthData,
    status: RequestStatus,
}

impl RequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn header_rows(&self) -> &[KeyValueRow] {
        &self.header_rows
    }

    pub fn body_option(&self) -> BodyOption {
        self.body_option
    }

    pub fn raw_option(&self) -> RawOption {
        self.raw_option
    }

    pub fn raw_body(&self) -> &RawBodyData {
        &self.raw_body
    }

    pub fn auth_option(&self) -> AuthOption {
        self.auth_option
    }

    pub fn auth_data(&self) -> &AuthData {
        &self.auth_data
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn set_method(&mut self, method: HttpMethod) {
        self.method = method;
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Set the key of header row `index`, adding blank rows up to it.
    pub fn set_header_key(&mut self, index: usize, key: impl Into<String>) {
        self.row_mut(index).key = key.into();
    }

    /// Set the value of header row `index`, adding blank rows up to it.
    pub fn set_header_value(&mut self, index: usize, value: impl Into<String>) {
        self.row_mut(index).value = value.into();
    }

    pub fn remove_header_row(&mut self, index: usize) -> Option<KeyValueRow> {
        (index < self.header_rows.len()).then(|| self.header_rows.remove(index))
    }

    fn row_mut(&mut self, index: usize) -> &mut KeyValueRow {
        if self.header_rows.len() <= index {
            self.header_rows.resize_with(index + 1, KeyValueRow::default);
        }
        &mut self.header_rows[index]
    }

    pub fn set_body_option(&mut self, option: BodyOption) {
        self.body_option = option;
    }

    pub fn set_raw_option(&mut self, option: RawOption) {
        self.raw_option = option;
    }

    pub fn set_raw_body(&mut self, option: RawOption, text: impl Into<String>) {
        *self.raw_body.slot_mut(option) = text.into();
    }

    pub fn set_auth_option(&mut self, option: AuthOption) {
        self.auth_option = option;
    }

    pub fn set_auth_data(&mut self, data: AuthData) {
        self.auth_data = data;
    }

    pub fn set_status(&mut self, status: RequestStatus) {
        self.status = status;
    }

    /// Fold an imported request into the store.
    ///
    /// Headers overwrite rows `0..n` by position; rows past the imported
    /// headers are left alone. The body always lands in the JSON raw slot,
    /// empty when the command had none.
    pub fn import_descriptor(&mut self, descriptor: RequestDescriptor) {
        let RequestDescriptor {
            method,
            url,
            headers,
            body,
        } = descriptor;

        tracing::info!(%method, %url, headers = headers.len(), "importing request");

        self.set_url(url);
        self.set_method(method);
        for (index, (key, value)) in headers.into_vec().into_iter().enumerate() {
            self.set_header_key(index, key);
            self.set_header_value(index, value);
        }
        self.set_body_option(BodyOption::Raw);
        self.set_raw_option(RawOption::Json);
        self.set_raw_body(RawOption::Json, body.unwrap_or_default());
    }

    /// Parse `command` and fold the result in. On error nothing changes.
    pub fn import_command(&mut self, command: &str) -> Result<(), ImportError> {
        let descriptor = parse_command(command).inspect_err(|err| {
            tracing::debug!(error = %err, "command import rejected");
        })?;
        self.import_descriptor(descriptor);
        Ok(())
    }

    pub fn host_message(&self) -> HostMessage {
        HostMessage {
            request_method: self.method,
            request_url: self.url.clone(),
            key_value_table_data: self.header_rows.clone(),
            body_option: self.body_option,
            body_raw_option: self.raw_option,
            body_raw_data: self.raw_body.clone(),
            auth_option: self.auth_option,
            auth_data: self.auth_data.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_setters_grow_rows() {
        let mut store = RequestStore::new();
        store.set_header_value(2, "v");
        assert_eq!(store.header_rows().len(), 3);
        assert_eq!(store.header_rows()[2].value, "v");
        assert_eq!(store.header_rows()[0], KeyValueRow::default());
    }

    #[test]
    fn import_command_folds_every_field() {
        let mut store = RequestStore::new();
        store
            .import_command(r#"curl -X PUT https://a.test -H "Accept: */*" -d '{"a":1}'"#)
            .unwrap();

        assert_eq!(store.method(), HttpMethod::Post);
        assert_eq!(store.url(), "https://a.test");
        assert_eq!(
            store.header_rows(),
            &[KeyValueRow {
                key: "Accept".to_string(),
                value: "*/*".to_string(),
            }]
        );
        assert_eq!(store.body_option(), BodyOption::Raw);
        assert_eq!(store.raw_option(), RawOption::Json);
        assert_eq!(store.raw_body().get(RawOption::Json), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn import_overwrites_rows_by_position_and_keeps_the_rest() {
        let mut store = RequestStore::new();
        store.set_header_key(0, "Old-A");
        store.set_header_key(1, "Old-B");
        store.set_header_value(1, "b");

        store.import_command(r#"curl -H "New: 1" https://a.test"#).unwrap();

        let keys: Vec<_> = store.header_rows().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["New", "Old-B"]);
    }

    #[test]
    fn import_without_body_clears_json_slot() {
        let mut store = RequestStore::new();
        store.set_raw_body(RawOption::Json, "stale");
        store.set_raw_body(RawOption::Text, "kept");
        store.import_command("curl https://a.test").unwrap();
        assert_eq!(store.raw_body().json, "");
        assert_eq!(store.raw_body().text, "kept");
    }

    #[test]
    fn rejected_import_leaves_store_untouched() {
        let mut store = RequestStore::new();
        store.set_url("https://keep.test");
        let before = store.clone();

        let err = store.import_command("curl -X POST").unwrap_err();
        assert!(matches!(err, ImportError::InvalidCommand { .. }));
        assert_eq!(store, before);
    }

    #[test]
    fn remove_header_row_out_of_range() {
        let mut store = RequestStore::new();
        assert!(store.remove_header_row(0).is_none());
        store.set_header_key(0, "A");
        assert_eq!(store.remove_header_row(0).unwrap().key, "A");
        assert!(store.header_rows().is_empty());
    }

    #[test]
    fn host_message_uses_host_field_names() {
        let mut store = RequestStore::new();
        store.set_url("https://a.test");
        store.set_auth_option(AuthOption::BearerToken);

        let json = serde_json::to_value(store.host_message()).unwrap();
        assert_eq!(json["requestMethod"], "GET");
        assert_eq!(json["requestUrl"], "https://a.test");
        assert_eq!(json["bodyOption"], "None");
        assert_eq!(json["bodyRawOption"], "Text");
        assert_eq!(json["authOption"], "Bearer Token");
        assert!(json["keyValueTableData"].as_array().unwrap().is_empty());
        assert_eq!(json["bodyRawData"]["json"], "");
    }
}

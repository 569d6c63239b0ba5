//! API constants and endpoint builders for the SharePoint list REST surface

/// Base REST path for a SharePoint web
pub const API_BASE_PATH: &str = "/_api/web";

/// Columns requested when reading a choice field's metadata
pub const CHOICE_FIELD_SELECT: &str = "Choices,AllowMultipleValues,TypeAsString";

/// Field type reported for multi-select choice columns
pub const MULTI_CHOICE_TYPE: &str = "MultiChoice";

/// Standard headers for SharePoint requests
pub mod headers {
    /// JSON without the OData metadata envelope
    pub const JSON_NO_METADATA: &str = "application/json;odata=nometadata";

    /// Header name for the OData protocol version
    pub const ODATA_VERSION: &str = "odata-version";

    /// Sent empty so the server negotiates the version from the Accept header
    pub const ODATA_VERSION_UNSET: &str = "";

    /// Correlation header attached to every request
    pub const X_CORRELATION_ID: &str = "X-Correlation-ID";
}

/// Quote and percent-encode a name for use inside an OData string literal
pub fn odata_literal(name: &str) -> String {
    urlencoding::encode(&name.replace('\'', "''")).into_owned()
}

/// Build the list endpoint for a list addressed by title
pub fn list_endpoint(site_url: &str, list_title: &str) -> String {
    format!(
        "{}{}/lists/getByTitle('{}')",
        site_url.trim_end_matches('/'),
        API_BASE_PATH,
        odata_literal(list_title)
    )
}

/// Build the endpoint that reads one field's choice metadata
pub fn choice_field_endpoint(site_url: &str, list_title: &str, field: &str) -> String {
    format!(
        "{}/fields/getByInternalNameOrTitle('{}')?$select={}",
        list_endpoint(site_url, list_title),
        odata_literal(field),
        CHOICE_FIELD_SELECT
    )
}

/// Build the item collection endpoint used to create records
pub fn items_endpoint(site_url: &str, list_title: &str) -> String {
    format!("{}/items", list_endpoint(site_url, list_title))
}

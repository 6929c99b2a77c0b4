//! snapd wire types.
//!
//! These mirror what snapd sends and accepts; this crate only moves them
//! across the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Icon of an installed snap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub filename: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Snap {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub developer: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, rename = "type")]
    pub snap_type: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub revision: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub confinement: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub installed_size: Option<i64>,
    #[serde(default)]
    pub download_size: Option<i64>,
    #[serde(default)]
    pub install_date: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub devmode: bool,
    #[serde(default)]
    pub trymode: bool,
    /// Everything else snapd reports (prices, screenshots, apps, ...).
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

/// Result-set information attached to sync responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResultInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindSelect {
    Private,
    Refresh,
}

impl FindSelect {
    pub fn as_str(self) -> &'static str {
        match self {
            FindSelect::Private => "private",
            FindSelect::Refresh => "refresh",
        }
    }
}

/// Filters for a store search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub query: String,
    /// Match snap names starting with `query` rather than a full-text search.
    pub prefix: bool,
    pub select: Option<FindSelect>,
    pub section: Option<String>,
    pub scope: Option<String>,
}

impl FindOptions {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub(crate) fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.query.is_empty() {
            let key = if self.prefix { "name" } else { "q" };
            pairs.push((key, format!("{}{}", self.query, if self.prefix { "*" } else { "" })));
        }
        if let Some(select) = self.select {
            pairs.push(("select", select.as_str().to_string()));
        }
        if let Some(section) = &self.section {
            pairs.push(("section", section.clone()));
        }
        if let Some(scope) = &self.scope {
            pairs.push(("scope", scope.clone()));
        }
        pairs
    }
}

/// Options for install and remove.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub devmode: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub jailmode: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub classic: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dangerous: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct SnapAction<'a> {
    pub action: &'static str,
    #[serde(flatten)]
    pub options: &'a SnapOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsRelease {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "version-id")]
    pub version_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServerVersion {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub series: String,
    #[serde(default)]
    pub os_release: OsRelease,
    #[serde(default)]
    pub on_classic: bool,
    #[serde(default)]
    pub kernel_version: String,
}

/// The envelope every snapd response is wrapped in.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct Response {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub change: Option<String>,
    #[serde(flatten)]
    pub info: ResultInfo,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorResult {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_snap_keeps_unknown_fields() {
        let json = r#"
        {
            "id": "mVyGrEwiqSi5PugCwyH7WgpoQLemtTd6",
            "name": "hello-world",
            "summary": "The 'hello-world' of snaps",
            "developer": "canonical",
            "status": "active",
            "type": "app",
            "version": "6.3",
            "revision": "27",
            "installed-size": 20480,
            "install-date": "2016-10-20T09:17:22Z",
            "prices": {"USD": 1.99}
        }
        "#;

        let snap: Snap = serde_json::from_str(json).expect("deserialize");
        assert_eq!(snap.name, "hello-world");
        assert_eq!(snap.snap_type, "app");
        assert_eq!(snap.revision, "27");
        assert_eq!(snap.installed_size, Some(20480));
        assert_eq!(snap.other.get("prices"), Some(&json!({"USD": 1.99})));
    }

    #[test]
    fn find_options_query_pairs() {
        let opts = FindOptions {
            query: "hello".to_string(),
            prefix: true,
            select: Some(FindSelect::Private),
            section: Some("featured".to_string()),
            scope: None,
        };
        assert_eq!(
            opts.to_query_pairs(),
            vec![
                ("name", "hello*".to_string()),
                ("select", "private".to_string()),
                ("section", "featured".to_string()),
            ]
        );
        assert_eq!(
            FindOptions::query("hello").to_query_pairs(),
            vec![("q", "hello".to_string())]
        );
        assert!(FindOptions::default().to_query_pairs().is_empty());
    }

    #[test]
    fn snap_action_omits_unset_options() {
        let opts = SnapOptions {
            channel: Some("edge".to_string()),
            devmode: true,
            ..SnapOptions::default()
        };
        let body = serde_json::to_value(SnapAction {
            action: "install",
            options: &opts,
        })
        .expect("serialize");
        assert_eq!(
            body,
            json!({"action": "install", "channel": "edge", "devmode": true})
        );
    }

    #[test]
    fn deserialize_error_envelope() {
        let json = r#"
        {
            "type": "error",
            "status-code": 404,
            "status": "Not Found",
            "result": {"message": "snap not installed", "kind": "snap-not-found"}
        }
        "#;

        let response: Response = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.kind, "error");
        assert_eq!(response.status_code, 404);
        let err: ErrorResult = serde_json::from_value(response.result).expect("error result");
        assert_eq!(err.kind.as_deref(), Some("snap-not-found"));
    }

    #[test]
    fn deserialize_sync_envelope_with_result_info() {
        let json = r#"
        {
            "type": "sync",
            "status-code": 200,
            "status": "OK",
            "result": [],
            "suggested-currency": "GBP",
            "sources": ["store"]
        }
        "#;

        let response: Response = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.info.suggested_currency.as_deref(), Some("GBP"));
        assert_eq!(response.info.sources, vec!["store".to_string()]);
    }
}

use crate::jira::transport::{Named, RawIssue};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub key: String,
    #[serde(rename = "type")]
    pub issue_type: Option<String>,
    pub summary: Option<String>,
    pub status: Option<String>,
    pub created_date: Option<String>,
    pub updated_date: Option<String>,
    pub labels: BTreeSet<String>,
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<RawIssue> for Issue {
    fn from(raw: RawIssue) -> Self {
        let fields = raw.fields;
        Self {
            key: raw.key,
            issue_type: name_of(fields.issuetype),
            summary: fields.summary,
            status: name_of(fields.status),
            created_date: fields.created,
            updated_date: fields.updated,
            labels: fields.labels.unwrap_or_default().into_iter().collect(),
            resolution: name_of(fields.resolution),
            id: raw.id,
            url: raw.url,
        }
    }
}

fn name_of(named: Option<Named>) -> Option<String> {
    named.and_then(|named| named.name)
}

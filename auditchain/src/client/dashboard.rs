//! Compliance analysis and dashboard endpoints (`<base>/dashboard`).

use super::types::{AnalysisResult, AnalyzeRequest, Envelope, ProjectStats, RemoteVerdict};
use super::{require, ApiClient, Auth, RequestSpec};
use crate::error::{ApiError, ApiResult};
use crate::record::{records_from_value, AuditRecord};
use crate::verifier::{self, ChainReport};
use reqwest::Method;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{info, warn};

/// One page of compliance history, in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage {
    pub entries: Vec<AuditRecord>,
    /// Total number of entries on the server, when reported.
    pub total: Option<u64>,
}

impl ApiClient {
    fn get_spec<'a>(&self, segments: &[&str], auth: Auth<'a>) -> RequestSpec<'a> {
        RequestSpec {
            method: Method::GET,
            url: self.endpoint(segments),
            auth,
            query: Vec::new(),
            body: None,
        }
    }

    /// `POST /dashboard/analyze`. The project key travels in the body.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> ApiResult<AnalysisResult> {
        request.validate()?;
        let body = serde_json::to_value(request)
            .map_err(|e| ApiError::InvalidArgument(format!("unserialisable request: {}", e)))?;

        self.request(RequestSpec {
            method: Method::POST,
            url: self.endpoint(&["dashboard", "analyze"]),
            auth: Auth::None,
            query: Vec::new(),
            body: Some(body),
        })
        .await
    }

    /// `GET /dashboard/compliance/{project}/verify-chain`: the server's own
    /// verdict, independent of the local check.
    pub async fn verify_chain_remote(
        &self,
        project_id: &str,
        api_key: Option<&str>,
    ) -> ApiResult<RemoteVerdict> {
        require("project_id", project_id)?;
        let raw: Value = self
            .request(self.get_spec(
                &["dashboard", "compliance", project_id, "verify-chain"],
                Auth::ApiKey(api_key),
            ))
            .await?;
        Ok(RemoteVerdict::from_value(raw))
    }

    /// `GET /dashboard/compliance/{project}?limit&skip`
    pub async fn compliance_history(
        &self,
        project_id: &str,
        api_key: Option<&str>,
        limit: u32,
        skip: u64,
    ) -> ApiResult<HistoryPage> {
        require("project_id", project_id)?;
        let mut spec = self.get_spec(
            &["dashboard", "compliance", project_id],
            Auth::ApiKey(api_key),
        );
        spec.query = vec![("limit", limit.to_string()), ("skip", skip.to_string())];

        // Either a `{ data: [...] }` envelope or a bare array.
        let raw: Value = self.request(spec).await?;
        let entries = records_from_value(&raw)
            .map_err(|e| ApiError::Decode(format!("compliance history: {}", e)))?;
        let total = ["total", "total_count"]
            .iter()
            .find_map(|k| raw.get(*k).and_then(Value::as_u64));

        Ok(HistoryPage { entries, total })
    }

    /// `GET /dashboard/compliance/{project}/{request}`
    pub async fn compliance_detail(
        &self,
        project_id: &str,
        request_id: &str,
        api_key: Option<&str>,
    ) -> ApiResult<AuditRecord> {
        require("project_id", project_id)?;
        require("request_id", request_id)?;
        let envelope: Envelope<Value> = self
            .request(self.get_spec(
                &["dashboard", "compliance", project_id, request_id],
                Auth::ApiKey(api_key),
            ))
            .await?;

        let data = envelope.into_data("compliance detail")?;
        AuditRecord::from_value(&data)
            .map_err(|e| ApiError::Decode(format!("compliance detail: {}", e)))
    }

    /// `GET /dashboard/stats` across every project of the signed-in user.
    pub async fn user_stats(&self) -> ApiResult<Value> {
        let envelope: Envelope<Value> = self
            .request(self.get_spec(&["dashboard", "stats"], Auth::Bearer))
            .await?;
        envelope.into_data("user stats")
    }

    /// `GET /dashboard/stats/{project}`
    pub async fn project_stats(
        &self,
        project_id: &str,
        api_key: Option<&str>,
    ) -> ApiResult<ProjectStats> {
        require("project_id", project_id)?;
        let envelope: Envelope<ProjectStats> = self
            .request(self.get_spec(&["dashboard", "stats", project_id], Auth::ApiKey(api_key)))
            .await?;
        envelope.into_data("project stats")
    }

    /// Walk the compliance history page by page.
    ///
    /// Stops on a short page, an empty page, once the reported total has been
    /// collected, or when the server hands back a page already seen (a server
    /// that ignores `skip`). Fails with `PageLimit` after `max_pages` pages.
    pub async fn list_all_entries(
        &self,
        project_id: &str,
        api_key: Option<&str>,
    ) -> ApiResult<Vec<AuditRecord>> {
        let limit = self.config.page_size.max(1);
        let max_pages = self.config.max_pages.max(1);
        let mut all: Vec<AuditRecord> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut previous: Vec<AuditRecord> = Vec::new();

        for _ in 0..max_pages {
            let page = self
                .compliance_history(project_id, api_key, limit, all.len() as u64)
                .await?;
            let fetched = page.entries.len();

            let first_seen = page
                .entries
                .first()
                .and_then(|r| r.commitment.as_deref())
                .is_some_and(|c| seen.contains(c));
            if fetched > 0 && (first_seen || page.entries == previous) {
                warn!(
                    "project {}: server repeated a history page at skip {}; stopping",
                    project_id,
                    all.len()
                );
                return Ok(all);
            }

            seen.extend(
                page.entries
                    .iter()
                    .filter_map(|r| r.commitment.clone()),
            );
            all.extend(page.entries.iter().cloned());
            previous = page.entries;

            let reached_total = page.total.is_some_and(|t| all.len() as u64 >= t);
            if fetched < limit as usize || fetched == 0 || reached_total {
                return Ok(all);
            }
        }

        Err(ApiError::PageLimit {
            pages: max_pages,
            entries: all.len(),
        })
    }

    /// Fetch a project's full history and re-check its chain locally.
    pub async fn verify_project_chain(
        &self,
        project_id: &str,
        api_key: Option<&str>,
    ) -> ApiResult<ChainReport> {
        let records = self.list_all_entries(project_id, api_key).await?;
        let report = verifier::report(&records);

        if report.valid {
            info!(
                "project {}: {} entries, chain verified",
                project_id, report.total_entries
            );
        } else {
            warn!("project {}: {}", project_id, report.message);
        }
        Ok(report)
    }
}

//! GitHub API client implementation.
//!
//! Comments are created through the REST API; the comment history and the
//! minimize mutation go through the GraphQL API, which is the only one that
//! exposes minimized state.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::comment::{MinimizeClassifier, PullRequestRef, ReviewThread, ThreadComment};
use crate::config::GitHubSettings;
use crate::error::{ApiError, Result};

use super::auth::TokenSource;

pub(super) const SERVICE: &str = "GitHub";

const USER_AGENT: &str = concat!("runtask-pr-comment/", env!("CARGO_PKG_VERSION"));

const COMMENTS_QUERY: &str = r"
    query PullRequestComments($owner: String!, $name: String!, $number: Int!, $last: Int!) {
        repository(owner: $owner, name: $name) {
            pullRequest(number: $number) {
                comments(last: $last) {
                    nodes {
                        id
                        author {
                            login
                        }
                        body
                        isMinimized
                    }
                }
            }
        }
    }
";

const MINIMIZE_MUTATION: &str = r"
    mutation MinimizeComment($input: MinimizeCommentInput!) {
        minimizeComment(input: $input) {
            minimizedComment {
                isMinimized
            }
        }
    }
";

/// GitHub API client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    /// HTTP client.
    client: Client,
    /// REST API base URL.
    api_url: String,
    /// GraphQL endpoint.
    graphql_url: String,
    /// Bearer token source.
    auth: TokenSource,
}

/// GraphQL request structure.
#[derive(Debug, Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

/// GraphQL response structure.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

/// GraphQL error structure.
#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

impl GitHubClient {
    /// Creates a new GitHub API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created or the GitHub
    /// App private key is unusable.
    pub fn new(settings: &GitHubSettings, timeout: Duration) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            header::HeaderValue::from_static("2022-11-28"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::network(SERVICE, format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            graphql_url: settings.graphql_url.clone(),
            auth: TokenSource::new(&settings.auth)?,
        })
    }

    /// Returns the bearer token for the next request.
    async fn token(&self) -> Result<String> {
        self.auth.bearer(&self.client, &self.api_url).await
    }

    /// Executes a GraphQL query or mutation.
    async fn execute<T: for<'de> Deserialize<'de>>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        trace!("Executing GraphQL query: {query}");

        let response = self
            .client
            .post(&self.graphql_url)
            .bearer_auth(self.token().await?)
            .json(&GraphQLRequest { query, variables })
            .send()
            .await
            .map_err(|e| ApiError::network(SERVICE, format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::status(SERVICE, status.as_u16(), body).into());
        }

        let gql_response: GraphQLResponse<T> = response.json().await.map_err(|e| {
            ApiError::invalid_response(SERVICE, format!("Failed to parse response: {e}"))
        })?;

        if let Some(errors) = gql_response.errors.filter(|e| !e.is_empty()) {
            let message = errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ApiError::GraphQl { message }.into());
        }

        gql_response
            .data
            .ok_or_else(|| ApiError::invalid_response(SERVICE, "No data in response").into())
    }

    /// Posts a comment on a pull request.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn create_issue_comment(&self, pr: &PullRequestRef, body: &str) -> Result<()> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_url, pr.owner, pr.repository, pr.number
        );
        debug!("Creating comment on {pr}");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.token().await?)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await
            .map_err(|e| ApiError::network(SERVICE, format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::status(SERVICE, status.as_u16(), body).into());
        }

        Ok(())
    }

    /// Fetches the most recent comments of a pull request, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails or the pull request is missing.
    pub async fn pull_request_comments(
        &self,
        pr: &PullRequestRef,
        last: u8,
    ) -> Result<Vec<ThreadComment>> {
        #[derive(Deserialize)]
        struct Response {
            repository: Option<Repository>,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Repository {
            pull_request: Option<PullRequest>,
        }
        #[derive(Deserialize)]
        struct PullRequest {
            comments: Comments,
        }
        #[derive(Deserialize)]
        struct Comments {
            nodes: Vec<CommentNode>,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct CommentNode {
            id: String,
            author: Option<Author>,
            body: String,
            is_minimized: bool,
        }
        #[derive(Deserialize)]
        struct Author {
            login: String,
        }

        let variables = serde_json::json!({
            "owner": pr.owner,
            "name": pr.repository,
            "number": pr.number,
            "last": last,
        });
        let response: Response = self.execute(COMMENTS_QUERY, variables).await?;

        let pull_request = response
            .repository
            .and_then(|r| r.pull_request)
            .ok_or_else(|| ApiError::invalid_response(SERVICE, format!("Pull request {pr} not found")))?;

        Ok(pull_request
            .comments
            .nodes
            .into_iter()
            .map(|node| ThreadComment {
                id: node.id,
                author: node.author.map(|a| a.login),
                body: node.body,
                is_minimized: node.is_minimized,
            })
            .collect())
    }

    /// Minimizes a comment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails or the comment is not
    /// reported as minimized afterwards.
    pub async fn minimize(&self, id: &str, classifier: MinimizeClassifier) -> Result<()> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Response {
            minimize_comment: Option<MinimizePayload>,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct MinimizePayload {
            minimized_comment: Option<MinimizedComment>,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct MinimizedComment {
            is_minimized: bool,
        }

        let variables = serde_json::json!({
            "input": {
                "subjectId": id,
                "classifier": classifier.as_str(),
            }
        });
        let response: Response = self.execute(MINIMIZE_MUTATION, variables).await?;

        let minimized = response
            .minimize_comment
            .and_then(|m| m.minimized_comment)
            .is_some_and(|c| c.is_minimized);

        if !minimized {
            return Err(ApiError::NotMinimized {
                id: id.to_string(),
                classifier: classifier.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl ReviewThread for GitHubClient {
    async fn recent_comments(&self, pr: &PullRequestRef, limit: u8) -> Result<Vec<ThreadComment>> {
        self.pull_request_comments(pr, limit).await
    }

    async fn create_comment(&self, pr: &PullRequestRef, body: &str) -> Result<()> {
        self.create_issue_comment(pr, body).await
    }

    async fn minimize_comment(&self, id: &str, classifier: MinimizeClassifier) -> Result<()> {
        self.minimize(id, classifier).await
    }
}

//! GitLab v4 catalog

use crate::config::{AuthDescriptor, ProviderConfig};
use crate::error::Result;
use crate::manual::{env_var_prefix, AuthPlaceholder, Property, Schema, Tool, ToolProvider};
use crate::providers::provider::{HasProviderBase, Provider, ProviderBase};
use crate::providers::{require_base_url, wrong_auth};
use std::sync::Arc;

pub const PROVIDER_TYPE: &str = "gitlab";

const API_PATH: &str = "/api/v4";
const DEFAULT_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

const PIPELINE_STATUSES: [&str; 11] = [
    "created",
    "waiting_for_resource",
    "preparing",
    "pending",
    "running",
    "success",
    "failed",
    "canceled",
    "skipped",
    "manual",
    "scheduled",
];

/// Publishes GitLab project, merge request, issue, repository and CI operations
#[derive(Debug)]
pub struct GitLabProvider {
    base: ProviderBase,
    auth: AuthPlaceholder,
}

impl GitLabProvider {
    /// Build from configuration; requires a base URL and personal_token auth
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        require_base_url(config)?;
        let header = match &config.auth {
            AuthDescriptor::PersonalToken { header, .. } => {
                config.auth.validate()?;
                if header.is_empty() {
                    DEFAULT_TOKEN_HEADER.to_string()
                } else {
                    header.clone()
                }
            }
            _ => return Err(wrong_auth(config, "personal_token")),
        };

        Ok(Self {
            base: ProviderBase::from_config(config),
            auth: AuthPlaceholder::personal_token(
                &format!("{}_TOKEN", env_var_prefix(&config.name)),
                header,
            ),
        })
    }

    /// Factory entry point
    pub fn create(config: ProviderConfig) -> Result<Arc<dyn Provider>> {
        Ok(Arc::new(Self::new(&config)?))
    }

    fn get(&self, id: &str, path: &str) -> ToolProvider {
        ToolProvider::http(
            id,
            format!("{}{}{}", self.base.base_url(), API_PATH, path),
            "GET",
            self.auth.clone(),
        )
    }
}

fn project_id() -> Property {
    Property::string("Project ID or URL-encoded path")
}

fn per_page() -> Property {
    Property::integer("Results per page").with_default(20)
}

impl HasProviderBase for GitLabProvider {
    fn base(&self) -> &ProviderBase {
        &self.base
    }

    fn list_capabilities(&self) -> Result<Vec<Tool>> {
        Ok(vec![
            Tool::new(
                "gitlab_search_projects",
                "Search for GitLab projects by name or description",
                self.get("gitlab_search_projects", "/projects"),
            )
            .inputs(
                Schema::object()
                    .property(
                        "search",
                        Property::string("Search query for project name or description"),
                    )
                    .property(
                        "visibility",
                        Property::string("Filter by visibility level")
                            .with_enum(["public", "internal", "private"]),
                    )
                    .property(
                        "owned",
                        Property::boolean("Limit to projects owned by current user")
                            .with_default(false),
                    )
                    .property(
                        "membership",
                        Property::boolean("Limit to projects where current user is a member")
                            .with_default(false),
                    )
                    .property(
                        "per_page",
                        Property::integer("Number of results per page (max 100)").with_default(20),
                    )
                    .property(
                        "page",
                        Property::integer("Page number for pagination").with_default(1),
                    ),
            )
            .outputs(Schema::array().described("List of projects matching the search criteria"))
            .tags(["gitlab", "projects", "search"]),
            Tool::new(
                "gitlab_get_project",
                "Get detailed information about a GitLab project",
                self.get("gitlab_get_project", "/projects/${id}"),
            )
            .inputs(
                Schema::object()
                    .property(
                        "id",
                        Property::string("Project ID or URL-encoded path (namespace/project)"),
                    )
                    .property(
                        "statistics",
                        Property::boolean("Include project statistics").with_default(false),
                    )
                    .required(["id"]),
            )
            .outputs(
                Schema::object()
                    .described("Project details including settings, permissions, and metadata"),
            )
            .tags(["gitlab", "project", "info"]),
            Tool::new(
                "gitlab_list_merge_requests",
                "List merge requests for a project",
                self.get("gitlab_list_mrs", "/projects/${project_id}/merge_requests"),
            )
            .inputs(
                Schema::object()
                    .property("project_id", project_id())
                    .property(
                        "state",
                        Property::string("Filter by state")
                            .with_enum(["opened", "closed", "locked", "merged", "all"])
                            .with_default("opened"),
                    )
                    .property(
                        "scope",
                        Property::string("Filter by scope")
                            .with_enum(["created_by_me", "assigned_to_me", "all"])
                            .with_default("all"),
                    )
                    .property("author_id", Property::integer("Filter by author user ID"))
                    .property("assignee_id", Property::integer("Filter by assignee user ID"))
                    .property("labels", Property::string("Comma-separated list of label names"))
                    .property("milestone", Property::string("Milestone title"))
                    .property("per_page", per_page())
                    .required(["project_id"]),
            )
            .outputs(Schema::array().described("List of merge requests with details"))
            .tags(["gitlab", "merge_requests", "list"]),
            Tool::new(
                "gitlab_get_merge_request",
                "Get detailed information about a specific merge request",
                self.get(
                    "gitlab_get_mr",
                    "/projects/${project_id}/merge_requests/${merge_request_iid}",
                ),
            )
            .inputs(
                Schema::object()
                    .property("project_id", project_id())
                    .property(
                        "merge_request_iid",
                        Property::integer("Internal ID of the merge request"),
                    )
                    .property(
                        "include_diverged_commits_count",
                        Property::boolean("Include diverged commits count").with_default(false),
                    )
                    .property(
                        "include_rebase_in_progress",
                        Property::boolean("Include rebase in progress flag").with_default(false),
                    )
                    .required(["project_id", "merge_request_iid"]),
            )
            .outputs(Schema::object().described(
                "Merge request details including diff stats, participants, and status",
            ))
            .tags(["gitlab", "merge_request", "details"]),
            Tool::new(
                "gitlab_list_issues",
                "List issues for a project or group",
                self.get("gitlab_list_issues", "/issues"),
            )
            .inputs(
                Schema::object()
                    .property(
                        "project_id",
                        Property::string(
                            "Project ID or URL-encoded path (optional, for project issues)",
                        ),
                    )
                    .property(
                        "group_id",
                        Property::string("Group ID or URL-encoded path (optional, for group issues)"),
                    )
                    .property(
                        "state",
                        Property::string("Filter by state")
                            .with_enum(["opened", "closed", "all"])
                            .with_default("opened"),
                    )
                    .property("labels", Property::string("Comma-separated list of label names"))
                    .property("milestone", Property::string("Milestone title"))
                    .property("assignee_id", Property::integer("Filter by assignee user ID"))
                    .property("author_id", Property::integer("Filter by author user ID"))
                    .property(
                        "search",
                        Property::string("Search issues for text present in title or description"),
                    )
                    .property("per_page", per_page()),
            )
            .outputs(Schema::array().described("List of issues with details"))
            .tags(["gitlab", "issues", "list"]),
            Tool::new(
                "gitlab_get_file",
                "Get contents of a file from a GitLab repository",
                self.get(
                    "gitlab_get_file",
                    "/projects/${project_id}/repository/files/${file_path}",
                ),
            )
            .inputs(
                Schema::object()
                    .property("project_id", project_id())
                    .property("file_path", Property::string("URL-encoded file path"))
                    .property(
                        "ref",
                        Property::string("Branch, tag, or commit SHA").with_default("main"),
                    )
                    .required(["project_id", "file_path"]),
            )
            .outputs(Schema::object().described("File metadata and content (base64 encoded)"))
            .tags(["gitlab", "repository", "file"]),
            Tool::new(
                "gitlab_list_repository_tree",
                "Get repository tree structure",
                self.get("gitlab_list_tree", "/projects/${project_id}/repository/tree"),
            )
            .inputs(
                Schema::object()
                    .property("project_id", project_id())
                    .property("path", Property::string("Path inside repository (optional)"))
                    .property(
                        "ref",
                        Property::string("Branch, tag, or commit SHA").with_default("main"),
                    )
                    .property(
                        "recursive",
                        Property::boolean("Get tree recursively").with_default(false),
                    )
                    .property("per_page", per_page())
                    .required(["project_id"]),
            )
            .outputs(
                Schema::array().described("List of repository items (files and directories)"),
            )
            .tags(["gitlab", "repository", "tree"]),
            Tool::new(
                "gitlab_list_pipelines",
                "List CI/CD pipelines for a project",
                self.get("gitlab_list_pipelines", "/projects/${project_id}/pipelines"),
            )
            .inputs(
                Schema::object()
                    .property("project_id", project_id())
                    .property(
                        "status",
                        Property::string("Filter by status").with_enum(PIPELINE_STATUSES),
                    )
                    .property("ref", Property::string("Filter by ref (branch or tag)"))
                    .property("sha", Property::string("Filter by commit SHA"))
                    .property(
                        "username",
                        Property::string("Filter by username of pipeline triggerer"),
                    )
                    .property("per_page", per_page())
                    .required(["project_id"]),
            )
            .outputs(Schema::array().described("List of pipelines with status and metadata"))
            .tags(["gitlab", "ci/cd", "pipelines"]),
            Tool::new(
                "gitlab_get_pipeline",
                "Get detailed information about a specific pipeline",
                self.get(
                    "gitlab_get_pipeline",
                    "/projects/${project_id}/pipelines/${pipeline_id}",
                ),
            )
            .inputs(
                Schema::object()
                    .property("project_id", project_id())
                    .property("pipeline_id", Property::integer("Pipeline ID"))
                    .required(["project_id", "pipeline_id"]),
            )
            .outputs(Schema::object().described("Pipeline details including jobs and status"))
            .tags(["gitlab", "ci/cd", "pipeline"]),
            Tool::new(
                "gitlab_search_code",
                "Search for code across all accessible projects",
                self.get("gitlab_search_code", "/search"),
            )
            .inputs(
                Schema::object()
                    .property("search", Property::string("Search query"))
                    .property(
                        "scope",
                        Property::string("Search scope")
                            .with_enum(["blobs", "commits"])
                            .with_default("blobs"),
                    )
                    .property("per_page", per_page())
                    .required(["search"]),
            )
            .outputs(
                Schema::array().described("Search results with file paths and matching content"),
            )
            .tags(["gitlab", "search", "code"]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> ProviderConfig {
        ProviderConfig::new(
            "gitlab",
            "gitlab",
            "https://gitlab.example.com",
            AuthDescriptor::personal_token("gitlab-token-456", "PRIVATE-TOKEN"),
        )
    }

    fn tools() -> Vec<Tool> {
        GitLabProvider::create(config())
            .unwrap()
            .list_capabilities()
            .unwrap()
    }

    #[test]
    fn test_catalog_has_ten_read_only_tools() {
        let tools = tools();
        assert_eq!(tools.len(), 10);
        assert!(tools.iter().all(|t| t.tool_provider.http_method == "GET"));
        assert!(tools.iter().all(|t| t.tags.first().map(String::as_str) == Some("gitlab")));
    }

    #[test]
    fn test_false_defaults_are_serialized() {
        let tools = tools();
        let search = &tools[0];
        let rendered = serde_json::to_value(&search.inputs).unwrap();

        assert_eq!(rendered["properties"]["owned"]["default"], json!(false));
        assert_eq!(rendered["properties"]["membership"]["default"], json!(false));
        assert!(rendered["properties"]["search"].get("default").is_none());
        assert_eq!(search.outputs.schema_type, "array");
    }

    #[test]
    fn test_merge_request_url_and_auth() {
        let tools = tools();
        let mr = tools
            .iter()
            .find(|t| t.name == "gitlab_get_merge_request")
            .unwrap();

        assert_eq!(
            mr.tool_provider.url,
            "https://gitlab.example.com/api/v4/projects/${project_id}/merge_requests/${merge_request_iid}"
        );
        assert_eq!(mr.tool_provider.provider_id.as_deref(), Some("gitlab_get_mr"));
        assert_eq!(
            mr.tool_provider.auth,
            Some(AuthPlaceholder::personal_token("GITLAB_TOKEN", "PRIVATE-TOKEN"))
        );
        assert!(!serde_json::to_string(mr).unwrap().contains("gitlab-token-456"));
    }

    #[test]
    fn test_pipeline_status_enum() {
        let tools = tools();
        let pipelines = tools
            .iter()
            .find(|t| t.name == "gitlab_list_pipelines")
            .unwrap();
        let status = &pipelines.inputs.properties["status"];
        assert_eq!(status.enum_values.as_ref().map(Vec::len), Some(11));
        assert!(status.default.is_none());
    }

    #[test]
    fn test_factory_requires_personal_token() {
        let mut config = config();
        config.auth = AuthDescriptor::api_key("k", "X-Key");
        let err = GitLabProvider::create(config).err().unwrap();
        assert!(err.to_string().contains("requires personal_token auth"));
    }
}

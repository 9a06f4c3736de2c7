//! Jira REST v2 catalog

use crate::config::{AuthDescriptor, ProviderConfig};
use crate::error::Result;
use crate::manual::{env_var_prefix, AuthPlaceholder, Property, Schema, Tool, ToolProvider};
use crate::providers::provider::{HasProviderBase, Provider, ProviderBase};
use crate::providers::{require_base_url, wrong_auth};
use std::sync::Arc;

pub const PROVIDER_TYPE: &str = "jira";

const API_PATH: &str = "/rest/api/2";

/// Publishes Jira issue, project and comment operations
#[derive(Debug)]
pub struct JiraProvider {
    base: ProviderBase,
    auth: AuthPlaceholder,
}

impl JiraProvider {
    /// Build from configuration; requires a base URL and basic auth
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        require_base_url(config)?;
        match config.auth {
            AuthDescriptor::Basic { .. } => config.auth.validate()?,
            _ => return Err(wrong_auth(config, "basic")),
        }

        let prefix = env_var_prefix(&config.name);
        Ok(Self {
            base: ProviderBase::from_config(config),
            auth: AuthPlaceholder::basic(
                &format!("{}_USERNAME", prefix),
                &format!("{}_PASSWORD", prefix),
            ),
        })
    }

    /// Factory entry point
    pub fn create(config: ProviderConfig) -> Result<Arc<dyn Provider>> {
        Ok(Arc::new(Self::new(&config)?))
    }

    fn endpoint(&self, id: &str, path: &str, method: &str) -> ToolProvider {
        ToolProvider::http(
            id,
            format!("{}{}{}", self.base.base_url(), API_PATH, path),
            method,
            self.auth.clone(),
        )
    }
}

impl HasProviderBase for JiraProvider {
    fn base(&self) -> &ProviderBase {
        &self.base
    }

    fn list_capabilities(&self) -> Result<Vec<Tool>> {
        Ok(vec![
            Tool::new(
                "jira_search_issues",
                "Search for Jira issues using JQL (Jira Query Language)",
                self.endpoint("jira_search", "/search", "GET"),
            )
            .inputs(
                Schema::object()
                    .property(
                        "jql",
                        Property::string("JQL query string (e.g., 'project = PROJ AND status = Open')"),
                    )
                    .property(
                        "fields",
                        Property::array("Fields to return (e.g., ['summary', 'status', 'assignee'])"),
                    )
                    .property(
                        "maxResults",
                        Property::integer("Maximum number of results to return").with_default(50),
                    )
                    .property(
                        "startAt",
                        Property::integer("Starting index for pagination").with_default(0),
                    )
                    .required(["jql"]),
            )
            .outputs(Schema::object().described("Search results containing issues and metadata"))
            .tags(["jira", "search", "issues"]),
            Tool::new(
                "jira_get_issue",
                "Get detailed information about a specific Jira issue",
                self.endpoint("jira_get_issue", "/issue/${issueKey}", "GET"),
            )
            .inputs(
                Schema::object()
                    .property("issueKey", Property::string("Issue key (e.g., 'PROJ-123')"))
                    .property("fields", Property::array("Specific fields to return"))
                    .property(
                        "expand",
                        Property::array(
                            "Additional data to expand (e.g., ['changelog', 'renderedFields'])",
                        ),
                    )
                    .required(["issueKey"]),
            )
            .outputs(Schema::object().described("Complete issue details"))
            .tags(["jira", "issue", "get"]),
            Tool::new(
                "jira_create_issue",
                "Create a new Jira issue",
                self.endpoint("jira_create_issue", "/issue", "POST"),
            )
            .inputs(
                Schema::object()
                    .property("project", Property::object("Project key or ID"))
                    .property("summary", Property::string("Issue summary/title"))
                    .property("description", Property::string("Issue description"))
                    .property("issuetype", Property::object("Issue type (e.g., {'name': 'Bug'})"))
                    .property("priority", Property::object("Priority (e.g., {'name': 'High'})"))
                    .property("assignee", Property::object("Assignee account ID or name"))
                    .property("labels", Property::array("Labels to add to the issue"))
                    .required(["project", "summary", "issuetype"]),
            )
            .outputs(Schema::object().described("Created issue details including key and ID"))
            .tags(["jira", "issue", "create"]),
            Tool::new(
                "jira_update_issue",
                "Update an existing Jira issue",
                self.endpoint("jira_update_issue", "/issue/${issueKey}", "PUT"),
            )
            .inputs(
                Schema::object()
                    .property("issueKey", Property::string("Issue key to update"))
                    .property("fields", Property::object("Fields to update"))
                    .property("update", Property::object("Update operations (add, set, remove)"))
                    .required(["issueKey"]),
            )
            .outputs(Schema::object().described("Update confirmation"))
            .tags(["jira", "issue", "update"]),
            Tool::new(
                "jira_get_projects",
                "Get list of all Jira projects",
                self.endpoint("jira_get_projects", "/project", "GET"),
            )
            .inputs(
                Schema::object()
                    .property("expand", Property::array("Additional project data to retrieve"))
                    .property(
                        "recent",
                        Property::integer("Return only recent projects (number)"),
                    ),
            )
            .outputs(Schema::array().described("List of projects with details"))
            .tags(["jira", "projects", "list"]),
            Tool::new(
                "jira_add_comment",
                "Add a comment to a Jira issue",
                self.endpoint("jira_add_comment", "/issue/${issueKey}/comment", "POST"),
            )
            .inputs(
                Schema::object()
                    .property("issueKey", Property::string("Issue key to comment on"))
                    .property("body", Property::string("Comment text (supports Jira wiki markup)"))
                    .property("visibility", Property::object("Comment visibility restrictions"))
                    .required(["issueKey", "body"]),
            )
            .outputs(Schema::object().described("Created comment details"))
            .tags(["jira", "comment", "add"]),
            Tool::new(
                "jira_get_user_issues",
                "Get issues assigned to or reported by a specific user",
                self.endpoint("jira_user_issues", "/search", "GET"),
            )
            .inputs(
                Schema::object()
                    .property(
                        "username",
                        Property::string(
                            "Username or account ID (use 'currentUser()' for current user)",
                        ),
                    )
                    .property(
                        "filter",
                        Property::string("Filter type: 'assignee', 'reporter', or 'both'")
                            .with_default("assignee"),
                    )
                    .property(
                        "status",
                        Property::array("Status filters (e.g., ['Open', 'In Progress'])"),
                    )
                    .property(
                        "maxResults",
                        Property::integer("Maximum results to return").with_default(50),
                    )
                    .required(["username"]),
            )
            .outputs(Schema::object().described("Issues assigned to or reported by the user"))
            .tags(["jira", "user", "issues"]),
        ])
    }
}

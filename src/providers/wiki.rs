//! Confluence wiki catalog

use crate::config::{AuthDescriptor, ProviderConfig};
use crate::error::Result;
use crate::manual::{env_var_prefix, AuthPlaceholder, Property, Schema, Tool, ToolProvider};
use crate::providers::provider::{HasProviderBase, Provider, ProviderBase};
use crate::providers::{require_base_url, wrong_auth};
use std::sync::Arc;

pub const PROVIDER_TYPE: &str = "confluence";

const API_PATH: &str = "/rest/api";
const DEFAULT_KEY_LOCATION: &str = "Authorization";

/// Publishes Confluence page, space and attachment operations
#[derive(Debug)]
pub struct WikiProvider {
    base: ProviderBase,
    auth: AuthPlaceholder,
}

impl WikiProvider {
    /// Build from configuration; requires a base URL and api_key auth
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        require_base_url(config)?;
        let location = match &config.auth {
            AuthDescriptor::ApiKey { location, .. } => {
                config.auth.validate()?;
                if location.is_empty() {
                    DEFAULT_KEY_LOCATION.to_string()
                } else {
                    location.clone()
                }
            }
            _ => return Err(wrong_auth(config, "api_key")),
        };

        Ok(Self {
            base: ProviderBase::from_config(config),
            auth: AuthPlaceholder::api_key(
                &format!("{}_API_KEY", env_var_prefix(&config.name)),
                location,
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

impl HasProviderBase for WikiProvider {
    fn base(&self) -> &ProviderBase {
        &self.base
    }

    fn list_capabilities(&self) -> Result<Vec<Tool>> {
        Ok(vec![
            Tool::new(
                "wiki_search_pages",
                "Search for wiki pages by keyword or content",
                self.endpoint("wiki_search", "/content/search", "GET"),
            )
            .inputs(
                Schema::object()
                    .property(
                        "query",
                        Property::string("Search query (keywords, phrases, or CQL for advanced search)"),
                    )
                    .property("space", Property::string("Space key to limit search (optional)"))
                    .property(
                        "limit",
                        Property::integer("Maximum number of results (default: 25)").with_default(25),
                    )
                    .property(
                        "start",
                        Property::integer("Starting index for pagination (default: 0)").with_default(0),
                    )
                    .required(["query"]),
            )
            .outputs(Schema::object().described("Search results with pages and metadata"))
            .tags(["wiki", "search", "confluence"])
            .average_response_size(500),
            Tool::new(
                "wiki_get_page",
                "Get wiki page content by ID or title",
                self.endpoint("wiki_get_page", "/content/${pageId}", "GET"),
            )
            .inputs(
                Schema::object()
                    .property("pageId", Property::string("Page ID (numeric string)"))
                    .property("title", Property::string("Page title (alternative to pageId)"))
                    .property("spaceKey", Property::string("Space key (required when using title)"))
                    .property(
                        "expand",
                        Property::string(
                            "Comma-separated list of expansions (e.g., 'body.storage,version,ancestors')",
                        )
                        .with_default("body.storage,version,space"),
                    ),
            )
            .outputs(Schema::object().described("Page content and metadata"))
            .tags(["wiki", "page", "content"])
            .average_response_size(1000),
            Tool::new(
                "wiki_create_page",
                "Create a new wiki page",
                self.endpoint("wiki_create_page", "/content", "POST"),
            )
            .inputs(
                Schema::object()
                    .property("title", Property::string("Page title"))
                    .property("spaceKey", Property::string("Space key where the page will be created"))
                    .property("content", Property::string("Page content in storage format (HTML)"))
                    .property("parentId", Property::string("Parent page ID (optional)"))
                    .required(["title", "spaceKey", "content"]),
            )
            .outputs(Schema::object().described("Created page details including ID"))
            .tags(["wiki", "create", "page"]),
            Tool::new(
                "wiki_update_page",
                "Update an existing wiki page",
                self.endpoint("wiki_update_page", "/content/${pageId}", "PUT"),
            )
            .inputs(
                Schema::object()
                    .property("pageId", Property::string("Page ID to update"))
                    .property("title", Property::string("New page title"))
                    .property("content", Property::string("New page content in storage format (HTML)"))
                    .property(
                        "version",
                        Property::integer("Current version number (for conflict detection)"),
                    )
                    .property("message", Property::string("Version message/comment"))
                    .required(["pageId", "title", "content", "version"]),
            )
            .outputs(Schema::object().described("Updated page details"))
            .tags(["wiki", "update", "page"]),
            Tool::new(
                "wiki_list_spaces",
                "List all accessible wiki spaces",
                self.endpoint("wiki_list_spaces", "/space", "GET"),
            )
            .inputs(
                Schema::object()
                    .property(
                        "type",
                        Property::string("Space type filter (e.g., 'global', 'personal')")
                            .with_enum(["global", "personal", "all"])
                            .with_default("all"),
                    )
                    .property(
                        "status",
                        Property::string("Space status filter")
                            .with_enum(["current", "archived", "all"])
                            .with_default("current"),
                    )
                    .property(
                        "limit",
                        Property::integer("Maximum number of results").with_default(100),
                    ),
            )
            .outputs(Schema::object().described("List of spaces with metadata"))
            .tags(["wiki", "spaces", "list"]),
            Tool::new(
                "wiki_get_attachments",
                "Get attachments for a wiki page",
                self.endpoint(
                    "wiki_get_attachments",
                    "/content/${pageId}/child/attachment",
                    "GET",
                ),
            )
            .inputs(
                Schema::object()
                    .property("pageId", Property::string("Page ID"))
                    .property("filename", Property::string("Filter by filename (optional)"))
                    .property("mediaType", Property::string("Filter by media type (optional)"))
                    .required(["pageId"]),
            )
            .outputs(Schema::object().described("List of attachments with download links"))
            .tags(["wiki", "attachments", "files"]),
            Tool::new(
                "wiki_export_page",
                "Export wiki page in various formats",
                self.endpoint("wiki_export_page", "/content/${pageId}/export/${format}", "GET"),
            )
            .inputs(
                Schema::object()
                    .property("pageId", Property::string("Page ID to export"))
                    .property(
                        "format",
                        Property::string("Export format")
                            .with_enum(["pdf", "word", "html", "xml"])
                            .with_default("pdf"),
                    )
                    .required(["pageId"]),
            )
            .outputs(Schema::object().described("Export URL or binary content"))
            .tags(["wiki", "export", "download"]),
            Tool::new(
                "wiki_get_page_history",
                "Get version history of a wiki page",
                self.endpoint("wiki_get_history", "/content/${pageId}/version", "GET"),
            )
            .inputs(
                Schema::object()
                    .property("pageId", Property::string("Page ID"))
                    .property(
                        "limit",
                        Property::integer("Maximum number of versions to return").with_default(20),
                    )
                    .required(["pageId"]),
            )
            .outputs(Schema::object().described("List of page versions with metadata"))
            .tags(["wiki", "history", "versions"]),
        ])
    }
}

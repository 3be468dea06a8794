use serde::{Serialize, Serializer};
use thiserror::Error;
use ts_rs::TS;
use utoipa::{
    PartialSchema, ToSchema,
    openapi::{
        RefOr,
        schema::{ObjectBuilder, Schema, Type},
    },
};

/// Page
///
/// The client-side views a route can dispatch to. Serialized with the
/// component identifier the client router registers them under, as returned
/// by `component()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TS)]
#[ts(export, type = "\"UserComponent\" | \"AboutComponent\" | \"HomeComponent\"")]
pub enum Page {
    User,
    About,
    Home,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::User, Page::About, Page::Home];

    pub fn component(&self) -> &'static str {
        match self {
            Page::User => "UserComponent",
            Page::About => "AboutComponent",
            Page::Home => "HomeComponent",
        }
    }
}

impl Serialize for Page {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.component())
    }
}

impl PartialSchema for Page {
    fn schema() -> RefOr<Schema> {
        ObjectBuilder::new()
            .schema_type(Type::String)
            .enum_values(Some(Page::ALL.map(|page| page.component())))
            .into()
    }
}

impl ToSchema for Page {}

/// RouteEntry
///
/// One row of the route table. The empty path is the landing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS, ToSchema)]
#[ts(export)]
pub struct RouteEntry {
    pub path: String,
    pub component: Page,
}

impl RouteEntry {
    pub fn new(path: impl Into<String>, component: Page) -> Self {
        Self {
            path: path.into(),
            component,
        }
    }
}

/// The application's routes, in declaration order.
pub const APP_ROUTES: [(&str, Page); 3] = [
    ("", Page::User),
    ("about", Page::About),
    ("home", Page::Home),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("duplicate route path {0:?}")]
    DuplicatePath(String),
}

/// RouteTable
///
/// Static path-to-page dispatch table. Built once at startup and shared
/// read-only through the application state. Matching is exact: no wildcards,
/// no parameters, no redirects.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Builds a table, rejecting duplicate paths.
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, RouteTableError> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|seen| seen.path == entry.path) {
                return Err(RouteTableError::DuplicatePath(entry.path.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The table the client router is configured with.
    pub fn app() -> Self {
        let entries = APP_ROUTES
            .iter()
            .map(|&(path, component)| RouteEntry::new(path, component))
            .collect();
        Self::new(entries).expect("APP_ROUTES declares each path once")
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// The landing entry, registered under the empty path.
    pub fn default_entry(&self) -> Option<&RouteEntry> {
        self.entries.iter().find(|entry| entry.path.is_empty())
    }

    /// resolve
    ///
    /// Looks up the entry for `path`. Only `""` and `"/"` name the landing
    /// entry. Otherwise one leading and one trailing `/` are ignored, so
    /// `"/about"` resolves to `"about"`, while a path of separators alone
    /// (`"//"`) matches nothing. Unregistered paths return `None` and are left
    /// to the host's not-found handling.
    pub fn resolve(&self, path: &str) -> Option<&RouteEntry> {
        if path.is_empty() || path == "/" {
            return self.default_entry();
        }

        let path = path.strip_prefix('/').unwrap_or(path);
        let path = path.strip_suffix('/').unwrap_or(path);
        if path.is_empty() {
            return None;
        }
        self.entries.iter().find(|entry| entry.path == path)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::app()
    }
}

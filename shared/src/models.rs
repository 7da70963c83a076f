//! Data models for the APIBoy application
//!
//! These are the documents persisted in the document store. Every mutable
//! entity carries its lifecycle as optional [`Event`]s; a present `deleted`
//! event marks the record as soft-deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A created, updated or deleted event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub at: DateTime<Utc>,
    /// Id of the user who caused the event
    pub by: String,
}

impl Event {
    /// Event happening now, caused by `user_id`
    pub fn now(user_id: impl Into<String>) -> Self {
        Self {
            at: Utc::now(),
            by: user_id.into(),
        }
    }
}

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Elevated role, may act on any account
    Admin,
    #[default]
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    #[inline]
    pub fn is_elevated(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP verb of a saved request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestType {
    Get,
    Post,
    Delete,
    Head,
    Options,
    Put,
    Patch,
}

impl RequestType {
    pub const ALL: [RequestType; 7] = [
        RequestType::Get,
        RequestType::Post,
        RequestType::Delete,
        RequestType::Head,
        RequestType::Options,
        RequestType::Put,
        RequestType::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Get => "GET",
            RequestType::Post => "POST",
            RequestType::Delete => "DELETE",
            RequestType::Head => "HEAD",
            RequestType::Options => "OPTIONS",
            RequestType::Put => "PUT",
            RequestType::Patch => "PATCH",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = String;

    /// Verbs are matched exactly, `get` is not a valid request type
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown request type: {}", s))
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Password hash, never the plaintext
    pub password: String,
    pub role: UserRole,
    /// Pending password reset code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_code: Option<String>,
    pub created: Option<Event>,
    pub updated: Option<Event>,
    pub deleted: Option<Event>,
}

/// Project owning folders, requests and environments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub created: Option<Event>,
    pub updated: Option<Event>,
    pub deleted: Option<Event>,
}

/// Membership relation between a project and a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectUser {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
}

/// Folder grouping requests inside a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub project_id: String,
    pub created: Option<Event>,
    pub updated: Option<Event>,
    pub deleted: Option<Event>,
}

/// Saved HTTP request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: String,
    pub name: String,
    pub folder_id: String,
    pub project_id: String,
    #[serde(rename = "type")]
    pub request_type: Option<RequestType>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: String,
    pub created: Option<Event>,
    pub updated: Option<Event>,
    pub deleted: Option<Event>,
}

/// Named set of variables for a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub variables: HashMap<String, String>,
    pub project_id: String,
    pub created: Option<Event>,
    pub updated: Option<Event>,
    pub deleted: Option<Event>,
}

/// Server-side record of an issued session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub created: Option<Event>,
}

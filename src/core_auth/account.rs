use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Account-wide transfer rights. There is no per-directory permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    #[default]
    Full,
    DownloadOnly,
    UploadOnly,
}

impl Permission {
    pub fn can_upload(&self) -> bool {
        !matches!(self, Permission::DownloadOnly)
    }

    pub fn can_download(&self) -> bool {
        !matches!(self, Permission::UploadOnly)
    }
}

#[derive(Debug, Clone)]
pub struct Account {
    username: String,
    password: String,
    home: PathBuf,
    permission: Permission,
}

impl Account {
    pub fn new(username: &str, password: &str, home: PathBuf, permission: Permission) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            home,
            permission,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn stored_password(&self) -> &str {
        &self.password
    }

    pub fn home(&self) -> &PathBuf {
        &self.home
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.eq_ignore_ascii_case("anonymous")
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub user_group: UserGroup,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserGroup {
    #[default]
    Student,
    Parent,
    Teacher,
    SchoolAdmin,
    SystemAdmin,
}

impl User {
    pub const COLLECTION: &'static str = "users";
}

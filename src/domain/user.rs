use serde::{Deserialize, Serialize};

pub const UNKNOWN_USER: &str = "Unknown User";

pub const USER_COLORS: [&str; 13] = [
    "#FF5733", "#33FF57", "#3357FF", "#FF33A1", "#FFBD33", "#FF3380", "#33FFD2", "#7D33FF",
    "#FFB533", "#33FF57", "#3383FF", "#FF3357", "#57FF33",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub available: bool,
}

/// Lookups over the loaded user list. Colors follow list position, so reordering users recolors them.
#[derive(Debug, Clone, Copy)]
pub struct UserDirectory<'a> {
    users: &'a [User],
}

impl<'a> UserDirectory<'a> {
    pub fn new(users: &'a [User]) -> Self {
        Self { users }
    }

    pub fn position(&self, user_id: &str) -> Option<usize> {
        self.users.iter().position(|user| user.id == user_id)
    }

    pub fn name(&self, user_id: &str) -> &'a str {
        self.users
            .iter()
            .find(|user| user.id == user_id)
            .map(|user| user.name.as_str())
            .unwrap_or(UNKNOWN_USER)
    }

    pub fn color(&self, user_id: &str) -> Option<&'static str> {
        self.position(user_id)
            .map(|index| USER_COLORS[index % USER_COLORS.len()])
    }
}

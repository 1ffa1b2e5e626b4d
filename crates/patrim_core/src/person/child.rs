use serde::{Deserialize, Serialize};

fn default_age_of_university() -> i32 {
    18
}

fn default_age_of_independence() -> i32 {
    24
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    #[serde(default = "default_age_of_university")]
    pub age_of_university: i32,
    /// Leaves the fiscal household the year this age is reached
    #[serde(default = "default_age_of_independence")]
    pub age_of_independence: i32,
}

impl Default for Child {
    fn default() -> Self {
        Self {
            age_of_university: default_age_of_university(),
            age_of_independence: default_age_of_independence(),
        }
    }
}

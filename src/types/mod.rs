mod models;
mod role;

pub use models::*;
pub use role::{HackathonRole, SystemRole, TeamRole};

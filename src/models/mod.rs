pub mod engineer;
pub mod feedback;
pub mod page;
pub mod search;
pub mod shortlist;
pub mod topic;
pub mod user;

pub use engineer::*;
pub use feedback::*;
pub use page::*;
pub use search::*;
pub use shortlist::*;
pub use topic::*;
pub use user::*;

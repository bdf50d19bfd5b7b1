pub mod assignment_repo;
pub mod project_repo;
pub mod review_repo;
pub mod task_repo;
pub mod user_repo;

pub use assignment_repo::AssignmentRepo;
pub use project_repo::ProjectRepo;
pub use review_repo::ReviewRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;

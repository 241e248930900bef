pub mod org;
pub mod project;
pub mod rbac;
pub mod task;

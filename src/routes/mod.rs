pub mod health;
pub mod rbac;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::authz::{self, EvaluationContext};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskAssignment {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub org_id: Uuid,
    pub parent_id: Option<Uuid>,
    #[schema(example = "Define launch checklist")]
    pub title: String,
    #[schema(example = "In Progress")]
    pub status_name: String,
    #[schema(example = "high")]
    pub priority: String,
    pub due_date: Option<DateTime<Utc>>,
    pub position: i32,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub assignments: Vec<TaskAssignment>,
}

impl Task {
    pub fn is_assigned_to(&self, user_id: Uuid) -> bool {
        self.assignments.iter().any(|a| a.user_id == user_id)
    }

    /// Edit check where any assignee counts as "assigned to me".
    pub fn can_edit(&self, ctx: &EvaluationContext) -> bool {
        authz::can_edit_task(
            ctx.org_role,
            ctx.project_role,
            self.assignee_for(ctx.user_id),
            ctx.user_id,
        )
    }

    pub fn can_delete(&self, ctx: &EvaluationContext) -> bool {
        authz::can_delete_task(
            ctx.org_role,
            ctx.project_role,
            self.assignee_for(ctx.user_id),
            ctx.user_id,
        )
    }

    // The single-assignee rule only cares whether the current user is among
    // the assignees, so collapse the list to that user or nothing.
    fn assignee_for(&self, user_id: Uuid) -> Option<Uuid> {
        self.is_assigned_to(user_id).then_some(user_id)
    }
}

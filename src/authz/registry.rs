use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use crate::models::rbac::{OrgPermission, OrgRole, ProjectPermission, ProjectRole};

static EMPTY_ORG: BTreeSet<OrgPermission> = BTreeSet::new();
static EMPTY_PROJECT: BTreeSet<ProjectPermission> = BTreeSet::new();

/// Fixed role -> permission tables for both scopes.
///
/// Built once per process and never mutated, so a `&'static RoleRegistry`
/// can be shared by any number of concurrent evaluations.
#[derive(Debug)]
pub struct RoleRegistry {
    org: HashMap<OrgRole, BTreeSet<OrgPermission>>,
    project: HashMap<ProjectRole, BTreeSet<ProjectPermission>>,
}

impl RoleRegistry {
    pub fn global() -> &'static RoleRegistry {
        static REGISTRY: OnceLock<RoleRegistry> = OnceLock::new();
        REGISTRY.get_or_init(RoleRegistry::build)
    }

    fn build() -> Self {
        let org = OrgRole::ALL
            .into_iter()
            .map(|role| (role, org_grants(role).iter().copied().collect()))
            .collect();
        let project = ProjectRole::ALL
            .into_iter()
            .map(|role| (role, project_grants(role).iter().copied().collect()))
            .collect();

        Self { org, project }
    }

    pub fn org_permissions(&self, role: OrgRole) -> &BTreeSet<OrgPermission> {
        self.org.get(&role).unwrap_or(&EMPTY_ORG)
    }

    pub fn project_permissions(&self, role: ProjectRole) -> &BTreeSet<ProjectPermission> {
        self.project.get(&role).unwrap_or(&EMPTY_PROJECT)
    }
}

fn org_grants(role: OrgRole) -> &'static [OrgPermission] {
    use OrgPermission::*;

    match role {
        OrgRole::OrgAdmin => &OrgPermission::ALL,
        OrgRole::ProjAdmin => &[ManageProjects, ManageTeams],
        OrgRole::Member => &[],
    }
}

fn project_grants(role: ProjectRole) -> &'static [ProjectPermission] {
    use ProjectPermission::*;

    match role {
        ProjectRole::Owner => &ProjectPermission::ALL,
        ProjectRole::Admin => &[
            EditProject,
            ManageMembers,
            AssignRoles,
            CreateTask,
            EditAnyTask,
            DeleteAnyTask,
            AssignTask,
            ChangeStatus,
            PostComment,
            LogTime,
            ManageAttachments,
            View,
        ],
        ProjectRole::ProjectManager => &[
            CreateTask,
            EditAnyTask,
            DeleteAnyTask,
            AssignTask,
            ChangeStatus,
            PostComment,
            LogTime,
            ManageAttachments,
            View,
        ],
        ProjectRole::TeamMember => &[
            CreateTask,
            EditAssignedTask,
            DeleteAssignedTask,
            ChangeStatus,
            PostComment,
            LogTime,
            ManageAttachments,
            View,
        ],
        ProjectRole::Viewer => &[View],
    }
}

pub fn permissions_for_org_role(role: OrgRole) -> &'static BTreeSet<OrgPermission> {
    RoleRegistry::global().org_permissions(role)
}

pub fn permissions_for_project_role(role: ProjectRole) -> &'static BTreeSet<ProjectPermission> {
    RoleRegistry::global().project_permissions(role)
}

/// String-keyed lookup for callers holding a raw role name. Unknown names get
/// the empty set.
pub fn permissions_for_org_role_name(name: &str) -> &'static BTreeSet<OrgPermission> {
    OrgRole::parse(name)
        .map(permissions_for_org_role)
        .unwrap_or(&EMPTY_ORG)
}

pub fn permissions_for_project_role_name(name: &str) -> &'static BTreeSet<ProjectPermission> {
    ProjectRole::parse(name)
        .map(permissions_for_project_role)
        .unwrap_or(&EMPTY_PROJECT)
}

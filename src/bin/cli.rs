use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use dotenvy::dotenv;
use uuid::Uuid;

use taskboard_rbac::authz::{self, EvaluationContext, GateRequest};
use taskboard_rbac::jwt::JwtConfig;
use taskboard_rbac::models::project::UserProjectMembership;
use taskboard_rbac::models::rbac::{OrgPermission, OrgRole, ProjectPermission, ProjectRole};

#[derive(Parser, Debug)]
#[command(author, version, about = "taskboard permission tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print both role -> permission tables
    Roles,
    /// Evaluate a project and/or org permission for a pair of roles
    Check {
        #[arg(long)]
        org_role: Option<OrgRole>,
        #[arg(long)]
        project_role: Option<ProjectRole>,
        #[arg(long)]
        permission: Option<ProjectPermission>,
        #[arg(long)]
        org_permission: Option<OrgPermission>,
    },
    /// Decide whether a user may edit or delete a task
    Task {
        #[arg(long)]
        org_role: Option<OrgRole>,
        #[arg(long)]
        project_role: Option<ProjectRole>,
        /// Task assignee; omit for an unassigned task
        #[arg(long)]
        assignee: Option<Uuid>,
        /// Acting user
        #[arg(long)]
        user: Uuid,
        #[arg(long, value_enum, default_value_t = TaskAction::Edit)]
        action: TaskAction,
    },
    /// Mint a development token signed with JWT_SECRET
    Token {
        #[arg(long)]
        user: Uuid,
        #[arg(long, requires = "org_role")]
        org_id: Option<Uuid>,
        #[arg(long, requires = "org_id")]
        org_role: Option<OrgRole>,
        /// Project membership as `<project_id>=<role>`; repeatable
        #[arg(long = "project", value_parser = parse_project_membership)]
        projects: Vec<UserProjectMembership>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TaskAction {
    Edit,
    Delete,
}

fn main() -> anyhow::Result<()> {
    // Try to load env from CWD, then fall back to the crate-local `.env`.
    if dotenv().is_err() {
        let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(crate_env);
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Roles => print_roles(),
        Commands::Check {
            org_role,
            project_role,
            permission,
            org_permission,
        } => {
            let ctx = EvaluationContext {
                user_id: Uuid::nil(),
                org_role,
                project_role,
            };
            let request = GateRequest {
                permission,
                org_permission,
            };
            print_decision(authz::evaluate(&request, &ctx));
        }
        Commands::Task {
            org_role,
            project_role,
            assignee,
            user,
            action,
        } => {
            let allowed = match action {
                TaskAction::Edit => authz::can_edit_task(org_role, project_role, assignee, user),
                TaskAction::Delete => authz::can_delete_task(org_role, project_role, assignee, user),
            };
            print_decision(allowed);
        }
        Commands::Token {
            user,
            org_id,
            org_role,
            projects,
        } => {
            let jwt = JwtConfig::from_env().context("cannot sign tokens")?;
            let org = org_id.zip(org_role);
            println!("{}", jwt.encode(user, org, &projects)?);
        }
    }

    Ok(())
}

fn parse_project_membership(raw: &str) -> Result<UserProjectMembership, String> {
    let (project_id, role) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <project_id>=<role>, got '{}'", raw))?;
    let project_id = project_id.parse::<Uuid>().map_err(|err| err.to_string())?;
    let role = role.parse::<ProjectRole>().map_err(|err| err.to_string())?;

    Ok(UserProjectMembership {
        project_id,
        role: role.as_str().to_string(),
    })
}

fn print_roles() {
    println!("{:<16} {}", "Org role", "Permissions");
    for role in OrgRole::ALL {
        let perms: Vec<_> = authz::permissions_for_org_role(role).iter().map(|p| p.as_str()).collect();
        println!("{:<16} {}", role, display_list(&perms));
    }

    println!();
    println!("{:<16} {}", "Project role", "Permissions");
    for role in ProjectRole::ALL {
        let perms: Vec<_> = authz::permissions_for_project_role(role).iter().map(|p| p.as_str()).collect();
        println!("{:<16} {}", role, display_list(&perms));
    }
}

fn display_list(items: &[&str]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn print_decision(allowed: bool) {
    println!("{}", if allowed { "allow" } else { "deny" });
}

//!
//! warden console
//! --------------
//! Interactive front end over the core: login/register, then the management
//! surfaces the session's role is entitled to. This module is presentation
//! only; every mutation goes through the registry and provider boundary.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::error::AppError;
use crate::identity::{view_for, AuthProvider, LocalAuthProvider, LoginRequest, ManagementView};
use crate::roles::{PermissionSet, RolePatch, RoleRegistry};
use crate::seed;
use crate::users::{UserPatch, UserRegistry, UserStatus};

pub mod outputformatter;
pub use outputformatter::print_table;

const HELP: &str = "Commands:\n  login <username> <password>        authenticate and open the dashboard\n  logout                             end the current session\n  register <user> <pass> <email> <role>   create an account (no auto-login)\n  logins                             show the saved default logins\n  whoami                             show the current session\n  users                              list users\n  user set <id> role <name>          change a user's role\n  user set <id> status <Active|Inactive>  change a user's status\n  user rm <id>                       delete a user\n  roles                              list roles with granted permissions\n  role add <name> [read,write,...]   create a role\n  role set <id> name <name>          rename a role\n  role set <id> perms [read,...]     replace a role's permission flags\n  role rm <id>                       delete a role\n  help                               show this help\n  quit | exit                        leave the console";

/// Run the interactive console until EOF or quit.
pub fn run_console(users: UserRegistry, roles: RoleRegistry, provider: LocalAuthProvider) -> Result<()> {
    println!("type 'help' for commands; default logins are listed by 'logins'");
    let stdin = io::stdin();
    loop {
        prompt(&provider);
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 { break; }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() { continue; }
        match dispatch(&tokens, &users, &roles, &provider) {
            Outcome::Continue => {}
            Outcome::Quit => break,
        }
    }
    Ok(())
}

enum Outcome {
    Continue,
    Quit,
}

fn prompt(provider: &LocalAuthProvider) {
    match provider.current() {
        Some(u) => print!("{}> ", u.username),
        None => print!("warden> "),
    }
    let _ = io::stdout().flush();
}

fn dispatch(tokens: &[&str], users: &UserRegistry, roles: &RoleRegistry, provider: &LocalAuthProvider) -> Outcome {
    match tokens {
        ["quit"] | ["exit"] => return Outcome::Quit,
        ["help"] => println!("{}", HELP),
        ["logins"] => print_saved_logins(),
        ["login", username, password] => {
            let req = LoginRequest { username: (*username).to_string(), password: (*password).to_string() };
            match provider.login(&req) {
                Ok(user) => {
                    println!("welcome, {}!", user.username);
                    describe_view(&user.role);
                }
                Err(e) => report(&e),
            }
        }
        ["logout"] => {
            if provider.logout() { println!("logged out"); } else { println!("no active session"); }
        }
        ["register", username, password, email, role] => {
            match provider.register(username, password, email, role) {
                Ok(user) => println!("registered '{}'; log in to continue", user.username),
                Err(e) => report(&e),
            }
        }
        ["whoami"] => match provider.current() {
            Some(u) => println!("{} (role: {}, status: {:?})", u.username, u.role, u.status),
            None => println!("not logged in"),
        },
        ["users"] => {
            if gate(provider, Surface::Users) { print_users(users); }
        }
        ["user", "set", id, "role", role] => {
            if gate(provider, Surface::Users) {
                with_id(id, |id| {
                    users.update(id, UserPatch { role: Some((*role).to_string()), ..Default::default() })
                        .map(|u| println!("user '{}' role -> {}", u.username, u.role))
                });
            }
        }
        ["user", "set", id, "status", status] => {
            if gate(provider, Surface::Users) {
                let Some(status) = parse_status(status) else {
                    println!("status must be Active or Inactive");
                    return Outcome::Continue;
                };
                with_id(id, |id| {
                    users.update(id, UserPatch { status: Some(status), ..Default::default() })
                        .map(|u| println!("user '{}' status -> {:?}", u.username, u.status))
                });
            }
        }
        ["user", "rm", id] => {
            if gate(provider, Surface::Users) {
                with_id(id, |id| {
                    users.delete(id).map(|removed| {
                        if removed { println!("user removed"); } else { println!("no user with that id"); }
                    })
                });
            }
        }
        ["roles"] => {
            if gate(provider, Surface::Roles) { print_roles(roles); }
        }
        ["role", "add", name] => {
            if gate(provider, Surface::Roles) {
                with_result(roles.create(name, PermissionSet::default())
                    .map(|r| println!("role '{}' created with id {}", r.name, r.id)));
            }
        }
        ["role", "add", name, perms] => {
            if gate(provider, Surface::Roles) {
                match parse_permissions(perms) {
                    Some(p) => with_result(roles.create(name, p)
                        .map(|r| println!("role '{}' created with id {}", r.name, r.id))),
                    None => println!("permissions must be a comma list of read,write,delete,admin"),
                }
            }
        }
        ["role", "set", id, "name", name] => {
            if gate(provider, Surface::Roles) {
                with_id(id, |id| {
                    roles.update(id, RolePatch { name: Some((*name).to_string()), ..Default::default() })
                        .map(|r| println!("role {} renamed to '{}'", r.id, r.name))
                });
            }
        }
        ["role", "set", id, "perms", perms] => {
            if gate(provider, Surface::Roles) {
                let Some(p) = parse_permissions(perms) else {
                    println!("permissions must be a comma list of read,write,delete,admin");
                    return Outcome::Continue;
                };
                with_id(id, |id| {
                    roles.update(id, RolePatch { permissions: Some(p), ..Default::default() })
                        .map(|r| println!("role '{}' now grants [{}]", r.name, r.permissions.granted_display()))
                });
            }
        }
        ["role", "rm", id] => {
            if gate(provider, Surface::Roles) {
                with_id(id, |id| {
                    roles.delete(id).map(|removed| {
                        if removed { println!("role removed"); } else { println!("no role with that id"); }
                    })
                });
            }
        }
        _ => println!("unrecognized command; type 'help'"),
    }
    Outcome::Continue
}

/// The two gated surfaces of the dashboard.
#[derive(Clone, Copy)]
enum Surface {
    Users,
    Roles,
}

fn gate(provider: &LocalAuthProvider, surface: Surface) -> bool {
    let Some(user) = provider.current() else {
        println!("log in first");
        return false;
    };
    let view = view_for(&user.role);
    let allowed = match surface {
        Surface::Users => matches!(view, ManagementView::Full | ManagementView::UsersOnly),
        Surface::Roles => matches!(view, ManagementView::Full),
    };
    if !allowed {
        let what = match surface { Surface::Users => "users", Surface::Roles => "roles" };
        println!("access denied: you do not have permission to manage {}", what);
    }
    allowed
}

fn describe_view(role: &str) {
    match view_for(role) {
        ManagementView::Full => println!("dashboard: user management and role management"),
        ManagementView::UsersOnly => println!("dashboard: user management"),
        ManagementView::Denied => println!("access denied: you do not have permission to access this dashboard"),
    }
}

fn report(e: &AppError) {
    println!("error: {}", e.message());
    if !e.is_recoverable() {
        eprintln!("{}", e);
    }
}

fn with_id<F>(raw: &str, f: F)
where
    F: FnOnce(u64) -> Result<(), AppError>,
{
    match raw.parse::<u64>() {
        Ok(id) => with_result(f(id)),
        Err(_) => println!("'{}' is not an id", raw),
    }
}

fn with_result(res: Result<(), AppError>) {
    if let Err(e) = res { report(&e); }
}

fn parse_status(raw: &str) -> Option<UserStatus> {
    match raw {
        "Active" => Some(UserStatus::Active),
        "Inactive" => Some(UserStatus::Inactive),
        _ => None,
    }
}

fn parse_permissions(raw: &str) -> Option<PermissionSet> {
    let mut p = PermissionSet::default();
    for flag in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match flag {
            "read" => p.read = true,
            "write" => p.write = true,
            "delete" => p.delete = true,
            "admin" => p.admin = true,
            _ => return None,
        }
    }
    Some(p)
}

fn print_users(users: &UserRegistry) {
    let list = users.list();
    let rows: Vec<Vec<String>> = list
        .iter()
        .map(|u| vec![
            u.id.to_string(),
            u.username.clone(),
            u.email.clone(),
            u.role.clone(),
            format!("{:?}", u.status),
        ])
        .collect();
    if !print_table(&["id", "username", "email", "role", "status"], &rows) {
        println!("{}", serde_json::to_string_pretty(&list).unwrap_or_default());
    }
}

fn print_roles(roles: &RoleRegistry) {
    let list = roles.list();
    let rows: Vec<Vec<String>> = list
        .iter()
        .map(|r| vec![r.id.to_string(), r.name.clone(), r.permissions.granted_display()])
        .collect();
    if !print_table(&["id", "name", "permissions"], &rows) {
        println!("{}", serde_json::to_string_pretty(&list).unwrap_or_default());
    }
}

fn print_saved_logins() {
    let rows: Vec<Vec<String>> = seed::default_users()
        .iter()
        .map(|u| vec![u.username.clone(), u.password.clone(), u.email.clone(), u.role.clone()])
        .collect();
    let _ = print_table(&["username", "password", "email", "role"], &rows);
}

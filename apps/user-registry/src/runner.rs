//! Batch, manual-entry and listing flows driven by the CLI

use domain_users::{
    Console, NewUser, PersistenceStep, UserManager, UserRepository, UserResponse,
};
use eyre::{Result, WrapErr};
use std::io::BufRead;
use tracing::info;

/// The fixed demo batch: one valid user, one invalid, one duplicate email
pub fn demo_candidates() -> Vec<NewUser> {
    vec![
        NewUser::new("Иван Иванов", "ivan@example.com", "Password123", 25),
        NewUser::new("Петр Петров", "неправильный-email", "pass", 17),
        NewUser::new("Сидор Сидоров", "ivan@example.com", "Password456", 30),
    ]
}

/// Submit one candidate; handled rejections are already reported by the
/// manager, anything else stops the caller.
fn submit<R, P>(manager: &mut UserManager<R, P>, candidate: NewUser) -> Result<()>
where
    R: UserRepository,
    P: PersistenceStep,
{
    match manager.add_user(candidate) {
        Ok(_) => Ok(()),
        Err(err) if err.is_handled() => Ok(()),
        Err(err) => Err(err).wrap_err("Stopped on an unexpected error"),
    }
}

pub fn run_batch<R, P>(manager: &mut UserManager<R, P>, candidates: Vec<NewUser>) -> Result<()>
where
    R: UserRepository,
    P: PersistenceStep,
{
    info!(count = candidates.len(), "Running user batch");

    for candidate in candidates {
        manager
            .console()
            .line(format!("\nAdding user {} <{}>", candidate.name, candidate.email));
        submit(manager, candidate)?;
    }

    Ok(())
}

fn read_field<B: BufRead>(input: &mut B, console: &Console, label: &str) -> Result<String> {
    console.prompt(format!("{}: ", label));
    let mut buf = String::new();
    input
        .read_line(&mut buf)
        .wrap_err_with(|| format!("Failed to read {}", label.to_lowercase()))?;
    Ok(buf.trim_end_matches(['\r', '\n']).to_string())
}

/// Prompt for the four user fields.
///
/// Returns `None` when the age is not an integer; the format error is
/// printed and only this entry is abandoned.
pub fn prompt_user<B: BufRead>(input: &mut B, console: &Console) -> Result<Option<NewUser>> {
    console.line("\nEnter a new user:");
    let name = read_field(input, console, "Name")?;
    let email = read_field(input, console, "Email")?;
    let password = read_field(input, console, "Password")?;
    let age_raw = read_field(input, console, "Age")?;

    match age_raw.trim().parse::<i32>() {
        Ok(age) => Ok(Some(NewUser::new(name, email, password, age))),
        Err(e) => {
            console.line(format!("Invalid age format '{}': {}", age_raw.trim(), e));
            Ok(None)
        }
    }
}

pub fn manual_entry<R, P, B>(manager: &mut UserManager<R, P>, input: &mut B) -> Result<()>
where
    R: UserRepository,
    P: PersistenceStep,
    B: BufRead,
{
    let console = manager.console().clone();
    match prompt_user(input, &console)? {
        Some(candidate) => submit(manager, candidate),
        None => Ok(()),
    }
}

pub fn print_listing<R, P>(manager: &UserManager<R, P>, json: bool) -> Result<()>
where
    R: UserRepository,
    P: PersistenceStep,
{
    let users = manager.list_users()?;
    let console = manager.console();

    if json {
        let listing: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
        console.line(serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    console.line("\nUsers:");
    if users.is_empty() {
        console.line("  (none)");
    }
    for user in &users {
        console.line(format!("  {}", user));
    }

    Ok(())
}

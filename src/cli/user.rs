use crate::services::users::{self, NewUser, UpdateUser};
use crate::{Config, Database};
use anyhow::Result;
use std::path::Path;

use super::UserCommand;

pub async fn run(config_path: &Path, command: UserCommand) -> Result<()> {
    let config = Config::load(config_path)?;
    let db = Database::open(&config.database.path)?;
    db.migrate()?;

    match command {
        UserCommand::Add {
            email,
            name,
            role,
            password,
        } => {
            let password = match password {
                Some(p) => p,
                None => {
                    let p = rpassword::prompt_password("Password: ")?;
                    let p_confirm = rpassword::prompt_password("Confirm password: ")?;
                    if p != p_confirm {
                        anyhow::bail!("Passwords do not match");
                    }
                    p
                }
            };

            let role = role.parse().map_err(|_| anyhow::anyhow!("Invalid role"))?;
            users::create_user(
                &db,
                NewUser {
                    email: email.clone(),
                    name,
                    password,
                    role: Some(role),
                    ..NewUser::default()
                },
            )?;
            tracing::info!("User '{}' created", email);
        }
        UserCommand::List => {
            let listed = users::list_users(&db)?;

            println!("{:<30} {:<20} {:<10}", "EMAIL", "NAME", "ROLE");
            println!("{}", "-".repeat(60));
            for user in listed {
                println!("{:<30} {:<20} {:<10}", user.email, user.name, user.role);
            }
        }
        UserCommand::Remove { email } => {
            match users::get_user_by_email(&db, &email)? {
                Some(user) => {
                    users::delete_user(&db, user.id)?;
                    tracing::info!("User '{}' removed", email);
                }
                None => tracing::warn!("User '{}' not found", email),
            }
        }
        UserCommand::Passwd { email } => {
            let password = rpassword::prompt_password("New password: ")?;
            let password_confirm = rpassword::prompt_password("Confirm password: ")?;

            if password != password_confirm {
                anyhow::bail!("Passwords do not match");
            }

            let user = users::get_user_by_email(&db, &email)?
                .ok_or_else(|| anyhow::anyhow!("User '{}' not found", email))?;
            users::update_user(
                &db,
                user.id,
                UpdateUser {
                    password: Some(password),
                    ..UpdateUser::default()
                },
            )?;
            tracing::info!("Password updated for '{}'", email);
        }
    }

    Ok(())
}

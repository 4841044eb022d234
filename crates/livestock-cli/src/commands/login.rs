//! Login and logout commands.

use livestock_core::{Database, SessionManager};

use crate::cli::args::LoginArgs;
use crate::config::Config;
use crate::storage::FileStorage;

pub fn execute(args: LoginArgs, db: &Database, config: &Config) -> anyhow::Result<()> {
    let mut session = SessionManager::new(FileStorage::load(&config.session_path)?);
    if !session.login(db, args.email.trim(), &args.password)? {
        anyhow::bail!("Invalid email or password");
    }
    session.storage().save()?;

    if let Some(user) = session.current_user() {
        println!("Signed in as {} ({})", user.name, user.role);
    }
    Ok(())
}

pub fn logout(config: &Config) -> anyhow::Result<()> {
    let mut session = SessionManager::new(FileStorage::load(&config.session_path)?);
    session.logout();
    session.storage().save()?;
    println!("Signed out");
    Ok(())
}

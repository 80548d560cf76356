use notekeeper_core::session::{sign_in, sign_out, SessionPersistence};

use crate::auth::{resolve_profile_name, KeyringSessionStore};
use crate::commands::common::format_timestamp;
use crate::error::CliError;

pub fn run_login(token: &str, profile: Option<&str>) -> Result<(), CliError> {
    let profile_name = resolve_profile_name(profile);
    let store = KeyringSessionStore::new(&profile_name);
    sign_in(&store, token)?;
    println!("Signed in profile '{profile_name}'");
    Ok(())
}

pub fn run_logout(profile: Option<&str>) -> Result<(), CliError> {
    let profile_name = resolve_profile_name(profile);
    let store = KeyringSessionStore::new(&profile_name);
    if sign_out(&store)? {
        println!("Signed out profile '{profile_name}'");
    } else {
        println!("Profile '{profile_name}' was not signed in");
    }
    Ok(())
}

pub fn run_status(profile: Option<&str>) -> Result<(), CliError> {
    let profile_name = resolve_profile_name(profile);
    let store = KeyringSessionStore::new(&profile_name);
    match store.load_session()? {
        Some(session) => {
            let stored_at = format_timestamp(session.stored_at);
            println!("Profile '{profile_name}' is signed in (since {stored_at})");
        }
        None => println!("Profile '{profile_name}' is not signed in."),
    }
    Ok(())
}

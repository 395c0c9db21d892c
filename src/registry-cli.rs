//! Operator tooling for the voting registry: digest voter tokens the same way
//! the ledger does, and produce the admin password hash for `Rocket.toml`.

use clap::{Arg, ArgAction, ArgMatches, Command};

use voting_registry::model::{
    admin::{AdminCore, AdminCredentials},
    token::TokenDigest,
};

const PROGRAM_NAME: &str = "registry-cli";

const ABOUT_TEXT: &str = "Operator tooling for the voting registry.

EXIT CODES:
     0: Success.
     1: Invalid input.";

const DIGEST: &str = "digest";
const HASH_PASSWORD: &str = "hash-password";
const TOKEN: &str = "TOKEN";
const USERNAME: &str = "USERNAME";
const PASSWORD: &str = "PASSWORD";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .subcommand_required(true)
        .subcommand(
            Command::new(DIGEST)
                .about("Print the hex digest under which a voter token is stored")
                .arg(
                    Arg::new(TOKEN)
                        .help("The raw voter token")
                        .action(ArgAction::Set)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(HASH_PASSWORD)
                .about("Print admin config entries for the given credentials")
                .arg(
                    Arg::new(USERNAME)
                        .help("The admin username")
                        .action(ArgAction::Set)
                        .required(true),
                )
                .arg(
                    Arg::new(PASSWORD)
                        .help("The admin password, at least 8 characters")
                        .action(ArgAction::Set)
                        .required(true),
                ),
        )
}

/// Digest a raw token, refusing blank ones since the server would too.
fn digest(token: &str) -> Result<String, String> {
    if token.trim().is_empty() {
        return Err("Token must not be blank".to_string());
    }
    Ok(TokenDigest::of(token).to_string())
}

/// Hash admin credentials into the `Rocket.toml` entries that configure them.
fn hash_password(username: &str, password: &str) -> Result<String, String> {
    let admin = AdminCore::try_from(AdminCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
    .map_err(|e| e.to_string())?;
    Ok(format!(
        "admin_username = \"{}\"\nadmin_password_hash = \"{}\"",
        admin.username, admin.password_hash
    ))
}

/// Run the chosen subcommand, report the result, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    // Required arguments are guaranteed to be present.
    let result = match args.subcommand() {
        Some((DIGEST, sub)) => digest(sub.get_one::<String>(TOKEN).unwrap()),
        Some((HASH_PASSWORD, sub)) => hash_password(
            sub.get_one::<String>(USERNAME).unwrap(),
            sub.get_one::<String>(PASSWORD).unwrap(),
        ),
        _ => unreachable!("subcommand is required"),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            0
        }
        Err(msg) => {
            println!("Error: {msg}");
            1
        }
    }
}

fn main() {
    let args = cli().get_matches();
    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}

//! Admin account provisioning commands

use clap::{Args, Subcommand};

use custos_ops::{AdminProvisioner, CreateOutcome, DeleteOutcome};

use crate::error::CliResult;
use crate::interactive::{
    confirm, email_validator, is_interactive_terminal, prompt_secret, prompt_text,
    require_interactive,
};
use crate::output::{print_info, print_key_value, print_success, print_warning};

/// Admin account provisioning commands
#[derive(Args, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommands,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Create (or update) an admin account with claim and profile
    Create(CreateArgs),
    /// Grant the admin claim to an already-registered account
    Grant(GrantArgs),
    /// Delete an admin account and its mirrored profile
    Delete(DeleteArgs),
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Admin email address (prompted when omitted)
    pub email: Option<String>,

    /// Credential secret (prompted when omitted)
    #[arg(long)]
    pub secret: Option<String>,

    /// Display name for the mirrored profile
    #[arg(long, default_value = "Admin")]
    pub display_name: String,
}

/// Arguments for the grant command
#[derive(Args, Debug)]
pub struct GrantArgs {
    /// Email of the account to promote
    pub email: String,
}

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Email of the account to remove
    pub email: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Execute admin commands
pub async fn execute(args: AdminArgs) -> CliResult<()> {
    match args.command {
        AdminCommands::Create(a) => execute_create(a).await,
        AdminCommands::Grant(a) => execute_grant(a).await,
        AdminCommands::Delete(a) => execute_delete(a).await,
    }
}

async fn execute_create(args: CreateArgs) -> CliResult<()> {
    let email = match args.email {
        Some(email) => email,
        None => {
            require_interactive()?;
            prompt_text("Admin email address", email_validator)?
        }
    };
    let secret = match args.secret {
        Some(secret) => secret,
        None => {
            require_interactive()?;
            prompt_secret("Credential secret")?
        }
    };

    let store = super::store_from_defaults()?;
    let provisioner =
        AdminProvisioner::new(&store, &store).with_display_name(args.display_name.clone());

    print_info(&format!("Provisioning admin account for {email}..."));
    let outcome = provisioner.create(&email, &secret).await?;

    match &outcome {
        CreateOutcome::Created { uid } => {
            print_success("Admin account created.");
            print_key_value("Email", &email);
            print_key_value("UID", uid);
        }
        CreateOutcome::Updated { uid } => {
            print_warning("Account already existed; secret rotated and claim re-applied.");
            print_key_value("Email", &email);
            print_key_value("UID", uid);
        }
    }
    print_success("Admin claim set.");
    print_success("Profile document mirrored with status 'approved'.");
    println!("\nThe account can now log into the admin panel.");

    Ok(())
}

async fn execute_grant(args: GrantArgs) -> CliResult<()> {
    let store = super::store_from_defaults()?;
    let provisioner = AdminProvisioner::new(&store, &store);

    print_info(&format!("Looking up {}...", args.email));
    let identity = provisioner.grant(&args.email).await?;

    print_success(&format!("Admin claim set for {}.", args.email));
    print_key_value("UID", &identity.uid);
    print_key_value("Claims", &serde_json::to_string(&identity.claims)?);

    Ok(())
}

async fn execute_delete(args: DeleteArgs) -> CliResult<()> {
    if !args.force && is_interactive_terminal() {
        let proceed = confirm(&format!(
            "Delete the admin account '{}' and its profile?",
            args.email
        ))?;
        if !proceed {
            print_info("Delete cancelled.");
            return Ok(());
        }
    }

    let store = super::store_from_defaults()?;
    let provisioner = AdminProvisioner::new(&store, &store);

    match provisioner.delete(&args.email).await? {
        DeleteOutcome::Deleted { uid } => {
            print_success(&format!("Deleted identity {uid} and its profile."));
        }
        DeleteOutcome::AlreadyAbsent => {
            print_info("Identity does not exist, nothing to delete.");
        }
    }

    Ok(())
}

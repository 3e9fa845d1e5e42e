use clap::Subcommand;

use super::common::open_engine;

#[derive(Subcommand)]
pub enum UserAction {
    /// Create the summary record for a new user
    Provision {
        /// User ID
        id: String,
    },
}

pub fn run(action: UserAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        UserAction::Provision { id } => {
            let mut engine = open_engine()?;
            engine.provision_user(&id)?;
            println!("User provisioned: {id}");
        }
    }
    Ok(())
}

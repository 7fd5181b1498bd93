//! Create-manager command - Provisions a staff account.
//!
//! Managers cannot sign up through the API; this is the only way to create one.

use std::sync::Arc;

use crate::cli::args::CreateManagerArgs;
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, Persistence};
use crate::services::{AuthService, Authenticator};

/// Execute the create-manager command
pub async fn execute(args: CreateManagerArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let auth = Authenticator::new(Arc::new(Persistence::new(db.get_connection())), config);

    let user = auth
        .create_manager(
            args.username,
            args.email,
            args.password,
            args.first_name,
            args.last_name,
        )
        .await?;

    println!("Manager {} created with id {}", user.username, user.id);
    Ok(())
}

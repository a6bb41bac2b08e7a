//! `daisy login`: verify credentials.

use serde::Serialize;

use daisy_core::Hub;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct LoginInfo {
    account_id: i64,
    email: String,
}

pub async fn handle(hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    let session = util::login(hub, global).await?;
    let info = LoginInfo {
        account_id: session.account_id,
        email: hub.config().credentials.email.clone(),
    };
    let out = output::render_single(
        &global.output,
        &info,
        |i| format!("Logged in as {} (account {})", i.email, i.account_id),
        |i| i.account_id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

use super::*;
pub(super) async fn handle_contact(args: ContactArgs) -> anyhow::Result<()> {
    let message = contact::validate(&args.name, &args.email, &args.message)?;
    info!(email = %message.email, "Contact form accepted");
    println!("{SENDING_MESSAGE}");
    tokio::time::sleep(REPLY_DELAY).await;
    println!("{THANKS_MESSAGE}");
    Ok(())
}

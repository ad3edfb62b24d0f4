use clap::{Args, Subcommand};
use fruitcart::{
    messages::{MessageId, MessagesSlice, recent},
    validation::ContactForm,
};
use fruitcart_app::listing::dispatch;

use super::{Session, render, view::ConsoleView};

#[derive(Debug, Args)]
pub(crate) struct MessagesCommand {
    #[command(subcommand)]
    command: MessagesSubcommand,
}

#[derive(Debug, Subcommand)]
enum MessagesSubcommand {
    /// List customer messages, newest first
    List,

    /// Send the contact form
    Send(SendMessageArgs),

    /// Delete a customer message
    Delete(MessageIdArgs),
}

#[derive(Debug, Args)]
struct SendMessageArgs {
    /// Sender name
    #[arg(long)]
    name: String,

    /// Sender email
    #[arg(long)]
    email: String,

    /// Subject line
    #[arg(long)]
    subject: String,

    /// Message body
    message: String,
}

#[derive(Debug, Args)]
struct MessageIdArgs {
    /// Message id
    id: String,
}

pub(crate) async fn run(command: MessagesCommand, session: &Session) -> Result<(), String> {
    match command.command {
        MessagesSubcommand::List => list(session).await,
        MessagesSubcommand::Send(args) => {
            let form = ContactForm {
                name: args.name,
                email: args.email,
                subject: args.subject,
                message: args.message,
            };

            let message = session
                .context
                .send_message(form)
                .await
                .map_err(|error| error.user_message())?;

            println!("{message}");

            Ok(())
        }
        MessagesSubcommand::Delete(args) => {
            let role = session.user()?.role;

            if !role.can_delete_messages() {
                return Err(format!("{role} accounts cannot delete messages"));
            }

            let view = ConsoleView::new(move || async move {
                if let Err(error) = list(session).await {
                    println!("{error}");
                }
            });

            dispatch(
                &view,
                session.context.delete_message(MessageId::new(args.id)),
            )
            .await
            .map(drop)
            .map_err(|error| error.user_message())
        }
    }
}

async fn list(session: &Session) -> Result<(), String> {
    session
        .context
        .load_messages()
        .await
        .map_err(|error| error.user_message())?;

    println!("{}", messages_table(&session.context.state.messages()));

    Ok(())
}

fn messages_table(slice: &MessagesSlice) -> String {
    if slice.messages.is_empty() {
        return "no messages".to_string();
    }

    render::table(
        &["Id", "From", "Email", "Subject", "Message", "Sent"],
        recent(&slice.messages, slice.messages.len())
            .into_iter()
            .map(|message| {
                [
                    message.id.to_string(),
                    message.name.clone(),
                    message.email.clone(),
                    message.subject.clone(),
                    message.message.clone(),
                    render::date(message.created_at),
                ]
            }),
        0..0,
    )
}

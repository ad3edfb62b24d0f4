use std::{pin::pin, sync::Arc};

use clap::{Args, Subcommand};
use fruitcart::{
    notifications::{NotificationFeed, NotificationId},
    users::User,
};
use fruitcart_app::{poller::NotificationPoller, shutdown};

use super::{Session, render};

#[derive(Debug, Args)]
pub(crate) struct NotificationsCommand {
    #[command(subcommand)]
    command: NotificationsSubcommand,
}

#[derive(Debug, Subcommand)]
enum NotificationsSubcommand {
    /// Show the current notifications
    List,

    /// Keep polling and print the feed whenever it changes, until Ctrl+C
    Watch,

    /// Mark one notification read
    Read(NotificationIdArgs),

    /// Mark every notification read
    ReadAll,
}

#[derive(Debug, Args)]
struct NotificationIdArgs {
    /// Notification id
    id: String,
}

pub(crate) async fn run(command: NotificationsCommand, session: &Session) -> Result<(), String> {
    let user = customer(session)?;
    let poller = Arc::new(NotificationPoller::new(
        Arc::clone(&session.context.notifications),
        session.poll_interval,
    ));

    match command.command {
        NotificationsSubcommand::List => {
            poller.refresh(&user.id).await;
            println!("{}", feed_table(&poller.feed()));
        }
        NotificationsSubcommand::Watch => watch(session, poller).await?,
        NotificationsSubcommand::Read(args) => {
            poller.refresh(&user.id).await;

            let message = poller
                .mark_read(NotificationId::new(args.id))
                .await
                .map_err(|error| error.user_message())?;

            println!("{message}");
            println!("{}", feed_table(&poller.feed()));
        }
        NotificationsSubcommand::ReadAll => {
            poller.refresh(&user.id).await;

            let message = poller
                .mark_all_read(user.id)
                .await
                .map_err(|error| error.user_message())?;

            println!("{message}");
            println!("{}", feed_table(&poller.feed()));
        }
    }

    Ok(())
}

fn customer(session: &Session) -> Result<User, String> {
    let user = session.user()?;

    if !user.role.receives_notifications() {
        return Err(format!("{} accounts have no notifications", user.role));
    }

    Ok(user)
}

async fn watch(session: &Session, poller: Arc<NotificationPoller>) -> Result<(), String> {
    let mut feed = poller.subscribe();
    let handle = Arc::clone(&poller).spawn(session.context.state.subscribe_user());
    let mut stop = pin!(shutdown::wait());

    loop {
        tokio::select! {
            result = &mut stop => {
                handle.stop();
                return result.map_err(|error| error.to_string());
            }
            changed = feed.changed() => {
                if changed.is_err() {
                    return Ok(());
                }

                let snapshot = feed.borrow_and_update().clone();

                println!("{}", feed_table(&snapshot));
            }
        }
    }
}

fn feed_table(feed: &NotificationFeed) -> String {
    if feed.notifications().is_empty() {
        return "no notifications".to_string();
    }

    let table = render::table(
        &["", "Id", "Message", "Opens", "Received"],
        feed.notifications().iter().map(|notification| {
            [
                if notification.read { "" } else { "*" }.to_string(),
                notification.id.to_string(),
                notification.message.clone(),
                notification.target().to_string(),
                render::date(notification.created_at),
            ]
        }),
        0..0,
    );

    format!("{table}\nunread: {}", feed.unread())
}

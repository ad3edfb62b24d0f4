use clap::{Args, Subcommand};
use fruitcart::{
    listing::{ListQuery, SortKey},
    roles::Role,
    users::UserId,
};
use fruitcart_app::listing::{ListController, LoadOutcome, dispatch};

use super::{Session, render, view::ConsoleView};

#[derive(Debug, Args)]
pub(crate) struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Debug, Subcommand)]
enum UsersSubcommand {
    /// List registered users
    List(ListUsersArgs),

    /// List the roles an employee can be given
    Roles,

    /// Delete a user
    Delete(UserIdArgs),
}

#[derive(Debug, Args)]
struct ListUsersArgs {
    /// Case-insensitive search on "first last"
    #[arg(long, default_value = "")]
    search: String,

    /// Only users with this role
    #[arg(long)]
    role: Option<Role>,

    /// a-z, z-a, newest or oldest
    #[arg(long, default_value = "newest")]
    sort: SortKey,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Debug, Args)]
struct UserIdArgs {
    /// User id
    id: String,
}

pub(crate) async fn run(command: UsersCommand, session: &Session) -> Result<(), String> {
    match command.command {
        UsersSubcommand::List(args) => {
            let query = ListQuery::new()
                .with_search(args.search)
                .with_facet(args.role)
                .with_sort(args.sort)
                .with_page_size(session.page_size)
                .with_page(args.page);

            list(session, query).await
        }
        UsersSubcommand::Roles => roles(session).await,
        UsersSubcommand::Delete(args) => {
            let view = ConsoleView::new(move || async move {
                let query = ListQuery::new().with_page_size(session.page_size);

                if let Err(error) = list(session, query).await {
                    println!("{error}");
                }
            });

            dispatch(
                &view,
                session.context.users.delete_user(UserId::new(args.id)),
            )
            .await
            .map(drop)
            .map_err(|error| error.user_message())
        }
    }
}

async fn list(session: &Session, query: ListQuery<Role>) -> Result<(), String> {
    let controller = ListController::new(query);

    if let LoadOutcome::Failed(notice) = controller
        .load(session.context.users.list_users())
        .await
    {
        return Err(notice.to_string());
    }

    let page = controller.page().await;
    let roles: Vec<String> = controller
        .facet_options()
        .await
        .into_iter()
        .map(String::from)
        .collect();

    println!(
        "{}",
        render::table(
            &["#", "Id", "Name", "Email", "Role", "Joined"],
            page.items().iter().enumerate().map(|(offset, user)| {
                [
                    (page.first_row_number() + offset).to_string(),
                    user.id.to_string(),
                    user.full_name(),
                    user.email.clone(),
                    user.role.to_string(),
                    render::date(user.created_at),
                ]
            }),
            0..1,
        )
    );
    println!("{}", render::footer(&page));

    if !roles.is_empty() {
        println!("roles: {}", roles.join(", "));
    }

    Ok(())
}

async fn roles(session: &Session) -> Result<(), String> {
    let roles = session
        .context
        .users
        .list_roles()
        .await
        .map_err(|error| error.user_message())?;

    println!(
        "{}",
        render::table(
            &["Id", "Role"],
            roles
                .into_iter()
                .map(|role| [role.id.to_string(), role.role_name]),
            0..0,
        )
    );

    Ok(())
}

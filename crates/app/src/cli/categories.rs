use clap::{Args, Subcommand};
use fruitcart::{
    categories::CategoryId,
    listing::{ListQuery, SortKey},
};
use fruitcart_app::listing::{ListController, LoadOutcome, dispatch};

use super::{Session, render, view::ConsoleView};

#[derive(Debug, Args)]
pub(crate) struct CategoriesCommand {
    #[command(subcommand)]
    command: CategoriesSubcommand,
}

#[derive(Debug, Subcommand)]
enum CategoriesSubcommand {
    /// List categories
    List(ListCategoriesArgs),

    /// Add a category
    Add(AddCategoryArgs),

    /// Rename a category
    Rename(RenameCategoryArgs),

    /// Delete a category
    Delete(CategoryIdArgs),
}

#[derive(Debug, Args)]
struct ListCategoriesArgs {
    /// Case-insensitive name search
    #[arg(long, default_value = "")]
    search: String,

    /// newest or oldest
    #[arg(long, default_value = "newest")]
    sort: SortKey,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Debug, Args)]
struct AddCategoryArgs {
    /// Category name
    name: String,
}

#[derive(Debug, Args)]
struct RenameCategoryArgs {
    /// Category id
    id: String,

    /// New category name
    name: String,
}

#[derive(Debug, Args)]
struct CategoryIdArgs {
    /// Category id
    id: String,
}

pub(crate) async fn run(command: CategoriesCommand, session: &Session) -> Result<(), String> {
    let view = ConsoleView::new(move || async move {
        if let Err(error) = list(session, ListQuery::new().with_page_size(session.page_size)).await {
            println!("{error}");
        }
    });

    let categories = &session.context.categories;

    let mutation = match command.command {
        CategoriesSubcommand::List(args) => {
            let query = ListQuery::new()
                .with_search(args.search)
                .with_sort(args.sort)
                .with_page_size(session.page_size)
                .with_page(args.page);

            return list(session, query).await;
        }
        CategoriesSubcommand::Add(args) => categories.add_category(args.name),
        CategoriesSubcommand::Rename(args) => {
            categories.rename_category(CategoryId::new(args.id), args.name)
        }
        CategoriesSubcommand::Delete(args) => categories.delete_category(CategoryId::new(args.id)),
    };

    dispatch(&view, mutation)
        .await
        .map(drop)
        .map_err(|error| error.user_message())
}

async fn list(
    session: &Session,
    query: ListQuery<std::convert::Infallible>,
) -> Result<(), String> {
    let controller = ListController::new(query);

    if let LoadOutcome::Failed(notice) = controller
        .load(session.context.categories.list_categories())
        .await
    {
        return Err(notice.to_string());
    }

    let page = controller.page().await;

    println!(
        "{}",
        render::table(
            &["#", "Id", "Name", "Created"],
            page.items().iter().enumerate().map(|(offset, category)| {
                [
                    (page.first_row_number() + offset).to_string(),
                    category.id.to_string(),
                    category.category_name.clone(),
                    render::date(category.created_at),
                ]
            }),
            0..1,
        )
    );
    println!("{}", render::footer(&page));

    Ok(())
}

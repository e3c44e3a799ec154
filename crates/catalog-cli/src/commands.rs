//! Command handlers. Each one drives a controller the way a view would and
//! prints the resulting state.

use std::path::{Path, PathBuf};
use std::time::Duration;

use catalog_app::{DataUrlRenderer, FormController, FormState, ListController, RemoveOutcome};
use catalog_client::CatalogClient;
use catalog_core::Product;

use crate::terminal::{load_image, TerminalConfirmer, TerminalNavigator};

const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

type Form = FormController<CatalogClient, TerminalNavigator, DataUrlRenderer>;

fn new_form(client: CatalogClient) -> Form {
    FormController::new(client, TerminalNavigator, DataUrlRenderer)
}

fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("no products");
        return;
    }
    println!("{:>6}  {:<32}  {:>10}  IMAGE", "ID", "NAME", "PRICE");
    for p in products {
        println!(
            "{:>6}  {:<32}  {:>10.2}  {}",
            p.id,
            p.name,
            p.price,
            p.image().unwrap_or("-")
        );
    }
}

fn print_form(state: &FormState) {
    if let Some(id) = state.id {
        println!("id:      {id}");
    }
    println!("name:    {}", state.draft.name);
    println!("price:   {}", state.draft.price);
    match state.draft.preview.as_deref() {
        Some(p) if p.starts_with("data:") => println!("image:   <{} byte data URL>", p.len()),
        Some(p) => println!("image:   {p}"),
        None => println!("image:   -"),
    }
}

async fn attach_image(form: &Form, image: Option<PathBuf>) -> anyhow::Result<()> {
    if let Some(path) = image {
        form.select_file(Some(load_image(&path).await?)).await;
    }
    Ok(())
}

pub(crate) async fn run_list(client: CatalogClient) -> anyhow::Result<()> {
    let list = ListController::new(client, TerminalNavigator, TerminalConfirmer::new(false));
    list.load().await?;
    print_products(&list.state().products);
    Ok(())
}

pub(crate) async fn run_show(client: CatalogClient, id: i64) -> anyhow::Result<()> {
    let form = new_form(client);
    form.enter(Some(id)).await?;
    print_form(&form.state());
    Ok(())
}

pub(crate) async fn run_create(
    client: CatalogClient,
    name: String,
    price: String,
    image: Option<PathBuf>,
) -> anyhow::Result<()> {
    let form = new_form(client);
    form.enter(None).await?;
    form.set_name(name);
    form.set_price(price);
    attach_image(&form, image).await?;
    form.save().await?;

    match form.state().id {
        Some(id) => println!("created product {id}"),
        None => println!("created product"),
    }
    Ok(())
}

pub(crate) async fn run_edit(
    client: CatalogClient,
    id: i64,
    name: Option<String>,
    price: Option<String>,
    image: Option<PathBuf>,
) -> anyhow::Result<()> {
    let form = new_form(client);
    form.enter(Some(id)).await?;
    if let Some(name) = name {
        form.set_name(name);
    }
    if let Some(price) = price {
        form.set_price(price);
    }
    attach_image(&form, image).await?;
    form.save().await?;
    println!("updated product {id}");
    Ok(())
}

pub(crate) async fn run_delete(client: CatalogClient, id: i64, yes: bool) -> anyhow::Result<()> {
    let list = ListController::new(client, TerminalNavigator, TerminalConfirmer::new(yes));
    list.load().await?;
    let product = list
        .state()
        .products
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| anyhow::anyhow!("product {id} not found"))?;

    match list.remove(&product).await? {
        RemoveOutcome::Removed => println!("deleted product {id}"),
        RemoveOutcome::Declined => println!("kept product {id}"),
    }
    Ok(())
}

pub(crate) async fn run_upload_image(
    client: CatalogClient,
    id: i64,
    path: &Path,
) -> anyhow::Result<()> {
    let form = new_form(client);
    form.enter(Some(id)).await?;
    let file = load_image(path).await?;
    eprintln!("uploading {} bytes", file.len());

    let upload = form.upload_image(file);
    tokio::pin!(upload);
    let mut ticker = tokio::time::interval(PROGRESS_INTERVAL);
    let result = loop {
        tokio::select! {
            result = &mut upload => break result,
            _ = ticker.tick() => eprint!("\r{:>3}%", form.state().progress),
        }
    };
    eprintln!("\r{:>3}%", form.state().progress);

    result?;
    println!("uploaded image for product {id}");
    Ok(())
}

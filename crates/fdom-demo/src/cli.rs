use clap::Parser;
use fdom::prelude::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::{DemoError, Result};
use crate::todo_app::{self, ADD, DRAFT, INCREMENT};

#[derive(Debug, Parser)]
#[command(
    name = "fdom-demo",
    about = "Mount the FrankenDOM counter/todo demo and drive it with simulated events",
    version
)]
pub struct Cli {
    /// Number of simulated clicks on the increment button.
    #[arg(long, default_value_t = 3)]
    pub clicks: u32,

    /// Log filter, e.g. `fdom_runtime=trace`. Overrides `RUST_LOG`.
    #[arg(long)]
    pub log: Option<String>,

    /// Todo items to enter through simulated input events.
    #[arg(long = "todo", value_name = "ITEM", num_args = 1..)]
    pub todos: Vec<String>,

    /// Print document mutation counters after the run.
    #[arg(long)]
    pub stats: bool,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref())?;
    run(cli)
}

fn init_logging(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::from_default_env(),
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    Ok(())
}

fn document() -> Result<SharedDocument> {
    let doc = Document::new_shared();
    {
        let mut d = doc.borrow_mut();
        let target = d.create_element("div")?;
        d.set_attribute(target, "id", "app")?;
        let body = d.body();
        d.append_child(body, target)?;
    }
    Ok(doc)
}

fn click(app: &App, selector: &str) -> Result<()> {
    let node = app.query(selector)?.ok_or_else(|| DemoError::MissingElement {
        selector: selector.to_owned(),
    })?;
    app.dispatch(node, &Event::new("click"))?;
    Ok(())
}

pub fn run(cli: Cli) -> Result<()> {
    let app = App::new(document()?, todo_app::options())?;
    app.mount()?;
    println!("mounted:\n{}\n", app.html()?);

    for _ in 0..cli.clicks {
        click(&app, INCREMENT)?;
    }
    for item in &cli.todos {
        let draft = app.query(DRAFT)?.ok_or_else(|| DemoError::MissingElement {
            selector: DRAFT.to_owned(),
        })?;
        app.dispatch(draft, &Event::new("input").with_data(item.as_str()))?;
        click(&app, ADD)?;
    }

    println!("final:\n{}", app.html()?);
    if cli.stats {
        let stats = app.document().borrow().stats();
        println!("\n{stats:#?}");
        println!("mutations: {}", stats.mutations());
    }
    Ok(())
}

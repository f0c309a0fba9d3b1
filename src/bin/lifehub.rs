use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use lifehub_client::budget::TransactionFilter;
use lifehub_client::dashboard::Dashboard;
use lifehub_client::prelude::*;
use lifehub_client::shopping::ShoppingFilter;
use lifehub_client::tasks::{NewTask, TaskFilter, TaskPriority};

const SESSION_FILE: &str = ".lifehub-session.json";

fn cli() -> Command<'static> {
    Command::new("lifehub")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Command line access to a LifeHub dashboard")
        .subcommand_required(true)
        .arg(
            Arg::new("session-file")
                .long("session-file")
                .value_name("FILE")
                .help("Where the session token is kept")
                .takes_value(true)
                .global(true),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in and store the session")
                .arg(Arg::new("email").required(true))
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .takes_value(true)
                        .env("LIFEHUB_PASSWORD")
                        .required(true),
                ),
        )
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(Command::new("whoami").about("Show the signed-in user"))
        .subcommand(
            Command::new("tasks")
                .about("List tasks")
                .arg(
                    Arg::new("done")
                        .long("done")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("open"),
                )
                .arg(Arg::new("open").long("open").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("add-task")
                .about("Create a task")
                .arg(Arg::new("title").required(true))
                .arg(
                    Arg::new("priority")
                        .long("priority")
                        .takes_value(true)
                        .value_parser(["low", "medium", "high"]),
                ),
        )
        .subcommand(
            Command::new("toggle-task")
                .about("Flip a task between done and not done")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                ),
        )
        .subcommand(Command::new("shopping").about("Show what is left to buy"))
        .subcommand(Command::new("budget").about("Show this month's budget"))
}

fn flag(matches: &ArgMatches, id: &str) -> bool {
    matches.get_one::<bool>(id).copied().unwrap_or(false)
}

fn priority(name: &str) -> TaskPriority {
    match name {
        "low" => TaskPriority::Low,
        "high" => TaskPriority::High,
        _ => TaskPriority::Medium,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let matches = cli().get_matches();

    let session_file = matches
        .get_one::<String>("session-file")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(SESSION_FILE));

    let options = ClientOptions::from_env()?;
    let hub = LifeHub::with_store(options, Arc::new(FileCredentialStore::new(session_file)))?;
    let dashboard = hub.dashboard();

    match matches.subcommand() {
        Some(("login", args)) => {
            let email = args.get_one::<String>("email").context("email is required")?;
            let password = args
                .get_one::<String>("password")
                .context("password is required")?;
            let response = dashboard.sign_in(email, password).await?;
            println!("Signed in as {}", response.user.username);
        }
        Some(("logout", _)) => {
            dashboard.sign_out()?;
            println!("Signed out");
        }
        Some((command, args)) => {
            if hub.auth().restore().await?.is_none() {
                bail!("Not signed in, run `lifehub login` first");
            }
            run(&dashboard, command, args).await?;
        }
        None => bail!("No command given"),
    }

    Ok(())
}

async fn run(dashboard: &Dashboard, command: &str, args: &ArgMatches) -> anyhow::Result<()> {
    match command {
        "whoami" => {
            let user = dashboard.current_user().await?;
            println!("{} <{}>", user.username, user.email);
        }
        "tasks" => {
            let filter = if flag(args, "done") {
                TaskFilter::default().completed(true)
            } else if flag(args, "open") {
                TaskFilter::default().completed(false)
            } else {
                TaskFilter::default()
            };
            for task in dashboard.tasks(&filter).await? {
                let mark = if task.completed { "x" } else { " " };
                println!("[{}] {:>4}  {}", mark, task.id, task.title);
            }
        }
        "add-task" => {
            let title = args.get_one::<String>("title").context("title is required")?;
            let mut task = NewTask::new(title);
            if let Some(name) = args.get_one::<String>("priority") {
                task = task.with_priority(priority(name));
            }
            let task = dashboard.create_task(&task).await?;
            println!("Created task {}", task.id);
        }
        "toggle-task" => {
            let id = *args.get_one::<i64>("id").context("id is required")?;
            let task = dashboard.toggle_task(id).await?;
            let state = if task.completed { "done" } else { "open" };
            println!("Task {} is now {}", task.id, state);
        }
        "shopping" => {
            let filter = ShoppingFilter::default().completed(false);
            let (items, summary) = tokio::try_join!(
                dashboard.shopping_items(&filter),
                dashboard.shopping_summary()
            )?;
            for item in items {
                println!("{:>4}  {} x{} {}", item.id, item.name, item.quantity, item.unit);
            }
            println!(
                "{} of {} bought ({:.0}%)",
                summary.completed_items, summary.total_items, summary.completion_rate
            );
        }
        "budget" => {
            let latest = TransactionFilter::default().page(0, 5);
            let (overview, recent) = tokio::try_join!(
                dashboard.budget_overview(),
                dashboard.budget_transactions(&latest)
            )?;
            for category in &overview.categories {
                println!(
                    "{:<20} {:>10.2} / {:>10.2}",
                    category.name, category.spent_this_month, category.monthly_budget
                );
            }
            println!(
                "Spent {:.2} of {:.2}, {:.2} left",
                overview.total_spent, overview.total_budget, overview.remaining_budget
            );
            for transaction in recent {
                println!(
                    "  {}  {:>10.2}  {}",
                    transaction.transaction_date, transaction.amount, transaction.title
                );
            }
        }
        other => bail!("Unknown command {}", other),
    }

    Ok(())
}

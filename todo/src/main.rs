//! Command-line walkthrough of the to-do store.
//!
//! Stands in for a view layer: dispatches the actions a user would trigger
//! and prints a line from a listener after every state change.

use anyhow::Context;
use pocket_todo::{AppAction, AppConfig, AppState, UiAction, config::DEFAULT_LOG_FILTER, new_store};
use pocket_todo_core::action::Action;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn render(state: &AppState) {
    let theme = if state.ui.dark { "dark" } else { "light" };
    let banner = if state.ui.banner_visible { " | Task added!" } else { "" };
    println!(
        "[{theme}] {} tasks, {} done{banner}",
        state.tasks.len(),
        state.tasks.done_count()
    );
    for task in &state.tasks {
        let mark = if task.done { "x" } else { " " };
        println!("    [{mark}] {}", task.title);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        action_buffer = config.store.action_broadcast_capacity,
        "Starting pocket-todo demo"
    );

    let store = new_store(&config);

    // Async observer, the way a remote view would follow the store
    let mut actions = store.subscribe_actions();
    let observer = tokio::spawn(async move {
        let mut seen = 0_usize;
        loop {
            match actions.recv().await {
                Ok(action) => {
                    seen += 1;
                    debug!(action = action.name(), "Observed action");
                },
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Action observer lagged"),
                Err(RecvError::Closed) => break,
            }
        }
        seen
    });

    store.subscribe(render).detach();

    println!("== Adding tasks");
    store.send(AppAction::submit("Buy milk"));
    store.send(AppAction::submit("  Walk dog  "));
    store.send(AppAction::submit("   "));

    let milk = store
        .state(|s| {
            s.tasks
                .iter()
                .find(|task| task.title == "Buy milk")
                .map(|task| task.id.clone())
        })
        .context("\"Buy milk\" should have been created")?;

    println!("== Finishing \"Buy milk\"");
    store.send(AppAction::toggle_task(milk));
    store.send(AppAction::Ui(UiAction::HideBanner));

    println!("== Switching theme");
    store.send(AppAction::Ui(UiAction::ToggleTheme));

    println!("== Deleting a task that does not exist");
    store.send(AppAction::delete_task("no-such-task"));

    println!("== Snapshot");
    println!("{}", store.state(AppState::to_json)?);

    println!("== Wiping");
    store.send(AppAction::wipe_tasks());

    // Dropping the last handle closes the action stream
    drop(store);
    let seen = observer.await.context("Action observer panicked")?;
    info!(seen, "Demo finished");

    Ok(())
}
